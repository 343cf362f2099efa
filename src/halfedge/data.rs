//! Named per-entity attribute arrays attached to a half-edge mesh.

use std::collections::HashMap;

use fixedbitset as fb;
use nalgebra as na;

use super::HalfEdgeError;
use crate::Vec3;

/// An array of values, one per entity of some kind.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeData {
    /// Real values, e.g. error indicators.
    Real(na::DVector<f64>),
    /// Integer values, e.g. refinement levels or markers.
    Integer(Vec<i64>),
    /// One bit per entity, e.g. selections.
    Flags(fb::FixedBitSet),
    /// A 3D vector per entity, e.g. normals.
    Vectors(Vec<Vec3>),
}

impl AttributeData {
    /// Number of entities this array has values for.
    pub fn len(&self) -> usize {
        match self {
            AttributeData::Real(v) => v.len(),
            AttributeData::Integer(v) => v.len(),
            AttributeData::Flags(bits) => bits.len(),
            AttributeData::Vectors(v) => v.len(),
        }
    }

    /// Whether the array is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the values if this is a real-valued array.
    pub fn as_real(&self) -> Option<&na::DVector<f64>> {
        match self {
            AttributeData::Real(v) => Some(v),
            _ => None,
        }
    }

    /// Get the values if this is an integer array.
    pub fn as_integer(&self) -> Option<&[i64]> {
        match self {
            AttributeData::Integer(v) => Some(v),
            _ => None,
        }
    }

    /// Get the bits if this is a flag array.
    pub fn as_flags(&self) -> Option<&fb::FixedBitSet> {
        match self {
            AttributeData::Flags(bits) => Some(bits),
            _ => None,
        }
    }

    /// Get the vectors if this is a vector array.
    pub fn as_vectors(&self) -> Option<&[Vec3]> {
        match self {
            AttributeData::Vectors(v) => Some(v),
            _ => None,
        }
    }
}

impl From<na::DVector<f64>> for AttributeData {
    fn from(v: na::DVector<f64>) -> Self {
        AttributeData::Real(v)
    }
}

impl From<Vec<f64>> for AttributeData {
    fn from(v: Vec<f64>) -> Self {
        AttributeData::Real(na::DVector::from_vec(v))
    }
}

impl From<Vec<i64>> for AttributeData {
    fn from(v: Vec<i64>) -> Self {
        AttributeData::Integer(v)
    }
}

impl From<fb::FixedBitSet> for AttributeData {
    fn from(bits: fb::FixedBitSet) -> Self {
        AttributeData::Flags(bits)
    }
}

impl From<Vec<Vec3>> for AttributeData {
    fn from(v: Vec<Vec3>) -> Self {
        AttributeData::Vectors(v)
    }
}

/// A table of named attribute arrays.
///
/// Tables belonging to an entity kind only accept arrays
/// with one value per entity.
/// The mesh-global table accepts arrays of any length.
#[derive(Clone, Debug, Default)]
pub struct DataTable {
    /// array lengths accepted by this table, any length if empty
    lengths: Vec<usize>,
    entries: HashMap<String, AttributeData>,
}

impl DataTable {
    /// A table accepting arrays of any length.
    pub(crate) fn unaligned() -> Self {
        Self::default()
    }

    /// A table accepting arrays of the given lengths.
    pub(crate) fn aligned(lengths: Vec<usize>) -> Self {
        Self {
            lengths,
            entries: HashMap::new(),
        }
    }

    /// Whether the table accepts an array of the given length.
    pub fn accepts_len(&self, len: usize) -> bool {
        self.lengths.is_empty() || self.lengths.contains(&len)
    }

    /// Add or replace a named array, returning the previous one if it existed.
    ///
    /// Fails if the array's length doesn't match the entities of this table.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        data: impl Into<AttributeData>,
    ) -> Result<Option<AttributeData>, HalfEdgeError> {
        let name = name.into();
        let data = data.into();
        if !self.accepts_len(data.len()) {
            return Err(HalfEdgeError::AttributeLength {
                name,
                expected: self.lengths.clone(),
                actual: data.len(),
            });
        }
        Ok(self.entries.insert(name, data))
    }

    /// Insert without checking the length, for arrays the mesh creates itself.
    pub(crate) fn insert_unchecked(&mut self, name: &str, data: impl Into<AttributeData>) {
        self.entries.insert(name.to_string(), data.into());
    }

    /// Look up an array by name.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&AttributeData> {
        self.entries.get(name)
    }

    // mutable access only hands out slices,
    // so arrays can't be resized past the table's length check

    /// Modify the values of a real-valued array in place.
    pub fn real_mut(&mut self, name: &str) -> Option<&mut [f64]> {
        match self.entries.get_mut(name)? {
            AttributeData::Real(v) => Some(v.as_mut_slice()),
            _ => None,
        }
    }

    /// Modify the values of an integer array in place.
    pub fn integer_mut(&mut self, name: &str) -> Option<&mut [i64]> {
        match self.entries.get_mut(name)? {
            AttributeData::Integer(v) => Some(v),
            _ => None,
        }
    }

    /// Modify the values of a vector array in place.
    pub fn vectors_mut(&mut self, name: &str) -> Option<&mut [Vec3]> {
        match self.entries.get_mut(name)? {
            AttributeData::Vectors(v) => Some(v),
            _ => None,
        }
    }

    /// Set one bit of a flag array.
    ///
    /// Returns None if there's no flag array with the given name.
    /// Panics if `index` is out of range.
    pub fn set_flag(&mut self, name: &str, index: usize, value: bool) -> Option<()> {
        match self.entries.get_mut(name)? {
            AttributeData::Flags(bits) => {
                bits.set(index, value);
                Some(())
            }
            _ => None,
        }
    }

    /// Remove an array by name.
    #[inline]
    pub fn remove(&mut self, name: &str) -> Option<AttributeData> {
        self.entries.remove(name)
    }

    /// Whether an array with the given name exists.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Iterate over the names of the arrays in the table.
    pub fn names(&self) -> impl '_ + Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of arrays in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no arrays.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Change the accepted lengths after the mesh was rebuilt,
    /// dropping arrays that no longer fit.
    pub(crate) fn realign(&mut self, lengths: Vec<usize>) {
        self.lengths = lengths;
        let stale: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, data)| !self.accepts_len(data.len()))
            .map(|(name, _)| name.clone())
            .collect();
        for name in stale {
            log::debug!("dropping attribute '{name}' that no longer matches the mesh");
            self.entries.remove(&name);
        }
    }
}

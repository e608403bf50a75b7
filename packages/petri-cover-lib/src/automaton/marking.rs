use std::ops::Index;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    automaton::omega::ExtendedValue,
    error::{CoverabilityError, CoverabilityResult},
};

/// Largest number of places a net may have, so that every place index fits
/// into a `PlaceIndex`.
pub const MAX_PLACES: usize = u32::MAX as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceIndex {
    index: u32,
}

impl PlaceIndex {
    pub fn new(index: u32) -> Self {
        PlaceIndex { index }
    }

    /// Index of a position in a place list or marking that is at most
    /// [`MAX_PLACES`] long. Validated nets and markings guarantee this.
    pub(crate) fn from_position(position: usize) -> Self {
        debug_assert!(position < MAX_PLACES, "Place index {} out of range", position);
        PlaceIndex::new(position as u32)
    }

    pub fn iter_places(place_count: usize) -> impl Iterator<Item = PlaceIndex> {
        (0..place_count.min(MAX_PLACES)).map(PlaceIndex::from_position)
    }

    pub fn to_usize(&self) -> usize {
        self.index as usize
    }
}

impl std::fmt::Display for PlaceIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "p{}", self.index)
    }
}

impl From<u32> for PlaceIndex {
    fn from(index: u32) -> Self {
        PlaceIndex::new(index)
    }
}

impl TryFrom<usize> for PlaceIndex {
    type Error = CoverabilityError;

    fn try_from(index: usize) -> CoverabilityResult<Self> {
        u32::try_from(index).map(PlaceIndex::new).map_err(|_| {
            CoverabilityError::inconsistent(format!(
                "Place index {} exceeds the maximum of {} places.",
                index, MAX_PLACES
            ))
        })
    }
}

/// A token count (or ω) for every place of a net, positionally aligned with
/// the net's place list.
///
/// Markings are never changed in place. Firing and acceleration both
/// produce new markings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Marking {
    values: Box<[ExtendedValue]>,
}

impl Marking {
    pub fn new(values: Box<[ExtendedValue]>) -> Self {
        Marking { values }
    }

    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExtendedValue> {
        self.values.iter()
    }

    /// Non-strict componentwise comparison, `self[i] >= other[i]` for all `i`.
    pub fn covers(&self, other: &Marking) -> bool {
        debug_assert_eq!(
            self.dimension(),
            other.dimension(),
            "Markings must have the same dimension"
        );
        self.values.iter().zip(other.values.iter()).all(|(a, b)| a >= b)
    }

    /// Strict domination: `self` covers `other` and the two differ in at
    /// least one place.
    pub fn dominates(&self, other: &Marking) -> bool {
        self.covers(other) && self != other
    }

    /// The Karp-Miller ω-introduction step. Every place where `self` is
    /// strictly greater than `ancestor` becomes ω. Places equal to the
    /// ancestor keep their value.
    ///
    /// Callers only use this when `self` dominates `ancestor`.
    pub fn accelerate(&self, ancestor: &Marking) -> Marking {
        debug_assert!(
            self.dominates(ancestor),
            "Acceleration requires a dominated ancestor"
        );
        self.values
            .iter()
            .zip(ancestor.values.iter())
            .map(|(value, old)| {
                if value > old {
                    ExtendedValue::Omega
                } else {
                    *value
                }
            })
            .collect()
    }

    /// Places that hold ω in this marking.
    pub fn omega_places(&self) -> impl Iterator<Item = PlaceIndex> + '_ {
        self.values
            .iter()
            .positions(|value| value.is_omega())
            .map(PlaceIndex::from_position)
    }

    pub fn omega_count(&self) -> usize {
        self.values.iter().filter(|value| value.is_omega()).count()
    }

    /// Places where `self` is ω but `other` is not.
    pub fn new_omega_places<'a>(
        &'a self,
        other: &'a Marking,
    ) -> impl Iterator<Item = PlaceIndex> + 'a {
        self.values
            .iter()
            .zip(other.values.iter())
            .positions(|(a, b)| a.is_omega() && !b.is_omega())
            .map(PlaceIndex::from_position)
    }
}

impl std::fmt::Display for Marking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.values.iter().join(", "))
    }
}

impl From<Box<[ExtendedValue]>> for Marking {
    fn from(values: Box<[ExtendedValue]>) -> Self {
        Marking::new(values)
    }
}

impl From<Vec<ExtendedValue>> for Marking {
    fn from(values: Vec<ExtendedValue>) -> Self {
        Marking::new(values.into_boxed_slice())
    }
}

impl From<Vec<u64>> for Marking {
    fn from(values: Vec<u64>) -> Self {
        values.into_iter().map(ExtendedValue::Finite).collect()
    }
}

impl FromIterator<ExtendedValue> for Marking {
    fn from_iter<T: IntoIterator<Item = ExtendedValue>>(iter: T) -> Self {
        let values: Vec<ExtendedValue> = iter.into_iter().collect();
        Marking::new(values.into_boxed_slice())
    }
}

impl Index<PlaceIndex> for Marking {
    type Output = ExtendedValue;

    fn index(&self, index: PlaceIndex) -> &Self::Output {
        &self.values[index.to_usize()]
    }
}

impl Index<usize> for Marking {
    type Output = ExtendedValue;

    fn index(&self, index: usize) -> &Self::Output {
        &self.values[index]
    }
}

impl<'a> IntoIterator for &'a Marking {
    type Item = &'a ExtendedValue;
    type IntoIter = std::slice::Iter<'a, ExtendedValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

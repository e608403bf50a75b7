use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::{
    automaton::{
        marking::{Marking, PlaceIndex},
        omega::ExtendedValue,
    },
    error::{CoverabilityError, CoverabilityResult},
};

/// Petri net transition. Each arc is a tuple of the weight and the place it
/// consumes from (input) or produces into (output). Places without an arc
/// are neither consumed from nor produced into.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetriNetTransition {
    name: String,
    input: Vec<(u64, PlaceIndex)>,
    output: Vec<(u64, PlaceIndex)>,
}

impl PetriNetTransition {
    pub fn new(
        name: impl Into<String>,
        input: Vec<(u64, PlaceIndex)>,
        output: Vec<(u64, PlaceIndex)>,
    ) -> Self {
        Self {
            name: name.into(),
            input,
            output,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn input(&self) -> &[(u64, PlaceIndex)] {
        &self.input
    }

    pub fn output(&self) -> &[(u64, PlaceIndex)] {
        &self.output
    }

    /// Returns the consumed and produced token counts for a place.
    pub fn get_update_for_place(&self, place: PlaceIndex) -> (u64, u64) {
        let consumed = self
            .input
            .iter()
            .filter(|(_, p)| *p == place)
            .map(|(w, _)| w)
            .sum();
        let produced = self
            .output
            .iter()
            .filter(|(_, p)| *p == place)
            .map(|(w, _)| w)
            .sum();

        (consumed, produced)
    }

    /// A transition is enabled if every input place holds at least the
    /// required number of tokens. ω satisfies any requirement.
    pub fn is_enabled(&self, marking: &Marking) -> bool {
        self.input
            .iter()
            .all(|(weight, place)| marking[*place] >= ExtendedValue::Finite(*weight))
    }

    /// Fires the transition, computing `marking - input + output` per place.
    ///
    /// The transition must be enabled. Firing a disabled transition yields
    /// `ArithmeticInvariantViolated`, and a produced count above `u64::MAX`
    /// yields `CountOverflow`.
    pub fn fire(&self, marking: &Marking) -> CoverabilityResult<Marking> {
        debug_assert!(
            self.is_enabled(marking),
            "Transition '{}' fired while disabled under {}",
            self.name,
            marking
        );

        let mut values: Vec<ExtendedValue> = marking.iter().copied().collect();

        for (weight, place) in &self.input {
            let slot = &mut values[place.to_usize()];
            *slot = slot.checked_sub(ExtendedValue::Finite(*weight))?;
        }

        for (weight, place) in &self.output {
            let slot = &mut values[place.to_usize()];
            *slot = slot.checked_add(ExtendedValue::Finite(*weight))?;
        }

        Ok(values.into())
    }

    /// Checks that every arc references one of `place_count` places and that
    /// no place appears twice on the same side.
    pub fn validate(&self, place_count: usize) -> CoverabilityResult<()> {
        for (side, arcs) in [("input", &self.input), ("output", &self.output)] {
            let mut seen = HashSet::new();
            for (_, place) in arcs {
                if place.to_usize() >= place_count {
                    return Err(CoverabilityError::inconsistent(format!(
                        "Transition '{}' references place {} in its {} but the net only has {} places.",
                        self.name, place, side, place_count
                    )));
                }
                if !seen.insert(*place) {
                    return Err(CoverabilityError::inconsistent(format!(
                        "Transition '{}' lists place {} more than once in its {}.",
                        self.name, place, side
                    )));
                }
            }
        }

        Ok(())
    }
}

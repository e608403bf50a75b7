use hashbrown::HashSet;
use initialized::InitializedPetriNet;
use serde::{Deserialize, Serialize};
use transition::PetriNetTransition;

use crate::{
    automaton::marking::{MAX_PLACES, Marking, PlaceIndex},
    error::{CoverabilityError, CoverabilityResult},
};

pub mod format;
pub mod initialized;
pub mod transition;

/// Position of a transition in declaration order. Transitions fire in this
/// order at every node of a coverability tree.
pub type TransitionIndex = usize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetriNet {
    places: Vec<String>,
    transitions: Vec<PetriNetTransition>,
}

impl PetriNet {
    pub fn new(places: Vec<String>) -> Self {
        Self {
            places,
            transitions: vec![],
        }
    }

    /// Adds a transition. The first element of each arc tuple is the weight,
    /// the second the place it touches.
    pub fn add_transition(
        &mut self,
        name: impl Into<String>,
        input: Vec<(u64, PlaceIndex)>,
        output: Vec<(u64, PlaceIndex)>,
    ) -> TransitionIndex {
        self.add_transition_struct(PetriNetTransition::new(name, input, output))
    }

    pub fn add_transition_struct(&mut self, transition: PetriNetTransition) -> TransitionIndex {
        self.transitions.push(transition);
        self.transitions.len() - 1
    }

    pub fn place_count(&self) -> usize {
        self.places.len()
    }

    pub fn places(&self) -> &[String] {
        &self.places
    }

    pub fn place_name(&self, place: PlaceIndex) -> &str {
        &self.places[place.to_usize()]
    }

    pub fn place_index(&self, name: &str) -> Option<PlaceIndex> {
        self.places
            .iter()
            .position(|p| p == name)
            .map(PlaceIndex::from_position)
    }

    pub fn transitions(&self) -> &[PetriNetTransition] {
        &self.transitions
    }

    pub fn transition(&self, index: TransitionIndex) -> &PetriNetTransition {
        &self.transitions[index]
    }

    /// Transitions enabled under `marking`, in declaration order.
    pub fn enabled_transitions<'a>(
        &'a self,
        marking: &'a Marking,
    ) -> impl Iterator<Item = (TransitionIndex, &'a PetriNetTransition)> + 'a {
        self.transitions
            .iter()
            .enumerate()
            .filter(move |(_, t)| t.is_enabled(marking))
    }

    /// Checks place names and every transition against the place set.
    pub fn validate(&self) -> CoverabilityResult<()> {
        if self.places.len() > MAX_PLACES {
            return Err(CoverabilityError::inconsistent(format!(
                "The net has {} places, at most {} are supported.",
                self.places.len(),
                MAX_PLACES
            )));
        }

        let mut names = HashSet::new();
        for place in &self.places {
            if place.is_empty() {
                return Err(CoverabilityError::inconsistent("Place names must not be empty."));
            }
            if !names.insert(place.as_str()) {
                return Err(CoverabilityError::inconsistent(format!(
                    "Place '{}' is declared more than once.",
                    place
                )));
            }
        }

        let mut transition_names = HashSet::new();
        for transition in &self.transitions {
            if !transition_names.insert(transition.name()) {
                return Err(CoverabilityError::inconsistent(format!(
                    "Transition '{}' is declared more than once.",
                    transition.name()
                )));
            }
            transition.validate(self.place_count())?;
        }

        Ok(())
    }

    pub fn init(self, initial_marking: Marking) -> CoverabilityResult<InitializedPetriNet> {
        InitializedPetriNet::new(self, initial_marking)
    }
}

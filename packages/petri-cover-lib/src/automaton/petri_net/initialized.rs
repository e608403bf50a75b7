use serde::{Deserialize, Serialize};

use crate::{
    automaton::{
        marking::Marking,
        petri_net::{
            PetriNet,
            format::{NetDescription, ToTextFormat},
        },
    },
    error::{CoverabilityError, CoverabilityResult},
};

/// A Petri net together with its initial marking. This is the validated
/// model the coverability-tree builder consumes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitializedPetriNet {
    pub net: PetriNet,
    pub initial_marking: Marking,
}

impl InitializedPetriNet {
    pub fn new(net: PetriNet, initial_marking: Marking) -> CoverabilityResult<Self> {
        let initialized = Self {
            net,
            initial_marking,
        };
        initialized.validate()?;
        Ok(initialized)
    }

    pub fn place_count(&self) -> usize {
        self.net.place_count()
    }

    /// Checks that the net is well formed and that the initial marking has
    /// one entry per place.
    pub fn validate(&self) -> CoverabilityResult<()> {
        self.net.validate()?;

        if self.initial_marking.dimension() != self.net.place_count() {
            return Err(CoverabilityError::inconsistent(format!(
                "Initial marking has {} entries but the net has {} places.",
                self.initial_marking.dimension(),
                self.net.place_count()
            )));
        }

        Ok(())
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let net: Self = serde_json::from_str(json)?;
        net.validate()?;
        Ok(net)
    }

    pub fn to_json_file(&self, path: &str) -> anyhow::Result<()> {
        Ok(std::fs::write(path, self.to_json()?)?)
    }

    pub fn to_text_file(&self, path: &str) -> anyhow::Result<()> {
        Ok(std::fs::write(path, self.to_text_format())?)
    }

    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let path = std::path::Path::new(path);
        match path.extension() {
            Some(ext) if ext == "json" => {
                let json_str = std::fs::read_to_string(path)?;
                Self::from_json(&json_str)
            }
            Some(ext) if ext == "pn" || ext == "txt" => {
                let text = std::fs::read_to_string(path)?;
                Ok(Self::parse_from_text(&text)?)
            }
            _ => Err(anyhow::anyhow!(
                "Unsupported file extension: {:?}",
                path.extension()
            )),
        }
    }

    pub fn parse_from_text(text: &str) -> CoverabilityResult<Self> {
        let description = NetDescription::parse(text)?;
        InitializedPetriNet::try_from(description)
    }
}

impl TryFrom<NetDescription<'_>> for InitializedPetriNet {
    type Error = CoverabilityError;

    fn try_from(description: NetDescription) -> Result<Self, Self::Error> {
        let mut net = PetriNet::new(description.places.iter().map(|p| p.to_string()).collect());
        for rule in &description.transitions {
            net.add_transition_struct(rule.to_transition(&description.places)?);
        }

        InitializedPetriNet::new(net, description.marking.into())
    }
}

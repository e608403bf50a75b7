use crate::{
    automaton::omega::ExtendedValue,
    coverability::{BuildLimit, tree::CoverabilityTree},
};

/// Everything that can go wrong inside the library.
///
/// `InconsistentModel` and `Parse` are raised before any tree is built.
/// `ArithmeticInvariantViolated` means a transition was fired without being
/// enabled and is always a bug. `CountOverflow` means a finite token count
/// grew past `u64::MAX`. `ResourceExhausted` is only produced when a
/// build limit is configured and carries the tree built so far.
#[derive(Debug, thiserror::Error)]
pub enum CoverabilityError {
    #[error("inconsistent model: {0}")]
    InconsistentModel(String),
    #[error("arithmetic invariant violated: cannot compute {lhs} - {rhs}")]
    ArithmeticInvariantViolated {
        lhs: ExtendedValue,
        rhs: ExtendedValue,
    },
    #[error("token count overflow: {lhs} + {rhs} does not fit into 64 bits")]
    CountOverflow {
        lhs: ExtendedValue,
        rhs: ExtendedValue,
    },
    #[error("resource exhausted: {limit} (partial tree has {} nodes)", .tree.node_count())]
    ResourceExhausted {
        limit: BuildLimit,
        tree: Box<CoverabilityTree>,
    },
    #[error("failed to parse Petri net: {0}")]
    Parse(String),
}

impl CoverabilityError {
    pub fn inconsistent(message: impl Into<String>) -> Self {
        CoverabilityError::InconsistentModel(message.into())
    }

    /// Takes the partial tree out of a `ResourceExhausted` error.
    pub fn into_partial_tree(self) -> Option<CoverabilityTree> {
        match self {
            CoverabilityError::ResourceExhausted { tree, .. } => Some(*tree),
            _ => None,
        }
    }
}

pub type CoverabilityResult<T> = Result<T, CoverabilityError>;

pub mod analysis;
pub mod automaton;
pub mod config;
pub mod coverability;
pub mod error;
pub mod logger;
pub mod render;

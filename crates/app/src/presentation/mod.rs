//! Adapters between use cases and the outside world

pub mod cli;
pub mod launcher;

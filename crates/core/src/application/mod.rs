//! Use cases: what a user can do with their microphones

pub mod list_sources;
pub mod switch_source;

pub use list_sources::{ListSourcesUseCase, SourceListing};
pub use switch_source::SwitchSourceUseCase;

//! micswitch application layer: dependency wiring and the two entry points
//! (launcher query results and the JSON command line)

pub mod container;
pub mod presentation;

pub use container::Container;
pub use presentation::cli::CliResponse;
pub use presentation::launcher::{LauncherPresenter, ResultItem};

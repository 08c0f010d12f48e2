//! Core of micswitch: microphone domain model and use cases
//!
//! Platform code lives in `micswitch-infra`; this crate only knows about the
//! [`domain::AudioSystemClient`] capability.

pub mod application;
pub mod domain;

//! Application layer (use-cases).
//!
//! Orchestrates the chunk source and the domain types into display models
//! without depending on any renderer.

pub mod diff;

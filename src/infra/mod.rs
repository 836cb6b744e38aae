//! Infrastructure layer (adapters/implementations).
//!
//! The `similar` backed chunk source and word differ, and options files.

pub mod config;
pub mod diff;

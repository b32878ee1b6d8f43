//! # dlookup-common
//!
//! Shared directory models, derived-field parsing, filtering, and configuration
//! used across all dlookup crates. No network code lives here, just the types
//! the lookup client decodes into and the pure functions computed over them.

pub mod config;
pub mod models;

//! Directory domain models.
//!
//! These are the "truth" types: what the lookup API returns and what the
//! session, export actions, and CLI all read from.

pub mod contact;
pub mod filter;
pub mod user;

/// Re-export all model types for convenience.
pub use contact::*;
pub use filter::*;
pub use user::*;

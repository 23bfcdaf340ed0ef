//! # Stash Core
//!
//! Core types, traits, and error definitions for Stash.
//! Everything above the cache layer (configuration, services, the
//! repositories they wrap) shares these definitions.

pub mod error;
pub mod result;
pub mod telemetry;
pub mod traits;

pub use error::*;
pub use result::*;
pub use telemetry::*;
pub use traits::*;

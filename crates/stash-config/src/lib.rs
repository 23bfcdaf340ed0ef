//! # Stash Config
//!
//! Configuration management for Stash.
//! Supports layered configuration from files, `.env`, environment
//! variables, and runtime reload.

mod app_config;
mod loader;

pub use app_config::*;
pub use loader::*;

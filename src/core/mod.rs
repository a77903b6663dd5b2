//! Core domain models for bootstrap runs
//!
//! This module defines the fundamental data structures that represent
//! pipelines, steps, their context and configuration, and run outcomes.

pub mod config;
pub mod context;
pub mod error;
pub mod pipeline;
pub mod state;
pub mod step;

pub use config::*;
pub use context::*;
pub use error::*;
pub use pipeline::*;
pub use state::*;
pub use step::*;

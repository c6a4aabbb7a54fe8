//! Skillify Core - Core data structures, configuration and infrastructure
//!
//! This module defines the data model and ambient services shared by the skillify crates

pub mod async_utils;
pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use async_utils::*;
pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;

// Re-export commonly used external types
pub use async_trait::async_trait;
pub use tracing;

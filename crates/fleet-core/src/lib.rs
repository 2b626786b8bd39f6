//! Fleet Core - shared types, configuration and target discovery
//!
//! This crate provides the foundational types, error handling, configuration
//! and the target list provider used by the fleet batch executor.

pub mod config;
pub mod error;
pub mod sources;
pub mod types;

pub use error::{ConfigError, DiscoveryError, FleetError, GitError, Result, TaskError};
pub use sources::SourceDiscovery;
pub use types::Target;

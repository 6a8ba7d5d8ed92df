//! Configuration module for Tally
//!
//! - Platform path resolution
//! - Application configuration persistence
//! - The runtime context (config + clock) injected into services

pub mod app_config;
pub mod context;
pub mod paths;

pub use app_config::AppConfig;
pub use context::{Clock, Context, FixedClock, SystemClock};
pub use paths::TallyPaths;

//! Configuration loading and management for the HR operations engine.
//!
//! This module loads the engine configuration from YAML: server settings,
//! attendance rule defaults, default leave balances and optional seed data.
//!
//! # Example
//!
//! ```no_run
//! use hrms_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config").unwrap();
//! println!("Scheduled hours: {}", config.config().attendance.default_scheduled_hours);
//! ```

mod loader;
mod types;

pub use loader::{CONFIG_FILE_NAME, ConfigLoader};
pub use types::{
    AttendanceConfig, EngineConfig, LeaveConfig, SeedConfig, ServerConfig,
};

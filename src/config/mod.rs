//! Configuration module.
//!
//! This module handles parsing and validation of the administration client settings:
//! the topology of the remote side, the default host controller in a managed domain,
//! and lifecycle timing. Configurations load from JSON or YAML files, or from strings.
//!
//! # Examples
//!
//! Loading a configuration from a file:
//!
//! ```no_run
//! use mgmt_admin::config::Config;
//!
//! let config = Config::from_file("admin.json").unwrap();
//! println!("Lifecycle timeout: {:?}", config.lifecycle.timeout());
//! ```
//!
//! Creating a configuration programmatically:
//!
//! ```
//! use mgmt_admin::config::{Config, LifecycleConfig, Topology, validate_config};
//!
//! let config = Config {
//!     topology: Some(Topology::Domain),
//!     default_host: Some("master".to_string()),
//!     lifecycle: LifecycleConfig {
//!         timeout_secs: 120,
//!         ..LifecycleConfig::default()
//!     },
//! };
//! assert!(validate_config(&config).is_ok());
//! ```
mod parser;
pub mod validator;

pub use parser::{Config, LifecycleConfig, Topology};
pub use validator::validate_config;

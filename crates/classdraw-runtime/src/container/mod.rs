//! # Service Container
//!
//! Configuration loading and dependency wiring for the runtime binary.

pub mod config;
pub mod services;

pub use config::{ConfigError, NodeConfig, StoreBackend, DEFAULT_RESET_PASSWORD};
pub use services::{ContainerError, ServiceContainer};

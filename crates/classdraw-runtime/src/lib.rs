//! # ClassDraw Runtime Library
//!
//! Exposes configuration loading and service wiring so the binary stays a
//! thin shell and the wiring can be tested. The entry point is `main.rs`.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod container;

pub use container::{ConfigError, ContainerError, NodeConfig, ServiceContainer, StoreBackend};

//! # Shared Types Crate
//!
//! This crate contains the lottery data model persisted in the shared
//! document store and exchanged between the ClassDraw crates.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: the JSON layout of `lottery-state` and
//!   `lottery-config` is defined here and nowhere else.
//! - **Lenient Reads**: documents written by older deployments (missing
//!   `version`, `classNumber` instead of `classIdentifier`) still decode.
//! - **One Document, One Write**: `drawnNumbers` and `participants` live in the
//!   same value, so they are always persisted together.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;

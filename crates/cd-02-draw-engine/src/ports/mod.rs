//! Ports of the draw engine.
//!
//! Storage is reached through `cd_01_state_store::StateStoreClient`; the only
//! other dependency the engine needs from the outside world is the clock.

pub mod outbound;

pub use outbound::{Clock, FixedClock, SystemClock};

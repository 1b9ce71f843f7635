//! # ClassDraw Test Suite
//!
//! Unified test crate for behaviour that spans crates.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/
//! │   └── draw_benchmarks.rs  # Draw and selection throughput
//! └── src/integration/
//!     ├── concurrency.rs      # Parallel draws against one store
//!     ├── lifecycle.rs        # Configure, draw, lock, reset
//!     └── http_surface.rs     # Real TCP server, real HTTP client
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p cd-tests
//! cargo test -p cd-tests integration::concurrency
//! cargo bench -p cd-tests
//! ```

pub mod integration;

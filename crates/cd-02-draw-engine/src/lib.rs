//! # cd-02-draw-engine
//!
//! Draw Engine subsystem for ClassDraw: hands out unique random numbers from a
//! shared pool, manages the pool configuration and resets the lottery.
//!
//! ## Protocol
//!
//! | Step | What happens |
//! |------|--------------|
//! | READ | Fail-open read of the state document, remember its `version` |
//! | COMPUTE | Ascending `{1..total} \ drawn`, pick one uniformly |
//! | COMMIT | Version-checked write of the candidate (`version + 1`) |
//! | RETRY | Conflicts and store failures back off and start again |
//!
//! No two successful commits in one epoch carry the same number: a commit only
//! lands if the version it was computed from is still current.
//!
//! ## Crate Structure
//!
//! - `domain/` - Errors, retry policy, number selection
//! - `ports/` - Clock port
//! - `service/` - `DrawEngine`, `ConfigManager`, `ResetOperation`
//! - `test_utils` - Contended store double shared with the integration tests

pub mod domain;
pub mod ports;
pub mod service;
pub mod test_utils;

pub use domain::{available_numbers, DrawError, RetryPolicy};
pub use ports::{Clock, FixedClock, SystemClock};
pub use service::{constant_time_compare, ConfigManager, DrawEngine, DrawReceipt, ResetOperation};

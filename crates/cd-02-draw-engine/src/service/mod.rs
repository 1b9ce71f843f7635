//! # Draw Services
//!
//! - `DrawEngine`: optimistic read/compute/commit loop
//! - `ConfigManager`: pool size and the derived lock
//! - `ResetOperation`: password-guarded epoch reset

mod config_manager;
mod draw;
mod reset;


pub use config_manager::ConfigManager;
pub use draw::{DrawEngine, DrawReceipt};
pub use reset::{constant_time_compare, ResetOperation};

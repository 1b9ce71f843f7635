//! Domain layer of the draw engine: error taxonomy, retry policy and the
//! pure number-selection logic.

pub mod errors;
pub mod policy;
pub mod selection;

pub use errors::DrawError;
pub use policy::RetryPolicy;
pub use selection::available_numbers;

pub mod outbound;

pub use outbound::DocumentStore;

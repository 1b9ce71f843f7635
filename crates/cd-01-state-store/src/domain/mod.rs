//! Domain types for the state store: keys, errors and commit outcomes.

pub mod errors;
pub mod keys;

pub use errors::StoreError;
pub use keys::StoreKeys;

/// Result of a conditional (version-checked) write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasOutcome {
    /// The document was replaced.
    Committed,
    /// The persisted version moved on; nothing was written.
    ///
    /// `found` is the version observed by the store, when it knows it.
    Conflict { found: Option<u64> },
}

impl CasOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, CasOutcome::Committed)
    }
}

//! # Core Domain Entities
//!
//! The two JSON documents kept in the shared store:
//!
//! - **`LotteryState`**: drawn numbers, participant records, commit version
//! - **`LotteryConfig`**: pool size and the persisted lock flag

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::InvariantViolation;

/// A number handed out by the lottery (1-based).
pub type DrawNumber = u32;

/// Pool size used when no configuration document exists.
pub const DEFAULT_TOTAL_NUMBERS: u32 = 23;

/// Smallest accepted pool size.
pub const MIN_TOTAL_NUMBERS: u32 = 1;

/// Largest accepted pool size.
pub const MAX_TOTAL_NUMBERS: u32 = 100;

/// Version carried by a fresh (or freshly reset) state document.
pub const INITIAL_VERSION: u64 = 1;

/// JSON field holding the commit version. Conditional writes compare on it.
pub const VERSION_FIELD: &str = "version";

fn initial_version() -> u64 {
    INITIAL_VERSION
}

/// One participant's draw record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Class (or person) that drew the number. Older documents call it `classNumber`.
    #[serde(alias = "classNumber")]
    pub class_identifier: String,
    /// The number assigned.
    pub number: DrawNumber,
    /// When the draw was committed.
    pub timestamp: DateTime<Utc>,
}

/// Shared lottery state document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotteryState {
    /// Numbers issued in this epoch, in commit order.
    #[serde(default)]
    pub drawn_numbers: Vec<DrawNumber>,
    /// Participant records, parallel to `drawn_numbers`.
    #[serde(default)]
    pub participants: Vec<Participant>,
    /// Commit counter; bumped once per successful draw.
    #[serde(default = "initial_version")]
    pub version: u64,
    /// Timestamp of the last successful commit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<DateTime<Utc>>,
}

impl Default for LotteryState {
    fn default() -> Self {
        Self::initial()
    }
}

impl LotteryState {
    /// Empty state at version 1.
    pub fn initial() -> Self {
        Self {
            drawn_numbers: Vec::new(),
            participants: Vec::new(),
            version: INITIAL_VERSION,
            last_update: None,
        }
    }

    /// Stamp the document with a commit time.
    pub fn with_last_update(mut self, at: DateTime<Utc>) -> Self {
        self.last_update = Some(at);
        self
    }

    /// Number of draws committed in this epoch.
    pub fn drawn_count(&self) -> usize {
        self.drawn_numbers.len()
    }

    /// True once any participant has drawn. Drives the config lock.
    pub fn has_started(&self) -> bool {
        !self.participants.is_empty()
    }

    /// Candidate successor: one more participant, version bumped by one.
    ///
    /// `self` is left untouched so a rejected commit never leaks partial state.
    pub fn with_draw(
        &self,
        class_identifier: &str,
        number: DrawNumber,
        at: DateTime<Utc>,
    ) -> Self {
        let mut next = self.clone();
        next.drawn_numbers.push(number);
        next.participants.push(Participant {
            class_identifier: class_identifier.to_string(),
            number,
            timestamp: at,
        });
        next.version = self.version + 1;
        next.last_update = Some(at);
        next
    }

    /// Check the data model invariants against a pool of `total` numbers.
    pub fn check_invariants(&self, total: u32) -> Result<(), InvariantViolation> {
        if self.drawn_numbers.len() != self.participants.len() {
            return Err(InvariantViolation::LengthMismatch {
                drawn: self.drawn_numbers.len(),
                participants: self.participants.len(),
            });
        }

        let mut seen = HashSet::with_capacity(self.drawn_numbers.len());
        for (index, (&drawn, participant)) in self
            .drawn_numbers
            .iter()
            .zip(self.participants.iter())
            .enumerate()
        {
            if drawn == 0 || drawn > total {
                return Err(InvariantViolation::OutOfRange {
                    number: drawn,
                    total,
                });
            }
            if !seen.insert(drawn) {
                return Err(InvariantViolation::DuplicateNumber(drawn));
            }
            if participant.number != drawn {
                return Err(InvariantViolation::OrderMismatch {
                    index,
                    participant: participant.number,
                    drawn,
                });
            }
        }

        Ok(())
    }

    /// Read the commit version out of a raw document.
    ///
    /// Absent documents and documents without the field count as version 1.
    pub fn version_of(document: Option<&serde_json::Value>) -> u64 {
        document
            .and_then(|doc| doc.get(VERSION_FIELD))
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(INITIAL_VERSION)
    }
}

/// Shared lottery configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LotteryConfig {
    /// Size of the pool; numbers are drawn from `1..=total_numbers`.
    pub total_numbers: u32,
    /// Persisted lock flag. The effective lock also considers the state.
    pub is_locked: bool,
    /// Last time the document was written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update: Option<DateTime<Utc>>,
}

impl Default for LotteryConfig {
    fn default() -> Self {
        Self {
            total_numbers: DEFAULT_TOTAL_NUMBERS,
            is_locked: false,
            last_update: None,
        }
    }
}

impl LotteryConfig {
    /// Unlocked config for a given pool size.
    pub fn unlocked(total_numbers: u32) -> Self {
        Self {
            total_numbers,
            is_locked: false,
            last_update: None,
        }
    }

    /// Whether `total` is an acceptable pool size.
    pub fn is_valid_total(total: i64) -> bool {
        (i64::from(MIN_TOTAL_NUMBERS)..=i64::from(MAX_TOTAL_NUMBERS)).contains(&total)
    }
}

//! Available-number computation.

use std::collections::HashSet;

use shared_types::DrawNumber;

/// Numbers in `1..=total` not yet drawn, ascending.
pub fn available_numbers(total: u32, drawn: &[DrawNumber]) -> Vec<DrawNumber> {
    let taken: HashSet<DrawNumber> = drawn.iter().copied().collect();
    (1..=total).filter(|n| !taken.contains(n)).collect()
}

//! Score to result tier mapping.

use crate::domain::Tier;

/// Pick the result tier for a correct-answer count.
///
/// | score | tier |
/// |---|---|
/// | 0..=5 | `Tier1` |
/// | 6..=10 | `Tier2` |
/// | 11..=15 | `Tier3` |
/// | 16.. | `Tier4` |
///
/// The upper bound (question count) is not checked here.
pub fn result_tier(score: usize) -> Tier {
  match score {
    0..=5 => Tier::Tier1,
    6..=10 => Tier::Tier2,
    11..=15 => Tier::Tier3,
    _ => Tier::Tier4,
  }
}

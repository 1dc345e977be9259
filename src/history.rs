//! Statistics gathered over a trace replay

use crate::memory::cache::CachePolicy;
use crate::memory::{AccessOutcome, AccessType};

/// History of a simulation run.
/// Counters only grow; nothing is reset mid-run.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct CacheHistory {
    pub instructions: u64,
    pub cycles: u64,
    pub memory_accesses: u64,
    pub dirty_evictions: u64,

    pub load_hits: u64,
    pub store_hits: u64,
    pub load_misses: u64,
    pub store_misses: u64,
}

impl CacheHistory {
    /// Fold one access into the counters
    pub fn record(
        &mut self,
        policy: &CachePolicy,
        access_type: AccessType,
        instruction_count: u64,
        outcome: AccessOutcome,
    ) {
        self.cycles += instruction_count;
        self.instructions += instruction_count;
        self.memory_accesses += 1;

        match (access_type, outcome.hit) {
            (AccessType::Load, true) => self.load_hits += 1,
            (AccessType::Store, true) => self.store_hits += 1,
            (AccessType::Load, false) => self.load_misses += 1,
            (AccessType::Store, false) => self.store_misses += 1,
        }

        if !outcome.hit {
            self.cycles += policy.miss_penalty;
        }

        if outcome.dirty_writeback {
            self.cycles += policy.dirty_writeback_penalty;
            self.dirty_evictions += 1;
        }
    }

    pub fn misses(&self) -> u64 {
        self.load_misses + self.store_misses
    }

    pub fn loads(&self) -> u64 {
        self.load_hits + self.load_misses
    }

    /// Misses over all accesses, `None` without accesses
    pub fn get_miss_rate(&self) -> Option<f64> {
        ratio(self.misses(), self.memory_accesses)
    }

    /// Misses among loads only
    pub fn get_read_miss_rate(&self) -> Option<f64> {
        ratio(self.load_misses, self.loads())
    }

    pub fn get_cpi(&self) -> Option<f64> {
        ratio(self.cycles, self.instructions)
    }
}

fn ratio(numerator: u64, denominator: u64) -> Option<f64> {
    if denominator == 0 {
        None
    } else {
        Some(numerator as f64 / denominator as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HIT: AccessOutcome = AccessOutcome { hit: true, dirty_writeback: false };
    const MISS: AccessOutcome = AccessOutcome { hit: false, dirty_writeback: false };
    const DIRTY_MISS: AccessOutcome =
        AccessOutcome { hit: false, dirty_writeback: true };

    #[test]
    fn test_record() {
        let policy = CachePolicy::default();
        let mut history = CacheHistory::default();

        history.record(&policy, AccessType::Load, 1, MISS);
        assert_eq!(history.cycles, 31);
        assert_eq!(history.load_misses, 1);

        history.record(&policy, AccessType::Load, 1, HIT);
        assert_eq!(history.cycles, 32);
        assert_eq!(history.load_hits, 1);

        history.record(&policy, AccessType::Store, 4, DIRTY_MISS);
        assert_eq!(history.cycles, 32 + 4 + 30 + 2);
        assert_eq!(history.store_misses, 1);
        assert_eq!(history.dirty_evictions, 1);

        history.record(&policy, AccessType::Store, 0, HIT);
        assert_eq!(history.store_hits, 1);

        assert_eq!(history.memory_accesses, 4);
        assert_eq!(history.instructions, 6);
        assert_eq!(history.misses(), 2);
        assert_eq!(history.loads(), 2);
    }

    #[test]
    fn test_rates() {
        let policy = CachePolicy::make(64, 32, 1, 10, 2);
        let mut history = CacheHistory::default();
        history.record(&policy, AccessType::Load, 2, MISS);
        history.record(&policy, AccessType::Load, 2, HIT);
        history.record(&policy, AccessType::Store, 2, MISS);
        history.record(&policy, AccessType::Store, 2, HIT);

        assert_eq!(history.get_miss_rate(), Some(0.5));
        assert_eq!(history.get_read_miss_rate(), Some(0.5));
        assert_eq!(history.get_cpi(), Some((8.0 + 20.0) / 8.0));
    }

    #[test]
    fn test_degenerate_rates() {
        let history = CacheHistory::default();
        assert_eq!(history.get_miss_rate(), None);
        assert_eq!(history.get_read_miss_rate(), None);
        assert_eq!(history.get_cpi(), None);

        // Stores only, and no instructions counted
        let mut history = CacheHistory::default();
        history.record(&CachePolicy::default(), AccessType::Store, 0, MISS);
        assert_eq!(history.get_miss_rate(), Some(1.0));
        assert_eq!(history.get_read_miss_rate(), None);
        assert_eq!(history.get_cpi(), None);
    }
}

//! Memory structure

pub mod cache;

use cache::CachePolicy;

/// Interface of a storage model driven by a memory trace
pub trait StorageInterface {
    /// Perform one access and report whether it hit
    /// and whether a dirty line had to be written back
    fn access(&mut self, access_type: AccessType, address: u64)
        -> AccessOutcome;

    /// The policy the model was built from
    fn policy(&self) -> &CachePolicy;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessType {
    Load,
    Store,
}

impl AccessType {
    /// Trace encoding: `0` is a load, anything else a store
    pub fn from_code(code: i64) -> Self {
        if code == 0 {
            AccessType::Load
        } else {
            AccessType::Store
        }
    }

    pub fn is_store(self) -> bool {
        self == AccessType::Store
    }
}

/// Result of a single cache access
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccessOutcome {
    pub hit: bool,
    pub dirty_writeback: bool,
}

/// How the set index is masked out of an address
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IndexMask {
    /// `num_sets - 1`, the set the address really belongs to
    #[default]
    Sets,
    /// `num_blocks - 1`, as the legacy cachesim tool computes it.
    /// Only equivalent to `Sets` for direct-mapped caches.
    Blocks,
}

/// How the recency counters of a set age after an access
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Aging {
    /// Every valid slot more recent than the accessed one ages by one
    #[default]
    PerSlot,
    /// Only the first slot of the window ages
    Fixed,
}

/// Switches that select between the LRU model and
/// a reproduction of the legacy cachesim tool's numbers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Quirks {
    pub index_mask: IndexMask,
    pub aging: Aging,
}

impl Quirks {
    /// Reproduce the legacy cachesim tool bit for bit
    pub fn legacy() -> Self {
        Self { index_mask: IndexMask::Blocks, aging: Aging::Fixed }
    }

    pub fn is_legacy(&self) -> bool {
        *self == Self::legacy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_type_from_code() {
        assert_eq!(AccessType::from_code(0), AccessType::Load);
        assert_eq!(AccessType::from_code(1), AccessType::Store);
        assert_eq!(AccessType::from_code(7), AccessType::Store);
        assert_eq!(AccessType::from_code(-1), AccessType::Store);
    }

    #[test]
    fn test_quirks() {
        assert!(!Quirks::default().is_legacy());
        assert!(Quirks::legacy().is_legacy());
        let mixed = Quirks { index_mask: IndexMask::Blocks, ..Default::default() };
        assert!(!mixed.is_legacy());
    }
}

//! Cache implementation

use log::{debug, info, trace, warn};

use super::{AccessOutcome, AccessType, Aging, IndexMask, Quirks};
use super::StorageInterface;
use crate::error::ConfigError;

/// Floor of log2, `0` for `0`
pub fn get_log_2(value: usize) -> usize {
    value.checked_ilog2().unwrap_or(0) as usize
}

pub fn is_pow_2(value: usize) -> bool {
    value != 0 && value & (value - 1) == 0
}

/// Largest slot array a cache may allocate
pub const MAX_BLOCKS: usize = 1 << 24;

pub fn get_mask(bits: usize) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1 << bits) - 1
    }
}

/// Cache configuration, fixed for the lifetime of a run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CachePolicy {
    /// Total size in KB
    pub cache_size_kb: usize,
    /// Block size in bytes
    pub block_size: usize,
    /// Lines per set
    pub associativity: usize,

    pub miss_penalty: u64,
    pub dirty_writeback_penalty: u64,

    pub quirks: Quirks,
}

impl Default for CachePolicy {
    /// 64 KB direct-mapped cache with 32 byte blocks
    fn default() -> Self {
        Self::make(64, 32, 1, 30, 2)
    }
}

impl CachePolicy {
    pub fn make(
        cache_size_kb: usize,
        block_size: usize,
        associativity: usize,
        miss_penalty: u64,
        dirty_writeback_penalty: u64,
    ) -> Self {
        Self {
            cache_size_kb,
            block_size,
            associativity,
            miss_penalty,
            dirty_writeback_penalty,
            quirks: Quirks::default(),
        }
    }

    pub fn with_quirks(mut self, quirks: Quirks) -> Self {
        self.quirks = quirks;
        self
    }

    /// Total number of line slots, saturating on absurd sizes
    pub fn block_num(&self) -> usize {
        match self.block_size {
            0 => 0,
            block_size => self.cache_size_kb.saturating_mul(1024) / block_size,
        }
    }

    pub fn set_num(&self) -> usize {
        match self.associativity {
            0 => 0,
            associativity => self.block_num() / associativity,
        }
    }

    /// Rejects configurations the geometry cannot be derived from.
    ///
    /// The bit-shift decomposition assumes power-of-two block size,
    /// block count and set count. Violations are logged, not rejected.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.associativity == 0 {
            return Err(ConfigError::ZeroAssociativity);
        }
        if self.block_size == 0 {
            return Err(ConfigError::ZeroBlockSize);
        }
        if self.cache_size_kb == 0 {
            return Err(ConfigError::ZeroCacheSize);
        }
        if self.cache_size_kb.checked_mul(1024).is_none()
            || self.block_num() > MAX_BLOCKS
        {
            return Err(ConfigError::TooLarge {
                cache_size_kb: self.cache_size_kb,
                max_blocks: MAX_BLOCKS,
            });
        }
        if self.set_num() == 0 {
            return Err(ConfigError::TooFewBlocks {
                blocks: self.block_num(),
                associativity: self.associativity,
            });
        }

        for (name, value) in [
            ("block size", self.block_size),
            ("block count", self.block_num()),
            ("set count", self.set_num()),
        ] {
            if !is_pow_2(value) {
                warn!(
                    "{} {} is not a power of two, set selection will be skewed",
                    name, value
                );
            }
        }
        Ok(())
    }
}

/// Slot state as seen from outside the cache
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotState {
    Empty,
    Clean,
    Dirty,
}

/// Metadata of one line slot. No data is stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Slot {
    pub tag: u64,
    pub valid: bool,
    pub dirty: bool,
    /// Recency rank inside the set, 1 is most recently used.
    /// The largest value is evicted first.
    pub priority: u32,
}

impl Slot {
    pub fn state(&self) -> SlotState {
        match (self.valid, self.dirty) {
            (false, _) => SlotState::Empty,
            (true, false) => SlotState::Clean,
            (true, true) => SlotState::Dirty,
        }
    }
}

/// Set-associative cache model
#[derive(Debug)]
pub struct Cache {
    policy: CachePolicy,

    offset_bits: usize,
    index_bits: usize,
    index_mask: u64,

    slots: Vec<Slot>,
}

// Addresses look like this:
// | tag | index | offset |
impl Cache {
    pub fn make(policy: CachePolicy) -> Result<Self, ConfigError> {
        policy.validate()?;

        let block_num = policy.block_num();
        let offset_bits = get_log_2(policy.block_size);
        let index_bits = get_log_2(policy.set_num());
        let index_mask = match policy.quirks.index_mask {
            IndexMask::Sets => policy.set_num() as u64 - 1,
            IndexMask::Blocks => block_num as u64 - 1,
        };

        if policy.quirks.is_legacy() {
            info!("legacy cachesim compatibility enabled");
        }
        debug!(
            "cache geometry: {} blocks, {} sets, offset bits {}, index bits {}, tag shift {}, quirks {:?}",
            block_num,
            policy.set_num(),
            offset_bits,
            index_bits,
            offset_bits + index_bits,
            policy.quirks
        );

        Ok(Self {
            policy,
            offset_bits,
            index_bits,
            index_mask,
            slots: vec![Slot::default(); block_num],
        })
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn tag_shift(&self) -> usize {
        self.offset_bits + self.index_bits
    }

    /// The legacy cachesim tool keeps addresses in 32 bits
    fn effective_address(&self, address: u64) -> u64 {
        if self.policy.quirks.index_mask == IndexMask::Blocks {
            address & get_mask(32)
        } else {
            address
        }
    }

    pub fn get_index(&self, address: u64) -> usize {
        let address = self.effective_address(address);
        ((address >> self.offset_bits) & self.index_mask) as usize
    }

    pub fn get_tag(&self, address: u64) -> u64 {
        let address = self.effective_address(address);
        address.checked_shr(self.tag_shift() as u32).unwrap_or(0)
    }

    /// First slot of the window an index maps to
    fn window_base(&self, index: usize) -> usize {
        match self.policy.quirks.index_mask {
            IndexMask::Sets => index * self.policy.associativity,
            IndexMask::Blocks => index,
        }
    }

    /// Slot numbers an address may live in, in scan order.
    /// Wraps at the end of the slot array, which only
    /// happens when the index is masked by the block count.
    fn window(&self, index: usize) -> impl Iterator<Item = usize> {
        let base = self.window_base(index);
        let len = self.slots.len();
        (0..self.policy.associativity).map(move |k| (base + k) % len)
    }

    pub fn window_of(&self, address: u64) -> Vec<usize> {
        self.window(self.get_index(address)).collect()
    }

    pub fn lookup(&self, address: u64) -> Option<usize> {
        let tag = self.get_tag(address);
        self.window(self.get_index(address)).find(|&i| {
            let slot = &self.slots[i];
            slot.valid && slot.tag == tag
        })
    }

    pub fn is_in_cache(&self, address: u64) -> bool {
        self.lookup(address).is_some()
    }

    /// The slot with the highest priority, first one on ties
    fn get_index_to_replace(&self, index: usize) -> usize {
        let mut result = self.window_base(index);
        let mut max_priority = self.slots[result].priority;
        for i in self.window(index) {
            if self.slots[i].priority > max_priority {
                max_priority = self.slots[i].priority;
                result = i;
            }
        }
        result
    }

    fn update_priority(&mut self, index: usize, target: usize, was_empty: bool) {
        match self.policy.quirks.aging {
            Aging::PerSlot => {
                // A freshly filled slot is older than everything in the set
                let pivot = if was_empty {
                    u32::MAX
                } else {
                    self.slots[target].priority
                };
                for i in self.window(index) {
                    let slot = &mut self.slots[i];
                    if i != target && slot.valid && slot.priority < pivot {
                        slot.priority += 1;
                    }
                }
            }
            Aging::Fixed => {
                let base = self.window_base(index);
                for _ in 0..self.policy.associativity {
                    if self.slots[base].priority < self.slots[target].priority {
                        self.slots[base].priority += 1;
                    }
                }
            }
        }
        self.slots[target].priority = 1;
    }

    /// Access the cache, filling or replacing a line on a miss
    pub fn access(
        &mut self,
        access_type: AccessType,
        address: u64,
    ) -> AccessOutcome {
        let index = self.get_index(address);
        let tag = self.get_tag(address);
        let fill_last = self.policy.quirks.index_mask == IndexMask::Blocks;

        let mut invalid_slot: Option<usize> = None;
        let mut hit_slot: Option<usize> = None;
        for i in self.window(index) {
            let slot = &self.slots[i];
            if !slot.valid {
                if fill_last || invalid_slot.is_none() {
                    invalid_slot = Some(i);
                }
                continue;
            }
            if slot.tag == tag {
                hit_slot = Some(i);
                break;
            }
        }

        let mut outcome = AccessOutcome::default();
        let mut was_empty = false;
        let target = match (hit_slot, invalid_slot) {
            (Some(i), _) => {
                outcome.hit = true;
                self.slots[i].dirty |= access_type.is_store();
                i
            }
            (None, Some(i)) => {
                was_empty = true;
                i
            }
            (None, None) => {
                let victim = self.get_index_to_replace(index);
                outcome.dirty_writeback = self.slots[victim].dirty;
                victim
            }
        };

        if !outcome.hit {
            let slot = &mut self.slots[target];
            slot.valid = true;
            slot.dirty = access_type.is_store();
            slot.tag = tag;
        }

        self.update_priority(index, target, was_empty);

        trace!(
            "{:?} {:#x}: index {} tag {:#x} slot {} -> {:?}",
            access_type,
            address,
            index,
            tag,
            target,
            outcome
        );

        outcome
    }
}

impl StorageInterface for Cache {
    fn access(
        &mut self,
        access_type: AccessType,
        address: u64,
    ) -> AccessOutcome {
        Cache::access(self, access_type, address)
    }

    fn policy(&self) -> &CachePolicy {
        &self.policy
    }
}

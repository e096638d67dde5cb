use std::ops::Range;
use log::trace;
use crate::address::AddressDecoder;
use crate::config::CacheConfig;
use crate::error::{Error, Result};
use crate::replacement_policies::{LeastRecentlyUsed, ReplacementPolicy};
use crate::stats::Outcome;
use crate::trace::{AccessKind, AccessRecord};

/// A single cache line. Only the metadata is modelled, there is no data
///
/// Lines are read-only outside the crate. Ranks only ever change through
/// [`ReplacementPolicy::touch`], which keeps them a permutation within each set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    pub(crate) valid: bool,
    pub(crate) tag: u64,
    pub(crate) rank: usize,
}

impl Line {
    /// Whether the line holds a block
    pub fn valid(&self) -> bool {
        self.valid
    }

    /// The tag of the block held by the line. Meaningless if the line isn't valid
    pub fn tag(&self) -> u64 {
        self.tag
    }

    /// The recency rank of the line within its set, 0 being the most recently used
    pub fn rank(&self) -> usize {
        self.rank
    }
}

/// A set-associative cache, parameterised by a replacement policy
///
/// All `num_sets * associativity` lines live in one contiguous allocation, set by set, so a set
/// is a slice and a line is addressed by its set index and its slot within that set
///
/// Set indices must come from the cache's own [`AddressDecoder`] (or otherwise be below the
/// number of sets) and slots must be below the associativity. Anything else is a bug in the
/// caller, and panics on an explicit range check rather than touching another set's lines
#[derive(Debug)]
pub struct Cache<R: ReplacementPolicy = LeastRecentlyUsed> {
    decoder: AddressDecoder,
    associativity: usize,
    lines: Vec<Line>,
    replacement_policy: R,
}

impl Cache<LeastRecentlyUsed> {
    /// Creates an empty LRU cache for a configuration
    pub fn lru(config: &CacheConfig) -> Result<Self> {
        Self::new(config, LeastRecentlyUsed)
    }
}

impl<R: ReplacementPolicy> Cache<R> {
    /// Creates an empty cache for a configuration
    ///
    /// Every line starts invalid, and the ranks of each set are seeded to `0..associativity` so
    /// the permutation holds before the first access
    ///
    /// # Arguments
    ///
    /// * `config`: The cache geometry, validated here
    /// * `policy`: The replacement policy
    ///
    /// returns: Result<Cache<R>, Error>
    pub fn new(config: &CacheConfig, policy: R) -> Result<Self> {
        config.validate()?;
        let line_count = config.line_count();
        let mut lines = Vec::new();
        // Huge geometries pass validation but can't be allocated, report them rather than abort
        lines.try_reserve_exact(line_count).map_err(|e| {
            Error::InvalidConfiguration(format!("couldn't allocate {line_count} cache lines: {e}"))
        })?;
        lines.extend((0..line_count).map(|slot| Line {
            valid: false,
            tag: 0,
            rank: slot % config.associativity,
        }));
        Ok(Self {
            decoder: AddressDecoder::new(config),
            associativity: config.associativity,
            lines,
            replacement_policy: policy,
        })
    }

    fn set_bounds(&self, set_index: u64) -> Range<usize> {
        assert!(
            set_index < self.num_sets() as u64,
            "set index {set_index} out of range for {} sets",
            self.num_sets()
        );
        let lower_bound = set_index as usize * self.associativity;
        lower_bound..lower_bound + self.associativity
    }

    /// The decoder used to split addresses for this cache
    pub fn decoder(&self) -> &AddressDecoder {
        &self.decoder
    }

    /// The number of lines per set
    pub fn associativity(&self) -> usize {
        self.associativity
    }

    /// The number of sets
    pub fn num_sets(&self) -> usize {
        self.lines.len() / self.associativity
    }

    /// Every line of the cache, set by set
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// The lines of one set, in slot order
    pub fn set(&self, set_index: u64) -> &[Line] {
        &self.lines[self.set_bounds(set_index)]
    }

    /// Finds the slot of the valid line holding `tag` in a set, if there is one
    pub fn lookup(&self, set_index: u64, tag: u64) -> Option<usize> {
        self.set(set_index).iter().position(|line| line.valid && line.tag == tag)
    }

    /// Marks a line as the most recently used in its set
    pub fn touch(&mut self, set_index: u64, slot: usize) {
        let bounds = self.set_bounds(set_index);
        self.replacement_policy.touch(&mut self.lines[bounds], slot);
    }

    /// The slot of the line to replace on a miss in a set
    pub fn find_lru(&self, set_index: u64) -> usize {
        self.replacement_policy.victim(self.set(set_index))
    }

    /// Loads a block into a line. Recency is untouched, callers follow this with [`Cache::touch`]
    pub fn install(&mut self, set_index: u64, slot: usize, tag: u64) {
        let bounds = self.set_bounds(set_index);
        let line = &mut self.lines[bounds][slot];
        line.valid = true;
        line.tag = tag;
    }

    /// Applies one access to the cache and reports what happened
    ///
    /// A load or store is a single lookup: a hit refreshes the line, a miss replaces the least
    /// recently used line of the set (evicting it if it was valid). A modify is a load followed
    /// by a store to the same address, and the store always hits the line the load just
    /// refreshed or installed, so it only adds a hit
    ///
    /// # Arguments
    ///
    /// * `record`: The access
    ///
    /// returns: Outcome
    pub fn process(&mut self, record: &AccessRecord) -> Outcome {
        let tag = self.decoder.tag(record.address);
        let set_index = self.decoder.set_index(record.address);
        let mut outcome = match self.lookup(set_index, tag) {
            Some(slot) => {
                self.touch(set_index, slot);
                Outcome {
                    hits: 1,
                    missed: false,
                    evicted: false,
                }
            }
            None => {
                let victim = self.find_lru(set_index);
                let evicted = self.set(set_index)[victim].valid;
                self.install(set_index, victim, tag);
                self.touch(set_index, victim);
                Outcome {
                    hits: 0,
                    missed: true,
                    evicted,
                }
            }
        };
        if record.kind == AccessKind::Modify {
            outcome.hits += 1;
        }
        trace!("{record} -> set {set_index:#x}, tag {tag:#x}: {outcome}");
        outcome
    }

    /// Gets the number of lines which have never been filled. Useful for analysing cache
    /// performance or debugging
    pub fn invalid_line_count(&self) -> usize {
        self.lines.iter().filter(|line| !line.valid).count()
    }
}

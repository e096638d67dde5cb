use crate::cache::Line;

/// A generic trait for recency tracking. Can be used to parameterise a Cache.
///
/// Implementations work on the lines of a single set, the cache is responsible for slicing out
/// the right set. Every line carries a rank, and the ranks of a set must always be a permutation
/// of `0..set.len()`: the cache seeds them that way, and implementations must keep it that way
pub trait ReplacementPolicy {
    /// Records that the line at `slot` was just used
    ///
    /// # Arguments
    ///
    /// * `set`: The lines of the set containing the used line
    /// * `slot`: The position of the used line within the set
    ///
    /// returns: ()
    fn touch(&mut self, set: &mut [Line], slot: usize);

    /// Picks the line to be replaced on a miss
    ///
    /// Implementations should not assume the victim is valid, cold sets are filled through this
    /// too
    ///
    /// # Arguments
    ///
    /// * `set`: The lines of the set which missed
    ///
    /// returns: usize, the slot of the victim within the set
    fn victim(&self, set: &[Line]) -> usize;
}

/// Least Recently Used replacement policy
///
/// Rather than timestamps, each line keeps its position in the recency order of its set: rank 0 is
/// the most recently used line and rank E-1 the least recently used. Touching a line moves it to
/// the front and shifts only the lines which were more recent than it back by one, so the ranks
/// stay a permutation after every access
#[derive(Debug, Default, Copy, Clone)]
pub struct LeastRecentlyUsed;

impl ReplacementPolicy for LeastRecentlyUsed {
    fn touch(&mut self, set: &mut [Line], slot: usize) {
        let touched_rank = set[slot].rank;
        // Already the most recent, re-touching changes nothing
        if touched_rank == 0 {
            return;
        }
        for line in set.iter_mut() {
            if line.rank < touched_rank {
                line.rank += 1;
            }
        }
        set[slot].rank = 0;
    }

    fn victim(&self, set: &[Line]) -> usize {
        let least_recent = set.len() - 1;
        set.iter()
            .position(|line| line.rank == least_recent)
            .expect("the ranks of a set are always a permutation of 0..associativity")
    }
}

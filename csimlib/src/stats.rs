use std::fmt;
use serde::{Deserialize, Serialize};

/// What a single access did to the cache
///
/// `hits` is at most 2, a modify that hits counts once for its load and once for its store
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub hits: u8,
    pub missed: bool,
    pub evicted: bool,
}

impl fmt::Display for Outcome {
    /// Formats as the space separated events, `miss eviction hit` for example
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut events = Vec::with_capacity(4);
        if self.missed {
            events.push("miss");
        }
        if self.evicted {
            events.push("eviction");
        }
        for _ in 0..self.hits {
            events.push("hit");
        }
        write!(f, "{}", events.join(" "))
    }
}

/// Running totals for one simulation run. Can be serialised to JSON
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl Stats {
    /// Adds the events of one access to the totals
    pub fn accumulate(&mut self, outcome: &Outcome) {
        if outcome.missed {
            self.misses += 1;
        }
        if outcome.evicted {
            self.evictions += 1;
        }
        self.hits += outcome.hits as u64;
    }
}

impl<'a> Extend<&'a Outcome> for Stats {
    fn extend<T: IntoIterator<Item = &'a Outcome>>(&mut self, outcomes: T) {
        outcomes.into_iter().for_each(|outcome| self.accumulate(outcome));
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hits:{} misses:{} evictions:{}", self.hits, self.misses, self.evictions)
    }
}

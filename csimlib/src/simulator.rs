use std::io::BufRead;
use std::time::{Duration, Instant};
use log::debug;
use crate::cache::Cache;
use crate::config::CacheConfig;
use crate::error::Result;
use crate::stats::{Outcome, Stats};
use crate::trace::{AccessRecord, Trace};

/// The simulator owns the cache and the running totals for a run, and feeds trace records through
/// the cache one at a time.
///
/// It supports calling simulate multiple times, and will update the time taken to simulate and the
/// results accordingly
#[derive(Debug)]
pub struct Simulator {
    cache: Cache,
    stats: Stats,
    simulation_time: Duration,
}

impl Simulator {

    /// Creates a new simulator with an empty cache
    ///
    /// # Arguments
    ///
    /// * `config`: The cache geometry
    ///
    /// returns: Result<Simulator, Error>
    pub fn new(config: &CacheConfig) -> Result<Self> {
        let cache = Cache::lru(config)?;
        debug!(
            "Created a cache with {} sets of {} lines, {} byte blocks",
            cache.num_sets(),
            cache.associativity(),
            config.block_size()
        );
        Ok(Self {
            cache,
            stats: Stats::default(),
            simulation_time: Duration::new(0, 0),
        })
    }

    /// Applies a single access and adds its outcome to the totals
    pub fn access(&mut self, record: &AccessRecord) -> Outcome {
        let outcome = self.cache.process(record);
        self.stats.accumulate(&outcome);
        outcome
    }

    /// Replays every record of a trace
    ///
    /// # Arguments
    ///
    /// * `source`: The trace lines
    ///
    /// returns: Result<&Stats, Error>
    pub fn simulate<S: BufRead>(&mut self, source: S) -> Result<&Stats> {
        self.simulate_with(source, |_, _, _| {})
    }

    /// Replays every record of a trace, calling `observer` after each access with the record, its
    /// outcome, and the cache as it is after the access
    ///
    /// This is what per-access reporting hooks into. Stops at the first malformed record or read
    /// failure; the totals then include only the records before it, and shouldn't be reported
    ///
    /// # Arguments
    ///
    /// * `source`: The trace lines
    /// * `observer`: Called once per access
    ///
    /// returns: Result<&Stats, Error>
    pub fn simulate_with<S, F>(&mut self, source: S, mut observer: F) -> Result<&Stats>
    where
        S: BufRead,
        F: FnMut(&AccessRecord, &Outcome, &Cache),
    {
        let start = Instant::now();
        let result: Result<()> = Trace::new(source).try_for_each(|record| {
            let record = record?;
            let outcome = self.access(&record);
            observer(&record, &outcome, &self.cache);
            Ok(())
        });
        self.simulation_time += start.elapsed();
        result?;
        debug!("Finished replaying the trace: {}", self.stats);
        Ok(&self.stats)
    }

    /// The totals so far
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// The cache, for inspecting line state
    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Gets the wall-clock execution time for processing
    pub fn get_execution_time(&self) -> &Duration {
        &self.simulation_time
    }
}

/// Replays a trace against a fresh cache, returning the totals only if the whole trace was valid
///
/// # Examples
///
/// ```
/// use csimlib::config::CacheConfig;
/// use csimlib::simulator::run;
/// let config = CacheConfig::new(0, 2, 0).unwrap();
/// let trace = " L 10,1\n L 20,1\n L 10,1\n L 30,1\n";
/// let stats = run(&config, trace.as_bytes()).unwrap();
/// assert_eq!((stats.hits, stats.misses, stats.evictions), (1, 3, 1));
/// ```
pub fn run<S: BufRead>(config: &CacheConfig, source: S) -> Result<Stats> {
    let mut simulator = Simulator::new(config)?;
    simulator.simulate(source).copied()
}

//! # CSimLib
//!
//! CSimLib replays a memory access trace against a set-associative cache with least recently
//! used eviction, and reports how many accesses hit, missed and evicted a line
//!
//! The cache is described by three numbers: the number of set index bits, the associativity, and
//! the number of block offset bits. Only tags, validity and recency are modelled, no data is ever
//! stored

/// Contains the address decoder, which splits addresses into a tag, set index and block offset
pub mod address;

/// Contains the cache model, its lines, and the access decision procedure
pub mod cache;

/// Contains the cache geometry, and a partial form which can be loaded from JSON
pub mod config;

/// Contains the error type shared by the whole library
pub mod error;

/// Contains helpers for opening trace files
pub mod io;

/// Contains the recency tracking used to pick eviction victims
pub mod replacement_policies;

/// Contains the simulator used to replay a trace against a cache
pub mod simulator;

/// Contains hit, miss and eviction accounting
pub mod stats;

/// Contains the access record model and the trace parser
pub mod trace;

/// Contains utilities for running fixture tests and benchmarks.
pub mod util;

#[cfg(test)]
mod test;

pub use error::{Error, RecordError, Result};

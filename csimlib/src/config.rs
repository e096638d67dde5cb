use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::error::{Error, Result};

/// The geometry of a cache, fixed for the whole run
///
/// The fields are public so configurations can be written literally or deserialised, but nothing
/// in the library trusts them before [`CacheConfig::validate`] has passed
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Number of set index bits (s), there are 2^s sets
    pub index_bits: u32,
    /// Number of lines per set (E)
    pub associativity: usize,
    /// Number of block offset bits (b), blocks are 2^b bytes
    pub offset_bits: u32,
}

impl CacheConfig {
    /// Creates and validates a configuration
    ///
    /// # Arguments
    ///
    /// * `index_bits`: s, the number of set index bits
    /// * `associativity`: E, the number of lines per set
    /// * `offset_bits`: b, the number of block offset bits
    ///
    /// returns: Result<CacheConfig, Error>
    ///
    /// # Examples
    ///
    /// ```
    /// use csimlib::config::CacheConfig;
    /// let config = CacheConfig::new(4, 2, 4).unwrap();
    /// assert_eq!(config.num_sets(), 16);
    /// assert_eq!(config.block_size(), 16);
    /// assert!(CacheConfig::new(4, 0, 4).is_err());
    /// ```
    pub fn new(index_bits: u32, associativity: usize, offset_bits: u32) -> Result<Self> {
        let config = Self {
            index_bits,
            associativity,
            offset_bits,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks that the geometry describes a cache which can actually be laid out in memory
    pub fn validate(&self) -> Result<()> {
        if self.associativity == 0 {
            return Err(Error::InvalidConfiguration("associativity must be at least 1".to_string()));
        }
        if self.offset_bits >= u64::BITS {
            return Err(Error::InvalidConfiguration(format!(
                "{} offset bits leave no room for a tag in a 64-bit address",
                self.offset_bits
            )));
        }
        match self.index_bits.checked_add(self.offset_bits) {
            Some(bits) if bits <= u64::BITS => {}
            _ => {
                return Err(Error::InvalidConfiguration(format!(
                    "{} index bits and {} offset bits don't fit in a 64-bit address",
                    self.index_bits, self.offset_bits
                )))
            }
        }
        if self.index_bits >= usize::BITS {
            return Err(Error::InvalidConfiguration(format!("2^{} sets can't be addressed", self.index_bits)));
        }
        if self.num_sets().checked_mul(self.associativity).is_none() {
            return Err(Error::InvalidConfiguration(format!(
                "2^{} sets of {} lines can't be addressed",
                self.index_bits, self.associativity
            )));
        }
        Ok(())
    }

    /// The number of sets, 2^s. Only meaningful for a validated configuration
    pub fn num_sets(&self) -> usize {
        1 << self.index_bits
    }

    /// The block size in bytes, 2^b. Only meaningful for a validated configuration
    pub fn block_size(&self) -> u64 {
        1 << self.offset_bits
    }

    /// The total number of lines in the cache
    pub fn line_count(&self) -> usize {
        self.num_sets() * self.associativity
    }
}

/// A configuration that may still be missing parameters
///
/// This is what front ends collect: some parameters may come from a JSON file, others from the
/// command line. Once everything has been merged, [`PartialCacheConfig::build`] checks that
/// nothing is missing and validates the result
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialCacheConfig {
    #[serde(default, alias = "s")]
    pub index_bits: Option<u32>,
    #[serde(default, alias = "E")]
    pub associativity: Option<usize>,
    #[serde(default, alias = "b")]
    pub offset_bits: Option<u32>,
}

impl PartialCacheConfig {
    /// Reads a partial configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::InvalidConfiguration(format!(
            "couldn't open the config file at path {}: {e}",
            path.display()
        )))?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Overlays `other` on top of this configuration, values present in `other` win
    pub fn merge(self, other: PartialCacheConfig) -> Self {
        Self {
            index_bits: other.index_bits.or(self.index_bits),
            associativity: other.associativity.or(self.associativity),
            offset_bits: other.offset_bits.or(self.offset_bits),
        }
    }

    /// Produces a validated configuration, naming the first missing parameter otherwise
    pub fn build(self) -> Result<CacheConfig> {
        CacheConfig::new(
            self.index_bits.ok_or(Error::MissingParameter("s"))?,
            self.associativity.ok_or(Error::MissingParameter("E"))?,
            self.offset_bits.ok_or(Error::MissingParameter("b"))?,
        )
    }
}

use crate::config::CacheConfig;

/// Splits addresses into a tag, a set index and a block offset
///
/// The masks are computed once from the configuration, so decoding is a couple of shifts and
/// ands. Every function is total: the set index mask guarantees the result always names a valid
/// set, and shifts of a full 64 bits produce 0 rather than overflowing
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AddressDecoder {
    offset_bits: u32,
    tag_shift: u32,
    set_index_bit_mask: u64,
    block_offset_bit_mask: u64,
}

impl AddressDecoder {
    /// Creates a decoder for a validated configuration
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            offset_bits: config.offset_bits,
            tag_shift: config.offset_bits + config.index_bits,
            set_index_bit_mask: low_bit_mask(config.index_bits),
            block_offset_bit_mask: low_bit_mask(config.offset_bits),
        }
    }

    /// The high order bits above the set index
    pub fn tag(&self, address: u64) -> u64 {
        address.checked_shr(self.tag_shift).unwrap_or(0)
    }

    /// The bits between the block offset and the tag
    pub fn set_index(&self, address: u64) -> u64 {
        address.checked_shr(self.offset_bits).unwrap_or(0) & self.set_index_bit_mask
    }

    /// The low order bits within a block. Unused by the hit/miss logic, reported in diagnostics
    pub fn block_offset(&self, address: u64) -> u64 {
        address & self.block_offset_bit_mask
    }
}

fn low_bit_mask(bits: u32) -> u64 {
    if bits >= u64::BITS {
        u64::MAX
    } else {
        (1 << bits) - 1
    }
}

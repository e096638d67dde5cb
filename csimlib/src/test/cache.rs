use crate::address::AddressDecoder;
use crate::cache::Cache;
use crate::config::CacheConfig;
use crate::stats::Outcome;
use crate::trace::{AccessKind, AccessRecord};

fn load(address: u64) -> AccessRecord {
    AccessRecord { kind: AccessKind::Load, address, size: 1 }
}

fn modify(address: u64) -> AccessRecord {
    AccessRecord { kind: AccessKind::Modify, address, size: 1 }
}

fn ranks(cache: &Cache, set_index: u64) -> Vec<usize> {
    cache.set(set_index).iter().map(|line| line.rank()).collect()
}

#[test]
fn decoder_splits_addresses() {
    let decoder = AddressDecoder::new(&CacheConfig::new(4, 1, 4).unwrap());
    assert_eq!(decoder.tag(0x12345), 0x123);
    assert_eq!(decoder.set_index(0x12345), 0x4);
    assert_eq!(decoder.block_offset(0x12345), 0x5);
}

#[test]
fn decoder_handles_degenerate_widths() {
    let whole_address_is_offset = AddressDecoder::new(&CacheConfig::new(0, 1, 63).unwrap());
    assert_eq!(whole_address_is_offset.tag(u64::MAX), 1);
    assert_eq!(whole_address_is_offset.set_index(u64::MAX), 0);
    let no_tag = AddressDecoder::new(&CacheConfig::new(32, 1, 32).unwrap());
    assert_eq!(no_tag.tag(u64::MAX), 0);
    assert_eq!(no_tag.set_index(0xdead_beef_0000_0001), 0xdead_beef);
    assert_eq!(no_tag.block_offset(0xdead_beef_0000_0001), 1);
    let no_index = AddressDecoder::new(&CacheConfig::new(0, 4, 0).unwrap());
    assert_eq!(no_index.tag(0xff), 0xff);
    assert_eq!(no_index.set_index(0xff), 0);
    assert_eq!(no_index.block_offset(0xff), 0);
}

#[test]
fn new_cache_is_invalid_with_seeded_ranks() {
    let cache = Cache::lru(&CacheConfig::new(2, 3, 0).unwrap()).unwrap();
    assert_eq!(cache.num_sets(), 4);
    assert_eq!(cache.lines().len(), 12);
    assert_eq!(cache.invalid_line_count(), 12);
    for set_index in 0..4 {
        assert_eq!(ranks(&cache, set_index), vec![0, 1, 2]);
    }
    assert_eq!(cache.find_lru(0), 2);
}

#[test]
fn touch_shifts_only_more_recent_lines() {
    let mut cache = Cache::lru(&CacheConfig::new(0, 4, 0).unwrap()).unwrap();
    cache.touch(0, 2);
    assert_eq!(ranks(&cache, 0), vec![1, 2, 0, 3]);
    cache.touch(0, 1);
    assert_eq!(ranks(&cache, 0), vec![2, 0, 1, 3]);
    assert_eq!(cache.find_lru(0), 3);
}

#[test]
fn repeated_touch_is_a_no_op() {
    let mut cache = Cache::lru(&CacheConfig::new(0, 4, 0).unwrap()).unwrap();
    cache.touch(0, 3);
    let after_first = ranks(&cache, 0);
    cache.touch(0, 3);
    assert_eq!(ranks(&cache, 0), after_first);
}

#[test]
fn install_leaves_rank_alone() {
    let mut cache = Cache::lru(&CacheConfig::new(1, 2, 0).unwrap()).unwrap();
    cache.install(1, 1, 0x42);
    let line = cache.set(1)[1];
    assert!(line.valid());
    assert_eq!(line.tag(), 0x42);
    assert_eq!(line.rank(), 1);
    assert_eq!(cache.lookup(1, 0x42), Some(1));
    assert_eq!(cache.lookup(0, 0x42), None);
}

#[test]
fn lookup_ignores_invalid_lines() {
    let cache = Cache::lru(&CacheConfig::new(0, 2, 0).unwrap()).unwrap();
    // Every tag starts at 0, but nothing is valid yet
    assert_eq!(cache.lookup(0, 0), None);
}

#[test]
fn hits_on_full_set_never_evict() {
    let mut cache = Cache::lru(&CacheConfig::new(0, 4, 4).unwrap()).unwrap();
    for address in [0x000, 0x100, 0x200, 0x300] {
        assert!(!cache.process(&load(address)).evicted);
    }
    for address in [0x200, 0x000, 0x300, 0x100, 0x100] {
        let outcome = cache.process(&load(address));
        assert_eq!(outcome, Outcome { hits: 1, missed: false, evicted: false });
        let slot = cache.lookup(0, address >> 4).unwrap();
        assert_eq!(cache.set(0)[slot].rank(), 0);
    }
}

#[test]
fn direct_mapped_conflicts_always_evict() {
    let mut cache = Cache::lru(&CacheConfig::new(2, 1, 4).unwrap()).unwrap();
    assert!(!cache.process(&load(0x10)).evicted);
    // Same set, different tag
    let outcome = cache.process(&load(0x50));
    assert!(outcome.missed && outcome.evicted);
    let outcome = cache.process(&load(0x10));
    assert!(outcome.missed && outcome.evicted);
    // Different set, still cold
    let outcome = cache.process(&load(0x20));
    assert!(outcome.missed && !outcome.evicted);
}

#[test]
fn modify_counts_the_store_as_a_hit() {
    let mut cache = Cache::lru(&CacheConfig::new(0, 1, 0).unwrap()).unwrap();
    assert_eq!(cache.process(&modify(0x10)), Outcome { hits: 1, missed: true, evicted: false });
    assert_eq!(cache.process(&modify(0x10)), Outcome { hits: 2, missed: false, evicted: false });
    assert_eq!(cache.process(&modify(0x20)), Outcome { hits: 1, missed: true, evicted: true });
}

#[test]
fn size_does_not_affect_outcomes() {
    let mut small = Cache::lru(&CacheConfig::new(1, 2, 2).unwrap()).unwrap();
    let mut large = Cache::lru(&CacheConfig::new(1, 2, 2).unwrap()).unwrap();
    for address in [0x0, 0x4, 0x13, 0x8, 0x0, 0x24] {
        let a = small.process(&AccessRecord { kind: AccessKind::Store, address, size: 1 });
        let b = large.process(&AccessRecord { kind: AccessKind::Store, address, size: 512 });
        assert_eq!(a, b);
    }
}

#[test]
#[should_panic(expected = "out of range")]
fn out_of_range_set_index_panics() {
    let cache = Cache::lru(&CacheConfig::new(1, 2, 0).unwrap()).unwrap();
    // Would wrap around to set 0 without the range check
    cache.lookup(1 << 63, 0);
}

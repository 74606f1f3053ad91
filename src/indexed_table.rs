//! [`IndexedTable`]: a sorted key array paired with a small precomputed
//! prefix index.  The index maps the top `INDEX_BITS` bits of a key to the
//! slice of positions whose keys share that prefix, so a lookup binary
//! searches a short sub-slice instead of the whole array.

/// Number of key prefix bits the index discriminates on.  256 buckets keeps
/// the index in one cache line's worth of pages while cutting the binary
/// search down to a handful of probes.
pub const INDEX_BITS: u32 = 8;

/// A sorted key array with a `2^INDEX_BITS`-entry narrowing index.
///
/// Values live in a parallel array owned by the caller; lookups return
/// positions into the key array.
#[derive(Clone, Debug)]
pub struct IndexedTable<K: Copy + Ord + Into<u64>> {
    keys: Vec<K>,
    /// `index[b]` is the position of the first key whose top bits are `>= b`;
    /// `index[1 << INDEX_BITS]` is `keys.len()`.
    index: Vec<u32>,
    key_bits: u32,
}
impl<K: Copy + Ord + Into<u64>> IndexedTable<K> {
    /// Builds the index over `keys`, which must be sorted ascending and hold
    /// values of at most `key_bits` significant bits.
    ///
    /// # Panics
    /// Panics when `keys` is not sorted, exceeds `u32` positions, or a key
    /// does not fit `key_bits`.
    #[must_use]
    pub fn new(keys: Vec<K>, key_bits: u32) -> Self {
        assert!(key_bits >= INDEX_BITS && key_bits <= 64);
        assert!(u32::try_from(keys.len()).is_ok(), "table too large");
        assert!(keys.windows(2).all(|pair| pair[0] <= pair[1]), "keys not sorted");
        let shift = key_bits - INDEX_BITS;
        let buckets = 1_usize << INDEX_BITS;
        let mut index = Vec::with_capacity(buckets + 1);
        let mut position = 0_usize;
        for bucket in 0..buckets {
            while position < keys.len() && (keys[position].into() >> shift) < bucket as u64 {
                position += 1;
            }
            index.push(position as u32);
        }
        if key_bits < 64 {
            if let Some(&last) = keys.last() {
                assert!(last.into() >> key_bits == 0, "key does not fit key_bits");
            }
        }
        index.push(keys.len() as u32);
        Self {
            keys,
            index,
            key_bits,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[must_use]
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// The sub-range of positions whose keys could equal or precede `target`.
    #[must_use]
    pub fn candidate_range(&self, target: K) -> core::ops::Range<usize> {
        let bucket = (target.into() >> (self.key_bits - INDEX_BITS)) as usize;
        let start = self.index[bucket] as usize;
        let end = self.index[bucket + 1] as usize;
        start..end
    }

    /// Position of the last key `<= target`, or `None` when `target`
    /// precedes every key.
    #[must_use]
    pub fn position_of_last_le(&self, target: K) -> Option<usize> {
        let range = self.candidate_range(target);
        let within = self.keys[range.clone()].partition_point(|&key| key <= target);
        let position = range.start + within;
        // The bucket may be empty or start past target; fall back to the
        // tail of the previous buckets.
        if position == 0 { None } else { Some(position - 1) }
    }
}

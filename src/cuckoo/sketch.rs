// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt;
use std::hash::Hash;

use tracing::debug;
use tracing::trace;

use super::CuckooFilterBuilder;
use super::bucket::Bucket;
use super::bucket::BucketTable;
use super::bucket::Fingerprint;
use super::builder::validate_dimensions;
use super::serialization::FINGERPRINT_SIZE_BYTES;
use super::serialization::FLAGS_HAS_PARAMETERS;
use super::serialization::FLAGS_IS_EMPTY;
use super::serialization::FLAGS_KNOWN;
use super::serialization::LONG_SIZE_BYTES;
use super::serialization::PREAMBLE_LONGS_EMPTY;
use super::serialization::PREAMBLE_LONGS_STANDARD;
use super::serialization::SERIAL_VERSION;
use super::serialization::insufficient;
use super::serialization::invalid_dimensions;
use crate::codec::Family;
use crate::codec::SketchBytes;
use crate::codec::SketchSlice;
use crate::common::FilterParameters;
use crate::common::RandomSource;
use crate::common::XorShift64;
use crate::error::Error;
use crate::error::ErrorKind;
use crate::hash::HashPair;
use crate::hash::hash_fingerprint;

/// Signal returned when an insertion exhausted its relocation budget.
///
/// The filter is unchanged by the failed call. This is an expected outcome for a filter
/// operating near its dimensioned capacity; rebuild with larger dimensions to store more.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterFull;

impl fmt::Display for FilterFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cuckoo filter is full")
    }
}

impl std::error::Error for FilterFull {}

/// A cuckoo filter for probabilistic set membership testing with deletion.
///
/// Provides:
/// - No false negatives for inserted, not yet removed items
/// - Tunable false positive rate, driven by the fingerprint length
/// - Removal of previously inserted items
/// - Bounded insertion cost (at most `max_kicks` relocations)
///
/// Each item is reduced to a fingerprint that lives in one of two candidate buckets. The
/// second candidate is `i1 XOR hash(fingerprint)`, so a stored fingerprint can be moved to
/// its other bucket without knowing the item it came from.
///
/// Use [`CuckooFilterBuilder`] for full control over construction.
#[derive(Debug, Clone)]
pub struct CuckooFilter<R = XorShift64> {
    /// Hash seed for items and fingerprints
    seed: u32,
    /// Relocations attempted per insertion before giving up
    max_kicks: u32,
    /// Bits kept from the hash for each fingerprint
    fingerprint_length: u8,
    /// The sizing request, when the filter was built from one
    parameters: Option<FilterParameters>,
    /// Fingerprint storage
    table: BucketTable,
    /// Count of stored fingerprints
    num_items: u64,
    /// Source of eviction choices
    rng: R,
}

impl CuckooFilter<XorShift64> {
    /// Creates a filter sized for `capacity` items at a target false positive rate, with
    /// buckets of 4 slots.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`] if `capacity` is 0 or `error_rate` is not in
    /// `(0.0, 1.0)`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sketchfilters::cuckoo::CuckooFilter;
    /// let mut filter = CuckooFilter::new(1000, 0.01).unwrap();
    /// filter.insert("apple").unwrap();
    ///
    /// assert!(filter.contains("apple"));
    /// assert!(filter.remove("apple"));
    /// assert!(!filter.contains("apple"));
    /// ```
    pub fn new(capacity: u64, error_rate: f64) -> Result<Self, Error> {
        CuckooFilterBuilder::with_accuracy(capacity, error_rate).build()
    }

    /// Creates a filter with explicit dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`] if `bucket_count` is not a power of two, or the
    /// bucket capacity or fingerprint length is out of range.
    pub fn with_dimensions(
        bucket_count: u64,
        bucket_capacity: usize,
        fingerprint_length: u8,
    ) -> Result<Self, Error> {
        CuckooFilterBuilder::with_size(bucket_count, bucket_capacity, fingerprint_length).build()
    }

    /// Builds a filter sized for the given items and inserts each of them in order.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`] if `error_rate` is not in `(0.0, 1.0)`, and
    /// [`ErrorKind::FilterFull`] if an item could not be placed.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sketchfilters::cuckoo::CuckooFilter;
    /// let filter = CuckooFilter::from_items(["alice", "bob", "carol"], 0.01).unwrap();
    /// assert_eq!(filter.len(), 3);
    /// assert!(filter.contains("bob"));
    /// ```
    pub fn from_items<I, T>(items: I, error_rate: f64) -> Result<Self, Error>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
        T: Hash,
    {
        let items = items.into_iter();
        let capacity = (items.len() as u64).max(1);
        let mut filter = Self::new(capacity, error_rate)?;
        for (position, item) in items.enumerate() {
            filter.insert(&item).map_err(|full| {
                Error::new(ErrorKind::FilterFull, full.to_string())
                    .with_context("position", position)
                    .with_context("capacity", capacity)
            })?;
        }
        Ok(filter)
    }

    /// Deserializes a filter from bytes produced by [`serialize()`](Self::serialize).
    ///
    /// The restored filter uses a fresh, time-seeded random source.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::FormatMismatch`] if:
    /// - The family ID doesn't match (not a cuckoo filter)
    /// - The serial version is unsupported
    /// - The data is truncated, has trailing bytes, or is internally inconsistent
    ///
    /// # Examples
    ///
    /// ```
    /// # use sketchfilters::cuckoo::CuckooFilter;
    /// let mut original = CuckooFilter::new(100, 0.01).unwrap();
    /// original.insert("test").unwrap();
    ///
    /// let bytes = original.serialize();
    /// let restored = CuckooFilter::deserialize(&bytes).unwrap();
    /// assert_eq!(original, restored);
    /// assert!(restored.contains("test"));
    /// ```
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        Self::deserialize_with_random(bytes, XorShift64::default())
    }
}

impl<R: RandomSource> CuckooFilter<R> {
    pub(super) fn from_parts(
        seed: u32,
        max_kicks: u32,
        fingerprint_length: u8,
        parameters: Option<FilterParameters>,
        table: BucketTable,
        num_items: u64,
        rng: R,
    ) -> Self {
        CuckooFilter {
            seed,
            max_kicks,
            fingerprint_length,
            parameters,
            table,
            num_items,
            rng,
        }
    }

    // ========================================================================
    // Query Operations
    // ========================================================================

    /// Tests whether an item is possibly in the set.
    ///
    /// Returns:
    /// - `true`: Item was **possibly** inserted (or false positive)
    /// - `false`: Item was **definitely not** inserted, or has been removed
    pub fn contains<T: Hash + ?Sized>(&self, item: &T) -> bool {
        let (fingerprint, i1, i2) = self.locate(item);
        self.table.bucket(i1).contains(fingerprint) || self.table.bucket(i2).contains(fingerprint)
    }

    // ========================================================================
    // Update Operations
    // ========================================================================

    /// Inserts an item into the filter.
    ///
    /// If both candidate buckets are full, up to `max_kicks` stored fingerprints are
    /// relocated to their alternate buckets to make room. When that budget runs out every
    /// relocation is undone, the item is not stored, and [`FilterFull`] is returned.
    ///
    /// Inserting the same item twice stores two copies, which need two removals.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sketchfilters::cuckoo::CuckooFilter;
    /// let mut filter = CuckooFilter::new(100, 0.01).unwrap();
    ///
    /// filter.insert("apple").unwrap();
    /// filter.insert(&42_u64).unwrap();
    /// filter.insert(&[1, 2, 3]).unwrap();
    ///
    /// assert!(filter.contains("apple"));
    /// assert_eq!(filter.len(), 3);
    /// ```
    pub fn insert<T: Hash + ?Sized>(&mut self, item: &T) -> Result<(), FilterFull> {
        let (fingerprint, i1, i2) = self.locate(item);
        self.insert_fingerprint(fingerprint, i1, i2)
    }

    /// Tests and inserts an item in a single operation.
    ///
    /// Returns whether the item was possibly already in the set before insertion.
    pub fn contains_and_insert<T: Hash + ?Sized>(&mut self, item: &T) -> Result<bool, FilterFull> {
        let (fingerprint, i1, i2) = self.locate(item);
        let was_present = self.table.bucket(i1).contains(fingerprint)
            || self.table.bucket(i2).contains(fingerprint);
        self.insert_fingerprint(fingerprint, i1, i2)?;
        Ok(was_present)
    }

    /// Removes one copy of an item's fingerprint.
    ///
    /// Returns `false`, leaving the filter untouched, if neither candidate bucket holds the
    /// fingerprint.
    ///
    /// Removing an item that was never inserted can delete the fingerprint of a different
    /// item that collides with it (same fingerprint, same buckets), which then becomes a
    /// false negative. Only remove items known to have been inserted.
    pub fn remove<T: Hash + ?Sized>(&mut self, item: &T) -> bool {
        let (fingerprint, i1, i2) = self.locate(item);
        let removed = self.table.bucket_mut(i1).remove(fingerprint)
            || self.table.bucket_mut(i2).remove(fingerprint);
        if removed {
            self.num_items -= 1;
        }
        removed
    }

    /// Resets the filter to its initial empty state.
    ///
    /// Clears all buckets while preserving dimensions and configuration.
    pub fn reset(&mut self) {
        self.table.clear();
        self.num_items = 0;
    }

    // ========================================================================
    // Statistics and Properties
    // ========================================================================

    /// Returns the number of stored fingerprints.
    pub fn len(&self) -> u64 {
        self.num_items
    }

    /// Returns whether the filter is empty (no items stored).
    pub fn is_empty(&self) -> bool {
        self.num_items == 0
    }

    /// Returns whether every slot holds a fingerprint.
    pub fn is_full(&self) -> bool {
        self.num_items == self.capacity()
    }

    /// Returns the total number of slots.
    pub fn capacity(&self) -> u64 {
        self.table.bucket_count() as u64 * self.table.bucket_capacity() as u64
    }

    /// Returns the fraction of slots in use.
    pub fn load_factor(&self) -> f64 {
        self.num_items as f64 / self.capacity() as f64
    }

    /// Estimates the current false positive probability.
    ///
    /// Formula: `2 * b * load / 2^f`
    /// where:
    /// - b = bucket capacity
    /// - load = load factor
    /// - f = fingerprint length
    ///
    /// A lookup compares against at most `2 * b * load` stored fingerprints, each matching
    /// by accident with probability `2^-f`.
    pub fn rate(&self) -> f64 {
        let b = self.table.bucket_capacity() as f64;
        2.0 * b * self.load_factor() / 2f64.powi(i32::from(self.fingerprint_length))
    }

    /// Returns the number of buckets.
    pub fn bucket_count(&self) -> usize {
        self.table.bucket_count()
    }

    /// Returns the number of slots per bucket.
    pub fn bucket_capacity(&self) -> usize {
        self.table.bucket_capacity()
    }

    /// Returns the fingerprint length in bits.
    pub fn fingerprint_length(&self) -> u8 {
        self.fingerprint_length
    }

    /// Returns the relocation budget of an insertion.
    pub fn max_kicks(&self) -> u32 {
        self.max_kicks
    }

    /// Returns the hash seed.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Returns the sizing request the filter was built from, if any.
    ///
    /// Filters built from explicit dimensions have none.
    pub fn parameters(&self) -> Option<FilterParameters> {
        self.parameters
    }

    /// Iterates over the buckets in index order.
    pub fn buckets(&self) -> impl ExactSizeIterator<Item = Bucket<'_>> + '_ {
        self.table.iter()
    }

    // ========================================================================
    // Serialization
    // ========================================================================

    /// Serializes the filter to a byte vector.
    ///
    /// The random source is not part of the snapshot.
    pub fn serialize(&self) -> Vec<u8> {
        let is_empty = self.is_empty();
        let preamble_longs = if is_empty {
            PREAMBLE_LONGS_EMPTY
        } else {
            PREAMBLE_LONGS_STANDARD
        };

        let capacity = LONG_SIZE_BYTES * preamble_longs as usize
            + if is_empty {
                0
            } else {
                self.bucket_count() + self.num_items as usize * FINGERPRINT_SIZE_BYTES
            };
        let mut bytes = SketchBytes::with_capacity(capacity);

        let mut flags = 0;
        if is_empty {
            flags |= FLAGS_IS_EMPTY;
        }
        if self.parameters.is_some() {
            flags |= FLAGS_HAS_PARAMETERS;
        }

        // Preamble
        bytes.write_u8(preamble_longs);
        bytes.write_u8(SERIAL_VERSION);
        bytes.write_u8(Family::CUCKOO.id);
        bytes.write_u8(flags);
        bytes.write_u8(self.table.bucket_capacity() as u8);
        bytes.write_u8(self.fingerprint_length);
        bytes.write_u8(0); // reserved
        bytes.write_u8(0); // reserved

        bytes.write_u32_le(self.seed);
        bytes.write_u32_le(self.max_kicks);
        bytes.write_u64_le(self.table.bucket_count() as u64);

        let (capacity, error_rate) = self
            .parameters
            .map_or((0, 0.0), |p| (p.capacity(), p.error_rate()));
        bytes.write_u64_le(capacity);
        bytes.write_f64_le(error_rate);

        if !is_empty {
            bytes.write_u64_le(self.num_items);

            for bucket in self.table.iter() {
                bytes.write_u8(bucket.len() as u8);
                for &fingerprint in bucket.fingerprints() {
                    bytes.write_u32_le(fingerprint);
                }
            }
        }

        bytes.into_bytes()
    }

    /// Deserializes a filter from bytes, drawing eviction choices from `rng`.
    ///
    /// # Errors
    ///
    /// Same as [`CuckooFilter::deserialize`].
    pub fn deserialize_with_random(bytes: &[u8], rng: R) -> Result<Self, Error> {
        Self::decode(bytes, rng).inspect_err(|err| {
            debug!(error = %err, "rejected cuckoo filter snapshot");
        })
    }

    fn decode(bytes: &[u8], rng: R) -> Result<Self, Error> {
        let mut cursor = SketchSlice::new(bytes);

        // Read preamble
        let preamble_longs = cursor.read_u8().map_err(insufficient("preamble_longs"))?;
        let serial_version = cursor.read_u8().map_err(insufficient("serial_version"))?;
        let family_id = cursor.read_u8().map_err(insufficient("family_id"))?;

        // Validate
        Family::CUCKOO.validate_id(family_id)?;
        if serial_version != SERIAL_VERSION {
            return Err(Error::unsupported_serial_version(
                SERIAL_VERSION,
                serial_version,
            ));
        }
        Family::CUCKOO.validate_pre_longs(preamble_longs)?;

        let flags = cursor.read_u8().map_err(insufficient("flags"))?;
        if flags & !FLAGS_KNOWN != 0 {
            return Err(Error::format_mismatch("unknown flags").with_context("flags", flags));
        }
        let is_empty = (flags & FLAGS_IS_EMPTY) != 0;
        let expected_longs = if is_empty {
            PREAMBLE_LONGS_EMPTY
        } else {
            PREAMBLE_LONGS_STANDARD
        };
        if preamble_longs != expected_longs {
            return Err(Error::invalid_preamble_longs(expected_longs, preamble_longs));
        }

        let bucket_capacity = cursor.read_u8().map_err(insufficient("bucket_capacity"))?;
        let fingerprint_length = cursor
            .read_u8()
            .map_err(insufficient("fingerprint_length"))?;
        // Skip reserved bytes
        cursor.read_u8().map_err(insufficient("reserved1"))?;
        cursor.read_u8().map_err(insufficient("reserved2"))?;

        let seed = cursor.read_u32_le().map_err(insufficient("seed"))?;
        let max_kicks = cursor.read_u32_le().map_err(insufficient("max_kicks"))?;
        let bucket_count = cursor.read_u64_le().map_err(insufficient("bucket_count"))?;
        let capacity = cursor.read_u64_le().map_err(insufficient("capacity"))?;
        let error_rate = cursor.read_f64_le().map_err(insufficient("error_rate"))?;

        let parameters = if (flags & FLAGS_HAS_PARAMETERS) != 0 {
            let parameters = FilterParameters::new(capacity, error_rate).map_err(|err| {
                Error::format_mismatch(format!("invalid parameters: {}", err.message()))
            })?;
            Some(parameters)
        } else {
            None
        };

        let bucket_capacity = bucket_capacity as usize;
        let bucket_count =
            validate_dimensions(bucket_count, bucket_capacity, fingerprint_length, max_kicks)
                .map_err(invalid_dimensions)?;

        let num_items = if is_empty {
            0
        } else {
            cursor.read_u64_le().map_err(insufficient("num_items"))?
        };

        // every bucket carries at least its length byte
        if !is_empty && cursor.remaining() < bucket_count {
            return Err(Error::insufficient_data("buckets"));
        }
        let mut table =
            BucketTable::new(bucket_count, bucket_capacity).map_err(invalid_dimensions)?;

        if !is_empty {
            let mask = fingerprint_mask(fingerprint_length);
            let mut total = 0u64;
            for index in 0..bucket_count {
                let len = cursor.read_u8().map_err(insufficient("bucket_length"))?;
                if len as usize > bucket_capacity {
                    return Err(Error::format_mismatch("bucket length exceeds capacity")
                        .with_context("bucket", index)
                        .with_context("length", len));
                }
                let mut bucket = table.bucket_mut(index);
                for _ in 0..len {
                    let fingerprint = cursor.read_u32_le().map_err(insufficient("fingerprint"))?;
                    if fingerprint & !mask != 0 {
                        return Err(Error::format_mismatch(format!(
                            "fingerprint wider than {fingerprint_length} bits"
                        ))
                        .with_context("bucket", index));
                    }
                    bucket.add(fingerprint);
                }
                total += u64::from(len);
            }
            if total != num_items || total == 0 {
                return Err(Error::format_mismatch(
                    "item count does not match bucket contents",
                )
                .with_context("num_items", num_items)
                .with_context("stored", total));
            }
        }

        if cursor.remaining() != 0 {
            return Err(Error::format_mismatch("trailing bytes after filter")
                .with_context("remaining", cursor.remaining()));
        }

        Ok(CuckooFilter::from_parts(
            seed,
            max_kicks,
            fingerprint_length,
            parameters,
            table,
            num_items,
            rng,
        ))
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    /// Computes the fingerprint and both candidate buckets of an item.
    fn locate<T: Hash + ?Sized>(&self, item: &T) -> (Fingerprint, usize, usize) {
        let pair = HashPair::of(item, self.seed);
        let fingerprint = pair.second & fingerprint_mask(self.fingerprint_length);
        let i1 = pair.first as usize & self.bucket_mask();
        let i2 = self.alternate_index(i1, fingerprint);
        (fingerprint, i1, i2)
    }

    /// The other candidate bucket of a fingerprint stored in bucket `index`.
    ///
    /// With a power-of-two bucket count this is an involution:
    /// `alternate_index(alternate_index(i, f), f) == i`.
    fn alternate_index(&self, index: usize, fingerprint: Fingerprint) -> usize {
        (index ^ hash_fingerprint(fingerprint, self.seed) as usize) & self.bucket_mask()
    }

    fn bucket_mask(&self) -> usize {
        self.table.bucket_count() - 1
    }

    fn insert_fingerprint(
        &mut self,
        fingerprint: Fingerprint,
        i1: usize,
        i2: usize,
    ) -> Result<(), FilterFull> {
        if self.table.bucket_mut(i1).add(fingerprint) || self.table.bucket_mut(i2).add(fingerprint)
        {
            self.num_items += 1;
            return Ok(());
        }

        // Both candidates are full: relocate
        let mut index = if self.rng.next_bool() { i1 } else { i2 };
        let mut homeless = fingerprint;
        let mut swaps = Vec::with_capacity((self.max_kicks as usize).min(64));
        trace!(i1, i2, "starting eviction chain");

        for _ in 0..self.max_kicks {
            let evicted = self
                .table
                .bucket_mut(index)
                .swap_random(homeless, &mut self.rng);
            swaps.push((index, homeless, evicted));

            homeless = evicted;
            index = self.alternate_index(index, homeless);
            if self.table.bucket_mut(index).add(homeless) {
                self.num_items += 1;
                return Ok(());
            }
        }

        // no space left => restore the table as it was before this call
        for &(index, placed, evicted) in swaps.iter().rev() {
            let restored = self.table.bucket_mut(index).replace(placed, evicted);
            debug_assert!(restored, "swapped fingerprint must still be in its bucket");
        }
        debug!(
            max_kicks = self.max_kicks,
            num_items = self.num_items,
            "cuckoo filter full, eviction chain rolled back"
        );
        Err(FilterFull)
    }
}

/// Two filters are equal when their configuration matches and every bucket holds the same
/// fingerprints. The random source is not compared.
impl<R> PartialEq for CuckooFilter<R> {
    fn eq(&self, other: &Self) -> bool {
        self.seed == other.seed
            && self.max_kicks == other.max_kicks
            && self.fingerprint_length == other.fingerprint_length
            && self.parameters == other.parameters
            && self.num_items == other.num_items
            && self.table == other.table
    }
}

fn fingerprint_mask(fingerprint_length: u8) -> Fingerprint {
    if fingerprint_length >= 32 {
        Fingerprint::MAX
    } else {
        (1 << fingerprint_length) - 1
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(capacity: u64, error_rate: f64) -> CuckooFilter {
        CuckooFilterBuilder::with_accuracy(capacity, error_rate)
            .random_seed(1)
            .build()
            .unwrap()
    }

    #[test]
    fn test_insert_and_contains() {
        let mut filter = seeded(100, 0.01);

        assert!(!filter.contains("apple"));
        filter.insert("apple").unwrap();
        assert!(filter.contains("apple"));
        assert!(!filter.is_empty());
        assert_eq!(filter.len(), 1);
    }

    #[test]
    fn test_alternate_index_is_involution() {
        let filter = seeded(1000, 0.01);
        for i in 0..filter.bucket_count() {
            for fingerprint in [0, 1, 0x155, 0x3ff] {
                let alt = filter.alternate_index(i, fingerprint);
                assert!(alt < filter.bucket_count());
                assert_eq!(filter.alternate_index(alt, fingerprint), i);
            }
        }
    }

    #[test]
    fn test_locate_is_consistent() {
        let filter = seeded(1000, 0.01);
        for i in 0..100u64 {
            let (fingerprint, i1, i2) = filter.locate(&i);
            assert!(fingerprint <= fingerprint_mask(filter.fingerprint_length()));
            assert_eq!(filter.alternate_index(i2, fingerprint), i1);
        }
    }

    #[test]
    fn test_fingerprint_mask() {
        assert_eq!(fingerprint_mask(1), 0b1);
        assert_eq!(fingerprint_mask(10), 0x3ff);
        assert_eq!(fingerprint_mask(32), u32::MAX);
    }

    #[test]
    fn test_contains_and_insert() {
        let mut filter = seeded(100, 0.01);

        assert!(!filter.contains_and_insert(&42_u64).unwrap());
        assert!(filter.contains_and_insert(&42_u64).unwrap());
        assert_eq!(filter.len(), 2);
    }

    #[test]
    fn test_remove() {
        let mut filter = seeded(100, 0.01);
        filter.insert("a").unwrap();
        filter.insert("b").unwrap();

        assert!(filter.remove("a"));
        assert!(!filter.contains("a"));
        assert!(filter.contains("b"));
        assert_eq!(filter.len(), 1);
        assert!(!filter.remove("a"));
        assert_eq!(filter.len(), 1);
    }

    #[test]
    fn test_duplicates_need_two_removals() {
        let mut filter = seeded(100, 0.01);
        filter.insert("dup").unwrap();
        filter.insert("dup").unwrap();

        assert!(filter.remove("dup"));
        assert!(filter.contains("dup"));
        assert!(filter.remove("dup"));
        assert!(!filter.contains("dup"));
    }

    #[test]
    fn test_reset() {
        let mut filter = seeded(100, 0.01);
        filter.insert("test").unwrap();
        filter.reset();

        assert!(filter.is_empty());
        assert!(!filter.contains("test"));
        assert_eq!(filter.rate(), 0.0);
    }

    #[test]
    fn test_statistics() {
        let mut filter = CuckooFilterBuilder::with_size(16, 4, 8)
            .random_seed(3)
            .build()
            .unwrap();
        assert_eq!(filter.capacity(), 64);
        assert_eq!(filter.load_factor(), 0.0);

        for i in 0..16u32 {
            filter.insert(&i).unwrap();
        }
        assert_eq!(filter.load_factor(), 0.25);
        // 2 * 4 * 0.25 / 256
        assert_eq!(filter.rate(), 2.0 / 256.0);
    }

    #[test]
    fn test_filled_count_matches_buckets() {
        let mut filter = seeded(200, 0.05);
        for i in 0..180u32 {
            let _ = filter.insert(&i);
        }
        for i in (0..180u32).step_by(3) {
            filter.remove(&i);
        }
        let stored: usize = filter.buckets().map(|b| b.len()).sum();
        assert_eq!(stored as u64, filter.len());
    }

    #[test]
    fn test_failed_insert_leaves_filter_unchanged() {
        let mut filter = CuckooFilterBuilder::with_size(2, 1, 16)
            .max_kicks(10)
            .random_seed(5)
            .build()
            .unwrap();

        let mut inserted = vec![];
        let mut failed = 0;
        for i in 0..20u32 {
            let before = filter.clone();
            match filter.insert(&i) {
                Ok(()) => inserted.push(i),
                Err(FilterFull) => {
                    assert_eq!(filter, before);
                    failed += 1;
                }
            }
        }

        assert!(inserted.len() <= 2);
        assert_eq!(failed, 20 - inserted.len());
        for i in inserted {
            assert!(filter.contains(&i));
        }
    }

    #[test]
    fn test_is_full() {
        let mut filter = CuckooFilterBuilder::with_size(1, 2, 8)
            .random_seed(1)
            .build()
            .unwrap();
        filter.insert("x").unwrap();
        filter.insert("y").unwrap();
        assert!(filter.is_full());
        assert_eq!(filter.insert("z"), Err(FilterFull));
        assert_eq!(filter.len(), 2);
    }

    #[test]
    fn test_filter_full_display() {
        assert_eq!(FilterFull.to_string(), "cuckoo filter is full");
    }
}

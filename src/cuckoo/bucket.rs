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

use crate::common::RandomSource;
use crate::common::check_bucket_capacity;
use crate::error::Error;

/// A truncated hash identifying an element inside a bucket.
pub type Fingerprint = u32;

/// Fixed-size slot blocks for every bucket of a filter, stored contiguously.
///
/// Bucket `i` owns slots `i * bucket_capacity .. (i + 1) * bucket_capacity`. The occupied
/// slots of a bucket are always its first `len` slots, so no fingerprint value is reserved
/// to mark an empty slot.
#[derive(Clone)]
pub struct BucketTable {
    bucket_capacity: usize,
    slots: Vec<Fingerprint>,
    lengths: Vec<u8>,
}

impl BucketTable {
    /// Allocates `bucket_count` empty buckets of `bucket_capacity` slots each.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid) if
    /// `bucket_count` is 0, `bucket_capacity` is out of range, or the total slot count
    /// overflows `usize`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sketchfilters::cuckoo::BucketTable;
    ///
    /// let mut table = BucketTable::new(1, 1).unwrap();
    /// let mut bucket = table.bucket_mut(0);
    /// assert!(bucket.add(0xf00));
    /// assert!(!bucket.add(0xba7));
    /// assert_eq!(bucket.len(), 1);
    /// ```
    pub fn new(bucket_count: usize, bucket_capacity: usize) -> Result<Self, Error> {
        check_bucket_capacity(bucket_capacity)?;
        if bucket_count == 0 {
            return Err(Error::config_invalid("bucket count must be greater than 0"));
        }
        let num_slots = bucket_count.checked_mul(bucket_capacity).ok_or_else(|| {
            Error::config_invalid("table size overflows usize")
                .with_context("bucket_count", bucket_count)
                .with_context("bucket_capacity", bucket_capacity)
        })?;

        let mut slots = Vec::new();
        slots.try_reserve_exact(num_slots).map_err(|err| {
            Error::config_invalid("cannot allocate bucket storage")
                .with_context("num_slots", num_slots)
                .set_source(err)
        })?;
        slots.resize(num_slots, 0);

        Ok(BucketTable {
            bucket_capacity,
            slots,
            lengths: vec![0; bucket_count],
        })
    }

    /// Number of buckets.
    pub fn bucket_count(&self) -> usize {
        self.lengths.len()
    }

    /// Number of slots per bucket.
    pub fn bucket_capacity(&self) -> usize {
        self.bucket_capacity
    }

    /// Total number of stored fingerprints.
    pub fn len(&self) -> usize {
        self.lengths.iter().map(|&len| len as usize).sum()
    }

    /// Returns whether no bucket holds a fingerprint.
    pub fn is_empty(&self) -> bool {
        self.lengths.iter().all(|&len| len == 0)
    }

    /// Returns a read-only view of bucket `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= bucket_count()`.
    pub fn bucket(&self, index: usize) -> Bucket<'_> {
        let len = self.lengths[index] as usize;
        let offset = index * self.bucket_capacity;
        Bucket {
            slots: &self.slots[offset..offset + len],
            capacity: self.bucket_capacity,
        }
    }

    /// Returns a mutable view of bucket `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= bucket_count()`.
    pub fn bucket_mut(&mut self, index: usize) -> BucketMut<'_> {
        let offset = index * self.bucket_capacity;
        BucketMut {
            slots: &mut self.slots[offset..offset + self.bucket_capacity],
            len: &mut self.lengths[index],
        }
    }

    /// Iterates over every bucket in index order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Bucket<'_>> + '_ {
        (0..self.bucket_count()).map(move |i| self.bucket(i))
    }

    /// Empties every bucket.
    pub fn clear(&mut self) {
        self.lengths.fill(0);
        self.slots.fill(0);
    }
}

impl fmt::Debug for BucketTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BucketTable")
            .field("bucket_count", &self.bucket_count())
            .field("bucket_capacity", &self.bucket_capacity)
            .field("len", &self.len())
            .finish()
    }
}

/// Two tables are equal when every bucket holds the same multiset of fingerprints.
impl PartialEq for BucketTable {
    fn eq(&self, other: &Self) -> bool {
        if self.bucket_capacity != other.bucket_capacity
            || self.bucket_count() != other.bucket_count()
        {
            return false;
        }

        let mut lhs = Vec::with_capacity(self.bucket_capacity);
        let mut rhs = Vec::with_capacity(self.bucket_capacity);
        self.iter().zip(other.iter()).all(|(a, b)| {
            if a.len() != b.len() {
                return false;
            }
            lhs.clear();
            rhs.clear();
            lhs.extend_from_slice(a.fingerprints());
            rhs.extend_from_slice(b.fingerprints());
            lhs.sort_unstable();
            rhs.sort_unstable();
            lhs == rhs
        })
    }
}

/// Read-only view of one bucket.
#[derive(Debug, Clone, Copy)]
pub struct Bucket<'a> {
    slots: &'a [Fingerprint],
    capacity: usize,
}

impl<'a> Bucket<'a> {
    /// Number of stored fingerprints.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns whether the bucket holds no fingerprint.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns whether at least one slot is free.
    pub fn is_free(&self) -> bool {
        self.len() < self.capacity
    }

    /// Returns whether a slot holds `fingerprint`.
    pub fn contains(&self, fingerprint: Fingerprint) -> bool {
        self.slots.contains(&fingerprint)
    }

    /// The stored fingerprints, in slot order.
    pub fn fingerprints(&self) -> &'a [Fingerprint] {
        self.slots
    }
}

/// Mutable view of one bucket.
pub struct BucketMut<'a> {
    slots: &'a mut [Fingerprint],
    len: &'a mut u8,
}

impl BucketMut<'_> {
    /// Number of stored fingerprints.
    pub fn len(&self) -> usize {
        *self.len as usize
    }

    /// Returns whether the bucket holds no fingerprint.
    pub fn is_empty(&self) -> bool {
        *self.len == 0
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns whether at least one slot is free.
    pub fn is_free(&self) -> bool {
        self.len() < self.capacity()
    }

    /// Returns whether a slot holds `fingerprint`.
    pub fn contains(&self, fingerprint: Fingerprint) -> bool {
        self.occupied().contains(&fingerprint)
    }

    /// Stores `fingerprint` in the next free slot.
    ///
    /// Returns `false`, leaving the bucket untouched, if every slot is taken. A `false`
    /// return is a capacity signal for the caller, not a failure.
    pub fn add(&mut self, fingerprint: Fingerprint) -> bool {
        if !self.is_free() {
            return false;
        }
        let len = self.len();
        self.slots[len] = fingerprint;
        *self.len += 1;
        true
    }

    /// Removes one occurrence of `fingerprint`.
    ///
    /// The last occupied slot moves into the vacated one, so slot order is not preserved
    /// but every other fingerprint stays in the bucket. Returns `false` if the fingerprint
    /// is absent.
    pub fn remove(&mut self, fingerprint: Fingerprint) -> bool {
        match self.position(fingerprint) {
            Some(pos) => {
                let last = self.len() - 1;
                self.slots.swap(pos, last);
                self.slots[last] = 0;
                *self.len -= 1;
                true
            }
            None => false,
        }
    }

    /// Overwrites a uniformly chosen occupied slot with `fingerprint` and returns the
    /// fingerprint that was there.
    ///
    /// # Panics
    ///
    /// Panics if the bucket is empty. Eviction only ever swaps into full buckets.
    pub fn swap_random<R: RandomSource>(
        &mut self,
        fingerprint: Fingerprint,
        rng: &mut R,
    ) -> Fingerprint {
        assert!(!self.is_empty(), "cannot swap into an empty bucket");
        let slot = rng.next_below(self.len());
        std::mem::replace(&mut self.slots[slot], fingerprint)
    }

    /// Overwrites one occurrence of `old` with `new`. Returns `false` if `old` is absent.
    pub(crate) fn replace(&mut self, old: Fingerprint, new: Fingerprint) -> bool {
        match self.position(old) {
            Some(pos) => {
                self.slots[pos] = new;
                true
            }
            None => false,
        }
    }

    fn occupied(&self) -> &[Fingerprint] {
        &self.slots[..self.len()]
    }

    fn position(&self, fingerprint: Fingerprint) -> Option<usize> {
        self.occupied().iter().position(|&fp| fp == fingerprint)
    }
}

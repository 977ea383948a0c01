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

//! Hashing foundation shared by every filter in the crate.
//!
//! An element is hashed twice with MurmurHash3 (x86, 32-bit) under two different seeds,
//! producing a [`HashPair`]. Any number of positional values are then derived from the pair
//! with enhanced double hashing (Kirsch and Mitzenmacher), so `k` probes cost two hash
//! evaluations instead of `k`.

use std::hash::Hash;
use std::hash::Hasher;

use mur3::Hasher32;

/// The seed 9001 used when no seed is given is a prime number inherited from the sketch
/// libraries this crate interoperates with.
///
/// Two filters can only be compared, or share a snapshot, if they hash with the same seed.
pub const DEFAULT_UPDATE_SEED: u32 = 9001;

/// Mixed into the caller's seed to obtain the seed of the second hash evaluation.
const SECOND_SEED_MIX: u32 = 0x9e37_79b9;

/// Two independent 32-bit hash values derived from one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashPair {
    /// Result of the first hash evaluation.
    pub first: u32,
    /// Result of the second hash evaluation.
    pub second: u32,
}

impl HashPair {
    /// Hashes an element under `seed`.
    ///
    /// The result is a pure function of the element's [`Hash`] byte stream and the seed.
    ///
    /// # Examples
    ///
    /// ```
    /// use sketchfilters::hash::HashPair;
    ///
    /// let a = HashPair::of("apple", 42);
    /// let b = HashPair::of("apple", 42);
    /// assert_eq!(a, b);
    /// assert_ne!(a, HashPair::of("apple", 43));
    /// ```
    pub fn of<T: Hash + ?Sized>(item: &T, seed: u32) -> Self {
        let mut hasher = Hasher32::with_seed(seed);
        item.hash(&mut hasher);
        let first = hasher.finish32();

        let mut hasher = Hasher32::with_seed(seed ^ SECOND_SEED_MIX);
        item.hash(&mut hasher);
        let second = hasher.finish32();

        HashPair { first, second }
    }

    /// Returns the `i`-th positional value (0-indexed) in `0..m`.
    ///
    /// Formula: `(first + i * second + (i^3 - i) / 6) mod m`
    ///
    /// The cubic term decorrelates successive indexes when `second` shares factors with `m`.
    ///
    /// # Panics
    ///
    /// Panics if `m` is zero.
    pub fn index(&self, i: u64, m: u64) -> u64 {
        assert!(m > 0, "m must be greater than 0");
        let cubic = i.wrapping_mul(i).wrapping_mul(i).wrapping_sub(i) / 6;
        u64::from(self.first)
            .wrapping_add(i.wrapping_mul(u64::from(self.second)))
            .wrapping_add(cubic)
            % m
    }

    /// Returns the first `k` positional values in `0..m`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sketchfilters::hash::HashPair;
    ///
    /// let pair = HashPair::of(&42_u64, 9001);
    /// let indexes: Vec<u64> = pair.indexes(7, 1024).collect();
    /// assert_eq!(indexes.len(), 7);
    /// assert!(indexes.iter().all(|&i| i < 1024));
    /// ```
    pub fn indexes(&self, k: u32, m: u64) -> impl Iterator<Item = u64> + '_ {
        (0..u64::from(k)).map(move |i| self.index(i, m))
    }
}

/// Hashes a stored fingerprint.
///
/// This is the only hash a filter applies to fingerprints. Cuckoo filters XOR it into a bucket
/// index to reach the alternate bucket without the original element.
pub fn hash_fingerprint(fingerprint: u32, seed: u32) -> u32 {
    let mut hasher = Hasher32::with_seed(seed);
    hasher.write(&fingerprint.to_le_bytes());
    hasher.finish32()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_murmur3_x86_32_vectors() {
        // reference values of MurmurHash3_x86_32
        assert_eq!(mur3::murmurhash3_x86_32(b"", 0), 0);
        assert_eq!(mur3::murmurhash3_x86_32(b"", 1), 0x514e28b7);
        assert_eq!(mur3::murmurhash3_x86_32(b"", 0xffffffff), 0x81f16f39);
        assert_eq!(mur3::murmurhash3_x86_32(b"Hello, world!", 1234), 0xfaf6cdb3);
    }

    #[test]
    fn test_hasher32_matches_function() {
        let mut hasher = Hasher32::with_seed(1234);
        hasher.write(b"Hello, ");
        hasher.write(b"world!");
        assert_eq!(hasher.finish32(), mur3::murmurhash3_x86_32(b"Hello, world!", 1234));
    }

    #[test]
    fn test_pair_halves_differ() {
        let pair = HashPair::of("foo", DEFAULT_UPDATE_SEED);
        assert_ne!(pair.first, pair.second);
    }

    #[test]
    fn test_index_zero_is_first() {
        let pair = HashPair {
            first: 17,
            second: 5,
        };
        assert_eq!(pair.index(0, 100), 17);
        assert_eq!(pair.index(1, 100), 22);
        // i = 2: 17 + 10 + (8 - 2) / 6 = 28
        assert_eq!(pair.index(2, 100), 28);
        // i = 3: 17 + 15 + (27 - 3) / 6 = 36
        assert_eq!(pair.index(3, 100), 36);
    }

    #[test]
    fn test_indexes_spread() {
        let m = 64;
        let mut hits = vec![0u32; m as usize];
        for i in 0..10_000u64 {
            for idx in HashPair::of(&i, DEFAULT_UPDATE_SEED).indexes(3, m) {
                hits[idx as usize] += 1;
            }
        }
        // 30_000 draws over 64 cells: every cell is expected around 469
        assert!(hits.iter().all(|&h| h > 300 && h < 650), "{hits:?}");
    }

    #[test]
    fn test_fingerprint_hash_is_seeded() {
        assert_eq!(hash_fingerprint(7, 1), hash_fingerprint(7, 1));
        assert_ne!(hash_fingerprint(7, 1), hash_fingerprint(7, 2));
    }
}

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

use googletest::assert_that;
use googletest::prelude::contains_substring;
use googletest::prelude::eq;
use googletest::prelude::near;
use sketchfilters::common::suggest_fingerprint_length;
use sketchfilters::common::suggest_num_bits;
use sketchfilters::common::suggest_num_buckets;
use sketchfilters::common::suggest_num_hashes;
use sketchfilters::error::ErrorKind;
use sketchfilters::hash::DEFAULT_UPDATE_SEED;
use sketchfilters::hash::HashPair;
use sketchfilters::hash::hash_fingerprint;

#[test]
fn test_hash_pair_is_deterministic() {
    let a = HashPair::of(&"key", DEFAULT_UPDATE_SEED);
    let b = HashPair::of("key", DEFAULT_UPDATE_SEED);
    assert_eq!(a, b);
    assert_ne!(a, HashPair::of("key", DEFAULT_UPDATE_SEED + 1));
}

#[test]
fn test_indexes_spread_over_range() {
    let m = 64;
    let mut hits = vec![0_u32; m as usize];
    for item in 0..10_000_u64 {
        let pair = HashPair::of(&item, DEFAULT_UPDATE_SEED);
        for index in pair.indexes(3, m) {
            hits[index as usize] += 1;
        }
    }

    // 30_000 probes over 64 cells
    let expected = 30_000.0 / m as f64;
    for count in hits {
        assert_that!(f64::from(count), near(expected, expected * 0.25));
    }
}

#[test]
fn test_index_agrees_with_indexes() {
    let pair = HashPair::of(&123_u64, 7);
    let collected: Vec<u64> = pair.indexes(5, 1000).collect();
    let direct: Vec<u64> = (0..5).map(|i| pair.index(i, 1000)).collect();
    assert_eq!(collected, direct);
}

#[test]
fn test_hash_fingerprint_depends_on_seed() {
    assert_eq!(hash_fingerprint(42, 1), hash_fingerprint(42, 1));
    assert_ne!(hash_fingerprint(42, 1), hash_fingerprint(42, 2));
    assert_ne!(hash_fingerprint(42, 1), hash_fingerprint(43, 1));
}

#[test]
fn test_sizing_helpers() {
    assert_that!(suggest_num_bits(1000, 0.01).unwrap(), eq(9586));
    assert_that!(suggest_num_hashes(1000, 9586).unwrap(), eq(7));
    assert_that!(suggest_fingerprint_length(4, 0.01).unwrap(), eq(10));
    assert_that!(suggest_num_buckets(1000, 4).unwrap(), eq(512));
    assert_that!(suggest_num_buckets(10, 1).unwrap(), eq(32));
}

#[test]
fn test_sizing_rejects_invalid_input() {
    let err = suggest_num_bits(0, 0.01).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert_that!(err.message(), contains_substring("capacity"));

    let err = suggest_fingerprint_length(4, 1e-12).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert_that!(err.message(), contains_substring("longer than 32 bits"));

    let err = suggest_num_buckets(100, 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
}

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
use sketchfilters::common::XorShift64;
use sketchfilters::cuckoo::CuckooFilter;
use sketchfilters::cuckoo::CuckooFilterBuilder;
use sketchfilters::error::ErrorKind;

fn sample_filter() -> CuckooFilter {
    let mut filter = CuckooFilterBuilder::with_size(16, 4, 12)
        .random_seed(1)
        .build()
        .unwrap();
    for i in 0..10_u64 {
        filter.insert(&i).unwrap();
    }
    filter
}

/// Offset of the first bucket length byte in a non-empty snapshot.
const BUCKETS_OFFSET: usize = 48;

#[test]
fn test_empty_round_trip() {
    let filter = CuckooFilter::new(100, 0.01).unwrap();

    let bytes = filter.serialize();
    assert_eq!(bytes.len(), 40);

    let restored = CuckooFilter::deserialize(&bytes).unwrap();
    assert!(restored.is_empty());
    assert_eq!(restored, filter);
    assert_eq!(restored.parameters(), filter.parameters());
    assert_eq!(restored.serialize(), bytes);
}

#[test]
fn test_non_empty_round_trip() {
    let filter = sample_filter();

    let bytes = filter.serialize();
    // preamble, one length byte per bucket, 4 bytes per fingerprint
    assert_eq!(bytes.len(), 48 + 16 + 10 * 4);

    let restored = CuckooFilter::deserialize(&bytes).unwrap();
    assert_eq!(restored, filter);
    assert_eq!(restored.len(), 10);
    assert_eq!(restored.rate(), filter.rate());
    assert_eq!(restored.parameters(), None);
    for i in 0..10_u64 {
        assert!(restored.contains(&i));
    }
    assert_eq!(restored.serialize(), bytes);
}

#[test]
fn test_round_trip_preserves_configuration() {
    let mut filter = CuckooFilterBuilder::with_accuracy(1000, 0.001)
        .bucket_capacity(2)
        .max_kicks(77)
        .seed(12345)
        .random_seed(9)
        .build()
        .unwrap();
    for i in 0..300_u64 {
        filter.insert(&i).unwrap();
    }

    let restored = CuckooFilter::deserialize(&filter.serialize()).unwrap();
    assert_eq!(restored.bucket_count(), filter.bucket_count());
    assert_eq!(restored.bucket_capacity(), 2);
    assert_eq!(restored.fingerprint_length(), filter.fingerprint_length());
    assert_eq!(restored.max_kicks(), 77);
    assert_eq!(restored.seed(), 12345);
    assert_eq!(restored.parameters(), filter.parameters());
    assert_eq!(restored.load_factor(), filter.load_factor());
}

#[test]
fn test_restored_filter_stays_usable() {
    let bytes = sample_filter().serialize();
    let mut restored =
        CuckooFilter::deserialize_with_random(&bytes, XorShift64::seeded(5)).unwrap();

    assert!(restored.remove(&3_u64));
    assert!(!restored.contains(&3_u64));
    restored.insert("new item").unwrap();
    assert!(restored.contains("new item"));
    assert_eq!(restored.len(), 10);
}

#[test]
fn test_wrong_family() {
    let mut bytes = sample_filter().serialize();
    bytes[2] = 99;

    let err = CuckooFilter::deserialize(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FormatMismatch);
    assert_that!(err.message(), contains_substring("invalid family"));
}

#[test]
fn test_unsupported_serial_version() {
    let mut bytes = sample_filter().serialize();
    bytes[1] = 2;

    let err = CuckooFilter::deserialize(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FormatMismatch);
    assert_that!(err.message(), contains_substring("unsupported serial version"));
}

#[test]
fn test_preamble_disagrees_with_empty_flag() {
    let mut bytes = sample_filter().serialize();
    bytes[0] = 5;

    let err = CuckooFilter::deserialize(&bytes).unwrap_err();
    assert_that!(
        err.message(),
        contains_substring("invalid preamble longs: expected 6, got 5")
    );
}

#[test]
fn test_empty_input() {
    let err = CuckooFilter::deserialize(&[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FormatMismatch);
    assert_that!(err.message(), contains_substring("insufficient data"));
}

#[test]
fn test_truncated_input() {
    let bytes = sample_filter().serialize();
    for len in [4, 20, 44, bytes.len() - 1] {
        let err = CuckooFilter::deserialize(&bytes[..len]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FormatMismatch, "length {len}");
        assert_that!(err.message(), contains_substring("insufficient data"));
    }
}

#[test]
fn test_trailing_bytes() {
    let mut bytes = sample_filter().serialize();
    bytes.push(0);

    let err = CuckooFilter::deserialize(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FormatMismatch);
    assert_that!(err.message(), contains_substring("trailing bytes"));
}

#[test]
fn test_bucket_length_exceeds_capacity() {
    let mut bytes = sample_filter().serialize();
    bytes[BUCKETS_OFFSET] = 5;

    let err = CuckooFilter::deserialize(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FormatMismatch);
    assert_that!(err.message(), contains_substring("bucket length exceeds capacity"));
}

#[test]
fn test_bucket_count_not_power_of_two() {
    let mut bytes = sample_filter().serialize();
    bytes[16..24].copy_from_slice(&12_u64.to_le_bytes());

    let err = CuckooFilter::deserialize(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FormatMismatch);
    assert_that!(err.message(), contains_substring("invalid dimensions"));
}

#[test]
fn test_item_count_mismatch() {
    let mut bytes = sample_filter().serialize();
    bytes[40..48].copy_from_slice(&11_u64.to_le_bytes());

    let err = CuckooFilter::deserialize(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FormatMismatch);
    assert_that!(err.message(), contains_substring("item count"));
}

#[test]
fn test_fingerprint_wider_than_length() {
    let mut bytes = sample_filter().serialize();

    // locate the first stored fingerprint
    let mut offset = BUCKETS_OFFSET;
    while bytes[offset] == 0 {
        offset += 1;
    }
    bytes[offset + 1..offset + 5].copy_from_slice(&u32::MAX.to_le_bytes());

    let err = CuckooFilter::deserialize(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FormatMismatch);
    assert_that!(err.message(), contains_substring("fingerprint wider than 12 bits"));
}

#[test]
fn test_unknown_flags() {
    for bit in 2..8 {
        let mut bytes = sample_filter().serialize();
        bytes[3] |= 1 << bit;

        let err = CuckooFilter::deserialize(&bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FormatMismatch);
        assert_that!(err.message(), contains_substring("unknown flags"));
    }
}

#[test]
fn test_oversized_empty_snapshot() {
    // an empty snapshot carries no buckets, so only the dimension limits bound it
    let mut bytes = CuckooFilter::with_dimensions(16, 4, 12).unwrap().serialize();
    assert_eq!(bytes.len(), 40);
    bytes[4] = 255;
    bytes[16..24].copy_from_slice(&(1_u64 << 32).to_le_bytes());

    let err = CuckooFilter::deserialize(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FormatMismatch);
    assert_that!(err.message(), contains_substring("invalid dimensions"));
    assert_that!(err.message(), contains_substring("total slot count"));
}

#[test]
fn test_largest_bucket_count_rejected_without_data() {
    let mut bytes = sample_filter().serialize();
    bytes[16..24].copy_from_slice(&(1_u64 << 30).to_le_bytes());

    let err = CuckooFilter::deserialize(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FormatMismatch);
    assert_that!(err.message(), contains_substring("insufficient data"));
}

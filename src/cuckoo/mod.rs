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

//! Cuckoo filter implementation for probabilistic set membership with deletion.
//!
//! A cuckoo filter stores a short fingerprint of each item in one of two candidate buckets.
//! Lookups inspect both buckets, so an inserted item is always found; an item that was never
//! inserted is reported present only when one of the buckets happens to hold a matching
//! fingerprint. Unlike a Bloom filter, items can be removed again.
//!
//! When both candidate buckets are full, an insertion relocates stored fingerprints to their
//! alternate buckets ("kicks"). If no free slot turns up within `max_kicks` relocations the
//! insertion fails with [`FilterFull`] and the filter is left exactly as it was.
//!
//! # Usage
//!
//! ```rust
//! use sketchfilters::cuckoo::CuckooFilter;
//!
//! let mut filter = CuckooFilter::new(1000, 0.01).unwrap();
//!
//! filter.insert("apple").unwrap();
//! filter.insert(&42_u64).unwrap();
//!
//! assert!(filter.contains("apple"));
//! assert!(filter.remove("apple"));
//! assert!(!filter.contains("apple"));
//! ```
//!
//! # Configuration
//!
//! ```rust
//! use sketchfilters::cuckoo::CuckooFilterBuilder;
//!
//! let filter = CuckooFilterBuilder::with_size(1024, 4, 12)
//!     .max_kicks(100)
//!     .seed(7)
//!     .random_seed(42)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(filter.capacity(), 4096);
//! ```

mod bucket;
mod builder;
mod serialization;
mod sketch;

pub use self::bucket::Bucket;
pub use self::bucket::BucketMut;
pub use self::bucket::BucketTable;
pub use self::bucket::Fingerprint;
pub use self::builder::CuckooFilterBuilder;
pub use self::builder::DEFAULT_BUCKET_CAPACITY;
pub use self::builder::DEFAULT_MAX_KICKS;
pub use self::builder::MAX_BUCKET_COUNT;
pub use self::builder::MAX_SLOT_COUNT;
pub use self::sketch::CuckooFilter;
pub use self::sketch::FilterFull;

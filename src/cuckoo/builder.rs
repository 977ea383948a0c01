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

use tracing::debug;

use super::CuckooFilter;
use super::bucket::BucketTable;
use crate::common::FilterParameters;
use crate::common::RandomSource;
use crate::common::XorShift64;
use crate::common::check_bucket_capacity;
use crate::common::check_fingerprint_length;
use crate::common::suggest_fingerprint_length;
use crate::common::suggest_num_buckets;
use crate::error::Error;
use crate::hash::DEFAULT_UPDATE_SEED;

/// Slots per bucket unless configured otherwise.
pub const DEFAULT_BUCKET_CAPACITY: usize = 4;

/// Relocations attempted before an insertion reports the filter full.
pub const DEFAULT_MAX_KICKS: u32 = 500;

/// Bucket indexes are derived from 32-bit hashes.
pub const MAX_BUCKET_COUNT: u64 = 1 << 32;

/// Upper bound on the total number of slots, 16 GiB of fingerprints.
pub const MAX_SLOT_COUNT: u64 = 1 << 32;

#[derive(Debug, Clone, Copy)]
enum Sizing {
    Accuracy {
        capacity: u64,
        error_rate: f64,
    },
    Size {
        bucket_count: u64,
        fingerprint_length: u8,
    },
}

/// Builder for creating [`CuckooFilter`] instances.
///
/// Provides two construction modes:
/// - [`with_accuracy()`](Self::with_accuracy): Specify expected items and false positive rate
///   (recommended)
/// - [`with_size()`](Self::with_size): Specify bucket count, bucket capacity and fingerprint
///   length (manual)
///
/// Nothing is validated until [`build()`](Self::build), which reports invalid settings as
/// [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid).
#[derive(Debug, Clone)]
pub struct CuckooFilterBuilder {
    sizing: Sizing,
    bucket_capacity: usize,
    max_kicks: u32,
    seed: u32,
    random_seed: Option<u64>,
}

impl CuckooFilterBuilder {
    /// Creates a builder sized for `capacity` elements at a target false positive rate.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sketchfilters::cuckoo::CuckooFilterBuilder;
    /// let filter = CuckooFilterBuilder::with_accuracy(10_000, 0.01)
    ///     .seed(42)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(filter.fingerprint_length(), 10);
    /// ```
    pub fn with_accuracy(capacity: u64, error_rate: f64) -> Self {
        Self::new(Sizing::Accuracy {
            capacity,
            error_rate,
        })
    }

    /// Creates a builder with explicit dimensions.
    ///
    /// `bucket_count` must be a power of two.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sketchfilters::cuckoo::CuckooFilterBuilder;
    /// let filter = CuckooFilterBuilder::with_size(1024, 4, 12).build().unwrap();
    /// assert_eq!(filter.capacity(), 4096);
    /// ```
    pub fn with_size(bucket_count: u64, bucket_capacity: usize, fingerprint_length: u8) -> Self {
        Self::new(Sizing::Size {
            bucket_count,
            fingerprint_length,
        })
        .bucket_capacity(bucket_capacity)
    }

    fn new(sizing: Sizing) -> Self {
        CuckooFilterBuilder {
            sizing,
            bucket_capacity: DEFAULT_BUCKET_CAPACITY,
            max_kicks: DEFAULT_MAX_KICKS,
            seed: DEFAULT_UPDATE_SEED,
            random_seed: None,
        }
    }

    /// Sets the number of slots per bucket (default: 4).
    pub fn bucket_capacity(mut self, bucket_capacity: usize) -> Self {
        self.bucket_capacity = bucket_capacity;
        self
    }

    /// Sets how many relocations an insertion may attempt (default: 500).
    pub fn max_kicks(mut self, max_kicks: u32) -> Self {
        self.max_kicks = max_kicks;
        self
    }

    /// Sets a custom hash seed (default: 9001).
    ///
    /// **Important**: Filters with different seeds never compare equal.
    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Seeds the generator used for eviction choices, making them reproducible.
    pub fn random_seed(mut self, random_seed: u64) -> Self {
        self.random_seed = Some(random_seed);
        self
    }

    /// Builds the filter with the default random source.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid) if any
    /// setting is out of range.
    pub fn build(self) -> Result<CuckooFilter<XorShift64>, Error> {
        let rng = self
            .random_seed
            .map(XorShift64::seeded)
            .unwrap_or_default();
        self.build_with_random(rng)
    }

    /// Builds the filter with a caller-supplied random source.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid) if any
    /// setting is out of range.
    pub fn build_with_random<R: RandomSource>(self, rng: R) -> Result<CuckooFilter<R>, Error> {
        let (parameters, bucket_count, fingerprint_length) = match self.sizing {
            Sizing::Accuracy {
                capacity,
                error_rate,
            } => {
                let parameters = FilterParameters::new(capacity, error_rate)?;
                let fingerprint_length =
                    suggest_fingerprint_length(self.bucket_capacity, error_rate)?;
                let bucket_count = suggest_num_buckets(capacity, self.bucket_capacity)?;
                (Some(parameters), bucket_count, fingerprint_length)
            }
            Sizing::Size {
                bucket_count,
                fingerprint_length,
            } => (None, bucket_count, fingerprint_length),
        };

        let bucket_count = validate_dimensions(
            bucket_count,
            self.bucket_capacity,
            fingerprint_length,
            self.max_kicks,
        )?;
        let table = BucketTable::new(bucket_count, self.bucket_capacity)?;

        debug!(
            bucket_count,
            bucket_capacity = self.bucket_capacity,
            fingerprint_length,
            max_kicks = self.max_kicks,
            "built cuckoo filter"
        );

        Ok(CuckooFilter::from_parts(
            self.seed,
            self.max_kicks,
            fingerprint_length,
            parameters,
            table,
            0,
            rng,
        ))
    }
}

/// Checks the dimensions shared by the builder and snapshot import, returning the bucket
/// count as an index type.
pub(super) fn validate_dimensions(
    bucket_count: u64,
    bucket_capacity: usize,
    fingerprint_length: u8,
    max_kicks: u32,
) -> Result<usize, Error> {
    check_bucket_capacity(bucket_capacity)?;
    check_fingerprint_length(fingerprint_length)?;
    if max_kicks == 0 {
        return Err(Error::config_invalid("max kicks must be greater than 0"));
    }
    if !bucket_count.is_power_of_two() || bucket_count > MAX_BUCKET_COUNT {
        return Err(Error::config_invalid(format!(
            "bucket count must be a power of two no greater than {MAX_BUCKET_COUNT}"
        ))
        .with_context("bucket_count", bucket_count));
    }
    // bucket_count <= 2^32 and bucket_capacity <= 255, so this cannot overflow
    if bucket_count * bucket_capacity as u64 > MAX_SLOT_COUNT {
        return Err(Error::config_invalid(format!(
            "total slot count must be no greater than {MAX_SLOT_COUNT}"
        ))
        .with_context("bucket_count", bucket_count)
        .with_context("bucket_capacity", bucket_capacity));
    }
    usize::try_from(bucket_count).map_err(|_| {
        Error::config_invalid("bucket count does not fit in usize")
            .with_context("bucket_count", bucket_count)
    })
}

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

//! Conversion from a desired (capacity, error rate) pair into filter dimensions.

use std::f64::consts::LN_2;

use crate::error::Error;

/// Largest fingerprint, in bits, a cuckoo filter can store.
pub const MAX_FINGERPRINT_LENGTH: u8 = 32;

/// Largest number of slots per cuckoo bucket.
pub const MAX_BUCKET_CAPACITY: usize = u8::MAX as usize;

/// The sizing request a filter was built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParameters {
    capacity: u64,
    error_rate: f64,
}

impl FilterParameters {
    /// Validates and wraps a sizing request.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid) if
    /// `capacity` is 0 or `error_rate` is not in `(0.0, 1.0)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sketchfilters::common::FilterParameters;
    ///
    /// let params = FilterParameters::new(1000, 0.01).unwrap();
    /// assert_eq!(params.capacity(), 1000);
    /// assert!(FilterParameters::new(0, 0.01).is_err());
    /// assert!(FilterParameters::new(1000, 1.0).is_err());
    /// ```
    pub fn new(capacity: u64, error_rate: f64) -> Result<Self, Error> {
        check_capacity(capacity)?;
        check_error_rate(error_rate)?;
        Ok(FilterParameters {
            capacity,
            error_rate,
        })
    }

    /// Expected maximum number of elements.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Target false positive rate.
    pub fn error_rate(&self) -> f64 {
        self.error_rate
    }
}

fn check_capacity(capacity: u64) -> Result<(), Error> {
    if capacity == 0 {
        return Err(Error::config_invalid("capacity must be greater than 0"));
    }
    Ok(())
}

fn check_error_rate(error_rate: f64) -> Result<(), Error> {
    // also rejects NaN
    if !(error_rate > 0.0 && error_rate < 1.0) {
        return Err(
            Error::config_invalid("error rate must be between 0.0 and 1.0 (exclusive)")
                .with_context("error_rate", error_rate),
        );
    }
    Ok(())
}

/// Suggests the bit-array size for a Bloom-style filter.
///
/// Formula: `m = ceil(-n * ln(p) / ln(2)^2)`
///
/// # Examples
///
/// ```
/// use sketchfilters::common::suggest_num_bits;
///
/// assert_eq!(suggest_num_bits(1000, 0.01).unwrap(), 9586);
/// ```
pub fn suggest_num_bits(capacity: u64, error_rate: f64) -> Result<u64, Error> {
    check_capacity(capacity)?;
    check_error_rate(error_rate)?;

    let n = capacity as f64;
    let bits = (-n * error_rate.ln() / (LN_2 * LN_2)).ceil();
    if bits >= u64::MAX as f64 {
        return Err(Error::config_invalid("bit-array size overflows u64")
            .with_context("capacity", capacity)
            .with_context("error_rate", error_rate));
    }
    Ok((bits as u64).max(1))
}

/// Suggests the number of hash functions for a Bloom-style filter of `num_bits` bits.
///
/// Formula: `k = round((m / n) * ln(2))`, at least 1.
///
/// # Examples
///
/// ```
/// use sketchfilters::common::suggest_num_hashes;
///
/// assert_eq!(suggest_num_hashes(1000, 9586).unwrap(), 7);
/// assert_eq!(suggest_num_hashes(1000, 10).unwrap(), 1);
/// ```
pub fn suggest_num_hashes(capacity: u64, num_bits: u64) -> Result<u32, Error> {
    check_capacity(capacity)?;
    if num_bits == 0 {
        return Err(Error::config_invalid("num_bits must be greater than 0"));
    }

    let k = (num_bits as f64 / capacity as f64 * LN_2).round();
    Ok((k as u32).max(1))
}

/// Suggests the fingerprint length, in bits, of a cuckoo filter.
///
/// Formula: `f = ceil(log2(2 * b / p))` where `b` is the bucket capacity.
///
/// # Errors
///
/// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid) if the
/// bucket capacity is out of range, the error rate is not in `(0.0, 1.0)`, or the requested
/// rate needs more than [`MAX_FINGERPRINT_LENGTH`] bits.
///
/// # Examples
///
/// ```
/// use sketchfilters::common::suggest_fingerprint_length;
///
/// // log2(800) ≈ 9.64
/// assert_eq!(suggest_fingerprint_length(4, 0.01).unwrap(), 10);
/// ```
pub fn suggest_fingerprint_length(bucket_capacity: usize, error_rate: f64) -> Result<u8, Error> {
    check_bucket_capacity(bucket_capacity)?;
    check_error_rate(error_rate)?;

    let bits = (2.0 * bucket_capacity as f64 / error_rate).log2().ceil();
    if bits > f64::from(MAX_FINGERPRINT_LENGTH) {
        return Err(Error::config_invalid(format!(
            "error rate needs fingerprints longer than {MAX_FINGERPRINT_LENGTH} bits"
        ))
        .with_context("bucket_capacity", bucket_capacity)
        .with_context("error_rate", error_rate));
    }
    Ok((bits as u8).max(1))
}

/// Suggests the number of buckets of a cuckoo filter.
///
/// Returns the smallest power of two `c` such that `capacity` items fill at most
/// [`max_load_percent`] of the `c * bucket_capacity` slots. Insertions start failing well
/// before every slot is taken, so a table with exactly `capacity` slots could not hold
/// `capacity` items.
///
/// # Examples
///
/// ```
/// use sketchfilters::common::suggest_num_buckets;
///
/// // 1000 items at 90% load need 278 buckets of 4
/// assert_eq!(suggest_num_buckets(1000, 4).unwrap(), 512);
/// // 10 items at 45% load need 23 buckets of 1
/// assert_eq!(suggest_num_buckets(10, 1).unwrap(), 32);
/// ```
pub fn suggest_num_buckets(capacity: u64, bucket_capacity: usize) -> Result<u64, Error> {
    check_capacity(capacity)?;
    check_bucket_capacity(bucket_capacity)?;

    let percent = u128::from(max_load_percent(bucket_capacity));
    let buckets = (u128::from(capacity) * 100).div_ceil(percent * bucket_capacity as u128);
    u64::try_from(buckets)
        .ok()
        .and_then(u64::checked_next_power_of_two)
        .ok_or_else(|| {
            Error::config_invalid("bucket count overflows u64").with_context("capacity", capacity)
        })
}

/// The highest load, in percent of all slots, a cuckoo filter is sized for.
///
/// With two candidate buckets the achievable load grows with the bucket capacity: about
/// 50% for single-slot buckets, 84% for 2 slots, 95% for 4 and 98% for 8. The targets stay
/// a few points below those thresholds so a filter reliably holds its sized capacity.
pub fn max_load_percent(bucket_capacity: usize) -> u8 {
    match bucket_capacity {
        0 | 1 => 45,
        2 => 80,
        3 => 85,
        4..=7 => 90,
        _ => 95,
    }
}

pub(crate) fn check_bucket_capacity(bucket_capacity: usize) -> Result<(), Error> {
    if bucket_capacity == 0 || bucket_capacity > MAX_BUCKET_CAPACITY {
        return Err(Error::config_invalid(format!(
            "bucket capacity must be in 1..={MAX_BUCKET_CAPACITY}"
        ))
        .with_context("bucket_capacity", bucket_capacity));
    }
    Ok(())
}

pub(crate) fn check_fingerprint_length(fingerprint_length: u8) -> Result<(), Error> {
    if fingerprint_length == 0 || fingerprint_length > MAX_FINGERPRINT_LENGTH {
        return Err(Error::config_invalid(format!(
            "fingerprint length must be in 1..={MAX_FINGERPRINT_LENGTH}"
        ))
        .with_context("fingerprint_length", fingerprint_length));
    }
    Ok(())
}

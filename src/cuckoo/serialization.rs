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

use std::io;

use crate::error::Error;

pub(super) const PREAMBLE_LONGS_EMPTY: u8 = 5;
pub(super) const PREAMBLE_LONGS_STANDARD: u8 = 6;
pub(super) const SERIAL_VERSION: u8 = 1;
pub(super) const FLAGS_IS_EMPTY: u8 = 1 << 0;
pub(super) const FLAGS_HAS_PARAMETERS: u8 = 1 << 1;
pub(super) const FLAGS_KNOWN: u8 = FLAGS_IS_EMPTY | FLAGS_HAS_PARAMETERS;
pub(super) const LONG_SIZE_BYTES: usize = 8;
pub(super) const FINGERPRINT_SIZE_BYTES: usize = 4;

/// Maps a short read of `field` into a format-mismatch error carrying the I/O cause.
pub(super) fn insufficient(field: &'static str) -> impl FnOnce(io::Error) -> Error {
    move |err| Error::insufficient_data(field).set_source(err)
}

/// Re-tags a dimension check failure found while importing a snapshot.
pub(super) fn invalid_dimensions(err: Error) -> Error {
    Error::format_mismatch(format!("invalid dimensions: {}", err.message()))
}

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

//! Sizing and randomness shared by the filters in this crate.

mod random;
mod sizing;

pub use self::random::RandomSource;
pub use self::random::XorShift64;
pub use self::sizing::FilterParameters;
pub use self::sizing::MAX_BUCKET_CAPACITY;
pub use self::sizing::MAX_FINGERPRINT_LENGTH;
pub use self::sizing::max_load_percent;
pub use self::sizing::suggest_fingerprint_length;
pub use self::sizing::suggest_num_bits;
pub use self::sizing::suggest_num_buckets;
pub use self::sizing::suggest_num_hashes;

pub(crate) use self::sizing::check_bucket_capacity;
pub(crate) use self::sizing::check_fingerprint_length;

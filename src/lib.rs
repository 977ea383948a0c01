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

//! Probabilistic membership filters.
//!
//! The [`cuckoo`] module provides a cuckoo filter: approximate set membership with a
//! tunable false positive rate, no false negatives, and support for removal. The
//! [`common`] module exposes the sizing helpers used to dimension it, and [`hash`] the
//! seeded hashing it is built on.
//!
//! Filters serialize to a compact little-endian binary format and can be restored from it.
//!
//! This crate emits diagnostics through [`tracing`]; install a subscriber to see them.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]

pub(crate) mod codec;
pub mod common;
pub mod cuckoo;
pub mod error;
pub mod hash;

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

//! Bloom filter for approximate set membership.
//!
//! A Bloom filter answers "have I seen this item?" with one-sided error: an item that was
//! inserted is always reported as present, while an item that was never inserted is reported as
//! present with probability close to the configured false positive rate (as long as no more than
//! the expected number of items were inserted). Bits are only ever set, never cleared, so the
//! filter has no delete operation.
//!
//! # Usage
//!
//! ```rust
//! # use logsketch::bloom::BloomFilter;
//! let mut filter = BloomFilter::new(1000, 0.01).unwrap();
//! filter.insert(b"2023-04-15T10:20:30Z-10.0.0.1-alice");
//! assert!(filter.contains(b"2023-04-15T10:20:30Z-10.0.0.1-alice"));
//! ```
//!
//! # Sizing
//!
//! For `n` expected items and a target rate `p` the filter uses
//! `m = ceil(-n * ln(p) / ln(2)^2)` bits and `k = max(1, round(m / n * ln(2)))` hash functions.
//!
//! ```rust
//! # use logsketch::bloom::BloomFilter;
//! let filter = BloomFilter::new(1000, 0.01).unwrap();
//! assert_eq!(filter.num_bits(), 9586);
//! assert_eq!(filter.num_hashes(), 7);
//! ```

mod sketch;
pub use self::sketch::BloomFilter;

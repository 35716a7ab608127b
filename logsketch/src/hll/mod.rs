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

//! HyperLogLog sketch for approximate distinct counting.
//!
//! The sketch keeps `2^p` one-byte registers. Each item is hashed to 64 bits; the top `p` bits
//! select a register and the position of the first set bit in the remaining bits (leading zero
//! count plus one) is folded into that register with `max`. Registers therefore only grow.
//!
//! # Accuracy
//!
//! The relative standard error is about `1.04 / sqrt(2^p)`:
//!
//! | Precision | Registers | Error  |
//! |-----------|-----------|--------|
//! | 4         | 16        | ~26%   |
//! | 10        | 1024      | ~3.3%  |
//! | 14        | 16384     | ~0.81% |
//! | 16        | 65536     | ~0.41% |
//!
//! Small cardinalities use linear counting. Because the hash is 64 bits wide, the large-range
//! correction needed by 32-bit variants never applies.
//!
//! # Usage
//!
//! ```rust
//! # use logsketch::hll::HllSketch;
//! let mut users = HllSketch::new(14).unwrap();
//! for user in ["alice", "bob", "carol", "alice"] {
//!     users.update(user.as_bytes());
//! }
//! assert_eq!(users.estimate(), 3);
//! ```
//!
//! # Merging
//!
//! Sketches with the same precision merge losslessly: the result is the sketch that would have
//! been built from the union of both streams.
//!
//! ```rust
//! # use logsketch::hll::HllSketch;
//! let mut left = HllSketch::new(12).unwrap();
//! let mut right = HllSketch::new(12).unwrap();
//! left.update(b"a");
//! right.update(b"a");
//! right.update(b"b");
//! left.merge(&right).unwrap();
//! assert_eq!(left.estimate(), 2);
//! ```

mod sketch;
pub use self::sketch::HllSketch;

/// Smallest supported precision.
pub const MIN_PRECISION: u8 = 4;
/// Largest supported precision.
pub const MAX_PRECISION: u8 = 16;

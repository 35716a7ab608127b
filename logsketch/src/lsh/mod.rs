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

//! Banded locality-sensitive hashing over MinHash signatures.
//!
//! A signature of length `bands * rows` is cut into `bands` contiguous chunks of `rows` values.
//! Each chunk is hashed to a bucket key in its band's table. Two signatures become candidates
//! when they share a bucket in at least one band, which for true similarity `s` happens with
//! probability `1 - (1 - s^rows)^bands`. More rows per band sharpen precision, more bands raise
//! recall.
//!
//! The index also keeps every inserted signature so candidates can be verified against real
//! signature agreement instead of being trusted blindly.
//!
//! # Usage
//!
//! ```rust
//! # use logsketch::lsh::LshIndex;
//! # use logsketch::minhash::MinHasher;
//! # use logsketch::minhash::shingles;
//! let hasher = MinHasher::new(100).unwrap();
//! let mut index = LshIndex::new(100, 20, 5).unwrap();
//! let sig = hasher.signature(&shingles("failed to connect to database after 30 seconds", 3));
//! index.insert(7, sig.clone()).unwrap();
//! assert!(index.query(&sig).unwrap().contains(&7));
//! ```

mod index;
pub use self::index::LshIndex;
pub use self::index::collision_probability;

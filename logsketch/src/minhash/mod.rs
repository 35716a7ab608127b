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

//! MinHash signatures for estimating Jaccard similarity between token sets.
//!
//! A [`MinHasher`] fixes `num_hashes` seeded hash functions. The signature of a set of tokens
//! records, for each function, the smallest hash value seen over the set. For two sets `A` and
//! `B`, each position agrees with probability `|A ∩ B| / |A ∪ B|`, so the fraction of equal
//! positions is an unbiased estimate of their Jaccard similarity with standard error about
//! `1 / sqrt(num_hashes)`.
//!
//! Tokens are arbitrary byte strings. [`shingles`] turns free text into the word shingles used
//! by the log analyzer, but any finite token set works.
//!
//! # Usage
//!
//! ```rust
//! # use logsketch::minhash::MinHasher;
//! # use logsketch::minhash::shingles;
//! let hasher = MinHasher::new(128).unwrap();
//! let a = hasher.signature(&shingles("connection reset by peer on port 5432", 3));
//! let b = hasher.signature(&shingles("connection reset by peer on port 5432", 3));
//! assert_eq!(hasher.estimated_jaccard(&a, &b).unwrap(), 1.0);
//! ```

mod shingle;
mod signature;

pub use self::shingle::shingles;
pub use self::signature::MinHashSignature;
pub use self::signature::MinHasher;

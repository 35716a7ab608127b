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

//! Seeded 64-bit hashing shared by every sketch.
//!
//! All structures hash raw bytes with MurmurHash3 x64/128. A [`HashFamily`] turns that single
//! algorithm into `k` hash functions by seeding function `i` with `seed + i`, which is enough
//! independence for the error bounds of the Bloom filter, the Count-Min sketch and MinHash.

mod family;
mod murmurhash;

pub use self::family::HashFamily;
pub use self::murmurhash::murmurhash3_x64_128;

/// Seed used when a structure is not given an explicit one.
pub const DEFAULT_UPDATE_SEED: u64 = 9001;

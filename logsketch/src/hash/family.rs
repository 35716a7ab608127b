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

use crate::error::Error;
use crate::hash::DEFAULT_UPDATE_SEED;
use crate::hash::murmurhash3_x64_128;

/// A fixed family of `k` seeded 64-bit hash functions.
///
/// Function `i` is MurmurHash3 x64/128 seeded with `seed + i`, keeping the lower 64 bits. The
/// family is immutable once built and every value is a pure function of `(data, i, seed)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashFamily {
    num_hashes: u32,
    seed: u64,
}

impl HashFamily {
    /// Creates a family of `num_hashes` functions with the default seed.
    pub fn new(num_hashes: u32) -> Result<Self, Error> {
        Self::with_seed(num_hashes, DEFAULT_UPDATE_SEED)
    }

    /// Creates a family of `num_hashes` functions derived from `seed`.
    pub fn with_seed(num_hashes: u32, seed: u64) -> Result<Self, Error> {
        if num_hashes == 0 {
            return Err(Error::invalid_argument(
                "hash family needs at least one function",
            ));
        }
        Ok(Self { num_hashes, seed })
    }

    /// Returns the number of functions `k`.
    pub fn num_hashes(&self) -> u32 {
        self.num_hashes
    }

    /// Returns the base seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the value of function `index` for `data`.
    #[inline]
    pub fn hash(&self, data: &[u8], index: u32) -> u64 {
        debug_assert!(index < self.num_hashes, "hash index out of range");
        murmurhash3_x64_128(data, self.seed.wrapping_add(index as u64)).0
    }

    /// Returns the `k` values for `data`, in function order.
    pub fn hashes<'a>(&self, data: &'a [u8]) -> impl Iterator<Item = u64> + use<'a> {
        let family = *self;
        (0..self.num_hashes).map(move |index| family.hash(data, index))
    }

    /// Collects the `k` values for `data`.
    pub fn values_for(&self, data: &[u8]) -> Vec<u64> {
        self.hashes(data).collect()
    }
}

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

use std::f64::consts::LN_2;

use crate::error::Error;
use crate::hash::DEFAULT_UPDATE_SEED;
use crate::hash::HashFamily;

/// Bloom filter over arbitrary byte strings.
///
/// See [`crate::bloom`] for an overview and sizing rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BloomFilter {
    num_bits: u64,
    hashes: HashFamily,
    bits: Vec<u64>,
}

impl BloomFilter {
    /// Creates a filter sized for `expected_items` at the given false positive rate.
    ///
    /// Fails with [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument) if
    /// `expected_items` is zero or `false_positive_rate` is not in `(0, 1)`.
    pub fn new(expected_items: u64, false_positive_rate: f64) -> Result<Self, Error> {
        Self::with_seed(expected_items, false_positive_rate, DEFAULT_UPDATE_SEED)
    }

    /// Creates a filter like [`BloomFilter::new`] with an explicit hash seed.
    pub fn with_seed(
        expected_items: u64,
        false_positive_rate: f64,
        seed: u64,
    ) -> Result<Self, Error> {
        if expected_items == 0 {
            return Err(Error::invalid_argument("expected_items must be at least 1"));
        }
        if !(false_positive_rate > 0.0 && false_positive_rate < 1.0) {
            return Err(Error::invalid_argument(format!(
                "false_positive_rate must be in (0, 1), got {false_positive_rate}"
            )));
        }
        let num_bits = Self::suggest_num_bits(expected_items, false_positive_rate);
        let words = usize::try_from(num_bits.div_ceil(64))
            .ok()
            .filter(|_| required_bits(expected_items, false_positive_rate) < u64::MAX as f64);
        let Some(words) = words else {
            return Err(Error::invalid_argument(format!(
                "{expected_items} items at rate {false_positive_rate} need more bits than can be \
                 addressed"
            ))
            .with_context("expected_items", expected_items)
            .with_context("false_positive_rate", false_positive_rate));
        };
        let num_hashes = Self::suggest_num_hashes(num_bits, expected_items);
        let hashes = HashFamily::with_seed(num_hashes, seed)?;
        Ok(Self {
            num_bits,
            hashes,
            bits: vec![0u64; words],
        })
    }

    /// Returns the bit array length `m` for `n` items at rate `p`.
    ///
    /// Saturates at `u64::MAX`; [`BloomFilter::new`] rejects parameters that large.
    pub fn suggest_num_bits(expected_items: u64, false_positive_rate: f64) -> u64 {
        (required_bits(expected_items, false_positive_rate).ceil() as u64).max(1)
    }

    /// Returns the hash function count `k` for `m` bits and `n` items.
    pub fn suggest_num_hashes(num_bits: u64, expected_items: u64) -> u32 {
        let k = (num_bits as f64 / expected_items as f64 * LN_2).round();
        (k as u32).max(1)
    }

    /// Returns the number of bits `m`.
    pub fn num_bits(&self) -> u64 {
        self.num_bits
    }

    /// Returns the number of hash functions `k`.
    pub fn num_hashes(&self) -> u32 {
        self.hashes.num_hashes()
    }

    /// Returns the hash seed.
    pub fn seed(&self) -> u64 {
        self.hashes.seed()
    }

    /// Returns the number of bits currently set.
    pub fn bits_used(&self) -> u64 {
        self.bits.iter().map(|word| word.count_ones() as u64).sum()
    }

    /// Returns true if no item was ever inserted.
    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|&word| word == 0)
    }

    /// Inserts an item.
    pub fn insert(&mut self, item: &[u8]) {
        for hash in self.hashes.hashes(item) {
            let (word, mask) = self.locate(hash);
            self.bits[word] |= mask;
        }
    }

    /// Returns true if the item may have been inserted.
    ///
    /// A `false` answer is always exact.
    pub fn contains(&self, item: &[u8]) -> bool {
        self.hashes.hashes(item).all(|hash| {
            let (word, mask) = self.locate(hash);
            self.bits[word] & mask != 0
        })
    }

    /// Inserts an item and returns whether it may have been present before.
    ///
    /// Equivalent to `contains` followed by `insert`, but hashes the item once.
    pub fn check_and_insert(&mut self, item: &[u8]) -> bool {
        let mut present = true;
        for hash in self.hashes.hashes(item) {
            let (word, mask) = self.locate(hash);
            if self.bits[word] & mask == 0 {
                present = false;
                self.bits[word] |= mask;
            }
        }
        present
    }

    /// Returns the false positive probability implied by the current fill ratio.
    pub fn estimated_false_positive_rate(&self) -> f64 {
        let fill = self.bits_used() as f64 / self.num_bits as f64;
        fill.powi(self.num_hashes() as i32)
    }

    /// Merges another filter of identical shape into this one (bitwise union).
    ///
    /// Fails with [`ErrorKind::ShapeMismatch`](crate::error::ErrorKind::ShapeMismatch) if the
    /// filters differ in bit length, hash count or seed.
    pub fn merge(&mut self, other: &Self) -> Result<(), Error> {
        if self.num_bits != other.num_bits || self.hashes != other.hashes {
            return Err(Error::shape_mismatch(
                format!(
                    "bits={}, hashes={}, seed={}",
                    self.num_bits,
                    self.num_hashes(),
                    self.seed()
                ),
                format!(
                    "bits={}, hashes={}, seed={}",
                    other.num_bits,
                    other.num_hashes(),
                    other.seed()
                ),
            ));
        }
        for (word, other_word) in self.bits.iter_mut().zip(other.bits.iter()) {
            *word |= *other_word;
        }
        Ok(())
    }

    #[inline]
    fn locate(&self, hash: u64) -> (usize, u64) {
        let position = hash % self.num_bits;
        ((position / 64) as usize, 1u64 << (position % 64))
    }
}

fn required_bits(expected_items: u64, false_positive_rate: f64) -> f64 {
    -(expected_items as f64) * false_positive_rate.ln() / (LN_2 * LN_2)
}

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
use crate::hll::MAX_PRECISION;
use crate::hll::MIN_PRECISION;

/// HyperLogLog sketch with one byte per register.
///
/// See [`crate::hll`] for an overview and error guarantees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HllSketch {
    precision: u8,
    seed: u64,
    registers: Box<[u8]>,
}

impl HllSketch {
    /// Creates an empty sketch with `2^precision` registers.
    ///
    /// Fails with [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument) if
    /// `precision` is not in `[4, 16]`.
    pub fn new(precision: u8) -> Result<Self, Error> {
        Self::with_seed(precision, DEFAULT_UPDATE_SEED)
    }

    /// Creates an empty sketch with an explicit hash seed.
    pub fn with_seed(precision: u8, seed: u64) -> Result<Self, Error> {
        if !(MIN_PRECISION..=MAX_PRECISION).contains(&precision) {
            return Err(Error::invalid_argument(format!(
                "precision must be in [{MIN_PRECISION}, {MAX_PRECISION}], got {precision}"
            )));
        }
        Ok(Self {
            precision,
            seed,
            registers: vec![0u8; 1 << precision].into_boxed_slice(),
        })
    }

    /// Returns the precision `p`.
    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// Returns the number of registers `m = 2^p`.
    pub fn num_registers(&self) -> usize {
        self.registers.len()
    }

    /// Returns the register contents.
    pub fn registers(&self) -> &[u8] {
        &self.registers
    }

    /// Returns the relative standard error `1.04 / sqrt(m)`.
    pub fn relative_error(&self) -> f64 {
        1.04 / (self.registers.len() as f64).sqrt()
    }

    /// Returns true if no item was added.
    pub fn is_empty(&self) -> bool {
        self.registers.iter().all(|&r| r == 0)
    }

    /// Adds an item.
    pub fn update(&mut self, item: &[u8]) {
        let (hash, _) = murmurhash3_x64_128(item, self.seed);
        self.update_hash(hash);
    }

    fn update_hash(&mut self, hash: u64) {
        let p = self.precision as u32;
        let index = (hash >> (64 - p)) as usize;
        // The guard bit caps the run length at 64 - p + 1 when the remaining bits are all zero.
        let rest = (hash << p) | (1u64 << (p - 1));
        let rank = rest.leading_zeros() as u8 + 1;
        if rank > self.registers[index] {
            self.registers[index] = rank;
        }
    }

    /// Returns the uncorrected estimate `alpha_m * m^2 / sum(2^-register[i])`.
    pub fn raw_estimate(&self) -> f64 {
        let m = self.registers.len() as f64;
        let sum: f64 = self
            .registers
            .iter()
            .map(|&r| 2f64.powi(-(r as i32)))
            .sum();
        alpha(self.registers.len()) * m * m / sum
    }

    /// Returns the estimated number of distinct items added.
    ///
    /// Uses linear counting `m * ln(m / zeros)` while the raw estimate is at most `2.5 * m` and
    /// empty registers remain, the raw estimate otherwise.
    pub fn estimate(&self) -> u64 {
        let m = self.registers.len() as f64;
        let raw = self.raw_estimate();
        let zeros = self.registers.iter().filter(|&&r| r == 0).count();
        let estimate = if raw <= 2.5 * m && zeros > 0 {
            m * (m / zeros as f64).ln()
        } else {
            raw
        };
        estimate.round() as u64
    }

    /// Merges another sketch into this one by taking the register-wise maximum.
    ///
    /// Fails with [`ErrorKind::ShapeMismatch`](crate::error::ErrorKind::ShapeMismatch) if the
    /// sketches differ in precision or seed.
    pub fn merge(&mut self, other: &Self) -> Result<(), Error> {
        if self.precision != other.precision || self.seed != other.seed {
            return Err(Error::shape_mismatch(
                format!("precision={}, seed={}", self.precision, self.seed),
                format!("precision={}, seed={}", other.precision, other.seed),
            ));
        }
        for (register, other_register) in self.registers.iter_mut().zip(other.registers.iter()) {
            *register = (*register).max(*other_register);
        }
        Ok(())
    }
}

fn alpha(num_registers: usize) -> f64 {
    match num_registers {
        16 => 0.673,
        32 => 0.697,
        64 => 0.709,
        m => 0.7213 / (1.0 + 1.079 / m as f64),
    }
}

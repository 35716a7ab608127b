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

use std::f64::consts::E;

use crate::error::Error;
use crate::hash::DEFAULT_UPDATE_SEED;
use crate::hash::HashFamily;

/// Count-Min sketch with saturating `u32` counters.
///
/// See [`crate::countmin`] for an overview and error guarantees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountMinSketch {
    width: u32,
    hashes: HashFamily,
    total_weight: u64,
    counters: Vec<u32>,
}

impl CountMinSketch {
    /// Creates a sketch from a relative error `epsilon` and failure probability `delta`.
    ///
    /// Fails with [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument) if
    /// either parameter is not in `(0, 1)`.
    pub fn new(epsilon: f64, delta: f64) -> Result<Self, Error> {
        if !(epsilon > 0.0 && epsilon < 1.0) {
            return Err(Error::invalid_argument(format!(
                "epsilon must be in (0, 1), got {epsilon}"
            )));
        }
        if !(delta > 0.0 && delta < 1.0) {
            return Err(Error::invalid_argument(format!(
                "delta must be in (0, 1), got {delta}"
            )));
        }
        if E / epsilon > u32::MAX as f64 {
            return Err(Error::invalid_argument(format!(
                "epsilon {epsilon} needs a row wider than {} counters",
                u32::MAX
            ))
            .with_context("epsilon", epsilon));
        }
        Self::with_dimensions(Self::suggest_width(epsilon), Self::suggest_depth(delta))
    }

    /// Creates a sketch with explicit `width` (counters per row) and `depth` (rows).
    pub fn with_dimensions(width: u32, depth: u32) -> Result<Self, Error> {
        Self::with_seed(width, depth, DEFAULT_UPDATE_SEED)
    }

    /// Creates a sketch with explicit dimensions and hash seed.
    pub fn with_seed(width: u32, depth: u32, seed: u64) -> Result<Self, Error> {
        if width == 0 {
            return Err(Error::invalid_argument("width must be at least 1"));
        }
        if depth == 0 {
            return Err(Error::invalid_argument("depth must be at least 1"));
        }
        let hashes = HashFamily::with_seed(depth, seed)?;
        Ok(Self {
            width,
            hashes,
            total_weight: 0,
            counters: vec![0; width as usize * depth as usize],
        })
    }

    /// Suggests the row width for a relative error: `ceil(e / epsilon)`.
    ///
    /// Saturates at `u32::MAX`; [`CountMinSketch::new`] rejects an `epsilon` that small.
    pub fn suggest_width(epsilon: f64) -> u32 {
        (E / epsilon).ceil() as u32
    }

    /// Suggests the row count for a failure probability: `ceil(ln(1 / delta))`.
    pub fn suggest_depth(delta: f64) -> u32 {
        ((1.0 / delta).ln().ceil() as u32).max(1)
    }

    /// Returns the number of counters per row.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the number of rows.
    pub fn depth(&self) -> u32 {
        self.hashes.num_hashes()
    }

    /// Returns the hash seed.
    pub fn seed(&self) -> u64 {
        self.hashes.seed()
    }

    /// Returns the relative error `e / width` of this sketch.
    pub fn relative_error(&self) -> f64 {
        E / self.width as f64
    }

    /// Returns the sum of all counts added (saturating).
    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    /// Returns true if nothing was added.
    pub fn is_empty(&self) -> bool {
        self.total_weight == 0
    }

    /// Adds one occurrence of `item`.
    pub fn update(&mut self, item: &[u8]) {
        self.add(item, 1);
    }

    /// Adds `count` occurrences of `item`. A count of zero is a no-op.
    pub fn add(&mut self, item: &[u8], count: u32) {
        if count == 0 {
            return;
        }
        self.total_weight = self.total_weight.saturating_add(count as u64);
        let width = self.width as usize;
        for (row, hash) in self.hashes.hashes(item).enumerate() {
            let cell = row * width + (hash % self.width as u64) as usize;
            self.counters[cell] = self.counters[cell].saturating_add(count);
        }
    }

    /// Returns the estimated count of `item`: the minimum of its counters across rows.
    pub fn estimate(&self, item: &[u8]) -> u32 {
        let width = self.width as usize;
        self.hashes
            .hashes(item)
            .enumerate()
            .map(|(row, hash)| self.counters[row * width + (hash % self.width as u64) as usize])
            .min()
            .unwrap_or(0)
    }

    /// Returns `estimate(item) + epsilon * total_weight`, the bound that holds with
    /// probability `1 - delta`.
    pub fn upper_bound(&self, item: &[u8]) -> u64 {
        self.estimate(item) as u64 + (self.relative_error() * self.total_weight as f64) as u64
    }

    /// Merges another sketch of identical shape into this one.
    ///
    /// Fails with [`ErrorKind::ShapeMismatch`](crate::error::ErrorKind::ShapeMismatch) if the
    /// sketches differ in width, depth or seed.
    pub fn merge(&mut self, other: &Self) -> Result<(), Error> {
        if self.width != other.width || self.hashes != other.hashes {
            return Err(Error::shape_mismatch(
                format!(
                    "width={}, depth={}, seed={}",
                    self.width,
                    self.depth(),
                    self.seed()
                ),
                format!(
                    "width={}, depth={}, seed={}",
                    other.width,
                    other.depth(),
                    other.seed()
                ),
            ));
        }
        for (counter, other_counter) in self.counters.iter_mut().zip(other.counters.iter()) {
            *counter = counter.saturating_add(*other_counter);
        }
        self.total_weight = self.total_weight.saturating_add(other.total_weight);
        Ok(())
    }
}

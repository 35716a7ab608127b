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

use serde::Deserialize;
use serde::Serialize;

use crate::error::Error;
use crate::hll::MAX_PRECISION;
use crate::hll::MIN_PRECISION;

/// Construction-time configuration of a [`StreamAnalyzer`](crate::analyzer::StreamAnalyzer).
///
/// Every field has a default, so a partial document deserializes into a complete config.
///
/// ```rust
/// # use logsketch::analyzer::AnalyzerConfig;
/// let config = AnalyzerConfig::default();
/// assert_eq!(config.num_hashes, config.bands * config.rows);
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Sizing of the duplicate filter.
    pub dedup: DedupConfig,
    /// Shape of the per-category frequency sketch.
    pub frequency: FrequencyConfig,
    /// HyperLogLog precision for distinct users.
    pub user_precision: u8,
    /// HyperLogLog precision for distinct sessions.
    pub session_precision: u8,
    /// MinHash signature length for error messages.
    pub num_hashes: u32,
    /// LSH band count; `bands * rows` must equal `num_hashes`.
    pub bands: u32,
    /// LSH rows per band.
    pub rows: u32,
    /// Words per shingle when tokenizing error messages.
    pub shingle_size: usize,
    /// Records with a status at or above this value are error records.
    pub error_status_threshold: u16,
    /// Categories whose estimated count reaches this value are tracked as trending.
    pub heavy_hitter_threshold: u32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            dedup: DedupConfig::default(),
            frequency: FrequencyConfig::default(),
            user_precision: 14,
            session_precision: 14,
            num_hashes: 100,
            bands: 20,
            rows: 5,
            shingle_size: 3,
            error_status_threshold: 400,
            heavy_hitter_threshold: 100,
        }
    }
}

/// Bloom filter sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    pub expected_elements: u64,
    pub false_positive_rate: f64,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            expected_elements: 1_000_000,
            false_positive_rate: 0.01,
        }
    }
}

/// Count-Min sketch shape, either from error bounds or from explicit dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyConfig {
    Bounds { epsilon: f64, delta: f64 },
    Dimensions { width: u32, depth: u32 },
}

impl Default for FrequencyConfig {
    fn default() -> Self {
        FrequencyConfig::Dimensions {
            width: 10_000,
            depth: 5,
        }
    }
}

impl AnalyzerConfig {
    /// Checks every field without allocating any structure.
    ///
    /// Returns the first offending field as an
    /// [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument) error carrying a
    /// `field` context entry.
    pub fn validate(&self) -> Result<(), Error> {
        if self.dedup.expected_elements == 0 {
            return Err(invalid("dedup.expected_elements", "must be at least 1"));
        }
        if !in_open_unit(self.dedup.false_positive_rate) {
            return Err(invalid("dedup.false_positive_rate", "must be in (0, 1)"));
        }
        match self.frequency {
            FrequencyConfig::Bounds { epsilon, delta } => {
                if !in_open_unit(epsilon) {
                    return Err(invalid("frequency.epsilon", "must be in (0, 1)"));
                }
                if !in_open_unit(delta) {
                    return Err(invalid("frequency.delta", "must be in (0, 1)"));
                }
            }
            FrequencyConfig::Dimensions { width, depth } => {
                if width == 0 {
                    return Err(invalid("frequency.width", "must be at least 1"));
                }
                if depth == 0 {
                    return Err(invalid("frequency.depth", "must be at least 1"));
                }
            }
        }
        for (field, precision) in [
            ("user_precision", self.user_precision),
            ("session_precision", self.session_precision),
        ] {
            if !(MIN_PRECISION..=MAX_PRECISION).contains(&precision) {
                return Err(invalid(field, "must be in [4, 16]"));
            }
        }
        if self.num_hashes == 0 {
            return Err(invalid("num_hashes", "must be at least 1"));
        }
        if self.bands == 0 || self.rows == 0 {
            return Err(invalid("bands", "bands and rows must be at least 1"));
        }
        if self.bands.checked_mul(self.rows) != Some(self.num_hashes) {
            return Err(invalid("bands", "bands * rows must equal num_hashes"));
        }
        if self.shingle_size == 0 {
            return Err(invalid("shingle_size", "must be at least 1"));
        }
        if self.heavy_hitter_threshold == 0 {
            return Err(invalid("heavy_hitter_threshold", "must be at least 1"));
        }
        Ok(())
    }
}

fn in_open_unit(value: f64) -> bool {
    value > 0.0 && value < 1.0
}

fn invalid(field: &'static str, reason: &str) -> Error {
    Error::invalid_argument(format!("{field} {reason}")).with_context("field", field)
}

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

use std::collections::BTreeSet;
use std::collections::HashMap;

use crate::error::Error;
use crate::hash::murmurhash3_x64_128;
use crate::minhash::MinHashSignature;

/// Returns the probability that two signatures with true similarity `similarity` share at
/// least one band bucket: `1 - (1 - s^rows)^bands`.
pub fn collision_probability(similarity: f64, bands: u32, rows: u32) -> f64 {
    1.0 - (1.0 - similarity.powi(rows as i32)).powi(bands as i32)
}

/// Banded LSH index keyed by caller-assigned ids.
///
/// See [`crate::lsh`] for an overview.
#[derive(Debug, Clone)]
pub struct LshIndex {
    bands: u32,
    rows: u32,
    tables: Vec<HashMap<u64, Vec<u64>>>,
    signatures: HashMap<u64, MinHashSignature>,
}

impl LshIndex {
    /// Creates an index for signatures of length `num_hashes` split into `bands` x `rows`.
    ///
    /// Fails with [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument)
    /// unless `bands * rows == num_hashes` with both factors positive.
    pub fn new(num_hashes: u32, bands: u32, rows: u32) -> Result<Self, Error> {
        if bands == 0 || rows == 0 {
            return Err(Error::invalid_argument(format!(
                "bands and rows must be at least 1, got bands={bands}, rows={rows}"
            )));
        }
        if bands.checked_mul(rows) != Some(num_hashes) {
            return Err(Error::invalid_argument(format!(
                "bands * rows must equal num_hashes, got {bands} * {rows} != {num_hashes}"
            )));
        }
        Ok(Self {
            bands,
            rows,
            tables: (0..bands).map(|_| HashMap::new()).collect(),
            signatures: HashMap::new(),
        })
    }

    /// Returns the number of bands.
    pub fn bands(&self) -> u32 {
        self.bands
    }

    /// Returns the number of rows per band.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Returns the number of indexed signatures.
    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    /// Returns true if nothing was indexed.
    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    /// Returns the signature stored for `id`.
    pub fn signature(&self, id: u64) -> Option<&MinHashSignature> {
        self.signatures.get(&id)
    }

    /// Indexes `signature` under `id`.
    ///
    /// Fails with [`ErrorKind::ShapeMismatch`](crate::error::ErrorKind::ShapeMismatch) if the
    /// signature length is not `bands * rows`, and with
    /// [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument) if `id` is
    /// already indexed.
    pub fn insert(&mut self, id: u64, signature: MinHashSignature) -> Result<(), Error> {
        self.check_shape(&signature)?;
        if self.signatures.contains_key(&id) {
            return Err(Error::invalid_argument("id is already indexed").with_context("id", id));
        }
        for (band, key) in band_keys(&signature, self.rows).enumerate() {
            self.tables[band].entry(key).or_default().push(id);
        }
        self.signatures.insert(id, signature);
        Ok(())
    }

    /// Returns the ids sharing at least one band bucket with `signature`.
    ///
    /// Candidates are unverified: some may be dissimilar, and similar items can be missed with
    /// the probability given by [`collision_probability`].
    pub fn query(&self, signature: &MinHashSignature) -> Result<BTreeSet<u64>, Error> {
        self.check_shape(signature)?;
        let mut candidates = BTreeSet::new();
        for (band, key) in band_keys(signature, self.rows).enumerate() {
            if let Some(ids) = self.tables[band].get(&key) {
                candidates.extend(ids.iter().copied());
            }
        }
        Ok(candidates)
    }

    /// Returns `(id, similarity)` for every candidate whose stored signature agrees with
    /// `signature` on at least `threshold` of its positions, ordered by id.
    pub fn similar(
        &self,
        signature: &MinHashSignature,
        threshold: f64,
    ) -> Result<Vec<(u64, f64)>, Error> {
        let mut matches = vec![];
        for id in self.query(signature)? {
            let Some(stored) = self.signatures.get(&id) else {
                continue;
            };
            let similarity = signature.jaccard(stored)?;
            if similarity >= threshold {
                matches.push((id, similarity));
            }
        }
        Ok(matches)
    }

    fn check_shape(&self, signature: &MinHashSignature) -> Result<(), Error> {
        let expected = (self.bands * self.rows) as usize;
        if signature.len() != expected {
            return Err(Error::shape_mismatch(
                format!("signature length {expected}"),
                format!("signature length {}", signature.len()),
            ));
        }
        Ok(())
    }
}

fn band_keys(signature: &MinHashSignature, rows: u32) -> impl Iterator<Item = u64> + '_ {
    signature.values().chunks_exact(rows as usize).map(band_key)
}

// Distinct chunks colliding on the 64-bit key only add candidates, which callers verify anyway.
fn band_key(chunk: &[u64]) -> u64 {
    let bytes: Vec<u8> = chunk.iter().flat_map(|value| value.to_le_bytes()).collect();
    murmurhash3_x64_128(&bytes, 0).0
}

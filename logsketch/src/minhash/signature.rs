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
use crate::hash::HashFamily;

/// A fixed-length MinHash signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MinHashSignature {
    values: Box<[u64]>,
}

impl MinHashSignature {
    /// Wraps precomputed minimum hash values.
    pub fn from_values(values: Vec<u64>) -> Self {
        Self {
            values: values.into_boxed_slice(),
        }
    }

    /// Returns the minimum hash value for each function, in function order.
    pub fn values(&self) -> &[u64] {
        &self.values
    }

    /// Returns the signature length.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the signature has no positions.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the fraction of positions on which both signatures agree.
    ///
    /// Fails with [`ErrorKind::ShapeMismatch`](crate::error::ErrorKind::ShapeMismatch) if the
    /// lengths differ.
    pub fn jaccard(&self, other: &Self) -> Result<f64, Error> {
        if self.len() != other.len() {
            return Err(Error::shape_mismatch(
                format!("signature length {}", self.len()),
                format!("signature length {}", other.len()),
            ));
        }
        if self.is_empty() {
            return Ok(1.0);
        }
        let matches = self
            .values
            .iter()
            .zip(other.values.iter())
            .filter(|(a, b)| a == b)
            .count();
        Ok(matches as f64 / self.len() as f64)
    }
}

/// Generates MinHash signatures of a fixed length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinHasher {
    hashes: HashFamily,
}

impl MinHasher {
    /// Creates a generator of `num_hashes`-long signatures.
    ///
    /// Fails with [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument) if
    /// `num_hashes` is zero.
    pub fn new(num_hashes: u32) -> Result<Self, Error> {
        Self::with_seed(num_hashes, DEFAULT_UPDATE_SEED)
    }

    /// Creates a generator with an explicit hash seed.
    pub fn with_seed(num_hashes: u32, seed: u64) -> Result<Self, Error> {
        if num_hashes == 0 {
            return Err(Error::invalid_argument("num_hashes must be at least 1"));
        }
        Ok(Self {
            hashes: HashFamily::with_seed(num_hashes, seed)?,
        })
    }

    /// Returns the signature length.
    pub fn num_hashes(&self) -> u32 {
        self.hashes.num_hashes()
    }

    /// Computes the signature of a set of tokens.
    ///
    /// Repeated tokens do not change the result. An empty set yields `u64::MAX` in every
    /// position.
    pub fn signature<I, T>(&self, tokens: I) -> MinHashSignature
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let mut values = vec![u64::MAX; self.num_hashes() as usize];
        for token in tokens {
            for (value, hash) in values.iter_mut().zip(self.hashes.hashes(token.as_ref())) {
                if hash < *value {
                    *value = hash;
                }
            }
        }
        MinHashSignature::from_values(values)
    }

    /// Estimates the Jaccard similarity of the sets behind two signatures.
    ///
    /// Fails with [`ErrorKind::ShapeMismatch`](crate::error::ErrorKind::ShapeMismatch) if either
    /// signature was not produced with this generator's length.
    pub fn estimated_jaccard(
        &self,
        left: &MinHashSignature,
        right: &MinHashSignature,
    ) -> Result<f64, Error> {
        let expected = self.num_hashes() as usize;
        for signature in [left, right] {
            if signature.len() != expected {
                return Err(Error::shape_mismatch(
                    format!("signature length {expected}"),
                    format!("signature length {}", signature.len()),
                ));
            }
        }
        left.jaccard(right)
    }
}

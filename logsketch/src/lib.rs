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

//! # Logsketch
//!
//! Sub-linear memory analytics for log streams.
//!
//! This crate provides a small family of probabilistic summary structures, each with a
//! quantified error bound, and a [`StreamAnalyzer`](analyzer::StreamAnalyzer) that composes them
//! into a single log-analysis pipeline:
//!
//! * [`bloom`]: approximate membership with no false negatives, used for deduplication.
//! * [`countmin`]: approximate per-key counters that never underestimate.
//! * [`hll`]: HyperLogLog distinct counting with lossless merge.
//! * [`minhash`]: fixed-size signatures estimating Jaccard similarity.
//! * [`lsh`]: banded bucket index returning similarity candidates in sub-linear time.
//!
//! All structures hash bytes with the seeded MurmurHash3 family in [`hash`].
//!
//! # Quick Start
//!
//! ```rust
//! use logsketch::analyzer::AnalyzerConfig;
//! use logsketch::analyzer::LogRecord;
//! use logsketch::analyzer::StreamAnalyzer;
//!
//! let analyzer = StreamAnalyzer::new(AnalyzerConfig::default()).unwrap();
//! let record: LogRecord =
//!     r#"[2023-04-15T10:20:30Z] 10.0.0.1 alice s1 /api/orders 504 "upstream gateway timeout""#
//!         .parse()
//!         .unwrap();
//! analyzer.process_record(record).unwrap();
//!
//! let similar = analyzer.find_similar_errors("upstream gateway timeout", 0.7).unwrap();
//! assert_eq!(similar.len(), 1);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod analyzer;
pub mod bloom;
pub mod countmin;
pub mod error;
pub mod hash;
pub mod hll;
pub mod lsh;
pub mod minhash;

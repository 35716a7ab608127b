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

//! Log stream analysis over the probabilistic structures of this crate.
//!
//! A [`StreamAnalyzer`] consumes [`LogRecord`]s one at a time. Every record is first checked
//! against a Bloom filter keyed by its identity fields; duplicates stop there. New records are
//! tallied per category in a Count-Min sketch (categories crossing a threshold are kept as
//! trending) and their user and session ids are folded into two HyperLogLog sketches. Records whose status marks them as errors are additionally shingled,
//! MinHashed and stored in an LSH index so that near-duplicate error messages can be found later.
//!
//! ```text
//! record ──► dedup ──duplicate──► dropped
//!              │
//!              └─new──► category tally, user/session cardinality
//!                          │
//!                          └─status >= threshold──► MinHash ──► error store + LSH
//! ```
//!
//! All operations take `&self`; each structure sits behind its own lock so records may be
//! processed from several threads at once.
//!
//! # Usage
//!
//! ```rust
//! # use logsketch::analyzer::AnalyzerConfig;
//! # use logsketch::analyzer::StreamAnalyzer;
//! let analyzer = StreamAnalyzer::new(AnalyzerConfig::default()).unwrap();
//! let stats = analyzer
//!     .ingest_lines([
//!         r#"[2023-04-15T10:20:30Z] 10.0.0.1 alice s1 /api/login 200 "ok""#,
//!         r#"[2023-04-15T10:20:30Z] 10.0.0.1 alice s1 /api/login 200 "ok""#,
//!         r#"[2023-04-15T10:20:31Z] 10.0.0.2 bob s2 /api/cart 500 "cart service unavailable""#,
//!         "not a log line",
//!     ])
//!     .unwrap();
//! assert_eq!((stats.accepted, stats.duplicates, stats.malformed), (2, 1, 1));
//! assert_eq!(analyzer.unique_users(), 2);
//! assert_eq!(analyzer.top_categories(&["/api/cart", "/api/login"], 1), ["/api/cart"]);
//! ```

mod config;
mod record;
mod report;
mod stream;

pub use self::config::AnalyzerConfig;
pub use self::config::DedupConfig;
pub use self::config::FrequencyConfig;
pub use self::record::LogRecord;
pub use self::record::TIMESTAMP_FORMAT;
pub use self::report::AnalysisReport;
pub use self::stream::IngestStats;
pub use self::stream::RecordOutcome;
pub use self::stream::StreamAnalyzer;

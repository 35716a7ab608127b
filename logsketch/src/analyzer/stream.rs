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

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use parking_lot::Mutex;
use parking_lot::RwLock;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::analyzer::AnalysisReport;
use crate::analyzer::AnalyzerConfig;
use crate::analyzer::FrequencyConfig;
use crate::analyzer::LogRecord;
use crate::bloom::BloomFilter;
use crate::countmin::CountMinSketch;
use crate::error::Error;
use crate::hll::HllSketch;
use crate::lsh::LshIndex;
use crate::minhash::MinHashSignature;
use crate::minhash::MinHasher;
use crate::minhash::shingles;

const REPORT_TOP_CATEGORIES: usize = 5;

/// What happened to a record passed to [`StreamAnalyzer::process_record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The record's identity was (probably) seen before; nothing was updated.
    Duplicate,
    /// The record was counted.
    Accepted,
    /// The record was counted and stored as an error record under this id.
    ErrorIndexed(u64),
}

/// Counters returned by [`StreamAnalyzer::ingest_lines`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub accepted: u64,
    pub duplicates: u64,
    /// Accepted records that were stored as error records.
    pub errors: u64,
    /// Lines that could not be parsed and were skipped.
    pub malformed: u64,
}

/// The category sketch and the categories whose estimate reached the heavy-hitter threshold.
#[derive(Debug)]
struct CategoryTally {
    sketch: CountMinSketch,
    heavy_hitters: HashMap<String, u32>,
}

impl CategoryTally {
    fn record(&mut self, category: &str, threshold: u32) {
        self.sketch.update(category.as_bytes());
        let estimate = self.sketch.estimate(category.as_bytes());
        if estimate < threshold {
            return;
        }
        match self.heavy_hitters.get_mut(category) {
            Some(count) => *count = estimate,
            None => {
                debug!(category, estimate, "category became a heavy hitter");
                self.heavy_hitters.insert(category.to_string(), estimate);
            }
        }
    }
}

/// Error records, their id counter and their LSH index, guarded as one unit.
#[derive(Debug)]
struct ErrorStore {
    next_id: u64,
    records: BTreeMap<u64, LogRecord>,
    index: LshIndex,
}

/// Analyzes a stream of log records with bounded memory.
///
/// See [`crate::analyzer`] for the processing pipeline.
#[derive(Debug)]
pub struct StreamAnalyzer {
    config: AnalyzerConfig,
    dedup: Mutex<BloomFilter>,
    categories: RwLock<CategoryTally>,
    users: RwLock<HllSketch>,
    sessions: RwLock<HllSketch>,
    hasher: MinHasher,
    errors: RwLock<ErrorStore>,
    accepted: AtomicU64,
    duplicates: AtomicU64,
}

impl StreamAnalyzer {
    /// Builds every structure described by `config`.
    ///
    /// Fails with [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument) if the
    /// configuration is invalid.
    pub fn new(config: AnalyzerConfig) -> Result<Self, Error> {
        config.validate()?;
        let dedup = BloomFilter::new(
            config.dedup.expected_elements,
            config.dedup.false_positive_rate,
        )?;
        let categories = match config.frequency {
            FrequencyConfig::Bounds { epsilon, delta } => CountMinSketch::new(epsilon, delta)?,
            FrequencyConfig::Dimensions { width, depth } => {
                CountMinSketch::with_dimensions(width, depth)?
            }
        };
        let users = HllSketch::new(config.user_precision)?;
        let sessions = HllSketch::new(config.session_precision)?;
        let hasher = MinHasher::new(config.num_hashes)?;
        let index = LshIndex::new(config.num_hashes, config.bands, config.rows)?;

        info!(
            dedup_bits = dedup.num_bits(),
            dedup_hashes = dedup.num_hashes(),
            category_width = categories.width(),
            category_depth = categories.depth(),
            user_precision = config.user_precision,
            session_precision = config.session_precision,
            bands = config.bands,
            rows = config.rows,
            "stream analyzer ready"
        );

        Ok(Self {
            config,
            dedup: Mutex::new(dedup),
            categories: RwLock::new(CategoryTally {
                sketch: categories,
                heavy_hitters: HashMap::new(),
            }),
            users: RwLock::new(users),
            sessions: RwLock::new(sessions),
            hasher,
            errors: RwLock::new(ErrorStore {
                next_id: 0,
                records: BTreeMap::new(),
                index,
            }),
            accepted: AtomicU64::new(0),
            duplicates: AtomicU64::new(0),
        })
    }

    /// Returns the configuration this analyzer was built with.
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Runs one record through the pipeline.
    ///
    /// A record whose identity may have been seen before is dropped without touching any other
    /// structure. Otherwise its category, user and session are counted, and an error record is
    /// stored and indexed for similarity search.
    pub fn process_record(&self, record: LogRecord) -> Result<RecordOutcome, Error> {
        let key = record.dedup_key();
        if self.dedup.lock().check_and_insert(key.as_bytes()) {
            self.duplicates.fetch_add(1, Ordering::Relaxed);
            debug!(path = %record.path, user = %record.user_id, "dropping duplicate record");
            return Ok(RecordOutcome::Duplicate);
        }
        self.accepted.fetch_add(1, Ordering::Relaxed);

        self.categories
            .write()
            .record(&record.path, self.config.heavy_hitter_threshold);
        self.users.write().update(record.user_id.as_bytes());
        self.sessions.write().update(record.session_id.as_bytes());

        if !record.is_error(self.config.error_status_threshold) {
            return Ok(RecordOutcome::Accepted);
        }

        let signature = self.signature_of(&record.message);
        let mut store = self.errors.write();
        let id = store.next_id;
        store.index.insert(id, signature)?;
        debug!(id, status = record.status, path = %record.path, "indexed error record");
        store.records.insert(id, record);
        store.next_id += 1;
        Ok(RecordOutcome::ErrorIndexed(id))
    }

    /// Parses and processes raw log lines.
    ///
    /// Blank lines are ignored and malformed lines are logged and skipped; neither affects the
    /// state built from the other lines.
    pub fn ingest_lines<I, S>(&self, lines: I) -> Result<IngestStats, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut stats = IngestStats::default();
        for (number, line) in lines.into_iter().enumerate() {
            let line = line.as_ref();
            if line.trim().is_empty() {
                continue;
            }
            let record = match line.parse::<LogRecord>() {
                Ok(record) => record,
                Err(err) => {
                    warn!(line = number + 1, %err, "skipping malformed log line");
                    stats.malformed += 1;
                    continue;
                }
            };
            match self.process_record(record)? {
                RecordOutcome::Duplicate => stats.duplicates += 1,
                RecordOutcome::Accepted => stats.accepted += 1,
                RecordOutcome::ErrorIndexed(_) => {
                    stats.accepted += 1;
                    stats.errors += 1;
                }
            }
        }
        info!(
            accepted = stats.accepted,
            duplicates = stats.duplicates,
            errors = stats.errors,
            malformed = stats.malformed,
            "ingested log lines"
        );
        Ok(stats)
    }

    /// Returns true if a record with the same identity may already have been processed.
    pub fn has_seen(&self, record: &LogRecord) -> bool {
        self.dedup.lock().contains(record.dedup_key().as_bytes())
    }

    /// Returns the number of records that passed deduplication.
    pub fn accepted(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }

    /// Returns the number of records dropped as duplicates.
    pub fn duplicates(&self) -> u64 {
        self.duplicates.load(Ordering::Relaxed)
    }

    /// Returns the estimated number of accepted records in `category`.
    pub fn category_estimate(&self, category: &str) -> u32 {
        self.categories.read().sketch.estimate(category.as_bytes())
    }

    /// Returns up to `n` of the `known` categories with their estimates, highest first.
    ///
    /// Ties keep the order in which categories appear in `known`.
    pub fn top_category_estimates<S: AsRef<str>>(
        &self,
        known: &[S],
        n: usize,
    ) -> Vec<(String, u32)> {
        let mut estimates: Vec<(String, u32)> = {
            let tally = self.categories.read();
            known
                .iter()
                .map(|category| {
                    let category = category.as_ref();
                    (category.to_string(), tally.sketch.estimate(category.as_bytes()))
                })
                .collect()
        };
        estimates.sort_by(|a, b| b.1.cmp(&a.1));
        estimates.truncate(n);
        estimates
    }

    /// Returns up to `n` of the `known` categories, highest estimated frequency first.
    ///
    /// Ties keep the order in which categories appear in `known`.
    pub fn top_categories<S: AsRef<str>>(&self, known: &[S], n: usize) -> Vec<String> {
        self.top_category_estimates(known, n)
            .into_iter()
            .map(|(category, _)| category)
            .collect()
    }

    /// Returns up to `n` categories whose estimated count reached the heavy-hitter threshold,
    /// highest first.
    ///
    /// Unlike [`top_categories`](Self::top_categories) this needs no candidate list. Counts are
    /// the sketch estimate at the category's last occurrence; ties are ordered by name.
    pub fn trending_categories(&self, n: usize) -> Vec<(String, u32)> {
        let mut trending: Vec<(String, u32)> = self
            .categories
            .read()
            .heavy_hitters
            .iter()
            .map(|(category, count)| (category.clone(), *count))
            .collect();
        trending.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        trending.truncate(n);
        trending
    }

    /// Returns the estimated number of distinct user ids among accepted records.
    pub fn unique_users(&self) -> u64 {
        self.users.read().estimate()
    }

    /// Returns the estimated number of distinct session ids among accepted records.
    pub fn unique_sessions(&self) -> u64 {
        self.sessions.read().estimate()
    }

    /// Returns the number of stored error records.
    pub fn error_count(&self) -> usize {
        self.errors.read().records.len()
    }

    /// Returns the error record stored under `id`.
    ///
    /// Fails with [`ErrorKind::NotFound`](crate::error::ErrorKind::NotFound) if no record has
    /// that id.
    pub fn error_record(&self, id: u64) -> Result<LogRecord, Error> {
        self.errors
            .read()
            .records
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::not_found("error record", id))
    }

    /// Returns the stored error records whose message is estimated to be at least `threshold`
    /// similar to `text`, in storage order.
    ///
    /// Candidates come from the LSH index and are verified against their cached signatures.
    pub fn find_similar_errors(
        &self,
        text: &str,
        threshold: f64,
    ) -> Result<Vec<LogRecord>, Error> {
        let signature = self.signature_of(text);
        let store = self.errors.read();
        let matches = store.index.similar(&signature, threshold)?;
        Ok(matches
            .into_iter()
            .filter_map(|(id, _)| store.records.get(&id).cloned())
            .collect())
    }

    /// Groups stored error records whose estimated pairwise similarity reaches `threshold`.
    ///
    /// Each record joins at most one group, seeded by the lowest unassigned id; records with no
    /// similar peer are left out.
    pub fn similar_error_groups(&self, threshold: f64) -> Result<Vec<Vec<u64>>, Error> {
        let store = self.errors.read();
        let mut assigned = HashSet::new();
        let mut groups = vec![];
        for &id in store.records.keys() {
            if assigned.contains(&id) {
                continue;
            }
            let Some(signature) = store.index.signature(id) else {
                continue;
            };
            let peers: Vec<u64> = store
                .index
                .similar(signature, threshold)?
                .into_iter()
                .map(|(peer, _)| peer)
                .filter(|peer| *peer != id && !assigned.contains(peer))
                .collect();
            if peers.is_empty() {
                continue;
            }
            assigned.insert(id);
            assigned.extend(peers.iter().copied());
            let mut group = Vec::with_capacity(peers.len() + 1);
            group.push(id);
            group.extend(peers);
            groups.push(group);
        }
        Ok(groups)
    }

    /// Summarizes the session so far.
    pub fn report<S: AsRef<str>>(&self, known_categories: &[S]) -> AnalysisReport {
        AnalysisReport {
            accepted: self.accepted(),
            duplicates: self.duplicates(),
            unique_users: self.unique_users(),
            unique_sessions: self.unique_sessions(),
            top_categories: self.top_category_estimates(known_categories, REPORT_TOP_CATEGORIES),
            error_records: self.error_count(),
        }
    }

    fn signature_of(&self, text: &str) -> MinHashSignature {
        self.hasher.signature(&shingles(text, self.config.shingle_size))
    }
}

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

use std::thread;

use chrono::DateTime;
use chrono::Utc;
use googletest::prelude::*;
use logsketch::analyzer::AnalyzerConfig;
use logsketch::analyzer::FrequencyConfig;
use logsketch::analyzer::LogRecord;
use logsketch::analyzer::RecordOutcome;
use logsketch::analyzer::StreamAnalyzer;
use logsketch::error::ErrorKind;

const BASE_MESSAGE: &str = "database connection pool exhausted while handling checkout request \
    for tenant acme after waiting thirty seconds on primary replica in region us-east with \
    retries disabled by operator policy during maintenance window";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("logsketch=debug")
        .try_init();
}

fn record(timestamp: &str, user: &str, session: &str, path: &str, status: u16) -> LogRecord {
    LogRecord {
        timestamp: timestamp.parse::<DateTime<Utc>>().unwrap(),
        ip: "192.168.1.1".to_string(),
        user_id: user.to_string(),
        session_id: session.to_string(),
        path: path.to_string(),
        status,
        message: "Request successful".to_string(),
    }
}

fn error_record(timestamp: &str, message: &str) -> LogRecord {
    LogRecord {
        message: message.to_string(),
        ..record(timestamp, "ops", "s-ops", "/api/checkout", 503)
    }
}

#[test]
fn test_duplicate_records_counted_once() {
    init_tracing();
    let analyzer = StreamAnalyzer::new(AnalyzerConfig::default()).unwrap();
    let first = record("2023-04-15T10:20:30Z", "alice", "s1", "/api/login", 200);
    let second = record("2023-04-15T10:21:30Z", "bob", "s2", "/api/login", 200);

    let outcomes: Vec<RecordOutcome> = [first.clone(), first, second]
        .into_iter()
        .map(|r| analyzer.process_record(r).unwrap())
        .collect();
    assert_eq!(
        outcomes,
        vec![
            RecordOutcome::Accepted,
            RecordOutcome::Duplicate,
            RecordOutcome::Accepted
        ]
    );

    assert_eq!(analyzer.top_categories(&["/api/login"], 1), vec!["/api/login"]);
    assert_that!(analyzer.category_estimate("/api/login"), eq(2));
    assert_that!(analyzer.unique_users(), eq(2));
    assert_that!(analyzer.accepted(), eq(2));
    assert_that!(analyzer.duplicates(), eq(1));
}

#[test]
fn test_duplicate_does_not_touch_sketches() {
    let analyzer = StreamAnalyzer::new(AnalyzerConfig::default()).unwrap();
    let original = record("2023-04-15T10:20:30Z", "alice", "s1", "/api/login", 200);
    analyzer.process_record(original.clone()).unwrap();
    // same identity, different session and message
    let replay = LogRecord {
        session_id: "s-other".to_string(),
        message: "replayed".to_string(),
        ..original.clone()
    };
    assert!(analyzer.has_seen(&replay));
    assert_eq!(analyzer.process_record(replay).unwrap(), RecordOutcome::Duplicate);
    assert_eq!(analyzer.unique_sessions(), 1);
    assert_eq!(analyzer.category_estimate("/api/login"), 1);
}

#[test]
fn test_top_categories_ordering() {
    let analyzer = StreamAnalyzer::new(AnalyzerConfig::default()).unwrap();
    let paths = [
        "/api/cart",
        "/api/cart",
        "/api/cart",
        "/api/login",
        "/api/login",
        "/api/orders",
    ];
    for (i, path) in paths.iter().enumerate() {
        let timestamp = format!("2023-04-15T10:20:{i:02}Z");
        analyzer
            .process_record(record(&timestamp, "alice", "s1", path, 200))
            .unwrap();
    }
    let known = ["/api/orders", "/api/login", "/api/cart", "/api/search"];
    assert_eq!(
        analyzer.top_categories(&known, 3),
        vec!["/api/cart", "/api/login", "/api/orders"]
    );
    assert_eq!(analyzer.top_categories(&known, 10).len(), 4);
    assert!(analyzer.top_categories(&known, 0).is_empty());
    assert!(analyzer.top_categories::<&str>(&[], 3).is_empty());
}

#[test]
fn test_find_similar_errors() {
    init_tracing();
    let analyzer = StreamAnalyzer::new(AnalyzerConfig::default()).unwrap();
    let first = format!("{BASE_MESSAGE} alpha");
    let second = format!("{BASE_MESSAGE} beta");
    let outcomes = [
        error_record("2023-04-15T10:20:30Z", &first),
        error_record("2023-04-15T10:20:31Z", &second),
        error_record("2023-04-15T10:20:32Z", "disk quota exceeded for user bob on volume logs"),
    ]
    .into_iter()
    .map(|r| analyzer.process_record(r).unwrap())
    .collect::<Vec<_>>();
    assert_eq!(
        outcomes,
        vec![
            RecordOutcome::ErrorIndexed(0),
            RecordOutcome::ErrorIndexed(1),
            RecordOutcome::ErrorIndexed(2)
        ]
    );
    assert_eq!(analyzer.error_count(), 3);

    let similar = analyzer.find_similar_errors(&first, 0.7).unwrap();
    let messages: Vec<&str> = similar.iter().map(|r| r.message.as_str()).collect();
    assert_eq!(messages, vec![first.as_str(), second.as_str()]);

    assert!(analyzer
        .find_similar_errors("completely unrelated text about weather", 0.7)
        .unwrap()
        .is_empty());

    assert_eq!(analyzer.similar_error_groups(0.7).unwrap(), vec![vec![0, 1]]);
}

#[test]
fn test_success_records_not_indexed() {
    let analyzer = StreamAnalyzer::new(AnalyzerConfig::default()).unwrap();
    let ok = LogRecord {
        message: BASE_MESSAGE.to_string(),
        ..record("2023-04-15T10:20:30Z", "alice", "s1", "/api/login", 200)
    };
    assert_eq!(analyzer.process_record(ok).unwrap(), RecordOutcome::Accepted);
    assert_eq!(analyzer.error_count(), 0);
    assert!(analyzer.find_similar_errors(BASE_MESSAGE, 0.5).unwrap().is_empty());
}

#[test]
fn test_error_record_lookup() {
    let analyzer = StreamAnalyzer::new(AnalyzerConfig::default()).unwrap();
    let stored = error_record("2023-04-15T10:20:30Z", "upstream gateway timeout");
    analyzer.process_record(stored.clone()).unwrap();
    assert_eq!(analyzer.error_record(0).unwrap(), stored);

    let err = analyzer.error_record(99).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.context().iter().any(|(key, value)| *key == "id" && value == "99"));
}

#[test]
fn test_ingest_skips_malformed_lines() {
    init_tracing();
    let analyzer = StreamAnalyzer::new(AnalyzerConfig::default()).unwrap();
    let lines = [
        r#"[2023-04-15T10:20:30Z] 192.168.1.1 alice s1 /api/login 200 "Login ok""#,
        "this line is not a log record",
        "",
        r#"[2023-04-15T10:20:31Z] 192.168.1.2 bob s2 /api/cart 500 "Cart service unavailable""#,
        r#"[2023-04-15T10:20:32Z] 192.168.1.3 carol s3 /api/cart abc "Bad status""#,
        r#"[2023-04-15T10:20:30Z] 192.168.1.1 alice s1 /api/login 200 "Login ok""#,
    ];
    let stats = analyzer.ingest_lines(lines).unwrap();
    assert_eq!(stats.accepted, 2);
    assert_eq!(stats.duplicates, 1);
    assert_eq!(stats.errors, 1);
    assert_eq!(stats.malformed, 2);

    assert_eq!(analyzer.unique_users(), 2);
    assert_eq!(analyzer.category_estimate("/api/cart"), 1);
    assert_eq!(analyzer.error_record(0).unwrap().message, "Cart service unavailable");
}

#[test]
fn test_ingest_rejects_unparseable_timestamp() {
    let analyzer = StreamAnalyzer::new(AnalyzerConfig::default()).unwrap();
    let stats = analyzer
        .ingest_lines([
            r#"[yesterday] 192.168.1.1 alice s1 /api/login 200 "Login ok""#,
            r#"[2023-04-15 10:20:30] 192.168.1.1 alice s1 /api/login 200 "Login ok""#,
            r#"[2023-04-15T10:20:30Z] 192.168.1.2 bob s2 /api/login 200 "Login ok""#,
        ])
        .unwrap();
    assert_eq!(stats.malformed, 2);
    assert_eq!(stats.accepted, 1);
    assert_eq!(analyzer.category_estimate("/api/login"), 1);
    assert_eq!(analyzer.unique_users(), 1);
}

#[test]
fn test_equal_instants_share_identity() {
    let analyzer = StreamAnalyzer::new(AnalyzerConfig::default()).unwrap();
    let first = record("2023-04-15T10:20:30Z", "alice", "s1", "/api/login", 200);
    let same_instant = record("2023-04-15T12:20:30+02:00", "alice", "s1", "/api/login", 200);
    assert_eq!(first.dedup_key(), same_instant.dedup_key());
    analyzer.process_record(first).unwrap();
    assert_eq!(
        analyzer.process_record(same_instant).unwrap(),
        RecordOutcome::Duplicate
    );
}

#[test]
fn test_trending_categories() {
    let config = AnalyzerConfig {
        heavy_hitter_threshold: 3,
        ..AnalyzerConfig::default()
    };
    let analyzer = StreamAnalyzer::new(config).unwrap();
    let paths = [
        ("/api/cart", 5),
        ("/api/login", 3),
        ("/api/orders", 2),
        ("/api/search", 3),
    ];
    let mut second = 0;
    for (path, hits) in paths {
        for _ in 0..hits {
            let seconds = 1_681_550_000 + second;
            second += 1;
            let timestamp = DateTime::from_timestamp(seconds, 0).unwrap().to_rfc3339();
            analyzer
                .process_record(record(&timestamp, "alice", "s1", path, 200))
                .unwrap();
        }
    }

    assert_eq!(
        analyzer.trending_categories(10),
        vec![
            ("/api/cart".to_string(), 5),
            ("/api/login".to_string(), 3),
            ("/api/search".to_string(), 3),
        ]
    );
    assert_eq!(
        analyzer.trending_categories(1),
        vec![("/api/cart".to_string(), 5)]
    );
    assert!(analyzer.trending_categories(0).is_empty());
}

#[test]
fn test_trending_ignores_duplicates() {
    let config = AnalyzerConfig {
        heavy_hitter_threshold: 2,
        ..AnalyzerConfig::default()
    };
    let analyzer = StreamAnalyzer::new(config).unwrap();
    let replayed = record("2023-04-15T10:20:30Z", "alice", "s1", "/api/cart", 200);
    for _ in 0..5 {
        analyzer.process_record(replayed.clone()).unwrap();
    }
    assert!(analyzer.trending_categories(5).is_empty());
}

#[test]
fn test_concurrent_ingestion() {
    let analyzer = StreamAnalyzer::new(AnalyzerConfig::default()).unwrap();
    let shared = record("2023-04-15T00:00:00Z", "shared", "s-shared", "/api/health", 200);
    let threads = 4;
    let per_thread = 250;

    thread::scope(|scope| {
        for t in 0..threads {
            let analyzer = &analyzer;
            let shared = shared.clone();
            scope.spawn(move || {
                analyzer.process_record(shared).unwrap();
                for i in 0..per_thread {
                    let seconds = 1_681_550_000 + (t * per_thread + i) as i64;
                    let timestamp = DateTime::from_timestamp(seconds, 0).unwrap().to_rfc3339();
                    let user = format!("user-{t}-{i}");
                    let status = if i % 50 == 0 { 500 } else { 200 };
                    let mut next = record(&timestamp, &user, "s1", "/api/items", status);
                    next.message = format!("worker {t} failed job {i} with exit status {status}");
                    analyzer.process_record(next).unwrap();
                }
            });
        }
    });

    let total = (threads * per_thread) as u64;
    assert_eq!(analyzer.accepted(), total + 1);
    assert_eq!(analyzer.duplicates(), threads as u64 - 1);
    assert_eq!(analyzer.category_estimate("/api/items"), total as u32);

    let errors = analyzer.error_count();
    assert_eq!(errors, threads * per_thread / 50);
    for id in 0..errors as u64 {
        assert_eq!(analyzer.error_record(id).unwrap().status, 500);
    }

    let users = analyzer.unique_users();
    assert_that!(users as f64, near(total as f64 + 1.0, 0.05 * total as f64));
}

#[test]
fn test_report_display() {
    let analyzer = StreamAnalyzer::new(AnalyzerConfig::default()).unwrap();
    let login = record("2023-04-15T10:20:30Z", "alice", "s1", "/api/login", 200);
    analyzer.process_record(login.clone()).unwrap();
    analyzer.process_record(login).unwrap();
    analyzer
        .process_record(record("2023-04-15T10:20:31Z", "bob", "s2", "/api/login", 200))
        .unwrap();
    analyzer
        .process_record(record("2023-04-15T10:20:32Z", "alice", "s1", "/api/cart", 502))
        .unwrap();

    let report = analyzer.report(&["/api/login", "/api/cart", "/api/orders"]);
    assert_eq!(report.accepted, 3);
    assert_eq!(report.error_records, 1);
    insta::assert_snapshot!(report.to_string(), @r"
    === Log Analysis Report ===
    Records accepted: 3 (1 duplicates dropped)
    Estimated unique users: 2
    Estimated unique sessions: 2

    Top 3 categories:
    1. /api/login (approx 2 hits)
    2. /api/cart (approx 1 hits)
    3. /api/orders (approx 0 hits)

    Distinct error records: 1
    ");
}

#[test]
fn test_config_from_json() {
    let config: AnalyzerConfig = serde_json::from_str(
        r#"{
            "frequency": { "bounds": { "epsilon": 0.01, "delta": 0.01 } },
            "bands": 25,
            "rows": 4,
            "error_status_threshold": 500
        }"#,
    )
    .unwrap();
    assert_eq!(
        config.frequency,
        FrequencyConfig::Bounds {
            epsilon: 0.01,
            delta: 0.01
        }
    );
    assert_eq!(config.num_hashes, 100);
    assert_eq!(config.user_precision, 14);

    let analyzer = StreamAnalyzer::new(config).unwrap();
    let client_error = record("2023-04-15T10:20:30Z", "alice", "s1", "/api/login", 404);
    assert_eq!(analyzer.process_record(client_error).unwrap(), RecordOutcome::Accepted);
}

#[test]
fn test_invalid_config_rejected() {
    let config = AnalyzerConfig {
        bands: 30,
        ..AnalyzerConfig::default()
    };
    let err = StreamAnalyzer::new(config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(err.context().iter().any(|(key, value)| *key == "field" && value == "bands"));

    let config = AnalyzerConfig {
        user_precision: 20,
        ..AnalyzerConfig::default()
    };
    assert_eq!(StreamAnalyzer::new(config).unwrap_err().kind(), ErrorKind::InvalidArgument);
}

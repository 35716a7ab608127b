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

use std::str::FromStr;

use chrono::DateTime;
use chrono::NaiveDateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::error::Error;

/// Layout of the bracketed timestamp in a log line, e.g. `2023-04-15T10:20:30Z`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// One structured access-log record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub ip: String,
    pub user_id: String,
    pub session_id: String,
    pub path: String,
    pub status: u16,
    pub message: String,
}

impl LogRecord {
    /// Returns the canonical identity of this record used for duplicate detection.
    ///
    /// Built from the canonical timestamp, origin address, user, path and status. Fields are
    /// joined with the ASCII unit separator so adjacent fields cannot run into each other.
    pub fn dedup_key(&self) -> String {
        format!(
            "{}\u{1f}{}\u{1f}{}\u{1f}{}\u{1f}{}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.ip,
            self.user_id,
            self.path,
            self.status
        )
    }

    /// Returns true if the status is at or above `threshold`.
    pub fn is_error(&self, threshold: u16) -> bool {
        self.status >= threshold
    }
}

/// Parses `[timestamp] ip user session path status "message"`.
///
/// ```rust
/// # use logsketch::analyzer::LogRecord;
/// let record: LogRecord =
///     r#"[2023-04-15T10:20:30Z] 192.168.1.1 user123 session456 /api/items 200 "Request successful""#
///         .parse()
///         .unwrap();
/// assert_eq!(record.path, "/api/items");
/// assert_eq!(record.message, "Request successful");
/// ```
impl FromStr for LogRecord {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = line.trim().splitn(7, ' ').collect();
        if parts.len() != 7 {
            return Err(Error::invalid_data(format!(
                "invalid log format: expected 7 fields, got {}",
                parts.len()
            )));
        }
        let timestamp = parts[0]
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .and_then(|ts| NaiveDateTime::parse_from_str(ts, TIMESTAMP_FORMAT).ok())
            .ok_or_else(|| {
                Error::invalid_data("invalid timestamp").with_context("timestamp", parts[0])
            })?
            .and_utc();
        let status = parts[5].parse::<u16>().map_err(|err| {
            Error::invalid_data(format!("invalid status code: {err}"))
                .with_context("status", parts[5])
        })?;
        Ok(Self {
            timestamp,
            ip: parts[1].to_string(),
            user_id: parts[2].to_string(),
            session_id: parts[3].to_string(),
            path: parts[4].to_string(),
            status,
            message: parts[6].trim_matches('"').to_string(),
        })
    }
}

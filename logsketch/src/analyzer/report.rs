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

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// A point-in-time summary of an analysis session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Records that passed deduplication.
    pub accepted: u64,
    /// Records dropped as duplicates.
    pub duplicates: u64,
    pub unique_users: u64,
    pub unique_sessions: u64,
    /// Highest-frequency known categories with their estimated counts.
    pub top_categories: Vec<(String, u32)>,
    /// Error records held in the similarity store.
    pub error_records: usize,
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Log Analysis Report ===")?;
        writeln!(
            f,
            "Records accepted: {} ({} duplicates dropped)",
            self.accepted, self.duplicates
        )?;
        writeln!(f, "Estimated unique users: {}", self.unique_users)?;
        writeln!(f, "Estimated unique sessions: {}", self.unique_sessions)?;
        writeln!(f)?;
        writeln!(f, "Top {} categories:", self.top_categories.len())?;
        for (rank, (category, hits)) in self.top_categories.iter().enumerate() {
            writeln!(f, "{}. {} (approx {} hits)", rank + 1, category, hits)?;
        }
        writeln!(f)?;
        write!(f, "Distinct error records: {}", self.error_records)
    }
}

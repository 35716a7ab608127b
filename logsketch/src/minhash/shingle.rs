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

/// Returns the set of `size`-word shingles of `text`.
///
/// Words are separated by whitespace and lower-cased; each shingle is `size` consecutive words
/// joined by a single space. Text with at least one but fewer than `size` words yields a single
/// shingle holding all of its words, so short messages still get a meaningful signature. Empty
/// text yields an empty set.
pub fn shingles(text: &str, size: usize) -> BTreeSet<String> {
    let size = size.max(1);
    let words: Vec<String> = text.split_whitespace().map(str::to_lowercase).collect();
    if words.is_empty() {
        return BTreeSet::new();
    }
    if words.len() < size {
        return BTreeSet::from([words.join(" ")]);
    }
    words.windows(size).map(|window| window.join(" ")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sliding_window() {
        let set = shingles("Disk  quota exceeded for user", 3);
        let expected: BTreeSet<String> = [
            "disk quota exceeded",
            "quota exceeded for",
            "exceeded for user",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        assert_eq!(set, expected);
    }

    #[test]
    fn test_duplicates_collapse() {
        let set = shingles("retry retry retry retry", 2);
        assert_eq!(set.len(), 1);
        assert!(set.contains("retry retry"));
    }

    #[test]
    fn test_short_text() {
        assert_eq!(shingles("Timeout", 3), BTreeSet::from(["timeout".to_string()]));
        assert!(shingles("   ", 3).is_empty());
    }
}

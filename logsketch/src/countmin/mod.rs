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

//! Count-Min sketch implementation for frequency estimation.
//!
//! The Count-Min sketch provides approximate frequency counts for streaming data
//! with configurable relative error and confidence bounds. Estimates never fall below the true
//! count: hash collisions can only add mass to a counter.
//!
//! For a relative error `epsilon` and failure probability `delta`, the sketch uses
//! `width = ceil(e / epsilon)` counters per row and `depth = ceil(ln(1 / delta))` rows. With
//! probability at least `1 - delta`, `estimate(x) <= true(x) + epsilon * W`, where `W` is the
//! total weight added.
//!
//! # Usage
//!
//! ```rust
//! # use logsketch::countmin::CountMinSketch;
//! let mut sketch = CountMinSketch::new(0.01, 0.01).unwrap();
//! sketch.update(b"/api/login");
//! sketch.add(b"/api/orders", 3);
//! assert!(sketch.estimate(b"/api/orders") >= 3);
//! ```
//!
//! # Configuration Helpers
//!
//! ```rust
//! # use logsketch::countmin::CountMinSketch;
//! let width = CountMinSketch::suggest_width(0.01);
//! let depth = CountMinSketch::suggest_depth(0.01);
//! let sketch = CountMinSketch::with_dimensions(width, depth).unwrap();
//! assert_eq!((sketch.width(), sketch.depth()), (272, 5));
//! ```
//!
//! # Saturation
//!
//! Counters are `u32` and saturate at `u32::MAX` instead of wrapping.

mod sketch;
pub use self::sketch::CountMinSketch;

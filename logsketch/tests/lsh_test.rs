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

use logsketch::error::ErrorKind;
use logsketch::lsh::LshIndex;
use logsketch::lsh::collision_probability;
use logsketch::minhash::MinHashSignature;
use logsketch::minhash::MinHasher;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

const BANDS: u32 = 20;
const ROWS: u32 = 5;
const TRIALS: usize = 200;

fn random_tokens(rng: &mut StdRng, count: usize) -> Vec<String> {
    (0..count).map(|_| format!("{:016x}", rng.random::<u64>())).collect()
}

/// Builds two token sets with `shared` common tokens and `distinct` tokens unique to each side,
/// then reports whether the second is an LSH candidate of the first.
fn collides(rng: &mut StdRng, shared: usize, distinct: usize) -> bool {
    let hasher = MinHasher::with_seed(BANDS * ROWS, rng.random()).unwrap();
    let common = random_tokens(rng, shared);
    let mut left = common.clone();
    left.extend(random_tokens(rng, distinct));
    let mut right = common;
    right.extend(random_tokens(rng, distinct));

    let mut index = LshIndex::new(BANDS * ROWS, BANDS, ROWS).unwrap();
    index.insert(1, hasher.signature(&left)).unwrap();
    index.query(&hasher.signature(&right)).unwrap().contains(&1)
}

#[test]
fn test_collision_probability() {
    assert!(collision_probability(0.9, BANDS, ROWS) > 0.9999);
    assert!(collision_probability(0.1, BANDS, ROWS) < 0.001);
    assert_eq!(collision_probability(1.0, BANDS, ROWS), 1.0);
    assert_eq!(collision_probability(0.0, BANDS, ROWS), 0.0);
}

#[test]
fn test_similar_sets_collide() {
    let mut rng = StdRng::seed_from_u64(17);
    // J = 95 / 105
    let hits = (0..TRIALS).filter(|_| collides(&mut rng, 95, 5)).count();
    assert!(hits * 100 > TRIALS * 95, "only {hits} of {TRIALS} similar pairs collided");
}

#[test]
fn test_dissimilar_sets_rarely_collide() {
    let mut rng = StdRng::seed_from_u64(23);
    // J = 18 / 182
    let hits = (0..TRIALS).filter(|_| collides(&mut rng, 18, 82)).count();
    assert!(hits <= 5, "{hits} of {TRIALS} dissimilar pairs collided");
}

#[test]
fn test_similar_reports_verified_similarity() {
    let hasher = MinHasher::new(100).unwrap();
    let mut index = LshIndex::new(100, BANDS, ROWS).unwrap();
    let tokens: Vec<String> = (0..40).map(|i| format!("t{i}")).collect();
    index.insert(7, hasher.signature(&tokens)).unwrap();
    index.insert(8, hasher.signature(["unrelated", "tokens"])).unwrap();

    let matches = index.similar(&hasher.signature(&tokens), 0.5).unwrap();
    assert_eq!(matches, vec![(7, 1.0)]);
    assert_eq!(index.len(), 2);
    assert!(index.signature(8).is_some());
    assert!(index.signature(9).is_none());
}

#[test]
fn test_invalid_configuration() {
    assert_eq!(LshIndex::new(100, 20, 4).unwrap_err().kind(), ErrorKind::InvalidArgument);
    assert_eq!(LshIndex::new(0, 0, 5).unwrap_err().kind(), ErrorKind::InvalidArgument);
    assert_eq!(LshIndex::new(0, 5, 0).unwrap_err().kind(), ErrorKind::InvalidArgument);
}

#[test]
fn test_signature_shape_checked() {
    let mut index = LshIndex::new(10, 5, 2).unwrap();
    assert!(index.is_empty());
    let short = MinHashSignature::from_values(vec![1; 8]);
    assert_eq!(index.insert(1, short.clone()).unwrap_err().kind(), ErrorKind::ShapeMismatch);
    assert_eq!(index.query(&short).unwrap_err().kind(), ErrorKind::ShapeMismatch);
    assert!(index.is_empty());
}

#[test]
fn test_duplicate_id_rejected() {
    let mut index = LshIndex::new(10, 5, 2).unwrap();
    let signature = MinHashSignature::from_values((0..10).collect());
    index.insert(1, signature.clone()).unwrap();
    let err = index.insert(1, signature).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(index.len(), 1);
}

// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

use arbsim_components::arbiter::policy::{FixedPriority, Random, RoundRobin, WeightedRoundRobin};
use arbsim_components::arbiter::{Arbitrate, PolicyConfig};
use arbsim_engine::test_helpers::start_test;

fn grants(policy: &mut dyn Arbitrate, requests: &[bool], rounds: usize) -> Vec<usize> {
    let engine = start_test(file!());
    let mut counts = vec![0; requests.len()];
    for _ in 0..rounds {
        let index = policy.arbitrate(engine.top(), requests).unwrap();
        assert!(requests[index], "granted idle input {index}");
        counts[index] += 1;
    }
    counts
}

#[test]
fn nothing_requested() {
    let engine = start_test(file!());
    let requests = [false; 4];
    assert_eq!(FixedPriority::new().arbitrate(engine.top(), &requests), None);
    assert_eq!(RoundRobin::new().arbitrate(engine.top(), &requests), None);
    assert_eq!(Random::new(1).arbitrate(engine.top(), &requests), None);
    let mut wrr = WeightedRoundRobin::new(vec![1, 2, 3, 4], 4).unwrap();
    assert_eq!(wrr.arbitrate(engine.top(), &requests), None);
}

#[test]
fn fixed_priority_prefers_low_lanes() {
    let counts = grants(&mut FixedPriority::new(), &[false, true, true, true], 10);
    assert_eq!(counts, vec![0, 10, 0, 0]);
}

#[test]
fn round_robin_is_fair() {
    let counts = grants(&mut RoundRobin::new(), &[true, false, true, true], 30);
    assert_eq!(counts, vec![10, 0, 10, 10]);
}

#[test]
fn weighted_round_robin_follows_weights() {
    let mut wrr = WeightedRoundRobin::new(vec![3, 1, 1, 1], 4).unwrap();
    let counts = grants(&mut wrr, &[true; 4], 600);
    assert_eq!(counts, vec![300, 100, 100, 100]);
}

#[test]
fn random_only_picks_requesters() {
    let counts = grants(&mut Random::new(7), &[true, true, false, true], 3000);
    assert_eq!(counts[2], 0);
    for count in [counts[0], counts[1], counts[3]] {
        assert!((800..1200).contains(&count), "{counts:?}");
    }
}

#[test]
fn weights_must_match_inputs() {
    assert!(WeightedRoundRobin::new(vec![1, 1], 4).is_err());
    assert!(PolicyConfig::WeightedRoundRobin(vec![1, 1, 1]).validate(4).is_err());
    assert!(PolicyConfig::WeightedRoundRobin(vec![1, 0, 1, 1]).validate(4).is_err());
    assert!(PolicyConfig::WeightedRoundRobin(vec![2, 1, 1, 1]).build(4, 0).is_ok());
}

#[test]
fn policy_names() {
    assert_eq!(PolicyConfig::FixedPriority.to_string(), "Fixed Priority");
    assert_eq!(PolicyConfig::RoundRobin.to_string(), "Round Robin");
    assert_eq!(PolicyConfig::Random.to_string(), "Random");
    assert_eq!(
        PolicyConfig::WeightedRoundRobin(vec![4, 1, 1, 2]).to_string(),
        "Weighted Round Robin (4:1:1:2)"
    );
}

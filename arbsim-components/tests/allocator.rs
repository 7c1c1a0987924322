// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

use arbsim_components::allocator::{Allocator, AllocatorOutputs, NUM_LANES, allocate};
use arbsim_components::arbiter::policy::{FixedPriority, RoundRobin};
use arbsim_engine::test_helpers::start_test;
use arbsim_engine::time::clock::Clock;
use arbsim_protocols::phit::{IDLE_CODE, Phit};

fn header_code(destination: u8) -> u8 {
    Phit::header(destination).unwrap().arbitration_code()
}

#[test]
fn outputs_change_on_edge() {
    let engine = start_test(file!());
    let clock = Clock::default();
    let alloc =
        Allocator::new_and_register(&clock, engine.top(), "alloc", 0, Box::new(RoundRobin::new()))
            .unwrap();

    alloc.present([IDLE_CODE, header_code(3), IDLE_CODE, IDLE_CODE]);
    assert_eq!(alloc.outputs(), AllocatorOutputs::default());

    clock.tick();
    assert_eq!(
        alloc.outputs(),
        AllocatorOutputs {
            select: 0b0010,
            shift: 0b0010,
            hold: 0b0010
        }
    );
}

#[test]
fn contention_drops_all_but_one() {
    let engine = start_test(file!());
    let mut policy = FixedPriority::new();

    let codes = [header_code(0), IDLE_CODE, header_code(5), header_code(15)];
    let outputs = allocate(engine.top(), &codes, 0, 0, &mut policy);
    assert_eq!(outputs.hold, 0b0001);

    let requesting = [0, 2, 3];
    let dropped = requesting.iter().filter(|l| outputs.is_dropped(**l)).count();
    assert_eq!(dropped, requesting.len() - 1);
    assert!(!outputs.is_dropped(0));
}

#[test]
fn other_ports_are_ignored() {
    let engine = start_test(file!());
    let clock = Clock::default();
    let alloc =
        Allocator::new_and_register(&clock, engine.top(), "alloc", 2, Box::new(FixedPriority::new()))
            .unwrap();

    // Destinations 0, 16 and 48 are routed to ports 0, 1 and 3
    alloc.present([header_code(0), header_code(16), header_code(48), IDLE_CODE]);
    clock.tick();
    assert_eq!(alloc.outputs(), AllocatorOutputs::default());

    // Destination 32 is routed to port 2
    alloc.present([header_code(0), header_code(16), header_code(48), header_code(32)]);
    clock.tick();
    assert_eq!(alloc.outputs().hold, 0b1000);
}

#[test]
fn hold_until_release() {
    let engine = start_test(file!());
    let clock = Clock::default();
    let alloc =
        Allocator::new_and_register(&clock, engine.top(), "alloc", 0, Box::new(FixedPriority::new()))
            .unwrap();

    alloc.present([IDLE_CODE, IDLE_CODE, header_code(1), IDLE_CODE]);
    clock.tick();
    assert_eq!(alloc.hold(), 0b0100);
    assert!(alloc.outputs().granted(2));

    // Lane 0 would win arbitration but the output is held
    alloc.present([header_code(1), IDLE_CODE, IDLE_CODE, IDLE_CODE]);
    clock.tick();
    let outputs = alloc.outputs();
    assert_eq!(outputs.select, 0b0100);
    assert_eq!(outputs.shift, 0);
    assert!(outputs.is_dropped(0));

    // Only the holder can release
    alloc.release(0);
    assert_eq!(alloc.hold(), 0b0100);
    alloc.release(2);
    assert_eq!(alloc.hold(), 0);

    alloc.present([header_code(1), IDLE_CODE, IDLE_CODE, IDLE_CODE]);
    clock.tick();
    assert_eq!(alloc.hold(), 0b0001);
}

#[test]
fn round_robin_rotates() {
    let engine = start_test(file!());
    let clock = Clock::default();
    let alloc =
        Allocator::new_and_register(&clock, engine.top(), "alloc", 1, Box::new(RoundRobin::new()))
            .unwrap();

    let all = [header_code(20); NUM_LANES];
    for expected in [0, 1, 2, 3, 0, 1] {
        alloc.present(all);
        clock.tick();
        let outputs = alloc.outputs();
        assert!(outputs.granted(expected), "expected lane {expected}: {outputs:?}");
        assert_eq!(outputs.hold.count_ones(), 1);
        alloc.release(expected);
    }
}

// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

use approx::assert_relative_eq;
use arbsim_harness::sweep::SweepStrategy;

#[test]
fn cycle_sweep_points() {
    let sweep = SweepStrategy::Cycles {
        start: 1000,
        end: 10000,
        step: 1000,
        frequency: 0.1,
    };
    let points = sweep.points().unwrap();
    assert_eq!(points.len(), 10);
    assert_eq!(points[0].number_of_cycles, 1000);
    assert_eq!(points[9].number_of_cycles, 10000);
    assert!(points.iter().all(|p| p.packet_generation_frequency == 0.1));
}

#[test]
fn frequency_sweep_reaches_end() {
    let points = SweepStrategy::default().points().unwrap();
    assert_eq!(points.len(), 19);
    assert_relative_eq!(points[0].packet_generation_frequency, 0.1);
    assert_relative_eq!(points[1].packet_generation_frequency, 0.15);
    assert_eq!(points[18].packet_generation_frequency, 1.0);
    assert!(points.iter().all(|p| p.number_of_cycles == 5000));
}

#[test]
fn zero_frequency_point() {
    let sweep = SweepStrategy::Frequency {
        start: 0.0,
        end: 0.2,
        step: 0.1,
        cycles: 10,
    };
    let points = sweep.points().unwrap();
    assert_eq!(points.len(), 3);
    assert_eq!(points[0].packet_generation_frequency, 0.0);
}

#[test]
fn invalid_sweeps() {
    let bad = [
        SweepStrategy::Cycles {
            start: 10,
            end: 5,
            step: 1,
            frequency: 0.1,
        },
        SweepStrategy::Cycles {
            start: 0,
            end: 5,
            step: 1,
            frequency: 0.1,
        },
        SweepStrategy::Cycles {
            start: 1,
            end: 5,
            step: 0,
            frequency: 0.1,
        },
        SweepStrategy::Cycles {
            start: 1,
            end: 5,
            step: 1,
            frequency: 2.0,
        },
        SweepStrategy::Frequency {
            start: 0.5,
            end: 1.1,
            step: 0.1,
            cycles: 10,
        },
        SweepStrategy::Frequency {
            start: 0.1,
            end: 0.5,
            step: 0.0,
            cycles: 10,
        },
        SweepStrategy::Frequency {
            start: 0.1,
            end: 0.5,
            step: 0.1,
            cycles: 0,
        },
    ];
    for sweep in bad {
        assert!(sweep.points().is_err(), "{sweep:?}");
    }
}

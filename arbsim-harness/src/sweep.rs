// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! The configuration points an experiment visits.

use arbsim_engine::sim_error;
use arbsim_engine::types::SimError;
use serde::{Deserialize, Serialize};

/// Allowance for rounding when deciding whether a frequency point is past
/// the end of its sweep.
const FREQUENCY_TOLERANCE: f64 = 1e-9;

/// Which parameter is stepped while the other is held constant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SweepStrategy {
    Cycles {
        start: u64,
        end: u64,
        step: u64,
        frequency: f64,
    },
    Frequency {
        start: f64,
        end: f64,
        step: f64,
        cycles: u64,
    },
}

impl Default for SweepStrategy {
    fn default() -> Self {
        SweepStrategy::Frequency {
            start: 0.1,
            end: 1.0,
            step: 0.05,
            cycles: 5000,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepPoint {
    pub number_of_cycles: u64,
    pub packet_generation_frequency: f64,
}

fn check_frequency(name: &str, frequency: f64) -> Result<(), SimError> {
    if !frequency.is_finite() || !(0.0..=1.0).contains(&frequency) {
        return sim_error!(format!("Sweep {name} {frequency} is not in [0, 1]"));
    }
    Ok(())
}

impl SweepStrategy {
    /// Every point of the sweep, in order.
    ///
    /// Points are `start + i * step` up to and including `end`.
    pub fn points(&self) -> Result<Vec<SweepPoint>, SimError> {
        match *self {
            SweepStrategy::Cycles {
                start,
                end,
                step,
                frequency,
            } => {
                if start == 0 || step == 0 || start > end {
                    return sim_error!(format!(
                        "Invalid cycle sweep {start}..={end} step {step}"
                    ));
                }
                check_frequency("frequency", frequency)?;
                Ok((start..=end)
                    .step_by(step as usize)
                    .map(|number_of_cycles| SweepPoint {
                        number_of_cycles,
                        packet_generation_frequency: frequency,
                    })
                    .collect())
            }
            SweepStrategy::Frequency {
                start,
                end,
                step,
                cycles,
            } => {
                check_frequency("start", start)?;
                check_frequency("end", end)?;
                if !step.is_finite() || step <= 0.0 || start > end || cycles == 0 {
                    return sim_error!(format!(
                        "Invalid frequency sweep {start}..={end} step {step} over {cycles} cycles"
                    ));
                }
                let mut points = Vec::new();
                for i in 0u64.. {
                    let frequency = start + i as f64 * step;
                    if frequency > end + FREQUENCY_TOLERANCE {
                        break;
                    }
                    points.push(SweepPoint {
                        number_of_cycles: cycles,
                        packet_generation_frequency: frequency.min(end),
                    });
                }
                Ok(points)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_point() {
        let sweep = SweepStrategy::Cycles {
            start: 100,
            end: 100,
            step: 10,
            frequency: 0.5,
        };
        assert_eq!(
            sweep.points().unwrap(),
            vec![SweepPoint {
                number_of_cycles: 100,
                packet_generation_frequency: 0.5
            }]
        );
    }

    #[test]
    fn end_not_on_step() {
        let sweep = SweepStrategy::Cycles {
            start: 10,
            end: 35,
            step: 10,
            frequency: 0.5,
        };
        let cycles: Vec<u64> = sweep
            .points()
            .unwrap()
            .iter()
            .map(|p| p.number_of_cycles)
            .collect();
        assert_eq!(cycles, vec![10, 20, 30]);
    }
}

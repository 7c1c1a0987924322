// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Reduce trial results to one row per sweep point and write them as CSV.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use arbsim_components::allocator::NUM_LANES;
use arbsim_components::arbiter::PolicyConfig;
use arbsim_components::traffic::TrialResult;
use serde::Serialize;

use crate::error::HarnessError;
use crate::sweep::SweepPoint;

/// The summary of every iteration run at one sweep point.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AggregateRow {
    #[serde(rename = "Arbitration Policy")]
    pub policy: String,

    #[serde(rename = "Number of Cycles")]
    pub number_of_cycles: u64,

    #[serde(rename = "Packet Generation Frequency")]
    pub packet_generation_frequency: f64,

    /// Packets generated by all lanes in one trial, averaged over iterations.
    #[serde(rename = "Total Packets Generated")]
    pub total_packets_generated: f64,

    #[serde(rename = "Average Dropped Packets")]
    pub average_dropped: f64,

    #[serde(rename = "Average 0 Packets Dropped")]
    pub average_0_dropped: f64,

    #[serde(rename = "Average 1 Packets Dropped")]
    pub average_1_dropped: f64,

    #[serde(rename = "Average 2 Packets Dropped")]
    pub average_2_dropped: f64,

    #[serde(rename = "Average 3 Packets Dropped")]
    pub average_3_dropped: f64,

    #[serde(rename = "Ratio of Dropped Packets to Total Cycles")]
    pub ratio_to_cycles: f64,

    #[serde(rename = "Ratio of Dropped Packets to Packet Generation Frequency")]
    pub ratio_to_frequency: f64,

    /// The root mean square of the per-lane averages. This is not a standard
    /// deviation about the mean but is kept under the established column name.
    #[serde(rename = "Standard Deviation Dropped Packets")]
    pub std_dev_dropped: f64,
}

impl AggregateRow {
    #[must_use]
    pub fn average_lane_dropped(&self) -> [f64; NUM_LANES] {
        [
            self.average_0_dropped,
            self.average_1_dropped,
            self.average_2_dropped,
            self.average_3_dropped,
        ]
    }
}

/// Combine the iterations run at `point`.
#[must_use]
pub fn aggregate(point: &SweepPoint, policy: &PolicyConfig, results: &[TrialResult]) -> AggregateRow {
    let iterations = results.len().max(1) as f64;

    let mut lane_dropped = [0u64; NUM_LANES];
    for result in results {
        for (total, dropped) in lane_dropped.iter_mut().zip(result.dropped) {
            *total += dropped;
        }
    }
    let average_lane = lane_dropped.map(|dropped| dropped as f64 / iterations);
    let average_dropped = lane_dropped.iter().sum::<u64>() as f64 / iterations;
    let total_generated = results.iter().map(TrialResult::total_generated).sum::<u64>();

    let ratio_to_cycles = if point.number_of_cycles == 0 {
        0.0
    } else {
        average_dropped / point.number_of_cycles as f64
    };
    let ratio_to_frequency = if point.packet_generation_frequency == 0.0 {
        0.0
    } else {
        average_dropped / point.packet_generation_frequency
    };
    let std_dev_dropped =
        (average_lane.iter().map(|a| a * a).sum::<f64>() / NUM_LANES as f64).sqrt();

    AggregateRow {
        policy: policy.to_string(),
        number_of_cycles: point.number_of_cycles,
        packet_generation_frequency: point.packet_generation_frequency,
        total_packets_generated: total_generated as f64 / iterations,
        average_dropped,
        average_0_dropped: average_lane[0],
        average_1_dropped: average_lane[1],
        average_2_dropped: average_lane[2],
        average_3_dropped: average_lane[3],
        ratio_to_cycles,
        ratio_to_frequency,
        std_dev_dropped,
    }
}

/// Write `rows` as CSV. The header line is written along with the first row.
pub fn write_csv<W: Write>(writer: W, rows: &[AggregateRow]) -> Result<(), HarnessError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .flexible(false)
        .from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Open the results destination. `-` is stdout.
pub fn open_output(path: &Path) -> io::Result<Box<dyn Write>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(Box::new(BufWriter::new(fs::File::create(path)?)))
}

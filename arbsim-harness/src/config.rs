// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Command-line and file configuration of the `arbsim` application.
//!
//! Values are layered, each source overriding the ones before it:
//!
//!  1. the defaults below,
//!  2. `arbsim.toml` in the working directory (if present),
//!  3. the file given with `--conf-file`,
//!  4. `ARBSIM_*` environment variables (for example `ARBSIM_ITERATIONS=20`),
//!  5. command-line flags.
//!
//! Every field is an `Option` so that an absent flag can be told apart from a
//! flag set to its default value.

use std::path::{Path, PathBuf};

use arbsim_components::allocator::NUM_LANES;
use arbsim_components::arbiter::PolicyConfig;
use arbsim_engine::sim_error;
use arbsim_engine::types::SimError;
use arbsim_protocols::packet::{PacketConfig, PayloadPattern};
use arbsim_track::builder::TrackerConfig;
use clap::{Parser, ValueEnum};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::error::HarnessError;
use crate::experiment::ExperimentConfig;
use crate::sweep::SweepStrategy;

/// Configuration file read from the working directory.
pub const DEFAULT_CONF_FILE: &str = "arbsim.toml";

/// Prefix of the environment variables that set configuration values.
pub const ENV_PREFIX: &str = "ARBSIM_";

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SweepKind {
    /// Step the number of cycles at a fixed generation frequency.
    Cycles,
    /// Step the generation frequency over a fixed number of cycles.
    Frequency,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    FixedPriority,
    RoundRobin,
    Random,
    WeightedRoundRobin,
}

/// Command-line arguments.
#[derive(Clone, Debug, PartialEq, Parser, Serialize, Deserialize)]
#[command(about = "Measure packet drops at a single-port output allocator under random traffic")]
#[serde(default)]
pub struct Config {
    /// Which parameter to sweep.
    #[arg(long, value_enum)]
    pub sweep: Option<SweepKind>,

    /// First number of cycles of a cycle sweep.
    #[arg(long)]
    pub cycles_start: Option<u64>,

    /// Last number of cycles of a cycle sweep (inclusive).
    #[arg(long)]
    pub cycles_end: Option<u64>,

    #[arg(long)]
    pub cycles_step: Option<u64>,

    /// Packet generation frequency used throughout a cycle sweep.
    #[arg(long)]
    pub frequency: Option<f64>,

    /// First packet generation frequency of a frequency sweep.
    #[arg(long)]
    pub frequency_start: Option<f64>,

    /// Last packet generation frequency of a frequency sweep (inclusive).
    #[arg(long)]
    pub frequency_end: Option<f64>,

    #[arg(long)]
    pub frequency_step: Option<f64>,

    /// Number of cycles simulated at every point of a frequency sweep.
    #[arg(long)]
    pub cycles: Option<u64>,

    /// Number of trials run at each sweep point.
    #[arg(long)]
    pub iterations: Option<usize>,

    /// Base seed from which every trial seed is derived.
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, value_enum)]
    pub policy: Option<PolicyKind>,

    /// Per-lane weights for the weighted round robin policy, e.g. `4,2,1,1`.
    #[arg(long, value_delimiter = ',')]
    pub weights: Option<Vec<usize>>,

    /// The output port served by the allocator.
    #[arg(long)]
    pub port: Option<u8>,

    /// Smallest payload in bits (a multiple of 16).
    #[arg(long)]
    pub min_payload_bits: Option<u32>,

    /// Largest payload in bits (a multiple of 16).
    #[arg(long)]
    pub max_payload_bits: Option<u32>,

    /// Fill payloads with random data rather than a fixed pattern.
    #[arg(long)]
    pub random_payload: Option<bool>,

    /// Send every packet to this destination rather than a random one.
    #[arg(long)]
    pub destination: Option<u8>,

    /// Lanes that never generate traffic, e.g. `1,3`.
    #[arg(long, value_delimiter = ',')]
    pub disabled_lanes: Option<Vec<usize>>,

    /// Worker threads, 0 to use one per core.
    #[arg(long)]
    pub threads: Option<usize>,

    /// File the CSV results are written to. Use '-' to write to stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Level of log message to display.
    #[arg(long)]
    pub log_level: Option<log::Level>,

    /// Set a regular expression for which entities should have logging level
    /// set to `--log-level`. Others will have level set to `Error`.
    #[arg(long)]
    pub log_filter_regex: Option<String>,

    /// The file log messages are written to. Use '-' to write to stdout.
    /// Defaults to stderr.
    #[arg(long)]
    pub log_file: Option<String>,

    /// Path to additional configuration file
    ///
    /// This additional configuration file must contain TOML, and set values for
    /// fields of this struct.
    #[arg(long)]
    pub conf_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sweep: Some(SweepKind::Frequency),
            cycles_start: Some(1000),
            cycles_end: Some(10000),
            cycles_step: Some(1000),
            frequency: Some(0.1),
            frequency_start: Some(0.1),
            frequency_end: Some(1.0),
            frequency_step: Some(0.05),
            cycles: Some(5000),
            iterations: Some(10),
            seed: Some(0),
            policy: Some(PolicyKind::RoundRobin),
            weights: Some(vec![1; NUM_LANES]),
            port: Some(0),
            min_payload_bits: Some(32),
            max_payload_bits: Some(512),
            random_payload: Some(false),
            destination: None,
            disabled_lanes: Some(Vec::new()),
            threads: Some(0),
            output: Some(PathBuf::from("arbsim_results.csv")),
            log_level: Some(log::Level::Warn),
            log_filter_regex: Some(String::new()),
            log_file: None,
            conf_file: Some(PathBuf::new()),
        }
    }
}

macro_rules! merge_set_fields {
    ($config:ident, $cli:ident ; $($field:ident),+ $(,)?) => {
        $(
            if $cli.$field.is_some() {
                $config.$field = $cli.$field;
            }
        )+
    };
}

fn required<T: Clone>(value: &Option<T>, name: &str) -> Result<T, SimError> {
    match value {
        Some(value) => Ok(value.clone()),
        None => Err(SimError(format!("No value for {name}"))),
    }
}

impl Config {
    /// Parse the command line and combine it with all other sources.
    pub fn parse_all_sources() -> Result<Self, HarnessError> {
        Self::from_sources(Self::parse(), Path::new(DEFAULT_CONF_FILE))
    }

    /// Combine already parsed command-line arguments with the defaults,
    /// `static_conf_file`, any `--conf-file` and the environment.
    pub fn from_sources(cli: Config, static_conf_file: &Path) -> Result<Self, HarnessError> {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(static_conf_file));

        if let Some(conf_file) = cli.conf_file.as_ref() {
            if !conf_file.as_os_str().is_empty() {
                if !conf_file.is_file() {
                    return Err(HarnessError::Io(std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        format!("{} is not a file", conf_file.display()),
                    )));
                }
                figment = figment.merge(Toml::file(conf_file));
            }
        }

        let config: Config = figment.merge(Env::prefixed(ENV_PREFIX)).extract()?;
        Ok(config.clap_merge(cli))
    }

    fn clap_merge(mut self, cli: Config) -> Self {
        merge_set_fields!(self, cli ;
            sweep,
            cycles_start,
            cycles_end,
            cycles_step,
            frequency,
            frequency_start,
            frequency_end,
            frequency_step,
            cycles,
            iterations,
            seed,
            policy,
            weights,
            port,
            min_payload_bits,
            max_payload_bits,
            random_payload,
            destination,
            disabled_lanes,
            threads,
            output,
            log_level,
            log_filter_regex,
            log_file,
            conf_file,
        );
        self
    }

    pub fn sweep_strategy(&self) -> Result<SweepStrategy, SimError> {
        let sweep = match required(&self.sweep, "sweep")? {
            SweepKind::Cycles => SweepStrategy::Cycles {
                start: required(&self.cycles_start, "cycles_start")?,
                end: required(&self.cycles_end, "cycles_end")?,
                step: required(&self.cycles_step, "cycles_step")?,
                frequency: required(&self.frequency, "frequency")?,
            },
            SweepKind::Frequency => SweepStrategy::Frequency {
                start: required(&self.frequency_start, "frequency_start")?,
                end: required(&self.frequency_end, "frequency_end")?,
                step: required(&self.frequency_step, "frequency_step")?,
                cycles: required(&self.cycles, "cycles")?,
            },
        };
        Ok(sweep)
    }

    pub fn policy_config(&self) -> Result<PolicyConfig, SimError> {
        let policy = match required(&self.policy, "policy")? {
            PolicyKind::FixedPriority => PolicyConfig::FixedPriority,
            PolicyKind::RoundRobin => PolicyConfig::RoundRobin,
            PolicyKind::Random => PolicyConfig::Random,
            PolicyKind::WeightedRoundRobin => {
                PolicyConfig::WeightedRoundRobin(required(&self.weights, "weights")?)
            }
        };
        Ok(policy)
    }

    pub fn packet_config(&self) -> Result<PacketConfig, SimError> {
        let payload = if required(&self.random_payload, "random_payload")? {
            PayloadPattern::Random
        } else {
            PayloadPattern::default()
        };
        Ok(PacketConfig {
            min_payload_bits: required(&self.min_payload_bits, "min_payload_bits")?,
            max_payload_bits: required(&self.max_payload_bits, "max_payload_bits")?,
            payload,
            destination: self.destination,
        })
    }

    pub fn active_lanes(&self) -> Result<[bool; NUM_LANES], SimError> {
        let mut active_lanes = [true; NUM_LANES];
        for lane in self.disabled_lanes.iter().flatten() {
            match active_lanes.get_mut(*lane) {
                Some(active) => *active = false,
                None => return sim_error!(format!("There is no lane {lane} to disable")),
            }
        }
        Ok(active_lanes)
    }

    /// Describe the tracker that log messages are written through.
    ///
    /// Log messages and CSV results cannot both go to stdout.
    pub fn tracker_config(&self) -> Result<TrackerConfig<'_>, SimError> {
        let log_file = self.log_file.as_deref();
        let output_to_stdout = self.output.as_deref().is_some_and(|p| p == Path::new("-"));
        if output_to_stdout && log_file == Some("-") {
            return sim_error!("Log messages and results cannot both be written to stdout");
        }
        Ok(TrackerConfig {
            enable: true,
            level: required(&self.log_level, "log_level")?,
            filter_regex: self.log_filter_regex.as_deref().unwrap_or_default(),
            file: log_file,
        })
    }

    /// Build the experiment described by this configuration.
    pub fn experiment_config(&self) -> Result<ExperimentConfig, SimError> {
        let config = ExperimentConfig {
            sweep: self.sweep_strategy()?,
            total_iterations: required(&self.iterations, "iterations")?,
            base_seed: required(&self.seed, "seed")?,
            policy: self.policy_config()?,
            this_port: required(&self.port, "port")?,
            packet: self.packet_config()?,
            active_lanes: self.active_lanes()?,
            num_threads: required(&self.threads, "threads")?,
        };
        config.validate()?;
        Ok(config)
    }
}

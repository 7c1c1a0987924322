// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Errors raised while configuring or running an experiment.

use arbsim_engine::types::SimError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error(transparent)]
    Sim(#[from] SimError),

    #[error("invalid configuration: {0}")]
    Config(Box<figment::Error>),

    #[error("failed to write results: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl From<figment::Error> for HarnessError {
    fn from(e: figment::Error) -> Self {
        HarnessError::Config(Box::new(e))
    }
}

impl From<HarnessError> for SimError {
    fn from(e: HarnessError) -> Self {
        match e {
            HarnessError::Sim(e) => e,
            other => SimError(other.to_string()),
        }
    }
}

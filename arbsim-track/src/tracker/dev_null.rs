// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::tracker::Track;
use crate::{Id, ROOT};

/// A tracker that does nothing.
///
/// This can be useful for benchmarks that want to have minimum overheads.
pub struct DevNullTracker {
    unique_id: AtomicU64,
}

impl Default for DevNullTracker {
    fn default() -> Self {
        Self {
            unique_id: AtomicU64::new(ROOT.0 + 1),
        }
    }
}

impl Track for DevNullTracker {
    fn unique_id(&self) -> Id {
        Id(self.unique_id.fetch_add(1, Ordering::Relaxed))
    }

    fn is_entity_enabled(&self, _id: Id, _level: log::Level) -> bool {
        false
    }

    fn add_entity(&self, _id: Id, _entity_name: &str) {}

    fn log(&self, _msg_by: Id, _level: log::Level, _msg: std::fmt::Arguments) {}

    fn shutdown(&self) {}
}

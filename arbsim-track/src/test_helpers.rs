// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! This module provides helper functions for testing logging output
//!
//! The aim of this module is to provide commonly-used functions that enable the
//! testing of the output that should appear from logging macros.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use regex::Regex;

use crate::{Id, Track};

/// A tracker that keeps log events in memory.
pub struct TestTracker {
    events: Mutex<Vec<String>>,

    unique_id: AtomicU64,

    level: log::Level,
}

impl TestTracker {
    /// Create a new [`Tracker`](crate::Tracker) for the tests.
    ///
    /// This keeps the log events at or above `level` in memory for checking
    /// later.
    #[must_use]
    pub fn new(initial_id: u64, level: log::Level) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            unique_id: AtomicU64::new(initial_id),
            level,
        }
    }

    fn add_event(&self, event: String) {
        let mut events = self.events.lock().unwrap();
        events.push(event);
    }

    /// Return a copy of all events recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl Track for TestTracker {
    fn unique_id(&self) -> Id {
        let id = self.unique_id.fetch_add(1, Ordering::SeqCst);
        Id(id)
    }

    fn is_entity_enabled(&self, _id: Id, level: log::Level) -> bool {
        level <= self.level
    }

    fn add_entity(&self, _id: Id, _entity_name: &str) {
        // Do nothing
    }

    fn log(&self, id: Id, level: log::Level, msg: std::fmt::Arguments) {
        self.add_event(format!("{id}:{level}: {msg}"));
    }

    fn shutdown(&self) {
        // Do nothing
    }
}

/// Initialise a tracker for tests
///
/// Returns both the concrete [`TestTracker`] (to check events against) and
/// the same object as a [`Tracker`](crate::Tracker) (to build entities with).
///
/// # Examples
///
/// ```
/// use arbsim_track::{info, test_helpers};
///
/// let (test_tracker, tracker) = arbsim_track::test_init!(10, arbsim_track::log::Level::Info);
/// let top = arbsim_track::entity::toplevel(&tracker, "top");
/// info!(top ; "hello");
/// test_helpers::check_and_clear(&test_tracker, &["1:INFO: hello"]);
/// ```
#[macro_export]
macro_rules! test_init {
    ($start_id:expr, $level:expr) => {{
        let test_tracker = std::sync::Arc::new($crate::test_helpers::TestTracker::new(
            $start_id, $level,
        ));
        let tracker: $crate::Tracker = test_tracker.clone();
        (test_tracker, tracker)
    }};
}

/// Check and clear the _log_ output
///
/// This function asserts that the logging output lines seen since the start or
/// the last time this function was called are expected. It then also clears
/// the _log_ output recorded so far.
///
/// # Arguments
///
/// * `tracker`  - A reference to the [`TestTracker`] being used in the test.
/// * `expected` - An array of expected regular expressions that the logging
///   output will be matched against.
pub fn check_and_clear(tracker: &TestTracker, expected: &[&str]) {
    let mut log_contents_ref = tracker.events.lock().unwrap();

    let num_strings = expected.len();
    assert_eq!(
        num_strings,
        log_contents_ref.len(),
        "{expected:?} != {:?}",
        *log_contents_ref
    );

    for (i, log_expect) in expected.iter().enumerate() {
        let re = Regex::new(log_expect).unwrap();
        let actual = &(*log_contents_ref[i]);
        assert!(re.is_match(actual), "{log_expect:?} does not match {actual:?}");
    }

    log_contents_ref.clear();
}

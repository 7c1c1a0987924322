// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Define the [`Track`] trait and a number of [`Tracker`]s.

/// Include the /dev/null tracker.
pub mod dev_null;
/// Include the text-based tracker.
pub mod text;

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

pub use dev_null::DevNullTracker;
use regex::Regex;
pub use text::TextTracker;

use crate::{Id, ROOT};

/// Error returned when a tracker cannot be configured as requested.
#[derive(Debug)]
pub struct TrackConfigError(pub String);

impl fmt::Display for TrackConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Error: {}", self.0)
    }
}

impl std::error::Error for TrackConfigError {}

/// This is the interface that is supported by all [`Tracker`]s.
pub trait Track {
    /// Allocate a new global ID
    fn unique_id(&self) -> Id;

    /// Determine whether logging is enabled at the given level for an entity.
    fn is_entity_enabled(&self, id: Id, level: log::Level) -> bool;

    /// Register an entity and its full hierarchical name.
    fn add_entity(&self, id: Id, entity_name: &str);

    /// Track a log message of the given level.
    fn log(&self, msg_by: Id, level: log::Level, msg: std::fmt::Arguments);

    /// Flush any buffered output.
    fn shutdown(&self);
}

/// The type of a [`Tracker`] that is shared across entities and threads.
pub type Tracker = Arc<dyn Track + Send + Sync>;

/// Create a [`Tracker`] that suppresses all log events.
#[must_use]
pub fn dev_null_tracker() -> Tracker {
    let tracker: Tracker = Arc::new(DevNullTracker::default());
    tracker
}

/// The [`EntityManager`] is responsible for determining entity log levels.
///
/// It keeps the name of every registered entity so that text output can
/// refer to entities by name. This manager is also used to allocate unique
/// [`Id`] values.
pub struct EntityManager {
    /// Level of log events to output for entities not matching any filter.
    default_entity_level: log::Level,

    /// List of regular expressions mapping entity names to log levels.
    regex_to_entity_level: Vec<(Regex, log::Level)>,

    /// Used to assign unique IDs.
    unique_id: AtomicU64,

    /// Entities whose level differs from the default.
    log_entity_lookup: RwLock<HashMap<Id, log::Level>>,

    /// Full names of all registered entities.
    entity_names: RwLock<HashMap<Id, String>>,
}

impl EntityManager {
    /// Constructor with default [`log::Level`]
    #[must_use]
    pub fn new(default_entity_level: log::Level) -> Self {
        Self {
            default_entity_level,
            regex_to_entity_level: Vec::new(),
            unique_id: AtomicU64::new(ROOT.0 + 1),
            log_entity_lookup: RwLock::new(HashMap::new()),
            entity_names: RwLock::new(HashMap::new()),
        }
    }

    fn unique_id(&self) -> Id {
        Id(self.unique_id.fetch_add(1, Ordering::SeqCst))
    }

    fn is_log_enabled_at_level(&self, id: Id, level: log::Level) -> bool {
        match self.log_entity_lookup.read().unwrap().get(&id) {
            None => level <= self.default_entity_level,
            Some(entity_level) => level <= *entity_level,
        }
    }

    fn add_entity(&self, id: Id, entity_name: &str) {
        let entity_level = self.log_level_for(entity_name);
        if entity_level != self.default_entity_level {
            self.log_entity_lookup
                .write()
                .unwrap()
                .insert(id, entity_level);
        }
        self.entity_names
            .write()
            .unwrap()
            .insert(id, entity_name.to_string());
    }

    fn entity_name(&self, id: Id) -> String {
        match self.entity_names.read().unwrap().get(&id) {
            Some(name) => name.clone(),
            None => format!("<{id}>"),
        }
    }

    fn log_level_for(&self, entity_name: &str) -> log::Level {
        for (regex, level) in &self.regex_to_entity_level {
            if regex.is_match(entity_name) {
                return *level;
            }
        }
        self.default_entity_level
    }

    /// Add a filter regular expression to set matching entites to a given
    /// level.
    ///
    /// The first filter added that matches an entity takes priority.
    ///
    /// # Example
    ///
    /// ```rust
    /// use arbsim_track::tracker::EntityManager;
    /// let mut manager = EntityManager::new(arbsim_track::log::Level::Warn);
    /// manager
    ///     .add_entity_level_filter(".*alloc.*", arbsim_track::log::Level::Trace)
    ///     .unwrap();
    /// ```
    pub fn add_entity_level_filter(
        &mut self,
        regex_str: &str,
        level: crate::log::Level,
    ) -> Result<(), TrackConfigError> {
        match Regex::new(regex_str) {
            Ok(regex) => self.regex_to_entity_level.push((regex, level)),
            Err(e) => {
                return Err(TrackConfigError(format!(
                    "Failed to parse regex {regex_str}:\n{e}\n"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use log::Level;

    use super::*;

    fn entity_paths() -> Vec<&'static str> {
        vec![
            "top",
            "top::trial0_0",
            "top::trial0_0::alloc",
            "top::trial0_0::lane2",
        ]
    }

    #[test]
    fn no_filters() {
        let manager = EntityManager::new(Level::Error);

        for p in entity_paths() {
            assert_eq!(manager.log_level_for(p), Level::Error);
        }
    }

    #[test]
    fn filter_alloc_trace() {
        let mut manager = EntityManager::new(Level::Warn);
        manager
            .add_entity_level_filter(r".*alloc", Level::Trace)
            .unwrap();

        let expected_levels = [Level::Warn, Level::Warn, Level::Trace, Level::Warn];
        for (i, p) in entity_paths().iter().enumerate() {
            assert_eq!(manager.log_level_for(p), expected_levels[i]);
        }
    }

    #[test]
    fn first_filter_wins() {
        let mut manager = EntityManager::new(Level::Error);
        manager
            .add_entity_level_filter(r".*lane2", Level::Info)
            .unwrap();
        manager
            .add_entity_level_filter(r".*trial0_0.*", Level::Debug)
            .unwrap();

        let expected_levels = [Level::Error, Level::Debug, Level::Debug, Level::Info];
        for (i, p) in entity_paths().iter().enumerate() {
            assert_eq!(manager.log_level_for(p), expected_levels[i]);
        }
    }

    #[test]
    fn enabled_levels_follow_registration() {
        let mut manager = EntityManager::new(Level::Warn);
        manager
            .add_entity_level_filter(r".*alloc", Level::Debug)
            .unwrap();

        let alloc = manager.unique_id();
        let lane = manager.unique_id();
        manager.add_entity(alloc, "top::trial0_0::alloc");
        manager.add_entity(lane, "top::trial0_0::lane2");

        assert!(manager.is_log_enabled_at_level(alloc, Level::Debug));
        assert!(!manager.is_log_enabled_at_level(alloc, Level::Trace));
        assert!(manager.is_log_enabled_at_level(lane, Level::Warn));
        assert!(!manager.is_log_enabled_at_level(lane, Level::Info));
        assert_eq!(manager.entity_name(lane), "top::trial0_0::lane2");
    }

    #[test]
    fn bad_regex() {
        let mut manager = EntityManager::new(Level::Warn);
        assert!(manager.add_entity_level_filter(r"(", Level::Debug).is_err());
    }

    #[test]
    fn ids() {
        let manager = EntityManager::new(Level::Error);
        for i in 0..10 {
            assert_eq!(manager.unique_id(), Id(i + ROOT.0 + 1));
        }
    }
}

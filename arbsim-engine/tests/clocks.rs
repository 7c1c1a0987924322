// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

use std::cell::RefCell;
use std::rc::Rc;

use arbsim_engine::test_helpers::start_test;
use arbsim_engine::time::clock::Clock;
use arbsim_engine::traits::{Resolve, Resolver};

/// Records the tick at which it was resolved.
struct Recorder {
    name: &'static str,
    clock: Clock,
    seen: Rc<RefCell<Vec<(&'static str, u64)>>>,
}

impl Resolve for Recorder {
    fn resolve(&self) {
        self.seen
            .borrow_mut()
            .push((self.name, self.clock.tick_now().tick()));
    }
}

/// Components are resolved in registration order on every edge, before the
/// tick count moves on.
#[test]
fn resolve_order() {
    let _engine = start_test(file!());
    let clock = Clock::default();
    let seen = Rc::new(RefCell::new(Vec::new()));

    for name in ["a", "b"] {
        clock.add_resolve(Rc::new(Recorder {
            name,
            clock: clock.clone(),
            seen: seen.clone(),
        }));
    }

    clock.tick();
    clock.tick();

    assert_eq!(*seen.borrow(), vec![("a", 0), ("b", 0), ("a", 1), ("b", 1)]);
    assert_eq!(clock.tick_now().tick(), 2);
}

#[test]
fn clones_share_registrations() {
    let _engine = start_test(file!());
    let clock = Clock::default();
    let seen = Rc::new(RefCell::new(Vec::new()));
    clock.add_resolve(Rc::new(Recorder {
        name: "r",
        clock: clock.clone(),
        seen: seen.clone(),
    }));

    let other = clock.clone();
    other.tick();
    assert_eq!(*seen.borrow(), vec![("r", 0)]);
    assert_eq!(clock.tick_now().tick(), 1);
}

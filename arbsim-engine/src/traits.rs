// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! A set of common traits used across the engine.

use std::rc::Rc;

/// Complete any pending update on a clock edge.
///
/// Components that model synchronous logic latch the inputs presented to them
/// during a cycle and only compute their new outputs when `resolve` is called
/// by the [`Clock`](crate::time::clock::Clock) at the end of the cycle.
pub trait Resolve {
    /// Complete any pending update.
    fn resolve(&self);
}

/// A [`Resolver`] is used to register any [`Resolve`] functions that need to be
/// called.
pub trait Resolver {
    fn add_resolve(&self, resolve: Rc<dyn Resolve + 'static>);
}

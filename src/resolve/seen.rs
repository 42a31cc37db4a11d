//! Per-pass bookkeeping of which arguments were supplied.
//!
//! A resolution pass may run nested sub-parses (intermixed parsing runs
//! two). They all share one [`SeenTracker`]; a depth counter makes sure
//! only the outermost entry resets it and runs the environment post-pass.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;

use crate::args::{ArgId, ArgSpec, Conversion, ValueConverter};
use crate::error::ConversionError;

/// Set of arguments supplied during the current pass.
#[derive(Debug, Default)]
pub struct SeenTracker {
    seen: RefCell<BTreeSet<ArgId>>,
    depth: Cell<usize>,
}

impl SeenTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_seen(&self, arg: ArgId) {
        self.seen.borrow_mut().insert(arg);
    }

    pub fn was_seen(&self, arg: ArgId) -> bool {
        self.seen.borrow().contains(&arg)
    }

    pub fn reset(&self) {
        self.seen.borrow_mut().clear();
    }

    /// Arguments seen so far, in declaration order.
    pub fn seen(&self) -> Vec<ArgId> {
        self.seen.borrow().iter().copied().collect()
    }

    /// Current nesting depth of parse entries.
    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    /// Enter a parse entry point.
    ///
    /// The outermost entry resets the tracker. The depth is restored when
    /// the returned guard drops, on success and failure alike.
    pub fn enter(&self) -> PassGuard<'_> {
        let depth = self.depth.get();
        if depth == 0 {
            self.reset();
        }
        self.depth.set(depth + 1);
        PassGuard {
            tracker: self,
            outermost: depth == 0,
        }
    }
}

/// Scoped membership in a resolution pass.
#[must_use = "dropping the guard immediately leaves the pass"]
#[derive(Debug)]
pub struct PassGuard<'a> {
    tracker: &'a SeenTracker,
    outermost: bool,
}

impl PassGuard<'_> {
    /// Whether this entry owns the pass (reset, post-pass, reporting).
    pub fn is_outermost(&self) -> bool {
        self.outermost
    }
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        let depth = self.tracker.depth.get();
        self.tracker.depth.set(depth.saturating_sub(1));
    }
}

/// The shared value-extraction path.
///
/// Wraps each argument's own converter: marks the argument seen, then
/// delegates. Command-line and environment tokens both go through it.
#[derive(Debug, Clone, Copy)]
pub struct MarkSeen<'a> {
    tracker: &'a SeenTracker,
}

impl<'a> MarkSeen<'a> {
    pub fn new(tracker: &'a SeenTracker) -> Self {
        Self { tracker }
    }
}

impl ValueConverter for MarkSeen<'_> {
    fn convert(&self, spec: &ArgSpec, tokens: &[String]) -> Result<Conversion, ConversionError> {
        if let Some(id) = spec.id() {
            self.tracker.mark_seen(id);
        }
        spec.value_converter().convert(spec, tokens)
    }
}

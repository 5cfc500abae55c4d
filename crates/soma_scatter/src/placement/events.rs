//! Event types and sinks for observing placement runs.
//!
//! This module defines [`PlacementEvent`] and a set of sinks to emit, collect,
//! or forward events while executing the engine's driving loops. Sinks are
//! injected per run; the engine keeps no logging state of its own.
use glam::Vec3;

use crate::placement::Strategy;

/// Describes events emitted by placement runs.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum PlacementEvent {
    /// Emitted when a driving loop starts.
    RunStarted {
        /// Target sphere count for the run.
        total_spheres: usize,
        /// Strategy bound at engine construction.
        strategy: Strategy,
    },

    /// Emitted when an equal-density group starts processing.
    GroupStarted {
        /// Position of the group in iteration order.
        index: usize,
        /// Target count for this group.
        count: usize,
        /// Number of candidate voxels in this group.
        voxels: usize,
    },

    /// Emitted when an equal-density group finishes processing.
    GroupFinished {
        /// Position of the group in iteration order.
        index: usize,
        /// Spheres actually placed in this group.
        placed: usize,
    },

    /// Emitted after a sphere is accepted into the pattern.
    SpherePlaced {
        /// Accepted center position.
        position: Vec3,
        /// Accepted radius.
        radius: f32,
    },

    /// Emitted when the driving loop finishes.
    RunFinished {
        /// Spheres placed over the whole run.
        placed: usize,
        /// Candidate positions evaluated.
        evaluated: usize,
        /// Candidate positions rejected.
        rejected: usize,
    },

    /// Non-fatal warning generated during placement.
    Warning {
        /// Context string (e.g. a group index).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant used by sinks to opt in to event kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementEventKind {
    RunStarted,
    GroupStarted,
    GroupFinished,
    SpherePlaced,
    RunFinished,
    Warning,
}

impl PlacementEvent {
    pub fn kind(&self) -> PlacementEventKind {
        match self {
            PlacementEvent::RunStarted { .. } => PlacementEventKind::RunStarted,
            PlacementEvent::GroupStarted { .. } => PlacementEventKind::GroupStarted,
            PlacementEvent::GroupFinished { .. } => PlacementEventKind::GroupFinished,
            PlacementEvent::SpherePlaced { .. } => PlacementEventKind::SpherePlaced,
            PlacementEvent::RunFinished { .. } => PlacementEventKind::RunFinished,
            PlacementEvent::Warning { .. } => PlacementEventKind::Warning,
        }
    }
}

/// A generic event sink that accepts [`PlacementEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: PlacementEvent);

    /// Sinks can skip kinds they do not record; the engine checks before
    /// building event payloads.
    fn wants(&self, _kind: PlacementEventKind) -> bool {
        true
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: PlacementEvent) {}

    #[inline]
    fn wants(&self, _kind: PlacementEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(PlacementEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(PlacementEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(PlacementEvent),
{
    #[inline]
    fn send(&mut self, event: PlacementEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<PlacementEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            events: Vec::with_capacity(cap),
        }
    }

    pub fn into_inner(self) -> Vec<PlacementEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[PlacementEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: PlacementEvent) {
        self.events.push(event);
    }
}

//! Progress reporting for clustering runs.
//!
//! The engine never writes to a fixed sink. It emits [`KMeansEvent`]s to a
//! [`KMeansObserver`]; the default [`TracingObserver`] turns them into
//! `tracing` events, [`RecordingObserver`] keeps them in memory.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::kmeans::StopReason;

/// A structured progress event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum KMeansEvent {
    /// A candidate cluster computed by a reassignment pass.
    ClusterUpdated {
        /// 1-based pass number
        pass: usize,
        /// Cluster index
        cluster: usize,
        /// Candidate quality (sum of member distances to centroid)
        quality: f64,
        /// Candidate member count
        size: usize,
    },
    /// One reassignment pass finished.
    PassCompleted {
        /// 1-based pass number
        pass: usize,
        /// Points that moved to a different cluster
        reassigned: usize,
        /// Current aggregate quality minus candidate aggregate quality
        quality_delta: f64,
        /// Candidate aggregate quality
        quality: f64,
    },
    /// The run stopped.
    RunCompleted {
        /// Passes executed
        passes: usize,
        /// Aggregate quality of the final partition
        quality: f64,
        /// Why the run stopped
        reason: StopReason,
    },
    /// The run failed because a pass emptied a cluster.
    RunAborted {
        /// Passes executed, including the failing one
        passes: usize,
        /// Cluster the failing pass emptied
        cluster: usize,
        /// Aggregate quality of the partition kept on the engine
        quality: f64,
    },
}

/// Receives progress events from the engine.
///
/// Observers are informational only; nothing they do can change the
/// outcome of a run.
pub trait KMeansObserver: Send + Sync {
    /// Handle one event.
    fn on_event(&self, event: &KMeansEvent);
}

impl<O: KMeansObserver + ?Sized> KMeansObserver for Arc<O> {
    fn on_event(&self, event: &KMeansEvent) {
        (**self).on_event(event)
    }
}

impl<O: KMeansObserver + ?Sized> KMeansObserver for Box<O> {
    fn on_event(&self, event: &KMeansEvent) {
        (**self).on_event(event)
    }
}

/// Forwards events to `tracing`.
///
/// Per-cluster updates are logged at `trace` and pass summaries at `debug`.
/// A finished run is logged at `info`, an aborted one at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl KMeansObserver for TracingObserver {
    fn on_event(&self, event: &KMeansEvent) {
        match *event {
            KMeansEvent::ClusterUpdated {
                pass,
                cluster,
                quality,
                size,
            } => trace!(pass, cluster, quality, size, "Candidate cluster computed"),
            KMeansEvent::PassCompleted {
                pass,
                reassigned,
                quality_delta,
                quality,
            } => debug!(
                pass,
                reassigned, quality_delta, quality, "Batch k-means pass completed"
            ),
            KMeansEvent::RunCompleted {
                passes,
                quality,
                reason,
            } => info!(passes, quality, reason = ?reason, "Batch k-means complete"),
            KMeansEvent::RunAborted {
                passes,
                cluster,
                quality,
            } => warn!(passes, cluster, quality, "Reassignment pass emptied a cluster"),
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl KMeansObserver for NoopObserver {
    fn on_event(&self, _event: &KMeansEvent) {}
}

/// Collects events in memory, in emission order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<KMeansEvent>>,
}

impl RecordingObserver {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events
    pub fn events(&self) -> Vec<KMeansEvent> {
        self.events.lock().clone()
    }

    /// Recorded `PassCompleted` events as `(pass, reassigned, quality_delta)`
    pub fn passes(&self) -> Vec<(usize, usize, f64)> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match *e {
                KMeansEvent::PassCompleted {
                    pass,
                    reassigned,
                    quality_delta,
                    ..
                } => Some((pass, reassigned, quality_delta)),
                _ => None,
            })
            .collect()
    }

    /// Drop all recorded events
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl KMeansObserver for RecordingObserver {
    fn on_event(&self, event: &KMeansEvent) {
        self.events.lock().push(event.clone());
    }
}

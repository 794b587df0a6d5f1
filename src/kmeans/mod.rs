//! # Batch K-Means
//!
//! Lloyd-style k-means over any [`ClusterVector`]. A run starts from a
//! round-robin partition of the input (`point[i]` goes to cluster `i mod k`)
//! and then repeats batch reassignment passes. Each pass computes, for every
//! point, the nearest centroid of the *current* partition, producing a
//! [`CandidateState`]. The candidate replaces the current partition only if
//!
//! - its aggregate quality improved by at least the configured tolerance, and
//! - at least one point moved.
//!
//! Quality is the sum of member distances to their centroid; lower is better.
//!
//! ## Example
//!
//! ```rust
//! use sparse_kmeans::{BatchKMeans, Instance, SparseVector};
//!
//! # fn main() -> sparse_kmeans::Result<()> {
//! let points: Vec<Instance> = [0.0, 1.0, 10.0, 11.0]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, &x)| Instance::new(format!("p{i}"), SparseVector::new(vec![0], vec![x])))
//!     .collect();
//!
//! let mut kmeans = BatchKMeans::new(2)?;
//! let summary = kmeans.cluster(&points)?;
//!
//! assert!(summary.converged());
//! assert_eq!(kmeans.cluster_of("p1"), Some(0));
//! assert_eq!(kmeans.cluster_of("p2"), Some(1));
//! # Ok(())
//! # }
//! ```
//!
//! ## Preconditions
//!
//! The input must hold at least `k` points with unique ids. A pass that
//! leaves a cluster without members aborts the run with
//! [`KMeansError::EmptyCluster`]; the partition accepted before that pass
//! stays readable on the engine.

mod cluster;
mod pass;

pub use cluster::Cluster;
pub use pass::CandidateState;

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::config::KMeansConfig;
use crate::error::{KMeansError, Result};
use crate::instance::Instance;
use crate::observe::{KMeansEvent, KMeansObserver, TracingObserver};
use crate::sparse::{ClusterVector, SparseVector};

/// Why a clustering run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The last pass moved no point.
    Converged,
    /// The last pass did not improve quality by at least the tolerance.
    NoImprovement,
    /// The pass limit was hit; the partition is the best one accepted so far.
    MaxPassesReached,
}

/// Outcome of [`BatchKMeans::cluster`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KMeansSummary {
    /// Reassignment passes executed, including the final rejected one
    pub passes: usize,
    /// Point moves summed over all accepted passes
    pub reassigned_total: usize,
    /// Aggregate quality of the final partition
    pub quality: f64,
    /// Why the run stopped
    pub reason: StopReason,
}

impl KMeansSummary {
    /// True unless the run was cut off by the pass limit
    pub fn converged(&self) -> bool {
        self.reason != StopReason::MaxPassesReached
    }
}

/// Batch k-means engine.
///
/// Holds the current partition between runs; every call to
/// [`cluster`](Self::cluster) starts over from the round-robin partition of
/// its input.
#[derive(Debug)]
pub struct BatchKMeans<V = SparseVector, O = TracingObserver> {
    config: KMeansConfig,
    clusters: Vec<Cluster<V>>,
    observer: O,
    fitted: bool,
}

impl<V: ClusterVector> BatchKMeans<V, TracingObserver> {
    /// Create an engine with `k` clusters and default settings
    pub fn new(k: usize) -> Result<Self> {
        Self::with_config(KMeansConfig::new(k))
    }

    /// Create an engine from a full configuration
    pub fn with_config(config: KMeansConfig) -> Result<Self> {
        config.validate()?;
        let clusters = (0..config.n_clusters).map(|_| Cluster::empty()).collect();
        Ok(Self {
            config,
            clusters,
            observer: TracingObserver,
            fitted: false,
        })
    }
}

impl<V: ClusterVector, O: KMeansObserver> BatchKMeans<V, O> {
    /// Replace the progress observer
    pub fn with_observer<P: KMeansObserver>(self, observer: P) -> BatchKMeans<V, P> {
        BatchKMeans {
            config: self.config,
            clusters: self.clusters,
            observer,
            fitted: self.fitted,
        }
    }

    /// Number of clusters
    pub fn k(&self) -> usize {
        self.config.n_clusters
    }

    /// Engine configuration
    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }

    /// Whether a run has produced a partition
    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    /// Partition `points` into `k` clusters.
    ///
    /// On success the engine holds the final partition. Input validation
    /// errors leave the engine untouched.
    #[instrument(skip_all, fields(k = self.config.n_clusters, points = points.len()))]
    pub fn cluster(&mut self, points: &[Instance<V>]) -> Result<KMeansSummary> {
        self.validate_input(points)?;

        let k = self.k();
        let mut groups: Vec<Vec<Instance<V>>> = vec![Vec::new(); k];
        for (i, point) in points.iter().enumerate() {
            groups[i % k].push(point.clone());
        }
        self.clusters = groups.into_iter().map(Cluster::from_members).collect();
        self.fitted = true;

        debug!(quality = self.partition_quality(), "Initial partition built");

        let mut passes = 0;
        let mut reassigned_total = 0;

        let reason = loop {
            if passes == self.config.max_passes {
                warn!(
                    max_passes = self.config.max_passes,
                    "Pass limit reached before convergence"
                );
                break StopReason::MaxPassesReached;
            }
            passes += 1;

            let candidate = self.reassignment_pass();
            let candidate_quality = candidate.quality();
            let quality_delta = self.partition_quality() - candidate_quality;

            for (cluster, c) in candidate.clusters().iter().enumerate() {
                self.observer.on_event(&KMeansEvent::ClusterUpdated {
                    pass: passes,
                    cluster,
                    quality: c.quality(),
                    size: c.len(),
                });
            }
            self.observer.on_event(&KMeansEvent::PassCompleted {
                pass: passes,
                reassigned: candidate.num_reassigned(),
                quality_delta,
                quality: candidate_quality,
            });

            if quality_delta.is_nan() {
                warn!(pass = passes, "Quality is not a number; centroid sums overflowed");
                break StopReason::NoImprovement;
            }
            if quality_delta < self.config.tolerance {
                break StopReason::NoImprovement;
            }
            if candidate.num_reassigned() == 0 {
                break StopReason::Converged;
            }
            if let Some(cluster) = candidate.first_empty() {
                self.observer.on_event(&KMeansEvent::RunAborted {
                    passes,
                    cluster,
                    quality: self.partition_quality(),
                });
                return Err(KMeansError::EmptyCluster {
                    cluster,
                    pass: passes,
                });
            }

            reassigned_total += candidate.num_reassigned();
            self.clusters = candidate.into_clusters();
        };

        let summary = KMeansSummary {
            passes,
            reassigned_total,
            quality: self.partition_quality(),
            reason,
        };
        self.observer.on_event(&KMeansEvent::RunCompleted {
            passes: summary.passes,
            quality: summary.quality,
            reason: summary.reason,
        });

        Ok(summary)
    }

    fn validate_input(&self, points: &[Instance<V>]) -> Result<()> {
        if points.is_empty() {
            return Err(KMeansError::EmptyInput);
        }
        if points.len() < self.k() {
            // round-robin fills clusters 0..n first
            return Err(KMeansError::EmptyCluster {
                cluster: points.len(),
                pass: 0,
            });
        }

        let mut seen = HashSet::with_capacity(points.len());
        for point in points {
            if !seen.insert(point.id()) {
                return Err(KMeansError::DuplicateInstance(point.id().to_string()));
            }
        }
        Ok(())
    }

    /// Run one reassignment pass against the current partition without
    /// changing it.
    pub fn reassignment_pass(&self) -> CandidateState<V> {
        pass::reassign(&self.clusters)
    }

    /// Current clusters, indexed `0..k`
    pub fn clusters(&self) -> &[Cluster<V>] {
        &self.clusters
    }

    /// Cluster at index `i`
    pub fn cluster_at(&self, i: usize) -> Option<&Cluster<V>> {
        self.clusters.get(i)
    }

    /// Current centroids, indexed `0..k`
    pub fn centroids(&self) -> Vec<&V> {
        self.clusters.iter().map(Cluster::centroid).collect()
    }

    /// Per-cluster quality, indexed `0..k`
    pub fn qualities(&self) -> Vec<f64> {
        self.clusters.iter().map(Cluster::quality).collect()
    }

    /// Per-cluster member counts, indexed `0..k`
    pub fn sizes(&self) -> Vec<usize> {
        self.clusters.iter().map(Cluster::len).collect()
    }

    /// Sum of all cluster qualities
    pub fn partition_quality(&self) -> f64 {
        self.clusters.iter().map(Cluster::quality).sum()
    }

    /// Map from instance id to cluster index
    pub fn assignments(&self) -> HashMap<String, usize> {
        self.clusters
            .iter()
            .enumerate()
            .flat_map(|(i, c)| c.members().iter().map(move |m| (m.id().to_string(), i)))
            .collect()
    }

    /// Cluster holding the instance with `id`
    pub fn cluster_of(&self, id: &str) -> Option<usize> {
        self.clusters.iter().position(|c| c.contains(id))
    }

    /// Index of the centroid nearest to `vector`, ties to the lowest index.
    ///
    /// Returns `None` until a run has produced a partition.
    pub fn nearest_cluster(&self, vector: &V) -> Option<usize> {
        if !self.fitted {
            return None;
        }
        pass::nearest_centroid(&self.clusters, vector)
    }
}

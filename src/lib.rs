//! # sparse-kmeans - Batch K-Means for Sparse Feature Vectors
//!
//! Partitions sparse data points (bag-of-words, TF-IDF, hashed features)
//! into a fixed number `k` of clusters with batch (Lloyd-style) k-means,
//! minimizing the sum of Euclidean distances from each point to its
//! cluster centroid.
//!
//! ## Quick Start
//!
//! ```rust
//! use sparse_kmeans::{BatchKMeans, Instance, SparseVector};
//!
//! fn main() -> sparse_kmeans::Result<()> {
//!     let docs = vec![
//!         Instance::new("d0", SparseVector::new(vec![0, 3], vec![1.0, 2.0])),
//!         Instance::new("d1", SparseVector::new(vec![7], vec![4.0])),
//!         Instance::new("d2", SparseVector::new(vec![0, 3], vec![1.5, 2.0])),
//!         Instance::new("d3", SparseVector::new(vec![7, 8], vec![4.0, 0.5])),
//!     ];
//!
//!     let mut kmeans = BatchKMeans::new(2)?;
//!     let summary = kmeans.cluster(&docs)?;
//!
//!     println!("{} passes, quality {:.3}", summary.passes, summary.quality);
//!     for (i, cluster) in kmeans.clusters().iter().enumerate() {
//!         println!("cluster {i}: {} members", cluster.len());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Deterministic**: round-robin initial partition, ties keep a point where it is
//! - **Pluggable vectors**: anything implementing [`ClusterVector`]
//! - **Structured progress**: [`KMeansObserver`] events, `tracing` by default
//! - **Bounded runs**: a pass limit that keeps the best partition found

#![warn(missing_docs)]

// ── Core ──────────────────────────────────────────────────────────────────────
pub mod config;
pub mod error;
pub mod instance;
pub mod sparse;

// ── Clustering ───────────────────────────────────────────────────────────────
pub mod kmeans;
pub mod observe;

pub use config::KMeansConfig;
pub use error::{ErrorCode, KMeansError, Recoverable, RecoveryHint, Result};
pub use instance::Instance;
pub use kmeans::{BatchKMeans, CandidateState, Cluster, KMeansSummary, StopReason};
pub use observe::{KMeansEvent, KMeansObserver, NoopObserver, RecordingObserver, TracingObserver};
pub use sparse::{ClusterVector, SparseDistance, SparseVector};

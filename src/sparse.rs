//! Sparse Vector Support
//!
//! Storage and arithmetic for sparse feature vectors (TF-IDF, bag-of-words,
//! hashed features). The k-means engine only sees vectors through the
//! [`ClusterVector`] trait, so any type providing the four centroid
//! operations can be clustered; [`SparseVector`] is the bundled
//! implementation.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use crate::error::{KMeansError, Result};

/// Vector operations the k-means engine needs to build centroids and
/// measure dispersion.
///
/// Implementations must return a non-negative, finite distance for finite
/// inputs and must treat `zero()` as the additive identity.
///
/// Centroids are built by summing member vectors before dividing, so the sum
/// of any cluster's vectors must stay representable. [`SparseVector`] stores
/// `f32` weights: a component sum beyond `f32::MAX` becomes infinite, and the
/// engine then refuses to accept the pass (see
/// [`StopReason::NoImprovement`](crate::StopReason::NoImprovement)).
pub trait ClusterVector: Clone + fmt::Debug + Send + Sync {
    /// The all-zero vector used as an empty centroid accumulator.
    fn zero() -> Self;

    /// Add `other` into `self`.
    fn add_assign(&mut self, other: &Self);

    /// Divide every component by `n`.
    fn scale_divide(&mut self, n: f64);

    /// Euclidean distance between `self` and `other`.
    fn distance_euclidean(&self, other: &Self) -> f64;

    /// Functional addition.
    fn add(&self, other: &Self) -> Self {
        let mut sum = self.clone();
        sum.add_assign(other);
        sum
    }
}

/// A sparse vector represented as index-value pairs sorted by index
///
/// Deserialization goes through [`SparseVector::try_new`], so decoded
/// vectors hold the same invariants as constructed ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSparseVector")]
pub struct SparseVector {
    /// Non-zero indices, strictly ascending
    pub indices: Vec<u32>,
    /// Corresponding values
    pub values: Vec<f32>,
}

/// Wire form of [`SparseVector`] before validation.
#[derive(Deserialize)]
struct RawSparseVector {
    indices: Vec<u32>,
    values: Vec<f32>,
}

impl TryFrom<RawSparseVector> for SparseVector {
    type Error = KMeansError;

    fn try_from(raw: RawSparseVector) -> Result<Self> {
        Self::try_new(raw.indices, raw.values)
    }
}

impl SparseVector {
    /// Create a new sparse vector from indices and values.
    ///
    /// Pairs are sorted by index, so callers may pass them in any order.
    ///
    /// # Panics
    /// Panics if indices and values have different lengths, if an index is
    /// repeated, or if any value is NaN or infinite. Use
    /// [`try_new`](Self::try_new) for untrusted input.
    pub fn new(indices: Vec<u32>, values: Vec<f32>) -> Self {
        match Self::try_new(indices, values) {
            Ok(vector) => vector,
            Err(err) => panic!("{}", err),
        }
    }

    /// Fallible form of [`new`](Self::new).
    pub fn try_new(indices: Vec<u32>, values: Vec<f32>) -> Result<Self> {
        if indices.len() != values.len() {
            return Err(KMeansError::InvalidVector(format!(
                "{} indices but {} values",
                indices.len(),
                values.len()
            )));
        }
        if let Some((i, v)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(KMeansError::InvalidVector(format!(
                "value at position {} is not finite: {}",
                i, v
            )));
        }

        let mut pairs: Vec<(u32, f32)> = indices.into_iter().zip(values).collect();
        pairs.sort_by_key(|(i, _)| *i);
        if let Some(w) = pairs.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(KMeansError::InvalidVector(format!(
                "duplicate index {}",
                w[0].0
            )));
        }

        Ok(Self {
            indices: pairs.iter().map(|(i, _)| *i).collect(),
            values: pairs.iter().map(|(_, v)| *v).collect(),
        })
    }

    /// Create a sparse vector from a HashMap
    ///
    /// # Panics
    /// Panics if any value is NaN or infinite.
    pub fn from_hashmap(map: &HashMap<u32, f32>) -> Self {
        for (&idx, &v) in map.iter() {
            assert!(v.is_finite(), "Value at index {} is not finite: {}", idx, v);
        }
        let mut pairs: Vec<(u32, f32)> = map.iter().map(|(&i, &v)| (i, v)).collect();
        pairs.sort_by_key(|(i, _)| *i);
        Self {
            indices: pairs.iter().map(|(i, _)| *i).collect(),
            values: pairs.iter().map(|(_, v)| *v).collect(),
        }
    }

    /// Number of stored elements
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Get value at index, returns 0.0 if not present
    pub fn get(&self, index: u32) -> f32 {
        match self.indices.binary_search(&index) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }

    /// Merge `other` into `self`, summing values on shared indices.
    fn merge_add(&mut self, other: &SparseVector) {
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            self.indices.clone_from(&other.indices);
            self.values.clone_from(&other.values);
            return;
        }

        let mut indices = Vec::with_capacity(self.len() + other.len());
        let mut values = Vec::with_capacity(self.len() + other.len());
        let mut i = 0;
        let mut j = 0;

        while i < self.indices.len() || j < other.indices.len() {
            let idx_a = self.indices.get(i).copied().unwrap_or(u32::MAX);
            let idx_b = other.indices.get(j).copied().unwrap_or(u32::MAX);

            match (idx_a.cmp(&idx_b), i < self.indices.len(), j < other.indices.len()) {
                (Ordering::Equal, true, true) => {
                    indices.push(idx_a);
                    values.push(self.values[i] + other.values[j]);
                    i += 1;
                    j += 1;
                }
                (Ordering::Less, true, _) | (_, true, false) => {
                    indices.push(idx_a);
                    values.push(self.values[i]);
                    i += 1;
                }
                _ => {
                    indices.push(idx_b);
                    values.push(other.values[j]);
                    j += 1;
                }
            }
        }

        self.indices = indices;
        self.values = values;
    }
}

impl ClusterVector for SparseVector {
    fn zero() -> Self {
        Self::default()
    }

    fn add_assign(&mut self, other: &Self) {
        self.merge_add(other);
    }

    fn scale_divide(&mut self, n: f64) {
        for v in &mut self.values {
            *v = (*v as f64 / n) as f32;
        }
    }

    fn distance_euclidean(&self, other: &Self) -> f64 {
        SparseDistance::euclidean_distance(self, other)
    }
}

/// Distance functions for sparse vectors
pub struct SparseDistance;

impl SparseDistance {
    /// Euclidean distance between two sparse vectors.
    ///
    /// Accumulates in `f64`; indices present in only one vector contribute
    /// their full squared value.
    pub fn euclidean_distance(a: &SparseVector, b: &SparseVector) -> f64 {
        let mut sum_sq = 0.0f64;
        let mut i = 0;
        let mut j = 0;

        while i < a.indices.len() || j < b.indices.len() {
            let idx_a = a.indices.get(i).copied();
            let idx_b = b.indices.get(j).copied();

            match (idx_a, idx_b) {
                (Some(x), Some(y)) if x == y => {
                    let diff = a.values[i] as f64 - b.values[j] as f64;
                    sum_sq += diff * diff;
                    i += 1;
                    j += 1;
                }
                (Some(x), Some(y)) if x < y => {
                    sum_sq += (a.values[i] as f64).powi(2);
                    i += 1;
                }
                (Some(_), None) => {
                    sum_sq += (a.values[i] as f64).powi(2);
                    i += 1;
                }
                _ => {
                    sum_sq += (b.values[j] as f64).powi(2);
                    j += 1;
                }
            }
        }

        sum_sq.sqrt()
    }
}

//! Data points handed to the clustering engine.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::sparse::SparseVector;

/// An immutable data point: an id plus a shared feature vector.
///
/// Cloning an `Instance` clones the `Arc`, never the vector, so clusters can
/// hold their members by value without copying feature data.
#[derive(Clone, Serialize, Deserialize)]
pub struct Instance<V = SparseVector> {
    id: String,
    vector: Arc<V>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

impl<V> Instance<V> {
    /// Wrap `vector` under `id`.
    pub fn new(id: impl Into<String>, vector: V) -> Self {
        Self {
            id: id.into(),
            vector: Arc::new(vector),
            label: None,
        }
    }

    /// Attach a label (e.g. a gold class for later evaluation).
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Instance id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Feature vector
    pub fn vector(&self) -> &V {
        &self.vector
    }

    /// Optional label
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl<V> fmt::Debug for Instance<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("id", &self.id)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl<V> PartialEq for Instance<V> {
    /// Instances are identified by id.
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<V> Eq for Instance<V> {}

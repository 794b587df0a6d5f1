//! Error Types and Handling
//!
//! Error types for the k-means engine with structured error codes for
//! programmatic handling and recovery hints for humans.
//!
//! # Error Categories
//!
//! | Range | Category | Examples |
//! |-------|----------|----------|
//! | 2xxx | Serialization | Config JSON encode/decode |
//! | 4xxx | Input | EmptyInput, DuplicateInstance, InvalidVector |
//! | 6xxx | Clustering | EmptyCluster |
//! | 7xxx | Configuration | InvalidConfig |
//!
//! # Example
//!
//! ```rust
//! use sparse_kmeans::error::{KMeansError, Recoverable};
//! use sparse_kmeans::BatchKMeans;
//! use sparse_kmeans::SparseVector;
//!
//! let err = BatchKMeans::<SparseVector>::new(0).err().expect("k = 0 is rejected");
//! assert!(matches!(err, KMeansError::InvalidConfig(_)));
//! assert_eq!(err.error_code().category(), "Configuration");
//! ```

use thiserror::Error;

/// Error code categories for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Failed to serialize data (e.g., JSON encoding)
    SerializationFailed = 2001,

    /// No data points were supplied
    EmptyInput = 4001,
    /// The same instance id appears twice in one run
    DuplicateInstance = 4002,
    /// A sparse vector breaks its layout invariants
    InvalidVector = 4003,

    /// A cluster has no members, so its centroid is undefined
    EmptyCluster = 6001,

    /// Configuration value is invalid
    InvalidConfig = 7001,
}

impl ErrorCode {
    /// Get the numeric error code
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a brief description of the error category
    pub fn category(&self) -> &'static str {
        match self {
            ErrorCode::SerializationFailed => "Serialization",
            ErrorCode::EmptyInput | ErrorCode::DuplicateInstance | ErrorCode::InvalidVector => {
                "Input"
            }
            ErrorCode::EmptyCluster => "Clustering",
            ErrorCode::InvalidConfig => "Configuration",
        }
    }
}

/// A recovery hint providing actionable guidance for resolving errors
#[derive(Debug, Clone)]
pub struct RecoveryHint {
    /// Short summary of the recovery action
    pub summary: String,
    /// Detailed steps or explanation
    pub details: Option<String>,
}

impl RecoveryHint {
    /// Create a new recovery hint with just a summary
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            details: None,
        }
    }

    /// Add detailed recovery steps
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl std::fmt::Display for RecoveryHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.summary)?;
        if let Some(details) = &self.details {
            write!(f, "\n  Details: {}", details)?;
        }
        Ok(())
    }
}

/// Trait for errors that can provide recovery hints
pub trait Recoverable {
    /// Get the error code for this error
    fn error_code(&self) -> ErrorCode;

    /// Get recovery hints for this error
    fn recovery_hints(&self) -> Vec<RecoveryHint>;
}

/// Errors produced while configuring or running k-means
#[must_use]
#[derive(Error, Debug)]
pub enum KMeansError {
    /// Config JSON could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A configuration value is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// `cluster` was called with no points
    #[error("No data points to cluster")]
    EmptyInput,

    /// Two input points share an id
    #[error("Duplicate instance id: '{0}'")]
    DuplicateInstance(String),

    /// Indices and values do not form a valid sparse vector
    #[error("Invalid sparse vector: {0}")]
    InvalidVector(String),

    /// A cluster has no members; `pass == 0` means the initial partition
    #[error("Cluster {cluster} has no members after pass {pass}")]
    EmptyCluster {
        /// Cluster index
        cluster: usize,
        /// Pass that emptied it
        pass: usize,
    },
}

impl Recoverable for KMeansError {
    fn error_code(&self) -> ErrorCode {
        match self {
            KMeansError::Serialization(_) => ErrorCode::SerializationFailed,
            KMeansError::InvalidConfig(_) => ErrorCode::InvalidConfig,
            KMeansError::EmptyInput => ErrorCode::EmptyInput,
            KMeansError::DuplicateInstance(_) => ErrorCode::DuplicateInstance,
            KMeansError::InvalidVector(_) => ErrorCode::InvalidVector,
            KMeansError::EmptyCluster { .. } => ErrorCode::EmptyCluster,
        }
    }

    fn recovery_hints(&self) -> Vec<RecoveryHint> {
        match self {
            KMeansError::Serialization(_) => vec![
                RecoveryHint::new("Check the configuration JSON")
                    .with_details("Expected fields: n_clusters, tolerance, max_passes"),
            ],

            KMeansError::InvalidConfig(reason) => vec![
                RecoveryHint::new(format!("Fix configuration: {}", reason)),
                RecoveryHint::new("Start from KMeansConfig::default() and override single fields"),
            ],

            KMeansError::EmptyInput => vec![
                RecoveryHint::new("Pass at least k data points to cluster()"),
            ],

            KMeansError::DuplicateInstance(id) => vec![
                RecoveryHint::new(format!("Give instance '{}' a unique id", id)),
                RecoveryHint::new("Deduplicate the input before clustering"),
            ],

            KMeansError::InvalidVector(reason) => vec![
                RecoveryHint::new(format!("Fix the vector data: {}", reason))
                    .with_details("Each index may appear once, with one finite value per index"),
            ],

            KMeansError::EmptyCluster { cluster, pass } if *pass == 0 => vec![
                RecoveryHint::new(format!(
                    "Cluster {} would start empty: use k no larger than the number of points",
                    cluster
                )),
            ],

            KMeansError::EmptyCluster { cluster, .. } => vec![
                RecoveryHint::new(format!("Cluster {} lost all of its members", cluster))
                    .with_details("The last accepted partition is still available on the engine"),
                RecoveryHint::new("Reduce k or reorder the input to change the initial partition"),
            ],
        }
    }
}

impl KMeansError {
    /// Get a formatted error message with recovery hints
    pub fn format_with_hints(&self) -> String {
        let hints = self.recovery_hints();
        let mut output = format!("Error [{}]: {}", self.error_code().code(), self);

        if !hints.is_empty() {
            output.push_str("\n\nRecovery suggestions:");
            for (i, hint) in hints.iter().enumerate() {
                output.push_str(&format!("\n  {}. {}", i + 1, hint));
            }
        }

        output
    }
}

/// Result type alias for k-means operations
pub type Result<T> = std::result::Result<T, KMeansError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let error = KMeansError::EmptyCluster { cluster: 2, pass: 3 };
        assert_eq!(error.error_code(), ErrorCode::EmptyCluster);
        assert_eq!(error.error_code().code(), 6001);
        assert_eq!(error.error_code().category(), "Clustering");

        assert_eq!(KMeansError::EmptyInput.error_code().category(), "Input");

        let invalid = KMeansError::InvalidVector("duplicate index 3".to_string());
        assert_eq!(invalid.error_code().code(), 4003);
        assert_eq!(invalid.error_code().category(), "Input");
    }

    #[test]
    fn test_empty_cluster_hints_distinguish_initial_partition() {
        let initial = KMeansError::EmptyCluster { cluster: 4, pass: 0 };
        assert!(initial.recovery_hints()[0].summary.contains("no larger than"));

        let later = KMeansError::EmptyCluster { cluster: 1, pass: 5 };
        assert!(later.recovery_hints()[0].summary.contains("lost all"));
    }

    #[test]
    fn test_format_with_hints() {
        let error = KMeansError::DuplicateInstance("doc7".to_string());
        let formatted = error.format_with_hints();
        assert!(formatted.contains("Error [4002]"));
        assert!(formatted.contains("doc7"));
        assert!(formatted.contains("Recovery suggestions"));
    }
}

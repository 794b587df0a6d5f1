//! K-means configuration.
//!
//! ```
//! use sparse_kmeans::KMeansConfig;
//!
//! let config = KMeansConfig::new(8)
//!     .with_tolerance(1e-6)
//!     .with_max_passes(50);
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{KMeansError, Result};

/// Default cap on reassignment passes per run.
pub const DEFAULT_MAX_PASSES: usize = 100;

/// Configuration for a batch k-means run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KMeansConfig {
    /// Number of clusters (k)
    pub n_clusters: usize,
    /// Minimum aggregate quality improvement for a pass to be accepted.
    ///
    /// A pass whose improvement is strictly below this value ends the run.
    /// With the default of `0.0`, passes that keep quality equal are still
    /// accepted as long as some point moved.
    pub tolerance: f64,
    /// Maximum number of reassignment passes before the run stops with the
    /// best partition found so far
    pub max_passes: usize,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            n_clusters: 2,
            tolerance: 0.0,
            max_passes: DEFAULT_MAX_PASSES,
        }
    }
}

impl KMeansConfig {
    /// Create a new config with the specified number of clusters
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            ..Default::default()
        }
    }

    /// Set convergence tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set maximum reassignment passes
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// Check the configuration for values the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.n_clusters == 0 {
            return Err(KMeansError::InvalidConfig(
                "n_clusters must be greater than 0".to_string(),
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(KMeansError::InvalidConfig(format!(
                "tolerance must be a finite, non-negative number (got {})",
                self.tolerance
            )));
        }
        if self.max_passes == 0 {
            return Err(KMeansError::InvalidConfig(
                "max_passes must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration. Missing fields take their
    /// default values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

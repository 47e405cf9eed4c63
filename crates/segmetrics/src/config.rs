//! Engine configuration and its JSON form.

use crate::error::ConfigIoError;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Algorithm used for the symmetric Hausdorff distance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HausdorffMethod {
    /// Exhaustive `O(|A| * |B|)` nearest-neighbor scan.
    BruteForce,
    /// Nearest-neighbor queries against a kd-tree built over the target set.
    #[default]
    KdTree,
}

/// Handling of a ground-truth mask whose dimensions differ from the candidate's.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroundTruthPolicy {
    /// Fail with `MetricsError::DimensionMismatch`.
    #[default]
    Reject,
    /// Ignore the ground truth and report a Hausdorff distance of `0`.
    Skip,
}

/// Configuration for [`crate::MetricsEngine`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Sobel gradient magnitude above which an original pixel counts as an edge.
    pub edge_threshold: f64,
    /// A mask pixel is foreground iff its value is strictly greater than this.
    pub mask_threshold: u8,
    pub hausdorff: HausdorffMethod,
    pub ground_truth: GroundTruthPolicy,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            edge_threshold: 30.0,
            mask_threshold: 127,
            hausdorff: HausdorffMethod::default(),
            ground_truth: GroundTruthPolicy::default(),
        }
    }
}

impl MetricsConfig {
    /// Load a JSON config from disk. Missing fields take their defaults.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn with_edge_threshold(mut self, edge_threshold: f64) -> Self {
        self.edge_threshold = edge_threshold;
        self
    }

    pub fn with_hausdorff(mut self, method: HausdorffMethod) -> Self {
        self.hausdorff = method;
        self
    }

    pub fn with_ground_truth_policy(mut self, policy: GroundTruthPolicy) -> Self {
        self.ground_truth = policy;
        self
    }
}

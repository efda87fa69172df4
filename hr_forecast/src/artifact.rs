//! Serialized model artifact shared by the training and serving halves

use crate::error::{ForecastError, Result};
use crate::models::holt_winters::TrainedHoltWinters;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Version written into every artifact; loading any other version fails
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// File name of the artifact inside the deployment root
pub const DEFAULT_ARTIFACT_FILE: &str = "hw_model.json";

/// On-disk envelope around a fitted model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    format_version: u32,
    model: TrainedHoltWinters,
}

impl ModelArtifact {
    pub fn new(model: TrainedHoltWinters) -> Self {
        Self {
            format_version: ARTIFACT_FORMAT_VERSION,
            model,
        }
    }

    pub fn format_version(&self) -> u32 {
        self.format_version
    }

    pub fn model(&self) -> &TrainedHoltWinters {
        &self.model
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the artifact to `path`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Location of a model artifact on stable storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFile {
    path: PathBuf,
}

impl ArtifactFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// The default artifact file inside `root`
    pub fn in_root<P: AsRef<Path>>(root: P) -> Self {
        Self::new(root.as_ref().join(DEFAULT_ARTIFACT_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read, decode and validate the artifact
    pub fn load(&self) -> Result<TrainedHoltWinters> {
        let json = fs::read_to_string(&self.path)
            .map_err(|e| ForecastError::artifact(&self.path, e.to_string()))?;
        let artifact: ModelArtifact = serde_json::from_str(&json).map_err(|e| {
            ForecastError::artifact(&self.path, format!("malformed artifact: {}", e))
        })?;

        if artifact.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(ForecastError::artifact(
                &self.path,
                format!(
                    "unsupported format version {} (expected {})",
                    artifact.format_version, ARTIFACT_FORMAT_VERSION
                ),
            ));
        }

        artifact
            .model
            .validate()
            .map_err(|e| ForecastError::artifact(&self.path, e.to_string()))?;

        debug!(path = %self.path.display(), "artifact decoded");
        Ok(artifact.model)
    }
}

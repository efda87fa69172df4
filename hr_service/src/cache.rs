//! Process-wide cache for the fitted model
//!
//! The model is read from storage on first use and then shared by every
//! request for the rest of the process. A failed load leaves the cache
//! empty so the next caller tries again.

use crate::error::{Result, ServiceError};
use hr_forecast::{ArtifactFile, TrainedForecastModel, TrainedHoltWinters};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Instant;
use tracing::{error, info, warn};

/// Source of a fitted model
pub trait ModelLoader: Send + Sync {
    type Model: TrainedForecastModel;

    /// Read and decode the model from wherever it is stored
    fn load(&self) -> hr_forecast::error::Result<Self::Model>;

    /// Where the model comes from, for logs
    fn describe(&self) -> String;
}

impl ModelLoader for ArtifactFile {
    type Model = TrainedHoltWinters;

    fn load(&self) -> hr_forecast::error::Result<Self::Model> {
        ArtifactFile::load(self)
    }

    fn describe(&self) -> String {
        self.path().display().to_string()
    }
}

/// Lazily loaded, never invalidated model holder
///
/// Concurrent first callers serialize on `load_guard`; exactly one of them
/// runs the loader and the rest observe its result. Once published, reads
/// go through the `OnceLock` without locking.
#[derive(Debug)]
pub struct ModelCache<L: ModelLoader> {
    loader: L,
    model: OnceLock<Arc<L::Model>>,
    load_guard: Mutex<()>,
}

impl<L: ModelLoader> ModelCache<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            model: OnceLock::new(),
            load_guard: Mutex::new(()),
        }
    }

    /// Return the cached model, loading it first if needed
    pub fn get_model(&self) -> Result<Arc<L::Model>> {
        if let Some(model) = self.model.get() {
            return Ok(Arc::clone(model));
        }

        let _guard = self.load_guard.lock().unwrap_or_else(|poisoned| {
            warn!("Model load guard was poisoned, recovering");
            poisoned.into_inner()
        });

        // Another caller may have finished loading while we waited
        if let Some(model) = self.model.get() {
            return Ok(Arc::clone(model));
        }

        let started = Instant::now();
        match self.loader.load() {
            Ok(model) => {
                let model = self.model.get_or_init(|| Arc::new(model));
                info!(
                    source = %self.loader.describe(),
                    model = model.name(),
                    training_end = %model.training_end_time(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Model loaded successfully"
                );
                Ok(Arc::clone(model))
            }
            Err(e) => {
                error!(
                    source = %self.loader.describe(),
                    error = %e,
                    "Error loading model"
                );
                Err(ServiceError::ModelLoad(e))
            }
        }
    }

    /// Whether a model has been published
    pub fn is_loaded(&self) -> bool {
        self.model.get().is_some()
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }
}

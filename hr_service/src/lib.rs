//! # HR Service
//!
//! Serves the latest heart-rate forecast from a pre-fit Holt-Winters
//! artifact. The artifact is loaded once per process and shared by all
//! requests; each request maps the current time to a step count past the
//! end of the training data and returns the forecast at that step.
//!
//! ```rust,no_run
//! use hr_forecast::ArtifactFile;
//! use hr_service::{ForecastHandler, ForecastRequest, ModelCache};
//! use std::sync::Arc;
//!
//! let cache = Arc::new(ModelCache::new(ArtifactFile::in_root(".")));
//! let handler = ForecastHandler::new(cache);
//! let reply = handler.handle(&ForecastRequest::in_timezone("Europe/Berlin"));
//! println!("{}", reply.status_code());
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod handler;
pub mod steps;
pub mod timezone;

pub use crate::cache::{ModelCache, ModelLoader};
pub use crate::config::Config;
pub use crate::error::ServiceError;
pub use crate::handler::{
    ErrorResponse, ForecastHandler, ForecastReply, ForecastRequest, ForecastResponse,
    FAILURE_MESSAGE,
};
pub use crate::steps::steps_ahead;
pub use crate::timezone::{resolve_timezone, ResolvedZone};

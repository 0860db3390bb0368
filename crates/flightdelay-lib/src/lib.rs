//! Flight delay prediction library entry points.
//!
//! This crate exposes helpers to load the airport mapping and the delay
//! model artifact, normalize untrusted prediction requests into the feature
//! schema the model expects, and interpret the model's probability output.
//! Higher-level consumers (the HTTP service) should only depend on the
//! items exported here instead of reimplementing behavior.

#![deny(warnings)]

pub mod airports;
pub mod error;
pub mod features;
pub mod model;
pub mod predict;

pub use airports::{Airport, AirportDirectory};
pub use error::{Error, Result};
pub use features::{normalize, FeatureRecord, ValidationErrors, Weekday, UNKNOWN_CARRIER};
pub use model::{Classifier, DelayModel, DELAYED_CLASS_LABEL};
pub use predict::{predict_delay, DelayLabel, EchoedInput, PredictionResult};

//! Application state for the prediction service.
//!
//! Holds the delay model and airport directory, both loaded once at process
//! start and read-only afterwards. Handlers receive the state through
//! axum's `State` extractor; there are no ambient globals.

use std::path::Path;
use std::sync::Arc;

use flightdelay_lib::{AirportDirectory, Classifier, DelayModel, Error as LibError};

/// Error during application state initialization.
#[derive(Debug)]
pub enum AppStateError {
    /// Failed to load the delay model artifact.
    ModelLoad(LibError),

    /// Failed to load the airport mapping.
    AirportsLoad(LibError),
}

impl std::fmt::Display for AppStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ModelLoad(e) => write!(f, "failed to load delay model: {}", e),
            Self::AirportsLoad(e) => write!(f, "failed to load airport mapping: {}", e),
        }
    }
}

impl std::error::Error for AppStateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ModelLoad(e) => Some(e),
            Self::AirportsLoad(e) => Some(e),
        }
    }
}

/// Shared application state for all axum handlers.
///
/// Cheaply cloneable (`Arc` internally); requests share it read-only, so
/// any number of workers can serve in parallel without synchronization.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    classifier: Box<dyn Classifier + Send + Sync>,
    airports: AirportDirectory,
}

impl AppState {
    /// Load application state from the model artifact and airport mapping.
    ///
    /// Either file missing is a fatal startup error.
    pub fn load(
        model_path: impl AsRef<Path>,
        airports_path: impl AsRef<Path>,
    ) -> Result<Self, AppStateError> {
        let model_path = model_path.as_ref();
        let airports_path = airports_path.as_ref();

        tracing::info!(path = %model_path.display(), "loading delay model");
        let model = DelayModel::from_path(model_path).map_err(AppStateError::ModelLoad)?;

        tracing::info!(path = %airports_path.display(), "loading airport mapping");
        let airports =
            AirportDirectory::from_path(airports_path).map_err(AppStateError::AirportsLoad)?;
        tracing::info!(airports = airports.len(), "airport mapping loaded");

        Ok(Self::from_components(model, airports))
    }

    /// Create application state from pre-loaded components.
    ///
    /// This is useful for testing handlers with a stub classifier.
    pub fn from_components(
        classifier: impl Classifier + Send + Sync + 'static,
        airports: AirportDirectory,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                classifier: Box::new(classifier),
                airports,
            }),
        }
    }

    /// Access the loaded classifier.
    pub fn classifier(&self) -> &(dyn Classifier + Send + Sync) {
        self.inner.classifier.as_ref()
    }

    /// Access the loaded airport directory.
    pub fn airports(&self) -> &AirportDirectory {
        &self.inner.airports
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("airport_count", &self.inner.airports.len())
            .field("classes", &self.inner.classifier.classes())
            .finish()
    }
}

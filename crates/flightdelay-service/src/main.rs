//! Flight delay prediction HTTP service.
//!
//! This service answers two questions: which airports the delay model knows
//! about, and how likely a given flight is to be delayed by more than 15
//! minutes.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /airports` - List known airports, sorted by name
//! - `POST /prediction` - Predict the delay probability for a flight
//!
//! # Configuration
//!
//! - `FLIGHTDELAY_MODEL_PATH` - Path to the delay model artifact (default: /data/delay_model.json)
//! - `FLIGHTDELAY_AIRPORTS_PATH` - Path to the airport mapping CSV (default: /data/airports_mapping.csv)
//! - `SERVICE_PORT` - HTTP port (default: 8080)
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text

mod logging;
mod state;

use std::env;
use std::net::SocketAddr;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use flightdelay_lib::{normalize, predict_delay, Airport, PredictionResult, ValidationErrors};

use crate::logging::{init_logging, LogFormat};
use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
struct HealthStatus {
    status: &'static str,
}

/// Airport listing returned to the caller.
#[derive(Debug, Serialize)]
struct AirportsResponse {
    /// Airports sorted ascending by name.
    airports: Vec<Airport>,
    /// Number of airports in the listing.
    count: usize,
}

/// HTTP response for the prediction endpoint.
#[derive(Debug)]
enum PredictionReply {
    /// 200 with the interpreted prediction.
    Success(PredictionResult),
    /// 400 with one message per offending field.
    Invalid(ValidationErrors),
    /// 500 with no field-level detail; the cause is logged, not surfaced.
    Failed,
}

impl IntoResponse for PredictionReply {
    fn into_response(self) -> axum::response::Response {
        match self {
            Self::Success(result) => (StatusCode::OK, Json(result)).into_response(),
            Self::Invalid(errors) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
            }
            Self::Failed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "internal server error" })),
            )
                .into_response(),
        }
    }
}

/// Build the router with permissive CORS on every response.
fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/health", get(health_handler))
        .route("/airports", get(airports_handler))
        .route("/prediction", post(prediction_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LogFormat::from_env());

    // Load configuration from environment
    let model_path = env::var("FLIGHTDELAY_MODEL_PATH")
        .unwrap_or_else(|_| "/data/delay_model.json".to_string());
    let airports_path = env::var("FLIGHTDELAY_AIRPORTS_PATH")
        .unwrap_or_else(|_| "/data/airports_mapping.csv".to_string());
    let port: u16 = env::var("SERVICE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    info!(
        model_path = %model_path,
        airports_path = %airports_path,
        port = port,
        "starting flight delay service"
    );

    // Load application state; a missing artifact is fatal.
    let state = AppState::load(&model_path, &airports_path).map_err(|e| {
        error!(error = %e, "failed to load application state");
        e
    })?;

    info!(airports = state.airports().len(), "application state loaded");

    let app = app(state);

    // Bind and serve
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(addr = %addr, "listening on");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Handle GET /health requests.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthStatus { status: "ok" }))
}

/// Handle GET /airports requests.
async fn airports_handler(State(state): State<AppState>) -> impl IntoResponse {
    let airports = state.airports().sorted_by_name();
    let count = airports.len();
    (StatusCode::OK, Json(AirportsResponse { airports, count }))
}

/// Handle POST /prediction requests.
///
/// The body is read raw and parsed leniently: anything that is not valid
/// JSON behaves as the empty object, so malformed bodies surface the same
/// field errors as missing fields instead of a transport-level rejection.
async fn prediction_handler(State(state): State<AppState>, body: Bytes) -> PredictionReply {
    let request_id = generate_request_id();
    let payload: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    let record = match normalize(&payload) {
        Ok(record) => record,
        Err(errors) => {
            info!(
                request_id = %request_id,
                fields = errors.len(),
                "prediction request rejected"
            );
            return PredictionReply::Invalid(errors);
        }
    };

    match predict_delay(&record, state.classifier()) {
        Ok(result) => {
            info!(
                request_id = %request_id,
                airport_id = record.dest_airport_id,
                carrier = %record.carrier,
                probability = result.delay_probability,
                "prediction computed"
            );
            PredictionReply::Success(result)
        }
        Err(e) => {
            error!(request_id = %request_id, error = %e, "delay prediction failed");
            PredictionReply::Failed
        }
    }
}

/// Generate a unique request ID for tracing.
fn generate_request_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();

    format!("req-{:x}", timestamp)
}

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

pub const DEVICES_PATH: &str = "/1/user/-/devices.json";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub battery: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_level: Option<u8>,
    pub device_version: String,
    #[serde(default)]
    pub features: Vec<String>,
    pub id: String,
    pub last_sync_time: String,
    pub mac: String,
    #[serde(rename = "type")]
    pub device_type: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub error_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    pub message: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub errors: Vec<ApiError>,
    pub success: bool,
}

/// Shared server state: the devices to report and, optionally, the bearer
/// token every request must carry.
#[derive(Clone, Debug, Default)]
pub struct MockState {
    pub devices: Arc<RwLock<Vec<Device>>>,
    pub access_token: Option<String>,
}

impl MockState {
    pub fn with_devices(devices: Vec<Device>) -> Self {
        Self {
            devices: Arc::new(RwLock::new(devices)),
            access_token: None,
        }
    }

    pub fn require_token(mut self, token: &str) -> Self {
        self.access_token = Some(token.to_string());
        self
    }
}

/// The tracker and scale pair used throughout the client tests.
pub fn fixture_devices() -> Vec<Device> {
    vec![
        Device {
            battery: "High".to_string(),
            battery_level: Some(100),
            device_version: "Zip".to_string(),
            features: Vec::new(),
            id: "5656888".to_string(),
            last_sync_time: "2014-07-17T13:38:13.000".to_string(),
            mac: "FE1111111111".to_string(),
            device_type: "TRACKER".to_string(),
        },
        Device {
            battery: "High".to_string(),
            battery_level: None,
            device_version: "Aria".to_string(),
            features: Vec::new(),
            id: "5656777".to_string(),
            last_sync_time: "2014-07-17T13:38:13.000".to_string(),
            mac: "SC1111111111".to_string(),
            device_type: "SCALE".to_string(),
        },
    ]
}

pub fn app(state: MockState) -> Router {
    Router::new()
        .route(DEVICES_PATH, get(list_devices))
        .fallback(not_found)
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock Fitbit API listening");
    }
    axum::serve(listener, app(state)).await
}

fn error_response(status: StatusCode, error_type: &str, message: &str) -> Response {
    let body = ErrorBody {
        errors: vec![ApiError {
            error_type: error_type.to_string(),
            field_name: None,
            message: message.to_string(),
        }],
        success: false,
    };
    (status, Json(body)).into_response()
}

async fn list_devices(State(state): State<MockState>, headers: HeaderMap) -> Response {
    if let Some(expected) = &state.access_token {
        let presented = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        if presented != Some(expected.as_str()) {
            debug!("rejecting request with missing or invalid token");
            return error_response(
                StatusCode::UNAUTHORIZED,
                "invalid_token",
                "Access token invalid or missing.",
            );
        }
    }
    let devices = state.devices.read().await;
    Json(devices.clone()).into_response()
}

async fn not_found() -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        "not_found",
        "The API you are requesting could not be found.",
    )
}

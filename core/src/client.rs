//! Fitbit Web API client.
//!
//! # Design
//! `FitbitClient` holds only its base URL, an optional bearer token and the
//! injected `Transport`; it carries no mutable state between calls. Each
//! operation is split into a `build_*` method that produces an `HttpRequest`
//! and a `parse_*` method that consumes an `HttpResponse`, and an async method
//! that runs one round trip between the two.

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::DEFAULT_BASE_URL;
use crate::envelope::{ApiResponse, ErrorBody};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::types::Device;

const DEVICES_PATH: &str = "/1/user/-/devices.json";

#[derive(Debug, Clone)]
pub struct FitbitClient<T> {
    base_url: String,
    access_token: Option<String>,
    transport: T,
}

#[cfg(feature = "reqwest-transport")]
impl FitbitClient<crate::transport::ReqwestTransport> {
    /// Build a network-backed client from `config`.
    pub fn from_config(config: &crate::config::ClientConfig) -> Result<Self, ApiError> {
        let transport = crate::transport::ReqwestTransport::new(config.timeout)
            .map_err(|e| ApiError::Config(format!("cannot build HTTP client: {e}")))?;
        let client = Self::new(&config.base_url, transport);
        Ok(match &config.access_token {
            Some(token) => client.with_access_token(token),
            None => client,
        })
    }
}

impl<T: Transport> FitbitClient<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: None,
            transport,
        }
    }

    /// Client for the public API at `https://api.fitbit.com`.
    pub fn with_transport(transport: T) -> Self {
        Self::new(DEFAULT_BASE_URL, transport)
    }

    /// Send `token` as `Authorization: Bearer <token>` on every request.
    pub fn with_access_token(mut self, token: &str) -> Self {
        self.access_token = Some(token.to_string());
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn build_get_devices(&self) -> HttpRequest {
        self.get(DEVICES_PATH)
    }

    pub fn parse_get_devices(
        &self,
        response: HttpResponse,
    ) -> Result<ApiResponse<Vec<Device>>, ApiError> {
        parse_envelope(response)
    }

    /// List the devices paired with the authorized user.
    pub async fn get_devices(&self) -> Result<ApiResponse<Vec<Device>>, ApiError> {
        self.get_devices_with_cancel(&CancellationToken::new()).await
    }

    pub async fn get_devices_with_cancel(
        &self,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<Vec<Device>>, ApiError> {
        let response = self.execute(self.build_get_devices(), cancel).await?;
        self.parse_get_devices(response)
    }

    fn get(&self, path: &str) -> HttpRequest {
        let mut headers = Vec::new();
        if let Some(token) = &self.access_token {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}{path}", self.base_url),
            headers,
            body: None,
        }
    }

    async fn execute(
        &self,
        request: HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, ApiError> {
        debug!(method = %request.method, url = %request.url, "calling Fitbit API");
        let response = self.transport.send(request, cancel).await?;
        debug!(status = response.status, "Fitbit API responded");
        Ok(response)
    }
}

/// Turn a response into an envelope.
///
/// 2xx bodies deserialize into `D`. Non-2xx bodies carrying at least one
/// structured error become `ApiResponse::Failure`; anything else is
/// `ApiError::Http`.
fn parse_envelope<D: DeserializeOwned>(response: HttpResponse) -> Result<ApiResponse<D>, ApiError> {
    if response.is_success() {
        let data = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::Deserialization(e.to_string()))?;
        return Ok(ApiResponse::Success(data));
    }

    let errors = serde_json::from_str::<ErrorBody>(&response.body)
        .map(|body| body.errors)
        .unwrap_or_default();
    match ApiResponse::failure(errors) {
        Some(failure) => {
            warn!(
                status = response.status,
                errors = failure.errors().len(),
                "Fitbit API returned errors"
            );
            Ok(failure)
        }
        None => Err(ApiError::Http {
            status: response.status,
            body: response.body,
        }),
    }
}

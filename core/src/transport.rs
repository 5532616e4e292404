//! `Transport` implementations.
//!
//! `ReqwestTransport` talks to the network. `StubTransport` answers from a
//! canned response, runs an optional verification callback against every
//! request it receives, and records what it saw.

use std::fmt;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::http::{HttpRequest, HttpResponse, Transport, TransportError};

#[cfg(feature = "reqwest-transport")]
pub use self::reqwest_transport::ReqwestTransport;

#[cfg(feature = "reqwest-transport")]
mod reqwest_transport {
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio_util::sync::CancellationToken;
    use tracing::{debug, warn};

    use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};

    /// Transport backed by a shared `reqwest::Client`.
    ///
    /// Connection reuse is left to reqwest's pool. Status codes are passed
    /// through untouched.
    #[derive(Debug, Clone)]
    pub struct ReqwestTransport {
        client: reqwest::Client,
    }

    impl ReqwestTransport {
        pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
            let client = reqwest::Client::builder().timeout(timeout).build()?;
            Ok(Self { client })
        }

        pub fn with_client(client: reqwest::Client) -> Self {
            Self { client }
        }

        async fn round_trip(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            let method = match request.method {
                HttpMethod::Get => reqwest::Method::GET,
            };
            let mut builder = self.client.request(method, &request.url);
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await.map_err(map_error)?;
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.as_str().to_string(), v.to_string()))
                })
                .collect();
            let body = response.text().await.map_err(map_error)?;

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }

    #[async_trait]
    impl Transport for ReqwestTransport {
        async fn send(
            &self,
            request: HttpRequest,
            cancel: &CancellationToken,
        ) -> Result<HttpResponse, TransportError> {
            debug!(method = %request.method, url = %request.url, "sending request");
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(TransportError::Cancelled),
                result = self.round_trip(request) => result,
            };
            if let Err(e) = &result {
                warn!(error = %e, "request failed");
            }
            result
        }
    }

    fn map_error(e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_connect() {
            TransportError::Unreachable(e.to_string())
        } else {
            TransportError::Other(e.to_string())
        }
    }
}

type Responder = dyn Fn(&HttpRequest) -> Result<HttpResponse, TransportError> + Send + Sync;
type Verifier = dyn Fn(&HttpRequest, &CancellationToken) + Send + Sync;

/// Programmable transport for tests.
///
/// A token that is already cancelled when `send` runs yields
/// `TransportError::Cancelled`; the verification callback still sees the
/// request first.
pub struct StubTransport {
    respond: Box<Responder>,
    verify: Option<Box<Verifier>>,
    seen: Mutex<Vec<HttpRequest>>,
}

impl StubTransport {
    /// Answer every request with a clone of `response`.
    pub fn new(response: HttpResponse) -> Self {
        Self::from_fn(move |_| Ok(response.clone()))
    }

    /// Fail every request with `error`.
    pub fn failing(error: TransportError) -> Self {
        Self::from_fn(move |_| Err(error.clone()))
    }

    pub fn from_fn<F>(respond: F) -> Self
    where
        F: Fn(&HttpRequest) -> Result<HttpResponse, TransportError> + Send + Sync + 'static,
    {
        Self {
            respond: Box::new(respond),
            verify: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Run `verify` against every request before it is answered.
    /// Assertions inside it fail the awaiting test.
    pub fn with_verification<F>(mut self, verify: F) -> Self
    where
        F: Fn(&HttpRequest, &CancellationToken) + Send + Sync + 'static,
    {
        self.verify = Some(Box::new(verify));
        self
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.seen.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn call_count(&self) -> usize {
        self.seen.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl fmt::Debug for StubTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StubTransport")
            .field("calls", &self.call_count())
            .field("verifies", &self.verify.is_some())
            .finish()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn send(
        &self,
        request: HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, TransportError> {
        if let Some(verify) = &self.verify {
            verify(&request, cancel);
        }
        self.seen
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());
        if cancel.is_cancelled() {
            return Err(TransportError::Cancelled);
        }
        (self.respond)(&request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;

    fn request(url: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: url.to_string(),
            headers: Vec::new(),
            body: None,
        }
    }

    #[tokio::test]
    async fn stub_returns_canned_response_and_records_request() {
        let stub = StubTransport::new(HttpResponse::new(200, "[]"));
        let resp = stub
            .send(request("http://a.test/x"), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body, "[]");
        assert_eq!(stub.call_count(), 1);
        assert_eq!(stub.requests()[0].url, "http://a.test/x");
    }

    #[tokio::test]
    async fn stub_honours_cancelled_token() {
        let stub = StubTransport::new(HttpResponse::new(200, "[]"));
        let token = CancellationToken::new();
        token.cancel();
        let err = stub.send(request("http://a.test/x"), &token).await.unwrap_err();
        assert_eq!(err, TransportError::Cancelled);
        assert_eq!(stub.call_count(), 1);
    }

    #[tokio::test]
    async fn stub_runs_verification_with_request_and_token() {
        let stub = StubTransport::new(HttpResponse::new(204, "")).with_verification(|req, token| {
            assert_eq!(req.method, HttpMethod::Get);
            assert_eq!(req.url, "http://a.test/verify");
            assert!(!token.is_cancelled());
        });
        stub.send(request("http://a.test/verify"), &CancellationToken::new())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn failing_stub_returns_error_every_time() {
        let stub = StubTransport::failing(TransportError::Timeout);
        for _ in 0..2 {
            let err = stub
                .send(request("http://a.test/x"), &CancellationToken::new())
                .await
                .unwrap_err();
            assert_eq!(err, TransportError::Timeout);
        }
        assert_eq!(stub.call_count(), 2);
    }

    #[tokio::test]
    async fn from_fn_sees_each_request() {
        let stub = StubTransport::from_fn(|req| Ok(HttpResponse::new(200, req.url.clone())));
        let resp = stub
            .send(request("http://a.test/echo"), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(resp.body, "http://a.test/echo");
    }
}

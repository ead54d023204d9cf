// In-process HTTP transport: requests go straight into the axum router

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, Bytes};
use http::{Method, Request, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::error::ApiResponse;
use shared::models::{Job, JobCreate, JobUpdate};
use shared::reorder::{ReorderOutcome, ReorderReceipt, ReorderRequest};
use tower::ServiceExt;

use super::JobsTransport;
use crate::error::{ClientError, ClientResult};

/// Oneshot transport (in-memory calls)
///
/// Uses the Tower `oneshot` pattern to call the router directly, no socket
/// involved.
///
/// ```ignore
/// let router = talent_server::build_router(state);
/// let transport = OneshotTransport::new(router);
/// let jobs = transport.list_jobs().await?;
/// ```
#[derive(Debug, Clone)]
pub struct OneshotTransport {
    router: Router,
}

impl OneshotTransport {
    /// `router` must already have its state attached
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    fn build_request<B: Serialize>(
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ClientResult<Request<Body>> {
        let body = match body {
            Some(body) => Body::from(serde_json::to_vec(body)?),
            None => Body::empty(),
        };

        Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(body)
            .map_err(|e| ClientError::Internal(format!("Failed to build request: {}", e)))
    }

    async fn dispatch(&self, request: Request<Body>) -> ClientResult<(StatusCode, Bytes)> {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .map_err(|e| ClientError::Internal(format!("Oneshot call failed: {}", e)))?;

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| ClientError::Internal(format!("Failed to read body: {}", e)))?;

        Ok((status, body_bytes))
    }

    /// Classify a reorder reply whose body is not an `ApiResponse`
    ///
    /// A 4xx came from the server (unmatched route, rejected extractor), so
    /// only 2xx and 5xx without a readable body count as transport failures.
    fn classify_unreadable(status: StatusCode, body: &[u8], err: serde_json::Error) -> ReorderOutcome {
        let text = String::from_utf8_lossy(body);
        let message = if text.trim().is_empty() {
            format!("Reorder rejected ({})", status)
        } else {
            format!("Reorder rejected ({}): {}", status, text.trim())
        };

        match status {
            StatusCode::NOT_FOUND => ReorderOutcome::NotFound(message),
            s if s.is_client_error() => ReorderOutcome::StoreTransactionFailure(message),
            _ => ReorderOutcome::TransportFailure(format!(
                "Unreadable reorder response ({}): {}",
                status, err
            )),
        }
    }

    /// Execute a request and decode a plain JSON body
    async fn execute<T: DeserializeOwned>(&self, request: Request<Body>) -> ClientResult<T> {
        let (status, body_bytes) = self.dispatch(request).await?;

        if !status.is_success() {
            let text = String::from_utf8_lossy(&body_bytes).to_string();
            if let Ok(api_err) = serde_json::from_str::<ApiResponse<()>>(&text)
                && let Some(code) = api_err.code
            {
                return Err(ClientError::Api {
                    code,
                    message: api_err.message,
                    details: api_err.details,
                });
            }
            return match status {
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(text)),
                StatusCode::BAD_REQUEST => Err(ClientError::Validation(text)),
                _ => Err(ClientError::Internal(text)),
            };
        }

        serde_json::from_slice(&body_bytes)
            .map_err(|e| ClientError::InvalidResponse(format!("JSON parse error: {}", e)))
    }
}

#[async_trait]
impl JobsTransport for OneshotTransport {
    async fn list_jobs(&self) -> ClientResult<Vec<Job>> {
        let request = Self::build_request::<()>(Method::GET, "/api/jobs", None)?;
        self.execute(request).await
    }

    async fn create_job(&self, data: &JobCreate) -> ClientResult<Job> {
        let request = Self::build_request(Method::POST, "/api/jobs", Some(data))?;
        self.execute(request).await
    }

    async fn update_job(&self, id: &str, patch: &JobUpdate) -> ClientResult<Job> {
        let path = format!("/api/jobs/{}", id);
        let request = Self::build_request(Method::PATCH, &path, Some(patch))?;
        self.execute(request).await
    }

    async fn reorder(&self, request: &ReorderRequest) -> ReorderOutcome {
        let path = format!("/api/jobs/{}/reorder", request.moving_id);
        let http_request = match Self::build_request(Method::PATCH, &path, Some(&request.body())) {
            Ok(r) => r,
            Err(e) => return ReorderOutcome::TransportFailure(e.to_string()),
        };

        let (status, body_bytes) = match self.dispatch(http_request).await {
            Ok(r) => r,
            Err(e) => return ReorderOutcome::TransportFailure(e.to_string()),
        };

        let response: ApiResponse<ReorderReceipt> = match serde_json::from_slice(&body_bytes) {
            Ok(r) => r,
            Err(e) => return Self::classify_unreadable(status, &body_bytes, e),
        };

        if status.is_success()
            && let Some(receipt) = response.data
        {
            return ReorderOutcome::Success(receipt);
        }

        match response.error_code() {
            Some(code) => ReorderOutcome::from_error_code(code, response.message),
            None => ReorderOutcome::StoreTransactionFailure(response.message),
        }
    }
}

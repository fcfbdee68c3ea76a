use std::path::Path;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::core::wizard::Step;
use crate::models::{ApplicationRecord, CheckoutSession, VerifyOutcome};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from the backend API.
///
/// "Not found" gets its own variant because the sequencer treats it as
/// benign ("no progress yet") while every other failure is fatal for the
/// current view.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("application not found")]
    NotFound,
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("could not read file {path}: {source}")]
    File {
        path: String,
        source: std::io::Error,
    },
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Thin client over the backend REST API. All application data lives behind
/// it; the client holds no state beyond the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("visawiz/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let base_url = base_url.into();
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the application record. 404 maps to [`ApiError::NotFound`].
    pub async fn fetch_application(&self, id: &str) -> Result<ApplicationRecord, ApiError> {
        debug!(id, "fetching application");
        let response = self
            .http
            .get(format!("{}/applications/{}", self.base_url, id))
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// Create a new application from the first step's data. The backend
    /// generates the identifier and returns the full record.
    pub async fn create_application(
        &self,
        payload: &serde_json::Value,
    ) -> Result<ApplicationRecord, ApiError> {
        debug!("creating application");
        let response = self
            .http
            .post(format!("{}/applications", self.base_url))
            .json(payload)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// Submit a step's data for the first time.
    pub async fn submit_step(
        &self,
        id: &str,
        step: Step,
        payload: &serde_json::Value,
    ) -> Result<ApplicationRecord, ApiError> {
        debug!(id, step = step.slug(), "submitting step");
        let response = self
            .http
            .post(format!(
                "{}/applications/{}/{}",
                self.base_url,
                id,
                step.slug()
            ))
            .json(payload)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// Patch a step's already-submitted data in place.
    pub async fn update_step(
        &self,
        id: &str,
        step: Step,
        payload: &serde_json::Value,
    ) -> Result<ApplicationRecord, ApiError> {
        debug!(id, step = step.slug(), "updating step");
        let response = self
            .http
            .patch(format!(
                "{}/applications/{}/{}",
                self.base_url,
                id,
                step.slug()
            ))
            .json(payload)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// Upload a file for a step that takes one (supporting documents or the
    /// photo), as multipart form data.
    pub async fn upload_file(
        &self,
        id: &str,
        step: Step,
        path: &Path,
    ) -> Result<ApplicationRecord, ApiError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        debug!(id, step = step.slug(), file = %name, "uploading file");
        let bytes = tokio::fs::read(path).await.map_err(|source| ApiError::File {
            path: path.display().to_string(),
            source,
        })?;
        let form = Form::new().part("file", Part::bytes(bytes).file_name(name));
        let response = self
            .http
            .post(format!(
                "{}/applications/{}/{}",
                self.base_url,
                id,
                step.slug()
            ))
            .multipart(form)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// Ask the backend for a hosted checkout session for this application.
    pub async fn create_checkout_session(&self, id: &str) -> Result<CheckoutSession, ApiError> {
        debug!(id, "creating checkout session");
        let response = self
            .http
            .post(format!("{}/payments/checkout-session", self.base_url))
            .json(&serde_json::json!({ "application_id": id }))
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// Verify a provider session reference against the backend.
    pub async fn verify_session(&self, session_id: &str) -> Result<VerifyOutcome, ApiError> {
        debug!(session_id, "verifying payment session");
        let response = self
            .http
            .get(format!("{}/payments/verify/{}", self.base_url, session_id))
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// Map non-success statuses to [`ApiError`], preserving the backend's
    /// error message when the body carries one.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }
        if status.is_success() {
            return Ok(response);
        }
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.message,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        };
        warn!(status = status.as_u16(), message, "backend request failed");
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

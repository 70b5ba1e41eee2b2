/// Classification provider client
///
/// Talks to the remote leaf classification service over HTTP.
///
/// # API Reference
/// - `GET  /` returns `{"message": "..."}` (reachability banner)
/// - `POST /classify/?model_name=<id>` with a multipart `file` field returns
///   `{"predictions": [{"class", "probability"}], "is_mint", "model_used"}`
/// - Errors come back FastAPI-style as `{"detail": ...}` with a 4xx/5xx status
use reqwest::{multipart, Client};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::interpret::predictions_descending;
use crate::error::ClassificationError;
use crate::state::data::{ClassificationRequest, ClassificationResponse, ModelId, PredictionEntry};

/// Default timeout for provider requests
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest error body echoed back to the user
const MAX_DETAIL_LEN: usize = 200;

/// HTTP client for the classification provider
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    /// HTTP client for API requests
    http_client: Client,
    /// Base URL without trailing slash (e.g., "http://127.0.0.1:8000")
    endpoint: String,
}

/// Reply body of `POST /classify/`
#[derive(Debug, Deserialize)]
struct ClassifyReply {
    predictions: Vec<PredictionEntry>,
    is_mint: bool,
    #[serde(default)]
    model_used: Option<String>,
}

/// Reply body of `GET /`
#[derive(Debug, Deserialize)]
struct BannerReply {
    message: String,
}

/// FastAPI error body
#[derive(Debug, Deserialize)]
struct ErrorReply {
    detail: serde_json::Value,
}

impl ProviderClient {
    /// Create a client for the provider at `endpoint`
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, ClassificationError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClassificationError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one image to the provider and parse its ranking
    ///
    /// # Errors
    /// - `Transport` if the provider cannot be reached or times out
    /// - `Status` if it answers with a non-success status
    /// - `MalformedResponse` if the reply lacks `predictions`/`is_mint`
    pub async fn classify(
        &self,
        request: ClassificationRequest,
    ) -> Result<ClassificationResponse, ClassificationError> {
        let url = format!("{}/classify/", self.endpoint);
        let image = request.image;

        let part = multipart::Part::bytes(image.payload.to_vec())
            .file_name(image.file_name.clone())
            .mime_str(image.mime_type)
            .map_err(transport_error)?;
        let form = multipart::Form::new().part("file", part);

        debug!(
            "POST {} (model_name={}, file={}, {} bytes)",
            url,
            request.model.as_str(),
            image.file_name,
            image.payload.len()
        );

        let response = self
            .http_client
            .post(&url)
            .query(&[("model_name", request.model.as_str())])
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(ClassificationError::Status {
                status: status.as_u16(),
                detail: error_detail(&body),
            });
        }

        parse_reply(&body)
    }

    /// Check that the provider is up and return its banner message
    pub async fn ping(&self) -> Result<String, ClassificationError> {
        let url = format!("{}/", self.endpoint);
        debug!("GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(ClassificationError::Status {
                status: status.as_u16(),
                detail: error_detail(&body),
            });
        }

        serde_json::from_str::<BannerReply>(&body)
            .map(|banner| banner.message)
            .map_err(|e| ClassificationError::MalformedResponse(e.to_string()))
    }
}

/// Parse and validate a `POST /classify/` reply body
pub fn parse_reply(body: &str) -> Result<ClassificationResponse, ClassificationError> {
    let reply: ClassifyReply = serde_json::from_str(body)
        .map_err(|e| ClassificationError::MalformedResponse(e.to_string()))?;

    if let Some(bad) = reply
        .predictions
        .iter()
        .find(|p| !p.probability.is_finite() || !(0.0..=100.0).contains(&p.probability))
    {
        return Err(ClassificationError::MalformedResponse(format!(
            "probability {} for '{}' is outside 0-100",
            bad.probability, bad.class_label
        )));
    }

    // Ranking is the provider's job; report but keep its order
    if !predictions_descending(&reply.predictions) {
        warn!("Provider returned predictions out of descending order");
    }

    let model_used = reply.model_used.and_then(|name| match name.parse::<ModelId>() {
        Ok(model) => Some(model),
        Err(e) => {
            debug!("Ignoring model_used: {}", e);
            None
        }
    });

    Ok(ClassificationResponse {
        predictions: reply.predictions,
        is_mint: reply.is_mint,
        model_used,
    })
}

/// Extract a readable message from an error body
fn error_detail(body: &str) -> String {
    if let Ok(reply) = serde_json::from_str::<ErrorReply>(body) {
        return match reply.detail {
            serde_json::Value::String(message) => message,
            other => other.to_string(),
        };
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "no details".to_string();
    }
    trimmed.chars().take(MAX_DETAIL_LEN).collect()
}

fn transport_error(e: reqwest::Error) -> ClassificationError {
    if e.is_timeout() {
        ClassificationError::Transport("request timed out".to_string())
    } else {
        ClassificationError::Transport(e.to_string())
    }
}

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

use super::error::ApiError;
use super::types::{
    DiagnosticsReport, ErrorBody, GenerateRequest, GenerateResponse, HealthResponse,
    StatusSnapshot,
};

/// The two backend calls the polling controller depends on.
///
/// Futures are `Send` so a controller can drive them from a spawned task.
pub trait JobApi: Send + Sync + 'static {
    /// Start a brief generation for `url`, returning the backend job id.
    fn create_job(&self, url: &str) -> impl Future<Output = Result<String, ApiError>> + Send;

    /// Fetch the current status of a job.
    fn job_status(
        &self,
        job_id: &str,
    ) -> impl Future<Output = Result<StatusSnapshot, ApiError>> + Send;
}

pub struct BriefApiClient {
    client: Client,
    base_url: Url,
}

impl BriefApiClient {
    pub fn new(
        base_url: &str,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| ApiError::BaseUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::BaseUrl(base_url.to_string()));
        }
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Join path segments onto the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub async fn health(&self) -> Result<HealthResponse, ApiError> {
        let response = self.client.get(self.endpoint(&["health"])).send().await?;
        decode(response).await
    }

    pub async fn diagnostics(&self) -> Result<DiagnosticsReport, ApiError> {
        let response = self.client.get(self.endpoint(&["debug"])).send().await?;
        decode(response).await
    }
}

impl JobApi for BriefApiClient {
    async fn create_job(&self, url: &str) -> Result<String, ApiError> {
        let body = GenerateRequest {
            url: url.to_string(),
        };
        let response = self
            .client
            .post(self.endpoint(&["api", "generate"]))
            .json(&body)
            .send()
            .await?;
        let created: GenerateResponse = decode(response).await?;
        tracing::debug!(job_id = %created.job_id, "job created");
        Ok(created.job_id)
    }

    async fn job_status(&self, job_id: &str) -> Result<StatusSnapshot, ApiError> {
        let response = self
            .client
            .get(self.endpoint(&["api", "status", job_id]))
            .send()
            .await?;
        decode(response).await
    }
}

/// Turn a response into `T`, mapping non-2xx statuses to [`ApiError::Status`].
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => body.error,
            Err(_) if text.trim().is_empty() => "unknown error".to_string(),
            Err(_) => text,
        };
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }

    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::application::ports::{BackendError, JobBackend, JobOutputStream};
use crate::domain::JobStatus;

const STREAM_IDLE_DELAY: Duration = Duration::from_millis(250);

/// Client for the job API (`/run`, `/status`, `/stream`, `/cancel`).
pub struct HttpJobBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct SubmitResponse {
    id: String,
}

#[derive(Deserialize)]
struct StatusResponse {
    status: String,
}

#[derive(Deserialize)]
struct StreamResponse {
    status: String,
    #[serde(default)]
    stream: Vec<StreamItem>,
}

#[derive(Deserialize)]
struct StreamItem {
    output: Value,
}

impl HttpJobBackend {
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        request_timeout: Duration,
    ) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| BackendError::RequestFailed(format!("client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

fn authorize(request: reqwest::RequestBuilder, api_key: Option<&str>) -> reqwest::RequestBuilder {
    match api_key {
        Some(key) => request.bearer_auth(key),
        None => request,
    }
}

fn request_error(e: reqwest::Error) -> BackendError {
    if e.is_timeout() {
        BackendError::ReadTimeout
    } else {
        BackendError::RequestFailed(e.to_string())
    }
}

fn body_error(e: reqwest::Error) -> BackendError {
    if e.is_timeout() {
        BackendError::ReadTimeout
    } else {
        BackendError::InvalidResponse(e.to_string())
    }
}

fn parse_status(raw: &str) -> Result<JobStatus, BackendError> {
    raw.parse().map_err(BackendError::InvalidResponse)
}

async fn check_response(
    response: reqwest::Response,
    job_id: &str,
) -> Result<reqwest::Response, BackendError> {
    if response.status() == reqwest::StatusCode::NOT_FOUND {
        return Err(BackendError::NotFound(job_id.to_string()));
    }

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(BackendError::RequestFailed(format!(
            "HTTP {}: {}",
            status, body
        )));
    }

    Ok(response)
}

#[async_trait]
impl JobBackend for HttpJobBackend {
    async fn submit(&self, body: String) -> Result<String, BackendError> {
        let request = self
            .client
            .post(format!("{}/run", self.base_url))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body);

        let response = authorize(request, self.api_key.as_deref())
            .send()
            .await
            .map_err(request_error)?;
        let response = check_response(response, "").await?;

        let submitted: SubmitResponse = response.json().await.map_err(body_error)?;
        Ok(submitted.id)
    }

    async fn status(&self, job_id: &str) -> Result<JobStatus, BackendError> {
        let request = self
            .client
            .get(format!("{}/status/{}", self.base_url, job_id));

        let response = authorize(request, self.api_key.as_deref())
            .send()
            .await
            .map_err(request_error)?;
        let response = check_response(response, job_id).await?;

        let status: StatusResponse = response.json().await.map_err(body_error)?;
        parse_status(&status.status)
    }

    fn stream(&self, job_id: &str, offset: usize) -> JobOutputStream {
        let client = self.client.clone();
        let url = format!("{}/stream/{}", self.base_url, job_id);
        let api_key = self.api_key.clone();
        let job_id = job_id.to_string();

        Box::pin(async_stream::stream! {
            let mut offset = offset;
            loop {
                let request = authorize(
                    client.get(&url).query(&[("offset", offset)]),
                    api_key.as_deref(),
                );

                let response = match request.send().await {
                    Ok(response) => response,
                    Err(e) => {
                        yield Err(request_error(e));
                        return;
                    }
                };
                let response = match check_response(response, &job_id).await {
                    Ok(response) => response,
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                };
                let batch: StreamResponse = match response.json().await {
                    Ok(batch) => batch,
                    Err(e) => {
                        yield Err(body_error(e));
                        return;
                    }
                };

                let idle = batch.stream.is_empty();
                offset += batch.stream.len();
                for item in batch.stream {
                    yield Ok(item.output);
                }

                match parse_status(&batch.status) {
                    Ok(status) if status.is_terminal() => return,
                    Ok(_) => {}
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                }

                if idle {
                    tokio::time::sleep(STREAM_IDLE_DELAY).await;
                }
            }
        })
    }

    async fn cancel(&self, job_id: &str) -> Result<(), BackendError> {
        let request = self
            .client
            .post(format!("{}/cancel/{}", self.base_url, job_id));

        let response = authorize(request, self.api_key.as_deref())
            .send()
            .await
            .map_err(request_error)?;
        check_response(response, job_id).await?;

        tracing::info!(job_id = job_id, "Job cancelled");
        Ok(())
    }
}

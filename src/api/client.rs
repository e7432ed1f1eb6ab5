//! CPA Backend REST Client
//!
//! HTTP client for the `/api/cpa/*` resources and the `/api/core/*` helper.
//! Every call shares one contract: `ApiResult<T>`.

use async_trait::async_trait;
use reqwest::{header, Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use uuid::Uuid;

use super::auth::Credentials;
use super::error::{error_message, ApiError, ApiResult};
use crate::config::ApiConfig;
use crate::model::{
    Client as CpaClient, ClientsEnvelope, Insight, InsightsEnvelope, Lead, PipelineEnvelope,
    ReviewItem, ReviewQueueEnvelope,
};

/// Data source for the dashboard loaders
///
/// `Ok(None)` means the response carried no collection field: nothing to
/// render, but not an error either.
#[async_trait]
pub trait CpaApi: Send + Sync {
    async fn fetch_insights(&self) -> ApiResult<Option<Vec<Insight>>>;

    async fn fetch_clients(&self) -> ApiResult<Option<Vec<CpaClient>>>;

    async fn fetch_pipeline(&self) -> ApiResult<Option<Vec<Lead>>>;

    async fn fetch_review_queue(&self) -> ApiResult<Option<Vec<ReviewItem>>>;
}

/// REST client for the CPA backend
pub struct ApiClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

impl ApiClient {
    /// Create a new client with the given configuration and credentials
    pub fn new(config: &ApiConfig, credentials: Credentials) -> ApiResult<Self> {
        let client = build_http_client(Duration::from_secs(config.request_timeout_secs))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// Replace the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> ApiResult<Self> {
        self.client = build_http_client(timeout)?;
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET a path under the base URL and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = format!("{}{}", self.base_url, path);
        self.send(self.request(Method::GET, &url)).await
    }

    /// Call `/api/core/<endpoint>`
    ///
    /// Attaches the CSRF token on state-mutating methods. Returns the decoded
    /// JSON body (`null` for an empty body).
    pub async fn core_request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&serde_json::Value>,
    ) -> ApiResult<serde_json::Value> {
        let url = format!("{}/api/core/{}", self.base_url, encode_endpoint(endpoint));

        let mut builder = self.request(method, &url);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        self.send(builder).await
    }

    /// Build a request with the session headers attached
    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let mutating = is_mutating(&method);

        let mut builder = self
            .client
            .request(method, url)
            .header(header::ACCEPT, "application/json")
            .header("X-Request-Id", Uuid::new_v4().to_string());

        if let Some(token) = &self.credentials.bearer_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(preparer_id) = &self.credentials.preparer_id {
            builder = builder.header("X-Preparer-ID", preparer_id);
        }
        if mutating {
            if let Some(csrf) = &self.credentials.csrf_token {
                builder = builder.header("X-CSRF-Token", csrf);
            }
        }

        builder
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = error_message(status.as_u16(), &body);
            tracing::debug!(status = status.as_u16(), message = %message, "API request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let text = if body.trim().is_empty() { "null" } else { body.as_str() };
        Ok(serde_json::from_str(text)?)
    }
}

#[async_trait]
impl CpaApi for ApiClient {
    async fn fetch_insights(&self) -> ApiResult<Option<Vec<Insight>>> {
        let envelope: InsightsEnvelope = self.get_json("/api/cpa/insights").await?;
        Ok(envelope.insights)
    }

    async fn fetch_clients(&self) -> ApiResult<Option<Vec<CpaClient>>> {
        let envelope: ClientsEnvelope = self.get_json("/api/cpa/clients").await?;
        Ok(envelope.clients)
    }

    async fn fetch_pipeline(&self) -> ApiResult<Option<Vec<Lead>>> {
        let envelope: PipelineEnvelope = self.get_json("/api/cpa/pipeline").await?;
        Ok(envelope.leads)
    }

    async fn fetch_review_queue(&self) -> ApiResult<Option<Vec<ReviewItem>>> {
        let envelope: ReviewQueueEnvelope = self.get_json("/api/cpa/review-queue").await?;
        Ok(envelope.items)
    }
}

fn build_http_client(timeout: Duration) -> ApiResult<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ApiError::InvalidRequest(format!("Failed to create HTTP client: {}", e)))
}

/// POST, PUT, PATCH and DELETE carry the CSRF token
pub fn is_mutating(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

/// Percent-encode each path segment of a core endpoint
fn encode_endpoint(endpoint: &str) -> String {
    endpoint
        .trim_matches('/')
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

use anyhow::{Context, Result};
use async_trait::async_trait;
use models::{DashboardSettings, QueryParams, QueryResult, Resource, WordCloudEnvelope};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Url};

/// Where widgets get their rows from.
///
/// Implementations never fail loudly: any error is logged and surfaces as
/// `None`, which widgets render as their placeholder.
#[async_trait(?Send)]
pub trait DataSource {
    async fn query(&self, resource: Resource, params: Option<QueryParams>) -> Option<QueryResult>;
}

/// HTTP client for the `/data/{resource}` endpoints.
#[derive(Debug, Clone)]
pub struct QueryClient {
    http: Client,
    base_url: Url,
}

impl QueryClient {
    /// `base_url` points at the data root, e.g. `http://localhost:3000/data/`.
    pub fn new(base_url: &str) -> Result<Self> {
        // Url::join drops the last segment unless the base ends with '/'
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).with_context(|| format!("Invalid API base URL: {base}"))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http, base_url })
    }

    pub fn from_settings(settings: &DashboardSettings) -> Result<Self> {
        Self::new(&settings.api_base_url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn endpoint(&self, resource: Resource) -> Result<Url> {
        self.base_url
            .join(resource.path())
            .with_context(|| format!("Failed to build URL for {resource}"))
    }
}

#[async_trait(?Send)]
impl DataSource for QueryClient {
    async fn query(&self, resource: Resource, params: Option<QueryParams>) -> Option<QueryResult> {
        let url = match self.endpoint(resource) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(%resource, error = %e, "query not sent");
                return None;
            }
        };

        // A body means POST; a bare resource is a plain GET
        let request = match &params {
            Some(params) => self.http.post(url).json(params),
            None => self.http.get(url),
        };

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(%resource, error = %e, "query transport failure");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%resource, %status, body = %body, "query rejected by server");
            return None;
        }

        let rows = if resource.is_enveloped() {
            response
                .json::<WordCloudEnvelope>()
                .await
                .map(|envelope| envelope.result)
        } else {
            response.json::<QueryResult>().await
        };

        match rows {
            Ok(rows) if rows.is_empty() => {
                tracing::info!(%resource, ?params, "query returned no rows");
                Some(rows)
            }
            Ok(rows) => {
                tracing::debug!(%resource, rows = rows.len(), "query complete");
                Some(rows)
            }
            Err(e) => {
                tracing::warn!(%resource, error = %e, "query response was not a row list");
                None
            }
        }
    }
}

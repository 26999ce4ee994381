//! HTTP client for the business search service.
//!
//! One client covers both wire shapes. [`TransportKind::Get`] sends
//! `GET /search?q=..&limit=..`; [`TransportKind::Post`] sends `POST /query`
//! with a `query_string` JSON body. Either response envelope is accepted.

use std::time::Duration;

use async_trait::async_trait;
use bizsearch_core::records::duplicate_place_ids;
use bizsearch_core::{AppConfig, BusinessRecord, SearchEnvelope, TransportKind};
use reqwest::{Client, Url};
use serde::Serialize;

use crate::error::SearchError;
use crate::service::SearchService;

#[derive(Serialize)]
struct QueryBody<'a> {
    query_string: &'a str,
}

/// Client for the search service.
///
/// Cheap to clone: the inner `reqwest::Client` is reference counted.
#[derive(Debug, Clone)]
pub struct SearchClient {
    client: Client,
    base_url: Url,
    transport: TransportKind,
    result_limit: u32,
    timeout_ms: u64,
}

impl SearchClient {
    /// Creates a client from loaded application config.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`SearchError::InvalidBaseUrl`] if `service_url` does not parse.
    pub fn from_config(config: &AppConfig) -> Result<Self, SearchError> {
        Self::new(
            &config.service_url,
            config.transport,
            config.timeout_ms,
            config.result_limit,
            &config.user_agent,
        )
    }

    /// Creates a client against an explicit base URL (a wiremock server in tests).
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`SearchError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn new(
        base_url: &str,
        transport: TransportKind,
        timeout_ms: u64,
        result_limit: u32,
        user_agent: &str,
    ) -> Result<Self, SearchError> {
        let timeout = Duration::from_millis(timeout_ms);
        let client = Client::builder()
            .connect_timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `Url::join` appends to the base path
        // instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim().trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| SearchError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(SearchError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: "URL cannot be used as a base".to_owned(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
            transport,
            result_limit,
            timeout_ms,
        })
    }

    #[must_use]
    pub fn transport(&self) -> TransportKind {
        self.transport
    }

    /// Runs one search, bounded by the configured timeout.
    ///
    /// Dropping the in-flight request on timeout aborts the HTTP call.
    ///
    /// # Errors
    ///
    /// - [`SearchError::Timeout`] if the bound expires first.
    /// - [`SearchError::Http`] on network or TLS failure.
    /// - [`SearchError::UnexpectedStatus`] on any non-2xx response.
    /// - [`SearchError::Deserialize`] if the body is not a valid envelope or a
    ///   record in it fails to parse.
    pub async fn search(&self, query: &str) -> Result<Vec<BusinessRecord>, SearchError> {
        let bound = Duration::from_millis(self.timeout_ms);
        match tokio::time::timeout(bound, self.request(query)).await {
            Ok(result) => result,
            Err(_) => Err(SearchError::Timeout {
                timeout_ms: self.timeout_ms,
            }),
        }
    }

    async fn request(&self, query: &str) -> Result<Vec<BusinessRecord>, SearchError> {
        let url = self.endpoint_url(query);
        tracing::debug!(transport = %self.transport, %url, "sending search request");

        let request = match self.transport {
            TransportKind::Get => self.client.get(url.clone()),
            TransportKind::Post => self
                .client
                .post(url.clone())
                .json(&QueryBody {
                    query_string: query,
                }),
        };

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let envelope: SearchEnvelope =
            serde_json::from_str(&body).map_err(|e| SearchError::Deserialize {
                context: format!("search(query={query})"),
                source: e,
            })?;
        let records = envelope.into_records();

        let dupes = duplicate_place_ids(&records);
        if !dupes.is_empty() {
            tracing::warn!(
                query,
                duplicates = ?dupes,
                "search service returned duplicate place_ids"
            );
        }

        tracing::debug!(query, count = records.len(), "search request succeeded");
        Ok(records)
    }

    /// Builds the endpoint URL for the configured transport.
    ///
    /// The GET shape carries the query and limit as percent-encoded params;
    /// the POST shape carries the query in the body only.
    fn endpoint_url(&self, query: &str) -> Url {
        match self.transport {
            TransportKind::Get => {
                let mut url = self.join("search");
                url.query_pairs_mut()
                    .append_pair("q", query)
                    .append_pair("limit", &self.result_limit.to_string());
                url
            }
            TransportKind::Post => self.join("query"),
        }
    }

    fn join(&self, segment: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(segment);
        }
        url
    }
}

#[async_trait]
impl SearchService for SearchClient {
    async fn search(&self, query: &str) -> Result<Vec<BusinessRecord>, SearchError> {
        SearchClient::search(self, query).await
    }
}

//! reqwest-backed [`Fetcher`] for the hypothesis REST API.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use super::{ExportRequest, Fetcher, HypothesisQuery};
use crate::config::Settings;
use crate::error::FetchError;
use crate::models::topic::{index_categories, index_subtopics};
use crate::models::{
    Category, HypothesisPage, LiteratureRecord, Pagination, RawHypothesis, ScoreDistribution,
    Subtopic, SubtopicDetail, Topic,
};

/// Failure constructing an [`ApiClient`].
#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("invalid API base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("failed to create HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// HTTP client for the hypothesis API with request logging.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client from settings (base URL, user agent, optional timeout).
    pub fn new(settings: &Settings) -> Result<Self, ClientBuildError> {
        let mut builder = Client::builder()
            .user_agent(&settings.user_agent)
            .gzip(true);
        if let Some(timeout) = settings.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: normalize_base(&settings.api_url)?,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| FetchError::network(None, format!("bad endpoint {}: {}", path, e)))
    }

    /// GET a JSON document. Non-2xx statuses and `{"error": ...}` bodies are
    /// both reported as [`FetchError::Network`].
    async fn get_json(&self, path: &str, query: Option<&str>) -> Result<Value, FetchError> {
        let mut url = self.endpoint(path)?;
        if let Some(q) = query.filter(|q| !q.is_empty()) {
            url.set_query(Some(q));
        }

        let start = Instant::now();
        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            tracing::warn!("GET {} failed: {}", url, e);
            FetchError::network(None, e.to_string())
        })?;
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(
            "GET {} -> {} ({} bytes, {}ms)",
            url,
            status.as_u16(),
            body.len(),
            start.elapsed().as_millis()
        );

        if !status.is_success() {
            return Err(FetchError::network(
                Some(status.as_u16()),
                error_message(status, &body),
            ));
        }

        let value: Value = serde_json::from_str(&body)?;
        if let Some(message) = value.get("error") {
            return Err(FetchError::network(
                Some(status.as_u16()),
                value_text(message),
            ));
        }
        Ok(value)
    }

    async fn get_typed<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<&str>,
    ) -> Result<T, FetchError> {
        let value = self.get_json(path, query).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn fetch_literature(
        &self,
        topic: i64,
        subtopic: usize,
    ) -> Result<LiteratureRecord, FetchError> {
        self.get_typed(&format!("api/literature_agent/{}/{}", topic, subtopic), None)
            .await
    }

    async fn fetch_current_analysis(
        &self,
        topic: i64,
        subtopic: usize,
    ) -> Result<Option<String>, FetchError> {
        let value = self
            .get_json(
                &format!("api/analyzer_analysis/{}/{}", topic, subtopic),
                None,
            )
            .await?;
        Ok(match value.get("current_analysis") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        })
    }
}

/// Base URLs are joined against, so they must end in `/`.
fn normalize_base(raw: &str) -> Result<Url, url::ParseError> {
    let trimmed = raw.trim();
    if trimmed.ends_with('/') {
        Url::parse(trimmed)
    } else {
        Url::parse(&format!("{}/", trimmed))
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Error text for a non-2xx response: the `error` field when the body is
/// JSON, else the body itself, else the status reason.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = value.get("error") {
            return value_text(message);
        }
    }
    let body = body.trim();
    if !body.is_empty() && body.len() <= 200 {
        return body.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}

/// The list endpoint answers either with a bare array or with
/// `{"hypotheses": [...], "pagination": {...}}`.
pub fn decode_hypothesis_page(value: Value) -> Result<HypothesisPage, FetchError> {
    match value {
        Value::Array(_) => Ok(HypothesisPage {
            hypotheses: serde_json::from_value(value)?,
            pagination: None,
        }),
        Value::Object(mut map) => {
            let hypotheses = match map.remove("hypotheses") {
                Some(list) => serde_json::from_value(list)?,
                None => {
                    return Err(FetchError::Decode(
                        "response has no hypotheses field".to_string(),
                    ))
                }
            };
            let pagination = match map.remove("pagination") {
                Some(Value::Null) | None => None,
                Some(p) => Some(serde_json::from_value::<Pagination>(p)?),
            };
            Ok(HypothesisPage {
                hypotheses,
                pagination,
            })
        }
        other => Err(FetchError::Decode(format!(
            "unexpected hypotheses payload: {}",
            other
        ))),
    }
}

#[async_trait]
impl Fetcher for ApiClient {
    async fn fetch_topics(&self) -> Result<Vec<Topic>, FetchError> {
        self.get_typed("api/topics", None).await
    }

    async fn fetch_subtopics(&self, topic: i64) -> Result<Vec<Subtopic>, FetchError> {
        let subtopics = self
            .get_typed(&format!("api/subtopics/{}", topic), None)
            .await?;
        Ok(index_subtopics(subtopics))
    }

    async fn fetch_categories(
        &self,
        topic: i64,
        subtopic: usize,
    ) -> Result<Vec<Category>, FetchError> {
        let categories = self
            .get_typed(&format!("api/categories/{}/{}", topic, subtopic), None)
            .await?;
        Ok(index_categories(categories))
    }

    async fn fetch_subtopic_label(
        &self,
        topic: i64,
        subtopic: usize,
    ) -> Result<Option<String>, FetchError> {
        let record = self.fetch_literature(topic, subtopic).await?;
        Ok(record.topic_category.filter(|c| !c.is_empty()))
    }

    async fn fetch_subtopic_detail(
        &self,
        topic: i64,
        subtopic: usize,
    ) -> Result<SubtopicDetail, FetchError> {
        let (literature, analysis) = futures::join!(
            self.fetch_literature(topic, subtopic),
            self.fetch_current_analysis(topic, subtopic)
        );
        let current_analysis = match analysis {
            Ok(analysis) => analysis,
            Err(e) => {
                tracing::warn!(
                    "Current analysis unavailable for topic {} subtopic {}: {}",
                    topic,
                    subtopic,
                    e
                );
                None
            }
        };
        Ok(SubtopicDetail {
            literature: literature?,
            current_analysis,
        })
    }

    async fn fetch_hypotheses(
        &self,
        query: &HypothesisQuery,
    ) -> Result<HypothesisPage, FetchError> {
        let value = self
            .get_json("api/hypotheses", Some(&query.query_string()))
            .await?;
        decode_hypothesis_page(value)
    }

    async fn fetch_hypothesis_by_id(&self, id: i64) -> Result<RawHypothesis, FetchError> {
        self.get_typed(&format!("api/hypothesis/{}", id), None).await
    }

    async fn fetch_score_distribution(&self) -> Result<ScoreDistribution, FetchError> {
        self.get_typed("api/analytics/score_distribution", None)
            .await
    }

    async fn request_export(&self, request: &ExportRequest) -> Result<Vec<u8>, FetchError> {
        let url = self.endpoint("api/export/hypotheses")?;
        let start = Instant::now();
        let response = self
            .client
            .post(url.clone())
            .json(&request.body())
            .send()
            .await
            .map_err(|e| FetchError::network(None, e.to_string()))?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("POST {} -> {}", url, status.as_u16());
            return Err(FetchError::network(
                Some(status.as_u16()),
                error_message(status, &body),
            ));
        }

        let bytes = response.bytes().await?;
        tracing::debug!(
            "POST {} -> {} ({} bytes, {}ms)",
            url,
            status.as_u16(),
            bytes.len(),
            start.elapsed().as_millis()
        );
        Ok(bytes.to_vec())
    }
}

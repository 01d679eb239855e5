//! Data fetching from the hypothesis REST API.
//!
//! [`Fetcher`] is the seam between navigation logic and the network: the
//! navigator only ever talks to a `Fetcher`, [`ApiClient`] is the reqwest
//! implementation, and tests substitute recording fakes.

pub mod client;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::FetchError;
use crate::models::navigation::{DEFAULT_PAGE, DEFAULT_PER_PAGE, DEFAULT_SORT_BY, LOAD_ALL_PER_PAGE};
use crate::models::{
    Category, HypothesisPage, NavigationState, RawHypothesis, ScoreDistribution, SortOrder,
    Subtopic, SubtopicDetail, Topic,
};

pub use client::ApiClient;

/// One async operation per API resource.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch_topics(&self) -> Result<Vec<Topic>, FetchError>;

    async fn fetch_subtopics(&self, topic: i64) -> Result<Vec<Subtopic>, FetchError>;

    async fn fetch_categories(
        &self,
        topic: i64,
        subtopic: usize,
    ) -> Result<Vec<Category>, FetchError>;

    /// Category label shown next to a subtopic row in the tree.
    async fn fetch_subtopic_label(
        &self,
        topic: i64,
        subtopic: usize,
    ) -> Result<Option<String>, FetchError>;

    /// Literature record plus current analysis for the info cards.
    async fn fetch_subtopic_detail(
        &self,
        topic: i64,
        subtopic: usize,
    ) -> Result<SubtopicDetail, FetchError>;

    async fn fetch_hypotheses(&self, query: &HypothesisQuery)
        -> Result<HypothesisPage, FetchError>;

    async fn fetch_hypothesis_by_id(&self, id: i64) -> Result<RawHypothesis, FetchError>;

    async fn fetch_score_distribution(&self) -> Result<ScoreDistribution, FetchError>;

    /// POST the export body and return the file bytes.
    async fn request_export(&self, request: &ExportRequest) -> Result<Vec<u8>, FetchError>;
}

/// Query for `/api/hypotheses`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HypothesisQuery {
    /// Single-record lookup through the list endpoint.
    pub hypothesis_id: Option<i64>,
    pub topic: Option<i64>,
    pub subtopic: Option<usize>,
    pub category: Option<usize>,
    pub strategies: Vec<String>,
    pub sort_by: String,
    pub sort_order: SortOrder,
    pub page: u32,
    pub per_page: u32,
}

impl HypothesisQuery {
    /// Query reflecting the current selection and filters.
    pub fn from_state(state: &NavigationState) -> Self {
        Self {
            hypothesis_id: None,
            topic: state.topic,
            subtopic: state.subtopic,
            category: state.category,
            strategies: state.strategies.iter().cloned().collect(),
            sort_by: state.sort_by.clone(),
            sort_order: state.sort_order,
            page: state.page,
            per_page: state.per_page,
        }
    }

    /// Unfiltered first page used when the sorting view starts.
    pub fn load_all() -> Self {
        Self {
            hypothesis_id: None,
            topic: None,
            subtopic: None,
            category: None,
            strategies: Vec::new(),
            sort_by: DEFAULT_SORT_BY.to_string(),
            sort_order: SortOrder::default(),
            page: DEFAULT_PAGE,
            per_page: LOAD_ALL_PER_PAGE,
        }
    }

    /// Fallback lookup used when `/api/hypothesis/{id}` fails.
    pub fn by_id(id: i64) -> Self {
        Self {
            hypothesis_id: Some(id),
            per_page: DEFAULT_PER_PAGE,
            ..Self::load_all()
        }
    }

    /// Query parameters in wire order. Sort and paging parameters are left
    /// out when they equal the server defaults.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(id) = self.hypothesis_id {
            pairs.push(("hypothesis_id", id.to_string()));
        }
        if let Some(topic) = self.topic {
            pairs.push(("topic", topic.to_string()));
        }
        if let Some(subtopic) = self.subtopic {
            pairs.push(("subtopic", subtopic.to_string()));
        }
        if let Some(category) = self.category {
            pairs.push(("category", category.to_string()));
        }
        for strategy in &self.strategies {
            pairs.push(("strategy", strategy.clone()));
        }
        if self.sort_by != DEFAULT_SORT_BY {
            pairs.push(("sort_by", self.sort_by.clone()));
        }
        if self.sort_order != SortOrder::default() {
            pairs.push(("sort_order", self.sort_order.to_string()));
        }
        if self.page != DEFAULT_PAGE {
            pairs.push(("page", self.page.to_string()));
        }
        if self.per_page != DEFAULT_PER_PAGE {
            pairs.push(("per_page", self.per_page.to_string()));
        }
        pairs
    }

    /// Form-encoded query string, without the leading `?`.
    pub fn query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.to_pairs() {
            serializer.append_pair(key, &value);
        }
        serializer.finish()
    }
}

/// Body of an export request.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportRequest {
    /// Topic view: topic plus subtopic (0 when none is selected).
    Selection { topic: i64, subtopic: usize },
    /// Sorting view: the whole filter state.
    Filters(NavigationState),
}

impl ExportRequest {
    pub fn body(&self) -> Value {
        match self {
            ExportRequest::Selection { topic, subtopic } => {
                json!({ "topic": topic, "subtopic": subtopic })
            }
            ExportRequest::Filters(state) => json!({
                "topic": state.topic,
                "subtopic": state.subtopic,
                "category": state.category,
                "strategies": state.strategies,
                "sortBy": state.sort_by,
                "sortOrder": state.sort_order,
                "page": state.page,
                "perPage": state.per_page,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_minimal_selection() {
        let mut state = NavigationState::default();
        state.select_subtopic(3, 1);
        state.toggle_strategy("evolve");
        let query = HypothesisQuery::from_state(&state);
        assert_eq!(
            query.query_string(),
            "topic=3&subtopic=1&category=0&strategy=evolve"
        );
    }

    #[test]
    fn test_query_repeats_strategy_in_set_order() {
        let mut state = NavigationState::default();
        state.toggle_strategy("similar");
        state.toggle_strategy("evolve");
        let query = HypothesisQuery::from_state(&state);
        assert_eq!(query.query_string(), "strategy=evolve&strategy=similar");
    }

    #[test]
    fn test_query_includes_non_default_sort_and_paging() {
        let mut state = NavigationState::default();
        state.toggle_strategy("evolve");
        state.set_sort("novelty_score", SortOrder::Asc);
        state.set_per_page(50);
        state.set_page(2);
        let query = HypothesisQuery::from_state(&state);
        assert_eq!(
            query.query_string(),
            "strategy=evolve&sort_by=novelty_score&sort_order=asc&page=2&per_page=50"
        );
    }

    #[test]
    fn test_load_all_query() {
        assert_eq!(HypothesisQuery::load_all().query_string(), "per_page=100");
    }

    #[test]
    fn test_by_id_query() {
        assert_eq!(HypothesisQuery::by_id(8).query_string(), "hypothesis_id=8");
    }

    #[test]
    fn test_export_selection_body() {
        let req = ExportRequest::Selection {
            topic: 5,
            subtopic: 0,
        };
        assert_eq!(req.body(), json!({"topic": 5, "subtopic": 0}));
    }

    #[test]
    fn test_export_filters_body() {
        let state = NavigationState::for_mode(crate::models::SessionMode::Sorting);
        let body = ExportRequest::Filters(state).body();
        assert_eq!(body["strategies"], json!(["evolve", "high_impact", "similar"]));
        assert_eq!(body["sortOrder"], "desc");
    }
}

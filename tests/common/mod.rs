//! Recording fake fetcher shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Notify;

use hypoview::api::{ExportRequest, Fetcher, HypothesisQuery};
use hypoview::error::FetchError;
use hypoview::models::{
    Category, HypothesisPage, LiteratureRecord, RawHypothesis, ScoreDistribution, Subtopic,
    SubtopicDetail, Topic,
};

/// In-memory [`Fetcher`] that records every call.
#[derive(Default)]
pub struct FakeFetcher {
    pub topics: Vec<Topic>,
    pub subtopics: HashMap<i64, Vec<Subtopic>>,
    pub labels: HashMap<(i64, usize), String>,
    pub categories: Vec<Category>,
    pub by_id: HashMap<i64, RawHypothesis>,
    /// Records the list endpoint returns for `hypothesis_id` lookups.
    pub listed: HashMap<i64, RawHypothesis>,
    pub distribution: ScoreDistribution,
    /// Make every hypothesis load fail with this status.
    pub hypotheses_status: Option<u16>,
    /// Make every export fail with this status.
    pub export_status: Option<u16>,
    /// Hold hypothesis loads whose strategy set is exactly this one until
    /// the notify fires.
    pub gate: Option<(Vec<String>, Arc<Notify>)>,

    pub calls: Mutex<Vec<String>>,
    pub queries: Mutex<Vec<HypothesisQuery>>,
    pub exports: Mutex<Vec<ExportRequest>>,
}

pub fn subtopic(index: usize, title: &str) -> Subtopic {
    Subtopic {
        index,
        title: Some(title.to_string()),
        description: None,
        search_queries: None,
    }
}

pub fn topic(id: i64, title: Option<&str>) -> Topic {
    Topic {
        id,
        title: title.map(str::to_string),
        category: None,
    }
}

pub fn hypothesis(id: i64, title: &str) -> RawHypothesis {
    RawHypothesis {
        id,
        strategy: Some("evolve".to_string()),
        sub_topic: Some(json!(1)),
        hypothesis_content: Some(json!({ "title": title, "scores": { "novelty": 7.0 } })),
        ..Default::default()
    }
}

impl FakeFetcher {
    /// Two topics: topic 1 with two subtopics (the first one labelled),
    /// topic 2 with none.
    pub fn with_tree() -> Self {
        let mut fake = FakeFetcher {
            topics: vec![topic(1, Some("Biology")), topic(2, None)],
            categories: vec![Category {
                index: 0,
                name: Some("Methods".to_string()),
                count: 4,
            }],
            ..Default::default()
        };
        fake.subtopics
            .insert(1, vec![subtopic(0, "Gene drives"), subtopic(1, "Proteomics")]);
        fake.subtopics.insert(2, Vec::new());
        fake.labels.insert((1, 0), "Genomics".to_string());
        fake
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    pub fn query_strings(&self) -> Vec<String> {
        self.queries
            .lock()
            .unwrap()
            .iter()
            .map(|q| q.query_string())
            .collect()
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch_topics(&self) -> Result<Vec<Topic>, FetchError> {
        self.record("topics");
        Ok(self.topics.clone())
    }

    async fn fetch_subtopics(&self, topic: i64) -> Result<Vec<Subtopic>, FetchError> {
        self.record(format!("subtopics:{}", topic));
        self.subtopics
            .get(&topic)
            .cloned()
            .ok_or_else(|| FetchError::network(Some(404), "unknown topic"))
    }

    async fn fetch_categories(
        &self,
        topic: i64,
        subtopic: usize,
    ) -> Result<Vec<Category>, FetchError> {
        self.record(format!("categories:{}:{}", topic, subtopic));
        Ok(self.categories.clone())
    }

    async fn fetch_subtopic_label(
        &self,
        topic: i64,
        subtopic: usize,
    ) -> Result<Option<String>, FetchError> {
        self.record(format!("label:{}:{}", topic, subtopic));
        Ok(self.labels.get(&(topic, subtopic)).cloned())
    }

    async fn fetch_subtopic_detail(
        &self,
        topic: i64,
        subtopic: usize,
    ) -> Result<SubtopicDetail, FetchError> {
        self.record(format!("detail:{}:{}", topic, subtopic));
        Ok(SubtopicDetail {
            literature: LiteratureRecord {
                description: Some(format!("Description of {}/{}", topic, subtopic)),
                search_queries: Some(json!(r#"["alpha", "beta"]"#)),
                ..Default::default()
            },
            current_analysis: Some(
                r#"{"analysis": {"critical_gaps": "Too few trials"}}"#.to_string(),
            ),
        })
    }

    async fn fetch_hypotheses(
        &self,
        query: &HypothesisQuery,
    ) -> Result<HypothesisPage, FetchError> {
        self.record("hypotheses");
        self.queries.lock().unwrap().push(query.clone());

        if let Some(id) = query.hypothesis_id {
            return Ok(HypothesisPage {
                hypotheses: self.listed.get(&id).cloned().into_iter().collect(),
                pagination: None,
            });
        }
        if let Some((strategies, notify)) = &self.gate {
            if &query.strategies == strategies {
                notify.notified().await;
            }
        }
        if let Some(status) = self.hypotheses_status {
            return Err(FetchError::network(Some(status), "database is locked"));
        }

        // One record whose id is the number of strategies requested, so
        // tests can tell responses apart.
        let id = query.strategies.len() as i64;
        Ok(HypothesisPage {
            hypotheses: vec![hypothesis(id, &format!("Result for {} strategies", id))],
            pagination: None,
        })
    }

    async fn fetch_hypothesis_by_id(&self, id: i64) -> Result<RawHypothesis, FetchError> {
        self.record(format!("hypothesis:{}", id));
        self.by_id
            .get(&id)
            .cloned()
            .ok_or_else(|| FetchError::network(Some(404), "Hypothesis not found"))
    }

    async fn fetch_score_distribution(&self) -> Result<ScoreDistribution, FetchError> {
        self.record("distribution");
        Ok(self.distribution.clone())
    }

    async fn request_export(&self, request: &ExportRequest) -> Result<Vec<u8>, FetchError> {
        self.record("export");
        self.exports.lock().unwrap().push(request.clone());
        match self.export_status {
            Some(status) => Err(FetchError::network(Some(status), "export failed")),
            None => Ok(b"id,title\n1,A\n".to_vec()),
        }
    }
}

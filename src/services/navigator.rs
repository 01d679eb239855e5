//! Navigation state machine for one viewing session.
//!
//! Every user action maps to one method here. The session lives behind an
//! async mutex that is only held for synchronous updates; network calls run
//! with the lock released. Hypothesis loads are tagged with a generation
//! number and a response is applied only if its generation is still current,
//! so the last issued request wins.

use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::join_all;
use tokio::sync::Mutex;

use super::export::{self, ExportFile};
use crate::api::{Fetcher, HypothesisQuery};
use crate::error::{FetchError, NoticeLevel, ViewError};
use crate::models::{
    Category, NavigationState, Pagination, RawHypothesis, ScoreDistribution, SessionMode,
    SortOrder, Subtopic, SubtopicDetail, Topic,
};

pub const SELECT_STRATEGIES_PROMPT: &str = "Please select strategies above to view hypotheses";
pub const EMPTY_STRATEGIES_WARNING: &str =
    "Please select at least one strategy to view hypotheses";
pub const NO_RESULTS_MESSAGE: &str = "No hypotheses found for the selected criteria.";
pub const ALL_HYPOTHESES_HEADING: &str = "All Research Hypotheses";
pub const FILTERED_HEADING: &str = "Filtered Results";

/// A message shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Danger, message)
    }

    /// Notice for a failed action. Selection problems are shown as is; fetch
    /// failures are prefixed with what was being attempted.
    pub fn from_error(context: &str, err: &ViewError) -> Self {
        match err {
            ViewError::EmptySelection(msg) => Self::new(err.level(), msg.clone()),
            ViewError::Fetch(e) => Self::new(err.level(), format!("{}: {}", context, e)),
        }
    }
}

/// What the main content region currently shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ContentRegion {
    #[default]
    Empty,
    Notice(Notice),
    Hypotheses {
        heading: String,
        records: Vec<RawHypothesis>,
        pagination: Option<Pagination>,
    },
}

/// A subtopic row in the topic tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtopicRow {
    pub subtopic: Subtopic,
    /// Category label from the literature record, when one was found.
    pub label: Option<String>,
}

/// A topic node in the tree. Subtopics and their labels are loaded lazily
/// and kept until the tree is refreshed.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicNode {
    pub topic: Topic,
    pub title: String,
    pub subtitle: Option<String>,
    pub expanded: bool,
    rows: Option<Vec<SubtopicRow>>,
    labels_loaded: bool,
}

impl TopicNode {
    fn new(topic: Topic, subtopics: Option<Vec<Subtopic>>) -> Self {
        let first_title = subtopics
            .as_ref()
            .and_then(|s| s.first())
            .and_then(|s| s.title.clone())
            .filter(|t| !t.is_empty());
        let (title, subtitle) = match first_title {
            Some(t) => (t, Some(topic.display_title())),
            None => (topic.display_title(), None),
        };
        let rows = subtopics.map(|subs| {
            subs.into_iter()
                .map(|subtopic| SubtopicRow {
                    subtopic,
                    label: None,
                })
                .collect()
        });
        Self {
            topic,
            title,
            subtitle,
            expanded: false,
            rows,
            labels_loaded: false,
        }
    }

    pub fn rows(&self) -> &[SubtopicRow] {
        self.rows.as_deref().unwrap_or(&[])
    }

    pub fn is_loaded(&self) -> bool {
        self.rows.is_some() && self.labels_loaded
    }
}

/// Everything the renderer needs for one page.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub mode: SessionMode,
    pub state: NavigationState,
    pub topics: Vec<TopicNode>,
    /// Shown in place of the tree when topics could not be loaded.
    pub tree_notice: Option<Notice>,
    pub categories: Vec<Category>,
    pub subtopic_detail: Option<SubtopicDetail>,
    pub content_title: Option<String>,
    pub content: ContentRegion,
    /// Hypothesis shown in the detail modal.
    pub detail: Option<RawHypothesis>,
    pub quick_stats: Option<ScoreDistribution>,
    generation: u64,
}

impl Session {
    pub fn new(mode: SessionMode, per_page: u32) -> Self {
        let mut state = NavigationState::for_mode(mode);
        state.per_page = per_page.max(1);
        Self {
            mode,
            state,
            ..Default::default()
        }
    }

    fn node_mut(&mut self, topic: i64) -> Option<&mut TopicNode> {
        self.topics.iter_mut().find(|n| n.topic.id == topic)
    }

    /// Invalidate outstanding hypothesis loads and return the new token.
    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    fn clear_hypotheses(&mut self, notice: Option<Notice>) {
        self.next_generation();
        self.content = notice.map(ContentRegion::Notice).unwrap_or_default();
    }

    pub fn records(&self) -> &[RawHypothesis] {
        match &self.content {
            ContentRegion::Hypotheses { records, .. } => records,
            _ => &[],
        }
    }

    fn subtopic_heading(&self) -> Option<String> {
        match (self.state.topic, self.state.subtopic) {
            (Some(t), Some(s)) => Some(format!("Topic {} - Subtopic {}", t, s)),
            _ => None,
        }
    }
}

/// Drives one session against a [`Fetcher`].
pub struct Navigator {
    fetcher: Arc<dyn Fetcher>,
    session: Mutex<Session>,
}

impl Navigator {
    pub fn new(fetcher: Arc<dyn Fetcher>, mode: SessionMode, per_page: u32) -> Self {
        Self {
            fetcher,
            session: Mutex::new(Session::new(mode, per_page)),
        }
    }

    /// Copy of the current session for rendering.
    pub async fn snapshot(&self) -> Session {
        self.session.lock().await.clone()
    }

    pub async fn mode(&self) -> SessionMode {
        self.session.lock().await.mode
    }

    /// Initial loads for the session's mode.
    pub async fn start(&self) {
        let mode = self.mode().await;
        if mode == SessionMode::Topics {
            let _ = self.load_topics().await;
        }
        let _ = self.load_quick_stats().await;
        if mode == SessionMode::Sorting {
            let _ = self.load_all_hypotheses().await;
        }
    }

    /// Fetch topics and, for each, its subtopic list to derive the node title.
    pub async fn load_topics(&self) -> Result<(), ViewError> {
        let topics = match self.fetcher.fetch_topics().await {
            Ok(topics) => topics,
            Err(e) => {
                tracing::error!("Failed to load topics: {}", e);
                let err = ViewError::from(e);
                self.session.lock().await.tree_notice =
                    Some(Notice::from_error("Failed to load topics", &err));
                return Err(err);
            }
        };

        let subtopic_lists = join_all(
            topics
                .iter()
                .map(|topic| self.fetcher.fetch_subtopics(topic.id)),
        )
        .await;

        let nodes: Vec<TopicNode> = topics
            .into_iter()
            .zip(subtopic_lists)
            .map(|(topic, subtopics)| {
                let subtopics = match subtopics {
                    Ok(subs) => Some(subs),
                    Err(e) => {
                        tracing::warn!("Failed to load subtopics for topic {}: {}", topic.id, e);
                        None
                    }
                };
                TopicNode::new(topic, subtopics)
            })
            .collect();

        tracing::info!("Loaded {} topics", nodes.len());
        let mut session = self.session.lock().await;
        let previous = std::mem::take(&mut session.topics);
        session.topics = nodes
            .into_iter()
            .map(|mut node| {
                // Keep what the user opened while the list was loading.
                if let Some(old) = previous.iter().find(|o| o.topic.id == node.topic.id) {
                    node.expanded = old.expanded;
                    if old.labels_loaded {
                        node.rows = old.rows.clone();
                        node.labels_loaded = true;
                    }
                }
                node
            })
            .collect();
        session.tree_notice = None;
        Ok(())
    }

    /// Drop cached tree data and reload topics and stats.
    pub async fn refresh(&self) -> Result<(), ViewError> {
        {
            let mut session = self.session.lock().await;
            session.topics.clear();
            session.tree_notice = None;
            session.quick_stats = None;
        }
        let _ = self.load_quick_stats().await;
        if self.mode().await == SessionMode::Topics {
            self.load_topics().await?;
        }
        Ok(())
    }

    /// Expand a collapsed node (loading it on first expansion) or collapse an
    /// expanded one. Ids that are not in the tree are ignored.
    pub async fn toggle_topic(&self, topic: i64) -> Result<(), ViewError> {
        let collapsed = {
            let mut session = self.session.lock().await;
            let Some(node) = session.node_mut(topic) else {
                tracing::debug!("Topic {} is not in the tree", topic);
                return Ok(());
            };
            if node.expanded {
                node.expanded = false;
                true
            } else {
                false
            }
        };
        if collapsed {
            return Ok(());
        }
        self.expand_topic(topic).await
    }

    async fn expand_topic(&self, topic: i64) -> Result<(), ViewError> {
        let (cached_count, labels_loaded) = {
            let mut session = self.session.lock().await;
            let Some(node) = session.node_mut(topic) else {
                tracing::debug!("Topic {} is not in the tree", topic);
                return Ok(());
            };
            node.expanded = true;
            (node.rows.as_ref().map(|r| r.len()), node.labels_loaded)
        };
        if labels_loaded {
            return Ok(());
        }

        let fetched = match cached_count {
            Some(_) => None,
            None => match self.fetcher.fetch_subtopics(topic).await {
                Ok(subs) => Some(subs),
                Err(e) => {
                    tracing::error!("Failed to load subtopics for topic {}: {}", topic, e);
                    let err = ViewError::from(e);
                    self.session
                        .lock()
                        .await
                        .clear_hypotheses(Some(Notice::from_error("Failed to load subtopics", &err)));
                    return Err(err);
                }
            },
        };

        let count = cached_count
            .or_else(|| fetched.as_ref().map(|s| s.len()))
            .unwrap_or(0);
        let labels = self.fetch_labels(topic, count).await;

        let mut session = self.session.lock().await;
        let Some(node) = session.node_mut(topic) else {
            tracing::debug!("Topic {} left the tree while loading", topic);
            return Ok(());
        };
        if let Some(subtopics) = fetched {
            node.rows = Some(
                subtopics
                    .into_iter()
                    .map(|subtopic| SubtopicRow {
                        subtopic,
                        label: None,
                    })
                    .collect(),
            );
        }
        if let Some(rows) = node.rows.as_mut() {
            for (row, label) in rows.iter_mut().zip(labels) {
                row.label = label;
            }
        }
        node.labels_loaded = true;
        Ok(())
    }

    /// Per-row labels, requested concurrently. A failed row has no label.
    async fn fetch_labels(&self, topic: i64, count: usize) -> Vec<Option<String>> {
        let results = join_all(
            (0..count).map(|index| self.fetcher.fetch_subtopic_label(topic, index)),
        )
        .await;
        results
            .into_iter()
            .enumerate()
            .map(|(index, result)| match result {
                Ok(label) => label,
                Err(e) => {
                    tracing::debug!("No label for topic {} subtopic {}: {}", topic, index, e);
                    None
                }
            })
            .collect()
    }

    pub async fn select_topic(&self, topic: i64) -> Result<(), ViewError> {
        {
            let mut session = self.session.lock().await;
            session.state.select_topic(topic);
            session.categories.clear();
            session.subtopic_detail = None;
            session.content_title = None;
            session.clear_hypotheses(None);
        }
        self.expand_topic(topic).await
    }

    pub async fn select_subtopic(&self, topic: i64, subtopic: usize) -> Result<(), ViewError> {
        self.select_category(topic, subtopic, 0).await
    }

    /// Select a category, loading the subtopic's detail cards and categories.
    /// Shows the strategy prompt; hypotheses are never loaded from here.
    pub async fn select_category(
        &self,
        topic: i64,
        subtopic: usize,
        category: usize,
    ) -> Result<(), ViewError> {
        {
            let mut session = self.session.lock().await;
            session.state.select_category(topic, subtopic, category);
            session.content_title = session.subtopic_heading();
            session.clear_hypotheses(Some(Notice::info(SELECT_STRATEGIES_PROMPT)));
        }
        tracing::debug!(
            "Selected topic {} subtopic {} category {}",
            topic,
            subtopic,
            category
        );

        let (detail, categories) = futures::join!(
            self.fetcher.fetch_subtopic_detail(topic, subtopic),
            self.fetcher.fetch_categories(topic, subtopic)
        );

        let mut session = self.session.lock().await;
        if session.state.topic != Some(topic) || session.state.subtopic != Some(subtopic) {
            tracing::debug!("Selection changed while loading subtopic details");
            return Ok(());
        }
        match categories {
            Ok(categories) => session.categories = categories,
            Err(e) => {
                tracing::warn!(
                    "Failed to load categories for topic {} subtopic {}: {}",
                    topic,
                    subtopic,
                    e
                );
                session.categories.clear();
            }
        }
        match detail {
            Ok(detail) => {
                session.subtopic_detail = Some(detail);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to load subtopic details: {}", e);
                session.subtopic_detail = None;
                let err = ViewError::from(e);
                session.clear_hypotheses(Some(Notice::from_error(
                    "Failed to load subtopic details",
                    &err,
                )));
                Err(err)
            }
        }
    }

    pub async fn toggle_strategy(&self, name: &str) -> Result<(), ViewError> {
        let enabled = self.session.lock().await.state.toggle_strategy(name);
        tracing::debug!("Strategy {} {}", name, if enabled { "on" } else { "off" });
        self.load_hypotheses().await
    }

    pub async fn set_sort(&self, field: &str, order: SortOrder) -> Result<(), ViewError> {
        self.session.lock().await.state.set_sort(field, order);
        self.load_hypotheses().await
    }

    pub async fn set_page(&self, page: u32) -> Result<(), ViewError> {
        self.session.lock().await.state.set_page(page);
        self.load_hypotheses().await
    }

    pub async fn set_per_page(&self, per_page: u32) -> Result<(), ViewError> {
        self.session.lock().await.state.set_per_page(per_page);
        self.load_hypotheses().await
    }

    /// Switch grid/list. The retained list is re-rendered as is.
    pub async fn toggle_view_mode(&self) {
        let mut session = self.session.lock().await;
        session.state.view_mode = session.state.view_mode.toggled();
    }

    /// Load hypotheses for the current filters.
    ///
    /// In topic mode nothing happens until topic, subtopic and category are
    /// all chosen. An empty strategy set clears the list with a warning and
    /// sends no request.
    pub async fn load_hypotheses(&self) -> Result<(), ViewError> {
        let (token, query, heading) = {
            let mut session = self.session.lock().await;
            if session.mode == SessionMode::Topics && !session.state.has_full_selection() {
                return Ok(());
            }
            if session.state.strategies.is_empty() {
                session.clear_hypotheses(Some(Notice::warning(EMPTY_STRATEGIES_WARNING)));
                return Err(ViewError::EmptySelection(EMPTY_STRATEGIES_WARNING.to_string()));
            }
            let heading = match session.mode {
                SessionMode::Topics => session
                    .content_title
                    .clone()
                    .or_else(|| session.subtopic_heading())
                    .unwrap_or_default(),
                SessionMode::Sorting => FILTERED_HEADING.to_string(),
            };
            (
                session.next_generation(),
                HypothesisQuery::from_state(&session.state),
                heading,
            )
        };
        self.run_hypothesis_load(token, query, heading).await
    }

    /// Unfiltered first page, used when the sorting view starts.
    pub async fn load_all_hypotheses(&self) -> Result<(), ViewError> {
        let token = self.session.lock().await.next_generation();
        self.run_hypothesis_load(
            token,
            HypothesisQuery::load_all(),
            ALL_HYPOTHESES_HEADING.to_string(),
        )
        .await
    }

    async fn run_hypothesis_load(
        &self,
        token: u64,
        query: HypothesisQuery,
        heading: String,
    ) -> Result<(), ViewError> {
        tracing::debug!("Loading hypotheses (generation {}): {}", token, query.query_string());
        let result = self.fetcher.fetch_hypotheses(&query).await;

        let mut session = self.session.lock().await;
        if session.generation != token {
            tracing::debug!(
                "Discarding stale hypotheses response (generation {}, current {})",
                token,
                session.generation
            );
            return Ok(());
        }

        match result {
            Ok(page) => {
                tracing::info!("Loaded {} hypotheses", page.hypotheses.len());
                session.content = if page.hypotheses.is_empty() {
                    ContentRegion::Notice(Notice::warning(NO_RESULTS_MESSAGE))
                } else {
                    ContentRegion::Hypotheses {
                        heading,
                        records: page.hypotheses,
                        pagination: page.pagination,
                    }
                };
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to load hypotheses: {}", e);
                let err = ViewError::from(e);
                session.content =
                    ContentRegion::Notice(Notice::from_error("Failed to load hypotheses", &err));
                Err(err)
            }
        }
    }

    /// Open the detail view, using the listed record when there is one.
    /// Failures replace the content region with a notice.
    pub async fn open_detail(&self, id: i64) -> Result<(), ViewError> {
        {
            let mut session = self.session.lock().await;
            if let Some(record) = session.records().iter().find(|r| r.id == id).cloned() {
                session.detail = Some(record);
                return Ok(());
            }
        }

        match self.fetch_detail(id).await {
            Ok(record) => {
                self.session.lock().await.detail = Some(record);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to load hypothesis {}: {}", id, e);
                let err = ViewError::from(e);
                let mut session = self.session.lock().await;
                session.detail = None;
                session.clear_hypotheses(Some(Notice::from_error(
                    "Failed to load hypothesis details",
                    &err,
                )));
                Err(err)
            }
        }
    }

    /// Single-record endpoint first, then the list endpoint filtered by id.
    async fn fetch_detail(&self, id: i64) -> Result<RawHypothesis, FetchError> {
        let err = match self.fetcher.fetch_hypothesis_by_id(id).await {
            Ok(record) => return Ok(record),
            Err(e) => e,
        };
        tracing::debug!("Hypothesis {} lookup failed ({}), trying the list endpoint", id, err);
        let page = self
            .fetcher
            .fetch_hypotheses(&HypothesisQuery::by_id(id))
            .await?;
        page.hypotheses.into_iter().next().ok_or(err)
    }

    pub async fn close_detail(&self) {
        self.session.lock().await.detail = None;
    }

    /// Clear a notice from the content region. Anything else is left alone.
    pub async fn dismiss_notice(&self) {
        let mut session = self.session.lock().await;
        if matches!(session.content, ContentRegion::Notice(_)) {
            session.content = ContentRegion::Empty;
        }
    }

    /// Sidebar statistics. Failure leaves the placeholder in place.
    pub async fn load_quick_stats(&self) -> Result<(), ViewError> {
        match self.fetcher.fetch_score_distribution().await {
            Ok(stats) => {
                self.session.lock().await.quick_stats = Some(stats);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to load quick stats: {}", e);
                Err(e.into())
            }
        }
    }

    /// Full score distribution for the analysis view.
    pub async fn score_analysis(&self) -> Result<ScoreDistribution, ViewError> {
        self.fetcher
            .fetch_score_distribution()
            .await
            .map_err(|e| {
                tracing::error!("Failed to load score analysis: {}", e);
                ViewError::from(e)
            })
    }

    /// Export the current selection. Failures are also shown in the content
    /// region.
    pub async fn export(&self, today: NaiveDate) -> Result<ExportFile, ViewError> {
        let (mode, state) = {
            let session = self.session.lock().await;
            (session.mode, session.state.clone())
        };
        match export::export_hypotheses(self.fetcher.as_ref(), mode, &state, today).await {
            Ok(file) => Ok(file),
            Err(err) => {
                tracing::warn!("Export failed: {}", err);
                self.session
                    .lock()
                    .await
                    .clear_hypotheses(Some(Notice::from_error("Failed to export CSV", &err)));
                Err(err)
            }
        }
    }
}

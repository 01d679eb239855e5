//! Navigation and filter state for one viewing session.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Strategies a hypothesis can be tagged with, in display order.
pub const KNOWN_STRATEGIES: &[&str] = &["evolve", "high_impact", "similar"];

/// Server-side defaults; parameters equal to these are not sent.
pub const DEFAULT_SORT_BY: &str = "overall_winner_score";
pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Page size used when the sorting view loads everything at start.
pub const LOAD_ALL_PER_PAGE: u32 = 100;

/// Columns the API accepts for `sort_by`.
pub const SORT_FIELDS: &[&str] = &[
    "overall_winner_score",
    "novelty_score",
    "significance_score",
    "soundness_score",
    "feasibility_score",
    "created_at",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("invalid sort order: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Grid => ViewMode::List,
            ViewMode::List => ViewMode::Grid,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Grid => "grid",
            ViewMode::List => "list",
        }
    }
}

/// Which client flavour a session behaves as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    /// Topic tree navigation; hypotheses need a topic → subtopic → category
    /// selection and start with no strategies.
    #[default]
    Topics,
    /// Flat sorting and filtering over all hypotheses.
    Sorting,
}

impl FromStr for SessionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "topics" | "topic" => Ok(SessionMode::Topics),
            "sorting" | "sort" => Ok(SessionMode::Sorting),
            other => Err(format!("invalid mode: {}", other)),
        }
    }
}

/// Current selection and filters. Read by the fetcher to build each request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    pub topic: Option<i64>,
    pub subtopic: Option<usize>,
    pub category: Option<usize>,
    pub strategies: BTreeSet<String>,
    pub sort_by: String,
    pub sort_order: SortOrder,
    pub page: u32,
    pub per_page: u32,
    pub view_mode: ViewMode,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            topic: None,
            subtopic: None,
            category: None,
            strategies: BTreeSet::new(),
            sort_by: DEFAULT_SORT_BY.to_string(),
            sort_order: SortOrder::default(),
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
            view_mode: ViewMode::default(),
        }
    }
}

impl NavigationState {
    /// Initial state for a session mode.
    pub fn for_mode(mode: SessionMode) -> Self {
        let mut state = Self::default();
        if mode == SessionMode::Sorting {
            state.strategies = KNOWN_STRATEGIES.iter().map(|s| s.to_string()).collect();
        }
        state
    }

    /// True when topic, subtopic and category are all chosen.
    pub fn has_full_selection(&self) -> bool {
        self.topic.is_some() && self.subtopic.is_some() && self.category.is_some()
    }

    pub fn select_topic(&mut self, topic: i64) {
        self.topic = Some(topic);
        self.subtopic = None;
        self.category = None;
    }

    pub fn select_subtopic(&mut self, topic: i64, subtopic: usize) {
        self.select_category(topic, subtopic, 0);
    }

    pub fn select_category(&mut self, topic: i64, subtopic: usize, category: usize) {
        self.topic = Some(topic);
        self.subtopic = Some(subtopic);
        self.category = Some(category);
    }

    /// Add or remove a strategy. Returns whether it is now enabled.
    pub fn toggle_strategy(&mut self, name: &str) -> bool {
        if self.strategies.remove(name) {
            false
        } else {
            self.strategies.insert(name.to_string());
            true
        }
    }

    pub fn set_sort(&mut self, field: &str, order: SortOrder) {
        self.sort_by = field.to_string();
        self.sort_order = order;
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// Changing the page size returns to the first page.
    pub fn set_per_page(&mut self, per_page: u32) {
        self.per_page = per_page.max(1);
        self.page = DEFAULT_PAGE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_topic_clears_children() {
        let mut state = NavigationState::default();
        state.select_category(1, 2, 3);
        state.select_topic(4);
        assert_eq!(state.topic, Some(4));
        assert_eq!(state.subtopic, None);
        assert_eq!(state.category, None);
        assert!(!state.has_full_selection());
    }

    #[test]
    fn test_select_subtopic_resets_category() {
        let mut state = NavigationState::default();
        state.select_category(1, 2, 3);
        state.select_subtopic(1, 5);
        assert_eq!(state.category, Some(0));
        assert!(state.has_full_selection());
    }

    #[test]
    fn test_toggle_strategy() {
        let mut state = NavigationState::default();
        assert!(state.toggle_strategy("evolve"));
        assert!(state.strategies.contains("evolve"));
        assert!(!state.toggle_strategy("evolve"));
        assert!(state.strategies.is_empty());
    }

    #[test]
    fn test_per_page_resets_page() {
        let mut state = NavigationState::default();
        state.set_page(4);
        state.set_per_page(50);
        assert_eq!(state.page, 1);
        assert_eq!(state.per_page, 50);
    }

    #[test]
    fn test_sorting_mode_starts_with_all_strategies() {
        let state = NavigationState::for_mode(SessionMode::Sorting);
        assert_eq!(state.strategies.len(), KNOWN_STRATEGIES.len());
        assert!(NavigationState::for_mode(SessionMode::Topics)
            .strategies
            .is_empty());
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!("ASC".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert!("sideways".parse::<SortOrder>().is_err());
    }
}

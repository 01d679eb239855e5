//! Data records and session state.

pub mod analytics;
pub mod hypothesis;
pub mod navigation;
pub mod topic;

pub use analytics::{RangeCount, ScoreDistribution, StrategyComparison};
pub use hypothesis::{HypothesisPage, Pagination, RawHypothesis};
pub use navigation::{NavigationState, SessionMode, SortOrder, ViewMode, KNOWN_STRATEGIES};
pub use topic::{Category, LiteratureRecord, SearchQueries, Subtopic, SubtopicDetail, Topic};

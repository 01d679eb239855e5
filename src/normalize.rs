//! Hypothesis normalizer.
//!
//! A raw record can carry its title and scores in several places. The
//! resolution order is expressed as ordered lists of extractors so the
//! precedence can be read top to bottom:
//!
//! 1. `hypothesis_content` (JSON string or object) is parsed; failure means
//!    "no content".
//! 2. Title: `content.title`, `content.hypothesis_title`, `content.hypothesis`,
//!    then `Hypothesis {n}`.
//! 3. Scores: `content.scores`, then `raw.scores`, then the flat
//!    `*_score` fields. A later source is consulted only when every metric
//!    from the previous one is unset.
//!
//! Normalization is pure: no I/O, same input gives same output.

use std::fmt;

use serde_json::{json, Map, Value};

use crate::models::RawHypothesis;

/// Marker displayed for a metric with no usable value.
pub const UNSET_MARKER: &str = "N/A";

/// One metric value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Score {
    Value(f64),
    #[default]
    Unset,
}

impl Score {
    /// Coerce a JSON value: finite numbers and numeric strings are accepted.
    pub fn from_json(value: &Value) -> Self {
        let number = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match number {
            Some(n) if n.is_finite() => Score::Value(n),
            _ => Score::Unset,
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Score::Value(_))
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Value(v) => write!(f, "{:.2}", v),
            Score::Unset => f.write_str(UNSET_MARKER),
        }
    }
}

/// The five named metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Novelty,
    Significance,
    Soundness,
    Feasibility,
    Overall,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Novelty,
        Metric::Significance,
        Metric::Soundness,
        Metric::Feasibility,
        Metric::Overall,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Novelty => "Novelty",
            Metric::Significance => "Significance",
            Metric::Soundness => "Soundness",
            Metric::Feasibility => "Feasibility",
            Metric::Overall => "Overall",
        }
    }

    /// Accepted spellings inside a `scores` object, most specific first.
    pub fn score_keys(&self) -> &'static [&'static str] {
        match self {
            Metric::Novelty => &["novelty_score", "novelty"],
            Metric::Significance => &["significance_score", "significance"],
            Metric::Soundness => &["soundness_score", "soundness"],
            Metric::Feasibility => &["feasibility_score", "feasibility"],
            Metric::Overall => &["overall_score", "overall", "overall_winner"],
        }
    }

    fn flat_field<'a>(&self, raw: &'a RawHypothesis) -> Option<&'a Value> {
        match self {
            Metric::Novelty => raw.novelty_score.as_ref(),
            Metric::Significance => raw.significance_score.as_ref(),
            Metric::Soundness => raw.soundness_score.as_ref(),
            Metric::Feasibility => raw.feasibility_score.as_ref(),
            Metric::Overall => raw.overall_winner_score.as_ref(),
        }
    }
}

/// Resolved score set.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreSet {
    pub novelty: Score,
    pub significance: Score,
    pub soundness: Score,
    pub feasibility: Score,
    pub overall: Score,
}

impl ScoreSet {
    pub fn get(&self, metric: Metric) -> Score {
        match metric {
            Metric::Novelty => self.novelty,
            Metric::Significance => self.significance,
            Metric::Soundness => self.soundness,
            Metric::Feasibility => self.feasibility,
            Metric::Overall => self.overall,
        }
    }

    fn set(&mut self, metric: Metric, score: Score) {
        match metric {
            Metric::Novelty => self.novelty = score,
            Metric::Significance => self.significance = score,
            Metric::Soundness => self.soundness = score,
            Metric::Feasibility => self.feasibility = score,
            Metric::Overall => self.overall = score,
        }
    }

    pub fn is_empty(&self) -> bool {
        Metric::ALL.iter().all(|m| !self.get(*m).is_set())
    }

    /// (label, score) pairs in display order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, Score)> + '_ {
        Metric::ALL.iter().map(move |m| (m.label(), self.get(*m)))
    }

    /// Read a `scores`-style object using each metric's key spellings.
    pub fn from_scores_object(scores: &Map<String, Value>) -> Self {
        let mut set = ScoreSet::default();
        for metric in Metric::ALL {
            let score = metric
                .score_keys()
                .iter()
                .filter_map(|key| scores.get(*key))
                .map(Score::from_json)
                .find(Score::is_set)
                .unwrap_or_default();
            set.set(metric, score);
        }
        set
    }
}

/// Canonical view of a hypothesis.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedHypothesis {
    pub title: String,
    pub scores: ScoreSet,
}

impl NormalizedHypothesis {
    /// Re-serialize as a `hypothesis_content` object carrying the resolved
    /// title and scores.
    pub fn to_content(&self) -> Value {
        let mut scores = Map::new();
        for metric in Metric::ALL {
            if let Score::Value(v) = self.scores.get(metric) {
                scores.insert(metric.score_keys()[0].to_string(), json!(v));
            }
        }
        json!({ "title": self.title, "scores": scores })
    }
}

type ScoreExtractor = fn(&RawHypothesis, Option<&Map<String, Value>>) -> ScoreSet;

const TITLE_KEYS: &[&str] = &["title", "hypothesis_title", "hypothesis"];

const SCORE_EXTRACTORS: &[(&str, ScoreExtractor)] = &[
    ("content.scores", scores_from_content),
    ("raw.scores", scores_from_raw_object),
    ("flat fields", scores_from_flat_fields),
];

fn scores_from_content(_: &RawHypothesis, content: Option<&Map<String, Value>>) -> ScoreSet {
    match content.and_then(|c| c.get("scores")) {
        Some(Value::Object(scores)) => ScoreSet::from_scores_object(scores),
        _ => ScoreSet::default(),
    }
}

fn scores_from_raw_object(raw: &RawHypothesis, _: Option<&Map<String, Value>>) -> ScoreSet {
    match &raw.scores {
        Some(Value::Object(scores)) => ScoreSet::from_scores_object(scores),
        _ => ScoreSet::default(),
    }
}

fn scores_from_flat_fields(raw: &RawHypothesis, _: Option<&Map<String, Value>>) -> ScoreSet {
    let mut set = ScoreSet::default();
    for metric in Metric::ALL {
        if let Some(value) = metric.flat_field(raw) {
            set.set(metric, Score::from_json(value));
        }
    }
    set
}

fn resolve_title(content: Option<&Map<String, Value>>, position: usize) -> String {
    content
        .and_then(|c| {
            TITLE_KEYS.iter().find_map(|key| match c.get(*key) {
                Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
                _ => None,
            })
        })
        .unwrap_or_else(|| format!("Hypothesis {}", position))
}

/// Resolve the title and scores of `raw`. `position` is the 1-based index of
/// the record in the batch being rendered and only feeds the fallback title.
pub fn normalize(raw: &RawHypothesis, position: usize) -> NormalizedHypothesis {
    let content = raw.content();
    let content = content.as_ref();

    let scores = SCORE_EXTRACTORS
        .iter()
        .map(|(_, extract)| extract(raw, content))
        .find(|set| !set.is_empty())
        .unwrap_or_default();

    NormalizedHypothesis {
        title: resolve_title(content, position),
        scores,
    }
}

/// Normalize a batch, numbering fallback titles from 1.
pub fn normalize_all(records: &[RawHypothesis]) -> Vec<NormalizedHypothesis> {
    records
        .iter()
        .enumerate()
        .map(|(i, raw)| normalize(raw, i + 1))
        .collect()
}

//! Score distribution analytics.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One bucket in the `distribution` list form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeCount {
    pub range: String,
    #[serde(default)]
    pub count: i64,
}

/// Per-strategy average scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyComparison {
    pub strategy: String,
    #[serde(default)]
    pub scores: Map<String, Value>,
}

/// Response of `/api/analytics/score_distribution`. Every block is optional;
/// different backend versions populate different ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreDistribution {
    #[serde(default)]
    pub score_ranges: Option<Map<String, Value>>,
    #[serde(default)]
    pub score_distribution: Option<Map<String, Value>>,
    #[serde(default)]
    pub distribution: Option<Vec<RangeCount>>,
    #[serde(default)]
    pub strategy_comparison: Option<Vec<StrategyComparison>>,
}

impl ScoreDistribution {
    /// Range label → count pairs, preferring `score_ranges`, then the
    /// `distribution` list, then `score_distribution`.
    pub fn ranges(&self) -> Vec<(String, String)> {
        fn from_map(map: &Map<String, Value>) -> Vec<(String, String)> {
            map.iter()
                .map(|(k, v)| {
                    let count = match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    (k.clone(), count)
                })
                .collect()
        }

        if let Some(map) = self.score_ranges.as_ref().filter(|m| !m.is_empty()) {
            return from_map(map);
        }
        if let Some(list) = self.distribution.as_ref().filter(|l| !l.is_empty()) {
            return list
                .iter()
                .map(|r| (r.range.clone(), r.count.to_string()))
                .collect();
        }
        self.score_distribution
            .as_ref()
            .map(from_map)
            .unwrap_or_default()
    }
}

/// CSS colour class for a score range label.
pub fn score_range_color(range: &str) -> &'static str {
    match range {
        "0-2" => "bg-danger",
        "2-4" => "bg-warning",
        "4-6" => "bg-info",
        "6-8" => "bg-primary",
        "8-10" => "bg-success",
        _ => "bg-secondary",
    }
}

/// Icon name for a score range label.
pub fn score_range_icon(range: &str) -> &'static str {
    match range {
        "0-2" => "bi-exclamation-triangle",
        "2-4" => "bi-exclamation-circle",
        "4-6" => "bi-info-circle",
        "6-8" => "bi-check-circle",
        "8-10" => "bi-star",
        _ => "bi-question-circle",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ranges_prefers_score_ranges() {
        let dist: ScoreDistribution = serde_json::from_value(json!({
            "score_ranges": {"8-10": 3, "6-8": 5},
            "distribution": [{"range": "x", "count": 1}]
        }))
        .unwrap();
        assert_eq!(
            dist.ranges(),
            vec![
                ("8-10".to_string(), "3".to_string()),
                ("6-8".to_string(), "5".to_string())
            ]
        );
    }

    #[test]
    fn test_ranges_from_distribution_list() {
        let dist: ScoreDistribution = serde_json::from_value(json!({
            "distribution": [{"range": "4-6", "count": 7}]
        }))
        .unwrap();
        assert_eq!(dist.ranges(), vec![("4-6".to_string(), "7".to_string())]);
    }

    #[test]
    fn test_range_tables() {
        assert_eq!(score_range_color("8-10"), "bg-success");
        assert_eq!(score_range_icon("unknown"), "bi-question-circle");
    }
}

//! Raw hypothesis records as the API returns them.
//!
//! Fields are deliberately loose: scores arrive as numbers, numeric strings or
//! null, and the two nested blobs may be JSON strings or inline objects.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A hypothesis record exactly as decoded from the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawHypothesis {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub sub_topic: Option<Value>,
    #[serde(default)]
    pub strategy: Option<String>,
    #[serde(default)]
    pub hypothesis_content: Option<Value>,
    #[serde(default)]
    pub feedback_results: Option<Value>,
    #[serde(default)]
    pub scores: Option<Value>,
    #[serde(default)]
    pub novelty_score: Option<Value>,
    #[serde(default)]
    pub significance_score: Option<Value>,
    #[serde(default)]
    pub soundness_score: Option<Value>,
    #[serde(default)]
    pub feasibility_score: Option<Value>,
    #[serde(default)]
    pub overall_winner_score: Option<Value>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Parse a blob that may be a JSON string or an inline value.
///
/// Returns `None` for null, empty strings and strings that are not JSON.
pub fn parse_blob(value: Option<&Value>) -> Option<Value> {
    match value? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => serde_json::from_str(s).ok(),
        other => Some(other.clone()),
    }
}

impl RawHypothesis {
    /// Parsed `hypothesis_content`, if it decodes to a JSON object.
    pub fn content(&self) -> Option<Map<String, Value>> {
        match parse_blob(self.hypothesis_content.as_ref())? {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Parsed `feedback_results` with one level of self-nesting removed.
    pub fn feedback(&self) -> Option<Map<String, Value>> {
        let mut map = match parse_blob(self.feedback_results.as_ref())? {
            Value::Object(map) => map,
            _ => return None,
        };
        if let Some(Value::Object(inner)) = map.get("feedback_results") {
            map = inner.clone();
        }
        Some(map)
    }

    /// Strategy label with the `Unknown` fallback used on cards.
    pub fn strategy_label(&self) -> &str {
        match self.strategy.as_deref() {
            Some(s) if !s.is_empty() => s,
            _ => "Unknown",
        }
    }

    /// Subtopic label with the `Unknown` fallback used on cards.
    pub fn subtopic_label(&self) -> String {
        match &self.sub_topic {
            None | Some(Value::Null) => "Unknown".to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

/// Pagination block returned alongside a hypothesis list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub pages: u32,
}

/// One page of hypotheses. The API may return a bare array instead of the
/// wrapped form, in which case there is no pagination.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HypothesisPage {
    pub hypotheses: Vec<RawHypothesis>,
    pub pagination: Option<Pagination>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_from_string_and_object() {
        let from_str = RawHypothesis {
            hypothesis_content: Some(json!(r#"{"title": "A"}"#)),
            ..Default::default()
        };
        assert_eq!(from_str.content().unwrap()["title"], "A");

        let from_obj = RawHypothesis {
            hypothesis_content: Some(json!({"title": "B"})),
            ..Default::default()
        };
        assert_eq!(from_obj.content().unwrap()["title"], "B");
    }

    #[test]
    fn test_content_invalid_json() {
        let raw = RawHypothesis {
            hypothesis_content: Some(json!("{not json")),
            ..Default::default()
        };
        assert!(raw.content().is_none());
    }

    #[test]
    fn test_feedback_unwraps_nested() {
        let raw = RawHypothesis {
            feedback_results: Some(json!(
                r#"{"feedback_results": {"internal_review": "fine"}}"#
            )),
            ..Default::default()
        };
        assert_eq!(raw.feedback().unwrap()["internal_review"], "fine");
    }

    #[test]
    fn test_labels_fallback() {
        let raw = RawHypothesis::default();
        assert_eq!(raw.strategy_label(), "Unknown");
        assert_eq!(raw.subtopic_label(), "Unknown");

        let raw = RawHypothesis {
            sub_topic: Some(json!(0)),
            ..Default::default()
        };
        assert_eq!(raw.subtopic_label(), "0");
    }

    #[test]
    fn test_decode_ignores_unused_fields() {
        let raw: RawHypothesis = serde_json::from_value(json!({
            "id": 3,
            "topic": 2,
            "hypothesis_id": 3,
            "subtopic_title": "Gene drives",
            "strategy": "similar"
        }))
        .unwrap();
        assert_eq!(raw.id, 3);
        assert_eq!(raw.strategy_label(), "similar");
    }
}

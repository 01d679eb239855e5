//! Topic, subtopic and category records returned by the API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A research topic. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl Topic {
    /// Title to show, falling back to `Topic {id}`.
    pub fn display_title(&self) -> String {
        match self.title.as_deref() {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => format!("Topic {}", self.id),
        }
    }
}

/// A subtopic of a topic. `index` is positional within the topic's list,
/// not a stable identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtopic {
    #[serde(skip)]
    pub index: usize,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub search_queries: Option<Value>,
}

impl Subtopic {
    pub fn display_title(&self) -> String {
        match self.title.as_deref() {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => format!("Subtopic {}", self.index),
        }
    }
}

/// A literature category under a (topic, subtopic) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(skip)]
    pub index: usize,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "hypothesis_count")]
    pub count: i64,
}

impl Category {
    pub fn display_name(&self) -> String {
        match self.name.as_deref() {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => format!("Category {}", self.index),
        }
    }
}

/// Assign positional indices after decoding a list.
pub fn index_subtopics(mut subtopics: Vec<Subtopic>) -> Vec<Subtopic> {
    for (i, s) in subtopics.iter_mut().enumerate() {
        s.index = i;
    }
    subtopics
}

pub fn index_categories(mut categories: Vec<Category>) -> Vec<Category> {
    for (i, c) in categories.iter_mut().enumerate() {
        c.index = i;
    }
    categories
}

/// Literature-agent record for one subtopic: description, search queries and
/// the topical category label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiteratureRecord {
    #[serde(default)]
    pub topic_title: Option<String>,
    #[serde(default)]
    pub topic_category: Option<String>,
    #[serde(default)]
    pub sub_topic: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub search_queries: Option<Value>,
    #[serde(default)]
    pub model_source: Option<String>,
}

/// Detail panel data for a selected subtopic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubtopicDetail {
    pub literature: LiteratureRecord,
    /// Raw `current_analysis` blob (usually a JSON string).
    pub current_analysis: Option<String>,
}

/// Search queries normalized for display.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchQueries {
    List(Vec<String>),
    Text(String),
}

fn strip_brackets(s: &str) -> String {
    s.chars().filter(|c| !matches!(c, '[' | ']' | '"')).collect()
}

impl LiteratureRecord {
    /// Interpret `search_queries`: a JSON array (or a string holding one)
    /// becomes a list; any other string is shown as cleaned text.
    pub fn search_queries(&self) -> Option<SearchQueries> {
        let value = self.search_queries.as_ref()?;
        let parsed = match value {
            Value::String(s) if s.is_empty() => return None,
            Value::String(s) => match serde_json::from_str::<Value>(s) {
                Ok(Value::Array(items)) => Value::Array(items),
                Ok(Value::String(inner)) => Value::String(inner),
                _ => Value::Array(vec![Value::String(s.clone())]),
            },
            other => other.clone(),
        };

        match parsed {
            Value::Array(items) => Some(SearchQueries::List(
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => strip_brackets(s),
                        other => strip_brackets(&other.to_string()),
                    })
                    .collect(),
            )),
            Value::Null => None,
            Value::String(s) => Some(SearchQueries::Text(strip_brackets(&s))),
            other => Some(SearchQueries::Text(strip_brackets(&other.to_string()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_accepts_hypothesis_count() {
        let cats: Vec<Category> =
            serde_json::from_value(json!([{"name": "a", "hypothesis_count": 4}, {"count": 2}]))
                .unwrap();
        let cats = index_categories(cats);
        assert_eq!(cats[0].count, 4);
        assert_eq!(cats[1].display_name(), "Category 1");
    }

    #[test]
    fn test_subtopic_indices_are_positional() {
        let subs: Vec<Subtopic> =
            serde_json::from_value(json!([{"title": "x"}, {"title": ""}])).unwrap();
        let subs = index_subtopics(subs);
        assert_eq!(subs[1].index, 1);
        assert_eq!(subs[1].display_title(), "Subtopic 1");
    }

    #[test]
    fn test_search_queries_json_string() {
        let rec = LiteratureRecord {
            search_queries: Some(json!(r#"["gene \"editing\"", "crispr"]"#)),
            ..Default::default()
        };
        assert_eq!(
            rec.search_queries(),
            Some(SearchQueries::List(vec![
                "gene editing".to_string(),
                "crispr".to_string()
            ]))
        );
    }

    #[test]
    fn test_search_queries_plain_string() {
        let rec = LiteratureRecord {
            search_queries: Some(json!("protein folding")),
            ..Default::default()
        };
        assert_eq!(
            rec.search_queries(),
            Some(SearchQueries::List(vec!["protein folding".to_string()]))
        );
    }
}

//! Detail modal for a single hypothesis.
//!
//! Content fields are rendered from `hypothesis_content` in key order, the
//! score panel comes from the normalizer, and `internal_review` is rendered
//! according to its shape.

use serde_json::{Map, Value};

use super::labels::{content_type, format_key_name};
use super::templates::html_escape;
use crate::models::RawHypothesis;
use crate::normalize::normalize;

/// Values longer than this are collapsed behind a "Show More" toggle.
pub const LONG_CONTENT_CHARS: usize = 500;
/// Values longer than this (and not long) get the medium treatment.
pub const MEDIUM_CONTENT_CHARS: usize = 200;

pub const NO_CONTENT: &str = "No hypothesis content available";
pub const NO_FEEDBACK: &str = "No feedback_results data available";
pub const NO_INTERNAL_REVIEW: &str = "No internal_review field found in feedback_results";

/// Size class of a rendered value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSize {
    Short,
    Medium,
    Long,
}

impl ContentSize {
    pub fn classify(text: &str) -> Self {
        let len = text.chars().count();
        if len > LONG_CONTENT_CHARS {
            ContentSize::Long
        } else if len > MEDIUM_CONTENT_CHARS {
            ContentSize::Medium
        } else {
            ContentSize::Short
        }
    }

    fn css_class(&self) -> &'static str {
        match self {
            ContentSize::Short => "content-short",
            ContentSize::Medium => "content-medium",
            ContentSize::Long => "content-long",
        }
    }
}

/// Escape text, turn blank lines into paragraph breaks and single newlines
/// into `<br>`.
pub fn format_with_line_breaks(text: &str) -> String {
    let escaped = html_escape(text).replace("\r\n", "\n");
    format!(
        "<p>{}</p>",
        escaped.replace("\n\n", "</p><p>").replace('\n', "<br>")
    )
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Values the content section leaves out.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Renders one modal; `toggles` numbers the "Show More" controls.
struct ContentRenderer {
    toggles: usize,
}

impl ContentRenderer {
    fn render_map(&mut self, map: &Map<String, Value>) -> String {
        let mut html = String::new();
        for (key, value) in map {
            if is_blank(value) {
                continue;
            }
            html.push_str(&self.render_field(key, value));
        }
        html
    }

    fn render_field(&mut self, key: &str, value: &Value) -> String {
        let label = html_escape(&format_key_name(key));
        match value {
            Value::Array(items) => {
                let items: String = items
                    .iter()
                    .filter(|item| !is_blank(item))
                    .map(|item| format!("<li>{}</li>", html_escape(&value_text(item))))
                    .collect();
                format!(
                    r#"<div class="content-item" data-content-type="{}">
                    <h6 class="item-label">{}:</h6>
                    <ul class="item-list">{}</ul>
                </div>"#,
                    content_type(key),
                    label,
                    items
                )
            }
            Value::Object(nested) => format!(
                r#"<h6 class="item-label">{}:</h6>
                <div class="nested-content">{}</div>"#,
                label,
                self.render_map(nested)
            ),
            other => {
                let text = value_text(other);
                let size = ContentSize::classify(&text);
                let body = format_with_line_breaks(&text);
                let length = text.chars().count();
                if size == ContentSize::Long {
                    self.toggles += 1;
                    let id = format!("more-{}", self.toggles);
                    format!(
                        r#"<div class="content-item {}" data-content-type="{}" data-content-length="{}">
                    <h6 class="item-label">{}:</h6>
                    <input type="checkbox" class="toggle-content" id="{}">
                    <div class="item-content content-expandable">{}</div>
                    <label for="{}" class="btn-small show-more">Show More</label>
                </div>"#,
                        size.css_class(),
                        content_type(key),
                        length,
                        label,
                        id,
                        body,
                        id
                    )
                } else {
                    format!(
                        r#"<div class="content-item {}" data-content-type="{}" data-content-length="{}">
                    <h6 class="item-label">{}:</h6>
                    <div class="item-content">{}</div>
                </div>"#,
                        size.css_class(),
                        content_type(key),
                        length,
                        label,
                        body
                    )
                }
            }
        }
    }
}

fn section(class: &str, title: &str, body: &str) -> String {
    format!(
        r#"<div class="{}">
            <h6 class="section-title">{}</h6>
            {}
        </div>"#,
        class, title, body
    )
}

/// "Hypothesis Content" section.
pub fn render_content_section(raw: &RawHypothesis) -> String {
    let blob = match &raw.hypothesis_content {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(v) => Some(v),
    };
    let Some(blob) = blob else {
        return section(
            "content-section",
            "Hypothesis Content",
            &format!(
                r#"<div class="content-item"><div class="item-content text-muted">{}</div></div>"#,
                NO_CONTENT
            ),
        );
    };

    match raw.content() {
        Some(map) => {
            let mut renderer = ContentRenderer { toggles: 0 };
            section("content-section", "Hypothesis Content", &renderer.render_map(&map))
        }
        None => {
            tracing::debug!("Hypothesis {} content is not a JSON object", raw.id);
            section(
                "content-section",
                "Hypothesis Content",
                &format!(
                    r#"<div class="content-item"><div class="item-content">{}</div></div>"#,
                    html_escape(&value_text(blob))
                ),
            )
        }
    }
}

/// Normalized score panel.
pub fn render_score_panel(raw: &RawHypothesis, position: usize) -> String {
    let normalized = normalize(raw, position);
    let rows: String = normalized
        .scores
        .entries()
        .map(|(label, score)| {
            format!(
                r#"<div class="score-detail"><span class="score-label">{}</span><span class="score-value">{}</span></div>"#,
                label, score
            )
        })
        .collect();
    section("scores-section", "Score Details", &rows)
}

fn feedback_item(label: Option<&str>, body: &str) -> String {
    let label = label
        .map(|l| format!(r#"<h6 class="item-label">{}:</h6>"#, html_escape(l)))
        .unwrap_or_default();
    format!(
        r#"<div class="feedback-item">{}<div class="feedback-content">{}</div></div>"#,
        label, body
    )
}

/// One review or critique object: code, content, then remaining fields.
fn render_feedback_object(item: &Map<String, Value>) -> String {
    let mut html = String::new();
    if let Some(code) = item.get("feedback_code").filter(|v| !is_blank(v)) {
        html.push_str(&format!(
            r#"<div class="feedback-code"><strong>Code:</strong> {}</div>"#,
            html_escape(&value_text(code))
        ));
    }
    if let Some(content) = item.get("feedback_content").filter(|v| !is_blank(v)) {
        html.push_str(&format!(
            r#"<div class="feedback-text">{}</div>"#,
            format_with_line_breaks(&value_text(content))
        ));
    }
    for (key, value) in item {
        if key == "feedback_code" || key == "feedback_content" || is_blank(value) {
            continue;
        }
        html.push_str(&format!(
            r#"<div class="feedback-field"><strong>{}:</strong> {}</div>"#,
            html_escape(&format_key_name(key)),
            format_with_line_breaks(&value_text(value))
        ));
    }
    html
}

fn render_numbered(prefix: &str, items: &[Value]) -> String {
    items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| {
            let body = match item {
                Value::Object(map) => render_feedback_object(map),
                Value::String(s) if !s.trim().is_empty() => format_with_line_breaks(s),
                _ => return None,
            };
            Some(feedback_item(Some(&format!("{} {}", prefix, i + 1)), &body))
        })
        .collect()
}

/// Render `internal_review` by shape.
pub fn render_internal_review(review: &Value) -> String {
    match review {
        Value::Array(items) => render_numbered("Review", items),
        Value::Object(map) => match map.get("critiques") {
            Some(Value::Array(critiques)) => render_numbered("Critique", critiques),
            _ => map
                .iter()
                .filter(|(_, v)| !is_blank(v))
                .map(|(key, value)| {
                    let text = match value {
                        Value::Array(items) => items
                            .iter()
                            .map(value_text)
                            .collect::<Vec<_>>()
                            .join("\n"),
                        other => value_text(other),
                    };
                    feedback_item(Some(&format_key_name(key)), &format_with_line_breaks(&text))
                })
                .collect(),
        },
        other => feedback_item(None, &format_with_line_breaks(&value_text(other))),
    }
}

/// "Internal Review" section.
pub fn render_feedback_section(raw: &RawHypothesis) -> String {
    let body = match raw.feedback().filter(|f| !f.is_empty()) {
        None => feedback_item(None, NO_FEEDBACK),
        Some(feedback) => match feedback.get("internal_review").filter(|v| !is_blank(v)) {
            None => feedback_item(None, NO_INTERNAL_REVIEW),
            Some(review) => render_internal_review(review),
        },
    };
    section("feedback-section", "Internal Review", &body)
}

/// Full modal overlay. `position` is the record's 1-based place in the list
/// and only feeds the fallback title.
pub fn render_detail_modal(raw: &RawHypothesis, position: usize) -> String {
    let normalized = normalize(raw, position);
    let created = raw
        .created_at
        .as_deref()
        .map(|c| format!(r#"<span class="text-muted">{}</span>"#, html_escape(c)))
        .unwrap_or_default();

    format!(
        r#"<div class="modal-backdrop">
    <div class="modal" role="dialog">
        <div class="modal-header">
            <h5 class="modal-title">{title}</h5>
            <a href="/detail/close" class="modal-close" title="Close">&times;</a>
        </div>
        <div class="modal-meta">
            <span class="badge bg-primary">{strategy}</span>
            <span class="badge bg-secondary">Subtopic {subtopic}</span>
            {created}
        </div>
        <div class="modal-body">
            {scores}
            {content}
            {feedback}
        </div>
    </div>
</div>"#,
        title = html_escape(&normalized.title),
        strategy = html_escape(raw.strategy_label()),
        subtopic = html_escape(&raw.subtopic_label()),
        created = created,
        scores = render_score_panel(raw, position),
        content = render_content_section(raw),
        feedback = render_feedback_section(raw),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn with_feedback(feedback: Value) -> RawHypothesis {
        RawHypothesis {
            feedback_results: Some(feedback),
            ..Default::default()
        }
    }

    #[test]
    fn test_classify_thresholds() {
        assert_eq!(ContentSize::classify(&"a".repeat(200)), ContentSize::Short);
        assert_eq!(ContentSize::classify(&"a".repeat(201)), ContentSize::Medium);
        assert_eq!(ContentSize::classify(&"a".repeat(500)), ContentSize::Medium);
        assert_eq!(ContentSize::classify(&"a".repeat(501)), ContentSize::Long);
    }

    #[test]
    fn test_line_breaks() {
        assert_eq!(
            format_with_line_breaks("a\nb\n\nc"),
            "<p>a<br>b</p><p>c</p>"
        );
        assert_eq!(format_with_line_breaks("<x>"), "<p>&lt;x&gt;</p>");
    }

    #[test]
    fn test_content_fields_in_order_with_labels() {
        let raw = RawHypothesis {
            hypothesis_content: Some(json!({
                "problem_statement": "P",
                "keywords_query": ["a", "b"],
                "empty": "",
                "expected_gain": 3
            })),
            ..Default::default()
        };
        let html = render_content_section(&raw);
        let problem = html.find("Problem Statement:").unwrap();
        let keywords = html.find("Keywords Query:").unwrap();
        assert!(problem < keywords);
        assert!(html.contains("<li>a</li><li>b</li>"));
        assert!(html.contains("Expected Gain:"));
        assert!(!html.contains("Empty:"));
        assert!(html.contains(r#"data-content-type="problem""#));
    }

    #[test]
    fn test_long_content_collapsed() {
        let raw = RawHypothesis {
            hypothesis_content: Some(json!({ "motivation": "m".repeat(600) })),
            ..Default::default()
        };
        let html = render_content_section(&raw);
        assert!(html.contains("content-long"));
        assert!(html.contains("Show More"));
    }

    #[test]
    fn test_missing_and_unparseable_content() {
        assert!(render_content_section(&RawHypothesis::default()).contains(NO_CONTENT));

        let raw = RawHypothesis {
            hypothesis_content: Some(json!("plain <text>")),
            ..Default::default()
        };
        let html = render_content_section(&raw);
        assert!(html.contains("plain &lt;text&gt;"));
        assert!(!html.contains(NO_CONTENT));
    }

    #[test]
    fn test_nested_object_recurses() {
        let raw = RawHypothesis {
            hypothesis_content: Some(json!({ "novelty": { "direct_cooccurrence_count": 4 } })),
            ..Default::default()
        };
        let html = render_content_section(&raw);
        assert!(html.contains("nested-content"));
        assert!(html.contains("Direct Co-occurrence Count:"));
    }

    #[test]
    fn test_review_array() {
        let raw = with_feedback(json!({
            "internal_review": [
                {"feedback_code": "C1", "feedback_content": "good"},
                {"feedback_code": "C2", "severity": "low"}
            ]
        }));
        let html = render_feedback_section(&raw);
        assert!(html.contains("Review 1:"));
        assert!(html.contains("Review 2:"));
        assert!(html.contains("<strong>Code:</strong> C1"));
        assert!(html.contains("Severity:"));
    }

    #[test]
    fn test_review_critiques_nested_in_string() {
        let raw = with_feedback(json!(
            r#"{"feedback_results": {"internal_review": {"critiques": [{"feedback_content": "x"}]}}}"#
        ));
        let html = render_feedback_section(&raw);
        assert!(html.contains("Critique 1:"));
    }

    #[test]
    fn test_review_object_and_string() {
        let obj = with_feedback(json!({"internal_review": {"summary": "fine", "score": 7}}));
        let html = render_feedback_section(&obj);
        assert!(html.contains("Summary:"));
        assert!(html.contains("Score:"));

        let text = with_feedback(json!({"internal_review": "Looks\nreasonable"}));
        assert!(render_feedback_section(&text).contains("Looks<br>reasonable"));
    }

    #[test]
    fn test_feedback_placeholders() {
        assert!(render_feedback_section(&RawHypothesis::default()).contains(NO_FEEDBACK));
        assert!(render_feedback_section(&with_feedback(json!("{bad"))).contains(NO_FEEDBACK));
        assert!(render_feedback_section(&with_feedback(json!({"other": 1})))
            .contains(NO_INTERNAL_REVIEW));
    }

    #[test]
    fn test_modal_has_scores_and_close() {
        let raw = RawHypothesis {
            id: 3,
            strategy: Some("evolve".to_string()),
            overall_winner_score: Some(json!(7.5)),
            ..Default::default()
        };
        let html = render_detail_modal(&raw, 2);
        assert!(html.contains("Hypothesis 2"));
        assert!(html.contains("7.50"));
        assert!(html.contains("/detail/close"));
        assert!(html.contains("evolve"));
    }
}

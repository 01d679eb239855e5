//! Static label and content-type tables for hypothesis fields.

/// Human label for a content or feedback key. Unknown keys are Title Cased.
pub fn format_key_name(key: &str) -> String {
    let known = match key {
        "title" => "Title",
        "problem_statement" => "Problem Statement",
        "motivation" => "Motivation",
        "proposed_method" => "Proposed Method",
        "experiment_plan" => "Experiment Plan",
        "feedback_results" => "Feedback Results",
        "keywords_query" => "Keywords Query",
        "direct_cooccurrence_count" => "Direct Co-occurrence Count",
        "min_pmi_score_value" => "Min PMI Score",
        "avg_pmi_score_value" => "Average PMI Score",
        "novelty" => "Novelty",
        "future_suggestions_categories" => "Future Suggestions Categories",
        "future_suggestions_concepts" => "Future Suggestions Concepts",
        "internal_review" => "Internal Review",
        "critiques" => "Critiques",
        "feedback_code" => "Feedback Code",
        "feedback_content" => "Feedback Content",
        _ => return title_case(key),
    };
    known.to_string()
}

fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Topical category of a field, used as a CSS modifier.
pub fn content_type(key: &str) -> &'static str {
    match key {
        "title" => "title",
        "problem_statement" => "problem",
        "motivation" => "motivation",
        "proposed_method" => "method",
        "experiment_plan" => "experiment",
        "feedback_results" | "feedback_code" | "feedback_content" => "feedback",
        "keywords_query" => "keywords",
        "novelty" => "scores",
        "internal_review" => "review",
        "critiques" => "critiques",
        k if k.ends_with("_count") || k.ends_with("_pmi_score_value") => "metrics",
        k if k.starts_with("future_suggestions_") => "suggestions",
        _ => "general",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_labels() {
        assert_eq!(format_key_name("min_pmi_score_value"), "Min PMI Score");
        assert_eq!(
            format_key_name("direct_cooccurrence_count"),
            "Direct Co-occurrence Count"
        );
    }

    #[test]
    fn test_unknown_label_title_case() {
        assert_eq!(format_key_name("expected_outcome"), "Expected Outcome");
        assert_eq!(format_key_name("risk"), "Risk");
        assert_eq!(format_key_name("a__b"), "A B");
    }

    #[test]
    fn test_content_types() {
        assert_eq!(content_type("avg_pmi_score_value"), "metrics");
        assert_eq!(content_type("direct_cooccurrence_count"), "metrics");
        assert_eq!(content_type("future_suggestions_concepts"), "suggestions");
        assert_eq!(content_type("feedback_code"), "feedback");
        assert_eq!(content_type("whatever"), "general");
    }
}

//! Subcommand implementations.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use console::style;

use crate::api::{ApiClient, Fetcher, HypothesisQuery};
use crate::config::Settings;
use crate::models::{NavigationState, RawHypothesis, SessionMode, SortOrder, KNOWN_STRATEGIES};
use crate::normalize::normalize;
use crate::server::templates;
use crate::services::{export_hypotheses, write_export, Navigator};

fn client(settings: &Settings) -> anyhow::Result<ApiClient> {
    Ok(ApiClient::new(settings)?)
}

fn strategy_set(strategies: Vec<String>) -> Vec<String> {
    if strategies.is_empty() {
        KNOWN_STRATEGIES.iter().map(|s| s.to_string()).collect()
    } else {
        strategies
    }
}

/// List topics, optionally with subtopics and labels.
pub async fn cmd_topics(settings: &Settings, expand: bool) -> anyhow::Result<()> {
    let navigator = Navigator::new(
        Arc::new(client(settings)?),
        SessionMode::Topics,
        settings.per_page,
    );
    navigator.load_topics().await?;

    if expand {
        let ids: Vec<i64> = navigator
            .snapshot()
            .await
            .topics
            .iter()
            .map(|n| n.topic.id)
            .collect();
        for id in ids {
            if let Err(e) = navigator.toggle_topic(id).await {
                eprintln!("{} topic {}: {}", style("!").yellow(), id, e);
            }
        }
    }

    let session = navigator.snapshot().await;
    if session.topics.is_empty() {
        println!("{}", style("No topics found").dim());
        return Ok(());
    }

    for node in &session.topics {
        print!("{} {}", style(format!("[{}]", node.topic.id)).cyan(), style(&node.title).bold());
        if let Some(subtitle) = &node.subtitle {
            print!(" {}", style(format!("({})", subtitle)).dim());
        }
        println!();
        for row in node.rows() {
            print!("    {} {}", style(row.subtopic.index).dim(), row.subtopic.display_title());
            if let Some(label) = &row.label {
                print!(" {}", style(format!("[{}]", label)).yellow());
            }
            println!();
        }
    }
    Ok(())
}

/// Selection and filters for `browse`.
pub struct BrowseFilters {
    pub topic: Option<i64>,
    pub subtopic: Option<usize>,
    pub category: Option<usize>,
    pub strategies: Vec<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub page: u32,
    pub per_page: Option<u32>,
}

impl BrowseFilters {
    fn into_state(self, default_per_page: u32) -> anyhow::Result<NavigationState> {
        let mut state = NavigationState::default();
        if let Some(topic) = self.topic {
            state.select_topic(topic);
            if let Some(subtopic) = self.subtopic {
                state.select_category(topic, subtopic, self.category.unwrap_or(0));
            }
        }
        state.strategies = strategy_set(self.strategies).into_iter().collect();

        let order = match self.order {
            Some(o) => o.parse::<SortOrder>().map_err(anyhow::Error::msg)?,
            None => SortOrder::default(),
        };
        let field = self.sort_by.unwrap_or_else(|| state.sort_by.clone());
        state.set_sort(&field, order);
        state.set_per_page(self.per_page.unwrap_or(default_per_page));
        state.set_page(self.page);
        Ok(state)
    }
}

fn print_hypothesis_line(raw: &RawHypothesis, position: usize) {
    let normalized = normalize(raw, position);
    println!(
        "{} {} {} {}",
        style(format!("#{}", raw.id)).cyan(),
        style(&normalized.title).bold(),
        style(raw.strategy_label()).magenta(),
        style(format!("subtopic {}", raw.subtopic_label())).dim()
    );
    let scores: Vec<String> = normalized
        .scores
        .entries()
        .map(|(label, score)| format!("{} {}", label, score))
        .collect();
    println!("      {}", scores.join("  "));
}

/// List hypotheses for a selection.
pub async fn cmd_browse(
    settings: &Settings,
    filters: BrowseFilters,
    html: bool,
) -> anyhow::Result<()> {
    let state = filters.into_state(settings.per_page)?;
    let query = HypothesisQuery::from_state(&state);
    tracing::debug!("Query: {}", query.query_string());

    let page = client(settings)?.fetch_hypotheses(&query).await?;

    if html {
        println!(
            "{}",
            templates::base_template(
                "Hypotheses",
                "",
                &format!(
                    "<main>{}</main>",
                    templates::render_hypothesis_list(&page.hypotheses, state.view_mode)
                ),
            )
        );
        return Ok(());
    }

    if page.hypotheses.is_empty() {
        println!(
            "{} {}",
            style("!").yellow(),
            crate::services::navigator::NO_RESULTS_MESSAGE
        );
        return Ok(());
    }

    for (i, raw) in page.hypotheses.iter().enumerate() {
        print_hypothesis_line(raw, i + 1);
    }
    match page.pagination {
        Some(p) => println!(
            "\n{}",
            style(format!(
                "page {} of {} ({} total)",
                p.page, p.pages, p.total
            ))
            .dim()
        ),
        None => println!("\n{}", style(format!("{} results", page.hypotheses.len())).dim()),
    }
    Ok(())
}

/// Show one hypothesis.
pub async fn cmd_show(settings: &Settings, id: i64, html: bool) -> anyhow::Result<()> {
    let raw = client(settings)?.fetch_hypothesis_by_id(id).await?;

    if html {
        println!("{}", templates::render_hypothesis_page(&raw));
        return Ok(());
    }

    let normalized = normalize(&raw, 1);
    println!("{}", style(&normalized.title).bold());
    println!("  Strategy: {}", raw.strategy_label());
    println!("  Subtopic: {}", raw.subtopic_label());
    if let Some(created) = &raw.created_at {
        println!("  Created:  {}", created);
    }
    println!();
    for (label, score) in normalized.scores.entries() {
        println!("  {:<13} {}", format!("{}:", label), style(score).green());
    }

    if let Some(content) = raw.content() {
        println!();
        for (key, value) in &content {
            let text = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Null => continue,
                other => other.to_string(),
            };
            if text.trim().is_empty() {
                continue;
            }
            println!(
                "{}",
                style(crate::server::labels::format_key_name(key)).underlined()
            );
            println!("{}\n", text);
        }
    }
    Ok(())
}

/// Show score distribution statistics.
pub async fn cmd_stats(settings: &Settings) -> anyhow::Result<()> {
    let dist = client(settings)?.fetch_score_distribution().await?;

    let ranges = dist.ranges();
    if ranges.is_empty() {
        println!("{}", style("No data available").dim());
    } else {
        println!("{}", style("Score distribution").bold());
        for (range, count) in ranges {
            println!("  {:>6}  {}", range, count);
        }
    }

    if let Some(comparison) = dist.strategy_comparison.as_ref().filter(|c| !c.is_empty()) {
        println!("\n{}", style("Average scores by strategy").bold());
        for entry in comparison {
            let scores: Vec<String> = entry
                .scores
                .iter()
                .map(|(k, v)| format!("{} {}", k, crate::normalize::Score::from_json(v)))
                .collect();
            println!("  {:<12} {}", entry.strategy, scores.join("  "));
        }
    }
    Ok(())
}

/// Export hypotheses to a CSV file.
pub async fn cmd_export(
    settings: &Settings,
    topic: Option<i64>,
    subtopic: Option<usize>,
    strategies: Vec<String>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut state = NavigationState::default();
    let mode = match topic {
        Some(topic) => {
            state.select_topic(topic);
            state.subtopic = subtopic;
            SessionMode::Topics
        }
        None => {
            state.strategies = strategy_set(strategies).into_iter().collect();
            SessionMode::Sorting
        }
    };

    let client = client(settings)?;
    let file = export_hypotheses(&client, mode, &state, Utc::now().date_naive()).await?;
    let dir = output.unwrap_or_else(|| settings.export_dir.clone());
    let path = write_export(&dir, &file)?;

    println!(
        "{} Exported {} bytes to {}",
        style("✓").green(),
        file.bytes.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browse_filters_to_state() {
        let filters = BrowseFilters {
            topic: Some(3),
            subtopic: Some(1),
            category: None,
            strategies: vec!["evolve".to_string()],
            sort_by: None,
            order: None,
            page: 1,
            per_page: None,
        };
        let state = filters.into_state(20).unwrap();
        assert_eq!(
            HypothesisQuery::from_state(&state).query_string(),
            "topic=3&subtopic=1&category=0&strategy=evolve"
        );
    }

    #[test]
    fn test_browse_defaults_to_all_strategies() {
        let filters = BrowseFilters {
            topic: None,
            subtopic: None,
            category: None,
            strategies: Vec::new(),
            sort_by: Some("novelty_score".to_string()),
            order: Some("asc".to_string()),
            page: 2,
            per_page: Some(50),
        };
        let state = filters.into_state(20).unwrap();
        assert_eq!(state.strategies.len(), KNOWN_STRATEGIES.len());
        assert_eq!(state.sort_order, SortOrder::Asc);
        assert_eq!(state.page, 2);
        assert_eq!(state.per_page, 50);
    }

    #[test]
    fn test_browse_rejects_bad_order() {
        let filters = BrowseFilters {
            topic: None,
            subtopic: None,
            category: None,
            strategies: Vec::new(),
            sort_by: None,
            order: Some("up".to_string()),
            page: 1,
            per_page: None,
        };
        assert!(filters.into_state(20).is_err());
    }
}

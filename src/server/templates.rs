//! HTML templates for the viewer.
//!
//! Every page is the full session re-rendered: topic tree and quick stats in
//! the sidebar; info cards, filter controls and the hypothesis list in the
//! main column; and the detail modal on top when one is open. Every
//! interaction is a plain link or GET form back into the router.

use serde_json::Value;

use super::detail::render_detail_modal;
use super::labels::format_key_name;
use crate::models::analytics::{score_range_color, score_range_icon};
use crate::models::navigation::SORT_FIELDS;
use crate::models::{
    Category, NavigationState, Pagination, RawHypothesis, ScoreDistribution, SearchQueries,
    SessionMode, SortOrder, SubtopicDetail, ViewMode, KNOWN_STRATEGIES,
};
use crate::normalize::normalize;
use crate::services::{ContentRegion, Notice, Session, TopicNode};

/// Page sizes offered in the controls bar.
pub const PER_PAGE_OPTIONS: &[u32] = &[10, 20, 50, 100];

pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Base HTML template.
pub fn base_template(title: &str, nav: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - hypoview</title>
    <link rel="stylesheet" href="/static/app.css">
</head>
<body>
    <header id="main-header">
        <nav>
            <a href="/" class="logo">hypoview</a>
            {nav}
        </nav>
    </header>
    {content}
</body>
</html>"#,
        title = html_escape(title),
        nav = nav,
        content = content
    )
}

fn nav_links(mode: SessionMode) -> String {
    let mut links = String::from(r#"<a href="/refresh">refresh</a>"#);
    if mode == SessionMode::Sorting {
        links.push_str(r#" <a href="/analysis">score analysis</a>"#);
    }
    links
}

/// Render a notice. Dismissible notices link to `/notice/dismiss`.
pub fn render_notice(notice: &Notice, dismissible: bool) -> String {
    let close = if dismissible {
        r#"<a href="/notice/dismiss" class="notice-close" title="Dismiss">&times;</a>"#
    } else {
        ""
    };
    format!(
        r#"<div class="notice notice-{}"><span class="icon icon-{}"></span> {}{}</div>"#,
        notice.level.css_class(),
        notice.level.icon(),
        html_escape(&notice.message),
        close
    )
}

/// Topic tree for the sidebar.
pub fn render_topic_tree(session: &Session) -> String {
    if let Some(notice) = &session.tree_notice {
        return render_notice(notice, false);
    }
    if session.topics.is_empty() {
        return r#"<p class="text-muted">No topics loaded.</p>"#.to_string();
    }

    let mut html = String::from(r#"<ul class="topic-tree">"#);
    for node in &session.topics {
        html.push_str(&render_topic_node(node, session));
    }
    html.push_str("</ul>");
    html
}

fn render_topic_node(node: &TopicNode, session: &Session) -> String {
    let id = node.topic.id;
    let chevron = if node.expanded { "&#9662;" } else { "&#9656;" };
    let subtitle = node
        .subtitle
        .as_deref()
        .map(|s| format!(r#"<div class="topic-subtitle">{}</div>"#, html_escape(s)))
        .unwrap_or_default();

    let mut children = String::new();
    if node.expanded {
        children.push_str(r#"<ul class="subtopic-list">"#);
        for row in node.rows() {
            let index = row.subtopic.index;
            let selected =
                session.state.topic == Some(id) && session.state.subtopic == Some(index);
            let label = row
                .label
                .as_deref()
                .map(|l| format!(r#" <span class="subtopic-label">{}</span>"#, html_escape(l)))
                .unwrap_or_default();
            children.push_str(&format!(
                r#"<li class="subtopic-item{}"><a href="/topics/{}/subtopics/{}">{}</a>{}"#,
                if selected { " selected" } else { "" },
                id,
                index,
                html_escape(&row.subtopic.display_title()),
                label
            ));
            if selected && !session.categories.is_empty() {
                children.push_str(&render_categories(id, index, &session.categories, &session.state));
            }
            children.push_str("</li>");
        }
        if node.rows().is_empty() {
            children.push_str(r#"<li class="text-muted">No subtopics</li>"#);
        }
        children.push_str("</ul>");
    }

    format!(
        r#"<li class="topic-node{}">
            <a href="/topics/{}/toggle" class="topic-header">
                <span class="chevron">{}</span>
                <span class="topic-title">{}</span>
            </a>
            {}
            {}
        </li>"#,
        if session.state.topic == Some(id) { " active" } else { "" },
        id,
        chevron,
        html_escape(&node.title),
        subtitle,
        children
    )
}

fn render_categories(
    topic: i64,
    subtopic: usize,
    categories: &[Category],
    state: &NavigationState,
) -> String {
    let items: String = categories
        .iter()
        .map(|c| {
            format!(
                r#"<li class="category-item{}"><a href="/topics/{}/subtopics/{}/categories/{}"><span class="category-name">{}</span> <span class="category-count">{}</span></a></li>"#,
                if state.category == Some(c.index) { " selected" } else { "" },
                topic,
                subtopic,
                c.index,
                html_escape(&c.display_name()),
                c.count
            )
        })
        .collect();
    format!(r#"<ul class="category-list">{}</ul>"#, items)
}

fn info_card(class: &str, title: &str, body: &str) -> String {
    format!(
        r#"<div class="info-card {}">
            <div class="info-card-header"><h6 class="info-card-title">{}</h6></div>
            <div class="info-card-body">{}</div>
        </div>"#,
        class, title, body
    )
}

/// Description, search query and analysis cards for the selected subtopic.
pub fn render_subtopic_cards(detail: &SubtopicDetail) -> String {
    let mut html = String::from(r#"<div class="info-cards">"#);
    let literature = &detail.literature;

    if let Some(description) = literature.description.as_deref().filter(|d| !d.is_empty()) {
        html.push_str(&info_card(
            "description",
            "Research Description",
            &html_escape(description),
        ));
    }

    match literature.search_queries() {
        Some(SearchQueries::List(queries)) => {
            let badges: String = queries
                .iter()
                .filter(|q| !q.trim().is_empty())
                .map(|q| format!(r#"<span class="badge keyword">{}</span>"#, html_escape(q.trim())))
                .collect();
            html.push_str(&info_card("keywords", "Search Queries &amp; Keywords", &badges));
        }
        Some(SearchQueries::Text(text)) => {
            html.push_str(&info_card(
                "keywords",
                "Search Queries &amp; Keywords",
                &html_escape(&text),
            ));
        }
        None => {}
    }

    if let Some(analysis) = detail.current_analysis.as_deref() {
        html.push_str(&info_card(
            "analysis",
            "Current Research Analysis",
            &render_current_analysis(analysis),
        ));
    }

    html.push_str("</div>");
    html
}

const ANALYSIS_FIELDS: &[(&str, &str)] = &[
    ("title", "Title"),
    ("current_research_landscape", "Current Research Landscape"),
    ("critical_gaps", "Critical Gaps"),
    (
        "high_potential_innovation_opportunities",
        "High Potential Innovation Opportunities",
    ),
];

fn analysis_text(value: &Value) -> String {
    match value {
        Value::String(s) => html_escape(s),
        Value::Array(items) => {
            let items: String = items
                .iter()
                .map(|item| match item {
                    Value::String(s) => format!("<li>{}</li>", html_escape(s)),
                    other => format!("<li>{}</li>", html_escape(&other.to_string())),
                })
                .collect();
            format!("<ul>{}</ul>", items)
        }
        other => html_escape(&other.to_string()),
    }
}

/// Body of the analysis card. The blob is JSON with an `analysis` object
/// when the analyzer produced one; anything else is shown as is.
pub fn render_current_analysis(raw: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(raw).ok();
    let analysis = match parsed.as_ref().and_then(|v| v.get("analysis")) {
        Some(a) if !a.is_null() => a,
        _ => return format!(r#"<div class="analysis-raw">{}</div>"#, html_escape(raw)),
    };

    let sections: Vec<String> = ANALYSIS_FIELDS
        .iter()
        .filter_map(|(key, label)| {
            let value = analysis.get(*key)?;
            if value.is_null() || value.as_str().is_some_and(str::is_empty) {
                return None;
            }
            Some(format!(
                r#"<div class="analysis-field"><strong>{}:</strong> {}</div>"#,
                label,
                analysis_text(value)
            ))
        })
        .collect();

    if !sections.is_empty() {
        return sections.join("\n");
    }
    match serde_json::to_string_pretty(analysis) {
        Ok(pretty) => format!("<pre>{}</pre>", html_escape(&pretty)),
        Err(_) => html_escape(raw),
    }
}

/// Strategy filter bar.
pub fn render_strategy_bar(state: &NavigationState) -> String {
    let buttons: String = KNOWN_STRATEGIES
        .iter()
        .map(|name| {
            let active = state.strategies.contains(*name);
            format!(
                r#"<a href="/strategies/{}/toggle" class="strategy-toggle{}">{}{}</a>"#,
                urlencoding::encode(name),
                if active { " active" } else { "" },
                if active { "&#10003; " } else { "" },
                html_escape(&format_key_name(name))
            )
        })
        .collect();
    format!(
        r#"<div class="strategy-bar"><span class="bar-label">Strategies:</span> {}</div>"#,
        buttons
    )
}

/// Sort form, page size links, view toggle and export link.
pub fn render_controls(state: &NavigationState) -> String {
    let fields: String = SORT_FIELDS
        .iter()
        .map(|f| {
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                f,
                if state.sort_by == *f { " selected" } else { "" },
                html_escape(&format_key_name(f))
            )
        })
        .collect();
    let orders: String = [SortOrder::Desc, SortOrder::Asc]
        .iter()
        .map(|o| {
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                o,
                if state.sort_order == *o { " selected" } else { "" },
                if *o == SortOrder::Desc { "Descending" } else { "Ascending" }
            )
        })
        .collect();
    let per_page: String = PER_PAGE_OPTIONS
        .iter()
        .map(|n| {
            if *n == state.per_page {
                format!(r#"<span class="current">{}</span>"#, n)
            } else {
                format!(r#"<a href="/per-page/{}">{}</a>"#, n, n)
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    let view_label = match state.view_mode {
        ViewMode::Grid => "list view",
        ViewMode::List => "grid view",
    };

    format!(
        r#"<div class="controls">
            <form action="/sort" method="get" class="sort-form">
                <select name="by">{}</select>
                <select name="order">{}</select>
                <button type="submit" class="btn-small">sort</button>
            </form>
            <span class="per-page">show: {}</span>
            <a href="/view/toggle" class="btn-small">{}</a>
            <a href="/export" class="btn-small">export csv</a>
        </div>"#,
        fields, orders, per_page, view_label
    )
}

/// One hypothesis card. `position` is 1-based within the displayed list.
pub fn render_hypothesis_card(raw: &RawHypothesis, position: usize, view: ViewMode) -> String {
    let normalized = normalize(raw, position);
    let scores: String = normalized
        .scores
        .entries()
        .map(|(label, score)| {
            format!(
                r#"<div class="score-item"><span class="score-label">{}:</span> <span class="score-value">{}</span></div>"#,
                label, score
            )
        })
        .collect();

    format!(
        r#"<div class="hypothesis-card {}">
            <div class="hypothesis-header">
                <h6 class="hypothesis-title">{}</h6>
                <div class="hypothesis-meta">
                    <span class="badge bg-secondary">{}</span>
                    <span class="badge bg-info">{}</span>
                </div>
            </div>
            <div class="score-panel">{}</div>
            <div class="hypothesis-actions"><a href="/hypotheses/{}" class="btn-small">View Details</a></div>
        </div>"#,
        view.as_str(),
        html_escape(&normalized.title),
        html_escape(raw.strategy_label()),
        html_escape(&raw.subtopic_label()),
        scores,
        raw.id
    )
}

/// Grid or list of cards.
pub fn render_hypothesis_list(records: &[RawHypothesis], view: ViewMode) -> String {
    let cards: String = records
        .iter()
        .enumerate()
        .map(|(i, raw)| render_hypothesis_card(raw, i + 1, view))
        .collect();
    format!(r#"<div class="hypotheses {}">{}</div>"#, view.as_str(), cards)
}

/// Page links for a paginated result.
pub fn render_pagination(pagination: &Pagination) -> String {
    if pagination.pages <= 1 {
        return String::new();
    }
    let mut html = String::from(r#"<div class="pagination">"#);
    if pagination.page > 1 {
        html.push_str(&format!(r#"<a href="/page/{}">&laquo; prev</a> "#, pagination.page - 1));
    }
    html.push_str(&format!(
        r#"<span class="current">page {} of {}</span>"#,
        pagination.page, pagination.pages
    ));
    if pagination.page < pagination.pages {
        html.push_str(&format!(r#" <a href="/page/{}">next &raquo;</a>"#, pagination.page + 1));
    }
    html.push_str("</div>");
    html
}

fn render_content(session: &Session) -> String {
    match &session.content {
        ContentRegion::Empty => String::new(),
        ContentRegion::Notice(notice) => render_notice(notice, true),
        ContentRegion::Hypotheses {
            heading,
            records,
            pagination,
        } => {
            let count = match pagination {
                Some(p) => format!("{} of {} results", records.len(), p.total),
                None => format!("{} results", records.len()),
            };
            format!(
                r#"<div class="content-header">
                    <h2 id="content-title">{}</h2>
                    <span id="result-count">{}</span>
                </div>
                {}
                {}"#,
                html_escape(heading),
                count,
                render_hypothesis_list(records, session.state.view_mode),
                pagination.as_ref().map(render_pagination).unwrap_or_default()
            )
        }
    }
}

/// Sidebar score range summary.
pub fn render_quick_stats(stats: Option<&ScoreDistribution>) -> String {
    let ranges = stats.map(|s| s.ranges()).unwrap_or_default();
    if ranges.is_empty() {
        return r#"<div class="quick-stat-item bg-secondary">
                <span class="icon bi-info-circle"></span>
                <small>No data</small> <strong>Available</strong>
            </div>"#
            .to_string();
    }
    ranges
        .iter()
        .map(|(range, count)| {
            format!(
                r#"<div class="quick-stat-item {}">
                <span class="icon {}"></span>
                <small>{}</small> <strong>{}</strong>
            </div>"#,
                score_range_color(range),
                score_range_icon(range),
                html_escape(range),
                html_escape(count)
            )
        })
        .collect()
}

/// The whole viewer page for a session.
pub fn render_page(session: &Session) -> String {
    let sidebar_tree = if session.mode == SessionMode::Topics {
        format!(
            r#"<section class="sidebar-section"><h3>Research Topics</h3>{}</section>"#,
            render_topic_tree(session)
        )
    } else {
        String::new()
    };
    let content_title = match (&session.content_title, session.mode) {
        (Some(title), _) => format!(r#"<h1>{}</h1>"#, html_escape(title)),
        (None, SessionMode::Sorting) => "<h1>Hypothesis Sorting</h1>".to_string(),
        (None, SessionMode::Topics) => "<h1>Select a research topic</h1>".to_string(),
    };
    let cards = session
        .subtopic_detail
        .as_ref()
        .map(render_subtopic_cards)
        .unwrap_or_default();
    let modal = session
        .detail
        .as_ref()
        .map(|raw| {
            let position = session
                .records()
                .iter()
                .position(|r| r.id == raw.id)
                .map(|i| i + 1)
                .unwrap_or(1);
            render_detail_modal(raw, position)
        })
        .unwrap_or_default();

    let body = format!(
        r#"<div class="layout">
        <aside class="sidebar">
            {tree}
            <section class="sidebar-section"><h3>Quick Stats</h3>{stats}</section>
        </aside>
        <main>
            {title}
            {cards}
            {strategies}
            {controls}
            <div id="content-area">{content}</div>
        </main>
    </div>
    {modal}"#,
        tree = sidebar_tree,
        stats = render_quick_stats(session.quick_stats.as_ref()),
        title = content_title,
        cards = cards,
        strategies = render_strategy_bar(&session.state),
        controls = render_controls(&session.state),
        content = render_content(session),
        modal = modal,
    );

    base_template("Research Hypotheses", &nav_links(session.mode), &body)
}

/// Distribution and per-strategy averages.
pub fn render_score_analysis(dist: &ScoreDistribution) -> String {
    let ranges = dist.ranges();
    let range_rows: String = if ranges.is_empty() {
        r#"<tr><td colspan="2" class="text-muted">No distribution data</td></tr>"#.to_string()
    } else {
        ranges
            .iter()
            .map(|(range, count)| {
                format!(
                    r#"<tr><td><span class="badge {}">{}</span></td><td>{}</td></tr>"#,
                    score_range_color(range),
                    html_escape(range),
                    html_escape(count)
                )
            })
            .collect()
    };

    let comparison = dist.strategy_comparison.as_deref().unwrap_or(&[]);
    let strategy_table = if comparison.is_empty() {
        String::new()
    } else {
        let columns: Vec<&String> = comparison
            .iter()
            .flat_map(|c| c.scores.keys())
            .fold(Vec::new(), |mut acc, k| {
                if !acc.contains(&k) {
                    acc.push(k);
                }
                acc
            });
        let header: String = columns
            .iter()
            .map(|c| format!("<th>{}</th>", html_escape(&format_key_name(c))))
            .collect();
        let rows: String = comparison
            .iter()
            .map(|c| {
                let cells: String = columns
                    .iter()
                    .map(|col| {
                        let cell = c
                            .scores
                            .get(*col)
                            .map(crate::normalize::Score::from_json)
                            .unwrap_or_default();
                        format!("<td>{}</td>", cell)
                    })
                    .collect();
                format!(
                    "<tr><td>{}</td>{}</tr>",
                    html_escape(&format_key_name(&c.strategy)),
                    cells
                )
            })
            .collect();
        format!(
            r#"<h2>Average Scores by Strategy</h2>
        <table class="file-listing">
            <thead><tr><th>Strategy</th>{}</tr></thead>
            <tbody>{}</tbody>
        </table>"#,
            header, rows
        )
    };

    let body = format!(
        r#"<main>
        <h1>Score Analysis</h1>
        <h2>Score Distribution</h2>
        <table class="file-listing">
            <thead><tr><th>Range</th><th>Count</th></tr></thead>
            <tbody>{}</tbody>
        </table>
        {}
        <p><a href="/">&laquo; back</a></p>
    </main>"#,
        range_rows, strategy_table
    );
    base_template("Score Analysis", &nav_links(SessionMode::Sorting), &body)
}

/// Standalone page for a single hypothesis (CLI `show --html`).
pub fn render_hypothesis_page(raw: &RawHypothesis) -> String {
    base_template(
        &normalize(raw, 1).title,
        "",
        &render_detail_modal(raw, 1),
    )
}

/// Error page for failures outside the session flow.
pub fn render_error_page(notice: &Notice) -> String {
    base_template(
        "Error",
        "",
        &format!(
            r#"<main>{}<p><a href="/">&laquo; back</a></p></main>"#,
            render_notice(notice, false)
        ),
    )
}

/// CSS styles for the viewer - minimal text-based design.
pub const CSS: &str = r#"
:root {
    --bg: #fff;
    --text: #222;
    --text-muted: #666;
    --link: #0066cc;
    --link-hover: #004499;
    --border: #ccc;
    --accent: #f4f6f8;
    --info: #0c5460;
    --info-bg: #d1ecf1;
    --success: #155724;
    --success-bg: #d4edda;
    --warning: #856404;
    --warning-bg: #fff3cd;
    --danger: #721c24;
    --danger-bg: #f8d7da;
}
* { box-sizing: border-box; }
body { margin: 0; font-family: system-ui, sans-serif; color: var(--text); background: var(--bg); }
a { color: var(--link); text-decoration: none; }
a:hover { color: var(--link-hover); text-decoration: underline; }
#main-header { border-bottom: 1px solid var(--border); padding: 0.5rem 1rem; }
#main-header nav a { margin-right: 1rem; }
.logo { font-weight: bold; }
.layout { display: flex; gap: 1.5rem; padding: 1rem; }
.sidebar { width: 300px; flex-shrink: 0; }
main { flex: 1; min-width: 0; padding: 0 1rem; }
.text-muted { color: var(--text-muted); }
.topic-tree, .subtopic-list, .category-list { list-style: none; padding-left: 0.75rem; margin: 0; }
.topic-header { display: block; padding: 0.25rem 0; }
.topic-subtitle { font-size: 0.8rem; color: var(--text-muted); padding-left: 1.2rem; }
.subtopic-item.selected > a, .category-item.selected a { font-weight: bold; }
.subtopic-label { font-size: 0.75rem; color: var(--text-muted); }
.category-count { color: var(--text-muted); font-size: 0.8rem; }
.notice { padding: 0.5rem 0.75rem; border-radius: 3px; margin: 0.5rem 0; position: relative; }
.notice-close { position: absolute; right: 0.5rem; top: 0.3rem; }
.notice-info { color: var(--info); background: var(--info-bg); }
.notice-success { color: var(--success); background: var(--success-bg); }
.notice-warning { color: var(--warning); background: var(--warning-bg); }
.notice-danger { color: var(--danger); background: var(--danger-bg); }
.info-cards { display: grid; gap: 0.75rem; margin-bottom: 1rem; }
.info-card { border: 1px solid var(--border); border-radius: 3px; padding: 0.5rem 0.75rem; }
.info-card-title { margin: 0 0 0.25rem 0; }
.badge { display: inline-block; padding: 0.1rem 0.4rem; border-radius: 3px; font-size: 0.75rem; background: var(--accent); margin: 0.1rem; }
.bg-danger { background: var(--danger-bg); }
.bg-warning { background: var(--warning-bg); }
.bg-info { background: var(--info-bg); }
.bg-primary { background: #cfe2ff; }
.bg-success { background: var(--success-bg); }
.bg-secondary { background: var(--accent); }
.strategy-bar, .controls { margin: 0.5rem 0; display: flex; gap: 0.75rem; align-items: center; flex-wrap: wrap; }
.strategy-toggle { border: 1px solid var(--border); padding: 0.15rem 0.5rem; border-radius: 3px; }
.strategy-toggle.active { background: var(--info-bg); }
.btn-small { border: 1px solid var(--border); padding: 0.15rem 0.5rem; border-radius: 3px; background: var(--bg); cursor: pointer; font-size: 0.85rem; }
.current { font-weight: bold; }
.hypotheses.grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(280px, 1fr)); gap: 0.75rem; }
.hypotheses.list .hypothesis-card { margin-bottom: 0.5rem; }
.hypothesis-card { border: 1px solid var(--border); border-radius: 3px; padding: 0.75rem; }
.hypothesis-title { margin: 0 0 0.25rem 0; font-size: 0.95rem; }
.score-panel { font-size: 0.85rem; margin: 0.5rem 0; }
.hypothesis-card.list .score-panel { display: flex; gap: 1rem; flex-wrap: wrap; }
.score-value { font-family: monospace; }
.pagination { margin: 1rem 0; }
.quick-stat-item { padding: 0.4rem 0.6rem; border-radius: 3px; margin-bottom: 0.4rem; }
.file-listing { border-collapse: collapse; width: 100%; }
.file-listing th, .file-listing td { border-bottom: 1px solid var(--border); padding: 0.3rem 0.5rem; text-align: left; }
.modal-backdrop { position: fixed; inset: 0; background: rgba(0, 0, 0, 0.4); overflow-y: auto; }
.modal { background: var(--bg); max-width: 900px; margin: 2rem auto; border-radius: 4px; padding: 1rem 1.25rem; }
.modal-header { display: flex; justify-content: space-between; align-items: center; }
.modal-close { font-size: 1.5rem; }
.section-title { border-bottom: 1px solid var(--border); padding-bottom: 0.2rem; margin-top: 1rem; }
.score-detail { display: inline-block; margin-right: 1rem; }
.score-label { color: var(--text-muted); margin-right: 0.3rem; }
.content-item { margin-bottom: 0.6rem; }
.content-medium .item-content { font-size: 0.95rem; }
.nested-content { margin-left: 1rem; }
.toggle-content { display: none; }
.content-expandable { max-height: 8rem; overflow: hidden; }
.toggle-content:checked + .content-expandable { max-height: none; }
.show-more { display: inline-block; margin-top: 0.25rem; }
.feedback-item { margin-bottom: 0.6rem; }
.feedback-code { font-family: monospace; }
pre { white-space: pre-wrap; }
"#;

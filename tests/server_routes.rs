//! Route-level tests for the viewer, driven through the router with a fake
//! fetcher behind the navigator.

mod common;

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use common::FakeFetcher;
use hypoview::config::Settings;
use hypoview::models::{SessionMode, SortOrder};
use hypoview::server::{create_router, AppState};

fn app_with(fake: Arc<FakeFetcher>, mode: SessionMode) -> (AppState, Router) {
    let settings = Settings {
        mode,
        ..Settings::default()
    };
    let state = AppState::with_fetcher(fake, &settings);
    (state.clone(), create_router(state))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, HeaderMap, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8_lossy(&bytes).into_owned())
}

fn assert_redirects_home(status: StatusCode, headers: &HeaderMap) {
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers.get(header::LOCATION).unwrap(), "/");
}

#[tokio::test]
async fn test_index_renders_topic_tree() {
    let fake = Arc::new(FakeFetcher::with_tree());
    let (state, app) = app_with(fake, SessionMode::Topics);
    state.navigator.start().await;

    let (status, _, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Research Topics"));
    assert!(body.contains("Gene drives"));
    assert!(body.contains("Select a research topic"));
}

#[tokio::test]
async fn test_stylesheet_content_type() {
    let (_, app) = app_with(Arc::new(FakeFetcher::with_tree()), SessionMode::Topics);

    let (status, headers, body) = get(&app, "/static/app.css").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "text/css");
    assert!(body.contains(":root"));
}

#[tokio::test]
async fn test_selection_flow_through_routes() {
    let fake = Arc::new(FakeFetcher::with_tree());
    let (state, app) = app_with(fake.clone(), SessionMode::Topics);

    let (status, headers, _) = get(&app, "/topics/1/subtopics/0").await;
    assert_redirects_home(status, &headers);

    let (status, headers, _) = get(&app, "/strategies/evolve/toggle").await;
    assert_redirects_home(status, &headers);
    assert_eq!(
        fake.query_strings(),
        vec!["topic=1&subtopic=0&category=0&strategy=evolve"]
    );

    let (_, _, body) = get(&app, "/").await;
    assert!(body.contains("Topic 1 - Subtopic 0"));
    assert!(body.contains("Result for 1 strategies"));
    assert!(body.contains("Description of 1/0"));

    let session = state.navigator.snapshot().await;
    assert_eq!(session.records().len(), 1);
}

#[tokio::test]
async fn test_sort_query_is_applied() {
    let fake = Arc::new(FakeFetcher::with_tree());
    let (state, app) = app_with(fake.clone(), SessionMode::Sorting);

    let (status, headers, _) = get(&app, "/sort?by=novelty_score&order=asc").await;
    assert_redirects_home(status, &headers);

    let session = state.navigator.snapshot().await;
    assert_eq!(session.state.sort_by, "novelty_score");
    assert_eq!(session.state.sort_order, SortOrder::Asc);
    assert!(fake.query_strings()[0].ends_with("&sort_by=novelty_score&sort_order=asc"));
}

#[tokio::test]
async fn test_bad_sort_order_keeps_current() {
    let fake = Arc::new(FakeFetcher::with_tree());
    let (state, app) = app_with(fake, SessionMode::Sorting);

    get(&app, "/sort?by=created_at&order=sideways").await;

    let session = state.navigator.snapshot().await;
    assert_eq!(session.state.sort_by, "created_at");
    assert_eq!(session.state.sort_order, SortOrder::Desc);
}

#[tokio::test]
async fn test_export_download() {
    let fake = Arc::new(FakeFetcher::with_tree());
    let (_, app) = app_with(fake.clone(), SessionMode::Topics);
    get(&app, "/topics/7").await;

    let (status, headers, body) = get(&app, "/export").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "text/csv");
    let disposition = headers
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(disposition.starts_with("attachment; filename=\"hypotheses_topic_7_export_"));
    assert_eq!(body, "id,title\n1,A\n");
}

#[tokio::test]
async fn test_export_without_topic_shows_notice() {
    let fake = Arc::new(FakeFetcher::with_tree());
    let (_, app) = app_with(fake.clone(), SessionMode::Topics);

    let (status, headers, _) = get(&app, "/export").await;
    assert_redirects_home(status, &headers);
    assert_eq!(fake.count("export"), 0);

    let (_, _, body) = get(&app, "/").await;
    assert!(body.contains("Please select a research topic first"));
    assert!(body.contains("/notice/dismiss"));

    get(&app, "/notice/dismiss").await;
    let (_, _, body) = get(&app, "/").await;
    assert!(!body.contains("Please select a research topic first"));
}

#[tokio::test]
async fn test_detail_modal_opens_and_closes() {
    let fake = Arc::new(FakeFetcher::with_tree());
    let (state, app) = app_with(fake.clone(), SessionMode::Sorting);
    state.navigator.start().await;

    let (status, headers, _) = get(&app, "/hypotheses/0").await;
    assert_redirects_home(status, &headers);
    let (_, _, body) = get(&app, "/").await;
    assert!(body.contains("modal-backdrop"));
    assert!(body.contains("Score Details"));
    assert_eq!(fake.count("hypothesis:"), 0);

    get(&app, "/detail/close").await;
    let (_, _, body) = get(&app, "/").await;
    assert!(!body.contains("modal-backdrop"));
}

#[tokio::test]
async fn test_view_toggle_and_paging_routes() {
    let fake = Arc::new(FakeFetcher::with_tree());
    let (state, app) = app_with(fake.clone(), SessionMode::Sorting);

    get(&app, "/view/toggle").await;
    assert_eq!(fake.count("hypotheses"), 0);

    get(&app, "/page/2").await;
    get(&app, "/per-page/50").await;
    let session = state.navigator.snapshot().await;
    assert_eq!(session.state.page, 1);
    assert_eq!(session.state.per_page, 50);
    assert_eq!(fake.count("hypotheses"), 2);
}

#[tokio::test]
async fn test_score_analysis_page() {
    let (_, app) = app_with(Arc::new(FakeFetcher::with_tree()), SessionMode::Sorting);

    let (status, _, body) = get(&app, "/analysis").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Score Analysis"));
    assert!(body.contains("No distribution data"));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (_, app) = app_with(Arc::new(FakeFetcher::with_tree()), SessionMode::Topics);

    let (status, _, _) = get(&app, "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

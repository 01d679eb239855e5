//! Route table.

use axum::{routing::get, Router};

use super::handlers;
use super::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/static/app.css", get(handlers::stylesheet))
        .route("/topics/:id", get(handlers::select_topic))
        .route("/topics/:id/toggle", get(handlers::toggle_topic))
        .route(
            "/topics/:id/subtopics/:index",
            get(handlers::select_subtopic),
        )
        .route(
            "/topics/:id/subtopics/:index/categories/:category",
            get(handlers::select_category),
        )
        .route("/strategies/:name/toggle", get(handlers::toggle_strategy))
        .route("/sort", get(handlers::set_sort))
        .route("/page/:page", get(handlers::set_page))
        .route("/per-page/:per_page", get(handlers::set_per_page))
        .route("/view/toggle", get(handlers::toggle_view))
        .route("/hypotheses/:id", get(handlers::open_detail))
        .route("/detail/close", get(handlers::close_detail))
        .route("/notice/dismiss", get(handlers::dismiss_notice))
        .route("/export", get(handlers::export))
        .route("/refresh", get(handlers::refresh))
        .route("/analysis", get(handlers::score_analysis))
        .with_state(state)
}

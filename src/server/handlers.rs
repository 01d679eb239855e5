//! Request handlers. Mutating routes apply one navigator action and redirect
//! back to the page; failures are already recorded in the session as
//! notices, so handlers only log them.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::Utc;
use serde::Deserialize;

use super::templates;
use super::AppState;
use crate::error::ViewError;
use crate::models::SortOrder;
use crate::services::Notice;

fn back(result: Result<(), ViewError>, action: &str) -> Redirect {
    if let Err(e) = result {
        tracing::debug!("{} did not complete: {}", action, e);
    }
    Redirect::to("/")
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let session = state.navigator.snapshot().await;
    Html(templates::render_page(&session))
}

pub async fn stylesheet() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], templates::CSS)
}

pub async fn select_topic(State(state): State<AppState>, Path(topic): Path<i64>) -> Redirect {
    back(state.navigator.select_topic(topic).await, "select topic")
}

pub async fn toggle_topic(State(state): State<AppState>, Path(topic): Path<i64>) -> Redirect {
    back(state.navigator.toggle_topic(topic).await, "toggle topic")
}

pub async fn select_subtopic(
    State(state): State<AppState>,
    Path((topic, subtopic)): Path<(i64, usize)>,
) -> Redirect {
    back(
        state.navigator.select_subtopic(topic, subtopic).await,
        "select subtopic",
    )
}

pub async fn select_category(
    State(state): State<AppState>,
    Path((topic, subtopic, category)): Path<(i64, usize, usize)>,
) -> Redirect {
    back(
        state
            .navigator
            .select_category(topic, subtopic, category)
            .await,
        "select category",
    )
}

pub async fn toggle_strategy(State(state): State<AppState>, Path(name): Path<String>) -> Redirect {
    back(state.navigator.toggle_strategy(&name).await, "toggle strategy")
}

#[derive(Debug, Deserialize)]
pub struct SortParams {
    pub by: Option<String>,
    pub order: Option<String>,
}

pub async fn set_sort(State(state): State<AppState>, Query(params): Query<SortParams>) -> Redirect {
    let current = state.navigator.snapshot().await.state;
    let field = params.by.unwrap_or(current.sort_by);
    let order = match params.order.as_deref().map(str::parse::<SortOrder>) {
        Some(Ok(order)) => order,
        Some(Err(e)) => {
            tracing::warn!("{}", e);
            current.sort_order
        }
        None => current.sort_order,
    };
    back(state.navigator.set_sort(&field, order).await, "sort")
}

pub async fn set_page(State(state): State<AppState>, Path(page): Path<u32>) -> Redirect {
    back(state.navigator.set_page(page).await, "change page")
}

pub async fn set_per_page(State(state): State<AppState>, Path(per_page): Path<u32>) -> Redirect {
    back(state.navigator.set_per_page(per_page).await, "change page size")
}

pub async fn toggle_view(State(state): State<AppState>) -> Redirect {
    state.navigator.toggle_view_mode().await;
    Redirect::to("/")
}

pub async fn open_detail(State(state): State<AppState>, Path(id): Path<i64>) -> Redirect {
    back(state.navigator.open_detail(id).await, "open detail")
}

pub async fn close_detail(State(state): State<AppState>) -> Redirect {
    state.navigator.close_detail().await;
    Redirect::to("/")
}

pub async fn dismiss_notice(State(state): State<AppState>) -> Redirect {
    state.navigator.dismiss_notice().await;
    Redirect::to("/")
}

pub async fn refresh(State(state): State<AppState>) -> Redirect {
    back(state.navigator.refresh().await, "refresh")
}

/// Send the CSV as a download, or go back to the page showing the failure.
pub async fn export(State(state): State<AppState>) -> Response {
    match state.navigator.export(Utc::now().date_naive()).await {
        Ok(file) => (
            [
                (header::CONTENT_TYPE, "text/csv".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", file.filename),
                ),
            ],
            file.bytes,
        )
            .into_response(),
        Err(e) => {
            tracing::debug!("export did not complete: {}", e);
            Redirect::to("/").into_response()
        }
    }
}

pub async fn score_analysis(State(state): State<AppState>) -> Response {
    match state.navigator.score_analysis().await {
        Ok(dist) => Html(templates::render_score_analysis(&dist)).into_response(),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Html(templates::render_error_page(&Notice::from_error(
                "Failed to load score analysis",
                &e,
            ))),
        )
            .into_response(),
    }
}

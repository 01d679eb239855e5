//! Local web interface for browsing research hypotheses.
//!
//! Server-side rendered pages over a single viewing session:
//! - Topic tree with lazily loaded subtopics and categories
//! - Strategy, sort and paging controls
//! - Hypothesis cards with a detail modal
//! - CSV export and score analysis

pub mod detail;
mod handlers;
pub mod labels;
mod routes;
pub mod templates;

pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::api::{ApiClient, Fetcher};
use crate::config::Settings;
use crate::services::Navigator;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub navigator: Arc<Navigator>,
}

impl AppState {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let client = ApiClient::new(settings)?;
        Ok(Self::with_fetcher(Arc::new(client), settings))
    }

    pub fn with_fetcher(fetcher: Arc<dyn Fetcher>, settings: &Settings) -> Self {
        Self {
            navigator: Arc::new(Navigator::new(fetcher, settings.mode, settings.per_page)),
        }
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(settings)?;
    tracing::info!("Using API at {}", settings.api_url);
    state.navigator.start().await;

    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

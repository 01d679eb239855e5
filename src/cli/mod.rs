//! Command-line interface.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Settings;
use crate::models::SessionMode;

/// Browse research hypotheses served by a hypothesis API
#[derive(Parser)]
#[command(name = "hypoview")]
#[command(about = "Browse, inspect and export scored research hypotheses", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Base URL of the hypothesis API
    #[arg(long, env = "HYPOVIEW_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "HYPOVIEW_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the interactive viewer
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(short, long)]
        port: Option<u16>,
        /// Session mode: topics or sorting
        #[arg(short, long)]
        mode: Option<SessionMode>,
    },

    /// List research topics
    Topics {
        /// Also list each topic's subtopics with their category labels
        #[arg(short, long)]
        expand: bool,
    },

    /// List hypotheses for a selection
    Browse {
        #[arg(short, long)]
        topic: Option<i64>,
        #[arg(short, long, requires = "topic")]
        subtopic: Option<usize>,
        #[arg(short, long, requires = "subtopic")]
        category: Option<usize>,
        /// Strategy filter (repeatable); defaults to all strategies
        #[arg(long = "strategy")]
        strategies: Vec<String>,
        #[arg(long)]
        sort_by: Option<String>,
        /// asc or desc
        #[arg(long)]
        order: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        per_page: Option<u32>,
        /// Print the rendered HTML list instead of text
        #[arg(long)]
        html: bool,
    },

    /// Show one hypothesis
    Show {
        id: i64,
        /// Print the rendered detail page instead of text
        #[arg(long)]
        html: bool,
    },

    /// Show score distribution statistics
    Stats,

    /// Export hypotheses as CSV
    Export {
        /// Topic to export; without it all hypotheses matching the
        /// strategy filter are exported
        #[arg(short, long)]
        topic: Option<i64>,
        #[arg(short, long, requires = "topic")]
        subtopic: Option<usize>,
        #[arg(long = "strategy")]
        strategies: Vec<String>,
        /// Output directory (defaults to the configured export directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    /// Apply global flags over file configuration.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref url) = self.api_url {
            settings.api_url = url.clone();
        }
        if let Some(timeout) = self.timeout {
            settings.request_timeout = Some(timeout);
        }
    }
}

/// Run the parsed command.
pub async fn run(cli: Cli, mut settings: Settings) -> anyhow::Result<()> {
    cli.apply_to_settings(&mut settings);

    match cli.command {
        Commands::Serve { host, port, mode } => {
            if let Some(mode) = mode {
                settings.mode = mode;
            }
            let host = host.unwrap_or_else(|| settings.host.clone());
            let port = port.unwrap_or(settings.port);
            crate::server::serve(&settings, &host, port).await
        }
        Commands::Topics { expand } => commands::cmd_topics(&settings, expand).await,
        Commands::Browse {
            topic,
            subtopic,
            category,
            strategies,
            sort_by,
            order,
            page,
            per_page,
            html,
        } => {
            let filters = commands::BrowseFilters {
                topic,
                subtopic,
                category,
                strategies,
                sort_by,
                order,
                page,
                per_page,
            };
            commands::cmd_browse(&settings, filters, html).await
        }
        Commands::Show { id, html } => commands::cmd_show(&settings, id, html).await,
        Commands::Stats => commands::cmd_stats(&settings).await,
        Commands::Export {
            topic,
            subtopic,
            strategies,
            output,
        } => commands::cmd_export(&settings, topic, subtopic, strategies, output).await,
    }
}

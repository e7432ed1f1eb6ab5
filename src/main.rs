//! CPA Dashboard CLI
//!
//! Drives the dashboard controller headlessly against a live backend:
//! - Render a view
//! - Search the command palette
//! - Show insight and client detail panels
//! - Call the core API helper
//! - Generate a config file

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use cpa_dashboard::config::{generate_default_config, LoggingConfig};
use cpa_dashboard::model::LeadStage;
use cpa_dashboard::{
    ApiClient, Config, Credentials, Dashboard, Document, MemoryDocument, TaxCategory, View,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "cpa-dashboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Headless CPA dashboard controller")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend URL, overriding the config file
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Switch to a view and print its containers
    View {
        /// dashboard, insights, clients, pipeline or review
        name: String,
    },

    /// Load clients and run a palette query
    Palette {
        /// Search text (empty lists every command)
        #[arg(default_value = "")]
        query: String,
    },

    /// Show an insight's detail panel
    Insight {
        /// Insight id
        id: String,
    },

    /// Show a client's detail panel
    Client {
        /// Client id or session id
        id: String,
    },

    /// Call /api/core/<endpoint>
    Core {
        /// HTTP method (GET, POST, PUT, PATCH, DELETE)
        method: String,
        /// Endpoint path below /api/core/
        endpoint: String,
        /// JSON request body
        #[arg(short, long)]
        body: Option<String>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut config, report) = match &cli.config {
        Some(path) => (Config::load_with_env(path)?, None),
        None => {
            let (config, report) = Config::locate();
            (config, Some(report))
        }
    };
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }

    init_tracing(&config.logging);
    if let Some(report) = report {
        report.log();
    }

    match cli.command {
        Commands::View { name } => {
            let dashboard = dashboard(&config)?;
            let view = dashboard.switch_view(&name).await?;
            println!("# {}", view.label());
            let ids = view_containers(view);
            dashboard
                .with_page(|page| {
                    print_containers(page, &ids);
                    if view == View::Dashboard {
                        println!("── categories ──");
                        for line in category_lines(page) {
                            println!("{}", line);
                        }
                    }
                })
                .await;
        }

        Commands::Palette { query } => {
            let dashboard = dashboard(&config)?;
            dashboard.switch_view("clients").await?;
            dashboard.open_palette().await;
            dashboard.search_palette(&query).await;
            dashboard
                .with_page(|page| print_containers(page, &["palette-results".to_string()]))
                .await;
        }

        Commands::Insight { id } => {
            let dashboard = dashboard(&config)?;
            dashboard.switch_view("insights").await?;
            if !dashboard.open_insight_detail(&id).await {
                bail!("No insight with id {}", id);
            }
            dashboard
                .with_page(|page| print_containers(page, &panel_containers("insight-panel")))
                .await;
        }

        Commands::Client { id } => {
            let dashboard = dashboard(&config)?;
            dashboard.switch_view("clients").await?;
            if !dashboard.open_client_detail(&id).await {
                bail!("No client with id {}", id);
            }
            dashboard
                .with_page(|page| print_containers(page, &panel_containers("client-panel")))
                .await;
        }

        Commands::Core {
            method,
            endpoint,
            body,
        } => {
            let method = reqwest::Method::from_bytes(method.to_uppercase().as_bytes())
                .with_context(|| format!("Invalid HTTP method: {}", method))?;
            let body: Option<serde_json::Value> = body
                .as_deref()
                .map(serde_json::from_str)
                .transpose()
                .context("Request body is not valid JSON")?;

            let api = ApiClient::new(&config.api, Credentials::resolve(&config.auth))?;
            let response = api.core_request(method, &endpoint, body.as_ref()).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", config),
            }
        }
    }

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("cpa_dashboard={}", logging.level)));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

fn dashboard(config: &Config) -> anyhow::Result<Dashboard<MemoryDocument>> {
    tracing::info!("CPA Dashboard v{} ({})", env!("CARGO_PKG_VERSION"), config.api.base_url);
    let api = ApiClient::new(&config.api, Credentials::resolve(&config.auth))?;
    let page = MemoryDocument::cpa_page(config.ui.viewport_width_px);
    Ok(Dashboard::new(Arc::new(api), page, config.ui.clone())?)
}

/// Page elements a view writes into
fn view_containers(view: View) -> Vec<String> {
    let mut ids: Vec<String> = match view {
        View::Dashboard => [
            "total-savings",
            "total-clients",
            "total-insights",
            "top-insights",
            "high-value-clients",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
        View::Insights => vec!["insights-list".to_string()],
        View::Clients => vec!["clients-list".to_string()],
        View::Pipeline => LeadStage::all()
            .iter()
            .flat_map(|s| [format!("pipeline-{}-count", s), format!("pipeline-{}", s)])
            .collect(),
        View::Review => vec!["review-list".to_string()],
    };
    if view != View::Dashboard {
        ids.push(format!("{}-badge", view));
    }
    ids
}

/// One `label  count  level` line per tax category
fn category_lines(page: &MemoryDocument) -> Vec<String> {
    TaxCategory::all()
        .iter()
        .map(|category| {
            let count = page.text(&format!("{}-count", category)).unwrap_or_default();
            let level = page.text(&format!("{}-level", category)).unwrap_or_default();
            format!("{:<12}{:>4}  {}", category.label(), count, level)
        })
        .collect()
}

fn panel_containers(panel: &str) -> Vec<String> {
    vec![format!("{}-title", panel), format!("{}-body", panel)]
}

fn print_containers(page: &MemoryDocument, ids: &[String]) {
    for id in ids {
        let html = page.inner_html(id).unwrap_or_default();
        let content = if html.is_empty() {
            page.text(id).unwrap_or_default()
        } else {
            html
        };
        println!("── {} ──", id);
        println!("{}", content.trim());
    }
}

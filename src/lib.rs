//! # CPA Dashboard
//!
//! Headless controller for a tax-advisory dashboard: fetches insights,
//! clients, pipeline leads and the review queue from the CPA backend and
//! renders them into a page.
//!
//! ## Features
//!
//! - **View routing**: one active section, nav highlighting, mobile sidebar
//! - **Loaders**: concurrent fetches with stale-response protection
//! - **Safe rendering**: auto-escaping templates over typed view-models
//! - **Command palette**: debounced search over commands and clients
//! - **Core API helper**: one error contract with auth and CSRF headers
//!
//! ## Modules
//!
//! - [`api`]: HTTP client for the CPA backend
//! - [`controller`]: the [`Dashboard`] controller and its session state
//! - [`dom`]: the [`Document`] page abstraction and an in-memory page
//! - [`render`]: HTML fragment renderers and formatters
//! - [`model`]: records returned by the backend
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cpa_dashboard::{ApiClient, Config, Credentials, Dashboard, Document, MemoryDocument};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let credentials = Credentials::resolve(&config.auth);
//!     let api = ApiClient::new(&config.api, credentials)?;
//!
//!     let page = MemoryDocument::cpa_page(config.ui.viewport_width_px);
//!     let dashboard = Dashboard::new(Arc::new(api), page, config.ui.clone())?;
//!
//!     dashboard.switch_view("insights").await?;
//!     let html = dashboard.with_page(|p| p.inner_html("insights-list")).await;
//!     println!("{}", html.unwrap_or_default());
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod controller;
pub mod dom;
pub mod model;
pub mod render;

// Re-export top-level types for convenience
pub use api::{ApiClient, ApiError, ApiResult, CpaApi, Credentials};

pub use config::{
    ApiConfig, AuthConfig, Config, ConfigError, ConfigReport, LoggingConfig, UiConfig,
};

pub use controller::{
    Action, Dashboard, DashboardError, DashboardResult, KeyEvent, PaletteState, SessionState,
    View,
};

pub use dom::{Document, MemoryDocument, ToastLevel};

pub use model::{Client, Insight, Lead, LeadStage, ReviewItem, TaxCategory};

pub use render::{RenderError, Renderer};

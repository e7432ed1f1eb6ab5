//! Dashboard Controller
//!
//! Owns the session state and the page, and turns user events into
//! loads and renders.
//!
//! ## Architecture
//!
//! - **router**: view switching and the mobile sidebar
//! - **loaders**: fetch → state → render for each view
//! - **panels**: insight and client detail panels
//! - **palette**: command palette state machine and filtering
//! - **events**: keyboard shortcuts and `data-action` dispatch
//! - **state**: the session state record
//!
//! ## Data Flow
//!
//! 1. An event (nav click, key, palette selection) reaches the controller
//! 2. The router marks the section active and starts the view's loader
//! 3. The loader takes a ticket, fetches, and applies the result only if
//!    the ticket is still current when it holds the state write lock
//! 4. Renderers produce escaped fragments written into the page

mod events;
mod loaders;
mod palette;
mod panels;
mod router;
pub mod state;

pub use events::{Action, KeyEvent};
pub use palette::{filter_palette, CommandAction, PaletteCommand, PaletteMatches, COMMANDS};
pub use state::{
    category_level, CategoryStats, DashboardTotals, LoadTicket, PaletteState, SessionState, View,
};

use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

use crate::api::CpaApi;
use crate::config::UiConfig;
use crate::dom::Document;
use crate::render::{RenderError, RenderResult, Renderer};

/// Errors surfaced by controller entry points
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Unknown view: {0}")]
    UnknownView(String),

    #[error("Action {0} requires an argument")]
    MissingArgument(String),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

/// Result type alias for controller operations
pub type DashboardResult<T> = Result<T, DashboardError>;

/// The dashboard controller
///
/// Cheap to clone; clones share the same state and page, so handlers can
/// be spawned onto the runtime.
pub struct Dashboard<D: Document> {
    inner: Arc<Inner<D>>,
}

struct Inner<D> {
    api: Arc<dyn CpaApi>,
    page: Mutex<D>,
    state: RwLock<SessionState>,
    renderer: Renderer,
    settings: UiConfig,
    /// Latest palette keystroke; older debounced queries are dropped
    palette_seq: AtomicU64,
}

impl<D: Document> Clone for Dashboard<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D: Document + 'static> Dashboard<D> {
    /// Create a controller over `page`, fetching through `api`
    pub fn new(api: Arc<dyn CpaApi>, page: D, settings: UiConfig) -> DashboardResult<Self> {
        Ok(Self {
            inner: Arc::new(Inner {
                api,
                page: Mutex::new(page),
                state: RwLock::new(SessionState::default()),
                renderer: Renderer::new()?,
                settings,
                palette_seq: AtomicU64::new(0),
            }),
        })
    }

    /// Snapshot of the session state
    pub async fn state(&self) -> SessionState {
        self.inner.state.read().await.clone()
    }

    /// Run `f` against the page
    pub async fn with_page<R>(&self, f: impl FnOnce(&D) -> R) -> R {
        let page = self.inner.page.lock().await;
        f(&page)
    }

    async fn paint(&self, id: &str, fragment: RenderResult<String>) {
        let mut page = self.inner.page.lock().await;
        write_fragment(&mut *page, id, fragment);
    }

    async fn paint_skeleton(&self, ids: &[&str]) {
        let count = self.inner.settings.skeleton_count;
        for id in ids {
            let fragment = self.inner.renderer.skeleton(count);
            self.paint(id, fragment).await;
        }
    }
}

/// Write a rendered fragment into `id`
///
/// A template failure is logged and replaced by plain text so the
/// container never keeps a stale skeleton.
fn write_fragment<D: Document + ?Sized>(page: &mut D, id: &str, fragment: RenderResult<String>) {
    match fragment {
        Ok(html) => page.set_html(id, &html),
        Err(e) => {
            tracing::error!(container = %id, error = %e, "Failed to render fragment");
            page.set_text(id, "Unable to display this section");
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Fake backend shared by the controller tests

    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio::sync::Notify;

    use super::Dashboard;
    use crate::api::{ApiError, ApiResult, CpaApi};
    use crate::config::UiConfig;
    use crate::dom::MemoryDocument;
    use crate::model::{Client, Insight, Lead, ReviewItem};

    /// Scripted responses per resource
    ///
    /// Responses sit behind a lock so a test can change what the backend
    /// returns between two loads.
    pub struct FakeApi {
        insights: Mutex<ApiResult<Option<Vec<Insight>>>>,
        clients: Mutex<ApiResult<Option<Vec<Client>>>>,
        leads: Mutex<ApiResult<Option<Vec<Lead>>>>,
        reviews: Mutex<ApiResult<Option<Vec<ReviewItem>>>>,
        /// When set, `fetch_insights` waits for a notification first
        insights_gate: Option<Arc<Notify>>,
        pub insight_calls: AtomicUsize,
        pub client_calls: AtomicUsize,
    }

    impl Default for FakeApi {
        fn default() -> Self {
            Self {
                insights: Mutex::new(Ok(Some(Vec::new()))),
                clients: Mutex::new(Ok(Some(Vec::new()))),
                leads: Mutex::new(Ok(Some(Vec::new()))),
                reviews: Mutex::new(Ok(Some(Vec::new()))),
                insights_gate: None,
                insight_calls: AtomicUsize::new(0),
                client_calls: AtomicUsize::new(0),
            }
        }
    }

    fn server_error<T>() -> ApiResult<T> {
        Err(ApiError::Status {
            status: 500,
            message: "Internal error".to_string(),
        })
    }

    impl FakeApi {
        pub fn failing() -> Self {
            Self::default()
                .with_insights(server_error())
                .with_clients(server_error())
                .with_leads(server_error())
                .with_reviews(server_error())
        }

        pub fn with_insights(self, response: ApiResult<Option<Vec<Insight>>>) -> Self {
            self.set_insights(response);
            self
        }

        pub fn with_clients(self, response: ApiResult<Option<Vec<Client>>>) -> Self {
            self.set_clients(response);
            self
        }

        pub fn with_leads(self, response: ApiResult<Option<Vec<Lead>>>) -> Self {
            self.set_leads(response);
            self
        }

        pub fn with_reviews(self, response: ApiResult<Option<Vec<ReviewItem>>>) -> Self {
            self.set_reviews(response);
            self
        }

        pub fn gated(mut self, gate: Arc<Notify>) -> Self {
            self.insights_gate = Some(gate);
            self
        }

        pub fn set_insights(&self, response: ApiResult<Option<Vec<Insight>>>) {
            *self.insights.lock().unwrap() = response;
        }

        pub fn set_clients(&self, response: ApiResult<Option<Vec<Client>>>) {
            *self.clients.lock().unwrap() = response;
        }

        pub fn set_leads(&self, response: ApiResult<Option<Vec<Lead>>>) {
            *self.leads.lock().unwrap() = response;
        }

        pub fn set_reviews(&self, response: ApiResult<Option<Vec<ReviewItem>>>) {
            *self.reviews.lock().unwrap() = response;
        }
    }

    #[async_trait]
    impl CpaApi for FakeApi {
        async fn fetch_insights(&self) -> ApiResult<Option<Vec<Insight>>> {
            self.insight_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.insights_gate {
                gate.notified().await;
            }
            self.insights.lock().unwrap().clone()
        }

        async fn fetch_clients(&self) -> ApiResult<Option<Vec<Client>>> {
            self.client_calls.fetch_add(1, Ordering::SeqCst);
            self.clients.lock().unwrap().clone()
        }

        async fn fetch_pipeline(&self) -> ApiResult<Option<Vec<Lead>>> {
            self.leads.lock().unwrap().clone()
        }

        async fn fetch_review_queue(&self) -> ApiResult<Option<Vec<ReviewItem>>> {
            self.reviews.lock().unwrap().clone()
        }
    }

    pub fn dashboard(api: FakeApi) -> (Dashboard<MemoryDocument>, Arc<FakeApi>) {
        dashboard_with_width(api, 1280)
    }

    pub fn dashboard_with_width(
        api: FakeApi,
        width: u32,
    ) -> (Dashboard<MemoryDocument>, Arc<FakeApi>) {
        let api = Arc::new(api);
        let dashboard = Dashboard::new(
            api.clone(),
            MemoryDocument::cpa_page(width),
            UiConfig::default(),
        )
        .unwrap();
        (dashboard, api)
    }

    pub fn sample_insights(n: usize) -> Vec<Insight> {
        let categories = ["retirement", "deductions", "credits", "qbi", "investment"];
        (0..n)
            .map(|i| {
                Insight::new(
                    format!("ins-{}", i),
                    format!("Insight number {}", i),
                    categories[i % categories.len()],
                )
                .savings(1000.0 * (i as f64 + 1.0))
                .kind("opportunity")
            })
            .collect()
    }

    pub fn sample_clients() -> Vec<Client> {
        vec![
            Client::new("c1", "Dana Lee", "dana@leefamily.com")
                .savings(8200.0)
                .status("active"),
            Client::new("c2", "Omar Haddad", "omar@haddad.co")
                .savings(0.0)
                .status("pending"),
            Client::new("c3", "Clara Oswald", "clara@tardis.org")
                .savings(15_000.0)
                .status("active"),
        ]
    }
}

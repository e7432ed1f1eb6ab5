//! Data loaders: fetch → state → render for each view
//!
//! A loader never returns an error. Failures are logged and replaced by an
//! error placeholder in the loader's container; results that arrive after
//! the load was superseded are dropped.
//!
//! A result is checked against its ticket and applied under one state write
//! guard, which is held until the page has been written. Lock order is
//! always state, then page.

use chrono::Utc;

use super::{write_fragment, CategoryStats, Dashboard, LoadTicket, SessionState, View};
use crate::api::ApiResult;
use crate::dom::Document;
use crate::model::LeadStage;
use crate::render::{format_currency, format_number, messages};

/// Number of cards shown in the dashboard summary panels
const DASHBOARD_PREVIEW: usize = 5;

/// Where a fetched collection is shown and what to say when it can't be
struct Target {
    resource: &'static str,
    containers: Vec<String>,
    empty: &'static str,
    failed: &'static str,
}

impl Target {
    fn new(
        resource: &'static str,
        container: &str,
        empty: &'static str,
        failed: &'static str,
    ) -> Self {
        Self {
            resource,
            containers: vec![container.to_string()],
            empty,
            failed,
        }
    }
}

impl<D: Document + 'static> Dashboard<D> {
    async fn begin_load(&self, view: View) -> LoadTicket {
        self.inner.state.write().await.begin_load(view)
    }

    /// Apply a fetch result if `ticket` is still current
    ///
    /// Records go to `apply` together with the page. A missing collection
    /// shows the empty state and a failure shows the error state, both
    /// leaving session state untouched. Returns whether `apply` ran.
    async fn commit<T>(
        &self,
        ticket: &LoadTicket,
        result: ApiResult<Option<Vec<T>>>,
        target: &Target,
        apply: impl FnOnce(&mut SessionState, &mut D, Vec<T>),
    ) -> bool {
        let mut state = self.inner.state.write().await;
        if !state.is_current(ticket) {
            tracing::debug!(
                resource = target.resource,
                view = %ticket.view,
                generation = ticket.generation,
                "Discarding stale response"
            );
            return false;
        }

        let mut page = self.inner.page.lock().await;
        match result {
            Ok(Some(records)) => {
                apply(&mut *state, &mut *page, records);
                true
            }
            Ok(None) => {
                tracing::debug!(resource = target.resource, "Response carried no records");
                for id in &target.containers {
                    let fragment = self.inner.renderer.empty_state(target.empty);
                    write_fragment(&mut *page, id, fragment);
                }
                false
            }
            Err(e) => {
                tracing::error!(resource = target.resource, error = %e, "Failed to load");
                for id in &target.containers {
                    let fragment = self.inner.renderer.error_state(target.failed);
                    write_fragment(&mut *page, id, fragment);
                }
                false
            }
        }
    }

    // ============================================
    // Dashboard
    // ============================================

    /// Load insights and clients together for the dashboard summary
    pub async fn load_dashboard(&self) {
        let ticket = self.begin_load(View::Dashboard).await;
        self.paint_skeleton(&["top-insights", "high-value-clients"]).await;

        tokio::join!(
            self.load_dashboard_insights(&ticket),
            self.load_dashboard_clients(&ticket)
        );

        let mut state = self.inner.state.write().await;
        if !state.is_current(&ticket) {
            return;
        }
        state.recompute();

        let mut page = self.inner.page.lock().await;
        let totals = &state.totals;
        page.set_text("total-savings", &format_currency(totals.total_savings));
        page.set_text("total-clients", &format_number(totals.client_count as i64));
        page.set_text("total-insights", &format_number(totals.insight_count as i64));
        write_category_stats(&mut *page, &state.category_stats);
        set_badge(&mut *page, "insights-badge", state.insights.len());
        set_badge(&mut *page, "clients-badge", state.clients.len());
    }

    async fn load_dashboard_insights(&self, ticket: &LoadTicket) {
        let result = self.inner.api.fetch_insights().await;
        let target = Target::new(
            "insights",
            "top-insights",
            messages::NO_INSIGHTS,
            messages::INSIGHTS_FAILED,
        );
        let renderer = &self.inner.renderer;
        self.commit(ticket, result, &target, |state, page, insights| {
            state.insights = insights;
            let preview = state.insights.iter().take(DASHBOARD_PREVIEW);
            let html = renderer.insight_cards(preview, messages::NO_INSIGHTS);
            write_fragment(page, "top-insights", html);
        })
        .await;
    }

    async fn load_dashboard_clients(&self, ticket: &LoadTicket) {
        let result = self.inner.api.fetch_clients().await;
        let target = Target::new(
            "clients",
            "high-value-clients",
            messages::NO_HIGH_VALUE_CLIENTS,
            messages::CLIENTS_FAILED,
        );
        let renderer = &self.inner.renderer;
        self.commit(ticket, result, &target, |state, page, clients| {
            state.clients = clients;
            let html = renderer.high_value_clients(
                state.high_value_clients(DASHBOARD_PREVIEW),
                messages::NO_HIGH_VALUE_CLIENTS,
            );
            write_fragment(page, "high-value-clients", html);
        })
        .await;
    }

    // ============================================
    // Insights
    // ============================================

    pub async fn load_insights(&self) {
        let ticket = self.begin_load(View::Insights).await;
        self.paint_skeleton(&["insights-list"]).await;

        let result = self.inner.api.fetch_insights().await;
        let target = Target::new(
            "insights",
            "insights-list",
            messages::NO_INSIGHTS,
            messages::INSIGHTS_FAILED,
        );
        let renderer = &self.inner.renderer;
        self.commit(&ticket, result, &target, |state, page, insights| {
            state.insights = insights;
            let html = renderer.insight_cards(state.filtered_insights(), messages::NO_INSIGHTS);
            write_fragment(page, "insights-list", html);
            recount_categories(state, page);
            set_badge(page, "insights-badge", state.insights.len());
        })
        .await;
    }

    /// Recount insight categories from state and write the stat cards
    pub async fn update_category_stats(&self) -> CategoryStats {
        let mut state = self.inner.state.write().await;
        let mut page = self.inner.page.lock().await;
        recount_categories(&mut *state, &mut *page);
        state.category_stats.clone()
    }

    // ============================================
    // Clients
    // ============================================

    pub async fn load_clients(&self) {
        let ticket = self.begin_load(View::Clients).await;
        self.paint_skeleton(&["clients-list"]).await;

        let result = self.inner.api.fetch_clients().await;
        let target = Target::new(
            "clients",
            "clients-list",
            messages::NO_CLIENTS,
            messages::CLIENTS_FAILED,
        );
        let renderer = &self.inner.renderer;
        self.commit(&ticket, result, &target, |state, page, clients| {
            state.clients = clients;
            let html = renderer.client_rows(&state.clients, messages::NO_CLIENTS);
            write_fragment(page, "clients-list", html);
            set_badge(page, "clients-badge", state.clients.len());
        })
        .await;
    }

    // ============================================
    // Pipeline
    // ============================================

    pub async fn load_pipeline(&self) {
        let ticket = self.begin_load(View::Pipeline).await;
        let columns: Vec<String> = LeadStage::all()
            .iter()
            .map(|stage| format!("pipeline-{}", stage))
            .collect();
        let column_refs: Vec<&str> = columns.iter().map(String::as_str).collect();
        self.paint_skeleton(&column_refs).await;

        let result = self.inner.api.fetch_pipeline().await;
        let target = Target {
            resource: "pipeline",
            containers: columns,
            empty: messages::NO_LEADS,
            failed: messages::PIPELINE_FAILED,
        };
        let renderer = &self.inner.renderer;
        self.commit(&ticket, result, &target, |state, page, leads| {
            state.leads = leads;
            for stage in LeadStage::all() {
                let in_stage: Vec<_> = state.leads.iter().filter(|l| l.stage == *stage).collect();
                let html = renderer.lead_cards(in_stage.iter().copied(), messages::NO_LEADS);
                write_fragment(page, &format!("pipeline-{}", stage), html);
                page.set_text(
                    &format!("pipeline-{}-count", stage),
                    &format_number(in_stage.len() as i64),
                );
            }
            set_badge(page, "pipeline-badge", state.leads.len());
        })
        .await;
    }

    // ============================================
    // Review queue
    // ============================================

    pub async fn load_review_queue(&self) {
        let ticket = self.begin_load(View::Review).await;
        self.paint_skeleton(&["review-list"]).await;

        let result = self.inner.api.fetch_review_queue().await;
        let target = Target::new(
            "review queue",
            "review-list",
            messages::NO_REVIEWS,
            messages::REVIEWS_FAILED,
        );
        let renderer = &self.inner.renderer;
        self.commit(&ticket, result, &target, |state, page, items| {
            state.review_items = items;
            let html = renderer.review_items(&state.review_items, Utc::now(), messages::NO_REVIEWS);
            write_fragment(page, "review-list", html);
            set_badge(page, "review-badge", state.review_items.len());
        })
        .await;
    }
}

fn recount_categories<D: Document + ?Sized>(state: &mut SessionState, page: &mut D) {
    state.category_stats = CategoryStats::from_insights(&state.insights);
    write_category_stats(page, &state.category_stats);
}

fn write_category_stats<D: Document + ?Sized>(page: &mut D, stats: &CategoryStats) {
    for (category, count) in stats.iter() {
        page.set_text(&format!("{}-count", category), &count.to_string());
        page.set_text(&format!("{}-level", category), stats.level(category));
    }
}

fn set_badge<D: Document + ?Sized>(page: &mut D, id: &str, count: usize) {
    page.set_text(id, &format_number(count as i64));
}

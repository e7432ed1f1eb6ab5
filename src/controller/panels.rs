//! Detail panels for insights and clients
//!
//! Panels are filled from session state; opening one never re-fetches.

use super::{write_fragment, Dashboard};
use crate::dom::Document;

const PANEL_CLASS: &str = "detail-panel";
const OVERLAY: &str = "panel-overlay";
const OPEN: &str = "open";

impl<D: Document + 'static> Dashboard<D> {
    /// Show the insight `id` in the insight panel
    ///
    /// Returns `false` and leaves the page untouched if no loaded insight
    /// has that id.
    pub async fn open_insight_detail(&self, id: &str) -> bool {
        let (title, body) = {
            let mut state = self.inner.state.write().await;
            let Some(insight) = state.find_insight(id) else {
                tracing::debug!(insight = %id, "No loaded insight with this id");
                return false;
            };
            let rendered = (insight.title.clone(), self.inner.renderer.insight_detail(insight));
            state.selected_insight = Some(id.to_string());
            rendered
        };

        self.show_panel("insight-panel", &title, body).await;
        true
    }

    /// Show the client with lookup key `key` in the client panel
    pub async fn open_client_detail(&self, key: &str) -> bool {
        let (title, body) = {
            let state = self.inner.state.read().await;
            let Some(client) = state.find_client(key) else {
                tracing::debug!(client = %key, "No loaded client with this key");
                return false;
            };
            (client.name.clone(), self.inner.renderer.client_detail(client))
        };

        self.show_panel("client-panel", &title, body).await;
        true
    }

    /// Close every detail panel and forget the selected insight
    pub async fn close_panel(&self) {
        {
            let mut page = self.inner.page.lock().await;
            page.remove_class_from_all(PANEL_CLASS, OPEN);
            page.remove_class(OVERLAY, OPEN);
        }
        self.inner.state.write().await.selected_insight = None;
    }

    async fn show_panel(
        &self,
        panel: &str,
        title: &str,
        body: crate::render::RenderResult<String>,
    ) {
        let mut page = self.inner.page.lock().await;
        page.remove_class_from_all(PANEL_CLASS, OPEN);
        page.set_text(&format!("{}-title", panel), title);
        write_fragment(&mut *page, &format!("{}-body", panel), body);
        page.add_class(panel, OPEN);
        page.add_class(OVERLAY, OPEN);
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{dashboard, sample_clients, sample_insights, FakeApi};
    use super::*;
    use crate::model::Insight;

    async fn loaded() -> Dashboard<crate::dom::MemoryDocument> {
        let mut insights = sample_insights(3);
        insights.push(
            Insight::new("hostile", "<b>Bonus</b> depreciation", "deductions")
                .description("<b>Bonus</b> rules changed")
                .step("Review assets", "Placed in service \"this year\""),
        );
        let api = FakeApi::default()
            .with_insights(Ok(Some(insights)))
            .with_clients(Ok(Some(sample_clients())));
        let (dash, _) = dashboard(api);
        dash.load_dashboard().await;
        dash
    }

    #[tokio::test]
    async fn test_open_insight_detail() {
        let dash = loaded().await;

        assert!(dash.open_insight_detail("hostile").await);

        dash.with_page(|page| {
            assert!(page.has_class("insight-panel", OPEN));
            assert!(page.has_class(OVERLAY, OPEN));
            assert_eq!(
                page.text("insight-panel-title").as_deref(),
                Some("<b>Bonus</b> depreciation")
            );
            let body = page.inner_html("insight-panel-body").unwrap();
            assert!(body.contains("&lt;b&gt;Bonus&lt;"));
            assert!(body.contains("&quot;this year&quot;"));
        })
        .await;
        assert_eq!(dash.state().await.selected_insight.as_deref(), Some("hostile"));
    }

    #[tokio::test]
    async fn test_opening_client_closes_insight_panel() {
        let dash = loaded().await;
        dash.open_insight_detail("ins-0").await;

        assert!(dash.open_client_detail("c3").await);

        dash.with_page(|page| {
            assert!(!page.has_class("insight-panel", OPEN));
            assert!(page.has_class("client-panel", OPEN));
            assert_eq!(page.text("client-panel-title").as_deref(), Some("Clara Oswald"));
            assert!(page
                .inner_html("client-panel-body")
                .unwrap()
                .contains("clara@tardis.org"));
        })
        .await;
    }

    #[tokio::test]
    async fn test_unknown_client_is_noop() {
        let dash = loaded().await;
        dash.open_client_detail("c1").await;
        let before = dash
            .with_page(|page| {
                (
                    page.has_class("client-panel", OPEN),
                    page.inner_html("client-panel-body"),
                    page.text("client-panel-title"),
                )
            })
            .await;

        assert!(!dash.open_client_detail("does-not-exist").await);

        let after = dash
            .with_page(|page| {
                (
                    page.has_class("client-panel", OPEN),
                    page.inner_html("client-panel-body"),
                    page.text("client-panel-title"),
                )
            })
            .await;
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_unknown_insight_keeps_selection() {
        let dash = loaded().await;
        dash.open_insight_detail("ins-1").await;

        assert!(!dash.open_insight_detail("missing").await);
        assert_eq!(dash.state().await.selected_insight.as_deref(), Some("ins-1"));
    }

    #[tokio::test]
    async fn test_close_panel() {
        let dash = loaded().await;
        dash.open_insight_detail("ins-2").await;

        dash.close_panel().await;

        dash.with_page(|page| {
            assert!(page.ids_with_class(PANEL_CLASS).iter().all(|id| !page.has_class(id, OPEN)));
            assert!(!page.has_class(OVERLAY, OPEN));
        })
        .await;
        assert_eq!(dash.state().await.selected_insight, None);
    }
}

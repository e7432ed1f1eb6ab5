//! View router: section visibility, nav highlighting and the mobile sidebar

use super::{Dashboard, DashboardError, DashboardResult, View};
use crate::dom::{Document, ToastLevel};

const SECTION_CLASS: &str = "view-section";
const NAV_CLASS: &str = "nav-item";
const ACTIVE: &str = "active";

impl<D: Document + 'static> Dashboard<D> {
    /// Switch to the view called `name` and start its loader
    ///
    /// An unrecognized name leaves no section active, keeps the current
    /// view and runs no loader.
    pub async fn switch_view(&self, name: &str) -> DashboardResult<View> {
        let view = {
            let mut page = self.inner.page.lock().await;
            page.remove_class_from_all(SECTION_CLASS, ACTIVE);
            page.remove_class_from_all(NAV_CLASS, ACTIVE);

            let Some(view) = View::parse(name) else {
                tracing::warn!(view = %name, "Unknown view");
                return Err(DashboardError::UnknownView(name.to_string()));
            };

            page.add_class(&view.section_id(), ACTIVE);
            for nav in page.ids_with_class(NAV_CLASS) {
                if page.attribute(&nav, "data-view").as_deref() == Some(view.as_str()) {
                    page.add_class(&nav, ACTIVE);
                }
            }

            if page.viewport_width() <= self.inner.settings.mobile_breakpoint_px {
                page.remove_class("sidebar", "open");
                page.remove_class("mobile-overlay", "visible");
            }
            view
        };

        self.inner.state.write().await.current_view = view;
        tracing::debug!(view = %view, "Switched view");

        self.load_view(view).await;
        Ok(view)
    }

    /// Run the loader for `view`
    pub async fn load_view(&self, view: View) {
        match view {
            View::Dashboard => self.load_dashboard().await,
            View::Insights => self.load_insights().await,
            View::Clients => self.load_clients().await,
            View::Pipeline => self.load_pipeline().await,
            View::Review => self.load_review_queue().await,
        }
    }

    /// Reload the current view
    pub async fn refresh(&self) {
        let view = self.inner.state.read().await.current_view;
        self.inner
            .page
            .lock()
            .await
            .show_toast(ToastLevel::Info, "Refreshing data...");
        tracing::info!(view = %view, "Refreshing");
        self.load_view(view).await;
    }

    /// Open or close the mobile sidebar; returns whether it is now open
    pub async fn toggle_sidebar(&self) -> bool {
        let mut page = self.inner.page.lock().await;
        let open = page.toggle_class("sidebar", "open");
        if open {
            page.add_class("mobile-overlay", "visible");
        } else {
            page.remove_class("mobile-overlay", "visible");
        }
        open
    }
}

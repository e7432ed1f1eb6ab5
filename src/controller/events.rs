//! Keyboard shortcuts, `data-action` dispatch and the insight filter

use super::{Dashboard, DashboardError, DashboardResult};
use crate::dom::Document;
use crate::model::TaxCategory;
use crate::render::messages;

/// A keydown event as seen by the page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    /// Builder method: hold Ctrl
    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    /// Builder method: hold Cmd
    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }
}

/// Actions carried by `data-action` attributes in rendered fragments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SwitchView,
    OpenInsight,
    OpenClient,
    ClosePanel,
    OpenPalette,
    ClosePalette,
    PaletteCommand,
    PaletteClient,
    Refresh,
    FilterInsights,
    ToggleSidebar,
}

impl Action {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "switch-view" => Some(Action::SwitchView),
            "open-insight" => Some(Action::OpenInsight),
            "open-client" => Some(Action::OpenClient),
            "close-panel" => Some(Action::ClosePanel),
            "open-palette" => Some(Action::OpenPalette),
            "close-palette" => Some(Action::ClosePalette),
            "palette-command" => Some(Action::PaletteCommand),
            "palette-client" => Some(Action::PaletteClient),
            "refresh" => Some(Action::Refresh),
            "filter-insights" => Some(Action::FilterInsights),
            "toggle-sidebar" => Some(Action::ToggleSidebar),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::SwitchView => "switch-view",
            Action::OpenInsight => "open-insight",
            Action::OpenClient => "open-client",
            Action::ClosePanel => "close-panel",
            Action::OpenPalette => "open-palette",
            Action::ClosePalette => "close-palette",
            Action::PaletteCommand => "palette-command",
            Action::PaletteClient => "palette-client",
            Action::Refresh => "refresh",
            Action::FilterInsights => "filter-insights",
            Action::ToggleSidebar => "toggle-sidebar",
        }
    }
}

impl<D: Document + 'static> Dashboard<D> {
    /// Handle a global keydown; returns whether the key was consumed
    ///
    /// Escape closes the palette when it is open and the detail panels
    /// otherwise. Ctrl+K or Cmd+K opens the palette.
    pub async fn handle_key(&self, event: &KeyEvent) -> bool {
        if event.key == "Escape" {
            if self.inner.state.read().await.palette.is_open() {
                self.close_palette().await;
            } else {
                self.close_panel().await;
            }
            return true;
        }

        if (event.ctrl || event.meta) && event.key.eq_ignore_ascii_case("k") {
            self.open_palette().await;
            return true;
        }

        false
    }

    /// Run the controller operation named by a `data-action` attribute
    ///
    /// `arg` is the element's `data-id` (or `data-view`/`data-category`).
    /// Unknown actions are logged and ignored.
    pub async fn dispatch_action(&self, action: &str, arg: Option<&str>) -> DashboardResult<()> {
        let Some(parsed) = Action::parse(action) else {
            tracing::warn!(action = %action, "Ignoring unknown action");
            return Ok(());
        };
        let required = || {
            arg.ok_or_else(|| DashboardError::MissingArgument(parsed.as_str().to_string()))
        };

        match parsed {
            Action::SwitchView => {
                self.switch_view(required()?).await?;
            }
            Action::OpenInsight => {
                self.open_insight_detail(required()?).await;
            }
            Action::OpenClient => {
                self.open_client_detail(required()?).await;
            }
            Action::ClosePanel => self.close_panel().await,
            Action::OpenPalette => self.open_palette().await,
            Action::ClosePalette => self.close_palette().await,
            Action::PaletteCommand => {
                self.execute_palette_command(required()?).await?;
            }
            Action::PaletteClient => {
                self.select_palette_client(required()?).await;
            }
            Action::Refresh => self.refresh().await,
            Action::FilterInsights => {
                self.filter_insights(arg.unwrap_or("all")).await;
            }
            Action::ToggleSidebar => {
                self.toggle_sidebar().await;
            }
        }
        Ok(())
    }

    /// Restrict the insights list to one category (`all` clears the filter)
    ///
    /// Re-renders from state without fetching. Returns `false` for an
    /// unknown category.
    pub async fn filter_insights(&self, category: &str) -> bool {
        let filter = if category == "all" {
            None
        } else {
            match TaxCategory::parse(category) {
                Some(c) => Some(c),
                None => {
                    tracing::warn!(category = %category, "Unknown insight category");
                    return false;
                }
            }
        };

        let html = {
            let mut state = self.inner.state.write().await;
            state.insight_filter = filter;
            self.inner
                .renderer
                .insight_cards(state.filtered_insights(), messages::NO_INSIGHTS)
        };

        {
            let mut page = self.inner.page.lock().await;
            let selected = filter.map(|c| c.as_str()).unwrap_or("all");
            for chip in page.ids_with_class("filter-chip") {
                if page.attribute(&chip, "data-category").as_deref() == Some(selected) {
                    page.add_class(&chip, "active");
                } else {
                    page.remove_class(&chip, "active");
                }
            }
        }

        self.paint("insights-list", html).await;
        true
    }
}

//! Command palette
//!
//! Closed → open (trigger or Ctrl/Cmd+K) → closed (Escape, explicit close,
//! or after running a selection). While open, keystrokes are debounced and
//! only the latest one filters.

use std::sync::atomic::Ordering;
use std::time::Duration;

use super::{Dashboard, DashboardResult, PaletteState, View};
use crate::dom::Document;
use crate::model::Client;
use crate::render::{messages, CommandView};

const PALETTE: &str = "command-palette";
const INPUT: &str = "palette-input";
const RESULTS: &str = "palette-results";

/// Maximum clients listed in palette results
pub const MAX_CLIENT_MATCHES: usize = 5;

/// What a palette command does when selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandAction {
    SwitchView(View),
    Refresh,
}

/// A static palette entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteCommand {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub action: CommandAction,
}

impl PaletteCommand {
    fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }

    fn view(&self) -> CommandView {
        CommandView {
            id: self.id,
            title: self.title,
            description: self.description,
            icon: self.icon,
        }
    }
}

pub const COMMANDS: &[PaletteCommand] = &[
    PaletteCommand {
        id: "go-dashboard",
        title: "Go to Dashboard",
        description: "Summary of savings and top opportunities",
        icon: "layout-dashboard",
        action: CommandAction::SwitchView(View::Dashboard),
    },
    PaletteCommand {
        id: "go-insights",
        title: "Go to Insights",
        description: "Browse tax-savings opportunities",
        icon: "lightbulb",
        action: CommandAction::SwitchView(View::Insights),
    },
    PaletteCommand {
        id: "go-clients",
        title: "Go to Clients",
        description: "View all clients",
        icon: "users",
        action: CommandAction::SwitchView(View::Clients),
    },
    PaletteCommand {
        id: "go-pipeline",
        title: "Go to Pipeline",
        description: "Track leads through the funnel",
        icon: "git-branch",
        action: CommandAction::SwitchView(View::Pipeline),
    },
    PaletteCommand {
        id: "go-review",
        title: "Go to Review Queue",
        description: "Returns awaiting sign-off",
        icon: "check-square",
        action: CommandAction::SwitchView(View::Review),
    },
    PaletteCommand {
        id: "refresh",
        title: "Refresh Data",
        description: "Reload the current view",
        icon: "refresh-cw",
        action: CommandAction::Refresh,
    },
];

/// Result of filtering the palette
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteMatches<'a> {
    pub commands: Vec<&'static PaletteCommand>,
    pub clients: Vec<&'a Client>,
}

impl PaletteMatches<'_> {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.clients.is_empty()
    }
}

/// Case-insensitive substring filter over commands and clients
///
/// An empty query lists every command and no clients.
pub fn filter_palette<'a>(query: &str, clients: &'a [Client]) -> PaletteMatches<'a> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return PaletteMatches {
            commands: COMMANDS.iter().collect(),
            clients: Vec::new(),
        };
    }

    PaletteMatches {
        commands: COMMANDS.iter().filter(|c| c.matches(&needle)).collect(),
        clients: clients
            .iter()
            .filter(|c| {
                c.name.to_lowercase().contains(&needle) || c.email.to_lowercase().contains(&needle)
            })
            .take(MAX_CLIENT_MATCHES)
            .collect(),
    }
}

impl<D: Document + 'static> Dashboard<D> {
    /// Open the palette with an empty query and the full command list
    pub async fn open_palette(&self) {
        self.inner.palette_seq.fetch_add(1, Ordering::SeqCst);
        self.inner.state.write().await.palette = PaletteState::Open {
            query: String::new(),
        };
        {
            let mut page = self.inner.page.lock().await;
            page.add_class(PALETTE, "open");
            page.set_value(INPUT, "");
            page.focus(INPUT);
        }
        self.search_palette("").await;
    }

    pub async fn close_palette(&self) {
        self.inner.palette_seq.fetch_add(1, Ordering::SeqCst);
        self.inner.state.write().await.palette = PaletteState::Closed;
        self.inner.page.lock().await.remove_class(PALETTE, "open");
    }

    /// Filter immediately and render the results
    pub async fn search_palette(&self, query: &str) {
        let html = {
            let mut state = self.inner.state.write().await;
            if let PaletteState::Open { query: current } = &mut state.palette {
                *current = query.to_string();
            }
            let matches = filter_palette(query, &state.clients);
            let commands: Vec<CommandView> = matches.commands.iter().map(|c| c.view()).collect();
            self.inner
                .renderer
                .palette_results(&commands, matches.clients, messages::NO_RESULTS)
        };
        self.paint(RESULTS, html).await;
    }

    /// Handle a keystroke in the palette input
    ///
    /// Waits out the debounce window; returns `true` if this keystroke was
    /// still the latest and the results were refreshed.
    pub async fn palette_input(&self, query: &str) -> bool {
        let seq = self.inner.palette_seq.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(Duration::from_millis(self.inner.settings.palette_debounce_ms)).await;

        if self.inner.palette_seq.load(Ordering::SeqCst) != seq {
            tracing::trace!(query = %query, "Superseded palette input");
            return false;
        }
        if !self.inner.state.read().await.palette.is_open() {
            return false;
        }
        self.search_palette(query).await;
        true
    }

    /// Run the command `id`; returns `false` for an unknown command
    pub async fn execute_palette_command(&self, id: &str) -> DashboardResult<bool> {
        let Some(command) = COMMANDS.iter().find(|c| c.id == id) else {
            tracing::warn!(command = %id, "Unknown palette command");
            return Ok(false);
        };

        self.close_palette().await;
        match command.action {
            CommandAction::SwitchView(view) => {
                self.switch_view(view.as_str()).await?;
            }
            CommandAction::Refresh => self.refresh().await,
        }
        Ok(true)
    }

    /// Close the palette and open the client's detail panel
    pub async fn select_palette_client(&self, key: &str) -> bool {
        self.close_palette().await;
        self.open_client_detail(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{dashboard, sample_clients, FakeApi};
    use super::*;

    fn clients(n: usize) -> Vec<Client> {
        (0..n)
            .map(|i| Client::new(format!("k{}", i), format!("Kim Number{}", i), "kim@example.com"))
            .collect()
    }

    #[test]
    fn test_empty_query_lists_all_commands() {
        let all = clients(3);
        let matches = filter_palette("", &all);
        assert_eq!(matches.commands.len(), COMMANDS.len());
        assert!(matches.clients.is_empty());

        let matches = filter_palette("   ", &all);
        assert_eq!(matches.commands.len(), COMMANDS.len());
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let all = sample_clients();
        let matches = filter_palette("CLIENTS", &all);
        assert_eq!(matches.commands.len(), 1);
        assert_eq!(matches.commands[0].id, "go-clients");

        let matches = filter_palette("TARDIS", &all);
        assert!(matches.commands.is_empty());
        assert_eq!(matches.clients.len(), 1);
        assert_eq!(matches.clients[0].name, "Clara Oswald");
    }

    #[test]
    fn test_filter_matches_description() {
        let matches = filter_palette("sign-off", &[]);
        assert_eq!(matches.commands.len(), 1);
        assert_eq!(matches.commands[0].id, "go-review");
    }

    #[test]
    fn test_client_matches_capped() {
        let all = clients(8);
        let matches = filter_palette("kim", &all);
        assert_eq!(matches.clients.len(), MAX_CLIENT_MATCHES);
        assert_eq!(matches.clients[0].key(), Some("k0"));
    }

    #[test]
    fn test_no_matches() {
        let all = sample_clients();
        assert!(filter_palette("zzzz", &all).is_empty());
    }

    async fn loaded() -> Dashboard<crate::dom::MemoryDocument> {
        let api = FakeApi::default().with_clients(Ok(Some(sample_clients())));
        let (dash, _) = dashboard(api);
        dash.switch_view("clients").await.unwrap();
        dash
    }

    #[tokio::test]
    async fn test_open_palette_shows_commands() {
        let dash = loaded().await;

        dash.open_palette().await;

        assert!(dash.state().await.palette.is_open());
        dash.with_page(|page| {
            assert!(page.has_class(PALETTE, "open"));
            assert_eq!(page.focused(), Some(INPUT));
            assert_eq!(page.value(INPUT).as_deref(), Some(""));
            let html = page.inner_html(RESULTS).unwrap();
            assert_eq!(html.matches("data-action=\"palette-command\"").count(), COMMANDS.len());
            assert!(!html.contains("palette-client"));
        })
        .await;
    }

    #[tokio::test]
    async fn test_search_with_no_matches() {
        let dash = loaded().await;
        dash.open_palette().await;

        dash.search_palette("nothing matches this").await;

        let html = dash.with_page(|p| p.inner_html(RESULTS).unwrap()).await;
        assert!(html.contains(messages::NO_RESULTS));
        assert_eq!(
            dash.state().await.palette,
            PaletteState::Open {
                query: "nothing matches this".to_string()
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_latest_keystroke_filters() {
        let dash = loaded().await;
        dash.open_palette().await;

        let (first, second) = tokio::join!(dash.palette_input("d"), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            dash.palette_input("dana").await
        });

        assert!(!first);
        assert!(second);
        let html = dash.with_page(|p| p.inner_html(RESULTS).unwrap()).await;
        assert!(html.contains("Dana Lee"));
        assert!(!html.contains("Go to Dashboard"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_input_ignored_when_closed() {
        let dash = loaded().await;
        assert!(!dash.palette_input("dana").await);
    }

    #[tokio::test]
    async fn test_execute_command_switches_view() {
        let dash = loaded().await;
        dash.open_palette().await;

        assert!(dash.execute_palette_command("go-pipeline").await.unwrap());

        assert!(!dash.state().await.palette.is_open());
        assert_eq!(dash.state().await.current_view, View::Pipeline);
        dash.with_page(|page| {
            assert!(!page.has_class(PALETTE, "open"));
            assert!(page.has_class("view-pipeline", "active"));
        })
        .await;
    }

    #[tokio::test]
    async fn test_execute_refresh_command() {
        let api = FakeApi::default().with_clients(Ok(Some(sample_clients())));
        let (dash, api) = dashboard(api);
        dash.switch_view("clients").await.unwrap();

        assert!(dash.execute_palette_command("refresh").await.unwrap());
        assert_eq!(api.client_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let dash = loaded().await;
        assert!(!dash.execute_palette_command("launch-rockets").await.unwrap());
    }

    #[tokio::test]
    async fn test_select_client_opens_detail() {
        let dash = loaded().await;
        dash.open_palette().await;

        assert!(dash.select_palette_client("c1").await);

        dash.with_page(|page| {
            assert!(!page.has_class(PALETTE, "open"));
            assert!(page.has_class("client-panel", "open"));
        })
        .await;
    }
}

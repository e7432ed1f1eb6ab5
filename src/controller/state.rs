//! Session State
//!
//! The single record the controller owns for the lifetime of a page:
//! current view, last-fetched collections, the selected insight, derived
//! totals and category counts, and per-view load generations used to
//! discard stale responses.

use std::collections::{BTreeMap, HashMap};

use crate::model::{Client, Insight, Lead, ReviewItem, TaxCategory};

/// Dashboard views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    #[default]
    Dashboard,
    Insights,
    Clients,
    Pipeline,
    Review,
}

impl View {
    pub fn all() -> &'static [View] {
        &[
            View::Dashboard,
            View::Insights,
            View::Clients,
            View::Pipeline,
            View::Review,
        ]
    }

    /// Parse a view name as used in `data-view` attributes
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "dashboard" => Some(View::Dashboard),
            "insights" => Some(View::Insights),
            "clients" => Some(View::Clients),
            "pipeline" => Some(View::Pipeline),
            "review" => Some(View::Review),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            View::Dashboard => "dashboard",
            View::Insights => "insights",
            View::Clients => "clients",
            View::Pipeline => "pipeline",
            View::Review => "review",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Insights => "Insights",
            View::Clients => "Clients",
            View::Pipeline => "Pipeline",
            View::Review => "Review Queue",
        }
    }

    /// Id of the section element for this view
    pub fn section_id(&self) -> String {
        format!("view-{}", self.as_str())
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Level label for a category count
///
/// 0 → `—`, 1-2 → `Low`, 3-5 → `Medium`, more → `High`.
pub fn category_level(count: usize) -> &'static str {
    match count {
        0 => "—",
        1..=2 => "Low",
        3..=5 => "Medium",
        _ => "High",
    }
}

/// Insight counts for the five fixed categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryStats {
    counts: BTreeMap<TaxCategory, usize>,
}

impl Default for CategoryStats {
    fn default() -> Self {
        Self {
            counts: TaxCategory::all().iter().map(|c| (*c, 0)).collect(),
        }
    }
}

impl CategoryStats {
    /// Count insights per category; unrecognized categories are ignored
    pub fn from_insights(insights: &[Insight]) -> Self {
        let mut stats = Self::default();
        for category in insights.iter().filter_map(Insight::tax_category) {
            *stats.counts.entry(category).or_insert(0) += 1;
        }
        stats
    }

    pub fn count(&self, category: TaxCategory) -> usize {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    pub fn level(&self, category: TaxCategory) -> &'static str {
        category_level(self.count(category))
    }

    /// `(category, count)` pairs in fixed category order
    pub fn iter(&self) -> impl Iterator<Item = (TaxCategory, usize)> + '_ {
        self.counts.iter().map(|(c, n)| (*c, *n))
    }
}

/// Aggregate figures shown on the dashboard
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardTotals {
    pub total_savings: f64,
    pub insight_count: usize,
    pub client_count: usize,
}

/// Proof that a load was started; checked before its result is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub view: View,
    pub generation: u64,
}

/// State of the command palette
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PaletteState {
    #[default]
    Closed,
    Open { query: String },
}

impl PaletteState {
    pub fn is_open(&self) -> bool {
        matches!(self, PaletteState::Open { .. })
    }
}

/// Everything the controller remembers between events
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub current_view: View,
    pub insights: Vec<Insight>,
    pub clients: Vec<Client>,
    pub leads: Vec<Lead>,
    pub review_items: Vec<ReviewItem>,
    pub selected_insight: Option<String>,
    pub totals: DashboardTotals,
    pub category_stats: CategoryStats,
    /// `None` shows every category
    pub insight_filter: Option<TaxCategory>,
    pub palette: PaletteState,
    generations: HashMap<View, u64>,
}

impl SessionState {
    /// Start a load for `view`, superseding any load already in flight
    pub fn begin_load(&mut self, view: View) -> LoadTicket {
        let generation = self.generations.entry(view).or_insert(0);
        *generation += 1;
        LoadTicket {
            view,
            generation: *generation,
        }
    }

    /// Whether a load's result should still be applied
    ///
    /// False once a newer load of the same view started or the user left
    /// the view.
    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        self.current_view == ticket.view
            && self.generations.get(&ticket.view).copied() == Some(ticket.generation)
    }

    pub fn find_insight(&self, id: &str) -> Option<&Insight> {
        self.insights.iter().find(|i| i.id == id)
    }

    pub fn find_client(&self, key: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.key() == Some(key))
    }

    /// Insights matching the active category filter, in received order
    pub fn filtered_insights(&self) -> Vec<&Insight> {
        match self.insight_filter {
            None => self.insights.iter().collect(),
            Some(category) => self
                .insights
                .iter()
                .filter(|i| i.tax_category() == Some(category))
                .collect(),
        }
    }

    /// Top clients by potential savings, highest first
    pub fn high_value_clients(&self, limit: usize) -> Vec<&Client> {
        let mut clients: Vec<&Client> = self
            .clients
            .iter()
            .filter(|c| c.potential_savings > 0.0)
            .collect();
        clients.sort_by(|a, b| b.potential_savings.total_cmp(&a.potential_savings));
        clients.truncate(limit);
        clients
    }

    /// Recompute totals and category stats from the current collections
    pub fn recompute(&mut self) {
        self.totals = DashboardTotals {
            total_savings: self.insights.iter().map(|i| i.potential_savings).sum(),
            insight_count: self.insights.len(),
            client_count: self.clients.len(),
        };
        self.category_stats = CategoryStats::from_insights(&self.insights);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_parse_roundtrip() {
        for view in View::all() {
            assert_eq!(View::parse(view.as_str()), Some(*view));
        }
        assert_eq!(View::parse("settings"), None);
        assert_eq!(View::parse("Dashboard"), None);
        assert_eq!(View::Review.section_id(), "view-review");
        assert_eq!(View::Review.label(), "Review Queue");
    }

    #[test]
    fn test_category_stats_counts_and_levels() {
        let insights = vec![
            Insight::new("1", "a", "retirement"),
            Insight::new("2", "b", "retirement"),
            Insight::new("3", "c", "deductions"),
        ];
        let stats = CategoryStats::from_insights(&insights);

        assert_eq!(stats.count(TaxCategory::Retirement), 2);
        assert_eq!(stats.count(TaxCategory::Deductions), 1);
        assert_eq!(stats.count(TaxCategory::Credits), 0);
        assert_eq!(stats.count(TaxCategory::Qbi), 0);
        assert_eq!(stats.count(TaxCategory::Investment), 0);

        assert_eq!(stats.level(TaxCategory::Retirement), "Low");
        assert_eq!(stats.level(TaxCategory::Deductions), "Low");
        assert_eq!(stats.level(TaxCategory::Credits), "—");
        assert_eq!(stats.iter().count(), 5);
    }

    #[test]
    fn test_category_level_thresholds() {
        assert_eq!(category_level(0), "—");
        assert_eq!(category_level(2), "Low");
        assert_eq!(category_level(3), "Medium");
        assert_eq!(category_level(5), "Medium");
        assert_eq!(category_level(6), "High");
    }

    #[test]
    fn test_unknown_categories_ignored() {
        let insights = vec![Insight::new("1", "a", "estate"), Insight::new("2", "b", "QBI")];
        let stats = CategoryStats::from_insights(&insights);
        assert_eq!(stats.count(TaxCategory::Qbi), 1);
        assert_eq!(stats.iter().map(|(_, n)| n).sum::<usize>(), 1);
    }

    #[test]
    fn test_newer_load_supersedes_older() {
        let mut state = SessionState::default();
        state.current_view = View::Insights;

        let first = state.begin_load(View::Insights);
        assert!(state.is_current(&first));

        let second = state.begin_load(View::Insights);
        assert!(!state.is_current(&first));
        assert!(state.is_current(&second));
    }

    #[test]
    fn test_leaving_view_invalidates_ticket() {
        let mut state = SessionState::default();
        state.current_view = View::Clients;
        let ticket = state.begin_load(View::Clients);

        state.current_view = View::Pipeline;
        assert!(!state.is_current(&ticket));
    }

    #[test]
    fn test_high_value_clients_sorted() {
        let mut state = SessionState::default();
        state.clients = vec![
            Client::new("a", "A", "a@x.com").savings(100.0),
            Client::new("b", "B", "b@x.com"),
            Client::new("c", "C", "c@x.com").savings(900.0),
            Client::new("d", "D", "d@x.com").savings(500.0),
        ];

        let top: Vec<&str> = state
            .high_value_clients(2)
            .into_iter()
            .filter_map(|c| c.key())
            .collect();
        assert_eq!(top, vec!["c", "d"]);
    }

    #[test]
    fn test_filtered_insights() {
        let mut state = SessionState::default();
        state.insights = vec![
            Insight::new("1", "a", "credits"),
            Insight::new("2", "b", "qbi"),
            Insight::new("3", "c", "credits"),
        ];

        assert_eq!(state.filtered_insights().len(), 3);
        state.insight_filter = Some(TaxCategory::Credits);
        let ids: Vec<&str> = state.filtered_insights().into_iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_recompute_totals() {
        let mut state = SessionState::default();
        state.insights = vec![
            Insight::new("1", "a", "credits").savings(1000.0),
            Insight::new("2", "b", "qbi").savings(250.5),
        ];
        state.clients = vec![Client::new("c", "C", "c@x.com")];

        state.recompute();
        assert_eq!(state.totals.total_savings, 1250.5);
        assert_eq!(state.totals.insight_count, 2);
        assert_eq!(state.totals.client_count, 1);
        assert_eq!(state.category_stats.count(TaxCategory::Credits), 1);
    }
}

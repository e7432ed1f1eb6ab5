//! Template Renderer
//!
//! Typed view-models rendered through minijinja. Every template is
//! registered with HTML auto-escaping, so record text can never inject
//! markup.

use chrono::{DateTime, Utc};
use minijinja::{context, AutoEscape, Environment};
use serde::Serialize;
use thiserror::Error;

use super::format::{format_currency, format_relative_time};
use super::tokens::{
    category_icon, client_status_class, initials, insight_type_class, priority_class,
    value_tier_class,
};
use crate::model::{Client, Insight, Lead, ReviewItem};

const TEMPLATES: &[(&str, &str)] = &[
    ("empty_state.html", include_str!("../../templates/empty_state.html")),
    ("error_state.html", include_str!("../../templates/error_state.html")),
    ("skeleton.html", include_str!("../../templates/skeleton.html")),
    ("insight_cards.html", include_str!("../../templates/insight_cards.html")),
    ("high_value_clients.html", include_str!("../../templates/high_value_clients.html")),
    ("client_rows.html", include_str!("../../templates/client_rows.html")),
    ("lead_cards.html", include_str!("../../templates/lead_cards.html")),
    ("review_items.html", include_str!("../../templates/review_items.html")),
    ("insight_detail.html", include_str!("../../templates/insight_detail.html")),
    ("client_detail.html", include_str!("../../templates/client_detail.html")),
    ("palette_results.html", include_str!("../../templates/palette_results.html")),
];

/// Errors raised while rendering a fragment
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

/// Result type alias for render operations
pub type RenderResult<T> = Result<T, RenderError>;

// ============================================
// View models
// ============================================

#[derive(Debug, Serialize)]
struct InsightView<'a> {
    id: &'a str,
    title: &'a str,
    description: &'a str,
    category: &'a str,
    kind: &'a str,
    icon: &'static str,
    type_class: &'static str,
    potential_savings: f64,
    irs_reference: Option<&'a str>,
    reviewed: bool,
    steps: Vec<StepView<'a>>,
}

#[derive(Debug, Serialize)]
struct StepView<'a> {
    title: &'a str,
    description: &'a str,
}

impl<'a> From<&'a Insight> for InsightView<'a> {
    fn from(insight: &'a Insight) -> Self {
        Self {
            id: &insight.id,
            title: &insight.title,
            description: &insight.description,
            category: &insight.category,
            kind: &insight.kind,
            icon: category_icon(&insight.category),
            type_class: insight_type_class(&insight.kind),
            potential_savings: insight.potential_savings,
            irs_reference: insight.irs_reference.as_deref().filter(|r| !r.is_empty()),
            reviewed: insight.is_reviewed(),
            steps: insight
                .action_steps
                .iter()
                .flatten()
                .map(|step| StepView {
                    title: &step.title,
                    description: &step.description,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ClientView<'a> {
    key: &'a str,
    name: &'a str,
    email: &'a str,
    phone: Option<&'a str>,
    status: &'a str,
    status_class: &'static str,
    complexity: &'a str,
    potential_savings: f64,
    initials: String,
}

impl<'a> From<&'a Client> for ClientView<'a> {
    fn from(client: &'a Client) -> Self {
        Self {
            key: client.key().unwrap_or_default(),
            name: &client.name,
            email: &client.email,
            phone: client.phone.as_deref().filter(|p| !p.is_empty()),
            status: &client.status,
            status_class: client_status_class(&client.status),
            complexity: &client.complexity,
            potential_savings: client.potential_savings,
            initials: initials(&client.name),
        }
    }
}

#[derive(Debug, Serialize)]
struct LeadView<'a> {
    id: &'a str,
    name: &'a str,
    source: &'a str,
    value_tier: &'a str,
    tier_class: &'static str,
    potential_savings: f64,
}

impl<'a> From<&'a Lead> for LeadView<'a> {
    fn from(lead: &'a Lead) -> Self {
        Self {
            id: &lead.id,
            name: &lead.name,
            source: &lead.source,
            value_tier: &lead.value_tier,
            tier_class: value_tier_class(&lead.value_tier),
            potential_savings: lead.potential_savings,
        }
    }
}

#[derive(Debug, Serialize)]
struct ReviewView<'a> {
    id: &'a str,
    client_name: &'a str,
    kind: &'a str,
    priority: &'a str,
    priority_class: &'static str,
    submitted: String,
}

/// A command palette entry as shown to the user
#[derive(Debug, Clone, Serialize)]
pub struct CommandView {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

// ============================================
// Renderer
// ============================================

/// Renders dashboard fragments from records
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    /// Build the template environment
    pub fn new() -> RenderResult<Self> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        env.add_filter("currency", format_currency);

        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }

        Ok(Self { env })
    }

    fn render<S: Serialize>(&self, name: &str, ctx: S) -> RenderResult<String> {
        Ok(self.env.get_template(name)?.render(ctx)?)
    }

    /// Fixed empty-state fragment with a caller-supplied message
    pub fn empty_state(&self, message: &str) -> RenderResult<String> {
        self.render("empty_state.html", context! { message => message, icon => "inbox" })
    }

    /// Error placeholder shown when a load fails
    pub fn error_state(&self, message: &str) -> RenderResult<String> {
        self.render("error_state.html", context! { message => message })
    }

    /// `count` skeleton cards shown while loading
    pub fn skeleton(&self, count: usize) -> RenderResult<String> {
        self.render("skeleton.html", context! { count => count })
    }

    pub fn insight_cards<'a, I>(&self, insights: I, empty_message: &str) -> RenderResult<String>
    where
        I: IntoIterator<Item = &'a Insight>,
    {
        let views: Vec<InsightView<'_>> = insights.into_iter().map(InsightView::from).collect();
        if views.is_empty() {
            return self.empty_state(empty_message);
        }
        self.render("insight_cards.html", context! { insights => views })
    }

    pub fn high_value_clients<'a, I>(&self, clients: I, empty_message: &str) -> RenderResult<String>
    where
        I: IntoIterator<Item = &'a Client>,
    {
        let views: Vec<ClientView<'_>> = clients.into_iter().map(ClientView::from).collect();
        if views.is_empty() {
            return self.empty_state(empty_message);
        }
        self.render("high_value_clients.html", context! { clients => views })
    }

    pub fn client_rows<'a, I>(&self, clients: I, empty_message: &str) -> RenderResult<String>
    where
        I: IntoIterator<Item = &'a Client>,
    {
        let views: Vec<ClientView<'_>> = clients.into_iter().map(ClientView::from).collect();
        if views.is_empty() {
            return self.empty_state(empty_message);
        }
        self.render("client_rows.html", context! { clients => views })
    }

    pub fn lead_cards<'a, I>(&self, leads: I, empty_message: &str) -> RenderResult<String>
    where
        I: IntoIterator<Item = &'a Lead>,
    {
        let views: Vec<LeadView<'_>> = leads.into_iter().map(LeadView::from).collect();
        if views.is_empty() {
            return self.empty_state(empty_message);
        }
        self.render("lead_cards.html", context! { leads => views })
    }

    pub fn review_items<'a, I>(
        &self,
        items: I,
        now: DateTime<Utc>,
        empty_message: &str,
    ) -> RenderResult<String>
    where
        I: IntoIterator<Item = &'a ReviewItem>,
    {
        let views: Vec<ReviewView<'_>> = items
            .into_iter()
            .map(|item| ReviewView {
                id: &item.id,
                client_name: &item.client_name,
                kind: &item.kind,
                priority: &item.priority,
                priority_class: priority_class(&item.priority),
                submitted: item
                    .submitted_at
                    .map(|ts| format_relative_time(ts, now))
                    .unwrap_or_else(|| "—".to_string()),
            })
            .collect();
        if views.is_empty() {
            return self.empty_state(empty_message);
        }
        self.render("review_items.html", context! { items => views })
    }

    pub fn insight_detail(&self, insight: &Insight) -> RenderResult<String> {
        self.render(
            "insight_detail.html",
            context! { insight => InsightView::from(insight) },
        )
    }

    pub fn client_detail(&self, client: &Client) -> RenderResult<String> {
        self.render(
            "client_detail.html",
            context! { client => ClientView::from(client) },
        )
    }

    /// Palette results, or the fixed "no results" fragment when both lists are empty
    pub fn palette_results<'a, I>(
        &self,
        commands: &[CommandView],
        clients: I,
        no_results_message: &str,
    ) -> RenderResult<String>
    where
        I: IntoIterator<Item = &'a Client>,
    {
        let clients: Vec<ClientView<'_>> = clients.into_iter().map(ClientView::from).collect();
        if commands.is_empty() && clients.is_empty() {
            return self.empty_state(no_results_message);
        }
        self.render(
            "palette_results.html",
            context! { commands => commands, clients => clients },
        )
    }
}

//! Dashboard Renderers
//!
//! Pure mapping from fetched records to HTML fragments:
//!
//! - **format**: currency, count and relative-time formatters
//! - **tokens**: lookup tables from record values to icon/class tokens
//! - **templates**: auto-escaping minijinja templates over typed view-models

pub mod format;
pub mod templates;
pub mod tokens;

pub use format::{format_currency, format_number, format_relative_time};
pub use templates::{CommandView, RenderError, RenderResult, Renderer};

/// Fixed empty-state and error messages
pub mod messages {
    pub const NO_INSIGHTS: &str = "No insights found";
    pub const NO_CLIENTS: &str = "No clients yet";
    pub const NO_HIGH_VALUE_CLIENTS: &str = "No high-value clients yet";
    pub const NO_LEADS: &str = "No leads in this stage";
    pub const NO_REVIEWS: &str = "Review queue is empty";
    pub const NO_RESULTS: &str = "No results found";

    pub const INSIGHTS_FAILED: &str = "Failed to load insights";
    pub const CLIENTS_FAILED: &str = "Failed to load clients";
    pub const PIPELINE_FAILED: &str = "Failed to load pipeline";
    pub const REVIEWS_FAILED: &str = "Failed to load review queue";
}

//! Core record types for the CPA dashboard
//!
//! These mirror the JSON returned by the `/api/cpa/*` endpoints:
//! - `Insight`: a detected tax-savings opportunity
//! - `Client`: a client of the preparer
//! - `Lead`: a prospective client in the sales pipeline
//! - `ReviewItem`: work awaiting preparer sign-off
//! - `TaxCategory` and `LeadStage`: fixed classification enums
//!
//! Ids are accepted as JSON strings or numbers and normalized to strings.
//! Missing text fields default to empty and missing amounts to zero. One
//! odd record never fails the whole collection: a missing id is empty, a
//! null or non-string stage is `Unknown`, and an unreadable timestamp is
//! `None`.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A detected tax-savings opportunity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Insight {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    /// Insight kind (`opportunity`, `warning`, `deadline`, ...)
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, deserialize_with = "number_or_null")]
    pub potential_savings: f64,
    #[serde(default)]
    pub irs_reference: Option<String>,
    #[serde(default)]
    pub reviewed: Option<bool>,
    #[serde(default)]
    pub action_steps: Option<Vec<ActionStep>>,
}

impl Insight {
    /// Create an insight with the given id, title and category
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: category.into(),
            ..Default::default()
        }
    }

    /// Builder method: set the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder method: set the potential savings
    pub fn savings(mut self, amount: f64) -> Self {
        self.potential_savings = amount;
        self
    }

    /// Builder method: set the insight kind
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Builder method: add an action step
    pub fn step(mut self, title: impl Into<String>, description: impl Into<String>) -> Self {
        self.action_steps.get_or_insert_with(Vec::new).push(ActionStep {
            title: title.into(),
            description: description.into(),
        });
        self
    }

    /// Whether the preparer has already reviewed this insight
    pub fn is_reviewed(&self) -> bool {
        self.reviewed.unwrap_or(false)
    }

    /// The fixed category this insight belongs to, if recognized
    pub fn tax_category(&self) -> Option<TaxCategory> {
        TaxCategory::parse(&self.category)
    }
}

/// One step of an insight's action plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ActionStep {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// A client of the preparer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Client {
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub id: Option<String>,
    /// Intake session id, used as the key when `id` is absent
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub session_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default, deserialize_with = "number_or_null")]
    pub potential_savings: f64,
    /// Complexity tier (`simple`, `moderate`, `complex`, ...)
    #[serde(default)]
    pub complexity: String,
}

impl Client {
    /// Create a client keyed by `id`
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: name.into(),
            email: email.into(),
            ..Default::default()
        }
    }

    /// Builder method: set the potential savings
    pub fn savings(mut self, amount: f64) -> Self {
        self.potential_savings = amount;
        self
    }

    /// Builder method: set the status
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Lookup key: `id`, falling back to `session_id`
    pub fn key(&self) -> Option<&str> {
        self.id.as_deref().or(self.session_id.as_deref())
    }
}

/// Stage of a lead in the sales funnel
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum LeadStage {
    #[default]
    New,
    Contacted,
    Qualified,
    Engaged,
    /// Any stage outside the fixed funnel
    #[serde(other)]
    Unknown,
}

impl LeadStage {
    /// The funnel stages in display order
    pub fn all() -> &'static [LeadStage] {
        &[
            LeadStage::New,
            LeadStage::Contacted,
            LeadStage::Qualified,
            LeadStage::Engaged,
        ]
    }

    /// Identifier used in element ids (`pipeline-<stage>`)
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStage::New => "new",
            LeadStage::Contacted => "contacted",
            LeadStage::Qualified => "qualified",
            LeadStage::Engaged => "engaged",
            LeadStage::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for LeadStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A prospective client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Lead {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub source: String,
    #[serde(default, deserialize_with = "stage_or_unknown")]
    pub stage: LeadStage,
    /// Value tier (`high`, `medium`, `low`)
    #[serde(default)]
    pub value_tier: String,
    #[serde(default, deserialize_with = "number_or_null")]
    pub potential_savings: f64,
}

/// An item awaiting preparer sign-off
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ReviewItem {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub priority: String,
}

/// The five fixed insight categories tracked on the dashboard
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum TaxCategory {
    Retirement,
    Deductions,
    Credits,
    Qbi,
    Investment,
}

impl TaxCategory {
    /// Get all categories for iteration
    pub fn all() -> &'static [TaxCategory] {
        &[
            TaxCategory::Retirement,
            TaxCategory::Deductions,
            TaxCategory::Credits,
            TaxCategory::Qbi,
            TaxCategory::Investment,
        ]
    }

    /// Parse a category name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "retirement" => Some(TaxCategory::Retirement),
            "deductions" => Some(TaxCategory::Deductions),
            "credits" => Some(TaxCategory::Credits),
            "qbi" => Some(TaxCategory::Qbi),
            "investment" => Some(TaxCategory::Investment),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaxCategory::Retirement => "retirement",
            TaxCategory::Deductions => "deductions",
            TaxCategory::Credits => "credits",
            TaxCategory::Qbi => "qbi",
            TaxCategory::Investment => "investment",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            TaxCategory::Retirement => "Retirement",
            TaxCategory::Deductions => "Deductions",
            TaxCategory::Credits => "Credits",
            TaxCategory::Qbi => "QBI",
            TaxCategory::Investment => "Investment",
        }
    }
}

impl std::fmt::Display for TaxCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================
// Response envelopes
// ============================================

/// `GET /api/cpa/insights`
#[derive(Debug, Clone, Deserialize, Default)]
pub struct InsightsEnvelope {
    #[serde(default)]
    pub insights: Option<Vec<Insight>>,
}

/// `GET /api/cpa/clients`
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ClientsEnvelope {
    #[serde(default)]
    pub clients: Option<Vec<Client>>,
}

/// `GET /api/cpa/pipeline`
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PipelineEnvelope {
    #[serde(default)]
    pub leads: Option<Vec<Lead>>,
}

/// `GET /api/cpa/review-queue`
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ReviewQueueEnvelope {
    #[serde(default)]
    pub items: Option<Vec<ReviewItem>>,
}

// ============================================
// Lenient field decoding
// ============================================

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(String::new()),
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(s) => Ok(Some(s)),
        serde_json::Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

fn number_or_null<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(0.0),
        serde_json::Value::Number(n) => Ok(n.as_f64().unwrap_or(0.0)),
        // Some endpoints send amounts as strings ("12500.00")
        serde_json::Value::String(s) => Ok(s.trim().parse().unwrap_or(0.0)),
        other => Err(serde::de::Error::custom(format!(
            "expected numeric amount, got {}",
            other
        ))),
    }
}

fn stage_or_unknown<'de, D>(deserializer: D) -> Result<LeadStage, D::Error>
where
    D: Deserializer<'de>,
{
    let stage = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => LeadStage::all()
            .iter()
            .copied()
            .find(|stage| stage.as_str() == s)
            .unwrap_or(LeadStage::Unknown),
        _ => LeadStage::Unknown,
    };
    Ok(stage)
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(parse_timestamp(&s)),
        _ => Ok(None),
    }
}

/// Parse an RFC 3339 timestamp, or a naive one taken as UTC
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insight_accepts_numeric_id() {
        let insight: Insight = serde_json::from_str(
            r#"{"id": 42, "title": "Max out 401(k)", "category": "retirement", "type": "opportunity", "potential_savings": 4200}"#,
        )
        .unwrap();

        assert_eq!(insight.id, "42");
        assert_eq!(insight.kind, "opportunity");
        assert_eq!(insight.potential_savings, 4200.0);
        assert_eq!(insight.tax_category(), Some(TaxCategory::Retirement));
        assert!(!insight.is_reviewed());
        assert!(insight.action_steps.is_none());
    }

    #[test]
    fn test_insight_with_action_steps() {
        let insight: Insight = serde_json::from_str(
            r#"{
                "id": "ins-1",
                "title": "QBI deduction",
                "category": "qbi",
                "potential_savings": null,
                "reviewed": true,
                "irs_reference": "IRC 199A",
                "action_steps": [
                    {"title": "Confirm entity type", "description": "Pass-through only"},
                    {"title": "Compute QBI"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(insight.potential_savings, 0.0);
        assert!(insight.is_reviewed());
        let steps = insight.action_steps.unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[1].title, "Compute QBI");
        assert_eq!(steps[1].description, "");
    }

    #[test]
    fn test_client_key_falls_back_to_session_id() {
        let client: Client =
            serde_json::from_str(r#"{"session_id": "sess-9", "name": "Dana"}"#).unwrap();
        assert_eq!(client.key(), Some("sess-9"));

        let client: Client =
            serde_json::from_str(r#"{"id": 7, "session_id": "sess-9", "name": "Dana"}"#).unwrap();
        assert_eq!(client.key(), Some("7"));

        let client = Client::default();
        assert_eq!(client.key(), None);
    }

    #[test]
    fn test_string_amounts_are_parsed() {
        let client: Client =
            serde_json::from_str(r#"{"id": "c1", "potential_savings": "12500.50"}"#).unwrap();
        assert_eq!(client.potential_savings, 12500.5);
    }

    #[test]
    fn test_lead_stage_parsing() {
        let lead: Lead =
            serde_json::from_str(r#"{"id": "l1", "name": "Acme", "stage": "qualified"}"#).unwrap();
        assert_eq!(lead.stage, LeadStage::Qualified);

        let lead: Lead =
            serde_json::from_str(r#"{"id": "l2", "name": "Acme", "stage": "archived"}"#).unwrap();
        assert_eq!(lead.stage, LeadStage::Unknown);

        let lead: Lead = serde_json::from_str(r#"{"id": "l3"}"#).unwrap();
        assert_eq!(lead.stage, LeadStage::New);
    }

    #[test]
    fn test_review_item_timestamp() {
        let item: ReviewItem = serde_json::from_str(
            r#"{"id": 3, "client_name": "Lee", "type": "1040", "submitted_at": "2026-01-05T10:00:00Z", "priority": "high"}"#,
        )
        .unwrap();
        assert_eq!(item.id, "3");
        assert!(item.submitted_at.is_some());
    }

    #[test]
    fn test_records_without_id_decode() {
        let insight: Insight =
            serde_json::from_str(r#"{"title": "Home office", "category": "deductions"}"#).unwrap();
        assert_eq!(insight.id, "");
        assert_eq!(insight.title, "Home office");

        let lead: Lead = serde_json::from_str(r#"{"id": null, "name": "Acme"}"#).unwrap();
        assert_eq!(lead.id, "");

        let item: ReviewItem = serde_json::from_str(r#"{"client_name": "Lee"}"#).unwrap();
        assert_eq!(item.id, "");
    }

    #[test]
    fn test_null_stage_is_unknown() {
        let lead: Lead = serde_json::from_str(r#"{"id": "l1", "stage": null}"#).unwrap();
        assert_eq!(lead.stage, LeadStage::Unknown);

        let lead: Lead = serde_json::from_str(r#"{"id": "l2", "stage": 3}"#).unwrap();
        assert_eq!(lead.stage, LeadStage::Unknown);
    }

    #[test]
    fn test_naive_timestamp_read_as_utc() {
        let item: ReviewItem = serde_json::from_str(
            r#"{"id": "r1", "submitted_at": "2026-01-05T10:00:00.123456"}"#,
        )
        .unwrap();
        let expected = DateTime::parse_from_rfc3339("2026-01-05T10:00:00.123456Z").unwrap();
        assert_eq!(item.submitted_at, Some(expected.with_timezone(&Utc)));

        let item: ReviewItem =
            serde_json::from_str(r#"{"id": "r2", "submitted_at": "2026-01-05 10:00:00"}"#).unwrap();
        assert!(item.submitted_at.is_some());

        let item: ReviewItem =
            serde_json::from_str(r#"{"id": "r3", "submitted_at": "last tuesday"}"#).unwrap();
        assert_eq!(item.submitted_at, None);
    }

    #[test]
    fn test_offset_timestamp_normalized_to_utc() {
        let ts = parse_timestamp("2026-01-05T12:00:00+02:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-01-05T10:00:00+00:00");
    }

    #[test]
    fn test_one_odd_record_keeps_the_collection() {
        let env: ReviewQueueEnvelope = serde_json::from_str(
            r#"{"items": [
                {"id": 1, "client_name": "Lee", "submitted_at": "2026-01-05T10:00:00Z"},
                {"id": 2, "client_name": "Kim", "submitted_at": "2026-01-05T10:00:00.123456"},
                {"client_name": "Park", "submitted_at": null}
            ]}"#,
        )
        .unwrap();
        let items = env.items.unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[2].client_name, "Park");

        let env: PipelineEnvelope = serde_json::from_str(
            r#"{"leads": [{"id": "l1", "stage": "new"}, {"id": "l2", "stage": null}]}"#,
        )
        .unwrap();
        let stages: Vec<LeadStage> = env.leads.unwrap().iter().map(|l| l.stage).collect();
        assert_eq!(stages, vec![LeadStage::New, LeadStage::Unknown]);
    }

    #[test]
    fn test_envelopes_tolerate_missing_field() {
        let env: InsightsEnvelope = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(env.insights.is_none());

        let env: ClientsEnvelope = serde_json::from_str(r#"{"clients": []}"#).unwrap();
        assert_eq!(env.clients.map(|c| c.len()), Some(0));
    }

    #[test]
    fn test_tax_category_parse() {
        assert_eq!(TaxCategory::parse("QBI"), Some(TaxCategory::Qbi));
        assert_eq!(TaxCategory::parse(" deductions "), Some(TaxCategory::Deductions));
        assert_eq!(TaxCategory::parse("estate"), None);
        assert_eq!(TaxCategory::all().len(), 5);
    }
}

//! Dashboard Data Model
//!
//! Records fetched from the CPA backend and the envelopes they arrive in.

mod types;

pub use types::{
    ActionStep, Client, ClientsEnvelope, Insight, InsightsEnvelope, Lead, LeadStage,
    PipelineEnvelope, ReviewItem, ReviewQueueEnvelope, TaxCategory,
};

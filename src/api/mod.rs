//! CPA Backend API
//!
//! HTTP access to the CPA backend, built with reqwest.
//!
//! # Endpoints
//!
//! ## Dashboard resources
//! - `GET /api/cpa/insights` - `{ "insights": [...] }`
//! - `GET /api/cpa/clients` - `{ "clients": [...] }`
//! - `GET /api/cpa/pipeline` - `{ "leads": [...] }`
//! - `GET /api/cpa/review-queue` - `{ "items": [...] }`
//!
//! ## Core helper
//! - `<METHOD> /api/core/<endpoint>` - arbitrary JSON calls
//!
//! Every request carries the bearer token and `X-Preparer-ID` when known;
//! POST/PUT/PATCH/DELETE also carry `X-CSRF-Token`.

pub mod auth;
pub mod client;
pub mod error;

pub use auth::Credentials;
pub use client::{is_mutating, ApiClient, CpaApi};
pub use error::{error_message, ApiError, ApiResult};

//! Request Credentials
//!
//! Resolves the bearer token, preparer id and CSRF token attached to
//! outbound requests.

use crate::config::AuthConfig;
use std::path::Path;

/// Credentials resolved for the current session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Credentials {
    pub bearer_token: Option<String>,
    pub preparer_id: Option<String>,
    pub csrf_token: Option<String>,
}

impl Credentials {
    /// Resolve credentials from configuration
    ///
    /// The persistent token file wins over the session token. Blank values
    /// are treated as absent.
    pub fn resolve(config: &AuthConfig) -> Self {
        let stored = config.token_file.as_deref().and_then(read_token_file);

        Self {
            bearer_token: stored.or_else(|| non_blank(config.session_token.as_deref())),
            preparer_id: non_blank(config.preparer_id.as_deref()),
            csrf_token: non_blank(config.csrf_token.as_deref()),
        }
    }

    /// Builder method: set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Builder method: set the preparer id
    pub fn with_preparer(mut self, preparer_id: impl Into<String>) -> Self {
        self.preparer_id = Some(preparer_id.into());
        self
    }

    /// Builder method: set the CSRF token
    pub fn with_csrf(mut self, csrf: impl Into<String>) -> Self {
        self.csrf_token = Some(csrf.into());
        self
    }
}

fn read_token_file(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => non_blank(Some(content.as_str())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            tracing::warn!("Failed to read token file {:?}: {}", path, e);
            None
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

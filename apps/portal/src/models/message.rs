use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status text the eligibility endpoint uses to reject an application.
pub const NOT_ELIGIBLE: &str = "NOT ELIGIBLE";

/// The `{message}` / `{error}` envelope returned by mutating endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerMessage {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ServerMessage {
    /// The server's own text, falling back to `default` when the body had none.
    pub fn text_or(&self, default: &str) -> String {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(default)
            .to_string()
    }
}

/// Result row of the eligibility stored procedure. Only `status` is interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EligibilityResult {
    #[serde(default)]
    pub status: String,
    #[serde(flatten)]
    pub details: BTreeMap<String, Value>,
}

impl EligibilityResult {
    pub fn is_eligible(&self) -> bool {
        !self.status.trim().eq_ignore_ascii_case(NOT_ELIGIBLE)
    }
}

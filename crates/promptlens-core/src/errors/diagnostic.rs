use serde::{Deserialize, Serialize};

pub mod codes {
    pub const E_CFG_PARSE: &str = "E_CFG_PARSE";
    pub const E_DATA_LOAD: &str = "E_DATA_LOAD";
    pub const E_RECORD_NOT_FOUND: &str = "E_RECORD_NOT_FOUND";
    pub const E_ORIGINAL_MISSING: &str = "E_ORIGINAL_MISSING";
    pub const E_IMAGE_LOAD: &str = "E_IMAGE_LOAD";

    pub const W_MODEL_MISSING: &str = "W_MODEL_MISSING";
    pub const W_DUPLICATE_ID: &str = "W_DUPLICATE_ID";
    pub const W_ORPHAN_RESPONSE: &str = "W_ORPHAN_RESPONSE";
    pub const W_IMAGE_MISSING: &str = "W_IMAGE_MISSING";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: String,
    pub severity: String, // error|warn
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub context: serde_json::Value,
}

impl Diagnostic {
    /// Severity is derived from the code prefix: `E_*` are errors, everything else warns.
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        let severity = if code.starts_with("E_") { "error" } else { "warn" };
        Self {
            code: code.to_string(),
            severity: severity.to_string(),
            message: message.into(),
            source: None,
            context: serde_json::Value::Null,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = context;
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == "error"
    }

    pub fn format_terminal(&self) -> String {
        let icon = if self.is_error() { "✖" } else { "⚠" };
        match &self.source {
            Some(src) => format!("{} [{}] {} ({})", icon, self.code, self.message, src),
            None => format!("{} [{}] {}", icon, self.code, self.message),
        }
    }
}

//! Errors raised while turning ES documents into configuration records.
//!
//! Every error carries the component and attribute it refers to so that a
//! document author can find the offending entry; see [`EsError::field_path`].

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Code, message and field location of a rejected document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Short code such as `column_length` or `unknown_key`.
    pub code: String,
    /// Message naming the offending field.
    pub message: String,
    /// `component`, `attribute` and any counts or values involved.
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// How to repair the document, when there is an obvious fix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Payload without location; add it with [`ErrorInfo::with_context`].
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Records one context entry, replacing an earlier value for `key`.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Attaches a repair hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Why an ES document could not be turned into configuration records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum EsError {
    /// Struct-of-arrays columns that cannot be zipped into records.
    #[error("structure error: {0}")]
    Structure(ErrorInfo),
    /// Values that do not fit the schema (unknown keys, bad enum spellings).
    #[error("schema error: {0}")]
    Schema(ErrorInfo),
    /// Text that is not a valid document, wrong value types, or values
    /// with no representation in the requested output format.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        let context: Vec<String> = self
            .context
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        if !context.is_empty() {
            write!(f, " ({})", context.join(", "))?;
        }
        match &self.hint {
            Some(hint) => write!(f, "; {hint}"),
            None => Ok(()),
        }
    }
}

impl EsError {
    /// Code, message and location shared by every family.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            EsError::Structure(info) | EsError::Schema(info) | EsError::Serde(info) => info,
        }
    }

    /// Overrides or adds location context, keeping the family.
    pub fn with_context(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        match self {
            EsError::Structure(info) => EsError::Structure(info.with_context(key, value)),
            EsError::Schema(info) => EsError::Schema(info.with_context(key, value)),
            EsError::Serde(info) => EsError::Serde(info.with_context(key, value)),
        }
    }

    /// Dotted field path (`component.attribute`) the error refers to, when known.
    pub fn field_path(&self) -> Option<String> {
        let context = &self.info().context;
        match (context.get("component"), context.get("attribute")) {
            (Some(component), Some(attribute)) => Some(format!("{component}.{attribute}")),
            (Some(component), None) => Some(component.clone()),
            _ => None,
        }
    }

    /// A per-ion (or per-region) column whose length differs from the record count.
    pub fn column_length(component: &str, attribute: &str, expected: usize, found: usize) -> Self {
        EsError::Structure(
            ErrorInfo::new(
                "column_length",
                format!(
                    "{component}.{attribute} has {found} entries but {expected} records were declared"
                ),
            )
            .with_context("component", component)
            .with_context("attribute", attribute)
            .with_context("expected", expected.to_string())
            .with_context("found", found.to_string())
            .with_hint("every per-record array must have one entry per record"),
        )
    }

    /// A per-ion (or per-region) column that is absent although records were declared.
    pub fn column_missing(component: &str, attribute: &str, expected: usize) -> Self {
        EsError::Structure(
            ErrorInfo::new(
                "column_missing",
                format!("{component}.{attribute} is missing but {expected} records were declared"),
            )
            .with_context("component", component)
            .with_context("attribute", attribute)
            .with_context("expected", expected.to_string()),
        )
    }

    /// A scalar value that is not one of the accepted spellings.
    pub fn invalid_value(component: &str, attribute: &str, value: &str, accepted: &str) -> Self {
        EsError::Schema(
            ErrorInfo::new(
                "invalid_value",
                format!("{component}.{attribute} does not accept `{value}`"),
            )
            .with_context("component", component)
            .with_context("attribute", attribute)
            .with_context("value", value)
            .with_hint(format!("accepted values: {accepted}")),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_length_names_field_path() {
        let err = EsError::column_length("config", "log_tau.start", 3, 2);
        assert_eq!(err.info().code, "column_length");
        assert_eq!(err.field_path().as_deref(), Some("config.log_tau.start"));
        let text = err.to_string();
        assert!(text.starts_with("structure error: [column_length] config.log_tau.start"));
        assert!(text.contains("config.log_tau.start"));
        assert!(text.contains("expected=3"));
        assert!(text.contains("found=2"));
    }

    #[test]
    fn errors_serialize_with_family_tag() {
        let err = EsError::column_missing("setups[0]", "temp", 1);
        let json = serde_json::to_value(&err).expect("serialize");
        assert_eq!(json["family"], "Structure");
        assert_eq!(json["detail"]["code"], "column_missing");
    }
}

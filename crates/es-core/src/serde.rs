use std::fmt::Display;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use serde_path_to_error::{Path, Segment};

use crate::errors::{ErrorInfo, EsError};

const UNKNOWN_FIELD: &str = "unknown field `";

/// Path labels with sequence indices folded into the preceding key:
/// `setups`, `[1]`, `active` becomes `setups[1]`, `active`.
fn push_label(labels: &mut Vec<String>, label: String) {
    match labels.last_mut() {
        Some(last) if label.starts_with('[') => last.push_str(&label),
        _ => labels.push(label),
    }
}

fn path_labels(path: &Path) -> Vec<String> {
    let mut labels = Vec::new();
    for segment in path.iter() {
        let label = match segment {
            Segment::Seq { index } => format!("[{index}]"),
            Segment::Map { key } => key.clone(),
            Segment::Enum { variant } => variant.clone(),
            _ => "?".to_string(),
        };
        push_label(&mut labels, label);
    }
    labels
}

/// Splits a document path into the component (first label) and the attribute
/// below it; a top-level key is an attribute of the root document.
fn locate(info: ErrorInfo, root: &str, labels: &[String]) -> ErrorInfo {
    match labels {
        [] => info.with_context("component", root),
        [key] => info
            .with_context("component", root)
            .with_context("attribute", key.as_str()),
        [component, rest @ ..] => info
            .with_context("component", component.as_str())
            .with_context("attribute", rest.join(".")),
    }
}

fn deserialize_error<E: Display>(
    root: &str,
    code: &str,
    err: serde_path_to_error::Error<E>,
) -> EsError {
    let mut labels = path_labels(err.path());
    let message = err.inner().to_string();
    // serde reports unknown keys as "unknown field `key`, expected ..."
    let unknown = message
        .find(UNKNOWN_FIELD)
        .and_then(|start| message[start + UNKNOWN_FIELD.len()..].split('`').next())
        .map(str::to_string);
    match unknown {
        Some(key) => {
            if labels.last().map(String::as_str) == Some("?") {
                labels.pop();
            }
            if labels.last() != Some(&key) {
                labels.push(key.clone());
            }
            let info = ErrorInfo::new("unknown_key", message).with_context("key", key);
            EsError::Schema(locate(info, root, &labels))
        }
        None => EsError::Serde(locate(ErrorInfo::new(code, message), root, &labels)),
    }
}

/// Location of the first NaN or infinite number in a serialized document.
fn non_finite_labels(value: &serde_yaml::Value) -> Option<Vec<String>> {
    let prefixed = |head: String, rest: Vec<String>| {
        let mut labels = vec![head];
        for label in rest {
            push_label(&mut labels, label);
        }
        labels
    };
    match value {
        serde_yaml::Value::Number(number) if number.is_nan() || number.is_infinite() => {
            Some(Vec::new())
        }
        serde_yaml::Value::Sequence(items) => items.iter().enumerate().find_map(|(index, item)| {
            non_finite_labels(item).map(|rest| prefixed(format!("[{index}]"), rest))
        }),
        serde_yaml::Value::Mapping(entries) => entries.iter().find_map(|(key, item)| {
            let key = key.as_str().unwrap_or("?").to_string();
            non_finite_labels(item).map(|rest| prefixed(key, rest))
        }),
        _ => None,
    }
}

/// Deserializes a YAML payload into the requested parameter type.
pub fn from_yaml_str<T: DeserializeOwned>(root: &str, text: &str) -> Result<T, EsError> {
    serde_path_to_error::deserialize(serde_yaml::Deserializer::from_str(text))
        .map_err(|err| deserialize_error(root, "yaml_deserialize", err))
}

/// Deserializes an already-parsed JSON value into the requested parameter type.
pub fn from_json_value<T: DeserializeOwned>(root: &str, value: Value) -> Result<T, EsError> {
    serde_path_to_error::deserialize(value)
        .map_err(|err| deserialize_error(root, "json_deserialize", err))
}

/// Serializes parameters into YAML; non-finite numbers are kept as `.nan`/`.inf`.
pub fn to_yaml_string<T: Serialize>(root: &str, value: &T) -> Result<String, EsError> {
    serde_yaml::to_string(value).map_err(|err| {
        let info = ErrorInfo::new("yaml_serialize", err.to_string());
        EsError::Serde(info.with_context("component", root))
    })
}

/// Serializes parameters into a JSON value.
///
/// JSON has no NaN or infinity; such values are rejected with code
/// `non_finite` instead of being written as `null`, which would read back as
/// the default.
pub fn to_json_value<T: Serialize>(root: &str, value: &T) -> Result<Value, EsError> {
    let serialize_error = |code: &str, err: &dyn Display| {
        EsError::Serde(ErrorInfo::new(code, err.to_string()).with_context("component", root))
    };
    let tree =
        serde_yaml::to_value(value).map_err(|err| serialize_error("json_serialize", &err))?;
    if let Some(labels) = non_finite_labels(&tree) {
        let info = ErrorInfo::new(
            "non_finite",
            format!("{} has no JSON representation", labels.join(".")),
        )
        .with_hint("JSON numbers must be finite; export to YAML to keep NaN or infinity");
        return Err(EsError::Serde(locate(info, root, &labels)));
    }
    serde_json::to_value(value).map_err(|err| serialize_error("json_serialize", &err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_indices_attach_to_their_key() {
        let mut labels = Vec::new();
        for label in ["setups", "[1]", "active"] {
            push_label(&mut labels, label.to_string());
        }
        assert_eq!(labels, vec!["setups[1]", "active"]);
    }

    #[test]
    fn nested_nan_is_located() {
        let text = "grid:\n    bin_width: .nan\nsetups:\n    - a0: 1.0\n    - a1: .inf\n";
        let tree: serde_yaml::Value = serde_yaml::from_str(text).expect("yaml");
        let mut found = non_finite_labels(&tree).expect("grid");
        assert_eq!(found, vec!["grid", "bin_width"]);
        let tree: serde_yaml::Value =
            serde_yaml::from_str("setups:\n    - a0: 1.0\n    - a1: -.inf\n").expect("yaml");
        found = non_finite_labels(&tree).expect("setups");
        assert_eq!(found, vec!["setups[1]", "a1"]);
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a chemical species in an ion list.
///
/// Documents may name species by label (`SiII`) or by the engine's numeric
/// code (`1401`); both are kept exactly as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IonId {
    /// Numeric ion code (atomic number × 100 + ionization stage).
    Code(i64),
    /// Free-form species label.
    Label(String),
}

impl Default for IonId {
    fn default() -> Self {
        IonId::Label(String::new())
    }
}

impl fmt::Display for IonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IonId::Code(code) => write!(f, "{code}"),
            IonId::Label(label) => f.write_str(label),
        }
    }
}

impl From<&str> for IonId {
    fn from(label: &str) -> Self {
        IonId::Label(label.to_string())
    }
}

impl From<i64> for IonId {
    fn from(code: i64) -> Self {
        IonId::Code(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_labels_and_codes() {
        let ids: Vec<IonId> = serde_json::from_str(r#"["SiII", 1401]"#).expect("ids");
        assert_eq!(ids, vec![IonId::from("SiII"), IonId::from(1401)]);
        assert_eq!(ids[1].to_string(), "1401");
    }
}

//! Category catalog entries

use crate::{CategoryId, Rationality};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A function reference inside a catalog entry (`{"code": "Te"}`)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRef {
    pub code: String,
}

impl FunctionRef {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

/// One of the sixteen categories
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryEntry {
    /// Filled from the catalog key when the document omits it
    #[serde(default, skip_serializing_if = "CategoryId::is_empty")]
    pub id: CategoryId,
    pub leading: FunctionRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creative: Option<FunctionRef>,
    pub rationality: Rationality,
    /// Display metadata carried through untouched
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl CategoryEntry {
    pub fn new(id: impl Into<String>, leading: &str, rationality: Rationality) -> Self {
        Self {
            id: CategoryId::new(id),
            leading: FunctionRef::new(leading),
            creative: None,
            rationality,
            metadata: Map::new(),
        }
    }

    pub fn with_creative(mut self, creative: &str) -> Self {
        self.creative = Some(FunctionRef::new(creative));
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Display name, if the catalog provides one
    pub fn name(&self) -> Option<&str> {
        self.metadata.get("name").and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_keeps_display_metadata() {
        let entry: CategoryEntry = serde_json::from_value(json!({
            "leading": {"code": "Te"},
            "creative": {"code": "Ni"},
            "rationality": "rational",
            "name": "Entrepreneur",
            "alias": "ENTj"
        }))
        .unwrap();

        assert!(entry.id.is_empty());
        assert_eq!(entry.leading.code, "Te");
        assert_eq!(entry.creative, Some(FunctionRef::new("Ni")));
        assert_eq!(entry.rationality, Rationality::Rational);
        assert_eq!(entry.name(), Some("Entrepreneur"));
        assert_eq!(entry.metadata.get("alias"), Some(&json!("ENTj")));
    }

    #[test]
    fn test_entry_builder() {
        let entry = CategoryEntry::new("SEI", "Si", Rationality::Irrational)
            .with_creative("Fe")
            .with_metadata("name", "Mediator");
        assert_eq!(entry.name(), Some("Mediator"));
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["id"], json!("SEI"));
        assert_eq!(value["rationality"], json!("irrational"));
    }
}

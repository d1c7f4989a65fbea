//! Identifiers used across the configuration documents and run state
//!
//! Configuration authors write ids either as strings or as bare integers
//! (`"q12"` or `12`); both deserialize to the same string-backed id.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Integer(i64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(text) => text,
            RawId::Integer(n) => n.to_string(),
        }
    }
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                RawId::deserialize(deserializer).map(|raw| Self(raw.into()))
            }
        }
    };
}

string_id! {
    /// Identifier of a stage in the stage graph
    StageId
}

string_id! {
    /// One value of a dimension (e.g. `"rational"`, `"T"`, `"e"`, `"Ni"`)
    PoleId
}

string_id! {
    /// Identifier of a question, unique within its question set
    QuestionId
}

string_id! {
    /// Identifier of a question set referenced by stages
    QuestionSetId
}

string_id! {
    /// Identifier of a category in the catalog
    CategoryId
}

string_id! {
    /// Identifier of an option on the answer scale
    AnswerId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_and_string_ids_deserialize() {
        let from_text: QuestionId = serde_json::from_str("\"q7\"").unwrap();
        let from_number: QuestionId = serde_json::from_str("7").unwrap();
        assert_eq!(from_text, QuestionId::new("q7"));
        assert_eq!(from_number, QuestionId::new("7"));
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&StageId::new("rationality")).unwrap();
        assert_eq!(json, "\"rationality\"");
    }

    #[test]
    fn test_ids_as_map_keys() {
        let map: std::collections::BTreeMap<PoleId, u32> =
            serde_json::from_str(r#"{"T": 1, "F": 2}"#).unwrap();
        assert_eq!(map.get(&PoleId::new("F")), Some(&2));
    }
}

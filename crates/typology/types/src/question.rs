//! Questions, question sets, the answer scale and answers
//!
//! The answer scale arrives in one of two shapes:
//!
//! ```json
//! [{"id": "agree", "score": 1}, {"id": "disagree", "score": -1}]
//! ```
//!
//! or nested per locale:
//!
//! ```json
//! {"en": {"options": [{"id": "agree", "score": 1}]}}
//! ```
//!
//! Both normalize to the same [`AnswerScale`].

use crate::{AnswerId, PoleId, QuestionId, TypologyError, TypologyResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Locale used when a requested locale is missing
pub const FALLBACK_LOCALE: &str = "en";

// ── Answer scale ─────────────────────────────────────────────────────

/// One option of the answer scale
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: AnswerId,
    /// Signed contribution toward the pole of the question being answered
    pub score: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl AnswerOption {
    pub fn new(id: impl Into<String>, score: i32) -> Self {
        Self {
            id: AnswerId::new(id),
            score,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// The normalized answer scale, indexed by option id
#[derive(Clone, Debug, Default)]
pub struct AnswerScale {
    options: Vec<AnswerOption>,
    by_id: HashMap<AnswerId, i32>,
}

impl AnswerScale {
    pub fn from_options(options: Vec<AnswerOption>) -> Self {
        let by_id = options.iter().map(|o| (o.id.clone(), o.score)).collect();
        Self { options, by_id }
    }

    /// Parse either accepted shape, taking the first locale that carries
    /// an `options` list when the scale is locale-nested.
    pub fn from_value(raw: &Value) -> TypologyResult<Self> {
        match raw {
            Value::Array(_) => Self::parse_list(raw),
            Value::Object(locales) => {
                let options = locales
                    .values()
                    .find_map(|entry| entry.get("options").filter(|o| o.is_array()))
                    .ok_or_else(|| {
                        TypologyError::configuration(
                            "answer scale object has no locale with an 'options' list",
                        )
                    })?;
                Self::parse_list(options)
            }
            other => Err(TypologyError::configuration(format!(
                "answer scale must be a list or a locale map, found {}",
                json_kind(other)
            ))),
        }
    }

    /// Parse the scale for one locale. A flat list has no locales and is
    /// returned as-is.
    pub fn from_value_for_locale(raw: &Value, locale: &str) -> TypologyResult<Self> {
        match raw {
            Value::Object(locales) => {
                let options = locales
                    .get(locale)
                    .and_then(|entry| entry.get("options"))
                    .ok_or_else(|| {
                        TypologyError::configuration(format!(
                            "answer scale has no options for locale '{}'",
                            locale
                        ))
                    })?;
                Self::parse_list(options)
            }
            _ => Self::from_value(raw),
        }
    }

    fn parse_list(raw: &Value) -> TypologyResult<Self> {
        let options: Vec<AnswerOption> = serde_json::from_value(raw.clone())
            .map_err(|e| TypologyError::configuration(format!("answer scale: {}", e)))?;
        Ok(Self::from_options(options))
    }

    pub fn score_for(&self, id: &str) -> Option<i32> {
        self.by_id.get(&AnswerId::new(id)).copied()
    }

    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

// ── Answers ──────────────────────────────────────────────────────────

/// A respondent's answer: a pre-scored value or an answer-scale id
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Score(i32),
    Id(String),
}

impl Answer {
    /// Interpret a command-line or form token as an answer id. Numeric
    /// tokens stay ids so a scale with numeric ids is still reachable;
    /// resolution falls back to the integer value.
    pub fn from_token(token: &str) -> Self {
        Self::Id(token.trim().to_string())
    }
}

impl From<i32> for Answer {
    fn from(score: i32) -> Self {
        Self::Score(score)
    }
}

impl From<&str> for Answer {
    fn from(id: &str) -> Self {
        Self::Id(id.to_string())
    }
}

impl From<String> for Answer {
    fn from(id: String) -> Self {
        Self::Id(id)
    }
}

impl std::fmt::Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Score(score) => write!(f, "{}", score),
            Self::Id(id) => write!(f, "{}", id),
        }
    }
}

// ── Question text ────────────────────────────────────────────────────

/// Question text, either a single string or one string per locale
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocalizedText {
    Plain(String),
    PerLocale(BTreeMap<String, String>),
}

impl LocalizedText {
    /// Text for `locale`, falling back to [`FALLBACK_LOCALE`] and then to
    /// the first available translation.
    pub fn resolve(&self, locale: &str) -> Option<&str> {
        match self {
            Self::Plain(text) => Some(text.as_str()),
            Self::PerLocale(texts) => texts
                .get(locale)
                .or_else(|| texts.get(FALLBACK_LOCALE))
                .or_else(|| texts.values().next())
                .map(String::as_str),
        }
    }
}

impl Default for LocalizedText {
    fn default() -> Self {
        Self::Plain(String::new())
    }
}

impl From<&str> for LocalizedText {
    fn from(text: &str) -> Self {
        Self::Plain(text.to_string())
    }
}

// ── Questions ────────────────────────────────────────────────────────

/// A question bound to the pole it scores
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: LocalizedText,
    pub pole: PoleId,
    /// Lower is asked first; `None` sorts after every explicit priority
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
}

/// A question as written in a question-set document (the pole is the map key)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuestionEntry {
    pub id: QuestionId,
    #[serde(default)]
    pub text: LocalizedText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
}

impl QuestionEntry {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: QuestionId::new(id),
            text: LocalizedText::Plain(text.into()),
            priority: None,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn into_question(self, pole: PoleId) -> Question {
        Question {
            id: self.id,
            text: self.text,
            pole,
            priority: self.priority,
        }
    }
}

/// A question-set document: questions grouped by the pole they score
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct QuestionSetDocument {
    #[serde(default)]
    pub questions: BTreeMap<PoleId, Vec<QuestionEntry>>,
}

impl QuestionSetDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_questions(mut self, pole: impl Into<String>, entries: Vec<QuestionEntry>) -> Self {
        self.questions.insert(PoleId::new(pole), entries);
        self
    }

    pub fn question_count(&self) -> usize {
        self.questions.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_answer_scale() {
        let scale = AnswerScale::from_value(&json!([
            {"id": "yes", "score": 2},
            {"id": "no", "score": -2}
        ]))
        .unwrap();
        assert_eq!(scale.len(), 2);
        assert_eq!(scale.score_for("no"), Some(-2));
        assert_eq!(scale.score_for("maybe"), None);
    }

    #[test]
    fn test_locale_nested_answer_scale() {
        let raw = json!({
            "en": {"options": [{"id": "agree", "score": 1, "label": "Agree"}]},
            "ru": {"options": [{"id": "agree", "score": 1, "label": "Согласен"}]}
        });
        let scale = AnswerScale::from_value(&raw).unwrap();
        assert_eq!(scale.score_for("agree"), Some(1));

        let ru = AnswerScale::from_value_for_locale(&raw, "ru").unwrap();
        assert_eq!(ru.options()[0].id, AnswerId::new("agree"));
        assert!(AnswerScale::from_value_for_locale(&raw, "de").is_err());
    }

    #[test]
    fn test_numeric_option_ids() {
        let scale = AnswerScale::from_value(&json!([{"id": 1, "score": -2}])).unwrap();
        assert_eq!(scale.score_for("1"), Some(-2));
    }

    #[test]
    fn test_unrecognized_answer_scale_shapes() {
        assert!(matches!(
            AnswerScale::from_value(&json!("agree")),
            Err(TypologyError::Configuration(_))
        ));
        assert!(matches!(
            AnswerScale::from_value(&json!({"en": {"choices": []}})),
            Err(TypologyError::Configuration(_))
        ));
        assert!(matches!(
            AnswerScale::from_value(&json!([{"id": "x"}])),
            Err(TypologyError::Configuration(_))
        ));
    }

    #[test]
    fn test_answer_from_token() {
        assert_eq!(Answer::from_token("-2"), Answer::Id("-2".into()));
        assert_eq!(Answer::from_token(" agree "), Answer::Id("agree".into()));
    }

    #[test]
    fn test_answer_deserializes_untagged() {
        let answers: Vec<Answer> = serde_json::from_value(json!([2, "agree"])).unwrap();
        assert_eq!(answers, vec![Answer::Score(2), Answer::Id("agree".into())]);
    }

    #[test]
    fn test_localized_text_fallback() {
        let text: LocalizedText =
            serde_json::from_value(json!({"en": "Hello", "ru": "Привет"})).unwrap();
        assert_eq!(text.resolve("ru"), Some("Привет"));
        assert_eq!(text.resolve("de"), Some("Hello"));

        let plain = LocalizedText::from("Hi");
        assert_eq!(plain.resolve("ru"), Some("Hi"));
    }

    #[test]
    fn test_question_set_document() {
        let doc: QuestionSetDocument = serde_json::from_value(json!({
            "questions": {
                "T": [{"id": "t1", "text": "Logic first", "priority": 2}],
                "F": [{"id": "f1", "text": "People first"}]
            }
        }))
        .unwrap();
        assert_eq!(doc.question_count(), 2);
        let t = &doc.questions[&PoleId::new("T")][0];
        assert_eq!(t.priority, Some(2));
    }
}

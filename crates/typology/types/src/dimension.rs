//! Dimensions and the typed poles of the reserved axes
//!
//! A stage decides exactly one dimension. Four dimensions are reserved
//! because the category lookup depends on them:
//!
//! - `rationality`: rational / irrational
//! - `base`: base function letter, N or S (perceiving), T or F (judging)
//! - `orientation`: extraverted (`e`) / introverted (`i`)
//! - `creative`: a full two-letter function code such as `Ni`
//!
//! Any other dimension name is carried as [`Dimension::Custom`] and recorded
//! in the path without taking part in the lookup.

use serde::{Deserialize, Serialize};

// ── Dimension ────────────────────────────────────────────────────────

/// The axis a stage decides
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Dimension {
    Rationality,
    BaseFunction,
    Orientation,
    CreativeFunction,
    /// A configured dimension outside the reserved four
    Custom(String),
}

impl Dimension {
    /// Parse a dimension name as written in the stage graph
    pub fn parse(name: &str) -> Self {
        match name.trim() {
            "rationality" => Self::Rationality,
            "base" | "base_function" | "baseFunction" => Self::BaseFunction,
            "orientation" => Self::Orientation,
            "creative" | "creative_function" | "creativeFunction" => Self::CreativeFunction,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Canonical name used in documents and in the path
    pub fn key(&self) -> &str {
        match self {
            Self::Rationality => "rationality",
            Self::BaseFunction => "base",
            Self::Orientation => "orientation",
            Self::CreativeFunction => "creative",
            Self::Custom(key) => key,
        }
    }

    pub fn is_reserved(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }
}

impl From<String> for Dimension {
    fn from(name: String) -> Self {
        Self::parse(&name)
    }
}

impl From<&str> for Dimension {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

impl From<Dimension> for String {
    fn from(dimension: Dimension) -> Self {
        dimension.key().to_string()
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

// ── Rationality ──────────────────────────────────────────────────────

/// Pole of the rationality axis
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Rationality {
    Rational,
    Irrational,
}

impl Rationality {
    pub fn from_pole(pole: &str) -> Option<Self> {
        match pole.trim().to_ascii_lowercase().as_str() {
            "rational" => Some(Self::Rational),
            "irrational" => Some(Self::Irrational),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rational => "rational",
            Self::Irrational => "irrational",
        }
    }
}

impl TryFrom<String> for Rationality {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_pole(&value).ok_or_else(|| format!("unknown rationality '{}'", value))
    }
}

impl From<Rationality> for String {
    fn from(value: Rationality) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for Rationality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ── Base function ────────────────────────────────────────────────────

/// Pole of the base-function axis
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BaseFunction {
    Intuition,
    Sensing,
    Thinking,
    Feeling,
}

impl BaseFunction {
    pub fn from_pole(pole: &str) -> Option<Self> {
        match pole.trim().to_ascii_lowercase().as_str() {
            "n" | "intuition" => Some(Self::Intuition),
            "s" | "sensing" => Some(Self::Sensing),
            "t" | "thinking" | "logic" => Some(Self::Thinking),
            "f" | "feeling" | "ethics" => Some(Self::Feeling),
            _ => None,
        }
    }

    pub fn letter(&self) -> char {
        match self {
            Self::Intuition => 'N',
            Self::Sensing => 'S',
            Self::Thinking => 'T',
            Self::Feeling => 'F',
        }
    }

    /// Judging functions lead rational types
    pub fn is_judging(&self) -> bool {
        matches!(self, Self::Thinking | Self::Feeling)
    }

    pub fn is_perceiving(&self) -> bool {
        !self.is_judging()
    }
}

// ── Orientation ──────────────────────────────────────────────────────

/// Pole of the orientation axis
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    Extraverted,
    Introverted,
}

impl Orientation {
    pub fn from_pole(pole: &str) -> Option<Self> {
        match pole.trim().to_ascii_lowercase().as_str() {
            "e" | "extraverted" | "extroverted" | "extravert" => Some(Self::Extraverted),
            "i" | "introverted" | "introvert" => Some(Self::Introverted),
            _ => None,
        }
    }

    pub fn letter(&self) -> char {
        match self {
            Self::Extraverted => 'e',
            Self::Introverted => 'i',
        }
    }
}

// ── Function code ────────────────────────────────────────────────────

/// A two-letter function code: base letter plus orientation (`"Te"`, `"Ni"`)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FunctionCode {
    pub base: BaseFunction,
    pub orientation: Orientation,
}

impl FunctionCode {
    pub fn new(base: BaseFunction, orientation: Orientation) -> Self {
        Self { base, orientation }
    }

    /// Parse a code such as `"Fi"`; the letters are case-insensitive
    pub fn parse(code: &str) -> Option<Self> {
        let mut chars = code.trim().chars();
        let base = chars.next()?;
        let orientation = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        Some(Self {
            base: BaseFunction::from_pole(&base.to_string())?,
            orientation: Orientation::from_pole(&orientation.to_string())?,
        })
    }

    pub fn code(&self) -> String {
        format!("{}{}", self.base.letter(), self.orientation.letter())
    }

    /// Whether a catalog code string names this function
    pub fn matches(&self, code: &str) -> bool {
        Self::parse(code).as_ref() == Some(self)
    }
}

impl std::fmt::Display for FunctionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.base.letter(), self.orientation.letter())
    }
}

/// Synthesize the leading function from the three reserved poles.
///
/// Rational types lead with a judging function (T, F), irrational types
/// with a perceiving one (N, S), giving eight leading codes in total.
/// A base pole from the wrong family yields `None`.
pub fn leading_code(
    rationality: Rationality,
    base: BaseFunction,
    orientation: Orientation,
) -> Option<FunctionCode> {
    match (rationality, base) {
        (Rationality::Rational, BaseFunction::Thinking | BaseFunction::Feeling)
        | (Rationality::Irrational, BaseFunction::Intuition | BaseFunction::Sensing) => {
            Some(FunctionCode::new(base, orientation))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_parse_reserved_and_custom() {
        assert_eq!(Dimension::parse("rationality"), Dimension::Rationality);
        assert_eq!(Dimension::parse("baseFunction"), Dimension::BaseFunction);
        assert_eq!(Dimension::parse("creative"), Dimension::CreativeFunction);
        assert_eq!(
            Dimension::parse("temperament"),
            Dimension::Custom("temperament".into())
        );
        assert!(!Dimension::parse("temperament").is_reserved());
    }

    #[test]
    fn test_dimension_serde_uses_canonical_key() {
        let dim: Dimension = serde_json::from_str("\"base_function\"").unwrap();
        assert_eq!(serde_json::to_string(&dim).unwrap(), "\"base\"");
    }

    #[test]
    fn test_leading_code_table() {
        use BaseFunction::*;
        use Orientation::*;
        use Rationality::*;

        let expected = [
            (Rational, Thinking, Extraverted, "Te"),
            (Rational, Thinking, Introverted, "Ti"),
            (Rational, Feeling, Extraverted, "Fe"),
            (Rational, Feeling, Introverted, "Fi"),
            (Irrational, Intuition, Extraverted, "Ne"),
            (Irrational, Intuition, Introverted, "Ni"),
            (Irrational, Sensing, Extraverted, "Se"),
            (Irrational, Sensing, Introverted, "Si"),
        ];
        for (rationality, base, orientation, code) in expected {
            let leading = leading_code(rationality, base, orientation).unwrap();
            assert_eq!(leading.code(), code);
        }
    }

    #[test]
    fn test_leading_code_rejects_wrong_family() {
        assert!(leading_code(
            Rationality::Rational,
            BaseFunction::Intuition,
            Orientation::Extraverted
        )
        .is_none());
        assert!(leading_code(
            Rationality::Irrational,
            BaseFunction::Feeling,
            Orientation::Introverted
        )
        .is_none());
    }

    #[test]
    fn test_function_code_parse() {
        let code = FunctionCode::parse("Ni").unwrap();
        assert_eq!(code.base, BaseFunction::Intuition);
        assert_eq!(code.orientation, Orientation::Introverted);
        assert!(code.matches("NI"));
        assert!(FunctionCode::parse("Nix").is_none());
        assert!(FunctionCode::parse("Xe").is_none());
    }

    #[test]
    fn test_rationality_serde() {
        let r: Rationality = serde_json::from_str("\"Irrational\"").unwrap();
        assert_eq!(r, Rationality::Irrational);
        assert!(serde_json::from_str::<Rationality>("\"chaotic\"").is_err());
    }
}

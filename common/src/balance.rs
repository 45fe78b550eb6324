//! Balance rating classification
//!
//! Maps the model's `equilibrio` value to a display color token and a
//! human-readable label. Unknown values fall back to a neutral color and a
//! placeholder label; these helpers never fail.

use serde::{Deserialize, Serialize};

/// Neutral color for unrecognized ratings
pub const DEFAULT_COLOR: &str = "gray";

/// Placeholder label for unrecognized ratings
pub const PENDING_LABEL: &str = "Análise em andamento...";

/// Four-value nutrition quality rating attached to a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BalanceRating {
    Excellent,
    Good,
    Regular,
    NeedsImprovement,
    /// Anything the model returned outside the four known values
    Unrecognized(String),
}

impl BalanceRating {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "excelente" => BalanceRating::Excellent,
            "bom" => BalanceRating::Good,
            "regular" => BalanceRating::Regular,
            "precisa_melhorar" => BalanceRating::NeedsImprovement,
            other => BalanceRating::Unrecognized(other.to_string()),
        }
    }

    /// Wire value (`excelente`, `bom`, ...)
    pub fn as_str(&self) -> &str {
        match self {
            BalanceRating::Excellent => "excelente",
            BalanceRating::Good => "bom",
            BalanceRating::Regular => "regular",
            BalanceRating::NeedsImprovement => "precisa_melhorar",
            BalanceRating::Unrecognized(s) => s.as_str(),
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            BalanceRating::Excellent => "green",
            BalanceRating::Good => "blue",
            BalanceRating::Regular => "yellow",
            BalanceRating::NeedsImprovement => "red",
            BalanceRating::Unrecognized(_) => DEFAULT_COLOR,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BalanceRating::Excellent => "Excelente equilíbrio nutricional! 🌟",
            BalanceRating::Good => "Boa refeição nutritiva! 👍",
            BalanceRating::Regular => "Refeição adequada, mas pode melhorar 💡",
            BalanceRating::NeedsImprovement => "Considere adicionar mais nutrientes ⚠️",
            BalanceRating::Unrecognized(_) => PENDING_LABEL,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, BalanceRating::Unrecognized(_))
    }
}

impl Default for BalanceRating {
    fn default() -> Self {
        BalanceRating::Unrecognized(String::new())
    }
}

impl From<String> for BalanceRating {
    fn from(value: String) -> Self {
        BalanceRating::parse(&value)
    }
}

impl From<BalanceRating> for String {
    fn from(rating: BalanceRating) -> Self {
        rating.as_str().to_string()
    }
}

impl std::fmt::Display for BalanceRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Color token for a raw rating string
pub fn balance_color(rating: &str) -> &'static str {
    BalanceRating::parse(rating).color()
}

/// Display label for a raw rating string
pub fn balance_label(rating: &str) -> &'static str {
    BalanceRating::parse(rating).label()
}

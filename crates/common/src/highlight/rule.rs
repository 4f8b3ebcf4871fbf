// Highlight rules parsed from `[highlight]` keys:
//
//   keyword   = "red underline"   # exact, case-insensitive
//   "substr~" = "italic green"    # substring
//   "fuzzy~2" = "reverse blue"    # Damerau–Levenshtein distance <= 2

use std::fmt;
use std::num::ParseIntError;

use thiserror::Error;

use super::distance::damerau_levenshtein;
use super::style::Style;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("unable to parse distance in highlight key {key:?}")]
    InvalidDistance {
        key: String,
        #[source]
        source: ParseIntError,
    },

    #[error("highlight key is empty")]
    EmptyToken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Case-insensitive equality.
    Exact,
    /// Case-insensitive containment of the token in the word.
    Substring,
    /// Case-insensitive edit distance no greater than the given bound.
    Fuzzy(u8),
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => f.write_str("exact"),
            Self::Substring => f.write_str("substring"),
            Self::Fuzzy(distance) => write!(f, "fuzzy~{distance}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightRule {
    token: String,
    folded: String,
    mode: MatchMode,
    style: Style,
}

impl HighlightRule {
    pub fn new(token: impl Into<String>, mode: MatchMode, style: Style) -> Self {
        let token = token.into();
        let folded = token.to_lowercase();
        let mode = match mode {
            MatchMode::Fuzzy(0) => MatchMode::Exact,
            other => other,
        };
        Self { token, folded, mode, style }
    }

    /// Parse a rule from its config key and style definition.
    pub fn parse(key: &str, style: &str) -> Result<Self, RuleError> {
        let (token, mode) = parse_key(key)?;
        Ok(Self::new(token, mode, Style::parse(style)))
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Test a word that has already been lowercased.
    pub fn matches_folded(&self, folded_word: &str) -> bool {
        match self.mode {
            MatchMode::Exact => folded_word == self.folded,
            MatchMode::Substring => folded_word.contains(&self.folded),
            MatchMode::Fuzzy(distance) => {
                damerau_levenshtein(folded_word, &self.folded) <= usize::from(distance)
            }
        }
    }

    pub fn matches(&self, word: &str) -> bool {
        self.matches_folded(&word.to_lowercase())
    }
}

/// Split a key into its token and match mode.
///
/// A bare trailing `~` selects substring matching; `~N` selects fuzzy
/// matching with distance `N` (`~0` is exact).
pub fn parse_key(key: &str) -> Result<(&str, MatchMode), RuleError> {
    let (token, mode) = match key.rsplit_once('~') {
        None => (key, MatchMode::Exact),
        Some((token, "")) => (token, MatchMode::Substring),
        Some((token, distance)) => {
            let distance = distance.parse::<u8>().map_err(|source| {
                RuleError::InvalidDistance { key: key.to_string(), source }
            })?;
            (token, MatchMode::Fuzzy(distance))
        }
    };

    if token.is_empty() {
        return Err(RuleError::EmptyToken);
    }
    Ok((token, mode))
}

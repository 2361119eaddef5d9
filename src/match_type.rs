//! Keyword match types and the decoration each one applies to a negative.

use crate::error::{NegativeKeywordError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    #[schemars(description = "Broad match: the phrase is used as-is, e.g. `red shoes`")]
    Broad,

    #[schemars(description = "Broad match modifier: every word is prefixed with '+', e.g. `+red +shoes`")]
    Bmm,

    #[schemars(description = "Phrase match: the phrase is wrapped in double quotes, e.g. `\"red shoes\"`")]
    Phrase,

    #[schemars(description = "Exact match: the phrase is wrapped in square brackets, e.g. `[red shoes]`")]
    Exact,
}

impl MatchType {
    /// Applies this match type's syntax to a raw phrase.
    ///
    /// Leading and trailing whitespace is removed first. For [`MatchType::Bmm`]
    /// the phrase is split on any run of whitespace and rejoined with single spaces.
    pub fn decorate(self, phrase: &str) -> String {
        let trimmed = phrase.trim();
        match self {
            MatchType::Broad => trimmed.to_string(),
            MatchType::Bmm => trimmed
                .split_whitespace()
                .map(|token| format!("+{}", token))
                .collect::<Vec<_>>()
                .join(" "),
            MatchType::Phrase => format!("\"{}\"", trimmed),
            MatchType::Exact => format!("[{}]", trimmed),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchType::Broad => "broad",
            MatchType::Bmm => "bmm",
            MatchType::Phrase => "phrase",
            MatchType::Exact => "exact",
        }
    }
}

impl FromStr for MatchType {
    type Err = NegativeKeywordError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "broad" => Ok(MatchType::Broad),
            "bmm" => Ok(MatchType::Bmm),
            "phrase" => Ok(MatchType::Phrase),
            "exact" => Ok(MatchType::Exact),
            _ => Err(NegativeKeywordError::UnsupportedMatchType(s.to_string())),
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Formats a candidate phrase for the match type named by `match_type`.
///
/// The name is compared case-insensitively. Anything other than broad, bmm,
/// phrase or exact fails with [`NegativeKeywordError::UnsupportedMatchType`].
pub fn format_negative(phrase: &str, match_type: &str) -> Result<String> {
    let match_type: MatchType = match_type.parse()?;
    Ok(match_type.decorate(phrase))
}

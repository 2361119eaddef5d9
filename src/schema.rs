use crate::error::Result;
use crate::match_type::MatchType;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Date range token used in the report's `DURING` clause.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DateRange {
    #[schemars(description = "No date restriction: the report covers the account's whole history")]
    AllTime,

    #[schemars(description = "A reporting range token such as LAST_30_DAYS or 20230101,20230131, passed through verbatim")]
    During(String),
}

impl DateRange {
    pub const ALL_TIME: &'static str = "ALL_TIME";

    /// Reads a range token. `ALL_TIME` (exact spelling) and blank tokens mean no restriction.
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        if token.is_empty() || token == Self::ALL_TIME {
            DateRange::AllTime
        } else {
            DateRange::During(token.to_string())
        }
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self::AllTime
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Settings {
    #[schemars(description = "Name of the campaign whose search queries are examined")]
    pub campaign_name: String,

    #[schemars(description = "Only consider queries with strictly more clicks than this. Unset or zero disables the filter.")]
    pub min_query_clicks: Option<f64>,

    #[schemars(description = "Only consider queries with strictly fewer conversions than this. Unset or zero disables the filter.")]
    pub max_query_conversions: Option<f64>,

    #[serde(default)]
    pub date_range: DateRange,

    #[schemars(description = "Match type applied to every negative keyword created for this sheet")]
    pub negative_match_type: MatchType,

    #[serde(default)]
    #[schemars(
        description = "If true, queries are pulled for the whole campaign instead of being scoped to each ad group"
    )]
    pub campaign_level_queries: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct AdGroupSpec {
    #[schemars(description = "Ad group name as it appears in the account")]
    pub name: String,

    #[schemars(
        description = "Shared negative keyword list to receive this ad group's negatives. When unset, negatives are created on the ad group itself."
    )]
    pub negative_list_name: Option<String>,

    #[schemars(description = "A query needs at least this many allowlist hits to be kept. Always >= 1.")]
    pub min_matches: usize,

    #[schemars(description = "1-indexed sheet column holding this ad group's configuration")]
    pub source_column: u32,
}

/// Lower-cased allowlist phrases for one ad group, in sheet order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(from = "Vec<String>")]
pub struct KeywordSet(Vec<String>);

impl KeywordSet {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
        )
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl From<Vec<String>> for KeywordSet {
    fn from(keywords: Vec<String>) -> Self {
        Self::new(keywords)
    }
}

impl From<KeywordSet> for Vec<String> {
    fn from(set: KeywordSet) -> Self {
        set.0
    }
}

/// Fixed cell positions of a configuration sheet. All coordinates are 1-indexed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(default)]
pub struct SheetLayout {
    #[schemars(description = "Row holding the six settings cells (campaign, clicks, conversions, date range, match type, campaign-level)")]
    pub settings_row: u32,
    pub settings_first_column: u32,
    pub min_matches_row: u32,
    pub ad_group_name_row: u32,
    pub negative_list_row: u32,
    #[schemars(description = "First row of each ad group's keyword allowlist")]
    pub first_keyword_row: u32,
    #[schemars(description = "Leftmost ad group column; columns to its left hold labels")]
    pub first_ad_group_column: u32,
    pub timestamp_row: u32,
    pub timestamp_column: u32,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            settings_row: 2,
            settings_first_column: 1,
            min_matches_row: 4,
            ad_group_name_row: 5,
            negative_list_row: 6,
            first_keyword_row: 7,
            first_ad_group_column: 2,
            timestamp_row: 1,
            timestamp_column: 7,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MatchingMode {
    #[default]
    #[schemars(description = "Lower-case the observed query before counting keyword hits. The negative keeps its original casing.")]
    CaseInsensitive,

    #[schemars(description = "Count keyword hits against the raw query text")]
    CaseSensitive,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    #[default]
    #[schemars(description = "The first sheet that fails ends the run")]
    AbortRun,

    #[schemars(description = "A failed sheet is logged and left undated, and the run moves to the next sheet")]
    ContinueWithNextSheet,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema)]
#[serde(default)]
pub struct RunOptions {
    pub matching: MatchingMode,

    pub failure_policy: FailurePolicy,

    #[schemars(description = "Drop repeated negatives within one ad group before they are applied")]
    pub dedupe_negatives: bool,

    pub layout: SheetLayout,
}

impl RunOptions {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(RunOptions)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

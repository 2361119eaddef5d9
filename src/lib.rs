//! # Negative Keyword Miner
//!
//! A library for finding wasteful search terms in an advertising account and
//! turning them into negative keywords, driven by a configuration workbook.
//!
//! ## Core Concepts
//!
//! - **Sheet**: one tab of the workbook. Row 2 holds the campaign settings, and
//!   each column from B onwards describes one ad group and its keyword allowlist.
//! - **Allowlist**: lower-cased phrases. A search query that contains fewer of
//!   them than the ad group's `min_matches` becomes a negative keyword.
//! - **Match type**: how the negative is written (`broad`, `+bmm`, `"phrase"`, `[exact]`).
//! - **Collaborators**: the workbook ([`Workbook`]), the reporting API
//!   ([`ReportSource`]) and the account API ([`AdAccount`]) are traits, so the
//!   host decides how they are reached.
//!
//! ## Example
//!
//! ```rust,ignore
//! use negative_keyword_miner::*;
//!
//! let workbook = InMemoryWorkbook::from_json_file("workbook.json".as_ref())?;
//! let options = RunOptions::from_json_file("options.json".as_ref())?;
//!
//! // `reports` and `account` wrap the advertising platform's API.
//! let summary = process_workbook(workbook, reports, account, options)?;
//! println!("{} negatives applied", summary.total_applied());
//! ```

pub mod account;
pub mod error;
pub mod filter;
pub mod match_type;
pub mod memory;
pub mod orchestrator;
pub mod query;
pub mod reader;
pub mod report;
pub mod schema;
pub mod sheet;
pub mod sink;

pub use account::AdAccount;
pub use error::{NegativeKeywordError, Result};
pub use filter::{dedupe_preserving_order, select_negatives, QueryFilter};
pub use match_type::{format_negative, MatchType};
pub use memory::{InMemorySheet, InMemoryWorkbook};
pub use orchestrator::{
    process_sheet, CampaignOrchestrator, Clock, RunSummary, SheetSummary, SystemClock,
};
pub use query::{build_report_query, ReportQueryBuilder};
pub use reader::SheetConfigReader;
pub use report::{ReportSource, SearchQueryRow};
pub use schema::*;
pub use sheet::{CellValue, Sheet, Workbook};
pub use sink::{ApplyOutcome, ApplySummary, NegativeKeywordSink};

use log::info;

/// Runs every sheet of `workbook`, stalest first, and returns what was applied.
///
/// Returns the workbook summary only; use [`CampaignOrchestrator`] directly to
/// keep the collaborators (and the re-stamped workbook) afterwards.
pub fn process_workbook<W, R, A>(
    workbook: W,
    reports: R,
    account: A,
    options: RunOptions,
) -> Result<RunSummary>
where
    W: Workbook,
    R: ReportSource,
    A: AdAccount,
{
    info!(
        "Starting negative keyword run ({:?} matching, {:?})",
        options.matching, options.failure_policy
    );
    CampaignOrchestrator::new(workbook, reports, account)
        .with_options(options)
        .run()
}

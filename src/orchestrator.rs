use crate::account::AdAccount;
use crate::error::{NegativeKeywordError, Result};
use crate::filter::{dedupe_preserving_order, QueryFilter};
use crate::query::ReportQueryBuilder;
use crate::reader::SheetConfigReader;
use crate::report::ReportSource;
use crate::schema::{FailurePolicy, RunOptions};
use crate::sheet::{Sheet, Workbook};
use crate::sink::NegativeKeywordSink;
use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// Undated sheets are placed this many days (plus their index) in the past.
const UNDATED_SHEET_AGE_DAYS: i64 = 1000;

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetSummary {
    pub sheet: String,
    pub ad_groups: usize,
    pub candidates: usize,
    pub applied: usize,
    pub ad_groups_missing: usize,
    pub lists_missing: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub sheets: Vec<SheetSummary>,
    /// `(sheet name, error message)` for sheets skipped under
    /// [`FailurePolicy::ContinueWithNextSheet`].
    pub failed: Vec<(String, String)>,
}

impl RunSummary {
    pub fn total_applied(&self) -> usize {
        self.sheets.iter().map(|s| s.applied).sum()
    }
}

/// Runs every sheet of a workbook, stalest first.
pub struct CampaignOrchestrator<W, R, A, C = SystemClock> {
    workbook: W,
    reports: R,
    account: A,
    clock: C,
    options: RunOptions,
}

impl<W, R, A> CampaignOrchestrator<W, R, A, SystemClock>
where
    W: Workbook,
    R: ReportSource,
    A: AdAccount,
{
    pub fn new(workbook: W, reports: R, account: A) -> Self {
        Self {
            workbook,
            reports,
            account,
            clock: SystemClock,
            options: RunOptions::default(),
        }
    }
}

impl<W, R, A, C> CampaignOrchestrator<W, R, A, C>
where
    W: Workbook,
    R: ReportSource,
    A: AdAccount,
    C: Clock,
{
    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_clock<C2: Clock>(self, clock: C2) -> CampaignOrchestrator<W, R, A, C2> {
        CampaignOrchestrator {
            workbook: self.workbook,
            reports: self.reports,
            account: self.account,
            clock,
            options: self.options,
        }
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    pub fn into_parts(self) -> (W, R, A) {
        (self.workbook, self.reports, self.account)
    }

    /// Sheet names sorted by last completion time, oldest first.
    ///
    /// A sheet without a timestamp counts as `now - (1000 + index)` days old,
    /// so undated sheets run before dated ones. The sort is stable.
    pub fn sheet_order(&mut self) -> Result<Vec<String>> {
        let reader = SheetConfigReader::new(self.options.layout.clone());
        let now = self.clock.now();

        let mut stamped = Vec::new();
        for (index, name) in self.workbook.sheet_names()?.into_iter().enumerate() {
            let sheet = self
                .workbook
                .sheet_mut(&name)?
                .ok_or_else(|| NegativeKeywordError::SheetNotFound(name.clone()))?;
            let timestamp = match reader.read_timestamp(&*sheet)? {
                Some(ts) => ts,
                None => now - Duration::days(UNDATED_SHEET_AGE_DAYS + index as i64),
            };
            stamped.push((timestamp, name));
        }

        stamped.sort_by_key(|(timestamp, _)| *timestamp);
        Ok(stamped.into_iter().map(|(_, name)| name).collect())
    }

    pub fn run(&mut self) -> Result<RunSummary> {
        let order = self.sheet_order()?;
        let mut summary = RunSummary::default();

        for name in order {
            match self.run_sheet(&name) {
                Ok(sheet_summary) => summary.sheets.push(sheet_summary),
                Err(e) => match self.options.failure_policy {
                    FailurePolicy::AbortRun => return Err(e),
                    FailurePolicy::ContinueWithNextSheet => {
                        warn!("Sheet '{}' failed and was skipped: {}", name, e);
                        summary.failed.push((name, e.to_string()));
                    }
                },
            }
        }

        info!(
            "Finished: {} sheets processed, {} failed, {} negatives applied",
            summary.sheets.len(),
            summary.failed.len(),
            summary.total_applied()
        );
        Ok(summary)
    }

    /// Processes one sheet by name and stamps it on success.
    pub fn run_sheet(&mut self, name: &str) -> Result<SheetSummary> {
        let sheet = self
            .workbook
            .sheet_mut(name)?
            .ok_or_else(|| NegativeKeywordError::SheetNotFound(name.to_string()))?;
        process_sheet(
            sheet,
            &mut self.reports,
            &mut self.account,
            &self.options,
            &self.clock,
        )
    }
}

/// Reads one sheet's configuration, derives and applies negatives for each
/// ad group in column order, then writes the completion timestamp.
///
/// Any error leaves the timestamp untouched.
pub fn process_sheet<S, R, A, C>(
    sheet: &mut S,
    reports: &mut R,
    account: &mut A,
    options: &RunOptions,
    clock: &C,
) -> Result<SheetSummary>
where
    S: Sheet + ?Sized,
    R: ReportSource + ?Sized,
    A: AdAccount,
    C: Clock + ?Sized,
{
    let reader = SheetConfigReader::new(options.layout.clone());
    let settings = reader.read_settings(&*sheet)?;
    let ad_groups = reader.read_ad_groups(&*sheet)?;

    info!(
        "Processing sheet '{}' for campaign '{}' ({} ad groups)",
        sheet.name(),
        settings.campaign_name,
        ad_groups.len()
    );

    let mut summary = SheetSummary {
        sheet: sheet.name().to_string(),
        ad_groups: ad_groups.len(),
        ..Default::default()
    };
    let filter = QueryFilter::new(options.matching);
    let mut sink = NegativeKeywordSink::new(account);

    for ad_group in &ad_groups {
        let keywords = reader.read_keywords(&*sheet, ad_group.source_column)?;
        let report_query = ReportQueryBuilder::build(&settings, ad_group);
        debug!(
            "Ad group '{}': {} keywords, query: {}",
            ad_group.name,
            keywords.len(),
            report_query
        );

        let observed: Vec<String> = reports
            .search_queries(&report_query)?
            .into_iter()
            .map(|row| row.query)
            .collect();

        let mut negatives = filter.select_negatives(&observed, &keywords, ad_group.min_matches);
        if options.dedupe_negatives {
            negatives = dedupe_preserving_order(negatives);
        }
        debug!(
            "Ad group '{}': {} of {} queries selected as negatives",
            ad_group.name,
            negatives.len(),
            observed.len()
        );

        let applied = sink.apply_all(&negatives, ad_group, &settings)?;
        summary.candidates += negatives.len();
        summary.applied += applied.applied;
        summary.lists_missing += applied.lists_missing;
        if applied.ad_group_missing {
            summary.ad_groups_missing += 1;
        }
    }

    reader.write_timestamp(sheet, clock.now())?;
    info!(
        "Sheet '{}' done: {} negatives applied",
        summary.sheet, summary.applied
    );
    Ok(summary)
}

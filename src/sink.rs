use crate::account::AdAccount;
use crate::error::Result;
use crate::schema::{AdGroupSpec, Settings};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplyOutcome {
    Applied,
    AdGroupNotFound,
    ListNotFound,
    /// The negative was empty after trimming and never reached the account.
    SkippedBlank,
}

/// Tally of one ad group's negatives after they went through the sink.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplySummary {
    pub applied: usize,
    pub lists_missing: usize,
    pub ad_group_missing: bool,
    pub skipped_blank: usize,
}

/// Sends formatted negatives to a shared list or straight to the ad group.
pub struct NegativeKeywordSink<'a, A: AdAccount> {
    account: &'a mut A,
}

impl<'a, A: AdAccount> NegativeKeywordSink<'a, A> {
    pub fn new(account: &'a mut A) -> Self {
        Self { account }
    }

    /// Applies a single formatted negative, looking up the ad group first.
    /// Blank text is skipped without touching the account.
    pub fn apply(
        &mut self,
        formatted_negative: &str,
        ad_group: &AdGroupSpec,
        campaign_name: &str,
    ) -> Result<ApplyOutcome> {
        if formatted_negative.trim().is_empty() {
            debug!("Skipping blank negative for ad group '{}'", ad_group.name);
            return Ok(ApplyOutcome::SkippedBlank);
        }
        match self.account.find_ad_group(&ad_group.name, campaign_name)? {
            Some(handle) => self.route(&handle, formatted_negative, ad_group),
            None => {
                log_missing_ad_group(ad_group, campaign_name);
                Ok(ApplyOutcome::AdGroupNotFound)
            }
        }
    }

    /// Formats and applies every candidate of one ad group.
    ///
    /// The ad group is looked up once. If it is missing, all candidates are
    /// skipped, including those bound for a shared list. Blank candidates are
    /// never formatted.
    pub fn apply_all<S: AsRef<str>>(
        &mut self,
        candidates: &[S],
        ad_group: &AdGroupSpec,
        settings: &Settings,
    ) -> Result<ApplySummary> {
        let mut summary = ApplySummary::default();
        if candidates.is_empty() {
            return Ok(summary);
        }

        let handle = match self
            .account
            .find_ad_group(&ad_group.name, &settings.campaign_name)?
        {
            Some(handle) => handle,
            None => {
                log_missing_ad_group(ad_group, &settings.campaign_name);
                summary.ad_group_missing = true;
                return Ok(summary);
            }
        };

        for candidate in candidates {
            // Decoration would turn a blank query into `""` or `[]`.
            let negative = match candidate.as_ref().trim() {
                "" => String::new(),
                text => settings.negative_match_type.decorate(text),
            };
            match self.route(&handle, &negative, ad_group)? {
                ApplyOutcome::Applied => summary.applied += 1,
                ApplyOutcome::ListNotFound => summary.lists_missing += 1,
                ApplyOutcome::SkippedBlank => summary.skipped_blank += 1,
                ApplyOutcome::AdGroupNotFound => {}
            }
        }

        Ok(summary)
    }

    fn route(&mut self, handle: &A::AdGroup, negative: &str, ad_group: &AdGroupSpec) -> Result<ApplyOutcome> {
        if negative.trim().is_empty() {
            debug!("Skipping blank negative for ad group '{}'", ad_group.name);
            return Ok(ApplyOutcome::SkippedBlank);
        }
        match &ad_group.negative_list_name {
            Some(list_name) => match self.account.find_negative_list(list_name)? {
                Some(list) => {
                    self.account
                        .add_negative_keywords(&list, &[negative.to_string()])?;
                    debug!("Added '{}' to negative list '{}'", negative, list_name);
                    Ok(ApplyOutcome::Applied)
                }
                None => {
                    warn!("The shared negative list '{}' can't be found", list_name);
                    Ok(ApplyOutcome::ListNotFound)
                }
            },
            None => {
                self.account.create_negative_keyword(handle, negative)?;
                debug!("Added '{}' to ad group '{}'", negative, ad_group.name);
                Ok(ApplyOutcome::Applied)
            }
        }
    }
}

fn log_missing_ad_group(ad_group: &AdGroupSpec, campaign_name: &str) {
    warn!(
        "AdGroup '{}' in Campaign '{}' not found in the account. Check the AdGroup name is correct in the sheet.",
        ad_group.name, campaign_name
    );
}

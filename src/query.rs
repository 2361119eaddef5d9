use crate::schema::{AdGroupSpec, DateRange, Settings};
use crate::sheet::format_number;

pub const SEARCH_QUERY_REPORT: &str = "SEARCH_QUERY_PERFORMANCE_REPORT";

/// Builds the search-query report request for one ad group.
///
/// Clause order is fixed: campaign, clicks, conversions, ad group, date range.
/// Each optional clause is emitted only when its setting is present.
pub struct ReportQueryBuilder;

impl ReportQueryBuilder {
    pub fn build(settings: &Settings, ad_group: &AdGroupSpec) -> String {
        let mut query = format!(
            "SELECT Query FROM {} WHERE CampaignName = '{}'",
            SEARCH_QUERY_REPORT, settings.campaign_name
        );

        if let Some(clicks) = settings.min_query_clicks.filter(|c| *c != 0.0) {
            query.push_str(&format!(" AND Clicks > {}", format_number(clicks)));
        }

        if let Some(conversions) = settings.max_query_conversions.filter(|c| *c != 0.0) {
            query.push_str(&format!(" AND Conversions < {}", format_number(conversions)));
        }

        if !settings.campaign_level_queries {
            query.push_str(&format!(" AND AdGroupName = \"{}\"", ad_group.name));
        }

        if let DateRange::During(range) = &settings.date_range {
            query.push_str(&format!(" DURING {}", range));
        }

        query
    }
}

pub fn build_report_query(settings: &Settings, ad_group: &AdGroupSpec) -> String {
    ReportQueryBuilder::build(settings, ad_group)
}

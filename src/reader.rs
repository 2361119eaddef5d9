use crate::error::{NegativeKeywordError, Result};
use crate::match_type::MatchType;
use crate::schema::{AdGroupSpec, DateRange, KeywordSet, Settings, SheetLayout};
use crate::sheet::{CellValue, Sheet};
use chrono::{DateTime, Utc};
use log::{debug, warn};

const SETTINGS_WIDTH: u32 = 6;
const CAMPAIGN_LEVEL_YES: &str = "Yes";

/// Reads settings, ad-group columns, keyword lists and the run timestamp
/// from a sheet laid out per [`SheetLayout`].
pub struct SheetConfigReader {
    layout: SheetLayout,
}

impl SheetConfigReader {
    pub fn new(layout: SheetLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &SheetLayout {
        &self.layout
    }

    pub fn read_settings<S: Sheet + ?Sized>(&self, sheet: &S) -> Result<Settings> {
        let row = sheet
            .range(
                self.layout.settings_row,
                self.layout.settings_first_column,
                1,
                SETTINGS_WIDTH,
            )?
            .into_iter()
            .next()
            .unwrap_or_default();
        let cell = |i: usize| row.get(i).cloned().unwrap_or_default();

        let campaign_name = cell(0).as_text();
        if campaign_name.trim().is_empty() {
            return Err(NegativeKeywordError::InvalidSetting {
                field: "campaign_name".to_string(),
                details: format!("sheet '{}' has no campaign name", sheet.name()),
            });
        }

        let settings = Settings {
            campaign_name,
            min_query_clicks: optional_threshold(&cell(1), "min_query_clicks")?,
            max_query_conversions: optional_threshold(&cell(2), "max_query_conversions")?,
            date_range: DateRange::parse(&cell(3).as_text()),
            negative_match_type: cell(4).as_text().parse::<MatchType>()?,
            campaign_level_queries: matches!(cell(5), CellValue::Text(ref s) if s == CAMPAIGN_LEVEL_YES),
        };

        debug!("Settings for sheet '{}': {:?}", sheet.name(), settings);
        Ok(settings)
    }

    /// Scans ad-group columns left to right, stopping at the first column
    /// whose min-matches cell is blank or zero.
    pub fn read_ad_groups<S: Sheet + ?Sized>(&self, sheet: &S) -> Result<Vec<AdGroupSpec>> {
        let (_, last_column) = sheet.dimensions()?;
        let first = self.layout.first_ad_group_column;
        if last_column < first {
            return Ok(Vec::new());
        }
        let width = last_column - first + 1;

        let read_row = |row: u32| -> Result<Vec<CellValue>> {
            Ok(sheet
                .range(row, first, 1, width)?
                .into_iter()
                .next()
                .unwrap_or_default())
        };
        let thresholds = read_row(self.layout.min_matches_row)?;
        let names = read_row(self.layout.ad_group_name_row)?;
        let lists = read_row(self.layout.negative_list_row)?;

        let mut ad_groups = Vec::new();
        for (offset, threshold) in thresholds.iter().enumerate() {
            if !threshold.is_truthy() {
                break;
            }
            let column = first + offset as u32;
            let min_matches = parse_min_matches(threshold, column)?;

            let name = names.get(offset).map(CellValue::as_text).unwrap_or_default();
            if name.trim().is_empty() {
                return Err(NegativeKeywordError::InvalidAdGroup {
                    column,
                    details: "ad group name is blank".to_string(),
                });
            }

            let negative_list_name = lists
                .get(offset)
                .map(CellValue::as_text)
                .filter(|list| !list.trim().is_empty());

            ad_groups.push(AdGroupSpec {
                name,
                negative_list_name,
                min_matches,
                source_column: column,
            });
        }

        Ok(ad_groups)
    }

    /// Reads a keyword column downward until the first blank cell, lower-casing each entry.
    pub fn read_keywords<S: Sheet + ?Sized>(&self, sheet: &S, column: u32) -> Result<KeywordSet> {
        let (last_row, _) = sheet.dimensions()?;
        let first = self.layout.first_keyword_row;
        if last_row < first {
            return Ok(KeywordSet::default());
        }

        let cells = sheet.range(first, column, last_row - first + 1, 1)?;
        let keywords = cells
            .into_iter()
            .map(|row| row.into_iter().next().unwrap_or_default())
            .take_while(CellValue::is_truthy)
            .map(|cell| cell.as_text());

        Ok(KeywordSet::new(keywords))
    }

    /// Last completion time recorded on the sheet, if it holds a readable one.
    pub fn read_timestamp<S: Sheet + ?Sized>(&self, sheet: &S) -> Result<Option<DateTime<Utc>>> {
        let value = sheet.cell(self.layout.timestamp_row, self.layout.timestamp_column)?;
        let timestamp = match &value {
            CellValue::DateTime(dt) => Some(*dt),
            CellValue::Text(s) if !s.trim().is_empty() => {
                match DateTime::parse_from_rfc3339(s.trim()) {
                    Ok(dt) => Some(dt.with_timezone(&Utc)),
                    Err(e) => {
                        warn!(
                            "Sheet '{}' has an unreadable timestamp '{}' ({}); treating it as never processed",
                            sheet.name(),
                            s,
                            e
                        );
                        None
                    }
                }
            }
            other if other.is_truthy() => {
                warn!(
                    "Sheet '{}' has a non-date timestamp cell {:?}; treating it as never processed",
                    sheet.name(),
                    other
                );
                None
            }
            _ => None,
        };
        Ok(timestamp)
    }

    pub fn write_timestamp<S: Sheet + ?Sized>(&self, sheet: &mut S, at: DateTime<Utc>) -> Result<()> {
        sheet.set_cell(
            self.layout.timestamp_row,
            self.layout.timestamp_column,
            CellValue::DateTime(at),
        )
    }
}

impl Default for SheetConfigReader {
    fn default() -> Self {
        Self::new(SheetLayout::default())
    }
}

/// Blank and zero thresholds are treated as "not set".
fn optional_threshold(cell: &CellValue, field: &str) -> Result<Option<f64>> {
    if !cell.is_truthy() {
        return Ok(None);
    }
    match cell.as_number() {
        Some(n) if n == 0.0 => Ok(None),
        Some(n) => Ok(Some(n)),
        None => Err(NegativeKeywordError::InvalidSetting {
            field: field.to_string(),
            details: format!("expected a number, found {:?}", cell),
        }),
    }
}

/// Fractional thresholds round up: with whole-number match counts,
/// `count < 1.5` selects the same queries as `count < 2`, and any value in
/// `(0, 1]` behaves as 1.
fn parse_min_matches(cell: &CellValue, column: u32) -> Result<usize> {
    let value = cell.as_number().ok_or_else(|| NegativeKeywordError::InvalidAdGroup {
        column,
        details: format!("min matches must be a number, found {:?}", cell),
    })?;
    if !value.is_finite() || value <= 0.0 {
        return Err(NegativeKeywordError::InvalidAdGroup {
            column,
            details: format!("min matches must be positive, found {}", value),
        });
    }
    Ok(value.ceil() as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemorySheet;
    use chrono::TimeZone;

    fn configured_sheet() -> InMemorySheet {
        InMemorySheet::new("Shoes")
            .with_row(
                2,
                1,
                [
                    CellValue::from("Shoes"),
                    CellValue::from(5.0),
                    CellValue::Empty,
                    CellValue::from("LAST_30_DAYS"),
                    CellValue::from("Phrase"),
                    CellValue::from("No"),
                ],
            )
            .with_row(4, 2, [CellValue::from(2.0), CellValue::from(1.0)])
            .with_row(5, 2, ["Red Shoes", "Blue Shoes"])
            .with_row(6, 2, [CellValue::Empty, CellValue::from("Shared Negatives")])
            .with_column(7, 2, ["Red", "SHOES", "cheap"])
            .with_column(7, 3, [CellValue::from("blue"), CellValue::Empty, CellValue::from("orphan")])
    }

    #[test]
    fn test_read_settings() {
        let reader = SheetConfigReader::default();
        let settings = reader.read_settings(&configured_sheet()).unwrap();

        assert_eq!(settings.campaign_name, "Shoes");
        assert_eq!(settings.min_query_clicks, Some(5.0));
        assert_eq!(settings.max_query_conversions, None);
        assert_eq!(settings.date_range, DateRange::During("LAST_30_DAYS".to_string()));
        assert_eq!(settings.negative_match_type, MatchType::Phrase);
        assert!(!settings.campaign_level_queries);
    }

    #[test]
    fn test_campaign_level_requires_literal_yes() {
        let reader = SheetConfigReader::default();
        let yes = configured_sheet().with_cell(2, 6, "Yes");
        assert!(reader.read_settings(&yes).unwrap().campaign_level_queries);

        let lower = configured_sheet().with_cell(2, 6, "yes");
        assert!(!reader.read_settings(&lower).unwrap().campaign_level_queries);

        let boolean = configured_sheet().with_cell(2, 6, true);
        assert!(!reader.read_settings(&boolean).unwrap().campaign_level_queries);
    }

    #[test]
    fn test_zero_thresholds_are_unset() {
        let reader = SheetConfigReader::default();
        let sheet = configured_sheet().with_cell(2, 2, 0.0).with_cell(2, 3, "3");
        let settings = reader.read_settings(&sheet).unwrap();
        assert_eq!(settings.min_query_clicks, None);
        assert_eq!(settings.max_query_conversions, Some(3.0));
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let reader = SheetConfigReader::default();

        let bad_match = configured_sheet().with_cell(2, 5, "fuzzy");
        assert!(matches!(
            reader.read_settings(&bad_match),
            Err(NegativeKeywordError::UnsupportedMatchType(ref m)) if m == "fuzzy"
        ));

        let bad_clicks = configured_sheet().with_cell(2, 2, "lots");
        assert!(matches!(
            reader.read_settings(&bad_clicks),
            Err(NegativeKeywordError::InvalidSetting { ref field, .. }) if field == "min_query_clicks"
        ));

        let no_campaign = configured_sheet().with_cell(2, 1, CellValue::Empty);
        assert!(reader.read_settings(&no_campaign).is_err());
    }

    #[test]
    fn test_read_ad_groups() {
        let reader = SheetConfigReader::default();
        let ad_groups = reader.read_ad_groups(&configured_sheet()).unwrap();

        assert_eq!(
            ad_groups,
            vec![
                AdGroupSpec {
                    name: "Red Shoes".to_string(),
                    negative_list_name: None,
                    min_matches: 2,
                    source_column: 2,
                },
                AdGroupSpec {
                    name: "Blue Shoes".to_string(),
                    negative_list_name: Some("Shared Negatives".to_string()),
                    min_matches: 1,
                    source_column: 3,
                },
            ]
        );
    }

    #[test]
    fn test_ad_group_scan_stops_at_first_blank_threshold() {
        let reader = SheetConfigReader::default();
        let sheet = configured_sheet()
            .with_cell(4, 3, 0.0)
            .with_cell(4, 4, 1.0)
            .with_cell(5, 4, "Green Shoes");
        let ad_groups = reader.read_ad_groups(&sheet).unwrap();
        assert_eq!(ad_groups.len(), 1);
        assert_eq!(ad_groups[0].name, "Red Shoes");
    }

    #[test]
    fn test_fractional_min_matches_round_up() {
        let reader = SheetConfigReader::default();
        let sheet = configured_sheet().with_cell(4, 2, 1.5);
        let ad_groups = reader.read_ad_groups(&sheet).unwrap();
        assert_eq!(ad_groups[0].min_matches, 2);

        let sheet = configured_sheet().with_cell(4, 2, 0.5);
        let ad_groups = reader.read_ad_groups(&sheet).unwrap();
        assert_eq!(ad_groups[0].min_matches, 1);
    }

    #[test]
    fn test_negative_min_matches_is_rejected() {
        let reader = SheetConfigReader::default();
        let sheet = configured_sheet().with_cell(4, 3, -1.0);
        assert!(matches!(
            reader.read_ad_groups(&sheet),
            Err(NegativeKeywordError::InvalidAdGroup { column: 3, .. })
        ));
    }

    #[test]
    fn test_read_keywords_stops_at_blank_and_lower_cases() {
        let reader = SheetConfigReader::default();
        let sheet = configured_sheet();

        let red = reader.read_keywords(&sheet, 2).unwrap();
        assert_eq!(red.as_slice(), &["red", "shoes", "cheap"]);

        let blue = reader.read_keywords(&sheet, 3).unwrap();
        assert_eq!(blue.as_slice(), &["blue"]);

        let numeric = InMemorySheet::new("n").with_column(7, 2, [CellValue::from(42.0)]);
        assert_eq!(reader.read_keywords(&numeric, 2).unwrap().as_slice(), &["42"]);

        let blank = InMemorySheet::new("blank");
        assert!(reader.read_keywords(&blank, 2).unwrap().is_empty());
    }

    #[test]
    fn test_timestamp_round_trip() {
        let reader = SheetConfigReader::default();
        let mut sheet = configured_sheet();
        assert_eq!(reader.read_timestamp(&sheet).unwrap(), None);

        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        reader.write_timestamp(&mut sheet, at).unwrap();
        assert_eq!(sheet.cell(1, 7).unwrap(), CellValue::DateTime(at));
        assert_eq!(reader.read_timestamp(&sheet).unwrap(), Some(at));

        let text = configured_sheet().with_cell(1, 7, "2024-05-01T09:00:00Z");
        assert_eq!(reader.read_timestamp(&text).unwrap(), Some(at));

        let garbage = configured_sheet().with_cell(1, 7, "last tuesday");
        assert_eq!(reader.read_timestamp(&garbage).unwrap(), None);
    }
}

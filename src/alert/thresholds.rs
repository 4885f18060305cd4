//! Station threshold processing.
//!
//! Thresholds arrive from the IMTD dataset in the station's datum. Before
//! display they are optionally shifted onto the local gauge (stage datum or
//! subtract offset), reduced to one value per semantic level using a fixed
//! type priority, and turned into the rows of a station's thresholds table.

use std::collections::HashMap;

use serde::Serialize;

use crate::alert::priority::PriorityOrder;
use crate::format::{escape_html, to_fixed_2};
use crate::model::{FwisType, ImtdThreshold, Station};
use crate::severity::Severity;

/// Alert-level threshold types, most preferred first.
pub const ALERT_THRESHOLD_TYPES: PriorityOrder =
    PriorityOrder::new(&["FW RES FAL", "FW ACT FAL", "FW ACTCON FAL"]);

/// Warning-level threshold types, most preferred first.
pub const WARNING_THRESHOLD_TYPES: PriorityOrder =
    PriorityOrder::new(&["FW RES FW", "FW ACT FW", "FW ACTCON FW"]);

pub const WARNING_THRESHOLD_ID: &str = "warningThreshold";
pub const ALERT_THRESHOLD_ID: &str = "alertThreshold";
pub const PC5_THRESHOLD_ID: &str = "pc5";
pub const TOP_OF_NORMAL_RANGE: &str = "Top of normal range";

/// One row of a station's thresholds table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayThreshold {
    pub id: String,
    pub description: String,
    pub short_name: String,
    /// Level to two decimal places.
    pub value: String,
}

impl DisplayThreshold {
    fn new(id: &str, description: String, short_name: &str, value: String) -> Self {
        Self {
            id: id.to_string(),
            description,
            short_name: short_name.to_string(),
            value,
        }
    }

    /// Numeric level; `value` is always produced by `to_fixed_2`.
    pub fn level(&self) -> Option<f64> {
        self.value.parse().ok()
    }

    /// Whether this row marks the top of the normal range.
    pub fn is_top_of_normal_range(&self) -> bool {
        self.id == PC5_THRESHOLD_ID || self.short_name == TOP_OF_NORMAL_RANGE
    }
}

// ---------------------------------------------------------------------------
// Datum adjustment
// ---------------------------------------------------------------------------

/// Adjusts a threshold onto the station's local gauge and formats it.
///
/// Returns `None` when there is no value. With `post_process` set the
/// stage datum is subtracted when positive; otherwise a positive subtract
/// offset is subtracted; otherwise the value is left as is.
pub fn process_threshold(
    value: Option<f64>,
    stage_datum: f64,
    subtract: Option<f64>,
    post_process: bool,
) -> Option<String> {
    value.map(|v| to_fixed_2(adjust_level(v, stage_datum, subtract, post_process)))
}

fn adjust_level(value: f64, stage_datum: f64, subtract: Option<f64>, post_process: bool) -> f64 {
    if !post_process {
        return value;
    }
    match subtract {
        _ if stage_datum > 0.0 => value - stage_datum,
        Some(offset) if offset > 0.0 => value - offset,
        _ => value,
    }
}

/// The datum settings of one station, bundled for repeated adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LevelAdjustment {
    pub stage_datum: f64,
    pub subtract: Option<f64>,
    pub post_process: bool,
}

impl LevelAdjustment {
    pub fn process(&self, value: Option<f64>) -> Option<String> {
        process_threshold(value, self.stage_datum, self.subtract, self.post_process)
    }
}

impl From<&Station> for LevelAdjustment {
    fn from(station: &Station) -> Self {
        Self {
            stage_datum: station.stage_datum,
            subtract: station.subtract,
            post_process: station.post_process,
        }
    }
}

// ---------------------------------------------------------------------------
// IMTD selection
// ---------------------------------------------------------------------------

/// Minimum alert value and minimum warning record chosen by type priority.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImtdSelection {
    pub alert: Option<f64>,
    pub warning: Option<ImtdThreshold>,
}

/// Alert and warning levels fed into [`process_imtd_thresholds`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImtdLevels {
    pub alert: Option<f64>,
    pub warning: Option<f64>,
}

impl From<&ImtdSelection> for ImtdLevels {
    fn from(selection: &ImtdSelection) -> Self {
        Self {
            alert: selection.alert,
            warning: selection.warning.as_ref().map(|t| t.value),
        }
    }
}

/// Picks the minimum-value threshold per category, taking only the first
/// threshold type in priority order that has any records.
pub fn filter_imtd_thresholds(thresholds: &[ImtdThreshold]) -> ImtdSelection {
    ImtdSelection {
        alert: min_for_types(thresholds, FwisType::Alert, ALERT_THRESHOLD_TYPES).map(|t| t.value),
        warning: min_for_types(thresholds, FwisType::Warning, WARNING_THRESHOLD_TYPES).cloned(),
    }
}

fn min_for_types(
    thresholds: &[ImtdThreshold],
    fwis_type: FwisType,
    order: PriorityOrder,
) -> Option<&ImtdThreshold> {
    let category: Vec<&ImtdThreshold> =
        thresholds.iter().filter(|t| t.fwis_type == fwis_type).collect();
    order
        .first_matching(&category, |t| t.threshold_type.as_str())
        .into_iter()
        .copied()
        .min_by(|a, b| a.value.total_cmp(&b.value))
}

/// Builds the IMTD rows of the thresholds table: a warning row if there is
/// a warning level, then one row for the alert level or top of normal range.
pub fn process_imtd_thresholds(
    levels: ImtdLevels,
    stage_datum: f64,
    subtract: Option<f64>,
    post_process: bool,
    pc5: Option<f64>,
) -> Vec<DisplayThreshold> {
    let mut thresholds = Vec::new();

    if let Some(warning) = process_threshold(levels.warning, stage_datum, subtract, post_process) {
        thresholds.push(DisplayThreshold::new(
            WARNING_THRESHOLD_ID,
            "Property flooding is possible above this level. \
             One or more flood warnings may be issued"
                .to_string(),
            "Possible flood warnings",
            warning,
        ));
    }

    match process_threshold(levels.alert, stage_datum, subtract, post_process) {
        Some(alert) => {
            // Compare as numbers: "1.10" and 1.1 are the same level.
            let equals_pc5 = matches!((alert.parse::<f64>().ok(), pc5), (Some(a), Some(p)) if a == p);
            if equals_pc5 {
                thresholds.push(DisplayThreshold::new(
                    ALERT_THRESHOLD_ID,
                    "Top of normal range. Low lying land flooding possible above this level. \
                     One or more flood alerts may be issued"
                        .to_string(),
                    TOP_OF_NORMAL_RANGE,
                    alert,
                ));
            } else {
                thresholds.push(DisplayThreshold::new(
                    ALERT_THRESHOLD_ID,
                    "Low lying land flooding possible above this level. \
                     One or more flood alerts may be issued"
                        .to_string(),
                    "Possible flood alerts",
                    alert,
                ));
            }
        }
        None => {
            if let Some(pc5) = pc5 {
                thresholds.push(DisplayThreshold::new(
                    PC5_THRESHOLD_ID,
                    "This is the top of the normal range".to_string(),
                    TOP_OF_NORMAL_RANGE,
                    to_fixed_2(pc5),
                ));
            }
        }
    }

    thresholds
}

// ---------------------------------------------------------------------------
// Active warning thresholds
// ---------------------------------------------------------------------------

/// Builds one row per warning area with a flood warning or severe flood
/// warning in force, linking to that area.
///
/// Where an area has several qualifying thresholds the most severe wins,
/// then the highest value. Rows keep the order in which each area first
/// appears.
pub fn process_warning_thresholds(
    thresholds: &[ImtdThreshold],
    stage_datum: f64,
    subtract: Option<f64>,
    post_process: bool,
) -> Vec<DisplayThreshold> {
    let mut by_code: HashMap<&str, usize> = HashMap::new();
    let mut selected: Vec<(&str, Severity, &ImtdThreshold)> = Vec::new();

    for threshold in thresholds.iter().filter(|t| t.fwis_type == FwisType::Warning) {
        let severity = match threshold.severity_value.and_then(Severity::from_value) {
            Some(s @ (Severity::Warning | Severity::SevereWarning)) => s,
            _ => continue,
        };
        let Some(code) = threshold.fwis_code.as_deref() else {
            continue;
        };
        match by_code.get(code) {
            Some(&index) => {
                let (_, current_severity, current) = selected[index];
                let outranks = (severity.value(), threshold.value)
                    > (current_severity.value(), current.value);
                if outranks {
                    selected[index] = (code, severity, threshold);
                }
            }
            None => {
                by_code.insert(code, selected.len());
                selected.push((code, severity, threshold));
            }
        }
    }

    selected
        .into_iter()
        .filter_map(|(code, severity, threshold)| {
            let value = process_threshold(Some(threshold.value), stage_datum, subtract, post_process)?;
            let name = threshold.ta_name.as_deref().unwrap_or(code);
            Some(DisplayThreshold::new(
                WARNING_THRESHOLD_ID,
                format!(
                    "{} issued: <a href=\"/target-area/{}\">{}</a>",
                    severity.info().title,
                    escape_html(code),
                    escape_html(name)
                ),
                name,
                value,
            ))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn imtd(fwis_type: FwisType, threshold_type: &str, value: f64) -> ImtdThreshold {
        ImtdThreshold {
            fwis_type,
            threshold_type: threshold_type.to_string(),
            value,
            fwis_code: None,
            severity_value: None,
            ta_name: None,
        }
    }

    fn warning(code: &str, severity: u8, value: f64, name: &str) -> ImtdThreshold {
        ImtdThreshold {
            fwis_code: Some(code.to_string()),
            severity_value: Some(severity),
            ta_name: Some(name.to_string()),
            ..imtd(FwisType::Warning, "FW RES FW", value)
        }
    }

    // --- process_threshold --------------------------------------------------

    #[test]
    fn test_absent_value_stays_absent() {
        assert_eq!(process_threshold(None, 2.5, Some(1.0), true), None);
    }

    #[test]
    fn test_without_post_process_value_is_only_formatted() {
        assert_eq!(process_threshold(Some(5.0), 2.5, Some(1.0), false).as_deref(), Some("5.00"));
        assert_eq!(process_threshold(Some(1.234), 0.0, None, false).as_deref(), Some("1.23"));
    }

    #[test]
    fn test_positive_stage_datum_is_subtracted() {
        assert_eq!(process_threshold(Some(5.0), 2.5, Some(1.0), true).as_deref(), Some("2.50"));
    }

    #[test]
    fn test_adjusted_level_on_a_half_rounds_up() {
        // 3.625 - 1.5 is exactly 2.125
        assert_eq!(process_threshold(Some(3.625), 1.5, None, true).as_deref(), Some("2.13"));
        assert_eq!(process_threshold(Some(1.625), 0.0, None, false).as_deref(), Some("1.63"));
    }

    #[test]
    fn test_subtract_used_when_datum_not_positive() {
        assert_eq!(process_threshold(Some(5.0), 0.0, Some(1.0), true).as_deref(), Some("4.00"));
        assert_eq!(process_threshold(Some(5.0), -3.0, Some(1.5), true).as_deref(), Some("3.50"));
    }

    #[test]
    fn test_zero_datum_and_no_positive_subtract_leaves_value() {
        assert_eq!(process_threshold(Some(5.0), 0.0, Some(0.0), true).as_deref(), Some("5.00"));
        assert_eq!(process_threshold(Some(5.0), 0.0, Some(-1.0), true).as_deref(), Some("5.00"));
        assert_eq!(process_threshold(Some(5.0), 0.0, None, true).as_deref(), Some("5.00"));
    }

    // --- filter_imtd_thresholds ---------------------------------------------

    #[test]
    fn test_filter_prefers_resolution_type_over_lower_action_value() {
        let thresholds = vec![
            imtd(FwisType::Alert, "FW ACT FAL", 0.5),
            imtd(FwisType::Alert, "FW RES FAL", 1.4),
            imtd(FwisType::Alert, "FW RES FAL", 1.2),
            imtd(FwisType::Warning, "FW ACTCON FW", 0.9),
            imtd(FwisType::Warning, "FW ACT FW", 2.2),
            imtd(FwisType::Warning, "FW ACT FW", 2.1),
        ];
        let selection = filter_imtd_thresholds(&thresholds);
        assert_eq!(selection.alert, Some(1.2));
        let warning = selection.warning.expect("warning should be selected");
        assert_eq!(warning.threshold_type, "FW ACT FW");
        assert_eq!(warning.value, 2.1);
    }

    #[test]
    fn test_filter_ignores_type_listed_for_other_category() {
        // A warning-type string on an alert record must not count as a warning.
        let thresholds = vec![imtd(FwisType::Alert, "FW RES FW", 1.0)];
        let selection = filter_imtd_thresholds(&thresholds);
        assert_eq!(selection, ImtdSelection::default());
    }

    #[test]
    fn test_filter_empty_input() {
        assert_eq!(filter_imtd_thresholds(&[]), ImtdSelection::default());
    }

    // --- process_imtd_thresholds --------------------------------------------

    #[test]
    fn test_imtd_warning_then_alert() {
        let levels = ImtdLevels { alert: Some(1.1), warning: Some(2.1) };
        let rows = process_imtd_thresholds(levels, 0.0, Some(0.0), false, None);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, WARNING_THRESHOLD_ID);
        assert_eq!(rows[0].value, "2.10");
        assert_eq!(rows[1].id, ALERT_THRESHOLD_ID);
        assert_eq!(rows[1].value, "1.10");
        assert_eq!(rows[1].short_name, "Possible flood alerts");
    }

    #[test]
    fn test_imtd_alert_equal_to_pc5_is_top_of_normal_range() {
        let levels = ImtdLevels { alert: Some(1.1), warning: None };
        let rows = process_imtd_thresholds(levels, 0.0, None, false, Some(1.1));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, ALERT_THRESHOLD_ID);
        assert_eq!(rows[0].short_name, TOP_OF_NORMAL_RANGE);
        assert!(rows[0].description.starts_with("Top of normal range"));
    }

    #[test]
    fn test_imtd_alert_compared_to_pc5_after_adjustment() {
        // 3.6 - 2.5 = 1.10 which equals pc5 numerically.
        let levels = ImtdLevels { alert: Some(3.6), warning: None };
        let rows = process_imtd_thresholds(levels, 2.5, None, true, Some(1.1));
        assert_eq!(rows[0].short_name, TOP_OF_NORMAL_RANGE);
        assert_eq!(rows[0].value, "1.10");
    }

    #[test]
    fn test_imtd_no_alert_synthesises_pc5() {
        let levels = ImtdLevels { alert: None, warning: Some(2.0) };
        let rows = process_imtd_thresholds(levels, 0.0, None, false, Some(0.75));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].id, PC5_THRESHOLD_ID);
        assert_eq!(rows[1].value, "0.75");
        assert!(rows[1].is_top_of_normal_range());
    }

    #[test]
    fn test_imtd_nothing_in_nothing_out() {
        assert!(process_imtd_thresholds(ImtdLevels::default(), 0.0, None, false, None).is_empty());
    }

    #[test]
    fn test_levels_from_selection() {
        let selection = ImtdSelection {
            alert: Some(1.0),
            warning: Some(imtd(FwisType::Warning, "FW RES FW", 2.0)),
        };
        assert_eq!(ImtdLevels::from(&selection), ImtdLevels { alert: Some(1.0), warning: Some(2.0) });
    }

    // --- process_warning_thresholds -----------------------------------------

    #[test]
    fn test_single_flood_warning_row() {
        let thresholds = vec![warning("X", 2, 1.6, "A")];
        let rows = process_warning_thresholds(&thresholds, 0.0, None, false);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, WARNING_THRESHOLD_ID);
        assert_eq!(rows[0].value, "1.60");
        assert!(rows[0].description.contains("Flood warning issued"));
        assert!(rows[0].description.contains("<a href=\"/target-area/X\">A</a>"));
    }

    #[test]
    fn test_severe_warning_wording() {
        let thresholds = vec![warning("X", 3, 1.6, "A")];
        let rows = process_warning_thresholds(&thresholds, 0.0, None, false);
        assert!(rows[0].description.starts_with("Severe flood warning issued"));
    }

    #[test]
    fn test_alerts_removed_and_alert_category_are_excluded() {
        let mut alert_record = warning("Y", 2, 1.0, "B");
        alert_record.fwis_type = FwisType::Alert;
        let thresholds = vec![
            warning("X", 1, 1.6, "A"),
            warning("X", 4, 1.6, "A"),
            alert_record,
        ];
        assert!(process_warning_thresholds(&thresholds, 0.0, None, false).is_empty());
    }

    #[test]
    fn test_one_row_per_code_highest_severity_then_value() {
        let thresholds = vec![
            warning("X", 2, 3.0, "A"),
            warning("X", 3, 1.0, "A"),
            warning("X", 3, 1.5, "A"),
            warning("Z", 2, 0.4, "C"),
            warning("Z", 2, 0.8, "C"),
        ];
        let rows = process_warning_thresholds(&thresholds, 0.0, None, false);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].value, "1.50");
        assert!(rows[0].description.starts_with("Severe"));
        assert_eq!(rows[1].value, "0.80");
    }

    #[test]
    fn test_warning_rows_are_datum_adjusted() {
        let thresholds = vec![warning("X", 2, 5.0, "A")];
        let rows = process_warning_thresholds(&thresholds, 2.5, None, true);
        assert_eq!(rows[0].value, "2.50");
    }
}

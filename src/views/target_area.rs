//! Target-area page view model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::alert::target_area::{TargetAreaStation, thresholds_for_target_area};
use crate::format::{escape_html, format_time_on_date};
use crate::logging::{self, Component};
use crate::model::{Flood, TargetArea, TargetAreaKind, TargetAreaThreshold};
use crate::severity::Severity;

/// Everything fetched for one target-area page.
#[derive(Debug, Clone, Copy)]
pub struct TargetAreaInput<'a> {
    pub area: &'a TargetArea,
    /// The area's current or recently removed flood, if any.
    pub flood: Option<&'a Flood>,
    /// The flood on the enclosing alert area, if any.
    pub parent_flood: Option<&'a Flood>,
    pub thresholds: &'a [TargetAreaThreshold],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetAreaViewModel {
    pub code: String,
    pub name: String,
    pub description: String,
    pub kind: TargetAreaKind,
    pub title: String,
    pub severity: Option<Severity>,
    pub is_active: bool,
    pub situation_html: String,
    pub situation_changed: String,
    /// The area itself has nothing in force but its parent area does.
    pub parent_area_alert: bool,
    pub parent_link: Option<String>,
    pub centroid: Option<[f64; 2]>,
    pub stations: Vec<TargetAreaStation>,
}

impl TargetAreaViewModel {
    pub fn new(input: &TargetAreaInput<'_>, now: DateTime<Utc>) -> Self {
        let area = input.area;
        let kind = area.kind();
        let severity = input.flood.map(|f| f.severity_value);
        let active_flood = input.flood.filter(|f| f.severity_value.is_active());

        let title = match active_flood {
            Some(flood) => format!("{}: {}", flood.severity_value.info().title, area.name),
            None => format!("{} {}", area.name, area_type_title(kind)),
        };

        let situation_html = match active_flood {
            Some(flood) => situation_paragraphs(&flood.situation),
            None => fallback_situation(kind).to_string(),
        };

        let situation_changed = match input.flood {
            Some(flood) if flood.severity_value == Severity::Removed => {
                format!("Removed {}", format_time_on_date(flood.situation_changed))
            }
            Some(flood) => format!("Updated {}", format_time_on_date(flood.situation_changed)),
            None => format!("Up to date as of {}", format_time_on_date(now)),
        };

        let parent_area_alert = is_parent_area_alert(input.flood, input.parent_flood);
        let parent_link = match (parent_area_alert, area.parent.as_deref()) {
            (true, Some(code)) => Some(format!("/target-area/{}", code)),
            _ => None,
        };

        let stations = thresholds_for_target_area(input.thresholds, now);
        logging::debug(
            Component::ViewModel,
            Some(&area.code),
            &format!("Target area view: {} stations, active={}", stations.len(), active_flood.is_some()),
        );

        Self {
            code: area.code.clone(),
            name: area.name.clone(),
            description: area.description.clone(),
            kind,
            title,
            severity,
            is_active: active_flood.is_some(),
            situation_html,
            situation_changed,
            parent_area_alert,
            parent_link,
            centroid: area.centroid,
            stations,
        }
    }
}

/// True when the area's own flood is removed or absent and its parent area
/// has an alert or warning in force.
pub fn is_parent_area_alert(flood: Option<&Flood>, parent_flood: Option<&Flood>) -> bool {
    let child_quiet = flood.is_none_or(|f| f.severity_value == Severity::Removed);
    let parent_active = parent_flood.is_some_and(|f| f.severity_value.is_active());
    child_quiet && parent_active
}

fn area_type_title(kind: TargetAreaKind) -> &'static str {
    match kind {
        TargetAreaKind::Alert => "flood alert area",
        TargetAreaKind::Warning => "flood warning area",
    }
}

/// One paragraph per non-blank line of the situation text.
fn situation_paragraphs(situation: &str) -> String {
    situation
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| format!("<p>{}</p>", escape_html(line)))
        .collect()
}

fn fallback_situation(kind: TargetAreaKind) -> &'static str {
    match kind {
        TargetAreaKind::Alert => {
            "<p>We'll update this page when there's a flood alert in the area, \
             which means flooding to low lying land is possible.</p>"
        }
        TargetAreaKind::Warning => {
            "<p>We'll update this page when there's a flood warning in the area.</p>\
             <p>A flood warning means flooding to some property is expected. \
             A severe flood warning means there's a danger to life.</p>"
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::floods::tests::flood;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap()
    }

    fn warning_area() -> TargetArea {
        TargetArea {
            code: "011FWFNC6KB".to_string(),
            name: "Kings Bridge".to_string(),
            description: "Properties near Kings Bridge".to_string(),
            parent: Some("011WAFDW".to_string()),
            centroid: Some([-3.5, 50.7]),
        }
    }

    fn build(area: &TargetArea, own: Option<&Flood>, parent: Option<&Flood>) -> TargetAreaViewModel {
        let input = TargetAreaInput { area, flood: own, parent_flood: parent, thresholds: &[] };
        TargetAreaViewModel::new(&input, fixed_now())
    }

    #[test]
    fn test_removed_flood_with_active_parent_sets_parent_alert() {
        let own = flood("011FWFNC6KB", "Kings Bridge", Severity::Removed);
        let parent = flood("011WAFDW", "Dunsford", Severity::Alert);
        let vm = build(&warning_area(), Some(&own), Some(&parent));
        assert!(vm.parent_area_alert);
        assert_eq!(vm.parent_link.as_deref(), Some("/target-area/011WAFDW"));
    }

    #[test]
    fn test_active_flood_never_sets_parent_alert() {
        let own = flood("011FWFNC6KB", "Kings Bridge", Severity::Warning);
        let parent = flood("011WAFDW", "Dunsford", Severity::Alert);
        assert!(!build(&warning_area(), Some(&own), Some(&parent)).parent_area_alert);
        assert!(!build(&warning_area(), Some(&own), None).parent_area_alert);
    }

    #[test]
    fn test_absent_flood_with_active_parent_sets_parent_alert() {
        let parent = flood("011WAFDW", "Dunsford", Severity::Alert);
        assert!(build(&warning_area(), None, Some(&parent)).parent_area_alert);
    }

    #[test]
    fn test_removed_parent_is_not_an_alert() {
        let parent = flood("011WAFDW", "Dunsford", Severity::Removed);
        assert!(!build(&warning_area(), None, Some(&parent)).parent_area_alert);
    }

    #[test]
    fn test_active_flood_title_and_situation() {
        let mut own = flood("011FWFNC6KB", "Kings Bridge", Severity::Warning);
        own.situation = "River levels are rising.\r\n\r\nAvoid <low> roads.\n".to_string();
        let vm = build(&warning_area(), Some(&own), None);
        assert_eq!(vm.title, "Flood warning: Kings Bridge");
        assert_eq!(
            vm.situation_html,
            "<p>River levels are rising.</p><p>Avoid &lt;low&gt; roads.</p>"
        );
        assert_eq!(vm.situation_changed, "Updated 9:05am on 15 January 2026");
        assert!(vm.is_active);
    }

    #[test]
    fn test_removed_flood_uses_fallback_and_removed_tense() {
        let own = flood("011FWFNC6KB", "Kings Bridge", Severity::Removed);
        let vm = build(&warning_area(), Some(&own), None);
        assert_eq!(vm.title, "Kings Bridge flood warning area");
        assert!(vm.situation_html.starts_with("<p>We'll update this page when there's a flood warning"));
        assert_eq!(vm.situation_changed, "Removed 9:05am on 15 January 2026");
        assert_eq!(vm.severity, Some(Severity::Removed));
        assert!(!vm.is_active);
    }

    #[test]
    fn test_no_flood_alert_area() {
        let area = TargetArea {
            code: "011WAFDW".to_string(),
            name: "Dunsford".to_string(),
            description: String::new(),
            parent: None,
            centroid: None,
        };
        let vm = build(&area, None, None);
        assert_eq!(vm.kind, TargetAreaKind::Alert);
        assert_eq!(vm.title, "Dunsford flood alert area");
        assert!(vm.situation_html.contains("flood alert in the area"));
        assert_eq!(vm.situation_changed, "Up to date as of 12:00pm on 15 January 2026");
        assert!(!vm.parent_area_alert);
    }
}

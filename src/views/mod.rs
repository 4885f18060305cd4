/// Page view models.
///
/// Each submodule turns already-fetched records into one typed,
/// serialisable struct per page. Nothing here performs I/O; anything that
/// depends on the clock takes `now` as a parameter.
///
/// Submodules:
/// - `station`: level, thresholds table, chart and banners for a station.
/// - `target_area`: situation and station levels for a flood area.
/// - `location`: flood, station and outlook summary around a place.
/// - `national`: England-wide summary.
/// - `alerts_and_warnings`: the grouped flood listing linked from banners.

pub mod alerts_and_warnings;
pub mod location;
pub mod national;
pub mod station;
pub mod target_area;

use serde::Serialize;

use crate::model::Outlook;

/// A linked notice shown at the top of a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Banner {
    pub text: String,
    pub link: String,
    pub count: usize,
}

/// Highest risk level across the outlook days, with wording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlookSummary {
    pub max_risk_level: u8,
    pub risk: &'static str,
    pub text: String,
}

pub fn risk_wording(risk_level: u8) -> Option<&'static str> {
    match risk_level {
        1 => Some("very low"),
        2 => Some("low"),
        3 => Some("medium"),
        4 => Some("high"),
        _ => None,
    }
}

/// Summarises an outlook; `None` when it carries no usable risk level.
pub fn summarise_outlook(outlook: &Outlook) -> Option<OutlookSummary> {
    let max_risk_level = outlook.days.iter().map(|d| d.risk_level).max()?;
    let risk = risk_wording(max_risk_level)?;
    Some(OutlookSummary {
        max_risk_level,
        risk,
        text: format!("The flood risk for the next {} days is {}", outlook.days.len(), risk),
    })
}

//! Latest levels for the stations linked to a target area.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::alert::priority::PriorityOrder;
use crate::alert::stalenesses::format_elapsed_at;
use crate::alert::thresholds::process_threshold;
use crate::format::to_fixed_2;
use crate::model::{Qualifier, StationStatus, StationType, TargetAreaThreshold};
use crate::stations::display_river_name;

/// Warning threshold types considered for target-area station lists.
pub const TARGET_AREA_THRESHOLD_TYPES: PriorityOrder =
    PriorityOrder::new(&["FW RES FW", "FW ACT FW", "FW ACTCON FW"]);

/// A station row on a target-area page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetAreaStation {
    pub rloi_id: i64,
    pub station_type: StationType,
    pub qualifier: Qualifier,
    pub external_name: String,
    pub river_name: String,
    pub threshold_type: String,
    pub latest_level: Option<String>,
    pub threshold_value: Option<String>,
    /// e.g. `15 minutes ago`
    pub formatted_time: Option<String>,
    pub is_suspended_or_offline: bool,
}

/// Selects one threshold per station for a target area and shapes it for
/// display.
///
/// Closed stations, and Welsh stations without a latest level, are left
/// out. For each station the first threshold type in
/// [`TARGET_AREA_THRESHOLD_TYPES`] order wins.
pub fn thresholds_for_target_area(
    thresholds: &[TargetAreaThreshold],
    now: DateTime<Utc>,
) -> Vec<TargetAreaStation> {
    let open: Vec<&TargetAreaThreshold> = thresholds
        .iter()
        .filter(|t| t.status != StationStatus::Closed)
        .filter(|t| !(t.iswales && t.latest_level.is_none()))
        .collect();

    TARGET_AREA_THRESHOLD_TYPES
        .one_per_key(&open, |t| t.threshold_type.as_str(), |t| t.rloi_id)
        .into_iter()
        .map(|t| TargetAreaStation {
            rloi_id: t.rloi_id,
            station_type: t.station_type,
            qualifier: t.qualifier,
            external_name: t.external_name.clone(),
            river_name: display_river_name(t.station_type, &t.river_name),
            threshold_type: t.threshold_type.clone(),
            latest_level: t.latest_level.map(to_fixed_2),
            threshold_value: process_threshold(
                t.threshold_value,
                t.stage_datum,
                t.subtract,
                t.post_process,
            ),
            formatted_time: t.value_timestamp.map(|ts| format_elapsed_at(ts, now)),
            is_suspended_or_offline: t.status == StationStatus::Suspended
                || (t.status == StationStatus::Active && t.latest_level.is_none()),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Station page view model.
//!
//! Merges a station's metadata, telemetry, forecast, IMTD thresholds,
//! historic impacts and the floods in force nearby into the banners,
//! thresholds table, chart payload and navigation of its page.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::alert::stalenesses::is_stale_at;
use crate::alert::thresholds::{
    ALERT_THRESHOLD_ID, DisplayThreshold, ImtdLevels, LevelAdjustment, PC5_THRESHOLD_ID,
    filter_imtd_thresholds, process_imtd_thresholds, process_warning_thresholds,
};
use crate::floods::Floods;
use crate::format::{format_date, format_time_on_date, query_string, to_fixed_2};
use crate::logging::{self, Component};
use crate::model::{
    Impact, ImtdThreshold, Qualifier, RiverNeighbours, Station, StationType, TelemetryReading,
};
use crate::severity::Severity;
use crate::stations::{
    StationNavigation, StationStatusFlags, display_river_name, station_navigation, station_title,
    status_flags,
};
use crate::views::Banner;

pub const LATEST_THRESHOLD_ID: &str = "latest";
pub const HIGHEST_THRESHOLD_ID: &str = "highest";

/// Everything fetched for one station page.
#[derive(Debug, Clone, Copy)]
pub struct StationInput<'a> {
    pub station: &'a Station,
    pub telemetry: &'a [TelemetryReading],
    pub forecast: &'a [TelemetryReading],
    pub imtd_thresholds: &'a [ImtdThreshold],
    pub impacts: &'a [Impact],
    /// Alerts and warnings within the station's buffer.
    pub nearby_floods: &'a Floods,
    pub neighbours: &'a RiverNeighbours,
    /// Threshold id requested for the chart (`?tid=`).
    pub tid: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestReading {
    pub value: String,
    pub ts: DateTime<Utc>,
    /// e.g. `10:15am on 19 October 2026`
    pub formatted_time: String,
    pub is_stale: bool,
}

/// Threshold rows sharing one level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdGroup {
    pub level: f64,
    pub is_exceeded: bool,
    pub values: Vec<DisplayThreshold>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub ts: DateTime<Utc>,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartThreshold {
    pub id: String,
    pub value: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub observed: Vec<ChartPoint>,
    pub forecast: Vec<ChartPoint>,
    pub has_forecast: bool,
    pub highest_forecast: Option<String>,
    pub threshold: Option<ChartThreshold>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationViewModel {
    pub rloi_id: i64,
    pub title: String,
    pub station_type: StationType,
    pub qualifier: Qualifier,
    pub river_name: String,
    pub is_wales: bool,
    pub status: StationStatusFlags,
    pub latest: Option<LatestReading>,
    /// Highest tier of flood in force nearby.
    pub severity_level: Option<Severity>,
    pub severity_icon: Option<&'static str>,
    pub severe_banner: Option<Banner>,
    pub warning_banner: Option<Banner>,
    pub alert_banner: Option<Banner>,
    /// Grouped by level, highest first.
    pub thresholds: Vec<ThresholdGroup>,
    pub chart: ChartData,
    pub navigation: StationNavigation,
}

impl StationViewModel {
    pub fn new(input: &StationInput<'_>, stale_after_minutes: u64, now: DateTime<Utc>) -> Self {
        let station = input.station;
        let latest = latest_reading(input.telemetry, stale_after_minutes, now);

        let rows = threshold_rows(input, latest.as_ref());
        let latest_level = latest.as_ref().and_then(|l| l.value.parse::<f64>().ok());
        let chart_threshold = select_chart_threshold(&rows, input.tid).map(|t| ChartThreshold {
            id: t.id.clone(),
            value: t.value.clone(),
            name: t.short_name.clone(),
        });

        let severe_banner = tier_banner(input.nearby_floods, Severity::SevereWarning, station.rloi_id);
        let warning_banner = tier_banner(input.nearby_floods, Severity::Warning, station.rloi_id);
        let alert_banner = tier_banner(input.nearby_floods, Severity::Alert, station.rloi_id);
        let severity_level = [
            (Severity::SevereWarning, &severe_banner),
            (Severity::Warning, &warning_banner),
            (Severity::Alert, &alert_banner),
        ]
        .into_iter()
        .find(|(_, banner)| banner.is_some())
        .map(|(severity, _)| severity);

        logging::debug(
            Component::ViewModel,
            Some(&station.rloi_id.to_string()),
            &format!(
                "Station view: {} threshold rows, {} nearby floods",
                rows.len(),
                input.nearby_floods.total()
            ),
        );

        Self {
            rloi_id: station.rloi_id,
            title: station_title(station),
            station_type: station.station_type,
            qualifier: station.qualifier,
            river_name: display_river_name(station.station_type, &station.river_name),
            is_wales: station.iswales,
            status: status_flags(station.status, latest.is_some()),
            severity_level,
            severity_icon: severity_level.map(|s| s.info().hash),
            severe_banner,
            warning_banner,
            alert_banner,
            thresholds: group_thresholds(rows, latest_level),
            chart: chart_data(input, chart_threshold),
            navigation: station_navigation(station, input.neighbours),
            latest,
        }
    }
}

// ---------------------------------------------------------------------------
// Latest reading
// ---------------------------------------------------------------------------

fn latest_reading(
    telemetry: &[TelemetryReading],
    stale_after_minutes: u64,
    now: DateTime<Utc>,
) -> Option<LatestReading> {
    telemetry
        .iter()
        .filter(|r| !r.err)
        .max_by_key(|r| r.ts)
        .map(|r| LatestReading {
            value: to_fixed_2(r.value),
            ts: r.ts,
            formatted_time: format_time_on_date(r.ts),
            is_stale: is_stale_at(r.ts, stale_after_minutes, now),
        })
}

// ---------------------------------------------------------------------------
// Banners
// ---------------------------------------------------------------------------

/// Banner for one tier of nearby floods. A single flood links straight to
/// its target area; several link to the filtered listing.
fn tier_banner(floods: &Floods, severity: Severity, rloi_id: i64) -> Option<Banner> {
    let group = floods.group(severity);
    let count = group.count;
    if count == 0 {
        return None;
    }

    if let [only] = group.floods.as_slice() {
        let text = match severity {
            Severity::Alert => {
                "There is a flood alert within 5 miles of this measuring station".to_string()
            }
            Severity::Warning | Severity::SevereWarning | Severity::Removed => {
                format!("{} for {}", severity.info().title, only.ta_name)
            }
        };
        return Some(Banner {
            text,
            link: format!("/target-area/{}", only.ta_code),
            count,
        });
    }

    let station = rloi_id.to_string();
    Some(Banner {
        text: format!(
            "There are {} {} within 5 miles of this measuring station",
            count,
            severity.info().pluralised_title.to_lowercase()
        ),
        link: format!(
            "/alerts-and-warnings?{}#{}",
            query_string(&[("station", station.as_str())]),
            severity.info().pluralised_hash
        ),
        count,
    })
}

// ---------------------------------------------------------------------------
// Thresholds table
// ---------------------------------------------------------------------------

fn threshold_rows(input: &StationInput<'_>, latest: Option<&LatestReading>) -> Vec<DisplayThreshold> {
    let station = input.station;
    let adjustment = LevelAdjustment::from(station);
    let mut rows = Vec::new();

    if let Some(latest) = latest {
        rows.push(DisplayThreshold {
            id: LATEST_THRESHOLD_ID.to_string(),
            description: "Latest level".to_string(),
            short_name: "Latest level".to_string(),
            value: latest.value.clone(),
        });
    }

    if let Some(max) = station.por_max_value {
        let description = match station.por_max_date {
            Some(date) => format!(
                "Water reached the highest level recorded at this measuring station ({})",
                format_date(date)
            ),
            None => "Water reaches the highest level recorded at this measuring station".to_string(),
        };
        rows.push(DisplayThreshold {
            id: HIGHEST_THRESHOLD_ID.to_string(),
            description,
            short_name: "Highest level on record".to_string(),
            value: to_fixed_2(max),
        });
    }

    let selection = filter_imtd_thresholds(input.imtd_thresholds);
    rows.extend(process_imtd_thresholds(
        ImtdLevels::from(&selection),
        adjustment.stage_datum,
        adjustment.subtract,
        adjustment.post_process,
        station.percentile_5,
    ));
    rows.extend(process_warning_thresholds(
        input.imtd_thresholds,
        adjustment.stage_datum,
        adjustment.subtract,
        adjustment.post_process,
    ));

    rows.extend(input.impacts.iter().filter(|i| i.telemetry_active).map(|impact| {
        DisplayThreshold {
            id: impact.impact_id.to_string(),
            description: impact.description.clone(),
            short_name: impact.short_name.clone(),
            value: to_fixed_2(impact.value),
        }
    }));

    rows
}

/// Groups rows by numeric level, highest first. A group is exceeded when
/// the latest reading is at or above its level.
fn group_thresholds(rows: Vec<DisplayThreshold>, latest_level: Option<f64>) -> Vec<ThresholdGroup> {
    let mut groups: Vec<ThresholdGroup> = Vec::new();
    for row in rows {
        let Some(level) = row.level() else {
            continue;
        };
        match groups.iter_mut().find(|g| g.level == level) {
            Some(group) => group.values.push(row),
            None => groups.push(ThresholdGroup {
                level,
                is_exceeded: latest_level.is_some_and(|latest| latest >= level),
                values: vec![row],
            }),
        }
    }
    groups.sort_by(|a, b| b.level.total_cmp(&a.level));
    groups
}

/// The threshold drawn on the chart: the requested `tid` if present, else
/// the top of the normal range.
pub fn select_chart_threshold<'a>(
    rows: &'a [DisplayThreshold],
    tid: Option<&str>,
) -> Option<&'a DisplayThreshold> {
    tid.and_then(|tid| rows.iter().find(|t| t.id == tid))
        .or_else(|| rows.iter().find(|t| t.id == PC5_THRESHOLD_ID))
        .or_else(|| {
            rows.iter()
                .find(|t| t.id == ALERT_THRESHOLD_ID && t.is_top_of_normal_range())
        })
}

// ---------------------------------------------------------------------------
// Chart
// ---------------------------------------------------------------------------

fn chart_points(readings: &[TelemetryReading]) -> Vec<ChartPoint> {
    let mut points: Vec<ChartPoint> = readings
        .iter()
        .filter(|r| !r.err)
        .map(|r| ChartPoint { ts: r.ts, value: r.value })
        .collect();
    points.sort_by_key(|p| p.ts);
    points
}

fn chart_data(input: &StationInput<'_>, threshold: Option<ChartThreshold>) -> ChartData {
    let forecast = if input.station.forecast {
        chart_points(input.forecast)
    } else {
        Vec::new()
    };
    let highest_forecast = forecast
        .iter()
        .map(|p| p.value)
        .max_by(f64::total_cmp)
        .map(to_fixed_2);
    ChartData {
        observed: chart_points(input.telemetry),
        has_forecast: !forecast.is_empty(),
        highest_forecast,
        forecast,
        threshold,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

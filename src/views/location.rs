//! Location page view model: what is happening around a searched place.

use serde::Serialize;

use crate::floods::Floods;
use crate::format::query_string;
use crate::logging::{self, Component};
use crate::model::{Outlook, Place, StationStatus, StationSummary, StationType};
use crate::severity::Severity;
use crate::views::{OutlookSummary, summarise_outlook};

#[derive(Debug, Clone, Copy)]
pub struct LocationInput<'a> {
    pub place: &'a Place,
    /// Floods intersecting the place's bounding box.
    pub floods: &'a Floods,
    pub stations: &'a [StationSummary],
    pub outlook: Option<&'a Outlook>,
    pub is_production: bool,
}

/// A one-line summary of one severity in force around the place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeverityBanner {
    pub severity: Severity,
    pub text: String,
    pub link: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StationCounts {
    pub river: usize,
    pub coastal: usize,
    pub groundwater: usize,
    pub rainfall: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationViewModel {
    pub title: String,
    pub place_name: String,
    pub center: [f64; 2],
    pub bbox: [f64; 4],
    /// Searches outside England get a pointer elsewhere and no flood content.
    pub not_england: bool,
    /// Placeholder flood data outside production is hidden.
    pub suppress_floods: bool,
    pub highest_severity: Option<Severity>,
    pub has_active_floods: bool,
    pub banners: Vec<SeverityBanner>,
    pub removed_text: Option<String>,
    pub station_counts: StationCounts,
    pub stations_link: String,
    pub outlook: Option<OutlookSummary>,
}

impl LocationViewModel {
    pub fn new(input: &LocationInput<'_>) -> Self {
        let place = input.place;
        let not_england = !place.is_england;
        let query = query_string(&[("q", place.name.as_str())]);

        let suppress_floods = input.floods.is_dummy_data() && !input.is_production;
        if suppress_floods {
            logging::warn(
                Component::ViewModel,
                Some(&place.name),
                "Flood feed carries placeholder data outside production; hiding floods",
            );
        }
        let show_floods = !not_england && !suppress_floods;

        let (banners, removed_text) = if show_floods {
            (
                severity_banners(input.floods, &query),
                removed_text(input.floods.count(Severity::Removed)),
            )
        } else {
            (Vec::new(), None)
        };
        let station_counts = if not_england {
            StationCounts::default()
        } else {
            count_stations(input.stations)
        };
        let highest_severity = if show_floods {
            input.floods.highest_severity()
        } else {
            None
        };

        logging::debug(
            Component::ViewModel,
            Some(&place.name),
            &format!(
                "Location view: {} floods, {} stations",
                input.floods.total(),
                input.stations.len()
            ),
        );

        Self {
            title: format!("{} - flood risk", place.name),
            place_name: place.name.clone(),
            center: place.center,
            bbox: place.bbox,
            not_england,
            suppress_floods,
            highest_severity,
            has_active_floods: show_floods && input.floods.has_active_floods(),
            banners,
            removed_text,
            station_counts,
            stations_link: format!("/river-and-sea-levels?{}", query),
            outlook: input.outlook.and_then(summarise_outlook),
        }
    }
}

fn severity_banners(floods: &Floods, query: &str) -> Vec<SeverityBanner> {
    Severity::ALL
        .into_iter()
        .filter(|s| s.is_active())
        .filter_map(|severity| {
            let count = floods.count(severity);
            let text = match count {
                0 => return None,
                1 => format!("There is a {} in this area", severity.info().title.to_lowercase()),
                n => format!(
                    "There are {} {} in this area",
                    n,
                    severity.info().pluralised_title.to_lowercase()
                ),
            };
            Some(SeverityBanner {
                severity,
                text,
                link: format!("/alerts-and-warnings?{}#{}", query, severity.info().pluralised_hash),
            })
        })
        .collect()
}

fn removed_text(count: usize) -> Option<String> {
    match count {
        0 => None,
        1 => Some("1 flood alert or warning was removed in the last 24 hours".to_string()),
        n => Some(format!(
            "{} flood alerts or warnings were removed in the last 24 hours",
            n
        )),
    }
}

/// Counts open stations by type; multi stations count as river stations.
fn count_stations(stations: &[StationSummary]) -> StationCounts {
    let mut counts = StationCounts::default();
    for station in stations.iter().filter(|s| s.status != StationStatus::Closed) {
        match station.station_type {
            StationType::River | StationType::Multi => counts.river += 1,
            StationType::Coastal => counts.coastal += 1,
            StationType::Groundwater => counts.groundwater += 1,
            StationType::Rainfall => counts.rainfall += 1,
        }
    }
    counts
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::floods::tests::flood;
    use crate::model::{FloodFeed, OutlookDay, Qualifier};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn place(is_england: bool) -> Place {
        Place {
            name: "St Ives".to_string(),
            center: [-5.48, 50.21],
            bbox: [-5.5, 50.2, -5.4, 50.3],
            is_england,
        }
    }

    fn station(rloi_id: i64, station_type: StationType, status: StationStatus) -> StationSummary {
        StationSummary {
            rloi_id,
            station_type,
            qualifier: Qualifier::Upstream,
            external_name: format!("Station {}", rloi_id),
            river_name: String::new(),
            status,
        }
    }

    fn floods() -> Floods {
        Floods::new(FloodFeed {
            floods: vec![
                flood("W1", "Harbour", Severity::Warning),
                flood("A1", "Bay", Severity::Alert),
                flood("A2", "Estuary", Severity::Alert),
                flood("R1", "Quay", Severity::Removed),
            ],
            timestamp: None,
        })
        .unwrap()
    }

    #[test]
    fn test_banners_per_active_severity() {
        let place = place(true);
        let floods = floods();
        let vm = LocationViewModel::new(&LocationInput {
            place: &place,
            floods: &floods,
            stations: &[],
            outlook: None,
            is_production: true,
        });
        assert_eq!(vm.highest_severity, Some(Severity::Warning));
        assert_eq!(vm.banners.len(), 2);
        assert_eq!(vm.banners[0].text, "There is a flood warning in this area");
        assert_eq!(vm.banners[0].link, "/alerts-and-warnings?q=St+Ives#flood-warnings");
        assert_eq!(vm.banners[1].text, "There are 2 flood alerts in this area");
        assert_eq!(
            vm.removed_text.as_deref(),
            Some("1 flood alert or warning was removed in the last 24 hours")
        );
        assert_eq!(vm.title, "St Ives - flood risk");
    }

    #[test]
    fn test_station_counts_skip_closed() {
        let place = place(true);
        let floods = Floods::new(FloodFeed::default()).unwrap();
        let stations = vec![
            station(1, StationType::River, StationStatus::Active),
            station(2, StationType::Multi, StationStatus::Suspended),
            station(3, StationType::Coastal, StationStatus::Active),
            station(4, StationType::Rainfall, StationStatus::Closed),
        ];
        let vm = LocationViewModel::new(&LocationInput {
            place: &place,
            floods: &floods,
            stations: &stations,
            outlook: None,
            is_production: true,
        });
        assert_eq!(
            vm.station_counts,
            StationCounts { river: 2, coastal: 1, groundwater: 0, rainfall: 0 }
        );
        assert!(vm.banners.is_empty());
        assert!(!vm.has_active_floods);
    }

    #[test]
    fn test_outside_england_has_no_flood_content() {
        let place = place(false);
        let floods = floods();
        let vm = LocationViewModel::new(&LocationInput {
            place: &place,
            floods: &floods,
            stations: &[],
            outlook: None,
            is_production: true,
        });
        assert!(vm.not_england);
        assert!(vm.banners.is_empty());
        assert_eq!(vm.highest_severity, None);
        assert!(!vm.has_active_floods);
    }

    #[test]
    fn test_placeholder_floods_hidden_outside_production() {
        let place = place(true);
        let floods = Floods::new(FloodFeed {
            floods: vec![flood("W1", "Harbour", Severity::Warning)],
            timestamp: Some(Utc.with_ymd_and_hms(2300, 1, 1, 0, 0, 0).unwrap()),
        })
        .unwrap();
        let stations = vec![station(1, StationType::River, StationStatus::Active)];
        let build = |is_production| {
            LocationViewModel::new(&LocationInput {
                place: &place,
                floods: &floods,
                stations: &stations,
                outlook: None,
                is_production,
            })
        };

        let test_env = build(false);
        assert!(test_env.suppress_floods);
        assert!(test_env.banners.is_empty());
        assert_eq!(test_env.highest_severity, None);
        assert!(!test_env.has_active_floods);
        assert_eq!(test_env.station_counts.river, 1, "stations are still listed");

        let production = build(true);
        assert!(!production.suppress_floods);
        assert_eq!(production.banners.len(), 1);
    }

    #[test]
    fn test_outlook_summary_included() {
        let place = place(true);
        let floods = Floods::new(FloodFeed::default()).unwrap();
        let outlook = Outlook {
            issued_at: None,
            days: vec![OutlookDay {
                date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
                risk_level: 2,
            }],
        };
        let vm = LocationViewModel::new(&LocationInput {
            place: &place,
            floods: &floods,
            stations: &[],
            outlook: Some(&outlook),
            is_production: true,
        });
        assert_eq!(vm.outlook.map(|o| o.risk), Some("low"));
    }
}

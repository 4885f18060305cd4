/// Station presentation helpers.
///
/// Station records come from the flood data service; this module holds the
/// rules for how a station is named, linked and navigated on the site:
/// page titles by station type, river name normalisation, station URLs and
/// the upstream/downstream links, including stations that expose two stages
/// under one id.

use serde::Serialize;

use crate::model::{NeighbourStation, Qualifier, RiverNeighbours, Station, StationStatus, StationType};

// ---------------------------------------------------------------------------
// Naming
// ---------------------------------------------------------------------------

/// River name as shown on the site: groundwater stations read
/// `Groundwater` and coastal `Sea Levels` reads `Sea`.
pub fn display_river_name(station_type: StationType, river_name: &str) -> String {
    match station_type {
        StationType::Groundwater => "Groundwater".to_string(),
        StationType::Coastal if river_name == "Sea Levels" => "Sea".to_string(),
        StationType::River | StationType::Multi | StationType::Coastal | StationType::Rainfall => {
            river_name.to_string()
        }
    }
}

/// Page title for a station, e.g. `River Exe level at Thorverton`.
pub fn station_title(station: &Station) -> String {
    let name = &station.external_name;
    match (station.station_type, station.qualifier) {
        (StationType::Multi, Qualifier::Downstream) => {
            format!("{} level downstream at {}", station.river_name, name)
        }
        (StationType::River | StationType::Multi, _) => {
            format!("{} level at {}", station.river_name, name)
        }
        (StationType::Coastal, _) => format!(
            "{} level at {}",
            display_river_name(StationType::Coastal, &station.river_name),
            name
        ),
        (StationType::Groundwater, _) => format!("Groundwater level at {}", name),
        (StationType::Rainfall, _) => format!("Rainfall at {}", name),
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Display flags derived from a station's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StationStatusFlags {
    pub is_active: bool,
    pub is_suspended: bool,
    pub is_closed: bool,
    /// Active but no usable reading came back.
    pub is_offline: bool,
}

pub fn status_flags(status: StationStatus, has_latest_reading: bool) -> StationStatusFlags {
    StationStatusFlags {
        is_active: status == StationStatus::Active,
        is_suspended: status == StationStatus::Suspended,
        is_closed: status == StationStatus::Closed,
        is_offline: status == StationStatus::Active && !has_latest_reading,
    }
}

// ---------------------------------------------------------------------------
// Links and navigation
// ---------------------------------------------------------------------------

/// URL of one stage of a station.
pub fn station_url(rloi_id: i64, qualifier: Qualifier) -> String {
    match qualifier {
        Qualifier::Upstream => format!("/station/{}", rloi_id),
        Qualifier::Downstream => format!("/station/{}/downstream", rloi_id),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct StationNavigation {
    pub upstream_link: Option<String>,
    pub downstream_link: Option<String>,
}

/// Upstream and downstream links for a station page.
///
/// A multi station is one physical station with two stages. Its upstream
/// stage links downstream to its own downstream stage, and its downstream
/// stage links upstream to its own upstream stage; the other direction
/// comes from the river neighbours as usual.
pub fn station_navigation(station: &Station, neighbours: &RiverNeighbours) -> StationNavigation {
    let link = |n: &NeighbourStation| station_url(n.rloi_id, n.qualifier);
    let upstream = neighbours.upstream.as_ref().map(link);
    let downstream = neighbours.downstream.as_ref().map(link);

    match (station.station_type, station.qualifier) {
        (StationType::Multi, Qualifier::Upstream) => StationNavigation {
            upstream_link: upstream,
            downstream_link: Some(station_url(station.rloi_id, Qualifier::Downstream)),
        },
        (StationType::Multi, Qualifier::Downstream) => StationNavigation {
            upstream_link: Some(station_url(station.rloi_id, Qualifier::Upstream)),
            downstream_link: downstream,
        },
        _ => StationNavigation {
            upstream_link: upstream,
            downstream_link: downstream,
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

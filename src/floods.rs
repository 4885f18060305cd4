//! Flood list grouped by severity.
//!
//! [`Floods`] partitions a flood feed into the four severity buckets, in
//! display order, and derives the summary values every page needs: counts,
//! titles, list-item HTML, the highest severity in force, whether anything
//! is active at all, and a GeoJSON FeatureCollection for the map.

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use crate::format::{escape_html, format_time_on_date};
use crate::logging::{self, Component};
use crate::model::{Flood, FloodError, FloodFeed};
use crate::severity::{NO_FLOODS_SEVERITY_ID, Severity};

/// Feed timestamps beyond this year mark placeholder data.
const DUMMY_DATA_AFTER_YEAR: i32 = 2200;

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

/// One flood in a severity group, with its list-item HTML.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloodListItem {
    pub ta_code: String,
    pub ta_name: String,
    pub situation_changed: DateTime<Utc>,
    pub html: String,
}

/// The floods of one severity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloodGroup {
    pub severity: Severity,
    /// Singular when the group holds exactly one flood.
    pub title: String,
    pub count: usize,
    pub floods: Vec<FloodListItem>,
}

impl FloodGroup {
    fn new(severity: Severity, floods: Vec<FloodListItem>) -> Self {
        Self {
            severity,
            title: severity.title_for_count(floods.len()).to_string(),
            count: floods.len(),
            floods,
        }
    }
}

fn list_item(flood: &Flood) -> FloodListItem {
    let label = match flood.severity_value {
        Severity::Removed => "Removed",
        Severity::Alert | Severity::Warning | Severity::SevereWarning => "Updated",
    };
    let html = format!(
        "<li class=\"defra-flood-list__item\"><a href=\"/target-area/{}\">{}</a>\
         <span class=\"defra-flood-list__updated\">{} {}</span></li>",
        escape_html(&flood.ta_code),
        escape_html(&flood.ta_name),
        label,
        format_time_on_date(flood.situation_changed)
    );
    FloodListItem {
        ta_code: flood.ta_code.clone(),
        ta_name: flood.ta_name.clone(),
        situation_changed: flood.situation_changed,
        html,
    }
}

// ---------------------------------------------------------------------------
// GeoJSON
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(rename = "totalFeatures")]
    pub total_features: usize,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// `flood.{ta_code}`
    pub id: String,
    pub properties: FeatureProperties,
    pub geometry: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureProperties {
    pub severity_value: Severity,
    pub ta_code: String,
    pub ta_name: String,
}

fn feature(flood: &Flood) -> Result<Feature, FloodError> {
    let geometry = match flood.geometry.as_deref() {
        Some(raw) => Some(serde_json::from_str(raw).map_err(|e| FloodError::InvalidGeometry {
            ta_code: flood.ta_code.clone(),
            message: e.to_string(),
        })?),
        None => None,
    };
    Ok(Feature {
        kind: "Feature",
        id: format!("flood.{}", flood.ta_code),
        properties: FeatureProperties {
            severity_value: flood.severity_value,
            ta_code: flood.ta_code.clone(),
            ta_name: flood.ta_name.clone(),
        },
        geometry,
    })
}

// ---------------------------------------------------------------------------
// Floods
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Floods {
    floods: Vec<Flood>,
    /// Always four groups, in [`Severity::ALL`] order.
    groups: Vec<FloodGroup>,
    geojson: FeatureCollection,
    timestamp: Option<DateTime<Utc>>,
}

impl Floods {
    /// Groups a feed by severity and builds its GeoJSON.
    ///
    /// Fails if any flood carries a geometry string that is not valid JSON.
    pub fn new(feed: FloodFeed) -> Result<Self, FloodError> {
        let groups = Severity::ALL
            .iter()
            .map(|&severity| {
                let items = feed
                    .floods
                    .iter()
                    .filter(|f| f.severity_value == severity)
                    .map(list_item)
                    .collect();
                FloodGroup::new(severity, items)
            })
            .collect();

        let features = feed.floods.iter().map(feature).collect::<Result<Vec<_>, _>>()?;
        let geojson = FeatureCollection {
            kind: "FeatureCollection",
            total_features: features.len(),
            features,
        };

        let floods = Self {
            floods: feed.floods,
            groups,
            geojson,
            timestamp: feed.timestamp,
        };
        logging::debug(
            Component::ViewModel,
            None,
            &format!(
                "Grouped {} floods (highest severity {})",
                floods.total(),
                floods.highest_severity_id()
            ),
        );
        Ok(floods)
    }

    pub fn floods(&self) -> &[Flood] {
        &self.floods
    }

    pub fn groups(&self) -> &[FloodGroup] {
        &self.groups
    }

    pub fn group(&self, severity: Severity) -> &FloodGroup {
        &self.groups[severity.display_index()]
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.group(severity).count
    }

    pub fn total(&self) -> usize {
        self.floods.len()
    }

    /// The most severe active group with any floods, else `Removed` if any
    /// floods were removed, else `None`.
    pub fn highest_severity(&self) -> Option<Severity> {
        Severity::ALL.into_iter().find(|&s| self.count(s) > 0)
    }

    /// As [`Self::highest_severity`] but as an id, with 5 meaning no floods.
    pub fn highest_severity_id(&self) -> u8 {
        self.highest_severity().map_or(NO_FLOODS_SEVERITY_ID, Severity::value)
    }

    pub fn has_active_floods(&self) -> bool {
        self.highest_severity().is_some_and(Severity::is_active)
    }

    /// Placeholder feeds are stamped far in the future.
    pub fn is_dummy_data(&self) -> bool {
        self.timestamp.is_some_and(|ts| ts.year() > DUMMY_DATA_AFTER_YEAR)
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    pub fn geojson(&self) -> &FeatureCollection {
        &self.geojson
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

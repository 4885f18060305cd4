/// Flood data service client
///
/// Blocking HTTP client for the flood data service that backs the site:
/// current floods, station metadata and telemetry, thresholds, impacts,
/// target areas and the five-day outlook. Every endpoint returns JSON.

use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::logging::{self, Component};
use crate::model::{
    Flood, FloodError, FloodFeed, Impact, ImtdThreshold, Outlook, Qualifier, Station,
    StationSummary, TargetArea, TargetAreaThreshold, TelemetryReading,
};

// ============================================================================
// Endpoint paths
// ============================================================================

fn direction(qualifier: Qualifier) -> &'static str {
    match qualifier {
        Qualifier::Upstream => "u",
        Qualifier::Downstream => "d",
    }
}

pub fn floods_path() -> String {
    "/floods".to_string()
}

pub fn station_path(rloi_id: i64, qualifier: Qualifier) -> String {
    format!("/station/{}/{}", rloi_id, direction(qualifier))
}

pub fn telemetry_path(rloi_id: i64, qualifier: Qualifier) -> String {
    format!("/station/{}/{}/telemetry", rloi_id, direction(qualifier))
}

pub fn imtd_thresholds_path(rloi_id: i64) -> String {
    format!("/station/{}/imtd-thresholds", rloi_id)
}

pub fn impacts_path(rloi_id: i64) -> String {
    format!("/impacts/{}", rloi_id)
}

pub fn target_area_path(code: &str) -> String {
    format!("/target-area/{}", code)
}

pub fn target_area_thresholds_path(code: &str) -> String {
    format!("/target-area/{}/thresholds", code)
}

pub fn station_buffer_floods_path(rloi_id: i64) -> String {
    format!("/floods-within-station-buffer/{}", rloi_id)
}

/// `bbox` is `[west, south, east, north]`, as on [`crate::model::Place`].
pub fn floods_within_path(bbox: [f64; 4]) -> String {
    format!("/floods-within/{}/{}/{}/{}", bbox[0], bbox[1], bbox[2], bbox[3])
}

pub fn stations_within_path(bbox: [f64; 4]) -> String {
    format!("/stations-within/{}/{}/{}/{}", bbox[0], bbox[1], bbox[2], bbox[3])
}

pub fn outlook_path() -> String {
    "/outlook".to_string()
}

/// Joins a base URL and an absolute path without doubling the slash.
pub fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

// ============================================================================
// Client
// ============================================================================

pub struct FloodServiceClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl FloodServiceClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, FloodError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(FloodServiceClient {
            http,
            base_url: base_url.to_string(),
        })
    }

    /// GETs `path` and deserializes the body, logging any failure under
    /// `operation` before returning it.
    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        id: Option<&str>,
        operation: &str,
    ) -> Result<T, FloodError> {
        let result = self.try_get_json(path);
        if let Err(ref err) = result {
            logging::log_fetch_failure(Component::FloodService, id, operation, err);
        }
        result
    }

    fn try_get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FloodError> {
        let url = endpoint_url(&self.base_url, path);
        logging::debug(Component::FloodService, None, &format!("GET {}", url));

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .send()?;

        if !response.status().is_success() {
            return Err(FloodError::HttpError(response.status().as_u16()));
        }

        let body = response.text()?;
        Ok(serde_json::from_str(&body)?)
    }

    pub fn fetch_floods(&self) -> Result<FloodFeed, FloodError> {
        self.get_json(&floods_path(), None, "Fetch floods")
    }

    pub fn fetch_station(&self, rloi_id: i64, qualifier: Qualifier) -> Result<Station, FloodError> {
        let id = rloi_id.to_string();
        self.get_json(&station_path(rloi_id, qualifier), Some(&id), "Fetch station")
    }

    pub fn fetch_telemetry(
        &self,
        rloi_id: i64,
        qualifier: Qualifier,
    ) -> Result<Vec<TelemetryReading>, FloodError> {
        let id = rloi_id.to_string();
        self.get_json(&telemetry_path(rloi_id, qualifier), Some(&id), "Fetch telemetry")
    }

    pub fn fetch_imtd_thresholds(&self, rloi_id: i64) -> Result<Vec<ImtdThreshold>, FloodError> {
        let id = rloi_id.to_string();
        self.get_json(&imtd_thresholds_path(rloi_id), Some(&id), "Fetch IMTD thresholds")
    }

    pub fn fetch_impacts(&self, rloi_id: i64) -> Result<Vec<Impact>, FloodError> {
        let id = rloi_id.to_string();
        self.get_json(&impacts_path(rloi_id), Some(&id), "Fetch impacts")
    }

    pub fn fetch_target_area(&self, code: &str) -> Result<TargetArea, FloodError> {
        self.get_json(&target_area_path(code), Some(code), "Fetch target area")
    }

    pub fn fetch_target_area_thresholds(
        &self,
        code: &str,
    ) -> Result<Vec<TargetAreaThreshold>, FloodError> {
        self.get_json(&target_area_thresholds_path(code), Some(code), "Fetch target area thresholds")
    }

    /// Floods whose areas lie within the station's five mile buffer.
    pub fn fetch_floods_near_station(&self, rloi_id: i64) -> Result<Vec<Flood>, FloodError> {
        let id = rloi_id.to_string();
        self.get_json(&station_buffer_floods_path(rloi_id), Some(&id), "Fetch nearby floods")
    }

    pub fn fetch_floods_within(&self, bbox: [f64; 4]) -> Result<FloodFeed, FloodError> {
        self.get_json(&floods_within_path(bbox), None, "Fetch floods within area")
    }

    pub fn fetch_stations_within(&self, bbox: [f64; 4]) -> Result<Vec<StationSummary>, FloodError> {
        self.get_json(&stations_within_path(bbox), None, "Fetch stations within area")
    }

    pub fn fetch_outlook(&self) -> Result<Outlook, FloodError> {
        self.get_json(&outlook_path(), None, "Fetch outlook")
    }
}

// ============================================================================
// Tests
// ============================================================================

//! National (England-wide) summary view model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::floods::Floods;
use crate::format::format_time_on_date;
use crate::logging::{self, Component};
use crate::model::Outlook;
use crate::severity::Severity;
use crate::views::{OutlookSummary, risk_wording, summarise_outlook};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeveritySummary {
    pub severity: Severity,
    pub count: usize,
    pub title: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlookDayView {
    pub date: NaiveDate,
    /// e.g. `Monday 19 October`
    pub label: String,
    pub risk_level: u8,
    pub risk: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NationalViewModel {
    pub title: &'static str,
    pub summaries: Vec<SeveritySummary>,
    pub highest_severity: Option<Severity>,
    pub has_active_floods: bool,
    pub is_dummy_data: bool,
    /// Placeholder data is never shown outside production.
    pub suppress_floods: bool,
    pub last_updated: String,
    pub outlook: Option<OutlookSummary>,
    pub outlook_days: Vec<OutlookDayView>,
}

impl NationalViewModel {
    pub fn new(
        floods: &Floods,
        outlook: Option<&Outlook>,
        is_production: bool,
        now: DateTime<Utc>,
    ) -> Self {
        let is_dummy_data = floods.is_dummy_data();
        let suppress_floods = is_dummy_data && !is_production;
        if suppress_floods {
            logging::warn(
                Component::ViewModel,
                None,
                "Flood feed carries placeholder data outside production; suppressing national flood summary",
            );
        }

        let summaries = if suppress_floods {
            Vec::new()
        } else {
            Severity::ALL
                .into_iter()
                .map(|severity| {
                    let count = floods.count(severity);
                    SeveritySummary {
                        severity,
                        count,
                        title: severity.title_for_count(count).to_string(),
                        link: format!("/alerts-and-warnings#{}", severity.info().pluralised_hash),
                    }
                })
                .collect()
        };

        // Placeholder feeds are stamped centuries ahead, so fall back to now.
        let updated_at = floods.timestamp().filter(|_| !is_dummy_data).unwrap_or(now);

        Self {
            title: "Flood warnings in England",
            summaries,
            highest_severity: if suppress_floods { None } else { floods.highest_severity() },
            has_active_floods: !suppress_floods && floods.has_active_floods(),
            is_dummy_data,
            suppress_floods,
            last_updated: format!("Updated {}", format_time_on_date(updated_at)),
            outlook: outlook.and_then(summarise_outlook),
            outlook_days: outlook.map(outlook_days).unwrap_or_default(),
        }
    }
}

fn outlook_days(outlook: &Outlook) -> Vec<OutlookDayView> {
    outlook
        .days
        .iter()
        .map(|day| OutlookDayView {
            date: day.date,
            label: day.date.format("%A %-d %B").to_string(),
            risk_level: day.risk_level,
            risk: risk_wording(day.risk_level),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

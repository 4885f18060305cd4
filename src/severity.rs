//! Flood severity reference table.
//!
//! The four severities a flood record can carry, in display order, with the
//! wording used across every page. The table is a `static` and is never
//! modified at runtime; look entries up with [`Severity::info`].

use serde::{Deserialize, Serialize};

/// Severity of a flood record. The discriminants are the upstream
/// `severity_value` codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Severity {
    Alert = 1,
    Warning = 2,
    SevereWarning = 3,
    Removed = 4,
}

/// Display metadata for one severity level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeverityInfo {
    pub id: u8,
    pub title: &'static str,
    pub pluralised_title: &'static str,
    pub hash: &'static str,
    pub pluralised_hash: &'static str,
    pub sub_title: &'static str,
    pub tagline: &'static str,
    pub is_active: bool,
}

/// Severity metadata in display order: most severe first, removed last.
pub static SEVERITY_TABLE: [SeverityInfo; 4] = [
    SeverityInfo {
        id: 3,
        title: "Severe flood warning",
        pluralised_title: "Severe flood warnings",
        hash: "severe-flood-warning",
        pluralised_hash: "severe-flood-warnings",
        sub_title: "Severe flooding - danger to life",
        tagline: "danger to life",
        is_active: true,
    },
    SeverityInfo {
        id: 2,
        title: "Flood warning",
        pluralised_title: "Flood warnings",
        hash: "flood-warning",
        pluralised_hash: "flood-warnings",
        sub_title: "Flooding is expected - immediate action required",
        tagline: "flooding is expected",
        is_active: true,
    },
    SeverityInfo {
        id: 1,
        title: "Flood alert",
        pluralised_title: "Flood alerts",
        hash: "flood-alert",
        pluralised_hash: "flood-alerts",
        sub_title: "Flooding is possible - be prepared",
        tagline: "flooding is possible",
        is_active: true,
    },
    SeverityInfo {
        id: 4,
        title: "Flood alert or warning removed",
        pluralised_title: "Flood alerts and warnings removed",
        hash: "warning-removed",
        pluralised_hash: "warnings-removed",
        sub_title: "in the last 24 hours",
        tagline: "removed in the last 24 hours",
        is_active: false,
    },
];

/// Highest-severity id used when there are no floods at all.
pub const NO_FLOODS_SEVERITY_ID: u8 = 5;

impl Severity {
    /// All severities in display order.
    pub const ALL: [Severity; 4] = [
        Severity::SevereWarning,
        Severity::Warning,
        Severity::Alert,
        Severity::Removed,
    ];

    pub fn from_value(value: u8) -> Option<Severity> {
        match value {
            1 => Some(Severity::Alert),
            2 => Some(Severity::Warning),
            3 => Some(Severity::SevereWarning),
            4 => Some(Severity::Removed),
            _ => None,
        }
    }

    pub fn value(self) -> u8 {
        self as u8
    }

    /// Position in [`SEVERITY_TABLE`].
    pub fn display_index(self) -> usize {
        match self {
            Severity::SevereWarning => 0,
            Severity::Warning => 1,
            Severity::Alert => 2,
            Severity::Removed => 3,
        }
    }

    pub fn info(self) -> &'static SeverityInfo {
        &SEVERITY_TABLE[self.display_index()]
    }

    pub fn is_active(self) -> bool {
        self.info().is_active
    }

    /// Singular title for one flood, plural otherwise.
    pub fn title_for_count(self, count: usize) -> &'static str {
        let info = self.info();
        if count == 1 { info.title } else { info.pluralised_title }
    }
}

impl TryFrom<u8> for Severity {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Severity::from_value(value).ok_or_else(|| format!("unknown severity value {}", value))
    }
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> u8 {
        severity.value()
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.info().title)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_ids_match_enum_values() {
        for severity in Severity::ALL {
            assert_eq!(
                severity.info().id,
                severity.value(),
                "table entry for {:?} has the wrong id",
                severity
            );
        }
    }

    #[test]
    fn test_only_removed_is_inactive() {
        let inactive: Vec<_> = Severity::ALL.iter().filter(|s| !s.is_active()).collect();
        assert_eq!(inactive, vec![&Severity::Removed]);
    }

    #[test]
    fn test_from_value_rejects_out_of_range() {
        assert_eq!(Severity::from_value(0), None);
        assert_eq!(Severity::from_value(5), None);
        assert_eq!(Severity::from_value(3), Some(Severity::SevereWarning));
    }

    #[test]
    fn test_title_for_count_pluralises() {
        assert_eq!(Severity::Alert.title_for_count(1), "Flood alert");
        assert_eq!(Severity::Alert.title_for_count(0), "Flood alerts");
        assert_eq!(Severity::Warning.title_for_count(3), "Flood warnings");
    }

    #[test]
    fn test_severity_round_trips_through_json_as_number() {
        let json = serde_json::to_string(&Severity::SevereWarning).unwrap();
        assert_eq!(json, "3");
        let parsed: Severity = serde_json::from_str("4").unwrap();
        assert_eq!(parsed, Severity::Removed);
    }
}

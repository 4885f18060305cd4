//! Alerts-and-warnings listing view model.

use serde::Serialize;

use crate::floods::Floods;
use crate::severity::Severity;

/// What the listing was requested for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ListingContext {
    National,
    Place(String),
    Station(i64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingGroup {
    pub severity: Severity,
    /// Anchor target used by banner links, e.g. `flood-alerts`.
    pub anchor: &'static str,
    pub title: String,
    pub count: usize,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertsAndWarningsViewModel {
    pub title: String,
    pub context: ListingContext,
    pub filter: Option<Severity>,
    pub total_count: usize,
    /// Non-empty groups only, most severe first.
    pub groups: Vec<ListingGroup>,
}

impl AlertsAndWarningsViewModel {
    pub fn new(floods: &Floods, filter: Option<Severity>, context: ListingContext) -> Self {
        let groups: Vec<ListingGroup> = floods
            .groups()
            .iter()
            .filter(|g| g.count > 0)
            .filter(|g| filter.is_none_or(|wanted| g.severity == wanted))
            .map(|g| ListingGroup {
                severity: g.severity,
                anchor: g.severity.info().pluralised_hash,
                title: g.title.clone(),
                count: g.count,
                items: g.floods.iter().map(|f| f.html.clone()).collect(),
            })
            .collect();

        let title = match &context {
            ListingContext::National => "Flood alerts and warnings in England".to_string(),
            ListingContext::Place(name) => format!("Flood alerts and warnings near {}", name),
            ListingContext::Station(_) => {
                "Flood alerts and warnings near this measuring station".to_string()
            }
        };

        Self {
            title,
            total_count: groups.iter().map(|g| g.count).sum(),
            context,
            filter,
            groups,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::floods::tests::flood;
    use crate::model::FloodFeed;

    fn floods() -> Floods {
        Floods::new(FloodFeed {
            floods: vec![
                flood("W1", "Harbour", Severity::Warning),
                flood("A1", "Bay", Severity::Alert),
                flood("A2", "Estuary", Severity::Alert),
            ],
            timestamp: None,
        })
        .unwrap()
    }

    #[test]
    fn test_listing_skips_empty_groups() {
        let vm = AlertsAndWarningsViewModel::new(&floods(), None, ListingContext::National);
        let severities: Vec<Severity> = vm.groups.iter().map(|g| g.severity).collect();
        assert_eq!(severities, vec![Severity::Warning, Severity::Alert]);
        assert_eq!(vm.total_count, 3);
        assert_eq!(vm.groups[1].anchor, "flood-alerts");
        assert_eq!(vm.groups[1].items.len(), 2);
    }

    #[test]
    fn test_listing_filter_and_context() {
        let vm = AlertsAndWarningsViewModel::new(
            &floods(),
            Some(Severity::Alert),
            ListingContext::Place("St Ives".to_string()),
        );
        assert_eq!(vm.groups.len(), 1);
        assert_eq!(vm.total_count, 2);
        assert_eq!(vm.title, "Flood alerts and warnings near St Ives");
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::enums::InsightKind;

/// Generated narrative text per insight kind. Kinds that failed or were
/// skipped are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InsightSet(BTreeMap<InsightKind, String>);

impl InsightSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: InsightKind, text: impl Into<String>) {
        self.0.insert(kind, text.into());
    }

    pub fn get(&self, kind: InsightKind) -> Option<&str> {
        self.0.get(&kind).map(String::as_str)
    }

    /// Entries in report order.
    pub fn iter(&self) -> impl Iterator<Item = (InsightKind, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(InsightKind, String)> for InsightSet {
    fn from_iter<I: IntoIterator<Item = (InsightKind, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_map_in_kind_order() {
        let mut set = InsightSet::new();
        set.insert(InsightKind::PatientJourney, "journey");
        set.insert(InsightKind::DrugSummary, "summary");

        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(
            json,
            r#"{"drug_summary":"summary","patient_journey":"journey"}"#
        );
    }

    #[test]
    fn partial_set_reports_missing_kinds() {
        let set: InsightSet = [(InsightKind::SideEffects, "Nausea".to_string())]
            .into_iter()
            .collect();
        assert_eq!(set.get(InsightKind::SideEffects), Some("Nausea"));
        assert_eq!(set.get(InsightKind::MarketTrends), None);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn deserializes_from_map() {
        let set: InsightSet =
            serde_json::from_str(r#"{"mechanism_of_action":"Blocks COX."}"#).unwrap();
        assert_eq!(set.get(InsightKind::MechanismOfAction), Some("Blocks COX."));
    }
}

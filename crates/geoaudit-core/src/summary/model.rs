//! Per-run accumulator of domain counts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Independent add/remove counters for one key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineCounts {
    pub added: u64,
    pub removed: u64,
}

impl LineCounts {
    /// Signed balance, `added - removed`.
    pub fn net(&self) -> i64 {
        self.added as i64 - self.removed as i64
    }

    pub fn churn(&self) -> u64 {
        self.added + self.removed
    }

    pub fn is_empty(&self) -> bool {
        self.churn() == 0
    }
}

/// Category totals read by the severity classifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryTotals {
    /// Sum over operators of the absolute net vehicle delta
    pub fleet_churn: u64,
    /// Trips added plus trips removed, over every (operator, line)
    pub schedule_churn: u64,
    /// Spatial changes over every (operator, line)
    pub spatial_changes: u64,
    /// Added plus removed features over every generic layer
    pub generic_churn: u64,
}

impl SummaryTotals {
    pub fn is_zero(&self) -> bool {
        self.fleet_churn == 0
            && self.schedule_churn == 0
            && self.spatial_changes == 0
            && self.generic_churn == 0
    }
}

/// Counts accumulated over one audit run.
///
/// Writes are purely additive. Every map is ordered, so rendering and
/// serialization are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumanSummary {
    fleet: BTreeMap<String, i64>,
    schedules: BTreeMap<String, BTreeMap<String, LineCounts>>,
    spatial: BTreeMap<String, BTreeMap<String, u64>>,
    generic: BTreeMap<String, LineCounts>,
}

impl HumanSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_fleet(&mut self, operator: &str, delta: i64) {
        *self.fleet.entry(operator.to_string()).or_default() += delta;
    }

    pub fn record_schedule_added(&mut self, operator: &str, line: &str) {
        self.schedule_entry(operator, line).added += 1;
    }

    pub fn record_schedule_removed(&mut self, operator: &str, line: &str) {
        self.schedule_entry(operator, line).removed += 1;
    }

    fn schedule_entry(&mut self, operator: &str, line: &str) -> &mut LineCounts {
        self.schedules
            .entry(operator.to_string())
            .or_default()
            .entry(line.to_string())
            .or_default()
    }

    pub fn record_spatial(&mut self, operator: &str, line: &str) {
        *self
            .spatial
            .entry(operator.to_string())
            .or_default()
            .entry(line.to_string())
            .or_default() += 1;
    }

    pub fn record_generic(&mut self, layer: &str, added: u64, removed: u64) {
        let entry = self.generic.entry(layer.to_string()).or_default();
        entry.added += added;
        entry.removed += removed;
    }

    /// Net vehicle delta per operator.
    pub fn fleet(&self) -> &BTreeMap<String, i64> {
        &self.fleet
    }

    /// Trip counters per operator, then per line.
    pub fn schedules(&self) -> &BTreeMap<String, BTreeMap<String, LineCounts>> {
        &self.schedules
    }

    /// Spatial change count per operator, then per line.
    pub fn spatial(&self) -> &BTreeMap<String, BTreeMap<String, u64>> {
        &self.spatial
    }

    /// Added/removed counts per generic layer.
    pub fn generic(&self) -> &BTreeMap<String, LineCounts> {
        &self.generic
    }

    pub fn schedule_counts(&self, operator: &str, line: &str) -> LineCounts {
        self.schedules
            .get(operator)
            .and_then(|lines| lines.get(line))
            .copied()
            .unwrap_or_default()
    }

    pub fn spatial_count(&self, operator: &str, line: &str) -> u64 {
        self.spatial
            .get(operator)
            .and_then(|lines| lines.get(line))
            .copied()
            .unwrap_or(0)
    }

    pub fn totals(&self) -> SummaryTotals {
        SummaryTotals {
            fleet_churn: self.fleet.values().map(|d| d.unsigned_abs()).sum(),
            schedule_churn: self
                .schedules
                .values()
                .flat_map(BTreeMap::values)
                .map(LineCounts::churn)
                .sum(),
            spatial_changes: self.spatial.values().flat_map(BTreeMap::values).sum(),
            generic_churn: self.generic.values().map(LineCounts::churn).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.totals().is_zero()
    }

    /// (operator, line) pairs whose route geometry changed while their trips
    /// did not. Informational; does not take part in severity.
    pub fn silent_spatial_changes(&self) -> Vec<(String, String)> {
        self.spatial
            .iter()
            .flat_map(|(op, lines)| {
                lines
                    .iter()
                    .filter(|(_, count)| **count > 0)
                    .map(move |(line, _)| (op.clone(), line.clone()))
            })
            .filter(|(op, line)| self.schedule_counts(op, line).is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fleet_churn_uses_absolute_net_delta() {
        let mut s = HumanSummary::new();
        s.record_fleet("Pioneira", 3);
        s.record_fleet("Marechal", -2);
        s.record_fleet("Piracicabana", 1);
        s.record_fleet("Piracicabana", -1);

        assert_eq!(s.fleet().get("Piracicabana"), Some(&0));
        assert_eq!(s.totals().fleet_churn, 5);
    }

    #[test]
    fn test_schedule_counters_are_not_netted() {
        let mut s = HumanSummary::new();
        s.record_schedule_added("ACME", "100");
        s.record_schedule_removed("ACME", "100");

        let counts = s.schedule_counts("ACME", "100");
        assert_eq!(counts, LineCounts { added: 1, removed: 1 });
        assert_eq!(counts.net(), 0);
        assert_eq!(s.totals().schedule_churn, 2);
    }

    #[test]
    fn test_silent_spatial_changes() {
        let mut s = HumanSummary::new();
        s.record_spatial("ACME", "100");
        s.record_spatial("ACME", "200");
        s.record_schedule_added("ACME", "200");

        assert_eq!(
            s.silent_spatial_changes(),
            vec![("ACME".to_string(), "100".to_string())]
        );
    }

    #[test]
    fn test_fresh_summary_is_empty() {
        let s = HumanSummary::new();
        assert!(s.is_empty());
        assert_eq!(s.totals(), SummaryTotals::default());
    }
}

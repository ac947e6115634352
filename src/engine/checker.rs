//! Medallion award arithmetic
//!
//! Pure functions deciding how many units of a medallion a player has earned
//! from their maneuver totals. All conditions of a medallion must hold at the
//! same time, so the slowest condition caps the result.

use std::collections::BTreeMap;

use crate::definitions::MedallionDefinition;

/// Units earnable from the player's totals, ignoring what was already awarded
///
/// A condition on a maneuver the player never executed counts as zero progress.
pub fn earnable_units(medallion: &MedallionDefinition, totals: &BTreeMap<String, i64>) -> u32 {
    medallion
        .conditions
        .iter()
        .map(|(maneuver, required)| {
            let total = totals.get(maneuver).copied().unwrap_or(0).max(0);
            total / i64::from((*required).max(1))
        })
        .min()
        .map(|units| u32::try_from(units).unwrap_or(u32::MAX))
        .unwrap_or(0)
}

/// New units to grant on top of `already_awarded`
pub fn units_to_award(
    medallion: &MedallionDefinition,
    totals: &BTreeMap<String, i64>,
    already_awarded: u32,
) -> u32 {
    // Single medallions are never topped up
    if !medallion.allow_multiple && already_awarded > 0 {
        return 0;
    }

    let mut earnable = earnable_units(medallion, totals);
    if !medallion.allow_multiple {
        earnable = earnable.min(1);
    }

    earnable.saturating_sub(already_awarded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn medallion(allow_multiple: bool, conditions: &[(&str, u32)]) -> MedallionDefinition {
        MedallionDefinition {
            key: "Test".to_string(),
            allow_multiple,
            conditions: conditions
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
        }
    }

    fn totals(values: &[(&str, i64)]) -> BTreeMap<String, i64> {
        values.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn slowest_condition_wins() {
        let m = medallion(true, &[("A", 5), ("B", 10)]);
        assert_eq!(earnable_units(&m, &totals(&[("A", 12), ("B", 10)])), 1);
        assert_eq!(earnable_units(&m, &totals(&[("A", 50), ("B", 30)])), 3);
    }

    #[test]
    fn missing_maneuver_blocks_the_medallion() {
        let m = medallion(true, &[("A", 1), ("B", 1)]);
        assert_eq!(earnable_units(&m, &totals(&[("A", 100)])), 0);
    }

    #[test]
    fn multiple_medallions_are_topped_up() {
        let m = medallion(true, &[("LoadedPage", 5)]);
        let t = totals(&[("LoadedPage", 25)]);
        assert_eq!(units_to_award(&m, &t, 0), 5);
        assert_eq!(units_to_award(&m, &t, 3), 2);
        assert_eq!(units_to_award(&m, &t, 5), 0);
        // Over-awarded players get nothing, never a negative amount
        assert_eq!(units_to_award(&m, &t, 9), 0);
    }

    #[test]
    fn single_medallions_award_at_most_one() {
        let m = medallion(false, &[("LoadedPage", 20)]);
        assert_eq!(units_to_award(&m, &totals(&[("LoadedPage", 19)]), 0), 0);
        assert_eq!(units_to_award(&m, &totals(&[("LoadedPage", 60)]), 0), 1);
        assert_eq!(units_to_award(&m, &totals(&[("LoadedPage", 60)]), 1), 0);
    }

    #[test]
    fn negative_totals_count_as_nothing() {
        let m = medallion(true, &[("A", 2)]);
        assert_eq!(earnable_units(&m, &totals(&[("A", -10)])), 0);
    }
}

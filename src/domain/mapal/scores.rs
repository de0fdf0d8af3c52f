//! MAPAL score state and update rules.
//!
//! Scores live on a 0-5 scale per dimension. Updates add the impact's point
//! value and cap at the ceiling; the derived readiness percentage is a
//! weighted share of the maximum attainable profile and is recomputed once
//! per batch of updates, never per field.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::advisor::AdvisorId;
use crate::domain::foundation::{Percentage, Timestamp};

use super::{ImpactLevel, MapalField, ScoreUpdate};

/// Ceiling for every MAPAL dimension.
pub const SCORE_CAP: u8 = 5;

/// Maximum excerpt length carried into a history entry.
pub const EXCERPT_MAX_CHARS: usize = 300;

/// The per-dimension MAPAL scores plus the derived readiness percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapalScores {
    values: BTreeMap<MapalField, u8>,
    readiness: Percentage,
}

/// Result of applying a single score update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreChange {
    pub field: MapalField,
    pub from: u8,
    pub to: u8,
}

impl Default for MapalScores {
    fn default() -> Self {
        Self::new()
    }
}

impl MapalScores {
    /// Creates a fresh profile with every dimension at zero.
    pub fn new() -> Self {
        let values = MapalField::ALL.iter().map(|f| (*f, 0)).collect();
        Self {
            values,
            readiness: Percentage::ZERO,
        }
    }

    /// Sets one dimension directly (clamped to the cap). Intended for
    /// reconstitution and test setup, not for turn processing.
    pub fn with_value(mut self, field: MapalField, value: u8) -> Self {
        self.values.insert(field, value.min(SCORE_CAP));
        self
    }

    /// Current value of a dimension.
    pub fn value(&self, field: MapalField) -> u8 {
        self.values.get(&field).copied().unwrap_or(0)
    }

    /// Derived readiness percentage as of the last recompute.
    pub fn readiness(&self) -> Percentage {
        self.readiness
    }

    /// Iterates dimensions in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (MapalField, u8)> + '_ {
        MapalField::ALL.iter().map(move |f| (*f, self.value(*f)))
    }

    /// Applies one update, capping the dimension at [`SCORE_CAP`].
    ///
    /// Returns the resulting change for history logging. A zero-point
    /// impact is a no-op and returns `None`; a positive impact against an
    /// already-capped dimension still counts as an application (`from` and
    /// `to` both at the cap) so the attempt is visible in history.
    ///
    /// Does not touch readiness: callers recompute once per batch via
    /// [`recompute_readiness`](Self::recompute_readiness).
    pub fn apply(&mut self, update: ScoreUpdate) -> Option<ScoreChange> {
        let points = update.impact.points();
        if points == 0 {
            return None;
        }

        let from = self.value(update.field);
        let to = from.saturating_add(points).min(SCORE_CAP);
        self.values.insert(update.field, to);

        Some(ScoreChange {
            field: update.field,
            from,
            to,
        })
    }

    /// Recomputes the readiness percentage from the current values.
    ///
    /// Readiness is the weighted share of the maximum attainable profile:
    /// `round(100 * sum(value * weight) / (CAP * total_weight))`. A maxed
    /// profile reads 100%. Pure function of the values; calling it twice in
    /// a row yields the same result.
    pub fn recompute_readiness(&mut self) -> Percentage {
        let weighted: u32 = self
            .iter()
            .map(|(field, value)| u32::from(value) * field.weight())
            .sum();
        let max = u32::from(SCORE_CAP) * MapalField::total_weight();

        let percent = (weighted * 100 + max / 2) / max;
        self.readiness = Percentage::new(percent as u8);
        self.readiness
    }
}

/// One recorded score change, appended whenever an update is applied.
///
/// Entries are append-only and monotonic in timestamp within a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapalHistoryEntry {
    pub timestamp: Timestamp,
    pub field: MapalField,
    pub from: u8,
    pub to: u8,
    /// The impact label the model used.
    pub impact: ImpactLevel,
    /// The advisor whose answer caused the change.
    pub source: AdvisorId,
    /// Opening excerpt of the triggering answer text.
    pub excerpt: String,
}

impl MapalHistoryEntry {
    /// Creates an entry for an applied change, truncating the excerpt.
    pub fn record(
        change: ScoreChange,
        impact: ImpactLevel,
        source: AdvisorId,
        answer_text: &str,
    ) -> Self {
        Self {
            timestamp: Timestamp::now(),
            field: change.field,
            from: change.from,
            to: change.to,
            impact,
            source,
            excerpt: truncate_excerpt(answer_text),
        }
    }
}

fn truncate_excerpt(text: &str) -> String {
    text.chars().take(EXCERPT_MAX_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn new_profile_is_all_zero() {
        let scores = MapalScores::new();
        for field in MapalField::ALL {
            assert_eq!(scores.value(field), 0);
        }
        assert_eq!(scores.readiness(), Percentage::ZERO);
    }

    #[test]
    fn apply_adds_impact_points() {
        let mut scores = MapalScores::new();
        let change = scores
            .apply(ScoreUpdate::new(MapalField::PensionPlanning, ImpactLevel::High))
            .unwrap();

        assert_eq!(change.from, 0);
        assert_eq!(change.to, 3);
        assert_eq!(scores.value(MapalField::PensionPlanning), 3);
    }

    #[test]
    fn apply_caps_at_ceiling() {
        let mut scores = MapalScores::new().with_value(MapalField::PensionPlanning, 3);
        let change = scores
            .apply(ScoreUpdate::new(MapalField::PensionPlanning, ImpactLevel::High))
            .unwrap();

        assert_eq!(change.from, 3);
        assert_eq!(change.to, 5);
        assert_eq!(scores.value(MapalField::PensionPlanning), 5);
    }

    #[test]
    fn apply_none_impact_is_noop() {
        let mut scores = MapalScores::new();
        assert!(scores
            .apply(ScoreUpdate::new(MapalField::IncomeGrowth, ImpactLevel::None))
            .is_none());
        assert_eq!(scores.value(MapalField::IncomeGrowth), 0);
    }

    #[test]
    fn apply_against_capped_field_still_reports_change() {
        // The attempt must stay visible in history even when nothing moves.
        let mut scores = MapalScores::new().with_value(MapalField::FinancialFoundations, 5);
        let change = scores
            .apply(ScoreUpdate::new(
                MapalField::FinancialFoundations,
                ImpactLevel::Medium,
            ))
            .unwrap();

        assert_eq!(change.from, 5);
        assert_eq!(change.to, 5);
    }

    #[test]
    fn sequential_same_field_updates_cap_independently() {
        // 4 -> LOW caps to 5, then MEDIUM stays at 5.
        let mut scores = MapalScores::new().with_value(MapalField::FinancialFoundations, 4);

        let first = scores
            .apply(ScoreUpdate::new(MapalField::FinancialFoundations, ImpactLevel::Low))
            .unwrap();
        let second = scores
            .apply(ScoreUpdate::new(
                MapalField::FinancialFoundations,
                ImpactLevel::Medium,
            ))
            .unwrap();

        assert_eq!((first.from, first.to), (4, 5));
        assert_eq!((second.from, second.to), (5, 5));
        assert_eq!(scores.value(MapalField::FinancialFoundations), 5);
    }

    #[test]
    fn readiness_of_maxed_profile_is_100() {
        let mut scores = MapalScores::new();
        for field in MapalField::ALL {
            scores = scores.with_value(field, SCORE_CAP);
        }
        assert_eq!(scores.recompute_readiness(), Percentage::HUNDRED);
    }

    #[test]
    fn readiness_is_weighted_not_uniform() {
        // PensionPlanning (weight 15) at cap outweighs
        // RetirementAlternatives (weight 4) at cap.
        let mut heavy = MapalScores::new().with_value(MapalField::PensionPlanning, 5);
        let mut light = MapalScores::new().with_value(MapalField::RetirementAlternatives, 5);

        assert!(heavy.recompute_readiness() > light.recompute_readiness());
    }

    #[test]
    fn readiness_is_deterministic() {
        let mut scores = MapalScores::new()
            .with_value(MapalField::PensionPlanning, 3)
            .with_value(MapalField::AssetDiversification, 2);

        let first = scores.recompute_readiness();
        let second = scores.recompute_readiness();
        assert_eq!(first, second);
    }

    #[test]
    fn apply_does_not_touch_readiness() {
        let mut scores = MapalScores::new();
        scores.apply(ScoreUpdate::new(MapalField::PensionPlanning, ImpactLevel::Quantum));
        assert_eq!(scores.readiness(), Percentage::ZERO);
    }

    #[test]
    fn history_entry_truncates_excerpt() {
        let change = ScoreChange {
            field: MapalField::IncomeGrowth,
            from: 0,
            to: 1,
        };
        let long_text = "x".repeat(EXCERPT_MAX_CHARS + 50);
        let entry = MapalHistoryEntry::record(
            change,
            ImpactLevel::Low,
            AdvisorId::Career,
            &long_text,
        );

        assert_eq!(entry.excerpt.chars().count(), EXCERPT_MAX_CHARS);
        assert_eq!(entry.source, AdvisorId::Career);
    }

    proptest! {
        #[test]
        fn scores_never_leave_valid_range(
            updates in prop::collection::vec((0usize..14, 0usize..5), 0..200)
        ) {
            let impacts = [
                ImpactLevel::None,
                ImpactLevel::Low,
                ImpactLevel::Medium,
                ImpactLevel::High,
                ImpactLevel::Quantum,
            ];
            let mut scores = MapalScores::new();

            for (field_idx, impact_idx) in updates {
                let update = ScoreUpdate::new(MapalField::ALL[field_idx], impacts[impact_idx]);
                scores.apply(update);

                for field in MapalField::ALL {
                    prop_assert!(scores.value(field) <= SCORE_CAP);
                }
            }

            let readiness = scores.recompute_readiness();
            prop_assert!(readiness.value() <= 100);
        }
    }
}

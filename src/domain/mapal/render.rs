//! Markdown rendering of the MAPAL scoreboard.
//!
//! Pure presentation: the output is fully determined by the scores, so the
//! block can be snapshot-tested and appended verbatim to outgoing answers.

use crate::domain::foundation::Percentage;

use super::{MapalField, MapalScores, SCORE_CAP};

/// Number of weakest dimensions listed as priorities.
const PRIORITY_COUNT: usize = 3;

/// Renders the full scoreboard block appended to advisor answers.
pub fn render_scoreboard(scores: &MapalScores) -> String {
    let readiness = scores.readiness();
    let mut out = String::new();

    out.push_str("## MAPAL financial readiness\n\n");
    out.push_str(&format!(
        "**Overall readiness:** {} ({})\n\n",
        readiness,
        readiness_stage(readiness)
    ));

    out.push_str("| Dimension | Score | Progress | Status |\n");
    out.push_str("|---|---|---|---|\n");
    for (field, value) in scores.iter() {
        out.push_str(&format!(
            "| {} | {}/{} | {} | {} |\n",
            field.label(),
            value,
            SCORE_CAP,
            progress_bar(value),
            status_label(value)
        ));
    }

    out.push_str("\n### Where to focus next\n\n");
    for (rank, (field, value)) in weakest_fields(scores).into_iter().enumerate() {
        out.push_str(&format!(
            "{}. **{}** ({}/{}): {}\n",
            rank + 1,
            field.label(),
            value,
            SCORE_CAP,
            field.recommendation()
        ));
    }

    out.push_str("\n*The index updates as the conversation progresses.*");
    out
}

/// Textual bar for a 0-5 value.
fn progress_bar(value: u8) -> String {
    let filled = usize::from(value.min(SCORE_CAP));
    let empty = usize::from(SCORE_CAP) - filled;
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

/// Status label for a single dimension value.
fn status_label(value: u8) -> &'static str {
    match value {
        v if v >= 5 => "Ready",
        4 => "Very good",
        3 => "Partial",
        2 => "Lacking",
        _ => "Needs attention",
    }
}

/// Coarse stage label for the overall readiness percentage.
pub fn readiness_stage(readiness: Percentage) -> &'static str {
    match readiness.value() {
        v if v >= 90 => "Full financial control",
        v if v >= 75 => "Advanced: putting plans into practice",
        v if v >= 50 => "On the way: understanding and first steps",
        v if v >= 25 => "Consolidated: basic picture in place",
        _ => "Getting started: mapping the situation",
    }
}

/// The weakest dimensions in canonical order for ties.
fn weakest_fields(scores: &MapalScores) -> Vec<(MapalField, u8)> {
    let mut fields: Vec<(MapalField, u8)> = scores.iter().collect();
    // Stable sort keeps canonical order among equal scores.
    fields.sort_by_key(|(_, value)| *value);
    fields.truncate(PRIORITY_COUNT);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendering_is_deterministic() {
        let mut scores = MapalScores::new()
            .with_value(MapalField::PensionPlanning, 3)
            .with_value(MapalField::FinancialFoundations, 5);
        scores.recompute_readiness();

        assert_eq!(render_scoreboard(&scores), render_scoreboard(&scores));
    }

    #[test]
    fn scoreboard_lists_every_dimension() {
        let scores = MapalScores::new();
        let rendered = render_scoreboard(&scores);

        for field in MapalField::ALL {
            assert!(rendered.contains(field.label()), "missing {}", field.label());
        }
    }

    #[test]
    fn scoreboard_shows_readiness_and_stage() {
        let mut scores = MapalScores::new();
        for field in MapalField::ALL {
            scores = scores.with_value(field, SCORE_CAP);
        }
        scores.recompute_readiness();
        let rendered = render_scoreboard(&scores);

        assert!(rendered.contains("100%"));
        assert!(rendered.contains("Full financial control"));
    }

    #[test]
    fn priorities_pick_the_weakest_dimensions() {
        let mut scores = MapalScores::new();
        for field in MapalField::ALL {
            scores = scores.with_value(field, 4);
        }
        scores = scores.with_value(MapalField::AbundanceMindset, 0);
        scores.recompute_readiness();

        let rendered = render_scoreboard(&scores);
        let priorities = rendered.split("Where to focus next").nth(1).unwrap();
        assert!(priorities.contains("Abundance mindset"));
        assert!(priorities.contains(MapalField::AbundanceMindset.recommendation()));
    }

    #[test]
    fn progress_bar_fills_by_value() {
        assert_eq!(progress_bar(0), "░░░░░");
        assert_eq!(progress_bar(3), "███░░");
        assert_eq!(progress_bar(5), "█████");
    }

    #[test]
    fn stage_labels_cover_thresholds() {
        assert_eq!(readiness_stage(Percentage::new(0)), "Getting started: mapping the situation");
        assert_eq!(readiness_stage(Percentage::new(25)), "Consolidated: basic picture in place");
        assert_eq!(readiness_stage(Percentage::new(50)), "On the way: understanding and first steps");
        assert_eq!(readiness_stage(Percentage::new(75)), "Advanced: putting plans into practice");
        assert_eq!(readiness_stage(Percentage::new(90)), "Full financial control");
    }
}

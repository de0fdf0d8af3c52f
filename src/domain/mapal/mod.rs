//! MAPAL: the multi-dimensional financial readiness index.
//!
//! Fourteen weighted dimensions scored 0-5, a derived readiness percentage,
//! and an append-only change history. Updated incrementally from the impact
//! labels the model reports each turn.

mod field;
mod impact;
mod render;
mod scores;

pub use field::MapalField;
pub use impact::{ImpactLevel, ScoreUpdate};
pub use render::{readiness_stage, render_scoreboard};
pub use scores::{MapalHistoryEntry, MapalScores, ScoreChange, EXCERPT_MAX_CHARS, SCORE_CAP};

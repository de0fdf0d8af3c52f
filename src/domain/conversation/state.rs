//! The persisted conversation state aggregate.
//!
//! Single source of truth for "who answers next" and the MAPAL picture.
//! Mutated exclusively by the turn engine; the surrounding service persists
//! it atomically so the advisor pointer, scores, previous advisors, and the
//! carried summary always commit together.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::advisor::AdvisorId;
use crate::domain::foundation::Percentage;
use crate::domain::mapal::{
    MapalHistoryEntry, MapalScores, ScoreChange, ScoreUpdate,
};

/// The carried-forward synopsis from the most recent hand-off.
///
/// This is the only channel through which information survives an advisor
/// switch; nothing else of a prior advisor's reasoning persists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisorSummary {
    #[serde(rename = "advisorId")]
    pub advisor_id: AdvisorId,
    #[serde(rename = "advisorName")]
    pub advisor_name: String,
    pub summary: String,
}

/// Per-conversation orchestration state.
///
/// # Invariants
///
/// - `current_advisor` is always a valid persona id (type-enforced).
/// - Every MAPAL value stays within `[0, SCORE_CAP]`.
/// - `score_history` is append-only and monotonic in timestamp.
/// - `previous_advisors` records a persona when *leaving* it, without
///   duplicates; it never gains the active persona at the moment of append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    #[serde(rename = "currentAdvisor")]
    current_advisor: AdvisorId,
    #[serde(rename = "previousAdvisors")]
    previous_advisors: Vec<AdvisorId>,
    #[serde(rename = "mapalScores")]
    scores: MapalScores,
    #[serde(rename = "mapalHistory")]
    score_history: Vec<MapalHistoryEntry>,
    #[serde(rename = "lastAdvisorSummary")]
    last_advisor_summary: Option<AdvisorSummary>,
    #[serde(rename = "answeredReflectionQuestions")]
    answered_reflection_questions: Vec<String>,
}

impl ConversationState {
    /// Fresh state: default persona, zeroed scores, empty history.
    pub fn new() -> Self {
        Self {
            current_advisor: AdvisorId::DEFAULT,
            previous_advisors: Vec::new(),
            scores: MapalScores::new(),
            score_history: Vec::new(),
            last_advisor_summary: None,
            answered_reflection_questions: Vec::new(),
        }
    }

    pub fn current_advisor(&self) -> AdvisorId {
        self.current_advisor
    }

    pub fn previous_advisors(&self) -> &[AdvisorId] {
        &self.previous_advisors
    }

    pub fn scores(&self) -> &MapalScores {
        &self.scores
    }

    pub fn score_history(&self) -> &[MapalHistoryEntry] {
        &self.score_history
    }

    pub fn last_advisor_summary(&self) -> Option<&AdvisorSummary> {
        self.last_advisor_summary.as_ref()
    }

    pub fn readiness(&self) -> Percentage {
        self.scores.readiness()
    }

    /// Switches the active persona, recording the one being left.
    ///
    /// A switch to the already-active persona is a no-op (self-hand-offs
    /// never append to the previous list).
    pub fn switch_advisor(&mut self, target: AdvisorId) {
        if target == self.current_advisor {
            return;
        }
        if !self.previous_advisors.contains(&self.current_advisor) {
            self.previous_advisors.push(self.current_advisor);
        }
        self.current_advisor = target;
    }

    /// Records the synopsis carried into the next persona's prompt.
    ///
    /// Callers keep the existing summary when a hand-off omitted one, so
    /// continuity is never lost silently.
    pub fn set_summary(&mut self, summary: AdvisorSummary) {
        self.last_advisor_summary = Some(summary);
    }

    /// Applies one score update and logs it to the history.
    ///
    /// Zero-impact updates are no-ops, logged at debug only. Does not
    /// recompute readiness; call [`recompute_readiness`](Self::recompute_readiness)
    /// once per batch.
    pub fn apply_score_update(
        &mut self,
        update: ScoreUpdate,
        source: AdvisorId,
        answer_text: &str,
    ) -> Option<ScoreChange> {
        match self.scores.apply(update) {
            Some(change) => {
                self.score_history.push(MapalHistoryEntry::record(
                    change,
                    update.impact,
                    source,
                    answer_text,
                ));
                Some(change)
            }
            None => {
                debug!(field = %update.field, impact = %update.impact, "score update was a no-op");
                None
            }
        }
    }

    /// Recomputes the derived readiness percentage.
    pub fn recompute_readiness(&mut self) -> Percentage {
        self.scores.recompute_readiness()
    }

    /// Marks a reflection question as asked. Returns false when it was
    /// already asked earlier in the conversation.
    pub fn record_reflection_question(&mut self, question: &str) -> bool {
        if self.has_asked_reflection(question) {
            return false;
        }
        self.answered_reflection_questions.push(question.to_string());
        true
    }

    pub fn has_asked_reflection(&self, question: &str) -> bool {
        self.answered_reflection_questions
            .iter()
            .any(|q| q == question)
    }

    /// Directly seeds a score value. Test and reconstitution helper.
    pub fn with_score(mut self, field: crate::domain::mapal::MapalField, value: u8) -> Self {
        self.scores = self.scores.with_value(field, value);
        self
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}

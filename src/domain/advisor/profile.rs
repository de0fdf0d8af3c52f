//! Advisor persona profiles.
//!
//! A profile is the full static definition of one persona: who it is, which
//! MAPAL dimension it advances, the prompt template it speaks through, the
//! key questions it works down, and the keywords that hint a message belongs
//! to it. Profiles are immutable for the process lifetime.

use crate::domain::mapal::MapalField;

use super::AdvisorId;

/// One key question an advisor works through with the user.
///
/// The `key` tags messages that answered the question so it is never asked
/// twice (skip tracking in the prompt assembler).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyQuestion {
    pub key: &'static str,
    pub question: &'static str,
}

/// Static definition of a single advisor persona.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdvisorProfile {
    /// Stable identifier.
    pub id: AdvisorId,
    /// Display name shown to the user.
    pub name: &'static str,
    /// One-line specialty.
    pub specialty: &'static str,
    /// The MAPAL dimension this persona primarily advances.
    pub domain_field: MapalField,
    /// Persona instructions prepended to every prompt for this advisor.
    pub prompt_template: &'static str,
    /// Ordered key questions for building the user's picture.
    pub key_questions: &'static [KeyQuestion],
    /// Keywords that hint a user message belongs to this persona.
    pub trigger_keywords: &'static [&'static str],
    /// Reflection questions appended (once each) to this persona's answers.
    pub reflection_questions: &'static [&'static str],
}

impl AdvisorProfile {
    /// Returns true if any trigger keyword appears in the text
    /// (case-insensitive substring match).
    pub fn keyword_hits(&self, text: &str) -> usize {
        let lower = text.to_lowercase();
        self.trigger_keywords
            .iter()
            .filter(|keyword| lower.contains(&keyword.to_lowercase()))
            .count()
    }
}

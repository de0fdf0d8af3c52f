//! Response interpretation.
//!
//! Turns the model's raw output into a typed reply, defensively: a missing
//! or malformed structured payload degrades to a best-effort plain answer
//! and never fails a turn. Consumers pattern-match on the result instead of
//! probing optional fields.

use std::str::FromStr;

use serde::Deserialize;
use tracing::warn;

use crate::domain::advisor::AdvisorId;
use crate::domain::mapal::{ImpactLevel, MapalField, ScoreUpdate};
use crate::ports::CompletionResponse;

/// Phrases that imply the prose announced a transfer. Used only for the
/// intent-mismatch warning; the structured field stays authoritative.
const HANDOFF_MARKERS: &[&str] = &[
    "transfer you to",
    "transferring you to",
    "hand you over",
    "handing you over",
    "pass you to",
    "passing you to",
    "connect you with",
    "bring in my colleague",
    "move you over to",
];

/// A request to switch the active advisor, as returned by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandoffRequest {
    pub advisor_id: AdvisorId,
    pub reason: String,
    /// The user-facing announcement of the transfer.
    pub handoff_text: String,
}

/// Fully parsed structured reply.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredReply {
    pub text: String,
    pub advisor_id: AdvisorId,
    pub score_updates: Vec<ScoreUpdate>,
    pub next_advisor: Option<HandoffRequest>,
    pub handoff_summary: Option<String>,
}

/// The interpreted outcome of one model call.
#[derive(Debug, Clone, PartialEq)]
pub enum AdvisorReply {
    /// The model answered through the response schema.
    Structured(StructuredReply),
    /// Parsing degraded; the raw text is served as the answer with no score
    /// updates and the asked advisor's identity.
    FallbackText { text: String, advisor_id: AdvisorId },
}

impl AdvisorReply {
    pub fn text(&self) -> &str {
        match self {
            AdvisorReply::Structured(reply) => &reply.text,
            AdvisorReply::FallbackText { text, .. } => text,
        }
    }

    pub fn advisor_id(&self) -> AdvisorId {
        match self {
            AdvisorReply::Structured(reply) => reply.advisor_id,
            AdvisorReply::FallbackText { advisor_id, .. } => *advisor_id,
        }
    }

    pub fn score_updates(&self) -> &[ScoreUpdate] {
        match self {
            AdvisorReply::Structured(reply) => &reply.score_updates,
            AdvisorReply::FallbackText { .. } => &[],
        }
    }

    pub fn next_advisor(&self) -> Option<&HandoffRequest> {
        match self {
            AdvisorReply::Structured(reply) => reply.next_advisor.as_ref(),
            AdvisorReply::FallbackText { .. } => None,
        }
    }

    pub fn handoff_summary(&self) -> Option<&str> {
        match self {
            AdvisorReply::Structured(reply) => reply.handoff_summary.as_deref(),
            AdvisorReply::FallbackText { .. } => None,
        }
    }
}

/// Interprets raw model responses. Total: never fails, never panics.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseInterpreter;

// Wire shape of the structured payload. Every field is optional so a
// partially conforming payload still parses; strings are validated
// individually afterwards.
#[derive(Debug, Deserialize)]
struct PayloadDto {
    text: Option<String>,
    #[serde(rename = "advisorId")]
    advisor_id: Option<String>,
    #[serde(rename = "mapalUpdates", default)]
    mapal_updates: Vec<serde_json::Value>,
    #[serde(rename = "nextAdvisor")]
    next_advisor: Option<NextAdvisorDto>,
    #[serde(rename = "handoffSummary")]
    handoff_summary: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NextAdvisorDto {
    #[serde(rename = "advisorId")]
    advisor_id: Option<String>,
    reason: Option<String>,
    #[serde(rename = "handoffText")]
    handoff_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpdateDto {
    field: Option<String>,
    impact: Option<String>,
}

impl ResponseInterpreter {
    pub fn new() -> Self {
        Self
    }

    /// Interprets one model response for the advisor that was asked.
    ///
    /// A missing `advisorId` always defaults to `asked`, never to the root
    /// persona, so an advisor cannot lose its identity through omission.
    pub fn interpret(&self, response: &CompletionResponse, asked: AdvisorId) -> AdvisorReply {
        let Some(payload) = response.structured.as_ref() else {
            return self.fallback(&response.content, asked, "structured payload absent");
        };

        let dto: PayloadDto = match serde_json::from_value(payload.clone()) {
            Ok(dto) => dto,
            Err(err) => {
                return self.fallback(
                    &response.content,
                    asked,
                    &format!("payload did not match schema: {err}"),
                );
            }
        };

        let text = dto
            .text
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| response.content.clone());

        let advisor_id = dto
            .advisor_id
            .as_deref()
            .and_then(|raw| match AdvisorId::from_str(raw) {
                Ok(id) => Some(id),
                Err(_) => {
                    warn!(raw, "model declared an unknown advisor id");
                    None
                }
            })
            .unwrap_or(asked);

        let score_updates = self.parse_updates(&dto.mapal_updates);
        let next_advisor = dto.next_advisor.and_then(|next| self.parse_handoff(next));

        let reply = StructuredReply {
            text,
            advisor_id,
            score_updates,
            next_advisor,
            handoff_summary: dto.handoff_summary.filter(|s| !s.trim().is_empty()),
        };

        self.check_handoff_intent(&reply);
        AdvisorReply::Structured(reply)
    }

    /// Data-quality signal: prose announces a transfer but the structured
    /// hand-off field is absent. Logged, never fatal, answer still served.
    fn check_handoff_intent(&self, reply: &StructuredReply) {
        if reply.next_advisor.is_some() {
            return;
        }
        let lower = reply.text.to_lowercase();
        if HANDOFF_MARKERS.iter().any(|marker| lower.contains(marker)) {
            warn!(
                advisor = %reply.advisor_id,
                "answer text implies a hand-off but no nextAdvisor was returned"
            );
        }
    }

    fn parse_updates(&self, raw_updates: &[serde_json::Value]) -> Vec<ScoreUpdate> {
        raw_updates
            .iter()
            .filter_map(|raw| {
                let dto: UpdateDto = match serde_json::from_value(raw.clone()) {
                    Ok(dto) => dto,
                    Err(_) => {
                        warn!(%raw, "dropping malformed mapal update");
                        return None;
                    }
                };

                let field = dto.field.as_deref().and_then(|f| {
                    MapalField::from_str(f)
                        .map_err(|_| warn!(field = f, "dropping update for unknown field"))
                        .ok()
                })?;
                let impact = dto.impact.as_deref().and_then(|i| {
                    ImpactLevel::from_str(i)
                        .map_err(|_| warn!(impact = i, "dropping update with unknown impact"))
                        .ok()
                })?;

                Some(ScoreUpdate::new(field, impact))
            })
            .collect()
    }

    fn parse_handoff(&self, next: NextAdvisorDto) -> Option<HandoffRequest> {
        let raw_id = next.advisor_id?;
        let advisor_id = match AdvisorId::from_str(&raw_id) {
            Ok(id) => id,
            Err(_) => {
                warn!(target = raw_id, "dropping hand-off to unknown advisor");
                return None;
            }
        };

        Some(HandoffRequest {
            advisor_id,
            reason: next.reason.unwrap_or_default(),
            handoff_text: next.handoff_text.unwrap_or_default(),
        })
    }

    fn fallback(&self, content: &str, asked: AdvisorId, cause: &str) -> AdvisorReply {
        warn!(advisor = %asked, cause, "degrading to plain-text answer");
        AdvisorReply::FallbackText {
            text: content.to_string(),
            advisor_id: asked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::TokenUsage;
    use serde_json::json;

    fn response(content: &str, structured: Option<serde_json::Value>) -> CompletionResponse {
        CompletionResponse {
            content: content.to_string(),
            structured,
            model: "test-model".to_string(),
            usage: TokenUsage::default(),
        }
    }

    #[test]
    fn well_formed_payload_parses_fully() {
        let payload = json!({
            "text": "Let's look at your pension.",
            "advisorId": "pension",
            "mapalUpdates": [{"field": "pensionPlanning", "impact": "HIGH"}],
            "nextAdvisor": {
                "advisorId": "investments",
                "reason": "user asked about portfolios",
                "handoffText": "I'll bring in Dana."
            },
            "handoffSummary": "User has no pension deposits."
        });

        let reply = ResponseInterpreter::new().interpret(
            &response("", Some(payload)),
            AdvisorId::Pension,
        );

        let AdvisorReply::Structured(reply) = reply else {
            panic!("expected structured reply");
        };
        assert_eq!(reply.advisor_id, AdvisorId::Pension);
        assert_eq!(reply.score_updates.len(), 1);
        assert_eq!(
            reply.next_advisor.as_ref().unwrap().advisor_id,
            AdvisorId::Investments
        );
        assert_eq!(reply.handoff_summary.as_deref(), Some("User has no pension deposits."));
    }

    #[test]
    fn absent_payload_degrades_to_plain_text() {
        let reply = ResponseInterpreter::new()
            .interpret(&response("raw answer", None), AdvisorId::Budget);

        assert_eq!(
            reply,
            AdvisorReply::FallbackText {
                text: "raw answer".to_string(),
                advisor_id: AdvisorId::Budget,
            }
        );
        assert!(reply.score_updates().is_empty());
        assert!(reply.next_advisor().is_none());
    }

    #[test]
    fn wrong_payload_type_degrades_to_plain_text() {
        let reply = ResponseInterpreter::new().interpret(
            &response("still the answer", Some(json!(["not", "an", "object"]))),
            AdvisorId::Budget,
        );

        assert!(matches!(reply, AdvisorReply::FallbackText { .. }));
        assert_eq!(reply.text(), "still the answer");
    }

    #[test]
    fn missing_advisor_id_defaults_to_the_asked_advisor() {
        // Never the root persona: Mortgage asked, Mortgage answered.
        let payload = json!({"text": "about rates", "mapalUpdates": []});
        let reply = ResponseInterpreter::new()
            .interpret(&response("", Some(payload)), AdvisorId::Mortgage);

        assert_eq!(reply.advisor_id(), AdvisorId::Mortgage);
    }

    #[test]
    fn unknown_advisor_id_defaults_to_the_asked_advisor() {
        let payload = json!({"text": "hi", "advisorId": "astrologer", "mapalUpdates": []});
        let reply = ResponseInterpreter::new()
            .interpret(&response("", Some(payload)), AdvisorId::Career);

        assert_eq!(reply.advisor_id(), AdvisorId::Career);
    }

    #[test]
    fn malformed_updates_are_dropped_individually() {
        let payload = json!({
            "text": "t",
            "advisorId": "data",
            "mapalUpdates": [
                {"field": "dataBasedManagement", "impact": "LOW"},
                {"field": "notAField", "impact": "LOW"},
                {"field": "incomeGrowth", "impact": "COLOSSAL"},
                "not even an object",
                {"impact": "LOW"}
            ]
        });

        let reply = ResponseInterpreter::new()
            .interpret(&response("", Some(payload)), AdvisorId::Data);

        assert_eq!(reply.score_updates().len(), 1);
        assert_eq!(reply.score_updates()[0].field, MapalField::DataBasedManagement);
    }

    #[test]
    fn handoff_to_unknown_advisor_is_dropped() {
        let payload = json!({
            "text": "t",
            "advisorId": "strategy",
            "mapalUpdates": [],
            "nextAdvisor": {"advisorId": "timetravel", "reason": "r", "handoffText": "h"}
        });

        let reply = ResponseInterpreter::new()
            .interpret(&response("", Some(payload)), AdvisorId::Strategy);

        assert!(reply.next_advisor().is_none());
    }

    #[test]
    fn empty_structured_text_falls_back_to_raw_content() {
        let payload = json!({"text": "  ", "advisorId": "budget", "mapalUpdates": []});
        let reply = ResponseInterpreter::new()
            .interpret(&response("the actual words", Some(payload)), AdvisorId::Budget);

        assert_eq!(reply.text(), "the actual words");
    }

    #[test]
    fn interpreter_never_panics_on_junk() {
        let junk = [
            json!(null),
            json!(42),
            json!(""),
            json!({"mapalUpdates": "wrong type"}),
            json!({"nextAdvisor": {"reason": 17}}),
            json!({"text": 5, "advisorId": [], "mapalUpdates": {}}),
        ];

        for payload in junk {
            let _ = ResponseInterpreter::new()
                .interpret(&response("fallback", Some(payload)), AdvisorId::Strategy);
        }
    }
}

//! The turn engine: advisor answering and hand-off execution.
//!
//! One turn takes an immutable snapshot of the conversation state plus the
//! incoming user text, drives at most two model calls (the active advisor,
//! then the receiving advisor when a hand-off was requested), and returns a
//! new state together with the response to serve. Persistence is the
//! caller's job; nothing here mutates shared state.
//!
//! Every identified failure mode recovers locally into a normal-looking
//! chat message. No error escapes a turn.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::domain::advisor::{AdvisorId, AdvisorProfile, AdvisorRegistry};
use crate::domain::conversation::{AdvisorSummary, ConversationState, Message};
use crate::domain::mapal::render_scoreboard;
use crate::ports::AiProvider;

use super::interpreter::{AdvisorReply, HandoffRequest, ResponseInterpreter};
use super::prompt::PromptAssembler;

/// Fixed apology served when a model call fails.
pub const APOLOGY_TEXT: &str = "I'm sorry, I ran into a technical problem while \
handling your message. Please try again in a moment.";

/// Served when the active advisor cannot be resolved; the conversation is
/// pointed back at the default persona so the user is never advisor-less.
pub const ADVISOR_RESET_TEXT: &str = "I'm sorry, I lost track of the right advisor \
for a moment and brought you back to our lead strategist. Please send your \
message again.";

/// Input snapshot for one turn.
#[derive(Debug, Clone)]
pub struct TurnRequest {
    /// Conversation state as loaded; the engine works on an owned copy.
    pub state: ConversationState,
    /// Message log in creation order (the engine windows it itself).
    pub history: Vec<Message>,
    /// The incoming user text.
    pub user_text: String,
    /// Explicit client-requested advisor switch. Only honored as a manual
    /// override; the server-held state is otherwise authoritative.
    pub manual_advisor: Option<AdvisorId>,
}

/// The answer to serve for a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnResponse {
    pub text: String,
    pub advisor_id: AdvisorId,
}

/// A hand-off that was actually executed this turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutedHandoff {
    pub from: AdvisorId,
    pub to: AdvisorId,
    pub reason: String,
}

/// Failure modes a turn recovered from. Always paired with a served
/// response; surfaced for logging and metrics, never for control flow
/// outside the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnFailure {
    /// The active advisor was missing from the registry.
    UnknownAdvisor { requested: AdvisorId },
    /// The first model call failed; the apology was served.
    LlmInvocation { message: String },
    /// The re-invocation after an executed hand-off failed; the first
    /// advisor's announcement was served instead.
    SecondHop { target: AdvisorId, message: String },
}

/// Result of one turn: new state plus the response and what happened.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub state: ConversationState,
    pub response: TurnResponse,
    /// The hand-off executed this turn, if any.
    pub executed_handoff: Option<ExecutedHandoff>,
    /// A further hand-off requested by the receiving advisor. Bounded at
    /// one hop per turn, so this is recorded but never executed.
    pub deferred_handoff: Option<HandoffRequest>,
    /// The failure this turn recovered from, if any.
    pub failure: Option<TurnFailure>,
}

/// Drives advisor turns against the model provider.
pub struct TurnEngine {
    registry: Arc<AdvisorRegistry>,
    provider: Arc<dyn AiProvider>,
    assembler: PromptAssembler,
    interpreter: ResponseInterpreter,
}

impl TurnEngine {
    pub fn new(registry: Arc<AdvisorRegistry>, provider: Arc<dyn AiProvider>) -> Self {
        Self {
            registry,
            provider,
            assembler: PromptAssembler::new(),
            interpreter: ResponseInterpreter::new(),
        }
    }

    pub fn registry(&self) -> &AdvisorRegistry {
        &self.registry
    }

    pub fn assembler(&self) -> &PromptAssembler {
        &self.assembler
    }

    /// Runs one full turn. Infallible by design: every failure mode maps to
    /// a served response plus an unchanged-or-consistent state.
    pub async fn run(&self, request: TurnRequest) -> TurnOutcome {
        let TurnRequest {
            mut state,
            history,
            user_text,
            manual_advisor,
        } = request;

        self.apply_manual_override(&mut state, manual_advisor);

        // Resolve the active advisor; reset to the default persona if the
        // pointer cannot be resolved. The user is never left advisor-less.
        let advisor = match self.registry.get(state.current_advisor()) {
            Ok(profile) => *profile,
            Err(missing) => {
                error!(advisor = %missing.0, "active advisor not in registry; resetting");
                state.switch_advisor(AdvisorId::DEFAULT);
                return TurnOutcome {
                    state,
                    response: TurnResponse {
                        text: ADVISOR_RESET_TEXT.to_string(),
                        advisor_id: AdvisorId::DEFAULT,
                    },
                    executed_handoff: None,
                    deferred_handoff: None,
                    failure: Some(TurnFailure::UnknownAdvisor {
                        requested: missing.0,
                    }),
                };
            }
        };

        // First model call: the active advisor answers.
        let completion = self
            .assembler
            .turn_request(&advisor, &state, &history, &user_text);
        let response = match self.provider.complete(completion).await {
            Ok(response) => response,
            Err(err) => {
                error!(advisor = %advisor.id, error = %err, "model invocation failed");
                return TurnOutcome {
                    state,
                    response: TurnResponse {
                        text: APOLOGY_TEXT.to_string(),
                        advisor_id: advisor.id,
                    },
                    executed_handoff: None,
                    deferred_handoff: None,
                    failure: Some(TurnFailure::LlmInvocation {
                        message: err.to_string(),
                    }),
                };
            }
        };

        let reply = self.interpreter.interpret(&response, advisor.id);
        self.apply_updates(&mut state, &reply, advisor.id);
        self.record_summary(&mut state, &reply, &advisor);

        match reply.next_advisor().cloned() {
            Some(handoff) if handoff.advisor_id != advisor.id => {
                self.execute_handoff(state, advisor, reply, handoff, &history, &user_text)
                    .await
            }
            Some(_) => {
                debug!(advisor = %advisor.id, "self hand-off requested; treating as no-op");
                self.complete_without_handoff(state, advisor, reply)
            }
            None => {
                // Advisory-only routing hint; the model's decision stands.
                if let Some(hint) = self.registry.suggest_by_keywords(&user_text) {
                    if hint != advisor.id {
                        debug!(advisor = %advisor.id, %hint, "keyword hint differs from active advisor");
                    }
                }
                self.complete_without_handoff(state, advisor, reply)
            }
        }
    }

    /// Executes an advisor switch and re-invokes the model as the receiving
    /// persona. Bounded at one hop: a further request from the second
    /// answer is recorded as informational only.
    async fn execute_handoff(
        &self,
        mut state: ConversationState,
        from: AdvisorProfile,
        first_reply: AdvisorReply,
        handoff: HandoffRequest,
        history: &[Message],
        user_text: &str,
    ) -> TurnOutcome {
        let target = match self.registry.get(handoff.advisor_id) {
            Ok(profile) => *profile,
            Err(missing) => {
                error!(target = %missing.0, "hand-off names an unknown advisor; not executing");
                return self.complete_without_handoff(state, from, first_reply);
            }
        };

        state.switch_advisor(target.id);
        let executed = ExecutedHandoff {
            from: from.id,
            to: target.id,
            reason: handoff.reason.clone(),
        };

        let completion = self
            .assembler
            .handoff_request(&target, &state, history, user_text);
        let response = match self.provider.complete(completion).await {
            Ok(response) => response,
            Err(err) => {
                // The switch stands; the user sees the announcement and the
                // receiving advisor speaks on the next turn.
                warn!(
                    from = %from.id,
                    to = %target.id,
                    error = %err,
                    "second hop failed; serving the hand-off announcement"
                );
                let text = self.finalize_text(&mut state, &from, first_reply.text());
                return TurnOutcome {
                    state,
                    response: TurnResponse {
                        text,
                        advisor_id: from.id,
                    },
                    executed_handoff: Some(executed),
                    deferred_handoff: None,
                    failure: Some(TurnFailure::SecondHop {
                        target: target.id,
                        message: err.to_string(),
                    }),
                };
            }
        };

        let second_reply = self.interpreter.interpret(&response, target.id);
        self.apply_updates(&mut state, &second_reply, target.id);

        let deferred = second_reply
            .next_advisor()
            .filter(|further| further.advisor_id != target.id)
            .cloned();
        if let Some(further) = &deferred {
            info!(
                from = %target.id,
                requested = %further.advisor_id,
                "receiving advisor requested a further hand-off; one hop per turn, recorded only"
            );
        }

        // The receiving advisor's direct answer replaces the announcement.
        let text = self.finalize_text(&mut state, &target, second_reply.text());
        info!(from = %from.id, to = %target.id, "hand-off complete");

        TurnOutcome {
            state,
            response: TurnResponse {
                text,
                advisor_id: target.id,
            },
            executed_handoff: Some(executed),
            deferred_handoff: deferred,
            failure: None,
        }
    }

    fn complete_without_handoff(
        &self,
        mut state: ConversationState,
        advisor: AdvisorProfile,
        reply: AdvisorReply,
    ) -> TurnOutcome {
        if reply.advisor_id() != advisor.id {
            warn!(
                declared = %reply.advisor_id(),
                active = %advisor.id,
                "declared identity differs from the active advisor without a hand-off; keeping the active advisor"
            );
        }

        let text = self.finalize_text(&mut state, &advisor, reply.text());
        TurnOutcome {
            state,
            response: TurnResponse {
                text,
                advisor_id: advisor.id,
            },
            executed_handoff: None,
            deferred_handoff: None,
            failure: None,
        }
    }

    /// Applies a client-requested manual switch before the model is asked.
    /// This is a user action: it survives even if the turn later fails.
    fn apply_manual_override(&self, state: &mut ConversationState, manual: Option<AdvisorId>) {
        let Some(target) = manual else { return };
        if target == state.current_advisor() {
            return;
        }
        match self.registry.get(target) {
            Ok(_) => {
                info!(from = %state.current_advisor(), to = %target, "manual advisor switch");
                state.switch_advisor(target);
            }
            Err(_) => {
                error!(target = %target, "manual switch to unknown advisor ignored");
            }
        }
    }

    /// Applies one reply's score updates sequentially and recomputes the
    /// readiness once for the whole batch.
    fn apply_updates(&self, state: &mut ConversationState, reply: &AdvisorReply, source: AdvisorId) {
        let mut applied = 0usize;
        for update in reply.score_updates() {
            if state
                .apply_score_update(*update, source, reply.text())
                .is_some()
            {
                applied += 1;
            }
        }
        if applied > 0 {
            let readiness = state.recompute_readiness();
            debug!(%source, applied, %readiness, "applied score batch");
        }
    }

    /// Records the carried summary for a hand-off. A hand-off without a
    /// summary keeps whatever summary is already stored.
    fn record_summary(
        &self,
        state: &mut ConversationState,
        reply: &AdvisorReply,
        advisor: &AdvisorProfile,
    ) {
        if reply.next_advisor().is_none() {
            return;
        }
        match reply.handoff_summary() {
            Some(summary) => state.set_summary(AdvisorSummary {
                advisor_id: advisor.id,
                advisor_name: advisor.name.to_string(),
                summary: summary.to_string(),
            }),
            None => debug!(advisor = %advisor.id, "hand-off carried no summary; keeping the previous one"),
        }
    }

    /// Appends the responder's pending reflection question and the rendered
    /// MAPAL scoreboard to the outgoing text.
    fn finalize_text(
        &self,
        state: &mut ConversationState,
        responder: &AdvisorProfile,
        text: &str,
    ) -> String {
        let mut out = text.to_string();

        if let Some(question) = responder
            .reflection_questions
            .iter()
            .find(|q| !state.has_asked_reflection(q))
        {
            state.record_reflection_question(question);
            out.push_str(&format!("\n\nA question to reflect on:\n{question}"));
        }

        if self.registry.domain_field_for(responder.id).is_ok() {
            out.push_str(&format!("\n\n{}", render_scoreboard(state.scores())));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::mapal::MapalField;
    use crate::ports::{AiError, CompletionRequest, CompletionResponse, ProviderInfo, TokenUsage};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Scripted provider: pops pre-queued results and records requests.
    struct ScriptedProvider {
        results: Mutex<Vec<Result<CompletionResponse, AiError>>>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedProvider {
        fn new(results: Vec<Result<CompletionResponse, AiError>>) -> Self {
            Self {
                results: Mutex::new(results),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        fn request(&self, index: usize) -> CompletionRequest {
            self.requests.lock().unwrap()[index].clone()
        }
    }

    #[async_trait]
    impl AiProvider for ScriptedProvider {
        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResponse, AiError> {
            self.requests.lock().unwrap().push(request);
            let mut results = self.results.lock().unwrap();
            if results.is_empty() {
                return Ok(structured_response(json!({
                    "text": "default scripted answer",
                    "advisorId": "strategy",
                    "mapalUpdates": []
                })));
            }
            results.remove(0)
        }

        fn provider_info(&self) -> ProviderInfo {
            ProviderInfo::new("scripted", "test")
        }
    }

    fn structured_response(payload: serde_json::Value) -> CompletionResponse {
        CompletionResponse {
            content: String::new(),
            structured: Some(payload),
            model: "test".to_string(),
            usage: TokenUsage::default(),
        }
    }

    fn engine_with(results: Vec<Result<CompletionResponse, AiError>>) -> (TurnEngine, Arc<ScriptedProvider>) {
        let provider = Arc::new(ScriptedProvider::new(results));
        let engine = TurnEngine::new(
            Arc::new(AdvisorRegistry::builtin()),
            provider.clone(),
        );
        (engine, provider)
    }

    fn turn(user_text: &str) -> TurnRequest {
        TurnRequest {
            state: ConversationState::new(),
            history: Vec::new(),
            user_text: user_text.to_string(),
            manual_advisor: None,
        }
    }

    #[tokio::test]
    async fn plain_answer_leaves_advisor_untouched() {
        let (engine, provider) = engine_with(vec![Ok(structured_response(json!({
            "text": "Let's map your monthly budget.",
            "advisorId": "strategy",
            "mapalUpdates": []
        })))]);

        let outcome = engine.run(turn("help me")).await;

        assert_eq!(provider.call_count(), 1);
        assert_eq!(outcome.response.advisor_id, AdvisorId::Strategy);
        assert_eq!(outcome.state.current_advisor(), AdvisorId::Strategy);
        assert!(outcome.state.previous_advisors().is_empty());
        assert!(outcome.executed_handoff.is_none());
        assert!(outcome.failure.is_none());
        assert!(outcome.response.text.contains("Let's map your monthly budget."));
        // The scoreboard is appended to the outgoing answer.
        assert!(outcome.response.text.contains("MAPAL financial readiness"));
    }

    #[tokio::test]
    async fn handoff_invokes_the_receiving_advisor() {
        // End-to-end hand-off: strategy routes a mortgage question to Guy.
        let (engine, provider) = engine_with(vec![
            Ok(structured_response(json!({
                "text": "I'll bring in Guy, our mortgage specialist.",
                "advisorId": "strategy",
                "mapalUpdates": [],
                "nextAdvisor": {
                    "advisorId": "mortgage",
                    "reason": "mortgage question",
                    "handoffText": "Transferring you to Guy."
                },
                "handoffSummary": "User wants mortgage advice."
            }))),
            Ok(structured_response(json!({
                "text": "Hi, I'm Guy. Do you own or rent today?",
                "advisorId": "mortgage",
                "mapalUpdates": []
            }))),
        ]);

        let outcome = engine.run(turn("I want to talk about my mortgage")).await;

        assert_eq!(provider.call_count(), 2);
        assert_eq!(outcome.response.advisor_id, AdvisorId::Mortgage);
        assert!(outcome.response.text.contains("I'm Guy"));
        // The announcement text is discarded from the user-visible result.
        assert!(!outcome.response.text.contains("I'll bring in Guy"));

        assert_eq!(outcome.state.current_advisor(), AdvisorId::Mortgage);
        assert_eq!(outcome.state.previous_advisors(), &[AdvisorId::Strategy]);
        let summary = outcome.state.last_advisor_summary().unwrap();
        assert_eq!(summary.advisor_id, AdvisorId::Strategy);
        assert_eq!(summary.summary, "User wants mortgage advice.");

        let executed = outcome.executed_handoff.unwrap();
        assert_eq!((executed.from, executed.to), (AdvisorId::Strategy, AdvisorId::Mortgage));

        // The second call was made as the mortgage advisor.
        let second = provider.request(1);
        let system = &second.messages[0].content;
        assert!(system.contains("\"mortgage\""));
        assert!(system.contains("handed over to you"));
    }

    #[tokio::test]
    async fn self_handoff_is_a_noop() {
        let (engine, provider) = engine_with(vec![Ok(structured_response(json!({
            "text": "Staying with you on this.",
            "advisorId": "strategy",
            "mapalUpdates": [],
            "nextAdvisor": {
                "advisorId": "strategy",
                "reason": "already mine",
                "handoffText": "n/a"
            }
        })))]);

        let outcome = engine.run(turn("hello")).await;

        assert_eq!(provider.call_count(), 1);
        assert_eq!(outcome.state.current_advisor(), AdvisorId::Strategy);
        assert!(outcome.state.previous_advisors().is_empty());
        assert!(outcome.executed_handoff.is_none());
    }

    #[tokio::test]
    async fn at_most_one_hop_per_turn() {
        // The receiving advisor's own hand-off request is recorded, not
        // executed: the advisor pointer stops at the first target.
        let (engine, provider) = engine_with(vec![
            Ok(structured_response(json!({
                "text": "Over to Guy.",
                "advisorId": "strategy",
                "mapalUpdates": [],
                "nextAdvisor": {
                    "advisorId": "mortgage",
                    "reason": "mortgage",
                    "handoffText": "to Guy"
                },
                "handoffSummary": "mortgage topic"
            }))),
            Ok(structured_response(json!({
                "text": "Actually this sounds like a pension matter.",
                "advisorId": "mortgage",
                "mapalUpdates": [],
                "nextAdvisor": {
                    "advisorId": "pension",
                    "reason": "pension",
                    "handoffText": "to Yael"
                }
            }))),
        ]);

        let outcome = engine.run(turn("mortgage, but really pension")).await;

        assert_eq!(provider.call_count(), 2);
        assert_eq!(outcome.state.current_advisor(), AdvisorId::Mortgage);
        let deferred = outcome.deferred_handoff.unwrap();
        assert_eq!(deferred.advisor_id, AdvisorId::Pension);
    }

    #[tokio::test]
    async fn score_updates_apply_and_cap() {
        let state = ConversationState::new().with_score(MapalField::PensionPlanning, 3);
        let (engine, _) = engine_with(vec![Ok(structured_response(json!({
            "text": "Pension progress!",
            "advisorId": "pension",
            "mapalUpdates": [{"field": "pensionPlanning", "impact": "HIGH"}]
        })))]);

        let mut request = turn("pension");
        request.state = state;
        request.state.switch_advisor(AdvisorId::Pension);
        let outcome = engine.run(request).await;

        assert_eq!(
            outcome.state.scores().value(MapalField::PensionPlanning),
            5,
            "3 + HIGH(3) capped at 5"
        );
        let history = outcome.state.score_history();
        assert_eq!(history.len(), 1);
        assert_eq!((history[0].from, history[0].to), (3, 5));
        assert!(outcome.state.readiness().value() > 0);
    }

    #[tokio::test]
    async fn same_field_updates_apply_sequentially_with_two_history_entries() {
        let state = ConversationState::new().with_score(MapalField::FinancialFoundations, 4);
        let (engine, _) = engine_with(vec![Ok(structured_response(json!({
            "text": "Budget locked in.",
            "advisorId": "budget",
            "mapalUpdates": [
                {"field": "financialFoundations", "impact": "LOW"},
                {"field": "financialFoundations", "impact": "MEDIUM"}
            ]
        })))]);

        let mut request = turn("budget");
        request.state = state;
        request.state.switch_advisor(AdvisorId::Budget);
        let outcome = engine.run(request).await;

        assert_eq!(outcome.state.scores().value(MapalField::FinancialFoundations), 5);
        let history = outcome.state.score_history();
        assert_eq!(history.len(), 2);
        assert_eq!((history[0].from, history[0].to), (4, 5));
        assert_eq!((history[1].from, history[1].to), (5, 5));
    }

    #[tokio::test]
    async fn first_call_failure_serves_the_apology_unchanged_state() {
        let (engine, _) = engine_with(vec![Err(AiError::Timeout { timeout_secs: 30 })]);

        let before = ConversationState::new();
        let mut request = turn("hello?");
        request.state = before.clone();
        let outcome = engine.run(request).await;

        assert_eq!(outcome.response.text, APOLOGY_TEXT);
        assert_eq!(outcome.response.advisor_id, AdvisorId::Strategy);
        assert_eq!(outcome.state, before, "no score or advisor mutation");
        assert!(matches!(outcome.failure, Some(TurnFailure::LlmInvocation { .. })));
    }

    #[tokio::test]
    async fn second_hop_failure_serves_the_announcement_and_keeps_the_switch() {
        let (engine, provider) = engine_with(vec![
            Ok(structured_response(json!({
                "text": "I'm transferring you to Guy for the mortgage details.",
                "advisorId": "strategy",
                "mapalUpdates": [],
                "nextAdvisor": {
                    "advisorId": "mortgage",
                    "reason": "mortgage",
                    "handoffText": "to Guy"
                },
                "handoffSummary": "mortgage topic"
            }))),
            Err(AiError::network("connection reset")),
        ]);

        let outcome = engine.run(turn("mortgage please")).await;

        assert_eq!(provider.call_count(), 2);
        // The announcement from the first advisor is served...
        assert_eq!(outcome.response.advisor_id, AdvisorId::Strategy);
        assert!(outcome.response.text.contains("transferring you to Guy"));
        // ...but the advisor pointer has already switched.
        assert_eq!(outcome.state.current_advisor(), AdvisorId::Mortgage);
        assert_eq!(outcome.state.previous_advisors(), &[AdvisorId::Strategy]);
        assert!(matches!(
            outcome.failure,
            Some(TurnFailure::SecondHop { target: AdvisorId::Mortgage, .. })
        ));
    }

    #[tokio::test]
    async fn second_hop_updates_stack_on_the_first_batch() {
        let (engine, _) = engine_with(vec![
            Ok(structured_response(json!({
                "text": "Handing over.",
                "advisorId": "strategy",
                "mapalUpdates": [{"field": "financialFoundations", "impact": "LOW"}],
                "nextAdvisor": {
                    "advisorId": "pension",
                    "reason": "pension",
                    "handoffText": "to Yael"
                },
                "handoffSummary": "pension focus"
            }))),
            Ok(structured_response(json!({
                "text": "Pension first steps done.",
                "advisorId": "pension",
                "mapalUpdates": [{"field": "pensionPlanning", "impact": "MEDIUM"}]
            }))),
        ]);

        let outcome = engine.run(turn("pension")).await;

        assert_eq!(outcome.state.scores().value(MapalField::FinancialFoundations), 1);
        assert_eq!(outcome.state.scores().value(MapalField::PensionPlanning), 2);
        assert_eq!(outcome.state.score_history().len(), 2);
    }

    #[tokio::test]
    async fn handoff_without_summary_keeps_the_previous_one() {
        let mut state = ConversationState::new();
        state.set_summary(AdvisorSummary {
            advisor_id: AdvisorId::Budget,
            advisor_name: "Ron".to_string(),
            summary: "Earlier summary.".to_string(),
        });

        let (engine, _) = engine_with(vec![
            Ok(structured_response(json!({
                "text": "Over to Guy.",
                "advisorId": "strategy",
                "mapalUpdates": [],
                "nextAdvisor": {
                    "advisorId": "mortgage",
                    "reason": "mortgage",
                    "handoffText": "to Guy"
                }
            }))),
            Ok(structured_response(json!({
                "text": "Guy here.",
                "advisorId": "mortgage",
                "mapalUpdates": []
            }))),
        ]);

        let mut request = turn("mortgage");
        request.state = state;
        let outcome = engine.run(request).await;

        let summary = outcome.state.last_advisor_summary().unwrap();
        assert_eq!(summary.summary, "Earlier summary.", "continuity never lost silently");
    }

    #[tokio::test]
    async fn manual_override_switches_before_the_model_is_asked() {
        let (engine, provider) = engine_with(vec![Ok(structured_response(json!({
            "text": "Dana here, let's talk investing.",
            "advisorId": "investments",
            "mapalUpdates": []
        })))]);

        let mut request = turn("what about index funds?");
        request.manual_advisor = Some(AdvisorId::Investments);
        let outcome = engine.run(request).await;

        assert_eq!(outcome.state.current_advisor(), AdvisorId::Investments);
        assert_eq!(outcome.state.previous_advisors(), &[AdvisorId::Strategy]);
        let first = provider.request(0);
        assert!(first.messages[0].content.contains("\"investments\""));
    }

    #[tokio::test]
    async fn unknown_active_advisor_resets_to_the_default() {
        let registry = AdvisorRegistry::from_profiles(vec![
            crate::domain::advisor::catalog_profile(AdvisorId::Strategy),
        ]);
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let engine = TurnEngine::new(Arc::new(registry), provider.clone());

        let mut state = ConversationState::new();
        state.switch_advisor(AdvisorId::Mortgage); // not in this registry

        let outcome = engine
            .run(TurnRequest {
                state,
                history: Vec::new(),
                user_text: "hello".to_string(),
                manual_advisor: None,
            })
            .await;

        assert_eq!(provider.call_count(), 0, "turn fails before the model is asked");
        assert_eq!(outcome.response.advisor_id, AdvisorId::Strategy);
        assert_eq!(outcome.response.text, ADVISOR_RESET_TEXT);
        assert_eq!(outcome.state.current_advisor(), AdvisorId::Strategy);
        assert!(matches!(
            outcome.failure,
            Some(TurnFailure::UnknownAdvisor { requested: AdvisorId::Mortgage })
        ));
    }

    #[tokio::test]
    async fn fallback_reply_still_serves_text() {
        let (engine, _) = engine_with(vec![Ok(CompletionResponse {
            content: "plain words, no schema".to_string(),
            structured: None,
            model: "test".to_string(),
            usage: TokenUsage::default(),
        })]);

        let outcome = engine.run(turn("hi")).await;

        assert!(outcome.response.text.contains("plain words, no schema"));
        assert_eq!(outcome.response.advisor_id, AdvisorId::Strategy);
        assert!(outcome.state.score_history().is_empty());
        assert!(outcome.failure.is_none());
    }

    #[tokio::test]
    async fn reflection_question_is_appended_once() {
        let payload = json!({
            "text": "An answer.",
            "advisorId": "strategy",
            "mapalUpdates": []
        });
        let (engine, _) = engine_with(vec![
            Ok(structured_response(payload.clone())),
            Ok(structured_response(payload)),
        ]);

        let first = engine.run(turn("hello")).await;
        assert!(first.response.text.contains("A question to reflect on"));

        let mut second_request = turn("again");
        second_request.state = first.state;
        let second = engine.run(second_request).await;
        assert!(
            !second.response.text.contains("A question to reflect on"),
            "strategy has a single reflection question; it is never repeated"
        );
    }
}

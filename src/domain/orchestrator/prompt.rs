//! Prompt assembly.
//!
//! Builds the exact instruction payload for one model invocation: persona
//! template, carried-over context from the previous advisor, the scoring and
//! hand-off contract, and the persona's remaining key questions. Pure given
//! its inputs, so outputs can be snapshot-tested.

use serde_json::json;

use crate::domain::advisor::{AdvisorId, AdvisorProfile};
use crate::domain::conversation::{ConversationState, Message};
use crate::domain::mapal::MapalField;
use crate::ports::{ChatMessage, CompletionRequest, ResponseSchema};

/// How many trailing messages are replayed to the model each turn.
pub const HISTORY_WINDOW: usize = 10;

const MAX_COMPLETION_TOKENS: u32 = 2000;
const TEMPERATURE: f32 = 0.6;

/// Builds completion requests for advisor turns.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptAssembler;

impl PromptAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Opening message a fresh conversation greets the user with.
    pub fn intro_text(&self, advisor: &AdvisorProfile) -> String {
        format!(
            "Hi, I'm {}, {} at Horizon Financial 360.\n\n\
             I'd like to build a full picture of your finances together, and bring in \
             the right specialist from the team whenever a focused topic comes up.\n\n\
             Before we start, I'd love to know:\n\
             - How should I address you?\n\
             - And roughly how old are you?\n\n\
             A few places people often like to start:\n\
             - Feeling more in control of monthly spending\n\
             - Starting to save or invest properly\n\
             - Planning for the kids' future\n\
             - Understanding where the pension stands\n\n\
             If one of these resonates, we can begin there. If not, just tell me \
             what matters to you right now.",
            advisor.name,
            lowercase_first(advisor.specialty),
        )
    }

    /// Request for a regular turn of the active advisor.
    pub fn turn_request(
        &self,
        advisor: &AdvisorProfile,
        state: &ConversationState,
        history: &[Message],
        user_text: &str,
    ) -> CompletionRequest {
        let mut system = advisor.prompt_template.to_string();

        if let Some(block) = self.previous_advisor_block(advisor.id, state) {
            system.push_str(&block);
        }

        system.push_str(&self.mapal_guidance());
        system.push_str(&self.response_contract(advisor));
        system.push_str(&self.identity_rules(advisor));
        system.push_str(&self.handoff_rules());
        system.push_str(&self.key_questions_block(advisor, history));

        self.request_with(system, history, user_text)
    }

    /// Request for the receiving advisor immediately after a hand-off.
    ///
    /// Same trailing history and user message as the first call; the system
    /// prompt swaps the persona, injects the carried summary, and instructs
    /// the advisor to introduce itself and answer directly.
    pub fn handoff_request(
        &self,
        advisor: &AdvisorProfile,
        state: &ConversationState,
        history: &[Message],
        user_text: &str,
    ) -> CompletionRequest {
        let mut system = advisor.prompt_template.to_string();

        if let Some(summary) = state.last_advisor_summary() {
            system.push_str(&format!(
                "\n\n---\nContext from the previous advisor ({}):\n{}",
                summary.advisor_name, summary.summary
            ));
        }

        system.push_str(&self.response_contract(advisor));
        system.push_str(&format!(
            "\n\nWho you are:\n\
             - You are {}, advisor id \"{}\".\n\
             - The user was just handed over to you from another advisor. Introduce \
             yourself briefly and start working directly.\n\
             - Ask a relevant question from your specialty to get going.",
            advisor.name, advisor.id
        ));
        system.push_str(&self.key_questions_block(advisor, history));

        self.request_with(system, history, user_text)
    }

    /// The function-call schema every advisor turn must answer through.
    pub fn response_schema(&self) -> ResponseSchema {
        let advisor_ids: Vec<&str> = AdvisorId::ALL.iter().map(AdvisorId::as_str).collect();
        let field_names: Vec<&str> = MapalField::ALL.iter().map(MapalField::as_str).collect();

        ResponseSchema {
            name: "advisor_response".to_string(),
            description: "Structured answer format of the financial advisor".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "text": {
                        "type": "string",
                        "description": "The full answer in Markdown"
                    },
                    "advisorId": {
                        "type": "string",
                        "enum": advisor_ids,
                        "description": "Id of the advisor answering"
                    },
                    "handoffSummary": {
                        "type": "string",
                        "description": "Essential findings to carry to the next advisor (only with nextAdvisor)"
                    },
                    "mapalUpdates": {
                        "type": "array",
                        "description": "Readiness dimensions genuinely addressed this turn; empty if none",
                        "items": {
                            "type": "object",
                            "properties": {
                                "field": {
                                    "type": "string",
                                    "enum": field_names,
                                    "description": "Dimension name"
                                },
                                "impact": {
                                    "type": "string",
                                    "enum": ["LOW", "MEDIUM", "HIGH", "QUANTUM"],
                                    "description": "Impact strength: LOW=1, MEDIUM=2, HIGH=3, QUANTUM=5"
                                }
                            },
                            "required": ["field", "impact"]
                        }
                    },
                    "nextAdvisor": {
                        "type": "object",
                        "properties": {
                            "advisorId": {
                                "type": "string",
                                "enum": advisor_ids,
                                "description": "Advisor to hand over to"
                            },
                            "reason": {
                                "type": "string",
                                "description": "Why the hand-off is needed"
                            },
                            "handoffText": {
                                "type": "string",
                                "description": "The hand-off announcement shown to the user"
                            }
                        },
                        "required": ["advisorId", "reason", "handoffText"]
                    }
                },
                "required": ["text", "advisorId", "mapalUpdates"]
            }),
        }
    }

    fn request_with(
        &self,
        system: String,
        history: &[Message],
        user_text: &str,
    ) -> CompletionRequest {
        let mut messages = vec![ChatMessage::system(system)];
        messages.extend(chat_history(history));
        messages.push(ChatMessage::user(user_text));

        CompletionRequest::new(messages)
            .with_schema(self.response_schema())
            .with_max_tokens(MAX_COMPLETION_TOKENS)
            .with_temperature(TEMPERATURE)
    }

    /// Context block carried over from the previous advisor, when the
    /// summary belongs to a different persona than the one answering.
    fn previous_advisor_block(
        &self,
        current: AdvisorId,
        state: &ConversationState,
    ) -> Option<String> {
        let summary = state.last_advisor_summary()?;
        if summary.advisor_id == current {
            return None;
        }
        Some(format!(
            "\n\n---\nContext from the previous advisor ({}):\n{}",
            summary.advisor_name, summary.summary
        ))
    }

    fn mapal_guidance(&self) -> String {
        "\n\nMAPAL readiness index:\n\
         Throughout the conversation an internal system tracks the user's financial \
         readiness based on the clarity of their goals, their awareness of their own \
         situation, and their willingness to act. Do not quote the index directly, but \
         you may acknowledge progress or a shift in mindset when you sense one."
            .to_string()
    }

    fn response_contract(&self, advisor: &AdvisorProfile) -> String {
        let mut block = String::from(
            "\n\nResponse format (required):\n\
             - text: the full answer in Markdown\n",
        );
        block.push_str(&format!("- advisorId: \"{}\"\n", advisor.id));
        block.push_str(
            "- mapalUpdates: the dimensions you genuinely addressed this turn \
             (several at once is fine)\n\nDimensions:\n",
        );
        for field in MapalField::ALL {
            block.push_str(&format!("- {}: {}\n", field.as_str(), field.focus()));
        }
        block.push_str(
            "\nExample: [{\"field\": \"financialFoundations\", \"impact\": \"HIGH\"}, \
             {\"field\": \"behaviorAndHabits\", \"impact\": \"MEDIUM\"}]\n\
             If the turn touched no dimension: []",
        );
        block
    }

    fn identity_rules(&self, advisor: &AdvisorProfile) -> String {
        format!(
            "\n\nWho you are:\n\
             - You are {}, advisor id \"{}\".\n\
             - You are already the active advisor in this conversation; the user has \
             already been routed to you.\n\
             - Never announce a transfer to the advisor of your own specialty. If the \
             user asked for you, they are with you: start working directly.",
            advisor.name, advisor.id
        )
    }

    fn handoff_rules(&self) -> String {
        "\n\nHand-offs (only when needed):\n\
         - Hand over only when the user asks about a topic outside your specialty.\n\
         - If your text says you are transferring the user, you must also return \
         nextAdvisor and handoffSummary. Never mention a transfer in the text without \
         returning nextAdvisor.\n\
         - handoffSummary: two or three sentences about the user for the next advisor."
            .to_string()
    }

    /// Numbered key questions with already-answered keys removed.
    fn key_questions_block(&self, advisor: &AdvisorProfile, history: &[Message]) -> String {
        let answered: Vec<&str> = history
            .iter()
            .filter(|m| m.is_user())
            .filter_map(|m| m.question_key())
            .collect();

        let open: Vec<_> = advisor
            .key_questions
            .iter()
            .filter(|q| !answered.contains(&q.key))
            .collect();

        if open.is_empty() {
            return "\n\nYou have covered your key questions; continue the conversation \
                    from what the user shares."
                .to_string();
        }

        let mut block = String::from("\n\nKey questions for understanding the user:\n");
        for (index, question) in open.iter().enumerate() {
            block.push_str(&format!("{}. {}\n", index + 1, question.question));
        }
        block.push_str(
            "\nConversation guidance:\n\
             - Do not fire the questions off in sequence.\n\
             - Ask at most one or two per turn, chosen by context.\n\
             - Never repeat a question that was already answered.",
        );
        block
    }
}

fn chat_history(history: &[Message]) -> Vec<ChatMessage> {
    let start = history.len().saturating_sub(HISTORY_WINDOW);
    history[start..]
        .iter()
        .map(|message| {
            if message.is_user() {
                ChatMessage::user(message.text())
            } else {
                ChatMessage::assistant(message.text())
            }
        })
        .collect()
}

fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

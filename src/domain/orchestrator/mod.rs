//! Turn orchestration: prompt assembly, response interpretation, and the
//! hand-off state machine that drives at most two model calls per turn.

mod interpreter;
mod prompt;
mod turn;

pub use interpreter::{AdvisorReply, HandoffRequest, ResponseInterpreter, StructuredReply};
pub use prompt::{PromptAssembler, HISTORY_WINDOW};
pub use turn::{
    ExecutedHandoff, TurnEngine, TurnFailure, TurnOutcome, TurnRequest, TurnResponse,
    ADVISOR_RESET_TEXT, APOLOGY_TEXT,
};

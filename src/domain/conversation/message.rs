//! Conversation messages.
//!
//! Messages form an append-only log ordered by creation. They are never
//! mutated after creation; user-initiated edits and deletes are operations
//! of the surrounding persistence layer and deliberately do not rewind any
//! score state derived from earlier turns.

use serde::{Deserialize, Serialize};

use crate::domain::advisor::AdvisorId;
use crate::domain::foundation::{MessageId, Timestamp, ValidationError};

/// Who authored a message.
///
/// Advisor messages always carry the persona that produced them; a persona
/// never "loses its identity" in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Author {
    User,
    Advisor {
        #[serde(rename = "advisorId")]
        advisor_id: AdvisorId,
    },
}

/// An immutable message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    author: Author,
    text: String,
    /// Key of the advisor question this message answered, if the client
    /// tagged it. Used to skip already-answered key questions.
    question_key: Option<String>,
    created_at: Timestamp,
}

impl Message {
    /// Creates a user message.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Empty` for blank text.
    pub fn user(text: impl Into<String>) -> Result<Self, ValidationError> {
        Self::build(Author::User, text, None)
    }

    /// Creates a user message that answers a specific key question.
    pub fn user_answering(
        text: impl Into<String>,
        question_key: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::build(Author::User, text, Some(question_key.into()))
    }

    /// Creates an advisor message.
    pub fn advisor(
        advisor_id: AdvisorId,
        text: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::build(Author::Advisor { advisor_id }, text, None)
    }

    /// Reconstitutes a message from persistence without validation.
    pub fn reconstitute(
        id: MessageId,
        author: Author,
        text: String,
        question_key: Option<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            author,
            text,
            question_key,
            created_at,
        }
    }

    fn build(
        author: Author,
        text: impl Into<String>,
        question_key: Option<String>,
    ) -> Result<Self, ValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "message text",
            });
        }

        Ok(Self {
            id: MessageId::new(),
            author,
            text,
            question_key,
            created_at: Timestamp::now(),
        })
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn author(&self) -> Author {
        self.author
    }

    /// The persona behind an advisor message, if any.
    pub fn advisor_id(&self) -> Option<AdvisorId> {
        match self.author {
            Author::Advisor { advisor_id } => Some(advisor_id),
            Author::User => None,
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self.author, Author::User)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn question_key(&self) -> Option<&str> {
        self.question_key.as_deref()
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

use crate::upload::GENERIC_FAILURE;

pub const EMPTY_QUESTION_PROMPT: &str = "Please enter a question";

pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

/// Pointer from a bot answer to a page of an uploaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    pub source: String,
    pub page: u32,
}

impl Citation {
    pub fn new(source: impl Into<String>, page: u32) -> Self {
        Self {
            source: source.into(),
            page,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
    pub citations: Option<Vec<Citation>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatPhase {
    #[default]
    Idle,
    Awaiting,
}

/// Why a question submission did not go out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SubmitRejection {
    /// A previous question is still awaiting its answer.
    Busy,
    /// The pending text is empty or whitespace.
    EmptyQuestion,
}

/// Conversation controller: append-only message log plus the pending question.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConversationState {
    messages: Vec<Message>,
    draft: String,
    phase: ChatPhase,
    awaited: Option<RequestId>,
    next_request_id: RequestId,
}

impl ConversationState {
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn phase(&self) -> ChatPhase {
        self.phase
    }

    /// Returns false while awaiting; the input is disabled then.
    pub(crate) fn set_draft(&mut self, text: String) -> bool {
        if self.phase == ChatPhase::Awaiting {
            return false;
        }
        self.draft = text;
        true
    }

    /// Appends the user message and moves to `Awaiting`.
    pub(crate) fn submit(&mut self) -> Result<(RequestId, String), SubmitRejection> {
        if self.phase == ChatPhase::Awaiting {
            return Err(SubmitRejection::Busy);
        }
        if self.draft.trim().is_empty() {
            return Err(SubmitRejection::EmptyQuestion);
        }

        let question = self.draft.clone();
        self.messages.push(Message {
            sender: Sender::User,
            text: question.clone(),
            citations: None,
        });
        self.next_request_id += 1;
        let request_id = self.next_request_id;
        self.awaited = Some(request_id);
        self.phase = ChatPhase::Awaiting;
        Ok((request_id, question))
    }

    pub(crate) fn answer_received(
        &mut self,
        request_id: RequestId,
        answer: String,
        citations: Vec<Citation>,
    ) -> bool {
        if !self.complete(request_id) {
            return false;
        }
        let citations = if citations.is_empty() {
            None
        } else {
            Some(citations)
        };
        self.messages.push(Message {
            sender: Sender::Bot,
            text: answer,
            citations,
        });
        true
    }

    pub(crate) fn answer_failed(&mut self, request_id: RequestId, error: Option<String>) -> bool {
        if !self.complete(request_id) {
            return false;
        }
        self.messages.push(Message {
            sender: Sender::Bot,
            text: error.unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            citations: None,
        });
        true
    }

    fn complete(&mut self, request_id: RequestId) -> bool {
        if self.awaited != Some(request_id) {
            return false;
        }
        self.awaited = None;
        self.phase = ChatPhase::Idle;
        self.draft.clear();
        true
    }
}

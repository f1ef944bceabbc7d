//! Project-scoping chat session
//!
//! Holds the message log and the backend's confidence for one open chat
//! modal. Messages are only ever appended; closing the modal drops the session.
//! Every session carries a ticket so replies to an earlier modal can be told
//! apart from replies to the one currently open.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::api::{ContinueScopingResponse, CreateContextResponse, ProjectChatResponse};
use crate::error::DivergenceError;

/// One entry in the chat log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum ChatMessage {
    User(String),
    Assistant(String),
    System(String),
    Error(String),
}

impl ChatMessage {
    pub fn content(&self) -> &str {
        match self {
            ChatMessage::User(text)
            | ChatMessage::Assistant(text)
            | ChatMessage::System(text)
            | ChatMessage::Error(text) => text,
        }
    }

    pub fn is_from_user(&self) -> bool {
        matches!(self, ChatMessage::User(_))
    }
}

/// Which backend conversation the chat is attached to
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Conversation {
    /// Nothing sent yet
    #[default]
    None,
    /// `POST /api/projects/{id}/chat` session
    Session(String),
    /// `create-ai-context` / `continue-scoping` thread
    Thread(String),
}

const COMPLETE_NOTICE: &str = "Scoping complete. You can now generate the project breakdown.";

static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

/// Identifies one chat session; a fresh session never reuses an old ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChatTicket(u64);

impl ChatTicket {
    fn next() -> Self {
        ChatTicket(NEXT_TICKET.fetch_add(1, Ordering::Relaxed))
    }
}

/// Result of a request made on behalf of a chat session
#[derive(Debug, Clone)]
pub enum ChatUpdate {
    Reply(ProjectChatResponse),
    ScopingStarted(CreateContextResponse),
    ScopingReply(ContinueScopingResponse),
    Failed(DivergenceError),
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    ticket: ChatTicket,
    messages: Vec<ChatMessage>,
    confidence: f64,
    complete: bool,
    pending: bool,
    conversation: Conversation,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self {
            ticket: ChatTicket::next(),
            messages: Vec::new(),
            confidence: 0.0,
            complete: false,
            pending: false,
            conversation: Conversation::None,
        }
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ticket(&self) -> ChatTicket {
        self.ticket
    }

    pub fn with_intro(intro: &str) -> Self {
        let mut session = Self::new();
        session.messages.push(ChatMessage::System(intro.to_string()));
        session
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Confidence as a whole percentage for the progress bar
    pub fn confidence_percent(&self) -> u8 {
        (self.confidence * 100.0).round() as u8
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// A request is in flight
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn session_id(&self) -> Option<&str> {
        match &self.conversation {
            Conversation::Session(id) => Some(id),
            _ => None,
        }
    }

    pub fn thread_id(&self) -> Option<&str> {
        match &self.conversation {
            Conversation::Thread(id) => Some(id),
            _ => None,
        }
    }

    /// Record the user's message and mark a request as in flight. Returns the
    /// text to send, or `None` when the input is blank or sending is not allowed.
    pub fn submit_user_message(&mut self, input: &str) -> Option<String> {
        let text = input.trim();
        if text.is_empty() || self.pending || self.complete {
            return None;
        }
        self.messages.push(ChatMessage::User(text.to_string()));
        self.pending = true;
        Some(text.to_string())
    }

    /// Mark a request as in flight without a user message (e.g. starting a thread)
    pub fn begin_request(&mut self) {
        self.pending = true;
    }

    pub fn apply_chat_reply(&mut self, reply: &ProjectChatResponse) {
        if let Some(id) = &reply.session_id {
            self.conversation = Conversation::Session(id.clone());
        }
        self.apply_turn(reply.text(), reply.confidence, reply.complete);
    }

    pub fn apply_context(&mut self, reply: &CreateContextResponse) {
        self.conversation = Conversation::Thread(reply.thread_id.clone());
        self.apply_turn(reply.question.as_deref(), reply.confidence, false);
    }

    pub fn apply_scoping_reply(&mut self, reply: &ContinueScopingResponse) {
        self.apply_turn(reply.question.as_deref(), reply.confidence, reply.complete);
    }

    pub fn apply_error(&mut self, error: &DivergenceError) {
        self.pending = false;
        self.messages.push(ChatMessage::Error(format!("Something went wrong: {}", error)));
    }

    /// Apply the result of a request sent under `ticket`. Returns false, and
    /// leaves the session untouched, when the request belonged to another session.
    pub fn apply_update(&mut self, ticket: ChatTicket, update: &ChatUpdate) -> bool {
        if ticket != self.ticket {
            return false;
        }
        match update {
            ChatUpdate::Reply(reply) => self.apply_chat_reply(reply),
            ChatUpdate::ScopingStarted(reply) => self.apply_context(reply),
            ChatUpdate::ScopingReply(reply) => self.apply_scoping_reply(reply),
            ChatUpdate::Failed(error) => self.apply_error(error),
        }
        true
    }

    fn apply_turn(&mut self, text: Option<&str>, confidence: f64, complete: bool) {
        self.pending = false;
        if let Some(text) = text.filter(|t| !t.trim().is_empty()) {
            self.messages.push(ChatMessage::Assistant(text.to_string()));
        }
        self.confidence = confidence.clamp(0.0, 1.0);
        if complete && !self.complete {
            self.complete = true;
            self.messages.push(ChatMessage::System(COMPLETE_NOTICE.to_string()));
        }
    }
}

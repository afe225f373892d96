//! AI assistant chat panel.

use chrono::{DateTime, Local, Utc};
use uuid::Uuid;

use crate::errors::ClientError;
use crate::models::{ChatRequest, ChatRole, ChatTurn, Provider};
use crate::App;

use super::{ApiSetupModal, CredentialGate};

pub const GREETING: &str = "👋 Hi! I'm your SEO AI assistant. I can help you analyze your keywords, track rankings, find opportunities, and more. What would you like to know?";
pub const CHAT_FALLBACK: &str = "Sorry, I encountered an error. Please try again.";
pub const INPUT_PLACEHOLDER: &str = "Ask about your SEO data, or request an action...";

pub const QUICK_ACTIONS: [&str; 4] = [
    "Which keywords are declining this week?",
    "Find my top ranking opportunities",
    "Show competitor analysis",
    "What's my overall SEO health?",
];

/// One entry in the conversation. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    fn turn(&self) -> ChatTurn {
        ChatTurn {
            role: self.role,
            content: self.content.clone(),
        }
    }
}

#[derive(Debug)]
pub enum ChatOutcome {
    /// Blank input, or a reply was still pending.
    Ignored,
    Replied,
    SetupRequired(ApiSetupModal),
}

/// Holds `pending` up while a reply is awaited, including when the send is dropped.
struct PendingFlag<'a>(&'a mut bool);

impl<'a> PendingFlag<'a> {
    fn raise(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for PendingFlag<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

pub struct ChatPanel {
    pub project_id: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub input: String,
    pub pending: bool,
    gate: CredentialGate,
}

impl ChatPanel {
    pub fn new(project_id: Option<String>) -> Self {
        Self {
            project_id,
            messages: vec![ChatMessage::new(ChatRole::Assistant, GREETING)],
            input: String::new(),
            pending: false,
            gate: CredentialGate::new(Provider::Anthropic, "the AI assistant"),
        }
    }

    pub fn show_quick_actions(&self) -> bool {
        self.messages.len() <= 1
    }

    /// Fill the input with a quick action; the user still has to send it.
    pub fn quick_action(&mut self, index: usize) {
        if let Some(action) = QUICK_ACTIONS.get(index) {
            self.input = action.to_string();
        }
    }

    /// Send whatever is in the input box.
    pub async fn submit(&mut self, app: &App) -> Result<ChatOutcome, ClientError> {
        let input = std::mem::take(&mut self.input);
        let outcome = self.send(app, &input).await;
        if !matches!(outcome, Ok(ChatOutcome::Replied)) {
            self.input = input;
        }
        outcome
    }

    /// Send one message. A failed chat call becomes a fallback reply, not an error.
    pub async fn send(&mut self, app: &App, input: &str) -> Result<ChatOutcome, ClientError> {
        let message = input.trim();
        if message.is_empty() || self.pending {
            return Ok(ChatOutcome::Ignored);
        }
        let configured = match self.gate.is_configured(app).await {
            Ok(configured) => Some(configured),
            Err(e) => {
                tracing::warn!("Anthropic credential check failed: {}", e);
                None
            }
        };
        if configured == Some(false) {
            return Ok(ChatOutcome::SetupRequired(ApiSetupModal::new(
                self.gate.provider,
                self.gate.feature.clone(),
            )));
        }

        let request = ChatRequest {
            message: message.to_string(),
            project_id: self.project_id.clone(),
            conversation_history: self.messages.iter().map(ChatMessage::turn).collect(),
        };
        self.messages.push(ChatMessage::new(ChatRole::User, message));

        let content = if configured.is_some() {
            let _pending = PendingFlag::raise(&mut self.pending);
            match app.client.ai().chat(&request).await {
                Ok(reply) => reply.text().unwrap_or(CHAT_FALLBACK).to_string(),
                Err(e) => {
                    tracing::warn!("Chat request failed: {}", e);
                    CHAT_FALLBACK.to_string()
                }
            }
        } else {
            CHAT_FALLBACK.to_string()
        };
        self.messages.push(ChatMessage::new(ChatRole::Assistant, content));
        Ok(ChatOutcome::Replied)
    }

    pub fn render(&self) -> String {
        let mut lines = vec!["AI SEO Assistant".to_string(), String::new()];
        for message in &self.messages {
            let time = message.timestamp.with_timezone(&Local).format("%H:%M");
            let who = match message.role {
                ChatRole::User => "You",
                ChatRole::Assistant => "Assistant",
            };
            lines.push(format!("[{}] {}: {}", time, who, message.content));
        }
        if self.pending {
            lines.push("Thinking...".to_string());
        }
        if self.show_quick_actions() {
            lines.push(String::new());
            lines.push("Quick actions:".to_string());
            for (i, action) in QUICK_ACTIONS.iter().enumerate() {
                lines.push(format!("  {}. {}", i + 1, action));
            }
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_with_greeting_and_quick_actions() {
        let mut panel = ChatPanel::new(Some("p1".to_string()));
        assert_eq!(panel.messages.len(), 1);
        assert_eq!(panel.messages[0].content, GREETING);
        assert!(panel.show_quick_actions());

        panel.quick_action(1);
        assert_eq!(panel.input, "Find my top ranking opportunities");
        panel.quick_action(9);
        assert_eq!(panel.input, "Find my top ranking opportunities");

        panel
            .messages
            .push(ChatMessage::new(ChatRole::User, "hello"));
        assert!(!panel.show_quick_actions());
        assert!(!panel.render().contains("Quick actions:"));
    }

    #[test]
    fn test_pending_flag_lowers_on_drop() {
        let mut pending = false;
        {
            let flag = PendingFlag::raise(&mut pending);
            assert!(*flag.0);
        }
        assert!(!pending);
    }
}

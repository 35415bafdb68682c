pub const CHAT_GREETING: &str = "Hello! I'm your AI assistant. How can I help you today?";
pub const CHAT_FALLBACK_REPLY: &str = "Sorry, I encountered an error. Please make sure the backend is running and GROQ_API_KEY is set.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatSender {
    User,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: u64,
    pub text: String,
    pub sender: ChatSender,
    /// Wall-clock `HH:MM`, stamped by the shell.
    pub timestamp: Option<String>,
}

/// A prior exchange forwarded to the backend as conversation history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: &'static str,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatState {
    pub(crate) open: bool,
    pub(crate) waiting: bool,
    pub(crate) messages: Vec<ChatMessage>,
    next_id: u64,
}

impl Default for ChatState {
    fn default() -> Self {
        Self {
            open: false,
            waiting: false,
            messages: vec![ChatMessage {
                id: 1,
                text: CHAT_GREETING.to_string(),
                sender: ChatSender::Ai,
                timestamp: None,
            }],
            next_id: 2,
        }
    }
}

impl ChatState {
    /// History for the next request: everything after the greeting.
    pub(crate) fn history(&self) -> Vec<ChatTurn> {
        self.messages
            .iter()
            .skip(1)
            .map(|message| ChatTurn {
                role: match message.sender {
                    ChatSender::User => "user",
                    ChatSender::Ai => "assistant",
                },
                content: message.text.clone(),
            })
            .collect()
    }

    pub(crate) fn push(&mut self, sender: ChatSender, text: String, timestamp: String) {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id,
            text,
            sender,
            timestamp: Some(timestamp),
        });
    }
}

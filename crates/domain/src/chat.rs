use serde::{Deserialize, Serialize};

/// A message in the model conversation (provider-agnostic).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: text.into(),
        }
    }
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: text.into(),
        }
    }
}

/// One prior turn as supplied by the caller.  Unknown roles map to the
/// user side when the history is rebuilt for the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: String,
    pub content: String,
}

impl Turn {
    /// Role-map a caller turn into the model conversation:
    /// `assistant` → model side, everything else → user side.
    pub fn to_message(&self) -> Message {
        if self.role == "assistant" {
            Message::assistant(&self.content)
        } else {
            Message::user(&self.content)
        }
    }
}

//! UI-agnostic message types
//!
//! Shared by the agent cards and whatever front-end renders them. Nothing in
//! here depends on a specific UI framework.

use serde::{Deserialize, Serialize};

/// A single entry in an agent card's conversation log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
}

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Agent,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    pub fn agent(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Agent,
            text: text.into(),
        }
    }

    pub fn is_from_user(&self) -> bool {
        self.sender == Sender::User
    }
}

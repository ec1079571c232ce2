use std::sync::Arc;
use std::time::Duration;

use crate::home::{DemoEvent, MountId};
use crate::scheduler::{Scheduler, TaskHandle};
use crate::state::Message;

/// Display labels for the agent slots, looked up cyclically by id
pub const AGENT_NAMES: [&str; 20] = [
    "GPT-4 Turbo",
    "Gemini Pro",
    "Claude 3 Opus",
    "Llama 3",
    "Mistral Large",
    "GPT-3.5",
    "Gemini Nano",
    "Claude 3 Sonnet",
    "Llama 2",
    "Mistral Small",
    "GPT-4o",
    "Gemini Ultra",
    "Claude 2",
    "Llama Chat",
    "Mistral Medium",
    "GPT-3",
    "Gemini Flash",
    "Claude Instant",
    "Llama Code",
    "Mistral Tiny",
];

pub const DEFAULT_AGENT_COUNT: usize = 20;
pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(700);

/// Display name for an agent slot. Ids past the end of the list wrap around,
/// so names are cosmetic and not unique.
pub fn agent_name(id: usize) -> &'static str {
    AGENT_NAMES[id % AGENT_NAMES.len()]
}

/// The message every card is seeded with
pub fn greeting(id: usize) -> String {
    format!("Hello! I am AI Agent #{}. How can I help you today?", id + 1)
}

/// Produces an agent's reply to a user message.
pub trait Responder: Send + Sync {
    fn reply(&self, agent_id: usize, text: &str) -> String;
}

/// Acknowledges the user by quoting their message back
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoResponder;

impl Responder for EchoResponder {
    fn reply(&self, agent_id: usize, text: &str) -> String {
        format!("Agent #{} says: You said: \"{}\"", agent_id + 1, text)
    }
}

/// One simulated chat panel: a conversation log plus the text being typed.
pub struct AgentCard {
    id: usize,
    mount: MountId,
    messages: Vec<Message>,
    pub input: String,
    reply_delay: Duration,
    responder: Arc<dyn Responder>,
    pending: Vec<TaskHandle>,
}

impl AgentCard {
    pub fn new(
        id: usize,
        mount: MountId,
        reply_delay: Duration,
        responder: Arc<dyn Responder>,
    ) -> Self {
        Self {
            id,
            mount,
            messages: vec![Message::agent(greeting(id))],
            input: String::new(),
            reply_delay,
            responder,
            pending: Vec::new(),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &'static str {
        agent_name(self.id)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Send the current input. Returns false (and leaves the input alone)
    /// when there is nothing but whitespace to send.
    pub fn submit(&mut self, scheduler: &Scheduler<DemoEvent>) -> bool {
        if self.input.trim().is_empty() {
            return false;
        }

        let text = std::mem::take(&mut self.input);
        let reply = Message::agent(self.responder.reply(self.id, &text));
        self.messages.push(Message::user(text));

        // Forget deliveries that already happened so the list stays small
        self.pending.retain(|task| !task.is_finished());
        self.pending.push(scheduler.schedule(
            self.reply_delay,
            DemoEvent::AgentReply {
                mount: self.mount,
                card: self.id,
                message: reply,
            },
        ));

        tracing::debug!(
            agent = self.id,
            delay_ms = self.reply_delay.as_millis() as u64,
            "scheduled reply"
        );
        true
    }

    /// Append a reply delivered by the scheduler
    pub fn deliver(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.pending.iter().any(|task| !task.is_finished())
    }

    pub fn pending_replies(&self) -> usize {
        self.pending.iter().filter(|task| !task.is_finished()).count()
    }
}

impl Drop for AgentCard {
    fn drop(&mut self) {
        for task in &self.pending {
            task.cancel();
        }
    }
}

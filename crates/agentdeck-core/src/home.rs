//! Tab composition
//!
//! [`Home`] owns the active tab and whatever that tab has mounted. Only one
//! tab's content exists at a time, so switching tabs throws the old content
//! away (cancelling its timers) and mounts a fresh copy of the new one.

use std::sync::Arc;

use crate::agents::{AgentCard, EchoResponder, Responder};
use crate::config::Settings;
use crate::search::{PlaceholderSearch, SearchProvider, SearchTab};
use crate::state::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Agents,
    Google,
}

impl Tab {
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Agents => "AI Agents",
            Tab::Google => "Google Search",
        }
    }

    pub fn all() -> [Tab; 2] {
        [Tab::Agents, Tab::Google]
    }

    pub fn other(&self) -> Tab {
        match self {
            Tab::Agents => Tab::Google,
            Tab::Google => Tab::Agents,
        }
    }
}

/// Generation number of a tab's mounted content. Events carry the id of the
/// mount that scheduled them so late deliveries can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MountId(u64);

impl MountId {
    fn next(self) -> Self {
        MountId(self.0 + 1)
    }
}

/// Work delivered back to the event loop by the scheduler
#[derive(Debug, Clone, PartialEq)]
pub enum DemoEvent {
    AgentReply {
        mount: MountId,
        card: usize,
        message: Message,
    },
    SearchComplete {
        mount: MountId,
        seq: u64,
        query: String,
    },
}

impl DemoEvent {
    pub fn mount(&self) -> MountId {
        match self {
            DemoEvent::AgentReply { mount, .. } | DemoEvent::SearchComplete { mount, .. } => *mount,
        }
    }
}

enum Content {
    Agents(Vec<AgentCard>),
    Google(SearchTab),
}

pub struct Home {
    settings: Settings,
    responder: Arc<dyn Responder>,
    provider: Arc<dyn SearchProvider>,
    mount: MountId,
    content: Content,
}

impl Home {
    pub fn new(settings: Settings) -> Self {
        Self::with_backends(settings, Arc::new(EchoResponder), Arc::new(PlaceholderSearch))
    }

    pub fn with_backends(
        settings: Settings,
        responder: Arc<dyn Responder>,
        provider: Arc<dyn SearchProvider>,
    ) -> Self {
        let mount = MountId::default();
        let content = Self::build(&settings, &responder, &provider, mount, Tab::Agents);
        Self {
            settings,
            responder,
            provider,
            mount,
            content,
        }
    }

    fn build(
        settings: &Settings,
        responder: &Arc<dyn Responder>,
        provider: &Arc<dyn SearchProvider>,
        mount: MountId,
        tab: Tab,
    ) -> Content {
        match tab {
            Tab::Agents => Content::Agents(
                (0..settings.agent_count)
                    .map(|id| AgentCard::new(id, mount, settings.reply_delay, responder.clone()))
                    .collect(),
            ),
            Tab::Google => Content::Google(SearchTab::new(
                mount,
                settings.search_delay,
                provider.clone(),
                settings.discard_superseded_searches,
            )),
        }
    }

    pub fn tab(&self) -> Tab {
        match self.content {
            Content::Agents(_) => Tab::Agents,
            Content::Google(_) => Tab::Google,
        }
    }

    pub fn mount_id(&self) -> MountId {
        self.mount
    }

    /// Switch to `tab`, remounting its content from scratch. Returns false if
    /// it was already active.
    pub fn select_tab(&mut self, tab: Tab) -> bool {
        if tab == self.tab() {
            return false;
        }

        self.mount = self.mount.next();
        // Assigning drops the old content, which cancels its pending tasks
        self.content =
            Self::build(&self.settings, &self.responder, &self.provider, self.mount, tab);
        tracing::info!(tab = tab.title(), "switched tab");
        true
    }

    pub fn toggle_tab(&mut self) {
        self.select_tab(self.tab().other());
    }

    /// Mounted agent cards, empty while the search tab is active
    pub fn agents(&self) -> &[AgentCard] {
        match &self.content {
            Content::Agents(cards) => cards.as_slice(),
            Content::Google(_) => &[],
        }
    }

    pub fn agent_mut(&mut self, index: usize) -> Option<&mut AgentCard> {
        match &mut self.content {
            Content::Agents(cards) => cards.get_mut(index),
            Content::Google(_) => None,
        }
    }

    pub fn search(&self) -> Option<&SearchTab> {
        match &self.content {
            Content::Google(tab) => Some(tab),
            Content::Agents(_) => None,
        }
    }

    pub fn search_mut(&mut self) -> Option<&mut SearchTab> {
        match &mut self.content {
            Content::Google(tab) => Some(tab),
            Content::Agents(_) => None,
        }
    }

    /// Route a delivered event to the mounted content. Returns false when the
    /// event was dropped because whatever scheduled it is gone.
    pub fn handle_event(&mut self, event: DemoEvent) -> bool {
        if event.mount() != self.mount {
            tracing::debug!(?event, "discarding event from unmounted content");
            return false;
        }

        match (event, &mut self.content) {
            (DemoEvent::AgentReply { card, message, .. }, Content::Agents(cards)) => {
                match cards.get_mut(card) {
                    Some(target) => {
                        target.deliver(message);
                        true
                    }
                    None => false,
                }
            }
            (DemoEvent::SearchComplete { seq, query, .. }, Content::Google(tab)) => {
                tab.complete(seq, &query)
            }
            _ => false,
        }
    }
}

pub mod agents;
pub mod config;
pub mod home;
pub mod scheduler;
pub mod search;
pub mod state;

// Re-export main types for convenience
pub use agents::{agent_name, AgentCard, EchoResponder, Responder, AGENT_NAMES};
pub use config::{Config, Settings};
pub use home::{DemoEvent, Home, MountId, Tab};
pub use scheduler::{Scheduler, TaskHandle};
pub use search::{google_search_link, PlaceholderSearch, SearchProvider, SearchResult, SearchTab};
pub use state::{Message, Sender};

/// Error types for agentdeck-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("Search failed: {0}")]
    Search(String),

    #[error("Could not determine config directory")]
    NoConfigDir,
}

/// Result type for agentdeck-core operations.
pub type Result<T> = std::result::Result<T, Error>;

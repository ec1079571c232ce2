use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::home::{DemoEvent, MountId};
use crate::scheduler::{Scheduler, TaskHandle};
use crate::Result;

pub const DEFAULT_SEARCH_DELAY: Duration = Duration::from_millis(1000);

/// Shown in place of results when the provider fails
pub const SEARCH_FAILED: &str = "Failed to fetch results.";

const PLACEHOLDER_SNIPPET: &str =
    "This is a placeholder result. Integrate Google Custom Search API for real results.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

/// Build the Google search URL for a query. Only displayed, never fetched.
pub fn google_search_link(query: &str) -> String {
    format!("https://www.google.com/search?q={}", urlencoding::encode(query))
}

/// Answers a search query.
pub trait SearchProvider: Send + Sync {
    fn search(&self, query: &str) -> Result<Vec<SearchResult>>;
}

/// Fabricates a single result pointing at Google. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderSearch;

impl SearchProvider for PlaceholderSearch {
    fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        Ok(vec![SearchResult {
            title: format!("Result for \"{}\"", query),
            link: google_search_link(query),
            snippet: PLACEHOLDER_SNIPPET.to_string(),
        }])
    }
}

/// The mock search tab: a query box, its results, and loading/error flags.
pub struct SearchTab {
    mount: MountId,
    pub query: String,
    results: Vec<SearchResult>,
    loading: bool,
    error: Option<String>,
    search_delay: Duration,
    provider: Arc<dyn SearchProvider>,
    // When set, only the newest request may write results
    discard_superseded: bool,
    seq: u64,
    pending: Vec<TaskHandle>,
}

impl SearchTab {
    pub fn new(
        mount: MountId,
        search_delay: Duration,
        provider: Arc<dyn SearchProvider>,
        discard_superseded: bool,
    ) -> Self {
        Self {
            mount,
            query: String::new(),
            results: Vec::new(),
            loading: false,
            error: None,
            search_delay,
            provider,
            discard_superseded,
            seq: 0,
            pending: Vec::new(),
        }
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Sequence number of the most recent request
    pub fn latest_seq(&self) -> u64 {
        self.seq
    }

    /// Start a search for the current query. Earlier searches still in
    /// flight are not cancelled. Returns false for a blank query.
    pub fn submit(&mut self, scheduler: &Scheduler<DemoEvent>) -> bool {
        if self.query.trim().is_empty() {
            return false;
        }

        self.loading = true;
        self.error = None;
        self.results.clear();
        self.seq += 1;

        self.pending.retain(|task| !task.is_finished());
        self.pending.push(scheduler.schedule(
            self.search_delay,
            DemoEvent::SearchComplete {
                mount: self.mount,
                seq: self.seq,
                query: self.query.clone(),
            },
        ));

        tracing::debug!(seq = self.seq, query = %self.query, "scheduled search");
        true
    }

    /// Apply a delivered search. Returns false if it was discarded as
    /// superseded.
    pub fn complete(&mut self, seq: u64, query: &str) -> bool {
        if self.discard_superseded && seq != self.seq {
            tracing::debug!(seq, latest = self.seq, "discarding superseded search");
            return false;
        }

        match self.provider.search(query) {
            Ok(results) => {
                self.results = results;
            }
            Err(e) => {
                tracing::warn!(error = %e, query, "search provider failed");
                self.error = Some(SEARCH_FAILED.to_string());
            }
        }
        self.loading = false;
        true
    }

    pub fn pending_searches(&self) -> usize {
        self.pending.iter().filter(|task| !task.is_finished()).count()
    }
}

impl Drop for SearchTab {
    fn drop(&mut self) {
        for task in &self.pending {
            task.cancel();
        }
    }
}

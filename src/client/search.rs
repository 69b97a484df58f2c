//! Free-text transaction search and the input debouncer.

use crate::models::TransactionDetail;
use std::{future::Future, time::Duration};
use tokio::task::JoinHandle;
use tracing::trace;

/// Quiet period after the last keystroke before a search runs.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// A normalised (trimmed, lowercase) search string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Normalises raw input from the search bar.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    /// True when there is nothing to filter by.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The normalised text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substring match against id, product name, quantity and unit price.
    #[must_use]
    pub fn matches(&self, row: &TransactionDetail) -> bool {
        if self.is_empty() {
            return true;
        }
        let haystack = format!(
            "{} {} {} {}",
            row.id,
            row.product_name.as_deref().unwrap_or_default().to_lowercase(),
            row.quantity,
            row.product_price
                .filter(|p| *p != 0.0)
                .map(|p| p.to_string())
                .unwrap_or_default(),
        );
        haystack.contains(&self.0)
    }
}

/// Keeps the rows matching `query`, in their original order.
#[must_use]
pub fn filter_transactions(rows: &[TransactionDetail], query: &SearchQuery) -> Vec<TransactionDetail> {
    rows.iter().filter(|row| query.matches(row)).cloned().collect()
}

/// Runs an action once input has been quiet for `delay`.
///
/// Scheduling again before the delay elapses replaces the pending action. An
/// action that has already started runs to completion.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}

impl Debouncer {
    /// A debouncer with the given quiet period.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Schedules `action`, dropping whichever action was still waiting.
    pub fn schedule<F>(&mut self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Detached so a later keystroke cannot abort a fetch in flight.
            tokio::spawn(action);
        }));
    }

    /// Drops the waiting action, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            if !handle.is_finished() {
                trace!("Debounced action superseded");
            }
            handle.abort();
        }
    }

    /// True while an action is waiting for the quiet period to end.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

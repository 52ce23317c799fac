//! Concurrent history fetching and snapshot state for the current query.

use futures::future::join_all;
use tracing::debug;

use crate::analyzers::types::{QueryData, SittingBreakdown};
use crate::services::course_api::{ApiError, CourseApi, CourseHistory};

/// Fetches every course's history concurrently and joins the batch.
///
/// All requests are issued up front; the result preserves the input order
/// regardless of completion order. Any failed fetch (an unknown code, a
/// transport error) fails the whole batch and the sibling results are
/// discarded; there are no partial aggregates.
pub async fn fetch_histories<A: CourseApi + ?Sized>(
    api: &A,
    codes: &[String],
) -> Result<Vec<CourseHistory>, ApiError> {
    debug!(count = codes.len(), "Issuing history fetches");
    let results = join_all(codes.iter().map(|code| api.history(code))).await;
    results.into_iter().collect()
}

/// View lifecycle of the current query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Idle,
    Loaded(QueryData),
    /// A course in the batch failed to load; the whole batch was discarded.
    Failed,
}

/// Snapshot state for the currently displayed query.
///
/// Each aggregate fetch takes a generation ticket when issued. A completion
/// carrying a stale ticket is discarded, so a slow superseded fetch can never
/// overwrite a newer query's view. Accepted outcomes replace the whole view
/// atomically and clear the sitting selection, keeping stale detail-panel
/// state from leaking across queries.
#[derive(Debug, Default)]
pub struct QueryState {
    generation: u64,
    view: ViewState,
    selected: Option<SittingBreakdown>,
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new query, superseding any still in flight.
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Applies a completed aggregate fetch.
    ///
    /// Returns `false` when the ticket is stale and the outcome was dropped.
    pub fn apply(&mut self, ticket: u64, outcome: Result<QueryData, ApiError>) -> bool {
        if ticket != self.generation {
            debug!(ticket, current = self.generation, "Dropping stale query result");
            return false;
        }
        self.selected = None;
        self.view = match outcome {
            Ok(data) => ViewState::Loaded(data),
            Err(_) => ViewState::Failed,
        };
        true
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Pins one sitting's breakdown into the detail panel.
    pub fn select(&mut self, breakdown: SittingBreakdown) {
        self.selected = Some(breakdown);
    }

    pub fn selected(&self) -> Option<&SittingBreakdown> {
        self.selected.as_ref()
    }
}

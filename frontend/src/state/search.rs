//! Search store: paginated results scoped to one search term.
//!
//! Results for different terms never coexist. A page for a new term discards
//! the previous term's results and pagination before merging.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use pagination::PageCursor;

use super::event::{Event, SearchEvent};
use super::reducer::{Reducer, update};
use crate::domain::{Question, QuestionId, SyncError};

/// Cached search results and request flags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    /// A search page fetch is in flight.
    pub is_fetching: bool,
    /// Last failure, if any.
    pub error: Option<SyncError>,
    /// Term the cached results belong to.
    pub search_term: Option<String>,
    /// Pagination progress for the current term.
    pub cursor: PageCursor,
    /// Server-reported total number of matches.
    pub no_of_questions: u64,
    /// When the last page arrived.
    pub last_updated: Option<DateTime<Utc>>,
    /// Matching questions by id.
    pub entities: IndexMap<QuestionId, Question>,
}

impl SearchState {
    /// Number of full result pages fetched for the current term.
    pub fn page_count(&self) -> u32 {
        self.cursor.full_pages()
    }

    /// Whether `term` differs from the term of the cached results.
    pub fn is_new_term(&self, term: &str) -> bool {
        self.search_term.as_deref().is_some_and(|current| current != term)
    }
}

impl Reducer for SearchState {
    fn reduce(state: &Arc<Self>, event: &Event) -> Arc<Self> {
        let Event::Search(event) = event else {
            return Arc::clone(state);
        };
        match event {
            SearchEvent::Requested => update(state, |s| s.is_fetching = true),
            SearchEvent::Received { page, received_at } => update(state, |s| {
                if s.is_new_term(&page.search_term) {
                    s.entities.clear();
                    s.cursor = PageCursor::new();
                }
                for question in &page.questions {
                    s.entities.insert(question.id(), question.clone());
                }
                s.cursor = s.cursor.advance(page.next_path.clone(), page.questions.len());
                s.no_of_questions = page.no_of_questions;
                s.search_term = Some(page.search_term.clone());
                s.is_fetching = false;
                s.last_updated = Some(*received_at);
            }),
            SearchEvent::Failed { error } => update(state, |s| {
                s.is_fetching = false;
                s.error = Some(error.clone());
            }),
        }
    }
}

//! Answers store.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};

use super::event::{AnswersEvent, Event};
use super::reducer::{Reducer, update};
use crate::domain::{Answer, AnswerId, SyncError};

/// Cached answers and request flags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnswersState {
    /// A fetch or delete request is in flight.
    pub is_fetching: bool,
    /// A post request is in flight.
    pub is_posting: bool,
    /// Last failure, if any.
    pub error: Option<SyncError>,
    /// When the last fetch succeeded.
    pub last_updated: Option<DateTime<Utc>>,
    /// Cached answers by id, newest posts first.
    pub entities: IndexMap<AnswerId, Answer>,
    /// Answers with a fetch in flight.
    pub in_flight: IndexSet<AnswerId>,
}

impl AnswersState {
    /// Cached answer, if present.
    pub fn get(&self, id: AnswerId) -> Option<&Answer> {
        self.entities.get(&id)
    }

    /// Whether a fetch for `id` has been issued and not yet settled.
    pub fn is_in_flight(&self, id: AnswerId) -> bool {
        self.in_flight.contains(&id)
    }
}

impl Reducer for AnswersState {
    fn reduce(state: &Arc<Self>, event: &Event) -> Arc<Self> {
        let Event::Answers(event) = event else {
            return Arc::clone(state);
        };
        match event {
            AnswersEvent::FetchRequested { id } => update(state, |s| {
                s.in_flight.insert(*id);
                s.is_fetching = true;
            }),
            AnswersEvent::DeleteRequested => update(state, |s| s.is_fetching = true),
            AnswersEvent::PostRequested => update(state, |s| s.is_posting = true),
            AnswersEvent::Fetched {
                id,
                answer,
                received_at,
            } => update(state, |s| {
                s.in_flight.shift_remove(id);
                s.entities.insert(answer.id, answer.clone());
                s.is_fetching = false;
                s.last_updated = Some(*received_at);
            }),
            AnswersEvent::Posted { answer } => update(state, |s| {
                s.entities.shift_insert(0, answer.id, answer.clone());
                s.is_posting = false;
            }),
            AnswersEvent::Deleted { id, .. } => update(state, |s| {
                s.entities.shift_remove(id);
                s.is_fetching = false;
            }),
            AnswersEvent::FetchFailed { id, error } => update(state, |s| {
                s.in_flight.shift_remove(id);
                s.is_fetching = false;
                s.error = Some(error.clone());
            }),
            AnswersEvent::DeleteFailed { error } => update(state, |s| {
                s.is_fetching = false;
                s.error = Some(error.clone());
            }),
            AnswersEvent::PostFailed { error } => update(state, |s| {
                s.is_posting = false;
                s.error = Some(error.clone());
            }),
        }
    }
}

//! Questions store: the paginated question feed plus single-question views.
//!
//! Besides its own events the store reduces answer post and delete successes,
//! because each question carries denormalised answer counters.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};
use pagination::PageCursor;

use super::event::{AnswersEvent, Event, QuestionsEvent};
use super::reducer::{Reducer, update};
use crate::domain::{Question, QuestionId, SyncError};

/// Cached questions and request flags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionsState {
    /// A list, single, or delete request is in flight.
    pub is_fetching: bool,
    /// A post request is in flight.
    pub is_posting: bool,
    /// A best-answer patch is in flight.
    pub is_updating: bool,
    /// Last failure, if any.
    pub error: Option<SyncError>,
    /// When the last list or single fetch succeeded.
    pub last_updated: Option<DateTime<Utc>>,
    /// Feed pagination progress.
    pub cursor: PageCursor,
    /// Server-reported total number of questions.
    pub no_of_questions: u64,
    /// Cached questions by id.
    pub entities: IndexMap<QuestionId, Question>,
    /// Questions with a single fetch in flight.
    pub in_flight: IndexSet<QuestionId>,
}

impl QuestionsState {
    /// Number of full feed pages fetched so far.
    pub fn fetched_page_count(&self) -> u32 {
        self.cursor.full_pages()
    }

    /// Cached question, if present.
    pub fn get(&self, id: QuestionId) -> Option<&Question> {
        self.entities.get(&id)
    }

    /// Whether a single fetch for `id` has been issued and not yet settled.
    pub fn is_in_flight(&self, id: QuestionId) -> bool {
        self.in_flight.contains(&id)
    }
}

impl Reducer for QuestionsState {
    fn reduce(state: &Arc<Self>, event: &Event) -> Arc<Self> {
        match event {
            Event::Questions(event) => reduce_own(state, event),
            Event::Answers(event) => reduce_answer(state, event),
            Event::Users(_) | Event::Search(_) | Event::Auth(_) => Arc::clone(state),
        }
    }
}

fn reduce_own(state: &Arc<QuestionsState>, event: &QuestionsEvent) -> Arc<QuestionsState> {
    match event {
        QuestionsEvent::ListRequested | QuestionsEvent::DeleteRequested => {
            update(state, |s| s.is_fetching = true)
        }
        QuestionsEvent::FetchRequested { id } => update(state, |s| {
            s.in_flight.insert(*id);
            s.is_fetching = true;
        }),
        QuestionsEvent::PostRequested => update(state, |s| s.is_posting = true),
        QuestionsEvent::BestAnswerRequested => update(state, |s| s.is_updating = true),
        QuestionsEvent::ListReceived { page, received_at } => update(state, |s| {
            for question in &page.questions {
                s.entities.insert(question.id(), question.clone());
            }
            s.cursor = s.cursor.advance(page.next_path.clone(), page.questions.len());
            s.no_of_questions = page.no_of_questions;
            s.is_fetching = false;
            s.last_updated = Some(*received_at);
        }),
        QuestionsEvent::Fetched {
            id,
            question,
            received_at,
        } => update(state, |s| {
            s.in_flight.shift_remove(id);
            s.entities.insert(question.id(), question.clone());
            s.is_fetching = false;
            s.last_updated = Some(*received_at);
        }),
        QuestionsEvent::Posted { question } => update(state, |s| {
            let previous = s.entities.shift_insert(0, question.id(), question.clone());
            if previous.is_none() {
                s.no_of_questions = s.no_of_questions.saturating_add(1);
            }
            s.is_posting = false;
        }),
        QuestionsEvent::Deleted { id } => update(state, |s| {
            if s.entities.shift_remove(id).is_some() {
                s.no_of_questions = s.no_of_questions.saturating_sub(1);
            }
            s.is_fetching = false;
        }),
        QuestionsEvent::BestAnswerPatched { question } => update(state, |s| {
            s.entities.insert(question.id(), question.clone());
            s.is_updating = false;
        }),
        QuestionsEvent::FetchFailed { id, error } => update(state, |s| {
            s.in_flight.shift_remove(id);
            s.is_fetching = false;
            s.error = Some(error.clone());
        }),
        QuestionsEvent::ListFailed { error } | QuestionsEvent::DeleteFailed { error } => {
            update(state, |s| {
                s.is_fetching = false;
                s.error = Some(error.clone());
            })
        }
        QuestionsEvent::PostFailed { error } => update(state, |s| {
            s.is_posting = false;
            s.error = Some(error.clone());
        }),
        QuestionsEvent::BestAnswerFailed { error } => update(state, |s| {
            s.is_updating = false;
            s.error = Some(error.clone());
        }),
    }
}

fn reduce_answer(state: &Arc<QuestionsState>, event: &AnswersEvent) -> Arc<QuestionsState> {
    let replacement = match event {
        AnswersEvent::Posted { answer } => state
            .get(answer.question_id)
            .map(|question| question.with_answer_added(answer.id)),
        AnswersEvent::Deleted { id, question_id } => state
            .get(*question_id)
            .map(|question| question.with_answer_removed(*id)),
        _ => None,
    };
    // Questions outside the cache are left for the next fetch to bring in.
    match replacement {
        Some(question) => update(state, |s| {
            s.entities.insert(question.id(), question);
        }),
        None => Arc::clone(state),
    }
}

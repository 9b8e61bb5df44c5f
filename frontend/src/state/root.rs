//! Root state tree composing every entity store.

use std::sync::Arc;

use super::answers::AnswersState;
use super::auth::AuthState;
use super::event::Event;
use super::questions::QuestionsState;
use super::reducer::Reducer;
use super::search::SearchState;
use super::users::UsersState;

/// Addressable state tree, one slice per entity store.
///
/// Slices are shared: a reduction that leaves a slice untouched keeps the same
/// `Arc`, so observers can compare slices by pointer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RootState {
    /// Question feed and single-question views.
    pub questions: Arc<QuestionsState>,
    /// Answers.
    pub answers: Arc<AnswersState>,
    /// User profiles.
    pub users: Arc<UsersState>,
    /// Search results.
    pub search: Arc<SearchState>,
    /// Identity-provider session.
    pub auth: Arc<AuthState>,
}

impl RootState {
    /// Whether every slice of `self` is the same allocation as in `other`.
    pub fn shares_slices(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.questions, &other.questions)
            && Arc::ptr_eq(&self.answers, &other.answers)
            && Arc::ptr_eq(&self.users, &other.users)
            && Arc::ptr_eq(&self.search, &other.search)
            && Arc::ptr_eq(&self.auth, &other.auth)
    }
}

impl Reducer for RootState {
    fn reduce(state: &Arc<Self>, event: &Event) -> Arc<Self> {
        let next = Self {
            questions: QuestionsState::reduce(&state.questions, event),
            answers: AnswersState::reduce(&state.answers, event),
            users: UsersState::reduce(&state.users, event),
            search: SearchState::reduce(&state.search, event),
            auth: AuthState::reduce(&state.auth, event),
        };
        if next.shares_slices(state) {
            Arc::clone(state)
        } else {
            Arc::new(next)
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for slice sharing across reductions.
    use super::*;
    use crate::domain::{AnswerId, QuestionId};
    use crate::state::event::{AnswersEvent, SearchEvent};

    #[test]
    fn untouched_slices_are_shared() {
        let state = Arc::new(RootState::default());
        let next = RootState::reduce(&state, &SearchEvent::Requested.into());

        assert!(!Arc::ptr_eq(&state, &next));
        assert!(next.search.is_fetching);
        assert!(Arc::ptr_eq(&state.questions, &next.questions));
        assert!(Arc::ptr_eq(&state.answers, &next.answers));
        assert!(Arc::ptr_eq(&state.users, &next.users));
        assert!(Arc::ptr_eq(&state.auth, &next.auth));
    }

    #[test]
    fn answer_deletion_touches_answers_only_when_parent_is_uncached() {
        let state = Arc::new(RootState::default());
        let next = RootState::reduce(
            &state,
            &AnswersEvent::Deleted {
                id: AnswerId::new(3),
                question_id: QuestionId::new(9),
            }
            .into(),
        );
        assert!(Arc::ptr_eq(&state.questions, &next.questions));
        assert!(!Arc::ptr_eq(&state.answers, &next.answers));
    }
}

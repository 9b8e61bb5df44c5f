//! Answer creators.

use serde_json::json;
use tracing::trace;

use crate::domain::ports::HttpMethod;
use crate::domain::{AccessToken, AnswerId, QuestionId};
use crate::state::{API_PREFIX, CallDescriptor, Dispatched, Operation, Thunk, settled};

fn answer_path(id: AnswerId) -> String {
    format!("{API_PREFIX}/answers/{id}")
}

/// Fetch one answer.
pub fn fetch_answer(id: AnswerId) -> CallDescriptor {
    CallDescriptor::new(Operation::FetchAnswer { id }, HttpMethod::Get, answer_path(id))
}

/// Fetch one answer unless it is cached, already being fetched, or `id` is
/// blank.
///
/// Await the dispatched thunk and inspect the [`Dispatched`] outcome to react
/// to success or failure of the fetch.
pub fn load_answer(id: AnswerId) -> Thunk {
    Thunk::new(move |store| {
        let state = store.state();
        if id.is_blank()
            || state.answers.entities.contains_key(&id)
            || state.answers.is_in_flight(id)
        {
            trace!(%id, "answer cached, in flight, or blank; skipping fetch");
            return settled(Dispatched::Skipped);
        }
        store.dispatch(fetch_answer(id))
    })
}

/// Answer `question`.
pub fn post_answer(question: QuestionId, content: &str, token: &AccessToken) -> CallDescriptor {
    CallDescriptor::new(
        Operation::PostAnswer,
        HttpMethod::Post,
        format!("{API_PREFIX}/questions/{question}/answers"),
    )
    .with_json_body(json!({ "content": content }))
    .with_token(Some(token))
}

/// Delete an answer.
pub fn delete_answer(id: AnswerId, token: &AccessToken) -> CallDescriptor {
    CallDescriptor::new(Operation::DeleteAnswer, HttpMethod::Delete, answer_path(id))
        .with_token(Some(token))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for answer creators and their cross-store effects.
    use std::sync::Arc;

    use super::*;
    use crate::domain::ports::FixtureApiTransport;
    use crate::domain::{Answer, Question, UserId};
    use crate::state::creators::test_support::store_with;
    use crate::state::{AnswersState, QuestionsState, RootState};

    fn seeded() -> RootState {
        let question = Question::new(QuestionId::new(1), UserId::new("u"), "q", "t")
            .try_with_answers(vec![AnswerId::new(10), AnswerId::new(11)], Some(AnswerId::new(10)))
            .expect("best answer is listed");
        let mut questions = QuestionsState::default();
        questions.entities.insert(question.id(), question);
        let mut answers = AnswersState::default();
        for id in [10, 11] {
            answers.entities.insert(
                AnswerId::new(id),
                Answer {
                    id: AnswerId::new(id),
                    user_id: UserId::new("u"),
                    question_id: QuestionId::new(1),
                    content: "a".to_owned(),
                    created_at: "t".to_owned(),
                },
            );
        }
        RootState {
            questions: Arc::new(questions),
            answers: Arc::new(answers),
            ..RootState::default()
        }
    }

    #[tokio::test]
    async fn cached_answer_is_not_refetched() {
        let transport = Arc::new(FixtureApiTransport::default());
        let store = store_with(&transport, seeded());

        let outcome = store.dispatch(load_answer(AnswerId::new(10))).await;

        assert_eq!(outcome, Dispatched::Skipped);
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn failed_load_reports_the_error() {
        let transport = Arc::new(FixtureApiTransport::default());
        let store = store_with(&transport, seeded());

        let outcome = store.dispatch(load_answer(AnswerId::new(77))).await;

        assert_eq!(outcome.error().and_then(|err| err.status()), Some(404));
        assert!(store.state().answers.error.is_some());
    }

    #[tokio::test]
    async fn deleting_the_best_answer_updates_its_question() {
        let transport = Arc::new(FixtureApiTransport::default());
        transport.respond_json(
            HttpMethod::Delete,
            "/api/answers/10",
            200,
            json!({ "success": true, "del_id": 10, "question_id": 1 }),
        );
        let store = store_with(&transport, seeded());

        let outcome = store
            .dispatch(delete_answer(AnswerId::new(10), &AccessToken::new("t")))
            .await;

        assert_eq!(outcome, Dispatched::Succeeded);
        let state = store.state();
        let question = state
            .questions
            .get(QuestionId::new(1))
            .expect("question stays cached");
        assert_eq!(question.best_answer(), None);
        assert_eq!(question.answers(), &[AnswerId::new(11)]);
        assert!(state.answers.get(AnswerId::new(10)).is_none());
    }

    #[tokio::test]
    async fn failed_delete_keeps_the_answer() {
        let transport = Arc::new(FixtureApiTransport::default());
        transport.respond_json(
            HttpMethod::Delete,
            "/api/answers/11",
            403,
            json!({ "success": false, "error": 403, "message": "Permission not found." }),
        );
        let store = store_with(&transport, seeded());

        store
            .dispatch(delete_answer(AnswerId::new(11), &AccessToken::new("t")))
            .await;

        let state = store.state();
        assert!(state.answers.get(AnswerId::new(11)).is_some());
        assert!(!state.answers.is_fetching);
        assert_eq!(
            state.answers.error.as_ref().map(|err| err.message()),
            Some("Permission not found.")
        );
    }

    #[tokio::test]
    async fn posted_answer_is_prepended_to_its_question() {
        let transport = Arc::new(FixtureApiTransport::default());
        transport.respond_json(
            HttpMethod::Post,
            "/api/questions/1/answers",
            200,
            json!({ "success": true, "created": {
                "id": 12, "user_id": "u2", "question_id": 1,
                "content": "new", "created_at": "t"
            }}),
        );
        let store = store_with(&transport, seeded());

        store
            .dispatch(post_answer(QuestionId::new(1), "new", &AccessToken::new("t")))
            .await;

        let state = store.state();
        let question = state
            .questions
            .get(QuestionId::new(1))
            .expect("question stays cached");
        assert_eq!(question.answers().first(), Some(&AnswerId::new(12)));
        assert_eq!(question.no_of_answers(), 3);
        assert_eq!(state.answers.entities.keys().next(), Some(&AnswerId::new(12)));
        assert!(!state.answers.is_posting);
        let sent = transport.sent();
        let request = sent.first().expect("request sent");
        assert_eq!(request.body, Some(json!({ "content": "new" })));
        assert_eq!(
            request.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
    }
}

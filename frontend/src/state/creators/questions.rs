//! Question creators.

use serde_json::json;
use tracing::trace;

use crate::domain::ports::HttpMethod;
use crate::domain::{AccessToken, AnswerId, QuestionId};
use crate::state::{API_PREFIX, CallDescriptor, Dispatched, Operation, Thunk, settled};

/// Path of the first feed page.
pub const FIRST_QUESTIONS_PAGE: &str = "/api/questions?page=1";

fn question_path(id: QuestionId) -> String {
    format!("{API_PREFIX}/questions/{id}")
}

/// Fetch the feed page at `path`.
pub fn fetch_questions(path: &str) -> CallDescriptor {
    CallDescriptor::new(Operation::ListQuestions, HttpMethod::Get, path)
}

/// Fetch the next feed page unless the server reported the last one.
pub fn load_questions() -> Thunk {
    Thunk::new(|store| {
        let state = store.state();
        match state.questions.cursor.next_request(FIRST_QUESTIONS_PAGE) {
            Some(path) => store.dispatch(fetch_questions(path)),
            None => {
                trace!("question feed exhausted; skipping fetch");
                settled(Dispatched::Skipped)
            }
        }
    })
}

/// Fetch one question.
pub fn fetch_question(id: QuestionId) -> CallDescriptor {
    CallDescriptor::new(Operation::FetchQuestion { id }, HttpMethod::Get, question_path(id))
}

/// Fetch one question unless it is cached, already being fetched, or `id` is
/// blank.
pub fn load_question(id: QuestionId) -> Thunk {
    Thunk::new(move |store| {
        let state = store.state();
        if id.is_blank()
            || state.questions.entities.contains_key(&id)
            || state.questions.is_in_flight(id)
        {
            trace!(%id, "question cached, in flight, or blank; skipping fetch");
            return settled(Dispatched::Skipped);
        }
        store.dispatch(fetch_question(id))
    })
}

/// Ask a question.
pub fn post_question(content: &str, token: &AccessToken) -> CallDescriptor {
    CallDescriptor::new(
        Operation::PostQuestion,
        HttpMethod::Post,
        format!("{API_PREFIX}/questions"),
    )
    .with_json_body(json!({ "content": content }))
    .with_token(Some(token))
}

/// Delete a question.
pub fn delete_question(id: QuestionId, token: &AccessToken) -> CallDescriptor {
    CallDescriptor::new(Operation::DeleteQuestion, HttpMethod::Delete, question_path(id))
        .with_token(Some(token))
}

/// Mark `answer` as the best answer to `question`.
pub fn patch_best_answer(
    question: QuestionId,
    answer: AnswerId,
    token: &AccessToken,
) -> CallDescriptor {
    CallDescriptor::new(Operation::PatchBestAnswer, HttpMethod::Patch, question_path(question))
        .with_json_body(json!({ "answer": answer }))
        .with_token(Some(token))
}

//! Success envelopes returned by the API, decoded per operation.

use chrono::{DateTime, Utc};
use pagination::CursorPath;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::event::{
    AnswersEvent, Event, QuestionPage, QuestionsEvent, SearchEvent, SearchPage, UsersEvent,
};
use crate::domain::{Answer, AnswerId, Question, QuestionId, SyncError, UserId, UserProfile};

#[derive(Debug, Deserialize)]
struct QuestionListEnvelope {
    questions: Vec<Question>,
    #[serde(default)]
    next_path: Option<CursorPath>,
    #[serde(default)]
    no_of_questions: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    questions: Vec<Question>,
    #[serde(default)]
    next_path: Option<CursorPath>,
    #[serde(default)]
    no_of_questions: Option<u64>,
    search_term: String,
}

#[derive(Debug, Deserialize)]
struct QuestionEnvelope {
    question: Question,
}

#[derive(Debug, Deserialize)]
struct CreatedEnvelope<T> {
    created: T,
}

#[derive(Debug, Deserialize)]
struct PatchedEnvelope {
    patched: Question,
}

#[derive(Debug, Deserialize)]
struct QuestionDeletedEnvelope {
    del_id: QuestionId,
}

#[derive(Debug, Deserialize)]
struct AnswerEnvelope {
    answer: Answer,
}

#[derive(Debug, Deserialize)]
struct AnswerDeletedEnvelope {
    del_id: AnswerId,
    question_id: QuestionId,
}

#[derive(Debug, Deserialize)]
struct UserEnvelope {
    user: UserProfile,
}

fn decode<T: DeserializeOwned>(what: &str, body: Value) -> Result<T, SyncError> {
    serde_json::from_value(body)
        .map_err(|err| SyncError::decode(format!("unexpected {what} payload: {err}")))
}

fn total(reported: Option<u64>, page: &[Question]) -> u64 {
    reported.unwrap_or_else(|| u64::try_from(page.len()).unwrap_or(u64::MAX))
}

pub(super) fn question_list(body: Value, received_at: DateTime<Utc>) -> Result<Event, SyncError> {
    let envelope: QuestionListEnvelope = decode("question list", body)?;
    let no_of_questions = total(envelope.no_of_questions, &envelope.questions);
    Ok(QuestionsEvent::ListReceived {
        page: QuestionPage {
            questions: envelope.questions,
            next_path: envelope.next_path,
            no_of_questions,
        },
        received_at,
    }
    .into())
}

pub(super) fn question(
    id: QuestionId,
    body: Value,
    received_at: DateTime<Utc>,
) -> Result<Event, SyncError> {
    let envelope: QuestionEnvelope = decode("question", body)?;
    Ok(QuestionsEvent::Fetched {
        id,
        question: envelope.question,
        received_at,
    }
    .into())
}

pub(super) fn created_question(body: Value) -> Result<Event, SyncError> {
    let envelope: CreatedEnvelope<Question> = decode("created question", body)?;
    Ok(QuestionsEvent::Posted {
        question: envelope.created,
    }
    .into())
}

pub(super) fn deleted_question(body: Value) -> Result<Event, SyncError> {
    let envelope: QuestionDeletedEnvelope = decode("deleted question", body)?;
    Ok(QuestionsEvent::Deleted {
        id: envelope.del_id,
    }
    .into())
}

pub(super) fn patched_question(body: Value) -> Result<Event, SyncError> {
    let envelope: PatchedEnvelope = decode("patched question", body)?;
    Ok(QuestionsEvent::BestAnswerPatched {
        question: envelope.patched,
    }
    .into())
}

pub(super) fn answer(
    id: AnswerId,
    body: Value,
    received_at: DateTime<Utc>,
) -> Result<Event, SyncError> {
    let envelope: AnswerEnvelope = decode("answer", body)?;
    Ok(AnswersEvent::Fetched {
        id,
        answer: envelope.answer,
        received_at,
    }
    .into())
}

pub(super) fn created_answer(body: Value) -> Result<Event, SyncError> {
    let envelope: CreatedEnvelope<Answer> = decode("created answer", body)?;
    Ok(AnswersEvent::Posted {
        answer: envelope.created,
    }
    .into())
}

pub(super) fn deleted_answer(body: Value) -> Result<Event, SyncError> {
    let envelope: AnswerDeletedEnvelope = decode("deleted answer", body)?;
    Ok(AnswersEvent::Deleted {
        id: envelope.del_id,
        question_id: envelope.question_id,
    }
    .into())
}

pub(super) fn user(
    id: UserId,
    body: Value,
    received_at: DateTime<Utc>,
) -> Result<Event, SyncError> {
    let envelope: UserEnvelope = decode("user", body)?;
    Ok(UsersEvent::Fetched {
        id,
        user: envelope.user,
        received_at,
    }
    .into())
}

pub(super) fn search(body: Value, received_at: DateTime<Utc>) -> Result<Event, SyncError> {
    let envelope: SearchEnvelope = decode("search", body)?;
    let no_of_questions = total(envelope.no_of_questions, &envelope.questions);
    Ok(SearchEvent::Received {
        page: SearchPage {
            questions: envelope.questions,
            next_path: envelope.next_path,
            no_of_questions,
            search_term: envelope.search_term,
        },
        received_at,
    }
    .into())
}

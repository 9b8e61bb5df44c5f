//! Call descriptors: declarative HTTP calls consumed by the gateway.
//!
//! A descriptor names the endpoint, verb, optional body and token, and the
//! [`Operation`] it performs. The operation replaces the request/success/failure
//! event triple: it knows which event to emit at each stage and how to decode
//! the success envelope into a typed event.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::event::{AnswersEvent, Event, QuestionsEvent, SearchEvent, UsersEvent};
use super::payload;
use super::root::RootState;
use crate::domain::ports::{ApiRequest, HttpMethod};
use crate::domain::{AccessToken, AnswerId, QuestionId, SyncError, UserId};

/// Prefix shared by every API path.
pub const API_PREFIX: &str = "/api";

const AUTHORIZATION: &str = "Authorization";
const CONTENT_TYPE: &str = "Content-Type";
const JSON: &str = "application/json";

/// API operations the client performs.
///
/// Single-entity fetches carry the id they fetch so the owning store can
/// track it as in flight.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `GET /questions?page=N`
    ListQuestions,
    /// `GET /questions/{id}`
    FetchQuestion {
        /// Question being fetched.
        id: QuestionId,
    },
    /// `POST /questions`
    PostQuestion,
    /// `DELETE /questions/{id}`
    DeleteQuestion,
    /// `PATCH /questions/{id}`
    PatchBestAnswer,
    /// `GET /answers/{id}`
    FetchAnswer {
        /// Answer being fetched.
        id: AnswerId,
    },
    /// `POST /questions/{id}/answers`
    PostAnswer,
    /// `DELETE /answers/{id}`
    DeleteAnswer,
    /// `GET /users/{id}`
    FetchUser {
        /// Profile being fetched.
        id: UserId,
    },
    /// `POST /search`
    Search,
}

impl Operation {
    /// Stable operation name for logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ListQuestions => "list_questions",
            Self::FetchQuestion { .. } => "fetch_question",
            Self::PostQuestion => "post_question",
            Self::DeleteQuestion => "delete_question",
            Self::PatchBestAnswer => "patch_best_answer",
            Self::FetchAnswer { .. } => "fetch_answer",
            Self::PostAnswer => "post_answer",
            Self::DeleteAnswer => "delete_answer",
            Self::FetchUser { .. } => "fetch_user",
            Self::Search => "search",
        }
    }

    /// Event emitted before the call starts.
    pub fn request_event(&self) -> Event {
        match self {
            Self::ListQuestions => QuestionsEvent::ListRequested.into(),
            Self::FetchQuestion { id } => QuestionsEvent::FetchRequested { id: *id }.into(),
            Self::PostQuestion => QuestionsEvent::PostRequested.into(),
            Self::DeleteQuestion => QuestionsEvent::DeleteRequested.into(),
            Self::PatchBestAnswer => QuestionsEvent::BestAnswerRequested.into(),
            Self::FetchAnswer { id } => AnswersEvent::FetchRequested { id: *id }.into(),
            Self::PostAnswer => AnswersEvent::PostRequested.into(),
            Self::DeleteAnswer => AnswersEvent::DeleteRequested.into(),
            Self::FetchUser { id } => UsersEvent::FetchRequested { id: id.clone() }.into(),
            Self::Search => SearchEvent::Requested.into(),
        }
    }

    /// Event emitted when the call fails.
    pub fn failure_event(&self, error: SyncError) -> Event {
        match self {
            Self::ListQuestions => QuestionsEvent::ListFailed { error }.into(),
            Self::FetchQuestion { id } => QuestionsEvent::FetchFailed { id: *id, error }.into(),
            Self::PostQuestion => QuestionsEvent::PostFailed { error }.into(),
            Self::DeleteQuestion => QuestionsEvent::DeleteFailed { error }.into(),
            Self::PatchBestAnswer => QuestionsEvent::BestAnswerFailed { error }.into(),
            Self::FetchAnswer { id } => AnswersEvent::FetchFailed { id: *id, error }.into(),
            Self::PostAnswer => AnswersEvent::PostFailed { error }.into(),
            Self::DeleteAnswer => AnswersEvent::DeleteFailed { error }.into(),
            Self::FetchUser { id } => UsersEvent::FetchFailed {
                id: id.clone(),
                error,
            }
            .into(),
            Self::Search => SearchEvent::Failed { error }.into(),
        }
    }

    /// Decode a successful response body into the success event.
    ///
    /// # Errors
    ///
    /// Returns an [`crate::domain::ErrorCode::Decode`] error when the body does
    /// not carry the operation's envelope.
    pub fn success_event(&self, body: Value, received_at: DateTime<Utc>) -> Result<Event, SyncError> {
        match self {
            Self::ListQuestions => payload::question_list(body, received_at),
            Self::FetchQuestion { id } => payload::question(*id, body, received_at),
            Self::PostQuestion => payload::created_question(body),
            Self::DeleteQuestion => payload::deleted_question(body),
            Self::PatchBestAnswer => payload::patched_question(body),
            Self::FetchAnswer { id } => payload::answer(*id, body, received_at),
            Self::PostAnswer => payload::created_answer(body),
            Self::DeleteAnswer => payload::deleted_answer(body),
            Self::FetchUser { id } => payload::user(id.clone(), body, received_at),
            Self::Search => payload::search(body, received_at),
        }
    }

    /// Whether the entity this operation fetches is already being fetched.
    ///
    /// Always `false` for operations that do not fetch a single entity.
    pub fn is_in_flight(&self, state: &RootState) -> bool {
        match self {
            Self::FetchQuestion { id } => state.questions.is_in_flight(*id),
            Self::FetchAnswer { id } => state.answers.is_in_flight(*id),
            Self::FetchUser { id } => state.users.is_in_flight(id),
            _ => false,
        }
    }
}

/// Declarative description of one API call.
///
/// # Examples
/// ```
/// use frontend::domain::AccessToken;
/// use frontend::domain::ports::HttpMethod;
/// use frontend::state::{CallDescriptor, Operation};
/// use serde_json::json;
///
/// let call = CallDescriptor::new(Operation::PostQuestion, HttpMethod::Post, "/api/questions")
///     .with_json_body(json!({ "content": "hi" }))
///     .with_token(Some(&AccessToken::new("t")));
/// let request = call.into_request();
/// assert_eq!(request.headers.get("Authorization").map(String::as_str), Some("Bearer t"));
/// assert_eq!(request.headers.get("Content-Type").map(String::as_str), Some("application/json"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CallDescriptor {
    operation: Operation,
    method: HttpMethod,
    endpoint: String,
    body: Option<Value>,
    auth_token: Option<AccessToken>,
    headers: BTreeMap<String, String>,
}

impl CallDescriptor {
    /// Describe a call without body, token, or extra headers.
    pub fn new(operation: Operation, method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self {
            operation,
            method,
            endpoint: endpoint.into(),
            body: None,
            auth_token: None,
            headers: BTreeMap::new(),
        }
    }

    /// Attach a JSON body and declare its content type.
    pub fn with_json_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self.headers
            .entry(CONTENT_TYPE.to_owned())
            .or_insert_with(|| JSON.to_owned());
        self
    }

    /// Attach a bearer token, if one is available.
    pub fn with_token(mut self, token: Option<&AccessToken>) -> Self {
        self.auth_token = token.cloned();
        self
    }

    /// Add a caller-supplied header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Operation performed by the call.
    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    /// HTTP verb.
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// API path, including any query.
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// JSON body, if any.
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Whether the call carries a bearer token.
    pub fn is_authenticated(&self) -> bool {
        self.auth_token.is_some()
    }

    /// Caller-supplied headers.
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Build the transport request.
    ///
    /// The bearer header is merged into the caller's headers; every other
    /// caller-supplied header is kept as is.
    pub fn into_request(self) -> ApiRequest {
        let Self {
            method,
            endpoint,
            body,
            auth_token,
            mut headers,
            ..
        } = self;
        if let Some(token) = auth_token {
            headers.insert(AUTHORIZATION.to_owned(), token.bearer());
        }
        ApiRequest {
            method,
            path: endpoint,
            headers,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for descriptor assembly and success decoding.
    use super::*;
    use crate::domain::ErrorCode;
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0)
            .single()
            .expect("valid fixture timestamp")
    }

    #[test]
    fn token_does_not_overwrite_caller_headers() {
        let request = CallDescriptor::new(Operation::DeleteAnswer, HttpMethod::Delete, "/api/answers/3")
            .with_header("X-Trace", "abc")
            .with_token(Some(&AccessToken::new("secret")))
            .into_request();

        assert_eq!(request.headers.get("X-Trace").map(String::as_str), Some("abc"));
        assert_eq!(
            request.headers.get("Authorization").map(String::as_str),
            Some("Bearer secret")
        );
    }

    #[test]
    fn caller_content_type_survives_json_body() {
        let call = CallDescriptor::new(Operation::Search, HttpMethod::Post, "/api/search")
            .with_header("Content-Type", "application/merge-patch+json")
            .with_json_body(json!({ "search": "x" }));
        assert_eq!(
            call.headers().get("Content-Type").map(String::as_str),
            Some("application/merge-patch+json")
        );
    }

    #[test]
    fn anonymous_call_has_no_authorization_header() {
        let operation = Operation::FetchAnswer {
            id: AnswerId::new(1),
        };
        let request =
            CallDescriptor::new(operation, HttpMethod::Get, "/api/answers/1").into_request();
        assert!(request.headers.is_empty());
    }

    #[test]
    fn deleted_answer_envelope_decodes_parent() {
        let event = Operation::DeleteAnswer
            .success_event(json!({ "success": true, "del_id": 10, "question_id": 1 }), now())
            .expect("decode");
        assert_eq!(
            event,
            Event::Answers(AnswersEvent::Deleted {
                id: AnswerId::new(10),
                question_id: QuestionId::new(1),
            })
        );
    }

    #[rstest]
    #[case::list(Operation::ListQuestions)]
    #[case::fetch(Operation::FetchQuestion { id: QuestionId::new(1) })]
    #[case::post(Operation::PostQuestion)]
    #[case::delete(Operation::DeleteQuestion)]
    #[case::patch(Operation::PatchBestAnswer)]
    #[case::answer(Operation::FetchAnswer { id: AnswerId::new(1) })]
    #[case::post_answer(Operation::PostAnswer)]
    #[case::delete_answer(Operation::DeleteAnswer)]
    #[case::user(Operation::FetchUser { id: UserId::new("auth0|1") })]
    #[case::search(Operation::Search)]
    fn mismatched_envelopes_are_decode_errors(#[case] operation: Operation) {
        let result = operation.success_event(json!({ "success": true }), now());
        assert_eq!(result.map_err(|err| err.code()), Err(ErrorCode::Decode));
    }

    #[test]
    fn relative_cursor_is_rejected() {
        let result = Operation::ListQuestions.success_event(
            json!({ "questions": [], "next_path": "questions?page=2", "no_of_questions": 0 }),
            now(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn failure_of_answer_delete_stays_in_delete_family() {
        let event = Operation::DeleteAnswer.failure_event(SyncError::transport("down"));
        assert!(matches!(
            event,
            Event::Answers(AnswersEvent::DeleteFailed { .. })
        ));
    }
}

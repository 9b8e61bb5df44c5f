//! Pseudo-events reduced by the entity stores.
//!
//! Every asynchronous operation contributes a request, success, and failure
//! event to its store family. The set is closed: adding an operation means
//! adding variants here, and every reducer's `match` is checked against it.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use pagination::CursorPath;

use crate::domain::ports::IdentitySession;
use crate::domain::{
    AccessToken, Answer, AnswerId, Question, QuestionId, SyncError, UserId, UserProfile,
};

/// One page of questions from `GET /api/questions`.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionPage {
    /// Questions on this page, newest first.
    pub questions: Vec<Question>,
    /// Server cursor for the following page.
    pub next_path: Option<CursorPath>,
    /// Total number of questions across all pages.
    pub no_of_questions: u64,
}

/// One page of results from `POST /api/search`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
    /// Matching questions on this page.
    pub questions: Vec<Question>,
    /// Server cursor for the following page.
    pub next_path: Option<CursorPath>,
    /// Total number of matches across all pages.
    pub no_of_questions: u64,
    /// Term the server searched for.
    pub search_term: String,
}

/// Events owned by the questions store.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionsEvent {
    /// A page fetch started.
    ListRequested,
    /// A page arrived.
    ListReceived {
        /// The page.
        page: QuestionPage,
        /// When the response was received.
        received_at: DateTime<Utc>,
    },
    /// A page fetch failed.
    ListFailed {
        /// Normalised failure.
        error: SyncError,
    },
    /// A single-question fetch started.
    FetchRequested {
        /// Question being fetched.
        id: QuestionId,
    },
    /// A single question arrived.
    Fetched {
        /// Id the fetch was issued for.
        id: QuestionId,
        /// The question.
        question: Question,
        /// When the response was received.
        received_at: DateTime<Utc>,
    },
    /// A single-question fetch failed.
    FetchFailed {
        /// Question that was being fetched.
        id: QuestionId,
        /// Normalised failure.
        error: SyncError,
    },
    /// Posting a question started.
    PostRequested,
    /// The server created a question.
    Posted {
        /// The created question.
        question: Question,
    },
    /// Posting a question failed.
    PostFailed {
        /// Normalised failure.
        error: SyncError,
    },
    /// Deleting a question started.
    DeleteRequested,
    /// The server deleted a question.
    Deleted {
        /// Id of the deleted question.
        id: QuestionId,
    },
    /// Deleting a question failed.
    DeleteFailed {
        /// Normalised failure.
        error: SyncError,
    },
    /// Selecting a best answer started.
    BestAnswerRequested,
    /// The server stored the best answer.
    BestAnswerPatched {
        /// The patched question.
        question: Question,
    },
    /// Selecting a best answer failed.
    BestAnswerFailed {
        /// Normalised failure.
        error: SyncError,
    },
}

/// Events owned by the answers store.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswersEvent {
    /// A single-answer fetch started.
    FetchRequested {
        /// Answer being fetched.
        id: AnswerId,
    },
    /// A single answer arrived.
    Fetched {
        /// Id the fetch was issued for.
        id: AnswerId,
        /// The answer.
        answer: Answer,
        /// When the response was received.
        received_at: DateTime<Utc>,
    },
    /// A single-answer fetch failed.
    FetchFailed {
        /// Answer that was being fetched.
        id: AnswerId,
        /// Normalised failure.
        error: SyncError,
    },
    /// Posting an answer started.
    PostRequested,
    /// The server created an answer.
    Posted {
        /// The created answer.
        answer: Answer,
    },
    /// Posting an answer failed.
    PostFailed {
        /// Normalised failure.
        error: SyncError,
    },
    /// Deleting an answer started.
    DeleteRequested,
    /// The server deleted an answer.
    Deleted {
        /// Id of the deleted answer.
        id: AnswerId,
        /// Question the answer belonged to.
        question_id: QuestionId,
    },
    /// Deleting an answer failed.
    DeleteFailed {
        /// Normalised failure.
        error: SyncError,
    },
}

/// Events owned by the users store.
#[derive(Debug, Clone, PartialEq)]
pub enum UsersEvent {
    /// A profile fetch started.
    FetchRequested {
        /// Profile being fetched.
        id: UserId,
    },
    /// A profile arrived.
    Fetched {
        /// Id the fetch was issued for.
        id: UserId,
        /// The profile.
        user: UserProfile,
        /// When the response was received.
        received_at: DateTime<Utc>,
    },
    /// A profile fetch failed.
    FetchFailed {
        /// Profile that was being fetched.
        id: UserId,
        /// Normalised failure.
        error: SyncError,
    },
}

/// Events owned by the search store.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    /// A search page fetch started.
    Requested,
    /// A search page arrived.
    Received {
        /// The page.
        page: SearchPage,
        /// When the response was received.
        received_at: DateTime<Utc>,
    },
    /// A search page fetch failed.
    Failed {
        /// Normalised failure.
        error: SyncError,
    },
}

/// Identity-provider session handle shared across the page session.
///
/// Two handles are equal when they point at the same session.
#[derive(Clone)]
pub struct SessionHandle(Arc<dyn IdentitySession>);

impl SessionHandle {
    /// Wrap a provider session.
    pub fn new(session: Arc<dyn IdentitySession>) -> Self {
        Self(session)
    }

    /// Borrow the provider session.
    pub fn session(&self) -> &dyn IdentitySession {
        self.0.as_ref()
    }
}

impl PartialEq for SessionHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionHandle(..)")
    }
}

/// Outcome of initialising the identity provider.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    /// Provider session handle.
    pub handle: SessionHandle,
    /// Whether a user is signed in.
    pub is_authenticated: bool,
    /// Token for authenticated API calls.
    pub access_token: Option<AccessToken>,
    /// Signed-in user.
    pub current_user: Option<UserId>,
}

/// Events owned by the auth-session store.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    /// Provider initialisation started.
    InitRequested,
    /// Provider initialised.
    Initialized {
        /// Resulting session.
        session: AuthSession,
    },
    /// Provider initialisation failed.
    InitFailed {
        /// Normalised failure.
        error: SyncError,
    },
    /// The provider reported the signed-in user's profile.
    LoginReceived {
        /// Profile of the signed-in user.
        profile: UserProfile,
    },
}

/// Any pseudo-event, tagged by the store family that owns it.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Questions store event.
    Questions(QuestionsEvent),
    /// Answers store event.
    Answers(AnswersEvent),
    /// Users store event.
    Users(UsersEvent),
    /// Search store event.
    Search(SearchEvent),
    /// Auth-session store event.
    Auth(AuthEvent),
}

impl Event {
    /// Stable event name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Questions(event) => match event {
                QuestionsEvent::ListRequested => "questions.list.request",
                QuestionsEvent::ListReceived { .. } => "questions.list.success",
                QuestionsEvent::ListFailed { .. } => "questions.list.failure",
                QuestionsEvent::FetchRequested { .. } => "questions.fetch.request",
                QuestionsEvent::Fetched { .. } => "questions.fetch.success",
                QuestionsEvent::FetchFailed { .. } => "questions.fetch.failure",
                QuestionsEvent::PostRequested => "questions.post.request",
                QuestionsEvent::Posted { .. } => "questions.post.success",
                QuestionsEvent::PostFailed { .. } => "questions.post.failure",
                QuestionsEvent::DeleteRequested => "questions.delete.request",
                QuestionsEvent::Deleted { .. } => "questions.delete.success",
                QuestionsEvent::DeleteFailed { .. } => "questions.delete.failure",
                QuestionsEvent::BestAnswerRequested => "questions.best_answer.request",
                QuestionsEvent::BestAnswerPatched { .. } => "questions.best_answer.success",
                QuestionsEvent::BestAnswerFailed { .. } => "questions.best_answer.failure",
            },
            Self::Answers(event) => match event {
                AnswersEvent::FetchRequested { .. } => "answers.fetch.request",
                AnswersEvent::Fetched { .. } => "answers.fetch.success",
                AnswersEvent::FetchFailed { .. } => "answers.fetch.failure",
                AnswersEvent::PostRequested => "answers.post.request",
                AnswersEvent::Posted { .. } => "answers.post.success",
                AnswersEvent::PostFailed { .. } => "answers.post.failure",
                AnswersEvent::DeleteRequested => "answers.delete.request",
                AnswersEvent::Deleted { .. } => "answers.delete.success",
                AnswersEvent::DeleteFailed { .. } => "answers.delete.failure",
            },
            Self::Users(event) => match event {
                UsersEvent::FetchRequested { .. } => "users.fetch.request",
                UsersEvent::Fetched { .. } => "users.fetch.success",
                UsersEvent::FetchFailed { .. } => "users.fetch.failure",
            },
            Self::Search(event) => match event {
                SearchEvent::Requested => "search.request",
                SearchEvent::Received { .. } => "search.success",
                SearchEvent::Failed { .. } => "search.failure",
            },
            Self::Auth(event) => match event {
                AuthEvent::InitRequested => "auth.init.request",
                AuthEvent::Initialized { .. } => "auth.init.success",
                AuthEvent::InitFailed { .. } => "auth.init.failure",
                AuthEvent::LoginReceived { .. } => "auth.login",
            },
        }
    }
}

impl From<QuestionsEvent> for Event {
    fn from(value: QuestionsEvent) -> Self {
        Self::Questions(value)
    }
}

impl From<AnswersEvent> for Event {
    fn from(value: AnswersEvent) -> Self {
        Self::Answers(value)
    }
}

impl From<UsersEvent> for Event {
    fn from(value: UsersEvent) -> Self {
        Self::Users(value)
    }
}

impl From<SearchEvent> for Event {
    fn from(value: SearchEvent) -> Self {
        Self::Search(value)
    }
}

impl From<AuthEvent> for Event {
    fn from(value: AuthEvent) -> Self {
        Self::Auth(value)
    }
}

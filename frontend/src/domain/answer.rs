//! Answer entity as cached by the client.

use serde::{Deserialize, Serialize};

use super::{AnswerId, QuestionId, UserId};

/// An answer to a question. Answers are never edited once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// Server-assigned identifier.
    pub id: AnswerId,
    /// Author of the answer.
    pub user_id: UserId,
    /// Question the answer belongs to.
    pub question_id: QuestionId,
    /// Rendered answer body.
    pub content: String,
    /// Creation timestamp as formatted by the API.
    pub created_at: String,
}

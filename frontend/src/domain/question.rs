//! Question entity as cached by the client.

use serde::{Deserialize, Serialize};

use super::{AnswerId, QuestionId, UserId};

/// Validation errors returned by [`Question::try_with_answers`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuestionValidationError {
    /// `best_answer` points at an answer the question does not list.
    #[error("best answer {best} is not one of the question's answers")]
    BestAnswerNotListed {
        /// Offending best-answer id.
        best: AnswerId,
    },
}

/// A question together with its denormalised answer bookkeeping.
///
/// ## Invariants
/// - `best_answer`, when set, appears in `answers`.
/// - `answers` is ordered newest first.
///
/// Questions are values: the `with_*` helpers return an updated copy and leave
/// the receiver untouched, so cached questions shared with the UI never change
/// underneath it.
///
/// # Examples
/// ```
/// use frontend::domain::{AnswerId, Question, QuestionId, UserId};
///
/// let question = Question::new(QuestionId::new(1), UserId::new("u1"), "Why?", "today")
///     .with_answer_added(AnswerId::new(10));
/// assert_eq!(question.answers(), &[AnswerId::new(10)]);
/// assert_eq!(question.no_of_answers(), 1);
/// assert_eq!(question.latest_answer(), Some(AnswerId::new(10)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionDto", into = "QuestionDto")]
pub struct Question {
    id: QuestionId,
    user_id: UserId,
    content: String,
    created_at: String,
    best_answer: Option<AnswerId>,
    latest_answer: Option<AnswerId>,
    answers: Vec<AnswerId>,
    no_of_answers: u32,
}

impl Question {
    /// Create a question with no answers.
    pub fn new(
        id: QuestionId,
        user_id: UserId,
        content: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            id,
            user_id,
            content: content.into(),
            created_at: created_at.into(),
            best_answer: None,
            latest_answer: None,
            answers: Vec::new(),
            no_of_answers: 0,
        }
    }

    /// Replace the answer list and best answer, validating the invariant.
    pub fn try_with_answers(
        self,
        answers: Vec<AnswerId>,
        best_answer: Option<AnswerId>,
    ) -> Result<Self, QuestionValidationError> {
        if let Some(best) = best_answer {
            if !answers.contains(&best) {
                return Err(QuestionValidationError::BestAnswerNotListed { best });
            }
        }
        let no_of_answers = count(&answers);
        Ok(Self {
            best_answer,
            answers,
            no_of_answers,
            ..self
        })
    }

    /// Server-assigned identifier.
    pub fn id(&self) -> QuestionId {
        self.id
    }

    /// Author of the question.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Rendered question body.
    pub fn content(&self) -> &str {
        self.content.as_str()
    }

    /// Creation timestamp as formatted by the API.
    pub fn created_at(&self) -> &str {
        self.created_at.as_str()
    }

    /// Answer selected by the author, if any.
    pub fn best_answer(&self) -> Option<AnswerId> {
        self.best_answer
    }

    /// Most recently posted answer while no best answer is selected.
    pub fn latest_answer(&self) -> Option<AnswerId> {
        self.latest_answer
    }

    /// Answer ids, newest first.
    pub fn answers(&self) -> &[AnswerId] {
        &self.answers
    }

    /// Denormalised answer count.
    pub fn no_of_answers(&self) -> u32 {
        self.no_of_answers
    }

    /// Copy with `answer` prepended and the count incremented.
    ///
    /// While no best answer is selected, the new answer also becomes the
    /// latest answer.
    pub fn with_answer_added(&self, answer: AnswerId) -> Self {
        let already_listed = self.answers.contains(&answer);
        let mut answers = Vec::with_capacity(self.answers.len() + 1);
        answers.push(answer);
        answers.extend(self.answers.iter().copied().filter(|id| *id != answer));
        let latest_answer = if self.best_answer.is_none() {
            Some(answer)
        } else {
            self.latest_answer
        };
        Self {
            answers,
            latest_answer,
            no_of_answers: if already_listed {
                self.no_of_answers
            } else {
                self.no_of_answers.saturating_add(1)
            },
            ..self.clone()
        }
    }

    /// Copy with `answer` removed and the count decremented.
    ///
    /// Clears `best_answer` and `latest_answer` when they pointed at `answer`.
    pub fn with_answer_removed(&self, answer: AnswerId) -> Self {
        let clear = |field: Option<AnswerId>| field.filter(|id| *id != answer);
        Self {
            answers: self
                .answers
                .iter()
                .copied()
                .filter(|id| *id != answer)
                .collect(),
            best_answer: clear(self.best_answer),
            latest_answer: clear(self.latest_answer),
            no_of_answers: self.no_of_answers.saturating_sub(1),
            ..self.clone()
        }
    }
}

fn count(answers: &[AnswerId]) -> u32 {
    u32::try_from(answers.len()).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct QuestionDto {
    id: QuestionId,
    #[serde(default)]
    user_id: UserId,
    content: String,
    #[serde(default)]
    created_at: String,
    #[serde(default)]
    best_answer: Option<AnswerId>,
    #[serde(default)]
    latest_answer: Option<AnswerId>,
    #[serde(default)]
    answers: Vec<AnswerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    no_of_answers: Option<u32>,
}

impl From<Question> for QuestionDto {
    fn from(value: Question) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            content: value.content,
            created_at: value.created_at,
            best_answer: value.best_answer,
            latest_answer: value.latest_answer,
            answers: value.answers,
            no_of_answers: Some(value.no_of_answers),
        }
    }
}

impl TryFrom<QuestionDto> for Question {
    type Error = QuestionValidationError;

    fn try_from(value: QuestionDto) -> Result<Self, Self::Error> {
        let QuestionDto {
            id,
            user_id,
            content,
            created_at,
            best_answer,
            latest_answer,
            answers,
            no_of_answers,
        } = value;

        let question =
            Question::new(id, user_id, content, created_at).try_with_answers(answers, best_answer)?;
        Ok(Self {
            latest_answer,
            no_of_answers: no_of_answers.unwrap_or(question.no_of_answers),
            ..question
        })
    }
}

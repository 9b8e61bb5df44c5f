//! Domain primitives for the Q&A client cache.
//!
//! Purpose: define the entities mirrored from the API and the ports the
//! synchronisation layer drives. Entities are immutable values; stores replace
//! them wholesale rather than editing them in place.
//!
//! Public surface:
//! - `Question`, `Answer`, `UserProfile`: cached entities.
//! - `QuestionId`, `AnswerId`, `UserId`: identifier newtypes.
//! - `AccessToken`: bearer credential that wipes itself on drop.
//! - `SyncError` / `ErrorCode`: normalised failure surfaced to the UI.

pub mod answer;
pub mod error;
pub mod ids;
pub mod ports;
pub mod question;
pub mod token;
pub mod user;

pub use self::answer::Answer;
pub use self::error::{ErrorCode, SyncError};
pub use self::ids::{AnswerId, QuestionId, UserId};
pub use self::question::{Question, QuestionValidationError};
pub use self::token::AccessToken;
pub use self::user::{UserMetadata, UserProfile};

//! Dispatchable actions.

use std::fmt;

use super::call::CallDescriptor;
use super::event::{AnswersEvent, AuthEvent, Event, QuestionsEvent, SearchEvent, UsersEvent};
use super::store::{Pending, Store};

type ThunkFn = Box<dyn FnOnce(Store) -> Pending + Send>;

/// Deferred dispatch logic run by the thunk link.
///
/// A thunk receives a handle to the store, may read its state, and may
/// dispatch any number of further actions, including call descriptors that
/// still pass through the gateway.
pub struct Thunk(ThunkFn);

impl Thunk {
    /// Wrap a closure.
    pub fn new<F>(run: F) -> Self
    where
        F: FnOnce(Store) -> Pending + Send + 'static,
    {
        Self(Box::new(run))
    }

    pub(crate) fn run(self, store: Store) -> Pending {
        (self.0)(store)
    }
}

impl fmt::Debug for Thunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Thunk(..)")
    }
}

/// Anything the store can dispatch.
#[derive(Debug)]
pub enum Action {
    /// Reduce a pseudo-event directly.
    Event(Event),
    /// Perform an API call through the gateway.
    Call(CallDescriptor),
    /// Run deferred dispatch logic.
    Thunk(Thunk),
}

impl From<Event> for Action {
    fn from(value: Event) -> Self {
        Self::Event(value)
    }
}

impl From<CallDescriptor> for Action {
    fn from(value: CallDescriptor) -> Self {
        Self::Call(value)
    }
}

impl From<Thunk> for Action {
    fn from(value: Thunk) -> Self {
        Self::Thunk(value)
    }
}

macro_rules! event_family_into_action {
    ($($family:ty),* $(,)?) => {
        $(
            impl From<$family> for Action {
                fn from(value: $family) -> Self {
                    Self::Event(value.into())
                }
            }
        )*
    };
}

event_family_into_action!(QuestionsEvent, AnswersEvent, UsersEvent, SearchEvent, AuthEvent);

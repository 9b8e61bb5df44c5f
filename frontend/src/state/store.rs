//! The root store and its dispatch chain.
//!
//! A [`Store`] is constructed explicitly at the composition root and cloned
//! into whatever needs it; there is no global instance. State lives in a
//! `watch` channel so the UI can subscribe and re-render on change.

use std::ops::ControlFlow;
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::{self, BoxFuture};
use tokio::sync::watch;
use tracing::{trace, warn};

use super::action::Action;
use super::call::Operation;
use super::event::Event;
use super::gateway::Gateway;
use super::reducer::Reducer;
use super::root::RootState;
use crate::domain::SyncError;

/// Completion of a dispatched action.
pub type Pending = BoxFuture<'static, Dispatched>;

/// How a dispatched action settled.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatched {
    /// Nothing was dispatched, e.g. the entity was already cached.
    Skipped,
    /// A pseudo-event was reduced.
    Reduced,
    /// An API call succeeded and its success event was reduced.
    Succeeded,
    /// An API call or thunk failed; the failure event was reduced.
    Failed {
        /// Normalised failure.
        error: SyncError,
    },
}

impl Dispatched {
    /// Failure carried by [`Dispatched::Failed`].
    pub fn error(&self) -> Option<&SyncError> {
        match self {
            Self::Failed { error } => Some(error),
            Self::Skipped | Self::Reduced | Self::Succeeded => None,
        }
    }
}

/// Already-settled [`Pending`] value.
pub fn settled(outcome: Dispatched) -> Pending {
    future::ready(outcome).boxed()
}

/// Run `work` as a runtime task and return a future of its outcome.
///
/// The task runs to completion whether or not the returned future is polled.
/// Must be called from inside a Tokio runtime.
pub(crate) fn detach(work: Pending) -> Pending {
    let task = tokio::spawn(work);
    async move {
        task.await.unwrap_or_else(|err| {
            warn!(error = %err, "dispatched task did not complete");
            Dispatched::Failed {
                error: SyncError::transport(format!("dispatched task did not complete: {err}")),
            }
        })
    }
    .boxed()
}

/// One effect-capable link of the dispatch chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    /// Consumes call descriptors.
    Gateway,
    /// Runs thunks.
    Thunks,
}

/// Installed links in execution order.
///
/// The gateway comes first so call descriptors dispatched from inside a thunk
/// are still executed by it.
pub const DISPATCH_CHAIN: [Link; 2] = [Link::Gateway, Link::Thunks];

impl Link {
    fn intercept(self, store: &Store, action: Action) -> ControlFlow<Pending, Action> {
        match (self, action) {
            (Self::Gateway, Action::Call(call)) => {
                ControlFlow::Break(store.gateway.begin(store, call))
            }
            (Self::Thunks, Action::Thunk(thunk)) => {
                ControlFlow::Break(detach(thunk.run(store.clone())))
            }
            (_, action) => ControlFlow::Continue(action),
        }
    }
}

/// Cloneable handle to the state tree and dispatch chain.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use frontend::domain::ports::FixtureApiTransport;
/// use frontend::state::{Gateway, SearchEvent, Store};
/// use mockable::DefaultClock;
///
/// let store = Store::new(Gateway::new(
///     Arc::new(FixtureApiTransport::default()),
///     Arc::new(DefaultClock),
/// ));
/// drop(store.dispatch(SearchEvent::Requested));
/// assert!(store.state().search.is_fetching);
/// ```
#[derive(Clone)]
pub struct Store {
    state: Arc<watch::Sender<Arc<RootState>>>,
    gateway: Gateway,
}

impl Store {
    /// Store with every slice at its initial state.
    pub fn new(gateway: Gateway) -> Self {
        Self::with_state(gateway, RootState::default())
    }

    /// Store starting from `state`.
    pub fn with_state(gateway: Gateway, state: RootState) -> Self {
        let (sender, _) = watch::channel(Arc::new(state));
        Self {
            state: Arc::new(sender),
            gateway,
        }
    }

    /// Current state tree.
    pub fn state(&self) -> Arc<RootState> {
        Arc::clone(&self.state.borrow())
    }

    /// Receiver notified whenever a reduction changes the tree.
    pub fn subscribe(&self) -> watch::Receiver<Arc<RootState>> {
        self.state.subscribe()
    }

    /// Pass `action` through the dispatch chain.
    ///
    /// Plain events are reduced before this returns. Call descriptors have
    /// their request event reduced before this returns and the call itself
    /// runs as a Tokio task. A thunk's closure runs before this returns and
    /// the future it yields runs as a task. Dropping the returned future does
    /// not cancel either task, so the outcome event is reduced regardless.
    ///
    /// Calls and thunks must be dispatched from inside a Tokio runtime.
    pub fn dispatch(&self, action: impl Into<Action>) -> Pending {
        let mut action = action.into();
        for link in DISPATCH_CHAIN {
            action = match link.intercept(self, action) {
                ControlFlow::Break(pending) => return pending,
                ControlFlow::Continue(next) => next,
            };
        }
        match action {
            Action::Event(event) => {
                self.reduce(&event);
                settled(Dispatched::Reduced)
            }
            Action::Call(_) | Action::Thunk(_) => {
                warn!(?action, "action fell off the dispatch chain");
                settled(Dispatched::Skipped)
            }
        }
    }

    /// Reduce `event` atomically into the state tree.
    pub(crate) fn reduce(&self, event: &Event) {
        let changed = self.state.send_if_modified(|state| apply(state, event));
        trace!(event = event.name(), changed, "reduced event");
    }

    /// Reduce the request event of `operation` unless the entity it fetches
    /// is already in flight.
    ///
    /// The check and the reduction happen under one write lock, so two
    /// racing fetches of the same id cannot both claim it. Returns whether
    /// the request event was reduced.
    pub(crate) fn claim(&self, operation: &Operation) -> bool {
        let event = operation.request_event();
        let mut claimed = false;
        self.state.send_if_modified(|state| {
            if operation.is_in_flight(state) {
                return false;
            }
            claimed = true;
            apply(state, &event)
        });
        trace!(event = event.name(), claimed, "claimed request");
        claimed
    }
}

fn apply(state: &mut Arc<RootState>, event: &Event) -> bool {
    let next = RootState::reduce(state, event);
    if Arc::ptr_eq(&next, state) {
        false
    } else {
        *state = next;
        true
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the dispatch chain.
    use super::*;
    use crate::domain::ports::{FixtureApiTransport, HttpMethod};
    use crate::domain::{AnswerId, QuestionId};
    use crate::state::action::Thunk;
    use crate::state::call::{CallDescriptor, Operation};
    use crate::state::event::{QuestionsEvent, SearchEvent};
    use mockable::DefaultClock;
    use serde_json::json;

    fn store_over(transport: Arc<FixtureApiTransport>) -> Store {
        Store::new(Gateway::new(transport, Arc::new(DefaultClock)))
    }

    #[tokio::test]
    async fn events_are_reduced_synchronously() {
        let store = store_over(Arc::new(FixtureApiTransport::default()));
        let pending = store.dispatch(QuestionsEvent::ListRequested);
        assert!(store.state().questions.is_fetching);
        assert_eq!(pending.await, Dispatched::Reduced);
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let store = store_over(Arc::new(FixtureApiTransport::default()));
        let mut updates = store.subscribe();
        store.dispatch(SearchEvent::Requested).await;
        assert!(updates.has_changed().expect("store is alive"));
        assert!(updates.borrow_and_update().search.is_fetching);
    }

    #[tokio::test]
    async fn thunk_descriptors_still_reach_the_gateway() {
        let transport = Arc::new(FixtureApiTransport::default());
        transport.respond_json(
            HttpMethod::Get,
            "/api/answers/4",
            200,
            json!({ "answer": {
                "id": 4, "user_id": "u", "question_id": 1,
                "content": "yes", "created_at": "now"
            }}),
        );
        let store = store_over(Arc::clone(&transport));

        let outcome = store
            .dispatch(Thunk::new(|store: Store| {
                store.dispatch(CallDescriptor::new(
                    Operation::FetchAnswer {
                        id: AnswerId::new(4),
                    },
                    HttpMethod::Get,
                    "/api/answers/4",
                ))
            }))
            .await;

        assert_eq!(outcome, Dispatched::Succeeded);
        assert_eq!(transport.sent().len(), 1);
        assert_eq!(store.state().answers.entities.len(), 1);
    }

    #[tokio::test]
    async fn dropped_thunk_still_reduces_its_events() {
        let store = store_over(Arc::new(FixtureApiTransport::default()));
        let mut updates = store.subscribe();

        drop(store.dispatch(Thunk::new(|store: Store| {
            async move {
                tokio::task::yield_now().await;
                store.dispatch(SearchEvent::Requested).await
            }
            .boxed()
        })));

        let state = updates
            .wait_for(|state| state.search.is_fetching)
            .await
            .expect("store is alive");
        assert!(state.search.is_fetching);
    }

    #[tokio::test]
    async fn in_flight_fetch_is_not_claimed_twice() {
        let store = store_over(Arc::new(FixtureApiTransport::default()));
        let operation = Operation::FetchAnswer {
            id: AnswerId::new(8),
        };

        assert!(store.claim(&operation));
        assert!(!store.claim(&operation));
        assert!(store.claim(&Operation::FetchAnswer {
            id: AnswerId::new(9),
        }));
        assert!(store.claim(&Operation::ListQuestions));
        assert!(store.claim(&Operation::ListQuestions));
    }

    #[test]
    fn gateway_precedes_thunks() {
        assert_eq!(DISPATCH_CHAIN, [Link::Gateway, Link::Thunks]);
    }

    #[tokio::test]
    async fn failed_outcome_exposes_the_error() {
        let store = store_over(Arc::new(FixtureApiTransport::default()));
        let outcome = store
            .dispatch(CallDescriptor::new(
                Operation::FetchQuestion {
                    id: QuestionId::new(404),
                },
                HttpMethod::Get,
                "/api/questions/404",
            ))
            .await;
        assert_eq!(
            outcome.error().map(SyncError::message),
            Some("resource not found")
        );
        assert_eq!(
            store.state().questions.error.as_ref().and_then(SyncError::status),
            Some(404)
        );
    }
}

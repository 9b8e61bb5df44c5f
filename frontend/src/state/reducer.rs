//! Pure state transitions shared by every entity store.

use std::sync::Arc;

use super::event::Event;

/// A state slice that reduces pseudo-events.
///
/// Implementations are total over [`Event`]: an event the slice does not own
/// yields `Arc::clone(state)`, so callers can detect a no-op with
/// [`Arc::ptr_eq`]. Recognised events always produce a fresh slice; the shared
/// one is never mutated in place.
pub trait Reducer: Sized {
    /// Reduce `event` into a successor of `state`.
    fn reduce(state: &Arc<Self>, event: &Event) -> Arc<Self>;
}

/// Produce a modified copy of `state`.
pub(super) fn update<S: Clone>(state: &Arc<S>, change: impl FnOnce(&mut S)) -> Arc<S> {
    let mut next = S::clone(state);
    change(&mut next);
    Arc::new(next)
}

//! Search creators.

use serde_json::json;
use tracing::trace;

use crate::domain::ports::HttpMethod;
use crate::state::{CallDescriptor, Dispatched, Operation, Thunk, settled};

/// Path of the first search page.
pub const SEARCH_ENDPOINT: &str = "/api/search";

/// Search for `term`, requesting the page at `path`.
pub fn search_questions(term: &str, path: &str) -> CallDescriptor {
    CallDescriptor::new(Operation::Search, HttpMethod::Post, path)
        .with_json_body(json!({ "search": term }))
}

/// Fetch the next page of results for `term`.
///
/// A term that differs from the cached one restarts at the first page.
/// Otherwise the fetch is skipped once the server reported the last page.
pub fn load_search(term: impl Into<String>) -> Thunk {
    let term = term.into();
    Thunk::new(move |store| {
        let state = store.state();
        let search = &state.search;
        if search.is_new_term(&term) {
            return store.dispatch(search_questions(&term, SEARCH_ENDPOINT));
        }
        match search.cursor.next_request(SEARCH_ENDPOINT) {
            Some(path) => store.dispatch(search_questions(&term, path)),
            None => {
                trace!(term = %term, "search results exhausted; skipping fetch");
                settled(Dispatched::Skipped)
            }
        }
    })
}

//! Server-supplied page cursors for the paginated entity stores.
//!
//! The API returns a `next_path` alongside every page of questions. That path
//! is the only authoritative signal that more data exists: a [`PageCursor`]
//! stores it verbatim and reports exhaustion once a page has arrived without
//! one. The full-page counter kept next to it mirrors the page count shown in
//! the UI and never decides whether another fetch is issued.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Number of items the API places in a full page.
pub const PAGE_SIZE: usize = 20;

/// Query parameter carrying the page number in cursor paths.
pub const PAGE_PARAM: &str = "page";

const CURSOR_BASE: &str = "http://cursor.invalid/";

/// Validation failures for server-supplied cursor paths.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    /// The cursor was empty or whitespace.
    #[error("cursor path must not be empty")]
    Empty,
    /// The cursor did not start with `/`.
    #[error("cursor path must be absolute: {path}")]
    NotAbsolute {
        /// Offending cursor text.
        path: String,
    },
    /// The cursor could not be parsed as a path with an optional query.
    #[error("cursor path is malformed: {path}")]
    Malformed {
        /// Offending cursor text.
        path: String,
    },
}

/// Absolute API path pointing at the next page of a resource.
///
/// ## Invariants
/// - Non-empty and starts with `/`.
/// - Parses as a path (plus optional query) relative to any origin.
///
/// # Examples
/// ```
/// use pagination::CursorPath;
///
/// let cursor = CursorPath::new("/api/questions?page=2").expect("valid cursor");
/// assert_eq!(cursor.page(), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CursorPath(String);

impl CursorPath {
    /// Validate and wrap a cursor path.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError`] when the path is blank, relative, or malformed.
    pub fn new(path: impl Into<String>) -> Result<Self, CursorError> {
        let raw = path.into();
        if raw.trim().is_empty() {
            return Err(CursorError::Empty);
        }
        if !raw.starts_with('/') || raw.starts_with("//") {
            return Err(CursorError::NotAbsolute { path: raw });
        }
        parse(&raw)?;
        Ok(Self(raw))
    }

    /// Borrow the raw path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Page number encoded in the cursor's query, when present.
    #[must_use]
    pub fn page(&self) -> Option<u32> {
        let url = parse(&self.0).ok()?;
        url.query_pairs()
            .find(|(key, _)| key == PAGE_PARAM)
            .and_then(|(_, value)| value.parse().ok())
    }
}

fn parse(path: &str) -> Result<Url, CursorError> {
    let malformed = || CursorError::Malformed {
        path: path.to_owned(),
    };
    let base = Url::parse(CURSOR_BASE).map_err(|_| malformed())?;
    base.join(path).map_err(|_| malformed())
}

impl AsRef<str> for CursorPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CursorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<CursorPath> for String {
    fn from(value: CursorPath) -> Self {
        value.0
    }
}

impl TryFrom<String> for CursorPath {
    type Error = CursorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Pagination progress for one paginated resource.
///
/// Cursors are values: [`PageCursor::advance`] returns the successor and leaves
/// the receiver untouched, matching the copy-on-write state slices that embed
/// them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCursor {
    next: Option<CursorPath>,
    full_pages: u32,
    received_pages: u32,
}

impl PageCursor {
    /// Cursor for a resource that has not been fetched yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: None,
            full_pages: 0,
            received_pages: 0,
        }
    }

    /// Successor cursor after receiving a page of `returned` items.
    ///
    /// The full-page counter only moves when `returned` reaches [`PAGE_SIZE`].
    ///
    /// # Examples
    /// ```
    /// use pagination::{PageCursor, PAGE_SIZE};
    ///
    /// let cursor = PageCursor::new().advance(None, PAGE_SIZE - 1);
    /// assert_eq!(cursor.full_pages(), 0);
    /// assert!(cursor.is_exhausted());
    /// ```
    #[must_use]
    pub fn advance(&self, next: Option<CursorPath>, returned: usize) -> Self {
        let full_pages = if returned >= PAGE_SIZE {
            self.full_pages.saturating_add(1)
        } else {
            self.full_pages
        };
        Self {
            next,
            full_pages,
            received_pages: self.received_pages.saturating_add(1),
        }
    }

    /// Server path of the next page, if the server supplied one.
    #[must_use]
    pub const fn next(&self) -> Option<&CursorPath> {
        self.next.as_ref()
    }

    /// Number of full-sized pages received so far.
    #[must_use]
    pub const fn full_pages(&self) -> u32 {
        self.full_pages
    }

    /// Number of pages received so far, full or not.
    #[must_use]
    pub const fn received_pages(&self) -> u32 {
        self.received_pages
    }

    /// Whether the server has signalled that no further pages exist.
    ///
    /// A cursor that has not received any page is never exhausted.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.received_pages > 0 && self.next.is_none()
    }

    /// Path to request next, starting at `first` before any page arrived.
    ///
    /// Returns `None` once the cursor is exhausted.
    #[must_use]
    pub fn next_request<'a>(&'a self, first: &'a str) -> Option<&'a str> {
        match &self.next {
            Some(path) => Some(path.as_str()),
            None if self.received_pages == 0 => Some(first),
            None => None,
        }
    }
}

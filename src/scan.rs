//! Incremental key scanning.
//!
//! Drives cursor-based SCAN pagination against a live connection: one
//! `ScanSession` per connection, strictly sequential pages (each request
//! consumes the cursor the previous page returned), and a hard cap on the
//! bulk search variant to keep huge keyspaces from exhausting memory.
//!
//! Keys are NOT deduplicated across pages. Redis guarantees every key
//! present for the whole cursor cycle is returned at least once, but a key
//! may appear more than once; that contract is surfaced unchanged since
//! deduplicating would need unbounded memory on large keyspaces.

use crate::error::AppError;

/// Sentinel cursor value: the starting cursor for a fresh scan, and the
/// value the store returns when a cursor cycle completes.
pub const CURSOR_START: &str = "0";

/// One page of keys returned by the store's cursor scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPage {
    pub cursor: String,
    pub keys: Vec<String>,
}

/// Seam between the scan controller and the live store connection.
///
/// Implemented by `StoreGateway` for real scans and by in-memory fakes in
/// tests.
pub trait KeySource {
    fn scan_page(
        &mut self,
        cursor: &str,
        pattern: &str,
        count: u64,
    ) -> impl std::future::Future<Output = Result<ScanPage, AppError>> + Send;
}

/// Transient scan state, one per live connection.
///
/// A cursor of "0" is ambiguous on its own: it is the initial value before
/// any page has been fetched AND the store's cycle-complete signal.
/// `started` disambiguates, so `exhausted` only becomes true once the
/// cursor loops back to "0" after at least one completed page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSession {
    pattern: String,
    cursor: String,
    keys: Vec<String>,
    started: bool,
    exhausted: bool,
}

impl ScanSession {
    /// Begin a fresh scan, discarding any prior session state.
    ///
    /// An empty pattern means match-all (`*`).
    pub fn start(pattern: &str) -> Self {
        let pattern = if pattern.is_empty() {
            "*".to_string()
        } else {
            pattern.to_string()
        };
        ScanSession {
            pattern,
            cursor: CURSOR_START.to_string(),
            keys: Vec::new(),
            started: false,
            exhausted: false,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Current continuation cursor, consumed by the next page fetch.
    pub fn cursor(&self) -> &str {
        &self.cursor
    }

    /// All keys discovered so far, in discovery order, duplicates included.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// True once the store's cursor has looped back to "0" after at least
    /// one completed page.
    pub fn exhausted(&self) -> bool {
        self.exhausted
    }
}

/// Result of a single page fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    /// Keys from this page only (the session accumulates the full set).
    pub keys: Vec<String>,
    pub cursor: String,
    pub exhausted: bool,
}

/// Fetch the next page of the session's scan.
///
/// Session state is only updated after the page call succeeds, so a failed
/// fetch leaves the cursor and accumulated keys untouched and retrying with
/// the same session reissues the same cursor.
///
/// An exhausted session stays exhausted: no upstream call is made and an
/// empty page is returned. Only `ScanSession::start` begins a new cycle.
pub async fn fetch_next_page<S: KeySource>(
    source: &mut S,
    session: &mut ScanSession,
    page_size: u64,
) -> Result<PageResult, AppError> {
    if session.exhausted {
        return Ok(PageResult {
            keys: Vec::new(),
            cursor: session.cursor.clone(),
            exhausted: true,
        });
    }

    let page = source
        .scan_page(&session.cursor, &session.pattern, page_size)
        .await?;

    session.started = true;
    session.exhausted = page.cursor == CURSOR_START;
    session.cursor = page.cursor.clone();
    session.keys.extend(page.keys.iter().cloned());

    Ok(PageResult {
        keys: page.keys,
        cursor: page.cursor,
        exhausted: session.exhausted,
    })
}

/// Outcome of a bulk search. `complete` is false when the hard cap stopped
/// the scan before the cursor cycle finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub keys: Vec<String>,
    pub complete: bool,
}

/// Scan the full keyspace for `pattern`, stopping once the cycle completes
/// or the accumulated result exceeds `hard_cap`.
///
/// Exceeding the cap is not an error: the result is silently truncated and
/// reported via `complete: false`. The cap is checked between pages, so the
/// result can exceed it by at most one page.
pub async fn fetch_all<S: KeySource>(
    source: &mut S,
    pattern: &str,
    hard_cap: usize,
    page_size: u64,
) -> Result<SearchOutcome, AppError> {
    let mut session = ScanSession::start(pattern);

    loop {
        let page = fetch_next_page(source, &mut session, page_size).await?;
        if page.exhausted || session.keys.len() > hard_cap {
            break;
        }
    }

    Ok(SearchOutcome {
        complete: session.exhausted,
        keys: session.keys,
    })
}

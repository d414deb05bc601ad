#[path = "common/mod.rs"]
mod common;

use common::*;
use demotrack::{fetch_all, FetchError, FetchStatus, Page, PagingInfo, MAX_PAGE_ADVANCES};

/// Three pages, the third returning `nextPage = 0`:
/// exactly three fetches, items concatenated in page order.
#[test]
fn stops_when_cursor_reaches_zero() {
    let src = ScriptedSource::new()
        .page(1, page_of(&["a1", "a2"], 2))
        .page(2, page_of(&["b1"], 3))
        .page(3, page_of(&["c1", "c2"], 0));

    let out = fetch_all(&src, &query());

    assert_eq!(src.calls(), vec![1, 2, 3]);
    assert_eq!(out.pages_fetched, 3);
    assert_eq!(out.status, FetchStatus::Complete);
    assert!(!out.is_partial());
    assert_eq!(ids_of(&out.items), vec!["a1", "a2", "b1", "c1", "c2"]);
}

/// An absent `nextPage` ends the run like zero does.
#[test]
fn stops_when_cursor_absent() {
    let last = Ok(Page { items: vec![record("z", &[])], paging: PagingInfo::default() });
    let src = ScriptedSource::new().page(1, page_of(&["a"], 2)).page(2, last);

    let out = fetch_all(&src, &query());
    assert_eq!(src.calls(), vec![1, 2]);
    assert_eq!(ids_of(&out.items), vec!["a", "z"]);
    assert_eq!(out.status, FetchStatus::Complete);
}

/// A negative `nextPage` is not a page to visit: one fetch, then done.
#[test]
fn negative_cursor_ends_run() {
    let src = ScriptedSource::new()
        .page(1, page_of(&["a"], -1))
        .otherwise(|n| page_of(&["stray"], n as i64 + 1));

    let out = fetch_all(&src, &query());
    assert_eq!(src.calls(), vec![1]);
    assert_eq!(ids_of(&out.items), vec!["a"]);
    assert_eq!(out.status, FetchStatus::Complete);
}

/// The server cursor is followed as given, even when it skips or jumps back.
#[test]
fn follows_server_cursor_not_increment() {
    let src = ScriptedSource::new()
        .page(1, page_of(&["p1"], 5))
        .page(5, page_of(&["p5"], 2))
        .page(2, page_of(&["p2"], 0));

    let out = fetch_all(&src, &query());
    assert_eq!(src.calls(), vec![1, 5, 2]);
    assert_eq!(ids_of(&out.items), vec!["p1", "p5", "p2"]);
}

/// Empty first page with `nextPage = 2`: stop immediately with nothing.
#[test]
fn empty_page_overrides_cursor() {
    let empty = Ok(Page {
        items: vec![],
        paging: PagingInfo { next_page: Some(2), ..Default::default() },
    });
    let src = ScriptedSource::new().page(1, empty).page(2, page_of(&["never"], 0));

    let out = fetch_all(&src, &query());
    assert_eq!(src.calls(), vec![1]);
    assert!(out.items.is_empty());
    assert_eq!(out.status, FetchStatus::Complete);
}

/// Failure on page 3 after two good pages: pages 1–2 kept, partial flag set.
#[test]
fn failure_returns_partial_items() {
    let err = FetchError::Http { status: 502, message: "bad gateway".into() };
    let src = ScriptedSource::new()
        .page(1, page_of(&["a"], 2))
        .page(2, page_of(&["b", "c"], 3))
        .page(3, Err(err.clone()));

    let out = fetch_all(&src, &query());
    assert_eq!(src.calls(), vec![1, 2, 3]);
    assert!(out.is_partial());
    assert_eq!(out.failure(), Some(&err));
    assert_eq!(out.failure().and_then(|e| e.status()), Some(502));
    assert_eq!(out.pages_fetched, 2);
    assert_eq!(ids_of(&out.items), vec!["a", "b", "c"]);
}

/// A cursor that never ends stops after the fixed page bound instead of hanging.
#[test]
fn cyclic_cursor_hits_page_bound() {
    let src = ScriptedSource::new().otherwise(|n| page_of(&["loop"], if n == 1 { 2 } else { 1 }));

    let out = fetch_all(&src, &query());
    assert_eq!(src.calls().len(), MAX_PAGE_ADVANCES);
    assert_eq!(out.pages_fetched, MAX_PAGE_ADVANCES);
    assert_eq!(out.items.len(), MAX_PAGE_ADVANCES);
    assert_eq!(out.status, FetchStatus::PageLimitReached);
    assert!(!out.is_partial());
}

/// A cursor that ends exactly on the last allowed page is a normal completion,
/// not a page-bound stop.
#[test]
fn cursor_ending_on_last_allowed_page_completes() {
    let last = MAX_PAGE_ADVANCES as u32;
    let src = ScriptedSource::new().otherwise(move |n| page_of(&["p"], if n < last { n as i64 + 1 } else { 0 }));

    let out = fetch_all(&src, &query());
    assert_eq!(src.calls().len(), MAX_PAGE_ADVANCES);
    assert_eq!(src.calls().last(), Some(&last));
    assert_eq!(out.pages_fetched, MAX_PAGE_ADVANCES);
    assert_eq!(out.status, FetchStatus::Complete);
}

/// A configured start page is where the walk begins.
#[test]
fn starts_at_configured_page() {
    let src = ScriptedSource::new().page(4, page_of(&["d"], 0));
    let mut q = query();
    q.start_page = 4;

    let out = fetch_all(&src, &q);
    assert_eq!(src.calls(), vec![4]);
    assert_eq!(ids_of(&out.items), vec!["d"]);
}

/// Every request carries the same window, size and sort order; only the page moves.
#[test]
fn page_requests_share_window() {
    let q = query();
    let first = q.page(1);
    let later = q.page(7);
    assert_eq!(first.limit, later.limit);
    assert_eq!(first.start_date, later.start_date);
    assert_eq!(later.page_number, 7);
    assert_eq!(later.sort_field, "creationDate");
    assert_eq!(later.sort_order, "ASC");
}

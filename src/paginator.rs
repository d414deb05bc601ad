//! Cursor-following fetch loop. Walks the server's `nextPage` chain until it
//! ends, an empty page arrives, a page fails, or the advance bound is hit.

use crate::progress::make_page_spinner;
use crate::record::RawRecord;
use crate::transport::{FetchError, PageSource, ReportQuery};

/// Upper bound on pages requested in one run, against cyclic or runaway cursors.
/// Fixed policy, not read from configuration.
pub const MAX_PAGE_ADVANCES: usize = 100;

/// Why the loop stopped.
#[derive(Clone, Debug, PartialEq)]
pub enum FetchStatus {
    /// Cursor ended or an empty page arrived.
    Complete,
    /// `MAX_PAGE_ADVANCES` pages were fetched and the cursor still pointed on.
    PageLimitReached,
    /// A page failed; `items` holds everything fetched before it.
    Failed(FetchError),
}

/// Items accumulated across pages, in page-arrival then in-page order.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchOutcome {
    pub items: Vec<RawRecord>,
    /// Successful page responses, including a final empty one.
    pub pages_fetched: usize,
    pub status: FetchStatus,
}

impl FetchOutcome {
    /// Partial-failure flag: the run stopped on an error, not on natural completion.
    pub fn is_partial(&self) -> bool {
        matches!(self.status, FetchStatus::Failed(_))
    }

    pub fn failure(&self) -> Option<&FetchError> {
        match &self.status {
            FetchStatus::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Fetch every page of `query`, starting at `query.start_page` and always following the
/// server-returned cursor. No deduplication across pages.
pub fn fetch_all<S: PageSource>(source: &S, query: &ReportQuery) -> FetchOutcome {
    fetch_all_with_progress(source, query, false)
}

pub fn fetch_all_with_progress<S: PageSource>(source: &S, query: &ReportQuery, progress: bool) -> FetchOutcome {
    let pb = if progress { Some(make_page_spinner(Some("Fetching report"))) } else { None };

    let mut items: Vec<RawRecord> = Vec::new();
    let mut page = query.start_page.max(1);
    let mut pages_fetched = 0usize;

    let status = loop {
        let result = source.fetch_page(&query.page(page));
        let fetched = match result {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(
                    "Page {} failed ({}); stopping with {} items from {} pages",
                    page, e, items.len(), pages_fetched
                );
                break FetchStatus::Failed(e);
            }
        };
        pages_fetched += 1;
        if let Some(pb) = &pb {
            pb.inc(1);
        }

        if fetched.items.is_empty() {
            tracing::info!("No more data on page {}", page);
            break FetchStatus::Complete;
        }

        let count = fetched.items.len();
        items.extend(fetched.items);
        tracing::info!(
            "Fetched page {} with {} items (server count {:?}). Total so far: {}",
            page, count, fetched.paging.count_items, items.len()
        );

        let next = match fetched.paging.next() {
            Some(n) => n,
            None => {
                tracing::info!("Reached last page");
                break FetchStatus::Complete;
            }
        };

        if pages_fetched >= MAX_PAGE_ADVANCES {
            tracing::warn!(
                "Reached maximum of {} pages with cursor still at {}; stopping",
                MAX_PAGE_ADVANCES, next
            );
            break FetchStatus::PageLimitReached;
        }
        page = next;
    };

    if let Some(pb) = pb {
        pb.finish_with_message(format!("{} items", items.len()));
    }
    tracing::info!("Fetched total of {} items from {} pages", items.len(), pages_fetched);

    FetchOutcome { items, pages_fetched, status }
}

mod config;
mod date;
mod util;
mod progress;

mod record;
mod transport;
mod paginator;
mod flatten;

mod table;
mod project;
mod export;
mod pipeline;

pub use crate::config::{Credentials, ExportOptions, DEFAULT_BASE_URL};
pub use crate::date::{stamp_for, today_stamp, ReportDate};
pub use crate::pipeline::{DemoboardExport, RunOutcome, RunReport};

// Record model and the flatten step.
pub use crate::record::{format_view_time, ExternalOpportunity, FlatRow, RawRecord, ViewTimeRaw, FLAT_COLUMNS};
pub use crate::flatten::{coerce_view_time, expand_record, flatten};

// Page transport and the cursor-following loop.
pub use crate::transport::{
    parse_page, request_body, FetchError, HttpTransport, Page, PageRequest, PageResult, PageSource, PagingInfo,
    ReportQuery,
};
pub use crate::paginator::{fetch_all, fetch_all_with_progress, FetchOutcome, FetchStatus, MAX_PAGE_ADVANCES};

// Tabular views and CSV export.
pub use crate::table::{Table, TableSummary};
pub use crate::project::{project, Projection, SUMMARY_COLUMNS};
pub use crate::export::{dated_file_name, write_csv, FULL_PREFIX, SUMMARY_PREFIX};

// Logging setup for binaries.
pub use crate::util::init_tracing_once;

use crate::config::{Credentials, ExportOptions};
use crate::date::{today_stamp, ReportDate};
use crate::export::{dated_file_name, write_csv, FULL_PREFIX, SUMMARY_PREFIX};
use crate::flatten::flatten;
use crate::paginator::{fetch_all_with_progress, FetchStatus};
use crate::project::project;
use crate::table::Table;
use crate::transport::{FetchError, HttpTransport, PageSource, ReportQuery};
use anyhow::Result;
use std::path::{Path, PathBuf};

const WRITE_BUFFER_BYTES: usize = 256 * 1024;

/// Fetch → flatten → project → export, over any page source.
#[derive(Clone)]
pub struct DemoboardExport<S> {
    pub(crate) opts: ExportOptions,
    source: S,
    stamp: Option<String>,
}

/// How a run ended.
#[derive(Clone, Debug, PartialEq)]
pub enum RunOutcome {
    /// Both files written. `partial` is set when a later page failed and the
    /// rows fetched before it were exported anyway.
    Exported {
        full_path: PathBuf,
        summary_path: PathBuf,
        rows: usize,
        partial: Option<FetchError>,
    },
    /// Nothing to export; no files written.
    NoData,
    /// Fetching failed before any usable row was recovered.
    FetchFailed(FetchError),
    /// A later page failed and partial exports are disabled.
    PartialAborted(FetchError),
}

#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    pub records: usize,
    pub pages_fetched: usize,
    pub page_limit_reached: bool,
    pub outcome: RunOutcome,
}

impl RunReport {
    /// Process exit code for the binary: 0 for exported or empty, 1 for failures.
    pub fn exit_code(&self) -> i32 {
        match self.outcome {
            RunOutcome::Exported { .. } | RunOutcome::NoData => 0,
            RunOutcome::FetchFailed(_) | RunOutcome::PartialAborted(_) => 1,
        }
    }
}

impl DemoboardExport<HttpTransport> {
    /// Pipeline against the real report endpoint described by `opts`.
    pub fn http(opts: ExportOptions) -> Result<Self> {
        let transport = HttpTransport::from_options(&opts)?;
        Ok(Self::with_source(opts, transport))
    }
}

impl<S: PageSource> DemoboardExport<S> {
    pub fn with_source(opts: ExportOptions, source: S) -> Self {
        Self { opts, source, stamp: None }
    }

    // -------- Builder methods --------
    pub fn credentials(mut self, c: Credentials) -> Self { self.opts = self.opts.with_credentials(c); self }
    pub fn date_range(mut self, start: ReportDate, end: ReportDate) -> Self { self.opts = self.opts.with_date_range(start, end); self }
    pub fn page_limit(mut self, limit: u32) -> Self { self.opts = self.opts.with_page_limit(limit); self }
    pub fn start_page(mut self, page: u32) -> Self { self.opts = self.opts.with_start_page(page); self }
    pub fn output_dir(mut self, dir: impl AsRef<Path>) -> Self { self.opts = self.opts.with_output_dir(dir); self }
    pub fn allow_partial(mut self, yes: bool) -> Self { self.opts = self.opts.with_allow_partial(yes); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    /// Override the `YYYYMMDD` filename stamp (defaults to today).
    pub fn date_stamp(mut self, stamp: impl Into<String>) -> Self { self.stamp = Some(stamp.into()); self }

    /// Output paths this run would write.
    pub fn output_paths(&self) -> (PathBuf, PathBuf) {
        let stamp = self.stamp.clone().unwrap_or_else(today_stamp);
        (
            self.opts.output_dir.join(dated_file_name(FULL_PREFIX, &stamp)),
            self.opts.output_dir.join(dated_file_name(SUMMARY_PREFIX, &stamp)),
        )
    }

    /// Run once. Fetch failures come back as a `RunOutcome`; only export I/O errors are `Err`.
    pub fn run(&self) -> Result<RunReport> {
        let query = ReportQuery::from_options(&self.opts);
        tracing::info!(
            "Fetching data from {} to {} (page limit {}, start page {})",
            query.start_date, query.end_date, query.limit, query.start_page
        );

        let fetched = fetch_all_with_progress(&self.source, &query, self.opts.progress);
        let mut report = RunReport {
            records: fetched.items.len(),
            pages_fetched: fetched.pages_fetched,
            page_limit_reached: fetched.status == FetchStatus::PageLimitReached,
            outcome: RunOutcome::NoData,
        };

        let partial = match fetched.status {
            FetchStatus::Failed(e) if fetched.items.is_empty() => {
                tracing::error!("Failed to fetch data: {}", e);
                report.outcome = RunOutcome::FetchFailed(e);
                return Ok(report);
            }
            FetchStatus::Failed(e) if !self.opts.allow_partial => {
                tracing::error!("Fetch stopped early ({}); partial export disabled", e);
                report.outcome = RunOutcome::PartialAborted(e);
                return Ok(report);
            }
            FetchStatus::Failed(e) => {
                tracing::warn!("Fetch stopped early ({}); exporting {} records fetched so far", e, fetched.items.len());
                Some(e)
            }
            FetchStatus::Complete | FetchStatus::PageLimitReached => None,
        };

        let rows = flatten(&fetched.items);
        if rows.is_empty() {
            // A failed fetch stays a failure even when the pages before it held nothing usable.
            if let Some(e) = partial {
                tracing::error!("Fetch stopped early ({}) and no rows were recovered", e);
                report.outcome = RunOutcome::FetchFailed(e);
                return Ok(report);
            }
            tracing::warn!("No data to export");
            return Ok(report);
        }

        let full = Table::from_rows(&rows);
        let shape = full.summary();
        tracing::info!(
            "Full data summary: {} rows x {} columns; empty cells per column: {:?}",
            shape.rows, shape.columns, shape.empty_counts
        );
        let summary = project(&full);

        let (full_path, summary_path) = self.output_paths();
        write_csv(&full, &full_path, WRITE_BUFFER_BYTES)?;
        write_csv(&summary.table, &summary_path, WRITE_BUFFER_BYTES)?;

        report.outcome = RunOutcome::Exported { full_path, summary_path, rows: rows.len(), partial };
        Ok(report)
    }
}

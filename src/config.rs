use crate::date::ReportDate;
use anyhow::{anyhow, bail, Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://app.goconsensus.com/api/reports/v1.0/trackDemoBoards";

/// Static credential bundle inlined into every request body.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
    pub user_email: String,
    pub source_name: String,
}

impl Credentials {
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        user_email: impl Into<String>,
        source_name: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            user_email: user_email.into(),
            source_name: source_name.into(),
        }
    }
}

// Keys and secrets never reach the logs, even through `{:?}`.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"***")
            .field("api_secret", &"***")
            .field("user_email", &self.user_email)
            .field("source_name", &self.source_name)
            .finish()
    }
}

/// User-facing options with the exporter's defaults and builder chaining.
#[derive(Clone, Debug)]
pub struct ExportOptions {
    pub base_url: String,
    pub credentials: Credentials,
    pub verify_tls: bool,
    pub request_timeout: Duration,

    pub start_date: ReportDate,       // inclusive
    pub end_date: ReportDate,         // inclusive
    pub page_limit: u32,              // items per page requested from the server
    pub start_page: u32,              // first page requested; later pages follow the server cursor

    pub output_dir: PathBuf,
    pub log_level: String,
    pub allow_partial: bool,          // export what was fetched when a later page fails
    pub progress: bool,               // show a page spinner
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials: Credentials { source_name: "pythonapp".to_string(), ..Default::default() },
            verify_tls: true,
            request_timeout: Duration::from_secs(60),

            start_date: ReportDate::new(2025, 4, 1),
            end_date: ReportDate::new(2025, 10, 21),
            page_limit: 500,
            start_page: 1,

            output_dir: PathBuf::from("output"),
            log_level: "info".to_string(),
            allow_partial: true,
            progress: false,
        }
    }
}

impl ExportOptions {
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }
    pub fn with_verify_tls(mut self, yes: bool) -> Self {
        self.verify_tls = yes;
        self
    }
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
    pub fn with_date_range(mut self, start: ReportDate, end: ReportDate) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }
    pub fn with_page_limit(mut self, limit: u32) -> Self {
        self.page_limit = limit.max(1);
        self
    }
    pub fn with_start_page(mut self, page: u32) -> Self {
        self.start_page = page.max(1);
        self
    }
    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.output_dir = dir.as_ref().to_path_buf();
        self
    }
    pub fn with_allow_partial(mut self, yes: bool) -> Self {
        self.allow_partial = yes;
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }

    /// Load options from the process environment, reading a `.env` file first when present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build options from any key lookup. Unset or blank keys fall back to defaults;
    /// the three credential keys are required.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let require = |key: &str| get(key).ok_or_else(|| anyhow!("{} must be set", key));

        let mut opts = Self::default();

        if let Some(url) = get("API_BASE_URL") {
            opts.base_url = url;
        }
        opts.credentials = Credentials {
            api_key: require("API_KEY")?,
            api_secret: require("API_SECRET")?,
            user_email: require("API_EMAIL")?,
            source_name: get("SOURCE_NAME").unwrap_or_else(|| opts.credentials.source_name.clone()),
        };
        if let Some(v) = get("VERIFY_SSL") {
            opts.verify_tls = v.eq_ignore_ascii_case("true");
        }
        if let Some(v) = get("REQUEST_TIMEOUT_SECS") {
            let secs: u64 = v.parse().with_context(|| format!("REQUEST_TIMEOUT_SECS={}", v))?;
            opts.request_timeout = Duration::from_secs(secs.max(1));
        }

        if let Some(v) = get("START_DATE") {
            opts.start_date = v.parse().map_err(|e: String| anyhow!("START_DATE: {}", e))?;
        }
        if let Some(v) = get("END_DATE") {
            opts.end_date = v.parse().map_err(|e: String| anyhow!("END_DATE: {}", e))?;
        }
        if opts.start_date > opts.end_date {
            bail!("START_DATE {} is after END_DATE {}", opts.start_date, opts.end_date);
        }

        if let Some(v) = get("PAGE_LIMIT") {
            let n: u32 = v.parse().with_context(|| format!("PAGE_LIMIT={}", v))?;
            opts = opts.with_page_limit(n);
        }
        if let Some(v) = get("PAGE_NUMBER") {
            let n: u32 = v.parse().with_context(|| format!("PAGE_NUMBER={}", v))?;
            opts = opts.with_start_page(n);
        }

        if let Some(dir) = get("OUTPUT_DIR") {
            opts.output_dir = PathBuf::from(dir);
        }
        if let Some(level) = get("LOG_LEVEL") {
            opts.log_level = level.to_lowercase();
        }
        if let Some(v) = get("ALLOW_PARTIAL") {
            opts.allow_partial = !v.eq_ignore_ascii_case("false");
        }

        Ok(opts)
    }
}

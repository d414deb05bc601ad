//! Single-page transport: one authenticated POST per page, every failure
//! returned as a `FetchError` value.

use crate::config::{Credentials, ExportOptions};
use crate::date::ReportDate;
use crate::record::RawRecord;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Longest server body kept in an error message.
const MAX_DIAGNOSTIC_CHARS: usize = 512;

/// Per-page failure. Never escapes the paginator as a panic or an `Err` of the run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    #[error("malformed response body: {0}")]
    Decode(String),

    #[error("unexpected response shape: {0}")]
    Shape(String),
}

impl FetchError {
    /// HTTP status, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the body parsed as JSON but lacked `data.items` / `data.paging`.
    pub fn is_shape(&self) -> bool {
        matches!(self, FetchError::Shape(_))
    }
}

/// Date window and page size for one report run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportQuery {
    pub start_date: ReportDate,
    pub end_date: ReportDate,
    pub limit: u32,
    pub start_page: u32,
}

impl ReportQuery {
    pub fn new(start_date: ReportDate, end_date: ReportDate, limit: u32) -> Self {
        Self { start_date, end_date, limit: limit.max(1), start_page: 1 }
    }

    pub fn from_options(opts: &ExportOptions) -> Self {
        Self {
            start_date: opts.start_date,
            end_date: opts.end_date,
            limit: opts.page_limit.max(1),
            start_page: opts.start_page.max(1),
        }
    }

    pub fn page(&self, page_number: u32) -> PageRequest {
        PageRequest {
            start_date: self.start_date,
            end_date: self.end_date,
            limit: self.limit,
            page_number,
            sort_field: "creationDate",
            sort_order: "ASC",
        }
    }
}

/// Parameters of one page call. Credentials are added by the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub start_date: ReportDate,
    pub end_date: ReportDate,
    pub limit: u32,
    pub page_number: u32,
    pub sort_field: &'static str,
    pub sort_order: &'static str,
}

/// Server paging block. Every field is optional on the wire.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagingInfo {
    #[serde(default, rename = "page")]
    pub current_page: Option<i64>,
    #[serde(default)]
    pub count_items: Option<i64>,
    /// 0 or absent means no more pages.
    #[serde(default)]
    pub next_page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

impl PagingInfo {
    /// Server cursor, if it points anywhere.
    pub fn next(&self) -> Option<u32> {
        self.next_page.filter(|n| *n > 0).and_then(|n| u32::try_from(n).ok())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    pub items: Vec<RawRecord>,
    pub paging: PagingInfo,
}

pub type PageResult = std::result::Result<Page, FetchError>;

/// Anything that can answer one page request.
pub trait PageSource {
    fn fetch_page(&self, request: &PageRequest) -> PageResult;
}

impl<S: PageSource + ?Sized> PageSource for &S {
    fn fetch_page(&self, request: &PageRequest) -> PageResult {
        (**self).fetch_page(request)
    }
}

impl<S: PageSource + ?Sized> PageSource for Box<S> {
    fn fetch_page(&self, request: &PageRequest) -> PageResult {
        (**self).fetch_page(request)
    }
}

// ----------------------------- Wire types ------------------------------------

#[derive(Serialize)]
struct WireRequest<'a> {
    auth: WireAuth<'a>,
    paging: WirePaging<'a>,
    start_date: String,
    end_date: String,
}

#[derive(Serialize)]
struct WireAuth<'a> {
    api_key: &'a str,
    api_secret: &'a str,
    user_email: &'a str,
    source_name: &'a str,
}

#[derive(Serialize)]
struct WirePaging<'a> {
    limit: u32,
    page: u32,
    #[serde(rename = "sortBy")]
    sort_by: &'a str,
    order: &'a str,
}

#[derive(Deserialize)]
struct WireEnvelope {
    data: WireData,
}

#[derive(Deserialize)]
struct WireData {
    items: Vec<Value>,
    paging: PagingInfo,
}

fn wire_request<'a>(request: &'a PageRequest, credentials: &'a Credentials) -> WireRequest<'a> {
    WireRequest {
        auth: WireAuth {
            api_key: &credentials.api_key,
            api_secret: &credentials.api_secret,
            user_email: &credentials.user_email,
            source_name: &credentials.source_name,
        },
        paging: WirePaging {
            limit: request.limit,
            page: request.page_number,
            sort_by: request.sort_field,
            order: request.sort_order,
        },
        start_date: request.start_date.to_string(),
        end_date: request.end_date.to_string(),
    }
}

/// Request body for one page, credentials inlined. Same JSON the transport posts.
pub fn request_body(request: &PageRequest, credentials: &Credentials) -> serde_json::Result<Value> {
    serde_json::to_value(wire_request(request, credentials))
}

/// Parse a 2xx response body into a page.
pub fn parse_page(body: &str) -> PageResult {
    let value: Value = serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;
    let env: WireEnvelope = serde_json::from_value(value).map_err(|e| FetchError::Shape(e.to_string()))?;
    Ok(Page {
        items: env.data.items.iter().map(RawRecord::from_value).collect(),
        paging: env.data.paging,
    })
}

fn diagnostic(body: &str) -> String {
    let body = body.trim();
    if body.chars().count() <= MAX_DIAGNOSTIC_CHARS {
        return body.to_string();
    }
    let mut s: String = body.chars().take(MAX_DIAGNOSTIC_CHARS).collect();
    s.push_str("...");
    s
}

/// Blocking HTTP transport against the fixed report endpoint.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    url: String,
    credentials: Credentials,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>, credentials: Credentials, verify_tls: bool, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("demotrack/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(!verify_tls)
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;
        if !verify_tls {
            tracing::warn!("TLS certificate verification is disabled");
        }
        Ok(Self { client, url: url.into(), credentials })
    }

    pub fn from_options(opts: &ExportOptions) -> Result<Self> {
        Self::new(opts.base_url.clone(), opts.credentials.clone(), opts.verify_tls, opts.request_timeout)
    }
}

impl PageSource for HttpTransport {
    fn fetch_page(&self, request: &PageRequest) -> PageResult {
        tracing::info!(
            "Requesting page {} (limit {}) for {} to {}",
            request.page_number, request.limit, request.start_date, request.end_date
        );

        let resp = self
            .client
            .post(&self.url)
            .json(&wire_request(request, &self.credentials))
            .send()
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = resp.status();
        let body = resp.text().map_err(|e| FetchError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(FetchError::Http { status: status.as_u16(), message: diagnostic(&body) });
        }

        parse_page(&body)
    }
}

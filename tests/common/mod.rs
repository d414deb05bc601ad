#![allow(dead_code)]

use demotrack::{FetchError, Page, PageRequest, PageResult, PageSource, PagingInfo, RawRecord, ReportDate, ReportQuery};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// In-memory page source: answers by page number from a fixed script and
/// records every page number it was asked for.
pub struct ScriptedSource {
    pages: HashMap<u32, PageResult>,
    fallback: Option<Box<dyn Fn(u32) -> PageResult>>,
    pub calls: RefCell<Vec<u32>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self { pages: HashMap::new(), fallback: None, calls: RefCell::new(Vec::new()) }
    }

    pub fn page(mut self, number: u32, result: PageResult) -> Self {
        self.pages.insert(number, result);
        self
    }

    /// Answer any page not scripted explicitly.
    pub fn otherwise(mut self, f: impl Fn(u32) -> PageResult + 'static) -> Self {
        self.fallback = Some(Box::new(f));
        self
    }

    pub fn calls(&self) -> Vec<u32> {
        self.calls.borrow().clone()
    }
}

impl PageSource for ScriptedSource {
    fn fetch_page(&self, request: &PageRequest) -> PageResult {
        self.calls.borrow_mut().push(request.page_number);
        if let Some(r) = self.pages.get(&request.page_number) {
            return r.clone();
        }
        match &self.fallback {
            Some(f) => f(request.page_number),
            None => Err(FetchError::Request(format!("unscripted page {}", request.page_number))),
        }
    }
}

/// Minimal record JSON with a demoboard id and session ids.
pub fn record_json(senddemo: &str, demo_uuids: &[&str]) -> Value {
    json!({
        "senddemoUuid": senddemo,
        "demoboardName": format!("Board {senddemo}"),
        "organization": "Acme",
        "viewTime": 42,
        "timeLastView": "2025-01-01",
        "externalOpportunity": {
            "externalAccountId": "X",
            "externalOpportunityId": "OPP",
            "externalAccountName": "Acme Corp",
            "externalOpportunityName": "Renewal"
        },
        "demoUuids": demo_uuids,
        "demoUuid": ""
    })
}

pub fn record(senddemo: &str, demo_uuids: &[&str]) -> RawRecord {
    RawRecord::from_value(&record_json(senddemo, demo_uuids))
}

/// Page holding one record per id, pointing at `next` (0 = last page).
pub fn page_of(ids: &[&str], next: i64) -> PageResult {
    Ok(Page {
        items: ids.iter().map(|id| record(id, &["s"])).collect(),
        paging: PagingInfo { current_page: None, count_items: Some(ids.len() as i64), next_page: Some(next), limit: Some(500) },
    })
}

pub fn query() -> ReportQuery {
    ReportQuery::new(ReportDate::new(2025, 4, 1), ReportDate::new(2025, 10, 21), 500)
}

pub fn ids_of(items: &[RawRecord]) -> Vec<String> {
    items.iter().map(|r| r.senddemo_uuid.clone().unwrap_or_default()).collect()
}

/// Read a CSV file into (headers, rows).
pub fn read_csv(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut rdr = csv::Reader::from_path(path).unwrap();
    let headers = rdr.headers().unwrap().iter().map(String::from).collect();
    let rows = rdr.records().map(|r| r.unwrap().iter().map(String::from).collect()).collect();
    (headers, rows)
}

/// Read a text file line-by-line into strings.
pub fn read_lines(path: &Path) -> Vec<String> {
    let f = File::open(path).unwrap();
    let r = BufReader::new(f);
    r.lines().map(|l| l.unwrap()).filter(|s| !s.is_empty()).collect()
}

//! CSV export: header row + UTF-8 records, written to a `.part` sibling and
//! promoted over the destination once complete.

use crate::table::Table;
use crate::util::{create_with_backoff, remove_with_backoff, replace_file_atomic_backoff};
use anyhow::{Context, Result};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const FULL_PREFIX: &str = "consensus_full_data";
pub const SUMMARY_PREFIX: &str = "consensus_summary";

/// `<prefix>_<YYYYMMDD>.csv`
pub fn dated_file_name(prefix: &str, stamp: &str) -> String {
    format!("{prefix}_{stamp}.csv")
}

/// Write `table` to `out_path`, creating the parent directory if needed. Returns rows written.
pub fn write_csv(table: &Table, out_path: &Path, write_buf: usize) -> Result<usize> {
    if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }

    let tmp = tmp_path_for(out_path);
    let written = match write_rows(table, &tmp, write_buf) {
        Ok(n) => n,
        Err(e) => {
            let _ = remove_with_backoff(&tmp, 4, 50);
            return Err(e);
        }
    };
    replace_file_atomic_backoff(&tmp, out_path)?;

    tracing::info!("Exported {} rows to {}", written, out_path.display());
    Ok(written)
}

fn write_rows(table: &Table, tmp: &Path, write_buf: usize) -> Result<usize> {
    let file = create_with_backoff(tmp, 16, 50).with_context(|| format!("create {}", tmp.display()))?;
    let mut w = csv::Writer::from_writer(BufWriter::with_capacity(write_buf.max(8 * 1024), file));

    w.write_record(&table.headers).with_context(|| format!("write header {}", tmp.display()))?;
    for row in &table.rows {
        w.write_record(row).with_context(|| format!("write row {}", tmp.display()))?;
    }

    let mut inner = w.into_inner().map_err(|e| anyhow::anyhow!("flush {}: {}", tmp.display(), e.error()))?;
    inner.flush().with_context(|| format!("flush {}", tmp.display()))?;
    Ok(table.rows.len())
}

fn tmp_path_for(out_path: &Path) -> PathBuf {
    let mut name = out_path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".part");
    out_path.with_file_name(name)
}

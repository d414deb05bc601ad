//! Record flattening: one `RawRecord` expands into one row per session id,
//! then the whole row set is cleaned.

use crate::record::{FlatRow, RawRecord, ViewTimeRaw};

/// Text values treated as "no value" after trimming.
const NULL_SENTINELS: [&str; 3] = ["null", "None", "nan"];

/// Expand one record. Always yields at least one row.
///
/// With `demoUuids = [d1, d2, ..]` one row per id is emitted in order; only the first
/// keeps `senddemoUuid`, later rows carry it as empty. With no ids the `demoUuid`
/// fallback (possibly empty) fills the single row.
pub fn expand_record(record: &RawRecord) -> Vec<FlatRow> {
    let ext = &record.external_opportunity;
    let base = FlatRow {
        senddemo_uuid: text(&record.senddemo_uuid),
        demoboard_name: text(&record.demoboard_name),
        organization: text(&record.organization),
        view_time: coerce_view_time(&record.view_time),
        time_last_view: text(&record.time_last_view),
        external_account_id: text(&ext.account_id),
        external_opportunity_id: text(&ext.opportunity_id),
        external_account_name: text(&ext.account_name),
        external_opportunity_name: text(&ext.opportunity_name),
        demo_uuid: String::new(),
    };

    if record.demo_uuids.is_empty() {
        return vec![FlatRow { demo_uuid: text(&record.demo_uuid), ..base }];
    }

    record
        .demo_uuids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let mut row = base.clone();
            if i > 0 {
                row.senddemo_uuid.clear();
            }
            row.demo_uuid = text(id);
            row
        })
        .collect()
}

/// Flatten records in order, then clean the full row set: trim text, blank out
/// null sentinels, and drop rows that are empty in every column.
pub fn flatten(records: &[RawRecord]) -> Vec<FlatRow> {
    let mut rows: Vec<FlatRow> = records.iter().flat_map(expand_record).collect();
    let expanded = rows.len();

    for row in rows.iter_mut() {
        for cell in row.text_fields_mut() {
            normalize_text(cell);
        }
    }
    rows.retain(|r| !r.is_blank());

    if rows.len() != expanded {
        tracing::debug!("Dropped {} blank rows", expanded - rows.len());
    }
    tracing::info!("Flattened {} records into {} rows", records.len(), rows.len());
    rows
}

fn text(v: &Option<String>) -> String {
    v.clone().unwrap_or_default()
}

fn normalize_text(cell: &mut String) {
    let trimmed = cell.trim();
    if NULL_SENTINELS.contains(&trimmed) {
        cell.clear();
    } else if trimmed.len() != cell.len() {
        *cell = trimmed.to_string();
    }
}

/// Missing counts as 0; null or unparseable text stays unknown (`None`), not zero.
pub fn coerce_view_time(raw: &ViewTimeRaw) -> Option<f64> {
    match raw {
        ViewTimeRaw::Missing => Some(0.0),
        ViewTimeRaw::Null | ViewTimeRaw::Other => None,
        ViewTimeRaw::Number(n) => Some(*n),
        ViewTimeRaw::Text(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.parse::<f64>().ok().filter(|x| x.is_finite())
        }
    }
}

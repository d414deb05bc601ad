//! Summary projection: a fixed, renamed column subset of the detail table.

use crate::table::Table;

/// `(detail column, summary column)`, in summary output order.
pub const SUMMARY_COLUMNS: [(&str, &str); 6] = [
    ("senddemoUuid", "Demoboard_ID"),
    ("demoUuids", "Demo_IDs"),
    ("externalAccountId", "Salesforce_External_AccountId"),
    ("externalOpportunityId", "Salesforce_External_OppId"),
    ("viewTime", "View_Time_Seconds"),
    ("timeLastView", "Demoboard_View_Date"),
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Projection {
    pub table: Table,
    /// None of the summary source columns existed; `table` is the input unchanged.
    pub degenerate: bool,
}

/// Select and rename the summary columns that exist, in `SUMMARY_COLUMNS` order.
/// Row order and count are kept 1:1; rows sharing a demoboard id stay distinct.
pub fn project(input: &Table) -> Projection {
    let picks: Vec<(usize, &str)> = SUMMARY_COLUMNS
        .iter()
        .filter_map(|(src, dst)| input.column_index(src).map(|i| (i, *dst)))
        .collect();

    if picks.is_empty() {
        tracing::warn!("None of the summary columns are available; summary keeps the full table");
        return Projection { table: input.clone(), degenerate: true };
    }
    if picks.len() < SUMMARY_COLUMNS.len() {
        tracing::warn!("Summary is missing {} of {} columns", SUMMARY_COLUMNS.len() - picks.len(), SUMMARY_COLUMNS.len());
    }

    let mut out = Table::new(picks.iter().map(|(_, dst)| *dst));
    for row in &input.rows {
        out.push_row(picks.iter().map(|(i, _)| row.get(*i).cloned().unwrap_or_default()).collect());
    }

    tracing::info!("Created summary with {} rows", out.len());
    Projection { table: out, degenerate: false }
}

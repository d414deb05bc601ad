use anyhow::Result;
use demotrack::{init_tracing_once, DemoboardExport, ExportOptions, RunOutcome};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("Application error: {:#}", e);
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let opts = ExportOptions::from_env()?;
    init_tracing_once(&opts.log_level);
    tracing::info!("Starting demoboard report export");

    let report = DemoboardExport::http(opts.with_progress(true))?.run()?;

    match &report.outcome {
        RunOutcome::Exported { full_path, summary_path, rows, partial } => {
            if let Some(e) = partial {
                tracing::warn!("Export contains partial data: {}", e);
            }
            tracing::info!("Full data exported to: {}", full_path.display());
            tracing::info!("Summary data exported to: {}", summary_path.display());
            tracing::info!("Application completed successfully ({} rows)", rows);
        }
        RunOutcome::NoData => tracing::warn!("No data to export"),
        RunOutcome::FetchFailed(e) => tracing::error!("Failed to fetch data: {}", e),
        RunOutcome::PartialAborted(e) => tracing::error!("Fetch incomplete, nothing exported: {}", e),
    }

    Ok(if report.exit_code() == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

//! Progress reporting: a page spinner for the fetch loop.

use indicatif::{ProgressBar, ProgressStyle};

/// Spinner counting fetched pages and accumulated items, with an optional label.
pub fn make_page_spinner(label: Option<&str>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.green} {msg} pages: {pos}  elapsed: {elapsed_precise}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    if let Some(msg) = label {
        pb.set_message(msg.to_string());
    }
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

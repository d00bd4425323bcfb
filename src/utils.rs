//! Utility functions and helpers for rendering and URL handling

use crate::models::comparison::ComparisonResult;

/// Width used when shortening result texts in summary lines
pub const SUMMARY_WIDTH: usize = 30;

/// Join a base URL and an absolute path without doubling the slash
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim().trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Shorten `s` to at most `max` characters, appending `…` when cut
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let mut out: String = s.chars().take(max).collect();
        out.push('…');
        out
    } else {
        s.to_string()
    }
}

/// Render results as summary lines followed by the full text.
///
/// Returns an empty string when there is nothing to show.
pub fn render_results(results: &[ComparisonResult]) -> String {
    if results.is_empty() {
        return String::new();
    }

    let mut out = String::from("Results:\n");
    for (i, result) in results.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}. {:<width$}  {:.4}\n",
            i + 1,
            truncate(&result.text, SUMMARY_WIDTH),
            result.score,
            width = SUMMARY_WIDTH + 1
        ));
        if result.text.chars().count() > SUMMARY_WIDTH {
            out.push_str(&format!("     {}\n", result.text));
        }
    }
    out
}

//! Pure output formatting for terminal display.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::cli::orchestration::{ReleaseOutputs, WorkflowResult};

/// Display an error message to stderr
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Display a success message
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Display a status message
pub fn display_status(message: &str) {
    println!("{} {}", style("→").cyan(), message);
}

/// Display a boundary warning to stderr
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// One-line summary of a drafting run
pub fn format_summary(result: &WorkflowResult) -> String {
    let since = match &result.previous_tag {
        Some(tag) => format!("since {}", tag),
        None => "with no previous release".to_string(),
    };
    let action = match &result.published {
        Some(published) => format!("{} release {}", published.action, published.release.id),
        None => "Would draft".to_string(),
    };
    format!(
        "{} '{}' ({}) from {} pull requests {}",
        action,
        result.payload.name,
        result.payload.tag,
        result.pull_request_count,
        since
    )
}

/// Render outputs as `key=value` lines
///
/// Multi-line values use the heredoc form the runner's output file expects.
pub fn format_outputs(outputs: &ReleaseOutputs) -> String {
    let mut lines = Vec::new();
    let mut push = |key: &str, value: Option<String>| {
        let Some(value) = value else { return };
        if value.contains('\n') {
            let delimiter = heredoc_delimiter(key, &value);
            lines.push(format!("{}<<{}\n{}\n{}", key, delimiter, value, delimiter));
        } else {
            lines.push(format!("{}={}", key, value));
        }
    };

    push("id", outputs.id.map(|v| v.to_string()));
    push("html_url", outputs.html_url.clone());
    push("upload_url", outputs.upload_url.clone());
    push("tag_name", Some(outputs.tag_name.clone()));
    push("name", Some(outputs.name.clone()));
    push("body", Some(outputs.body.clone()));
    push("resolved_version", outputs.resolved_version.clone());
    push("major_version", outputs.major_version.map(|v| v.to_string()));
    push("minor_version", outputs.minor_version.map(|v| v.to_string()));
    push("patch_version", outputs.patch_version.map(|v| v.to_string()));

    lines.join("\n")
}

/// `EOF_<key>`, suffixed with a counter until it no longer occurs in `value`
fn heredoc_delimiter(key: &str, value: &str) -> String {
    let mut delimiter = format!("EOF_{}", key);
    let mut n = 0u32;
    while value.contains(&delimiter) {
        n += 1;
        delimiter = format!("EOF_{}_{}", key, n);
    }
    delimiter
}

//! Unified diff rendering for dry runs.

use owo_colors::OwoColorize;
use similar::TextDiff;

/// Render a unified diff between two texts.
pub fn unified_diff(old_label: &str, new_label: &str, old: &str, new: &str) -> String {
    TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(3)
        .header(old_label, new_label)
        .to_string()
}

/// Colorize a unified diff string when enabled.
pub fn colorize_diff(diff: &str, color: bool) -> String {
    if !color {
        return diff.to_string();
    }

    let mut output = String::new();
    for line in diff.lines() {
        let colored = if line.starts_with("+++") || line.starts_with("---") {
            line.bold().to_string()
        } else if line.starts_with("@@") {
            line.cyan().to_string()
        } else if line.starts_with('+') {
            line.green().to_string()
        } else if line.starts_with('-') {
            line.red().to_string()
        } else {
            line.to_string()
        };
        output.push_str(&colored);
        output.push('\n');
    }

    if !diff.ends_with('\n') && output.ends_with('\n') {
        output.pop();
    }

    output
}

/// Render the change a dry run would make to a file, or `None` if it would not change.
pub fn preview(label: &str, old: &str, new: &str, color: bool) -> Option<String> {
    if old == new {
        return None;
    }
    let diff = unified_diff(
        &format!("a/{label}"),
        &format!("b/{label}"),
        old,
        new,
    );
    Some(colorize_diff(&diff, color))
}

//! Color palette and styling for CLI output.
//!
//! Every command styles its output through these helpers so a single
//! `use_color` flag switches all coloring off.

use owo_colors::{OwoColorize, Style};

/// Style for resource and dependency names.
pub fn name() -> Style {
    Style::new().cyan().bold()
}

/// Style for section headings.
pub fn heading() -> Style {
    Style::new().white().bold()
}

/// Style for path values.
pub fn path() -> Style {
    Style::new().cyan()
}

/// Style for secondary text such as titles and hints.
pub fn description() -> Style {
    Style::new().dimmed()
}

/// Style for success markers and messages.
pub fn success() -> Style {
    Style::new().green()
}

/// Style for failure markers and messages.
pub fn failure() -> Style {
    Style::new().red().bold()
}

/// Style for warning text.
pub fn warning() -> Style {
    Style::new().yellow()
}

/// Apply a style when color is enabled.
fn styled(text: &str, style: Style, use_color: bool) -> String {
    if use_color {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}

/// Format a resource or dependency name.
pub fn fmt_name(text: &str, use_color: bool) -> String {
    styled(text, name(), use_color)
}

/// Format a section heading.
pub fn fmt_heading(text: &str, use_color: bool) -> String {
    styled(text, heading(), use_color)
}

/// Format a path.
pub fn fmt_path(text: &str, use_color: bool) -> String {
    styled(text, path(), use_color)
}

/// Format secondary text.
pub fn fmt_description(text: &str, use_color: bool) -> String {
    styled(text, description(), use_color)
}

/// Format a success message.
pub fn fmt_success(text: &str, use_color: bool) -> String {
    styled(text, success(), use_color)
}

/// Format a failure message.
pub fn fmt_failure(text: &str, use_color: bool) -> String {
    styled(text, failure(), use_color)
}

/// Format warning text.
pub fn fmt_warning(text: &str, use_color: bool) -> String {
    styled(text, warning(), use_color)
}

#[cfg(test)]
mod tests {
    use super::{fmt_failure, fmt_name};

    #[test]
    fn plain_when_color_disabled() {
        assert_eq!(fmt_name("apa.csl", false), "apa.csl");
        assert_eq!(fmt_failure("✗", false), "✗");
    }

    #[test]
    fn styles_when_color_enabled() {
        assert_ne!(fmt_name("apa.csl", true), "apa.csl");
    }
}

//! Warning aggregation and diagnostic summaries.

use std::path::{Path, PathBuf};

use tracing::debug;

/// Details about a skipped input file.
#[derive(Debug, Clone)]
pub struct SkippedFile {
    /// Path to the skipped file.
    pub(crate) path: PathBuf,
    /// Reason the file was skipped.
    pub(crate) reason: String,
}

/// Aggregates warnings and skipped files for a command run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    /// Whether verbose notes are printed.
    verbose: bool,
    /// Collected warning messages.
    warnings: Vec<String>,
    /// Collected skipped file records.
    skipped: Vec<SkippedFile>,
}

impl Diagnostics {
    /// Create a new diagnostics collector.
    pub(crate) fn new(verbose: bool) -> Self {
        Self {
            verbose,
            warnings: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Record a warning and print it immediately.
    pub(crate) fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        eprintln!("Warning: {message}");
        self.warnings.push(message);
    }

    /// Print a continuation line in verbose mode.
    pub(crate) fn note(&self, message: impl Into<String>) {
        let message = message.into();
        debug!("{message}");
        if self.verbose {
            eprintln!("{message}");
        }
    }

    /// Record a skipped file and emit the warning.
    pub(crate) fn warn_skipped(&mut self, path: &Path, reason: impl Into<String>) {
        let reason = reason.into();
        self.warn(format!("{} - {reason}", path.display()));
        self.skipped.push(SkippedFile {
            path: path.to_path_buf(),
            reason,
        });
    }

    /// Number of warnings recorded so far.
    pub(crate) fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Print a summary for skipped files if any were recorded.
    pub(crate) fn print_skipped_summary(&self) {
        if self.skipped.is_empty() {
            return;
        }

        eprintln!("Skipped {} file(s) due to errors:", self.skipped.len());
        for skipped in &self.skipped {
            eprintln!("  - {}: {}", skipped.path.display(), skipped.reason);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::Diagnostics;

    #[test]
    fn counts_skipped_files_as_warnings() {
        let mut diagnostics = Diagnostics::new(false);
        diagnostics.warn_skipped(Path::new("refs.bib"), "unreadable");
        diagnostics.warn("second");
        assert_eq!(diagnostics.warning_count(), 2);
        assert_eq!(diagnostics.skipped.len(), 1);
    }
}

//! Structured outcome reporting.
//!
//! Library and project operations describe what they did as [`Event`]s and
//! hand them to a [`Reporter`]; rendering is the reporter's business.

use std::path::PathBuf;

use crate::{
    error::Error,
    frontmatter::MergeOutcome,
    palette::{fmt_failure, fmt_name, fmt_path, fmt_success},
    paths::display_path,
};

/// A successful step of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A resource file was copied into the global library.
    ResourceAdded {
        /// Resource kind label.
        kind: String,
        /// Resource file name.
        name: String,
        /// Library directory.
        library: PathBuf,
    },
    /// A resource file was deleted from the global library.
    ResourceRemoved {
        /// Resource kind label.
        kind: String,
        /// Resource file name.
        name: String,
        /// Library directory.
        library: PathBuf,
    },
    /// A file was copied into a project.
    FileCopied {
        /// File name.
        name: String,
        /// Destination path.
        destination: PathBuf,
    },
    /// A frontmatter key was written.
    MetadataUpdated {
        /// Key that changed.
        key: String,
        /// Frontmatter document.
        file: PathBuf,
    },
    /// A frontmatter key already held the requested value.
    MetadataUnchanged {
        /// Key that was checked.
        key: String,
        /// Frontmatter document.
        file: PathBuf,
    },
    /// A directory was created.
    DirectoryCreated {
        /// Created directory.
        path: PathBuf,
    },
    /// A project file was written.
    FileWritten {
        /// Written file.
        path: PathBuf,
    },
}

impl Event {
    /// Build the metadata event matching a merge outcome.
    pub fn for_merge(outcome: MergeOutcome, key: &str, file: PathBuf) -> Self {
        if outcome.changed() {
            Self::MetadataUpdated {
                key: key.to_string(),
                file,
            }
        } else {
            Self::MetadataUnchanged {
                key: key.to_string(),
                file,
            }
        }
    }
}

/// Receives operation outcomes.
pub trait Reporter {
    /// Record a successful step.
    fn success(&mut self, event: Event);
    /// Record a failure that ends the invocation.
    fn failure(&mut self, error: &Error);
}

/// Reporter printing status lines to the terminal.
#[derive(Debug)]
pub struct ConsoleReporter {
    /// Whether to colorize output.
    use_color: bool,
}

impl ConsoleReporter {
    /// Create a console reporter.
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    /// Render an event as a single status line.
    fn render(&self, event: &Event) -> String {
        let color = self.use_color;
        let file_name = |path: &PathBuf| {
            path.file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| display_path(path))
        };
        match event {
            Event::ResourceAdded {
                kind,
                name,
                library,
            } => format!(
                "Added '{}' to the global {kind} library ({}).",
                fmt_name(name, color),
                fmt_path(&display_path(library), color)
            ),
            Event::ResourceRemoved {
                kind,
                name,
                library,
            } => format!(
                "Removed '{}' from the global {kind} library ({}).",
                fmt_name(name, color),
                fmt_path(&display_path(library), color)
            ),
            Event::FileCopied { name, destination } => format!(
                "Copied '{}' to {}.",
                fmt_name(name, color),
                fmt_path(&display_path(destination), color)
            ),
            Event::MetadataUpdated { key, file } => {
                format!("Updated '{key}' in {}.", file_name(file))
            }
            Event::MetadataUnchanged { key, file } => {
                format!("'{key}' in {} is already up to date.", file_name(file))
            }
            Event::DirectoryCreated { path } => {
                format!("Created {}", fmt_path(&display_path(path), color))
            }
            Event::FileWritten { path } => {
                format!("Wrote {}", fmt_path(&display_path(path), color))
            }
        }
    }
}

impl Reporter for ConsoleReporter {
    fn success(&mut self, event: Event) {
        println!(
            "{} {}",
            fmt_success("✓", self.use_color),
            self.render(&event)
        );
    }

    fn failure(&mut self, error: &Error) {
        eprintln!(
            "{} {}",
            fmt_failure("✗ Error:", self.use_color),
            error
        );
    }
}

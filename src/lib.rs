#![warn(missing_docs)]
//! Library support for the paw CLI.

/// Minimal BibTeX reading for citation lookup.
mod bibliography;
/// Command-line interface wiring and dispatch.
mod cli;
/// Command implementations.
mod commands;
/// Configuration loading and validation.
mod config;
/// Common diagnostics and warning aggregation.
mod diagnostics;
/// Unified diff rendering helpers.
mod diff;
/// Error handling for the crate.
mod error;
/// Comment-preserving YAML frontmatter editing.
mod frontmatter;
/// Global citation style and template libraries.
mod library;
/// Color palette and styling for CLI output.
mod palette;
/// Path expansion and normalization utilities.
mod paths;
/// Project root discovery.
mod project;
/// Structured outcome reporting.
mod report;
/// Project scaffolding from templates.
mod scaffold;
/// Test fixtures shared by unit tests.
#[cfg(test)]
mod testutil;

pub use crate::error::{Error, ErrorKind, Result};

/// Run the CLI, returning a structured error on failure.
///
/// The error has already been reported to the terminal when this returns.
pub fn run() -> Result<()> {
    cli::run()
}

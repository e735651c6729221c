//! CLI command implementations.

use std::{
    env,
    io::{self, IsTerminal},
    path::{Path, PathBuf},
};

use crate::{
    config::Config,
    diff,
    error::{Error, Result},
    library::{ResourceKind, ResourceLibrary, ResourceSpec},
    paths::display_path,
};

/// Output color handling selection.
#[derive(Debug, Clone, Copy)]
pub enum ColorChoice {
    /// Colorize only when output is a TTY.
    Auto,
    /// Always colorize output.
    Always,
    /// Never colorize output.
    Never,
}

impl ColorChoice {
    /// Determine whether color output should be enabled.
    pub(crate) fn enabled(self) -> bool {
        match self {
            Self::Auto => io::stdout().is_terminal(),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// Open the configured global library of one kind.
pub(crate) fn open_library(config: &Config, kind: ResourceKind) -> Result<ResourceLibrary> {
    ResourceLibrary::open(ResourceSpec::for_kind(kind, config.library_root()))
}

/// Return the current working directory.
pub(crate) fn current_dir() -> Result<PathBuf> {
    env::current_dir().map_err(|error| Error::CurrentDir { source: error })
}

/// Print the frontmatter change a dry run would make.
pub(crate) fn print_preview(path: &Path, root: &Path, old: &str, new: &str, color: bool) {
    let label = path
        .strip_prefix(root)
        .map(|relative| relative.to_string_lossy().replace('\\', "/"))
        .unwrap_or_else(|_| display_path(path));
    match diff::preview(&label, old, new, color) {
        Some(rendered) => print!("{rendered}"),
        None => println!("No changes to {label}."),
    }
}

// Command modules are ordered alphabetically - maintain this order.
/// Add command implementation.
pub mod add;
/// Check command implementation.
pub mod check;
/// Cite command implementation.
pub mod cite;
/// Init command implementation.
pub mod init;
/// New command implementation.
pub mod new;
/// Citation style and template command implementation.
pub mod resource;

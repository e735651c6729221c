//! Error types for the paw CLI.

use std::{
    env::VarError,
    io,
    path::PathBuf,
    process::ExitCode,
    result::Result as StdResult,
};

use thiserror::Error;
use toml::{de::Error as TomlError, ser::Error as TomlSerError};

/// Result type for paw operations.
pub type Result<T, E = Error> = StdResult<T, E>;

/// Errors that can occur while running the CLI.
#[derive(Debug, Error)]
pub enum Error {
    /// No project root was found above the start directory.
    #[error("Not inside a paw project: no Makefile and manuscript/ found above {start}")]
    ProjectNotFound {
        /// Directory the search started from.
        start: PathBuf,
    },
    /// The project root exists but its frontmatter document does not.
    #[error("Frontmatter file not found at {path}")]
    FrontmatterMissing {
        /// Expected frontmatter path.
        path: PathBuf,
    },
    /// A file given to `add` does not exist.
    #[error("File not found at {path}")]
    SourceMissing {
        /// Path that does not exist.
        path: PathBuf,
    },
    /// A file given to `add` has the wrong extension.
    #[error("{path} must be a '{expected}' file")]
    WrongExtension {
        /// Offending file.
        path: PathBuf,
        /// Extension required for the resource kind.
        expected: String,
    },
    /// A project title does not yield a usable directory name.
    #[error("Cannot derive a project directory name from title '{title}'")]
    InvalidTitle {
        /// Rejected title.
        title: String,
    },
    /// A resource name was not a plain file name.
    #[error("Invalid {kind} name '{name}': names must not contain path separators")]
    InvalidResourceName {
        /// Resource kind label.
        kind: String,
        /// Rejected name.
        name: String,
    },
    /// A named resource is not present in the global library.
    #[error("The {kind} '{name}' was not found in the global library at {library}")]
    ResourceNotFound {
        /// Resource kind label.
        kind: String,
        /// Normalized resource file name.
        name: String,
        /// Library directory that was searched.
        library: PathBuf,
    },
    /// A resource file could not be copied.
    #[error("Failed to copy {from} to {to}: {source}")]
    ResourceCopy {
        /// Copy source.
        from: PathBuf,
        /// Copy destination.
        to: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// A resource file could not be deleted.
    #[error("Failed to remove {path}: {source}")]
    ResourceRemove {
        /// Path that failed to delete.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// A library directory could not be created.
    #[error("Could not create library directory {path}: {source}")]
    LibraryCreate {
        /// Directory that failed to create.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// A library directory could not be listed.
    #[error("Failed to read library directory {path}: {message}")]
    LibraryRead {
        /// Directory that failed to list.
        path: PathBuf,
        /// Error message.
        message: String,
    },
    /// The resource was copied into the project but the metadata update failed.
    #[error("Copied {copied} but the frontmatter was not updated: {source}")]
    PartialUse {
        /// File left behind in the project resources directory.
        copied: PathBuf,
        /// The metadata failure.
        source: Box<Error>,
    },
    /// The frontmatter document could not be read.
    #[error("Failed to read frontmatter at {path}: {source}")]
    FrontmatterRead {
        /// Frontmatter path.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The frontmatter document is missing, empty, or invalid YAML.
    #[error("Failed to parse frontmatter at {path}: {message}")]
    FrontmatterParse {
        /// Frontmatter path.
        path: PathBuf,
        /// Parse error description.
        message: String,
    },
    /// A frontmatter key holds a value that cannot be merged.
    #[error("Cannot merge into '{key}' in {path}: {message}")]
    FrontmatterShape {
        /// Frontmatter path.
        path: PathBuf,
        /// Key being updated.
        key: String,
        /// Description of the unsupported shape.
        message: String,
    },
    /// The frontmatter document could not be written.
    #[error("Failed to write frontmatter at {path}: {source}")]
    FrontmatterWrite {
        /// Frontmatter path.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The configuration file could not be read.
    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The configuration file could not be parsed.
    #[error("Failed to parse config at {path}: {source}")]
    ConfigParse {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying parse error.
        source: TomlError,
    },
    /// The configuration file could not be serialized.
    #[error("Failed to serialize config: {source}")]
    ConfigSerialize {
        /// Underlying serialization error.
        source: TomlSerError,
    },
    /// The configuration file could not be written.
    #[error("Failed to write config at {path}: {source}")]
    ConfigWrite {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// Home directory resolution failed.
    #[error("Failed to resolve the home directory.")]
    HomeDirMissing,
    /// A configured path could not be expanded.
    #[error("Invalid path in config: {path}: {source}")]
    PathExpansion {
        /// Input path that failed to expand.
        path: String,
        /// Underlying expansion error.
        source: shellexpand::LookupError<VarError>,
    },
    /// The working directory could not be determined.
    #[error("Failed to determine the current directory: {source}")]
    CurrentDir {
        /// Underlying IO error.
        source: io::Error,
    },
    /// A project file or directory could not be written.
    #[error("Failed to write {path}: {source}")]
    ProjectWrite {
        /// Path that failed to write.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// A project template could not be rendered.
    #[error("Failed to render template {name}: {message}")]
    TemplateRender {
        /// Template name.
        name: String,
        /// Error message describing the render failure.
        message: String,
    },
    /// An interactive prompt was interrupted or canceled.
    #[error("Prompt canceled.")]
    PromptCanceled,
    /// An interactive prompt failed.
    #[error("Prompt failed: {message}")]
    PromptFailed {
        /// Error message describing the prompt failure.
        message: String,
    },
    /// Required external programs are not installed.
    #[error("Missing dependencies: {}", names.join(", "))]
    MissingDependencies {
        /// Programs that were not found on PATH.
        names: Vec<String>,
    },
}

/// Broad error categories shared by every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The project root or its frontmatter could not be found.
    NotFound,
    /// Input failed validation before anything was touched.
    Validation,
    /// A named resource is absent from the library.
    ResourceNotFound,
    /// The frontmatter could not be read or parsed.
    Parse,
    /// The frontmatter could not be persisted.
    Write,
    /// A filesystem copy or removal failed.
    Copy,
    /// Anything else: config, prompts, environment.
    Other,
}

impl Error {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ProjectNotFound { .. } | Self::FrontmatterMissing { .. } => ErrorKind::NotFound,
            Self::SourceMissing { .. }
            | Self::WrongExtension { .. }
            | Self::InvalidResourceName { .. }
            | Self::InvalidTitle { .. } => ErrorKind::Validation,
            Self::ResourceNotFound { .. } => ErrorKind::ResourceNotFound,
            Self::FrontmatterRead { .. }
            | Self::FrontmatterParse { .. }
            | Self::FrontmatterShape { .. } => ErrorKind::Parse,
            Self::FrontmatterWrite { .. } => ErrorKind::Write,
            Self::ResourceCopy { .. } | Self::ResourceRemove { .. } => ErrorKind::Copy,
            Self::PartialUse { source, .. } => source.kind(),
            _ => ErrorKind::Other,
        }
    }

    /// Map errors to exit codes for CLI termination.
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(1)
    }
}

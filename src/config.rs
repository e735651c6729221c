//! Configuration loading.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    paths,
};

/// Language used for new projects when none is configured.
pub const DEFAULT_LANG: &str = "en-US";

/// Author placeholder used for new projects when none is configured.
pub const DEFAULT_AUTHOR: &str = "Your Name";

/// Parsed configuration for the CLI.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base directory of the global resource library.
    library_root: PathBuf,
    /// Default author for new projects.
    author: Option<String>,
    /// Default document language for new projects.
    lang: String,
}

/// Raw config file structure.
#[derive(Debug, Default, Deserialize, Serialize)]
pub(crate) struct RawConfig {
    /// Library base directory, shell-expanded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) library: Option<String>,
    /// Default author name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) author: Option<String>,
    /// Default document language.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) lang: Option<String>,
}

impl Config {
    /// Build a config from explicit values.
    pub fn new(library_root: PathBuf, author: Option<String>, lang: impl Into<String>) -> Self {
        Self {
            library_root,
            author,
            lang: lang.into(),
        }
    }

    /// Load the default config from disk, falling back to defaults when absent.
    pub(crate) fn load() -> Result<Self> {
        let path = paths::default_config_path()?;
        Self::load_from(&path)
    }

    /// Load a config file from an explicit path.
    pub(crate) fn load_from(path: &Path) -> Result<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(contents) => {
                toml::from_str::<RawConfig>(&contents).map_err(|error| Error::ConfigParse {
                    path: path.to_path_buf(),
                    source: error,
                })?
            }
            Err(error) if error.kind() == ErrorKind::NotFound => RawConfig::default(),
            Err(error) => {
                return Err(Error::ConfigRead {
                    path: path.to_path_buf(),
                    source: error,
                });
            }
        };

        let base_dir = path.parent().unwrap_or(Path::new("."));
        let library_root = match raw.library.as_deref().map(str::trim) {
            Some(library) if !library.is_empty() => paths::expand_path(library, base_dir)?,
            _ => paths::default_library_root()?,
        };

        let author = raw
            .author
            .map(|author| author.trim().to_string())
            .filter(|author| !author.is_empty());
        let lang = raw
            .lang
            .map(|lang| lang.trim().to_string())
            .filter(|lang| !lang.is_empty())
            .unwrap_or_else(|| DEFAULT_LANG.to_string());

        Ok(Self::new(library_root, author, lang))
    }

    /// Return the library base directory.
    pub(crate) fn library_root(&self) -> &Path {
        &self.library_root
    }

    /// Return the author for new projects.
    pub(crate) fn author(&self) -> &str {
        self.author.as_deref().unwrap_or(DEFAULT_AUTHOR)
    }

    /// Return the document language for new projects.
    pub(crate) fn lang(&self) -> &str {
        &self.lang
    }
}

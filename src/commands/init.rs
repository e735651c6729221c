//! Implementation of the `paw init` command.

use std::{fs, path::Path};

use inquire::{Text, error::InquireError};

use crate::{
    config::{DEFAULT_LANG, RawConfig},
    error::{Error, Result},
    library::ResourceKind,
    paths::{default_config_path, default_library_root, display_path, expand_path},
    report::{Event, Reporter},
};

/// Execute the init command.
pub fn run(reporter: &mut dyn Reporter) -> Result<()> {
    let config_path = default_config_path()?;
    if config_path.is_file() {
        println!("Config already exists at {}", display_path(&config_path));
        return Ok(());
    }

    let config_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let default_library = display_path(&default_library_root()?);

    let library = prompt("Global resource library", Some(default_library.as_str()))?;
    let library = if library.is_empty() {
        default_library
    } else {
        library
    };
    let author = prompt("Default author for new projects", None)?;
    let lang = prompt("Default document language", Some(DEFAULT_LANG))?;

    let library_root = expand_path(&library, config_dir)?;
    create_library(&library_root, reporter)?;

    let raw = RawConfig {
        library: Some(library),
        author: Some(author).filter(|author| !author.is_empty()),
        lang: Some(lang).filter(|lang| !lang.is_empty() && lang != DEFAULT_LANG),
    };
    write_config(&config_path, &raw)?;
    reporter.success(Event::FileWritten { path: config_path });
    Ok(())
}

/// Create the library directory for every resource kind.
fn create_library(library_root: &Path, reporter: &mut dyn Reporter) -> Result<()> {
    for kind in ResourceKind::all() {
        let dir = kind.library_dir(library_root);
        if dir.is_dir() {
            continue;
        }
        fs::create_dir_all(&dir).map_err(|error| Error::LibraryCreate {
            path: dir.clone(),
            source: error,
        })?;
        reporter.success(Event::DirectoryCreated { path: dir });
    }
    Ok(())
}

/// Serialize and write the config file, creating its directory.
fn write_config(config_path: &Path, raw: &RawConfig) -> Result<()> {
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).map_err(|error| Error::ConfigWrite {
            path: parent.to_path_buf(),
            source: error,
        })?;
    }

    let contents =
        toml::to_string(raw).map_err(|error| Error::ConfigSerialize { source: error })?;
    fs::write(config_path, contents).map_err(|error| Error::ConfigWrite {
        path: config_path.to_path_buf(),
        source: error,
    })
}

/// Prompt for a line of text, returning it trimmed.
fn prompt(message: &str, default: Option<&str>) -> Result<String> {
    let mut text = Text::new(message);
    if let Some(default) = default {
        text = text.with_default(default);
    }
    match text.prompt() {
        Ok(value) => Ok(value.trim().to_string()),
        Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => {
            Err(Error::PromptCanceled)
        }
        Err(error) => Err(Error::PromptFailed {
            message: error.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::{create_library, write_config};
    use crate::{
        config::{Config, RawConfig},
        testutil::RecordingReporter,
    };

    #[test]
    fn written_config_loads_back() {
        let dir = tempdir().expect("tempdir");
        let config_path = dir.path().join(".paw.toml");
        let raw = RawConfig {
            library: Some("library".to_string()),
            author: Some("Ada Lovelace".to_string()),
            lang: None,
        };

        write_config(&config_path, &raw).expect("write");
        let contents = fs::read_to_string(&config_path).expect("read");
        assert!(!contents.contains("lang"));

        fs::create_dir_all(dir.path().join("library")).expect("create library");
        let config = Config::load_from(&config_path).expect("load");
        assert_eq!(config.author(), "Ada Lovelace");
        assert_eq!(config.lang(), "en-US");
        assert!(config.library_root().ends_with("library"));
    }

    #[test]
    fn creates_both_library_directories_once() {
        let dir = tempdir().expect("tempdir");
        let mut reporter = RecordingReporter::default();

        create_library(dir.path(), &mut reporter).expect("create");
        create_library(dir.path(), &mut reporter).expect("create again");

        assert!(dir.path().join("csl").is_dir());
        assert!(dir.path().join("templates").is_dir());
        assert_eq!(reporter.events.len(), 2);
    }
}

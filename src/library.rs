//! Global resource library for citation styles and document templates.
//!
//! Both kinds share one implementation; a [`ResourceSpec`] supplies the
//! parts that differ: label, extension, directory and frontmatter key.

use std::{
    fs,
    path::{Path, PathBuf},
    vec,
};

use tracing::debug;
use walkdir::WalkDir;

use crate::{
    error::{Error, Result},
    frontmatter,
    paths::normalize_path,
    project::{ProjectPaths, locate_project},
    report::{Event, Reporter},
};

/// Built-in resource kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Citation Style Language files.
    CitationStyle,
    /// Word reference documents.
    Template,
}

impl ResourceKind {
    /// Return all resource kinds.
    pub fn all() -> [Self; 2] {
        [Self::CitationStyle, Self::Template]
    }

    /// Human-readable label used in messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::CitationStyle => "citation style",
            Self::Template => "template",
        }
    }

    /// Required file extension, including the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::CitationStyle => ".csl",
            Self::Template => ".docx",
        }
    }

    /// Library subdirectory name.
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::CitationStyle => "csl",
            Self::Template => "templates",
        }
    }

    /// Frontmatter key recording the active resource.
    pub fn metadata_key(self) -> &'static str {
        match self {
            Self::CitationStyle => "csl",
            Self::Template => "reference-doc",
        }
    }

    /// Library directory for this kind below a library root.
    pub fn library_dir(self, library_root: &Path) -> PathBuf {
        library_root.join(self.dir_name())
    }
}

/// Settings distinguishing one resource library from another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSpec {
    /// Label used in messages.
    pub label: String,
    /// Required extension, including the dot.
    pub extension: String,
    /// Directory holding the resources.
    pub library_dir: PathBuf,
    /// Frontmatter key set by `use`.
    pub metadata_key: String,
}

impl ResourceSpec {
    /// Build the settings for a built-in kind below a library root.
    pub fn for_kind(kind: ResourceKind, library_root: &Path) -> Self {
        Self {
            label: kind.label().to_string(),
            extension: kind.extension().to_string(),
            library_dir: kind.library_dir(library_root),
            metadata_key: kind.metadata_key().to_string(),
        }
    }
}

/// Iterator over resource file names, sorted alphabetically.
pub type ResourceItems = vec::IntoIter<String>;

/// A global library of resource files of one kind.
#[derive(Debug, Clone)]
pub struct ResourceLibrary {
    /// Library settings.
    spec: ResourceSpec,
}

impl ResourceLibrary {
    /// Open a library, creating its directory if needed.
    pub fn open(spec: ResourceSpec) -> Result<Self> {
        if !spec.library_dir.is_dir() {
            debug!(path = %spec.library_dir.display(), "creating library directory");
            fs::create_dir_all(&spec.library_dir).map_err(|error| Error::LibraryCreate {
                path: spec.library_dir.clone(),
                source: error,
            })?;
        }
        Ok(Self { spec })
    }

    /// Return the library settings.
    pub fn spec(&self) -> &ResourceSpec {
        &self.spec
    }

    /// Return the library directory.
    pub fn dir(&self) -> &Path {
        &self.spec.library_dir
    }

    /// Normalize a user-supplied name to a file name with the extension.
    pub fn normalize_name(&self, name: &str) -> Result<String> {
        let is_plain = Path::new(name)
            .file_name()
            .is_some_and(|file_name| file_name == name);
        if !is_plain || name.contains(['/', '\\']) {
            return Err(Error::InvalidResourceName {
                kind: self.spec.label.clone(),
                name: name.to_string(),
            });
        }

        if name.ends_with(&self.spec.extension) {
            Ok(name.to_string())
        } else {
            Ok(format!("{name}{}", self.spec.extension))
        }
    }

    /// Resolve a name to an existing library file.
    pub fn resolve(&self, name: &str) -> Result<(String, PathBuf)> {
        let name = self.normalize_name(name)?;
        let path = self.spec.library_dir.join(&name);
        if !path.is_file() {
            return Err(Error::ResourceNotFound {
                kind: self.spec.label.clone(),
                name,
                library: self.spec.library_dir.clone(),
            });
        }
        Ok((name, path))
    }

    /// Copy a file into the library, replacing any file of the same name.
    pub fn add(&self, source: &Path, reporter: &mut dyn Reporter) -> Result<PathBuf> {
        if !source.exists() {
            return Err(Error::SourceMissing {
                path: source.to_path_buf(),
            });
        }

        let file_name = source
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .filter(|name| has_extension(name, &self.spec.extension))
            .ok_or_else(|| Error::WrongExtension {
                path: source.to_path_buf(),
                expected: self.spec.extension.clone(),
            })?;

        let destination = self.spec.library_dir.join(&file_name);
        copy_file(source, &destination)?;
        reporter.success(Event::ResourceAdded {
            kind: self.spec.label.clone(),
            name: file_name,
            library: self.spec.library_dir.clone(),
        });
        Ok(destination)
    }

    /// Delete a resource from the library.
    pub fn remove(&self, name: &str, reporter: &mut dyn Reporter) -> Result<()> {
        let (name, path) = self.resolve(name)?;
        fs::remove_file(&path).map_err(|error| Error::ResourceRemove {
            path: path.clone(),
            source: error,
        })?;
        reporter.success(Event::ResourceRemoved {
            kind: self.spec.label.clone(),
            name,
            library: self.spec.library_dir.clone(),
        });
        Ok(())
    }

    /// List resource file names currently in the library.
    ///
    /// Each call reads the directory afresh.
    pub fn list_items(&self) -> Result<ResourceItems> {
        let mut items = Vec::new();
        for entry in WalkDir::new(&self.spec.library_dir)
            .min_depth(1)
            .max_depth(1)
        {
            let entry = entry.map_err(|error| Error::LibraryRead {
                path: self.spec.library_dir.clone(),
                message: error.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if has_extension(&name, &self.spec.extension) {
                items.push(name);
            }
        }
        items.sort();
        Ok(items.into_iter())
    }

    /// Copy a resource into the project containing `start` and select it in the frontmatter.
    pub fn use_in(
        &self,
        name: &str,
        start: &Path,
        reporter: &mut dyn Reporter,
    ) -> Result<ProjectPaths> {
        let (name, source) = self.resolve(name)?;
        let project = locate_project(start)?;

        fs::create_dir_all(&project.resources).map_err(|error| Error::ResourceCopy {
            from: source.clone(),
            to: project.resources.clone(),
            source: error,
        })?;
        let destination = project.resources.join(&name);
        copy_file(&source, &destination)?;
        reporter.success(Event::FileCopied {
            name: name.clone(),
            destination: destination.clone(),
        });

        let key = &self.spec.metadata_key;
        let changed = frontmatter::set_value(&project.frontmatter, key, &name).map_err(|error| {
            Error::PartialUse {
                copied: destination,
                source: Box::new(error),
            }
        })?;
        let file = project.frontmatter.clone();
        reporter.success(if changed {
            Event::MetadataUpdated {
                key: key.clone(),
                file,
            }
        } else {
            Event::MetadataUnchanged {
                key: key.clone(),
                file,
            }
        });
        Ok(project)
    }
}

/// Whether a file name carries the extension with a non-empty stem.
fn has_extension(name: &str, extension: &str) -> bool {
    name.len() > extension.len() && name.ends_with(extension)
}

/// Copy one file, overwriting the destination.
///
/// Copying a file onto itself is a no-op; `fs::copy` would truncate it.
pub(crate) fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if normalize_path(from) == normalize_path(to) {
        debug!(path = %to.display(), "source is already in place");
        return Ok(());
    }
    debug!(from = %from.display(), to = %to.display(), "copying file");
    fs::copy(from, to).map_err(|error| Error::ResourceCopy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source: error,
    })?;
    Ok(())
}

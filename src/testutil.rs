//! Test utilities for setting up mock library and project environments.
//!
//! This module provides a `TestFixture` builder for creating isolated test
//! environments with a global library, a project and loose source files.

#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::TempDir;

use crate::{
    error::Error,
    library::{ResourceKind, ResourceLibrary, ResourceSpec},
    project::{BUILD_FILE, FIGURES_DIR, FRONTMATTER_FILE, MANUSCRIPT_DIR, RESOURCES_DIR},
    report::{Event, Reporter},
};

/// Test fixture for creating isolated library and project environments.
///
/// The library root is not created up front so lazy creation stays observable.
pub struct TestFixture {
    /// Root temp directory (holds everything).
    _root: TempDir,
    /// Global library root (simulates ~/.paw).
    library_root: PathBuf,
    /// Working directory outside any project.
    work_dir: PathBuf,
    /// Project root directory, populated by `with_project`.
    project_root: PathBuf,
    /// Directory holding loose source files.
    downloads_dir: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with an empty working directory.
    pub fn new() -> Self {
        let root = TempDir::new().expect("create temp dir");
        let root_path = root.path();

        let work_dir = root_path.join("work");
        fs::create_dir_all(&work_dir).expect("create work dir");

        let downloads_dir = root_path.join("downloads");
        fs::create_dir_all(&downloads_dir).expect("create downloads dir");

        Self {
            library_root: root_path.join("library"),
            project_root: root_path.join("paper"),
            work_dir,
            downloads_dir,
            _root: root,
        }
    }

    /// Create a project with the given frontmatter document contents.
    pub fn with_project(self, frontmatter: &str) -> Self {
        let manuscript = self.project_root.join(MANUSCRIPT_DIR);
        fs::create_dir_all(&manuscript).expect("create manuscript dir");
        fs::create_dir_all(self.project_root.join(RESOURCES_DIR)).expect("create resources dir");
        fs::create_dir_all(self.project_root.join(FIGURES_DIR)).expect("create figures dir");
        fs::write(self.project_root.join(BUILD_FILE), "all:\n").expect("write makefile");
        fs::write(manuscript.join(FRONTMATTER_FILE), frontmatter).expect("write frontmatter");
        self
    }

    /// Add a file to the global library of the given kind.
    pub fn with_library_item(self, kind: ResourceKind, name: &str, contents: &str) -> Self {
        let dir = kind.library_dir(&self.library_root);
        fs::create_dir_all(&dir).expect("create library dir");
        fs::write(dir.join(name), contents).expect("write library item");
        self
    }

    /// Add a project resource file.
    pub fn with_project_resource(self, name: &str, contents: &str) -> Self {
        let dir = self.project_root.join(RESOURCES_DIR);
        fs::create_dir_all(&dir).expect("create resources dir");
        fs::write(dir.join(name), contents).expect("write resource");
        self
    }

    /// Write a loose file outside the library and project, returning its path.
    pub fn source_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.downloads_dir.join(name);
        fs::write(&path, contents).expect("write source file");
        path
    }

    /// Open the library of the given kind below the fixture's library root.
    pub fn library(&self, kind: ResourceKind) -> ResourceLibrary {
        ResourceLibrary::open(ResourceSpec::for_kind(kind, &self.library_root))
            .expect("open library")
    }

    /// Get the global library root.
    pub fn library_root(&self) -> &Path {
        &self.library_root
    }

    /// Get the working directory, which is not inside a project.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Get the project root directory.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Get the frontmatter document path.
    pub fn frontmatter_path(&self) -> PathBuf {
        self.project_root.join(MANUSCRIPT_DIR).join(FRONTMATTER_FILE)
    }

    /// Read the frontmatter document.
    pub fn read_frontmatter(&self) -> String {
        fs::read_to_string(self.frontmatter_path()).expect("read frontmatter")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Reporter that records every outcome for later assertions.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    /// Recorded success events, in order.
    pub events: Vec<Event>,
    /// Recorded failure messages, in order.
    pub failures: Vec<String>,
}

impl Reporter for RecordingReporter {
    fn success(&mut self, event: Event) {
        self.events.push(event);
    }

    fn failure(&mut self, error: &Error) {
        self.failures.push(error.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_empty_fixture() {
        let fixture = TestFixture::new();
        assert!(fixture.work_dir().is_dir());
        assert!(!fixture.library_root().exists());
        assert!(!fixture.project_root().exists());
    }

    #[test]
    fn adds_project_and_library_items() {
        let fixture = TestFixture::new()
            .with_project("---\ntitle: T\n---\n")
            .with_library_item(ResourceKind::CitationStyle, "apa.csl", "");

        assert!(fixture.project_root().join("Makefile").is_file());
        assert_eq!(fixture.read_frontmatter(), "---\ntitle: T\n---\n");
        assert!(fixture.library_root().join("csl").join("apa.csl").is_file());
    }
}

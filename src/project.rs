//! Project root discovery and well-known project paths.

use std::{
    env,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    error::{Error, Result},
    paths::normalize_path,
};

/// Build automation file marking a project root.
pub const BUILD_FILE: &str = "Makefile";
/// Directory holding the manuscript chapters.
pub const MANUSCRIPT_DIR: &str = "manuscript";
/// Directory holding citation styles, bibliographies and templates.
pub const RESOURCES_DIR: &str = "resources";
/// Directory holding figures.
pub const FIGURES_DIR: &str = "figures";
/// Directory receiving compiled documents.
pub const OUTPUT_DIR: &str = "output";
/// Frontmatter document name inside the manuscript directory.
pub const FRONTMATTER_FILE: &str = "00-frontmatter.md";
/// Number of directories examined, starting with the start directory itself.
pub const MAX_SEARCH_DEPTH: usize = 8;

/// Paths of a located project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    /// Project root directory.
    pub root: PathBuf,
    /// Manuscript directory.
    pub manuscript: PathBuf,
    /// Resources directory.
    pub resources: PathBuf,
    /// Figures directory.
    pub figures: PathBuf,
    /// Frontmatter document.
    pub frontmatter: PathBuf,
}

impl ProjectPaths {
    /// Derive the well-known paths below a project root.
    pub fn from_root(root: &Path) -> Self {
        let manuscript = root.join(MANUSCRIPT_DIR);
        Self {
            root: root.to_path_buf(),
            frontmatter: manuscript.join(FRONTMATTER_FILE),
            manuscript,
            resources: root.join(RESOURCES_DIR),
            figures: root.join(FIGURES_DIR),
        }
    }
}

/// Whether a directory looks like a project root.
fn is_project_root(dir: &Path) -> bool {
    dir.join(BUILD_FILE).exists() && dir.join(MANUSCRIPT_DIR).is_dir()
}

/// Find the nearest project root at or above `start`.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = normalize_path(start);
    for _ in 0..MAX_SEARCH_DEPTH {
        if is_project_root(&current) {
            return Some(current);
        }
        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => break,
        }
    }
    None
}

/// Locate the project containing `start` and check its frontmatter exists.
pub fn locate_project(start: &Path) -> Result<ProjectPaths> {
    let root = find_project_root(start).ok_or_else(|| Error::ProjectNotFound {
        start: start.to_path_buf(),
    })?;
    debug!(root = %root.display(), "located project");

    let paths = ProjectPaths::from_root(&root);
    if !paths.frontmatter.is_file() {
        return Err(Error::FrontmatterMissing {
            path: paths.frontmatter,
        });
    }
    Ok(paths)
}

/// Locate the project containing the current working directory.
pub fn locate_current_project() -> Result<ProjectPaths> {
    let cwd = env::current_dir().map_err(|error| Error::CurrentDir { source: error })?;
    locate_project(&cwd)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::{MAX_SEARCH_DEPTH, find_project_root, locate_project};
    use crate::{
        error::{Error, ErrorKind},
        paths::normalize_path,
        testutil::TestFixture,
    };

    #[test]
    fn finds_root_from_nested_directory() {
        let fixture = TestFixture::new().with_project("---\ntitle: T\n---\n");
        let nested = fixture.project_root().join("manuscript").join("chapters");
        fs::create_dir_all(&nested).expect("create nested");

        let paths = locate_project(&nested).expect("project");
        assert_eq!(paths.root, normalize_path(fixture.project_root()));
        assert!(paths.frontmatter.ends_with("manuscript/00-frontmatter.md"));
        assert!(paths.resources.ends_with("resources"));
        assert!(paths.figures.ends_with("figures"));
    }

    #[test]
    fn prefers_nearest_root() {
        let fixture = TestFixture::new().with_project("---\ntitle: Outer\n---\n");
        let inner = fixture.project_root().join("figures").join("inner");
        fs::create_dir_all(inner.join("manuscript")).expect("create inner manuscript");
        fs::write(inner.join("Makefile"), "all:\n").expect("write makefile");

        let root = find_project_root(&inner).expect("root");
        assert_eq!(root, normalize_path(&inner));
    }

    #[test]
    fn accepts_any_makefile_entry() {
        let dir = tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("manuscript")).expect("create manuscript");
        fs::create_dir_all(dir.path().join("Makefile")).expect("create makefile dir");

        let root = find_project_root(dir.path()).expect("root");
        assert_eq!(root, normalize_path(dir.path()));
    }

    #[test]
    fn reports_not_found_without_markers() {
        let dir = tempdir().expect("tempdir");
        // A manuscript directory alone is not enough.
        fs::create_dir_all(dir.path().join("manuscript")).expect("create manuscript");

        let error = locate_project(dir.path()).expect_err("no project");
        assert!(matches!(error, Error::ProjectNotFound { .. }));
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn stops_after_search_depth() {
        let fixture = TestFixture::new().with_project("---\ntitle: T\n---\n");
        let mut deep = fixture.project_root().to_path_buf();
        for level in 0..MAX_SEARCH_DEPTH {
            deep = deep.join(format!("level{level}"));
        }
        fs::create_dir_all(&deep).expect("create deep");

        assert!(find_project_root(&deep).is_none());
        let shallower = deep.parent().expect("parent");
        assert!(find_project_root(shallower).is_some());
    }

    #[test]
    fn missing_frontmatter_is_fatal() {
        let fixture = TestFixture::new().with_project("---\ntitle: T\n---\n");
        fs::remove_file(fixture.frontmatter_path()).expect("remove frontmatter");

        let error = locate_project(fixture.project_root()).expect_err("missing frontmatter");
        assert!(matches!(error, Error::FrontmatterMissing { .. }));
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }
}

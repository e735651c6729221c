//! Project scaffolding from embedded templates.

use std::{
    fs,
    path::{Path, PathBuf},
};

use minijinja::{Environment, UndefinedBehavior, context};
use tracing::debug;

use crate::{
    error::{Error, Result},
    frontmatter::{double_quoted, plain_scalar},
    project::{
        BUILD_FILE, FIGURES_DIR, FRONTMATTER_FILE, MANUSCRIPT_DIR, OUTPUT_DIR, RESOURCES_DIR,
    },
    report::{Event, Reporter},
};

/// Directories created below a new project root.
const PROJECT_DIRS: [&str; 4] = [MANUSCRIPT_DIR, RESOURCES_DIR, FIGURES_DIR, OUTPUT_DIR];

/// Embedded templates keyed by name.
const TEMPLATES: &[(&str, &str)] = &[
    ("Makefile.j2", include_str!("templates/Makefile.j2")),
    ("gitignore.j2", include_str!("templates/gitignore.j2")),
    ("README.md.j2", include_str!("templates/README.md.j2")),
    ("frontmatter.md.j2", include_str!("templates/frontmatter.md.j2")),
    ("introduction.md.j2", include_str!("templates/introduction.md.j2")),
    ("bibliography.bib.j2", include_str!("templates/bibliography.bib.j2")),
];

/// Values substituted into the project templates.
#[derive(Debug, Clone)]
pub struct ProjectSettings {
    /// Document title.
    pub title: String,
    /// Initial author.
    pub author: String,
    /// Document language.
    pub lang: String,
    /// Global library root referenced by the Makefile.
    pub library_root: PathBuf,
}

/// A rendered project file, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFile {
    /// Path relative to the project root.
    pub path: PathBuf,
    /// Rendered contents.
    pub contents: String,
}

/// Derive a directory name from a title.
pub fn slugify(title: &str) -> Result<String> {
    let slug = title
        .trim()
        .to_lowercase()
        .replace([' ', ':'], "-")
        .replace('?', "");
    if slug.is_empty() || slug == "." || slug == ".." || slug.contains(['/', '\\']) {
        return Err(Error::InvalidTitle {
            title: title.to_string(),
        });
    }
    Ok(slug)
}

/// Render every project file.
pub fn render_files(name: &str, settings: &ProjectSettings) -> Result<Vec<ProjectFile>> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_keep_trailing_newline(true);
    for &(template_name, source) in TEMPLATES {
        env.add_template(template_name, source)
            .map_err(|error| Error::TemplateRender {
                name: template_name.to_string(),
                message: error.to_string(),
            })?;
    }

    let library = makefile_path(&settings.library_root, dirs::home_dir().as_deref());
    let values = context! {
        name => name,
        title => double_quoted(&settings.title),
        author => plain_scalar(&settings.author),
        lang => plain_scalar(&settings.lang),
        library => library,
    };

    let manuscript = Path::new(MANUSCRIPT_DIR);
    let targets = [
        (PathBuf::from(BUILD_FILE), "Makefile.j2"),
        (PathBuf::from(".gitignore"), "gitignore.j2"),
        (PathBuf::from("README.md"), "README.md.j2"),
        (manuscript.join(FRONTMATTER_FILE), "frontmatter.md.j2"),
        (manuscript.join("01-introduction.md"), "introduction.md.j2"),
        (
            Path::new(RESOURCES_DIR).join("bibliography.bib"),
            "bibliography.bib.j2",
        ),
    ];

    targets
        .into_iter()
        .map(|(path, template_name)| {
            let render_error = |error: minijinja::Error| Error::TemplateRender {
                name: template_name.to_string(),
                message: error.to_string(),
            };
            let contents = env
                .get_template(template_name)
                .and_then(|template| template.render(&values))
                .map_err(render_error)?;
            Ok(ProjectFile { path, contents })
        })
        .collect()
}

/// Create a project at `root`, overwriting any files it already holds.
pub fn create_project(
    root: &Path,
    settings: &ProjectSettings,
    reporter: &mut dyn Reporter,
) -> Result<()> {
    let name = root
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| settings.title.clone());
    let files = render_files(&name, settings)?;

    for dir in PROJECT_DIRS {
        create_dir(&root.join(dir))?;
    }
    reporter.success(Event::DirectoryCreated {
        path: root.to_path_buf(),
    });

    for file in files {
        let path = root.join(&file.path);
        debug!(path = %path.display(), "writing project file");
        fs::write(&path, &file.contents).map_err(|error| Error::ProjectWrite {
            path: path.clone(),
            source: error,
        })?;
        reporter.success(Event::FileWritten { path });
    }
    Ok(())
}

/// Create a directory and its parents.
fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|error| Error::ProjectWrite {
        path: path.to_path_buf(),
        source: error,
    })
}

/// Express a library path for the Makefile, relative to `$(HOME)` when possible.
fn makefile_path(library_root: &Path, home: Option<&Path>) -> String {
    if let Some(home) = home
        && let Ok(relative) = library_root.strip_prefix(home)
    {
        if relative.as_os_str().is_empty() {
            return "$(HOME)".to_string();
        }
        return format!("$(HOME)/{}", relative.to_string_lossy().replace('\\', "/"));
    }
    library_root.to_string_lossy().to_string()
}

//! Implementation of the `paw add` commands.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    commands::{ColorChoice, current_dir, print_preview},
    error::{Error, Result},
    frontmatter::{self, MergeOutcome},
    library::copy_file,
    palette::fmt_path,
    paths::display_path,
    project::{ProjectPaths, RESOURCES_DIR, locate_project},
    report::{Event, Reporter},
};

/// Frontmatter key listing bibliography files.
const BIBLIOGRAPHY_KEY: &str = "bibliography";
/// Frontmatter key listing authors.
const AUTHOR_KEY: &str = "author";
/// Extension required for bibliography files.
const BIB_EXTENSION: &str = ".bib";

/// Execute `add bib`.
pub fn bib(
    color: ColorChoice,
    reporter: &mut dyn Reporter,
    file: PathBuf,
    dry_run: bool,
) -> Result<()> {
    let cwd = current_dir()?;
    if dry_run {
        let (project, file_name) = prepare_bibliography(&cwd, &file)?;
        let use_color = color.enabled();
        println!(
            "Would copy {} to {}",
            fmt_path(&display_path(&file), use_color),
            fmt_path(&display_path(&project.resources.join(&file_name)), use_color)
        );
        return preview_merge(&project, BIBLIOGRAPHY_KEY, &bibliography_entry(&file_name), use_color);
    }
    add_bibliography(&cwd, &file, reporter)?;
    Ok(())
}

/// Execute `add author`.
pub fn author(
    color: ColorChoice,
    reporter: &mut dyn Reporter,
    name: String,
    dry_run: bool,
) -> Result<()> {
    let cwd = current_dir()?;
    if dry_run {
        let project = locate_project(&cwd)?;
        return preview_merge(&project, AUTHOR_KEY, &name, color.enabled());
    }
    add_author(&cwd, &name, reporter)?;
    Ok(())
}

/// Copy a bibliography into the project and list it in the frontmatter.
pub(crate) fn add_bibliography(
    start: &Path,
    file: &Path,
    reporter: &mut dyn Reporter,
) -> Result<MergeOutcome> {
    let (project, file_name) = prepare_bibliography(start, file)?;

    fs::create_dir_all(&project.resources).map_err(|error| Error::ResourceCopy {
        from: file.to_path_buf(),
        to: project.resources.clone(),
        source: error,
    })?;
    let destination = project.resources.join(&file_name);
    copy_file(file, &destination)?;
    reporter.success(Event::FileCopied {
        name: file_name.clone(),
        destination: destination.clone(),
    });

    let outcome = frontmatter::merge_list_value(
        &project.frontmatter,
        BIBLIOGRAPHY_KEY,
        &bibliography_entry(&file_name),
    )
    .map_err(|error| Error::PartialUse {
        copied: destination,
        source: Box::new(error),
    })?;
    reporter.success(Event::for_merge(
        outcome,
        BIBLIOGRAPHY_KEY,
        project.frontmatter,
    ));
    Ok(outcome)
}

/// Add an author to the project frontmatter.
pub(crate) fn add_author(
    start: &Path,
    name: &str,
    reporter: &mut dyn Reporter,
) -> Result<MergeOutcome> {
    let project = locate_project(start)?;
    let outcome = frontmatter::merge_list_value(&project.frontmatter, AUTHOR_KEY, name)?;
    reporter.success(Event::for_merge(outcome, AUTHOR_KEY, project.frontmatter));
    Ok(outcome)
}

/// Validate a bibliography file and locate the project it is added to.
fn prepare_bibliography(start: &Path, file: &Path) -> Result<(ProjectPaths, String)> {
    if !file.is_file() {
        return Err(Error::SourceMissing {
            path: file.to_path_buf(),
        });
    }
    let file_name = file
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .filter(|name| name.len() > BIB_EXTENSION.len() && name.ends_with(BIB_EXTENSION))
        .ok_or_else(|| Error::WrongExtension {
            path: file.to_path_buf(),
            expected: BIB_EXTENSION.to_string(),
        })?;
    let project = locate_project(start)?;
    Ok((project, file_name))
}

/// Frontmatter entry for a bibliography copied into the resources directory.
fn bibliography_entry(file_name: &str) -> String {
    format!("{RESOURCES_DIR}/{file_name}")
}

/// Print the diff a list merge would produce.
fn preview_merge(project: &ProjectPaths, key: &str, value: &str, use_color: bool) -> Result<()> {
    let mut document = frontmatter::load(&project.frontmatter)?;
    let original = document.as_str().to_string();
    document
        .merge_list_value(key, value)
        .map_err(|error| error.into_error(&project.frontmatter, key))?;
    print_preview(
        &project.frontmatter,
        &project.root,
        &original,
        document.as_str(),
        use_color,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{add_author, add_bibliography};
    use crate::{
        error::{Error, ErrorKind},
        frontmatter::MergeOutcome,
        report::Event,
        testutil::{RecordingReporter, TestFixture},
    };

    #[test]
    fn authors_accumulate_without_duplicates() {
        let fixture = TestFixture::new().with_project("---\ntitle: T\n---\n");
        let mut reporter = RecordingReporter::default();
        let root = fixture.project_root();

        assert_eq!(
            add_author(root, "Alice", &mut reporter).expect("alice"),
            MergeOutcome::Inserted
        );
        assert_eq!(
            add_author(root, "Bob", &mut reporter).expect("bob"),
            MergeOutcome::Appended
        );
        assert_eq!(
            add_author(root, "Alice", &mut reporter).expect("alice again"),
            MergeOutcome::Unchanged
        );

        assert_eq!(
            fixture.read_frontmatter(),
            "---\ntitle: T\nauthor:\n  - Alice\n  - Bob\n---\n"
        );
        assert!(matches!(
            reporter.events.last(),
            Some(Event::MetadataUnchanged { .. })
        ));
    }

    #[test]
    fn bibliography_is_copied_and_listed() {
        let fixture = TestFixture::new().with_project(
            "---\ntitle: T\nbibliography: resources/bibliography.bib\n---\n",
        );
        let source = fixture.source_file("extra.bib", "@book{b, title={T}}");
        let mut reporter = RecordingReporter::default();

        let outcome =
            add_bibliography(fixture.project_root(), &source, &mut reporter).expect("add bib");

        assert_eq!(outcome, MergeOutcome::Converted);
        let copied = fixture.project_root().join("resources").join("extra.bib");
        assert_eq!(fs::read_to_string(copied).expect("copied"), "@book{b, title={T}}");
        assert_eq!(
            fixture.read_frontmatter(),
            "---\ntitle: T\nbibliography:\n  - resources/bibliography.bib\n  - resources/extra.bib\n---\n"
        );
        assert_eq!(reporter.events.len(), 2);
    }

    #[test]
    fn bibliography_already_in_resources_is_kept() {
        let fixture = TestFixture::new()
            .with_project("---\ntitle: T\n---\n")
            .with_project_resource("refs.bib", "@book{k, title={X}}");
        let source = fixture.project_root().join("resources").join("refs.bib");
        let mut reporter = RecordingReporter::default();

        let outcome =
            add_bibliography(fixture.project_root(), &source, &mut reporter).expect("add bib");

        assert_eq!(outcome, MergeOutcome::Inserted);
        assert_eq!(
            fs::read_to_string(&source).expect("read"),
            "@book{k, title={X}}"
        );
        assert_eq!(
            fixture.read_frontmatter(),
            "---\ntitle: T\nbibliography:\n  - resources/refs.bib\n---\n"
        );
    }

    #[test]
    fn bibliography_requires_bib_file() {
        let fixture = TestFixture::new().with_project("---\ntitle: T\n---\n");
        let source = fixture.source_file("refs.txt", "");
        let error = add_bibliography(
            fixture.project_root(),
            &source,
            &mut RecordingReporter::default(),
        )
        .expect_err("wrong extension");
        assert_eq!(error.kind(), ErrorKind::Validation);

        let missing = fixture.work_dir().join("missing.bib");
        let error = add_bibliography(
            fixture.project_root(),
            &missing,
            &mut RecordingReporter::default(),
        )
        .expect_err("missing");
        assert!(matches!(error, Error::SourceMissing { .. }));
    }

    #[test]
    fn author_outside_project_fails() {
        let fixture = TestFixture::new();
        let error = add_author(fixture.work_dir(), "Alice", &mut RecordingReporter::default())
            .expect_err("no project");
        assert!(matches!(error, Error::ProjectNotFound { .. }));
    }
}

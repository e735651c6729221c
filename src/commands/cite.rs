//! Implementation of the `paw cite` command.

use std::path::Path;

use crate::{
    bibliography::{BibEntry, read_entries},
    commands::ColorChoice,
    diagnostics::Diagnostics,
    error::Result,
    frontmatter,
    palette::{fmt_description, fmt_name},
    project::{ProjectPaths, locate_current_project},
};

/// Frontmatter key listing bibliography files.
const BIBLIOGRAPHY_KEY: &str = "bibliography";

/// Execute the cite command.
pub fn run(color: ColorChoice, verbose: bool, query: Option<String>) -> Result<()> {
    let mut diagnostics = Diagnostics::new(verbose);
    let project = locate_current_project()?;
    let use_color = color.enabled();

    let entries = collect_entries(&project, query.as_deref(), &mut diagnostics)?;
    if entries.is_empty() {
        match &query {
            Some(query) => println!("No citations match '{query}'."),
            None if diagnostics.warning_count() > 0 => {
                println!("No citations found; see the warnings above.");
            }
            None => println!("No citations found."),
        }
    }
    for entry in &entries {
        println!("{}", format_entry(entry, use_color));
    }

    diagnostics.print_skipped_summary();
    Ok(())
}

/// Read every bibliography named in the frontmatter and keep matching entries.
fn collect_entries(
    project: &ProjectPaths,
    query: Option<&str>,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<BibEntry>> {
    let document = frontmatter::load(&project.frontmatter)?;
    let files = document.string_values(BIBLIOGRAPHY_KEY);
    if files.is_empty() {
        diagnostics.warn(format!(
            "No '{BIBLIOGRAPHY_KEY}' entry in {}",
            project.frontmatter.display()
        ));
    }

    let mut entries = Vec::new();
    for file in files {
        let path = project.root.join(Path::new(&file));
        match read_entries(&path) {
            Ok(found) => {
                diagnostics.note(format!("  {} entries in {}", found.len(), path.display()));
                entries.extend(
                    found
                        .into_iter()
                        .filter(|entry| query.is_none_or(|query| entry.matches(query))),
                );
            }
            Err(error) => diagnostics.warn_skipped(&path, error.to_string()),
        }
    }
    Ok(entries)
}

/// Format an entry as a citation, its type and its title.
fn format_entry(entry: &BibEntry, use_color: bool) -> String {
    let citation = fmt_name(&entry.citation(), use_color);
    let kind = fmt_description(&format!("({})", entry.entry_type), use_color);
    match &entry.title {
        Some(title) => format!("{citation} {kind}  {title}"),
        None => format!("{citation} {kind}"),
    }
}

#[cfg(test)]
mod tests {
    use super::{collect_entries, format_entry};
    use crate::{
        diagnostics::Diagnostics,
        project::ProjectPaths,
        testutil::TestFixture,
    };

    const REFS: &str = "@article{knuth1984, title={Literate Programming}}\n\
                        @book{lamport1994, title={LaTeX}}\n";

    fn keys(fixture: &TestFixture, query: Option<&str>, diagnostics: &mut Diagnostics) -> Vec<String> {
        let project = ProjectPaths::from_root(fixture.project_root());
        collect_entries(&project, query, diagnostics)
            .expect("collect")
            .into_iter()
            .map(|entry| entry.key)
            .collect()
    }

    #[test]
    fn filters_entries_by_query() {
        let fixture = TestFixture::new()
            .with_project("---\nbibliography: resources/refs.bib\n---\n")
            .with_project_resource("refs.bib", REFS);
        let mut diagnostics = Diagnostics::new(false);

        assert_eq!(
            keys(&fixture, None, &mut diagnostics),
            ["knuth1984", "lamport1994"]
        );
        assert_eq!(keys(&fixture, Some("literate"), &mut diagnostics), ["knuth1984"]);
        assert_eq!(diagnostics.warning_count(), 0);
    }

    #[test]
    fn reads_every_listed_bibliography() {
        let fixture = TestFixture::new()
            .with_project(
                "---\nbibliography:\n  - resources/refs.bib\n  - resources/missing.bib\n  - resources/more.bib\n---\n",
            )
            .with_project_resource("refs.bib", REFS)
            .with_project_resource("more.bib", "@misc{extra, note={x}}");
        let mut diagnostics = Diagnostics::new(false);

        assert_eq!(
            keys(&fixture, None, &mut diagnostics),
            ["knuth1984", "lamport1994", "extra"]
        );
        assert_eq!(diagnostics.warning_count(), 1);
    }

    #[test]
    fn warns_without_bibliography_key() {
        let fixture = TestFixture::new().with_project("---\ntitle: T\n---\n");
        let mut diagnostics = Diagnostics::new(false);
        assert!(keys(&fixture, None, &mut diagnostics).is_empty());
        assert_eq!(diagnostics.warning_count(), 1);
    }

    #[test]
    fn formats_citation_and_title() {
        let entries = crate::bibliography::parse_entries(REFS);
        assert_eq!(
            format_entry(&entries[0], false),
            "[@knuth1984] (article)  Literate Programming"
        );
    }
}

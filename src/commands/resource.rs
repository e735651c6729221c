//! Implementation of the `paw csl` and `paw template` commands.

use std::path::{Path, PathBuf};

use crate::{
    commands::{ColorChoice, current_dir, open_library, print_preview},
    config::Config,
    error::Result,
    frontmatter,
    library::{ResourceKind, ResourceLibrary},
    palette::{fmt_description, fmt_heading, fmt_name, fmt_path},
    paths::display_path,
    project::locate_project,
    report::Reporter,
};

/// Execute `add`: copy a file into the global library.
pub fn add(kind: ResourceKind, reporter: &mut dyn Reporter, file: PathBuf) -> Result<()> {
    let config = Config::load()?;
    let library = open_library(&config, kind)?;
    library.add(&file, reporter)?;
    Ok(())
}

/// Execute `remove`: delete a file from the global library.
pub fn remove(kind: ResourceKind, reporter: &mut dyn Reporter, name: String) -> Result<()> {
    let config = Config::load()?;
    let library = open_library(&config, kind)?;
    library.remove(&name, reporter)
}

/// Execute `list`: print the library contents.
pub fn list(kind: ResourceKind, color: ColorChoice) -> Result<()> {
    let config = Config::load()?;
    let library = open_library(&config, kind)?;
    let use_color = color.enabled();
    for line in listing(&library, use_color)? {
        println!("{line}");
    }
    Ok(())
}

/// Execute `use`: copy a resource into the current project and select it.
pub fn use_resource(
    kind: ResourceKind,
    color: ColorChoice,
    reporter: &mut dyn Reporter,
    name: String,
    dry_run: bool,
) -> Result<()> {
    let config = Config::load()?;
    let library = open_library(&config, kind)?;
    let cwd = current_dir()?;
    if dry_run {
        return preview_use(&library, &name, &cwd, color.enabled());
    }
    library.use_in(&name, &cwd, reporter)?;
    Ok(())
}

/// Build the lines printed by `list`.
fn listing(library: &ResourceLibrary, use_color: bool) -> Result<Vec<String>> {
    let label = &library.spec().label;
    let mut lines = vec![fmt_heading(
        &format!(
            "Available global {label}s in {}:",
            fmt_path(&display_path(library.dir()), use_color)
        ),
        use_color,
    )];

    let items: Vec<String> = library.list_items()?.collect();
    if items.is_empty() {
        lines.push(fmt_description(&format!("  No {label}s found."), use_color));
    }
    lines.extend(items.iter().map(|item| format!("- {}", fmt_name(item, use_color))));
    Ok(lines)
}

/// Show what `use` would do without touching the project.
fn preview_use(library: &ResourceLibrary, name: &str, start: &Path, use_color: bool) -> Result<()> {
    let (name, source) = library.resolve(name)?;
    let project = locate_project(start)?;
    let destination = project.resources.join(&name);
    println!(
        "Would copy {} to {}",
        fmt_path(&display_path(&source), use_color),
        fmt_path(&display_path(&destination), use_color)
    );

    let key = &library.spec().metadata_key;
    let mut document = frontmatter::load(&project.frontmatter)?;
    let original = document.as_str().to_string();
    document
        .set_scalar(key, &name)
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

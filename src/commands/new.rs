//! Implementation of the `paw new` command.

use std::path::Path;

use inquire::{Confirm, error::InquireError};

use crate::{
    commands::{ColorChoice, current_dir},
    config::Config,
    error::{Error, Result},
    palette::{fmt_heading, fmt_name, fmt_success},
    report::Reporter,
    scaffold::{ProjectSettings, create_project, slugify},
};

/// Execute the new command.
pub fn run(
    color: ColorChoice,
    reporter: &mut dyn Reporter,
    title: String,
    force: bool,
) -> Result<()> {
    let config = Config::load()?;
    let use_color = color.enabled();
    let slug = slugify(&title)?;
    let root = current_dir()?.join(&slug);

    if root.exists() && !force {
        eprintln!(
            "{} Directory '{}' already exists.",
            fmt_heading("Note:", use_color),
            fmt_name(&slug, use_color)
        );
        if !confirm("Overwrite its project files?")? {
            println!("Aborted.");
            return Ok(());
        }
    }

    println!("Creating project {}...", fmt_name(&slug, use_color));
    create_project(&root, &settings(&config, title), reporter)?;
    print_next_steps(&root, &slug, use_color);
    Ok(())
}

/// Build template settings from the config.
fn settings(config: &Config, title: String) -> ProjectSettings {
    ProjectSettings {
        title,
        author: config.author().to_string(),
        lang: config.lang().to_string(),
        library_root: config.library_root().to_path_buf(),
    }
}

/// Print what to do after scaffolding.
fn print_next_steps(root: &Path, slug: &str, use_color: bool) {
    println!();
    println!(
        "{} Your project '{}' is ready.",
        fmt_success("Success!", use_color),
        fmt_name(slug, use_color)
    );
    println!();
    println!("{}", fmt_heading("Next steps:", use_color));
    println!("1. cd {}", root.display());
    println!("2. make");
}

/// Ask before overwriting an existing directory; declining is the default.
fn confirm(message: &str) -> Result<bool> {
    match Confirm::new(message).with_default(false).prompt() {
        Ok(value) => Ok(value),
        Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => {
            Err(Error::PromptCanceled)
        }
        Err(error) => Err(Error::PromptFailed {
            message: error.to_string(),
        }),
    }
}

//! CLI parsing and command dispatch.

use std::{io, path::PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::{
    commands,
    error::Result,
    library::ResourceKind,
    report::{ConsoleReporter, Reporter},
};

/// Environment variable overriding the log filter.
const LOG_ENV: &str = "PAW_LOG";

/// Parsed command line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "paw",
    version,
    about = "Pandoc academic workflow: scaffold papers and manage citation styles and templates",
    arg_required_else_help = true
)]
struct Cli {
    /// Control colored output.
    #[arg(long, value_enum, default_value = "auto", global = true)]
    color: ColorMode,
    /// Enable verbose output.
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
    /// Command to execute.
    #[command(subcommand)]
    command: Command,
}

/// Supported color output modes.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorMode {
    /// Only colorize when stdout is a TTY.
    Auto,
    /// Always colorize output.
    Always,
    /// Never colorize output.
    Never,
}

// Commands are ordered alphabetically - maintain this order.
/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Add a bibliography or an author to the current project.
    Add {
        /// What to add.
        #[command(subcommand)]
        item: AddCommand,
    },
    /// Check that Pandoc and LaTeX are installed.
    Check,
    /// Search the project bibliography for citation keys.
    Cite {
        /// Case-insensitive filter on key or title.
        query: Option<String>,
    },
    /// Manage global citation styles (.csl).
    Csl {
        /// Library action.
        #[command(subcommand)]
        action: ResourceCommand,
    },
    /// Create the global library and a config file.
    Init,
    /// Create a new project.
    New {
        /// Title of the paper.
        title: String,
        /// Overwrite an existing directory without prompting.
        #[arg(long, short = 'f')]
        force: bool,
    },
    /// Manage global Word templates (.docx).
    Template {
        /// Library action.
        #[command(subcommand)]
        action: ResourceCommand,
    },
}

/// Items `paw add` accepts.
#[derive(Debug, Subcommand)]
enum AddCommand {
    /// Author name to list in the frontmatter.
    Author {
        /// Author name.
        name: String,
        /// Preview the frontmatter change without writing.
        #[arg(long, short = 'n')]
        dry_run: bool,
    },
    /// BibTeX file to copy into resources/ and list in the frontmatter.
    Bib {
        /// Path to the .bib file.
        file: PathBuf,
        /// Preview the frontmatter change without writing.
        #[arg(long, short = 'n')]
        dry_run: bool,
    },
}

/// Actions shared by the citation style and template libraries.
#[derive(Debug, Subcommand)]
enum ResourceCommand {
    /// Copy a file into the global library.
    Add {
        /// File to add.
        file: PathBuf,
    },
    /// List files in the global library.
    #[command(alias = "ls")]
    List,
    /// Delete a file from the global library.
    #[command(alias = "rm")]
    Remove {
        /// Name, with or without extension.
        name: String,
    },
    /// Copy a file into the current project and select it in the frontmatter.
    Use {
        /// Name, with or without extension.
        name: String,
        /// Preview the frontmatter change without writing.
        #[arg(long, short = 'n')]
        dry_run: bool,
    },
}

/// Run the requested command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let color = cli.color.into_choice();
    let mut reporter = ConsoleReporter::new(color.enabled());

    let result = dispatch(cli.command, color, cli.verbose, &mut reporter);
    if let Err(error) = &result {
        reporter.failure(error);
    }
    result
}

/// Dispatch a parsed command.
fn dispatch(
    command: Command,
    color: commands::ColorChoice,
    verbose: bool,
    reporter: &mut dyn Reporter,
) -> Result<()> {
    // Match arms are ordered alphabetically - maintain this order.
    match command {
        Command::Add { item } => match item {
            AddCommand::Author { name, dry_run } => {
                commands::add::author(color, reporter, name, dry_run)
            }
            AddCommand::Bib { file, dry_run } => commands::add::bib(color, reporter, file, dry_run),
        },
        Command::Check => commands::check::run(color),
        Command::Cite { query } => commands::cite::run(color, verbose, query),
        Command::Csl { action } => {
            run_resource(ResourceKind::CitationStyle, action, color, reporter)
        }
        Command::Init => commands::init::run(reporter),
        Command::New { title, force } => commands::new::run(color, reporter, title, force),
        Command::Template { action } => run_resource(ResourceKind::Template, action, color, reporter),
    }
}

/// Dispatch a library action for one resource kind.
fn run_resource(
    kind: ResourceKind,
    action: ResourceCommand,
    color: commands::ColorChoice,
    reporter: &mut dyn Reporter,
) -> Result<()> {
    match action {
        ResourceCommand::Add { file } => commands::resource::add(kind, reporter, file),
        ResourceCommand::List => commands::resource::list(kind, color),
        ResourceCommand::Remove { name } => commands::resource::remove(kind, reporter, name),
        ResourceCommand::Use { name, dry_run } => {
            commands::resource::use_resource(kind, color, reporter, name, dry_run)
        }
    }
}

/// Install the stderr log subscriber.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));
    if let Err(error) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init()
    {
        eprintln!("Logging disabled: {error}");
    }
}

impl ColorMode {
    /// Convert a CLI color mode into a color choice.
    fn into_choice(self) -> commands::ColorChoice {
        match self {
            Self::Auto => commands::ColorChoice::Auto,
            Self::Always => commands::ColorChoice::Always,
            Self::Never => commands::ColorChoice::Never,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{AddCommand, Cli, Command, ResourceCommand};

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_resource_use_with_dry_run() {
        let cli = Cli::try_parse_from(["paw", "csl", "use", "apa", "--dry-run"]).expect("parse");
        assert!(matches!(
            cli.command,
            Command::Csl {
                action: ResourceCommand::Use { ref name, dry_run: true }
            } if name == "apa"
        ));
    }

    #[test]
    fn parses_add_author_and_global_flags() {
        let cli = Cli::try_parse_from(["paw", "add", "author", "Ada Lovelace", "--color", "never"])
            .expect("parse");
        assert!(matches!(
            cli.command,
            Command::Add {
                item: AddCommand::Author { ref name, dry_run: false }
            } if name == "Ada Lovelace"
        ));
    }
}

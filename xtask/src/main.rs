//! Developer workflow tasks for the paw workspace.

use std::{
    env, fs,
    path::{Path, PathBuf},
    process::{Command, ExitCode, Stdio},
};

/// Binary produced by the main package.
const BINARY: &str = "paw";
/// Directory receiving release artifacts.
const DIST_DIR: &str = "dist";

fn main() -> ExitCode {
    match parse_command() {
        Some(Task::Tidy) => run_tidy(),
        Some(Task::Dist) => run_dist(),
        None => {
            eprintln!("Usage: cargo xtask <tidy|dist>");
            ExitCode::from(2)
        }
    }
}

/// Available tasks.
enum Task {
    /// Format and lint the workspace.
    Tidy,
    /// Build a release binary into `dist/`.
    Dist,
}

/// Parse the single task argument.
fn parse_command() -> Option<Task> {
    let mut args = env::args();
    let _ = args.next();
    let task = match args.next().as_deref() {
        Some("tidy") => Task::Tidy,
        Some("dist") => Task::Dist,
        _ => return None,
    };
    args.next().is_none().then_some(task)
}

/// Run rustfmt and clippy.
fn run_tidy() -> ExitCode {
    if !run_fmt() {
        return ExitCode::from(1);
    }

    if !run_clippy() {
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

/// Build the release binary and copy it into `dist/`.
fn run_dist() -> ExitCode {
    if !run_command("cargo", &["build", "--release", "--package", BINARY]) {
        return ExitCode::from(1);
    }

    let file_name = format!("{BINARY}{}", env::consts::EXE_SUFFIX);
    let built = target_dir().join("release").join(&file_name);
    let dist = Path::new(DIST_DIR);
    if let Err(err) = fs::create_dir_all(dist) {
        eprintln!("Failed to create {DIST_DIR}: {err}");
        return ExitCode::from(1);
    }

    let destination = dist.join(&file_name);
    match fs::copy(&built, &destination) {
        Ok(_) => {
            println!("Wrote {}", destination.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Failed to copy {}: {err}", built.display());
            ExitCode::from(1)
        }
    }
}

/// Cargo target directory, honoring `CARGO_TARGET_DIR`.
fn target_dir() -> PathBuf {
    env::var_os("CARGO_TARGET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("target"))
}

/// Format with nightly rustfmt.
fn run_fmt() -> bool {
    if Path::new("rustfmt-nightly.toml").exists() {
        run_command(
            "cargo",
            &[
                "+nightly",
                "fmt",
                "--all",
                "--",
                "--config-path",
                "./rustfmt-nightly.toml",
            ],
        )
    } else {
        run_command("cargo", &["+nightly", "fmt", "--all"])
    }
}

/// Apply clippy fixes across all targets.
fn run_clippy() -> bool {
    run_command(
        "cargo",
        &[
            "clippy",
            "-q",
            "--fix",
            "--all",
            "--all-targets",
            "--all-features",
            "--allow-dirty",
            "--tests",
        ],
    )
}

/// Run a command with inherited output, reporting failures.
fn run_command(program: &str, args: &[&str]) -> bool {
    match Command::new(program)
        .args(args)
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
    {
        Ok(status) if status.success() => true,
        Ok(status) => {
            eprintln!("Command `{program}` failed with status {status}");
            false
        }
        Err(err) => {
            eprintln!("Failed to run `{program}`: {err}");
            false
        }
    }
}

//! Implementation of the `paw check` command.

use std::{
    env,
    ffi::OsStr,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    commands::{ColorChoice, current_dir},
    error::{Error, Result},
    palette::{fmt_failure, fmt_heading, fmt_name, fmt_path, fmt_success, fmt_warning},
    paths::display_path,
};

/// An external program the build relies on.
#[derive(Debug, Clone, Copy)]
struct Dependency {
    /// Display name.
    label: &'static str,
    /// Executable name.
    program: &'static str,
    /// Installation advice shown when missing.
    hint: &'static str,
}

/// Programs invoked by the generated Makefile.
const DEPENDENCIES: [Dependency; 4] = [
    Dependency {
        label: "Pandoc",
        program: "pandoc",
        hint: "Install it from https://pandoc.org/installing.html.",
    },
    Dependency {
        label: "pandoc-crossref",
        program: "pandoc-crossref",
        hint: "Install the release matching your Pandoc version.",
    },
    Dependency {
        label: "LaTeX (pdflatex)",
        program: "pdflatex",
        hint: "Install a full LaTeX distribution such as TeX Live, MacTeX or MiKTeX.",
    },
    Dependency {
        label: "LaTeX (xelatex)",
        program: "xelatex",
        hint: "Install a full LaTeX distribution such as TeX Live, MacTeX or MiKTeX.",
    },
];

/// Lookup result for one dependency.
#[derive(Debug, Clone)]
struct DependencyStatus {
    /// Dependency that was looked up.
    dependency: Dependency,
    /// Resolved executable, if found.
    location: Option<PathBuf>,
}

/// Execute the check command.
pub fn run(color: ColorChoice) -> Result<()> {
    let use_color = color.enabled();
    println!("{}", fmt_heading("Checking for required dependencies...", use_color));

    let path_var = env::var_os("PATH");
    let cwd = current_dir()?;
    let statuses = check_dependencies(path_var.as_deref(), &cwd);
    let width = DEPENDENCIES
        .iter()
        .map(|dependency| dependency.label.len())
        .max()
        .unwrap_or_default();

    for status in &statuses {
        let label = fmt_name(&format!("{:>width$}", status.dependency.label), use_color);
        match &status.location {
            Some(location) => println!(
                "{label}  {}  {}",
                fmt_success("✓ Found  ", use_color),
                fmt_path(&display_path(location), use_color)
            ),
            None => println!(
                "{label}  {}  '{}' not found. {}",
                fmt_failure("✗ Missing", use_color),
                status.dependency.program,
                status.dependency.hint
            ),
        }
    }

    let missing: Vec<String> = statuses
        .iter()
        .filter(|status| status.location.is_none())
        .map(|status| status.dependency.program.to_string())
        .collect();
    if !missing.is_empty() {
        println!();
        println!(
            "{}",
            fmt_warning(
                "Some dependencies are missing. Install them so every build target works.",
                use_color
            )
        );
        return Err(Error::MissingDependencies { names: missing });
    }

    println!();
    println!(
        "{}",
        fmt_success("✓ All core dependencies are installed.", use_color)
    );
    Ok(())
}

/// Look up every dependency on the given search path.
fn check_dependencies(path_var: Option<&OsStr>, cwd: &Path) -> Vec<DependencyStatus> {
    DEPENDENCIES
        .iter()
        .map(|dependency| DependencyStatus {
            dependency: *dependency,
            location: find_program(dependency.program, path_var, cwd),
        })
        .collect()
}

/// Find an executable named `program` in a PATH-style list of directories.
fn find_program(program: &str, path_var: Option<&OsStr>, cwd: &Path) -> Option<PathBuf> {
    match which::which_in(program, path_var, cwd) {
        Ok(path) => Some(path),
        Err(error) => {
            debug!(program, %error, "executable not found");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        env, fs,
        path::{Path, PathBuf},
    };

    use tempfile::tempdir;

    use super::{check_dependencies, find_program};

    /// Write an executable stub named after `program` into `dir`.
    fn write_program(dir: &Path, program: &str) -> PathBuf {
        let path = dir.join(format!("{program}{}", env::consts::EXE_SUFFIX));
        fs::write(&path, "#!/bin/sh\n").expect("write");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod");
        }
        path
    }

    #[test]
    fn finds_programs_in_path_order() {
        let first = tempdir().expect("first");
        let second = tempdir().expect("second");
        let path_var = env::join_paths([first.path(), second.path()]).expect("join paths");

        let expected = write_program(second.path(), "pandoc");
        let found =
            find_program("pandoc", Some(path_var.as_os_str()), first.path()).expect("found");
        assert_eq!(found, expected);

        let expected = write_program(first.path(), "pandoc");
        let found =
            find_program("pandoc", Some(path_var.as_os_str()), first.path()).expect("found");
        assert_eq!(found, expected);
    }

    #[test]
    fn reports_missing_programs() {
        let dir = tempdir().expect("dir");
        write_program(dir.path(), "xelatex");
        let path_var = env::join_paths([dir.path()]).expect("join paths");

        let statuses = check_dependencies(Some(path_var.as_os_str()), dir.path());
        let missing: Vec<_> = statuses
            .iter()
            .filter(|status| status.location.is_none())
            .map(|status| status.dependency.program)
            .collect();
        assert_eq!(missing, ["pandoc", "pandoc-crossref", "pdflatex"]);
        assert!(find_program("pandoc", None, dir.path()).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn ignores_files_without_execute_permission() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().expect("dir");
        let path = write_program(dir.path(), "pandoc");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).expect("chmod");
        let path_var = env::join_paths([dir.path()]).expect("join paths");

        assert!(find_program("pandoc", Some(path_var.as_os_str()), dir.path()).is_none());
    }
}

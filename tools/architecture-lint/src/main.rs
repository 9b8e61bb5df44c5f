//! CLI entry point for the layer lint.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn main() -> ExitCode {
    let outcome = workspace_root()
        .map_err(|err| err.to_string())
        .and_then(|root| {
            architecture_lint::lint_frontend_sources(&root.join("frontend"))
                .map_err(|err| err.to_string())
        });
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            let _ = writeln!(io::stderr().lock(), "{message}");
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct WorkspaceRootError;

impl fmt::Display for WorkspaceRootError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("no Cargo.toml declaring [workspace] found above the current directory")
    }
}

impl std::error::Error for WorkspaceRootError {}

fn workspace_root() -> Result<PathBuf, WorkspaceRootError> {
    let candidates = [
        std::env::var_os("CARGO_WORKSPACE_DIR").map(PathBuf::from),
        std::env::current_dir().ok(),
        Some(PathBuf::from(env!("CARGO_MANIFEST_DIR"))),
    ];
    candidates
        .iter()
        .flatten()
        .find_map(|start| find_workspace_root(start))
        .ok_or(WorkspaceRootError)
}

fn find_workspace_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| declares_workspace(&dir.join("Cargo.toml")))
        .map(Path::to_path_buf)
}

fn declares_workspace(manifest: &Path) -> bool {
    fs::read_to_string(manifest).is_ok_and(|contents| contents.contains("[workspace]"))
}

//! Repo-local layer lint for the client synchronisation crate.
//!
//! `frontend` is a small hexagon. `domain` holds entities and ports, `state`
//! holds the store and the creators that drive those ports, and `outbound`
//! holds the adapters implementing them. Every file under those directories is
//! parsed and rejected if an import crosses the layers the wrong way:
//!
//! - `domain` must not reach into `state`, `outbound` or `config`, nor pull in
//!   the HTTP client, the async runtime or the configuration loader
//! - `state` must not reach into `outbound` or `config`, nor name the HTTP
//!   client directly
//! - `outbound` must not reach into `state` or the cache crates
//!
//! `#[cfg(test)]` modules and sibling `tests.rs` files are skipped.
//! Run it with `cargo run -p architecture-lint`.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use syn::visit::Visit;

/// Crate name used when the library imports itself by path.
const CRATE_SEGMENT: &str = "frontend";

/// Directories under `src/` that carry a layer.
const LAYER_DIRS: [&str; 3] = ["domain", "state", "outbound"];

/// One import that crosses a layer boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File path relative to `frontend/src`.
    pub file: PathBuf,
    /// Which rule the import breaks.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.file.display())
    }
}

/// Why a lint run did not pass.
#[derive(Debug, thiserror::Error)]
pub enum ArchitectureLintError {
    /// Walking or reading `src/` failed.
    #[error("I/O error while linting layers: {0}")]
    Io(#[from] io::Error),
    /// A file could not be parsed or placed in a layer.
    #[error("cannot lint {}: {message}", .file.display())]
    Parse {
        /// Offending file, relative to `frontend/src`.
        file: PathBuf,
        /// Parser or path diagnostic.
        message: String,
    },
    /// At least one import crosses a layer the wrong way.
    #[error("layer boundary violations:\n{}", render_violations(.0))]
    Violations(Vec<Violation>),
}

fn render_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|violation| format!("- {violation}\n"))
        .collect()
}

/// Lint the client crate sources on disk.
///
/// `crate_dir` must be the `frontend/` directory at the repository root.
///
/// # Errors
///
/// Returns [`ArchitectureLintError::Violations`] listing every crossing found,
/// or an I/O or parse error when the sources cannot be read.
pub fn lint_frontend_sources(crate_dir: &Path) -> Result<(), ArchitectureLintError> {
    let src_dir = crate_dir.join("src");
    let sources = collect_lint_sources(&src_dir)?;
    lint_sources(&sources)
}

/// Lint the provided Rust sources.
///
/// # Errors
///
/// Returns [`ArchitectureLintError::Violations`] listing every crossing found,
/// or a parse error for files outside the known layers.
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = Vec::new();

    for source in sources {
        let layer = Layer::of(&source.file).ok_or_else(|| ArchitectureLintError::Parse {
            file: source.file.clone(),
            message: "file is not under a layer directory".to_owned(),
        })?;
        let parsed =
            syn::parse_file(&source.contents).map_err(|err| ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: err.to_string(),
            })?;
        violations.extend(check_file(&source.file, layer, &parsed));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ArchitectureLintError::Violations(violations))
    }
}

/// A Rust source file to be linted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to `frontend/src`.
    pub file: PathBuf,
    /// File contents.
    pub contents: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Domain,
    State,
    Outbound,
}

impl Layer {
    fn of(relative_path: &Path) -> Option<Self> {
        let first = relative_path.components().next()?.as_os_str().to_str()?;
        match first {
            "domain" => Some(Self::Domain),
            "state" => Some(Self::State),
            "outbound" => Some(Self::Outbound),
            _ => None,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::State => "state",
            Self::Outbound => "outbound",
        }
    }

    fn forbidden_modules(self) -> &'static [&'static str] {
        match self {
            Self::Domain => &["state", "outbound", "config"],
            Self::State => &["outbound", "config"],
            Self::Outbound => &["state"],
        }
    }

    fn forbidden_crates(self) -> &'static [&'static str] {
        match self {
            Self::Domain => &["reqwest", "tokio", "ortho_config", "tracing_subscriber"],
            Self::State => &["reqwest", "ortho_config", "tracing_subscriber"],
            Self::Outbound => &["pagination", "indexmap"],
        }
    }
}

fn check_file(file: &Path, layer: Layer, parsed: &syn::File) -> Vec<Violation> {
    let mut collector = PathCollector::default();
    collector.visit_file(parsed);

    let mut messages = BTreeSet::new();
    for segments in &collector.paths {
        if let Some(module) = internal_root(segments)
            .filter(|root| layer.forbidden_modules().contains(root))
        {
            messages.insert(format!(
                "{} module must not depend on crate::{module}",
                layer.name()
            ));
        }
        if let Some(krate) = external_root(segments)
            .filter(|root| layer.forbidden_crates().contains(root))
        {
            messages.insert(format!(
                "{} module must not depend on external crate `{krate}`",
                layer.name()
            ));
        }
    }

    messages
        .into_iter()
        .map(|message| Violation {
            file: file.to_path_buf(),
            message,
        })
        .collect()
}

fn is_relative_segment(segment: &str) -> bool {
    matches!(segment, "crate" | "self" | "super")
}

/// First module named after `crate::`, `super::`, or the crate name.
fn internal_root(segments: &[String]) -> Option<&str> {
    let first = segments.first()?.as_str();
    let index = if is_relative_segment(first) {
        segments
            .iter()
            .position(|segment| !is_relative_segment(segment))?
    } else if first == CRATE_SEGMENT {
        1
    } else {
        return None;
    };
    segments.get(index).map(String::as_str)
}

fn external_root(segments: &[String]) -> Option<&str> {
    let root = segments.first()?.as_str();
    (!is_relative_segment(root) && root != CRATE_SEGMENT).then_some(root)
}

#[derive(Default)]
struct PathCollector {
    paths: BTreeSet<Vec<String>>,
}

impl PathCollector {
    fn record_use_tree(&mut self, tree: &syn::UseTree, mut prefix: Vec<String>) {
        match tree {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.record_use_tree(&path.tree, prefix);
            }
            syn::UseTree::Name(name) => {
                prefix.push(name.ident.to_string());
                self.paths.insert(prefix);
            }
            syn::UseTree::Rename(rename) => {
                prefix.push(rename.ident.to_string());
                self.paths.insert(prefix);
            }
            syn::UseTree::Glob(_) => {
                prefix.push("*".to_owned());
                self.paths.insert(prefix);
            }
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.record_use_tree(item, prefix.clone());
                }
            }
        }
    }
}

impl<'ast> Visit<'ast> for PathCollector {
    fn visit_path(&mut self, node: &'ast syn::Path) {
        let segments: Vec<String> = node
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();
        if !segments.is_empty() {
            self.paths.insert(segments);
        }
        syn::visit::visit_path(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        self.record_use_tree(&node.tree, Vec::new());
    }

    fn visit_item_mod(&mut self, node: &'ast syn::ItemMod) {
        if !is_test_only(&node.attrs) {
            syn::visit::visit_item_mod(self, node);
        }
    }
}

/// Test modules may pull in the runtime and fixtures freely.
fn is_test_only(attrs: &[syn::Attribute]) -> bool {
    attrs.iter().any(|attr| {
        attr.path().is_ident("cfg")
            && attr
                .parse_args::<syn::Ident>()
                .is_ok_and(|ident| ident == "test")
    })
}

fn collect_lint_sources(src_dir: &Path) -> Result<Vec<LintSource>, ArchitectureLintError> {
    let mut pending: Vec<PathBuf> = LAYER_DIRS
        .iter()
        .map(|layer| src_dir.join(layer))
        .filter(|dir| dir.is_dir())
        .collect();
    let mut sources = Vec::new();
    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if is_linted_file(&path) {
                sources.push(read_source(src_dir, &path)?);
            }
        }
    }
    sources.sort_by(|left, right| left.file.cmp(&right.file));
    Ok(sources)
}

/// Rust files other than sibling `tests.rs` modules.
fn is_linted_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "rs")
        && path.file_stem().is_some_and(|stem| stem != "tests")
}

fn read_source(src_dir: &Path, path: &Path) -> Result<LintSource, ArchitectureLintError> {
    let file = path
        .strip_prefix(src_dir)
        .map_err(|err| ArchitectureLintError::Parse {
            file: path.to_path_buf(),
            message: err.to_string(),
        })?
        .to_path_buf();
    Ok(LintSource {
        file,
        contents: fs::read_to_string(path)?,
    })
}

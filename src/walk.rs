use std::collections::HashSet;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;

use crate::error::{AnalyzerError, SkippedItem};

/// Directory names excluded from every scan: tests, caches, vendored and
/// dependency trees.
pub const EXCLUDED_DIRS: &[&str] = &[
    "tests",
    "test",
    "__tests__",
    "spec",
    "__pycache__",
    ".pytest_cache",
    "node_modules",
    "vendor",
    "venv",
    ".venv",
    "target",
    "dist",
    "build",
    ".git",
    ".hg",
    ".svn",
];

/// Baseline glob exclusions applied before any user-supplied pattern,
/// covering test files, minified bundles, and the analyzer's own outputs.
pub const BASELINE_GLOBS: &[&str] = &[
    "**/*.min.js",
    "**/*_test.*",
    "**/test_*.*",
    "**/*.test.*",
    "**/*.spec.*",
    "**/conftest.py",
    "**/duplication_report*",
    "**/analysis_report*",
];

/// File extensions considered source code candidates.
const SOURCE_EXTS: &[&str] = &[
    "rs", "py", "js", "jsx", "ts", "tsx", "mjs", "cjs", "go", "java", "kt", "cs", "c", "cc",
    "cpp", "h", "hpp", "rb", "php", "swift", "scala",
];

/// Result of file discovery: a deduplicated, lexically ordered candidate
/// list plus the items that were skipped with a warning.
#[derive(Debug)]
pub struct Discovery {
    pub files: Vec<PathBuf>,
    pub skipped: Vec<SkippedItem>,
}

fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SOURCE_EXTS.contains(&ext))
}

/// Compile baseline plus user exclusion patterns. An invalid user pattern is
/// skipped with a warning, never fatal.
fn compile_excludes(extra: &[String], skipped: &mut Vec<SkippedItem>) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in BASELINE_GLOBS {
        if let Ok(glob) = Glob::new(pattern) {
            builder.add(glob);
        }
    }
    for pattern in extra {
        match Glob::new(pattern) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(err) => {
                eprintln!("warning: invalid exclusion pattern '{pattern}': {err}");
                skipped.push(SkippedItem {
                    kind: "exclusion_pattern".to_string(),
                    reason: format!("invalid pattern '{pattern}': {err}"),
                });
            }
        }
    }
    // An empty builder never fails to compile.
    builder.build().unwrap_or_else(|_| GlobSet::empty())
}

/// Check a path against the exclusion set, matching both the path relative
/// to the root and its file name.
pub fn is_excluded(excludes: &GlobSet, root: &Path, path: &Path) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    if excludes.is_match(relative) {
        return true;
    }
    relative
        .components()
        .any(|c| c.as_os_str().to_str().is_some_and(|n| EXCLUDED_DIRS.contains(&n)))
}

/// Recursively collect candidate files under `dir`. Symlinks are never
/// followed and already-visited canonical directories are skipped, so cyclic
/// links cannot loop the traversal.
fn collect_dir(
    dir: &Path,
    root: &Path,
    excludes: &GlobSet,
    visited: &mut HashSet<PathBuf>,
    out: &mut Vec<PathBuf>,
    skipped: &mut Vec<SkippedItem>,
) {
    if let Ok(canonical) = dir.canonicalize()
        && !visited.insert(canonical)
    {
        return;
    }

    let walker = WalkBuilder::new(dir)
        .hidden(false)
        .follow_links(false)
        .filter_entry(|entry| {
            if entry.file_type().is_some_and(|ft| ft.is_dir())
                && let Some(name) = entry.file_name().to_str()
                && EXCLUDED_DIRS.contains(&name)
            {
                return false;
            }
            true
        })
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                eprintln!("warning: {err}");
                skipped.push(SkippedItem {
                    kind: "file_access".to_string(),
                    reason: err.to_string(),
                });
                continue;
            }
        };
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let path = entry.into_path();
        if has_source_extension(&path) && !is_excluded(excludes, root, &path) {
            out.push(path);
        }
    }
}

/// Enumerate candidate source files.
///
/// With explicit `targets`, files are resolved directly and directories are
/// expanded recursively; otherwise the whole root is scanned. Every path is
/// checked against the merged exclusion set before it enters the result.
/// Returns `FatalConfig` only when the root itself is unusable.
pub fn discover(
    root: &Path,
    targets: &[PathBuf],
    extra_excludes: &[String],
) -> Result<Discovery, AnalyzerError> {
    if !root.is_dir() {
        return Err(AnalyzerError::FatalConfig {
            path: root.to_path_buf(),
            reason: "not an existing directory".to_string(),
        });
    }

    let mut skipped = Vec::new();
    let excludes = compile_excludes(extra_excludes, &mut skipped);
    let mut files = Vec::new();
    let mut visited = HashSet::new();

    if targets.is_empty() {
        collect_dir(root, root, &excludes, &mut visited, &mut files, &mut skipped);
    } else {
        for target in targets {
            let resolved = if target.is_absolute() {
                target.clone()
            } else {
                root.join(target)
            };
            if resolved.is_dir() {
                collect_dir(&resolved, root, &excludes, &mut visited, &mut files, &mut skipped);
            } else if resolved.is_file() {
                if has_source_extension(&resolved) && !is_excluded(&excludes, root, &resolved) {
                    files.push(resolved);
                }
            } else {
                eprintln!("warning: target not found: {}", resolved.display());
                skipped.push(SkippedItem {
                    kind: "file_access".to_string(),
                    reason: format!("target not found: {}", resolved.display()),
                });
            }
        }
    }

    // Lexical order makes discovery order (and therefore tie-breaking
    // downstream) independent of filesystem iteration order.
    files.sort();
    files.dedup();

    Ok(Discovery { files, skipped })
}

#[cfg(test)]
#[path = "walk_test.rs"]
mod tests;

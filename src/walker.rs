//! Go source file discovery.
//!
//! Uses the `ignore` crate to walk directories in lexical order. By default
//! every file is visited, hidden ones included; gitignore handling, depth
//! limits and glob exclusions are opt-in through [`WalkOptions`].

use std::path::{Path, PathBuf};

use glob::Pattern;
use ignore::WalkBuilder;
use thiserror::Error;
use tracing::debug;

/// Suffix of Go source files.
pub const GO_SUFFIX: &str = ".go";

/// Suffix of Go test files.
pub const TEST_SUFFIX: &str = "_test.go";

/// Errors that can occur during discovery.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("path not found: {path}")]
    NotFound { path: PathBuf },

    #[error("permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("symlink loop detected: {path}")]
    SymlinkLoop { path: PathBuf },

    #[error("invalid exclude pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

/// Options for discovery.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Drop files ending in `_test.go`.
    pub exclude_tests: bool,
    /// Respect .gitignore, global gitignore and .git/info/exclude.
    pub respect_gitignore: bool,
    /// Include hidden files and directories.
    pub include_hidden: bool,
    /// Follow symbolic links.
    pub follow_symlinks: bool,
    /// Maximum depth to recurse (None = unlimited).
    pub max_depth: Option<usize>,
    /// Glob patterns matched against the path relative to the root.
    pub exclude: Vec<String>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            exclude_tests: false,
            respect_gitignore: false,
            include_hidden: true,
            follow_symlinks: false,
            max_depth: None,
            exclude: Vec::new(),
        }
    }
}

impl WalkOptions {
    /// Options that skip `_test.go` files.
    pub fn without_tests() -> Self {
        Self {
            exclude_tests: true,
            ..Default::default()
        }
    }
}

/// Whether `name` is a Go source file that passes the test filter.
pub fn is_candidate(name: &str, exclude_tests: bool) -> bool {
    name.ends_with(GO_SUFFIX) && !(exclude_tests && name.ends_with(TEST_SUFFIX))
}

/// Find every Go file under `root`.
///
/// # Examples
///
/// ```no_run
/// use gosummarize::walker::discover;
/// use std::path::Path;
///
/// for path in discover(Path::new("."), true).unwrap() {
///     println!("{}", path.display());
/// }
/// ```
pub fn discover(root: &Path, exclude_tests: bool) -> Result<Vec<PathBuf>, WalkError> {
    discover_with_options(
        root,
        &WalkOptions {
            exclude_tests,
            ..Default::default()
        },
    )
}

/// Find Go files under `root` with custom options.
///
/// Fails on the first traversal error; results are in lexical order within
/// each directory.
pub fn discover_with_options(
    root: &Path,
    options: &WalkOptions,
) -> Result<Vec<PathBuf>, WalkError> {
    if !root.exists() {
        return Err(WalkError::NotFound {
            path: root.to_path_buf(),
        });
    }

    let patterns = options
        .exclude
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|source| WalkError::InvalidPattern {
                pattern: p.clone(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut builder = WalkBuilder::new(root);

    builder
        .standard_filters(false)
        .hidden(!options.include_hidden)
        .git_ignore(options.respect_gitignore)
        .git_global(options.respect_gitignore)
        .git_exclude(options.respect_gitignore)
        .require_git(false)
        .follow_links(options.follow_symlinks)
        .max_depth(options.max_depth)
        .sort_by_file_name(|a, b| a.cmp(b));

    let mut files = Vec::new();

    for result in builder.build() {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => match convert_error(err, root) {
                Some(err) => return Err(err),
                None => continue,
            },
        };

        let is_dir = entry.file_type().map_or(true, |ft| ft.is_dir());
        if is_dir {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if !is_candidate(&name, options.exclude_tests) {
            continue;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        if patterns.iter().any(|p| p.matches_path(relative)) {
            debug!(path = %entry.path().display(), "excluded by pattern");
            continue;
        }

        files.push(entry.into_path());
    }

    debug!(root = %root.display(), count = files.len(), "discovered Go files");
    Ok(files)
}

/// Map a walk error to ours. Ignore-file parse problems are skipped.
fn convert_error(err: ignore::Error, path: &Path) -> Option<WalkError> {
    match err {
        ignore::Error::WithPath { path, err } => convert_error(*err, &path),
        ignore::Error::WithDepth { err, .. } => convert_error(*err, path),
        ignore::Error::Loop { child, .. } => Some(WalkError::SymlinkLoop { path: child }),
        ignore::Error::Io(source) => Some(match source.kind() {
            std::io::ErrorKind::NotFound => WalkError::NotFound {
                path: path.to_path_buf(),
            },
            std::io::ErrorKind::PermissionDenied => WalkError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => WalkError::Io {
                path: path.to_path_buf(),
                source,
            },
        }),
        other => {
            debug!(error = %other, "ignoring non-IO walk error");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "package test").unwrap();
    }

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in [
            "file1.go",
            "file2.go",
            "file3_test.go",
            "subdir/file4.go",
            "subdir/file5_test.go",
            "notgo.txt",
        ] {
            touch(&dir.path().join(name));
        }
        dir
    }

    fn names(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_discover_all_go_files() {
        let dir = create_test_dir();
        let files = discover(dir.path(), false).unwrap();
        assert_eq!(
            names(dir.path(), &files),
            [
                "file1.go",
                "file2.go",
                "file3_test.go",
                "subdir/file4.go",
                "subdir/file5_test.go"
            ]
        );
    }

    #[test]
    fn test_discover_without_tests_is_strict_subset() {
        let dir = create_test_dir();
        let all = discover(dir.path(), false).unwrap();
        let no_tests = discover(dir.path(), true).unwrap();

        assert_eq!(
            names(dir.path(), &no_tests),
            ["file1.go", "file2.go", "subdir/file4.go"]
        );

        let dropped: Vec<_> = all.iter().filter(|p| !no_tests.contains(p)).collect();
        assert_eq!(dropped.len(), 2);
        assert!(dropped
            .iter()
            .all(|p| p.to_string_lossy().ends_with(TEST_SUFFIX)));
    }

    #[test]
    fn test_discover_nested_only() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("empty/nested/nested.go");
        touch(&nested);

        let files = discover(&dir.path().join("empty"), false).unwrap();
        assert_eq!(files, [nested]);
    }

    #[test]
    fn test_discover_nonexistent() {
        let result = discover(Path::new("/nonexistent/path"), false);
        assert!(matches!(result, Err(WalkError::NotFound { .. })));
    }

    #[test]
    fn test_discover_includes_hidden_by_default() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join(".hidden/a.go"));

        assert_eq!(discover(dir.path(), false).unwrap().len(), 1);

        let options = WalkOptions {
            include_hidden: false,
            ..Default::default()
        };
        assert!(discover_with_options(dir.path(), &options).unwrap().is_empty());
    }

    #[test]
    fn test_discover_respects_gitignore_when_asked() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("keep.go"));
        touch(&dir.path().join("gen/skip.go"));
        fs::write(dir.path().join(".gitignore"), "gen/\n").unwrap();

        assert_eq!(discover(dir.path(), false).unwrap().len(), 2);

        let options = WalkOptions {
            respect_gitignore: true,
            ..Default::default()
        };
        let files = discover_with_options(dir.path(), &options).unwrap();
        assert_eq!(names(dir.path(), &files), ["keep.go"]);
    }

    #[test]
    fn test_discover_exclude_patterns() {
        let dir = create_test_dir();
        let options = WalkOptions {
            exclude: vec!["subdir/**".into()],
            ..WalkOptions::without_tests()
        };
        let files = discover_with_options(dir.path(), &options).unwrap();
        assert_eq!(names(dir.path(), &files), ["file1.go", "file2.go"]);
    }

    #[test]
    fn test_invalid_pattern() {
        let dir = TempDir::new().unwrap();
        let options = WalkOptions {
            exclude: vec!["[".into()],
            ..Default::default()
        };
        let result = discover_with_options(dir.path(), &options);
        assert!(matches!(result, Err(WalkError::InvalidPattern { .. })));
    }

    #[test]
    fn test_max_depth() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("a/b/c/deep.go"));
        touch(&dir.path().join("a/shallow.go"));

        let options = WalkOptions {
            max_depth: Some(2),
            ..Default::default()
        };
        let files = discover_with_options(dir.path(), &options).unwrap();
        assert_eq!(names(dir.path(), &files), ["a/shallow.go"]);
    }

    #[test]
    fn test_is_candidate() {
        assert!(is_candidate("main.go", false));
        assert!(is_candidate("main_test.go", false));
        assert!(!is_candidate("main_test.go", true));
        assert!(!is_candidate("main.rs", false));
    }
}

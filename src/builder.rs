//! Fluent builder API for gosummarize.
//!
//! Ties discovery, extraction and rendering together. Files are always
//! written in discovery order; with [`Summarizer::parallel`] they are parsed
//! on the rayon pool first and flushed in order afterwards.

use std::io::Write;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::debug;

use crate::codemap::{read_codemap, Codemap, CodemapError};
use crate::errors::SummarizeError;
use crate::output::{format_json, render_codemap, FileError, OutputFormat};
use crate::walker::{discover_with_options, WalkOptions};

/// Summarize one Go file into `out`.
///
/// On parse failure nothing is written and the error names the file.
pub fn summarize_file<W: Write>(path: &Path, out: &mut W) -> Result<(), SummarizeError> {
    let codemap = read_codemap(path)?;
    out.write_all(render_codemap(&codemap).as_bytes())?;
    Ok(())
}

/// Builder for summarizing a Go codebase.
///
/// # Examples
///
/// ```no_run
/// use gosummarize::builder::Summarizer;
///
/// let summarizer = Summarizer::new("./project").exclude_tests(true);
/// let files = summarizer.discover().unwrap();
///
/// let mut out = std::io::stdout();
/// let report = summarizer
///     .summarize(&files, &mut out, |err| eprintln!("{err}"))
///     .unwrap();
/// println!("{} files summarized", report.summarized);
/// ```
#[derive(Debug, Clone)]
pub struct Summarizer {
    root: PathBuf,
    walk_options: WalkOptions,
    parallel: bool,
    format: OutputFormat,
}

impl Summarizer {
    /// Create a new builder for the given root path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            walk_options: WalkOptions::default(),
            parallel: false,
            format: OutputFormat::Text,
        }
    }

    /// Skip `_test.go` files.
    pub fn exclude_tests(mut self, exclude: bool) -> Self {
        self.walk_options.exclude_tests = exclude;
        self
    }

    /// Respect gitignore files during discovery.
    pub fn respect_gitignore(mut self, respect: bool) -> Self {
        self.walk_options.respect_gitignore = respect;
        self
    }

    /// Include hidden files (default: true).
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.walk_options.include_hidden = include;
        self
    }

    /// Follow symbolic links.
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.walk_options.follow_symlinks = follow;
        self
    }

    /// Set maximum directory depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.walk_options.max_depth = Some(depth);
        self
    }

    /// Skip files whose path relative to the root matches `pattern`.
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.walk_options.exclude.push(pattern.into());
        self
    }

    /// Replace all walk options at once.
    pub fn walk_options(mut self, options: WalkOptions) -> Self {
        self.walk_options = options;
        self
    }

    /// Parse files concurrently. Output order is unchanged.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Select the output format.
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Root this summarizer walks.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Discover candidate files.
    pub fn discover(&self) -> Result<Vec<PathBuf>, SummarizeError> {
        Ok(discover_with_options(&self.root, &self.walk_options)?)
    }

    /// Summarize `files` into `out`, in order.
    ///
    /// Files that fail to read or parse are passed to `on_error` and
    /// skipped; only write failures abort the run.
    pub fn summarize<W, F>(
        &self,
        files: &[PathBuf],
        out: &mut W,
        mut on_error: F,
    ) -> Result<Report, SummarizeError>
    where
        W: Write,
        F: FnMut(&CodemapError),
    {
        let results: Box<dyn Iterator<Item = Result<Codemap, CodemapError>> + '_> =
            if self.parallel {
                let parsed: Vec<_> = files.par_iter().map(|path| read_codemap(path)).collect();
                Box::new(parsed.into_iter())
            } else {
                Box::new(files.iter().map(|path| read_codemap(path)))
            };

        let mut report = Report::default();
        let mut codemaps = Vec::new();

        for result in results {
            match result {
                Ok(codemap) => {
                    debug!(
                        path = %codemap.path.display(),
                        declarations = codemap.declarations.len(),
                        "summarized file"
                    );
                    report.summarized += 1;
                    match self.format {
                        OutputFormat::Text => out.write_all(render_codemap(&codemap).as_bytes())?,
                        OutputFormat::Json => codemaps.push(codemap),
                    }
                }
                Err(err) => {
                    debug!(error = %err, "skipping file");
                    on_error(&err);
                    report.errors.push(FileError {
                        path: err
                            .path()
                            .map(|p| p.display().to_string())
                            .unwrap_or_default(),
                        message: err.to_string(),
                    });
                }
            }
        }

        if self.format == OutputFormat::Json {
            let json = format_json(&codemaps, &report.errors)?;
            writeln!(out, "{json}")?;
        }

        Ok(report)
    }

    /// Discover and summarize in one step.
    pub fn run<W, F>(&self, out: &mut W, on_error: F) -> Result<Report, SummarizeError>
    where
        W: Write,
        F: FnMut(&CodemapError),
    {
        let files = self.discover()?;
        self.summarize(&files, out, on_error)
    }
}

/// Outcome of a summarize run.
#[derive(Debug, Default)]
pub struct Report {
    /// Files written to the output.
    pub summarized: usize,
    /// Files that could not be summarized.
    pub errors: Vec<FileError>,
}

impl Report {
    /// Whether every file was summarized.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

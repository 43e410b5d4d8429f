//! gosummarize - Summarize the exported API of a Go codebase for LLMs.
//!
//! gosummarize walks a directory tree, parses every Go file with
//! tree-sitter, and prints only the exported declarations (functions,
//! methods, types, constants and variables) with their doc comments.
//!
//! # Quick Start
//!
//! ```no_run
//! use gosummarize::builder::Summarizer;
//!
//! let mut out = std::io::stdout();
//! let report = Summarizer::new("./my-project")
//!     .exclude_tests(true)
//!     .run(&mut out, |err| eprintln!("{err}"))
//!     .unwrap();
//!
//! eprintln!("summarized {} files", report.summarized);
//! ```
//!
//! # Modules
//!
//! - [`walker`] - Go file discovery
//! - [`codemap`] - Tree-sitter based declaration extraction
//! - [`output`] - Text and JSON rendering
//! - [`builder`] - Fluent API tying it together
//!
//! # Output
//!
//! ```text
//! <<<FILE_START>>> pkg/server.go
//!
//! func (s *Server) Serve(addr string) error
//!     Serve listens on addr.
//!
//! <<<FILE_END>>> pkg/server.go
//! ```

pub mod errors;
pub mod walker;
pub mod codemap;
pub mod output;
pub mod builder;

// Re-export key types at crate root for convenience
pub use builder::{summarize_file, Report, Summarizer};
pub use codemap::{Codemap, CodemapError, Declaration, Location};
pub use errors::SummarizeError;
pub use output::{OutputError, OutputFormat};
pub use walker::{discover, WalkError, WalkOptions};

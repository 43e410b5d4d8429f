//! Output formatting for gosummarize.
//!
//! Renders codemaps as marker-delimited plain text (the default) or as a
//! single JSON document.

use std::io::{self, Write};

use serde::Serialize;
use thiserror::Error;

use crate::codemap::{format_type_params, Codemap, Declaration, TypeBody};

/// Marker opening a file's block.
pub const FILE_START: &str = "<<<FILE_START>>>";
/// Marker closing a file's block.
pub const FILE_END: &str = "<<<FILE_END>>>";

const DOC_INDENT: &str = "    ";

/// Errors that can occur during output formatting.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `<<<FILE_START>>>` / `<<<FILE_END>>>` delimited text (default).
    #[default]
    Text,
    /// JSON for programmatic access.
    Json,
}

/// Render the declaration line(s) of `decl`, without doc or trailing blank.
pub fn declaration_text(decl: &Declaration) -> String {
    match decl {
        Declaration::Function(func) => match &func.receiver {
            Some(receiver) => format!("func {} {}{}", receiver, func.name, func.signature),
            None => format!("func {}{}", func.name, func.signature),
        },
        Declaration::Type(ty) => {
            let params = format_type_params(&ty.type_params);
            match &ty.body {
                TypeBody::Struct(fields) => {
                    let mut text = format!("type {}{} struct {{\n", ty.name, params);
                    for field in fields {
                        if let Some(doc) = &field.doc {
                            for line in doc.lines() {
                                text.push_str(format!("\t// {line}").trim_end());
                                text.push('\n');
                            }
                        }
                        text.push_str(&format!("\t{}\t{}\n", field.name, field.ty));
                    }
                    text.push('}');
                    text
                }
                TypeBody::Other(definition) => format!("type {}{} {}", ty.name, params, definition),
            }
        }
        Declaration::Const(value) | Declaration::Var(value) => {
            let label = if matches!(decl, Declaration::Const(_)) {
                "const"
            } else {
                "var"
            };
            let mut text = format!("{} {}", label, value.name);
            if let Some(ty) = &value.ty {
                text.push(' ');
                text.push_str(ty);
            }
            if let Some(init) = &value.value {
                text.push_str(" = ");
                text.push_str(init);
            }
            text
        }
    }
}

/// Write one declaration block: its text, the doc, a blank line.
///
/// The doc is printed as one indented block, so only its first line carries
/// the indent.
pub fn write_declaration<W: Write>(out: &mut W, decl: &Declaration) -> io::Result<()> {
    writeln!(out, "{}", declaration_text(decl))?;
    if let Some(doc) = decl.doc() {
        writeln!(out, "{DOC_INDENT}{doc}")?;
    }
    writeln!(out)
}

/// Write a file's complete block, markers included.
pub fn write_codemap<W: Write>(out: &mut W, codemap: &Codemap) -> io::Result<()> {
    writeln!(out, "{} {}\n", FILE_START, codemap.path.display())?;
    for decl in &codemap.declarations {
        write_declaration(out, decl)?;
    }
    writeln!(out, "{} {}\n", FILE_END, codemap.path.display())
}

/// Render a file's complete block into a string.
pub fn render_codemap(codemap: &Codemap) -> String {
    let mut buf = Vec::with_capacity(1024);
    // Writing into a Vec cannot fail.
    let _ = write_codemap(&mut buf, codemap);
    String::from_utf8_lossy(&buf).into_owned()
}

// ============================================================================
// JSON Formatting
// ============================================================================

#[derive(Serialize)]
struct JsonOutput<'a> {
    files: Vec<JsonFile<'a>>,
    errors: &'a [FileError],
}

#[derive(Serialize)]
struct JsonFile<'a> {
    path: String,
    package: &'a str,
    declarations: Vec<JsonDeclaration<'a>>,
}

#[derive(Serialize)]
struct JsonDeclaration<'a> {
    kind: &'static str,
    name: &'a str,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    doc: Option<&'a str>,
    line: usize,
}

/// A file that could not be summarized.
#[derive(Debug, Clone, Serialize)]
pub struct FileError {
    pub path: String,
    pub message: String,
}

/// Format codemaps and per-file errors as one pretty-printed JSON document.
pub fn format_json(codemaps: &[Codemap], errors: &[FileError]) -> Result<String, OutputError> {
    let files = codemaps
        .iter()
        .map(|codemap| JsonFile {
            path: codemap.path.display().to_string(),
            package: &codemap.package,
            declarations: codemap
                .declarations
                .iter()
                .map(|decl| JsonDeclaration {
                    kind: decl.kind(),
                    name: decl.name(),
                    text: declaration_text(decl),
                    doc: decl.doc(),
                    line: decl.location().start_line,
                })
                .collect(),
        })
        .collect();

    let output = JsonOutput { files, errors };
    Ok(serde_json::to_string_pretty(&output)?)
}

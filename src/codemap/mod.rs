//! Codemap extraction using tree-sitter.
//!
//! Extracts the exported API (functions, methods, types, constants and
//! variables) of a Go source file without implementation bodies.

mod doc;
mod go;
mod printer;

use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};

use smallvec::SmallVec;
use thiserror::Error;
use tree_sitter::{Node, Parser};

// Thread-local parser caching to avoid re-initialization overhead.
//
// Parser initialization can fail (grammar load); that surfaces as
// `CodemapError::ParserInit` rather than a panic.
thread_local! {
    static GO_PARSER: RefCell<Option<Parser>> = const { RefCell::new(None) };
}

fn init_go_parser() -> Result<Parser, ()> {
    let mut p = Parser::new();
    p.set_language(&tree_sitter_go::LANGUAGE.into())
        .map_err(|_| ())?;
    Ok(p)
}

/// Execute a function with a cached Go parser.
pub(crate) fn with_go_parser<F, R>(f: F) -> Result<R, String>
where
    F: FnOnce(&mut Parser) -> R,
{
    GO_PARSER.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            *slot = Some(init_go_parser().map_err(|()| "failed to initialize parser".to_string())?);
        }

        let parser = slot
            .as_mut()
            .ok_or_else(|| "failed to initialize parser".to_string())?;
        Ok(f(parser))
    })
}

/// Find a child node by kind.
pub(crate) fn find_child_by_kind<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    node.children(&mut node.walk()).find(|c| c.kind() == kind)
}

/// Extract node text from content.
pub(crate) fn node_text(node: Node, content: &str) -> String {
    content[node.byte_range()].to_string()
}

/// Go exports an identifier iff its first character is an uppercase letter.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Source location of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// 1-indexed start line.
    pub start_line: usize,
    /// 1-indexed end line (inclusive).
    pub end_line: usize,
}

impl Location {
    pub fn new(start_line: usize, end_line: usize) -> Self {
        Self {
            start_line,
            end_line,
        }
    }

    pub(crate) fn of(node: Node) -> Self {
        Self::new(node.start_position().row + 1, node.end_position().row + 1)
    }
}

/// One entry of a parameter, result or type-parameter list.
///
/// `a, b int` is a single `Param` with two names; an unnamed `error`
/// result has no names at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub names: SmallVec<[String; 2]>,
    /// Type text. Variadic parameters carry the `...` prefix.
    pub ty: String,
}

impl Param {
    pub fn unnamed(ty: impl Into<String>) -> Self {
        Self {
            names: SmallVec::new(),
            ty: ty.into(),
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.names.is_empty() {
            write!(f, "{}", self.ty)
        } else {
            write!(f, "{} {}", self.names.join(", "), self.ty)
        }
    }
}

struct ParamList<'a>(&'a [Param]);

impl fmt::Display for ParamList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, param) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        Ok(())
    }
}

/// Format a type-parameter list as `[K comparable, V any]`, or nothing.
pub fn format_type_params(params: &[Param]) -> String {
    if params.is_empty() {
        String::new()
    } else {
        format!("[{}]", ParamList(params))
    }
}

/// A method receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receiver {
    /// Bound variable name; `None` for `func (T) M()`.
    pub name: Option<String>,
    pub ty: String,
}

impl fmt::Display for Receiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "({} {})", name, self.ty),
            None => write!(f, "({})", self.ty),
        }
    }
}

/// A function signature without the leading `func` keyword.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    pub type_params: Vec<Param>,
    pub params: Vec<Param>,
    pub results: Vec<Param>,
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_type_params(&self.type_params))?;
        write!(f, "({})", ParamList(&self.params))?;
        match self.results.as_slice() {
            [] => Ok(()),
            // A single anonymous result is printed without parentheses.
            [single] if single.names.is_empty() => write!(f, " {}", single.ty),
            results => write!(f, " ({})", ParamList(results)),
        }
    }
}

/// An exported function or method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub receiver: Option<Receiver>,
    pub signature: Signature,
    pub doc: Option<String>,
    pub location: Location,
}

/// An exported struct field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: String,
    pub doc: Option<String>,
}

/// The right-hand side of a type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeBody {
    /// A struct, reduced to its exported fields.
    Struct(SmallVec<[Field; 6]>),
    /// Any other type, as verbatim source text.
    Other(String),
}

/// An exported type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub name: String,
    pub type_params: Vec<Param>,
    pub body: TypeBody,
    pub doc: Option<String>,
    pub location: Location,
}

/// One exported name of a `const` or `var` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value {
    pub name: String,
    /// Explicitly stated type, if any.
    pub ty: Option<String>,
    /// Initializer at this name's position, if any.
    pub value: Option<String>,
    /// Doc of the enclosing declaration (shared by every group member).
    pub doc: Option<String>,
    pub location: Location,
}

/// An exported top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    /// A function, or a method when `receiver` is set.
    Function(Function),
    Type(TypeDecl),
    Const(Value),
    Var(Value),
}

impl Declaration {
    /// Get the declared name.
    pub fn name(&self) -> &str {
        match self {
            Declaration::Function(f) => &f.name,
            Declaration::Type(t) => &t.name,
            Declaration::Const(v) | Declaration::Var(v) => &v.name,
        }
    }

    /// Get the attached doc comment.
    pub fn doc(&self) -> Option<&str> {
        match self {
            Declaration::Function(f) => f.doc.as_deref(),
            Declaration::Type(t) => t.doc.as_deref(),
            Declaration::Const(v) | Declaration::Var(v) => v.doc.as_deref(),
        }
    }

    pub fn location(&self) -> Location {
        match self {
            Declaration::Function(f) => f.location,
            Declaration::Type(t) => t.location,
            Declaration::Const(v) | Declaration::Var(v) => v.location,
        }
    }

    /// Short kind label: `func`, `method`, `type`, `const` or `var`.
    pub fn kind(&self) -> &'static str {
        match self {
            Declaration::Function(f) if f.receiver.is_some() => "method",
            Declaration::Function(_) => "func",
            Declaration::Type(_) => "type",
            Declaration::Const(_) => "const",
            Declaration::Var(_) => "var",
        }
    }
}

/// Exported API of one Go source file.
#[derive(Debug, Clone)]
pub struct Codemap {
    /// Path to the source file.
    pub path: PathBuf,
    /// Name from the `package` clause.
    pub package: String,
    /// Exported declarations in source order.
    pub declarations: SmallVec<[Declaration; 16]>,
}

/// Errors during codemap extraction.
#[derive(Debug, Error)]
pub enum CodemapError {
    #[error("failed to initialize Go parser")]
    ParserInit,

    #[error("error parsing {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("failed to read file: {path}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CodemapError {
    /// Path of the file the error belongs to, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            CodemapError::ParserInit => None,
            CodemapError::Parse { path, .. } | CodemapError::ReadFailed { path, .. } => Some(path),
        }
    }
}

/// Extract a codemap from Go source code.
///
/// Fails with [`CodemapError::Parse`] when the source is not valid Go; no
/// partial declarations are returned in that case.
pub fn extract_codemap(path: &Path, content: &str) -> Result<Codemap, CodemapError> {
    let parsed = with_go_parser(|parser| go::extract(parser, content))
        .map_err(|_| CodemapError::ParserInit)?;

    let (package, declarations) = parsed.map_err(|message| CodemapError::Parse {
        path: path.to_path_buf(),
        message,
    })?;

    Ok(Codemap {
        path: path.to_path_buf(),
        package,
        declarations: declarations.into(),
    })
}

/// Read a file from disk and extract its codemap.
pub fn read_codemap(path: &Path) -> Result<Codemap, CodemapError> {
    let content = std::fs::read_to_string(path).map_err(|source| CodemapError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    extract_codemap(path, &content)
}

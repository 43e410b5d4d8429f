//! Re-serialization of type and expression nodes back to source text.

use std::ops::Range;

use tree_sitter::Node;

// Placeholder left where a comment was cut out, so comment-only lines can
// be recognized and dropped afterwards.
const COMMENT_MARK: char = '\u{0}';

// Placeholder for a raw string literal, restored verbatim after dedenting.
const RAW_MARK: char = '\u{1}';

#[derive(Clone, Copy, PartialEq, Eq)]
enum Cut {
    Comment,
    RawString,
}

/// Comments and raw string literals under `node`, in source order.
fn collect_cuts(node: Node, cuts: &mut Vec<(Range<usize>, Cut)>) {
    for child in node.children(&mut node.walk()) {
        match child.kind() {
            "comment" => cuts.push((child.byte_range(), Cut::Comment)),
            "raw_string_literal" => cuts.push((child.byte_range(), Cut::RawString)),
            _ if child.child_count() > 0 => collect_cuts(child, cuts),
            _ => {}
        }
    }
}

/// Leading whitespace of the line containing `offset`.
fn line_indent(content: &str, offset: usize) -> &str {
    let line_start = content[..offset].rfind('\n').map_or(0, |i| i + 1);
    let line = &content[line_start..];
    let end = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..end]
}

/// Source text of `node` with comments removed.
///
/// Lines that held nothing but a comment are dropped, trailing whitespace
/// is trimmed, and continuation lines lose the indentation of the line the
/// node starts on, so nested definitions print as if at top level. Raw
/// string literals are kept byte for byte.
pub(crate) fn source_text(node: Node, content: &str) -> String {
    let range = node.byte_range();

    if node.kind() == "raw_string_literal" {
        return content[range].to_string();
    }

    let mut cuts = Vec::new();
    collect_cuts(node, &mut cuts);

    if cuts.is_empty() && !content[range.clone()].contains('\n') {
        return content[range].trim_end().to_string();
    }

    let mut raw = String::with_capacity(range.len());
    let mut pos = range.start;
    for (cut, kind) in &cuts {
        raw.push_str(&content[pos..cut.start]);
        raw.push(match kind {
            Cut::Comment => COMMENT_MARK,
            Cut::RawString => RAW_MARK,
        });
        pos = cut.end;
    }
    raw.push_str(&content[pos..range.end]);

    let indent = line_indent(content, range.start);
    let mut lines = Vec::new();

    for (i, line) in raw.split('\n').enumerate() {
        let had_comment = line.contains(COMMENT_MARK);
        let line = line.replace(COMMENT_MARK, "");
        let line = line.trim_end();
        if had_comment && line.trim_start().is_empty() {
            continue;
        }
        let line = if i == 0 {
            line
        } else {
            line.strip_prefix(indent).unwrap_or(line)
        };
        lines.push(line.to_string());
    }

    let mut literals = cuts
        .iter()
        .filter(|(_, kind)| *kind == Cut::RawString)
        .map(|(cut, _)| &content[cut.clone()]);

    let mut text = String::with_capacity(range.len());
    for ch in lines.join("\n").chars() {
        if ch == RAW_MARK {
            text.push_str(literals.next().unwrap_or_default());
        } else {
            text.push(ch);
        }
    }
    text
}

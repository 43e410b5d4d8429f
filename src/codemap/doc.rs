//! Doc comment discovery and normalization.

use tree_sitter::Node;

/// Previous sibling, skipping statement terminators.
fn prev_token(node: Node) -> Option<Node> {
    let mut prev = node.prev_sibling();
    while let Some(sibling) = prev {
        if sibling.is_named() || !matches!(sibling.kind(), "\n" | ";") {
            return Some(sibling);
        }
        prev = sibling.prev_sibling();
    }
    None
}

/// Find the doc comment attached to `node`.
///
/// The doc is the run of comments that ends on the line directly above the
/// node, with no blank line between consecutive comments. A comment that
/// trails code on its own line belongs to that code and ends the run.
pub(crate) fn doc_comment(node: Node, content: &str) -> Option<String> {
    let mut comments = Vec::new();
    let mut next_row = node.start_position().row;
    let mut prev = prev_token(node);

    while let Some(sibling) = prev {
        if sibling.kind() != "comment" {
            break;
        }

        let end_row = sibling.end_position().row;
        let adjacent = if comments.is_empty() {
            end_row + 1 == next_row
        } else {
            end_row + 1 >= next_row
        };
        if !adjacent {
            break;
        }

        let before = prev_token(sibling);
        let trailing = before.is_some_and(|b| {
            b.kind() != "comment" && b.end_position().row == sibling.start_position().row
        });
        if trailing {
            break;
        }

        comments.push(&content[sibling.byte_range()]);
        next_row = sibling.start_position().row;
        prev = before;
    }

    comments.reverse();
    let text = comment_text(&comments);
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Convert raw comments to plain text.
///
/// Strips `//` (and one following space) or the `/* */` delimiters, drops
/// tool directives, removes trailing whitespace, drops leading blank lines
/// and collapses runs of blank lines.
pub(crate) fn comment_text(comments: &[&str]) -> String {
    let mut lines: Vec<&str> = Vec::new();

    for comment in comments {
        let body = if let Some(rest) = comment.strip_prefix("//") {
            if let Some(rest) = rest.strip_prefix(' ') {
                rest
            } else if is_directive(rest) {
                continue;
            } else {
                rest
            }
        } else if let Some(rest) = comment.strip_prefix("/*") {
            rest.strip_suffix("*/").unwrap_or(rest)
        } else {
            comment
        };

        lines.extend(body.split('\n').map(str::trim_end));
    }

    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    for line in lines {
        if !line.is_empty() || out.last().is_some_and(|l| !l.is_empty()) {
            out.push(line);
        }
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }

    out.join("\n")
}

/// `//go:generate`, `//line`, `//export` and friends are not documentation.
fn is_directive(text: &str) -> bool {
    if text.starts_with("line ") || text.starts_with("extern ") || text.starts_with("export ") {
        return true;
    }

    let bytes = text.as_bytes();
    let colon = match text.find(':') {
        Some(c) if c > 0 && c + 1 < bytes.len() => c,
        _ => return false,
    };

    (0..=colon + 1)
        .filter(|&i| i != colon)
        .all(|i| bytes[i].is_ascii_lowercase() || bytes[i].is_ascii_digit())
}

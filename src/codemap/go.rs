//! Go declaration extraction using tree-sitter.

use smallvec::SmallVec;
use tree_sitter::{Node, Parser};

use super::doc::doc_comment;
use super::printer::source_text;
use super::{
    find_child_by_kind, is_exported, node_text, Declaration, Field, Function, Location, Param,
    Receiver, Signature, TypeBody, TypeDecl, Value,
};

/// Parse Go source and extract its package name and exported declarations.
pub(crate) fn extract(
    parser: &mut Parser,
    content: &str,
) -> Result<(String, Vec<Declaration>), String> {
    let tree = parser
        .parse(content, None)
        .ok_or_else(|| "failed to parse".to_string())?;
    let root = tree.root_node();

    if let Some(message) = first_syntax_error(root, content) {
        return Err(message);
    }

    let package = find_child_by_kind(root, "package_clause")
        .and_then(|clause| find_child_by_kind(clause, "package_identifier"))
        .map(|n| node_text(n, content))
        .ok_or_else(|| "1:1: expected 'package' clause".to_string())?;

    let mut declarations = Vec::new();

    for child in root.children(&mut root.walk()) {
        match child.kind() {
            "function_declaration" | "method_declaration" => {
                if let Some(func) = extract_function(child, content) {
                    declarations.push(Declaration::Function(func));
                }
            }
            "type_declaration" => {
                extract_type_decl(child, content, &mut declarations);
            }
            "const_declaration" => {
                extract_values(child, content, Declaration::Const, &mut declarations);
            }
            "var_declaration" => {
                extract_values(child, content, Declaration::Var, &mut declarations);
            }
            _ => {}
        }
    }

    Ok((package, declarations))
}

/// Describe the first ERROR or MISSING node as `line:col: message`.
fn first_syntax_error(node: Node, content: &str) -> Option<String> {
    if !node.has_error() {
        return None;
    }

    let pos = node.start_position();
    let at = format!("{}:{}", pos.row + 1, pos.column + 1);

    if node.is_missing() {
        return Some(format!("{at}: missing '{}'", node.kind()));
    }

    if node.is_error() {
        let snippet: String = content[node.byte_range()]
            .lines()
            .next()
            .unwrap_or_default()
            .chars()
            .take(32)
            .collect();
        return Some(format!("{at}: syntax error near '{}'", snippet.trim()));
    }

    node.children(&mut node.walk())
        .find_map(|child| first_syntax_error(child, content))
        .or_else(|| Some(format!("{at}: syntax error")))
}

fn extract_function(node: Node, content: &str) -> Option<Function> {
    let name = node
        .child_by_field_name("name")
        .map(|n| node_text(n, content))?;

    if !is_exported(&name) {
        return None;
    }

    let receiver = node
        .child_by_field_name("receiver")
        .and_then(|list| extract_receiver(list, content));

    let type_params = node
        .child_by_field_name("type_parameters")
        .map(|list| extract_params(list, content))
        .unwrap_or_default();

    let params = node
        .child_by_field_name("parameters")
        .map(|list| extract_params(list, content))
        .unwrap_or_default();

    let results = match node.child_by_field_name("result") {
        Some(result) if result.kind() == "parameter_list" => extract_params(result, content),
        Some(result) => vec![Param::unnamed(source_text(result, content))],
        None => Vec::new(),
    };

    Some(Function {
        name,
        receiver,
        signature: Signature {
            type_params,
            params,
            results,
        },
        doc: doc_comment(node, content),
        location: Location::of(node),
    })
}

/// Only the first receiver entry is meaningful.
fn extract_receiver(list: Node, content: &str) -> Option<Receiver> {
    let param = extract_params(list, content).into_iter().next()?;
    Some(Receiver {
        name: param.names.into_iter().next(),
        ty: param.ty,
    })
}

/// Extract a parameter, result or type-parameter list, keeping name groups.
fn extract_params(list: Node, content: &str) -> Vec<Param> {
    let mut params = Vec::new();

    for child in list.named_children(&mut list.walk()) {
        let variadic = match child.kind() {
            "parameter_declaration" | "type_parameter_declaration" => false,
            "variadic_parameter_declaration" => true,
            _ => continue,
        };

        let names: SmallVec<[String; 2]> = child
            .children_by_field_name("name", &mut child.walk())
            .filter(|n| n.kind() == "identifier")
            .map(|n| node_text(n, content))
            .collect();

        let ty = child
            .child_by_field_name("type")
            .map(|t| source_text(t, content))
            .unwrap_or_default();

        let ty = if variadic { format!("...{ty}") } else { ty };

        params.push(Param { names, ty });
    }

    params
}

fn extract_type_decl(node: Node, content: &str, declarations: &mut Vec<Declaration>) {
    // Every type_spec in a `type ( ... )` group shares the group's doc.
    let doc = doc_comment(node, content);

    for spec in specs(node, &["type_spec", "type_alias"]) {
        if let Some(decl) = extract_type_spec(spec, content, doc.clone()) {
            declarations.push(Declaration::Type(decl));
        }
    }
}

fn extract_type_spec(node: Node, content: &str, doc: Option<String>) -> Option<TypeDecl> {
    let name = node
        .child_by_field_name("name")
        .map(|n| node_text(n, content))?;

    if !is_exported(&name) {
        return None;
    }

    let ty = node.child_by_field_name("type")?;

    let type_params = node
        .child_by_field_name("type_parameters")
        .map(|list| extract_params(list, content))
        .unwrap_or_default();

    let body = if ty.kind() == "struct_type" {
        let fields = find_child_by_kind(ty, "field_declaration_list")
            .map(|list| extract_struct_fields(list, content))
            .unwrap_or_default();
        TypeBody::Struct(fields)
    } else {
        TypeBody::Other(source_text(ty, content))
    };

    Some(TypeDecl {
        name,
        type_params,
        body,
        doc,
        location: Location::of(node),
    })
}

/// Exported named fields. Embedded fields have no name and are dropped.
fn extract_struct_fields(list: Node, content: &str) -> SmallVec<[Field; 6]> {
    let mut fields = SmallVec::new();

    for field in list.named_children(&mut list.walk()) {
        if field.kind() != "field_declaration" {
            continue;
        }

        let Some(ty) = field.child_by_field_name("type") else {
            continue;
        };
        let ty = source_text(ty, content);
        let doc = doc_comment(field, content);

        let names: Vec<String> = field
            .children_by_field_name("name", &mut field.walk())
            .filter(|n| n.kind() == "field_identifier")
            .map(|n| node_text(n, content))
            .collect();

        for name in names.into_iter().filter(|n| is_exported(n)) {
            fields.push(Field {
                name,
                ty: ty.clone(),
                doc: doc.clone(),
            });
        }
    }

    fields
}

fn extract_values(
    node: Node,
    content: &str,
    wrap: fn(Value) -> Declaration,
    declarations: &mut Vec<Declaration>,
) {
    let doc = doc_comment(node, content);

    for spec in specs(node, &["const_spec", "var_spec"]) {
        let ty = spec
            .child_by_field_name("type")
            .map(|t| source_text(t, content));

        let values: Vec<Node> = spec
            .child_by_field_name("value")
            .map(|list| {
                list.named_children(&mut list.walk())
                    .filter(|n| n.kind() != "comment")
                    .collect()
            })
            .unwrap_or_default();

        // The `name` field of a const_spec also covers the separating commas.
        let names: Vec<Node> = spec
            .children_by_field_name("name", &mut spec.walk())
            .filter(|n| n.kind() == "identifier")
            .collect();

        for (i, name) in names.into_iter().enumerate() {
            let name = node_text(name, content);
            if !is_exported(&name) {
                continue;
            }

            // Positions without their own initializer (iota carry-over)
            // are left without a value.
            let value = values.get(i).map(|v| source_text(*v, content));

            declarations.push(wrap(Value {
                name,
                ty: ty.clone(),
                value,
                doc: doc.clone(),
                location: Location::of(spec),
            }));
        }
    }
}

/// Specs of a declaration, looking through `*_spec_list` wrappers.
fn specs<'a>(node: Node<'a>, kinds: &[&str]) -> Vec<Node<'a>> {
    let mut found = Vec::new();
    for child in node.named_children(&mut node.walk()) {
        if kinds.contains(&child.kind()) {
            found.push(child);
        } else if child.kind().ends_with("_spec_list") {
            found.extend(specs(child, kinds));
        }
    }
    found
}

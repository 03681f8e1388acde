//
//  handlers.rs
//  Swagdoc
//
//  Created by hak (tharun)
//

use std::path::Path;

use tree_sitter::Node;
use tracing::debug;

use super::helpers::node_text;
use crate::error::Result;
use crate::parser::language::parse_go;
use crate::parser::types::{ContextShape, HandlerDeclaration};

/// Extract every exported handler declared at the top level of a Go file.
///
/// A handler is a function or method with exactly one parameter whose type
/// matches one of `shapes`. Shapes are tried in order and the first match
/// wins. Everything else is skipped without error.
pub fn extract_handlers(
    path: &Path,
    source: &[u8],
    shapes: &[ContextShape],
) -> Result<Vec<HandlerDeclaration>> {
    let tree = parse_go(path, source)?;
    let root = tree.root_node();

    let mut handlers = Vec::new();
    for i in 0..root.child_count() {
        let Some(decl) = root.child(i) else {
            continue;
        };
        if !matches!(decl.kind(), "function_declaration" | "method_declaration") {
            continue;
        }
        if let Some(handler) = handler_from_decl(&decl, source, shapes) {
            debug!(
                handler = %handler.name,
                framework = %handler.framework,
                file = %path.display(),
                "found handler"
            );
            handlers.push(handler);
        }
    }

    Ok(handlers)
}

fn handler_from_decl(
    decl: &Node,
    source: &[u8],
    shapes: &[ContextShape],
) -> Option<HandlerDeclaration> {
    let name = node_text(&decl.child_by_field_name("name")?, source);
    if !is_exported(name) {
        return None;
    }

    let params = decl.child_by_field_name("parameters")?;
    let param_type = single_param_type(&params)?;
    let shape = shapes.iter().find(|s| shape_matches(s, &param_type, source))?;

    let receiver = decl
        .child_by_field_name("receiver")
        .and_then(|r| single_param_type(&r))
        .map(|t| node_text(&t, source).to_string());

    Some(HandlerDeclaration {
        name: name.to_string(),
        framework: shape.framework.clone(),
        param_type: node_text(&param_type, source).to_string(),
        receiver,
        start_byte: decl.start_byte(),
        end_byte: decl.end_byte(),
        line_start: decl.start_position().row + 1,
        line_end: decl.end_position().row + 1,
    })
}

/// Go exports identifiers that start with an upper-case letter.
fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Type node of the only parameter in a parameter list.
///
/// Counts declared names, so `(a, b *gin.Context)` has two parameters and
/// an unnamed `(*gin.Context)` has one.
fn single_param_type<'t>(params: &Node<'t>) -> Option<Node<'t>> {
    let mut count = 0;
    let mut only = None;

    for i in 0..params.named_child_count() {
        let Some(param) = params.named_child(i) else {
            continue;
        };
        match param.kind() {
            "parameter_declaration" | "variadic_parameter_declaration" => {
                let mut cursor = param.walk();
                let names = param.children_by_field_name("name", &mut cursor).count();
                count += names.max(1);
                only = param.child_by_field_name("type");
            }
            _ => {}
        }
    }

    if count == 1 {
        only
    } else {
        None
    }
}

fn shape_matches(shape: &ContextShape, ty: &Node, source: &[u8]) -> bool {
    let (inner, is_pointer) = if ty.kind() == "pointer_type" {
        match ty.named_child(0) {
            Some(inner) => (inner, true),
            None => return false,
        }
    } else {
        (*ty, false)
    };

    if is_pointer != shape.pointer || inner.kind() != "qualified_type" {
        return false;
    }

    let package = inner
        .child_by_field_name("package")
        .map(|n| node_text(&n, source));
    let type_name = inner.child_by_field_name("name").map(|n| node_text(&n, source));

    package == Some(shape.package.as_str()) && type_name == Some(shape.type_name.as_str())
}

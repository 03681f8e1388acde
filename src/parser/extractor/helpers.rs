//
//  helpers.rs
//  Swagdoc
//
//  Created by hak (tharun)
//

use tree_sitter::Node;

/// Get the full text of a node.
pub fn node_text<'s>(node: &Node, source: &'s [u8]) -> &'s str {
    node.utf8_text(source).unwrap_or("")
}

/// Whether a node is a Go string literal ("..." or `...`).
pub fn is_string_literal(node: &Node) -> bool {
    matches!(node.kind(), "interpreted_string_literal" | "raw_string_literal")
}

/// First argument of a call, if it is a string literal, with quotes removed.
pub fn first_string_arg(call: &Node, source: &[u8]) -> Option<String> {
    let args = call.child_by_field_name("arguments")?;
    let first = args.named_child(0)?;
    if !is_string_literal(&first) {
        return None;
    }
    Some(strip_quotes(node_text(&first, source)))
}

/// Selector name of a call like `r.GET(...)`, plus its operand node.
pub fn selector_call<'t>(call: &Node<'t>, source: &[u8]) -> Option<(Node<'t>, String)> {
    let func = call.child_by_field_name("function")?;
    if func.kind() != "selector_expression" {
        return None;
    }
    let operand = func.child_by_field_name("operand")?;
    let field = func.child_by_field_name("field")?;
    Some((operand, node_text(&field, source).to_string()))
}

pub fn strip_quotes(s: &str) -> String {
    let s = s.trim();
    if s.len() < 2 {
        return s.to_string();
    }

    // Handle `raw string` or "string"
    if (s.starts_with('"') && s.ends_with('"')) || (s.starts_with('`') && s.ends_with('`')) {
        s[1..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}

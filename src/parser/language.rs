//
//  language.rs
//  Swagdoc
//
//  Created by hak (tharun)
//

use std::path::Path;

use tree_sitter::{Language, Parser, Tree};

use crate::error::{Result, SwagdocError};

/// The Go grammar.
pub fn go_language() -> Language {
    tree_sitter_go::LANGUAGE.into()
}

/// Whether a path looks like a Go source file.
pub fn is_go_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "go")
}

/// Parse Go source into a syntax tree.
///
/// tree-sitter recovers from syntax errors; a tree containing ERROR or
/// MISSING nodes is reported as a parse failure so that offsets are never
/// taken from a guessed structure.
pub fn parse_go(path: &Path, source: &[u8]) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&go_language())
        .map_err(|e| SwagdocError::ParserInit(path.to_path_buf(), e.to_string()))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| SwagdocError::Parse(path.to_path_buf(), "parser returned no tree".into()))?;

    let root = tree.root_node();
    if root.has_error() {
        let line = first_error_line(&root).unwrap_or(root.start_position().row + 1);
        return Err(SwagdocError::Parse(
            path.to_path_buf(),
            format!("syntax error near line {line}"),
        ));
    }

    Ok(tree)
}

fn first_error_line(node: &tree_sitter::Node) -> Option<usize> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_position().row + 1);
    }
    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            if child.has_error() {
                if let Some(line) = first_error_line(&child) {
                    return Some(line);
                }
            }
        }
    }
    None
}

//
//  go.rs
//  Swagdoc
//
//  Created by hak (tharun)
//

use std::collections::HashMap;
use std::path::Path;

use tree_sitter::Node;
use tracing::{debug, info};

use crate::error::{Result, SwagdocError};
use crate::parser::extractor::helpers::{first_string_arg, node_text, selector_call};
use crate::parser::language::parse_go;
use crate::parser::types::Route;

/// Selector names that register a route (Gin and Echo spell them upper-case).
pub const HTTP_METHODS: &[&str] = &["GET", "POST", "PUT", "DELETE", "PATCH", "OPTIONS", "HEAD"];

/// Selector name that opens a prefixed route group.
pub const GROUP_SELECTOR: &str = "Group";

/// Extract routes from the route registration file.
///
/// No file configured means no routes; route hints are optional.
pub fn extract_routes(route_file: Option<&Path>) -> Result<Vec<Route>> {
    let Some(path) = route_file.filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(Vec::new());
    };

    if !path.exists() {
        return Err(SwagdocError::RouteFileNotFound(path.to_path_buf()));
    }

    let source = std::fs::read(path)?;
    let routes = extract_routes_from_source(path, &source)?;
    info!(file = %path.display(), routes = routes.len(), "extracted routes");
    Ok(routes)
}

/// Extract routes from Go source, in registration order.
pub fn extract_routes_from_source(path: &Path, source: &[u8]) -> Result<Vec<Route>> {
    let tree = parse_go(path, source)?;
    let mut walker = RouteWalker {
        source,
        bindings: HashMap::new(),
        routes: Vec::new(),
    };
    walker.walk(tree.root_node(), None);
    Ok(walker.routes)
}

/// One group prefix in a chain of enclosing `Group(...)` calls.
///
/// Each call's subtree gets a new cell pointing at its parent, so a prefix
/// is only visible below the call that introduced it. A cell holds the
/// call's full prefix, including whatever its receiver already carries.
struct Scope<'a> {
    prefix: String,
    parent: Option<&'a Scope<'a>>,
}

/// Concatenate prefixes, outermost first.
fn join_scope(scope: Option<&Scope>) -> String {
    match scope {
        None => String::new(),
        Some(s) => {
            let mut joined = join_scope(s.parent);
            joined.push_str(&s.prefix);
            joined
        }
    }
}

struct RouteWalker<'s> {
    source: &'s [u8],
    /// Variables bound to a group expression (`v1 := r.Group("/v1")`) and
    /// the prefix that group carries.
    bindings: HashMap<String, String>,
    routes: Vec<Route>,
}

impl RouteWalker<'_> {
    fn walk(&mut self, node: Node, scope: Option<&Scope>) {
        match node.kind() {
            "call_expression" => {
                if let Some((operand, selector)) = selector_call(&node, self.source) {
                    if HTTP_METHODS.contains(&selector.as_str()) {
                        self.record_route(&node, operand, &selector, scope);
                    }

                    if selector == GROUP_SELECTOR {
                        if let Some(prefix) = self.group_prefix(node) {
                            let inner = Scope {
                                prefix,
                                parent: scope,
                            };
                            self.walk_children(node, Some(&inner));
                            return;
                        }
                    }
                }
            }
            "short_var_declaration" | "assignment_statement" => {
                if let (Some(left), Some(right)) = (
                    node.child_by_field_name("left"),
                    node.child_by_field_name("right"),
                ) {
                    self.bind(&left, &right);
                }
            }
            "var_spec" => {
                if let Some(value) = node.child_by_field_name("value") {
                    let mut cursor = node.walk();
                    let names: Vec<Node> = node.children_by_field_name("name", &mut cursor).collect();
                    self.bind_all(&names, &value);
                }
            }
            _ => {}
        }

        self.walk_children(node, scope);
    }

    fn walk_children(&mut self, node: Node, scope: Option<&Scope>) {
        for i in 0..node.child_count() {
            if let Some(child) = node.child(i) {
                self.walk(child, scope);
            }
        }
    }

    fn record_route(&mut self, call: &Node, operand: Node, method: &str, scope: Option<&Scope>) {
        let Some(path) = first_string_arg(call, self.source) else {
            return;
        };

        let mut pattern = join_scope(scope);
        pattern.push_str(&self.receiver_prefix(operand));
        pattern.push_str(&path);

        debug!(method, path = %path, pattern = %pattern, line = call.start_position().row + 1, "found route");
        self.routes.push(Route::new(method, path, pattern));
    }

    fn bind(&mut self, left: &Node, right: &Node) {
        let names: Vec<Node> = (0..left.named_child_count())
            .filter_map(|i| left.named_child(i))
            .collect();
        self.bind_all(&names, right);
    }

    /// Pair `a, b := x, y` positionally; a name assigned anything other than
    /// a group expression loses its previous binding.
    fn bind_all(&mut self, names: &[Node], values: &Node) {
        for (i, name) in names.iter().enumerate() {
            let key = node_text(name, self.source).to_string();
            if key.is_empty() || key == "_" {
                continue;
            }
            match values.named_child(i).and_then(|v| self.group_prefix(v)) {
                Some(prefix) => {
                    debug!(var = %key, prefix = %prefix, "bound route group");
                    self.bindings.insert(key, prefix);
                }
                None => {
                    self.bindings.remove(&key);
                }
            }
        }
    }

    /// Prefix carried by an expression that evaluates to a route group.
    fn group_prefix(&self, expr: Node) -> Option<String> {
        match expr.kind() {
            "call_expression" => {
                let (operand, selector) = selector_call(&expr, self.source)?;
                if selector != GROUP_SELECTOR {
                    return None;
                }
                let prefix = first_string_arg(&expr, self.source)?;
                Some(self.receiver_prefix(operand) + &prefix)
            }
            "identifier" | "selector_expression" => {
                self.bindings.get(node_text(&expr, self.source)).cloned()
            }
            "parenthesized_expression" => self.group_prefix(expr.named_child(0)?),
            _ => None,
        }
    }

    /// Prefix contributed by the receiver of a registration call.
    fn receiver_prefix(&self, operand: Node) -> String {
        self.group_prefix(operand).unwrap_or_default()
    }
}

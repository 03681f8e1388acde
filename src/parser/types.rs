//
//  types.rs
//  Swagdoc
//
//  Created by hak (tharun)
//

use std::fmt;

use serde::Serialize;

use crate::config::ContextTypeConfig;

/// A statically discovered route registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    /// Upper-case HTTP method token as written (`GET`, `POST`, ...).
    pub method: String,
    /// Path literal passed to the registration call.
    pub path: String,
    /// Path with every enclosing group prefix applied, outermost first.
    pub pattern: String,
}

impl Route {
    pub fn new(method: impl Into<String>, path: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            pattern: pattern.into(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.pattern)
    }
}

/// A request-context parameter shape that marks a function as a handler.
///
/// `*gin.Context` is `{ package: "gin", type_name: "Context", pointer: true }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextShape {
    pub framework: String,
    pub package: String,
    pub type_name: String,
    pub pointer: bool,
}

impl ContextShape {
    pub fn new(package: &str, type_name: &str, pointer: bool) -> Self {
        Self {
            framework: package.to_string(),
            package: package.to_string(),
            type_name: type_name.to_string(),
            pointer,
        }
    }

    /// Built-in shapes, in the order they are tried.
    pub fn builtin() -> Vec<Self> {
        vec![Self::new("gin", "Context", true), Self::new("echo", "Context", false)]
    }

    /// Built-in shapes followed by configured ones.
    pub fn with_extra(extra: &[ContextTypeConfig]) -> Vec<Self> {
        let mut shapes = Self::builtin();
        for c in extra {
            let shape = Self::new(&c.package, &c.type_name, c.pointer);
            if !shapes.contains(&shape) {
                shapes.push(shape);
            }
        }
        shapes
    }
}

impl fmt::Display for ContextShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let star = if self.pointer { "*" } else { "" };
        write!(f, "{star}{}.{}", self.package, self.type_name)
    }
}

/// A handler function found in a Go file.
///
/// Offsets index the file content the declaration was extracted from and
/// are only meaningful against that exact buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerDeclaration {
    pub name: String,
    /// Framework of the matched context shape (`gin`, `echo`, ...).
    pub framework: String,
    /// Parameter type as written in the source.
    pub param_type: String,
    /// Receiver type for methods, e.g. `*UserHandler`.
    pub receiver: Option<String>,
    pub start_byte: usize,
    pub end_byte: usize,
    pub line_start: usize,
    pub line_end: usize,
}

impl HandlerDeclaration {
    pub fn span(&self) -> std::ops::Range<usize> {
        self.start_byte..self.end_byte
    }
}

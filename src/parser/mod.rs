//
//  mod.rs
//  Swagdoc
//
//  Created by hak (tharun)
//

pub mod extractor;
pub mod language;
pub mod queries;
pub mod types;

pub use extractor::extract_handlers;
pub use language::{is_go_file, parse_go};
pub use queries::{extract_routes, extract_routes_from_source};
pub use types::{ContextShape, HandlerDeclaration, Route};

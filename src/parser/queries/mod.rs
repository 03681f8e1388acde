//
//  mod.rs
//  Swagdoc
//
//  Created by hak (tharun)
//

pub mod go;

pub use go::{extract_routes, extract_routes_from_source, GROUP_SELECTOR, HTTP_METHODS};

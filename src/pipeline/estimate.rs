//
//  estimate.rs
//  Swagdoc
//
//  Created by hak (tharun)
//

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::debug;

use crate::generate::estimate_tokens;
use crate::parser::extract_handlers;
use crate::parser::types::ContextShape;

/// USD per one million tokens.
pub const COST_PER_MILLION_TOKENS: f64 = 5.0;

/// Rough token count for every generation request a run would make, plus
/// the route file.
///
/// Files that cannot be read or parsed count as zero; the run itself
/// reports them.
pub fn estimate_total_tokens(files: &[PathBuf], route_file: Option<&Path>, shapes: &[ContextShape]) -> usize {
    let handlers: usize = files
        .par_iter()
        .map(|path| {
            let Ok(source) = fs::read(path) else {
                return 0;
            };
            let handlers = match extract_handlers(path, &source, shapes) {
                Ok(handlers) => handlers,
                Err(e) => {
                    debug!(file = %path.display(), error = %e, "skipping file in estimate");
                    return 0;
                }
            };
            handlers
                .iter()
                .filter_map(|h| source.get(h.span()))
                .map(|bytes| estimate_tokens(&String::from_utf8_lossy(bytes)))
                .sum::<usize>()
        })
        .sum();

    let routes = route_file
        .and_then(|path| fs::read(path).ok())
        .map(|source| estimate_tokens(&String::from_utf8_lossy(&source)))
        .unwrap_or(0);

    handlers + routes
}

pub fn estimate_cost_usd(tokens: usize) -> f64 {
    tokens as f64 / 1_000_000.0 * COST_PER_MILLION_TOKENS
}

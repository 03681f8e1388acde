//
//  matcher.rs
//  Swagdoc
//
//  Created by hak (tharun)
//

//! Handler-to-route matching.
//!
//! Handlers and routes are not linked statically, so routes are ranked by
//! how much text their path shares with the handler's name. The result is
//! a hint for the `@Router` annotation, not an exact mapping.

use std::collections::HashSet;

use crate::config::MatcherConfig;
use crate::parser::types::Route;

/// A route with the substrings its path shares with a handler name.
#[derive(Debug, Clone)]
pub struct MatchCandidate<'r> {
    pub route: &'r Route,
    pub substrings: Vec<String>,
    pub total_len: usize,
}

/// Rank `routes` against `handler` and render the best ones as
/// `path [method], path [method]`. Returns an empty string when nothing matches.
pub fn match_handler_to_routes(handler: &str, routes: &[Route], config: &MatcherConfig) -> String {
    rank_routes(handler, routes, config)
        .iter()
        .take(config.max_routes)
        .map(|c| format!("{} [{}]", c.route.path, c.route.method.to_lowercase()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// All routes sharing at least one substring with `handler`, best first.
///
/// Ordered by number of shared substrings, then their summed length; ties
/// keep declaration order.
pub fn rank_routes<'r>(handler: &str, routes: &'r [Route], config: &MatcherConfig) -> Vec<MatchCandidate<'r>> {
    let handler = handler.trim().to_lowercase();

    let mut candidates: Vec<MatchCandidate> = routes
        .iter()
        .filter_map(|route| {
            let path = route.path.trim().to_lowercase();
            let (substrings, total_len) = shared_substrings(&handler, &path, config.min_substring_len);
            (!substrings.is_empty()).then_some(MatchCandidate {
                route,
                substrings,
                total_len,
            })
        })
        .collect();

    // sort_by is stable
    candidates.sort_by(|a, b| {
        b.substrings
            .len()
            .cmp(&a.substrings.len())
            .then(b.total_len.cmp(&a.total_len))
    });
    candidates
}

/// Every distinct substring of `path` longer than `min_len` bytes that also
/// occurs in `handler`, in scan order, plus their summed length.
fn shared_substrings(handler: &str, path: &str, min_len: usize) -> (Vec<String>, usize) {
    let mut boundaries: Vec<usize> = path.char_indices().map(|(i, _)| i).collect();
    boundaries.push(path.len());

    let mut seen: HashSet<&str> = HashSet::new();
    let mut substrings = Vec::new();
    let mut total_len = 0;

    for (n, &start) in boundaries.iter().enumerate() {
        for &end in &boundaries[n + 1..] {
            let sub = &path[start..end];
            if sub.len() > min_len && handler.contains(sub) && seen.insert(sub) {
                substrings.push(sub.to_string());
                total_len += sub.len();
            }
        }
    }

    (substrings, total_len)
}

//
//  processor.rs
//  Swagdoc
//
//  Created by hak (tharun)
//

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::config::MatcherConfig;
use crate::error::{Result, SwagdocError};
use crate::generate::{CommentGenerator, GenerationRequest, SYSTEM_PROMPT};
use crate::matcher::match_handler_to_routes;
use crate::parser::types::{HandlerDeclaration, Route};
use crate::write::HandlerResult;

/// Everything a handler task needs, shared across all files of a run.
#[derive(Clone)]
pub struct HandlerContext {
    pub generator: Arc<dyn CommentGenerator>,
    pub routes: Arc<[Route]>,
    pub model: String,
    pub matcher: MatcherConfig,
    pub timeout: Duration,
}

/// Exact source text of a handler, taken from the file it was parsed from.
pub fn render_handler<'s>(decl: &HandlerDeclaration, original: &'s [u8]) -> Result<&'s str> {
    let bytes = original.get(decl.span()).ok_or_else(|| SwagdocError::Render {
        handler: decl.name.clone(),
        reason: format!("span {}..{} outside file of {} bytes", decl.start_byte, decl.end_byte, original.len()),
    })?;
    std::str::from_utf8(bytes).map_err(|e| SwagdocError::Render {
        handler: decl.name.clone(),
        reason: e.to_string(),
    })
}

/// Generate the comment for one handler.
///
/// Every failure is tagged with the handler's name and affects only this
/// handler.
pub async fn process_handler(
    decl: &HandlerDeclaration,
    original: &[u8],
    ctx: &HandlerContext,
) -> Result<HandlerResult> {
    let source = render_handler(decl, original)?;
    let routes = match_handler_to_routes(&decl.name, &ctx.routes, &ctx.matcher);
    debug!(handler = %decl.name, routes = %routes, "matched routes");

    let request = GenerationRequest {
        system: SYSTEM_PROMPT,
        source,
        model: &ctx.model,
        routes: (!routes.is_empty()).then_some(routes.as_str()),
    };

    let generated = match tokio::time::timeout(ctx.timeout, ctx.generator.generate(&request)).await {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            return Err(SwagdocError::Generation {
                handler: decl.name.clone(),
                reason: format!("{e:#}"),
            })
        }
        Err(_) => {
            return Err(SwagdocError::Timeout {
                handler: decl.name.clone(),
                secs: ctx.timeout.as_secs(),
            })
        }
    };

    Ok(HandlerResult {
        name: decl.name.clone(),
        comment: generated.trim_end().to_string(),
        start: decl.start_byte,
        end: decl.end_byte,
    })
}

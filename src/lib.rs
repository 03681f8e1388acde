//! # Swagdoc
//!
//! Swagger comment generation for Go HTTP handlers.
//!
//! Swagdoc parses a Go project with tree-sitter, finds handler functions by
//! their context parameter (`*gin.Context`, `echo.Context`, ...), reads the
//! route table out of a router file, and asks a text-generation backend for
//! a godoc/Swagger block per handler. Comments are spliced in above each
//! handler and every rewritten file keeps a sibling backup.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use swagdoc::{generate_comments, OpenAiGenerator, PipelineOptions, SwagdocConfig};
//!
//! # async fn run() -> swagdoc::Result<()> {
//! let config = SwagdocConfig::default();
//! let generator = Arc::new(OpenAiGenerator::from_env(&config.generation)?);
//! let options = PipelineOptions::from_config(&config, true);
//!
//! let report = generate_comments(Path::new("."), Some(Path::new("router.go")), generator, options).await?;
//! println!("{} handlers documented", report.handlers_documented());
//! # Ok(())
//! # }
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod error;
pub mod generate;
pub mod matcher;
pub mod parser;
pub mod pipeline;
pub mod scan;
pub mod write;

// Re-exports for convenience
pub use backup::{restore_backups, RestoreReport};
pub use config::SwagdocConfig;
pub use error::{Result, SwagdocError};
pub use generate::{CommentGenerator, GenerationRequest, OpenAiGenerator};
pub use matcher::match_handler_to_routes;
pub use parser::{extract_handlers, extract_routes, HandlerDeclaration, Route};
pub use pipeline::{Pipeline, PipelineOptions, PipelineReport};
pub use scan::scan_dir;
pub use write::{rewrite_file, HandlerResult, WriteMode};

use std::path::Path;
use std::sync::Arc;

use tracing::info;

/// Document every handler under `root`.
///
/// Discovery and route-file failures abort before anything is generated.
/// After that, failures are per file or per handler and land in the report.
pub async fn generate_comments(
    root: &Path,
    route_file: Option<&Path>,
    generator: Arc<dyn CommentGenerator>,
    options: PipelineOptions,
) -> Result<PipelineReport> {
    let files = scan_dir(root)?;
    let routes = extract_routes(route_file)?;
    info!(root = %root.display(), files = files.len(), routes = routes.len(), "discovered project");

    let pipeline = Pipeline::new(generator, routes, options);
    Ok(pipeline.run(files).await)
}

/// Undo previous runs by moving every backup under `root` back in place.
pub fn restore(root: &Path, backup_suffix: &str) -> Result<RestoreReport> {
    restore_backups(root, backup_suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::fs;
    use tempfile::tempdir;

    struct Fixed;

    #[async_trait]
    impl CommentGenerator for Fixed {
        async fn generate(&self, request: &GenerationRequest<'_>) -> anyhow::Result<String> {
            Ok(format!("// @Router {}", request.routes.unwrap_or("/none [get]")))
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    const ROUTER: &str = r#"package main

func setup(r *gin.Engine) {
	api := r.Group("/api")
	api.GET("/users", ListUsers)
}
"#;

    const HANDLERS: &str = "package main\n\nfunc ListUsers(c *gin.Context) {\n}\n";

    #[tokio::test]
    async fn test_generate_then_restore() {
        let dir = tempdir().unwrap();
        let router = dir.path().join("router.go");
        let handlers = dir.path().join("handlers.go");
        fs::write(&router, ROUTER).unwrap();
        fs::write(&handlers, HANDLERS).unwrap();

        let options = PipelineOptions::default();
        let report = generate_comments(dir.path(), Some(router.as_path()), Arc::new(Fixed), options)
            .await
            .unwrap();

        assert_eq!(report.files_updated(), 1);
        assert!(report.is_clean());
        assert_eq!(
            fs::read_to_string(&handlers).unwrap(),
            "package main\n\n// @Router /users [get]\nfunc ListUsers(c *gin.Context) {\n}\n"
        );

        let restored = restore(dir.path(), ".bak").unwrap();
        assert_eq!(restored.restored, vec![handlers.clone()]);
        assert_eq!(fs::read_to_string(&handlers).unwrap(), HANDLERS);
    }

    #[tokio::test]
    async fn test_missing_route_file_aborts() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("handlers.go"), HANDLERS).unwrap();

        let missing = dir.path().join("nope.go");
        let err = generate_comments(dir.path(), Some(missing.as_path()), Arc::new(Fixed), PipelineOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, SwagdocError::RouteFileNotFound(_)));
        assert_eq!(fs::read_to_string(dir.path().join("handlers.go")).unwrap(), HANDLERS);
    }
}

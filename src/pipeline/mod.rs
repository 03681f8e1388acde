//! The generate-then-splice pipeline.
//!
//! Files fan out to tasks, and each file's handlers fan out again. Two
//! semaphores bound the work: one for files in flight and one for
//! generation requests in flight. Failures are captured per file and per
//! handler and never cancel sibling tasks.

pub mod estimate;
pub mod processor;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::{Id, JoinError, JoinSet};
use tracing::{debug, error, info, warn};

use crate::config::{MatcherConfig, SwagdocConfig};
use crate::error::{Result, SwagdocError};
use crate::generate::CommentGenerator;
use crate::parser::extract_handlers;
use crate::parser::types::{ContextShape, Route};
use crate::write::{rewrite_file, RewriteOutcome, WriteMode};

pub use estimate::{estimate_cost_usd, estimate_total_tokens};
pub use processor::{process_handler, render_handler, HandlerContext};

/// Settings for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub model: String,
    pub dry_run: bool,
    pub matcher: MatcherConfig,
    pub max_files: usize,
    pub max_requests: usize,
    pub timeout: Duration,
    pub backup_suffix: String,
    pub shapes: Vec<ContextShape>,
}

impl PipelineOptions {
    pub fn from_config(config: &SwagdocConfig, dry_run: bool) -> Self {
        Self {
            model: config.generation.model.clone(),
            dry_run,
            matcher: config.matcher,
            max_files: config.pipeline.max_files.max(1),
            max_requests: config.pipeline.max_requests.max(1),
            timeout: Duration::from_secs(config.generation.timeout_secs),
            backup_suffix: config.pipeline.backup_suffix.clone(),
            shapes: ContextShape::with_extra(&config.extractor.context_types),
        }
    }

    fn write_mode(&self) -> WriteMode {
        if self.dry_run {
            WriteMode::DryRun
        } else {
            WriteMode::Write {
                backup_suffix: self.backup_suffix.clone(),
            }
        }
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::from_config(&SwagdocConfig::default(), false)
    }
}

/// A handler whose comment could not be produced.
#[derive(Debug, Clone, Serialize)]
pub struct HandlerFailure {
    pub handler: String,
    pub reason: String,
}

/// What happened to one file.
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub handlers_found: usize,
    pub failures: Vec<HandlerFailure>,
    /// Present when the file had at least one handler to rewrite.
    pub rewrite: Option<RewriteOutcome>,
}

/// Summary of a whole run. Partial failure is recorded here, not returned
/// as an error.
#[derive(Debug, Default, Serialize)]
pub struct PipelineReport {
    pub files: Vec<FileReport>,
    pub file_errors: Vec<(PathBuf, String)>,
}

impl PipelineReport {
    pub fn files_updated(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.rewrite.as_ref().is_some_and(|r| r.written))
            .count()
    }

    pub fn handlers_documented(&self) -> usize {
        self.files
            .iter()
            .filter_map(|f| f.rewrite.as_ref())
            .map(|r| r.handlers)
            .sum()
    }

    pub fn handlers_failed(&self) -> usize {
        self.files.iter().map(|f| f.failures.len()).sum()
    }

    /// No file or handler failed.
    pub fn is_clean(&self) -> bool {
        self.file_errors.is_empty() && self.handlers_failed() == 0
    }

    /// Fold one finished file task into the report. A panicked task is
    /// recorded against the path it was spawned for.
    fn record_file(
        &mut self,
        joined: std::result::Result<(Id, FileTaskOutput), JoinError>,
        task_paths: &mut HashMap<Id, PathBuf>,
    ) {
        match joined {
            Ok((_, (_, Ok(file_report)))) => self.files.push(file_report),
            Ok((_, (path, Err(e)))) => {
                error!(file = %path.display(), error = %e, "failed to process file");
                self.file_errors.push((path, e.to_string()));
            }
            Err(e) => {
                let path = task_paths.remove(&e.id()).unwrap_or_default();
                error!(file = %path.display(), error = %e, "file task panicked");
                self.file_errors.push((path, e.to_string()));
            }
        }
    }
}

type FileTaskOutput = (PathBuf, Result<FileReport>);

/// Runs the pipeline over a set of files.
#[derive(Clone)]
pub struct Pipeline {
    generator: Arc<dyn CommentGenerator>,
    routes: Arc<[Route]>,
    options: Arc<PipelineOptions>,
}

impl Pipeline {
    pub fn new(generator: Arc<dyn CommentGenerator>, routes: Vec<Route>, options: PipelineOptions) -> Self {
        Self {
            generator,
            routes: routes.into(),
            options: Arc::new(options),
        }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Process every file and wait for all of them.
    pub async fn run(&self, files: Vec<PathBuf>) -> PipelineReport {
        info!(
            files = files.len(),
            routes = self.routes.len(),
            backend = self.generator.name(),
            dry_run = self.options.dry_run,
            "starting pipeline"
        );

        let file_permits = Arc::new(Semaphore::new(self.options.max_files));
        let request_permits = Arc::new(Semaphore::new(self.options.max_requests));
        let mut tasks = JoinSet::new();
        let mut task_paths = HashMap::new();

        for path in files {
            // Queue here rather than spawning every file up front.
            let Ok(permit) = Arc::clone(&file_permits).acquire_owned().await else {
                break;
            };
            let pipeline = self.clone();
            let request_permits = Arc::clone(&request_permits);
            let task_path = path.clone();
            let handle = tasks.spawn(async move {
                let _permit = permit;
                let outcome = pipeline.process_file(&path, request_permits).await;
                (path, outcome)
            });
            task_paths.insert(handle.id(), task_path);
        }

        let mut report = PipelineReport::default();
        while let Some(joined) = tasks.join_next_with_id().await {
            report.record_file(joined, &mut task_paths);
        }

        report.files.sort_by(|a, b| a.path.cmp(&b.path));
        report.file_errors.sort_by(|a, b| a.0.cmp(&b.0));

        info!(
            files_updated = report.files_updated(),
            handlers_documented = report.handlers_documented(),
            handlers_failed = report.handlers_failed(),
            file_errors = report.file_errors.len(),
            "pipeline finished"
        );
        report
    }

    /// Parse one file, generate comments for its handlers, and rewrite it.
    pub async fn process_file(&self, path: &Path, request_permits: Arc<Semaphore>) -> Result<FileReport> {
        let original: Arc<[u8]> = tokio::fs::read(path).await?.into();
        let handlers = extract_handlers(path, &original, &self.options.shapes)?;
        debug!(file = %path.display(), handlers = handlers.len(), "parsed file");

        let mut report = FileReport {
            path: path.to_path_buf(),
            handlers_found: handlers.len(),
            failures: Vec::new(),
            rewrite: None,
        };
        if handlers.is_empty() {
            return Ok(report);
        }

        let ctx = HandlerContext {
            generator: Arc::clone(&self.generator),
            routes: Arc::clone(&self.routes),
            model: self.options.model.clone(),
            matcher: self.options.matcher,
            timeout: self.options.timeout,
        };

        let mut tasks = JoinSet::new();
        let mut task_names = HashMap::new();
        for decl in handlers {
            let Ok(permit) = Arc::clone(&request_permits).acquire_owned().await else {
                break;
            };
            let ctx = ctx.clone();
            let original = Arc::clone(&original);
            let name = decl.name.clone();
            let handle = tasks.spawn(async move {
                let _permit = permit;
                process_handler(&decl, &original, &ctx).await
            });
            task_names.insert(handle.id(), name);
        }

        let mut results = Vec::new();
        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((_, Ok(result))) => results.push(result),
                Ok((id, Err(e))) => {
                    let handler = e
                        .handler()
                        .map(str::to_string)
                        .or_else(|| task_names.get(&id).cloned())
                        .unwrap_or_default();
                    error!(file = %path.display(), handler = %handler, error = %e, "failed to process handler");
                    report.failures.push(HandlerFailure {
                        handler,
                        reason: e.to_string(),
                    });
                }
                Err(e) => {
                    let handler = task_names.get(&e.id()).cloned().unwrap_or_default();
                    error!(file = %path.display(), handler = %handler, error = %e, "handler task panicked");
                    report.failures.push(HandlerFailure {
                        handler,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if results.is_empty() {
            warn!(file = %path.display(), "no comments generated, leaving file unchanged");
            return Ok(report);
        }

        let mode = self.options.write_mode();
        let owned_path = path.to_path_buf();
        let rewrite = tokio::task::spawn_blocking(move || {
            rewrite_file(&owned_path, &original, &results, &mode)
        })
        .await
        .map_err(|e| SwagdocError::Task(e.to_string()))??;

        report.rewrite = Some(rewrite);
        Ok(report)
    }
}

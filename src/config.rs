//
//  config.rs
//  Swagdoc
//
//  Created by hak (tharun)
//

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, SwagdocError};

/// Top-level swagdoc configuration (`swagdoc.toml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwagdocConfig {
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub matcher: MatcherConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
}

/// Text-generation backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Model identifier sent with every request.
    #[serde(default = "default_model")]
    pub model: String,
    /// Base URL of an OpenAI-compatible API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Upper bound for one generation call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Max tokens requested per comment.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

/// Route matching heuristic knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Shared substrings must be strictly longer than this.
    #[serde(default = "default_min_substring_len")]
    pub min_substring_len: usize,
    /// Maximum number of routes rendered into the router hint.
    #[serde(default = "default_max_routes")]
    pub max_routes: usize,
}

/// Concurrency and on-disk behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Files processed at the same time.
    #[serde(default = "default_max_files")]
    pub max_files: usize,
    /// Generation requests in flight at the same time.
    #[serde(default = "default_max_requests")]
    pub max_requests: usize,
    /// Suffix appended to a file path for its pre-rewrite copy.
    #[serde(default = "default_backup_suffix")]
    pub backup_suffix: String,
}

/// Extra handler parameter shapes, tried after the built-in ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractorConfig {
    #[serde(default)]
    pub context_types: Vec<ContextTypeConfig>,
}

/// One `[[extractor.context_types]]` entry, e.g. `*fiber.Ctx`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextTypeConfig {
    pub package: String,
    pub type_name: String,
    #[serde(default)]
    pub pointer: bool,
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_tokens() -> u32 {
    512
}

fn default_min_substring_len() -> usize {
    3
}

fn default_max_routes() -> usize {
    4
}

fn default_max_files() -> usize {
    8
}

fn default_max_requests() -> usize {
    4
}

fn default_backup_suffix() -> String {
    ".bak".to_string()
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            min_substring_len: default_min_substring_len(),
            max_routes: default_max_routes(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_files: default_max_files(),
            max_requests: default_max_requests(),
            backup_suffix: default_backup_suffix(),
        }
    }
}

impl SwagdocConfig {
    /// Load config from a TOML file, falling back to defaults when it is missing.
    /// A file that exists but does not parse is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let config: Self = match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents)
                .map_err(|e| SwagdocError::Config(format!("{}: {e}", path.display())))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => return Err(e.into()),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.pipeline.max_files == 0 || self.pipeline.max_requests == 0 {
            return Err(SwagdocError::Config(
                "pipeline.max_files and pipeline.max_requests must be at least 1".into(),
            ));
        }
        if self.pipeline.backup_suffix.is_empty() {
            return Err(SwagdocError::Config("pipeline.backup_suffix must not be empty".into()));
        }
        if self.generation.timeout_secs == 0 {
            return Err(SwagdocError::Config("generation.timeout_secs must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = SwagdocConfig::load(&dir.path().join("swagdoc.toml")).unwrap();

        assert_eq!(config.matcher, MatcherConfig { min_substring_len: 3, max_routes: 4 });
        assert_eq!(config.pipeline.backup_suffix, ".bak");
        assert_eq!(config.generation.timeout_secs, 60);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("swagdoc.toml");
        std::fs::write(
            &path,
            r#"
[matcher]
max_routes = 2

[[extractor.context_types]]
package = "fiber"
type_name = "Ctx"
pointer = true
"#,
        )
        .unwrap();

        let config = SwagdocConfig::load(&path).unwrap();
        assert_eq!(config.matcher.max_routes, 2);
        assert_eq!(config.matcher.min_substring_len, 3);
        assert_eq!(config.generation.model, "gpt-4o");
        assert_eq!(config.extractor.context_types.len(), 1);
        assert!(config.extractor.context_types[0].pointer);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("swagdoc.toml");
        std::fs::write(&path, "[pipeline\nmax_files = ").unwrap();

        assert!(matches!(SwagdocConfig::load(&path), Err(SwagdocError::Config(_))));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let mut config = SwagdocConfig::default();
        config.pipeline.max_requests = 0;
        assert!(config.validate().is_err());
    }
}

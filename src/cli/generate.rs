//! Generate command: estimate, confirm, run the pipeline, report.

use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use super::{config_path, GenerateArgs};
use crate::config::SwagdocConfig;
use crate::generate::OpenAiGenerator;
use crate::parser::extract_routes;
use crate::pipeline::{estimate_cost_usd, estimate_total_tokens, Pipeline, PipelineOptions, PipelineReport};
use crate::scan::scan_dir;

/// Load the config file and apply command-line overrides.
pub fn resolve_config(args: &GenerateArgs) -> Result<SwagdocConfig> {
    let path = config_path(&args.dir, args.config.as_deref());
    let mut config = SwagdocConfig::load(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;

    if let Some(model) = &args.model {
        config.generation.model = model.clone();
    }
    if let Some(n) = args.concurrency {
        config.pipeline.max_requests = n;
    }
    config.validate()?;
    Ok(config)
}

pub async fn run(args: GenerateArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    let options = PipelineOptions::from_config(&config, args.dry_run);

    let files = scan_dir(&args.dir)?;
    if files.is_empty() {
        println!("No Go files found under {}", args.dir.display());
        return Ok(());
    }

    let routes = extract_routes(args.routes.as_deref())?;

    let shapes = options.shapes.clone();
    let estimate_files = files.clone();
    let route_file = args.routes.clone();
    let tokens = tokio::task::spawn_blocking(move || {
        estimate_total_tokens(&estimate_files, route_file.as_deref(), &shapes)
    })
    .await
    .context("Token estimation task failed")?;

    println!("Files:            {}", files.len());
    println!("Routes:           {}", routes.len());
    println!("Estimated tokens: {}", tokens);
    println!("Estimated cost:   ${:.4}", estimate_cost_usd(tokens));

    if !args.yes {
        let stdin = io::stdin();
        if !confirm(&mut stdin.lock(), "Continue?")? {
            println!("Aborted.");
            return Ok(());
        }
    }

    let generator = Arc::new(OpenAiGenerator::from_env(&config.generation)?);
    let pipeline = Pipeline::new(generator, routes, options);
    let report = pipeline.run(files).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    if args.dry_run {
        print_previews(&report);
    }
    print_summary(&report, args.dry_run);
    Ok(())
}

/// Ask a yes/no question; anything but `y`/`yes` declines.
pub fn confirm(input: &mut impl BufRead, question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn print_previews(report: &PipelineReport) {
    for file in &report.files {
        let Some(preview) = file.rewrite.as_ref().and_then(|r| r.preview.as_ref()) else {
            continue;
        };
        println!("─── {} ───", file.path.display());
        println!("{}", preview);
    }
}

fn print_summary(report: &PipelineReport, dry_run: bool) {
    println!();
    if dry_run {
        println!("Dry run: {} handlers would be documented", report.handlers_documented());
    } else {
        println!(
            "Updated {} files, {} handlers documented",
            report.files_updated(),
            report.handlers_documented()
        );
    }

    if report.handlers_failed() > 0 {
        println!("{} handlers failed:", report.handlers_failed());
        for file in &report.files {
            for failure in &file.failures {
                println!("  {} {}: {}", file.path.display(), failure.handler, failure.reason);
            }
        }
    }
    if !report.file_errors.is_empty() {
        println!("{} files failed:", report.file_errors.len());
        for (path, reason) in &report.file_errors {
            println!("  {}: {}", path.display(), reason);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn args(dir: PathBuf) -> GenerateArgs {
        GenerateArgs {
            dir,
            dry_run: false,
            model: None,
            routes: None,
            config: None,
            concurrency: None,
            yes: true,
            json: false,
        }
    }

    #[test]
    fn test_confirm_accepts_only_yes() {
        assert!(confirm(&mut Cursor::new("y\n"), "go?").unwrap());
        assert!(confirm(&mut Cursor::new(" YES \n"), "go?").unwrap());
        assert!(!confirm(&mut Cursor::new("\n"), "go?").unwrap());
        assert!(!confirm(&mut Cursor::new("nope\n"), "go?").unwrap());
        assert!(!confirm(&mut Cursor::new(""), "go?").unwrap());
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("swagdoc.toml"),
            "[generation]\nmodel = \"from-file\"\n\n[pipeline]\nmax_requests = 9\n",
        )
        .unwrap();

        let from_file = resolve_config(&args(dir.path().to_path_buf())).unwrap();
        assert_eq!(from_file.generation.model, "from-file");
        assert_eq!(from_file.pipeline.max_requests, 9);

        let mut overridden = args(dir.path().to_path_buf());
        overridden.model = Some("from-flag".into());
        overridden.concurrency = Some(3);
        let config = resolve_config(&overridden).unwrap();
        assert_eq!(config.generation.model, "from-flag");
        assert_eq!(config.pipeline.max_requests, 3);
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let dir = tempdir().unwrap();
        let mut a = args(dir.path().to_path_buf());
        a.concurrency = Some(0);
        assert!(resolve_config(&a).is_err());
    }
}

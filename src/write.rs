//! File rewriting: splice generated comments into the original bytes.
//!
//! Offsets always index the pristine original. The output is built in a
//! fresh buffer strictly left to right and reaches disk in one rename, so a
//! file is either fully rewritten or left untouched.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::backup::backup_file;
use crate::error::{Result, SwagdocError};

/// Generated comment for one handler, positioned in the original file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerResult {
    pub name: String,
    /// Comment block without a trailing newline; may be empty.
    pub comment: String,
    pub start: usize,
    pub end: usize,
}

/// How a rewritten buffer is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteMode {
    /// Compute and report only.
    DryRun,
    /// Back up to `path + backup_suffix`, then replace the file.
    Write { backup_suffix: String },
}

/// Result of rewriting one file.
#[derive(Debug, Serialize)]
pub struct RewriteOutcome {
    pub path: PathBuf,
    pub handlers: usize,
    pub bytes_written: usize,
    pub written: bool,
    pub time_ms: u64,
    /// Rewritten content, kept for dry runs.
    #[serde(skip)]
    pub preview: Option<String>,
}

/// Rebuild `original` with each result's comment inserted above its span.
///
/// Results may arrive in any order. Every span is checked against the
/// original before any byte is copied; an out-of-range, inverted or
/// overlapping span fails the whole file.
pub fn splice(path: &Path, original: &[u8], results: &[HandlerResult]) -> Result<Vec<u8>> {
    let mut ordered: Vec<&HandlerResult> = results.iter().collect();
    ordered.sort_by_key(|r| r.start);

    let len = original.len();
    let mut prev_end = 0;
    for r in &ordered {
        if r.start > r.end || r.end > len || r.start < prev_end {
            return Err(SwagdocError::InvalidSpan {
                path: path.to_path_buf(),
                handler: r.name.clone(),
                start: r.start,
                end: r.end,
                len,
            });
        }
        prev_end = r.end;
    }

    let extra: usize = ordered.iter().map(|r| r.comment.len() + 1).sum();
    let mut out = Vec::with_capacity(len + extra);
    let mut cursor = 0;

    for r in ordered {
        debug!(handler = %r.name, start = r.start, end = r.end, cursor, "splicing handler");
        out.extend_from_slice(&original[cursor..r.start]);
        if !r.comment.is_empty() {
            out.extend_from_slice(r.comment.as_bytes());
            out.push(b'\n');
        }
        out.extend_from_slice(&original[r.start..r.end]);
        cursor = r.end;
    }
    out.extend_from_slice(&original[cursor..]);

    Ok(out)
}

/// Splice `results` into `original` and persist according to `mode`.
///
/// With no results nothing is written and no backup is taken.
pub fn rewrite_file(
    path: &Path,
    original: &[u8],
    results: &[HandlerResult],
    mode: &WriteMode,
) -> Result<RewriteOutcome> {
    let start = std::time::Instant::now();
    let updated = splice(path, original, results)?;

    let mut outcome = RewriteOutcome {
        path: path.to_path_buf(),
        handlers: results.len(),
        bytes_written: 0,
        written: false,
        time_ms: 0,
        preview: None,
    };

    match mode {
        WriteMode::DryRun => {
            info!(file = %path.display(), handlers = results.len(), "dry run: would update file");
            outcome.preview = Some(String::from_utf8_lossy(&updated).into_owned());
        }
        WriteMode::Write { backup_suffix } => {
            if !results.is_empty() {
                backup_file(path, backup_suffix)?;
                write_atomic(path, &updated)?;
                info!(file = %path.display(), handlers = results.len(), "updated file");
                outcome.bytes_written = updated.len();
                outcome.written = true;
            }
        }
    }

    outcome.time_ms = start.elapsed().as_millis() as u64;
    Ok(outcome)
}

/// Replace a file's content atomically (write to temp, then rename).
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let temp_path = temp_path_for(path);

    let result = (|| -> Result<()> {
        let mut file = File::create(&temp_path)?;
        file.write_all(content)?;
        file.sync_all()?;
        if let Ok(meta) = fs::metadata(path) {
            fs::set_permissions(&temp_path, meta.permissions())?;
        }
        fs::rename(&temp_path, path)?;
        Ok(())
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".swagdoc.tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const ORIGINAL: &str = "package main\n\nimport \"github.com/gin-gonic/gin\"\n\nfunc A(c *gin.Context) {\n}\n\nfunc B(c *gin.Context) {\n}\n";

    fn span_of(src: &str, needle: &str) -> (usize, usize) {
        let start = src.find(needle).unwrap();
        (start, start + needle.len())
    }

    fn result(name: &str, comment: &str, (start, end): (usize, usize)) -> HandlerResult {
        HandlerResult {
            name: name.to_string(),
            comment: comment.to_string(),
            start,
            end,
        }
    }

    /// Drop every line the splice inserted.
    fn strip_inserted(output: &str, comments: &[&str]) -> String {
        let mut out = output.to_string();
        for c in comments {
            out = out.replacen(&format!("{c}\n"), "", 1);
        }
        out
    }

    #[test]
    fn test_no_results_is_identity() {
        let out = splice(Path::new("a.go"), ORIGINAL.as_bytes(), &[]).unwrap();
        assert_eq!(out, ORIGINAL.as_bytes());
    }

    #[test]
    fn test_out_of_order_results_spliced_in_position() {
        let a = span_of(ORIGINAL, "func A(c *gin.Context) {\n}");
        let b = span_of(ORIGINAL, "func B(c *gin.Context) {\n}");
        let results = vec![result("B", "// B godoc", b), result("A", "// A godoc\n// @Router /a [get]", a)];

        let out = String::from_utf8(splice(Path::new("a.go"), ORIGINAL.as_bytes(), &results).unwrap()).unwrap();

        let expected = format!(
            "{}// A godoc\n// @Router /a [get]\n{}{}// B godoc\n{}{}",
            &ORIGINAL[..a.0],
            &ORIGINAL[a.0..a.1],
            &ORIGINAL[a.1..b.0],
            &ORIGINAL[b.0..b.1],
            &ORIGINAL[b.1..],
        );
        assert_eq!(out, expected);
        assert_eq!(
            strip_inserted(&out, &["// A godoc\n// @Router /a [get]", "// B godoc"]),
            ORIGINAL
        );
    }

    #[test]
    fn test_empty_comment_inserts_nothing() {
        let a = span_of(ORIGINAL, "func A(c *gin.Context) {\n}");
        let out = splice(Path::new("a.go"), ORIGINAL.as_bytes(), &[result("A", "", a)]).unwrap();
        assert_eq!(out, ORIGINAL.as_bytes());
    }

    #[test]
    fn test_span_past_end_fails() {
        let len = ORIGINAL.len();
        let err = splice(Path::new("a.go"), ORIGINAL.as_bytes(), &[result("A", "// x", (10, len + 1))]).unwrap_err();
        assert!(matches!(err, SwagdocError::InvalidSpan { ref handler, .. } if handler == "A"));
    }

    #[test]
    fn test_inverted_and_overlapping_spans_fail() {
        let bad = splice(Path::new("a.go"), ORIGINAL.as_bytes(), &[result("A", "// x", (20, 10))]);
        assert!(bad.is_err());

        let overlapping = vec![result("A", "// a", (10, 40)), result("B", "// b", (30, 50))];
        assert!(splice(Path::new("a.go"), ORIGINAL.as_bytes(), &overlapping).is_err());
    }

    #[test]
    fn test_invalid_span_leaves_file_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.go");
        fs::write(&path, ORIGINAL).unwrap();

        let mode = WriteMode::Write { backup_suffix: ".bak".into() };
        let res = rewrite_file(&path, ORIGINAL.as_bytes(), &[result("A", "// x", (0, 10_000))], &mode);

        assert!(res.is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), ORIGINAL);
        assert!(!dir.path().join("a.go.bak").exists());
        assert!(!dir.path().join("a.go.swagdoc.tmp").exists());
    }

    #[test]
    fn test_dry_run_never_writes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.go");
        fs::write(&path, ORIGINAL).unwrap();
        let a = span_of(ORIGINAL, "func A(c *gin.Context) {\n}");

        let outcome = rewrite_file(&path, ORIGINAL.as_bytes(), &[result("A", "// A godoc", a)], &WriteMode::DryRun).unwrap();

        assert!(!outcome.written);
        assert!(outcome.preview.unwrap().contains("// A godoc\nfunc A"));
        assert_eq!(fs::read_to_string(&path).unwrap(), ORIGINAL);
        assert!(!dir.path().join("a.go.bak").exists());
    }

    #[test]
    fn test_write_backs_up_then_replaces() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.go");
        fs::write(&path, ORIGINAL).unwrap();
        let a = span_of(ORIGINAL, "func A(c *gin.Context) {\n}");

        let mode = WriteMode::Write { backup_suffix: ".bak".into() };
        let outcome = rewrite_file(&path, ORIGINAL.as_bytes(), &[result("A", "// A godoc", a)], &mode).unwrap();

        assert!(outcome.written);
        assert!(fs::read_to_string(&path).unwrap().contains("// A godoc\nfunc A"));
        assert_eq!(fs::read_to_string(dir.path().join("a.go.bak")).unwrap(), ORIGINAL);
    }

    #[test]
    fn test_write_with_no_results_leaves_file_alone() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.go");
        fs::write(&path, ORIGINAL).unwrap();

        let mode = WriteMode::Write { backup_suffix: ".bak".into() };
        let outcome = rewrite_file(&path, ORIGINAL.as_bytes(), &[], &mode).unwrap();

        assert!(!outcome.written);
        assert_eq!(fs::read_to_string(&path).unwrap(), ORIGINAL);
        assert!(!dir.path().join("a.go.bak").exists());
    }
}

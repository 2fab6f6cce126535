//! Git-backed source provider.
//!
//! The repository itself is the publication database: `git ls-files`
//! decides what exists, and each path's commit log supplies its author
//! and its creation/modification timestamps. Nothing is published that
//! is not committed.
//!
//! ## Per-Path Metadata
//!
//! One `git log` per path with the format
//! `%ae%x00%ct%x00%s%x00%b%x00` (NUL-separated fields, newest commit
//! first):
//!
//! - newest record → author (email local part) and modification time
//! - oldest record → creation time
//!
//! A tracked path with no commit log, or a record missing fields, is a
//! fatal error — partial sites are never produced.
//!
//! ## Skip Rules
//!
//! Empty entries, `LICENSE`, `LICENSE.*`, and dotfile paths are never
//! published.
//!
//! The resulting corpus holds content documents newest-first with their
//! chronological newer/older indices linked, plus the untouched resource
//! list, plus the designated `README.*` document when one exists.

use crate::config::Config;
use crate::document::{DocId, DocKind, Document, LoadError};
use crate::extract;
use std::path::Path;
use std::process::Command;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("failed to run {cmd:?}: {source}")]
    Invoke {
        cmd: String,
        source: std::io::Error,
    },
    #[error("{cmd:?} failed: {stderr}")]
    CommandFailed { cmd: String, stderr: String },
    #[error("no commit metadata for tracked path {0:?}")]
    MissingMetadata(String),
    #[error("malformed commit record for {0:?}")]
    MalformedRecord(String),
    #[error("bad commit timestamp {value:?} for {path:?}")]
    BadTimestamp { path: String, value: String },
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Every tracked document, loaded and linked, ready for generation.
#[derive(Debug)]
pub struct Corpus {
    /// Content documents, newest first. Arena for all `DocId` links.
    pub documents: Vec<Document>,
    /// Opaque resources, in `git ls-files` order.
    pub resources: Vec<Document>,
    /// The `README.*` content document, when one is tracked.
    pub readme: Option<DocId>,
}

/// Enumerate tracked files and build the corpus.
pub fn load_tracked(repo_root: &Path, cfg: &Config) -> Result<Corpus, SourceError> {
    let listing = run_git(repo_root, &["ls-files", "-z"])?;
    let listing = String::from_utf8_lossy(&listing);

    let mut documents = Vec::new();
    let mut resources = Vec::new();

    for source in listing.split('\0') {
        if skip_path(source) {
            continue;
        }

        let history = commit_history(repo_root, source)?;
        println!("{source:?} - {} by {}", history.cdate_hint(), history.author);

        let Some(mut doc) = Document::new(
            source,
            &history.author,
            history.ctime,
            history.mtime,
            cfg.use_epochname,
            cfg.extname.as_str(),
        ) else {
            return Err(SourceError::BadTimestamp {
                path: source.to_string(),
                value: history.ctime.to_string(),
            });
        };

        match doc.kind {
            DocKind::Content => {
                let bytes = std::fs::read(repo_root.join(source))
                    .map_err(|e| LoadError::Io(source.to_string(), e))?;
                let extracted = extract::extract(&bytes)
                    .map_err(|e| LoadError::Extract(source.to_string(), e))?;
                doc.title = extracted.title.unwrap_or_default();
                doc.summary = extracted.summary.unwrap_or_default();
                documents.push(doc);
            }
            DocKind::Resource => resources.push(doc),
        }
    }

    // Newest first; stable, so equal timestamps keep listing order.
    documents.sort_by(|a, b| b.ctime.cmp(&a.ctime));

    let len = documents.len();
    for (i, doc) in documents.iter_mut().enumerate() {
        doc.newer = i.checked_sub(1);
        doc.older = (i + 1 < len).then_some(i + 1);
    }

    let readme = documents
        .iter()
        .position(|d| d.source.starts_with("README."));

    Ok(Corpus {
        documents,
        resources,
        readme,
    })
}

/// Paths that are tracked but never published.
fn skip_path(source: &str) -> bool {
    source.is_empty()
        || source == "LICENSE"
        || source.starts_with("LICENSE.")
        || source.starts_with('.')
}

struct History {
    author: String,
    ctime: i64,
    mtime: i64,
}

impl History {
    fn cdate_hint(&self) -> String {
        crate::document::epoch_to_stamp(self.ctime).unwrap_or_else(|| self.ctime.to_string())
    }
}

/// Read the full commit log of one path and reduce it to author plus the
/// first/last commit times.
fn commit_history(repo_root: &Path, source: &str) -> Result<History, SourceError> {
    let out = run_git(
        repo_root,
        &["log", "--format=%ae%x00%ct%x00%s%x00%b%x00", "--", source],
    )?;
    let text = String::from_utf8_lossy(&out);
    let text = text.trim();
    if text.is_empty() {
        return Err(SourceError::MissingMetadata(source.to_string()));
    }

    // Records are NUL-terminated and newline-separated, newest first.
    let records: Vec<&str> = text
        .split("\0\n")
        .map(|r| r.trim_end_matches('\0'))
        .filter(|r| !r.is_empty())
        .collect();
    let newest = record_fields(records.first().copied(), source)?;
    let oldest = record_fields(records.last().copied(), source)?;

    let author = newest.0.split('@').next().unwrap_or(newest.0).to_string();
    let mtime = parse_epoch(newest.1, source)?;
    let ctime = parse_epoch(oldest.1, source)?;

    Ok(History {
        author,
        ctime,
        mtime,
    })
}

/// Split one log record into its author and committer-time fields.
fn record_fields<'a>(
    record: Option<&'a str>,
    source: &str,
) -> Result<(&'a str, &'a str), SourceError> {
    let record = record.ok_or_else(|| SourceError::MissingMetadata(source.to_string()))?;
    let mut fields = record.split('\0');
    match (fields.next(), fields.next()) {
        (Some(author), Some(epoch)) => Ok((author, epoch)),
        _ => Err(SourceError::MalformedRecord(source.to_string())),
    }
}

fn parse_epoch(value: &str, source: &str) -> Result<i64, SourceError> {
    value.parse().map_err(|_| SourceError::BadTimestamp {
        path: source.to_string(),
        value: value.to_string(),
    })
}

fn run_git(repo_root: &Path, args: &[&str]) -> Result<Vec<u8>, SourceError> {
    let cmd = format!("git {}", args.join(" "));
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_root)
        .output()
        .map_err(|source| SourceError::Invoke {
            cmd: cmd.clone(),
            source,
        })?;
    if !output.status.success() {
        return Err(SourceError::CommandFailed {
            cmd,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(output.stdout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn git(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .args(args)
            .current_dir(dir)
            .env("GIT_CONFIG_GLOBAL", "/dev/null")
            .env("GIT_CONFIG_SYSTEM", "/dev/null")
            .status()
            .unwrap();
        assert!(status.success(), "git {args:?} failed");
    }

    fn init_repo() -> TempDir {
        let tmp = TempDir::new().unwrap();
        git(tmp.path(), &["init", "-q"]);
        tmp
    }

    fn commit(dir: &Path, path: &str, content: &str, author: &str, date: &str) {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(dir.join(parent)).unwrap();
        }
        fs::write(dir.join(path), content).unwrap();
        git(dir, &["add", path]);
        let status = Command::new("git")
            .args([
                "-c",
                &format!("user.name={author}"),
                "-c",
                &format!("user.email={author}@example.com"),
                "commit",
                "-q",
                "-m",
                "update",
                "--",
            ])
            .env("GIT_CONFIG_GLOBAL", "/dev/null")
            .env("GIT_CONFIG_SYSTEM", "/dev/null")
            .env("GIT_AUTHOR_DATE", date)
            .env("GIT_COMMITTER_DATE", date)
            .current_dir(dir)
            .status()
            .unwrap();
        assert!(status.success());
    }

    fn load(dir: &Path) -> Corpus {
        load_tracked(dir, &Config::default()).unwrap()
    }

    #[test]
    fn content_and_resources_partitioned() {
        let tmp = init_repo();
        commit(tmp.path(), "post.md", "# T\n\nS\n", "alice", "2024-01-01T00:00:00+00:00");
        commit(tmp.path(), "img/logo.png", "binary-ish", "alice", "2024-01-02T00:00:00+00:00");

        let corpus = load(tmp.path());
        assert_eq!(corpus.documents.len(), 1);
        assert_eq!(corpus.resources.len(), 1);
        assert_eq!(corpus.documents[0].source, "post.md");
        assert_eq!(corpus.resources[0].source, "img/logo.png");
    }

    #[test]
    fn ctime_is_first_commit_mtime_is_last() {
        let tmp = init_repo();
        commit(tmp.path(), "a.md", "# One\n\nv1\n", "alice", "2024-01-01T00:00:00+00:00");
        commit(tmp.path(), "a.md", "# One\n\nv2\n", "alice", "2024-06-01T00:00:00+00:00");

        let corpus = load(tmp.path());
        let doc = &corpus.documents[0];
        assert!(doc.ctime < doc.mtime);
        assert_eq!(doc.cdate, "20240101T000000Z");
    }

    #[test]
    fn documents_sorted_newest_first_and_linked() {
        let tmp = init_repo();
        commit(tmp.path(), "old.md", "# Old\n\ns\n", "alice", "2024-01-01T00:00:00+00:00");
        commit(tmp.path(), "mid.md", "# Mid\n\ns\n", "alice", "2024-02-01T00:00:00+00:00");
        commit(tmp.path(), "new.md", "# New\n\ns\n", "alice", "2024-03-01T00:00:00+00:00");

        let corpus = load(tmp.path());
        let names: Vec<&str> = corpus.documents.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["new", "mid", "old"]);

        assert_eq!(corpus.documents[0].newer, None);
        assert_eq!(corpus.documents[0].older, Some(1));
        assert_eq!(corpus.documents[1].newer, Some(0));
        assert_eq!(corpus.documents[1].older, Some(2));
        assert_eq!(corpus.documents[2].newer, Some(1));
        assert_eq!(corpus.documents[2].older, None);
    }

    #[test]
    fn title_and_summary_extracted_at_load_phase() {
        let tmp = init_repo();
        commit(
            tmp.path(),
            "post.md",
            "# Hello\n\nThe summary line.\n\nBody.\n",
            "alice",
            "2024-01-01T00:00:00+00:00",
        );

        let corpus = load(tmp.path());
        let doc = &corpus.documents[0];
        assert_eq!(doc.title, "Hello");
        assert_eq!(doc.summary, "The summary line.");
        // Body only exists between load and unload.
        assert!(doc.body.is_empty());
    }

    #[test]
    fn author_is_email_local_part() {
        let tmp = init_repo();
        commit(tmp.path(), "a.md", "x\n", "alice", "2024-01-01T00:00:00+00:00");
        let corpus = load(tmp.path());
        assert_eq!(corpus.documents[0].author, "alice");
    }

    #[test]
    fn license_and_dotfiles_skipped() {
        let tmp = init_repo();
        commit(tmp.path(), "LICENSE", "MIT", "alice", "2024-01-01T00:00:00+00:00");
        commit(tmp.path(), "LICENSE.md", "MIT", "alice", "2024-01-01T00:00:00+00:00");
        commit(tmp.path(), ".hidden/conf.md", "x", "alice", "2024-01-01T00:00:00+00:00");
        commit(tmp.path(), "kept.md", "# K\n", "alice", "2024-01-02T00:00:00+00:00");

        let corpus = load(tmp.path());
        assert_eq!(corpus.documents.len(), 1);
        assert!(corpus.resources.is_empty());
        assert_eq!(corpus.documents[0].source, "kept.md");
    }

    #[test]
    fn readme_designated() {
        let tmp = init_repo();
        commit(tmp.path(), "README.md", "# About\n\nHi.\n", "a", "2024-01-01T00:00:00+00:00");
        commit(tmp.path(), "post.md", "# P\n\nS.\n", "a", "2024-02-01T00:00:00+00:00");

        let corpus = load(tmp.path());
        let readme = corpus.readme.unwrap();
        assert_eq!(corpus.documents[readme].source, "README.md");
    }

    #[test]
    fn staged_but_uncommitted_path_is_fatal() {
        let tmp = init_repo();
        commit(tmp.path(), "a.md", "x", "alice", "2024-01-01T00:00:00+00:00");
        fs::write(tmp.path().join("staged.md"), "pending").unwrap();
        git(tmp.path(), &["add", "staged.md"]);

        let err = load_tracked(tmp.path(), &Config::default()).unwrap_err();
        assert!(matches!(err, SourceError::MissingMetadata(p) if p == "staged.md"));
    }

    #[test]
    fn not_a_repository_is_fatal() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            load_tracked(tmp.path(), &Config::default()),
            Err(SourceError::CommandFailed { .. })
        ));
    }
}

//! The document record shared across the whole build.
//!
//! Every git-tracked path becomes exactly one [`Document`]. Construction
//! partitions them into two disjoint kinds by file extension:
//!
//! - **Content** (`.md`): extracted, linked into the chronological chain,
//!   paginated, and rendered through the theme.
//! - **Resource** (everything else): copied to the output verbatim, never
//!   linked, never tagged.
//!
//! ## Output Addressing
//!
//! Content documents are bucketed by creation year:
//!
//! - `posts/hello.md` (created 2024) → `2024/hello.html`
//! - with `use_epochname = true`    → `2024/1704067200.html`
//!
//! The href variant percent-escapes the name so documents with spaces or
//! non-ASCII names link correctly. Resources keep their source path.
//!
//! ## Body Lifecycle
//!
//! The rendered body is only held in memory between [`Document::load`] and
//! [`Document::unload`], so a large site never keeps every article's HTML
//! resident at once.

use crate::extract::{self, ExtractError};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {0}: {1}")]
    Io(String, std::io::Error),
    #[error("failed to extract {0}: {1}")]
    Extract(String, ExtractError),
}

/// The two disjoint kinds a tracked path can be, decided at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocKind {
    Content,
    Resource,
}

/// Index of a document within the corpus arena. Chronological links and
/// page membership are stored as these rather than as references.
pub type DocId = usize;

/// One tracked content item or resource.
#[derive(Debug, Clone)]
pub struct Document {
    pub kind: DocKind,
    /// Path inside the repository, unique key.
    pub source: String,
    /// Display name: file stem of the source path.
    pub name: String,
    /// Relative output path.
    pub pathname: String,
    /// Reference href (percent-escaped where needed).
    pub href: String,
    /// Author email local part from the most recent commit.
    pub author: String,
    /// Earliest commit time for the path (unix seconds).
    pub ctime: i64,
    /// Most recent commit time for the path (unix seconds).
    pub mtime: i64,
    /// `ctime` as a compact UTC stamp, e.g. `20240101T000000Z`.
    pub cdate: String,
    /// Extracted title; empty if the document has none.
    pub title: String,
    /// Extracted summary; tag links are substituted in place by the indexer.
    pub summary: String,
    /// Tag names (marker stripped), first-seen order, deduplicated.
    pub tags: Vec<String>,
    /// Rendered body HTML, populated only between `load` and `unload`.
    pub body: String,
    /// Chronologically later document, absent for the most recent one.
    pub newer: Option<DocId>,
    /// Chronologically earlier document, absent for the oldest one.
    pub older: Option<DocId>,
}

/// Format a unix timestamp as a compact ISO 8601 UTC stamp.
pub fn epoch_to_stamp(epoch: i64) -> Option<String> {
    let dt: DateTime<Utc> = DateTime::from_timestamp(epoch, 0)?;
    Some(dt.format("%Y%m%dT%H%M%SZ").to_string())
}

impl Document {
    /// Build a document record for one tracked path.
    ///
    /// `ctime`/`mtime` come from the source provider; addressing is
    /// derived here. Returns `None` when the creation time cannot be
    /// represented as a calendar date.
    pub fn new(
        source: &str,
        author: &str,
        ctime: i64,
        mtime: i64,
        use_epochname: bool,
        extname: &str,
    ) -> Option<Document> {
        let kind = if source.ends_with(".md") {
            DocKind::Content
        } else {
            DocKind::Resource
        };
        let name = basename(source);
        let cdate = epoch_to_stamp(ctime)?;

        let (pathname, href) = match kind {
            DocKind::Content => {
                let year = &cdate[..4];
                if use_epochname {
                    let p = format!("{year}/{ctime}.{extname}");
                    (p.clone(), p)
                } else {
                    (
                        format!("{year}/{name}.{extname}"),
                        format!("{year}/{}.{extname}", urlencoding::encode(&name)),
                    )
                }
            }
            // Resources keep their source path verbatim.
            DocKind::Resource => (source.to_string(), source.to_string()),
        };

        Some(Document {
            kind,
            source: source.to_string(),
            name,
            pathname,
            href,
            author: author.to_string(),
            ctime,
            mtime,
            cdate,
            title: String::new(),
            summary: String::new(),
            tags: Vec::new(),
            body: String::new(),
            newer: None,
            older: None,
        })
    }

    /// Render the source file into the body. Only meaningful for content
    /// documents; resources have nothing to render.
    pub fn load(&mut self, repo_root: &Path) -> Result<(), LoadError> {
        if self.kind != DocKind::Content {
            return Ok(());
        }
        let bytes = fs::read(repo_root.join(&self.source))
            .map_err(|e| LoadError::Io(self.source.clone(), e))?;
        let extracted =
            extract::extract(&bytes).map_err(|e| LoadError::Extract(self.source.clone(), e))?;
        self.body = extracted.body;
        Ok(())
    }

    /// Drop the rendered body to bound memory between renders.
    pub fn unload(&mut self) {
        self.body = String::new();
    }
}

/// Strip directory and extension from a path: `posts/hello.md` → `hello`.
fn basename(pathname: &str) -> String {
    let base = pathname.rsplit('/').next().unwrap_or(pathname);
    match base.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => base.to_string(),
    }
}

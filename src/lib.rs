//! # gitpress
//!
//! A minimal static blog generator that treats git history as the
//! publishing database. Whatever `git ls-files` reports is the site:
//! markdown files become articles, everything else is copied through,
//! and commit history supplies authorship and dates — no front matter,
//! no separate metadata files, no database.
//!
//! # Architecture: Load, Index, Render
//!
//! ```text
//! 1. Load    git ls-files + git log  →  Corpus      (documents, resources, links)
//! 2. Index   summaries               →  tag chains + archive chain
//! 3. Render  chains + documents      →  outdir/     (final HTML site)
//! ```
//!
//! The load phase runs one extraction pass per document to pull the
//! title (leading `# heading`) and summary (first paragraph) out of the
//! content; the body HTML is produced again on demand per article so a
//! large site never holds every rendered body at once.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`source`] | git-backed provider — tracked paths, commit metadata, corpus construction |
//! | [`document`] | the per-path record: kind, timestamps, addressing, chronological links |
//! | [`extract`] | single-pass title/summary/body extraction from markdown |
//! | [`tags`] | inline `#tag` indexing, link substitution, per-tag grouping |
//! | [`paginate`] | fixed-capacity page chains for the archive and tag views |
//! | [`theme`] | Maud HTML rendering with embedded CSS |
//! | [`generate`] | orchestration and the filesystem sink |
//! | [`config`] | `.gitpress/config.json` loading and validation |
//!
//! # Design Decisions
//!
//! ## Git As The Source Of Truth
//!
//! Publication state is exactly the committed state: a file's creation
//! date is its first commit, its update date is its last, and its author
//! is whoever committed it most recently. Staged-but-uncommitted files
//! fail the build rather than silently publishing without dates.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time
//! HTML macro system, rather than a runtime template directory:
//! malformed HTML is a build error, template variables are Rust
//! expressions, interpolation is auto-escaped, and there is no theme
//! directory to ship or get out of sync.
//!
//! ## Arena Indices Over Linked Records
//!
//! Documents and pages link bidirectionally (newer/older). Those links
//! are plain indices into a central `Vec` rather than reference-counted
//! back-pointers, which keeps records plain `Clone` data and rules out
//! ownership cycles.
//!
//! ## Two-Pass Pagination
//!
//! Page records need to know the final length of their own chain ("page
//! 1 of 7") even though that length is only known once every document
//! has been appended. Rather than sharing a mutable counter between
//! pages, the builder buckets documents first and assigns numbers,
//! totals, and links in a single finalize step.

pub mod config;
pub mod document;
pub mod extract;
pub mod generate;
pub mod paginate;
pub mod source;
pub mod tags;
pub mod theme;

//! Fixed-capacity page chains for the archive and tag views.
//!
//! A chain is one paginated view over an already-sorted (newest first)
//! document sequence: page 1 holds the most recent documents, the tail
//! page holds the chronologically oldest remainder. Pages link both ways:
//! `newer` toward the head, `older` toward the tail.
//!
//! ## Two-Pass Construction
//!
//! [`ChainBuilder::push`] only buckets document ids into capacity-sized
//! pages; [`ChainBuilder::finish`] then assigns page numbers, the final
//! page count, the bidirectional links, and per-page output addresses in
//! a second pass. Building this way means a page constructed early (page
//! 1 of a long chain) still carries the true final count — "page 1 of 7"
//! — without any shared mutable counter.
//!
//! ## Invariants
//!
//! - `D` documents at capacity `N` produce exactly `ceil(D / N)` pages.
//! - Every page except the tail holds exactly `N` documents; the tail
//!   holds `1..=N`. A chain is never built from zero documents and never
//!   ends in an empty page.
//! - Every page's `total` equals the chain's final page count.

use crate::document::DocId;

/// Output location of one page, supplied per chain by the caller.
#[derive(Debug, Clone)]
pub struct PageAddress {
    /// Relative output path the page is written to.
    pub pathname: String,
    /// Href other pages use to link here.
    pub href: String,
}

/// Index of a page within its chain; page `number` is always `index + 1`.
pub type PageId = usize;

/// One finalized page of a chain.
#[derive(Debug, Clone)]
pub struct Page {
    /// 1-based position within the chain.
    pub number: usize,
    /// Final page count of the whole chain, identical on every page.
    pub total: usize,
    /// Chain caption, e.g. the hashtag for tag chains. Empty for the archive.
    pub subject: String,
    pub pathname: String,
    pub href: String,
    /// Documents on this page, newest first.
    pub docs: Vec<DocId>,
    /// First (most recent) document on this page.
    pub first: Option<DocId>,
    /// Last (oldest) document on this page.
    pub last: Option<DocId>,
    /// Chronologically later page; absent only on the head page.
    pub newer: Option<PageId>,
    /// Chronologically earlier page; absent on the tail page.
    pub older: Option<PageId>,
}

/// A finalized backward-linked page chain. `pages[0]` is the head and its
/// position never changes once construction begins.
#[derive(Debug, Clone)]
pub struct Chain {
    pub pages: Vec<Page>,
}

/// Accumulates documents into capacity-sized pages.
#[derive(Debug)]
pub struct ChainBuilder {
    capacity: usize,
    pages: Vec<Vec<DocId>>,
}

impl ChainBuilder {
    /// Capacity must be positive; config validation guarantees it.
    pub fn new(capacity: usize) -> ChainBuilder {
        debug_assert!(capacity >= 1);
        ChainBuilder {
            capacity,
            pages: Vec::new(),
        }
    }

    /// Append a document to the currently open (oldest) page, opening a
    /// new page first when that one is full. Pages only come into being
    /// when a document is actually appended, so a chain never gains a
    /// trailing empty page.
    pub fn push(&mut self, doc: DocId) {
        match self.pages.last_mut() {
            Some(open) if open.len() < self.capacity => open.push(doc),
            _ => self.pages.push(vec![doc]),
        }
    }

    /// Second pass: assign numbers, total, links, and addresses.
    ///
    /// `namer` maps a 1-based page number to its output address. Returns
    /// `None` when no document was ever appended.
    pub fn finish(
        self,
        subject: &str,
        namer: impl Fn(usize) -> PageAddress,
    ) -> Option<Chain> {
        if self.pages.is_empty() {
            return None;
        }
        let total = self.pages.len();
        let pages = self
            .pages
            .into_iter()
            .enumerate()
            .map(|(idx, docs)| {
                let address = namer(idx + 1);
                Page {
                    number: idx + 1,
                    total,
                    subject: subject.to_string(),
                    pathname: address.pathname,
                    href: address.href,
                    first: docs.first().copied(),
                    last: docs.last().copied(),
                    docs,
                    newer: idx.checked_sub(1),
                    older: (idx + 1 < total).then_some(idx + 1),
                }
            })
            .collect();
        Some(Chain { pages })
    }
}

/// Output address of archive page `number`: `archive/index.html`, then
/// `archive/2.html`, `archive/3.html`, …
pub fn archive_address(number: usize, extname: &str) -> PageAddress {
    let pathname = if number == 1 {
        format!("archive/index.{extname}")
    } else {
        format!("archive/{number}.{extname}")
    };
    PageAddress {
        href: pathname.clone(),
        pathname,
    }
}

/// Output address of page `number` of a tag chain. The pathname uses the
/// raw tag name; the href uses the percent-escaped form, and the head
/// page links to the directory itself.
pub fn tag_address(tag: &str, number: usize, extname: &str) -> PageAddress {
    let escaped = urlencoding::encode(tag);
    if number == 1 {
        PageAddress {
            pathname: format!("t/{tag}/index.{extname}"),
            href: format!("t/{escaped}/"),
        }
    } else {
        PageAddress {
            pathname: format!("t/{tag}/{number}.{extname}"),
            href: format!("t/{escaped}/{number}.{extname}"),
        }
    }
}

//! Inline hashtag indexing.
//!
//! Summaries may carry `#tag` tokens. The indexer scans every content
//! document's summary left to right and, per document, on each tag's
//! first occurrence:
//!
//! - records the tag (marker stripped) in the document's tag set,
//! - rewrites that one occurrence into a link to the tag's page,
//! - appends the document to the tag's page chain.
//!
//! Later identical tokens in the same summary stay literal text and do
//! not re-add the document. The sitewide tag list is collected case-
//! sensitively in first-seen order, then sorted ascending for display.
//!
//! A tag token is `#` followed by one or more non-whitespace characters,
//! not glued to a preceding word (`a#b` is not a tag), using the JS-style
//! Unicode whitespace class so CJK and no-break spaces delimit tokens.

use crate::document::{DocKind, Document};
use crate::paginate::{Chain, ChainBuilder, tag_address};
use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

static HASHTAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\B#[^ \f\n\r\t\v\u{A0}\u{1680}\u{2000}-\u{200A}\u{2028}\u{2029}\u{202F}\u{205F}\u{3000}\u{FEFF}]+",
    )
    .expect("hashtag pattern is valid")
});

/// Result of one indexing pass over the corpus.
#[derive(Debug)]
pub struct TagIndex {
    /// Distinct tag names sitewide, sorted ascending.
    pub hashtags: Vec<String>,
    /// One page chain per tag, keyed by name, in name order.
    pub chains: Vec<(String, Chain)>,
}

/// Scan summaries, substitute tag links in place, and build per-tag
/// page chains. `docs` is the corpus arena; chains store arena indices.
pub fn index_tags(docs: &mut [Document], capacity: usize, extname: &str) -> TagIndex {
    let mut sitewide = Vec::new();
    let mut seen_sitewide = HashSet::new();
    let mut builders: BTreeMap<String, ChainBuilder> = BTreeMap::new();

    for (id, doc) in docs.iter_mut().enumerate() {
        if doc.kind != DocKind::Content {
            continue;
        }

        let tokens: Vec<String> = HASHTAG
            .find_iter(&doc.summary)
            .map(|m| m.as_str().to_string())
            .collect();

        let mut seen_here = HashSet::new();
        for token in tokens {
            if !seen_here.insert(token.clone()) {
                continue;
            }
            let name = &token[1..];
            // Root-absolute so the anchor resolves from any page depth.
            let link = format!(
                "<a href=\"/t/{}/\">{token}</a>",
                urlencoding::encode(name)
            );
            doc.summary = doc.summary.replacen(&token, &link, 1);
            doc.tags.push(name.to_string());

            if seen_sitewide.insert(name.to_string()) {
                sitewide.push(name.to_string());
            }
            builders
                .entry(name.to_string())
                .or_insert_with(|| ChainBuilder::new(capacity))
                .push(id);
        }
    }

    sitewide.sort();

    let chains = builders
        .into_iter()
        .filter_map(|(name, builder)| {
            let subject = format!("#{name}");
            let chain = builder.finish(&subject, |n| tag_address(&name, n, extname))?;
            Some((name, chain))
        })
        .collect();

    TagIndex {
        hashtags: sitewide,
        chains,
    }
}

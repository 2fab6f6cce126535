//! HTML rendering for every page kind.
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating:
//! templates are type-safe Rust code with automatic XSS escaping, no
//! template directory to ship or get out of sync. Styles are embedded
//! from `static/style.css` into a `<style>` block so the generated site
//! is self-contained.
//!
//! ## Page Kinds
//!
//! - **Home** (`index.html`): every content document, newest first
//! - **Article** (`{year}/{name}.html`): one document's body with
//!   newer/older navigation along the chronological chain
//! - **Archive** (`archive/…`): one page of the flat chain with a
//!   date-range caption and page navigation
//! - **Tag** (`t/{tag}/…`): one page of a tag chain
//!
//! Every renderer takes the shared read-only [`SiteContext`] — the sorted
//! sitewide tag list and the designated README document — which the
//! header component turns into the site navigation.
//!
//! Summaries and bodies are injected pre-escaped: bodies are HTML from
//! the extractor, summaries carry the tag anchors substituted by the
//! indexer.

use crate::document::Document;
use crate::paginate::{Chain, Page};
use chrono::{DateTime, Utc};
use maud::{DOCTYPE, Markup, PreEscaped, html};

const CSS: &str = include_str!("../static/style.css");

/// Sitewide values injected into every page, read-only.
pub struct SiteContext<'a> {
    /// Sorted distinct tag names.
    pub hashtags: &'a [String],
    /// The README document, linked from the header when present.
    pub readme: Option<&'a Document>,
    /// Href of the head archive page.
    pub archive_href: String,
}

impl<'a> SiteContext<'a> {
    pub fn new(
        hashtags: &'a [String],
        readme: Option<&'a Document>,
        archive: Option<&Chain>,
    ) -> SiteContext<'a> {
        SiteContext {
            hashtags,
            readme,
            archive_href: archive
                .map(|c| c.pages[0].href.clone())
                .unwrap_or_default(),
        }
    }
}

/// Home page: the whole corpus as a summary listing.
pub fn render_home(ctx: &SiteContext, docs: &[Document]) -> Markup {
    base_document(
        "Home",
        ctx,
        html! {
            (doc_list(docs, 0..docs.len()))
        },
    )
}

/// One article page. `newer`/`older` are the document's chronological
/// neighbors, if any.
pub fn render_article(
    ctx: &SiteContext,
    doc: &Document,
    newer: Option<&Document>,
    older: Option<&Document>,
) -> Markup {
    base_document(
        doc_title(doc),
        ctx,
        html! {
            article {
                h1 { (doc_title(doc)) }
                p.doc-meta {
                    (display_date(doc.ctime))
                    " by " (doc.author)
                    @if doc.mtime != doc.ctime {
                        ", updated " (display_date(doc.mtime))
                    }
                }
                @if !doc.summary.is_empty() {
                    p { (PreEscaped(&doc.summary)) }
                }
                (PreEscaped(&doc.body))
            }
            nav.pager {
                span {
                    @if let Some(n) = newer {
                        a href=(abs(&n.href)) { "← " (doc_title(n)) }
                    }
                }
                span {
                    @if let Some(o) = older {
                        a href=(abs(&o.href)) { (doc_title(o)) " →" }
                    }
                }
            }
        },
    )
}

/// One archive page: summary listing plus date-range caption and pager.
pub fn render_archive_page(
    ctx: &SiteContext,
    chain: &Chain,
    page: &Page,
    arena: &[Document],
) -> Markup {
    let range = date_range(page, arena);
    base_document(
        &format!("Archive — page {} of {}", page.number, page.total),
        ctx,
        html! {
            h1 { "Archive" }
            (doc_list(arena, page.docs.iter().copied()))
            p.page-caption {
                (range) " — page " (page.number) " of " (page.total)
            }
            (page_pager(chain, page))
        },
    )
}

/// One page of a tag chain. The subject is the hashtag itself.
pub fn render_tag_page(
    ctx: &SiteContext,
    chain: &Chain,
    page: &Page,
    arena: &[Document],
) -> Markup {
    base_document(
        &page.subject,
        ctx,
        html! {
            h1 { (page.subject) }
            (doc_list(arena, page.docs.iter().copied()))
            @if page.total > 1 {
                p.page-caption { "page " (page.number) " of " (page.total) }
            }
            (page_pager(chain, page))
        },
    )
}

// ============================================================================
// Components
// ============================================================================

fn base_document(title: &str, ctx: &SiteContext, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(CSS)) }
            }
            body {
                (site_header(ctx))
                main { (content) }
            }
        }
    }
}

fn site_header(ctx: &SiteContext) -> Markup {
    html! {
        header.site-header {
            a href="/" { "home" }
            @if !ctx.archive_href.is_empty() {
                a href=(abs(&ctx.archive_href)) { "archive" }
            }
            @if let Some(readme) = ctx.readme {
                a href=(abs(&readme.href)) { "readme" }
            }
            @if !ctx.hashtags.is_empty() {
                span.tags {
                    @for tag in ctx.hashtags {
                        " "
                        a href=(format!("/t/{}/", urlencoding::encode(tag))) { "#" (tag) }
                    }
                }
            }
        }
    }
}

/// Summary listing of the given documents, in the given order.
fn doc_list(arena: &[Document], ids: impl Iterator<Item = usize>) -> Markup {
    html! {
        @for id in ids {
            @if let Some(doc) = arena.get(id) {
                section.doc-entry {
                    h2 { a href=(abs(&doc.href)) { (doc_title(doc)) } }
                    p.doc-meta { (display_date(doc.ctime)) " by " (doc.author) }
                    @if !doc.summary.is_empty() {
                        p { (PreEscaped(&doc.summary)) }
                    }
                }
            }
        }
    }
}

/// Newer/older navigation between pages of one chain. The links resolve
/// through the chain because pages hold indices, not hrefs.
fn page_pager(chain: &Chain, page: &Page) -> Markup {
    let href_of = |id: Option<usize>| id.and_then(|i| chain.pages.get(i)).map(|p| &p.href);
    html! {
        nav.pager {
            span {
                @if let Some(newer) = href_of(page.newer) {
                    a href=(abs(newer)) { "← newer" }
                }
            }
            span {
                @if let Some(older) = href_of(page.older) {
                    a href=(abs(older)) { "older →" }
                }
            }
        }
    }
}

/// Display title, falling back to the source name for title-less documents.
fn doc_title(doc: &Document) -> &str {
    if doc.title.is_empty() {
        &doc.name
    } else {
        &doc.title
    }
}

/// Root-absolute form of a relative href.
fn abs(href: &str) -> String {
    format!("/{href}")
}

fn display_date(epoch: i64) -> String {
    DateTime::<Utc>::from_timestamp(epoch, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Caption text for the span of creation dates on an archive page.
fn date_range(page: &Page, arena: &[Document]) -> String {
    let date = |id: Option<usize>| {
        id.and_then(|i| arena.get(i))
            .map(|d| display_date(d.ctime))
            .unwrap_or_default()
    };
    let first = date(page.first);
    let last = date(page.last);
    if first == last {
        first
    } else {
        format!("{last} – {first}")
    }
}

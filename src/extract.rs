//! Title and summary extraction from markdown content.
//!
//! A document's display metadata lives in its leading structure: the first
//! top-level `# heading` is the title, and the first paragraph after it is
//! the summary. Both are pulled out in the same pass that renders the rest
//! of the document to HTML, so neither is repeated in the body.
//!
//! ## Extraction Rules
//!
//! - The title is captured only if the very first element is an H1. Any
//!   other leading element leaves the title empty and moves straight on to
//!   summary capture.
//! - The summary is the first paragraph after the (possibly absent) title.
//!   If the next element is not a paragraph, there is no summary and the
//!   whole document renders into the body unchanged.
//! - Captured elements are flattened to plain text (inline markup dropped,
//!   line breaks collapsed to single spaces) and suppressed from the body.
//! - Once both phases have resolved, every remaining event passes through
//!   to the HTML renderer untouched.
//!
//! ```text
//! # Hello World          →  title:   "Hello World"
//! Short intro #release   →  summary: "Short intro #release"
//!
//! ## Details             →  body:    "<h2>Details</h2>…"
//! …
//! ```

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, html};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("content is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// Result of one extraction pass over a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted {
    /// Flattened text of the leading H1, if the document starts with one.
    pub title: Option<String>,
    /// Flattened text of the first paragraph after the title position.
    pub summary: Option<String>,
    /// HTML of everything that was not captured as title or summary.
    pub body: String,
}

/// Which phase of extraction the walk is in. The phases resolve strictly
/// in order; `Done` is terminal and disables all capture and suppression.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    AwaitingTitle,
    AwaitingSummary,
    Done,
}

/// What the active capture commits into when its container closes.
#[derive(Debug, Clone, Copy)]
enum Target {
    Title,
    Summary,
}

/// An element currently being captured instead of rendered.
struct Capture {
    target: Target,
    /// Nesting depth below the container. The container's own `End` event
    /// arrives at depth 0 and commits the capture.
    depth: u32,
    buf: String,
}

/// Extract title, summary, and rendered body from raw document bytes.
///
/// Content that is not valid UTF-8 is a fatal error; no partial
/// extraction is attempted.
pub fn extract(content: &[u8]) -> Result<Extracted, ExtractError> {
    Ok(extract_str(std::str::from_utf8(content)?))
}

/// Single-pass extraction over the markdown event stream.
pub fn extract_str(content: &str) -> Extracted {
    let mut title = None;
    let mut summary = None;
    let mut phase = Phase::AwaitingTitle;
    let mut capture: Option<Capture> = None;
    let mut kept = Vec::new();

    for event in Parser::new(content.trim()) {
        if let Some(cap) = capture.as_mut() {
            match event {
                Event::Start(_) => cap.depth += 1,
                Event::End(_) if cap.depth > 0 => cap.depth -= 1,
                Event::End(_) => {
                    // Container boundary: commit and advance the phase.
                    let text = std::mem::take(&mut cap.buf);
                    match cap.target {
                        Target::Title => {
                            title = Some(text);
                            phase = Phase::AwaitingSummary;
                        }
                        Target::Summary => {
                            summary = Some(text);
                            phase = Phase::Done;
                        }
                    }
                    capture = None;
                }
                Event::Text(t) => cap.buf.push_str(&t),
                Event::Code(t) => cap.buf.push_str(&t),
                Event::SoftBreak | Event::HardBreak => cap.buf.push(' '),
                _ => {}
            }
            continue;
        }

        if phase == Phase::AwaitingTitle {
            if matches!(
                event,
                Event::Start(Tag::Heading { level: HeadingLevel::H1, .. })
            ) {
                capture = Some(Capture {
                    target: Target::Title,
                    depth: 0,
                    buf: String::new(),
                });
                continue;
            }
            // Not a leading H1 — the title phase is over; the same element
            // is re-evaluated for summary capture below.
            phase = Phase::AwaitingSummary;
        }

        if phase == Phase::AwaitingSummary {
            if matches!(event, Event::Start(Tag::Paragraph)) {
                capture = Some(Capture {
                    target: Target::Summary,
                    depth: 0,
                    buf: String::new(),
                });
                continue;
            }
            phase = Phase::Done;
        }

        kept.push(event);
    }

    let mut body = String::new();
    html::push_html(&mut body, kept.into_iter());

    Extracted {
        title,
        summary,
        body,
    }
}

//! Site generation.
//!
//! Takes a loaded [`Corpus`] and writes the finished site. Render order
//! is fixed:
//!
//! 1. **Tag pages** — the indexing pass runs first because it rewrites
//!    summaries in place; every later target shows the linked form.
//! 2. **Articles** — one page per content document, loading the body
//!    just before the render and unloading right after, so only one
//!    body is ever resident.
//! 3. **Archive pages** — the flat chronological chain.
//! 4. **Home** — the whole corpus as one listing.
//! 5. **Resources** — copied to the output verbatim.
//!
//! Any failure aborts the run; no partially generated directory is
//! promoted to valid output (the caller owns the output directory's
//! lifecycle).

use crate::config::Config;
use crate::document::{Document, LoadError};
use crate::paginate::{Chain, ChainBuilder, archive_address};
use crate::source::Corpus;
use crate::tags;
use crate::theme::{self, SiteContext};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Render the whole site into `cfg.outdir` under `repo_root`.
pub fn generate(corpus: &mut Corpus, cfg: &Config, repo_root: &Path) -> Result<(), GenerateError> {
    let outdir = repo_root.join(&cfg.outdir);

    // Tag indexing rewrites summaries, so it runs before anything renders.
    let index = tags::index_tags(&mut corpus.documents, cfg.narchive, &cfg.extname);
    let archive = build_archive(&corpus.documents, cfg);

    // The context clones the README record so article loading below can
    // borrow the arena mutably.
    let readme = corpus.readme.and_then(|i| corpus.documents.get(i).cloned());
    let ctx = SiteContext::new(&index.hashtags, readme.as_ref(), archive.as_ref());

    println!("==> Rendering tag pages");
    for (name, chain) in &index.chains {
        for page in &chain.pages {
            println!("{name:?} -> {:?}", page.pathname);
            let html = theme::render_tag_page(&ctx, chain, page, &corpus.documents);
            write_output(&outdir, &page.pathname, html.into_string().as_bytes())?;
        }
    }

    println!("==> Rendering articles");
    for i in 0..corpus.documents.len() {
        corpus.documents[i].load(repo_root)?;
        let doc = &corpus.documents[i];
        let newer = doc.newer.and_then(|j| corpus.documents.get(j));
        let older = doc.older.and_then(|j| corpus.documents.get(j));
        println!("{:?} -> {:?}", doc.source, doc.pathname);
        let html = theme::render_article(&ctx, doc, newer, older).into_string();
        let pathname = doc.pathname.clone();
        write_output(&outdir, &pathname, html.as_bytes())?;
        corpus.documents[i].unload();
    }

    println!("==> Rendering archive");
    if let Some(chain) = &archive {
        for page in &chain.pages {
            println!("archive -> {:?}", page.pathname);
            let html = theme::render_archive_page(&ctx, chain, page, &corpus.documents);
            write_output(&outdir, &page.pathname, html.into_string().as_bytes())?;
        }
    }

    println!("==> Rendering home");
    let home = theme::render_home(&ctx, &corpus.documents);
    let home_path = format!("index.{}", cfg.extname);
    write_output(&outdir, &home_path, home.into_string().as_bytes())?;

    println!("==> Copying resources");
    for rsrc in &corpus.resources {
        println!("{:?} -> {:?}", rsrc.source, rsrc.pathname);
        copy_resource(repo_root, &outdir, rsrc)?;
    }

    Ok(())
}

/// Build the flat chronological chain over the whole (already sorted)
/// document arena.
fn build_archive(documents: &[Document], cfg: &Config) -> Option<Chain> {
    let mut builder = ChainBuilder::new(cfg.narchive);
    for id in 0..documents.len() {
        builder.push(id);
    }
    builder.finish("", |n| archive_address(n, &cfg.extname))
}

/// Filesystem sink: parent directories are guaranteed before the write.
fn write_output(outdir: &Path, pathname: &str, content: &[u8]) -> std::io::Result<()> {
    let path = outdir.join(pathname);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}

fn copy_resource(repo_root: &Path, outdir: &Path, rsrc: &Document) -> std::io::Result<()> {
    let dst = outdir.join(&rsrc.pathname);
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(repo_root.join(&rsrc.source), dst)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const DAY: i64 = 86_400;
    const BASE: i64 = 1_700_000_000;

    /// A corpus of `n` content documents plus one resource, with source
    /// files on disk, newest first.
    fn fixture(n: usize) -> (TempDir, Corpus) {
        let tmp = TempDir::new().unwrap();
        let mut documents = Vec::new();
        for i in 0..n {
            let source = format!("post{i}.md");
            let ctime = BASE - DAY * i as i64;
            fs::write(
                tmp.path().join(&source),
                format!("# Post {i}\n\nSummary {i} #log\n\nBody of post {i}.\n"),
            )
            .unwrap();
            let mut doc = Document::new(&source, "alice", ctime, ctime, false, "html").unwrap();
            doc.title = format!("Post {i}");
            doc.summary = format!("Summary {i} #log");
            documents.push(doc);
        }
        let len = documents.len();
        for (i, doc) in documents.iter_mut().enumerate() {
            doc.newer = i.checked_sub(1);
            doc.older = (i + 1 < len).then_some(i + 1);
        }

        fs::write(tmp.path().join("logo.png"), b"png bytes").unwrap();
        let resources =
            vec![Document::new("logo.png", "alice", BASE, BASE, false, "html").unwrap()];

        let corpus = Corpus {
            documents,
            resources,
            readme: None,
        };
        (tmp, corpus)
    }

    fn outdir(tmp: &TempDir) -> PathBuf {
        tmp.path().join("docs")
    }

    #[test]
    fn generates_every_target() {
        let (tmp, mut corpus) = fixture(3);
        generate(&mut corpus, &Config::default(), tmp.path()).unwrap();

        let out = outdir(&tmp);
        assert!(out.join("index.html").exists());
        assert!(out.join("archive/index.html").exists());
        assert!(out.join("t/log/index.html").exists());
        assert!(out.join("2023/post0.html").exists());
        assert!(out.join("2023/post2.html").exists());
        assert!(out.join("logo.png").exists());
    }

    #[test]
    fn archive_paginates_by_narchive() {
        let (tmp, mut corpus) = fixture(5);
        let cfg = Config {
            narchive: 2,
            ..Config::default()
        };
        generate(&mut corpus, &cfg, tmp.path()).unwrap();

        let out = outdir(&tmp);
        assert!(out.join("archive/index.html").exists());
        assert!(out.join("archive/2.html").exists());
        assert!(out.join("archive/3.html").exists());
        assert!(!out.join("archive/4.html").exists());
        assert!(out.join("t/log/3.html").exists());
    }

    #[test]
    fn article_contains_body_and_neighbors() {
        let (tmp, mut corpus) = fixture(3);
        generate(&mut corpus, &Config::default(), tmp.path()).unwrap();

        let middle = fs::read_to_string(outdir(&tmp).join("2023/post1.html")).unwrap();
        assert!(middle.contains("Body of post 1."));
        assert!(middle.contains("Post 0"));
        assert!(middle.contains("Post 2"));
    }

    #[test]
    fn summaries_link_tags_everywhere() {
        let (tmp, mut corpus) = fixture(1);
        generate(&mut corpus, &Config::default(), tmp.path()).unwrap();

        let home = fs::read_to_string(outdir(&tmp).join("index.html")).unwrap();
        assert!(home.contains("<a href=\"/t/log/\">#log</a>"));
    }

    #[test]
    fn tag_links_resolve_from_nested_pages() {
        let (tmp, mut corpus) = fixture(1);
        generate(&mut corpus, &Config::default(), tmp.path()).unwrap();

        // Article pages live one directory down, so the anchor must be
        // root-absolute to reach the tag page at t/log/.
        let article = fs::read_to_string(outdir(&tmp).join("2023/post0.html")).unwrap();
        assert!(article.contains("<a href=\"/t/log/\">#log</a>"));
        assert!(!article.contains("href=\"t/log/\""));
        assert!(outdir(&tmp).join("t/log/index.html").exists());
    }

    #[test]
    fn bodies_unloaded_after_generation() {
        let (tmp, mut corpus) = fixture(2);
        generate(&mut corpus, &Config::default(), tmp.path()).unwrap();
        assert!(corpus.documents.iter().all(|d| d.body.is_empty()));
    }

    #[test]
    fn missing_source_file_aborts() {
        let (tmp, mut corpus) = fixture(2);
        fs::remove_file(tmp.path().join("post1.md")).unwrap();
        let err = generate(&mut corpus, &Config::default(), tmp.path());
        assert!(matches!(err, Err(GenerateError::Load(_))));
    }

    #[test]
    fn custom_extname_applies_to_all_targets() {
        let (tmp, mut corpus) = fixture(1);
        // Addressing is derived at construction, so rebuild the document
        // records with the custom extension.
        let cfg = Config {
            extname: "htm".to_string(),
            ..Config::default()
        };
        for doc in corpus.documents.iter_mut().chain(corpus.resources.iter_mut()) {
            let rebuilt =
                Document::new(&doc.source, &doc.author, doc.ctime, doc.mtime, false, "htm")
                    .unwrap();
            doc.pathname = rebuilt.pathname;
            doc.href = rebuilt.href;
        }
        generate(&mut corpus, &cfg, tmp.path()).unwrap();

        let out = outdir(&tmp);
        assert!(out.join("index.htm").exists());
        assert!(out.join("archive/index.htm").exists());
        assert!(out.join("2023/post0.htm").exists());
    }
}

use clap::{Args, Parser, Subcommand};
use gitpress::{config, generate, source};
use std::path::PathBuf;

/// Flags that override `.gitpress/config.json` values when given.
#[derive(Args, Clone)]
struct ConfigArgs {
    /// Output directory, relative to the repository root
    #[arg(long)]
    outdir: Option<String>,

    /// Name output files by creation epoch instead of source name
    /// (--use-epochname=false overrides a file-set true)
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    use_epochname: Option<bool>,

    /// Extension of generated files
    #[arg(long)]
    extname: Option<String>,

    /// Number of articles per archive/tag page
    #[arg(long)]
    narchive: Option<usize>,
}

impl ConfigArgs {
    /// File values first, then flag overrides.
    fn apply(&self, mut cfg: config::Config) -> config::Config {
        if let Some(outdir) = &self.outdir {
            cfg.outdir = outdir.clone();
        }
        if let Some(use_epochname) = self.use_epochname {
            cfg.use_epochname = use_epochname;
        }
        if let Some(extname) = &self.extname {
            cfg.extname = extname.clone();
        }
        if let Some(narchive) = self.narchive {
            cfg.narchive = narchive;
        }
        cfg
    }
}

fn version_string() -> &'static str {
    if env!("ON_RELEASE_TAG") == "true" {
        return env!("CARGO_PKG_VERSION");
    }
    match env!("GIT_HASH") {
        "" => "dev@unknown",
        // Leaked exactly once, when clap formats --version
        hash => Box::leak(format!("dev@{hash}").into_boxed_str()),
    }
}

#[derive(Parser)]
#[command(name = "gitpress")]
#[command(about = "Static blog generator driven by git history")]
#[command(long_about = "\
Static blog generator driven by git history

The repository is the data source: every git-tracked markdown file
becomes an article, every other tracked file is copied through, and
commit history supplies authors and dates. Nothing uncommitted is
published.

Site structure:

  index.html                 # Home: every article, newest first
  2024/my-post.html          # Articles, bucketed by creation year
  archive/index.html         # Chronological archive, paginated
  archive/2.html
  t/release/index.html       # One paginated view per #hashtag
  img/diagram.png            # Non-markdown files, copied verbatim

Articles take their title from a leading '# heading' and their summary
from the first paragraph; '#tag' tokens in the summary group articles
into tag pages. A tracked README.md is linked from every page header.

Run 'gitpress gen-config' to print a stock .gitpress/config.json.")]
#[command(version = version_string())]
struct Cli {
    /// Repository root to publish from
    #[arg(long, default_value = ".", global = true)]
    repo: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the site into the output directory
    Build(ConfigArgs),
    /// Load and validate everything without writing output
    Check(ConfigArgs),
    /// Print a stock config.json
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build(args) => {
            let cfg = args.apply(config::Config::load(&cli.repo)?);
            cfg.validate()?;

            println!("==> Loading tracked files from {}", cli.repo.display());
            let mut corpus = source::load_tracked(&cli.repo, &cfg)?;

            // The previous build's output is stale in full, not in part.
            let outdir = cli.repo.join(&cfg.outdir);
            match std::fs::remove_dir_all(&outdir) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
            std::fs::create_dir_all(&outdir)?;

            generate::generate(&mut corpus, &cfg, &cli.repo)?;
            println!(
                "==> Published {} articles, {} resources to {}",
                corpus.documents.len(),
                corpus.resources.len(),
                outdir.display()
            );
        }
        Command::Check(args) => {
            let cfg = args.apply(config::Config::load(&cli.repo)?);
            cfg.validate()?;

            println!("==> Checking {}", cli.repo.display());
            let corpus = source::load_tracked(&cli.repo, &cfg)?;
            println!(
                "==> {} articles, {} resources, content is valid",
                corpus.documents.len(),
                corpus.resources.len()
            );
        }
        Command::GenConfig => {
            println!("{}", config::stock_config_json());
        }
    }

    Ok(())
}

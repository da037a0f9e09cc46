use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use procdraft_core::extract::extract_pages;
use procdraft_core::{DirectorySource, DocumentSource, Engine, EngineConfig, ExtractionPolicy, Mode, Query};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "procdraft")]
#[command(about = "Answer questions from a folder of PDF procedures", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct EngineArgs {
    /// Folder of PDF procedures
    #[arg(long, default_value = "./procedures")]
    docs: PathBuf,
    /// What to do with unreadable PDFs: isolate or abort
    #[arg(long, default_value_t = ExtractionPolicy::Isolate)]
    policy: ExtractionPolicy,
    /// Distinct documents cited per answer
    #[arg(long, default_value_t = procdraft_core::config::DEFAULT_TOP_K_DOCS)]
    top_docs: usize,
    /// Pages per cited document fed to the draft
    #[arg(long, default_value_t = procdraft_core::config::DEFAULT_TOP_PAGES_PER_DOC)]
    pages_per_doc: usize,
}

impl EngineArgs {
    fn engine(&self) -> Engine {
        let config = EngineConfig {
            top_k_docs: self.top_docs,
            top_pages_per_doc: self.pages_per_doc,
            policy: self.policy,
            ..EngineConfig::default()
        };
        Engine::new(Arc::new(DirectorySource::new(&self.docs)), config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Draft an answer with citations
    Ask {
        #[command(flatten)]
        engine: EngineArgs,
        /// simple, bullets or standard
        #[arg(long, default_value = "standard")]
        mode: String,
        /// Print the answer as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
        question: String,
    },
    /// Print the full page ranking for a question
    Rank {
        #[command(flatten)]
        engine: EngineArgs,
        /// Show only the first N pages
        #[arg(long)]
        limit: Option<usize>,
        question: String,
    },
    /// Print the normalized text of every page of one PDF
    Pages { file: PathBuf },
    /// List the documents a folder provides
    List {
        #[arg(long, default_value = "./procedures")]
        docs: PathBuf,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Ask { engine, mode, json, question } => ask(&engine, &mode, json, &question),
        Commands::Rank { engine, limit, question } => rank(&engine, limit, &question),
        Commands::Pages { file } => pages(&file),
        Commands::List { docs } => list(&docs),
    }
}

fn ask(args: &EngineArgs, mode: &str, json: bool, question: &str) -> Result<()> {
    let query = Query::parse(question, mode)?;
    let answer = args.engine().query(&query)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&answer)?);
        return Ok(());
    }
    println!("{}\n", answer.draft);
    if !answer.sources.is_empty() {
        println!("Sources:");
        for source in &answer.sources {
            println!("  {} p.{}: {}", source.filename, source.page, source.snippet);
        }
    }
    Ok(())
}

fn rank(args: &EngineArgs, limit: Option<usize>, question: &str) -> Result<()> {
    // validates the question the same way a query would
    Query::new(question, Mode::default())?;
    let (documents, hits) = args.engine().rank(question)?;
    tracing::info!(pages = hits.len(), "ranked");
    for (position, hit) in hits.iter().take(limit.unwrap_or(usize::MAX)).enumerate() {
        println!("{:>4}  {:.4}  {} p.{}", position + 1, hit.score, documents[hit.doc].name, hit.page + 1);
    }
    Ok(())
}

fn pages(file: &PathBuf) -> Result<()> {
    let bytes = std::fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    let pages = extract_pages(&bytes).with_context(|| format!("extracting {}", file.display()))?;
    for (i, text) in pages.iter().enumerate() {
        println!("--- page {} ---\n{}", i + 1, text);
    }
    Ok(())
}

fn list(docs: &PathBuf) -> Result<()> {
    for id in DirectorySource::new(docs).list()? {
        println!("{id}");
    }
    Ok(())
}

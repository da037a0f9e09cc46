use anyhow::Result;
use clap::Parser;
use procdraft_core::{EngineConfig, ExtractionPolicy};
use procdraft_server::{build_app, AppConfig};
use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_DOCS_DIR: &str = "./procedures";

#[derive(Parser)]
#[command(name = "procdraft-server", about = "Draft answers from PDF procedures over HTTP")]
struct Args {
    /// Folder of PDF procedures (falls back to PDF_FOLDER, then ./procedures)
    #[arg(long)]
    docs: Option<PathBuf>,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// What to do with unreadable PDFs: isolate or abort
    #[arg(long, default_value_t = ExtractionPolicy::Isolate)]
    policy: ExtractionPolicy,
    /// Distinct documents cited per answer
    #[arg(long, default_value_t = procdraft_core::config::DEFAULT_TOP_K_DOCS)]
    top_docs: usize,
    /// Pages per cited document fed to the draft
    #[arg(long, default_value_t = procdraft_core::config::DEFAULT_TOP_PAGES_PER_DOC)]
    pages_per_doc: usize,
    /// Cache extracted pages for this many documents (0 disables)
    #[arg(long, default_value_t = 0)]
    cache_pages: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let docs_dir = args
        .docs
        .or_else(|| std::env::var_os("PDF_FOLDER").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCS_DIR));
    let mut config = AppConfig::new(docs_dir);
    config.engine = EngineConfig {
        top_k_docs: args.top_docs,
        top_pages_per_doc: args.pages_per_doc,
        policy: args.policy,
        cache_capacity: NonZeroUsize::new(args.cache_pages),
        ..EngineConfig::default()
    };
    tracing::info!(docs = %config.docs_dir.display(), policy = %config.engine.policy, "starting");
    let app = build_app(config)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}

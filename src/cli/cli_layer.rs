// CLI layer - argument parsing and terminal rendering.

use clap::{Parser, Subcommand};

use crate::core::analysis::{Analysis, AnalysisService};
use crate::core::cache::{CacheStore, PaperTexts};
use crate::core::drive::FetchService;
use crate::infra::ai::OpenAiClient;
use crate::infra::cache::JsonCacheStore;
use crate::infra::drive::DriveApiClient;
use crate::infra::extract::LopdfExtractor;

/// Shared services every command can reach.
pub struct Data {
    pub fetch: FetchService<DriveApiClient, LopdfExtractor>,
    pub analysis: AnalysisService<OpenAiClient>,
    pub cache: JsonCacheStore,
}

#[derive(Parser)]
#[command(
    name = "paper-analyzer",
    about = "Fetch research PDFs from a Google Drive folder and analyze them with an LLM"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the cache files available in the cache directory.
    Caches,
    /// Download every PDF in a Drive folder and cache the extracted text.
    Fetch {
        /// Google Drive folder ID whose PDF children are fetched.
        #[arg(long)]
        folder_id: String,
        /// Cache file to write (created if it does not exist yet).
        #[arg(long)]
        cache: String,
    },
    /// Analyze cached papers against a free-text prompt.
    Analyze {
        /// Cache file to read.
        #[arg(long)]
        cache: String,
        /// Analysis prompt (e.g. "Extract author names").
        #[arg(short, long)]
        prompt: String,
        /// Analyze only this paper instead of every cached one.
        #[arg(long)]
        paper: Option<String>,
    },
}

pub async fn run(cli: Cli, data: Data) -> anyhow::Result<()> {
    match cli.command {
        Commands::Caches => caches(&data).await,
        Commands::Fetch { folder_id, cache } => fetch(&data, &folder_id, &cache).await,
        Commands::Analyze {
            cache,
            prompt,
            paper,
        } => analyze(&data, &cache, &prompt, paper.as_deref()).await,
    }
}

async fn caches(data: &Data) -> anyhow::Result<()> {
    let files = data.cache.discover().await?;
    if files.is_empty() {
        tracing::warn!("No cache files found. Run `fetch` to create one.");
        return Ok(());
    }

    println!("Available cache files:");
    for file in files {
        println!("  {file}");
    }
    Ok(())
}

async fn fetch(data: &Data, folder_id: &str, cache: &str) -> anyhow::Result<()> {
    if folder_id.trim().is_empty() {
        tracing::warn!("Please enter a folder ID before loading PDFs.");
        return Ok(());
    }

    let papers = data.fetch.fetch_folder(folder_id).await?;
    data.cache.save(cache, &papers).await?;

    println!("✅ Loaded {} PDFs and saved to {}", papers.len(), cache);
    Ok(())
}

async fn analyze(
    data: &Data,
    cache: &str,
    prompt: &str,
    paper: Option<&str>,
) -> anyhow::Result<()> {
    let papers: PaperTexts = data.cache.load(cache).await?;
    if papers.is_empty() {
        tracing::warn!("No PDFs loaded! Run `fetch` first.");
        return Ok(());
    }

    match paper {
        Some(name) => {
            let text = papers.get(name).map(String::as_str);
            if text.is_none() {
                tracing::warn!("{} is not in cache file {}", name, cache);
            }
            let analysis = data.analysis.analyze(text, prompt).await?;
            render_analysis(name, &analysis);
        }
        None => {
            for entry in data.analysis.analyze_all(&papers, prompt).await {
                match entry.result {
                    Ok(analysis) => render_analysis(&entry.name, &analysis),
                    Err(e) => eprintln!("❌ {}: {}", entry.name, e),
                }
            }
        }
    }

    Ok(())
}

fn render_analysis(name: &str, analysis: &Analysis) {
    println!("\n📄 Analysis of {name}:");
    if analysis.truncated {
        println!("   (input truncated to the configured character limit)");
    }
    println!("{}", analysis.text);
}

// This is the entry point of the paper analyzer.
//
// **Architecture Overview:**
// - `core/` = Business logic (transport-agnostic)
// - `infra/` = Implementations of core traits (Drive API, OpenAI, disk cache)
// - `cli/` = Terminal adapter (argument parsing, output rendering)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Dispatch the requested command

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "cli/cli_layer.rs"]
mod cli;
#[path = "core/core_layer.rs"]
mod core;
#[path = "infra/infra_layer.rs"]
mod infra;

use clap::Parser;

use crate::cli::{Cli, Data};
use crate::core::analysis::{AnalysisConfig, AnalysisService};
use crate::core::config::AppConfig;
use crate::core::drive::FetchService;
use crate::infra::ai::OpenAiClient;
use crate::infra::cache::JsonCacheStore;
use crate::infra::drive::{DriveApiClient, ServiceAccountAuth};
use crate::infra::extract::LopdfExtractor;

#[tokio::main]
async fn main() {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let args = Cli::parse();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // Create our services with their dependencies.
    // This is the "composition root" where we wire everything together.

    let auth = match ServiceAccountAuth::from_file(&config.google_credentials).await {
        Ok(auth) => auth,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    let fetch_service = FetchService::new(DriveApiClient::new(auth), LopdfExtractor);

    let analysis_config = AnalysisConfig {
        model: config.model.clone(),
        temperature: 0.2,
        max_input_chars: config.max_analysis_chars,
    };
    let analysis_service = AnalysisService::new(
        OpenAiClient::new(config.openai_api_key.clone()),
        analysis_config,
    );

    let cache_store = JsonCacheStore::new(&config.cache_dir);

    let data = Data {
        fetch: fetch_service,
        analysis: analysis_service,
        cache: cache_store,
    };

    if let Err(e) = cli::run(args, data).await {
        tracing::error!("Command failed: {e:#}");
        std::process::exit(1);
    }
}

//! NoteTube server: turns study notes into a ranked list of educational videos.

use std::path::PathBuf;
use std::sync::Arc;

use notetube_core::NoteTubeConfig;
use notetube_ingest::{Algorithm, FileExtractor, KeywordAdapter};
use notetube_query::{GenerativeBackend, GenerativeConfig, OllamaBackend, QuerySynthesizer};
use notetube_runtime::Pipeline;
use notetube_server::{build_router, AppState};
use notetube_video::YouTubeClient;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn resolve_data_dir() -> PathBuf {
    std::env::var("NOTETUBE_DATA_DIR")
        .ok()
        .filter(|d| !d.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"))
}

fn print_usage() {
    println!("NoteTube: educational video discovery from study notes");
    println!();
    println!("Usage: notetube [command]");
    println!();
    println!("Commands:");
    println!("  (none)     Start the server");
    println!("  check      Check that the generative model is reachable");
    println!("  help       Show this help message");
    println!();
    println!("Environment:");
    println!("  PORT, NOTETUBE_DATA_DIR, YOUTUBE_API_KEY, CORS_ORIGIN,");
    println!("  OLLAMA_HOST, OLLAMA_MODEL, RUST_LOG");
}

/// Check the generative backend and report. Returns true when the model is available.
async fn run_check(generative: &GenerativeConfig) -> anyhow::Result<bool> {
    let backend = OllamaBackend::new(generative)?;
    let model = generative.model();
    let available = backend.health_check(&model).await;
    if available {
        println!("Model '{}' is available at {}", model, generative.host());
    } else {
        println!("Model '{}' is NOT available at {}", model, generative.host());
    }
    Ok(available)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let data_dir = resolve_data_dir();

    if args.len() > 1 {
        match args[1].as_str() {
            "--help" | "-h" | "help" => {
                print_usage();
                return Ok(());
            }
            "--check" | "check" => {
                let data_paths = notetube_core::DataPaths::new(&data_dir)?;
                let generative = GenerativeConfig::load(&data_paths.generative_config_file);
                let ok = run_check(&generative).await?;
                std::process::exit(if ok { 0 } else { 1 });
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'notetube help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    info!("Data directory: {}", data_dir.display());

    let config = NoteTubeConfig::from_env(&data_dir)?;
    let generative = GenerativeConfig::load(&config.data_paths.generative_config_file);
    let tuning = config.tuning.clone();
    let port = config.port;

    let algorithm = tuning.keyword_algorithm.parse::<Algorithm>().unwrap_or_else(|e| {
        warn!("{}; using RAKE", e);
        Algorithm::Rake
    });
    let keywords = KeywordAdapter::new(algorithm, tuning.fallback_language.clone());
    info!("Keyword extraction: {}", keywords.algorithm_name());

    let backend = OllamaBackend::new(&generative)?;
    let synthesizer = QuerySynthesizer::new(
        Arc::new(backend),
        generative.model(),
        generative.request_timeout(),
    );
    info!("Generative model: {} at {}", generative.model(), generative.host());

    let platform = YouTubeClient::new(config.youtube_api_key.clone())?;
    if !platform.has_api_key() {
        warn!("YOUTUBE_API_KEY is not set; every video search will fail");
    }

    let pipeline = Pipeline::new(
        Arc::new(FileExtractor::new()),
        Arc::new(keywords),
        Arc::new(synthesizer),
        Arc::new(platform),
        tuning,
    );

    let state = Arc::new(AppState::new(config, generative, pipeline));
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("NoteTube server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

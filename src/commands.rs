use anyhow::{Context, Result};
use console::style;
use tracing::{info, warn};

use crate::config::Config;
use crate::embeddings::EmbeddingClient;
use crate::generator::GeminiClient;
use crate::indexer::DocumentIndexer;
use crate::query::QueryPipeline;
use crate::store::PassageStore;
use crate::websearch::SerperClient;

/// Fetch, split, embed, and store the configured documentation corpus.
/// Replaces any previously indexed store.
#[inline]
pub fn run_index() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    let embedder =
        EmbeddingClient::new(&config.embedding).context("Failed to create embedding client")?;
    embedder
        .ping()
        .context("Embedding server is not reachable; is it running?")?;

    let mut store = PassageStore::new(&config.embedding.model);
    let indexer = DocumentIndexer::new(&embedder, &config.indexing);

    info!("Starting corpus indexing");
    let stats = indexer.index(&config.indexing.urls, &mut store)?;

    let store_path = Config::store_path().context("Failed to get store path")?;
    if let Some(parent) = store_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }
    store.save(&store_path).context("Failed to save passage store")?;

    println!("{}", style("Indexing complete.").bold().green());
    println!("  Pages fetched: {}", stats.pages_fetched);
    if stats.pages_failed > 0 {
        println!(
            "  Pages failed: {}",
            style(stats.pages_failed).yellow()
        );
    }
    println!("  Passages stored: {}", stats.passages_created);
    println!("  Store: {}", style(store_path.display()).dim());

    Ok(())
}

/// Resolve one question against the indexed corpus and print the answer or a
/// diagnostic.
#[inline]
pub fn ask(question: &str) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    let store_path = Config::store_path().context("Failed to get store path")?;
    let store = PassageStore::load(&store_path, &config.embedding.model).context(
        "Failed to load the passage store; run 'docs-assistant index' first",
    )?;

    let embedder =
        EmbeddingClient::new(&config.embedding).context("Failed to create embedding client")?;
    let generator =
        GeminiClient::from_env(&config.generator).context("Failed to create generator client")?;

    let mut builder = QueryPipeline::builder()
        .store(store)
        .embedder(Box::new(embedder))
        .generator(Box::new(generator))
        .top_k(config.retrieval.top_k)
        .max_generations(config.retrieval.max_generations);

    match SerperClient::from_env()? {
        Some(search) => builder = builder.web_search(Box::new(search)),
        None => warn!("No web search API key configured; fallback is disabled"),
    }

    let pipeline = builder.build().context("Failed to build query pipeline")?;

    let outcome = pipeline.resolve(question);
    println!("{}", outcome.diagnostic());

    Ok(())
}

/// Show the state of the passage store.
#[inline]
pub fn show_status() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let store_path = Config::store_path().context("Failed to get store path")?;

    if !store_path.exists() {
        println!("No passage store found. Run 'docs-assistant index' first.");
        return Ok(());
    }

    let store = PassageStore::load(&store_path, &config.embedding.model)
        .context("Failed to load passage store")?;

    println!("{}", style("Passage Store").bold().cyan());
    println!("  Passages: {}", store.len());
    println!("  Embedding model: {}", store.embedding_model());
    if let Some(indexed_at) = store.indexed_at() {
        println!(
            "  Indexed: {}",
            indexed_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
    println!("  Store file: {}", style(store_path.display()).dim());

    Ok(())
}

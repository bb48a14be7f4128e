use anyhow::{Context, Result};
use console::style;
use dialoguer::{Confirm, Input};

use super::{Config, EmbeddingConfig, GeneratorConfig, RetrievalConfig};
use crate::embeddings::EmbeddingClient;
use crate::generator::GOOGLE_API_KEY_VAR;
use crate::websearch::SERPER_API_KEY_VAR;

#[inline]
pub fn run_interactive_config() -> Result<()> {
    eprintln!("{}", style("Docs Assistant Configuration Setup").bold().cyan());
    eprintln!();

    let mut config = Config::load().unwrap_or_default();

    eprintln!("{}", style("Embedding Configuration").bold().yellow());
    eprintln!("Configure the local embedding server used for indexing and retrieval.");
    eprintln!();
    configure_embedding(&mut config.embedding)?;

    eprintln!();
    eprintln!("{}", style("Generator Configuration").bold().yellow());
    configure_generator(&mut config.generator)?;

    eprintln!();
    eprintln!("{}", style("Retrieval Configuration").bold().yellow());
    configure_retrieval(&mut config.retrieval)?;

    eprintln!();
    eprintln!("{}", style("Testing embedding server...").yellow());
    if test_embedding_connection(&config.embedding) {
        eprintln!("{}", style("Embedding server reachable.").green());
    } else {
        eprintln!(
            "{}",
            style("Warning: could not reach the embedding server").yellow()
        );
        eprintln!("You can continue, but make sure it is running before indexing.");
    }

    report_api_keys();

    eprintln!();
    if Confirm::new()
        .with_prompt("Save configuration?")
        .default(true)
        .interact()?
    {
        config.save().context("Failed to save configuration")?;
        eprintln!("{}", style("Configuration saved successfully.").green());

        let config_path = Config::config_file_path().context("Failed to get config file path")?;
        eprintln!(
            "Configuration saved to: {}",
            style(config_path.display()).cyan()
        );
    } else {
        eprintln!("Configuration not saved.");
    }

    Ok(())
}

#[inline]
pub fn show_config() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    eprintln!("{}", style("Current Configuration").bold().cyan());
    eprintln!();

    eprintln!("{}", style("Embedding:").bold().yellow());
    eprintln!("  Host: {}", style(&config.embedding.host).cyan());
    eprintln!("  Port: {}", style(config.embedding.port).cyan());
    eprintln!("  Model: {}", style(&config.embedding.model).cyan());
    match config.embedding.url() {
        Ok(url) => eprintln!("  URL: {}", style(url).cyan()),
        Err(e) => eprintln!("  URL: {} ({})", style("Invalid").red(), e),
    }

    eprintln!();
    eprintln!("{}", style("Generator:").bold().yellow());
    eprintln!("  Model: {}", style(&config.generator.model).cyan());

    eprintln!();
    eprintln!("{}", style("Retrieval:").bold().yellow());
    eprintln!("  Top K: {}", style(config.retrieval.top_k).cyan());
    eprintln!(
        "  Max generations: {}",
        style(config.retrieval.max_generations).cyan()
    );

    eprintln!();
    eprintln!("{}", style("Indexing:").bold().yellow());
    eprintln!(
        "  Corpus: {} pages",
        style(config.indexing.urls.len()).cyan()
    );
    eprintln!(
        "  Split: {} words, {} overlap",
        style(config.indexing.split_length).cyan(),
        style(config.indexing.split_overlap).cyan()
    );

    report_api_keys();

    let config_path = Config::config_file_path().context("Failed to get config file path")?;
    eprintln!();
    eprintln!("Config file: {}", style(config_path.display()).dim());

    Ok(())
}

fn configure_embedding(embedding: &mut EmbeddingConfig) -> Result<()> {
    embedding.host = Input::new()
        .with_prompt("Embedding server host")
        .default(embedding.host.clone())
        .interact_text()?;

    embedding.port = Input::new()
        .with_prompt("Embedding server port")
        .default(embedding.port)
        .interact_text()?;

    embedding.model = Input::new()
        .with_prompt("Embedding model")
        .default(embedding.model.clone())
        .interact_text()?;

    Ok(())
}

fn configure_generator(generator: &mut GeneratorConfig) -> Result<()> {
    generator.model = Input::new()
        .with_prompt("Generator model")
        .default(generator.model.clone())
        .interact_text()?;

    Ok(())
}

fn configure_retrieval(retrieval: &mut RetrievalConfig) -> Result<()> {
    retrieval.top_k = Input::new()
        .with_prompt("Passages retrieved per query (top K)")
        .default(retrieval.top_k)
        .interact_text()?;

    retrieval.max_generations = Input::new()
        .with_prompt("Max generator calls per question")
        .default(retrieval.max_generations)
        .interact_text()?;

    Ok(())
}

fn test_embedding_connection(embedding: &EmbeddingConfig) -> bool {
    match EmbeddingClient::new(embedding) {
        Ok(client) => client.ping().is_ok(),
        Err(_) => false,
    }
}

/// API keys are supplied out-of-band via the environment, never stored in the
/// config file.
fn report_api_keys() {
    eprintln!();
    eprintln!("{}", style("API keys (from environment):").bold().yellow());
    report_key(GOOGLE_API_KEY_VAR, "answer generation");
    report_key(SERPER_API_KEY_VAR, "web search fallback");
}

fn report_key(var: &str, purpose: &str) {
    if std::env::var(var).is_ok_and(|v| !v.trim().is_empty()) {
        eprintln!("  {} {} ({})", style("set:").green(), var, purpose);
    } else {
        eprintln!("  {} {} ({})", style("missing:").red(), var, purpose);
    }
}

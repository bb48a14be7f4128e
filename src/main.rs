use clap::{Parser, Subcommand};
use docs_assistant::Result;
use docs_assistant::commands::{ask, run_index, show_status};
use docs_assistant::config::{run_interactive_config, show_config};

#[derive(Parser)]
#[command(name = "docs-assistant")]
#[command(about = "A documentation question-answering assistant with web search fallback")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure embedding, generator, and retrieval settings
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
    /// Fetch, split, embed, and store the configured documentation corpus
    Index,
    /// Ask a question against the indexed documentation
    Ask {
        /// The question to answer
        question: String,
    },
    /// Show the state of the passage store
    Status,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config { show } => {
            if show {
                show_config()?;
            } else {
                run_interactive_config()?;
            }
        }
        Commands::Index => {
            run_index()?;
        }
        Commands::Ask { question } => {
            ask(&question)?;
        }
        Commands::Status => {
            show_status()?;
        }
    }

    Ok(())
}

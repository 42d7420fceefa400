//! thoughtloop CLI: the main entry point.
//!
//! Commands:
//! - `ask`     Answer a single question
//! - `chat`    Answer questions read from stdin, one run per line
//! - `tools`   List the built-in tools
//! - `config`  Show, validate or locate the configuration

use clap::{Parser, Subcommand};
use thoughtloop_config::Transport;

mod commands;

use commands::Overrides;

#[derive(Parser)]
#[command(
    name = "thoughtloop",
    about = "thoughtloop: a Thought / Action / Observation tool-calling agent",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Completion endpoint base URL (overrides BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Model identifier (overrides MODEL_ID)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Completion transport: chat_completions, responses or llama_stack
    #[arg(long, global = true)]
    transport: Option<Transport>,

    /// Maximum model calls per question
    #[arg(long, global = true)]
    max_turns: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a single question
    Ask {
        /// The question to answer
        question: String,
    },

    /// Interactive mode: one question per line, `exit` to quit
    Chat,

    /// List the built-in tools
    Tools,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration (secrets redacted)
    Show,
    /// Check the configuration for errors
    Validate {
        /// Also check that the completion endpoint is reachable
        #[arg(long)]
        ping: bool,
    },
    /// Print the configuration file path
    Path,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so stdout only carries answers
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let overrides = Overrides {
        base_url: cli.base_url,
        model: cli.model,
        transport: cli.transport,
        max_turns: cli.max_turns,
    };

    let result = match cli.command {
        Commands::Ask { question } => commands::ask::run(&question, &overrides).await,
        Commands::Chat => commands::chat::run(&overrides).await,
        Commands::Tools => commands::tools::run(),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show(&overrides),
            ConfigAction::Validate { ping } => {
                commands::config_cmd::validate(&overrides, ping).await
            }
            ConfigAction::Path => commands::config_cmd::path(),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

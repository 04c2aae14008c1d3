#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::doc_markdown,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::needless_pass_by_value,
    clippy::too_many_lines,
    clippy::uninlined_format_args
)]

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use toolchat::channels::{cli::render_reply, CliChannel};
use toolchat::providers::{self, Provider};
use toolchat::{sessions, tools, Config, Dispatcher};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn parse_temperature(s: &str) -> std::result::Result<f64, String> {
    let t: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if !(0.0..=2.0).contains(&t) {
        return Err("temperature must be between 0.0 and 2.0".to_string());
    }
    Ok(t)
}

/// `toolchat` - deterministic tools first, the model for everything else.
#[derive(Parser, Debug)]
#[command(name = "toolchat")]
#[command(version)]
#[command(about = "A session-aware chat front end with built-in tools.", long_about = None)]
struct Cli {
    /// Directory holding config.toml (default: ~/.toolchat)
    #[arg(long, global = true)]
    config_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start a chat session
    #[command(long_about = "\
Start a chat session.

Commands such as `calc 2 + 3`, `dice 20 2` or `convert 10 km mi` are answered \
by built-in tools. Anything else goes to the configured model together with \
the conversation so far. Use --message for a single query.

Examples:
  toolchat agent                                  # interactive session
  toolchat agent -m \"calc 12 * 4\"                 # single message
  toolchat agent -p openai --model gpt-4o-mini")]
    Agent {
        /// Single message mode (don't enter interactive mode)
        #[arg(short, long)]
        message: Option<String>,

        /// Session identifier (default: a fresh random id)
        #[arg(short, long)]
        session: Option<String>,

        /// Provider to use (ollama, openai, custom:<URL>)
        #[arg(short, long)]
        provider: Option<String>,

        /// Model to use
        #[arg(long)]
        model: Option<String>,

        /// Temperature (0.0 - 2.0)
        #[arg(short, long, value_parser = parse_temperature)]
        temperature: Option<f64>,
    },

    /// List built-in tools
    Tools,

    /// List supported model providers
    Providers,

    /// Show effective configuration
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_dir = match &cli.config_dir {
        Some(dir) if dir.trim().is_empty() => bail!("--config-dir cannot be empty"),
        Some(dir) => Some(PathBuf::from(dir)),
        None => None,
    };

    // Initialize logging - respects RUST_LOG env var, defaults to INFO.
    // Logs go to stderr so they never mix with chat output.
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let config = Config::load_or_init(config_dir.as_deref()).await?;

    match cli.command {
        Commands::Agent {
            message,
            session,
            provider,
            model,
            temperature,
        } => run_agent(config, message, session, provider, model, temperature).await,

        Commands::Tools => {
            let registry = tools::default_registry();
            println!("Built-in tools ({} total):\n", registry.len());
            for spec in registry.specs() {
                let aliases = if spec.aliases.is_empty() {
                    String::new()
                } else {
                    format!("  (also: {})", spec.aliases.join(", "))
                };
                println!("  {:<34} {}{}", spec.usage, spec.description, aliases);
            }
            Ok(())
        }

        Commands::Providers => {
            let providers = providers::list_providers();
            let current = config
                .default_provider
                .as_deref()
                .unwrap_or("ollama")
                .trim()
                .to_ascii_lowercase();
            println!("Supported providers ({} total):\n", providers.len());
            println!("  ID (use in config)  DESCRIPTION");
            println!("  ─────────────────── ───────────");
            for p in &providers {
                let marker = if p.name.eq_ignore_ascii_case(&current) {
                    " (active)"
                } else {
                    ""
                };
                let local_tag = if p.local { " [local]" } else { "" };
                println!("  {:<19} {}{}{}", p.name, p.display_name, local_tag, marker);
            }
            println!("\n  custom:<URL>        Any OpenAI-compatible endpoint");
            Ok(())
        }

        Commands::Status => {
            println!("💬 toolchat Status");
            println!();
            println!("Version:     {}", env!("CARGO_PKG_VERSION"));
            println!("Config:      {}", config.config_path.display());
            println!();
            println!(
                "🤖 Provider:      {}",
                config.default_provider.as_deref().unwrap_or("ollama")
            );
            println!(
                "   Model:         {}",
                config.default_model.as_deref().unwrap_or("(default)")
            );
            println!("   Temperature:   {}", config.default_temperature);
            println!(
                "   API URL:       {}",
                config.api_url.as_deref().unwrap_or("(provider default)")
            );
            println!(
                "   API key:       {}",
                if config.api_key.is_some() { "set" } else { "not set" }
            );
            println!();
            println!("Agent:");
            println!(
                "  History window:    {} messages",
                config.agent.max_history_messages
            );
            println!("  Model timeout:     {}s", config.agent.model_timeout_secs);
            println!(
                "  Max message:       {} characters",
                config.agent.max_message_chars
            );
            println!(
                "  System prompt:     {}",
                if config.agent.system_prompt.is_some() {
                    "custom"
                } else {
                    "built-in"
                }
            );
            println!("  Tools:             {}", tools::default_registry().len());
            Ok(())
        }
    }
}

async fn run_agent(
    config: Config,
    message: Option<String>,
    session: Option<String>,
    provider_override: Option<String>,
    model_override: Option<String>,
    temperature_override: Option<f64>,
) -> Result<()> {
    let provider_name = provider_override
        .or_else(|| config.default_provider.clone())
        .unwrap_or_else(|| "ollama".into());
    let model = model_override
        .or_else(|| config.default_model.clone())
        .unwrap_or_else(|| "phi3:mini".into());
    let temperature = temperature_override.unwrap_or(config.default_temperature);

    let provider: Arc<dyn Provider> = Arc::from(providers::create_provider(
        &provider_name,
        config.api_key.as_deref(),
        config.api_url.as_deref(),
    )?);
    let store = sessions::create_conversation_store(config.agent.max_history_messages);

    let mut dispatcher = Dispatcher::new(
        provider,
        store,
        Arc::new(tools::default_registry()),
        model.as_str(),
        temperature,
    )
    .with_model_timeout(Duration::from_secs(config.agent.model_timeout_secs));
    if let Some(prompt) = config.agent.system_prompt.as_deref() {
        dispatcher = dispatcher.with_system_prompt(prompt);
    }

    let session_id = session.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    info!(
        provider = %provider_name,
        model = %model,
        session = %session_id,
        "Starting agent"
    );

    let channel = CliChannel::new(
        Arc::new(dispatcher),
        session_id,
        config.agent.max_message_chars,
    );

    if let Some(message) = message {
        let result = channel.send(&message).await?;
        println!("{}", render_reply(&result));
        return Ok(());
    }

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    channel.run_interactive(stdin, &mut stdout).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_has_no_flag_conflicts() {
        Cli::command().debug_assert();
    }

    #[test]
    fn agent_flags_parse() {
        let cli = Cli::try_parse_from([
            "toolchat", "agent", "-m", "calc 1 + 1", "-s", "abc", "-t", "0.2", "-p", "openai",
        ])
        .expect("agent invocation should parse");
        match cli.command {
            Commands::Agent {
                message,
                session,
                provider,
                temperature,
                model,
            } => {
                assert_eq!(message.as_deref(), Some("calc 1 + 1"));
                assert_eq!(session.as_deref(), Some("abc"));
                assert_eq!(provider.as_deref(), Some("openai"));
                assert_eq!(temperature, Some(0.2));
                assert!(model.is_none());
            }
            other => panic!("expected agent command, got {other:?}"),
        }
    }

    #[test]
    fn config_dir_is_global() {
        let cli = Cli::try_parse_from(["toolchat", "status", "--config-dir", "/tmp/tc"])
            .expect("status invocation should parse");
        assert_eq!(cli.config_dir.as_deref(), Some("/tmp/tc"));
    }

    #[test]
    fn temperature_out_of_range_is_rejected() {
        assert!(parse_temperature("2.5").is_err());
        assert!(parse_temperature("warm").is_err());
        assert_eq!(parse_temperature("1.0"), Ok(1.0));
    }
}

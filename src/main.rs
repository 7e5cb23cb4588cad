use clap::{Parser, Subcommand};
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use carik_relay::application::errors::ConfigError;
use carik_relay::application::services::{RelayOptions, RelayService};
use carik_relay::infrastructure::adapters::telegram::TelegramAdapter;
use carik_relay::infrastructure::config::Config;
use carik_relay::infrastructure::llm::OpenAIProvider;
use carik_relay::infrastructure::server::{self, AppState};

type BoxError = Box<dyn std::error::Error>;

#[derive(Parser)]
#[command(name = "carik-relay")]
#[command(about = "Relay Telegram messages to an LLM and back", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path (skipped if missing)
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Listening port (overrides config and PORT)
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook server (default)
    Run,
    /// Show version
    Version,
    /// Print the default config
    InitConfig,
    /// Point the Telegram bot's webhook at this relay
    SetWebhook {
        /// Public URL Telegram should POST updates to
        #[arg(long)]
        url: String,
        /// Discard updates queued while no webhook was set
        #[arg(long)]
        drop_pending: bool,
    },
    /// Remove the Telegram bot's webhook
    DeleteWebhook {
        /// Discard updates still queued for the bot
        #[arg(long)]
        drop_pending: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_relay(&cli.config, cli.port).await,
        Commands::Version => {
            println!("carik-relay v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(),
        Commands::SetWebhook { url, drop_pending } => {
            set_webhook(&cli.config, &url, drop_pending).await
        }
        Commands::DeleteWebhook { drop_pending } => delete_webhook(&cli.config, drop_pending).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Defaults, then the config file if present, then the environment
fn load_config(path: &Path, port_override: Option<u16>) -> Result<Config, ConfigError> {
    let mut config = if path.exists() {
        tracing::info!("Loading config from {}", path.display());
        Config::load(path)?
    } else {
        Config::default()
    };

    config.apply_env(|key| std::env::var(key).ok())?;

    if let Some(port) = port_override {
        config.server.port = port;
    }

    Ok(config)
}

fn telegram_adapter(config: &Config) -> Result<TelegramAdapter, BoxError> {
    let token = config
        .telegram_token()
        .ok_or_else(|| ConfigError::MissingField("TELEGRAM_TOKEN".to_string()))?;

    Ok(TelegramAdapter::new(token)
        .with_api_base(config.telegram.api_base.clone())
        .with_parse_mode(config.telegram.parse_mode.clone())
        .with_client(config.http_client()?))
}

async fn run_relay(config_path: &Path, port_override: Option<u16>) -> Result<(), BoxError> {
    let config = load_config(config_path, port_override)?;
    config.validate()?;

    let bot = telegram_adapter(&config)?;
    tracing::info!("Telegram bot token: {}", bot.redacted_token());

    let api_key = config
        .llm
        .api_key()
        .ok_or_else(|| ConfigError::MissingField("OPENAI_API_KEY".to_string()))?;
    let llm = OpenAIProvider::new(api_key, Some(&config.llm.model))
        .with_api_base(config.llm.api_base.clone())
        .with_client(config.http_client()?);
    tracing::info!("Using {} via {}", config.llm.model, config.llm.api_base);

    let relay = RelayService::new(Arc::new(llm), Arc::new(bot), RelayOptions::from_config(&config));
    let app = server::router(AppState::new(relay), &config.server.webhook_path);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(
        "Listening on {} (webhook: / and {})",
        listener.local_addr()?,
        config.server.webhook_path
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}

async fn set_webhook(config_path: &Path, url: &str, drop_pending: bool) -> Result<(), BoxError> {
    let config = load_config(config_path, None)?;
    telegram_adapter(&config)?.set_webhook(url, drop_pending).await?;
    println!("Webhook set to {}", url);
    Ok(())
}

async fn delete_webhook(config_path: &Path, drop_pending: bool) -> Result<(), BoxError> {
    let config = load_config(config_path, None)?;
    telegram_adapter(&config)?.delete_webhook(drop_pending).await?;
    println!("Webhook deleted");
    Ok(())
}

fn init_config() -> Result<(), BoxError> {
    let yaml = serde_yaml::to_string(&Config::default())?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}

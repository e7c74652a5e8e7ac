use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use wellness_core::config::CONFIG_FILE;
use wellness_core::{load_config, load_persona, ResponseResolver, WellnessConfig};

mod repl;

#[derive(Parser)]
#[command(
    name = "wellness",
    version,
    about = "Supportive chat companion with mood tracking"
)]
struct Cli {
    #[arg(
        long,
        default_value = "~/.wellness",
        help = "Config root directory (contains config.yaml, prompts/ and logs/)"
    )]
    config_root: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    #[command(about = "Open the full-screen companion (default)")]
    Tui,
    #[command(about = "Line-based chat REPL")]
    Chat,
    #[command(about = "Validate config.yaml and show the effective settings")]
    Validate,
}

fn expand_home(path: PathBuf) -> PathBuf {
    if !path.starts_with("~") {
        return path;
    }
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(path.strip_prefix("~").unwrap_or(&path)),
        None => path,
    }
}

fn init_logging(root: &Path, to_stderr: bool) -> Result<WorkerGuard> {
    let log_dir = root.join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log dir: {}", log_dir.display()))?;
    let file_appender = tracing_appender::rolling::daily(&log_dir, "wellness.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // the tui owns the terminal, so it only logs to file
    let stderr_layer =
        to_stderr.then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let root = expand_home(cli.config_root);
    let command = cli.command.unwrap_or(Commands::Tui);

    let _guard = init_logging(&root, command != Commands::Tui)?;

    let config = load_config(&root)?;
    match command {
        Commands::Validate => print_summary(&root, &config),
        Commands::Chat => {
            let (resolver, name) = bootstrap(&root, &config)?;
            let stdin = std::io::stdin();
            repl::run_repl(&resolver, &name, stdin.lock(), std::io::stdout()).await?;
        }
        Commands::Tui => {
            let (resolver, name) = bootstrap(&root, &config)?;
            wellness_tui::run_tui(resolver, &name).await?;
        }
    }

    Ok(())
}

fn bootstrap(root: &Path, config: &WellnessConfig) -> Result<(ResponseResolver, String)> {
    let persona = load_persona(&root.join("prompts"), &config.persona.name)?;
    let resolver = ResponseResolver::from_config(config, &persona);
    tracing::info!(
        online = resolver.is_online(),
        model = %config.provider.model,
        "wellness companion ready"
    );
    Ok((resolver, persona.name))
}

fn print_summary(root: &Path, config: &WellnessConfig) {
    let provider = &config.provider;
    let config_path = root.join(CONFIG_FILE);
    let source = if config_path.exists() {
        config_path.display().to_string()
    } else {
        "built-in defaults".to_string()
    };
    println!("Config valid ({source}).");
    println!("  api_base:     {}", provider.api_base);
    println!("  model:        {}", provider.model);
    println!("  max_tokens:   {}", provider.max_tokens);
    println!("  timeout_secs: {}", provider.timeout_secs);
    println!(
        "  api_key:      {}",
        if provider.has_api_key() {
            "configured"
        } else {
            "missing (offline replies only)"
        }
    );
    println!("  persona:      {}", config.persona.name);
}

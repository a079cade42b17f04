//! Parley - Text Translation with Pretrained opus-mt Models
//!
//! Command-line front end: parses arguments, sets up logging and
//! configuration, and hands each request to the translation workflow.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::{non_blocking, rolling};

use parley::cli::{Args, Commands};
use parley::config::Config;
use parley::language::{Language, ModelBindings};
use parley::model::{HubModelProvider, ModelCache};
use parley::resolver::TranslationResolver;
use parley::speech::GoogleTts;
use parley::workflow::{Outcome, Workflow};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging(args.verbose)?;

    // Load configuration
    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if std::path::Path::new("config.toml").exists() {
                info!("Found config.toml in current directory, loading...");
                Config::from_file("config.toml")?
            } else {
                Config::default()
            }
        }
    };

    match args.command {
        Commands::Translate { from, to, speak, text } => {
            let workflow = build_workflow(&config)?;
            let outcome = workflow.run(&text.join(" "), from, to, speak).await;
            print_outcome(&outcome);
        }
        Commands::Interactive { from, to, speak } => {
            let workflow = build_workflow(&config)?;
            println!("Translating {} -> {}. One line per request, Ctrl-D to quit.", from, to);

            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await? {
                let outcome = workflow.run(&line, from, to, speak).await;
                print_outcome(&outcome);
            }

            info!("Session used models: {:?}", workflow.resolver().cached_models());
        }
        Commands::Pairs => {
            println!("\nLanguages:");
            for language in Language::ALL {
                println!("  {:<10} {}", language.name(), language.code());
            }

            println!("\nSupported pairs:");
            println!("{:<10} {:<35}", "Pair", "Model");
            println!("{}", "-".repeat(45));
            for (pair, model_id) in ModelBindings.iter() {
                println!("{:<10} {:<35}", pair.to_string(), model_id);
            }

            println!("\nVoice input: Disabled (text input only)");
        }
        Commands::Models { download } => {
            let provider = HubModelProvider::new(config.models.clone())?;
            let model_ids = ModelBindings.model_ids();

            println!("\nTranslation Models:");
            println!("{:<35} {:<10}", "Model", "Status");
            println!("{}", "-".repeat(45));
            for model_id in &model_ids {
                let status = if provider.has_artifacts(model_id) { "Downloaded" } else { "Missing" };
                println!("{:<35} {:<10}", model_id, status);
            }

            if download {
                info!("Downloading all missing model artifacts...");
                let mut failed = 0;
                for model_id in &model_ids {
                    if let Err(e) = provider.download_artifacts(model_id).await {
                        warn!("Failed to download {}: {}", model_id, e);
                        failed += 1;
                    }
                }
                if failed == 0 {
                    info!("All model artifacts downloaded");
                } else {
                    warn!("{} of {} model downloads failed", failed, model_ids.len());
                }
            }
        }
        Commands::InitConfig { output } => {
            Config::default().save_to_file(&output)?;
            println!("Wrote default configuration to {}", output.display());
        }
    }

    Ok(())
}

fn build_workflow(config: &Config) -> Result<Workflow> {
    let provider = Arc::new(HubModelProvider::new(config.models.clone())?);

    let mut cache = ModelCache::new(provider);
    if config.models.load_timeout_secs > 0 {
        cache = cache.with_load_timeout(Duration::from_secs(config.models.load_timeout_secs));
    }

    let resolver = Arc::new(TranslationResolver::new(Arc::new(cache)));
    let mut workflow = Workflow::new(resolver, &config.speech.output_dir);
    if config.speech.enabled {
        workflow = workflow.with_synthesizer(Arc::new(GoogleTts::new(config.speech.clone())?));
    }

    Ok(workflow)
}

fn print_outcome(outcome: &Outcome) {
    if let Some(notice) = outcome.notice() {
        println!("{}", notice);
        return;
    }

    if let Outcome::Translated { text, audio, speech_warning } = outcome {
        println!("✅ Translation Complete");
        println!("{}", text);
        if let Some(path) = audio {
            println!("🔊 Audio: {}", path.display());
        }
        if let Some(warning) = speech_warning {
            println!("{}", warning);
        }
    }
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = std::env::current_dir()?.join(".parley").join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "parley.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // Console output stays terse; translations are printed to stdout
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Logging initialized - console: {}, file: {}",
          log_level, log_dir.join("parley.log").display());

    Ok(())
}

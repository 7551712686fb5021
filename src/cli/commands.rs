//! CLI command definitions and handlers

use clap::{Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;

use crate::core::client::HubModelLoader;
use crate::core::config::ServiceConfig;

/// How the server obtains models
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServeMode {
    /// Load a fresh model for every request
    Stateless,
    /// Load both directions at startup, caching snapshots on disk
    Cached,
}

/// Sentences translated when none are given
const DEMO_SENTENCES: &[&str] = &[
    "This is a test sentence from Wits Innovation Labs",
    "This is another longer different test sentence.",
    "Please send an SMS to 9876543210 and an email on newemail123@xyz.com by 15th October, 2023.",
];

/// Commands for the translation service
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP API server
    Serve {
        /// Bind address (default: 0.0.0.0)
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Listen port (default: 8000)
        #[arg(short, long, default_value_t = 8000)]
        port: u16,

        /// Model loading mode
        #[arg(long, value_enum, default_value_t = ServeMode::Cached)]
        mode: ServeMode,

        /// JSON configuration file (defaults to environment variables)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Translate sentences once and print the results
    Translate {
        /// Sentences to translate (defaults to a demo batch)
        strings: Vec<String>,

        /// Source language tag
        #[arg(long, default_value = "eng_Latn")]
        source_lang: String,

        /// Target language tag
        #[arg(short, long, default_value = "ben_Beng")]
        target_lang: String,

        /// Translation direction: en-indic or indic-en
        #[arg(short, long, default_value = "en-indic")]
        direction: String,

        /// JSON configuration file (defaults to environment variables)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the supported language table
    Languages,
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<ServiceConfig> {
    let config = match path {
        Some(path) => ServiceConfig::from_file(&path)?,
        None => ServiceConfig::from_env()?,
    };
    config.validate()?;
    Ok(config)
}

/// Handle server command
pub async fn handle_serve(
    host: String,
    port: u16,
    mode: ServeMode,
    config: Option<PathBuf>,
) -> anyhow::Result<()> {
    use crate::core::registry::ModelRegistry;
    use crate::server::api::{run_server, AppState};
    use tracing::info;

    let config = Arc::new(load_config(config)?);
    let loader = HubModelLoader::new(config.clone())?;

    let state = match mode {
        ServeMode::Stateless => {
            info!("Serving in stateless mode, models load per request");
            AppState::stateless(Arc::new(loader), config)
        }
        ServeMode::Cached => {
            info!("Loading models into {}", config.cache_dir.display());
            let registry = ModelRegistry::initialize(&loader, &config).await?;
            AppState::cached(Arc::new(registry))
        }
    };

    info!("Starting HTTP server on {}:{}", host, port);
    println!("🚀 Server starting on http://{}:{}", host, port);
    println!("📊 OpenAPI document: http://{}:{}/openapi.json", host, port);

    run_server(host, port, state).await?;

    Ok(())
}

/// Handle one-shot translation command
pub async fn handle_translate(
    strings: Vec<String>,
    source_lang: String,
    target_lang: String,
    direction: String,
    config: Option<PathBuf>,
) -> anyhow::Result<()> {
    use crate::core::models::Direction;
    use crate::core::pipeline::TranslationPipeline;
    use indicatif::{ProgressBar, ProgressStyle};
    use std::time::{Duration, Instant};
    use tracing::info;

    let start_time = Instant::now();

    let direction: Direction = direction.parse()?;
    let strings = if strings.is_empty() {
        DEMO_SENTENCES.iter().map(|s| s.to_string()).collect()
    } else {
        strings
    };

    info!("Translating {} sentences {} -> {}", strings.len(), source_lang, target_lang);

    let config = Arc::new(load_config(config)?);
    let loader = HubModelLoader::new(config.clone())?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(120));

    spinner.set_message(format!("Loading {} model", direction));
    let pipeline = TranslationPipeline::load(&loader, direction, config.generation.clone()).await;
    let pipeline = match pipeline {
        Ok(pipeline) => pipeline,
        Err(e) => {
            spinner.abandon_with_message("Model loading failed");
            return Err(e.into());
        }
    };

    spinner.set_message(format!("Translating with {}", pipeline.model_id()));
    let outputs = match pipeline.translate(&strings, &source_lang, &target_lang).await {
        Ok(outputs) => outputs,
        Err(e) => {
            spinner.abandon_with_message("Translation failed");
            return Err(e.into());
        }
    };
    spinner.finish_and_clear();

    for (source, translated) in strings.iter().zip(outputs.iter()) {
        println!("{}\n  → {}", source, translated);
    }

    let duration = start_time.elapsed();
    println!("\n✅ Translated {} sentences in {:?}", outputs.len(), duration);

    Ok(())
}

/// Handle language listing command
pub fn handle_languages() {
    use crate::core::languages::LANGUAGE_CODES;

    for (name, code) in LANGUAGE_CODES {
        println!("{:<10} {}", name, code);
    }
}

//! Revoice - video localization pipeline
//!
//! Entry point for the `revoice` command: transcribes a video's speech,
//! translates it, synthesizes the translation and swaps it in as the
//! video's audio track.

use anyhow::Result;
use clap::Parser;
use std::path::Path;
use tracing::{info, Level};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use revoice::cli::{Args, Commands};
use revoice::config::Config;
use revoice::segmenter::SegmentPlan;
use revoice::setup::SetupManager;
use revoice::translate::{TranslationModel, SUPPORTED_LANGUAGES};
use revoice::upload::{Upload, VideoPayload};
use revoice::workflow::{JobResult, Workflow};

const DEFAULT_CONFIG_FILE: &str = "revoice.toml";

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let setup_manager = SetupManager::new()?;
    setup_logging(args.verbose, setup_manager.revoice_dir())?;
    info!("Starting Revoice - video localization pipeline");

    let mut config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if Path::new(DEFAULT_CONFIG_FILE).exists() {
                info!("Found {} in current directory, loading...", DEFAULT_CONFIG_FILE);
                Config::from_file(DEFAULT_CONFIG_FILE)?
            } else {
                Config::default()
            }
        }
    };
    if let Ok(token) = std::env::var("HF_TOKEN") {
        config.translate.api_token = Some(token);
    }

    match args.command {
        Commands::Languages => {
            println!("{:<22} {:<30}", "Language", "Model");
            println!("{}", "-".repeat(52));
            for language in SUPPORTED_LANGUAGES {
                let model = if *language == config.translate.source_language {
                    "(source language, no translation)".to_string()
                } else {
                    TranslationModel::for_language(language).to_string()
                };
                println!("{:<22} {:<30}", language, model);
            }
        }
        Commands::InitConfig { output } => {
            Config::default().save_to_file(&output)?;
            println!("Default configuration written to {}", output.display());
        }
        Commands::Check => {
            Workflow::from_config(config).await?;
            println!("All collaborators are available");
        }
        Commands::Probe { input } => {
            let workflow = Workflow::from_config(config).await?;
            let (duration, plan) = workflow.probe(&input).await?;
            println!("Duration: {:.3}s", duration);
            match plan {
                SegmentPlan::Whole => println!("Segments: 1 (processed whole)"),
                SegmentPlan::Split { segment_length_secs, expected_count } => {
                    println!("Segments: {} x {}s", expected_count, segment_length_secs)
                }
            }
        }
        Commands::Process { input, language, json } => {
            setup_manager.initialize(&config).await?;
            let workflow = Workflow::from_config(config).await?;

            match workflow.submit(Upload::new(VideoPayload::File(input), language)).await {
                Ok(result) if json => println!("{}", serde_json::to_string_pretty(&result)?),
                Ok(result) => print_result(&result),
                Err(failure) => {
                    eprintln!("{}", failure);
                    if let Some(partial) = &failure.partial {
                        eprintln!("\nTranscript:\n{}", partial.transcript);
                        eprintln!("\nTranslation:\n{}", partial.translation);
                    }
                    std::process::exit(1);
                }
            }
        }
        Commands::Batch { input_dir, language } => {
            setup_manager.initialize(&config).await?;
            let workflow = Workflow::from_config(config).await?;

            let outcomes = workflow.process_directory(&input_dir, &language).await?;
            let failed = outcomes.iter().filter(|(_, outcome)| outcome.is_err()).count();
            for (video, outcome) in &outcomes {
                match outcome {
                    Ok(result) => {
                        println!("OK    {} -> {}", video.display(), result.output_path.display())
                    }
                    Err(failure) => println!("FAIL  {}: {}", video.display(), failure),
                }
            }
            println!("{} processed, {} failed", outcomes.len() - failed, failed);
            if failed > 0 {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn print_result(result: &JobResult) {
    println!("Transcript:\n{}\n", result.transcript);
    println!("Translation ({}):\n{}\n", result.target_language, result.translation);
    println!("Segments: {}", result.segment_count);
    println!("Video: {} ({})", result.output_path.display(), result.video_url);
}

fn setup_logging(verbose: bool, revoice_dir: &Path) -> Result<()> {
    let log_dir = revoice_dir.join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "revoice.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false); // No ANSI colors in file

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Logging initialized - console: {}, file: {}",
          log_level, log_dir.join("revoice.log").display());

    Ok(())
}

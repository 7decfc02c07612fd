//! Kartei CLI entry point.

use anyhow::Result;
use clap::Parser;
use kartei::cli::{commands, Cli, Commands};
use kartei::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("kartei={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Execute command
    match &cli.command {
        None => {
            commands::run_session(settings).await?;
        }

        Some(Commands::Audio {
            deck,
            source,
            dest,
            append,
            replace,
        }) => {
            commands::run_audio(
                deck.as_deref(),
                source.as_deref(),
                dest.as_deref(),
                *append,
                *replace,
                settings,
            )
            .await?;
        }

        Some(Commands::Generate {
            topic,
            count,
            deck,
            source,
            translation_field,
            with_audio,
        }) => {
            commands::run_generate(
                topic,
                *count,
                deck.as_deref(),
                source.as_deref(),
                translation_field,
                *with_audio,
                settings,
            )
            .await?;
        }

        Some(Commands::Decks) => {
            commands::run_decks(settings).await?;
        }

        Some(Commands::Fields { deck }) => {
            commands::run_fields(deck, settings).await?;
        }

        Some(Commands::Analyze {
            input,
            top_n,
            output_dir,
            stopwords,
            no_stopwords,
        }) => {
            commands::run_analyze(
                input,
                *top_n,
                output_dir.as_deref(),
                stopwords.as_deref(),
                *no_stopwords,
                settings,
            )
            .await?;
        }

        Some(Commands::BuildDeck {
            frequency_json,
            word_list,
            top_n,
            format,
            output,
        }) => {
            commands::run_build_deck(frequency_json.as_deref(), word_list, *top_n, format, output)
                .await?;
        }

        Some(Commands::Doctor) => {
            commands::run_doctor(&settings).await?;
        }

        Some(Commands::Config { action }) => {
            commands::run_config(action, settings)?;
        }
    }

    Ok(())
}

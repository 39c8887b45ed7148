//! # Maestro - Classical Music Quiz
//!
//! Hear a clip, name the composer. Scores are kept between runs in the
//! platform data directory.
//!
//! ## Usage
//!
//! ```bash
//! # Play with the built-in catalog
//! maestro play
//!
//! # Play with your own samples
//! maestro play --catalog /path/to/assets
//!
//! # Show the high score
//! maestro scores
//! ```

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use log::{debug, info};
use maestro::catalog::{self, Catalog};
use maestro::cli::{self, CatalogArgs};
use maestro::completion;
use maestro::config::{self, QuizConfig};
use maestro::play::{self, PlayEnd, PlaySettings};
use maestro::store::{ScoreStore, SqliteScoreStore};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io;
use std::time::Duration;

/// Loads settings from `--config` or the default location.
fn load_settings(path: Option<&std::path::Path>) -> Result<QuizConfig> {
    match path {
        Some(p) => QuizConfig::from_file(p),
        None => QuizConfig::load(),
    }
}

/// Loads the catalog named on the command line, in the settings file, or the
/// built-in one, in that order.
fn load_catalog(args: &CatalogArgs, settings: &QuizConfig) -> Result<Catalog> {
    let path = args.catalog.as_deref().or(settings.catalog_path.as_deref());
    let policy = args.load_policy.unwrap_or(settings.load_policy);
    let source = catalog::source_for(path);

    debug!("Loading catalog from {} ({policy:?})", source.describe());
    Catalog::load_all(source.as_ref(), policy)
        .with_context(|| format!("Could not load samples from {}", source.describe()))
}

fn open_store() -> Result<SqliteScoreStore> {
    let db_path = config::get_db_path()?;
    SqliteScoreStore::open(&db_path)
        .with_context(|| format!("Failed to open score database at {}", db_path.display()))
}

/// Main entry point for Maestro.
///
/// Initializes logging, parses command-line arguments, and routes commands.
///
/// # Logging
///
/// Controlled via `RUST_LOG`:
/// - `RUST_LOG=debug maestro play` - Enable debug logging
/// - `RUST_LOG=maestro::quiz=trace maestro play` - Watch question generation
fn main() -> Result<()> {
    env_logger::init();

    let args = cli::Args::parse();
    let settings = load_settings(args.config.as_deref())?;

    match args.command {
        cli::Command::Play { catalog, pool_size, seed, strict, lenient, delay_ms, resume } => {
            let library = load_catalog(&catalog, &settings)?;
            let play_settings = PlaySettings {
                pool_size: pool_size.unwrap_or(settings.pool_size),
                strict: cli::strict_override(strict, lenient).unwrap_or(settings.strict_questions),
                answer_delay: Duration::from_millis(delay_ms.unwrap_or(settings.answer_delay_ms)),
            };
            if play_settings.pool_size < maestro::quiz::MIN_OPTIONS {
                anyhow::bail!("--pool-size must be at least {}", maestro::quiz::MIN_OPTIONS);
            }

            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };

            let mut store = open_store()?;
            let state = play::prepare_game(&library, &mut store, resume)?;
            info!("Starting game with {} samples", state.remaining().len());

            let stdin = io::stdin();
            let end = play::run_game(
                &library,
                state,
                &mut store,
                &play_settings,
                &mut rng,
                &mut stdin.lock(),
                &mut io::stdout(),
            )?;
            debug!("Game ended: {end:?}");
            if let PlayEnd::Saved { remaining } = end {
                info!("Saved game with {remaining} samples left");
            }
        }
        cli::Command::List { catalog } => {
            let library = load_catalog(&catalog, &settings)?;
            for sample in library.iter() {
                println!(
                    "{:>4}  {} - {}  [{}]",
                    sample.id(),
                    sample.composer(),
                    sample.title(),
                    sample.audio_reference()
                );
            }
            println!("{} samples", library.len());
        }
        cli::Command::Scores { catalog } => {
            let library = load_catalog(&catalog, &settings)?;
            let store = open_store()?;
            let max_score = library.max_score();
            println!("High score:  {}/{max_score}", store.high_score()?);
            println!("Last game:   {}/{max_score}", store.current_score()?);
            if let Some(saved) = store.load_game()? {
                println!(
                    "Saved game:  {} samples left, score {}",
                    saved.remaining().len(),
                    saved.current_score()
                );
            }
        }
        cli::Command::ResetScores => {
            let mut store = open_store()?;
            store.reset()?;
            println!("Scores reset");
        }
        cli::Command::Completion { shell } => {
            let mut cmd = cli::Args::command();
            let shell = completion::shell_to_completion_shell(shell);
            completion::generate_completions(shell, &mut cmd);
        }
    }

    Ok(())
}

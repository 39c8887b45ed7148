//! # Command-Line Interface Module
//!
//! This module defines the command-line interface for Maestro using Clap derive macros.
//!
//! ## Commands
//!
//! - `play`: Play a game in the terminal
//! - `list`: Show every sample in the catalog
//! - `scores`: Show the high score and the best possible score
//! - `reset-scores`: Forget stored scores and any saved game
//! - `completion`: Print a shell completion script
//!
//! ## Examples
//!
//! ```bash
//! maestro play
//! maestro play --catalog ~/quiz/assets --pool-size 3
//! maestro play --resume
//! maestro scores
//! ```

use crate::catalog::LoadPolicy;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// Main application arguments structure.
#[derive(Parser, Debug)]
#[command(name = "maestro")]
#[command(about = "Maestro: name the composer - a classical music quiz for the terminal")]
#[command(version)]
pub struct Args {
    /// Settings file to use instead of the default location
    #[arg(long, global = true, env = "MAESTRO_CONFIG", value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Where the samples come from.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct CatalogArgs {
    /// Sample list to use instead of the built-in catalog
    ///
    /// Either a JSON file or a directory holding a `*.exolist.json` file.
    #[arg(long, env = "MAESTRO_CATALOG", value_hint = clap::ValueHint::AnyPath)]
    pub catalog: Option<PathBuf>,

    /// How to handle broken records in the sample list
    #[arg(long, value_enum)]
    pub load_policy: Option<LoadPolicy>,
}

/// Enumeration of all available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a game
    ///
    /// Each round names a piece and offers a handful of composers. Type the
    /// number of your choice, or `q` to stop and keep the game for later.
    Play {
        #[command(flatten)]
        catalog: CatalogArgs,

        /// Number of composers offered per question (at least 2)
        #[arg(long)]
        pool_size: Option<usize>,

        /// Seed for question generation, for reproducible games
        #[arg(long)]
        seed: Option<u64>,

        /// Stop on malformed questions instead of skipping the round
        #[arg(long)]
        strict: bool,

        /// Skip malformed questions, overriding `strict_questions` in the settings
        #[arg(long, conflicts_with = "strict")]
        lenient: bool,

        /// Pause after each answer, in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Continue the game saved with `q`
        #[arg(long)]
        resume: bool,
    },

    /// List all samples in the catalog
    List {
        #[command(flatten)]
        catalog: CatalogArgs,
    },

    /// Show the high score
    ///
    /// Also shows the score of the latest game and the best score a game over
    /// the catalog can reach.
    Scores {
        #[command(flatten)]
        catalog: CatalogArgs,
    },

    /// Forget the high score, the latest score and any saved game
    ResetScores,

    /// Generate shell completions
    ///
    /// Usage: maestro completion bash > ~/.local/share/bash-completion/completions/maestro
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Question strictness asked for on the command line, if any.
#[must_use]
pub const fn strict_override(strict: bool, lenient: bool) -> Option<bool> {
    match (strict, lenient) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

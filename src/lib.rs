//! Classical music quiz: hear a clip, name the composer.
//!
//! Core modules:
//! - [`sample`] - Sample records and ids
//! - [`catalog`] - Loading and looking up the sample catalog
//! - [`quiz`] - Question generation, answer checking, score bookkeeping
//! - [`game`] - Game state carried from round to round
//! - [`store`] - Score persistence
//!
//! ### Supporting Modules
//!
//! - [`config`] - Settings and data directory management
//! - [`cli`] - Command-line interface definitions with clap integration
//! - [`completion`] - Shell completion generation
//! - [`play`] - Terminal game loop
//! - [`error`] - Library error type
//!
//! ## Quick Start Example
//!
//! ```no_run
//! use maestro::catalog::{self, Catalog, LoadPolicy};
//! use maestro::game::{AnswerOutcome, GameState};
//! use maestro::quiz;
//!
//! let catalog = Catalog::load_all(&catalog::InlineJson(catalog::BUILTIN_CATALOG), LoadPolicy::Lenient)?;
//! let ids = catalog.ids();
//! let mut game = GameState::start(&catalog, 0);
//! let mut rng = rand::thread_rng();
//!
//! while !game.is_finished() {
//!     let question = game.next_question(&ids, quiz::DEFAULT_POOL_SIZE, &mut rng)?;
//!     // A real player would pick from question.display_order(&mut rng).
//!     let guess = question.options()[0];
//!     if let AnswerOutcome::Scored(round) = game.answer(&question, guess, true)? {
//!         println!("score {}", round.current_score);
//!     }
//! }
//! # Ok::<(), maestro::error::QuizError>(())
//! ```
//!
//! ## Error Handling
//!
//! Library functions return [`error::Result`]. [`error::QuizError::GameOver`]
//! is the normal end of a game rather than a failure.

pub mod catalog;
pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod game;
pub mod play;
pub mod quiz;
pub mod sample;
pub mod store;

pub use catalog::Catalog;
pub use error::QuizError;
pub use game::GameState;
pub use sample::{Sample, SampleId};

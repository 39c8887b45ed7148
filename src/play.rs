//! Terminal front end: runs a game round by round on any reader/writer pair.
//!
//! Audio playback is left to whatever player the user points at the printed
//! audio reference; this loop only handles questions, answers and scores.

use crate::catalog::Catalog;
use crate::game::{AnswerOutcome, GameState, RoundResult};
use crate::sample::SampleId;
use crate::store::{persist_round, ScoreStore};
use anyhow::{Context, Result};
use log::{info, warn};
use rand::Rng;
use std::io::{BufRead, Write};
use std::thread;
use std::time::Duration;

/// Per-run knobs for [`run_game`].
#[derive(Debug, Clone)]
pub struct PlaySettings {
    pub pool_size: usize,
    pub strict: bool,
    pub answer_delay: Duration,
}

/// How a call to [`run_game`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayEnd {
    Finished {
        score: u32,
        max_score: u32,
        high_score: u32,
    },
    /// The player quit (or input ran out); the game was saved for `--resume`.
    Saved { remaining: usize },
}

/// Sets up the game to play: the saved one when `resume` is asked for and
/// one exists, a fresh one otherwise.
///
/// A resumed game takes the stored high score if it is higher than the one it
/// was saved with. Starting a fresh game discards any saved one.
///
/// # Errors
///
/// Propagates score store failures.
pub fn prepare_game(
    catalog: &Catalog,
    store: &mut dyn ScoreStore,
    resume: bool,
) -> Result<GameState> {
    let high_score = store.high_score().context("Failed to read high score")?;

    if resume {
        if let Some(mut saved) = store.load_game().context("Failed to load saved game")? {
            saved.reconcile(catalog);
            saved.merge_high_score(high_score);
            info!(
                "Resuming saved game: {} samples left, score {}",
                saved.remaining().len(),
                saved.current_score()
            );
            return Ok(saved);
        }
        warn!("No saved game to resume, starting a new one");
    }

    store.clear_game().context("Failed to clear saved game")?;
    store.set_current_score(0).context("Failed to reset current score")?;
    Ok(GameState::start(catalog, high_score))
}

/// Plays `state` to the end, or until the player quits.
///
/// # Errors
///
/// Returns an error on I/O failures, store failures, or an invalid question
/// while `settings.strict` is set.
pub fn run_game<R, W, G>(
    catalog: &Catalog,
    mut state: GameState,
    store: &mut dyn ScoreStore,
    settings: &PlaySettings,
    rng: &mut G,
    input: &mut R,
    output: &mut W,
) -> Result<PlayEnd>
where
    R: BufRead,
    W: Write,
    G: Rng + ?Sized,
{
    let catalog_ids = catalog.ids();

    while !state.is_finished() {
        let question = match state.next_question(&catalog_ids, settings.pool_size, rng) {
            Ok(question) => question,
            Err(e) if e.is_game_over() => break,
            Err(e) => return Err(e.into()),
        };

        let subject_id = question.options().first().copied();
        if let Some(id) = subject_id {
            let subject = catalog.lookup(id)?;
            writeln!(
                output,
                "\nRound {}: now playing \"{}\"  [{}]",
                state.rounds_played() + 1,
                subject.title(),
                subject.audio_reference()
            )?;
        }

        let shown = question.display_order(rng);
        for (i, id) in shown.iter().enumerate() {
            writeln!(output, "  {}) {}", i + 1, catalog.lookup(*id)?.composer())?;
        }

        let Some(chosen) = read_choice(&shown, input, output)? else {
            store.save_game(&state).context("Failed to save game")?;
            writeln!(output, "\nGame saved. Continue with `maestro play --resume`.")?;
            return Ok(PlayEnd::Saved {
                remaining: state.remaining().len(),
            });
        };

        match state.answer(&question, chosen, settings.strict)? {
            AnswerOutcome::Scored(result) => {
                persist_round(store, &result).context("Failed to store score")?;
                reveal(catalog, &result, output)?;
            }
            AnswerOutcome::Skipped => {
                writeln!(output, "That question was broken, skipping it.")?;
            }
        }

        if !settings.answer_delay.is_zero() {
            thread::sleep(settings.answer_delay);
        }
    }

    store.clear_game().context("Failed to clear saved game")?;
    let max_score = catalog.max_score();
    writeln!(output, "\nGame over!")?;
    writeln!(output, "Your score: {}/{max_score}", state.current_score())?;
    writeln!(output, "High score: {}/{max_score}", state.high_score())?;

    Ok(PlayEnd::Finished {
        score: state.current_score(),
        max_score,
        high_score: state.high_score(),
    })
}

/// Reads a 1-based choice. `None` means the player quit or input ended.
fn read_choice<R: BufRead, W: Write>(
    shown: &[SampleId],
    input: &mut R,
    output: &mut W,
) -> Result<Option<SampleId>> {
    loop {
        write!(output, "Your answer (1-{}, q to quit): ", shown.len())?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            return Ok(None);
        }

        match line.parse::<usize>() {
            Ok(n) if (1..=shown.len()).contains(&n) => return Ok(Some(shown[n - 1])),
            _ => writeln!(output, "Please enter a number between 1 and {}.", shown.len())?,
        }
    }
}

fn reveal<W: Write>(catalog: &Catalog, result: &RoundResult, output: &mut W) -> Result<()> {
    let answer = catalog.lookup(result.answer)?;
    if result.correct {
        writeln!(output, "Correct! It was {}.", answer.composer())?;
    } else {
        writeln!(output, "Wrong, it was {}.", answer.composer())?;
    }
    writeln!(output, "  (portrait: {})", catalog.composer_art(result.answer)?)?;

    if result.new_high_score {
        writeln!(output, "New high score: {}", result.high_score)?;
    } else {
        writeln!(output, "Score: {}", result.current_score)?;
    }
    Ok(())
}

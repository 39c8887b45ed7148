//! Question generation, answer checking and score bookkeeping.
//!
//! Everything here is a pure function of its inputs (plus the random number
//! generator handed in), so a game can be replayed exactly by seeding the rng.
//!
//! A [`Question`] is an ordered list of sample ids whose first element is the
//! correct answer. Front ends should present [`Question::display_order`]
//! instead of the raw order.

use crate::error::{QuizError, Result};
use crate::sample::SampleId;
use log::trace;
use rand::seq::{IteratorRandom, SliceRandom};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Number of answer options offered per round.
pub const DEFAULT_POOL_SIZE: usize = 4;

/// A question needs the answer plus at least one wrong option.
pub const MIN_OPTIONS: usize = 2;

/// Sample ids offered in one round, correct answer first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Question {
    options: Vec<SampleId>,
}

impl Question {
    /// Wraps ids that already follow the answer-first convention, e.g. a
    /// question restored from a saved game.
    #[must_use]
    pub fn from_ids(options: Vec<SampleId>) -> Self {
        Self { options }
    }

    /// All options, answer first.
    #[must_use]
    pub fn options(&self) -> &[SampleId] {
        &self.options
    }

    /// The wrong options.
    #[must_use]
    pub fn distractors(&self) -> &[SampleId] {
        self.options.get(1..).unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: SampleId) -> bool {
        self.options.contains(&id)
    }

    /// The options shuffled for presentation.
    pub fn display_order<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<SampleId> {
        let mut shown = self.options.clone();
        shown.shuffle(rng);
        shown
    }
}

/// Draws the next question.
///
/// The answer comes uniformly from `remaining`. Up to `pool_size - 1`
/// distractors are then drawn uniformly, without replacement, from every
/// other id in `catalog_ids` and `remaining`. Small catalogs simply yield
/// fewer options.
///
/// # Errors
///
/// Returns [`QuizError::GameOver`] when fewer than [`MIN_OPTIONS`] ids remain.
pub fn generate_question<R: Rng + ?Sized>(
    remaining: &BTreeSet<SampleId>,
    catalog_ids: &[SampleId],
    pool_size: usize,
    rng: &mut R,
) -> Result<Question> {
    if remaining.len() < MIN_OPTIONS {
        return Err(QuizError::GameOver);
    }

    let answer = remaining
        .iter()
        .copied()
        .choose(rng)
        .ok_or(QuizError::GameOver)?;

    let candidates: Vec<SampleId> = catalog_ids
        .iter()
        .chain(remaining.iter())
        .copied()
        .filter(|&id| id != answer)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let wanted = pool_size.max(MIN_OPTIONS) - 1;
    let mut options = Vec::with_capacity(wanted + 1);
    options.push(answer);
    options.extend(candidates.choose_multiple(rng, wanted).copied());

    trace!("Question for sample {answer}: options {options:?}");
    Ok(Question { options })
}

/// The correct answer of `question` (its first element).
///
/// # Errors
///
/// Returns [`QuizError::InvalidQuestion`] for an empty question.
pub fn correct_answer_id(question: &[SampleId]) -> Result<SampleId> {
    question.first().copied().ok_or(QuizError::InvalidQuestion)
}

#[must_use]
pub fn is_correct(answer: SampleId, chosen: SampleId) -> bool {
    answer == chosen
}

/// Takes the subject of the finished round out of the pool. Ids that are
/// already gone leave the pool untouched.
#[must_use]
pub fn advance_round(mut remaining: BTreeSet<SampleId>, answered: SampleId) -> BTreeSet<SampleId> {
    remaining.remove(&answered);
    remaining
}

#[must_use]
pub const fn record_score(current: u32, was_correct: bool) -> u32 {
    if was_correct {
        current.saturating_add(1)
    } else {
        current
    }
}

#[must_use]
pub fn update_high_score(current: u32, high: u32) -> u32 {
    current.max(high)
}

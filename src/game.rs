//! Game state threaded from round to round.
//!
//! A [`GameState`] is a plain value: the front end asks it for the next
//! question, reports the player's choice, and may serialize it between rounds
//! to resume later. It goes `NotStarted -> InProgress -> Finished` and never
//! leaves `Finished`.

use crate::catalog::Catalog;
use crate::error::{QuizError, Result};
use crate::quiz::{self, Question, MIN_OPTIONS};
use crate::sample::SampleId;
use log::{debug, error, info};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    NotStarted,
    InProgress,
    Finished,
}

/// What happened when the player answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    Scored(RoundResult),
    /// The question was unusable and the round was dropped without touching
    /// the state.
    Skipped,
}

/// Result of one scored round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundResult {
    pub answer: SampleId,
    pub chosen: SampleId,
    pub correct: bool,
    pub current_score: u32,
    pub high_score: u32,
    /// The high score was raised by this round.
    pub new_high_score: bool,
    /// This was the last round of the game.
    pub finished: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    remaining: BTreeSet<SampleId>,
    current_score: u32,
    high_score: u32,
    phase: GamePhase,
    #[serde(default)]
    rounds_played: u32,
}

impl GameState {
    /// A game that has not started yet, carrying the stored high score.
    #[must_use]
    pub fn new(high_score: u32) -> Self {
        Self {
            remaining: BTreeSet::new(),
            current_score: 0,
            high_score,
            phase: GamePhase::NotStarted,
            rounds_played: 0,
        }
    }

    /// Starts a fresh game over the whole catalog.
    ///
    /// Catalogs too small to ask even one question finish immediately.
    #[must_use]
    pub fn start(catalog: &Catalog, high_score: u32) -> Self {
        let mut state = Self::new(high_score);
        state.remaining = catalog.ids().into_iter().collect();
        state.phase = if state.remaining.len() < MIN_OPTIONS {
            GamePhase::Finished
        } else {
            GamePhase::InProgress
        };
        info!(
            "New game with {} samples (high score {high_score})",
            state.remaining.len()
        );
        state
    }

    /// Reconciles a saved game with the catalog it is resumed against:
    /// ids that no longer exist are dropped, and the game finishes if too
    /// few remain.
    pub fn reconcile(&mut self, catalog: &Catalog) {
        let before = self.remaining.len();
        self.remaining.retain(|&id| catalog.lookup(id).is_ok());
        if self.remaining.len() != before {
            debug!(
                "Dropped {} unknown sample ids from saved game",
                before - self.remaining.len()
            );
        }
        if self.phase == GamePhase::InProgress && self.remaining.len() < MIN_OPTIONS {
            self.phase = GamePhase::Finished;
        }
    }

    /// Raises the carried high score to `stored` if that is higher. A saved
    /// game can fall behind the store while other games are played.
    pub fn merge_high_score(&mut self, stored: u32) {
        let merged = quiz::update_high_score(self.high_score, stored);
        if merged != self.high_score {
            debug!("High score raised from {} to {merged} by the store", self.high_score);
            self.high_score = merged;
        }
    }

    /// Draws the next question from the remaining pool.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::GameOver`] unless the game is in progress with at
    /// least two samples left.
    pub fn next_question<R: Rng + ?Sized>(
        &self,
        catalog_ids: &[SampleId],
        pool_size: usize,
        rng: &mut R,
    ) -> Result<Question> {
        if self.phase != GamePhase::InProgress {
            return Err(QuizError::GameOver);
        }
        quiz::generate_question(&self.remaining, catalog_ids, pool_size, rng)
    }

    /// Scores the player's `chosen` option for `question` and moves on to the
    /// next round.
    ///
    /// The subject of the round leaves the pool whether or not the player was
    /// right, so no sample is asked twice.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::GameOver`] once the game is finished, and
    /// [`QuizError::InvalidQuestion`] for an empty question when `strict`
    /// is set. Without `strict` an empty question is logged and skipped.
    pub fn answer(
        &mut self,
        question: &Question,
        chosen: SampleId,
        strict: bool,
    ) -> Result<AnswerOutcome> {
        if self.phase != GamePhase::InProgress {
            return Err(QuizError::GameOver);
        }

        let answer = match quiz::correct_answer_id(question.options()) {
            Ok(id) => id,
            Err(e) if strict => return Err(e),
            Err(e) => {
                error!("Skipping round: {e}");
                return Ok(AnswerOutcome::Skipped);
            }
        };

        let correct = quiz::is_correct(answer, chosen);
        self.current_score = quiz::record_score(self.current_score, correct);

        let high_score = quiz::update_high_score(self.current_score, self.high_score);
        let new_high_score = high_score > self.high_score;
        self.high_score = high_score;

        self.remaining = quiz::advance_round(std::mem::take(&mut self.remaining), answer);
        self.rounds_played += 1;
        if self.remaining.len() < MIN_OPTIONS {
            self.phase = GamePhase::Finished;
            info!(
                "Game finished after {} rounds with score {}",
                self.rounds_played, self.current_score
            );
        }

        debug!(
            "Round {}: answer {answer}, chose {chosen}, correct {correct}, score {}",
            self.rounds_played, self.current_score
        );

        Ok(AnswerOutcome::Scored(RoundResult {
            answer,
            chosen,
            correct,
            current_score: self.current_score,
            high_score: self.high_score,
            new_high_score,
            finished: self.is_finished(),
        }))
    }

    #[must_use]
    pub fn remaining(&self) -> &BTreeSet<SampleId> {
        &self.remaining
    }

    #[must_use]
    pub const fn current_score(&self) -> u32 {
        self.current_score
    }

    #[must_use]
    pub const fn high_score(&self) -> u32 {
        self.high_score
    }

    #[must_use]
    pub const fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub const fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == GamePhase::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::Sample;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn catalog_of(count: u32) -> Catalog {
        Catalog::from_samples(
            (1..=count)
                .map(|i| {
                    Sample::new(
                        SampleId::new(i),
                        format!("Composer {i}"),
                        format!("Piece {i}"),
                        format!("asset:///{i}.mp3"),
                        format!("art{i}"),
                    )
                })
                .collect(),
        )
    }

    fn answer_of(question: &Question) -> SampleId {
        quiz::correct_answer_id(question.options()).unwrap()
    }

    #[test]
    fn test_new_game_is_not_started() {
        let state = GameState::new(3);
        assert_eq!(state.phase(), GamePhase::NotStarted);
        assert_eq!(state.high_score(), 3);

        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            state.next_question(&[], 4, &mut rng),
            Err(QuizError::GameOver)
        ));
    }

    #[test]
    fn test_start_fills_pool_and_resets_score() {
        let catalog = catalog_of(10);
        let state = GameState::start(&catalog, 4);

        assert_eq!(state.phase(), GamePhase::InProgress);
        assert_eq!(state.remaining().len(), 10);
        assert_eq!(state.current_score(), 0);
        assert_eq!(state.high_score(), 4);
    }

    #[test]
    fn test_tiny_catalog_finishes_immediately() {
        let state = GameState::start(&catalog_of(1), 0);
        assert!(state.is_finished());
    }

    #[test]
    fn test_full_game_of_ten_samples_takes_nine_rounds() {
        let catalog = catalog_of(10);
        let ids = catalog.ids();
        let mut state = GameState::start(&catalog, 0);
        let mut rng = StdRng::seed_from_u64(2024);
        let mut rounds = 0;

        while !state.is_finished() {
            let before = state.remaining().len();
            let question = state.next_question(&ids, 4, &mut rng).unwrap();
            let answer = answer_of(&question);

            let outcome = state.answer(&question, answer, true).unwrap();
            assert!(matches!(outcome, AnswerOutcome::Scored(r) if r.correct));
            assert_eq!(state.remaining().len(), before - 1);
            rounds += 1;
        }

        assert_eq!(rounds, 9);
        assert_eq!(state.remaining().len(), 1);
        assert_eq!(state.current_score(), 9);
        assert_eq!(state.high_score(), 9);
        assert_eq!(state.rounds_played(), 9);
        assert!(matches!(
            state.next_question(&ids, 4, &mut rng),
            Err(QuizError::GameOver)
        ));
    }

    #[test]
    fn test_wrong_answer_still_removes_subject() {
        let catalog = catalog_of(4);
        let ids = catalog.ids();
        let mut state = GameState::start(&catalog, 0);
        let mut rng = StdRng::seed_from_u64(8);

        let question = state.next_question(&ids, 4, &mut rng).unwrap();
        let answer = answer_of(&question);
        let wrong = question.distractors()[0];

        let outcome = state.answer(&question, wrong, true).unwrap();
        let AnswerOutcome::Scored(result) = outcome else {
            panic!("round should be scored");
        };
        assert!(!result.correct);
        assert_eq!(result.current_score, 0);
        assert!(!state.remaining().contains(&answer));
        assert_eq!(state.remaining().len(), 3);
    }

    #[test]
    fn test_high_score_only_rises() {
        let catalog = catalog_of(5);
        let ids = catalog.ids();
        let mut state = GameState::start(&catalog, 1);
        let mut rng = StdRng::seed_from_u64(1);

        let question = state.next_question(&ids, 4, &mut rng).unwrap();
        let outcome = state.answer(&question, answer_of(&question), true).unwrap();
        let AnswerOutcome::Scored(first) = outcome else {
            panic!("round should be scored");
        };
        assert_eq!(first.high_score, 1);
        assert!(!first.new_high_score);

        let question = state.next_question(&ids, 4, &mut rng).unwrap();
        let outcome = state.answer(&question, answer_of(&question), true).unwrap();
        let AnswerOutcome::Scored(second) = outcome else {
            panic!("round should be scored");
        };
        assert_eq!(second.high_score, 2);
        assert!(second.new_high_score);
    }

    #[test]
    fn test_merge_high_score_never_lowers() {
        let catalog = catalog_of(4);
        let ids = catalog.ids();
        let mut state = GameState::start(&catalog, 2);

        state.merge_high_score(1);
        assert_eq!(state.high_score(), 2);
        state.merge_high_score(5);
        assert_eq!(state.high_score(), 5);

        // One correct answer is still below the merged high score.
        let mut rng = StdRng::seed_from_u64(6);
        let question = state.next_question(&ids, 4, &mut rng).unwrap();
        let outcome = state.answer(&question, answer_of(&question), true).unwrap();
        let AnswerOutcome::Scored(result) = outcome else {
            panic!("round should be scored");
        };
        assert_eq!(result.high_score, 5);
        assert!(!result.new_high_score);
    }

    #[test]
    fn test_empty_question_strict_vs_lenient() {
        let catalog = catalog_of(4);
        let mut state = GameState::start(&catalog, 0);
        let empty = Question::from_ids(Vec::new());

        assert!(matches!(
            state.answer(&empty, SampleId::new(1), true),
            Err(QuizError::InvalidQuestion)
        ));

        let before = state.clone();
        let outcome = state.answer(&empty, SampleId::new(1), false).unwrap();
        assert_eq!(outcome, AnswerOutcome::Skipped);
        assert_eq!(state, before);
    }

    #[test]
    fn test_finished_game_rejects_answers() {
        let catalog = catalog_of(2);
        let ids = catalog.ids();
        let mut state = GameState::start(&catalog, 0);
        let mut rng = StdRng::seed_from_u64(4);

        let question = state.next_question(&ids, 4, &mut rng).unwrap();
        let outcome = state.answer(&question, answer_of(&question), true).unwrap();
        let AnswerOutcome::Scored(result) = outcome else {
            panic!("round should be scored");
        };
        assert!(result.finished);
        assert!(matches!(
            state.answer(&question, answer_of(&question), true),
            Err(QuizError::GameOver)
        ));
    }

    #[test]
    fn test_state_survives_json_round_trip_and_reconcile() {
        let catalog = catalog_of(6);
        let mut state = GameState::start(&catalog, 2);
        let json = serde_json::to_string(&state).unwrap();
        let restored: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);

        state.reconcile(&catalog_of(1));
        assert_eq!(state.remaining().len(), 1);
        assert!(state.is_finished());
    }
}

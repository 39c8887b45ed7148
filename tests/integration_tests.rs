//! # Integration Tests for Maestro
//!
//! End-to-end tests from a user perspective: catalogs on disk, full games,
//! persisted scores and the command-line binary.

use anyhow::Result;
use std::fs;
use std::io::Cursor;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;
use tempfile::TempDir;

const COMPOSERS: [&str; 10] = [
    "Bach", "Mozart", "Beethoven", "Chopin", "Vivaldi",
    "Tchaikovsky", "Debussy", "Handel", "Brahms", "Schubert",
];

/// Test helper to write a ten sample catalog into a temporary asset directory
fn create_test_assets() -> Result<(TempDir, PathBuf)> {
    let temp_dir = TempDir::new()?;
    let records: Vec<serde_json::Value> = COMPOSERS
        .iter()
        .enumerate()
        .map(|(i, composer)| {
            serde_json::json!({
                "name": format!("Piece {i}"),
                "id": i,
                "composer": composer,
                "uri": format!("asset:///audio/{}.mp3", composer.to_lowercase()),
                "albumArtID": composer.to_lowercase(),
            })
        })
        .collect();

    let list_path = temp_dir.path().join("classical.exolist.json");
    fs::write(&list_path, serde_json::to_string_pretty(&records)?)?;
    Ok((temp_dir, list_path))
}

#[cfg(test)]
mod catalog_tests {
    use super::*;
    use maestro::catalog::{AssetDir, Catalog, JsonFile, LoadPolicy};
    use maestro::SampleId;

    #[test]
    fn test_file_and_directory_sources_agree() -> Result<()> {
        let (dir, list) = create_test_assets()?;

        let from_file = Catalog::load_all(&JsonFile(list), LoadPolicy::Strict)?;
        let from_dir = Catalog::load_all(&AssetDir(dir.path().to_path_buf()), LoadPolicy::Strict)?;

        assert_eq!(from_file.ids(), from_dir.ids());
        assert_eq!(from_file.len(), 10);
        assert_eq!(from_file.lookup(SampleId::new(3))?.composer(), "Chopin");
        Ok(())
    }
}

#[cfg(test)]
mod game_tests {
    use super::*;
    use maestro::catalog::{Catalog, JsonFile, LoadPolicy};
    use maestro::game::{AnswerOutcome, GamePhase, GameState};
    use maestro::quiz;
    use maestro::store::{persist_round, ScoreStore, SqliteScoreStore};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_ten_sample_game_finishes_after_nine_rounds() -> Result<()> {
        let (_dir, list) = create_test_assets()?;
        let catalog = Catalog::load_all(&JsonFile(list), LoadPolicy::Strict)?;
        let ids = catalog.ids();
        let mut rng = StdRng::seed_from_u64(77);

        let mut state = GameState::start(&catalog, 0);
        assert_eq!(state.phase(), GamePhase::InProgress);

        let mut rounds = 0;
        let mut correct = 0;
        while !state.is_finished() {
            let before = state.remaining().len();
            let question = state.next_question(&ids, quiz::DEFAULT_POOL_SIZE, &mut rng)?;
            let answer = quiz::correct_answer_id(question.options())?;
            assert!(state.remaining().contains(&answer));

            // Alternate right and wrong answers.
            let chosen = if rounds % 2 == 0 { answer } else { question.distractors()[0] };
            if let AnswerOutcome::Scored(result) = state.answer(&question, chosen, true)? {
                correct += u32::from(result.correct);
            }

            assert_eq!(state.remaining().len(), before - 1);
            rounds += 1;
        }

        assert_eq!(rounds, 9);
        assert_eq!(state.remaining().len(), 1);
        assert_eq!(state.phase(), GamePhase::Finished);
        assert_eq!(state.current_score(), correct);
        assert_eq!(correct, 5);
        assert!(state.next_question(&ids, 4, &mut rng).unwrap_err().is_game_over());
        Ok(())
    }

    #[test]
    fn test_high_score_persists_between_games() -> Result<()> {
        let (dir, list) = create_test_assets()?;
        let catalog = Catalog::load_all(&JsonFile(list), LoadPolicy::Strict)?;
        let ids = catalog.ids();
        let db_path = dir.path().join("scores.db");
        let mut rng = StdRng::seed_from_u64(1);

        {
            let mut store = SqliteScoreStore::open(&db_path)?;
            let mut state = GameState::start(&catalog, store.high_score()?);
            for _ in 0..3 {
                let question = state.next_question(&ids, 4, &mut rng)?;
                let answer = quiz::correct_answer_id(question.options())?;
                if let AnswerOutcome::Scored(result) = state.answer(&question, answer, true)? {
                    persist_round(&mut store, &result)?;
                }
            }
        }

        let store = SqliteScoreStore::open(&db_path)?;
        assert_eq!(store.high_score()?, 3);
        assert_eq!(store.current_score()?, 3);

        let next_game = GameState::start(&catalog, store.high_score()?);
        assert_eq!(next_game.high_score(), 3);
        assert_eq!(next_game.current_score(), 0);
        Ok(())
    }
}

#[cfg(test)]
mod play_tests {
    use super::*;
    use maestro::catalog::{Catalog, JsonFile, LoadPolicy};
    use maestro::game::AnswerOutcome;
    use maestro::play::{self, PlayEnd, PlaySettings};
    use maestro::quiz;
    use maestro::store::{persist_round, ScoreStore, SqliteScoreStore};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_saved_game_resumes_from_sqlite() -> Result<()> {
        let (dir, list) = create_test_assets()?;
        let catalog = Catalog::load_all(&JsonFile(list), LoadPolicy::Lenient)?;
        let db_path = dir.path().join("scores.db");
        let settings = PlaySettings {
            pool_size: 3,
            strict: true,
            answer_delay: Duration::ZERO,
        };
        let mut rng = StdRng::seed_from_u64(12);

        let mut store = SqliteScoreStore::open(&db_path)?;
        let state = play::prepare_game(&catalog, &mut store, false)?;
        let end = play::run_game(
            &catalog, state, &mut store, &settings, &mut rng,
            &mut Cursor::new("1\n3\nq\n"), &mut Vec::new(),
        )?;
        assert_eq!(end, PlayEnd::Saved { remaining: 8 });
        drop(store);

        let mut store = SqliteScoreStore::open(&db_path)?;
        let resumed = play::prepare_game(&catalog, &mut store, true)?;
        assert_eq!(resumed.rounds_played(), 2);

        let end = play::run_game(
            &catalog, resumed, &mut store, &settings, &mut rng,
            &mut Cursor::new("2\n".repeat(7)), &mut Vec::new(),
        )?;
        assert!(matches!(end, PlayEnd::Finished { max_score: 9, .. }));
        assert!(store.load_game()?.is_none());
        Ok(())
    }

    #[test]
    fn test_high_score_never_drops_across_save_new_game_resume() -> Result<()> {
        let (dir, list) = create_test_assets()?;
        let catalog = Catalog::load_all(&JsonFile(list), LoadPolicy::Strict)?;
        let ids = catalog.ids();
        let db_path = dir.path().join("scores.db");
        let mut rng = StdRng::seed_from_u64(30);

        // An old game is saved with high score 0.
        let mut store = SqliteScoreStore::open(&db_path)?;
        let old_game = play::prepare_game(&catalog, &mut store, false)?;
        store.save_game(&old_game)?;
        drop(store);

        // A new game discards that save and raises the high score to 4.
        let mut store = SqliteScoreStore::open(&db_path)?;
        let mut new_game = play::prepare_game(&catalog, &mut store, false)?;
        assert!(store.load_game()?.is_none());
        for _ in 0..4 {
            let question = new_game.next_question(&ids, 4, &mut rng)?;
            let answer = quiz::correct_answer_id(question.options())?;
            if let AnswerOutcome::Scored(result) = new_game.answer(&question, answer, true)? {
                persist_round(&mut store, &result)?;
            }
        }
        assert_eq!(store.high_score()?, 4);

        // The old save reappears (e.g. written by another process) and is resumed.
        store.save_game(&old_game)?;
        drop(store);
        let mut store = SqliteScoreStore::open(&db_path)?;
        let resumed = play::prepare_game(&catalog, &mut store, true)?;
        assert_eq!(resumed.high_score(), 4);

        let settings = PlaySettings {
            pool_size: 4,
            strict: true,
            answer_delay: Duration::ZERO,
        };
        let end = play::run_game(
            &catalog, resumed, &mut store, &settings, &mut rng,
            &mut Cursor::new("1\n".repeat(9)), &mut Vec::new(),
        )?;
        let PlayEnd::Finished { high_score, .. } = end else {
            panic!("game should finish, got {end:?}");
        };
        assert!(high_score >= 4);
        assert!(store.high_score()? >= 4);
        assert_eq!(store.high_score()?, high_score);
        Ok(())
    }
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    fn maestro() -> Command {
        Command::new(env!("CARGO_BIN_EXE_maestro"))
    }

    #[test]
    fn test_cli_help_displays_correctly() {
        let output = maestro().arg("--help").output().expect("Failed to run help command");

        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("maestro"));
        assert!(stdout.contains("play"));
        assert!(stdout.contains("scores"));
        assert!(stdout.contains("reset-scores"));
    }

    #[test]
    fn test_completion_generation() {
        let output = maestro()
            .args(["completion", "bash"])
            .output()
            .expect("Failed to run completion command");

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("_maestro"));
        assert!(stdout.contains("complete"));
    }

    #[test]
    fn test_list_reads_catalog_directory() -> Result<()> {
        let (dir, _list) = create_test_assets()?;
        let config_path = dir.path().join("config.json");
        fs::write(&config_path, "{}")?;

        let output = maestro()
            .arg("--config")
            .arg(&config_path)
            .arg("list")
            .arg("--catalog")
            .arg(dir.path())
            .output()?;

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("Tchaikovsky"));
        assert!(stdout.contains("10 samples"));
        Ok(())
    }

    #[test]
    fn test_list_with_missing_catalog_fails() {
        let output = maestro()
            .args(["list", "--catalog", "/no/such/samples.exolist.json"])
            .output()
            .expect("Failed to run list command");

        assert!(!output.status.success());
    }
}

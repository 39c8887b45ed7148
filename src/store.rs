//! Score persistence.
//!
//! The game logic never touches storage: scores live in [`GameState`] and are
//! written out at the process boundary through a [`ScoreStore`].
//!
//! [`SqliteScoreStore`] keeps everything in a small `SQLite` file in the data
//! directory; [`MemoryScoreStore`] is for tests and throwaway runs.

use crate::error::Result;
use crate::game::{GameState, RoundResult};
use log::{debug, trace};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

const HIGH_SCORE_KEY: &str = "high_score";
const CURRENT_SCORE_KEY: &str = "current_score";

/// Externally owned key-value storage for scores and a saved game.
pub trait ScoreStore {
    /// Stored high score, 0 if none was ever stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store can't be read.
    fn high_score(&self) -> Result<u32>;

    /// # Errors
    ///
    /// Returns an error if the backing store can't be written.
    fn set_high_score(&mut self, score: u32) -> Result<()>;

    /// Score of the latest (possibly finished) game, 0 if none.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store can't be read.
    fn current_score(&self) -> Result<u32>;

    /// # Errors
    ///
    /// Returns an error if the backing store can't be written.
    fn set_current_score(&mut self, score: u32) -> Result<()>;

    /// Stores an in-progress game, replacing any earlier one.
    ///
    /// # Errors
    ///
    /// Returns an error if the state can't be serialized or written.
    fn save_game(&mut self, state: &GameState) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the store can't be read or the saved state is corrupt.
    fn load_game(&self) -> Result<Option<GameState>>;

    /// # Errors
    ///
    /// Returns an error if the backing store can't be written.
    fn clear_game(&mut self) -> Result<()>;

    /// Forgets both scores and any saved game.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store can't be written.
    fn reset(&mut self) -> Result<()> {
        self.set_high_score(0)?;
        self.set_current_score(0)?;
        self.clear_game()
    }
}

/// Writes the scores a round produced. The high score is only written when
/// the round raised it.
///
/// # Errors
///
/// Propagates store failures.
pub fn persist_round(store: &mut dyn ScoreStore, result: &RoundResult) -> Result<()> {
    store.set_current_score(result.current_score)?;
    if result.new_high_score {
        debug!("New high score {}", result.high_score);
        store.set_high_score(result.high_score)?;
    }
    Ok(())
}

/// `SQLite` backed store.
#[derive(Debug)]
pub struct SqliteScoreStore {
    conn: Connection,
}

impl SqliteScoreStore {
    /// Opens (and if needed creates) the store at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database can't be opened or the schema can't
    /// be created.
    pub fn open(path: &Path) -> Result<Self> {
        debug!("Opening score store at {}", path.display());
        Self::init(Connection::open(path)?)
    }

    /// A store that lives only as long as the value.
    ///
    /// # Errors
    ///
    /// Returns an error if `SQLite` can't create the in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS scores (
                name  TEXT    PRIMARY KEY,
                value INTEGER NOT NULL
            );
            CREATE TABLE IF NOT EXISTS saved_game (
                id    INTEGER PRIMARY KEY CHECK (id = 1),
                state TEXT    NOT NULL
            );",
        )?;
        Ok(Self { conn })
    }

    fn get_score(&self, name: &str) -> Result<u32> {
        let value: Option<u32> = self
            .conn
            .query_row("SELECT value FROM scores WHERE name = ?1", [name], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value.unwrap_or(0))
    }

    fn put_score(&self, name: &str, value: u32) -> Result<()> {
        trace!("Storing {name} = {value}");
        self.conn.execute(
            "INSERT INTO scores (name, value) VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET value = excluded.value",
            (name, value),
        )?;
        Ok(())
    }
}

impl ScoreStore for SqliteScoreStore {
    fn high_score(&self) -> Result<u32> {
        self.get_score(HIGH_SCORE_KEY)
    }

    fn set_high_score(&mut self, score: u32) -> Result<()> {
        self.put_score(HIGH_SCORE_KEY, score)
    }

    fn current_score(&self) -> Result<u32> {
        self.get_score(CURRENT_SCORE_KEY)
    }

    fn set_current_score(&mut self, score: u32) -> Result<()> {
        self.put_score(CURRENT_SCORE_KEY, score)
    }

    fn save_game(&mut self, state: &GameState) -> Result<()> {
        let json = serde_json::to_string(state)?;
        self.conn.execute(
            "INSERT INTO saved_game (id, state) VALUES (1, ?1)
             ON CONFLICT(id) DO UPDATE SET state = excluded.state",
            [json],
        )?;
        Ok(())
    }

    fn load_game(&self) -> Result<Option<GameState>> {
        let json: Option<String> = self
            .conn
            .query_row("SELECT state FROM saved_game WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;

        match json {
            Some(j) => Ok(Some(serde_json::from_str(&j)?)),
            None => Ok(None),
        }
    }

    fn clear_game(&mut self) -> Result<()> {
        self.conn.execute("DELETE FROM saved_game", [])?;
        Ok(())
    }
}

/// Store that keeps everything in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    high_score: u32,
    current_score: u32,
    game: Option<GameState>,
}

impl ScoreStore for MemoryScoreStore {
    fn high_score(&self) -> Result<u32> {
        Ok(self.high_score)
    }

    fn set_high_score(&mut self, score: u32) -> Result<()> {
        self.high_score = score;
        Ok(())
    }

    fn current_score(&self) -> Result<u32> {
        Ok(self.current_score)
    }

    fn set_current_score(&mut self, score: u32) -> Result<()> {
        self.current_score = score;
        Ok(())
    }

    fn save_game(&mut self, state: &GameState) -> Result<()> {
        self.game = Some(state.clone());
        Ok(())
    }

    fn load_game(&self) -> Result<Option<GameState>> {
        Ok(self.game.clone())
    }

    fn clear_game(&mut self) -> Result<()> {
        self.game = None;
        Ok(())
    }
}

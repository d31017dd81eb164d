//! An optional SQLite-backed sink, feature-gated behind
//! `sqlite-sink` since it pulls in a bundled SQLite and a platform
//! data-directory resolver.
use super::traits::{DataSink, SinkError};
use crate::board::{Color, GameResult, MoveDescriptor, PositionDict};
use directories_next::ProjectDirs;
use rusqlite::{params, Connection};
use std::path::PathBuf;
use std::sync::Mutex;

pub struct SqliteSink {
    conn: Mutex<Connection>,
}

/// The default data directory for the sink's database file, resolved via
/// the platform's conventional application-data location.
pub fn default_db_path() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("com", "sacha-renault", "mcts-chess")?;
    let data_dir = dirs.data_dir();
    std::fs::create_dir_all(data_dir).ok()?;
    Some(data_dir.join("games.sqlite"))
}

impl SqliteSink {
    pub fn open(path: &PathBuf) -> Result<Self, SinkError> {
        let conn = Connection::open(path).map_err(|e| SinkError::Unavailable(e.to_string()))?;
        Self::init_schema(&conn)?;
        Ok(SqliteSink {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_default() -> Result<Self, SinkError> {
        let path = default_db_path()
            .ok_or_else(|| SinkError::Unavailable("could not resolve data directory".to_string()))?;
        Self::open(&path)
    }

    fn init_schema(conn: &Connection) -> Result<(), SinkError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS games (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id TEXT NOT NULL,
                mode TEXT NOT NULL,
                result TEXT,
                total_moves INTEGER,
                final_position_json TEXT
            );",
            [],
        )
        .map_err(|e| SinkError::Unavailable(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS positions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                game_id INTEGER NOT NULL,
                move_number INTEGER NOT NULL,
                mover TEXT NOT NULL,
                position_json TEXT NOT NULL,
                FOREIGN KEY (game_id) REFERENCES games (id) ON DELETE CASCADE
            );",
            [],
        )
        .map_err(|e| SinkError::Unavailable(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS moves (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                game_id INTEGER NOT NULL,
                move_number INTEGER NOT NULL,
                move_json TEXT NOT NULL,
                evaluation_score INTEGER NOT NULL,
                FOREIGN KEY (game_id) REFERENCES games (id) ON DELETE CASCADE
            );",
            [],
        )
        .map_err(|e| SinkError::Unavailable(e.to_string()))?;

        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, SinkError> {
        self.conn
            .lock()
            .map_err(|_| SinkError::Unavailable("database connection mutex poisoned".to_string()))
    }
}

fn result_label(result: GameResult) -> &'static str {
    match result {
        GameResult::InProgress => "in_progress",
        GameResult::WhiteWins => "white_wins",
        GameResult::BlackWins => "black_wins",
        GameResult::Draw => "draw",
    }
}

fn color_label(color: Color) -> &'static str {
    match color {
        Color::White => "white",
        Color::Black => "black",
    }
}

impl DataSink for SqliteSink {
    fn begin_game(&self, session_id: &str, mode: &str) -> Result<u64, SinkError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO games (session_id, mode) VALUES (?1, ?2)",
            params![session_id, mode],
        )
        .map_err(|e| SinkError::Unavailable(e.to_string()))?;
        Ok(conn.last_insert_rowid() as u64)
    }

    fn record_position(
        &self,
        game_id: u64,
        move_number: u32,
        position: &PositionDict,
        mover: Color,
    ) -> Result<(), SinkError> {
        let position_json = serde_json::to_string(position)
            .map_err(|e| SinkError::Unavailable(e.to_string()))?;
        self.lock()?
            .execute(
                "INSERT INTO positions (game_id, move_number, mover, position_json) VALUES (?1, ?2, ?3, ?4)",
                params![game_id as i64, move_number, color_label(mover), position_json],
            )
            .map_err(|e| SinkError::Unavailable(e.to_string()))?;
        Ok(())
    }

    fn record_move(
        &self,
        game_id: u64,
        move_number: u32,
        mv: &MoveDescriptor,
        evaluation_score: i32,
    ) -> Result<(), SinkError> {
        let move_json = serde_json::to_string(mv).map_err(|e| SinkError::Unavailable(e.to_string()))?;
        self.lock()?
            .execute(
                "INSERT INTO moves (game_id, move_number, move_json, evaluation_score) VALUES (?1, ?2, ?3, ?4)",
                params![game_id as i64, move_number, move_json, evaluation_score],
            )
            .map_err(|e| SinkError::Unavailable(e.to_string()))?;
        Ok(())
    }

    fn finish_game(
        &self,
        game_id: u64,
        result: GameResult,
        final_position: &PositionDict,
        total_moves: u32,
    ) -> Result<(), SinkError> {
        let position_json = serde_json::to_string(final_position)
            .map_err(|e| SinkError::Unavailable(e.to_string()))?;
        self.lock()?
            .execute(
                "UPDATE games SET result = ?1, total_moves = ?2, final_position_json = ?3 WHERE id = ?4",
                params![result_label(result), total_moves, position_json, game_id as i64],
            )
            .map_err(|e| SinkError::Unavailable(e.to_string()))?;
        Ok(())
    }
}

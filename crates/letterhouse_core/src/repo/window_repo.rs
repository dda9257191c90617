//! Window repository contract and SQLite implementation.
//!
//! # Invariants
//! - `add_window` reads used positions and inserts the new row inside one
//!   immediate transaction, so two writers cannot claim the same position.
//! - `(house_id, grid_position)` is unique at the schema level as well.
//! - Lists are ordered by `grid_position ASC`.

use super::{ensure_tables, millis_to_datetime, parse_uuid, RepoError, RepoResult};
use crate::model::house::HouseId;
use crate::model::window::{next_grid_position, LetterDraft, Window, WindowId};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

const WINDOW_SELECT_SQL: &str = "SELECT
    id,
    house_id,
    grid_position,
    character_type,
    frame_design,
    background_color,
    visitor_name,
    letter_content,
    created_at
FROM windows";

/// Data store contract for windows.
pub trait WindowRepository {
    /// Persists a letter at the lowest free grid position of `house_id`.
    fn add_window(
        &self,
        house_id: HouseId,
        draft: &LetterDraft,
        created_at: DateTime<Utc>,
    ) -> RepoResult<Window>;
    fn get_window(&self, id: WindowId) -> RepoResult<Option<Window>>;
    fn list_windows(&self, house_id: HouseId) -> RepoResult<Vec<Window>>;
    fn delete_window(&self, id: WindowId) -> RepoResult<()>;
}

/// SQLite-backed window repository.
pub struct SqliteWindowRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteWindowRepository<'conn> {
    /// Creates a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["houses", "windows"])?;
        Ok(Self { conn })
    }
}

impl WindowRepository for SqliteWindowRepository<'_> {
    fn add_window(
        &self,
        house_id: HouseId,
        draft: &LetterDraft,
        created_at: DateTime<Utc>,
    ) -> RepoResult<Window> {
        let draft = draft.normalized();
        draft.validate()?;

        let house_id_text = house_id.to_string();
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let house_exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM houses WHERE id = ?1);",
            [house_id_text.as_str()],
            |row| row.get(0),
        )?;
        if !house_exists {
            return Err(RepoError::NotFound(house_id));
        }

        let used = {
            let mut stmt = tx.prepare("SELECT grid_position FROM windows WHERE house_id = ?1;")?;
            let positions = stmt
                .query_map([house_id_text.as_str()], |row| row.get::<_, u32>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            positions
        };

        let window = Window {
            id: Uuid::new_v4(),
            house_id,
            grid_position: next_grid_position(used),
            character_type: draft.character_type,
            frame_design: draft.frame_design,
            background_color: draft.background_color,
            visitor_name: draft.visitor_name,
            letter_content: draft.letter_content,
            created_at,
        };

        tx.execute(
            "INSERT INTO windows (
                id,
                house_id,
                grid_position,
                character_type,
                frame_design,
                background_color,
                visitor_name,
                letter_content,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                window.id.to_string(),
                house_id_text,
                window.grid_position,
                window.character_type.as_str(),
                window.frame_design.as_str(),
                window.background_color.as_str(),
                window.visitor_name.as_str(),
                window.letter_content.as_str(),
                window.created_at.timestamp_millis(),
            ],
        )?;
        tx.commit()?;

        Ok(window)
    }

    fn get_window(&self, id: WindowId) -> RepoResult<Option<Window>> {
        let sql = format!("{WINDOW_SELECT_SQL} WHERE id = ?1;");
        self.conn
            .query_row(&sql, [id.to_string()], |row| Ok(parse_window_row(row)))
            .optional()?
            .transpose()
    }

    fn list_windows(&self, house_id: HouseId) -> RepoResult<Vec<Window>> {
        let mut stmt = self.conn.prepare(&format!(
            "{WINDOW_SELECT_SQL}
             WHERE house_id = ?1
             ORDER BY grid_position ASC;"
        ))?;
        let mut rows = stmt.query([house_id.to_string()])?;
        let mut windows = Vec::new();
        while let Some(row) = rows.next()? {
            windows.push(parse_window_row(row)?);
        }
        Ok(windows)
    }

    fn delete_window(&self, id: WindowId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM windows WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn parse_window_row(row: &Row<'_>) -> RepoResult<Window> {
    let id_text: String = row.get("id")?;
    let house_text: String = row.get("house_id")?;
    let grid_position = match row.get::<_, i64>("grid_position")? {
        value if value > 0 && value <= i64::from(u32::MAX) => value as u32,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid grid position `{other}` in windows.grid_position"
            )));
        }
    };

    Ok(Window {
        id: parse_uuid(&id_text, "windows.id")?,
        house_id: parse_uuid(&house_text, "windows.house_id")?,
        grid_position,
        character_type: row.get("character_type")?,
        frame_design: row.get("frame_design")?,
        background_color: row.get("background_color")?,
        visitor_name: row.get("visitor_name")?,
        letter_content: row.get("letter_content")?,
        created_at: millis_to_datetime(row.get("created_at")?, "windows.created_at")?,
    })
}

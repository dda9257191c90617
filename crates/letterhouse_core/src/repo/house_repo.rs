//! House repository contract and SQLite implementation.
//!
//! # Invariants
//! - At most one house per owner (unique index on `owner_id`).
//! - `house_type` is stored verbatim; unknown ids stay readable.

use super::{ensure_tables, millis_to_datetime, parse_uuid, RepoError, RepoResult};
use crate::model::house::{House, HouseId, UserId};
use rusqlite::{params, Connection, OptionalExtension, Row};

const HOUSE_SELECT_SQL: &str = "SELECT
    id,
    owner_id,
    name,
    house_type,
    timezone,
    created_at,
    updated_at
FROM houses";

/// Data store contract for houses.
pub trait HouseRepository {
    fn create_house(&self, house: &House) -> RepoResult<HouseId>;
    /// Replaces name, template and timezone; bumps `updated_at`.
    fn update_house(&self, house: &House) -> RepoResult<()>;
    fn get_house(&self, id: HouseId) -> RepoResult<Option<House>>;
    fn find_house_by_owner(&self, owner_id: UserId) -> RepoResult<Option<House>>;
}

/// SQLite-backed house repository.
pub struct SqliteHouseRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteHouseRepository<'conn> {
    /// Creates a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["houses"])?;
        Ok(Self { conn })
    }
}

impl HouseRepository for SqliteHouseRepository<'_> {
    fn create_house(&self, house: &House) -> RepoResult<HouseId> {
        house.validate()?;

        self.conn.execute(
            "INSERT INTO houses (
                id,
                owner_id,
                name,
                house_type,
                timezone,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                house.id.to_string(),
                house.owner_id.to_string(),
                house.name.as_str(),
                house.house_type.as_str(),
                house.timezone.as_str(),
                house.created_at.timestamp_millis(),
                house.updated_at.timestamp_millis(),
            ],
        )?;

        Ok(house.id)
    }

    fn update_house(&self, house: &House) -> RepoResult<()> {
        house.validate()?;

        let changed = self.conn.execute(
            "UPDATE houses
             SET
                name = ?1,
                house_type = ?2,
                timezone = ?3,
                updated_at = ?4
             WHERE id = ?5;",
            params![
                house.name.as_str(),
                house.house_type.as_str(),
                house.timezone.as_str(),
                house.updated_at.timestamp_millis(),
                house.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(house.id));
        }
        Ok(())
    }

    fn get_house(&self, id: HouseId) -> RepoResult<Option<House>> {
        let sql = format!("{HOUSE_SELECT_SQL} WHERE id = ?1;");
        self.conn
            .query_row(&sql, [id.to_string()], |row| Ok(parse_house_row(row)))
            .optional()?
            .transpose()
    }

    fn find_house_by_owner(&self, owner_id: UserId) -> RepoResult<Option<House>> {
        let sql = format!("{HOUSE_SELECT_SQL} WHERE owner_id = ?1;");
        self.conn
            .query_row(&sql, [owner_id.to_string()], |row| Ok(parse_house_row(row)))
            .optional()?
            .transpose()
    }
}

fn parse_house_row(row: &Row<'_>) -> RepoResult<House> {
    let id_text: String = row.get("id")?;
    let owner_text: String = row.get("owner_id")?;

    Ok(House {
        id: parse_uuid(&id_text, "houses.id")?,
        owner_id: parse_uuid(&owner_text, "houses.owner_id")?,
        name: row.get("name")?,
        house_type: row.get("house_type")?,
        timezone: row.get("timezone")?,
        created_at: millis_to_datetime(row.get("created_at")?, "houses.created_at")?,
        updated_at: millis_to_datetime(row.get("updated_at")?, "houses.updated_at")?,
    })
}

//! Cooking session persistence.
//!
//! Sessions are owned by `cooking_records`; a recipe only sees their ids.
//! Writes join any recipe changes already staged on the same connection.

use crate::model::cooking_record::{CookingRecord, CookingRecordId};
use crate::model::recipe::RecipeId;
use crate::repo::recipe_repo::RepoResult;
use crate::store::StoreError;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

/// SQLite-backed cooking record repository.
pub struct SqliteCookingRecordRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCookingRecordRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Inserts one session. The referenced recipe must exist.
    pub fn create_record(&self, record: &CookingRecord) -> RepoResult<CookingRecordId> {
        self.conn
            .execute(
                "INSERT INTO cooking_records (uuid, recipe_uuid, cooked_at, note)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    record.id.to_string(),
                    record.recipe_id.map(|id| id.to_string()),
                    record.cooked_at,
                    record.note.as_deref(),
                ],
            )
            .map_err(StoreError::from)?;
        Ok(record.id)
    }

    pub fn get_record(&self, id: CookingRecordId) -> RepoResult<Option<CookingRecord>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT uuid, recipe_uuid, cooked_at, note
                 FROM cooking_records
                 WHERE uuid = ?1;",
            )
            .map_err(StoreError::from)?;
        let mut rows = stmt.query([id.to_string()]).map_err(StoreError::from)?;
        match rows.next().map_err(StoreError::from)? {
            Some(row) => Ok(Some(parse_record_row(row)?)),
            None => Ok(None),
        }
    }

    /// Sessions for one recipe, most recent first.
    pub fn list_for_recipe(&self, recipe_id: RecipeId) -> RepoResult<Vec<CookingRecord>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT uuid, recipe_uuid, cooked_at, note
                 FROM cooking_records
                 WHERE recipe_uuid = ?1
                 ORDER BY cooked_at DESC, uuid ASC;",
            )
            .map_err(StoreError::from)?;
        let mut rows = stmt
            .query([recipe_id.to_string()])
            .map_err(StoreError::from)?;
        let mut records = Vec::new();
        while let Some(row) = rows.next().map_err(StoreError::from)? {
            records.push(parse_record_row(row)?);
        }
        Ok(records)
    }
}

fn parse_record_row(row: &Row<'_>) -> Result<CookingRecord, StoreError> {
    let uuid_text: String = row.get("uuid")?;
    let id = parse_uuid(&uuid_text, "cooking_records.uuid")?;
    let recipe_id = match row.get::<_, Option<String>>("recipe_uuid")? {
        Some(value) => Some(parse_uuid(&value, "cooking_records.recipe_uuid")?),
        None => None,
    };

    Ok(CookingRecord {
        id,
        recipe_id,
        cooked_at: row.get("cooked_at")?,
        note: row.get("note")?,
    })
}

fn parse_uuid(value: &str, column: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(value)
        .map_err(|_| StoreError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

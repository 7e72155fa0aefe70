//! SQLite-backed recipe store.
//!
//! Staged changes live in an open `BEGIN IMMEDIATE` transaction on the owned
//! connection, so reads through the same store already see them.

use crate::db::{open_db, open_db_in_memory};
use crate::model::cooking_record::CookingRecordId;
use crate::model::recipe::{Recipe, RecipeId};
use crate::store::{RecipeStore, StoreError, StoreResult};
use log::{debug, error, info, warn};
use rusqlite::{params, Connection, Row};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use uuid::Uuid;

const RECIPE_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    ingredients,
    instructions,
    source_url,
    thumbnail_url,
    category,
    difficulty,
    estimated_time_minutes,
    created_at,
    updated_at
FROM recipes";

/// Recipe store owning one migrated SQLite connection.
pub struct SqliteRecipeStore {
    conn: Connection,
    pending_changes: usize,
}

impl SqliteRecipeStore {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - `MissingRequiredTable` when migrations were not applied.
    pub fn try_new(conn: Connection) -> StoreResult<Self> {
        for table in ["recipes", "cooking_records"] {
            if !table_exists(&conn, table)? {
                return Err(StoreError::MissingRequiredTable(table));
            }
        }
        Ok(Self {
            conn,
            pending_changes: 0,
        })
    }

    /// Opens (and migrates) a database file.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::try_new(open_db(path)?)
    }

    /// Opens a fresh in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::try_new(open_db_in_memory()?)
    }

    /// Read access for sibling repositories sharing this connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn begin_if_needed(&self) -> StoreResult<()> {
        if self.conn.is_autocommit() {
            self.conn.execute_batch("BEGIN IMMEDIATE;")?;
        }
        Ok(())
    }

    fn abandon_if_clean(&mut self) {
        if self.pending_changes == 0 {
            self.rollback();
        }
    }

    fn load_cooking_record_index(&self) -> StoreResult<HashMap<String, BTreeSet<CookingRecordId>>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, recipe_uuid
             FROM cooking_records
             WHERE recipe_uuid IS NOT NULL;",
        )?;
        let mut rows = stmt.query([])?;
        let mut index: HashMap<String, BTreeSet<CookingRecordId>> = HashMap::new();
        while let Some(row) = rows.next()? {
            let record_text: String = row.get("uuid")?;
            let record_id = Uuid::parse_str(&record_text).map_err(|_| {
                StoreError::InvalidData(format!(
                    "invalid uuid value `{record_text}` in cooking_records.uuid"
                ))
            })?;
            let recipe_text: String = row.get("recipe_uuid")?;
            index.entry(recipe_text).or_default().insert(record_id);
        }
        Ok(index)
    }
}

impl RecipeStore for SqliteRecipeStore {
    fn insert(&mut self, recipe: &Recipe) -> StoreResult<()> {
        recipe.validate()?;
        self.begin_if_needed()?;

        let result = self.conn.execute(
            "INSERT INTO recipes (
                uuid,
                title,
                ingredients,
                instructions,
                source_url,
                thumbnail_url,
                category,
                difficulty,
                estimated_time_minutes,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11);",
            params![
                recipe.id.to_string(),
                recipe.title.as_deref(),
                recipe.ingredients.as_deref(),
                recipe.instructions.as_deref(),
                recipe.source_url.as_deref(),
                recipe.thumbnail_url.as_deref(),
                recipe.category.as_str(),
                recipe.difficulty,
                recipe.estimated_time_minutes,
                recipe.created_at,
                recipe.updated_at,
            ],
        );

        match result {
            Ok(_) => {
                self.pending_changes += 1;
                Ok(())
            }
            Err(err) => {
                self.abandon_if_clean();
                Err(err.into())
            }
        }
    }

    fn fetch_all(&self) -> StoreResult<Vec<Recipe>> {
        let mut sessions = self.load_cooking_record_index()?;
        let mut stmt = self
            .conn
            .prepare(&format!("{RECIPE_SELECT_SQL} ORDER BY updated_at DESC, uuid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut recipes = Vec::new();

        while let Some(row) = rows.next()? {
            let mut recipe = parse_recipe_row(row)?;
            if let Some(ids) = sessions.remove(&recipe.id.to_string()) {
                recipe.cooking_records = ids;
            }
            recipes.push(recipe);
        }

        debug!(
            "event=store_fetch module=store status=ok count={} pending={}",
            recipes.len(),
            self.pending_changes
        );
        Ok(recipes)
    }

    fn delete(&mut self, recipe: &Recipe) -> StoreResult<()> {
        self.begin_if_needed()?;

        let result = self
            .conn
            .execute("DELETE FROM recipes WHERE uuid = ?1;", [recipe.id.to_string()]);

        match result {
            Ok(0) => {
                self.abandon_if_clean();
                Err(StoreError::NotFound(recipe.id))
            }
            Ok(_) => {
                self.pending_changes += 1;
                Ok(())
            }
            Err(err) => {
                self.abandon_if_clean();
                Err(err.into())
            }
        }
    }

    fn has_changes(&self) -> bool {
        self.pending_changes > 0
    }

    fn save(&mut self) -> StoreResult<()> {
        if self.pending_changes == 0 {
            if !self.conn.is_autocommit() {
                self.rollback();
            }
            return Ok(());
        }

        let staged = self.pending_changes;
        match self.conn.execute_batch("COMMIT;") {
            Ok(()) => {
                self.pending_changes = 0;
                info!("event=store_save module=store status=ok changes={staged}");
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_save module=store status=error changes={} error_code=commit_failed error={}",
                    staged, err
                );
                self.rollback();
                Err(err.into())
            }
        }
    }

    fn rollback(&mut self) {
        if !self.conn.is_autocommit() {
            if let Err(err) = self.conn.execute_batch("ROLLBACK;") {
                warn!("event=store_rollback module=store status=error error={err}");
            }
        }
        if self.pending_changes > 0 {
            info!(
                "event=store_rollback module=store status=ok discarded={}",
                self.pending_changes
            );
        }
        self.pending_changes = 0;
    }
}

fn parse_recipe_row(row: &Row<'_>) -> StoreResult<Recipe> {
    let uuid_text: String = row.get("uuid")?;
    let id = parse_recipe_id(&uuid_text)?;

    let recipe = Recipe {
        id,
        title: row.get("title")?,
        ingredients: row.get("ingredients")?,
        instructions: row.get("instructions")?,
        source_url: row.get("source_url")?,
        thumbnail_url: row.get("thumbnail_url")?,
        category: row.get("category")?,
        difficulty: row.get("difficulty")?,
        estimated_time_minutes: row.get("estimated_time_minutes")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        cooking_records: BTreeSet::new(),
    };
    recipe.validate()?;
    Ok(recipe)
}

fn parse_recipe_id(value: &str) -> StoreResult<RecipeId> {
    Uuid::parse_str(value).map_err(|_| {
        StoreError::InvalidData(format!("invalid uuid value `{value}` in recipes.uuid"))
    })
}

fn table_exists(conn: &Connection, table: &str) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

#[cfg(test)]
mod tests {
    use super::SqliteRecipeStore;
    use crate::model::recipe::Recipe;
    use crate::store::{RecipeStore, StoreError};
    use rusqlite::Connection;

    #[test]
    fn try_new_rejects_unmigrated_connection() {
        let conn = Connection::open_in_memory().unwrap();
        let err = SqliteRecipeStore::try_new(conn).err().unwrap();
        assert!(matches!(err, StoreError::MissingRequiredTable("recipes")));
    }

    #[test]
    fn staged_insert_is_visible_before_save() {
        let mut store = SqliteRecipeStore::open_in_memory().unwrap();
        store.insert(&Recipe::new("Omelette", "Meal")).unwrap();
        assert!(store.has_changes());
        assert_eq!(store.fetch_all().unwrap().len(), 1);

        store.rollback();
        assert!(!store.has_changes());
        assert!(store.fetch_all().unwrap().is_empty());
    }

    #[test]
    fn delete_missing_recipe_leaves_no_open_transaction() {
        let mut store = SqliteRecipeStore::open_in_memory().unwrap();
        let err = store.delete(&Recipe::new("Ghost", "Meal")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert!(!store.has_changes());
        assert!(store.connection().is_autocommit());
    }

    #[test]
    fn save_without_changes_is_noop() {
        let mut store = SqliteRecipeStore::open_in_memory().unwrap();
        store.save().unwrap();
        store.save().unwrap();
        assert!(store.connection().is_autocommit());
    }
}

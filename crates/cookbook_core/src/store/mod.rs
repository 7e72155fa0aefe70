//! Durable recipe collection contracts and implementations.
//!
//! # Responsibility
//! - Stage recipe inserts/deletes and commit them with an explicit save.
//! - Return recipes in canonical order (`updated_at DESC, id ASC`).
//!
//! # Invariants
//! - Staged changes are visible to reads on the same store before save.
//! - A failed save leaves no staged changes behind: durable state and
//!   subsequent reads agree.
//! - "No rows" is an empty list, never an error.

use crate::db::DbError;
use crate::model::recipe::{Recipe, RecipeId, RecipeValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryRecipeStore;
pub use sqlite::SqliteRecipeStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level fault.
#[derive(Debug)]
pub enum StoreError {
    Validation(RecipeValidationError),
    Db(DbError),
    NotFound(RecipeId),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    /// Backend refused the operation (used by non-SQLite stores).
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "recipe not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted recipe data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "required table missing: {table}"),
            Self::Unavailable(message) => write!(f, "recipe store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RecipeValidationError> for StoreError {
    fn from(value: RecipeValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Unit-of-work style recipe store.
///
/// Mutations are staged until [`RecipeStore::save`] commits them.
pub trait RecipeStore {
    /// Stages a new recipe. Validates before writing.
    fn insert(&mut self, recipe: &Recipe) -> StoreResult<()>;
    /// Returns every recipe in canonical order, staged changes included.
    fn fetch_all(&self) -> StoreResult<Vec<Recipe>>;
    /// Stages removal of `recipe` by id.
    fn delete(&mut self, recipe: &Recipe) -> StoreResult<()>;
    /// Returns whether staged changes are waiting for [`RecipeStore::save`].
    fn has_changes(&self) -> bool;
    /// Commits staged changes atomically. On error, staged changes are discarded.
    fn save(&mut self) -> StoreResult<()>;
    /// Discards staged changes.
    fn rollback(&mut self);
}

/// Canonical in-memory ordering shared by stores that sort outside SQL.
pub(crate) fn sort_canonical(recipes: &mut [Recipe]) {
    recipes.sort_by(|left, right| {
        right
            .updated_at
            .cmp(&left.updated_at)
            .then_with(|| left.id.cmp(&right.id))
    });
}

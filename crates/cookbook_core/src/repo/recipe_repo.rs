//! Recipe repository.
//!
//! # Responsibility
//! - List recipes in store order, preferring availability on read faults.
//! - Delete and create with immediate persistence.
//!
//! # Invariants
//! - A failed save never leaves staged changes in the store.
//! - Under `SaveFailurePolicy::Recover` the caller gets `RepoError::Persistence`
//!   and the store reads exactly as before the mutation.

use crate::model::recipe::{Recipe, RecipeId};
use crate::store::{RecipeStore, StoreError};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error.
#[derive(Debug)]
pub enum RepoError {
    /// The store rejected a staged mutation (validation, missing row, I/O).
    Store(StoreError),
    /// Saving after a mutation failed; the mutation was rolled back.
    Persistence(StoreError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Persistence(err) => write!(f, "failed to persist recipe changes: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) | Self::Persistence(err) => Some(err),
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// What to do when a save after a mutation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveFailurePolicy {
    /// Roll back and return `RepoError::Persistence`.
    #[default]
    Recover,
    /// Log and abort the process. Durable and in-memory state may disagree
    /// and nothing downstream is allowed to observe that.
    Abort,
}

/// Construction-time repository settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepositoryConfig {
    pub save_failure_policy: SaveFailurePolicy,
}

/// Domain façade over a [`RecipeStore`].
pub struct RecipeRepository<S: RecipeStore> {
    store: S,
    config: RepositoryConfig,
}

impl<S: RecipeStore> RecipeRepository<S> {
    /// Creates a repository with default settings.
    pub fn new(store: S) -> Self {
        Self::with_config(store, RepositoryConfig::default())
    }

    pub fn with_config(store: S, config: RepositoryConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> RepositoryConfig {
        self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable store access for setup and fault injection.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Returns all recipes, newest `updated_at` first.
    ///
    /// Store faults are logged and produce an empty list.
    pub fn list(&self) -> Vec<Recipe> {
        match self.store.fetch_all() {
            Ok(recipes) => recipes,
            Err(err) => {
                error!(
                    "event=recipe_list module=repo status=error error_code=fetch_failed error={}",
                    err
                );
                Vec::new()
            }
        }
    }

    /// Inserts and persists one recipe.
    pub fn create(&mut self, recipe: &Recipe) -> RepoResult<RecipeId> {
        self.store.insert(recipe)?;
        self.persist("recipe_create")?;
        info!("event=recipe_create module=repo status=ok");
        Ok(recipe.id)
    }

    /// Removes and persists one recipe.
    ///
    /// Callers holding `recipe` must drop it; it is stale on success.
    pub fn delete(&mut self, recipe: &Recipe) -> RepoResult<()> {
        self.store.delete(recipe)?;
        self.persist("recipe_delete")?;
        info!("event=recipe_delete module=repo status=ok");
        Ok(())
    }

    /// Flushes staged changes. No-op when nothing is pending.
    pub fn save_context(&mut self) -> RepoResult<()> {
        if !self.store.has_changes() {
            return Ok(());
        }
        self.persist("save_context")
    }

    fn persist(&mut self, event: &'static str) -> RepoResult<()> {
        let Err(err) = self.store.save() else {
            return Ok(());
        };
        self.store.rollback();

        match self.config.save_failure_policy {
            SaveFailurePolicy::Recover => {
                warn!(
                    "event={} module=repo status=error error_code=save_failed policy=recover error={}",
                    event, err
                );
                Err(RepoError::Persistence(err))
            }
            SaveFailurePolicy::Abort => {
                error!(
                    "event={} module=repo status=error error_code=save_failed policy=abort error={}",
                    event, err
                );
                log::logger().flush();
                std::process::abort();
            }
        }
    }
}

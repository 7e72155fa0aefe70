//! Core domain logic for the cookbook app.
//! Owns the recipe store, its repository, and the filtered list state the UI reads.

pub mod db;
pub mod filter;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use filter::{filter, matches, Filterable};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::category::{normalize_category_input, CATEGORIES, CATEGORY_ALL};
pub use model::cooking_record::{CookingRecord, CookingRecordId};
pub use model::recipe::{Recipe, RecipeId, RecipeValidationError};
pub use repo::cooking_record_repo::SqliteCookingRecordRepository;
pub use repo::recipe_repo::{
    RecipeRepository, RepoError, RepoResult, RepositoryConfig, SaveFailurePolicy,
};
pub use service::recipe_list::{
    RecipeListController, RecipeListError, SubscriptionId, VisibleListener,
};
pub use store::{
    MemoryRecipeStore, RecipeStore, SqliteRecipeStore, StoreError, StoreResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

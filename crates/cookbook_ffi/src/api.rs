//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the recipe list state holder to Dart via FRB.
//! - Keep error semantics simple: envelopes carry messages, never panics.
//!
//! # Invariants
//! - One process-wide controller, opened lazily on first use and guarded
//!   by a mutex so calls never interleave.
//! - Every list response reflects the controller state after the call.

use cookbook_core::{
    core_version as core_version_inner, init_logging as init_logging_inner,
    normalize_category_input, ping as ping_inner, Recipe, RecipeListController, RecipeRepository,
    SqliteRecipeStore, CATEGORIES,
};
use log::{error, info};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock};

const RECIPE_DB_FILE_NAME: &str = "cookbook_recipes.sqlite3";
const RECIPE_DB_PATH_ENV: &str = "COOKBOOK_DB_PATH";

static RECIPE_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static RECIPE_LIST: Mutex<Option<RecipeListController<SqliteRecipeStore>>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Recipe view-record for list rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeItem {
    /// Stable recipe ID in string form.
    pub id: String,
    /// Display title, empty when missing.
    pub title: String,
    pub ingredients: Option<String>,
    pub category: String,
    pub difficulty: i64,
    pub estimated_time_minutes: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
}

/// Visible-list envelope returned by every list mutator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeListResponse {
    /// Visible recipes, newest first.
    pub items: Vec<RecipeItem>,
    /// Total loaded recipes before filtering.
    pub total: u32,
    pub search_text: String,
    pub category: String,
    /// Controller revision; changes whenever `items` was recomputed.
    pub revision: u64,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

impl RecipeListResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            search_text: String::new(),
            category: String::new(),
            revision: 0,
            message: message.into(),
        }
    }
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Affected recipe ID.
    pub recipe_id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl RecipeActionResponse {
    fn success(message: impl Into<String>, recipe_id: String) -> Self {
        Self {
            ok: true,
            recipe_id: Some(recipe_id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            recipe_id: None,
            message: message.into(),
        }
    }
}

/// Category selector vocabulary, sentinel first.
#[flutter_rust_bridge::frb(sync)]
pub fn recipe_categories() -> Vec<String> {
    CATEGORIES.iter().map(|category| category.to_string()).collect()
}

/// Reloads recipes from storage and returns the visible set.
#[flutter_rust_bridge::frb(sync)]
pub fn recipes_refresh() -> RecipeListResponse {
    list_call("recipes_refresh", |controller| controller.refresh())
}

/// Applies new search text (raw, untrimmed) and returns the visible set.
#[flutter_rust_bridge::frb(sync)]
pub fn recipes_set_search_text(text: String) -> RecipeListResponse {
    list_call("recipes_set_search_text", |controller| {
        controller.set_search_text(text)
    })
}

/// Applies a category selection and returns the visible set.
///
/// Blank input selects the `All` sentinel.
#[flutter_rust_bridge::frb(sync)]
pub fn recipes_set_category(category: String) -> RecipeListResponse {
    let normalized = normalize_category_input(category.as_str());
    list_call("recipes_set_category", |controller| {
        controller.set_category(normalized)
    })
}

/// Deletes the recipe at `index` of the current visible set.
///
/// # FFI contract
/// - Never panics.
/// - On failure the visible set is unchanged; the UI may retry.
#[flutter_rust_bridge::frb(sync)]
pub fn recipes_delete_visible(index: u32) -> RecipeActionResponse {
    let Ok(index) = usize::try_from(index) else {
        return RecipeActionResponse::failure("recipes_delete_visible failed: index too large");
    };
    match with_controller(|controller| controller.delete_visible(index)) {
        Ok(Ok(removed)) => {
            RecipeActionResponse::success("Recipe deleted.", removed.id.to_string())
        }
        Ok(Err(err)) => {
            RecipeActionResponse::failure(format!("recipes_delete_visible failed: {err}"))
        }
        Err(err) => RecipeActionResponse::failure(format!("recipes_delete_visible failed: {err}")),
    }
}

/// Creates a recipe and refreshes the visible set.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_create_recipe(
    title: String,
    ingredients: Option<String>,
    category: String,
) -> RecipeActionResponse {
    let mut recipe = Recipe::new(title.trim(), normalize_category_input(category.as_str()));
    recipe.ingredients = ingredients
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    let created = with_controller(|controller| {
        let created = controller.repository_mut().create(&recipe);
        controller.refresh();
        created
    });
    match created {
        Ok(Ok(recipe_id)) => RecipeActionResponse::success("Recipe created.", recipe_id.to_string()),
        Ok(Err(err)) => RecipeActionResponse::failure(format!("entry_create_recipe failed: {err}")),
        Err(err) => RecipeActionResponse::failure(format!("entry_create_recipe failed: {err}")),
    }
}

fn list_call(
    operation: &'static str,
    f: impl FnOnce(&mut RecipeListController<SqliteRecipeStore>),
) -> RecipeListResponse {
    let response = with_controller(|controller| {
        f(controller);
        to_list_response(controller)
    });
    response.unwrap_or_else(|err| RecipeListResponse::failure(format!("{operation} failed: {err}")))
}

fn with_controller<T>(
    f: impl FnOnce(&mut RecipeListController<SqliteRecipeStore>) -> T,
) -> Result<T, String> {
    let mut guard = lock_recipe_list();
    if guard.is_none() {
        let db_path = resolve_recipe_db_path();
        let store = SqliteRecipeStore::open(&db_path).map_err(|err| {
            error!("event=ffi_open module=ffi status=error error={err}");
            format!("recipe DB open failed: {err}")
        })?;
        info!("event=ffi_open module=ffi status=ok");
        *guard = Some(RecipeListController::load(RecipeRepository::new(store)));
    }

    match guard.as_mut() {
        Some(controller) => Ok(f(controller)),
        None => Err("recipe list unavailable".to_string()),
    }
}

// A panic inside a previous call must not lock the UI out forever.
fn lock_recipe_list() -> MutexGuard<'static, Option<RecipeListController<SqliteRecipeStore>>> {
    RECIPE_LIST
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn resolve_recipe_db_path() -> PathBuf {
    RECIPE_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(RECIPE_DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(RECIPE_DB_FILE_NAME)
        })
        .clone()
}

fn to_list_response(controller: &RecipeListController<SqliteRecipeStore>) -> RecipeListResponse {
    let items = controller
        .visible_recipes()
        .iter()
        .map(to_recipe_item)
        .collect::<Vec<_>>();
    let message = if items.is_empty() {
        "No recipes.".to_string()
    } else {
        format!("Showing {} recipe(s).", items.len())
    };
    RecipeListResponse {
        items,
        total: u32::try_from(controller.all_recipes().len()).unwrap_or(u32::MAX),
        search_text: controller.search_text().to_string(),
        category: controller.selected_category().to_string(),
        revision: controller.revision(),
        message,
    }
}

fn to_recipe_item(recipe: &Recipe) -> RecipeItem {
    RecipeItem {
        id: recipe.id.to_string(),
        title: recipe.display_title().to_string(),
        ingredients: recipe.ingredients.clone(),
        category: recipe.category.clone(),
        difficulty: recipe.difficulty,
        estimated_time_minutes: recipe.estimated_time_minutes,
        updated_at: recipe.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, entry_create_recipe, init_logging, ping, recipe_categories,
        recipes_delete_visible, recipes_refresh, recipes_set_category, recipes_set_search_text,
    };
    use std::sync::Mutex;
    use std::time::{SystemTime, UNIX_EPOCH};

    // Tests share the process-wide controller; serialize multi-call flows.
    static FLOW_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(error.contains("unsupported log level"));
    }

    #[test]
    fn categories_start_with_sentinel() {
        assert_eq!(recipe_categories(), vec!["All", "Meal", "Dessert", "Snack"]);
    }

    #[test]
    fn created_recipe_is_searchable_by_ingredient() {
        let _guard = FLOW_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let token = unique_token("ffi-search");
        let created = entry_create_recipe(
            "Weeknight curry".to_string(),
            Some(format!("rice, {token}")),
            "Meal".to_string(),
        );
        assert!(created.ok, "{}", created.message);

        recipes_set_category("  ".to_string());
        let response = recipes_set_search_text(token.to_uppercase());
        assert_eq!(response.category, "All");
        assert_eq!(response.items.len(), 1);
        assert_eq!(Some(response.items[0].id.clone()), created.recipe_id);

        let filtered = recipes_set_category("Dessert".to_string());
        assert!(filtered.items.is_empty());
        assert!(filtered.revision > response.revision);
        recipes_set_category("All".to_string());
    }

    #[test]
    fn delete_visible_removes_recipe_from_later_refreshes() {
        let _guard = FLOW_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let token = unique_token("ffi-delete");
        let created = entry_create_recipe(token.clone(), None, "Snack".to_string());
        assert!(created.ok, "{}", created.message);

        recipes_set_category("All".to_string());
        let visible = recipes_set_search_text(token.clone());
        assert_eq!(visible.items.len(), 1);

        let deleted = recipes_delete_visible(0);
        assert!(deleted.ok, "{}", deleted.message);
        assert_eq!(deleted.recipe_id, created.recipe_id);

        let after = recipes_refresh();
        assert!(after.items.is_empty());
        assert_eq!(after.search_text, token);
    }

    #[test]
    fn delete_visible_out_of_range_reports_failure() {
        let _guard = FLOW_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        recipes_set_search_text(unique_token("ffi-nothing"));
        let response = recipes_delete_visible(0);
        assert!(!response.ok);
        assert!(response.message.contains("out of range"));
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}

//! Recipe list state holder.
//!
//! # Responsibility
//! - Hold search text, selected category, the loaded recipe snapshot and
//!   the derived visible set.
//! - Recompute the visible set synchronously on every state write.
//! - Resolve delete requests by visible index.
//!
//! # Invariants
//! - After any mutating call returns, `visible_recipes()` equals
//!   `filter(all_recipes(), search_text(), selected_category())`.
//! - Listeners run inside the mutating call, after recompute.
//! - A recipe removed through `delete_visible` is absent from both sets
//!   once the call returns.

use crate::filter::filter;
use crate::model::category::CATEGORY_ALL;
use crate::model::recipe::Recipe;
use crate::repo::recipe_repo::{RecipeRepository, RepoError};
use crate::store::RecipeStore;
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Callback invoked with the new visible set after each recompute.
pub type VisibleListener = Box<dyn FnMut(&[Recipe]) + Send>;

/// Handle returned by [`RecipeListController::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Errors from list controller operations.
#[derive(Debug)]
pub enum RecipeListError {
    /// Index does not address the current visible set.
    IndexOutOfRange { index: usize, len: usize },
    /// Repository-level failure. Controller state is unchanged.
    Repo(RepoError),
}

impl Display for RecipeListError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "visible index {index} out of range (len {len})")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RecipeListError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::IndexOutOfRange { .. } => None,
        }
    }
}

impl From<RepoError> for RecipeListError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Search/category state plus the derived visible recipe list.
pub struct RecipeListController<S: RecipeStore> {
    repo: RecipeRepository<S>,
    search_text: String,
    selected_category: String,
    all_recipes: Vec<Recipe>,
    visible_recipes: Vec<Recipe>,
    revision: u64,
    listeners: Vec<(SubscriptionId, VisibleListener)>,
    next_subscription: u64,
}

impl<S: RecipeStore> RecipeListController<S> {
    /// Creates a controller with default state and nothing loaded.
    pub fn new(repo: RecipeRepository<S>) -> Self {
        Self {
            repo,
            search_text: String::new(),
            selected_category: CATEGORY_ALL.to_string(),
            all_recipes: Vec::new(),
            visible_recipes: Vec::new(),
            revision: 0,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Creates a controller and performs the initial `refresh`.
    pub fn load(repo: RecipeRepository<S>) -> Self {
        let mut controller = Self::new(repo);
        controller.refresh();
        controller
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn selected_category(&self) -> &str {
        &self.selected_category
    }

    /// Full snapshot from the last `refresh`.
    pub fn all_recipes(&self) -> &[Recipe] {
        &self.all_recipes
    }

    /// Current visible (filtered) set.
    pub fn visible_recipes(&self) -> &[Recipe] {
        &self.visible_recipes
    }

    /// Bumped once per recompute.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn repository(&self) -> &RecipeRepository<S> {
        &self.repo
    }

    pub fn repository_mut(&mut self) -> &mut RecipeRepository<S> {
        &mut self.repo
    }

    /// Reloads the snapshot from the repository and recomputes.
    pub fn refresh(&mut self) {
        self.all_recipes = self.repo.list();
        self.recompute();
    }

    /// Replaces the search text and recomputes from the current snapshot.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
        self.recompute();
    }

    /// Replaces the selected category and recomputes from the current snapshot.
    pub fn set_category(&mut self, category: impl Into<String>) {
        self.selected_category = category.into();
        self.recompute();
    }

    /// Deletes the recipe at `index` in the visible set, then refreshes.
    ///
    /// Returns the removed recipe. On error nothing in this controller changes.
    pub fn delete_visible(&mut self, index: usize) -> Result<Recipe, RecipeListError> {
        let Some(target) = self.visible_recipes.get(index).cloned() else {
            return Err(RecipeListError::IndexOutOfRange {
                index,
                len: self.visible_recipes.len(),
            });
        };

        self.repo.delete(&target)?;
        info!("event=recipe_delete_visible module=service status=ok index={index}");
        self.refresh();
        Ok(target)
    }

    /// Registers a listener called with the visible set after every recompute.
    pub fn subscribe(&mut self, listener: VisibleListener) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Removes a listener. Returns `false` when `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(current, _)| *current != id);
        self.listeners.len() != before
    }

    fn recompute(&mut self) {
        self.visible_recipes = filter(
            &self.all_recipes,
            self.search_text.as_str(),
            self.selected_category.as_str(),
        );
        self.revision += 1;
        debug!(
            "event=recipe_list_recompute module=service status=ok revision={} total={} visible={} query_len={}",
            self.revision,
            self.all_recipes.len(),
            self.visible_recipes.len(),
            self.search_text.chars().count()
        );

        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.visible_recipes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RecipeListController, RecipeListError};
    use crate::model::recipe::Recipe;
    use crate::repo::recipe_repo::RecipeRepository;
    use crate::store::MemoryRecipeStore;
    use std::sync::{Arc, Mutex};

    fn controller() -> RecipeListController<MemoryRecipeStore> {
        let store = MemoryRecipeStore::with_recipes(vec![
            Recipe::new("Omelette", "Meal").with_updated_at(3_000),
            Recipe::new("Brownie", "Dessert").with_updated_at(2_000),
            Recipe::new("Chips", "Snack").with_updated_at(1_000),
        ]);
        RecipeListController::load(RecipeRepository::new(store))
    }

    fn visible_titles(controller: &RecipeListController<MemoryRecipeStore>) -> Vec<String> {
        controller
            .visible_recipes()
            .iter()
            .map(|recipe| recipe.display_title().to_string())
            .collect()
    }

    #[test]
    fn defaults_show_everything() {
        let controller = controller();
        assert_eq!(controller.search_text(), "");
        assert_eq!(controller.selected_category(), "All");
        assert_eq!(visible_titles(&controller), vec!["Omelette", "Brownie", "Chips"]);
    }

    #[test]
    fn setters_recompute_without_refetch() {
        let mut controller = controller();
        controller.repository_mut().store_mut().set_fail_fetches(true);

        controller.set_category("Dessert");
        assert_eq!(visible_titles(&controller), vec!["Brownie"]);

        controller.set_category("All");
        controller.set_search_text("OM");
        assert_eq!(visible_titles(&controller), vec!["Omelette"]);
    }

    #[test]
    fn out_of_range_delete_changes_nothing() {
        let mut controller = controller();
        let revision = controller.revision();
        let err = controller.delete_visible(3).unwrap_err();
        assert!(matches!(err, RecipeListError::IndexOutOfRange { index: 3, len: 3 }));
        assert_eq!(controller.revision(), revision);
        assert_eq!(controller.all_recipes().len(), 3);
    }

    #[test]
    fn listeners_see_every_recompute_until_unsubscribed() {
        let mut controller = controller();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let id = controller.subscribe(Box::new(move |visible| {
            sink.lock().unwrap().push(visible.len());
        }));

        controller.set_search_text("zz");
        controller.set_search_text("");
        assert!(controller.unsubscribe(id));
        controller.set_category("Snack");
        assert!(!controller.unsubscribe(id));

        assert_eq!(*seen.lock().unwrap(), vec![0, 3]);
    }
}

//! In-process recipe store.
//!
//! Mirrors the staging semantics of the SQLite store with a copy-on-write
//! working set, and can be told to fail reads or saves so recovery paths
//! can be exercised without a broken database.

use crate::model::recipe::{Recipe, RecipeId};
use crate::store::{sort_canonical, RecipeStore, StoreError, StoreResult};
use log::{info, warn};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct MemoryRecipeStore {
    committed: BTreeMap<RecipeId, Recipe>,
    working: Option<BTreeMap<RecipeId, Recipe>>,
    fail_fetches: bool,
    fail_saves: bool,
}

impl MemoryRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose committed state already holds `recipes`.
    pub fn with_recipes(recipes: impl IntoIterator<Item = Recipe>) -> Self {
        let committed = recipes
            .into_iter()
            .map(|recipe| (recipe.id, recipe))
            .collect();
        Self {
            committed,
            ..Self::default()
        }
    }

    /// Makes every subsequent `fetch_all` fail until reset.
    pub fn set_fail_fetches(&mut self, fail: bool) {
        self.fail_fetches = fail;
    }

    /// Makes every subsequent `save` with staged changes fail until reset.
    pub fn set_fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }

    /// Number of committed recipes, ignoring staged changes.
    pub fn committed_len(&self) -> usize {
        self.committed.len()
    }

    fn working_mut(&mut self) -> &mut BTreeMap<RecipeId, Recipe> {
        let committed = &self.committed;
        self.working.get_or_insert_with(|| committed.clone())
    }
}

impl RecipeStore for MemoryRecipeStore {
    fn insert(&mut self, recipe: &Recipe) -> StoreResult<()> {
        recipe.validate()?;
        if self.working.as_ref().unwrap_or(&self.committed).contains_key(&recipe.id) {
            return Err(StoreError::InvalidData(format!(
                "duplicate recipe id `{}`",
                recipe.id
            )));
        }
        self.working_mut().insert(recipe.id, recipe.clone());
        Ok(())
    }

    fn fetch_all(&self) -> StoreResult<Vec<Recipe>> {
        if self.fail_fetches {
            return Err(StoreError::Unavailable("simulated fetch failure".to_string()));
        }
        let source = self.working.as_ref().unwrap_or(&self.committed);
        let mut recipes = source.values().cloned().collect::<Vec<_>>();
        sort_canonical(&mut recipes);
        Ok(recipes)
    }

    fn delete(&mut self, recipe: &Recipe) -> StoreResult<()> {
        if !self.working.as_ref().unwrap_or(&self.committed).contains_key(&recipe.id) {
            return Err(StoreError::NotFound(recipe.id));
        }
        self.working_mut().remove(&recipe.id);
        Ok(())
    }

    fn has_changes(&self) -> bool {
        self.working.is_some()
    }

    fn save(&mut self) -> StoreResult<()> {
        let Some(working) = self.working.take() else {
            return Ok(());
        };
        if self.fail_saves {
            warn!("event=store_save module=store status=error error_code=simulated_save_failure");
            return Err(StoreError::Unavailable("simulated save failure".to_string()));
        }
        self.committed = working;
        info!("event=store_save module=store status=ok backend=memory");
        Ok(())
    }

    fn rollback(&mut self) {
        self.working = None;
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryRecipeStore;
    use crate::model::recipe::Recipe;
    use crate::store::RecipeStore;

    #[test]
    fn fetch_orders_by_updated_at_descending() {
        let store = MemoryRecipeStore::with_recipes(vec![
            Recipe::new("old", "Meal").with_updated_at(1_000),
            Recipe::new("new", "Meal").with_updated_at(3_000),
            Recipe::new("mid", "Meal").with_updated_at(2_000),
        ]);
        let titles = store
            .fetch_all()
            .unwrap()
            .into_iter()
            .map(|recipe| recipe.title.unwrap_or_default())
            .collect::<Vec<_>>();
        assert_eq!(titles, vec!["new", "mid", "old"]);
    }

    #[test]
    fn failed_save_discards_staged_delete() {
        let recipe = Recipe::new("Brownie", "Dessert");
        let mut store = MemoryRecipeStore::with_recipes(vec![recipe.clone()]);
        store.set_fail_saves(true);

        store.delete(&recipe).unwrap();
        assert!(store.fetch_all().unwrap().is_empty());
        assert!(store.save().is_err());

        assert!(!store.has_changes());
        assert_eq!(store.fetch_all().unwrap(), vec![recipe]);
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let recipe = Recipe::new("Chips", "Snack");
        let mut store = MemoryRecipeStore::new();
        store.insert(&recipe).unwrap();
        assert!(store.insert(&recipe).is_err());
        store.save().unwrap();
        assert_eq!(store.committed_len(), 1);
    }
}

//! Recipe domain model.
//!
//! # Responsibility
//! - Define the canonical recipe record read by list/filter use-cases.
//! - Validate record-level invariants before persistence.
//!
//! # Invariants
//! - `id` is stable and never reused for another recipe.
//! - `updated_at` is never earlier than `created_at`.
//! - `cooking_records` holds ids only; sessions live in their own table.

use crate::model::cooking_record::CookingRecordId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier for a recipe.
pub type RecipeId = Uuid;

/// Validation failure for recipe records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeValidationError {
    /// `updated_at` precedes `created_at`.
    UpdatedBeforeCreated { created_at: i64, updated_at: i64 },
}

impl Display for RecipeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UpdatedBeforeCreated {
                created_at,
                updated_at,
            } => write!(
                f,
                "updated_at ({updated_at}) must not be earlier than created_at ({created_at})"
            ),
        }
    }
}

impl Error for RecipeValidationError {}

/// Canonical recipe record.
///
/// Text fields other than `category` are optional; filtering treats a
/// missing value as an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: RecipeId,
    pub title: Option<String>,
    /// Free-text ingredient list, searched together with `title`.
    pub ingredients: Option<String>,
    pub instructions: Option<String>,
    pub source_url: Option<String>,
    pub thumbnail_url: Option<String>,
    /// Free-text tag, compared by exact match. See [`crate::model::category`].
    pub category: String,
    pub difficulty: i64,
    pub estimated_time_minutes: i64,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds. Drives default list ordering.
    pub updated_at: i64,
    pub cooking_records: BTreeSet<CookingRecordId>,
}

impl Recipe {
    /// Creates a recipe with a generated id and both timestamps set to now.
    pub fn new(title: impl Into<String>, category: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), title, category)
    }

    /// Creates a recipe with a caller-provided id.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(id: RecipeId, title: impl Into<String>, category: impl Into<String>) -> Self {
        let now = now_epoch_ms();
        Self {
            id,
            title: Some(title.into()),
            ingredients: None,
            instructions: None,
            source_url: None,
            thumbnail_url: None,
            category: category.into(),
            difficulty: 0,
            estimated_time_minutes: 0,
            created_at: now,
            updated_at: now,
            cooking_records: BTreeSet::new(),
        }
    }

    /// Builder-style setter for `ingredients`.
    pub fn with_ingredients(mut self, ingredients: impl Into<String>) -> Self {
        self.ingredients = Some(ingredients.into());
        self
    }

    /// Builder-style setter for `updated_at`; lifts `created_at` down when needed.
    pub fn with_updated_at(mut self, updated_at: i64) -> Self {
        self.updated_at = updated_at;
        if self.created_at > updated_at {
            self.created_at = updated_at;
        }
        self
    }

    /// Title for display, empty when missing.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// Checks record-level invariants.
    pub fn validate(&self) -> Result<(), RecipeValidationError> {
        if self.updated_at < self.created_at {
            return Err(RecipeValidationError::UpdatedBeforeCreated {
                created_at: self.created_at,
                updated_at: self.updated_at,
            });
        }
        Ok(())
    }
}

/// Current wall clock in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{Recipe, RecipeValidationError};

    #[test]
    fn new_recipe_is_valid_and_has_no_sessions() {
        let recipe = Recipe::new("Omelette", "Meal");
        assert!(recipe.validate().is_ok());
        assert!(recipe.cooking_records.is_empty());
        assert_eq!(recipe.created_at, recipe.updated_at);
    }

    #[test]
    fn validate_rejects_updated_before_created() {
        let mut recipe = Recipe::new("Brownie", "Dessert");
        recipe.created_at = 2_000;
        recipe.updated_at = 1_000;
        assert_eq!(
            recipe.validate(),
            Err(RecipeValidationError::UpdatedBeforeCreated {
                created_at: 2_000,
                updated_at: 1_000,
            })
        );
    }

    #[test]
    fn with_updated_at_keeps_timestamps_ordered() {
        let recipe = Recipe::new("Chips", "Snack").with_updated_at(10);
        assert_eq!(recipe.updated_at, 10);
        assert!(recipe.created_at <= recipe.updated_at);
    }

    #[test]
    fn serializes_with_camel_case_field_names() {
        let recipe = Recipe::new("Omelette", "Meal");
        let value = serde_json::to_value(&recipe).expect("recipe should serialize");
        assert!(value.get("estimatedTimeMinutes").is_some());
        assert!(value.get("updatedAt").is_some());
        assert!(value.get("cookingRecords").is_some());
    }
}

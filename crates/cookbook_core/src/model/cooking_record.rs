//! Cooking session records.
//!
//! A session points at the recipe it was cooked from. The pointer is
//! cleared, not cascaded, when the recipe is removed.

use crate::model::recipe::RecipeId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a cooking session.
pub type CookingRecordId = Uuid;

/// One cooking session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookingRecord {
    pub id: CookingRecordId,
    /// `None` once the referenced recipe has been deleted.
    pub recipe_id: Option<RecipeId>,
    /// Unix epoch milliseconds.
    pub cooked_at: i64,
    pub note: Option<String>,
}

impl CookingRecord {
    pub fn new(recipe_id: RecipeId, cooked_at: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            recipe_id: Some(recipe_id),
            cooked_at,
            note: None,
        }
    }
}

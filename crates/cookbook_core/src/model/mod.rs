//! Domain model for the recipe log.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep storage-agnostic shapes that UI projections read directly.
//!
//! # Invariants
//! - Every recipe is identified by a stable `RecipeId`.
//! - Cooking records reference recipes by id and never own them.

pub mod category;
pub mod cooking_record;
pub mod recipe;

//! Repository layer over the recipe store.
//!
//! # Responsibility
//! - Expose intention-revealing recipe operations to services.
//! - Own the persistence-failure policy so callers never see raw store state.
//!
//! # Invariants
//! - Mutations are saved before the repository call returns.
//! - Read failures degrade to empty results and are logged, never raised.

pub mod cooking_record_repo;
pub mod recipe_repo;

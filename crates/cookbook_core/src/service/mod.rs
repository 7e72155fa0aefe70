//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into UI-facing state holders.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod recipe_list;

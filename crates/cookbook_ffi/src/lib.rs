//! Flutter-facing bindings for the cookbook core.

pub mod api;

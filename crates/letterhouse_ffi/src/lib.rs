//! Flutter-facing bindings for the Letterhouse core.

pub mod api;

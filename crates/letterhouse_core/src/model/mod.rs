//! Domain model for houses, windows and the people looking at them.
//!
//! # Responsibility
//! - Define the records shared by the store, the services and the UI bridge.
//! - Own record-level validation that must hold before persistence.
//!
//! # Invariants
//! - Every house and window is identified by a stable UUID.
//! - A window's `grid_position` is 1-based and unique within its house.

pub mod house;
pub mod role;
pub mod window;

//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls, role checks and the temporal gate into
//!   use-case level APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod house_service;
pub mod letter_service;

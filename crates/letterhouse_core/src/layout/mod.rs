//! House window layout engine.
//!
//! # Responsibility
//! - Map sequential window positions onto the 3x3 slot grid of a house
//!   template, in the template's native pixel space.
//! - Split window collections into fixed-size pages.
//! - Rescale native rectangles to the rendered house image.
//!
//! # Invariants
//! - Slot lookup is periodic with period [`SLOTS_PER_PAGE`].
//! - Out-of-range pages are clamped to page 1, never reported as errors.
//! - Unknown template ids use family A geometry.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod geometry;
pub mod pagination;
pub mod planner;
pub mod resolver;
pub mod viewport;

/// Number of window slots drawn on one house page.
pub const SLOTS_PER_PAGE: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// Position does not map to one of the predefined slots.
    SlotNotFound { template: String, position: u32 },
    /// A width used as a divisor is zero, negative or not finite.
    InvalidDimension(f64),
}

impl Display for LayoutError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SlotNotFound { template, position } => {
                write!(f, "no slot for position {position} on template `{template}`")
            }
            Self::InvalidDimension(value) => write!(f, "invalid layout dimension: {value}"),
        }
    }
}

impl Error for LayoutError {}

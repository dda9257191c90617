//! Window (letter) domain model.
//!
//! # Responsibility
//! - Define the window record a visitor attaches to a house.
//! - Validate letter drafts before they reach storage.
//! - Assign compacting grid positions.
//!
//! # Invariants
//! - `grid_position` is the smallest positive integer free in the house at
//!   insert time; deletion may leave gaps that the next insert fills.
//! - `visitor_name` and `letter_content` are non-blank after trim.

use crate::model::house::HouseId;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier of a window.
pub type WindowId = uuid::Uuid;

/// Character artwork numbers. `7` was never drawn.
pub const CHARACTER_NUMBERS: [u32; 21] = [
    1, 2, 3, 4, 5, 6, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22,
];

/// Frame artwork identifiers.
pub const FRAME_DESIGNS: [&str; 6] = [
    "window1", "window1b", "window2", "window2b", "window3", "window3b",
];

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid hex color regex"));
static CHARACTER_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^character(\d{1,3})$").expect("valid character id regex"));

/// Validation errors for letter drafts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowValidationError {
    UnknownCharacter(String),
    UnknownFrame(String),
    /// Background color is not `#RRGGBB`.
    InvalidColor(String),
    BlankVisitorName,
    BlankLetter,
}

impl Display for WindowValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownCharacter(value) => write!(f, "unknown character `{value}`"),
            Self::UnknownFrame(value) => write!(f, "unknown frame design `{value}`"),
            Self::InvalidColor(value) => {
                write!(f, "background color must be #RRGGBB, got `{value}`")
            }
            Self::BlankVisitorName => write!(f, "visitor name must not be blank"),
            Self::BlankLetter => write!(f, "letter content must not be blank"),
        }
    }
}

impl Error for WindowValidationError {}

/// Persisted window carrying one visitor letter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub id: WindowId,
    pub house_id: HouseId,
    /// Sequential 1-based position; nine positions fill one page.
    pub grid_position: u32,
    pub character_type: String,
    pub frame_design: String,
    /// `#RRGGBB`.
    pub background_color: String,
    pub visitor_name: String,
    pub letter_content: String,
    pub created_at: DateTime<Utc>,
}

/// Visitor input for a new window, before a position is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterDraft {
    pub character_type: String,
    pub frame_design: String,
    pub background_color: String,
    pub visitor_name: String,
    pub letter_content: String,
}

impl LetterDraft {
    /// Returns a copy with surrounding whitespace removed from every field.
    pub fn normalized(&self) -> Self {
        Self {
            character_type: self.character_type.trim().to_string(),
            frame_design: self.frame_design.trim().to_string(),
            background_color: self.background_color.trim().to_string(),
            visitor_name: self.visitor_name.trim().to_string(),
            letter_content: self.letter_content.trim().to_string(),
        }
    }

    /// Checks the draft against the artwork catalog and text rules.
    pub fn validate(&self) -> Result<(), WindowValidationError> {
        if !is_known_character(self.character_type.trim()) {
            return Err(WindowValidationError::UnknownCharacter(
                self.character_type.clone(),
            ));
        }
        if !FRAME_DESIGNS.contains(&self.frame_design.trim()) {
            return Err(WindowValidationError::UnknownFrame(
                self.frame_design.clone(),
            ));
        }
        if !HEX_COLOR_RE.is_match(self.background_color.trim()) {
            return Err(WindowValidationError::InvalidColor(
                self.background_color.clone(),
            ));
        }
        if self.visitor_name.trim().is_empty() {
            return Err(WindowValidationError::BlankVisitorName);
        }
        if self.letter_content.trim().is_empty() {
            return Err(WindowValidationError::BlankLetter);
        }
        Ok(())
    }
}

/// Returns the smallest positive position not present in `existing`.
///
/// `{1, 2, 4}` yields `3`; an empty set yields `1`. Zero values are ignored.
pub fn next_grid_position(existing: impl IntoIterator<Item = u32>) -> u32 {
    let used: BTreeSet<u32> = existing.into_iter().filter(|value| *value > 0).collect();
    let mut next = 1;
    for position in used {
        if position != next {
            break;
        }
        next += 1;
    }
    next
}

fn is_known_character(value: &str) -> bool {
    CHARACTER_ID_RE
        .captures(value)
        .and_then(|caps| caps.get(1))
        .and_then(|number| number.as_str().parse::<u32>().ok())
        .is_some_and(|number| CHARACTER_NUMBERS.contains(&number))
}

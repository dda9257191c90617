//! Letter use-case service.
//!
//! # Responsibility
//! - Append visitor letters as windows at compacting grid positions.
//! - Enforce owner-only deletion.
//! - Gate letter content behind the house reveal date.
//!
//! # Invariants
//! - Only visitors write letters; the owner reads them.
//! - Letter content leaves the service only for the owner, and only on or
//!   after the reveal date of the house's creation year.
//! - Author names and letter bodies are never logged.

use crate::gate::christmas::{can_view_letter, reveal_date};
use crate::gate::GateError;
use crate::model::house::{House, HouseId, UserId};
use crate::model::role::UserRole;
use crate::model::window::{LetterDraft, Window, WindowId, WindowValidationError};
use crate::repo::house_repo::HouseRepository;
use crate::repo::window_repo::WindowRepository;
use crate::repo::RepoError;
use chrono::{DateTime, NaiveDate, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum LetterServiceError {
    InvalidLetter(WindowValidationError),
    HouseNotFound(HouseId),
    LetterNotFound(WindowId),
    /// Deleting requires owning the house.
    NotOwner(WindowId),
    /// Owners cannot write letters to their own house.
    OwnerCannotWrite(HouseId),
    Gate(GateError),
    Repo(RepoError),
}

impl Display for LetterServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLetter(err) => write!(f, "{err}"),
            Self::HouseNotFound(id) => write!(f, "house not found: {id}"),
            Self::LetterNotFound(id) => write!(f, "letter not found: {id}"),
            Self::NotOwner(id) => write!(f, "only the house owner can delete letter {id}"),
            Self::OwnerCannotWrite(id) => {
                write!(f, "owners cannot write letters to their own house {id}")
            }
            Self::Gate(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LetterServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidLetter(err) => Some(err),
            Self::Gate(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for LetterServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::InvalidLetter(err) => Self::InvalidLetter(err),
            other => Self::Repo(other),
        }
    }
}

impl From<GateError> for LetterServiceError {
    fn from(value: GateError) -> Self {
        Self::Gate(value)
    }
}

/// What the viewer gets when opening a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LetterAccess {
    /// Owner after the reveal date.
    Open { author: String, content: String },
    /// Owner before the reveal date.
    Sealed { opens_on: NaiveDate },
    /// Visitors never read letters.
    OwnerOnly,
}

/// Letter use-case facade over house and window repositories.
pub struct LetterService<H: HouseRepository, W: WindowRepository> {
    houses: H,
    windows: W,
}

impl<H: HouseRepository, W: WindowRepository> LetterService<H, W> {
    pub fn new(houses: H, windows: W) -> Self {
        Self { houses, windows }
    }

    /// Adds a visitor letter to `house_id` at the lowest free position.
    pub fn add_letter(
        &self,
        current_user: Option<UserId>,
        house_id: HouseId,
        draft: &LetterDraft,
        now: DateTime<Utc>,
    ) -> Result<Window, LetterServiceError> {
        let house = self.load_house(house_id)?;
        if UserRole::resolve(house.owner_id, current_user).is_owner() {
            return Err(LetterServiceError::OwnerCannotWrite(house_id));
        }
        draft.validate().map_err(LetterServiceError::InvalidLetter)?;

        let window = self.windows.add_window(house_id, draft, now)?;
        info!(
            "event=letter_add module=service status=ok house_id={} window_id={} grid_position={}",
            house_id, window.id, window.grid_position
        );
        Ok(window)
    }

    /// Deletes a letter. Only the house owner may do this.
    pub fn delete_letter(
        &self,
        current_user: Option<UserId>,
        window_id: WindowId,
    ) -> Result<(), LetterServiceError> {
        let (window, house) = self.load_window_with_house(window_id)?;
        if !UserRole::resolve(house.owner_id, current_user).is_owner() {
            return Err(LetterServiceError::NotOwner(window_id));
        }

        self.windows.delete_window(window.id)?;
        info!(
            "event=letter_delete module=service status=ok house_id={} window_id={} grid_position={}",
            house.id, window.id, window.grid_position
        );
        Ok(())
    }

    /// Opens a letter for the current viewer at `now`.
    pub fn read_letter(
        &self,
        current_user: Option<UserId>,
        window_id: WindowId,
        now: DateTime<Utc>,
    ) -> Result<LetterAccess, LetterServiceError> {
        let (window, house) = self.load_window_with_house(window_id)?;
        let role = UserRole::resolve(house.owner_id, current_user);
        if !role.is_owner() {
            return Ok(LetterAccess::OwnerOnly);
        }

        if can_view_letter(role, &house, now)? {
            Ok(LetterAccess::Open {
                author: window.visitor_name,
                content: window.letter_content,
            })
        } else {
            Ok(LetterAccess::Sealed {
                opens_on: reveal_date(house.created_at, &house.timezone)?,
            })
        }
    }

    fn load_house(&self, house_id: HouseId) -> Result<House, LetterServiceError> {
        self.houses
            .get_house(house_id)?
            .ok_or(LetterServiceError::HouseNotFound(house_id))
    }

    fn load_window_with_house(
        &self,
        window_id: WindowId,
    ) -> Result<(Window, House), LetterServiceError> {
        let window = self
            .windows
            .get_window(window_id)?
            .ok_or(LetterServiceError::LetterNotFound(window_id))?;
        let house = self.load_house(window.house_id)?;
        Ok((window, house))
    }
}

//! House use-case service.
//!
//! # Responsibility
//! - Create and update houses with owner checks.
//! - Open a house for the current viewer, resolving the viewer role.
//!
//! # Invariants
//! - One house per owner.
//! - Only the owner may update a house.

use crate::gate::christmas::{has_christmas_passed, time_remaining, Countdown};
use crate::gate::GateResult;
use crate::layout::planner::{plan_page, PagePlan};
use crate::layout::viewport::{ImageMeasurement, ViewportPolicy};
use crate::layout::LayoutError;
use crate::model::house::{House, HouseId, HouseTemplate, HouseValidationError, UserId};
use crate::model::role::UserRole;
use crate::model::window::Window;
use crate::repo::house_repo::HouseRepository;
use crate::repo::window_repo::WindowRepository;
use crate::repo::RepoError;
use chrono::{DateTime, Utc};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum HouseServiceError {
    InvalidHouse(HouseValidationError),
    HouseNotFound(HouseId),
    /// Owner already has a house.
    HouseAlreadyExists(UserId),
    /// Current viewer does not own the house.
    NotOwner(HouseId),
    Repo(RepoError),
}

impl Display for HouseServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidHouse(err) => write!(f, "{err}"),
            Self::HouseNotFound(id) => write!(f, "house not found: {id}"),
            Self::HouseAlreadyExists(owner) => write!(f, "user {owner} already has a house"),
            Self::NotOwner(id) => write!(f, "only the owner can change house {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for HouseServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidHouse(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for HouseServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::HouseNotFound(id),
            RepoError::InvalidHouse(err) => Self::InvalidHouse(err),
            other => Self::Repo(other),
        }
    }
}

impl From<HouseValidationError> for HouseServiceError {
    fn from(value: HouseValidationError) -> Self {
        Self::InvalidHouse(value)
    }
}

/// Snapshot of one house as seen by the current viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct HouseSession {
    pub house: House,
    /// Ordered by grid position.
    pub windows: Vec<Window>,
    pub role: UserRole,
}

impl HouseSession {
    pub fn is_owner(&self) -> bool {
        self.role.is_owner()
    }

    /// Rolling countdown to the next Christmas in the house timezone.
    pub fn countdown(&self, now: DateTime<Utc>) -> GateResult<Countdown> {
        time_remaining(&self.house.timezone, now)
    }

    /// Whether this house's letters are past their reveal date.
    pub fn letters_unlocked(&self, now: DateTime<Utc>) -> GateResult<bool> {
        has_christmas_passed(self.house.created_at, &self.house.timezone, now)
    }

    /// Screen placement for `page` of this house's windows.
    pub fn plan_page(
        &self,
        page: usize,
        measurement: &ImageMeasurement,
        policy: &ViewportPolicy,
    ) -> Result<PagePlan, LayoutError> {
        plan_page(
            &self.house.house_type,
            &self.windows,
            page,
            measurement,
            policy,
        )
    }
}

/// House use-case facade over house and window repositories.
pub struct HouseService<H: HouseRepository, W: WindowRepository> {
    houses: H,
    windows: W,
}

impl<H: HouseRepository, W: WindowRepository> HouseService<H, W> {
    pub fn new(houses: H, windows: W) -> Self {
        Self { houses, windows }
    }

    /// Creates the house of `owner_id`.
    ///
    /// # Errors
    /// - `InvalidHouse` for blank names, unknown templates or timezones.
    /// - `HouseAlreadyExists` when the owner already has one.
    pub fn create_house(
        &self,
        owner_id: UserId,
        name: &str,
        template_id: &str,
        timezone: &str,
        now: DateTime<Utc>,
    ) -> Result<House, HouseServiceError> {
        let template = parse_template(template_id)?;
        let house = House::new(owner_id, name, template, timezone, now)?;

        if self.houses.find_house_by_owner(owner_id)?.is_some() {
            return Err(HouseServiceError::HouseAlreadyExists(owner_id));
        }

        self.houses.create_house(&house)?;
        info!(
            "event=house_create module=service status=ok house_id={} template={} tz={}",
            house.id, house.house_type, house.timezone
        );
        Ok(house)
    }

    /// Replaces name, template and timezone of a house the viewer owns.
    pub fn update_house(
        &self,
        current_user: Option<UserId>,
        house_id: HouseId,
        name: &str,
        template_id: &str,
        timezone: &str,
        now: DateTime<Utc>,
    ) -> Result<House, HouseServiceError> {
        let mut house = self
            .houses
            .get_house(house_id)?
            .ok_or(HouseServiceError::HouseNotFound(house_id))?;
        if !UserRole::resolve(house.owner_id, current_user).is_owner() {
            return Err(HouseServiceError::NotOwner(house_id));
        }

        house.name = name.trim().to_string();
        house.house_type = parse_template(template_id)?.as_str().to_string();
        house.timezone = timezone.trim().to_string();
        house.updated_at = now;
        self.houses.update_house(&house)?;

        info!(
            "event=house_update module=service status=ok house_id={}",
            house.id
        );
        Ok(house)
    }

    /// Opens a house for the current viewer.
    ///
    /// With `house_id` the given house is loaded (shared link). Without it
    /// the current user's own house is loaded. Returns `None` when there is
    /// nothing to show: an anonymous viewer without a link, or a user who
    /// has not created a house yet.
    pub fn open_house(
        &self,
        current_user: Option<UserId>,
        house_id: Option<HouseId>,
    ) -> Result<Option<HouseSession>, HouseServiceError> {
        let house = match (house_id, current_user) {
            (Some(house_id), _) => Some(
                self.houses
                    .get_house(house_id)?
                    .ok_or(HouseServiceError::HouseNotFound(house_id))?,
            ),
            (None, Some(user_id)) => self.houses.find_house_by_owner(user_id)?,
            (None, None) => None,
        };

        let Some(house) = house else {
            return Ok(None);
        };

        let windows = self.windows.list_windows(house.id)?;
        let role = UserRole::resolve(house.owner_id, current_user);
        Ok(Some(HouseSession {
            house,
            windows,
            role,
        }))
    }
}

fn parse_template(template_id: &str) -> Result<HouseTemplate, HouseValidationError> {
    HouseTemplate::parse(template_id)
        .ok_or_else(|| HouseValidationError::UnknownTemplate(template_id.to_string()))
}

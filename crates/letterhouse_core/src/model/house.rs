//! House domain model.
//!
//! # Responsibility
//! - Define the house record consumed by layout and gating logic.
//! - Enumerate the closed set of house templates.
//!
//! # Invariants
//! - `name` is non-blank after trim.
//! - `timezone` is a valid IANA identifier.
//! - New houses always use a known template; persisted rows with unknown
//!   template ids are still readable and fall back to family A geometry.

use crate::gate::parse_timezone;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a house.
pub type HouseId = Uuid;

/// Identifier issued by the external identity service.
pub type UserId = Uuid;

/// Closed set of house artworks a user can pick from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseTemplate {
    House1,
    House2,
    House3,
    House4,
    House5,
    House6,
}

impl HouseTemplate {
    pub const ALL: [HouseTemplate; 6] = [
        Self::House1,
        Self::House2,
        Self::House3,
        Self::House4,
        Self::House5,
        Self::House6,
    ];

    /// Stored template identifier (`house1` .. `house6`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::House1 => "house1",
            Self::House2 => "house2",
            Self::House3 => "house3",
            Self::House4 => "house4",
            Self::House5 => "house5",
            Self::House6 => "house6",
        }
    }

    /// Parses a stored template identifier. Returns `None` for unknown ids.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|template| template.as_str() == value.trim())
    }
}

impl Display for HouseTemplate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors for house records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HouseValidationError {
    /// Display name is empty after trim.
    BlankName,
    /// Template id is not one of the known templates.
    UnknownTemplate(String),
    /// Timezone is not a recognized IANA identifier.
    InvalidTimezone(String),
}

impl Display for HouseValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "house name must not be blank"),
            Self::UnknownTemplate(value) => write!(f, "unknown house template `{value}`"),
            Self::InvalidTimezone(value) => write!(f, "invalid timezone `{value}`"),
        }
    }
}

impl Error for HouseValidationError {}

/// A user's house. Visitors leave letters on it as windows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct House {
    pub id: HouseId,
    pub owner_id: UserId,
    pub name: String,
    /// Raw template identifier as stored, see [`HouseTemplate`].
    pub house_type: String,
    /// IANA timezone the house counts down in.
    pub timezone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl House {
    /// Creates a validated house with a generated id, stamped at `now`.
    ///
    /// # Errors
    /// - Any [`HouseValidationError`] from [`House::validate`].
    pub fn new(
        owner_id: UserId,
        name: impl Into<String>,
        template: HouseTemplate,
        timezone: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, HouseValidationError> {
        let house = Self {
            id: Uuid::new_v4(),
            owner_id,
            name: name.into().trim().to_string(),
            house_type: template.as_str().to_string(),
            timezone: timezone.into().trim().to_string(),
            created_at: now,
            updated_at: now,
        };
        house.validate()?;
        Ok(house)
    }

    /// Returns the parsed template, or `None` if the stored id is unknown.
    pub fn template(&self) -> Option<HouseTemplate> {
        HouseTemplate::parse(&self.house_type)
    }

    /// Checks write-path invariants.
    pub fn validate(&self) -> Result<(), HouseValidationError> {
        if self.name.trim().is_empty() {
            return Err(HouseValidationError::BlankName);
        }
        if self.template().is_none() {
            return Err(HouseValidationError::UnknownTemplate(
                self.house_type.clone(),
            ));
        }
        if parse_timezone(&self.timezone).is_err() {
            return Err(HouseValidationError::InvalidTimezone(
                self.timezone.clone(),
            ));
        }
        Ok(())
    }
}

/// Builds the link a house owner shares with visitors.
pub fn share_link(origin: &str, house_id: HouseId) -> String {
    format!("{}?house={house_id}", origin.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::{share_link, HouseTemplate};
    use uuid::Uuid;

    #[test]
    fn template_parse_accepts_known_ids_only() {
        assert_eq!(HouseTemplate::parse("house4"), Some(HouseTemplate::House4));
        assert_eq!(HouseTemplate::parse(" house1 "), Some(HouseTemplate::House1));
        assert_eq!(HouseTemplate::parse("house7"), None);
        assert_eq!(HouseTemplate::parse("house10"), None);
    }

    #[test]
    fn share_link_appends_house_query() {
        let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
        assert_eq!(
            share_link("https://example.com/", id),
            "https://example.com?house=11111111-2222-4333-8444-555555555555"
        );
    }
}

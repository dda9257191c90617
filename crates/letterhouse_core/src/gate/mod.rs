//! Temporal gate: Christmas-day checks, countdown and letter reveal.
//!
//! # Responsibility
//! - Convert reference instants into wall-clock time of a house timezone.
//! - Keep the rolling countdown and the creation-year reveal rule as two
//!   separate operations.
//! - Drive the one-second countdown tick for live displays.
//!
//! # Invariants
//! - Unknown timezone ids fail with `GateError::InvalidTimezone`; callers
//!   pick a fallback.
//! - All functions except the ticker are pure in `(timezone, instant)`.

use chrono_tz::Tz;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod christmas;
pub mod ticker;

pub type GateResult<T> = Result<T, GateError>;

#[derive(Debug)]
pub enum GateError {
    /// Timezone id is not in the IANA database.
    InvalidTimezone(String),
    /// A local Christmas boundary has no matching instant (out-of-range year
    /// or a DST gap at midnight).
    UnrepresentableInstant,
    /// The countdown tick thread could not be started.
    TickerUnavailable(std::io::Error),
}

impl Display for GateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTimezone(value) => write!(f, "invalid timezone `{value}`"),
            Self::UnrepresentableInstant => {
                write!(f, "christmas boundary cannot be represented in timezone")
            }
            Self::TickerUnavailable(err) => write!(f, "countdown ticker unavailable: {err}"),
        }
    }
}

impl Error for GateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::TickerUnavailable(err) => Some(err),
            _ => None,
        }
    }
}

/// Parses an IANA timezone id such as `America/New_York`.
pub fn parse_timezone(timezone: &str) -> GateResult<Tz> {
    timezone
        .trim()
        .parse::<Tz>()
        .map_err(|_| GateError::InvalidTimezone(timezone.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{parse_timezone, GateError};

    #[test]
    fn parse_timezone_accepts_iana_ids() {
        assert_eq!(
            parse_timezone("Asia/Tokyo").unwrap(),
            chrono_tz::Asia::Tokyo
        );
        assert_eq!(parse_timezone(" UTC ").unwrap(), chrono_tz::UTC);
    }

    #[test]
    fn parse_timezone_rejects_unknown_ids() {
        let err = parse_timezone("Mars/Olympus_Mons").unwrap_err();
        assert!(matches!(err, GateError::InvalidTimezone(value) if value == "Mars/Olympus_Mons"));
    }
}

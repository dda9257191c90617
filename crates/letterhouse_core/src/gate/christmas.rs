//! Christmas gate rules.
//!
//! Two clocks live here and they are not interchangeable:
//! - the rolling countdown (`is_gate_date_passed`, `time_remaining`) moves to
//!   next year's December 25 once this year's has started;
//! - the reveal rule (`has_christmas_passed`) is pinned to the December 25
//!   of the year the house was created and opens letters at the start of
//!   December 26, local time.

use crate::gate::{parse_timezone, GateError, GateResult};
use crate::model::house::House;
use crate::model::role::UserRole;
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

pub const GATE_MONTH: u32 = 12;
pub const GATE_DAY: u32 = 25;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;
const SECONDS_PER_HOUR: i64 = 60 * 60;
const SECONDS_PER_MINUTE: i64 = 60;
const GAP_PROBE_MINUTES: i64 = 15;

/// Time left until the next local December 25, 00:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    pub days: i64,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    /// True while it is December 25 in the target timezone.
    pub has_passed: bool,
    /// Year of the Christmas being counted down to.
    pub target_year: i32,
}

impl Countdown {
    fn arrived(year: i32) -> Self {
        Self {
            days: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
            has_passed: true,
            target_year: year,
        }
    }

    fn from_total_seconds(total: i64, target_year: i32) -> Self {
        let remainder = total % SECONDS_PER_DAY;
        Self {
            days: total / SECONDS_PER_DAY,
            hours: (remainder / SECONDS_PER_HOUR) as u32,
            minutes: ((remainder % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE) as u32,
            seconds: (remainder % SECONDS_PER_MINUTE) as u32,
            has_passed: false,
            target_year,
        }
    }

    /// Rebuilds the whole-second total from the components.
    pub fn total_seconds(&self) -> i64 {
        self.days * SECONDS_PER_DAY
            + i64::from(self.hours) * SECONDS_PER_HOUR
            + i64::from(self.minutes) * SECONDS_PER_MINUTE
            + i64::from(self.seconds)
    }
}

/// True iff `now` falls on December 25 in `timezone`.
pub fn is_christmas_day(timezone: &str, now: DateTime<Utc>) -> GateResult<bool> {
    let tz = parse_timezone(timezone)?;
    let today = now.with_timezone(&tz).date_naive();
    Ok(today.month() == GATE_MONTH && today.day() == GATE_DAY)
}

/// True iff the local date in `timezone` is on or after December 25 of the
/// local year. Resets on January 1.
pub fn is_gate_date_passed(timezone: &str, now: DateTime<Utc>) -> GateResult<bool> {
    let tz = parse_timezone(timezone)?;
    let local = now.with_timezone(&tz);
    Ok(local.date_naive() >= gate_date(local.year())?)
}

/// Time remaining until the next local December 25 in `timezone`.
///
/// On December 25 itself this returns `has_passed = true` with zero
/// components. From December 26 on it counts down to next year.
pub fn time_remaining(timezone: &str, now: DateTime<Utc>) -> GateResult<Countdown> {
    let tz = parse_timezone(timezone)?;
    countdown_in(tz, now)
}

pub(crate) fn countdown_in(tz: Tz, now: DateTime<Utc>) -> GateResult<Countdown> {
    let local = now.with_timezone(&tz);
    let today = local.date_naive();
    let this_year = gate_date(local.year())?;

    if today == this_year {
        return Ok(Countdown::arrived(local.year()));
    }

    let target_year = if today > this_year {
        local.year() + 1
    } else {
        local.year()
    };
    let boundary = local_midnight(tz, gate_date(target_year)?)?;
    let total = (boundary - now).num_seconds();
    if total <= 0 {
        return Ok(Countdown::arrived(target_year));
    }

    Ok(Countdown::from_total_seconds(total, target_year))
}

/// Local date on which letters of a house created at `created_at` open.
///
/// The creation year is read in the house timezone, so a house created on
/// New Year's Eve UTC may belong to the following local year.
pub fn reveal_date(created_at: DateTime<Utc>, timezone: &str) -> GateResult<NaiveDate> {
    let tz = parse_timezone(timezone)?;
    let year = created_at.with_timezone(&tz).year();
    gate_date(year)?
        .succ_opt()
        .ok_or(GateError::UnrepresentableInstant)
}

/// True once the creation year's Christmas is over in the house timezone.
///
/// Unlike [`is_gate_date_passed`], this never resets: a house created in
/// 2023 stays unlocked in 2026.
pub fn has_christmas_passed(
    created_at: DateTime<Utc>,
    timezone: &str,
    now: DateTime<Utc>,
) -> GateResult<bool> {
    let tz = parse_timezone(timezone)?;
    let opens_on = reveal_date(created_at, timezone)?;
    Ok(now.with_timezone(&tz).date_naive() >= opens_on)
}

/// Whether `role` may read letter content on `house` at `now`.
///
/// Only owners ever read letters, and only after the reveal date.
pub fn can_view_letter(role: UserRole, house: &House, now: DateTime<Utc>) -> GateResult<bool> {
    if !role.is_owner() {
        return Ok(false);
    }
    has_christmas_passed(house.created_at, &house.timezone, now)
}

fn gate_date(year: i32) -> GateResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, GATE_MONTH, GATE_DAY).ok_or(GateError::UnrepresentableInstant)
}

/// First instant of `date` in `tz`.
///
/// Midnight inside a DST gap moves forward to the first local time that
/// exists, probed in 15-minute steps.
fn local_midnight(tz: Tz, date: NaiveDate) -> GateResult<DateTime<Utc>> {
    let mut time = NaiveTime::MIN;
    loop {
        if let Some(instant) = tz.from_local_datetime(&date.and_time(time)).earliest() {
            return Ok(instant.with_timezone(&Utc));
        }
        let (next, wrapped) = time.overflowing_add_signed(TimeDelta::minutes(GAP_PROBE_MINUTES));
        if wrapped != 0 {
            return Err(GateError::UnrepresentableInstant);
        }
        time = next;
    }
}

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use letterhouse_core::{
    can_view_letter, has_christmas_passed, is_christmas_day, is_gate_date_passed, reveal_date,
    time_remaining, GateError, House, HouseTemplate, UserRole,
};
use uuid::Uuid;

const NEW_YORK: &str = "America/New_York";
const TOKYO: &str = "Asia/Tokyo";

fn at(tz: Tz, y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    tz.with_ymd_and_hms(y, m, d, h, mi, s)
        .single()
        .unwrap()
        .with_timezone(&Utc)
}

fn house_created_at(timezone: &str, created_at: DateTime<Utc>) -> House {
    House::new(
        Uuid::new_v4(),
        "Mina's house",
        HouseTemplate::House1,
        timezone,
        created_at,
    )
    .unwrap()
}

#[test]
fn one_second_before_christmas_counts_down_one_second() {
    let now = at(chrono_tz::America::New_York, 2024, 12, 24, 23, 59, 59);
    let countdown = time_remaining(NEW_YORK, now).unwrap();

    assert!(!countdown.has_passed);
    assert_eq!(countdown.target_year, 2024);
    assert_eq!(
        (countdown.days, countdown.hours, countdown.minutes, countdown.seconds),
        (0, 0, 0, 1)
    );
}

#[test]
fn christmas_midnight_reports_arrival() {
    let now = at(chrono_tz::America::New_York, 2024, 12, 25, 0, 0, 0);
    let countdown = time_remaining(NEW_YORK, now).unwrap();

    assert!(countdown.has_passed);
    assert_eq!(countdown.total_seconds(), 0);
    assert!(is_christmas_day(NEW_YORK, now).unwrap());
}

#[test]
fn december_26_counts_down_to_next_year() {
    let now = at(chrono_tz::America::New_York, 2024, 12, 26, 0, 0, 0);
    let countdown = time_remaining(NEW_YORK, now).unwrap();

    assert!(!countdown.has_passed);
    assert_eq!(countdown.target_year, 2025);
    assert_eq!(countdown.days, 364);
    assert_eq!(countdown.total_seconds(), 364 * 86_400);
}

#[test]
fn gate_date_passed_resets_on_new_year() {
    let tz = chrono_tz::America::New_York;
    assert!(!is_gate_date_passed(NEW_YORK, at(tz, 2024, 12, 24, 12, 0, 0)).unwrap());
    assert!(is_gate_date_passed(NEW_YORK, at(tz, 2024, 12, 25, 0, 0, 0)).unwrap());
    assert!(is_gate_date_passed(NEW_YORK, at(tz, 2024, 12, 31, 23, 59, 59)).unwrap());
    assert!(!is_gate_date_passed(NEW_YORK, at(tz, 2025, 1, 1, 0, 0, 0)).unwrap());
}

#[test]
fn same_instant_differs_per_timezone() {
    let now = Utc.with_ymd_and_hms(2024, 12, 24, 20, 0, 0).unwrap();

    assert!(is_christmas_day(TOKYO, now).unwrap());
    assert!(!is_christmas_day(NEW_YORK, now).unwrap());
    assert!(time_remaining(TOKYO, now).unwrap().has_passed);
    assert!(!time_remaining(NEW_YORK, now).unwrap().has_passed);
}

#[test]
fn invalid_timezone_is_rejected() {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let err = time_remaining("Mars/Olympus_Mons", now).unwrap_err();
    assert!(matches!(err, GateError::InvalidTimezone(name) if name == "Mars/Olympus_Mons"));
    assert!(is_christmas_day("", now).is_err());
}

#[test]
fn letters_open_on_december_26_of_creation_year() {
    let tz = chrono_tz::America::New_York;
    let created = at(tz, 2024, 6, 1, 9, 0, 0);

    assert_eq!(
        reveal_date(created, NEW_YORK).unwrap(),
        NaiveDate::from_ymd_opt(2024, 12, 26).unwrap()
    );
    assert!(!has_christmas_passed(created, NEW_YORK, at(tz, 2024, 12, 25, 23, 59, 59)).unwrap());
    assert!(has_christmas_passed(created, NEW_YORK, at(tz, 2024, 12, 26, 0, 0, 0)).unwrap());
}

#[test]
fn unlocked_house_stays_unlocked_in_later_years() {
    let tz = chrono_tz::America::New_York;
    let created = at(tz, 2023, 11, 20, 9, 0, 0);

    assert!(has_christmas_passed(created, NEW_YORK, at(tz, 2026, 3, 1, 0, 0, 0)).unwrap());
    assert!(has_christmas_passed(created, NEW_YORK, at(tz, 2026, 12, 24, 0, 0, 0)).unwrap());
}

#[test]
fn house_created_after_christmas_is_unlocked_immediately() {
    let tz = chrono_tz::America::New_York;
    let created = at(tz, 2024, 12, 28, 10, 0, 0);

    assert!(has_christmas_passed(created, NEW_YORK, created).unwrap());
}

#[test]
fn creation_year_is_read_in_house_timezone() {
    // 2024-12-31 20:00 UTC is already 2025 in Tokyo.
    let created = Utc.with_ymd_and_hms(2024, 12, 31, 20, 0, 0).unwrap();

    assert_eq!(
        reveal_date(created, TOKYO).unwrap(),
        NaiveDate::from_ymd_opt(2025, 12, 26).unwrap()
    );
    assert!(!has_christmas_passed(created, TOKYO, created).unwrap());
}

#[test]
fn only_owner_can_view_after_reveal() {
    let tz = chrono_tz::America::New_York;
    let house = house_created_at(NEW_YORK, at(tz, 2024, 12, 1, 0, 0, 0));
    let before = at(tz, 2024, 12, 20, 0, 0, 0);
    let after = at(tz, 2024, 12, 27, 0, 0, 0);

    assert!(!can_view_letter(UserRole::Owner, &house, before).unwrap());
    assert!(can_view_letter(UserRole::Owner, &house, after).unwrap());
    assert!(!can_view_letter(UserRole::Visitor, &house, after).unwrap());
}

#[test]
fn house_from_december_20_unlocks_after_christmas_and_stays_open() {
    let tz = chrono_tz::Europe::London;
    let created = at(tz, 2023, 12, 20, 10, 0, 0);
    let passed_at = |now| has_christmas_passed(created, "Europe/London", now).unwrap();

    assert!(!passed_at(at(tz, 2023, 12, 24, 12, 0, 0)));
    assert!(passed_at(at(tz, 2023, 12, 26, 0, 0, 0)));
    assert!(passed_at(at(tz, 2026, 1, 1, 0, 0, 0)));
}

#[test]
fn countdown_components_stay_in_range_and_sum_to_boundary() {
    let tz = chrono_tz::America::New_York;
    let boundary = at(tz, 2025, 12, 25, 0, 0, 0);
    let samples = [
        at(tz, 2025, 1, 1, 0, 0, 0),
        at(tz, 2025, 3, 9, 3, 30, 0),
        at(tz, 2025, 7, 4, 17, 45, 12),
        at(tz, 2025, 11, 2, 12, 15, 59),
        at(tz, 2025, 12, 24, 23, 0, 1),
    ];

    for now in samples {
        let countdown = time_remaining(NEW_YORK, now).unwrap();
        assert!(countdown.hours < 24);
        assert!(countdown.minutes < 60);
        assert!(countdown.seconds < 60);
        assert_eq!(countdown.total_seconds(), (boundary - now).num_seconds());
    }
}

#[test]
fn christmas_day_is_one_date_per_year() {
    let tz = chrono_tz::Australia::Sydney;
    let mut day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut hits = 0;
    while day.year() == 2024 {
        let noon = at(tz, day.year(), day.month(), day.day(), 12, 0, 0);
        if is_christmas_day("Australia/Sydney", noon).unwrap() {
            hits += 1;
        }
        day = day.succ_opt().unwrap();
    }
    assert_eq!(hits, 1);
}

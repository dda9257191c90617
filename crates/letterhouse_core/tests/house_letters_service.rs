use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use letterhouse_core::db::open_db_in_memory;
use letterhouse_core::{
    HouseService, HouseServiceError, HouseValidationError, LetterAccess, LetterDraft,
    LetterService, LetterServiceError, SqliteHouseRepository, SqliteWindowRepository, UserRole,
    WindowValidationError,
};
use rusqlite::Connection;
use uuid::Uuid;

const SEOUL: &str = "Asia/Seoul";

fn seoul(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    chrono_tz::Asia::Seoul
        .with_ymd_and_hms(y, m, d, h, 0, 0)
        .single()
        .unwrap()
        .with_timezone(&Utc)
}

fn house_service(
    conn: &Connection,
) -> HouseService<SqliteHouseRepository<'_>, SqliteWindowRepository<'_>> {
    HouseService::new(
        SqliteHouseRepository::try_new(conn).unwrap(),
        SqliteWindowRepository::try_new(conn).unwrap(),
    )
}

fn letter_service(
    conn: &Connection,
) -> LetterService<SqliteHouseRepository<'_>, SqliteWindowRepository<'_>> {
    LetterService::new(
        SqliteHouseRepository::try_new(conn).unwrap(),
        SqliteWindowRepository::try_new(conn).unwrap(),
    )
}

fn draft(visitor_name: &str, letter: &str) -> LetterDraft {
    LetterDraft {
        character_type: "character12".to_string(),
        frame_design: "window3".to_string(),
        background_color: "#C0FFEE".to_string(),
        visitor_name: visitor_name.to_string(),
        letter_content: letter.to_string(),
    }
}

#[test]
fn create_house_validates_input() {
    let conn = open_db_in_memory().unwrap();
    let houses = house_service(&conn);
    let owner = Uuid::new_v4();
    let now = seoul(2024, 12, 1, 9);

    assert!(matches!(
        houses.create_house(owner, "   ", "house1", SEOUL, now),
        Err(HouseServiceError::InvalidHouse(HouseValidationError::BlankName))
    ));
    assert!(matches!(
        houses.create_house(owner, "Den", "house9", SEOUL, now),
        Err(HouseServiceError::InvalidHouse(HouseValidationError::UnknownTemplate(_)))
    ));
    assert!(matches!(
        houses.create_house(owner, "Den", "house1", "Seoul", now),
        Err(HouseServiceError::InvalidHouse(HouseValidationError::InvalidTimezone(_)))
    ));
}

#[test]
fn owner_has_at_most_one_house() {
    let conn = open_db_in_memory().unwrap();
    let houses = house_service(&conn);
    let owner = Uuid::new_v4();
    let now = seoul(2024, 12, 1, 9);

    houses.create_house(owner, "Den", "house2", SEOUL, now).unwrap();
    assert!(matches!(
        houses.create_house(owner, "Other den", "house3", SEOUL, now),
        Err(HouseServiceError::HouseAlreadyExists(id)) if id == owner
    ));
}

#[test]
fn only_owner_updates_house() {
    let conn = open_db_in_memory().unwrap();
    let houses = house_service(&conn);
    let owner = Uuid::new_v4();
    let house = houses
        .create_house(owner, "Den", "house2", SEOUL, seoul(2024, 12, 1, 9))
        .unwrap();

    let stranger = Some(Uuid::new_v4());
    assert!(matches!(
        houses.update_house(stranger, house.id, "Mine", "house4", SEOUL, seoul(2024, 12, 2, 9)),
        Err(HouseServiceError::NotOwner(_))
    ));

    let updated = houses
        .update_house(Some(owner), house.id, " Big den ", "house4", SEOUL, seoul(2024, 12, 2, 9))
        .unwrap();
    assert_eq!(updated.name, "Big den");
    assert_eq!(updated.house_type, "house4");
    assert_eq!(updated.created_at, house.created_at);
    assert_eq!(updated.updated_at, seoul(2024, 12, 2, 9));
}

#[test]
fn timezone_change_rereads_creation_year() {
    let conn = open_db_in_memory().unwrap();
    let houses = house_service(&conn);
    let owner = Uuid::new_v4();
    // Already 2025 in Seoul, still 2024 in New York.
    let created = Utc.with_ymd_and_hms(2024, 12, 31, 20, 0, 0).unwrap();
    let house = houses
        .create_house(owner, "Den", "house1", SEOUL, created)
        .unwrap();
    let early_january = Utc.with_ymd_and_hms(2025, 1, 2, 12, 0, 0).unwrap();

    let session = houses.open_house(Some(owner), None).unwrap().unwrap();
    assert!(!session.letters_unlocked(early_january).unwrap());

    houses
        .update_house(Some(owner), house.id, "Den", "house1", "America/New_York", early_january)
        .unwrap();
    let session = houses.open_house(Some(owner), None).unwrap().unwrap();
    assert!(session.letters_unlocked(early_january).unwrap());
}

#[test]
fn open_house_resolves_role_per_viewer() {
    let conn = open_db_in_memory().unwrap();
    let houses = house_service(&conn);
    let owner = Uuid::new_v4();
    let house = houses
        .create_house(owner, "Den", "house1", SEOUL, seoul(2024, 12, 1, 9))
        .unwrap();

    let own = houses.open_house(Some(owner), None).unwrap().unwrap();
    assert_eq!(own.role, UserRole::Owner);
    assert_eq!(own.house.id, house.id);

    let shared = houses.open_house(None, Some(house.id)).unwrap().unwrap();
    assert_eq!(shared.role, UserRole::Visitor);
    assert!(!shared.is_owner());

    assert!(houses.open_house(None, None).unwrap().is_none());
    assert!(houses.open_house(Some(Uuid::new_v4()), None).unwrap().is_none());
    assert!(matches!(
        houses.open_house(None, Some(Uuid::new_v4())),
        Err(HouseServiceError::HouseNotFound(_))
    ));
}

#[test]
fn visitor_letter_lands_in_owner_session() {
    let conn = open_db_in_memory().unwrap();
    let houses = house_service(&conn);
    let letters = letter_service(&conn);
    let owner = Uuid::new_v4();
    let house = houses
        .create_house(owner, "Den", "house5", SEOUL, seoul(2024, 12, 1, 9))
        .unwrap();

    let anonymous = letters
        .add_letter(None, house.id, &draft("Jun", "Hi!"), seoul(2024, 12, 3, 9))
        .unwrap();
    let signed_in = letters
        .add_letter(Some(Uuid::new_v4()), house.id, &draft("Lee", "Yo!"), seoul(2024, 12, 4, 9))
        .unwrap();
    assert_eq!(anonymous.grid_position, 1);
    assert_eq!(signed_in.grid_position, 2);

    let session = houses.open_house(Some(owner), None).unwrap().unwrap();
    assert_eq!(session.windows.len(), 2);
    assert!(!session.letters_unlocked(seoul(2024, 12, 24, 23)).unwrap());
    assert!(session.letters_unlocked(seoul(2024, 12, 26, 0)).unwrap());
    assert_eq!(session.countdown(seoul(2024, 12, 24, 23)).unwrap().total_seconds(), 3_600);
}

#[test]
fn owner_cannot_write_to_own_house() {
    let conn = open_db_in_memory().unwrap();
    let houses = house_service(&conn);
    let letters = letter_service(&conn);
    let owner = Uuid::new_v4();
    let house = houses
        .create_house(owner, "Den", "house1", SEOUL, seoul(2024, 12, 1, 9))
        .unwrap();

    assert!(matches!(
        letters.add_letter(Some(owner), house.id, &draft("Me", "Note to self"), seoul(2024, 12, 2, 9)),
        Err(LetterServiceError::OwnerCannotWrite(id)) if id == house.id
    ));
}

#[test]
fn invalid_letter_and_missing_house_are_reported() {
    let conn = open_db_in_memory().unwrap();
    let houses = house_service(&conn);
    let letters = letter_service(&conn);
    let house = houses
        .create_house(Uuid::new_v4(), "Den", "house1", SEOUL, seoul(2024, 12, 1, 9))
        .unwrap();

    assert!(matches!(
        letters.add_letter(None, house.id, &draft("Jun", "   "), seoul(2024, 12, 2, 9)),
        Err(LetterServiceError::InvalidLetter(WindowValidationError::BlankLetter))
    ));
    assert!(matches!(
        letters.add_letter(None, Uuid::new_v4(), &draft("Jun", "Hi"), seoul(2024, 12, 2, 9)),
        Err(LetterServiceError::HouseNotFound(_))
    ));
}

#[test]
fn letters_stay_sealed_until_reveal_date() {
    let conn = open_db_in_memory().unwrap();
    let houses = house_service(&conn);
    let letters = letter_service(&conn);
    let owner = Uuid::new_v4();
    let house = houses
        .create_house(owner, "Den", "house3", SEOUL, seoul(2024, 12, 1, 9))
        .unwrap();
    let window = letters
        .add_letter(None, house.id, &draft("Jun", "Open me later"), seoul(2024, 12, 2, 9))
        .unwrap();

    assert_eq!(
        letters.read_letter(Some(owner), window.id, seoul(2024, 12, 25, 12)).unwrap(),
        LetterAccess::Sealed {
            opens_on: NaiveDate::from_ymd_opt(2024, 12, 26).unwrap()
        }
    );
    assert_eq!(
        letters.read_letter(Some(owner), window.id, seoul(2024, 12, 26, 0)).unwrap(),
        LetterAccess::Open {
            author: "Jun".to_string(),
            content: "Open me later".to_string()
        }
    );
}

#[test]
fn visitors_never_read_letters() {
    let conn = open_db_in_memory().unwrap();
    let houses = house_service(&conn);
    let letters = letter_service(&conn);
    let house = houses
        .create_house(Uuid::new_v4(), "Den", "house3", SEOUL, seoul(2024, 12, 1, 9))
        .unwrap();
    let author = Uuid::new_v4();
    let window = letters
        .add_letter(Some(author), house.id, &draft("Jun", "Secret"), seoul(2024, 12, 2, 9))
        .unwrap();

    let after_reveal = seoul(2025, 1, 5, 9);
    assert_eq!(
        letters.read_letter(Some(author), window.id, after_reveal).unwrap(),
        LetterAccess::OwnerOnly
    );
    assert_eq!(
        letters.read_letter(None, window.id, after_reveal).unwrap(),
        LetterAccess::OwnerOnly
    );
}

#[test]
fn only_owner_deletes_and_position_is_refilled() {
    let conn = open_db_in_memory().unwrap();
    let houses = house_service(&conn);
    let letters = letter_service(&conn);
    let owner = Uuid::new_v4();
    let house = houses
        .create_house(owner, "Den", "house6", SEOUL, seoul(2024, 12, 1, 9))
        .unwrap();
    let first = letters
        .add_letter(None, house.id, &draft("A", "one"), seoul(2024, 12, 2, 9))
        .unwrap();
    letters
        .add_letter(None, house.id, &draft("B", "two"), seoul(2024, 12, 2, 10))
        .unwrap();

    assert!(matches!(
        letters.delete_letter(None, first.id),
        Err(LetterServiceError::NotOwner(_))
    ));
    letters.delete_letter(Some(owner), first.id).unwrap();
    assert!(matches!(
        letters.delete_letter(Some(owner), first.id),
        Err(LetterServiceError::LetterNotFound(_))
    ));

    let refill = letters
        .add_letter(None, house.id, &draft("C", "three"), seoul(2024, 12, 3, 9))
        .unwrap();
    assert_eq!(refill.grid_position, 1);
}

#[test]
fn letter_access_serializes_with_status_tag() {
    let sealed = LetterAccess::Sealed {
        opens_on: NaiveDate::from_ymd_opt(2024, 12, 26).unwrap(),
    };
    assert_eq!(
        serde_json::to_value(&sealed).unwrap(),
        serde_json::json!({"status": "sealed", "opens_on": "2024-12-26"})
    );
    assert_eq!(
        serde_json::to_value(LetterAccess::OwnerOnly).unwrap(),
        serde_json::json!({"status": "owner_only"})
    );
}

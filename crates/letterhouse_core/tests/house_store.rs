use chrono::{DateTime, Duration, TimeZone, Utc};
use letterhouse_core::db::open_db_in_memory;
use letterhouse_core::{
    House, HouseRepository, HouseTemplate, HouseValidationError, LetterDraft, RepoError,
    SqliteHouseRepository, SqliteWindowRepository, WindowRepository, WindowValidationError,
};
use uuid::Uuid;

fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 11, 30, 12, 0, 0).unwrap()
}

fn draft(visitor_name: &str) -> LetterDraft {
    LetterDraft {
        character_type: "character3".to_string(),
        frame_design: "window2b".to_string(),
        background_color: "#1A2B3C".to_string(),
        visitor_name: visitor_name.to_string(),
        letter_content: "See you at the market!".to_string(),
    }
}

fn new_house(template: HouseTemplate) -> House {
    House::new(
        Uuid::new_v4(),
        "Winter cottage",
        template,
        "Europe/Berlin",
        created_at(),
    )
    .unwrap()
}

#[test]
fn house_round_trips_through_store() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteHouseRepository::try_new(&conn).unwrap();
    let house = new_house(HouseTemplate::House4);

    let id = repo.create_house(&house).unwrap();
    assert_eq!(id, house.id);

    assert_eq!(repo.get_house(id).unwrap(), Some(house.clone()));
    assert_eq!(repo.find_house_by_owner(house.owner_id).unwrap(), Some(house));
    assert_eq!(repo.find_house_by_owner(Uuid::new_v4()).unwrap(), None);
    assert_eq!(repo.get_house(Uuid::new_v4()).unwrap(), None);
}

#[test]
fn update_house_replaces_editable_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteHouseRepository::try_new(&conn).unwrap();
    let mut house = new_house(HouseTemplate::House1);
    repo.create_house(&house).unwrap();

    house.name = "Snow lodge".to_string();
    house.house_type = "house5".to_string();
    house.timezone = "Asia/Seoul".to_string();
    house.updated_at = created_at() + Duration::days(3);
    repo.update_house(&house).unwrap();

    let stored = repo.get_house(house.id).unwrap().unwrap();
    assert_eq!(stored, house);
    assert_eq!(stored.created_at, created_at());
}

#[test]
fn update_of_missing_house_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteHouseRepository::try_new(&conn).unwrap();
    let house = new_house(HouseTemplate::House2);

    let err = repo.update_house(&house).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == house.id));
}

#[test]
fn invalid_house_is_rejected_before_sql() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteHouseRepository::try_new(&conn).unwrap();
    let mut house = new_house(HouseTemplate::House3);
    house.timezone = "Nowhere/Land".to_string();

    let err = repo.create_house(&house).unwrap_err();
    assert!(matches!(
        err,
        RepoError::InvalidHouse(HouseValidationError::InvalidTimezone(_))
    ));
    assert_eq!(repo.get_house(house.id).unwrap(), None);
}

#[test]
fn second_house_for_same_owner_violates_unique_owner() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteHouseRepository::try_new(&conn).unwrap();
    let first = new_house(HouseTemplate::House1);
    repo.create_house(&first).unwrap();

    let mut second = new_house(HouseTemplate::House2);
    second.owner_id = first.owner_id;
    assert!(matches!(
        repo.create_house(&second).unwrap_err(),
        RepoError::Db(_)
    ));
}

#[test]
fn windows_take_sequential_positions() {
    let conn = open_db_in_memory().unwrap();
    let houses = SqliteHouseRepository::try_new(&conn).unwrap();
    let windows = SqliteWindowRepository::try_new(&conn).unwrap();
    let house = new_house(HouseTemplate::House6);
    houses.create_house(&house).unwrap();

    for (index, name) in ["Ari", "Bo", "Cy"].iter().enumerate() {
        let window = windows.add_window(house.id, &draft(name), created_at()).unwrap();
        assert_eq!(window.grid_position, index as u32 + 1);
        assert_eq!(window.house_id, house.id);
    }

    let listed = windows.list_windows(house.id).unwrap();
    assert_eq!(
        listed
            .iter()
            .map(|window| window.grid_position)
            .collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
}

#[test]
fn deleted_position_is_reused_by_next_window() {
    let conn = open_db_in_memory().unwrap();
    let houses = SqliteHouseRepository::try_new(&conn).unwrap();
    let windows = SqliteWindowRepository::try_new(&conn).unwrap();
    let house = new_house(HouseTemplate::House2);
    houses.create_house(&house).unwrap();

    let added: Vec<_> = (0..4)
        .map(|index| {
            windows
                .add_window(house.id, &draft(&format!("guest {index}")), created_at())
                .unwrap()
        })
        .collect();

    windows.delete_window(added[1].id).unwrap();
    assert_eq!(windows.get_window(added[1].id).unwrap(), None);

    let refill = windows.add_window(house.id, &draft("late guest"), created_at()).unwrap();
    assert_eq!(refill.grid_position, 2);

    let next = windows.add_window(house.id, &draft("later guest"), created_at()).unwrap();
    assert_eq!(next.grid_position, 5);
}

#[test]
fn draft_is_trimmed_before_storage() {
    let conn = open_db_in_memory().unwrap();
    let houses = SqliteHouseRepository::try_new(&conn).unwrap();
    let windows = SqliteWindowRepository::try_new(&conn).unwrap();
    let house = new_house(HouseTemplate::House1);
    houses.create_house(&house).unwrap();

    let mut padded = draft("  Dana  ");
    padded.letter_content = "\n Happy holidays \n".to_string();
    let window = windows.add_window(house.id, &padded, created_at()).unwrap();

    let stored = windows.get_window(window.id).unwrap().unwrap();
    assert_eq!(stored.visitor_name, "Dana");
    assert_eq!(stored.letter_content, "Happy holidays");
    assert_eq!(stored, window);
}

#[test]
fn window_for_missing_house_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let windows = SqliteWindowRepository::try_new(&conn).unwrap();
    let missing = Uuid::new_v4();

    let err = windows.add_window(missing, &draft("Eve"), created_at()).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == missing));
}

#[test]
fn invalid_draft_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let houses = SqliteHouseRepository::try_new(&conn).unwrap();
    let windows = SqliteWindowRepository::try_new(&conn).unwrap();
    let house = new_house(HouseTemplate::House1);
    houses.create_house(&house).unwrap();

    let mut bad = draft("Finn");
    bad.character_type = "character7".to_string();
    let err = windows.add_window(house.id, &bad, created_at()).unwrap_err();
    assert!(matches!(
        err,
        RepoError::InvalidLetter(WindowValidationError::UnknownCharacter(_))
    ));
    assert!(windows.list_windows(house.id).unwrap().is_empty());
}

#[test]
fn deleting_missing_window_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let windows = SqliteWindowRepository::try_new(&conn).unwrap();
    let id = Uuid::new_v4();
    assert!(matches!(
        windows.delete_window(id).unwrap_err(),
        RepoError::NotFound(missing) if missing == id
    ));
}

//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Translate core errors into flat response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Ids cross the boundary as UUID strings.
//! - Letter content crosses the boundary only inside an `open` read.

use chrono::{DateTime, Utc};
use letterhouse_core::db::open_db;
use letterhouse_core::{
    core_version as core_version_inner, init_logging as init_logging_inner,
    init_logging_from_config, ping as ping_inner, time_remaining, CoreConfig, HouseService, ImageMeasurement, LetterAccess, LetterDraft, LetterService,
    PagePlan, Point, SqliteHouseRepository, SqliteWindowRepository, ViewportPolicy, Window,
};
use log::warn;
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::OnceLock;
use uuid::Uuid;

const STORE_DB_FILE_NAME: &str = "letterhouse.sqlite3";
const STORE_DB_PATH_ENV: &str = "LETTERHOUSE_DB_PATH";
static STORE_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static VIEWPORT_POLICY: OnceLock<ViewportPolicy> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Pins the SQLite file used by every store-backed call.
///
/// Must run before the first store-backed call. Without it the path comes
/// from `LETTERHOUSE_DB_PATH`, else a file in the OS temp directory.
///
/// # FFI contract
/// - Idempotent for the same path; a different path afterwards is refused.
/// - Opens the database once so migrations run eagerly.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_store(db_path: String) -> String {
    let trimmed = db_path.trim();
    if trimmed.is_empty() {
        return "db_path cannot be empty".to_string();
    }
    match pin_store_db_path(PathBuf::from(trimmed)) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Applies a JSON `CoreConfig` document to this process.
///
/// Starts file logging when `log_dir` is set, pins the store to `db_path`
/// when set, and fixes the viewport policy used by `plan_house_page`.
///
/// # FFI contract
/// - Call once at startup, before store-backed calls.
/// - Idempotent for the same document; a conflicting one is refused.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_from_config(json: String) -> String {
    match apply_config(&json) {
        Ok(()) => String::new(),
        Err(err) => format!("init_from_config failed: {err}"),
    }
}

fn apply_config(json: &str) -> Result<(), String> {
    let config = CoreConfig::from_json_str(json).map_err(|err| err.to_string())?;
    init_logging_from_config(&config)?;
    if let Some(db_path) = &config.db_path {
        pin_store_db_path(db_path.clone())?;
    }

    let active = VIEWPORT_POLICY.get_or_init(|| config.viewport);
    if *active != config.viewport {
        return Err(format!(
            "viewport policy already set to {active:?}; refusing to switch to {:?}",
            config.viewport
        ));
    }
    Ok(())
}

fn pin_store_db_path(requested: PathBuf) -> Result<(), String> {
    let active = STORE_DB_PATH.get_or_init(|| requested.clone());
    if *active != requested {
        return Err(format!(
            "store already configured at `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        ));
    }
    open_db(active)
        .map(|_| ())
        .map_err(|err| format!("store open failed: {err}"))
}

fn active_viewport_policy() -> ViewportPolicy {
    VIEWPORT_POLICY.get().copied().unwrap_or_default()
}

/// Countdown snapshot for the Christmas ticker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownResponse {
    pub ok: bool,
    pub days: i64,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    /// True while it is December 25 in the requested timezone.
    pub has_passed: bool,
    pub target_year: i32,
    pub message: String,
}

/// Result of house creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HouseResponse {
    pub ok: bool,
    pub house_id: Option<String>,
    pub message: String,
}

/// Result of letter writes (add/delete).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterActionResponse {
    pub ok: bool,
    pub window_id: Option<String>,
    /// Position assigned by `add_letter`.
    pub grid_position: Option<u32>,
    pub message: String,
}

impl LetterActionResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            window_id: None,
            grid_position: None,
            message: message.into(),
        }
    }
}

/// Result of opening a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadLetterResponse {
    pub ok: bool,
    /// `open|sealed|owner_only`; empty on failure.
    pub status: String,
    pub author: Option<String>,
    pub content: Option<String>,
    /// `YYYY-MM-DD` local reveal date while sealed.
    pub opens_on: Option<String>,
    pub message: String,
}

impl ReadLetterResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            status: String::new(),
            author: None,
            content: None,
            opens_on: None,
            message: message.into(),
        }
    }
}

/// One window overlay in rendering-surface pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotPlacement {
    pub window_id: String,
    pub grid_position: u32,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Placement of one page of a house.
#[derive(Debug, Clone, PartialEq)]
pub struct PagePlanResponse {
    pub ok: bool,
    pub is_owner: bool,
    /// Page actually served after clamping.
    pub page: u32,
    pub total_pages: u32,
    pub has_previous: bool,
    pub has_next: bool,
    /// Native-to-screen scale applied to every slot.
    pub scale: f64,
    pub slots: Vec<SlotPlacement>,
    pub message: String,
}

impl PagePlanResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            is_owner: false,
            page: 1,
            total_pages: 1,
            has_previous: false,
            has_next: false,
            scale: 0.0,
            slots: Vec::new(),
            message: message.into(),
        }
    }
}

/// Time left until the next local Christmas in `timezone`.
///
/// # FFI contract
/// - Sync call, pure computation; call once per tick.
/// - Invalid timezone yields `ok=false` with zeroed fields.
#[flutter_rust_bridge::frb(sync)]
pub fn countdown(timezone: String) -> CountdownResponse {
    countdown_at(&timezone, Utc::now())
}

/// Creates the house of `owner_id`.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Returns the new house id on success.
#[flutter_rust_bridge::frb(sync)]
pub fn create_house(
    owner_id: String,
    name: String,
    template_id: String,
    timezone: String,
) -> HouseResponse {
    create_house_at(&owner_id, &name, &template_id, &timezone, Utc::now())
}

/// Adds a visitor letter to `house_id`.
///
/// `current_user` is `None` for anonymous visitors.
#[flutter_rust_bridge::frb(sync)]
pub fn add_letter(
    current_user: Option<String>,
    house_id: String,
    character_type: String,
    frame_design: String,
    background_color: String,
    visitor_name: String,
    letter_content: String,
) -> LetterActionResponse {
    let draft = LetterDraft {
        character_type,
        frame_design,
        background_color,
        visitor_name,
        letter_content,
    };
    add_letter_at(current_user.as_deref(), &house_id, &draft, Utc::now())
}

/// Deletes a letter; owner only.
#[flutter_rust_bridge::frb(sync)]
pub fn delete_letter(current_user: Option<String>, window_id: String) -> LetterActionResponse {
    let outcome = (|| -> Result<Uuid, String> {
        let current_user = parse_optional_id(current_user.as_deref(), "current_user")?;
        let window_id = parse_id(&window_id, "window_id")?;
        with_store(|conn| {
            letter_service(conn)?
                .delete_letter(current_user, window_id)
                .map_err(|err| err.to_string())?;
            Ok(window_id)
        })
    })();

    match outcome {
        Ok(window_id) => LetterActionResponse {
            ok: true,
            window_id: Some(window_id.to_string()),
            grid_position: None,
            message: "Letter deleted.".to_string(),
        },
        Err(err) => failed("delete_letter", LetterActionResponse::failure, err),
    }
}

/// Opens a letter for the current viewer.
///
/// # FFI contract
/// - Visitors always get `owner_only`.
/// - Owners get `sealed` with `opens_on` until the reveal date, then `open`.
#[flutter_rust_bridge::frb(sync)]
pub fn read_letter(current_user: Option<String>, window_id: String) -> ReadLetterResponse {
    read_letter_at(current_user.as_deref(), &window_id, Utc::now())
}

/// Plans one page of window overlays for the rendering surface.
///
/// Coordinates come from the surface after layout: container and image
/// origins, the rendered image width and the viewport width.
#[flutter_rust_bridge::frb(sync)]
#[allow(clippy::too_many_arguments)]
pub fn plan_house_page(
    current_user: Option<String>,
    house_id: String,
    page: u32,
    container_x: f64,
    container_y: f64,
    image_x: f64,
    image_y: f64,
    rendered_width: f64,
    viewport_width: f64,
) -> PagePlanResponse {
    let measurement = ImageMeasurement {
        container_origin: Point {
            x: container_x,
            y: container_y,
        },
        image_origin: Point {
            x: image_x,
            y: image_y,
        },
        rendered_width,
        viewport_width,
    };
    plan_house_page_with(current_user.as_deref(), &house_id, page, &measurement)
}

fn countdown_at(timezone: &str, now: DateTime<Utc>) -> CountdownResponse {
    match time_remaining(timezone, now) {
        Ok(remaining) => CountdownResponse {
            ok: true,
            days: remaining.days,
            hours: remaining.hours,
            minutes: remaining.minutes,
            seconds: remaining.seconds,
            has_passed: remaining.has_passed,
            target_year: remaining.target_year,
            message: String::new(),
        },
        Err(err) => failed(
            "countdown",
            |message| CountdownResponse {
                ok: false,
                days: 0,
                hours: 0,
                minutes: 0,
                seconds: 0,
                has_passed: false,
                target_year: 0,
                message,
            },
            err.to_string(),
        ),
    }
}

fn create_house_at(
    owner_id: &str,
    name: &str,
    template_id: &str,
    timezone: &str,
    now: DateTime<Utc>,
) -> HouseResponse {
    let outcome = parse_id(owner_id, "owner_id").and_then(|owner_id| {
        with_store(|conn| {
            house_service(conn)?
                .create_house(owner_id, name, template_id, timezone, now)
                .map_err(|err| err.to_string())
        })
    });

    match outcome {
        Ok(house) => HouseResponse {
            ok: true,
            house_id: Some(house.id.to_string()),
            message: "House created.".to_string(),
        },
        Err(err) => failed(
            "create_house",
            |message| HouseResponse {
                ok: false,
                house_id: None,
                message,
            },
            err,
        ),
    }
}

fn add_letter_at(
    current_user: Option<&str>,
    house_id: &str,
    draft: &LetterDraft,
    now: DateTime<Utc>,
) -> LetterActionResponse {
    let outcome = (|| -> Result<Window, String> {
        let current_user = parse_optional_id(current_user, "current_user")?;
        let house_id = parse_id(house_id, "house_id")?;
        with_store(|conn| {
            letter_service(conn)?
                .add_letter(current_user, house_id, draft, now)
                .map_err(|err| err.to_string())
        })
    })();

    match outcome {
        Ok(window) => LetterActionResponse {
            ok: true,
            window_id: Some(window.id.to_string()),
            grid_position: Some(window.grid_position),
            message: "Letter added.".to_string(),
        },
        Err(err) => failed("add_letter", LetterActionResponse::failure, err),
    }
}

fn read_letter_at(
    current_user: Option<&str>,
    window_id: &str,
    now: DateTime<Utc>,
) -> ReadLetterResponse {
    let outcome = (|| -> Result<LetterAccess, String> {
        let current_user = parse_optional_id(current_user, "current_user")?;
        let window_id = parse_id(window_id, "window_id")?;
        with_store(|conn| {
            letter_service(conn)?
                .read_letter(current_user, window_id, now)
                .map_err(|err| err.to_string())
        })
    })();

    match outcome {
        Ok(LetterAccess::Open { author, content }) => ReadLetterResponse {
            ok: true,
            status: "open".to_string(),
            author: Some(author),
            content: Some(content),
            opens_on: None,
            message: String::new(),
        },
        Ok(LetterAccess::Sealed { opens_on }) => ReadLetterResponse {
            ok: true,
            status: "sealed".to_string(),
            author: None,
            content: None,
            opens_on: Some(opens_on.format("%Y-%m-%d").to_string()),
            message: "Letters open after Christmas.".to_string(),
        },
        Ok(LetterAccess::OwnerOnly) => ReadLetterResponse {
            ok: true,
            status: "owner_only".to_string(),
            author: None,
            content: None,
            opens_on: None,
            message: "Only the house owner can read letters.".to_string(),
        },
        Err(err) => failed("read_letter", ReadLetterResponse::failure, err),
    }
}

fn plan_house_page_with(
    current_user: Option<&str>,
    house_id: &str,
    page: u32,
    measurement: &ImageMeasurement,
) -> PagePlanResponse {
    let outcome = (|| -> Result<(bool, PagePlan), String> {
        let current_user = parse_optional_id(current_user, "current_user")?;
        let house_id = parse_id(house_id, "house_id")?;
        let session = with_store(|conn| {
            house_service(conn)?
                .open_house(current_user, Some(house_id))
                .map_err(|err| err.to_string())
        })?
        .ok_or_else(|| format!("house not found: {house_id}"))?;
        let plan = session
            .plan_page(page as usize, measurement, &active_viewport_policy())
            .map_err(|err| err.to_string())?;
        Ok((session.is_owner(), plan))
    })();

    match outcome {
        Ok((is_owner, plan)) => PagePlanResponse {
            ok: true,
            is_owner,
            page: plan.page as u32,
            total_pages: plan.total_pages as u32,
            has_previous: plan.has_previous,
            has_next: plan.has_next,
            scale: plan.transform.scale,
            slots: plan
                .placements
                .into_iter()
                .map(|placed| SlotPlacement {
                    window_id: placed.window_id.to_string(),
                    grid_position: placed.grid_position,
                    left: placed.rect.left,
                    top: placed.rect.top,
                    width: placed.rect.width,
                    height: placed.rect.height,
                })
                .collect(),
            message: String::new(),
        },
        Err(err) => failed("plan_house_page", PagePlanResponse::failure, err),
    }
}

fn failed<T>(operation: &str, build: impl FnOnce(String) -> T, err: String) -> T {
    warn!("event=ffi_call module=ffi status=error op={operation}");
    build(format!("{operation} failed: {err}"))
}

fn resolve_store_db_path() -> PathBuf {
    STORE_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(STORE_DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(STORE_DB_FILE_NAME)
        })
        .clone()
}

fn with_store<T>(f: impl FnOnce(&Connection) -> Result<T, String>) -> Result<T, String> {
    let db_path = resolve_store_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("store open failed: {err}"))?;
    f(&conn)
}

type StoreHouseService<'conn> =
    HouseService<SqliteHouseRepository<'conn>, SqliteWindowRepository<'conn>>;
type StoreLetterService<'conn> =
    LetterService<SqliteHouseRepository<'conn>, SqliteWindowRepository<'conn>>;

fn house_service(conn: &Connection) -> Result<StoreHouseService<'_>, String> {
    let (houses, windows) = repositories(conn)?;
    Ok(HouseService::new(houses, windows))
}

fn letter_service(conn: &Connection) -> Result<StoreLetterService<'_>, String> {
    let (houses, windows) = repositories(conn)?;
    Ok(LetterService::new(houses, windows))
}

fn repositories(
    conn: &Connection,
) -> Result<(SqliteHouseRepository<'_>, SqliteWindowRepository<'_>), String> {
    let houses = SqliteHouseRepository::try_new(conn)
        .map_err(|err| format!("house repo init failed: {err}"))?;
    let windows = SqliteWindowRepository::try_new(conn)
        .map_err(|err| format!("window repo init failed: {err}"))?;
    Ok((houses, windows))
}

fn parse_id(raw: &str, field: &str) -> Result<Uuid, String> {
    Uuid::parse_str(raw.trim()).map_err(|_| format!("{field} is not a valid id: `{raw}`"))
}

fn parse_optional_id(raw: Option<&str>, field: &str) -> Result<Option<Uuid>, String> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_id(value, field).map(Some),
    }
}

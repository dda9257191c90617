//! Core domain logic for Letterhouse.
//! Houses, visitor letters, the Christmas reveal gate and window layout.

pub mod config;
pub mod db;
pub mod gate;
pub mod layout;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use gate::christmas::{
    can_view_letter, has_christmas_passed, is_christmas_day, is_gate_date_passed, reveal_date,
    time_remaining, Countdown,
};
pub use gate::ticker::{CountdownTicker, DEFAULT_TICK_INTERVAL};
pub use gate::{parse_timezone, GateError, GateResult};
pub use layout::geometry::{HouseFamily, Offset, Rect, TemplateLayout};
pub use layout::pagination::{
    clamp_page, current_page, paginate, total_pages, GridPositioned, Page, PageCursor,
    DEFAULT_PAGE_SIZE,
};
pub use layout::planner::{plan_page, PagePlan, PlacedWindow};
pub use layout::resolver::resolve_slot_rect;
pub use layout::viewport::{
    image_offset, scale, scale_factor, DeviceClass, ImageMeasurement, Point, ViewportPolicy,
    ViewportScaler, ViewportTransform,
};
pub use layout::{LayoutError, SLOTS_PER_PAGE};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::house::{share_link, House, HouseId, HouseTemplate, HouseValidationError, UserId};
pub use model::role::UserRole;
pub use model::window::{
    next_grid_position, LetterDraft, Window, WindowId, WindowValidationError,
};
pub use repo::house_repo::{HouseRepository, SqliteHouseRepository};
pub use repo::window_repo::{SqliteWindowRepository, WindowRepository};
pub use repo::{RepoError, RepoResult};
pub use service::house_service::{HouseService, HouseServiceError, HouseSession};
pub use service::letter_service::{LetterAccess, LetterService, LetterServiceError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

//! Page planning: current page -> slot rectangles -> screen rectangles.

use crate::layout::geometry::{Rect, TemplateLayout};
use crate::layout::pagination::current_page;
use crate::layout::viewport::{ImageMeasurement, ViewportPolicy, ViewportScaler, ViewportTransform};
use crate::layout::{LayoutError, SLOTS_PER_PAGE};
use crate::model::window::{Window, WindowId};
use log::warn;
use serde::{Deserialize, Serialize};

/// Screen rectangle assigned to one window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedWindow {
    pub window_id: WindowId,
    pub grid_position: u32,
    pub rect: Rect,
}

/// Everything a rendering surface needs to draw one house page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagePlan {
    pub page: usize,
    pub total_pages: usize,
    pub has_previous: bool,
    pub has_next: bool,
    pub transform: ViewportTransform,
    pub placements: Vec<PlacedWindow>,
}

/// Plans `page` of `windows` on a house of `template_id`.
///
/// The page is clamped like [`current_page`]. Windows whose slot cannot be
/// resolved are skipped.
///
/// # Errors
/// - `InvalidDimension` when the measurement cannot produce a scale.
pub fn plan_page(
    template_id: &str,
    windows: &[Window],
    page: usize,
    measurement: &ImageMeasurement,
    policy: &ViewportPolicy,
) -> Result<PagePlan, LayoutError> {
    let layout = TemplateLayout::for_template_id(template_id);
    let mut scaler = ViewportScaler::for_family(layout.family, *policy);
    let transform = scaler.recompute(measurement)?;
    let visible = current_page(windows, page, SLOTS_PER_PAGE);

    let mut placements = Vec::with_capacity(visible.items.len());
    for window in &visible.items {
        match layout.slot_rect(template_id, window.grid_position) {
            Ok(native) => placements.push(PlacedWindow {
                window_id: window.id,
                grid_position: window.grid_position,
                rect: transform.apply(native),
            }),
            Err(err) => warn!(
                "event=plan_page module=layout status=skip window_id={} error={}",
                window.id, err
            ),
        }
    }

    Ok(PagePlan {
        page: visible.page,
        total_pages: visible.total_pages,
        has_previous: visible.has_previous(),
        has_next: visible.has_next(),
        transform,
        placements,
    })
}

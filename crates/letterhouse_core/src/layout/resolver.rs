//! Slot resolution: sequential position -> native rectangle.

use crate::layout::geometry::{Rect, TemplateLayout};
use crate::layout::{LayoutError, SLOTS_PER_PAGE};

/// Within-page slot index for a 1-based position: `(position - 1) mod 9`.
///
/// Returns `None` for position 0.
pub fn slot_index(position: u32) -> Option<usize> {
    position
        .checked_sub(1)
        .map(|zero_based| zero_based as usize % SLOTS_PER_PAGE)
}

impl TemplateLayout {
    /// Native rectangle of `position` in this template's canvas space.
    ///
    /// Result = slot rectangle + house-body offset + template nudge.
    pub fn slot_rect(&self, template_id: &str, position: u32) -> Result<Rect, LayoutError> {
        let geometry = self.geometry();
        let slot = slot_index(position)
            .and_then(|index| geometry.slots.get(index))
            .ok_or_else(|| LayoutError::SlotNotFound {
                template: template_id.to_string(),
                position,
            })?;
        Ok(slot.translate(geometry.body_offset.plus(self.nudge)))
    }
}

/// Resolves the unscaled rectangle for `position` on `template_id`.
pub fn resolve_slot_rect(template_id: &str, position: u32) -> Result<Rect, LayoutError> {
    TemplateLayout::for_template_id(template_id).slot_rect(template_id, position)
}

#[cfg(test)]
mod tests {
    use super::{resolve_slot_rect, slot_index};
    use crate::layout::geometry::Rect;
    use crate::layout::LayoutError;

    #[test]
    fn slot_index_wraps_every_nine() {
        assert_eq!(slot_index(0), None);
        assert_eq!(slot_index(1), Some(0));
        assert_eq!(slot_index(9), Some(8));
        assert_eq!(slot_index(10), Some(0));
        assert_eq!(slot_index(u32::MAX), Some((u32::MAX as usize - 1) % 9));
    }

    #[test]
    fn family_a_rect_adds_offset_and_nudge() {
        // slot (32, 100) + body (29, 96) + nudge (5, -25)
        assert_eq!(
            resolve_slot_rect("house1", 1).unwrap(),
            Rect::new(66.0, 171.0, 76.0, 102.0)
        );
    }

    #[test]
    fn family_b_rect_adds_offset_and_nudge() {
        // slot (215, 300) + body (48, 219) + nudge (-3, -15)
        assert_eq!(
            resolve_slot_rect("house6", 9).unwrap(),
            Rect::new(260.0, 504.0, 70.0, 95.0)
        );
    }

    #[test]
    fn position_zero_is_not_found() {
        assert_eq!(
            resolve_slot_rect("house2", 0),
            Err(LayoutError::SlotNotFound {
                template: "house2".to_string(),
                position: 0,
            })
        );
    }
}

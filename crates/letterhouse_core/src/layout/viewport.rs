//! Viewport scaling from native house pixels to on-screen pixels.
//!
//! # Invariants
//! - `scale = rendered_width / design_width`, times the compact factor on
//!   compact devices.
//! - `ViewportScaler` caches only the last transform; recomputing with the
//!   same measurement yields the same transform.

use crate::layout::geometry::{HouseFamily, Offset, Rect};
use crate::layout::LayoutError;
use log::debug;
use serde::{Deserialize, Serialize};

/// Widest viewport, in logical pixels, still treated as compact.
pub const COMPACT_MAX_VIEWPORT_WIDTH: f64 = 768.0;
/// Extra shrink applied to window overlays on compact devices.
pub const COMPACT_SCALE_FACTOR: f64 = 0.35;

/// Tunable device-class policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportPolicy {
    pub compact_max_width: f64,
    pub compact_factor: f64,
}

impl Default for ViewportPolicy {
    fn default() -> Self {
        Self {
            compact_max_width: COMPACT_MAX_VIEWPORT_WIDTH,
            compact_factor: COMPACT_SCALE_FACTOR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Regular,
    Compact,
}

impl DeviceClass {
    pub fn from_viewport_width(viewport_width: f64, policy: &ViewportPolicy) -> Self {
        if viewport_width <= policy.compact_max_width {
            Self::Compact
        } else {
            Self::Regular
        }
    }
}

/// Point in the rendering surface's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Offset of the house image's origin from its container's origin.
pub fn image_offset(container_origin: Point, image_origin: Point) -> Offset {
    Offset::new(
        image_origin.x - container_origin.x,
        image_origin.y - container_origin.y,
    )
}

/// Scale factor from design pixels to rendered pixels.
///
/// # Errors
/// - `InvalidDimension` when `design_width` is not a positive finite number
///   or `rendered_width` is negative or not finite.
pub fn scale_factor(
    rendered_width: f64,
    design_width: f64,
    device: DeviceClass,
    policy: &ViewportPolicy,
) -> Result<f64, LayoutError> {
    if !design_width.is_finite() || design_width <= 0.0 {
        return Err(LayoutError::InvalidDimension(design_width));
    }
    if !rendered_width.is_finite() || rendered_width < 0.0 {
        return Err(LayoutError::InvalidDimension(rendered_width));
    }

    let base = rendered_width / design_width;
    Ok(match device {
        DeviceClass::Regular => base,
        DeviceClass::Compact => base * policy.compact_factor,
    })
}

/// Scales `rect` from design pixels to rendered pixels, before any offset.
pub fn scale(
    rect: Rect,
    rendered_width: f64,
    design_width: f64,
    device: DeviceClass,
    policy: &ViewportPolicy,
) -> Result<Rect, LayoutError> {
    Ok(rect.scale(scale_factor(rendered_width, design_width, device, policy)?))
}

/// Scale plus image offset; maps native rectangles to the screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportTransform {
    pub scale: f64,
    pub offset: Offset,
}

impl ViewportTransform {
    pub fn apply(&self, rect: Rect) -> Rect {
        rect.scale(self.scale).translate(self.offset)
    }
}

/// Geometry reported by the rendering surface after layout, resize,
/// orientation change or image decode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageMeasurement {
    pub container_origin: Point,
    pub image_origin: Point,
    pub rendered_width: f64,
    pub viewport_width: f64,
}

/// View-local cache of the last computed transform for one house image.
#[derive(Debug, Clone)]
pub struct ViewportScaler {
    design_width: f64,
    policy: ViewportPolicy,
    last: Option<ViewportTransform>,
}

impl ViewportScaler {
    pub fn new(design_width: f64, policy: ViewportPolicy) -> Self {
        Self {
            design_width,
            policy,
            last: None,
        }
    }

    pub fn for_family(family: HouseFamily, policy: ViewportPolicy) -> Self {
        Self::new(family.geometry().design_width, policy)
    }

    /// Recomputes and caches the transform for a fresh measurement.
    pub fn recompute(
        &mut self,
        measurement: &ImageMeasurement,
    ) -> Result<ViewportTransform, LayoutError> {
        let device = DeviceClass::from_viewport_width(measurement.viewport_width, &self.policy);
        let transform = ViewportTransform {
            scale: scale_factor(
                measurement.rendered_width,
                self.design_width,
                device,
                &self.policy,
            )?,
            offset: image_offset(measurement.container_origin, measurement.image_origin),
        };
        debug!(
            "event=viewport_recompute module=layout status=ok scale={:.4} device={:?} rendered_width={} design_width={}",
            transform.scale, device, measurement.rendered_width, self.design_width
        );
        self.last = Some(transform);
        Ok(transform)
    }

    /// Last computed transform, if any measurement arrived yet.
    pub fn transform(&self) -> Option<ViewportTransform> {
        self.last
    }

    /// Places a native rectangle with the cached transform.
    pub fn place(&self, rect: Rect) -> Option<Rect> {
        self.last.map(|transform| transform.apply(rect))
    }
}

#[cfg(test)]
mod tests {
    use super::{image_offset, scale_factor, DeviceClass, Point, ViewportPolicy};
    use crate::layout::LayoutError;

    #[test]
    fn device_class_boundary_is_inclusive() {
        let policy = ViewportPolicy::default();
        assert_eq!(
            DeviceClass::from_viewport_width(768.0, &policy),
            DeviceClass::Compact
        );
        assert_eq!(
            DeviceClass::from_viewport_width(769.0, &policy),
            DeviceClass::Regular
        );
    }

    #[test]
    fn zero_design_width_is_rejected() {
        let err = scale_factor(100.0, 0.0, DeviceClass::Regular, &ViewportPolicy::default())
            .unwrap_err();
        assert_eq!(err, LayoutError::InvalidDimension(0.0));
    }

    #[test]
    fn image_offset_is_relative_to_container() {
        let offset = image_offset(Point { x: 10.0, y: 20.0 }, Point { x: 35.0, y: 22.5 });
        assert_eq!(offset.left, 25.0);
        assert_eq!(offset.top, 2.5);
    }
}

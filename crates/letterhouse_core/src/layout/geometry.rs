//! Static geometry of the house artwork families.
//!
//! Every house image is drawn on a design canvas. A "house body" sub-rectangle
//! sits inside that canvas, and nine window slots are laid out on the body in
//! three rows of three. Numbers are native SVG pixels.

use crate::layout::SLOTS_PER_PAGE;
use crate::model::house::HouseTemplate;
use log::warn;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Moves the rectangle without resizing it.
    pub fn translate(self, by: Offset) -> Self {
        Self {
            left: self.left + by.left,
            top: self.top + by.top,
            ..self
        }
    }

    /// Multiplies position and size by `factor`.
    pub fn scale(self, factor: f64) -> Self {
        Self {
            left: self.left * factor,
            top: self.top * factor,
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}

/// Pixel displacement; positive `top` moves down.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset {
    pub left: f64,
    pub top: f64,
}

impl Offset {
    pub const ZERO: Offset = Offset::new(0.0, 0.0);

    pub const fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }

    pub fn plus(self, other: Offset) -> Self {
        Self::new(self.left + other.left, self.top + other.top)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Artwork geometry shared by several templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseFamily {
    /// Tall houses: `house1`, `house2`, `house3`.
    A,
    /// Wide houses: `house4`, `house5`, `house6`.
    B,
}

/// Canvas, body and slot tables for one family.
#[derive(Debug, Clone, PartialEq)]
pub struct FamilyGeometry {
    /// Intrinsic width of the house image.
    pub design_width: f64,
    pub body_size: Size,
    /// Top-left corner of the house body inside the canvas.
    pub body_offset: Offset,
    /// Slot rectangles relative to the house body, row-major.
    pub slots: [Rect; SLOTS_PER_PAGE],
}

const fn slot_grid(columns: [f64; 3], rows: [f64; 3], width: f64, height: f64) -> [Rect; 9] {
    let mut slots = [Rect::new(0.0, 0.0, 0.0, 0.0); 9];
    let mut index = 0;
    while index < 9 {
        slots[index] = Rect::new(columns[index % 3], rows[index / 3], width, height);
        index += 1;
    }
    slots
}

static FAMILY_A: FamilyGeometry = FamilyGeometry {
    design_width: 398.0,
    body_size: Size {
        width: 340.0,
        height: 672.0,
    },
    body_offset: Offset::new(29.0, 96.0),
    slots: slot_grid([32.0, 132.0, 232.0], [100.0, 240.0, 380.0], 76.0, 102.0),
};

static FAMILY_B: FamilyGeometry = FamilyGeometry {
    design_width: 396.0,
    body_size: Size {
        width: 300.0,
        height: 561.0,
    },
    body_offset: Offset::new(48.0, 219.0),
    slots: slot_grid([15.0, 115.0, 215.0], [40.0, 170.0, 300.0], 70.0, 95.0),
};

impl HouseFamily {
    pub fn of(template: HouseTemplate) -> Self {
        match template {
            HouseTemplate::House1 | HouseTemplate::House2 | HouseTemplate::House3 => Self::A,
            HouseTemplate::House4 | HouseTemplate::House5 | HouseTemplate::House6 => Self::B,
        }
    }

    pub fn geometry(self) -> &'static FamilyGeometry {
        match self {
            Self::A => &FAMILY_A,
            Self::B => &FAMILY_B,
        }
    }
}

/// Fine-tuning applied on top of the family geometry per template.
pub fn template_nudge(template: HouseTemplate) -> Offset {
    match template {
        HouseTemplate::House1 | HouseTemplate::House2 | HouseTemplate::House3 => {
            Offset::new(5.0, -25.0)
        }
        HouseTemplate::House4 | HouseTemplate::House5 | HouseTemplate::House6 => {
            Offset::new(-3.0, -15.0)
        }
    }
}

/// Geometry resolved for one stored template id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemplateLayout {
    pub family: HouseFamily,
    pub nudge: Offset,
}

impl TemplateLayout {
    /// Resolves a stored template id. Unknown ids fall back to family A
    /// without a nudge and log a warning.
    pub fn for_template_id(template_id: &str) -> Self {
        match HouseTemplate::parse(template_id) {
            Some(template) => Self {
                family: HouseFamily::of(template),
                nudge: template_nudge(template),
            },
            None => {
                warn!(
                    "event=template_fallback module=layout status=warn template={} family=a",
                    template_id
                );
                Self {
                    family: HouseFamily::A,
                    nudge: Offset::ZERO,
                }
            }
        }
    }

    pub fn geometry(&self) -> &'static FamilyGeometry {
        self.family.geometry()
    }
}

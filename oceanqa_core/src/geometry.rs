//! Box geometry, spatial relations and rotation labels.
//!
//! All predicates are pure functions over inclusive pixel boxes.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis-aligned bounding box with inclusive pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 4]", into = "[i32; 4]")]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl From<[i32; 4]> for BoundingBox {
    fn from([x1, y1, x2, y2]: [i32; 4]) -> Self {
        Self { x1, y1, x2, y2 }
    }
}

impl From<BoundingBox> for [i32; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x1, b.y1, b.x2, b.y2]
    }
}

impl BoundingBox {
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Box of `width` x `height` pixels with its top-left corner at (x, y).
    pub fn from_origin(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x + width - 1, y + height - 1)
    }

    /// Grows the box by `margin` on all four sides.
    pub fn expanded(&self, margin: i32) -> Self {
        Self::new(self.x1 - margin, self.y1 - margin, self.x2 + margin, self.y2 + margin)
    }

    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x1 + dx, self.y1 + dy, self.x2 + dx, self.y2 + dy)
    }

    /// Corners in the order top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [(i32, i32); 4] {
        [
            (self.x1, self.y1),
            (self.x2, self.y1),
            (self.x2, self.y2),
            (self.x1, self.y2),
        ]
    }

    pub fn centre(&self) -> (f64, f64) {
        (
            (self.x1 + self.x2) as f64 / 2.0,
            (self.y1 + self.y2) as f64 / 2.0,
        )
    }

    /// Euclidean distance between the two box centres.
    pub fn centre_distance(&self, other: &BoundingBox) -> f64 {
        let (ax, ay) = self.centre();
        let (bx, by) = other.centre();
        ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
    }

    /// True when every coordinate lies in `[0, max_pixel)`.
    pub fn inside_canvas(&self, max_pixel: i32) -> bool {
        let in_range = |v: i32| (0..max_pixel).contains(&v);
        in_range(self.x1) && in_range(self.x2) && in_range(self.y1) && in_range(self.y2)
    }
}

/// Returns whether `b` is close to `a`.
///
/// `a` is expanded by `margin`. `b` is close when one of its corners matches
/// the expanded box on both axes, where an axis also matches if `b` spans the
/// expanded box entirely along it.
pub fn close_to(a: &BoundingBox, b: &BoundingBox, margin: i32) -> bool {
    let area = a.expanded(margin);

    let x_span = b.x2 >= area.x2 && b.x1 <= area.x1;
    let y_span = b.y2 >= area.y2 && b.y1 <= area.y1;

    b.corners().iter().any(|&(x, y)| {
        let match_x = (area.x1 <= x && x <= area.x2) || x_span;
        let match_y = (area.y1 <= y && y <= area.y2) || y_span;
        match_x && match_y
    })
}

/// `a` lies entirely above `b` (smaller y is higher on screen).
pub fn above(a: &BoundingBox, b: &BoundingBox) -> bool {
    a.y2 < b.y1
}

/// `a` lies entirely below `b`.
pub fn below(a: &BoundingBox, b: &BoundingBox) -> bool {
    a.y1 > b.y2
}

/// Spatial relation asked about by relation questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    CloseTo,
    Above,
    Below,
}

impl Relation {
    pub const ALL: [Relation; 3] = [Relation::CloseTo, Relation::Above, Relation::Below];

    pub fn holds(&self, a: &BoundingBox, b: &BoundingBox, margin: i32) -> bool {
        match self {
            Relation::CloseTo => close_to(a, b, margin),
            Relation::Above => above(a, b),
            Relation::Below => below(a, b),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Relation::CloseTo => "close to",
            Relation::Above => "above",
            Relation::Below => "below",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Facing direction of an object. The discriminant is the persisted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Rotation {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [Rotation::Up, Rotation::Right, Rotation::Down, Rotation::Left];

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Result<Self, CoreError> {
        match index {
            0 => Ok(Rotation::Up),
            1 => Ok(Rotation::Right),
            2 => Ok(Rotation::Down),
            3 => Ok(Rotation::Left),
            other => Err(CoreError::value(format!("rotation {}", other))),
        }
    }

    /// Anticlockwise quarter turn.
    pub fn turned_left(self) -> Self {
        Self::ALL[(self.index() as usize + 3) % 4]
    }

    /// Clockwise quarter turn.
    pub fn turned_right(self) -> Self {
        Self::ALL[(self.index() as usize + 1) % 4]
    }

    /// Pixel offset of one forward step of `distance`.
    pub fn forward(self, distance: i32) -> (i32, i32) {
        match self {
            Rotation::Up => (0, -distance),
            Rotation::Right => (distance, 0),
            Rotation::Down => (0, distance),
            Rotation::Left => (-distance, 0),
        }
    }

    /// Width and height once an upright size is rotated.
    pub fn oriented(self, (width, height): (i32, i32)) -> (i32, i32) {
        match self {
            Rotation::Right | Rotation::Left => (height, width),
            Rotation::Up | Rotation::Down => (width, height),
        }
    }

    /// Natural-language label, e.g. `right-facing`.
    pub fn label(self) -> &'static str {
        match self {
            Rotation::Up => "upward-facing",
            Rotation::Right => "right-facing",
            Rotation::Down => "downward-facing",
            Rotation::Left => "left-facing",
        }
    }
}

impl TryFrom<u8> for Rotation {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rotation::from_index(value)
    }
}

impl From<Rotation> for u8 {
    fn from(r: Rotation) -> Self {
        r.index()
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

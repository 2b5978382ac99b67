//! Scene objects and their properties.

use crate::definitions::{BAG_SIZE, FISH_SIZE, OCTOPUS_SIZE, ROCK_SIZE};
use crate::error::CoreError;
use crate::geometry::BoundingBox;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use crate::geometry::Rotation;

/// Object class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectClass {
    Octopus,
    Fish,
    Bag,
    Rock,
}

impl ObjectClass {
    pub const ALL: [ObjectClass; 4] = [
        ObjectClass::Octopus,
        ObjectClass::Fish,
        ObjectClass::Bag,
        ObjectClass::Rock,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ObjectClass::Octopus => "octopus",
            ObjectClass::Fish => "fish",
            ObjectClass::Bag => "bag",
            ObjectClass::Rock => "rock",
        }
    }

    /// Upright (width, height) in pixels.
    pub fn size(&self) -> (i32, i32) {
        match self {
            ObjectClass::Octopus => OCTOPUS_SIZE,
            ObjectClass::Fish => FISH_SIZE,
            ObjectClass::Bag => BAG_SIZE,
            ObjectClass::Rock => ROCK_SIZE,
        }
    }
}

impl fmt::Display for ObjectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ObjectClass {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "octopus" => Ok(ObjectClass::Octopus),
            "fish" => Ok(ObjectClass::Fish),
            "bag" => Ok(ObjectClass::Bag),
            "rock" => Ok(ObjectClass::Rock),
            _ => Err(CoreError::UnknownObjectType(s.to_string())),
        }
    }
}

/// Every colour an object can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colour {
    Red,
    Silver,
    White,
    Brown,
    Blue,
    Purple,
    Green,
}

impl Colour {
    pub const ALL: [Colour; 7] = [
        Colour::Red,
        Colour::Silver,
        Colour::White,
        Colour::Brown,
        Colour::Blue,
        Colour::Purple,
        Colour::Green,
    ];

    pub const ROCKS: [Colour; 4] = [Colour::Brown, Colour::Blue, Colour::Purple, Colour::Green];

    pub const OCTOPUS: Colour = Colour::Red;
    pub const FISH: Colour = Colour::Silver;
    pub const BAG: Colour = Colour::White;

    pub fn name(&self) -> &'static str {
        match self {
            Colour::Red => "red",
            Colour::Silver => "silver",
            Colour::White => "white",
            Colour::Brown => "brown",
            Colour::Blue => "blue",
            Colour::Purple => "purple",
            Colour::Green => "green",
        }
    }

    /// Display colour used by the renderer.
    pub fn rgb(&self) -> [u8; 3] {
        match self {
            Colour::Red => [226, 29, 98],
            Colour::Silver => [192, 190, 188],
            Colour::White => [255, 255, 255],
            Colour::Brown => [182, 122, 28],
            Colour::Blue => [0, 0, 255],
            Colour::Purple => [182, 37, 218],
            Colour::Green => [0, 255, 0],
        }
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Colour {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Colour::ALL
            .iter()
            .copied()
            .find(|c| c.name() == s)
            .ok_or_else(|| CoreError::value(s))
    }
}

/// Named object property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Class,
    Colour,
    Rotation,
}

impl Property {
    pub fn name(&self) -> &'static str {
        match self {
            Property::Class => "class",
            Property::Colour => "colour",
            Property::Rotation => "rotation",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Property {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "class" => Ok(Property::Class),
            "colour" => Ok(Property::Colour),
            "rotation" => Ok(Property::Rotation),
            _ => Err(CoreError::UnknownProperty(s.to_string())),
        }
    }
}

/// Value of a property that questions can ask about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyValue {
    Colour(Colour),
    Rotation(Rotation),
}

impl PropertyValue {
    pub fn property(&self) -> Property {
        match self {
            PropertyValue::Colour(_) => Property::Colour,
            PropertyValue::Rotation(_) => Property::Rotation,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Colour(c) => write!(f, "{}", c),
            PropertyValue::Rotation(r) => write!(f, "{}", r),
        }
    }
}

/// A single entity in a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneObject {
    pub class: ObjectClass,
    pub bbox: BoundingBox,
    pub colour: Colour,
    pub rotation: Rotation,
}

impl SceneObject {
    pub fn new(class: ObjectClass, bbox: BoundingBox, colour: Colour, rotation: Rotation) -> Self {
        Self { class, bbox, colour, rotation }
    }

    /// Value of a colour or rotation property.
    pub fn value_of(&self, property: Property) -> Result<PropertyValue, CoreError> {
        match property {
            Property::Colour => Ok(PropertyValue::Colour(self.colour)),
            Property::Rotation => Ok(PropertyValue::Rotation(self.rotation)),
            Property::Class => Err(CoreError::UnknownProperty(format!(
                "{} has no comparable value",
                property
            ))),
        }
    }

    /// Whether two records refer to different objects. Objects are told apart by position.
    pub fn is_distinct_from(&self, other: &SceneObject) -> bool {
        self.bbox != other.bbox
    }

    /// Reference phrase using `property` to single this object out,
    /// e.g. `octopus`, `blue rock`, `right-facing fish`.
    pub fn describe(&self, property: Property) -> String {
        match property {
            Property::Class => self.class.to_string(),
            Property::Colour => format!("{} {}", self.colour, self.class),
            Property::Rotation => format!("{} {}", self.rotation, self.class),
        }
    }
}

//! Events emitted by frame transitions.

use crate::definitions::CHANGE_COLOUR_LENGTH;
use crate::error::CoreError;
use crate::object::Colour;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A labelled occurrence between two consecutive frames.
///
/// Serialized as its label, e.g. `"rotate left"` or
/// `"change colour from red to blue"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Event {
    Move,
    RotateLeft,
    RotateRight,
    EatFish,
    EatBag,
    ChangeColour { from: Colour, to: Colour },
    NoEvent,
}

impl Event {
    /// Normalized kind used for counting and lookups.
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Move => EventKind::Move,
            Event::RotateLeft => EventKind::RotateLeft,
            Event::RotateRight => EventKind::RotateRight,
            Event::EatFish => EventKind::EatFish,
            Event::EatBag => EventKind::EatBag,
            Event::ChangeColour { .. } => EventKind::ChangeColour,
            Event::NoEvent => EventKind::NoEvent,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::ChangeColour { from, to } => write!(f, "change colour from {} to {}", from, to),
            other => f.write_str(other.kind().label()),
        }
    }
}

impl FromStr for Event {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match EventKind::normalize(s)? {
            EventKind::Move => Ok(Event::Move),
            EventKind::RotateLeft => Ok(Event::RotateLeft),
            EventKind::RotateRight => Ok(Event::RotateRight),
            EventKind::EatFish => Ok(Event::EatFish),
            EventKind::EatBag => Ok(Event::EatBag),
            EventKind::NoEvent => Ok(Event::NoEvent),
            EventKind::ChangeColour => {
                let (from, to) = s
                    .strip_prefix("change colour from ")
                    .and_then(|rest| rest.split_once(" to "))
                    .ok_or_else(|| CoreError::UnknownEvent(s.to_string()))?;
                Ok(Event::ChangeColour {
                    from: from.parse()?,
                    to: to.parse()?,
                })
            }
        }
    }
}

impl From<Event> for String {
    fn from(e: Event) -> Self {
        e.to_string()
    }
}

impl TryFrom<String> for Event {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Event label with colour details stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    Move,
    RotateLeft,
    RotateRight,
    ChangeColour,
    EatFish,
    EatBag,
    NoEvent,
}

impl EventKind {
    pub const ALL: [EventKind; 7] = [
        EventKind::Move,
        EventKind::RotateLeft,
        EventKind::RotateRight,
        EventKind::ChangeColour,
        EventKind::EatFish,
        EventKind::EatBag,
        EventKind::NoEvent,
    ];

    /// Actions followed by effects; every kind a question may name.
    pub const ASKABLE: [EventKind; 6] = [
        EventKind::Move,
        EventKind::RotateLeft,
        EventKind::RotateRight,
        EventKind::ChangeColour,
        EventKind::EatFish,
        EventKind::EatBag,
    ];

    /// Kinds that can be followed by a state-transition question.
    pub const TRANSITION_TRIGGERS: [EventKind; 4] = [
        EventKind::RotateLeft,
        EventKind::RotateRight,
        EventKind::EatFish,
        EventKind::ChangeColour,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Move => "move",
            EventKind::RotateLeft => "rotate left",
            EventKind::RotateRight => "rotate right",
            EventKind::ChangeColour => "change colour",
            EventKind::EatFish => "eat fish",
            EventKind::EatBag => "eat bag",
            EventKind::NoEvent => "no event",
        }
    }

    /// Gerund phrase used in state-transition questions.
    pub fn noun(&self) -> &'static str {
        match self {
            EventKind::Move => "moving",
            EventKind::RotateLeft => "rotating left",
            EventKind::RotateRight => "rotating right",
            EventKind::ChangeColour => "changing colour",
            EventKind::EatFish => "eating a fish",
            EventKind::EatBag => "eating a bag",
            EventKind::NoEvent => "doing nothing",
        }
    }

    /// Kind of a raw persisted label. Labels starting with `change colour`
    /// collapse to [`EventKind::ChangeColour`].
    pub fn normalize(label: &str) -> Result<Self, CoreError> {
        if label.get(..CHANGE_COLOUR_LENGTH) == Some("change colour") {
            return Ok(EventKind::ChangeColour);
        }
        label.parse()
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EventKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .iter()
            .copied()
            .find(|k| k.label() == s)
            .ok_or_else(|| CoreError::UnknownEvent(s.to_string()))
    }
}

/// Primitive octopus action; exactly one per live transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Move,
    RotateLeft,
    RotateRight,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Move, Action::RotateLeft, Action::RotateRight];

    pub fn event(&self) -> Event {
        match self {
            Action::Move => Event::Move,
            Action::RotateLeft => Event::RotateLeft,
            Action::RotateRight => Event::RotateRight,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.event().kind()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind().label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip_through_serde() {
        let events = vec![
            Event::Move,
            Event::EatBag,
            Event::ChangeColour { from: Colour::Red, to: Colour::Green },
        ];
        let json = serde_json::to_string(&events).unwrap();
        assert_eq!(json, r#"["move","eat bag","change colour from red to green"]"#);

        let parsed: Vec<Event> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, events);
    }

    #[test]
    fn test_change_colour_normalizes() {
        assert_eq!(
            EventKind::normalize("change colour from brown to blue").unwrap(),
            EventKind::ChangeColour
        );
        assert_eq!(EventKind::normalize("eat fish").unwrap(), EventKind::EatFish);
        assert!(EventKind::normalize("dance").is_err());
        assert!("change colour from red".parse::<Event>().is_err());
        assert!("change colour".parse::<Event>().is_err());
        assert_eq!(
            "change colour from purple to red".parse::<Event>().unwrap(),
            Event::ChangeColour { from: Colour::Purple, to: Colour::Red }
        );
    }

    #[test]
    fn test_action_kinds() {
        assert_eq!(Action::RotateLeft.to_string(), "rotate left");
        assert_eq!(Action::Move.kind(), EventKind::Move);
    }
}

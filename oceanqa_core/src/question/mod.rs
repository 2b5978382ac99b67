//! Question generation.
//!
//! The template catalog is closed: every [`QuestionTemplate`] pairs with a
//! [`Target`] variant describing the answer dimension it was sampled for.
//! [`templates::realize`] turns a target into a concrete question for one
//! video, [`balance::BalanceCounts`] keeps the dataset-wide counters and
//! [`generator::generate_balanced`] drives the attempt loop.

pub mod balance;
pub mod generator;
pub mod templates;

pub use balance::{BalanceCounts, NestedTally, Tally};
pub use generator::generate_balanced;
pub use templates::realize;

use crate::error::CoreError;
use crate::event::{Action, EventKind};
use crate::geometry::Relation;
use crate::object::{Colour, ObjectClass, PropertyValue};
use std::fmt;

/// The nine question templates. The discriminant is the persisted type id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QuestionTemplate {
    Property = 0,
    Relation = 1,
    Action = 2,
    PropertyChanged = 3,
    RepetitionCount = 4,
    RepeatingAction = 5,
    StateTransition = 6,
    Explanation = 7,
    Counterfactual = 8,
}

impl QuestionTemplate {
    pub const ALL: [QuestionTemplate; 9] = [
        QuestionTemplate::Property,
        QuestionTemplate::Relation,
        QuestionTemplate::Action,
        QuestionTemplate::PropertyChanged,
        QuestionTemplate::RepetitionCount,
        QuestionTemplate::RepeatingAction,
        QuestionTemplate::StateTransition,
        QuestionTemplate::Explanation,
        QuestionTemplate::Counterfactual,
    ];

    pub fn id(&self) -> u8 {
        *self as u8
    }

    pub fn from_id(id: u8) -> Result<Self, CoreError> {
        Self::ALL
            .get(id as usize)
            .copied()
            .ok_or_else(|| CoreError::value(format!("question type {}", id)))
    }

    pub fn name(&self) -> &'static str {
        match self {
            QuestionTemplate::Property => "property",
            QuestionTemplate::Relation => "relation",
            QuestionTemplate::Action => "action",
            QuestionTemplate::PropertyChanged => "property_changed",
            QuestionTemplate::RepetitionCount => "repetition_count",
            QuestionTemplate::RepeatingAction => "repeating_action",
            QuestionTemplate::StateTransition => "state_transition",
            QuestionTemplate::Explanation => "explanation",
            QuestionTemplate::Counterfactual => "counterfactual",
        }
    }
}

impl fmt::Display for QuestionTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Cause of an object disappearing, as given in explanation answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Explanation {
    OctopusAteBag,
    BagEaten,
    FishEaten,
}

impl Explanation {
    pub const ALL: [Explanation; 3] =
        [Explanation::OctopusAteBag, Explanation::BagEaten, Explanation::FishEaten];

    /// Class of the object this explanation applies to.
    pub fn class(&self) -> ObjectClass {
        match self {
            Explanation::OctopusAteBag => ObjectClass::Octopus,
            Explanation::BagEaten => ObjectClass::Bag,
            Explanation::FishEaten => ObjectClass::Fish,
        }
    }

    pub fn answer(&self) -> &'static str {
        match self {
            Explanation::OctopusAteBag => "The octopus ate a bag",
            Explanation::BagEaten => "The bag was eaten",
            Explanation::FishEaten => "The fish was eaten",
        }
    }
}

/// Sampled answer dimension a template must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Object property with the wanted value
    Property(PropertyValue),
    /// Relation and whether it must hold
    Relation { relation: Relation, holds: bool },
    /// Action that must be the answer
    Action(Action),
    /// Octopus property and the value it changes to
    PropertyChanged(PropertyValue),
    /// Event whose count is asked for
    RepetitionCount(EventKind),
    /// Event that must be the answer
    RepeatingAction(EventKind),
    /// Triggering event and the action that follows it
    StateTransition { event: EventKind, action: Action },
    /// Required explanation
    Explanation(Explanation),
    /// Final octopus colour in the counterfactual
    Counterfactual(Colour),
}

impl Target {
    pub fn template(&self) -> QuestionTemplate {
        match self {
            Target::Property(_) => QuestionTemplate::Property,
            Target::Relation { .. } => QuestionTemplate::Relation,
            Target::Action(_) => QuestionTemplate::Action,
            Target::PropertyChanged(_) => QuestionTemplate::PropertyChanged,
            Target::RepetitionCount(_) => QuestionTemplate::RepetitionCount,
            Target::RepeatingAction(_) => QuestionTemplate::RepeatingAction,
            Target::StateTransition { .. } => QuestionTemplate::StateTransition,
            Target::Explanation(_) => QuestionTemplate::Explanation,
            Target::Counterfactual(_) => QuestionTemplate::Counterfactual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_ids() {
        for (idx, template) in QuestionTemplate::ALL.iter().enumerate() {
            assert_eq!(template.id() as usize, idx);
            assert_eq!(QuestionTemplate::from_id(idx as u8).unwrap(), *template);
        }
        assert!(QuestionTemplate::from_id(9).is_err());
    }

    #[test]
    fn test_target_template() {
        let target = Target::StateTransition {
            event: EventKind::EatFish,
            action: Action::Move,
        };
        assert_eq!(target.template(), QuestionTemplate::StateTransition);
        assert_eq!(Explanation::BagEaten.class(), ObjectClass::Bag);
    }
}

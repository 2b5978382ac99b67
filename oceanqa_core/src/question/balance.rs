//! Dataset-wide counters driving inverse-weighted sampling.
//!
//! Every key is weighted by `total - count`, where `total` is the sum of
//! the counts at the same level. Keys that lag behind are picked more
//! often; when all weights are zero the choice is uniform.

use super::{Explanation, QuestionTemplate, Target};
use crate::event::{Action, EventKind};
use crate::geometry::{Relation, Rotation};
use crate::object::{Colour, Property, PropertyValue};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// Picks a key from `(key, count)` pairs with weight `total - count`.
///
/// Returns `None` only for an empty slice.
pub fn sample_inverse_weighted<K: Copy, R: Rng + ?Sized>(
    items: &[(K, u64)],
    rng: &mut R,
) -> Option<K> {
    if items.is_empty() {
        return None;
    }

    let total: u64 = items.iter().map(|(_, c)| c).sum();
    let weights = items.iter().map(|(_, c)| total - c);

    let idx = match WeightedIndex::new(weights) {
        Ok(dist) => dist.sample(rng),
        // Every weight is zero
        Err(_) => rng.gen_range(0..items.len()),
    };
    Some(items[idx].0)
}

/// Flat occurrence counter over a fixed key set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally<K> {
    entries: Vec<(K, u64)>,
}

impl<K: Copy + PartialEq> Tally<K> {
    pub fn new(keys: impl IntoIterator<Item = K>) -> Self {
        Self {
            entries: keys.into_iter().map(|k| (k, 0)).collect(),
        }
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    pub fn count(&self, key: &K) -> u64 {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map_or(0, |(_, c)| *c)
    }

    /// Bumps `key`; unknown keys are ignored and reported as `false`.
    pub fn increment(&mut self, key: &K) -> bool {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, c)) => {
                *c += 1;
                true
            }
            None => false,
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<K> {
        sample_inverse_weighted(&self.entries, rng)
    }

    pub fn entries(&self) -> &[(K, u64)] {
        &self.entries
    }
}

/// Two-level counter: a first key, then a flat tally under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedTally<K1, K2> {
    entries: Vec<(K1, Tally<K2>)>,
}

impl<K1: Copy + PartialEq, K2: Copy + PartialEq> NestedTally<K1, K2> {
    pub fn new(entries: impl IntoIterator<Item = (K1, Tally<K2>)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, t)| t.total()).sum()
    }

    pub fn inner(&self, key: &K1) -> Option<&Tally<K2>> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, t)| t)
    }

    pub fn increment(&mut self, outer: &K1, inner: &K2) -> bool {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == outer)
            .is_some_and(|(_, t)| t.increment(inner))
    }

    /// Samples the first key by its summed inner counts, then an inner key.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(K1, K2)> {
        let outer: Vec<(K1, u64)> = self.entries.iter().map(|(k, t)| (*k, t.total())).collect();
        let key = sample_inverse_weighted(&outer, rng)?;
        let inner = self.inner(&key)?.sample(rng)?;
        Some((key, inner))
    }

    /// Leaf counts across all first keys.
    pub fn leaf_counts(&self) -> Vec<u64> {
        self.entries
            .iter()
            .flat_map(|(_, t)| t.entries().iter().map(|(_, c)| *c))
            .collect()
    }
}

fn property_values(colours: &[Colour]) -> NestedTally<Property, PropertyValue> {
    NestedTally::new([
        (Property::Colour, Tally::new(colours.iter().map(|c| PropertyValue::Colour(*c)))),
        (Property::Rotation, Tally::new(Rotation::ALL.iter().map(|r| PropertyValue::Rotation(*r)))),
    ])
}

/// Running counters for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceCounts {
    pub templates: Tally<QuestionTemplate>,
    pub property: NestedTally<Property, PropertyValue>,
    pub relation: NestedTally<Relation, bool>,
    pub action: Tally<Action>,
    pub property_changed: NestedTally<Property, PropertyValue>,
    pub repetition_count: Tally<EventKind>,
    pub repeating_action: Tally<EventKind>,
    pub state_transition: NestedTally<EventKind, Action>,
    pub explanation: Tally<Explanation>,
    pub counterfactual: Tally<Colour>,
}

impl Default for BalanceCounts {
    fn default() -> Self {
        Self::new()
    }
}

impl BalanceCounts {
    pub fn new() -> Self {
        let mut final_colours = vec![Colour::OCTOPUS];
        final_colours.extend(Colour::ROCKS);

        Self {
            templates: Tally::new(QuestionTemplate::ALL),
            property: property_values(&Colour::ALL),
            relation: NestedTally::new(
                Relation::ALL.iter().map(|r| (*r, Tally::new([true, false]))),
            ),
            action: Tally::new(Action::ALL),
            property_changed: property_values(&Colour::ROCKS),
            repetition_count: Tally::new(EventKind::ASKABLE),
            repeating_action: Tally::new(EventKind::ASKABLE),
            state_transition: NestedTally::new(
                EventKind::TRANSITION_TRIGGERS
                    .iter()
                    .map(|e| (*e, Tally::new(Action::ALL))),
            ),
            explanation: Tally::new(Explanation::ALL),
            counterfactual: Tally::new(final_colours),
        }
    }

    /// Picks the next template to attempt.
    pub fn sample_template<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<QuestionTemplate> {
        self.templates.sample(rng)
    }

    /// Picks a target within `template`'s own dimensions.
    pub fn sample_target<R: Rng + ?Sized>(
        &self,
        template: QuestionTemplate,
        rng: &mut R,
    ) -> Option<Target> {
        let target = match template {
            QuestionTemplate::Property => Target::Property(self.property.sample(rng)?.1),
            QuestionTemplate::Relation => {
                let (relation, holds) = self.relation.sample(rng)?;
                Target::Relation { relation, holds }
            }
            QuestionTemplate::Action => Target::Action(self.action.sample(rng)?),
            QuestionTemplate::PropertyChanged => {
                Target::PropertyChanged(self.property_changed.sample(rng)?.1)
            }
            QuestionTemplate::RepetitionCount => {
                Target::RepetitionCount(self.repetition_count.sample(rng)?)
            }
            QuestionTemplate::RepeatingAction => {
                Target::RepeatingAction(self.repeating_action.sample(rng)?)
            }
            QuestionTemplate::StateTransition => {
                let (event, action) = self.state_transition.sample(rng)?;
                Target::StateTransition { event, action }
            }
            QuestionTemplate::Explanation => Target::Explanation(self.explanation.sample(rng)?),
            QuestionTemplate::Counterfactual => {
                Target::Counterfactual(self.counterfactual.sample(rng)?)
            }
        };
        Some(target)
    }

    /// Samples a template and then one of its targets.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Target> {
        let template = self.sample_template(rng)?;
        self.sample_target(template, rng)
    }

    /// Counts a question realized for `target`.
    pub fn record(&mut self, target: &Target) {
        self.templates.increment(&target.template());
        match *target {
            Target::Property(value) => self.property.increment(&value.property(), &value),
            Target::Relation { relation, holds } => self.relation.increment(&relation, &holds),
            Target::Action(action) => self.action.increment(&action),
            Target::PropertyChanged(value) => {
                self.property_changed.increment(&value.property(), &value)
            }
            Target::RepetitionCount(event) => self.repetition_count.increment(&event),
            Target::RepeatingAction(event) => self.repeating_action.increment(&event),
            Target::StateTransition { event, action } => {
                self.state_transition.increment(&event, &action)
            }
            Target::Explanation(explanation) => self.explanation.increment(&explanation),
            Target::Counterfactual(colour) => self.counterfactual.increment(&colour),
        };
    }

    /// Counts of every answer value recorded for `template`.
    pub fn dimension_counts(&self, template: QuestionTemplate) -> Vec<u64> {
        fn flat<K>(tally: &Tally<K>) -> Vec<u64> {
            tally.entries.iter().map(|(_, c)| *c).collect()
        }

        match template {
            QuestionTemplate::Property => self.property.leaf_counts(),
            QuestionTemplate::Relation => self.relation.leaf_counts(),
            QuestionTemplate::Action => flat(&self.action),
            QuestionTemplate::PropertyChanged => self.property_changed.leaf_counts(),
            QuestionTemplate::RepetitionCount => flat(&self.repetition_count),
            QuestionTemplate::RepeatingAction => flat(&self.repeating_action),
            QuestionTemplate::StateTransition => self.state_transition.leaf_counts(),
            QuestionTemplate::Explanation => flat(&self.explanation),
            QuestionTemplate::Counterfactual => flat(&self.counterfactual),
        }
    }
}

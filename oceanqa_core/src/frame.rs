//! Frames: placement of new objects and the per-step transition rule.
//!
//! A frame is an immutable snapshot. [`Frame::advance`] builds the next
//! snapshot, sharing every untouched static object with its predecessor.

use crate::definitions::{CountRange, SceneConfig};
use crate::error::CoreError;
use crate::event::Event;
use crate::geometry::{close_to, BoundingBox, Rotation};
use crate::object::{Colour, ObjectClass, SceneObject};
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;
use tracing::trace;

/// What the octopus attempts during a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Rotate,
    Move,
}

/// Chooses the step kind from a uniform roll in `[0, 1)`.
pub fn choose_step(roll: f64, rot_prob: f64) -> Step {
    if roll <= rot_prob {
        Step::Rotate
    } else {
        Step::Move
    }
}

/// Direction of a quarter turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Left,
    Right,
}

impl Turn {
    /// Fair coin flip from a uniform roll in `[0, 1)`.
    pub fn from_roll(roll: f64) -> Self {
        if roll < 0.5 {
            Turn::Left
        } else {
            Turn::Right
        }
    }

    fn apply(self, object: &mut SceneObject) -> Event {
        match self {
            Turn::Left => {
                object.rotation = object.rotation.turned_left();
                Event::RotateLeft
            }
            Turn::Right => {
                object.rotation = object.rotation.turned_right();
                Event::RotateRight
            }
        }
    }
}

/// Moves or rotates the octopus in place.
///
/// A move that would push any coordinate out of `[0, frame_size - edge)` is
/// turned into a rotation using `turn`. Other objects never block a move.
pub fn step_octopus(
    octopus: &mut SceneObject,
    step: Step,
    turn: Turn,
    config: &SceneConfig,
) -> Event {
    match step {
        Step::Rotate => turn.apply(octopus),
        Step::Move => {
            let (dx, dy) = octopus.rotation.forward(config.move_pixels);
            let moved = octopus.bbox.translated(dx, dy);
            if moved.inside_canvas(config.max_pixel()) {
                octopus.bbox = moved;
                Event::Move
            } else {
                turn.apply(octopus)
            }
        }
    }
}

/// Pool of unclaimed grid cells used while populating a fresh frame.
#[derive(Debug)]
struct Placer {
    remaining: Vec<(i32, i32)>,
    segment_size: i32,
    edge: i32,
    total: usize,
}

impl Placer {
    fn new(config: &SceneConfig) -> Self {
        let n = config.num_segments;
        let remaining: Vec<(i32, i32)> = (0..n).flat_map(|i| (0..n).map(move |j| (i, j))).collect();
        Self {
            total: remaining.len(),
            remaining,
            segment_size: config.segment_size(),
            edge: config.edge,
        }
    }

    /// Claims a random free cell and places a box of the rotated size inside it.
    fn place<R: Rng + ?Sized>(
        &mut self,
        size: (i32, i32),
        rotation: Rotation,
        rng: &mut R,
    ) -> Result<BoundingBox, CoreError> {
        if self.remaining.is_empty() {
            return Err(CoreError::PlacementExhausted(self.total));
        }
        let (seg_x, seg_y) = self.remaining.swap_remove(rng.gen_range(0..self.remaining.len()));

        let (width, height) = rotation.oriented(size);
        let x_lo = seg_x * self.segment_size + self.edge;
        let x_hi = (seg_x + 1) * self.segment_size - (width + self.edge);
        let y_lo = seg_y * self.segment_size + self.edge;
        let y_hi = (seg_y + 1) * self.segment_size - (height + self.edge);
        if x_hi < x_lo || y_hi < y_lo {
            return Err(CoreError::config(format!(
                "{}x{} object does not fit a {}px cell",
                width, height, self.segment_size
            )));
        }

        let x = rng.gen_range(x_lo..=x_hi);
        let y = rng.gen_range(y_lo..=y_hi);
        Ok(BoundingBox::from_origin(x, y, width, height))
    }

    fn spawn<R: Rng + ?Sized>(
        &mut self,
        class: ObjectClass,
        rng: &mut R,
    ) -> Result<SceneObject, CoreError> {
        let (rotation, colour) = match class {
            ObjectClass::Octopus => (random_rotation(rng), Colour::OCTOPUS),
            ObjectClass::Fish => (random_rotation(rng), Colour::FISH),
            ObjectClass::Bag => (random_rotation(rng), Colour::BAG),
            ObjectClass::Rock => (Rotation::Up, random_rock_colour(rng)),
        };
        let bbox = self.place(class.size(), rotation, rng)?;
        Ok(SceneObject::new(class, bbox, colour, rotation))
    }
}

fn random_rotation<R: Rng + ?Sized>(rng: &mut R) -> Rotation {
    *Rotation::ALL.choose(rng).unwrap_or(&Rotation::Up)
}

fn random_rock_colour<R: Rng + ?Sized>(rng: &mut R) -> Colour {
    *Colour::ROCKS.choose(rng).unwrap_or(&Colour::Brown)
}

/// One time slice of a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    static_objects: Vec<Arc<SceneObject>>,
    octopus: Option<SceneObject>,
}

impl Frame {
    /// Builds a frame from explicit objects.
    ///
    /// Fails if an octopus appears among the static objects or the octopus
    /// slot holds another class.
    pub fn new(
        static_objects: Vec<SceneObject>,
        octopus: Option<SceneObject>,
    ) -> Result<Self, CoreError> {
        if let Some(obj) = static_objects.iter().find(|o| o.class == ObjectClass::Octopus) {
            return Err(CoreError::UnknownObjectType(format!(
                "static {} at {:?}",
                obj.class, obj.bbox
            )));
        }
        if let Some(octo) = octopus.as_ref().filter(|o| o.class != ObjectClass::Octopus) {
            return Err(CoreError::UnknownObjectType(format!("{} in the octopus slot", octo.class)));
        }

        Ok(Self {
            static_objects: static_objects.into_iter().map(Arc::new).collect(),
            octopus,
        })
    }

    /// Populates a fresh frame with one octopus and random fish, bags and rocks.
    pub fn random<R: Rng + ?Sized>(config: &SceneConfig, rng: &mut R) -> Result<Self, CoreError> {
        config.validate()?;
        let mut placer = Placer::new(config);

        let octopus = placer.spawn(ObjectClass::Octopus, rng)?;

        let mut static_objects = Vec::new();
        for (class, range) in [
            (ObjectClass::Fish, config.fish),
            (ObjectClass::Bag, config.bags),
            (ObjectClass::Rock, config.rocks),
        ] {
            for _ in 0..sample_count(range, rng) {
                static_objects.push(Arc::new(placer.spawn(class, rng)?));
            }
        }

        Ok(Self {
            static_objects,
            octopus: Some(octopus),
        })
    }

    pub fn octopus(&self) -> Option<&SceneObject> {
        self.octopus.as_ref()
    }

    pub fn static_objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.static_objects.iter().map(|o| o.as_ref())
    }

    /// All objects, static ones first and the octopus last.
    pub fn objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.static_objects().chain(self.octopus.iter())
    }

    pub fn len(&self) -> usize {
        self.static_objects.len() + usize::from(self.octopus.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shares `self`'s static object with `other` (same allocation).
    #[cfg(test)]
    pub fn shares_static_object(&self, other: &Frame, index: usize) -> bool {
        match (self.static_objects.get(index), other.static_objects.get(index)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Produces the next frame and the events of this transition.
    ///
    /// Interaction events come in static-object order; the octopus's own
    /// move or rotate event is always last. Once the octopus is gone every
    /// transition is `no event`.
    pub fn advance<R: Rng + ?Sized>(
        &self,
        config: &SceneConfig,
        rng: &mut R,
    ) -> Result<(Frame, Vec<Event>), CoreError> {
        let Some(current) = self.octopus.as_ref() else {
            return Ok((self.clone(), vec![Event::NoEvent]));
        };

        let step = choose_step(rng.gen::<f64>(), config.rot_prob);
        let turn = Turn::from_roll(rng.gen::<f64>());

        let mut octopus = current.clone();
        let action = step_octopus(&mut octopus, step, turn, config);

        let (next, mut events) = self.interact(octopus, config.close_margin)?;
        events.push(action);
        Ok((next, events))
    }

    /// Resolves contact between a repositioned octopus and the static objects.
    fn interact(
        &self,
        mut octopus: SceneObject,
        margin: i32,
    ) -> Result<(Frame, Vec<Event>), CoreError> {
        let close: Vec<bool> = self
            .static_objects
            .iter()
            .map(|obj| close_to(&octopus.bbox, &obj.bbox, margin))
            .collect();

        // Strict comparison keeps the first rock on distance ties
        let mut nearest_rock: Option<(usize, f64)> = None;
        for (idx, obj) in self.static_objects.iter().enumerate() {
            if close[idx] && obj.class == ObjectClass::Rock {
                let dist = obj.bbox.centre_distance(&octopus.bbox);
                if nearest_rock.map_or(true, |(_, best)| dist < best) {
                    nearest_rock = Some((idx, dist));
                }
            }
        }

        let mut events = Vec::new();
        let mut kept = Vec::with_capacity(self.static_objects.len());
        let mut bag_eaten = false;

        for (idx, obj) in self.static_objects.iter().enumerate() {
            if !close[idx] {
                kept.push(Arc::clone(obj));
                continue;
            }

            match obj.class {
                ObjectClass::Fish => events.push(Event::EatFish),
                ObjectClass::Bag if !bag_eaten => {
                    bag_eaten = true;
                    events.push(Event::EatBag);
                }
                ObjectClass::Bag => kept.push(Arc::clone(obj)),
                ObjectClass::Rock => {
                    if nearest_rock.map(|(i, _)| i) == Some(idx) {
                        events.push(Event::ChangeColour {
                            from: octopus.colour,
                            to: obj.colour,
                        });
                        octopus.colour = obj.colour;
                    }
                    kept.push(Arc::clone(obj));
                }
                ObjectClass::Octopus => {
                    return Err(CoreError::UnknownObjectType(format!(
                        "static {} at {:?}",
                        obj.class, obj.bbox
                    )));
                }
            }
        }

        if !events.is_empty() {
            trace!(?events, "octopus interacted");
        }

        let next = Frame {
            static_objects: kept,
            octopus: if bag_eaten { None } else { Some(octopus) },
        };
        Ok((next, events))
    }
}

fn sample_count<R: Rng + ?Sized>(range: CountRange, rng: &mut R) -> usize {
    rng.gen_range(range.min..=range.max)
}

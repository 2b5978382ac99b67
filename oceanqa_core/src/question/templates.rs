//! Per-template question builders.
//!
//! Each builder looks for a question in one video that matches the sampled
//! [`Target`] and whose text the video does not already hold. `None` means
//! the video cannot satisfy the target.

use super::{Explanation, Target};
use crate::definitions::{SceneConfig, MAX_OCCURRENCE};
use crate::event::{Action, EventKind};
use crate::frame::Frame;
use crate::geometry::Relation;
use crate::object::{Colour, ObjectClass, Property, PropertyValue, SceneObject};
use crate::video::Video;
use rand::seq::SliceRandom;
use rand::Rng;

/// Builds a `(question, answer)` pair for `target` from `video`.
pub fn realize<R: Rng + ?Sized>(
    video: &Video,
    target: &Target,
    scene: &SceneConfig,
    rng: &mut R,
) -> Option<(String, String)> {
    match *target {
        Target::Property(value) => property(video, value, rng),
        Target::Relation { relation, holds } => {
            relation_between(video, relation, holds, scene.close_margin, rng)
        }
        Target::Action(action) => action_after(video, action, rng),
        Target::PropertyChanged(value) => property_changed(video, value, rng),
        Target::RepetitionCount(event) => repetition_count(video, event),
        Target::RepeatingAction(event) => repeating_action(video, event),
        Target::StateTransition { event, action } => state_transition(video, event, action, rng),
        Target::Explanation(explanation) => explanation_for(video, explanation, rng),
        Target::Counterfactual(colour) => counterfactual(video, colour, rng),
    }
}

/// Property singling `obj` out among `objs`, if any.
///
/// Only objects of the same class at a different position compete. A lone
/// object of its class is identified by class; otherwise a unique colour or
/// rotation is used, chosen at random when both are unique.
pub fn identifying_property<'a, R, I>(obj: &SceneObject, objs: I, rng: &mut R) -> Option<Property>
where
    R: Rng + ?Sized,
    I: IntoIterator<Item = &'a SceneObject>,
{
    let mut unique_class = true;
    let mut unique_colour = true;
    let mut unique_rotation = true;

    for other in objs {
        if other.class == obj.class && other.is_distinct_from(obj) {
            unique_class = false;
            unique_colour &= other.colour != obj.colour;
            unique_rotation &= other.rotation != obj.rotation;
        }
    }

    if unique_class {
        return Some(Property::Class);
    }

    let candidates: Vec<Property> =
        [(unique_colour, Property::Colour), (unique_rotation, Property::Rotation)]
            .into_iter()
            .filter_map(|(unique, prop)| unique.then_some(prop))
            .collect();
    candidates.choose(rng).copied()
}

/// Every object of `frame` that can be referred to unambiguously, with its phrase.
pub fn unique_objects<'f, R: Rng + ?Sized>(
    frame: &'f Frame,
    rng: &mut R,
) -> Vec<(&'f SceneObject, String)> {
    frame
        .objects()
        .filter_map(|obj| {
            identifying_property(obj, frame.objects(), rng).map(|prop| (obj, obj.describe(prop)))
        })
        .collect()
}

fn shuffled_indices<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<usize> {
    let mut idxs: Vec<usize> = (0..len).collect();
    idxs.shuffle(rng);
    idxs
}

/// `What <property> was the <object> in frame <i>?`
fn property<R: Rng + ?Sized>(
    video: &Video,
    value: PropertyValue,
    rng: &mut R,
) -> Option<(String, String)> {
    let prop = value.property();

    for frame_idx in shuffled_indices(video.num_frames(), rng) {
        let mut candidates = unique_objects(&video.frames()[frame_idx], rng);
        candidates.shuffle(rng);

        for (obj, phrase) in candidates {
            if obj.value_of(prop).ok() != Some(value) {
                continue;
            }
            let question = format!("What {} was the {} in frame {}?", prop, phrase, frame_idx);
            if !video.has_question(&question) {
                return Some((question, value.to_string()));
            }
        }
    }
    None
}

/// `Was the <object> <relation> the <object> in frame <i>?`
///
/// Uses the first frame (in random order) holding any pair with the wanted
/// answer, then tries that frame's pairs only.
fn relation_between<R: Rng + ?Sized>(
    video: &Video,
    relation: Relation,
    holds: bool,
    margin: i32,
    rng: &mut R,
) -> Option<(String, String)> {
    let mut found = None;
    for frame_idx in shuffled_indices(video.num_frames(), rng) {
        let objs = unique_objects(&video.frames()[frame_idx], rng);
        let pairs: Vec<(String, String)> = objs
            .iter()
            .flat_map(|(a, a_str)| objs.iter().map(move |(b, b_str)| (a, a_str, b, b_str)))
            .filter(|(a, a_str, b, b_str)| {
                a_str != b_str && relation.holds(&a.bbox, &b.bbox, margin) == holds
            })
            .map(|(_, a_str, _, b_str)| (a_str.clone(), b_str.clone()))
            .collect();

        if !pairs.is_empty() {
            found = Some((frame_idx, pairs));
            break;
        }
    }

    let (frame_idx, mut pairs) = found?;
    pairs.shuffle(rng);
    let answer = if holds { "yes" } else { "no" };

    pairs.into_iter().find_map(|(a, b)| {
        let question = format!("Was the {} {} the {} in frame {}?", a, relation, b, frame_idx);
        (!video.has_question(&question)).then(|| (question, answer.to_string()))
    })
}

/// `Which action occurred immediately after frame <i>?`
fn action_after<R: Rng + ?Sized>(
    video: &Video,
    action: Action,
    rng: &mut R,
) -> Option<(String, String)> {
    let mut idxs: Vec<usize> = video
        .events()
        .iter()
        .enumerate()
        .filter(|(_, events)| events.contains(&action.event()))
        .map(|(idx, _)| idx)
        .collect();
    idxs.shuffle(rng);

    idxs.into_iter().find_map(|idx| {
        let question = format!("Which action occurred immediately after frame {}?", idx);
        (!video.has_question(&question)).then(|| (question, action.to_string()))
    })
}

/// `What happened to the octopus immediately after frame <i>?`
///
/// Only the sampled property is compared, so a transition that also changed
/// the other property still answers for this one.
fn property_changed<R: Rng + ?Sized>(
    video: &Video,
    value: PropertyValue,
    rng: &mut R,
) -> Option<(String, String)> {
    let first = video.frames()[0].octopus()?;
    let mut previous = first.value_of(value.property()).ok()?;

    let mut deltas: Vec<(usize, PropertyValue)> = Vec::new();
    for (idx, frame) in video.frames()[1..].iter().enumerate() {
        let Some(octopus) = frame.octopus() else {
            continue;
        };
        let current = octopus.value_of(value.property()).ok()?;
        if current != previous && current == value {
            deltas.push((idx, previous));
        }
        previous = current;
    }
    deltas.shuffle(rng);

    let phrase = first.describe(Property::Class);
    deltas.into_iter().find_map(|(idx, before)| {
        let question = format!("What happened to the {} immediately after frame {}?", phrase, idx);
        let answer = format!("Its {} changed from {} to {}", value.property(), before, value);
        (!video.has_question(&question)).then_some((question, answer))
    })
}

/// `How many times does the octopus <event>?`
fn repetition_count(video: &Video, event: EventKind) -> Option<(String, String)> {
    let count = video.event_counts().get(&event).copied().unwrap_or(0);
    if count == 0 {
        return None;
    }

    let question = format!("How many times does the octopus {}?", event);
    (!video.has_question(&question)).then(|| (question, count.to_string()))
}

/// `What does the octopus do <n> times?`
///
/// `n` must not be shared with any other event kind.
fn repeating_action(video: &Video, event: EventKind) -> Option<(String, String)> {
    let counts = video.event_counts();
    let count = counts.get(&event).copied().unwrap_or(0);
    if count == 0 || counts.values().filter(|c| **c == count).count() > 1 {
        return None;
    }

    let question = format!("What does the octopus do {} times?", count);
    (!video.has_question(&question)).then(|| (question, event.to_string()))
}

/// Ordinal suffix for the `occurrence`-th event, empty for a single occurrence.
fn occurrence_suffix(occurrence: usize, single: bool) -> Option<String> {
    if single {
        return Some(String::new());
    }
    let ordinal = match occurrence {
        1 => "first",
        2 => "second",
        3 => "third",
        4 => "fourth",
        5 => "fifth",
        _ => return None,
    };
    Some(format!(" for the {} time", ordinal))
}

/// `What does the octopus do immediately after <event>[ for the <nth> time]?`
fn state_transition<R: Rng + ?Sized>(
    video: &Video,
    event: EventKind,
    action: Action,
    rng: &mut R,
) -> Option<(String, String)> {
    let occurrences = video.occurrences(event);
    let events = video.events();

    let mut usable: Vec<usize> = occurrences
        .iter()
        .enumerate()
        .filter(|(nth, transition)| {
            *nth < MAX_OCCURRENCE
                && events
                    .get(**transition + 1)
                    .is_some_and(|next| next.contains(&action.event()))
        })
        .map(|(nth, _)| nth)
        .collect();
    usable.shuffle(rng);

    let single = occurrences.len() == 1;
    usable.into_iter().find_map(|nth| {
        let suffix = occurrence_suffix(nth + 1, single)?;
        let question =
            format!("What does the octopus do immediately after {}{}?", event.noun(), suffix);
        (!video.has_question(&question)).then(|| (question, action.to_string()))
    })
}

/// `Why did the <rotation> object disappear?`
fn explanation_for<R: Rng + ?Sized>(
    video: &Video,
    explanation: Explanation,
    rng: &mut R,
) -> Option<(String, String)> {
    let gone: Vec<&SceneObject> =
        video.disappeared_objects().into_iter().map(|(obj, _)| obj).collect();

    let mut candidates: Vec<&SceneObject> = gone
        .iter()
        .copied()
        .filter(|obj| obj.class == explanation.class())
        .filter(|obj| {
            !gone
                .iter()
                .any(|other| other.rotation == obj.rotation && other.is_distinct_from(obj))
        })
        .collect();
    candidates.shuffle(rng);

    candidates.into_iter().find_map(|obj| {
        let question = format!("Why did the {} object disappear?", obj.rotation);
        (!video.has_question(&question)).then(|| (question, explanation.answer().to_string()))
    })
}

/// Octopus colour at the end of the video if the rock of `rock_colour` were absent.
pub fn colour_without_rock(video: &Video, rock_colour: Colour) -> Colour {
    video
        .colour_changes()
        .into_iter()
        .map(|(_, _, to)| to)
        .filter(|to| *to != rock_colour)
        .last()
        .unwrap_or(Colour::OCTOPUS)
}

/// `What colour would the octopus be in its final frame without the <colour> rock?`
fn counterfactual<R: Rng + ?Sized>(
    video: &Video,
    answer: Colour,
    rng: &mut R,
) -> Option<(String, String)> {
    let rocks: Vec<&SceneObject> = video.frames()[0]
        .static_objects()
        .filter(|obj| obj.class == ObjectClass::Rock)
        .collect();

    let mut colours: Vec<Colour> = rocks
        .iter()
        .filter(|rock| {
            !rocks
                .iter()
                .any(|other| other.colour == rock.colour && other.is_distinct_from(rock))
        })
        .map(|rock| rock.colour)
        .collect();
    colours.shuffle(rng);

    colours.into_iter().find_map(|rock_colour| {
        if colour_without_rock(video, rock_colour) != answer {
            return None;
        }
        let question = format!(
            "What colour would the octopus be in its final frame without the {} rock?",
            rock_colour
        );
        (!video.has_question(&question)).then(|| (question, answer.to_string()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;
    use crate::geometry::{BoundingBox, Rotation};
    use crate::question::QuestionTemplate;
    use crate::video::Question;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn obj(class: ObjectClass, x: i32, y: i32, colour: Colour, rotation: Rotation) -> SceneObject {
        let (w, h) = rotation.oriented(class.size());
        SceneObject::new(class, BoundingBox::from_origin(x, y, w, h), colour, rotation)
    }

    fn octo(x: i32, y: i32, colour: Colour, rotation: Rotation) -> SceneObject {
        obj(ObjectClass::Octopus, x, y, colour, rotation)
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(11)
    }

    /// Four frames: the octopus turns blue near a blue rock, eats a fish,
    /// rotates, then eats a bag.
    fn scripted_video() -> Video {
        let blue = obj(ObjectClass::Rock, 60, 20, Colour::Blue, Rotation::Up);
        let green = obj(ObjectClass::Rock, 200, 200, Colour::Green, Rotation::Up);
        let fish = obj(ObjectClass::Fish, 60, 60, Colour::Silver, Rotation::Up);
        let bag = obj(ObjectClass::Bag, 90, 60, Colour::White, Rotation::Left);

        let frames = vec![
            Frame::new(
                vec![fish.clone(), bag.clone(), blue.clone(), green.clone()],
                Some(octo(40, 40, Colour::Red, Rotation::Right)),
            )
            .unwrap(),
            Frame::new(
                vec![fish.clone(), bag.clone(), blue.clone(), green.clone()],
                Some(octo(55, 40, Colour::Blue, Rotation::Right)),
            )
            .unwrap(),
            Frame::new(
                vec![bag.clone(), blue.clone(), green.clone()],
                Some(octo(55, 40, Colour::Blue, Rotation::Down)),
            )
            .unwrap(),
            Frame::new(vec![blue, green], None).unwrap(),
        ];
        let events = vec![
            vec![Event::ChangeColour { from: Colour::Red, to: Colour::Blue }, Event::Move],
            vec![Event::EatFish, Event::RotateRight],
            vec![Event::EatBag, Event::Move],
        ];
        Video::from_parts(frames, events).unwrap()
    }

    #[test]
    fn test_identifying_property_cases() {
        let mut rng = rng();
        let octopus = octo(10, 100, Colour::Red, Rotation::Left);
        let bag = obj(ObjectClass::Bag, 50, 100, Colour::White, Rotation::Left);
        let rock = obj(ObjectClass::Rock, 70, 200, Colour::Blue, Rotation::Up);
        let fish = obj(ObjectClass::Fish, 200, 100, Colour::Silver, Rotation::Right);
        let other_bag = obj(ObjectClass::Bag, 220, 100, Colour::White, Rotation::Right);
        let purple_rock = obj(ObjectClass::Rock, 150, 100, Colour::Purple, Rotation::Up);
        let twin_bag = obj(ObjectClass::Bag, 200, 150, Colour::White, Rotation::Left);

        let all = [octopus.clone(), bag.clone(), rock.clone(), fish];
        assert_eq!(identifying_property(&octopus, &all, &mut rng), Some(Property::Class));
        assert_eq!(identifying_property(&bag, &all, &mut rng), Some(Property::Class));

        let bags = [octopus, bag.clone(), other_bag];
        assert_eq!(identifying_property(&bag, &bags, &mut rng), Some(Property::Rotation));

        let rocks = [rock.clone(), purple_rock];
        assert_eq!(identifying_property(&rock, &rocks, &mut rng), Some(Property::Colour));

        let twins = [bag.clone(), twin_bag];
        assert_eq!(identifying_property(&bag, &twins, &mut rng), None);
    }

    #[test]
    fn test_both_unique_properties_get_picked() {
        let mut rng = rng();
        let fish = obj(ObjectClass::Fish, 10, 10, Colour::Silver, Rotation::Up);
        // Same class, different colour and rotation
        let rival = obj(ObjectClass::Fish, 100, 10, Colour::Blue, Rotation::Down);
        let pool = [fish.clone(), rival];

        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            seen.insert(identifying_property(&fish, &pool, &mut rng));
        }
        assert_eq!(seen.len(), 2);
        assert!(seen.contains(&Some(Property::Colour)));
        assert!(seen.contains(&Some(Property::Rotation)));
    }

    #[test]
    fn test_property_question() {
        let video = scripted_video();
        let (q, a) = property(&video, PropertyValue::Colour(Colour::Green), &mut rng()).unwrap();
        assert!(q.starts_with("What colour was the green rock in frame "));
        assert_eq!(a, "green");

        let (q, a) = property(&video, PropertyValue::Rotation(Rotation::Left), &mut rng()).unwrap();
        assert!(q.starts_with("What rotation was the bag in frame "));
        assert_eq!(a, "left-facing");

        assert!(property(&video, PropertyValue::Colour(Colour::Purple), &mut rng()).is_none());
    }

    #[test]
    fn test_relation_question() {
        let video = scripted_video();
        let (q, a) = relation_between(&video, Relation::Above, true, 5, &mut rng()).unwrap();
        assert!(q.starts_with("Was the ") && q.contains(" above the "));
        assert_eq!(a, "yes");

        let (_, a) = relation_between(&video, Relation::CloseTo, false, 5, &mut rng()).unwrap();
        assert_eq!(a, "no");
    }

    #[test]
    fn test_action_question() {
        let video = scripted_video();
        let (q, a) = action_after(&video, Action::RotateRight, &mut rng()).unwrap();
        assert_eq!(q, "Which action occurred immediately after frame 1?");
        assert_eq!(a, "rotate right");
        assert!(action_after(&video, Action::RotateLeft, &mut rng()).is_none());
    }

    #[test]
    fn test_action_question_skips_existing_text() {
        let mut video = scripted_video();
        video.add_question(Question::new(
            "Which action occurred immediately after frame 1?",
            QuestionTemplate::Action,
            "rotate right",
        ));
        assert!(action_after(&video, Action::RotateRight, &mut rng()).is_none());
    }

    #[test]
    fn test_property_changed_question() {
        let video = scripted_video();
        let blue = PropertyValue::Colour(Colour::Blue);
        let (q, a) = property_changed(&video, blue, &mut rng()).unwrap();
        assert_eq!(q, "What happened to the octopus immediately after frame 0?");
        assert_eq!(a, "Its colour changed from red to blue");

        let down = PropertyValue::Rotation(Rotation::Down);
        let (q, a) = property_changed(&video, down, &mut rng()).unwrap();
        assert_eq!(q, "What happened to the octopus immediately after frame 1?");
        assert_eq!(a, "Its rotation changed from right-facing to downward-facing");
    }

    #[test]
    fn test_property_changed_with_both_properties_changing() {
        let rock = obj(ObjectClass::Rock, 200, 200, Colour::Green, Rotation::Up);
        let before = octo(40, 40, Colour::Red, Rotation::Right);
        let after = octo(40, 40, Colour::Green, Rotation::Up);
        let frames = vec![
            Frame::new(vec![rock.clone()], Some(before)).unwrap(),
            Frame::new(vec![rock], Some(after)).unwrap(),
        ];
        let events = vec![vec![
            Event::ChangeColour { from: Colour::Red, to: Colour::Green },
            Event::RotateLeft,
        ]];
        let video = Video::from_parts(frames, events).unwrap();

        let green = PropertyValue::Colour(Colour::Green);
        let (q, a) = property_changed(&video, green, &mut rng()).unwrap();
        assert_eq!(q, "What happened to the octopus immediately after frame 0?");
        assert_eq!(a, "Its colour changed from red to green");

        let up = PropertyValue::Rotation(Rotation::Up);
        let (_, a) = property_changed(&video, up, &mut rng()).unwrap();
        assert_eq!(a, "Its rotation changed from right-facing to upward-facing");
    }

    #[test]
    fn test_count_questions() {
        let video = scripted_video();
        let (q, a) = repetition_count(&video, EventKind::Move).unwrap();
        assert_eq!(q, "How many times does the octopus move?");
        assert_eq!(a, "2");
        assert!(repetition_count(&video, EventKind::RotateLeft).is_none());

        let (q, a) = repeating_action(&video, EventKind::Move).unwrap();
        assert_eq!(q, "What does the octopus do 2 times?");
        assert_eq!(a, "move");

        // Eat fish, eat bag, change colour and rotate right all happen once
        assert!(repeating_action(&video, EventKind::EatFish).is_none());
    }

    #[test]
    fn test_state_transition_question() {
        let video = scripted_video();
        let (q, a) =
            state_transition(&video, EventKind::EatFish, Action::Move, &mut rng()).unwrap();
        assert_eq!(q, "What does the octopus do immediately after eating a fish?");
        assert_eq!(a, "move");

        // Changing colour is followed by a rotation, not a move
        let changed = EventKind::ChangeColour;
        assert!(state_transition(&video, changed, Action::Move, &mut rng()).is_none());
        assert!(state_transition(&video, changed, Action::RotateRight, &mut rng()).is_some());
    }

    #[test]
    fn test_occurrence_suffix() {
        assert_eq!(occurrence_suffix(1, true).unwrap(), "");
        assert_eq!(occurrence_suffix(3, false).unwrap(), " for the third time");
        assert!(occurrence_suffix(MAX_OCCURRENCE + 1, false).is_none());
    }

    #[test]
    fn test_explanation_question() {
        let video = scripted_video();
        let (q, a) = explanation_for(&video, Explanation::FishEaten, &mut rng()).unwrap();
        assert_eq!(q, "Why did the upward-facing object disappear?");
        assert_eq!(a, "The fish was eaten");

        let (q, a) = explanation_for(&video, Explanation::OctopusAteBag, &mut rng()).unwrap();
        assert_eq!(q, "Why did the downward-facing object disappear?");
        assert_eq!(a, "The octopus ate a bag");

        let (q, a) = explanation_for(&video, Explanation::BagEaten, &mut rng()).unwrap();
        assert_eq!(q, "Why did the left-facing object disappear?");
        assert_eq!(a, "The bag was eaten");
    }

    #[test]
    fn test_explanation_needs_unique_rotation() {
        let fish = obj(ObjectClass::Fish, 60, 60, Colour::Silver, Rotation::Left);
        let bag = obj(ObjectClass::Bag, 90, 60, Colour::White, Rotation::Left);
        let frames = vec![
            Frame::new(vec![fish, bag], Some(octo(40, 40, Colour::Red, Rotation::Right))).unwrap(),
            Frame::new(vec![], Some(octo(40, 40, Colour::Red, Rotation::Right))).unwrap(),
        ];
        let video = Video::from_parts(frames, vec![vec![Event::EatFish, Event::EatBag]]).unwrap();
        assert!(explanation_for(&video, Explanation::FishEaten, &mut rng()).is_none());
        assert!(explanation_for(&video, Explanation::BagEaten, &mut rng()).is_none());
    }

    #[test]
    fn test_counterfactual_question() {
        let video = scripted_video();
        assert_eq!(colour_without_rock(&video, Colour::Blue), Colour::Red);
        assert_eq!(colour_without_rock(&video, Colour::Green), Colour::Blue);

        let (q, a) = counterfactual(&video, Colour::Red, &mut rng()).unwrap();
        assert_eq!(q, "What colour would the octopus be in its final frame without the blue rock?");
        assert_eq!(a, "red");

        let (q, _) = counterfactual(&video, Colour::Blue, &mut rng()).unwrap();
        assert!(q.contains("without the green rock"));
        assert!(counterfactual(&video, Colour::Purple, &mut rng()).is_none());
    }

    #[test]
    fn test_realize_dispatches_by_target() {
        let video = scripted_video();
        let scene = SceneConfig::default();
        let target = Target::RepetitionCount(EventKind::EatBag);
        let (q, _) = realize(&video, &target, &scene, &mut rng()).unwrap();
        assert_eq!(q, "How many times does the octopus eat bag?");
    }
}

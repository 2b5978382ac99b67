//! Videos: fixed-length frame sequences with their event history.

use crate::definitions::SceneConfig;
use crate::error::CoreError;
use crate::event::{Event, EventKind};
use crate::frame::Frame;
use crate::object::{Colour, ObjectClass, SceneObject};
use crate::question::QuestionTemplate;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;

/// A generated question with its answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub text: String,
    pub template: QuestionTemplate,
    pub answer: String,
}

impl Question {
    pub fn new(
        text: impl Into<String>,
        template: QuestionTemplate,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            template,
            answer: answer.into(),
        }
    }
}

/// A simulated scene.
///
/// `events[i]` holds what happened between `frames[i]` and `frames[i + 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Video {
    frames: Vec<Frame>,
    events: Vec<Vec<Event>>,
    questions: Vec<Question>,
}

impl Video {
    /// Simulates `config.num_frames` frames from a random initial frame.
    pub fn simulate<R: Rng + ?Sized>(config: &SceneConfig, rng: &mut R) -> Result<Self, CoreError> {
        let initial = Frame::random(config, rng)?;

        let mut frames = Vec::with_capacity(config.num_frames);
        let mut events = Vec::with_capacity(config.num_frames - 1);
        frames.push(initial);

        for _ in 1..config.num_frames {
            let (next, step_events) = frames[frames.len() - 1].advance(config, rng)?;
            frames.push(next);
            events.push(step_events);
        }

        Ok(Self {
            frames,
            events,
            questions: Vec::new(),
        })
    }

    /// Assembles a video from existing frames and events.
    pub fn from_parts(frames: Vec<Frame>, events: Vec<Vec<Event>>) -> Result<Self, CoreError> {
        if frames.is_empty() || events.len() + 1 != frames.len() {
            return Err(CoreError::config(format!(
                "{} frames need {} event lists, got {}",
                frames.len(),
                frames.len().saturating_sub(1),
                events.len()
            )));
        }
        if frames[0].octopus().is_none() {
            return Err(CoreError::config("the first frame has no octopus"));
        }

        Ok(Self {
            frames,
            events,
            questions: Vec::new(),
        })
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn events(&self) -> &[Vec<Event>] {
        &self.events
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn has_question(&self, text: &str) -> bool {
        self.questions.iter().any(|q| q.text == text)
    }

    /// Records `question` unless its text is already present. Returns whether it was added.
    pub fn add_question(&mut self, question: Question) -> bool {
        if self.has_question(&question.text) {
            return false;
        }
        self.questions.push(question);
        true
    }

    pub fn shuffle_questions<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.questions.shuffle(rng);
    }

    /// Occurrences of every event kind, zero counts included.
    pub fn event_counts(&self) -> BTreeMap<EventKind, usize> {
        let mut counts: BTreeMap<EventKind, usize> =
            EventKind::ALL.iter().map(|k| (*k, 0)).collect();
        for event in self.events.iter().flatten() {
            *counts.entry(event.kind()).or_insert(0) += 1;
        }
        counts
    }

    /// Transition index of each occurrence of `kind`, in order.
    ///
    /// A kind happening twice in one transition is listed twice.
    pub fn occurrences(&self, kind: EventKind) -> Vec<usize> {
        self.events
            .iter()
            .enumerate()
            .flat_map(|(idx, events)| {
                events.iter().filter(move |e| e.kind() == kind).map(move |_| idx)
            })
            .collect()
    }

    /// Observed octopus colour changes as `(transition, from, to)`.
    pub fn colour_changes(&self) -> Vec<(usize, Colour, Colour)> {
        let mut changes = Vec::new();
        let Some(mut current) = self.frames[0].octopus().map(|o| o.colour) else {
            return changes;
        };

        for (idx, frame) in self.frames[1..].iter().enumerate() {
            if let Some(octopus) = frame.octopus() {
                if octopus.colour != current {
                    changes.push((idx, current, octopus.colour));
                    current = octopus.colour;
                }
            }
        }
        changes
    }

    /// Objects present in one frame and missing from the next, with the
    /// transition index at which they vanished.
    pub fn disappeared_objects(&self) -> Vec<(&SceneObject, usize)> {
        let mut gone = Vec::new();
        for (idx, pair) in self.frames.windows(2).enumerate() {
            for obj in pair[0].objects() {
                let survives = pair[1].objects().any(|next| {
                    (obj.class == ObjectClass::Octopus && next.class == ObjectClass::Octopus)
                        || obj.bbox == next.bbox
                });
                if !survives {
                    gone.push((obj, idx));
                }
            }
        }
        gone
    }
}

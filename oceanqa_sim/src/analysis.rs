//! Distribution summaries over a written dataset.

use oceanqa_core::{EventKind, ObjectClass, QuestionTemplate, VideoRecord};
use std::collections::BTreeMap;
use std::fmt;
use tracing::info;

/// Occurrence counts of labelled values against a common denominator.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub title: String,
    pub rows: Vec<(String, usize)>,
    /// Denominator for the frequency column
    pub total: usize,
    /// What `total` counts, e.g. `frames`
    pub unit: &'static str,
}

impl Histogram {
    fn from_counts<K: fmt::Display>(
        title: &str,
        counts: BTreeMap<K, usize>,
        total: usize,
        unit: &'static str,
    ) -> Self {
        Self {
            title: title.to_string(),
            rows: counts.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
            total,
            unit,
        }
    }

    pub fn count(&self, label: &str) -> usize {
        self.rows
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, c)| *c)
            .unwrap_or(0)
    }

    /// Percentage of `total` covered by `count`.
    pub fn frequency(&self, count: usize) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        count as f64 / self.total as f64 * 100.0
    }

    pub fn log(&self) {
        info!("{:<20}{:<15}Frequency", self.title, "Occurrences");
        for (label, count) in &self.rows {
            info!("{:<20}{:<15}{:.3}%", label, count, self.frequency(*count));
        }
        info!("Total number of {}: {}", self.unit, self.total);
    }
}

/// Event kinds over all transitions. Colour changes are counted as one kind.
pub fn count_events(videos: &[VideoRecord]) -> Histogram {
    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut transitions = 0;

    for video in videos {
        transitions += video.events.len();
        for event in video.events.iter().flatten() {
            *counts.entry(event.kind().label()).or_insert(0) += 1;
        }
    }
    Histogram::from_counts("Event name", counts, transitions, "frame changes")
}

fn count_frame_objects<F>(
    videos: &[VideoRecord],
    class: ObjectClass,
    title: &str,
    key: F,
) -> Histogram
where
    F: Fn(&oceanqa_core::ObjectRecord) -> String,
{
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut frames = 0;

    for frame in videos.iter().flat_map(|v| &v.frames) {
        frames += 1;
        for obj in frame.objects.iter().filter(|o| o.class == class) {
            *counts.entry(key(obj)).or_insert(0) += 1;
        }
    }
    Histogram::from_counts(title, counts, frames, "frames")
}

/// Rock and octopus colours over all frames.
pub fn count_colours(videos: &[VideoRecord]) -> (Histogram, Histogram) {
    (
        count_frame_objects(videos, ObjectClass::Rock, "Rock colour", |o| o.colour.to_string()),
        count_frame_objects(videos, ObjectClass::Octopus, "Octopus colour", |o| {
            o.colour.to_string()
        }),
    )
}

/// Octopus rotations over all frames.
pub fn count_rotations(videos: &[VideoRecord]) -> Histogram {
    count_frame_objects(videos, ObjectClass::Octopus, "Octopus rotations", |o| {
        o.rotation.to_string()
    })
}

/// Number of videos by how many fish the octopus ate.
pub fn count_fish_eaten(videos: &[VideoRecord]) -> Histogram {
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for video in videos {
        let eaten = video
            .events
            .iter()
            .filter(|events| events.iter().any(|e| e.kind() == EventKind::EatFish))
            .count();
        *counts.entry(eaten).or_insert(0) += 1;
    }
    Histogram::from_counts("Fish eaten", counts, videos.len(), "videos")
}

/// Questions per template.
pub fn count_questions(videos: &[VideoRecord]) -> Histogram {
    let mut counts: BTreeMap<u8, usize> = BTreeMap::new();
    for id in videos.iter().flat_map(|v| &v.question_types) {
        *counts.entry(*id).or_insert(0) += 1;
    }
    let total = counts.values().sum();

    let mut hist = Histogram::from_counts("Question Type", counts, total, "questions");
    for (label, _) in hist.rows.iter_mut() {
        let template = label.parse::<u8>().ok().and_then(|id| QuestionTemplate::from_id(id).ok());
        if let Some(template) = template {
            *label = format!("{} ({})", label, template);
        }
    }
    hist
}

/// Which summaries to produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub events: bool,
    pub colours: bool,
    pub rotations: bool,
    pub fish: bool,
    pub questions: bool,
}

impl AnalysisOptions {
    pub fn all() -> Self {
        Self {
            events: true,
            colours: true,
            rotations: true,
            fish: true,
            questions: true,
        }
    }

    pub fn any(&self) -> bool {
        self.events || self.colours || self.rotations || self.fish || self.questions
    }
}

/// Computes the selected summaries in a fixed order.
pub fn analyse(videos: &[VideoRecord], options: AnalysisOptions) -> Vec<Histogram> {
    let mut out = Vec::new();
    if options.events {
        info!("Analysing event occurrences...");
        out.push(count_events(videos));
    }
    if options.colours {
        info!("Analysing object colours...");
        let (rocks, octopus) = count_colours(videos);
        out.push(rocks);
        out.push(octopus);
    }
    if options.rotations {
        info!("Analysing octopus rotations...");
        out.push(count_rotations(videos));
    }
    if options.fish {
        info!("Analysing number of fish eaten...");
        out.push(count_fish_eaten(videos));
    }
    if options.questions {
        info!("Analysing question distribution...");
        out.push(count_questions(videos));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use oceanqa_core::{BoundingBox, Colour, Event, FrameRecord, ObjectRecord, Rotation};

    fn object(class: ObjectClass, colour: Colour, rotation: Rotation) -> ObjectRecord {
        ObjectRecord {
            position: BoundingBox::new(0, 0, 10, 10),
            class,
            colour,
            rotation,
        }
    }

    fn video(events: Vec<Vec<Event>>, question_types: Vec<u8>) -> VideoRecord {
        let frame = FrameRecord {
            objects: vec![
                object(ObjectClass::Rock, Colour::Blue, Rotation::Up),
                object(ObjectClass::Rock, Colour::Green, Rotation::Up),
                object(ObjectClass::Octopus, Colour::Red, Rotation::Left),
            ],
        };
        let n = question_types.len();
        VideoRecord {
            frames: vec![frame; events.len() + 1],
            events,
            questions: vec![String::new(); n],
            answers: vec![String::new(); n],
            question_types,
        }
    }

    fn sample() -> Vec<VideoRecord> {
        vec![
            video(
                vec![
                    vec![Event::EatFish, Event::Move],
                    vec![
                        Event::ChangeColour { from: Colour::Red, to: Colour::Blue },
                        Event::RotateLeft,
                    ],
                ],
                vec![0, 4, 4],
            ),
            video(vec![vec![Event::Move]], vec![8]),
        ]
    }

    #[test]
    fn test_event_histogram() {
        let hist = count_events(&sample());
        assert_eq!(hist.total, 3);
        assert_eq!(hist.count("move"), 2);
        assert_eq!(hist.count("change colour"), 1);
        assert_relative_eq!(hist.frequency(2), 200.0 / 3.0);
    }

    #[test]
    fn test_colour_and_rotation_histograms() {
        let (rocks, octopus) = count_colours(&sample());
        assert_eq!(rocks.total, 5);
        assert_eq!(rocks.count("blue"), 5);
        assert_eq!(octopus.count("red"), 5);
        assert_eq!(count_rotations(&sample()).count("left-facing"), 5);
    }

    #[test]
    fn test_fish_and_question_histograms() {
        let fish = count_fish_eaten(&sample());
        assert_eq!(fish.rows, vec![("0".to_string(), 1), ("1".to_string(), 1)]);

        let questions = count_questions(&sample());
        assert_eq!(questions.total, 4);
        assert_eq!(questions.count("4 (repetition_count)"), 2);
        assert_relative_eq!(questions.frequency(2), 50.0);
    }

    #[test]
    fn test_selected_summaries() {
        assert!(analyse(&sample(), AnalysisOptions::default()).is_empty());
        assert_eq!(analyse(&sample(), AnalysisOptions::all()).len(), 6);
        assert!(!AnalysisOptions::default().any());
    }

    #[test]
    fn test_empty_dataset() {
        let hist = count_events(&[]);
        assert_eq!(hist.total, 0);
        assert_eq!(hist.frequency(0), 0.0);
    }
}

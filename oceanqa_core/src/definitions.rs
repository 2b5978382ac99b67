//! Scene catalog constants and run configuration.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// Number of frames in every video.
pub const NUM_FRAMES: usize = 32;

/// Width and height of the square canvas in pixels.
pub const FRAME_SIZE: i32 = 256;

/// Grid cells per canvas axis used for initial placement.
pub const NUM_SEGMENTS: i32 = 8;

/// Margin kept free between an object and its cell or the canvas edge.
pub const EDGE: i32 = 3;

/// Margin added around the octopus for the proximity test.
pub const CLOSE_OCTO: i32 = 5;

/// Probability that the octopus rotates instead of trying to move.
pub const ROT_PROB: f64 = 0.1;

/// Pixels covered by one forward move.
pub const MOVE_PIXELS: i32 = 15;

/// Upright (width, height) of each object class.
pub const OCTOPUS_SIZE: (i32, i32) = (17, 17);
pub const FISH_SIZE: (i32, i32) = (9, 11);
pub const BAG_SIZE: (i32, i32) = (11, 15);
pub const ROCK_SIZE: (i32, i32) = (12, 12);

/// Minimum number of questions a video needs to stay in the dataset.
pub const MIN_QUESTIONS: usize = 2;

/// Default question attempts per video.
pub const ATTEMPTS_PER_VIDEO: usize = 4;

/// Highest event occurrence a state-transition question may refer to.
pub const MAX_OCCURRENCE: usize = 5;

/// Length of the `change colour` prefix shared by every colour event label.
pub const CHANGE_COLOUR_LENGTH: usize = 13;

/// Inclusive object count range for one class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: usize,
    pub max: usize,
}

impl CountRange {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }
}

/// Configuration for scene simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Frames per video
    pub num_frames: usize,

    /// Canvas side length in pixels
    pub frame_size: i32,

    /// Placement grid cells per axis
    pub num_segments: i32,

    /// Edge margin in pixels
    pub edge: i32,

    /// Proximity margin around the octopus
    pub close_margin: i32,

    /// Probability of a voluntary rotation per step
    pub rot_prob: f64,

    /// Forward move distance in pixels
    pub move_pixels: i32,

    /// Number of fish per scene
    pub fish: CountRange,

    /// Number of bags per scene
    pub bags: CountRange,

    /// Number of rocks per scene
    pub rocks: CountRange,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            num_frames: NUM_FRAMES,
            frame_size: FRAME_SIZE,
            num_segments: NUM_SEGMENTS,
            edge: EDGE,
            close_margin: CLOSE_OCTO,
            rot_prob: ROT_PROB,
            move_pixels: MOVE_PIXELS,
            fish: CountRange::new(5, 8),
            bags: CountRange::new(2, 3),
            rocks: CountRange::new(5, 6),
        }
    }
}

impl SceneConfig {
    /// Side length of one placement cell.
    pub fn segment_size(&self) -> i32 {
        self.frame_size / self.num_segments
    }

    /// Largest coordinate (exclusive) an object may occupy.
    pub fn max_pixel(&self) -> i32 {
        self.frame_size - self.edge
    }

    /// Checks that every scene this config describes can be placed.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.num_frames < 2 {
            return Err(CoreError::config("a video needs at least two frames"));
        }
        if self.num_segments <= 0 || self.frame_size <= 0 {
            return Err(CoreError::config("canvas and grid must be non-empty"));
        }
        if !(0.0..=1.0).contains(&self.rot_prob) {
            return Err(CoreError::config(format!(
                "rotation probability {} outside [0, 1]",
                self.rot_prob
            )));
        }

        for (name, range) in [("fish", self.fish), ("bag", self.bags), ("rock", self.rocks)] {
            if range.min > range.max {
                return Err(CoreError::config(format!(
                    "{} count range {}..={} is empty",
                    name, range.min, range.max
                )));
            }
        }

        let cells = self.num_segments.checked_mul(self.num_segments).ok_or_else(|| {
            CoreError::config(format!("{} segments overflow the grid", self.num_segments))
        })? as usize;
        let max_objects = [self.fish.max, self.bags.max, self.rocks.max]
            .iter()
            .try_fold(1usize, |total, n| total.checked_add(*n))
            .ok_or_else(|| CoreError::config("object counts overflow"))?;
        if max_objects > cells {
            return Err(CoreError::config(format!(
                "{} objects requested but only {} placement cells",
                max_objects, cells
            )));
        }

        let largest = [OCTOPUS_SIZE, FISH_SIZE, BAG_SIZE, ROCK_SIZE]
            .iter()
            .map(|(w, h)| (*w).max(*h))
            .max()
            .unwrap_or(0);
        if largest.saturating_add(self.edge.saturating_mul(2)) > self.segment_size() {
            return Err(CoreError::config(format!(
                "placement cell of {}px cannot hold a {}px object",
                self.segment_size(),
                largest
            )));
        }

        Ok(())
    }
}

/// Configuration for question generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QaConfig {
    /// Total sampling attempts (None = `ATTEMPTS_PER_VIDEO` x videos)
    pub attempts: Option<usize>,

    /// Videos with fewer questions are dropped
    pub min_questions: usize,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            attempts: None,
            min_questions: MIN_QUESTIONS,
        }
    }
}

impl QaConfig {
    /// Resolves the attempt budget for a pool of `num_videos`.
    pub fn attempts_for(&self, num_videos: usize) -> usize {
        self.attempts.unwrap_or(num_videos * ATTEMPTS_PER_VIDEO)
    }
}

//! A pool of simulated videos and the question generation run over it.

use crate::definitions::{QaConfig, SceneConfig};
use crate::error::CoreError;
use crate::question::{generate_balanced, BalanceCounts};
use crate::record::VideoRecord;
use crate::video::Video;
use rand::Rng;
use tracing::{debug, info, warn};

/// Outcome of one [`Dataset::generate_questions`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// Sampling attempts made
    pub attempts: usize,

    /// Attempts that added a question
    pub successes: usize,

    /// Videos kept after filtering
    pub kept: usize,

    /// Videos dropped for holding too few questions
    pub dropped: usize,

    /// Final balancing counters
    pub counts: BalanceCounts,
}

impl GenerationReport {
    pub fn success_rate(&self) -> f64 {
        if self.attempts == 0 {
            return 0.0;
        }
        self.successes as f64 / self.attempts as f64
    }
}

/// Ordered videos sharing one scene configuration.
#[derive(Debug, Clone)]
pub struct Dataset {
    videos: Vec<Video>,
    scene: SceneConfig,
}

impl Dataset {
    /// Wraps already built videos.
    pub fn new(videos: Vec<Video>, scene: SceneConfig) -> Self {
        Self { videos, scene }
    }

    /// Simulates `num_videos` independent videos.
    pub fn simulate<R: Rng + ?Sized>(
        num_videos: usize,
        scene: &SceneConfig,
        rng: &mut R,
    ) -> Result<Self, CoreError> {
        scene.validate()?;

        let mut videos = Vec::with_capacity(num_videos);
        for idx in 0..num_videos {
            let video = Video::simulate(scene, rng)?;
            debug!(video = idx, events = video.events().len(), "simulated video");
            videos.push(video);
        }
        info!("Simulated {} videos", videos.len());

        Ok(Self::new(videos, scene.clone()))
    }

    /// Runs balanced question generation, then drops videos holding fewer
    /// than `config.min_questions` questions and shuffles the questions of
    /// the rest.
    pub fn generate_questions<R: Rng + ?Sized>(
        &mut self,
        config: &QaConfig,
        rng: &mut R,
    ) -> GenerationReport {
        let attempts = config.attempts_for(self.videos.len());
        let mut counts = BalanceCounts::new();

        info!("Generating questions: {} attempts over {} videos", attempts, self.videos.len());
        let successes =
            generate_balanced(&mut self.videos, &mut counts, attempts, &self.scene, rng);

        let before = self.videos.len();
        self.videos.retain(|video| video.questions().len() >= config.min_questions);
        let dropped = before - self.videos.len();

        for video in &mut self.videos {
            video.shuffle_questions(rng);
        }

        if dropped > 0 {
            warn!(
                "Dropped {} of {} videos with fewer than {} questions",
                dropped, before, config.min_questions
            );
        }
        info!(
            "Question generation complete: {}/{} attempts succeeded, {} videos kept",
            successes,
            attempts,
            self.videos.len()
        );

        GenerationReport {
            attempts,
            successes,
            kept: self.videos.len(),
            dropped,
            counts,
        }
    }

    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    pub fn scene(&self) -> &SceneConfig {
        &self.scene
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    /// Persisted form of every video, in order.
    pub fn records(&self) -> Vec<VideoRecord> {
        self.videos.iter().map(VideoRecord::from).collect()
    }
}

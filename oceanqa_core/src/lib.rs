//! OceanQA Core - Octopus Scene Simulation and Balanced Question Generation
//!
//! This library builds the labeled scenes behind a video question-answering
//! benchmark:
//! 1. **Scene Engine**: an octopus wanders among fish, bags and rocks; every
//!    transition moves or rotates it and resolves eating and colour events
//! 2. **Question Engine**: nine question templates sampled with inverse
//!    weighting so answer values stay balanced across the whole dataset
//!
//! # Usage
//!
//! ```ignore
//! use oceanqa_core::{Dataset, QaConfig, SceneConfig};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let mut dataset = Dataset::simulate(100, &SceneConfig::default(), &mut rng)?;
//! let report = dataset.generate_questions(&QaConfig::default(), &mut rng);
//! ```

pub mod definitions;
pub mod error;
pub mod geometry;
pub mod object;
pub mod event;
pub mod frame;
pub mod video;
pub mod record;
pub mod question;
pub mod dataset;

// Re-export key types for convenience
pub use definitions::{QaConfig, SceneConfig};
pub use error::CoreError;
pub use geometry::BoundingBox;
pub use object::{Colour, ObjectClass, Property, Rotation, SceneObject};
pub use event::{Action, Event, EventKind};
pub use frame::Frame;
pub use video::{Question, Video};
pub use record::{FrameRecord, ObjectRecord, VideoRecord};
pub use question::{BalanceCounts, QuestionTemplate, Target};
pub use dataset::{Dataset, GenerationReport};

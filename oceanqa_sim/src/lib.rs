//! OceanQA dataset build harness
//!
//! Turns the scene and question engines of `oceanqa_core` into files on disk.
//! Every random stream derives from a single 64-bit seed, so a build is fully
//! reproducible from `(seed, config)`.
//!
//! # Pipeline
//!
//! ```text
//!  seed ──► RunContext ──┬─► scene rng ────► Dataset::simulate
//!                        ├─► question rng ─► Dataset::generate_questions
//!                        └─► split rng ────► Partition::split
//!                                                  │
//!                    <out>/{train,val,test}/<n>/video.json
//!                                                  │
//!                                 render ──► frame_<i>.png
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use oceanqa_sim::{build_json, render_dataset, BuildConfig};
//!
//! let config = BuildConfig {
//!     seed: 42,
//!     num_videos: 100,
//!     ..Default::default()
//! };
//! build_json(Path::new("data"), &config)?;
//! render_dataset(Path::new("data"))?;
//! ```

mod context;
mod builder;
pub mod analysis;
pub mod error;
pub mod render;
pub mod split;
pub mod writer;

pub use context::RunContext;
pub use builder::{build_json, BuildConfig, BuildSummary, ConfigFile};
pub use analysis::{analyse, AnalysisOptions, Histogram};
pub use error::{Result, SimError};
pub use render::{render_dataset, render_frame, RenderStats};
pub use split::{Partition, Split};
pub use writer::{read_dataset, write_dataset};

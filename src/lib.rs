//! Pattern-aware difficulty analysis for two-lane rhythm game charts.
//!
//! The pipeline runs strictly forward:
//!
//! 1. [`analysis::segmentation`] cuts the note stream into classified segments.
//! 2. [`analysis::classifier`] groups segments into raw patterns.
//! 3. [`analysis::merger`] stitches split Other and Slow Stretch runs back together.
//! 4. [`difficulty::scorer`] scores every pattern.
//! 5. [`difficulty::calculate_difficulty`] combines the pattern scores with the
//!    note density into the final `(weighting, difficulty, weighted_difficulty)`.
//!
//! ```no_run
//! use mapalyzr::{AnalysisConfig, calculate_difficulty, chart};
//! use std::path::Path;
//!
//! let chart = chart::load_koreography(Path::new("song.json")).unwrap();
//! let report = calculate_difficulty(&chart, &AnalysisConfig::default()).unwrap();
//! println!("{}", report.score.weighted_difficulty);
//! ```

pub mod analysis;
pub mod batch;
pub mod chart;
pub mod config;
pub mod difficulty;
pub mod error;
pub mod models;

pub use config::AnalysisConfig;
pub use difficulty::{ChartReport, DifficultyScore, calculate_difficulty};
pub use error::AnalysisError;
pub use models::{Chart, Lane, Note};

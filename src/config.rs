//! Analysis configuration.
//!
//! Every tuning knob of the pipeline lives here. The config is a plain value
//! handed to the classifier and scorer, so independent analyses never share
//! mutable state. All fields have defaults, which means a TOML file only
//! needs to list the values it overrides:
//!
//! ```toml
//! [segments]
//! short_interval_nps = 6.0
//!
//! [curves.even_circles]
//! lower_bound = 1.0
//! upper_bound = 1.6
//! ```
//!
//! Curve tables are replaced whole, so both bounds must be given.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Load a TOML file and deserialize it
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, String> {
    let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
    match toml::from_str(&content) {
        Ok(data) => Ok(data),
        Err(e) => {
            log::error!("Failed to parse TOML file {:?}: {}", path, e);
            Err(e.to_string())
        }
    }
}

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub segments: SegmentConfig,
    pub patterns: PatternConfig,
    pub density: DensityConfig,
    pub scoring: ScoringConfig,
    pub curves: CurveConfig,
}

impl AnalysisConfig {
    /// Loads a configuration file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, String> {
        load_toml(path).map_err(|e| format!("Failed to load config {:?}: {}", path, e))
    }

    /// Serializes the configuration, e.g. to write out a starter file.
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| e.to_string())
    }
}

/// Converts a millisecond duration into samples.
pub fn ms_to_samples(ms: f64, sample_rate: u32) -> f64 {
    ms * sample_rate as f64 / 1000.0
}

/// Segment classification thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentConfig {
    /// At or above this speed a pair is a zig zag or a stream.
    pub short_interval_nps: f64,
    pub med_interval_nps: f64,
    /// Below this speed a pair is a long interval.
    pub long_interval_nps: f64,
    /// Max deviation between two gaps for them to extend the same segment.
    pub tolerance_ms: f64,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            short_interval_nps: 5.0,
            med_interval_nps: 2.5,
            long_interval_nps: 1.0,
            tolerance_ms: 10.0,
        }
    }
}

impl SegmentConfig {
    pub fn tolerance_samples(&self, sample_rate: u32) -> f64 {
        ms_to_samples(self.tolerance_ms, sample_rate)
    }
}

/// Pattern recognition tolerances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternConfig {
    #[serde(default = "default_pattern_tolerance_ms")]
    pub tolerance_ms: u64,
}

fn default_pattern_tolerance_ms() -> u64 {
    20
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            tolerance_ms: default_pattern_tolerance_ms(),
        }
    }
}

impl PatternConfig {
    /// Tolerance in whole samples (floored).
    pub fn tolerance_samples(&self, sample_rate: u32) -> u64 {
        self.tolerance_ms * sample_rate as u64 / 1000
    }
}

/// Parameters of a weighted top-average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopWeighting {
    /// Fraction of values (highest first) that receive `top_weight`.
    pub top_percentage: f64,
    pub top_weight: f64,
    pub bottom_weight: f64,
}

impl Default for TopWeighting {
    fn default() -> Self {
        Self {
            top_percentage: 0.3,
            top_weight: 0.7,
            bottom_weight: 0.3,
        }
    }
}

/// Note density (base difficulty) settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DensityConfig {
    /// Width of one counting window, in seconds.
    pub window_secs: f64,
    /// Number of windows in the trailing moving average.
    pub moving_avg_window: usize,
    pub aggregation: TopWeighting,
}

impl Default for DensityConfig {
    fn default() -> Self {
        Self {
            window_secs: 1.0,
            moving_avg_window: 5,
            aggregation: TopWeighting::default(),
        }
    }
}

/// Debuffs applied to entropy when a pattern contains intervals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntervalDebuffs {
    pub short: f64,
    pub med: f64,
    pub long: f64,
    /// Extra factor for an interval sitting at either end of a pattern.
    pub end_extra: f64,
}

impl Default for IntervalDebuffs {
    fn default() -> Self {
        Self {
            short: 0.7,
            med: 0.6,
            long: 0.4,
            end_extra: 0.8,
        }
    }
}

/// Constant multipliers for segments inside an Other pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtherMultipliers {
    pub switch: f64,
    pub short_interval: f64,
    pub med_interval: f64,
    pub long_interval: f64,
}

impl Default for OtherMultipliers {
    fn default() -> Self {
        Self {
            switch: 1.0,
            short_interval: 0.9,
            med_interval: 0.8,
            long_interval: 0.7,
        }
    }
}

/// How per-pattern scores are built and aggregated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub variation_weighting: f64,
    pub pattern_weighting: f64,
    /// Split used by VaryingStacks and NothingButTheory (speed over variety).
    pub stack_variation_weighting: f64,
    pub stack_pattern_weighting: f64,
    /// Aggregation of per-pattern scores into the chart weighting.
    pub pattern_aggregation: TopWeighting,
    /// Aggregation of per-segment multipliers inside an Other pattern.
    pub other_aggregation: TopWeighting,
    pub interval_debuffs: IntervalDebuffs,
    pub other_multipliers: OtherMultipliers,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            variation_weighting: 0.5,
            pattern_weighting: 0.5,
            stack_variation_weighting: 0.2,
            stack_pattern_weighting: 0.8,
            pattern_aggregation: TopWeighting {
                top_percentage: 0.4,
                top_weight: 0.75,
                bottom_weight: 0.25,
            },
            other_aggregation: TopWeighting::default(),
            interval_debuffs: IntervalDebuffs::default(),
            other_multipliers: OtherMultipliers::default(),
        }
    }
}

/// Curve whose input is normalized against a fixed NPS ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundedCurve {
    pub lower_bound: f64,
    pub upper_bound: f64,
}

/// Curve whose input is clamped between two NPS (or note count) values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClampedCurve {
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub lower_clamp: f64,
    pub upper_clamp: f64,
}

impl ClampedCurve {
    pub const fn new(lower_bound: f64, upper_bound: f64, lower_clamp: f64, upper_clamp: f64) -> Self {
        Self {
            lower_bound,
            upper_bound,
            lower_clamp,
            upper_clamp,
        }
    }
}

/// Multiplier curve parameters, one entry per pattern or segment type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveConfig {
    pub even_circles: BoundedCurve,
    pub skewed_circles: BoundedCurve,
    pub varying_stacks: ClampedCurve,
    pub nothing_but_theory: ClampedCurve,
    pub zig_zag: ClampedCurve,
    pub two_stack: ClampedCurve,
    pub three_stack: ClampedCurve,
    pub four_stack: ClampedCurve,
    pub single_stream: ClampedCurve,
    /// Chunk multiplier over the chunk's note count.
    pub stream_length: ClampedCurve,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            even_circles: BoundedCurve {
                lower_bound: 1.0,
                upper_bound: 1.55,
            },
            skewed_circles: BoundedCurve {
                lower_bound: 1.0,
                upper_bound: 1.75,
            },
            varying_stacks: ClampedCurve::new(1.0, 2.0, 2.5, 20.5),
            nothing_but_theory: ClampedCurve::new(1.0, 2.0, 2.5, 21.5),
            zig_zag: ClampedCurve::new(1.0, 2.0, 6.0, 18.0),
            two_stack: ClampedCurve::new(1.0, 1.4, 4.0, 14.0),
            three_stack: ClampedCurve::new(1.0, 1.5, 4.0, 14.0),
            four_stack: ClampedCurve::new(1.0, 1.6, 4.0, 14.0),
            single_stream: ClampedCurve::new(1.0, 1.3, 6.5, 12.0),
            stream_length: ClampedCurve::new(1.0, 1.2, 20.0, 200.0),
        }
    }
}

//! Engine configuration with documented defaults
//!
//! Timing bounds, cell defaults and channel sizing are collected here.
//! Values can be overridden from a TOML file; any section or key left out
//! keeps its default.

use serde::{Deserialize, Serialize};

use crate::cell::types::Instrument;
use crate::core::error::{EchoError, Result};

/// Top-level configuration shared by every room a manager creates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub timing: TimingConfig,
    pub cells: CellDefaults,
    pub broadcast: BroadcastConfig,
}

/// Tick period settings for a freshly created room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Delay between ticks when a room is created (milliseconds)
    pub default_delay_ms: u64,

    /// Smallest delay a participant may request
    pub min_delay_ms: u64,

    /// Largest delay a participant may request
    pub max_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            default_delay_ms: 500,
            min_delay_ms: 200,
            max_delay_ms: 1000,
        }
    }
}

/// Payload defaults used when an edit creates a new cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellDefaults {
    /// Octave of a freshly typed note (single digit, 0-9)
    pub default_octave: u8,

    pub default_instrument: Instrument,

    pub metronome_ticks_per_beat: u32,

    pub note_adjuster_ticks_per_beat: u32,

    /// Length of every triggered note, in beats
    ///
    /// Notes have no per-cell length yet; every hit is a quarter beat.
    pub note_duration_beats: f64,
}

impl Default for CellDefaults {
    fn default() -> Self {
        Self {
            default_octave: 4,
            default_instrument: Instrument::Synth,
            metronome_ticks_per_beat: 4,
            note_adjuster_ticks_per_beat: 4,
            note_duration_beats: 0.25,
        }
    }
}

/// Sizing of the per-room event channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BroadcastConfig {
    /// Events buffered per room before slow subscribers start lagging
    pub channel_capacity: usize,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self { channel_capacity: 64 }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn load_from_toml(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse and validate configuration from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let timing = &self.timing;
        if timing.min_delay_ms == 0 {
            return Err(EchoError::Config("min_delay_ms must be positive".into()));
        }

        // Bounds must bracket the default
        if timing.min_delay_ms > timing.default_delay_ms
            || timing.default_delay_ms > timing.max_delay_ms
        {
            return Err(EchoError::Config(format!(
                "delay bounds must satisfy min ({}) <= default ({}) <= max ({})",
                timing.min_delay_ms, timing.default_delay_ms, timing.max_delay_ms
            )));
        }

        let cells = &self.cells;
        if cells.default_octave > 9 {
            return Err(EchoError::Config(format!(
                "default_octave ({}) must be a single digit",
                cells.default_octave
            )));
        }
        if cells.metronome_ticks_per_beat == 0 || cells.note_adjuster_ticks_per_beat == 0 {
            return Err(EchoError::Config("ticks_per_beat defaults must be positive".into()));
        }
        if cells.note_duration_beats.is_nan() || cells.note_duration_beats <= 0.0 {
            return Err(EchoError::Config("note_duration_beats must be positive".into()));
        }

        if self.broadcast.channel_capacity == 0 {
            return Err(EchoError::Config("channel_capacity must be positive".into()));
        }

        Ok(())
    }
}

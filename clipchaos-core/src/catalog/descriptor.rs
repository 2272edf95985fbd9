use rand::Rng;
use serde::{Deserialize, Serialize};

/// Closed set of effect identifiers.
///
/// Declaration order is the catalog order, which is also the order effects are
/// considered during planning and therefore applied in. The order matters:
/// effects do not commute (reverse-then-speed differs from speed-then-reverse).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectId {
    /// Invert video colors (`negate`).
    Invert,
    /// Horizontal mirror (`hflip`).
    Mirror,
    /// Reverse video and audio.
    Reverse,
    /// Speed the clip up or down, keeping audio pitch-corrected via `atempo`.
    Speed,
    /// Repeat the whole clip back-to-back, frame-precise.
    StutterLoop,
    /// Shuffle frames within short windows.
    FrameShuffle,
    /// Chorus-ish audio smear via `aecho`.
    Chorus,
    /// Massive audio gain; clipping is the point.
    Earrape,
    /// Resample-based pitch bend (approximate by design).
    PitchBend,
    /// Composite the rainbow overlay image over the video.
    RainbowOverlay,
    /// Mix a short SFX clip into the audio track.
    SfxBlast,
}

impl EffectId {
    /// Stable snake_case name, used as the config key and in log/error text.
    pub fn name(self) -> &'static str {
        match self {
            EffectId::Invert => "invert",
            EffectId::Mirror => "mirror",
            EffectId::Reverse => "reverse",
            EffectId::Speed => "speed",
            EffectId::StutterLoop => "stutter_loop",
            EffectId::FrameShuffle => "frame_shuffle",
            EffectId::Chorus => "chorus",
            EffectId::Earrape => "earrape",
            EffectId::PitchBend => "pitch_bend",
            EffectId::RainbowOverlay => "rainbow_overlay",
            EffectId::SfxBlast => "sfx_blast",
        }
    }

    /// Parse a config key back into an identifier.
    pub fn from_name(name: &str) -> Option<Self> {
        CATALOG.iter().map(|d| d.id).find(|id| id.name() == name)
    }
}

impl std::fmt::Display for EffectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// How a step is executed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionKind {
    /// One ffmpeg invocation with a filter expression.
    Filter,
    /// Extract frames, reorder/duplicate them, reassemble.
    FrameOps,
}

/// Inclusive bounds a level is drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelRange {
    /// Discrete level, drawn uniformly from `min..=max`.
    Int {
        /// Lower inclusive bound.
        min: i64,
        /// Upper inclusive bound.
        max: i64,
    },
    /// Continuous level, drawn uniformly from `min..=max`.
    Float {
        /// Lower inclusive bound.
        min: f64,
        /// Upper inclusive bound.
        max: f64,
    },
}

impl LevelRange {
    /// Draw a level uniformly from the range.
    pub fn draw<R: Rng>(&self, rng: &mut R) -> Level {
        match *self {
            LevelRange::Int { min, max } => Level::Int(rng.gen_range(min..=max)),
            LevelRange::Float { min, max } => Level::Float(rng.gen_range(min..=max)),
        }
    }

    /// `true` when the bounds are finite and ordered.
    pub fn is_valid(&self) -> bool {
        match *self {
            LevelRange::Int { min, max } => min <= max,
            LevelRange::Float { min, max } => {
                min.is_finite() && max.is_finite() && min <= max
            }
        }
    }
}

/// A concrete chosen level.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// Discrete level.
    Int(i64),
    /// Continuous level.
    Float(f64),
}

impl Level {
    /// The level as a float.
    pub fn as_f64(self) -> f64 {
        match self {
            Level::Int(v) => v as f64,
            Level::Float(v) => v,
        }
    }

    /// The level as an integer (floats round to nearest).
    pub fn as_i64(self) -> i64 {
        match self {
            Level::Int(v) => v,
            Level::Float(v) => v.round() as i64,
        }
    }
}

/// Static description of one effect: identity, execution strategy, and the
/// defaults a settings document may override.
#[derive(Clone, Copy, Debug)]
pub struct EffectDescriptor {
    /// Effect identity.
    pub id: EffectId,
    /// Execution strategy.
    pub kind: ExecutionKind,
    /// Enabled unless the settings document says otherwise.
    pub enabled: bool,
    /// Default inclusion probability in [0.0, 1.0].
    pub probability: f64,
    /// Default level bounds; `None` for effects without an intensity knob.
    pub level: Option<LevelRange>,
}

/// The effect catalog, in application order. Immutable, defined at process
/// start, never mutated.
pub const CATALOG: &[EffectDescriptor] = &[
    EffectDescriptor {
        id: EffectId::Invert,
        kind: ExecutionKind::Filter,
        enabled: true,
        probability: 0.25,
        level: None,
    },
    EffectDescriptor {
        id: EffectId::Mirror,
        kind: ExecutionKind::Filter,
        enabled: true,
        probability: 0.20,
        level: None,
    },
    EffectDescriptor {
        id: EffectId::Reverse,
        kind: ExecutionKind::Filter,
        enabled: true,
        probability: 0.15,
        level: None,
    },
    EffectDescriptor {
        id: EffectId::Speed,
        kind: ExecutionKind::Filter,
        enabled: true,
        probability: 0.25,
        level: Some(LevelRange::Float { min: 0.5, max: 2.0 }),
    },
    EffectDescriptor {
        id: EffectId::StutterLoop,
        kind: ExecutionKind::FrameOps,
        enabled: true,
        probability: 0.20,
        level: Some(LevelRange::Int { min: 2, max: 4 }),
    },
    EffectDescriptor {
        id: EffectId::FrameShuffle,
        kind: ExecutionKind::FrameOps,
        enabled: true,
        probability: 0.10,
        level: Some(LevelRange::Int { min: 4, max: 32 }),
    },
    EffectDescriptor {
        id: EffectId::Chorus,
        kind: ExecutionKind::Filter,
        enabled: true,
        probability: 0.10,
        level: Some(LevelRange::Float { min: 0.2, max: 0.5 }),
    },
    EffectDescriptor {
        id: EffectId::Earrape,
        kind: ExecutionKind::Filter,
        enabled: true,
        probability: 0.05,
        level: Some(LevelRange::Int { min: 12, max: 24 }),
    },
    EffectDescriptor {
        id: EffectId::PitchBend,
        kind: ExecutionKind::Filter,
        enabled: true,
        probability: 0.10,
        level: Some(LevelRange::Float { min: 0.6, max: 1.6 }),
    },
    EffectDescriptor {
        id: EffectId::RainbowOverlay,
        kind: ExecutionKind::Filter,
        enabled: true,
        probability: 0.15,
        level: Some(LevelRange::Float { min: 0.3, max: 0.8 }),
    },
    EffectDescriptor {
        id: EffectId::SfxBlast,
        kind: ExecutionKind::Filter,
        enabled: true,
        probability: 0.10,
        level: Some(LevelRange::Float { min: 0.5, max: 1.5 }),
    },
];

#[cfg(test)]
#[path = "../../tests/unit/catalog/descriptor.rs"]
mod tests;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::catalog::descriptor::{EffectId, Level};
use crate::config::settings::{ChainLimits, EffectSetting};
use crate::foundation::error::{ChaosError, ChaosResult};

/// One planned effect with its drawn intensity payload.
///
/// The variants mirror [`EffectId`] but carry concrete parameters, so the
/// executor can match exhaustively instead of dispatching on identifier
/// strings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlannedEffect {
    /// Invert video colors.
    Invert,
    /// Horizontal mirror.
    Mirror,
    /// Reverse video and audio.
    Reverse,
    /// Playback speed multiplier (>1 is faster).
    Speed {
        /// Speed factor applied to both streams.
        factor: f64,
    },
    /// Repeat the whole clip this many times.
    StutterLoop {
        /// Number of back-to-back repetitions.
        repeats: i64,
    },
    /// Shuffle frames within windows of this many frames.
    FrameShuffle {
        /// Shuffle window size in frames.
        window: i64,
    },
    /// Chorus-ish echo with this decay.
    Chorus {
        /// `aecho` decay in (0.0, 1.0].
        decay: f64,
    },
    /// Massive audio gain.
    Earrape {
        /// Gain in decibels.
        gain_db: i64,
    },
    /// Resample-based pitch bend.
    PitchBend {
        /// Pitch/rate factor (>1 is higher and faster).
        factor: f64,
    },
    /// Composite the rainbow overlay at this opacity.
    RainbowOverlay {
        /// Overlay opacity in (0.0, 1.0].
        opacity: f64,
    },
    /// Mix the SFX clip in at this gain.
    SfxBlast {
        /// Linear gain applied to the SFX before mixing.
        gain: f64,
    },
}

impl PlannedEffect {
    /// The identifier of the underlying effect.
    pub fn id(&self) -> EffectId {
        match self {
            PlannedEffect::Invert => EffectId::Invert,
            PlannedEffect::Mirror => EffectId::Mirror,
            PlannedEffect::Reverse => EffectId::Reverse,
            PlannedEffect::Speed { .. } => EffectId::Speed,
            PlannedEffect::StutterLoop { .. } => EffectId::StutterLoop,
            PlannedEffect::FrameShuffle { .. } => EffectId::FrameShuffle,
            PlannedEffect::Chorus { .. } => EffectId::Chorus,
            PlannedEffect::Earrape { .. } => EffectId::Earrape,
            PlannedEffect::PitchBend { .. } => EffectId::PitchBend,
            PlannedEffect::RainbowOverlay { .. } => EffectId::RainbowOverlay,
            PlannedEffect::SfxBlast { .. } => EffectId::SfxBlast,
        }
    }
}

impl std::fmt::Display for PlannedEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlannedEffect::Invert | PlannedEffect::Mirror | PlannedEffect::Reverse => {
                write!(f, "{}", self.id())
            }
            PlannedEffect::Speed { factor } => write!(f, "speed factor={factor:.3}"),
            PlannedEffect::StutterLoop { repeats } => write!(f, "stutter_loop repeats={repeats}"),
            PlannedEffect::FrameShuffle { window } => write!(f, "frame_shuffle window={window}"),
            PlannedEffect::Chorus { decay } => write!(f, "chorus decay={decay:.3}"),
            PlannedEffect::Earrape { gain_db } => write!(f, "earrape gain_db={gain_db}"),
            PlannedEffect::PitchBend { factor } => write!(f, "pitch_bend factor={factor:.3}"),
            PlannedEffect::RainbowOverlay { opacity } => {
                write!(f, "rainbow_overlay opacity={opacity:.3}")
            }
            PlannedEffect::SfxBlast { gain } => write!(f, "sfx_blast gain={gain:.3}"),
        }
    }
}

/// One planning decision: an effect with its payload plus a sub-seed that
/// frame-manipulation steps use for their own deterministic draws.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChainStep {
    /// The effect to apply, with concrete parameters.
    pub effect: PlannedEffect,
    /// Planner-drawn seed for any randomness inside the step itself.
    pub seed: u64,
}

/// Plan an ordered effect chain.
///
/// Independent Bernoulli selection per enabled effect, in catalog order: draw
/// a uniform value in [0, 1) and include the effect when it is below the
/// resolved probability, then draw its level from the resolved range. Each
/// catalog entry is visited once, so no effect appears twice. The result is
/// truncated to `limits.max_len`; if it falls short of `limits.min_len`,
/// remaining enabled effects are forced in, still in catalog order.
///
/// The same `(settings, limits, seed)` triple always yields the same plan.
/// An empty plan is valid and means a no-op pipeline.
pub fn plan_chain(
    settings: &[EffectSetting],
    limits: ChainLimits,
    seed: u64,
) -> ChaosResult<Vec<ChainStep>> {
    if limits.min_len > limits.max_len {
        return Err(ChaosError::planning(format!(
            "chain limits are inverted: min_len {} > max_len {}",
            limits.min_len, limits.max_len
        )));
    }
    for s in settings {
        if !s.probability.is_finite() || !(0.0..=1.0).contains(&s.probability) {
            return Err(ChaosError::planning(format!(
                "corrupt probability {} for '{}'",
                s.probability, s.id
            )));
        }
        if let Some(range) = s.level
            && !range.is_valid()
        {
            return Err(ChaosError::planning(format!("corrupt level range for '{}'", s.id)));
        }
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut chain = Vec::new();
    for s in settings.iter().filter(|s| s.enabled) {
        let roll: f64 = rng.gen_range(0.0..1.0);
        if roll < s.probability {
            chain.push(draw_step(s, &mut rng));
        }
    }

    if chain.len() > limits.max_len {
        tracing::debug!(
            planned = chain.len(),
            max_len = limits.max_len,
            "truncating chain to max_len"
        );
        chain.truncate(limits.max_len);
    }
    if chain.len() < limits.min_len {
        force_to_min(&mut chain, settings, limits.min_len, &mut rng);
    }

    Ok(chain)
}

fn draw_step<R: Rng>(setting: &EffectSetting, rng: &mut R) -> ChainStep {
    let level = setting.level.map(|range| range.draw(rng));
    ChainStep {
        effect: realize(setting.id, level),
        seed: rng.next_u64(),
    }
}

fn force_to_min<R: Rng>(
    chain: &mut Vec<ChainStep>,
    settings: &[EffectSetting],
    min_len: usize,
    rng: &mut R,
) {
    for s in settings.iter().filter(|s| s.enabled) {
        if chain.len() >= min_len {
            break;
        }
        if chain.iter().any(|step| step.effect.id() == s.id) {
            continue;
        }
        tracing::debug!(effect = %s.id, "forcing effect in to satisfy min_len");
        chain.push(draw_step(s, rng));
    }
}

/// Turn a drawn level into the effect's concrete payload.
fn realize(id: EffectId, level: Option<Level>) -> PlannedEffect {
    match (id, level) {
        (EffectId::Invert, _) => PlannedEffect::Invert,
        (EffectId::Mirror, _) => PlannedEffect::Mirror,
        (EffectId::Reverse, _) => PlannedEffect::Reverse,
        (EffectId::Speed, l) => PlannedEffect::Speed {
            factor: l.map_or(1.0, Level::as_f64),
        },
        (EffectId::StutterLoop, l) => PlannedEffect::StutterLoop {
            repeats: l.map_or(2, Level::as_i64),
        },
        (EffectId::FrameShuffle, l) => PlannedEffect::FrameShuffle {
            window: l.map_or(8, Level::as_i64),
        },
        (EffectId::Chorus, l) => PlannedEffect::Chorus {
            decay: l.map_or(0.3, Level::as_f64),
        },
        (EffectId::Earrape, l) => PlannedEffect::Earrape {
            gain_db: l.map_or(18, Level::as_i64),
        },
        (EffectId::PitchBend, l) => PlannedEffect::PitchBend {
            factor: l.map_or(1.0, Level::as_f64),
        },
        (EffectId::RainbowOverlay, l) => PlannedEffect::RainbowOverlay {
            opacity: l.map_or(0.5, Level::as_f64),
        },
        (EffectId::SfxBlast, l) => PlannedEffect::SfxBlast {
            gain: l.map_or(1.0, Level::as_f64),
        },
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plan/planner.rs"]
mod tests;

use std::ffi::OsString;
use std::path::Path;

use crate::assets::store::{AssetStore, OVERLAY_RAINBOW, SFX_BOOP};
use crate::catalog::descriptor::EffectId;
use crate::exec::{filter, frames};
use crate::exec::tool::FfmpegRunner;
use crate::foundation::error::{ChaosError, ChaosResult};
use crate::plan::planner::{ChainStep, PlannedEffect};

/// Applies exactly one planned step to exactly one input artifact.
///
/// Each application writes one new file and never mutates its input. Failures
/// are attributed to the step: the returned error carries the step index, the
/// effect identifier with its chosen level, and the underlying tool error
/// text.
pub struct EffectExecutor<'a> {
    tool: &'a FfmpegRunner,
    assets: &'a AssetStore,
}

impl<'a> EffectExecutor<'a> {
    /// Executor delegating to `tool` and resolving assets through `assets`.
    pub fn new(tool: &'a FfmpegRunner, assets: &'a AssetStore) -> Self {
        Self { tool, assets }
    }

    /// Apply `step` to `input`, producing `output`.
    pub fn apply(
        &self,
        index: usize,
        step: &ChainStep,
        input: &Path,
        output: &Path,
    ) -> ChaosResult<()> {
        tracing::debug!(step = index, effect = %step.effect, "applying effect");
        match step.effect {
            PlannedEffect::Invert => {
                self.filter_step(index, &step.effect, filter::invert_args(input, output), output)
            }
            PlannedEffect::Mirror => {
                self.filter_step(index, &step.effect, filter::mirror_args(input, output), output)
            }
            PlannedEffect::Reverse => {
                self.filter_step(index, &step.effect, filter::reverse_args(input, output), output)
            }
            PlannedEffect::Speed { factor } => self.filter_step(
                index,
                &step.effect,
                filter::speed_args(input, output, factor),
                output,
            ),
            PlannedEffect::Chorus { decay } => self.filter_step(
                index,
                &step.effect,
                filter::chorus_args(input, output, decay),
                output,
            ),
            PlannedEffect::Earrape { gain_db } => self.filter_step(
                index,
                &step.effect,
                filter::earrape_args(input, output, gain_db),
                output,
            ),
            PlannedEffect::PitchBend { factor } => self.filter_step(
                index,
                &step.effect,
                filter::pitch_args(input, output, factor),
                output,
            ),
            PlannedEffect::RainbowOverlay { opacity } => {
                let overlay = self
                    .assets
                    .require(EffectId::RainbowOverlay, self.assets.overlay(OVERLAY_RAINBOW))?;
                self.filter_step(
                    index,
                    &step.effect,
                    filter::overlay_args(input, &overlay, output, opacity),
                    output,
                )
            }
            PlannedEffect::SfxBlast { gain } => {
                let sfx = self
                    .assets
                    .require(EffectId::SfxBlast, self.assets.sound(SFX_BOOP))?;
                self.filter_step(
                    index,
                    &step.effect,
                    filter::sfx_args(input, &sfx, output, gain),
                    output,
                )
            }
            PlannedEffect::StutterLoop { repeats } => {
                frames::stutter(self.tool, input, output, repeats.max(1) as usize)
            }
            PlannedEffect::FrameShuffle { window } => {
                frames::shuffle(self.tool, input, output, window.max(0) as usize, step.seed)
            }
        }
    }

    fn filter_step(
        &self,
        index: usize,
        effect: &PlannedEffect,
        args: Vec<OsString>,
        output: &Path,
    ) -> ChaosResult<()> {
        let outcome = self
            .tool
            .run(&args, Some(output))
            .map_err(|e| ChaosError::execution(index, effect.to_string(), e.to_string()))?;
        if outcome.timed_out {
            return Err(ChaosError::Timeout {
                step: index,
                effect: effect.to_string(),
                secs: self.tool.timeout_secs(),
            });
        }
        if !outcome.success() {
            return Err(ChaosError::execution(
                index,
                effect.to_string(),
                outcome.failure_text(),
            ));
        }
        Ok(())
    }
}

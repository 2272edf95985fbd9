//! Clipchaos composes randomized "YTP-style" video/audio joke effects by
//! shelling out to the system `ffmpeg`.
//!
//! There is no original media algorithm in this crate: every effect is either
//! a single ffmpeg filter invocation or a frame-precise reordering performed
//! through temporary files. What the crate does own is the run pipeline:
//!
//! 1. **Resolve**: merge a JSON settings document with the static effect
//!    catalog into one [`EffectSetting`] per catalog entry.
//! 2. **Plan**: a seeded Bernoulli pass over the catalog order produces an
//!    ordered [`ChainStep`] sequence (the same seed always yields the same
//!    plan).
//! 3. **Execute**: each step maps one artifact to one new artifact, via an
//!    ffmpeg filter expression or a frame extract/reorder/reassemble cycle.
//! 4. **Run**: [`PipelineRunner`] threads the artifacts through the chain
//!    inside a scoped temp dir and finalizes to the requested output path.
//!
//! Key constraints:
//!
//! - **Deterministic plans**: planning is a pure function of (settings, seed).
//! - **Sequential and synchronous**: one subprocess at a time; cancellation is
//!   checked between steps, never mid-subprocess.
//! - **No partial output**: any step failure aborts the run and removes every
//!   intermediate the runner created.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod catalog;
mod concat;
mod config;
mod exec;
mod foundation;
mod pipeline;
mod plan;

pub use assets::store::{AssetStore, OVERLAY_RAINBOW, SFX_BOOP};
pub use catalog::descriptor::{
    CATALOG, EffectDescriptor, EffectId, ExecutionKind, Level, LevelRange,
};
pub use concat::concat_clips;
pub use config::settings::{
    ChainLimits, EffectSetting, ResolvedConfig, default_document, document_for, load_config,
    resolve_config,
};
pub use exec::executor::EffectExecutor;
pub use exec::tool::{FfmpegRunner, OutputState, ToolOutcome};
pub use foundation::error::{ChaosError, ChaosResult};
pub use pipeline::cancel::CancelToken;
pub use pipeline::runner::{Artifact, Finalize, PipelineRunner, RunReport, RunnerOpts};
pub use plan::planner::{ChainStep, PlannedEffect, plan_chain};

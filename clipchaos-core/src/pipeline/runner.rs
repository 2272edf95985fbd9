use std::path::{Path, PathBuf};

use crate::exec::executor::EffectExecutor;
use crate::exec::filter;
use crate::exec::tool::FfmpegRunner;
use crate::foundation::error::{ChaosError, ChaosResult};
use crate::pipeline::cancel::CancelToken;
use crate::plan::planner::ChainStep;

/// A media file on disk produced or consumed by a pipeline stage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact(PathBuf);

impl Artifact {
    pub(crate) fn from_path(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// The file's path.
    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl From<Artifact> for PathBuf {
    fn from(artifact: Artifact) -> Self {
        artifact.0
    }
}

/// How the last intermediate becomes the final output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Finalize {
    /// Faithful copy. An empty plan under this mode yields a byte-identical
    /// copy of the input.
    #[default]
    Copy,
    /// Fast low-res preview re-encode (`scale=640:-2`, veryfast x264).
    Preview,
}

/// Runner configuration.
#[derive(Clone, Debug, Default)]
pub struct RunnerOpts {
    /// Directory to create the run's scoped temp dir in; the system temp dir
    /// when unset.
    pub temp_root: Option<PathBuf>,
    /// Finalization profile.
    pub finalize: Finalize,
    /// Optional cooperative cancellation, checked between steps.
    pub cancel: Option<CancelToken>,
}

/// Summary of a completed run.
#[derive(Clone, Debug)]
pub struct RunReport {
    /// Number of chain steps applied.
    pub steps: usize,
    /// The final output artifact.
    pub output: Artifact,
}

/// Orchestrates a planned chain over one input clip.
///
/// Steps are applied strictly in order, each step's output becoming the next
/// step's input. All intermediates live in a scoped temp dir owned by the
/// run; at most the current and immediately-previous intermediate exist at
/// once, and every exit path (success, failure, panic) removes the dir. A
/// failed step aborts the remaining chain with no partial output.
pub struct PipelineRunner<'a> {
    tool: &'a FfmpegRunner,
    executor: EffectExecutor<'a>,
    opts: RunnerOpts,
}

impl<'a> PipelineRunner<'a> {
    /// Runner executing through `executor`, finalizing through `tool`.
    pub fn new(tool: &'a FfmpegRunner, executor: EffectExecutor<'a>, opts: RunnerOpts) -> Self {
        Self {
            tool,
            executor,
            opts,
        }
    }

    /// Run `plan` against `input`, leaving the result at `final_out`.
    pub fn run(
        &self,
        input: &Path,
        plan: &[ChainStep],
        final_out: &Path,
    ) -> ChaosResult<RunReport> {
        if !input.is_file() {
            return Err(ChaosError::validation(format!(
                "input clip '{}' does not exist",
                input.display()
            )));
        }
        ensure_parent_dir(final_out)?;

        // Empty plan: a no-op pipeline, the input is delivered untouched.
        if plan.is_empty() && self.opts.finalize == Finalize::Copy {
            copy_to(input, final_out)?;
            tracing::info!(output = %final_out.display(), "empty plan, input copied through");
            return Ok(RunReport {
                steps: 0,
                output: Artifact(final_out.to_path_buf()),
            });
        }

        let scratch = self.scratch_dir()?;
        let ext = input
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("mp4")
            .to_string();

        let mut current = input.to_path_buf();
        let mut previous: Option<PathBuf> = None;
        for (index, step) in plan.iter().enumerate() {
            self.check_cancelled()?;

            let next = scratch.path().join(format!("step_{:03}.{ext}", index + 1));
            self.executor.apply(index, step, &current, &next)?;

            // The superseded intermediate is dead as soon as the next one
            // exists; only the original input outlives its step.
            if let Some(stale) = previous.take()
                && let Err(e) = std::fs::remove_file(&stale)
            {
                tracing::warn!(path = %stale.display(), "failed to drop stale intermediate: {e}");
            }
            if current.as_path() != input {
                previous = Some(current);
            }
            current = next;
        }

        self.check_cancelled()?;
        tracing::debug!(steps = plan.len(), "finalizing");
        match self.opts.finalize {
            Finalize::Copy => copy_to(&current, final_out)?,
            Finalize::Preview => self.preview_encode(&current, final_out)?,
        }

        tracing::info!(
            steps = plan.len(),
            output = %final_out.display(),
            "chain complete"
        );
        Ok(RunReport {
            steps: plan.len(),
            output: Artifact(final_out.to_path_buf()),
        })
    }

    fn scratch_dir(&self) -> ChaosResult<tempfile::TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("chaos_run_");
        let scratch = match &self.opts.temp_root {
            Some(root) => {
                std::fs::create_dir_all(root).map_err(|e| {
                    ChaosError::validation(format!(
                        "failed to create temp root '{}': {e}",
                        root.display()
                    ))
                })?;
                builder.tempdir_in(root)
            }
            None => builder.tempdir(),
        };
        scratch.map_err(|e| ChaosError::Other(anyhow::anyhow!("failed to create run temp dir: {e}")))
    }

    fn check_cancelled(&self) -> ChaosResult<()> {
        match &self.opts.cancel {
            Some(token) if token.is_cancelled() => Err(ChaosError::Cancelled),
            _ => Ok(()),
        }
    }

    fn preview_encode(&self, input: &Path, output: &Path) -> ChaosResult<()> {
        let outcome = self
            .tool
            .run(&filter::preview_args(input, output), Some(output))
            .map_err(|e| ChaosError::encode(format!("preview encode failed: {e}")))?;
        if !outcome.success() {
            return Err(ChaosError::encode(format!(
                "preview encode failed for '{}': {}",
                output.display(),
                outcome.failure_text()
            )));
        }
        Ok(())
    }
}

fn copy_to(from: &Path, to: &Path) -> ChaosResult<()> {
    std::fs::copy(from, to).map_err(|e| {
        ChaosError::Other(anyhow::anyhow!(
            "failed to place output at '{}': {e}",
            to.display()
        ))
    })?;
    Ok(())
}

/// Ensure the parent directory of `path` exists.
fn ensure_parent_dir(path: &Path) -> ChaosResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            ChaosError::validation(format!(
                "failed to create output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }
    Ok(())
}

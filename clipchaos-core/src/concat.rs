use std::path::Path;

use crate::exec::frames::write_concat_list;
use crate::exec::tool::{FfmpegRunner, osargs};
use crate::foundation::error::{ChaosError, ChaosResult};
use crate::pipeline::runner::Artifact;

/// Quick concat of compatible clips through the concat demuxer, stream-copy
/// only. Clips must share codecs and parameters; ffmpeg reports the mismatch
/// otherwise.
pub fn concat_clips(
    tool: &FfmpegRunner,
    clips: &[impl AsRef<Path>],
    output: &Path,
) -> ChaosResult<Artifact> {
    if clips.is_empty() {
        return Err(ChaosError::validation("concat needs at least one clip"));
    }

    let list = tempfile::Builder::new()
        .prefix("chaos_concat_")
        .suffix(".txt")
        .tempfile()
        .map_err(|e| ChaosError::Other(anyhow::anyhow!("failed to create concat list: {e}")))?;
    write_concat_list(list.path(), clips.iter().map(|c| c.as_ref()))
        .map_err(|e| ChaosError::Other(anyhow::anyhow!("failed to write concat list: {e}")))?;

    let mut args = osargs(["-y", "-v", "error", "-f", "concat", "-safe", "0", "-i"]);
    args.push(list.path().into());
    args.extend(osargs(["-c", "copy"]));
    args.push(output.into());

    let outcome = tool
        .run(&args, Some(output))
        .map_err(|e| ChaosError::execution(0, "concat", e.to_string()))?;
    if !outcome.success() {
        return Err(ChaosError::execution(0, "concat", outcome.failure_text()));
    }
    Ok(Artifact::from_path(output))
}

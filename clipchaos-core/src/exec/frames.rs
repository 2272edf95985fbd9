//! Frame-manipulation strategy: decode to an ordered frame sequence, apply a
//! pure reordering/duplication, re-encode.
//!
//! Used only by effects whose transform cannot be expressed as a single
//! filter. The reorder functions are pure and seeded so a run is reproducible;
//! their exact shuffle shape is an implementation detail, not a contract.

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::exec::tool::{FfmpegRunner, osargs};
use crate::foundation::error::{ChaosError, ChaosResult};

/// Reassembly frame rate. The extraction step drops timing information, so a
/// fixed rate is assumed, matching the original tool's behavior.
const REASSEMBLE_FPS: &str = "25";

/// Upper bound on frames fed through a reorder, to keep joke-length runtimes.
const MAX_FRAMES: usize = 500;

/// Shuffle order: a seeded Fisher–Yates within consecutive windows of
/// `window` frames. Keeps rough temporal structure while scrambling locally.
/// `window < 2` is the identity.
pub(crate) fn shuffle_order(len: usize, window: usize, seed: u64) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    if window >= 2 {
        let mut rng = StdRng::seed_from_u64(seed);
        for chunk in order.chunks_mut(window) {
            chunk.shuffle(&mut rng);
        }
    }
    order
}

/// Loop order: the whole frame sequence repeated `repeats` times back to
/// back. `repeats` is clamped to at least 1.
pub(crate) fn loop_order(len: usize, repeats: usize) -> Vec<usize> {
    let repeats = repeats.max(1);
    let mut order = Vec::with_capacity(len * repeats);
    for _ in 0..repeats {
        order.extend(0..len);
    }
    order
}

/// Apply a frame shuffle to `input`, writing `output`.
pub(crate) fn shuffle(
    tool: &FfmpegRunner,
    input: &Path,
    output: &Path,
    window: usize,
    seed: u64,
) -> ChaosResult<()> {
    reorder_through_frames(tool, input, output, |len| shuffle_order(len, window, seed))
}

/// Apply a stutter loop to `input`, writing `output`.
pub(crate) fn stutter(
    tool: &FfmpegRunner,
    input: &Path,
    output: &Path,
    repeats: usize,
) -> ChaosResult<()> {
    reorder_through_frames(tool, input, output, move |len| loop_order(len, repeats))
}

fn reorder_through_frames(
    tool: &FfmpegRunner,
    input: &Path,
    output: &Path,
    order_for: impl FnOnce(usize) -> Vec<usize>,
) -> ChaosResult<()> {
    let scratch = tempfile::Builder::new()
        .prefix("chaos_frames_")
        .tempdir()
        .map_err(|e| ChaosError::decode(format!("failed to create frame scratch dir: {e}")))?;

    let frames = extract_frames(tool, input, scratch.path())?;
    let order = order_for(frames.len());

    let list_path = scratch.path().join("frames.txt");
    let entries = order.iter().map(|&i| frames[i].as_path());
    write_concat_list(&list_path, entries)
        .map_err(|e| ChaosError::encode(format!("failed to write frame list: {e}")))?;
    reassemble(tool, &list_path, output)
}

/// Extract frames as numbered PNGs, sorted back into decode order. Capped at
/// [`MAX_FRAMES`] like the original tool.
fn extract_frames(
    tool: &FfmpegRunner,
    input: &Path,
    scratch: &Path,
) -> ChaosResult<Vec<PathBuf>> {
    let pattern = scratch.join("frame_%06d.png");
    let mut args = osargs(["-y", "-v", "error", "-i"]);
    args.push(input.into());
    args.extend(osargs(["-vsync", "0"]));
    args.push(pattern.into());

    let outcome = tool
        .run(&args, None)
        .map_err(|e| ChaosError::decode(format!("frame extraction failed: {e}")))?;
    if !outcome.success() {
        return Err(ChaosError::decode(format!(
            "frame extraction failed for '{}': {}",
            input.display(),
            outcome.failure_text()
        )));
    }

    let mut frames: Vec<PathBuf> = std::fs::read_dir(scratch)
        .map_err(|e| ChaosError::decode(format!("failed to list extracted frames: {e}")))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "png"))
        .collect();
    frames.sort();
    if frames.is_empty() {
        return Err(ChaosError::decode(format!(
            "no frames extracted from '{}'",
            input.display()
        )));
    }
    frames.truncate(MAX_FRAMES);
    Ok(frames)
}

fn reassemble(tool: &FfmpegRunner, list: &Path, output: &Path) -> ChaosResult<()> {
    let mut args = osargs(["-y", "-v", "error", "-f", "concat", "-safe", "0", "-i"]);
    args.push(list.into());
    args.extend(osargs([
        "-r",
        REASSEMBLE_FPS,
        "-c:v",
        "libx264",
        "-pix_fmt",
        "yuv420p",
    ]));
    args.push(OsString::from(output));

    let outcome = tool
        .run(&args, Some(output))
        .map_err(|e| ChaosError::encode(format!("frame reassembly failed: {e}")))?;
    if !outcome.success() {
        return Err(ChaosError::encode(format!(
            "frame reassembly failed for '{}': {}",
            output.display(),
            outcome.failure_text()
        )));
    }
    Ok(())
}

/// Write an ffmpeg concat-demuxer list file referencing `entries` in order.
pub(crate) fn write_concat_list<'a>(
    path: &Path,
    entries: impl IntoIterator<Item = &'a Path>,
) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    for entry in entries {
        // The concat demuxer's quoting rule: single quotes close-quote-reopen.
        let text = entry.display().to_string().replace('\'', "'\\''");
        writeln!(file, "file '{text}'")?;
    }
    file.flush()
}

#[cfg(test)]
#[path = "../../tests/unit/exec/frames.rs"]
mod tests;

//! ffmpeg argument construction for the external-filter strategy.
//!
//! Everything here is pure string/argument assembly; nothing touches the
//! filesystem or spawns processes.

use std::ffi::OsString;
use std::path::Path;

/// `atempo` accepts factors in [0.5, 2.0] per filter instance; factors outside
/// that window are decomposed into a chain whose product is the requested
/// factor. A non-positive factor falls back to 1.0.
pub(crate) fn atempo_chain(factor: f64) -> String {
    let factor = if factor > 0.0 { factor } else { 1.0 };
    if (0.5..=2.0).contains(&factor) {
        return format!("atempo={factor}");
    }
    let mut parts = Vec::new();
    let mut val = factor;
    while val > 2.0 {
        parts.push(2.0);
        val /= 2.0;
    }
    while val < 0.5 {
        parts.push(0.5);
        val /= 0.5;
    }
    parts.push(val);
    parts
        .iter()
        .map(|p| format!("atempo={p}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Combined video/audio speed graph: video via `setpts`, audio via the
/// `atempo` chain.
pub(crate) fn speed_graph(factor: f64) -> String {
    format!("[0:v]setpts=PTS/{factor}[v];[0:a]{}[a]", atempo_chain(factor))
}

/// Resample-based pitch bend. Approximate on purpose: shifting the sample
/// rate changes pitch and duration together.
pub(crate) fn pitch_graph(factor: f64) -> String {
    format!("asetrate=48000*{factor},aresample=48000")
}

/// Overlay graph compositing input `[1:v]` over `[0:v]` at the given opacity.
pub(crate) fn overlay_graph(opacity: f64) -> String {
    format!("[1:v]format=rgba,colorchannelmixer=aa={opacity}[ov];[0:v][ov]overlay=0:0:format=auto")
}

/// Mix graph folding a gained SFX input `[1:a]` into the main audio `[0:a]`.
pub(crate) fn sfx_graph(gain: f64) -> String {
    format!("[1:a]volume={gain}[sfx];[0:a][sfx]amix=inputs=2:duration=first[a]")
}

fn base(input: &Path) -> Vec<OsString> {
    vec![
        "-y".into(),
        "-v".into(),
        "error".into(),
        "-i".into(),
        input.into(),
    ]
}

fn push_strs(args: &mut Vec<OsString>, items: &[&str]) {
    args.extend(items.iter().map(OsString::from));
}

/// `negate` video filter, audio copied through.
pub(crate) fn invert_args(input: &Path, output: &Path) -> Vec<OsString> {
    let mut args = base(input);
    push_strs(&mut args, &["-vf", "negate", "-c:a", "copy"]);
    args.push(output.into());
    args
}

/// `hflip` video filter, audio copied through.
pub(crate) fn mirror_args(input: &Path, output: &Path) -> Vec<OsString> {
    let mut args = base(input);
    push_strs(&mut args, &["-vf", "hflip", "-c:a", "copy"]);
    args.push(output.into());
    args
}

/// Reverse both streams. Whole-clip buffering, fine for short joke clips.
pub(crate) fn reverse_args(input: &Path, output: &Path) -> Vec<OsString> {
    let mut args = base(input);
    push_strs(&mut args, &["-vf", "reverse", "-af", "areverse"]);
    args.push(output.into());
    args
}

/// Speed change through the combined filter graph.
pub(crate) fn speed_args(input: &Path, output: &Path, factor: f64) -> Vec<OsString> {
    let mut args = base(input);
    push_strs(&mut args, &["-filter_complex"]);
    args.push(speed_graph(factor).into());
    push_strs(&mut args, &["-map", "[v]", "-map", "[a]"]);
    args.push(output.into());
    args
}

/// `aecho` chorus approximation, video copied through.
pub(crate) fn chorus_args(input: &Path, output: &Path, decay: f64) -> Vec<OsString> {
    let mut args = base(input);
    push_strs(&mut args, &["-af"]);
    args.push(format!("aecho=0.8:0.9:100:{decay}").into());
    push_strs(&mut args, &["-c:v", "copy"]);
    args.push(output.into());
    args
}

/// Large gain in dB, video copied through. Clipping is expected.
pub(crate) fn earrape_args(input: &Path, output: &Path, gain_db: i64) -> Vec<OsString> {
    let mut args = base(input);
    push_strs(&mut args, &["-af"]);
    args.push(format!("volume={gain_db}dB").into());
    push_strs(&mut args, &["-c:v", "copy"]);
    args.push(output.into());
    args
}

/// Pitch bend, video copied through.
pub(crate) fn pitch_args(input: &Path, output: &Path, factor: f64) -> Vec<OsString> {
    let mut args = base(input);
    push_strs(&mut args, &["-af"]);
    args.push(pitch_graph(factor).into());
    push_strs(&mut args, &["-c:v", "copy"]);
    args.push(output.into());
    args
}

/// Image overlay at the given opacity, audio copied through.
pub(crate) fn overlay_args(
    input: &Path,
    overlay: &Path,
    output: &Path,
    opacity: f64,
) -> Vec<OsString> {
    let mut args = base(input);
    push_strs(&mut args, &["-i"]);
    args.push(overlay.into());
    push_strs(&mut args, &["-filter_complex"]);
    args.push(overlay_graph(opacity).into());
    push_strs(&mut args, &["-c:a", "copy"]);
    args.push(output.into());
    args
}

/// SFX mix-in at the given gain, video copied through.
pub(crate) fn sfx_args(input: &Path, sfx: &Path, output: &Path, gain: f64) -> Vec<OsString> {
    let mut args = base(input);
    push_strs(&mut args, &["-i"]);
    args.push(sfx.into());
    push_strs(&mut args, &["-filter_complex"]);
    args.push(sfx_graph(gain).into());
    push_strs(&mut args, &["-map", "0:v", "-map", "[a]", "-c:v", "copy"]);
    args.push(output.into());
    args
}

/// Fast low-res preview re-encode used by the preview finalize profile.
pub(crate) fn preview_args(input: &Path, output: &Path) -> Vec<OsString> {
    let mut args = base(input);
    push_strs(
        &mut args,
        &[
            "-vf", "scale=640:-2", "-c:v", "libx264", "-preset", "veryfast", "-crf", "28",
            "-c:a", "aac", "-b:a", "96k",
        ],
    );
    args.push(output.into());
    args
}

#[cfg(test)]
#[path = "../../tests/unit/exec/filter.rs"]
mod tests;

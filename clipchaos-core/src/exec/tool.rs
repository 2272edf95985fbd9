use std::ffi::{OsStr, OsString};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::anyhow;

use crate::foundation::error::ChaosResult;

/// Poll interval while waiting on a child with a timeout.
const WAIT_POLL: Duration = Duration::from_millis(50);

/// Existence/size check of a declared output file, bundled into the outcome
/// so callers never infer subprocess success from filesystem side effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputState {
    /// The invocation declared no output file to verify.
    NotDeclared,
    /// Declared output exists with this many bytes.
    Present(u64),
    /// Declared output was not created.
    Missing,
    /// Declared output exists but is empty.
    Empty,
}

/// Typed result of one external-tool invocation.
#[derive(Clone, Debug)]
pub struct ToolOutcome {
    /// Exit code, `None` when the process was killed or died to a signal.
    pub exit_code: Option<i32>,
    /// Captured stderr, lossily decoded.
    pub stderr: String,
    /// Whether the child was killed for exceeding the per-step timeout.
    pub timed_out: bool,
    /// State of the declared output file after the process finished.
    pub output: OutputState,
}

impl ToolOutcome {
    /// `true` when the tool exited zero, was not timed out, and the declared
    /// output (if any) exists and is non-empty.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
            && !self.timed_out
            && matches!(self.output, OutputState::NotDeclared | OutputState::Present(_))
    }

    /// One-line failure description combining exit status, output state, and
    /// trimmed stderr.
    pub fn failure_text(&self) -> String {
        let status = match self.exit_code {
            Some(code) => format!("exit code {code}"),
            None if self.timed_out => "killed on timeout".to_string(),
            None => "killed by signal".to_string(),
        };
        let output = match self.output {
            OutputState::Missing => ", declared output missing",
            OutputState::Empty => ", declared output empty",
            OutputState::NotDeclared | OutputState::Present(_) => "",
        };
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            format!("{status}{output}")
        } else {
            format!("{status}{output}: {stderr}")
        }
    }
}

/// Wrapper around the external media tool.
///
/// The program name is injectable so tests can point it at a binary that does
/// not exist; the optional timeout applies per invocation.
#[derive(Clone, Debug)]
pub struct FfmpegRunner {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl Default for FfmpegRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegRunner {
    /// Runner invoking `ffmpeg` from `PATH`, no timeout.
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("ffmpeg"),
            timeout: None,
        }
    }

    /// Runner invoking an arbitrary program (tests, alternate builds).
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
        }
    }

    /// Set the per-invocation timeout. The child is killed once exceeded.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Configured timeout in whole seconds, zero when unset.
    pub fn timeout_secs(&self) -> u64 {
        self.timeout.map_or(0, |t| t.as_secs())
    }

    /// `true` when the configured program answers `-version`.
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Run the tool to completion and report a typed outcome.
    ///
    /// `declared_output` is the file the invocation promises to create; its
    /// existence check is folded into the outcome. `Err` is reserved for
    /// plumbing failures (unspawnable program, stderr capture loss); a
    /// non-zero exit is a `success() == false` outcome, not an `Err`.
    pub fn run(
        &self,
        args: &[OsString],
        declared_output: Option<&Path>,
    ) -> ChaosResult<ToolOutcome> {
        tracing::debug!(program = %self.program.display(), ?args, "running external tool");
        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                anyhow!(
                    "failed to spawn '{}' (is it installed and on PATH?): {e}",
                    self.program.display()
                )
            })?;

        let mut stderr_pipe = child
            .stderr
            .take()
            .ok_or_else(|| anyhow!("failed to open tool stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr_pipe.read_to_end(&mut bytes)?;
            Ok::<_, std::io::Error>(bytes)
        });

        let (status, timed_out) = match self.timeout {
            None => (
                child
                    .wait()
                    .map_err(|e| anyhow!("failed to wait for tool: {e}"))?,
                false,
            ),
            Some(limit) => {
                let deadline = Instant::now() + limit;
                loop {
                    match child
                        .try_wait()
                        .map_err(|e| anyhow!("failed to poll tool: {e}"))?
                    {
                        Some(status) => break (status, false),
                        None if Instant::now() >= deadline => {
                            // Kill and reap; exit status after a kill is not
                            // meaningful, the timeout flag is.
                            let _ = child.kill();
                            let status = child
                                .wait()
                                .map_err(|e| anyhow!("failed to reap timed-out tool: {e}"))?;
                            break (status, true);
                        }
                        None => std::thread::sleep(WAIT_POLL),
                    }
                }
            }
        };

        let stderr_bytes = stderr_drain
            .join()
            .map_err(|_| anyhow!("tool stderr drain thread panicked"))?
            .map_err(|e| anyhow!("tool stderr read failed: {e}"))?;

        let output = match declared_output {
            None => OutputState::NotDeclared,
            Some(path) => match std::fs::metadata(path) {
                Err(_) => OutputState::Missing,
                Ok(meta) if meta.len() == 0 => OutputState::Empty,
                Ok(meta) => OutputState::Present(meta.len()),
            },
        };

        Ok(ToolOutcome {
            exit_code: status.code(),
            stderr: String::from_utf8_lossy(&stderr_bytes).into_owned(),
            timed_out,
            output,
        })
    }
}

/// Build an argument vector from a mix of flags and paths.
pub(crate) fn osargs<I, S>(items: I) -> Vec<OsString>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    items.into_iter().map(|s| s.as_ref().to_os_string()).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/exec/tool.rs"]
mod tests;

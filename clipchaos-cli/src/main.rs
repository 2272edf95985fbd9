mod interactive;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context as _, bail};
use clap::{Parser, Subcommand};
use rand::RngCore;

use clipchaos::{
    AssetStore, ChainStep, EffectExecutor, FfmpegRunner, Finalize, PipelineRunner, ResolvedConfig,
    RunnerOpts, document_for, load_config, plan_chain,
};

#[derive(Parser, Debug)]
#[command(name = "clipchaos", version, about = "Randomized YTP-style effect chains over ffmpeg")]
struct Cli {
    /// Project root holding sources/, assets/, temp/, and config.json.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Copy source clips into the project's sources directory.
    Add(AddArgs),
    /// List source clips.
    List,
    /// Print the chain a seed yields, without rendering anything.
    Plan(PlanArgs),
    /// Render a randomized preview from a source clip.
    Preview(PreviewArgs),
    /// Print the effective settings as JSON.
    Config,
    /// Interactive terminal mode.
    Interactive,
}

#[derive(Parser, Debug)]
struct AddArgs {
    /// Files to copy into sources/.
    #[arg(required = true)]
    paths: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Random seed; drawn from entropy when omitted.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Source clip: a path, or the name of a file under sources/. The first
    /// source (sorted) is used when omitted.
    #[arg(long)]
    source: Option<PathBuf>,

    /// Output path; `<root>/temp/preview.mp4` when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Random seed; drawn from entropy when omitted. Echoed either way so a
    /// preview can be reproduced.
    #[arg(long)]
    seed: Option<u64>,

    /// Finalize with a faithful copy instead of the fast low-res preview
    /// re-encode.
    #[arg(long, default_value_t = false)]
    full: bool,

    /// Per-step ffmpeg timeout in seconds.
    #[arg(long)]
    step_timeout: Option<u64>,

    /// Open the result in the system player.
    #[arg(long, default_value_t = false)]
    open: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ws = Workspace::new(cli.root);
    match cli.cmd {
        Command::Add(args) => cmd_add(&ws, args),
        Command::List => cmd_list(&ws),
        Command::Plan(args) => cmd_plan(&ws, args),
        Command::Preview(args) => cmd_preview(&ws, args),
        Command::Config => cmd_config(&ws),
        Command::Interactive => interactive::run(&ws),
    }
}

/// Well-known project layout under `--root`.
pub(crate) struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub(crate) fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub(crate) fn sources_dir(&self) -> PathBuf {
        self.root.join("sources")
    }

    pub(crate) fn assets_dir(&self) -> PathBuf {
        self.root.join("assets")
    }

    pub(crate) fn temp_dir(&self) -> PathBuf {
        self.root.join("temp")
    }

    pub(crate) fn config_path(&self) -> PathBuf {
        self.root.join("config.json")
    }

    pub(crate) fn ensure_dirs(&self) -> anyhow::Result<()> {
        for dir in [self.sources_dir(), self.temp_dir()] {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("create directory '{}'", dir.display()))?;
        }
        Ok(())
    }

    /// Source clips, sorted for stable ordering.
    pub(crate) fn sources(&self) -> anyhow::Result<Vec<PathBuf>> {
        let dir = self.sources_dir();
        let mut files = Vec::new();
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(files),
            Err(e) => return Err(e).with_context(|| format!("list '{}'", dir.display())),
        };
        for entry in entries {
            let path = entry?.path();
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

fn cmd_add(ws: &Workspace, args: AddArgs) -> anyhow::Result<()> {
    ws.ensure_dirs()?;
    for path in &args.paths {
        if !path.is_file() {
            bail!("'{}' is not a file", path.display());
        }
        let name = path
            .file_name()
            .with_context(|| format!("'{}' has no file name", path.display()))?;
        let dest = ws.sources_dir().join(name);
        std::fs::copy(path, &dest)
            .with_context(|| format!("copy '{}' into sources", path.display()))?;
        println!("added {}", dest.display());
    }
    Ok(())
}

fn cmd_list(ws: &Workspace) -> anyhow::Result<()> {
    let sources = ws.sources()?;
    if sources.is_empty() {
        println!("no sources - add clips with `clipchaos add <file>...`");
        return Ok(());
    }
    for path in sources {
        if let Some(name) = path.file_name() {
            println!("{}", name.to_string_lossy());
        }
    }
    Ok(())
}

fn cmd_plan(ws: &Workspace, args: PlanArgs) -> anyhow::Result<()> {
    let resolved = load_config(&ws.config_path())?;
    let seed = resolve_seed(args.seed);
    let plan = plan_chain(&resolved.settings, resolved.chain, seed)?;

    println!("seed {seed}");
    if plan.is_empty() {
        println!("(empty chain - the input would be copied through unchanged)");
        return Ok(());
    }
    for (index, step) in plan.iter().enumerate() {
        println!("{}. {}", index + 1, step.effect);
    }
    Ok(())
}

fn cmd_preview(ws: &Workspace, args: PreviewArgs) -> anyhow::Result<()> {
    ws.ensure_dirs()?;
    let source = match &args.source {
        Some(given) => resolve_source(ws, given)?,
        None => ws
            .sources()?
            .into_iter()
            .next()
            .context("no sources found - add clips with `clipchaos add <file>...`")?,
    };

    let resolved = load_config(&ws.config_path())?;
    let seed = resolve_seed(args.seed);
    let out = args
        .out
        .clone()
        .unwrap_or_else(|| ws.temp_dir().join("preview.mp4"));

    let report = render(ws, &resolved, &source, &out, seed, args.full, args.step_timeout)?;
    println!(
        "wrote {} ({} steps, seed {seed})",
        out.display(),
        report.steps
    );
    if args.open {
        open_in_player(&out)?;
    }
    Ok(())
}

fn cmd_config(ws: &Workspace) -> anyhow::Result<()> {
    let resolved = load_config(&ws.config_path())?;
    let doc = document_for(resolved.settings.iter().cloned(), resolved.chain);
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

/// Plan and run one preview chain. Shared by `preview` and interactive mode.
pub(crate) fn render(
    ws: &Workspace,
    resolved: &ResolvedConfig,
    source: &Path,
    out: &Path,
    seed: u64,
    full: bool,
    step_timeout: Option<u64>,
) -> anyhow::Result<clipchaos::RunReport> {
    let plan: Vec<ChainStep> = plan_chain(&resolved.settings, resolved.chain, seed)?;
    for (index, step) in plan.iter().enumerate() {
        tracing::info!("step {}: {}", index + 1, step.effect);
    }

    let mut tool = FfmpegRunner::new();
    if let Some(secs) = step_timeout {
        tool = tool.timeout(Duration::from_secs(secs));
    }
    if (!plan.is_empty() || !full) && !tool.is_available() {
        bail!("ffmpeg is required but was not found on PATH");
    }

    let assets = AssetStore::new(ws.assets_dir());
    let executor = EffectExecutor::new(&tool, &assets);
    let opts = RunnerOpts {
        temp_root: Some(ws.temp_dir()),
        finalize: if full { Finalize::Copy } else { Finalize::Preview },
        cancel: None,
    };
    let runner = PipelineRunner::new(&tool, executor, opts);
    Ok(runner.run(source, &plan, out)?)
}

pub(crate) fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| rand::thread_rng().next_u64())
}

fn resolve_source(ws: &Workspace, given: &Path) -> anyhow::Result<PathBuf> {
    if given.is_file() {
        return Ok(given.to_path_buf());
    }
    let in_sources = ws.sources_dir().join(given);
    if in_sources.is_file() {
        return Ok(in_sources);
    }
    bail!(
        "source '{}' not found (not a path, not under '{}')",
        given.display(),
        ws.sources_dir().display()
    );
}

/// Hand the rendered preview to the platform's default player. Thin launcher;
/// failures to spawn are errors, what the player does after that is not our
/// problem.
fn open_in_player(path: &Path) -> anyhow::Result<()> {
    let mut cmd = if cfg!(target_os = "macos") {
        let mut c = std::process::Command::new("open");
        c.arg(path);
        c
    } else if cfg!(target_os = "windows") {
        let mut c = std::process::Command::new("cmd");
        c.args(["/C", "start", ""]).arg(path);
        c
    } else {
        let mut c = std::process::Command::new("xdg-open");
        c.arg(path);
        c
    };
    cmd.spawn()
        .with_context(|| format!("open '{}' in system player", path.display()))?;
    Ok(())
}

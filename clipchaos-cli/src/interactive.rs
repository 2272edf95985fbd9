//! Interactive terminal mode: the stand-in for the desktop preview window.
//!
//! Keeps an in-memory copy of the resolved settings so effect toggles only
//! last for the session, like the original tool's checkboxes.

use std::io::{BufRead, Write};

use anyhow::Context as _;

use clipchaos::{EffectId, load_config};

use crate::{Workspace, render, resolve_seed};

const HELP: &str = "\
commands:
  list               show source clips
  effects            show effect toggles and probabilities
  toggle <effect>    enable/disable an effect for this session
  seed [n]           pin the seed (no argument clears the pin)
  preview [n]        render a preview of source #n (default: first)
  help               this text
  quit               leave interactive mode";

pub(crate) fn run(ws: &Workspace) -> anyhow::Result<()> {
    ws.ensure_dirs()?;
    let mut resolved = load_config(&ws.config_path())?;
    let mut pinned_seed: Option<u64> = None;

    println!("clipchaos interactive - type `help` for commands");
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("chaos> ");
        std::io::stdout().flush().context("flush prompt")?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("read command")?;
        let mut words = line.split_whitespace();
        match words.next() {
            None => {}
            Some("help") => println!("{HELP}"),
            Some("quit") | Some("exit") => break,
            Some("list") => {
                let sources = ws.sources()?;
                if sources.is_empty() {
                    println!("no sources");
                }
                for (index, path) in sources.iter().enumerate() {
                    if let Some(name) = path.file_name() {
                        println!("{}. {}", index + 1, name.to_string_lossy());
                    }
                }
            }
            Some("effects") => {
                for setting in &resolved.settings {
                    let marker = if setting.enabled { "on " } else { "off" };
                    println!("[{marker}] {:<16} p={:.2}", setting.id.name(), setting.probability);
                }
            }
            Some("toggle") => match words.next().and_then(EffectId::from_name) {
                None => println!("usage: toggle <effect> (see `effects` for names)"),
                Some(id) => {
                    for setting in &mut resolved.settings {
                        if setting.id == id {
                            setting.enabled = !setting.enabled;
                            println!(
                                "{} is now {}",
                                id.name(),
                                if setting.enabled { "on" } else { "off" }
                            );
                        }
                    }
                }
            },
            Some("seed") => match words.next() {
                None => {
                    pinned_seed = None;
                    println!("seed unpinned");
                }
                Some(text) => match text.parse::<u64>() {
                    Ok(seed) => {
                        pinned_seed = Some(seed);
                        println!("seed pinned to {seed}");
                    }
                    Err(_) => println!("usage: seed [non-negative integer]"),
                },
            },
            Some("preview") => {
                let sources = ws.sources()?;
                if sources.is_empty() {
                    println!("no sources - add clips first");
                    continue;
                }
                let index = match words.next() {
                    None => 0,
                    Some(text) => match text.parse::<usize>() {
                        Ok(n) if (1..=sources.len()).contains(&n) => n - 1,
                        _ => {
                            println!("usage: preview [1..{}]", sources.len());
                            continue;
                        }
                    },
                };
                let seed = resolve_seed(pinned_seed);
                let out = ws.temp_dir().join("preview_interactive.mp4");
                match render(ws, &resolved, &sources[index], &out, seed, false, None) {
                    Ok(report) => println!(
                        "wrote {} ({} steps, seed {seed})",
                        out.display(),
                        report.steps
                    ),
                    Err(e) => println!("preview failed: {e:#}"),
                }
            }
            Some(other) => println!("unknown command '{other}' - type `help`"),
        }
    }
    Ok(())
}

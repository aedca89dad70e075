//! Lineclamp - clamp text to a number of terminal lines.
//!
//! # Usage
//!
//! ```bash
//! lineclamp --lines 3 notes.txt
//! lineclamp --lines auto --width 40 --json card.json
//! lineclamp --lines 2 --animate=20 --split-on space notes.txt
//! ```

use std::io::stdout;
use std::ops::ControlFlow;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use ratatui::backend::CrosstermBackend;
use ratatui::{Terminal, TerminalOptions, Viewport};
use tracing::warn;

use lineclamp::clamp::{ClampOutcome, ClampReport, LineClamp, StdClock, clamp, clamp_with};
use lineclamp::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};
use lineclamp::layout::CellLayout;
use lineclamp::perf;
use lineclamp::tree::{NodeId, Tree};
use lineclamp::ui::ClampedText;

const FALLBACK_WIDTH: u16 = 80;

/// Clamp text to a number of lines, ending it with an ellipsis
#[derive(Parser, Debug)]
#[command(name = "lineclamp", version, about, long_about = None)]
struct Cli {
    /// Text file to clamp (a JSON tree with --json)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Lines to keep: a count, `auto`, or a height such as `3em`
    #[arg(short, long, value_name = "N|auto|LENGTH")]
    lines: Option<LineClamp>,

    /// Wrap width in cells (defaults to the terminal width)
    #[arg(short, long)]
    width: Option<u16>,

    /// Read FILE as a JSON content tree
    #[arg(long)]
    json: bool,

    /// Truncation delimiter, coarsest first; repeatable (`space` for " ")
    #[arg(long, value_name = "DELIM")]
    split_on: Vec<String>,

    /// Truncate per character instead of at delimiters
    #[arg(long)]
    no_split: bool,

    /// Text appended to truncated content
    #[arg(long)]
    marker: Option<String>,

    /// Use the terminal layout's native line clamping
    #[arg(long)]
    native: bool,

    /// Redraw every truncation step, pausing MS milliseconds between steps
    #[arg(long, value_name = "MS", num_args = 0..=1, require_equals = true, default_missing_value = "1")]
    animate: Option<u64>,

    /// Give up after this many truncation steps
    #[arg(long)]
    max_steps: Option<usize>,

    /// Enable timing output
    #[arg(long)]
    perf: bool,

    /// Write every truncation step to a file
    #[arg(long, value_name = "PATH")]
    step_log: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn load_tree(cli: &Cli, json: bool) -> Result<Tree> {
    let content = std::fs::read_to_string(&cli.file)
        .with_context(|| format!("Failed to read {}", cli.file.display()))?;
    if json {
        Tree::from_json(&content)
            .with_context(|| format!("Failed to parse content tree {}", cli.file.display()))
    } else {
        Ok(Tree::from_plain_text(content.trim_end_matches('\n')))
    }
}

fn terminal_width() -> u16 {
    crossterm::terminal::size()
        .ok()
        .map(|(width, _)| width)
        .filter(|width| *width > 0)
        .unwrap_or(FALLBACK_WIDTH)
}

/// Clamp inside an inline viewport, redrawing the tree after every step.
fn clamp_animated(
    tree: &mut Tree,
    root: NodeId,
    layout: &CellLayout,
    effective: &ConfigFlags,
) -> Result<ClampReport> {
    let config = effective.to_clamp_config();
    let rows = layout.render(tree, root).len().max(1);
    let height = u16::try_from(rows).unwrap_or(u16::MAX);
    let mut terminal = Terminal::with_options(
        CrosstermBackend::new(stdout()),
        TerminalOptions {
            viewport: Viewport::Inline(height),
        },
    )
    .context("Failed to open inline viewport")?;

    let mut draw_error = None;
    let report = clamp_with(tree, root, layout, &config, &mut StdClock, |tree, _| {
        match terminal.draw(|frame| frame.render_widget(ClampedText::new(tree, root), frame.area())) {
            Ok(_) => ControlFlow::Continue(()),
            Err(err) => {
                draw_error = Some(err);
                ControlFlow::Break(())
            }
        }
    })?;
    if let Some(err) = draw_error {
        return Err(err).context("Failed to draw step");
    }
    terminal
        .draw(|frame| frame.render_widget(ClampedText::new(tree, root), frame.area()))
        .context("Failed to draw result")?;
    println!();
    Ok(report)
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    perf::set_enabled(effective.perf);
    let step_log_path = effective
        .step_log
        .clone()
        .or_else(|| std::env::var_os("LINECLAMP_STEP_LOG").map(PathBuf::from));
    if let Err(err) = perf::set_step_log_path(step_log_path.as_deref()) {
        warn!(
            path = ?step_log_path,
            error = %err,
            "failed to initialize step log"
        );
    }

    if !cli.file.exists() {
        anyhow::bail!("File not found: {}", cli.file.display());
    }

    let mut tree = load_tree(&cli, effective.json)?;
    let root = tree.root();
    let width = effective.width.unwrap_or_else(terminal_width);
    let layout = CellLayout::new(width).with_native_clamp(effective.native);

    let report = if effective.animate_ms.is_some() {
        clamp_animated(&mut tree, root, &layout, &effective)?
    } else {
        let report = clamp(&mut tree, root, &layout, &effective.to_clamp_config())?;
        for row in layout.render(&tree, root) {
            println!("{row}");
        }
        report
    };

    match report.outcome {
        ClampOutcome::Exhausted => warn!("all text removed without fitting"),
        ClampOutcome::StepLimit => warn!(steps = report.steps, "step limit reached before a fit"),
        _ => {}
    }
    Ok(())
}

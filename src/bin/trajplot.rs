use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;

use trajplot::{
    CpuRenderer, GifSink, Mode, PlayerConfig, RenderStyle, Trajectory, export,
    label::resolve_font_bytes,
};

#[derive(Parser, Debug)]
#[command(name = "trajplot", version)]
struct Cli {
    /// Force export mode (write the GIF even when a display is available).
    #[arg(long)]
    save: bool,

    /// Input trajectory CSV (columns: time, x, y; extras ignored).
    #[arg(long = "in", default_value = "data/trajectory.csv")]
    in_path: PathBuf,

    /// Output GIF path, used in export mode.
    #[arg(long, default_value = "data/simulation.gif")]
    out: PathBuf,

    /// Replay only rows with this target id (for files carrying a
    /// `target_id` column).
    #[arg(long)]
    target: Option<u64>,

    /// Font file for the overlay label. Without it, well-known system
    /// locations are probed; if none resolves the label is skipped.
    #[arg(long)]
    font: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let cfg = PlayerConfig {
        input: cli.in_path,
        output: cli.out,
        font: cli.font,
        target: cli.target,
        ..PlayerConfig::default()
    };

    let trajectory = Trajectory::load(&cfg.input, cfg.target)
        .with_context(|| format!("load trajectory '{}'", cfg.input.display()))?;

    let font_bytes = resolve_font_bytes(cfg.font.as_deref())?;
    if font_bytes.is_none() {
        tracing::warn!("no overlay font found; rendering without the text label");
    }
    let renderer = CpuRenderer::new(cfg.canvas, RenderStyle::default(), font_bytes)?;

    match Mode::select(cli.save, display_available()) {
        Mode::Interactive => run_interactive(trajectory, renderer, &cfg),
        Mode::Export => run_export(trajectory, renderer, &cfg),
    }
}

fn run_export(
    trajectory: Trajectory,
    mut renderer: CpuRenderer,
    cfg: &PlayerConfig,
) -> anyhow::Result<()> {
    let mut sink = GifSink::new(&cfg.output);
    let summary = export(&trajectory, &mut renderer, cfg.fps, &mut sink)
        .with_context(|| format!("write animation '{}'", cfg.output.display()))?;
    eprintln!(
        "wrote {} ({} frames, {:.1}s at {} fps)",
        cfg.output.display(),
        summary.frames,
        summary.duration_secs,
        cfg.fps.num
    );
    Ok(())
}

#[cfg(feature = "preview")]
fn run_interactive(
    trajectory: Trajectory,
    renderer: CpuRenderer,
    cfg: &PlayerConfig,
) -> anyhow::Result<()> {
    eprintln!("animating {} frames (close the window to quit)", trajectory.len());
    trajplot::preview::run(trajectory, renderer, cfg.frame_interval)?;
    Ok(())
}

#[cfg(not(feature = "preview"))]
fn run_interactive(
    _trajectory: Trajectory,
    _renderer: CpuRenderer,
    _cfg: &PlayerConfig,
) -> anyhow::Result<()> {
    anyhow::bail!("interactive mode selected but this build has no preview support");
}

/// Display detection happens here, at the process boundary; everything
/// below main takes the result as a plain bool.
fn display_available() -> bool {
    if !cfg!(feature = "preview") {
        return false;
    }
    if cfg!(any(windows, target_os = "macos")) {
        return true;
    }
    std::env::var_os("DISPLAY").is_some() || std::env::var_os("WAYLAND_DISPLAY").is_some()
}

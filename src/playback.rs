use std::{path::PathBuf, time::Duration};

use crate::{
    core::{Canvas, Fps, FrameIndex},
    error::TrajplotResult,
    render::CpuRenderer,
    scene::SceneState,
    sink::{FrameSink, SinkConfig},
    trajectory::Trajectory,
};

/// How one run plays back: into a window, or into the output file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Interactive,
    Export,
}

impl Mode {
    /// `--save` forces export; otherwise the presence of a display decides.
    /// `display_available` is resolved by the caller at the process
    /// boundary, never read from the environment here.
    pub fn select(save_requested: bool, display_available: bool) -> Self {
        if save_requested || !display_available {
            Mode::Export
        } else {
            Mode::Interactive
        }
    }
}

/// Playback settings shared by both modes.
#[derive(Clone, Debug)]
pub struct PlayerConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub canvas: Canvas,
    pub fps: Fps,
    /// Target pacing between frames in the preview window, best-effort.
    pub frame_interval: Duration,
    pub font: Option<PathBuf>,
    pub target: Option<u64>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data/trajectory.csv"),
            output: PathBuf::from("data/simulation.gif"),
            canvas: Canvas {
                width: 800,
                height: 800,
            },
            fps: Fps { num: 10, den: 1 },
            frame_interval: Duration::from_millis(10),
            font: None,
            target: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ExportSummary {
    pub frames: u64,
    pub duration_secs: f64,
}

/// Drive every frame through the renderer into `sink`, in order, once.
#[tracing::instrument(skip_all, fields(frames = trajectory.len()))]
pub fn export(
    trajectory: &Trajectory,
    renderer: &mut CpuRenderer,
    fps: Fps,
    sink: &mut dyn FrameSink,
) -> TrajplotResult<ExportSummary> {
    let canvas = renderer.canvas();
    sink.begin(SinkConfig {
        width: canvas.width,
        height: canvas.height,
        fps,
    })?;

    let mut scene = SceneState::new();
    scene.reset();

    let total = trajectory.len() as u64;
    for i in 0..total {
        let state = scene.advance(trajectory, FrameIndex(i))?;
        let frame = renderer.render(&state)?;
        sink.push_frame(FrameIndex(i), &frame)?;
    }

    sink.end()?;
    let summary = ExportSummary {
        frames: total,
        duration_secs: fps.frames_to_secs(total),
    };
    tracing::info!(
        frames = summary.frames,
        duration_secs = summary.duration_secs,
        "export complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_flag_forces_export() {
        assert_eq!(Mode::select(true, true), Mode::Export);
        assert_eq!(Mode::select(true, false), Mode::Export);
    }

    #[test]
    fn no_display_means_export() {
        assert_eq!(Mode::select(false, false), Mode::Export);
    }

    #[test]
    fn display_without_save_means_interactive() {
        assert_eq!(Mode::select(false, true), Mode::Interactive);
    }

    #[test]
    fn default_config_matches_fixed_paths() {
        let cfg = PlayerConfig::default();
        assert_eq!(cfg.input, PathBuf::from("data/trajectory.csv"));
        assert_eq!(cfg.output, PathBuf::from("data/simulation.gif"));
        assert_eq!(cfg.fps, Fps { num: 10, den: 1 });
        assert_eq!(cfg.frame_interval, Duration::from_millis(10));
    }
}

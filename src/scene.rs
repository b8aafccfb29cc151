use kurbo::Point;

use crate::{
    core::FrameIndex,
    error::TrajplotResult,
    trail::Trail,
    trajectory::Trajectory,
    viewport::Viewport,
};

/// Everything the rasterizer needs for one frame: the moved marker, the
/// trail so far, the refitted viewport and the overlay text. Plain data,
/// no drawing-surface handles.
#[derive(Clone, Copy, Debug)]
pub struct FrameState<'a> {
    pub frame: FrameIndex,
    pub time: f64,
    pub marker: Point,
    pub trail: &'a [Point],
    pub viewport: Viewport,
    pub label: &'a str,
}

/// Mutable replay state: owns the trail and the current viewport, advanced
/// one frame at a time by the playback driver. Frames must be supplied in
/// order starting from 0 (call [`SceneState::reset`] before re-driving).
#[derive(Clone, Debug)]
pub struct SceneState {
    trail: Trail,
    viewport: Viewport,
    label: String,
}

impl SceneState {
    pub fn new() -> Self {
        Self {
            trail: Trail::new(),
            viewport: Viewport::DEFAULT,
            label: String::new(),
        }
    }

    /// Blank state before frame 0: empty trail, default window, no label.
    pub fn reset(&mut self) {
        self.trail.clear();
        self.viewport = Viewport::DEFAULT;
        self.label.clear();
    }

    /// Process frame `frame`: append the sample position to the trail,
    /// refit the viewport over the whole trail and refresh the overlay
    /// label. Returns the frame's visual state.
    pub fn advance(
        &mut self,
        trajectory: &Trajectory,
        frame: FrameIndex,
    ) -> TrajplotResult<FrameState<'_>> {
        let sample = trajectory.get(frame)?;
        let marker = Point::new(sample.x, sample.y);

        self.trail.push(marker);
        // bounds() is Some after the push above.
        if let Some(bounds) = self.trail.bounds() {
            self.viewport = Viewport::fit(bounds);
        }

        self.label.clear();
        use std::fmt::Write as _;
        let _ = write!(
            self.label,
            "Time: {:.1}s\nPos: ({:.1}, {:.1})",
            sample.time, sample.x, sample.y
        );

        Ok(FrameState {
            frame,
            time: sample.time,
            marker,
            trail: self.trail.points(),
            viewport: self.viewport,
            label: &self.label,
        })
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}

impl Default for SceneState {
    fn default() -> Self {
        Self::new()
    }
}

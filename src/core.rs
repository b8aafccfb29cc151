use crate::error::{TrajplotError, TrajplotResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> TrajplotResult<Self> {
        if den == 0 {
            return Err(TrajplotError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(TrajplotError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }

    /// Per-frame delay in whole milliseconds, rounded.
    pub fn frame_delay_ms(self) -> u32 {
        (self.frame_duration_secs() * 1000.0).round() as u32
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn validate(&self) -> TrajplotResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(TrajplotError::validation(
                "canvas width/height must be > 0",
            ));
        }
        if self.width > u16::MAX as u32 || self.height > u16::MAX as u32 {
            return Err(TrajplotError::validation(
                "canvas width/height must fit in u16 (cpu raster limit)",
            ));
        }
        Ok(())
    }
}

use crate::{
    core::{Fps, FrameIndex},
    error::TrajplotResult,
    render::FrameRGBA,
};

/// Configuration provided to a [`FrameSink`] at the start of a drive.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
}

/// Sink contract for consuming rendered frames in timeline order.
///
/// Ordering contract: `push_frame` is called in strictly increasing
/// `FrameIndex` order, starting at 0.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> TrajplotResult<()>;
    /// Push one frame in strictly increasing timeline order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> TrajplotResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> TrajplotResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg.clone()
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> TrajplotResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> TrajplotResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> TrajplotResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_sink_collects_in_order() {
        let mut sink = InMemorySink::new();
        sink.begin(SinkConfig {
            width: 4,
            height: 4,
            fps: Fps::new(10, 1).unwrap(),
        })
        .unwrap();
        for i in 0..3 {
            let frame = FrameRGBA {
                width: 4,
                height: 4,
                data: vec![i as u8; 4 * 4 * 4],
            };
            sink.push_frame(FrameIndex(i), &frame).unwrap();
        }
        sink.end().unwrap();
        assert_eq!(sink.frames().len(), 3);
        assert_eq!(sink.frames()[2].0, FrameIndex(2));
        assert_eq!(sink.config().unwrap().fps.num, 10);
    }

    #[test]
    fn begin_clears_previous_run() {
        let mut sink = InMemorySink::new();
        let cfg = SinkConfig {
            width: 1,
            height: 1,
            fps: Fps::new(10, 1).unwrap(),
        };
        sink.begin(cfg.clone()).unwrap();
        sink.push_frame(
            FrameIndex(0),
            &FrameRGBA {
                width: 1,
                height: 1,
                data: vec![0; 4],
            },
        )
        .unwrap();
        sink.begin(cfg).unwrap();
        assert!(sink.frames().is_empty());
    }
}

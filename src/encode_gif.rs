use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};

use crate::{
    core::FrameIndex,
    error::{TrajplotError, TrajplotResult},
    render::FrameRGBA,
    sink::{FrameSink, SinkConfig},
};

pub fn ensure_parent_dir(path: &Path) -> TrajplotResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Streams frames into an animated GIF at `out_path`. The file is written
/// incrementally; dropping the inner encoder in [`FrameSink::end`] finishes
/// the stream. An existing file is overwritten.
pub struct GifSink {
    out_path: PathBuf,
    encoder: Option<(GifEncoder<BufWriter<File>>, Delay)>,
    frames_written: u64,
}

impl GifSink {
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            encoder: None,
            frames_written: 0,
        }
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    pub fn out_path(&self) -> &Path {
        &self.out_path
    }
}

impl FrameSink for GifSink {
    fn begin(&mut self, cfg: SinkConfig) -> TrajplotResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(TrajplotError::validation(
                "gif width/height must be non-zero",
            ));
        }
        ensure_parent_dir(&self.out_path)?;

        let file = File::create(&self.out_path).map_err(|e| {
            TrajplotError::encode(format!(
                "failed to create '{}': {e}",
                self.out_path.display()
            ))
        })?;
        let mut encoder = GifEncoder::new(BufWriter::new(file));
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| TrajplotError::encode(format!("failed to set gif repeat: {e}")))?;

        // fps num/den -> per-frame delay of 1000*den/num milliseconds.
        let delay = Delay::from_numer_denom_ms(1000 * cfg.fps.den, cfg.fps.num);
        self.encoder = Some((encoder, delay));
        self.frames_written = 0;
        Ok(())
    }

    fn push_frame(&mut self, _idx: FrameIndex, frame: &FrameRGBA) -> TrajplotResult<()> {
        let Some((encoder, delay)) = self.encoder.as_mut() else {
            return Err(TrajplotError::encode("gif sink used before begin"));
        };

        let expected = (frame.width as usize) * (frame.height as usize) * 4;
        if frame.data.len() != expected {
            return Err(TrajplotError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }

        // GIF has no partial transparency; frames clear to an opaque
        // background, so force the alpha channel rather than dithering it.
        let mut data = frame.data.clone();
        for px in data.chunks_exact_mut(4) {
            px[3] = 255;
        }

        let img = RgbaImage::from_raw(frame.width, frame.height, data)
            .ok_or_else(|| TrajplotError::encode("frame buffer does not match dimensions"))?;
        encoder
            .encode_frame(Frame::from_parts(img, 0, 0, *delay))
            .map_err(|e| TrajplotError::encode(format!("failed to encode gif frame: {e}")))?;

        self.frames_written += 1;
        Ok(())
    }

    fn end(&mut self) -> TrajplotResult<()> {
        if self.encoder.take().is_none() {
            return Err(TrajplotError::encode("gif sink ended before begin"));
        }
        if self.frames_written == 0 {
            return Err(TrajplotError::encode("gif stream contains no frames"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Fps;

    fn solid_frame(width: u32, height: u32, rgba: [u8; 4]) -> FrameRGBA {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            data.extend_from_slice(&rgba);
        }
        FrameRGBA {
            width,
            height,
            data,
        }
    }

    #[test]
    fn writes_a_gif_file() {
        let dir = PathBuf::from("target").join("gif_sink_test");
        std::fs::create_dir_all(&dir).unwrap();
        let out = dir.join("out.gif");
        let _ = std::fs::remove_file(&out);

        let mut sink = GifSink::new(&out);
        sink.begin(SinkConfig {
            width: 8,
            height: 8,
            fps: Fps::new(10, 1).unwrap(),
        })
        .unwrap();
        for i in 0..3u64 {
            sink.push_frame(FrameIndex(i), &solid_frame(8, 8, [200, 10, 10, 255]))
                .unwrap();
        }
        sink.end().unwrap();

        assert_eq!(sink.frames_written(), 3);
        let bytes = std::fs::read(&out).unwrap();
        assert!(bytes.starts_with(b"GIF89a"));
    }

    #[test]
    fn push_before_begin_fails() {
        let mut sink = GifSink::new("target/gif_sink_test/never.gif");
        let err = sink
            .push_frame(FrameIndex(0), &solid_frame(2, 2, [0, 0, 0, 255]))
            .unwrap_err();
        assert!(err.to_string().contains("before begin"));
    }

    #[test]
    fn size_mismatch_is_rejected() {
        let dir = PathBuf::from("target").join("gif_sink_test");
        std::fs::create_dir_all(&dir).unwrap();
        let mut sink = GifSink::new(dir.join("mismatch.gif"));
        sink.begin(SinkConfig {
            width: 4,
            height: 4,
            fps: Fps::new(10, 1).unwrap(),
        })
        .unwrap();
        let bad = FrameRGBA {
            width: 4,
            height: 4,
            data: vec![0; 7],
        };
        assert!(sink.push_frame(FrameIndex(0), &bad).is_err());
    }
}

#![forbid(unsafe_code)]

pub mod core;
pub mod encode_gif;
pub mod error;
pub mod label;
pub mod playback;
#[cfg(feature = "preview")]
pub mod preview;
pub mod render;
pub mod scene;
pub mod sink;
pub mod trail;
pub mod trajectory;
pub mod viewport;

pub use crate::core::{Canvas, Fps, FrameIndex};
pub use encode_gif::GifSink;
pub use error::{TrajplotError, TrajplotResult};
pub use playback::{ExportSummary, Mode, PlayerConfig, export};
pub use render::{CpuRenderer, FrameRGBA, RenderStyle};
pub use scene::{FrameState, SceneState};
pub use sink::{FrameSink, InMemorySink, SinkConfig};
pub use trail::Trail;
pub use trajectory::{Sample, Trajectory};
pub use viewport::Viewport;

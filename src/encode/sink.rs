use crate::foundation::core::{Canvas, FrameIndex};
use crate::foundation::error::{CountdownError, CountdownResult};
use crate::render::surface::PixelSurface;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Display time of every frame, in milliseconds.
    pub delay_ms: u32,
    /// Whether playback should repeat forever.
    pub loop_forever: bool,
}

impl SinkConfig {
    /// Config for the countdown canvas with the given per-frame delay.
    pub fn for_canvas(canvas: Canvas, delay_ms: u32, loop_forever: bool) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            delay_ms,
            loop_forever,
        }
    }

    /// Reject frames whose size differs from the configured one.
    pub fn check_frame(&self, frame: &PixelSurface) -> CountdownResult<()> {
        if frame.width != self.width || frame.height != self.height {
            return Err(CountdownError::encode(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, self.width, self.height
            )));
        }
        if frame.data.len() != frame.canvas().rgba_len() {
            return Err(CountdownError::encode(
                "frame.data size mismatch with width*height*4",
            ));
        }
        Ok(())
    }
}

/// Consumer of rendered frames in playback order.
///
/// `push_frame` is called with strictly increasing, gap-free [`FrameIndex`] values starting at 0.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> CountdownResult<()>;
    /// Push the next frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &PixelSurface) -> CountdownResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> CountdownResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, PixelSurface)>,
    finished: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Captured frames, in push order.
    pub fn frames(&self) -> &[(FrameIndex, PixelSurface)] {
        &self.frames
    }

    /// `true` once `end` has been called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> CountdownResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &PixelSurface) -> CountdownResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| CountdownError::encode("push_frame called before begin"))?;
        cfg.check_frame(frame)?;
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> CountdownResult<()> {
        self.finished = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;

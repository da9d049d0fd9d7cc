use std::{borrow::Cow, rc::Rc};

use crate::{
    foundation::core::FrameIndex,
    foundation::error::{CountdownError, CountdownResult},
    render::surface::PixelSurface,
};

use super::sink::{FrameSink, SinkConfig};

/// Options for the GIF Container Encoder.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GifEncodeOpts {
    /// Write the NETSCAPE2.0 extension with an infinite loop count.
    pub loop_forever: bool,
    /// Per-frame delay in milliseconds (stored in centiseconds).
    pub delay_ms: u32,
    /// Palette search quality, `1..=30`; higher is finer and slower.
    pub quality: u8,
}

impl Default for GifEncodeOpts {
    fn default() -> Self {
        Self {
            loop_forever: true,
            delay_ms: 1000,
            quality: 21,
        }
    }
}

impl GifEncodeOpts {
    /// Highest accepted quality.
    pub const MAX_QUALITY: u8 = 30;

    /// Check ranges.
    pub fn validate(&self) -> CountdownResult<()> {
        if self.quality == 0 || self.quality > Self::MAX_QUALITY {
            return Err(CountdownError::validation(format!(
                "gif quality must be in 1..={}, got {}",
                Self::MAX_QUALITY,
                self.quality
            )));
        }
        if self.delay_ms / 10 > u32::from(u16::MAX) {
            return Err(CountdownError::validation(
                "gif frame delay exceeds 655350 ms",
            ));
        }
        Ok(())
    }

    /// Delay in the format's centisecond unit.
    pub fn delay_centis(&self) -> u16 {
        (self.delay_ms / 10).min(u32::from(u16::MAX)) as u16
    }

    /// NeuQuant sampling factor: 1 samples every pixel, 30 every 30th.
    fn sample_factor(&self) -> i32 {
        i32::from(Self::MAX_QUALITY + 1 - self.quality.clamp(1, Self::MAX_QUALITY))
    }
}

/// [`FrameSink`] that accumulates frames and writes one looping GIF on `end`.
///
/// The first frame's palette becomes the global color table; later frames carry local tables.
/// Identical consecutive frames reuse the previous quantization.
#[derive(Debug)]
pub struct GifSink {
    opts: GifEncodeOpts,
    cfg: Option<SinkConfig>,
    next: u64,
    frames: Vec<Vec<u8>>,
    scratch: Vec<u8>,
    bytes: Option<Vec<u8>>,
}

impl GifSink {
    /// Sink with validated options.
    pub fn new(opts: GifEncodeOpts) -> CountdownResult<Self> {
        opts.validate()?;
        Ok(Self {
            opts,
            cfg: None,
            next: 0,
            frames: Vec::new(),
            scratch: Vec::new(),
            bytes: None,
        })
    }

    /// Encoded stream, available after `end`.
    pub fn bytes(&self) -> Option<&[u8]> {
        self.bytes.as_deref()
    }

    /// Take the encoded stream; errors if `end` has not run.
    pub fn into_bytes(self) -> CountdownResult<Vec<u8>> {
        self.bytes
            .ok_or_else(|| CountdownError::encode("gif sink was not finished"))
    }
}

impl FrameSink for GifSink {
    fn begin(&mut self, cfg: SinkConfig) -> CountdownResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(CountdownError::encode("gif width/height must be non-zero"));
        }
        if cfg.width > u32::from(u16::MAX) || cfg.height > u32::from(u16::MAX) {
            return Err(CountdownError::encode("gif width/height exceed 65535"));
        }
        self.opts.delay_ms = cfg.delay_ms;
        self.opts.loop_forever = cfg.loop_forever;
        self.opts.validate()?;
        self.scratch = vec![0u8; (cfg.width as usize) * (cfg.height as usize) * 4];
        self.cfg = Some(cfg);
        self.next = 0;
        self.frames.clear();
        self.bytes = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &PixelSurface) -> CountdownResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| CountdownError::encode("push_frame called before begin"))?;
        if idx.0 != self.next {
            return Err(CountdownError::encode(format!(
                "frames must arrive in order: expected {}, got {}",
                self.next, idx.0
            )));
        }
        cfg.check_frame(frame)?;
        flatten_to_opaque_rgba8(
            &mut self.scratch,
            &frame.data,
            frame.premultiplied,
            [0, 0, 0, 255],
        )?;
        self.frames.push(self.scratch.clone());
        self.next += 1;
        Ok(())
    }

    fn end(&mut self) -> CountdownResult<()> {
        let cfg = self
            .cfg
            .take()
            .ok_or_else(|| CountdownError::encode("end called before begin"))?;
        let frames = std::mem::take(&mut self.frames);
        self.bytes = Some(write_gif(&frames, &cfg, &self.opts)?);
        Ok(())
    }
}

/// Encode a finished frame sequence into one GIF byte stream.
#[tracing::instrument(skip_all, fields(frames = frames.len(), quality = opts.quality))]
pub fn encode_gif(frames: &[PixelSurface], opts: &GifEncodeOpts) -> CountdownResult<Vec<u8>> {
    let first = frames
        .first()
        .ok_or_else(|| CountdownError::encode("cannot encode an empty frame sequence"))?;

    let mut sink = GifSink::new(opts.clone())?;
    sink.begin(SinkConfig {
        width: first.width,
        height: first.height,
        delay_ms: opts.delay_ms,
        loop_forever: opts.loop_forever,
    })?;
    for (i, frame) in frames.iter().enumerate() {
        sink.push_frame(FrameIndex(i as u64), frame)?;
    }
    sink.end()?;
    sink.into_bytes()
}

struct Quantized {
    palette: Vec<u8>,
    indices: Vec<u8>,
}

fn quantize(rgba: &[u8], sample_factor: i32) -> Quantized {
    let nq = color_quant::NeuQuant::new(sample_factor, 256, rgba);
    let indices = rgba
        .chunks_exact(4)
        .map(|px| nq.index_of(px) as u8)
        .collect();
    Quantized {
        palette: nq.color_map_rgb(),
        indices,
    }
}

fn write_gif(
    frames: &[Vec<u8>],
    cfg: &SinkConfig,
    opts: &GifEncodeOpts,
) -> CountdownResult<Vec<u8>> {
    if frames.is_empty() {
        return Err(CountdownError::encode(
            "cannot encode an empty frame sequence",
        ));
    }
    let w = u16::try_from(cfg.width).map_err(|_| CountdownError::encode("gif width exceeds u16"))?;
    let h =
        u16::try_from(cfg.height).map_err(|_| CountdownError::encode("gif height exceeds u16"))?;
    let sample_factor = opts.sample_factor();
    let gif_err = |e: gif::EncodingError| CountdownError::encode(format!("gif: {e}"));

    let mut quantized: Vec<Rc<Quantized>> = Vec::with_capacity(frames.len());
    for (i, rgba) in frames.iter().enumerate() {
        let q = match i.checked_sub(1) {
            Some(prev) if frames[prev] == *rgba => quantized[prev].clone(),
            _ => Rc::new(quantize(rgba, sample_factor)),
        };
        quantized.push(q);
    }

    let mut encoder =
        gif::Encoder::new(Vec::new(), w, h, &quantized[0].palette).map_err(gif_err)?;
    if opts.loop_forever {
        encoder.set_repeat(gif::Repeat::Infinite).map_err(gif_err)?;
    }
    for (i, q) in quantized.iter().enumerate() {
        let frame = gif::Frame {
            width: w,
            height: h,
            delay: opts.delay_centis(),
            dispose: gif::DisposalMethod::Keep,
            palette: (i > 0).then(|| q.palette.clone()),
            buffer: Cow::Borrowed(q.indices.as_slice()),
            ..gif::Frame::default()
        };
        encoder.write_frame(&frame).map_err(gif_err)?;
    }
    let bytes = encoder
        .into_inner()
        .map_err(|e| CountdownError::encode(format!("gif: {e}")))?;

    tracing::debug!(frames = frames.len(), bytes = bytes.len(), "encoded gif");
    Ok(bytes)
}

/// Composite RGBA8 over an opaque background, producing opaque RGBA8.
fn flatten_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    src_is_premul: bool,
    bg_rgba: [u8; 4],
) -> CountdownResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(CountdownError::encode(
            "flatten_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg = [
        u16::from(bg_rgba[0]),
        u16::from(bg_rgba[1]),
        u16::from(bg_rgba[2]),
    ];
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255 - a;
        for c in 0..3 {
            let fg = if src_is_premul {
                u16::from(s[c])
            } else {
                mul_div255(u16::from(s[c]), a)
            };
            d[c] = (fg + mul_div255(bg[c], inv)).min(255) as u8;
        }
        d[3] = 255;
    }
    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use rayon::prelude::*;

use crate::{
    catalog::{labels::Language, style::StyleId},
    encode::{
        gif::{GifEncodeOpts, GifSink},
        sink::{FrameSink, SinkConfig},
    },
    foundation::{
        color::Rgb8,
        core::{Canvas, FrameIndex},
        error::{CountdownError, CountdownResult},
    },
    render::{cpu::FrameRenderer, fonts::FontBook, surface::PixelSurface},
    time::engine::{Countdown, compute_in, resolve_timezone},
};

/// Everything needed to render one countdown animation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimerSpec {
    /// Target instant.
    pub end_instant: DateTime<Utc>,
    /// IANA zone identifier; unknown names count as UTC.
    pub timezone: String,
    /// Visual style.
    pub style: StyleId,
    /// Display color.
    pub color: Rgb8,
    /// Label language.
    pub language: Language,
}

impl TimerSpec {
    /// Timer in UTC with the `modern` style and English labels.
    pub fn new(end_instant: DateTime<Utc>, color: Rgb8) -> Self {
        Self {
            end_instant,
            timezone: "UTC".to_string(),
            style: StyleId::Modern,
            color,
            language: Language::En,
        }
    }

    /// Replace the timezone.
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    /// Replace the style.
    pub fn with_style(mut self, style: StyleId) -> Self {
        self.style = style;
        self
    }

    /// Replace the label language.
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Threading and elision controls for multi-frame rendering.
pub struct RenderThreading {
    /// Render frames on a rayon pool when `true`.
    pub parallel: bool,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
    /// Render each distinct countdown value once and reuse the surface for repeats.
    pub static_frame_elision: bool,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            threads: None,
            static_frame_elision: true,
        }
    }
}

/// Animation Driver options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnimateOpts {
    /// Number of ticks (frames) to render.
    pub frame_count: u32,
    /// Time between ticks, in milliseconds.
    pub tick_ms: u64,
    /// Threading configuration.
    pub threading: RenderThreading,
}

impl Default for AnimateOpts {
    fn default() -> Self {
        Self {
            frame_count: 60,
            tick_ms: 1000,
            threading: RenderThreading::default(),
        }
    }
}

impl AnimateOpts {
    /// Check ranges.
    pub fn validate(&self) -> CountdownResult<()> {
        if self.frame_count == 0 {
            return Err(CountdownError::validation("frame_count must be >= 1"));
        }
        if let Some(0) = self.threading.threads {
            return Err(CountdownError::validation(
                "render threading 'threads' must be >= 1 when set",
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Aggregated rendering counters.
pub struct RenderStats {
    /// Total requested frames.
    pub frames_total: u64,
    /// Frames that were actually rendered.
    pub frames_rendered: u64,
    /// Frames reused via static-frame elision.
    pub frames_elided: u64,
}

/// Countdown value at every tick: `now + i * tick_ms` for `i` in `0..frame_count`.
pub fn tick_countdowns(
    spec: &TimerSpec,
    now: DateTime<Utc>,
    opts: &AnimateOpts,
) -> CountdownResult<Vec<Countdown>> {
    let tz = resolve_timezone(&spec.timezone);
    let tick = i64::try_from(opts.tick_ms)
        .ok()
        .and_then(TimeDelta::try_milliseconds)
        .ok_or_else(|| CountdownError::validation("tick_ms out of range"))?;
    (0..opts.frame_count)
        .map(|i| Ok(compute_in(spec.end_instant, tick_instant(now, tick, i)?, tz)))
        .collect()
}

/// `now + i * tick`, rejecting tick indices and instants chrono cannot represent.
fn tick_instant(now: DateTime<Utc>, tick: TimeDelta, i: u32) -> CountdownResult<DateTime<Utc>> {
    let i = i32::try_from(i)
        .map_err(|_| CountdownError::validation(format!("tick index {i} exceeds i32::MAX")))?;
    tick.checked_mul(i)
        .and_then(|offset| now.checked_add_signed(offset))
        .ok_or_else(|| CountdownError::validation("tick instant out of range"))
}

/// Render the full frame sequence, in playback order.
pub fn animate(
    spec: &TimerSpec,
    now: DateTime<Utc>,
    fonts: &FontBook,
    opts: &AnimateOpts,
) -> CountdownResult<Vec<PixelSurface>> {
    animate_with_stats(spec, now, fonts, opts).map(|(frames, _)| frames)
}

/// Render the full frame sequence and report rendering counters.
#[tracing::instrument(skip(fonts), fields(style = spec.style.name()))]
pub fn animate_with_stats(
    spec: &TimerSpec,
    now: DateTime<Utc>,
    fonts: &FontBook,
    opts: &AnimateOpts,
) -> CountdownResult<(Vec<PixelSurface>, RenderStats)> {
    opts.validate()?;
    let countdowns = tick_countdowns(spec, now, opts)?;
    let plan = FramePlan::new(&countdowns, opts.threading.static_frame_elision);
    let unique = render_unique(spec, fonts, &plan.unique, &opts.threading)?;

    let frames = plan
        .frame_to_unique
        .iter()
        .map(|&u| unique[u].clone())
        .collect::<Vec<_>>();
    let stats = plan.stats();
    tracing::debug!(
        rendered = stats.frames_rendered,
        elided = stats.frames_elided,
        "animation rendered"
    );
    Ok((frames, stats))
}

/// Render only the first tick (a static preview).
pub fn render_still(
    spec: &TimerSpec,
    now: DateTime<Utc>,
    fonts: &FontBook,
) -> CountdownResult<PixelSurface> {
    let countdown = compute_in(spec.end_instant, now, resolve_timezone(&spec.timezone));
    FrameRenderer::new(fonts).render(
        countdown,
        &spec.style.bundle(),
        &spec.language.labels(),
        spec.color,
    )
}

/// Render the animation and push every frame, in order, into `sink`.
pub fn render_to_sink(
    spec: &TimerSpec,
    now: DateTime<Utc>,
    fonts: &FontBook,
    opts: &AnimateOpts,
    sink: &mut dyn FrameSink,
    cfg: SinkConfig,
) -> CountdownResult<RenderStats> {
    let (frames, stats) = animate_with_stats(spec, now, fonts, opts)?;
    sink.begin(cfg)?;
    for (i, frame) in frames.iter().enumerate() {
        sink.push_frame(FrameIndex(i as u64), frame)?;
    }
    sink.end()?;
    Ok(stats)
}

/// Animation Driver plus Container Encoder: the bytes of one looping countdown GIF.
#[tracing::instrument(skip(fonts, opts, gif), fields(style = spec.style.name(), frames = opts.frame_count))]
pub fn render_countdown_gif(
    spec: &TimerSpec,
    now: DateTime<Utc>,
    fonts: &FontBook,
    opts: &AnimateOpts,
    gif: &GifEncodeOpts,
) -> CountdownResult<Vec<u8>> {
    let mut sink = GifSink::new(gif.clone())?;
    let cfg = SinkConfig::for_canvas(Canvas::COUNTDOWN, gif.delay_ms, gif.loop_forever);
    render_to_sink(spec, now, fonts, opts, &mut sink, cfg)?;
    sink.into_bytes()
}

/// Which ticks need rendering and which reuse an earlier surface.
struct FramePlan {
    unique: Vec<Countdown>,
    frame_to_unique: Vec<usize>,
}

impl FramePlan {
    fn new(countdowns: &[Countdown], elide: bool) -> Self {
        if !elide {
            return Self {
                unique: countdowns.to_vec(),
                frame_to_unique: (0..countdowns.len()).collect(),
            };
        }
        let mut first = HashMap::<Countdown, usize>::new();
        let mut unique = Vec::new();
        let mut frame_to_unique = Vec::with_capacity(countdowns.len());
        for &c in countdowns {
            let slot = *first.entry(c).or_insert_with(|| {
                unique.push(c);
                unique.len() - 1
            });
            frame_to_unique.push(slot);
        }
        Self {
            unique,
            frame_to_unique,
        }
    }

    fn stats(&self) -> RenderStats {
        let total = self.frame_to_unique.len() as u64;
        let rendered = self.unique.len() as u64;
        RenderStats {
            frames_total: total,
            frames_rendered: rendered,
            frames_elided: total.saturating_sub(rendered),
        }
    }
}

fn render_unique(
    spec: &TimerSpec,
    fonts: &FontBook,
    countdowns: &[Countdown],
    threading: &RenderThreading,
) -> CountdownResult<Vec<PixelSurface>> {
    let style = spec.style.bundle();
    let labels = spec.language.labels();

    if !threading.parallel {
        let mut renderer = FrameRenderer::new(fonts);
        return countdowns
            .iter()
            .map(|&c| renderer.render(c, &style, &labels, spec.color))
            .collect();
    }

    let pool = build_thread_pool(threading.threads)?;
    pool.install(|| {
        countdowns
            .par_iter()
            .map_init(
                || FrameRenderer::new(fonts),
                |renderer, &c| renderer.render(c, &style, &labels, spec.color),
            )
            .collect::<CountdownResult<Vec<_>>>()
    })
}

fn build_thread_pool(threads: Option<usize>) -> CountdownResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| CountdownError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;

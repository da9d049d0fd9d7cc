//! Countdown timers rendered as looping, email-embeddable GIFs.
//!
//! A render is a pure function of a [`TimerSpec`] and the current instant:
//!
//! - the Time Engine turns the timer's end instant into a [`Countdown`] per tick
//! - the [`FrameRenderer`] draws each tick onto a 400x120 [`PixelSurface`]
//! - the Animation Driver ([`animate`]) collects 60 one-second ticks
//! - the GIF encoder ([`encode_gif`], [`GifSink`]) writes them as one infinitely looping stream
//!
//! [`render_countdown_gif`] runs the whole chain. The [`serve`] module maps a stored
//! [`TimerRecord`] onto an HTTP-style response.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Style and label lookup tables.
pub mod catalog;
/// Encoding sinks.
pub mod encode;
/// Rendering.
pub mod render;
/// Record, store and HTTP mapping.
pub mod serve;
/// Time Engine.
pub mod time;

pub use crate::foundation::color::{Rgb8, adjust_color};
pub use crate::foundation::core::{Canvas, FrameIndex, Rgba8, Rgba8Premul};
pub use crate::foundation::error::{CountdownError, CountdownResult};

pub use crate::catalog::labels::{LabelBundle, Language, labels_of};
pub use crate::catalog::style::{StyleBundle, StyleId, style_of};
pub use crate::encode::gif::{GifEncodeOpts, GifSink, encode_gif};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::render::cpu::{FrameRenderer, render_frame};
pub use crate::render::fonts::{FontBook, FontFace, FontRole};
pub use crate::render::pipeline::{
    AnimateOpts, RenderStats, RenderThreading, TimerSpec, animate, animate_with_stats,
    render_countdown_gif, render_still, render_to_sink, tick_countdowns,
};
pub use crate::render::surface::PixelSurface;
pub use crate::serve::handler::{ServeOpts, TimerResponse, handle_timer_request};
pub use crate::serve::record::{TimerRecord, parse_instant};
pub use crate::serve::store::{InMemoryTimerStore, TimerStore};
pub use crate::time::engine::{Countdown, TimeBreakdown, compute, compute_in, resolve_timezone};
pub use crate::time::zones::{TimezoneOption, common_timezones, timezone_options};

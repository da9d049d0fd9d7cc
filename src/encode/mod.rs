//! Encoding sinks.
//!
//! Sinks consume rendered frames in playback order.

/// Looping GIF encoder.
pub mod gif;
/// Generic frame sink trait and built-in sinks.
pub mod sink;

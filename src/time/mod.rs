//! Time Engine and timezone listings.

/// Countdown arithmetic.
pub mod engine;
/// Curated timezone options.
pub mod zones;

/// Canvas, frame index and pixel value types.
pub mod core;
/// Hex RGB colors and the brightening law.
pub mod color;
/// Crate error type.
pub mod error;

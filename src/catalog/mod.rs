/// Unit labels per language.
pub mod labels;
/// Visual parameters per style.
pub mod style;

use crate::foundation::core::Rgba8;

/// Visual style identifiers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StyleId {
    /// Light grey background, faint filled boxes.
    #[default]
    Modern,
    /// White background, no boxes.
    Minimal,
    /// White background, boxes outlined in the display color.
    Classic,
    /// Black background, dark boxes with a colored halo, glowing digits.
    Neon,
    /// Near-white background, soft gradient boxes, gradient digits.
    Gradient,
    /// Dark background, translucent bordered boxes.
    Elegant,
}

impl StyleId {
    /// Every style, `Modern` first.
    pub const ALL: [StyleId; 6] = [
        StyleId::Modern,
        StyleId::Minimal,
        StyleId::Classic,
        StyleId::Neon,
        StyleId::Gradient,
        StyleId::Elegant,
    ];

    /// Lowercase identifier used in records.
    pub fn name(self) -> &'static str {
        match self {
            StyleId::Modern => "modern",
            StyleId::Minimal => "minimal",
            StyleId::Classic => "classic",
            StyleId::Neon => "neon",
            StyleId::Gradient => "gradient",
            StyleId::Elegant => "elegant",
        }
    }

    /// Exact lookup (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.name().eq_ignore_ascii_case(name))
    }

    /// Total lookup: unknown names resolve to [`StyleId::Modern`].
    pub fn resolve(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            tracing::debug!(style = name, "unknown style, using modern");
            StyleId::Modern
        })
    }

    /// The static bundle for this style.
    pub fn bundle(self) -> StyleBundle {
        let label = Rgba8::opaque(0x66, 0x66, 0x66);
        let standard_box = CellBox {
            width: 60.0,
            height: 70.0,
            radius: 8.0,
            top: -40.0,
        };

        let (background, cell, decoration, text, label_color) = match self {
            StyleId::Modern => (
                Rgba8::opaque(0xf3, 0xf4, 0xf6),
                standard_box,
                Decoration::Filled {
                    fill: Rgba8::with_alpha(0, 0, 0, 0.1),
                },
                TextTreatment::Plain,
                label,
            ),
            StyleId::Minimal => (
                Rgba8::opaque(0xff, 0xff, 0xff),
                standard_box,
                Decoration::None,
                TextTreatment::Plain,
                label,
            ),
            StyleId::Classic => (
                Rgba8::opaque(0xff, 0xff, 0xff),
                standard_box,
                Decoration::Outlined {
                    stroke: Ink::Accent,
                    width: 2.0,
                },
                TextTreatment::Plain,
                label,
            ),
            StyleId::Neon => (
                Rgba8::opaque(0, 0, 0),
                standard_box,
                Decoration::GlowBacked {
                    fill: Rgba8::opaque(0, 0, 0),
                    glow: Glow { sigma: 4.0 },
                },
                TextTreatment::Glow(Glow { sigma: 7.5 }),
                label,
            ),
            StyleId::Gradient => (
                Rgba8::opaque(0xf8, 0xfa, 0xfc),
                standard_box,
                Decoration::Gradient {
                    start: Rgba8::opaque(0xff, 0xff, 0xff),
                    end: Rgba8::opaque(0xf8, 0xf9, 0xfa),
                    border: Rgba8::with_alpha(0, 0, 0, 0.05),
                    border_width: 1.0,
                    shadow: Shadow {
                        color: Rgba8::with_alpha(0, 0, 0, 0.1),
                        sigma: 4.0,
                        offset_y: 2.0,
                    },
                },
                TextTreatment::Gradient {
                    brighten_percent: 30,
                },
                label,
            ),
            StyleId::Elegant => (
                Rgba8::opaque(0x1f, 0x1f, 0x1f),
                CellBox {
                    width: 70.0,
                    height: 80.0,
                    radius: 12.0,
                    top: -45.0,
                },
                Decoration::Translucent {
                    fill: Rgba8::with_alpha(255, 255, 255, 0.1),
                    border: Rgba8::with_alpha(255, 255, 255, 0.1),
                    border_width: 1.0,
                },
                TextTreatment::Plain,
                Rgba8::with_alpha(255, 255, 255, 0.7),
            ),
        };

        StyleBundle {
            id: self,
            background,
            cell,
            decoration,
            text,
            label_color,
            number_size_px: 24.0,
            label_size_px: 12.0,
            label_offset_y: 20.0,
        }
    }
}

/// Color source that is either the timer's display color or a fixed value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Ink {
    /// The timer's display color.
    Accent,
    /// A style-defined color.
    Fixed(Rgba8),
}

/// Rounded box geometry relative to a cell center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellBox {
    /// Box width.
    pub width: f64,
    /// Box height.
    pub height: f64,
    /// Corner radius.
    pub radius: f64,
    /// Offset of the box top from the cell's vertical center (negative is up).
    pub top: f64,
}

/// Gaussian halo drawn in the display color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glow {
    /// Gaussian standard deviation in pixels.
    pub sigma: f32,
}

/// Offset drop shadow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shadow {
    /// Shadow color.
    pub color: Rgba8,
    /// Gaussian standard deviation in pixels.
    pub sigma: f32,
    /// Downward offset in pixels.
    pub offset_y: f64,
}

/// How each time-unit cell is boxed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Decoration {
    /// No box.
    None,
    /// Filled rounded box.
    Filled {
        /// Fill color.
        fill: Rgba8,
    },
    /// Stroked rounded box.
    Outlined {
        /// Stroke color.
        stroke: Ink,
        /// Stroke width.
        width: f64,
    },
    /// Filled rounded box over a halo in the display color.
    GlowBacked {
        /// Fill color.
        fill: Rgba8,
        /// Halo parameters.
        glow: Glow,
    },
    /// Translucent rounded box with a thin border.
    Translucent {
        /// Fill color.
        fill: Rgba8,
        /// Border color.
        border: Rgba8,
        /// Border width.
        border_width: f64,
    },
    /// Diagonal two-stop gradient box with a border and drop shadow.
    Gradient {
        /// Top-left stop.
        start: Rgba8,
        /// Bottom-right stop.
        end: Rgba8,
        /// Border color.
        border: Rgba8,
        /// Border width.
        border_width: f64,
        /// Drop shadow under the box.
        shadow: Shadow,
    },
}

/// How the numeric value is painted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TextTreatment {
    /// Solid display color.
    Plain,
    /// Solid display color over a halo of the same color.
    Glow(Glow),
    /// Diagonal gradient from the display color to the display color brightened by
    /// `brighten_percent` (see [`crate::Rgb8::adjust`]).
    Gradient {
        /// Brightening applied to the second stop.
        brighten_percent: i32,
    },
}

/// Everything the Frame Renderer needs to know about a style.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StyleBundle {
    /// Which style this bundle describes.
    pub id: StyleId,
    /// Full-surface background.
    pub background: Rgba8,
    /// Box geometry.
    pub cell: CellBox,
    /// Box decoration rule.
    pub decoration: Decoration,
    /// Number paint rule.
    pub text: TextTreatment,
    /// Unit label color.
    pub label_color: Rgba8,
    /// Number (and "Expired") font size in pixels.
    pub number_size_px: f32,
    /// Unit label font size in pixels.
    pub label_size_px: f32,
    /// Label baseline offset below the cell's vertical center.
    pub label_offset_y: f64,
}

/// Bundle for a style name; never fails (unknown names use `modern`).
pub fn style_of(name: &str) -> StyleBundle {
    StyleId::resolve(name).bundle()
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/style.rs"]
mod tests;

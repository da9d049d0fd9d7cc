use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{CountdownError, CountdownResult};

/// A rendered frame in RGBA8 format.
///
/// Frames produced by the renderer are **premultiplied** (`premultiplied == true`); the encoder
/// flattens them onto an opaque background before quantization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelSurface {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl PixelSurface {
    /// Wrap premultiplied bytes, checking the length against `canvas`.
    pub fn from_premul_bytes(canvas: Canvas, data: Vec<u8>) -> CountdownResult<Self> {
        if data.len() != canvas.rgba_len() {
            return Err(CountdownError::render(format!(
                "surface byte length {} does not match {}x{}",
                data.len(),
                canvas.width,
                canvas.height
            )));
        }
        Ok(Self {
            width: canvas.width,
            height: canvas.height,
            data,
            premultiplied: true,
        })
    }

    /// A surface filled with a single color.
    pub fn filled(canvas: Canvas, color: Rgba8) -> Self {
        let px = color.premul().to_array();
        Self {
            width: canvas.width,
            height: canvas.height,
            data: px.repeat(canvas.width as usize * canvas.height as usize),
            premultiplied: true,
        }
    }

    /// Dimensions as a [`Canvas`].
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Raw pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Straight-alpha copy of the pixel data (for PNG export).
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = u32::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;

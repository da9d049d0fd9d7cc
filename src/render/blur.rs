use crate::foundation::error::{CountdownError, CountdownResult};

/// Separable Gaussian kernel with Q16 fixed-point weights summing to exactly `1 << 16`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct GaussianKernel {
    weights: Vec<u32>,
}

impl GaussianKernel {
    /// Kernel for standard deviation `sigma`, truncated at `ceil(3 * sigma)` taps per side.
    pub(crate) fn new(sigma: f32) -> CountdownResult<Self> {
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(CountdownError::render("blur sigma must be finite and > 0"));
        }
        let radius = (sigma * 3.0).ceil() as i32;
        let denom = 2.0 * f64::from(sigma) * f64::from(sigma);
        let weights_f: Vec<f64> = (-radius..=radius)
            .map(|i| {
                let x = f64::from(i);
                (-x * x / denom).exp()
            })
            .collect();
        let sum: f64 = weights_f.iter().sum();

        let mut weights: Vec<u32> = weights_f
            .iter()
            .map(|w| ((w / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
            .collect();
        let acc: i64 = weights.iter().map(|&w| i64::from(w)).sum();
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + 65536 - acc).clamp(0, 65536) as u32;

        Ok(Self { weights })
    }

    /// Taps on each side of the center.
    pub(crate) fn radius(&self) -> usize {
        self.weights.len() / 2
    }

    /// Blur a premultiplied RGBA8 buffer; edges clamp to the nearest pixel.
    pub(crate) fn apply(&self, src: &[u8], width: u32, height: u32) -> CountdownResult<Vec<u8>> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| CountdownError::render("blur buffer size overflow"))?;
        if src.len() != expected {
            return Err(CountdownError::render(
                "blur expects a buffer matching width*height*4",
            ));
        }
        if width == 0 || height == 0 {
            return Ok(Vec::new());
        }

        let mut tmp = vec![0u8; expected];
        let mut out = vec![0u8; expected];
        self.pass(src, &mut tmp, width as usize, height as usize, Axis::X);
        self.pass(&tmp, &mut out, width as usize, height as usize, Axis::Y);
        Ok(out)
    }

    fn pass(&self, src: &[u8], dst: &mut [u8], w: usize, h: usize, axis: Axis) {
        let r = self.radius() as isize;
        let (along, limit) = match axis {
            Axis::X => (1usize, w),
            Axis::Y => (w, h),
        };
        for y in 0..h {
            for x in 0..w {
                let pos = match axis {
                    Axis::X => x,
                    Axis::Y => y,
                } as isize;
                let base = y * w + x - pos as usize * along;
                let mut acc = [0u64; 4];
                for (ki, &kw) in self.weights.iter().enumerate() {
                    let s = (pos + ki as isize - r).clamp(0, limit as isize - 1) as usize;
                    let idx = (base + s * along) * 4;
                    for c in 0..4 {
                        acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                    }
                }
                let o = (y * w + x) * 4;
                for c in 0..4 {
                    dst[o + c] = ((acc[c] + 32768) >> 16).min(255) as u8;
                }
            }
        }
    }
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;

use crate::foundation::error::{CountdownError, CountdownResult};

/// Premultiplied RGBA8 pixel.
pub(crate) type PremulRgba8 = [u8; 4];

/// Source-over for one premultiplied pixel.
pub(crate) fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    match src[3] {
        0 => dst,
        255 => src,
        sa => {
            let inv = 255 - u16::from(sa);
            let mut out = [0u8; 4];
            for i in 0..4 {
                out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
            }
            out
        }
    }
}

/// Source-over of `src` onto `dst`, both tightly packed premultiplied RGBA8 of equal length.
pub(crate) fn over_in_place(dst: &mut [u8], src: &[u8]) -> CountdownResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(CountdownError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        if s[3] == 0 {
            continue;
        }
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Fill every pixel with `px`.
pub(crate) fn fill(dst: &mut [u8], px: PremulRgba8) {
    for d in dst.chunks_exact_mut(4) {
        d.copy_from_slice(&px);
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;

use std::{collections::HashMap, sync::Arc};

use kurbo::Shape as _;

use crate::{
    catalog::{
        labels::LabelBundle,
        style::{CellBox, Decoration, Ink, StyleBundle, TextTreatment},
    },
    foundation::{
        color::Rgb8,
        core::{Canvas, Rgba8},
        error::{CountdownError, CountdownResult},
    },
    render::{
        blur::GaussianKernel,
        composite::{fill, over_in_place},
        fonts::{FontBook, FontRole},
        surface::PixelSurface,
        text::{ShapedLine, TextLayoutEngine},
    },
    time::engine::Countdown,
};

const EXPIRED_TEXT: &str = "Expired";

/// CPU Frame Renderer: turns one countdown value into one 400x120 surface.
///
/// The renderer owns its text engine plus caches for the parts of a frame that only depend on
/// style and color (background, box decoration, halos, gradient paints). One renderer per worker
/// thread; it is not `Sync`.
pub struct FrameRenderer {
    canvas: Canvas,
    text: TextLayoutEngine,
    backdrops: Vec<(BackdropKey, Arc<Vec<u8>>)>,
    gradients: HashMap<GradientKey, vello_cpu::Image>,
    kernels: HashMap<u32, GaussianKernel>,
}

/// Everything a backdrop depends on. Bundles carry floats, so lookups compare by value.
#[derive(Clone, Copy, Debug, PartialEq)]
struct BackdropKey {
    background: Rgba8,
    cell: CellBox,
    decoration: Decoration,
    accent: Rgb8,
    expired: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct GradientKey {
    start: Rgba8,
    end: Rgba8,
    w: u32,
    h: u32,
}

enum TextPaint {
    Solid(Rgba8),
    Image {
        image: vello_cpu::Image,
        origin: (f64, f64),
    },
}

struct TextDraw {
    line: ShapedLine,
    paint: TextPaint,
}

impl FrameRenderer {
    /// Renderer for the fixed countdown canvas.
    pub fn new(fonts: &FontBook) -> Self {
        Self::with_canvas(fonts, Canvas::COUNTDOWN)
    }

    /// Renderer for an arbitrary canvas; cell layout scales with the width and height.
    pub fn with_canvas(fonts: &FontBook, canvas: Canvas) -> Self {
        if fonts.is_empty() {
            tracing::warn!("font book is empty; frames will contain no text");
        }
        Self {
            canvas,
            text: TextLayoutEngine::new(fonts),
            backdrops: Vec::new(),
            gradients: HashMap::new(),
            kernels: HashMap::new(),
        }
    }

    /// The canvas every surface from this renderer has.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Render one frame.
    pub fn render(
        &mut self,
        countdown: Countdown,
        style: &StyleBundle,
        labels: &LabelBundle,
        color: Rgb8,
    ) -> CountdownResult<PixelSurface> {
        let accent = color.to_rgba8();
        let mut data = self
            .backdrop(style, color, countdown.is_expired())?
            .as_ref()
            .clone();

        let (w, h) = (f64::from(self.canvas.width), f64::from(self.canvas.height));
        let Some(breakdown) = countdown.breakdown() else {
            let line = self.text.shape_centered(
                EXPIRED_TEXT,
                FontRole::Number,
                style.number_size_px,
                (w / 2.0) as f32,
                (h / 2.0) as f32,
            )?;
            let draws: Vec<TextDraw> = line
                .into_iter()
                .map(|line| TextDraw {
                    line,
                    paint: TextPaint::Solid(accent),
                })
                .collect();
            over_in_place(&mut data, &self.rasterize_text(&draws)?)?;
            return PixelSurface::from_premul_bytes(self.canvas, data);
        };

        let mut numbers = Vec::with_capacity(4);
        let mut captions = Vec::with_capacity(4);
        for (i, (value, label)) in breakdown
            .units()
            .into_iter()
            .zip(labels.in_order())
            .enumerate()
        {
            let (cx, cy) = cell_center(self.canvas, i);
            let digits = format!("{value:02}");
            if let Some(line) = self.text.shape_centered(
                &digits,
                FontRole::Number,
                style.number_size_px,
                cx as f32,
                cy as f32,
            )? {
                let paint = match style.text {
                    TextTreatment::Plain | TextTreatment::Glow(_) => TextPaint::Solid(accent),
                    TextTreatment::Gradient { brighten_percent } => {
                        let (x0, y0, bw, bh) = box_bounds(&style.cell, cx, cy);
                        let image = self.gradient_paint(
                            accent,
                            color.adjust(brighten_percent).to_rgba8(),
                            bw,
                            bh,
                        )?;
                        TextPaint::Image {
                            image,
                            origin: (x0, y0),
                        }
                    }
                };
                numbers.push(TextDraw { line, paint });
            }
            if let Some(line) = self.text.shape_centered(
                label,
                FontRole::Label,
                style.label_size_px,
                cx as f32,
                (cy + style.label_offset_y) as f32,
            )? {
                captions.push(TextDraw {
                    line,
                    paint: TextPaint::Solid(style.label_color),
                });
            }
        }

        // glow sits under the crisp digits only, never under the labels
        if let TextTreatment::Glow(glow) = style.text
            && !numbers.is_empty()
        {
            let layer = self.rasterize_text(&numbers)?;
            let halo = self.blur(&layer, glow.sigma)?;
            over_in_place(&mut data, &halo)?;
        }
        numbers.append(&mut captions);
        over_in_place(&mut data, &self.rasterize_text(&numbers)?)?;

        PixelSurface::from_premul_bytes(self.canvas, data)
    }

    /// Background plus every per-cell decoration; cached per bundle contents, color and expiry.
    fn backdrop(
        &mut self,
        style: &StyleBundle,
        color: Rgb8,
        expired: bool,
    ) -> CountdownResult<Arc<Vec<u8>>> {
        let key = BackdropKey {
            background: style.background,
            cell: style.cell,
            decoration: style.decoration,
            accent: color,
            expired,
        };
        if let Some((_, bytes)) = self.backdrops.iter().find(|(k, _)| *k == key) {
            return Ok(bytes.clone());
        }

        let mut data = vec![0u8; self.canvas.rgba_len()];
        fill(&mut data, style.background.premul().to_array());

        if !expired {
            let accent = color.to_rgba8();
            let boxes = self.box_paths(&style.cell);

            match style.decoration {
                Decoration::GlowBacked { glow, .. } => {
                    let layer = self.rasterize(|ctx| {
                        ctx.set_paint(solid(accent));
                        for path in &boxes {
                            ctx.fill_path(path);
                        }
                    })?;
                    over_in_place(&mut data, &self.blur(&layer, glow.sigma)?)?;
                }
                Decoration::Gradient {
                    border_width,
                    shadow,
                    ..
                } => {
                    let shifted = vello_cpu::kurbo::Affine::translate((0.0, shadow.offset_y));
                    let layer = self.rasterize(|ctx| {
                        ctx.set_transform(shifted);
                        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(border_width));
                        ctx.set_paint(solid(shadow.color));
                        for path in &boxes {
                            ctx.stroke_path(path);
                        }
                    })?;
                    over_in_place(&mut data, &self.blur(&layer, shadow.sigma)?)?;
                }
                _ => {}
            }

            let gradient = match style.decoration {
                Decoration::Gradient { start, end, .. } => {
                    let (_, _, bw, bh) = box_bounds(&style.cell, 0.0, 0.0);
                    Some(self.gradient_paint(start, end, bw, bh)?)
                }
                _ => None,
            };
            let origins: Vec<(f64, f64)> = (0..4)
                .map(|i| {
                    let (cx, cy) = cell_center(self.canvas, i);
                    let (x0, y0, _, _) = box_bounds(&style.cell, cx, cy);
                    (x0, y0)
                })
                .collect();

            let decoration = style.decoration;
            let layer = self.rasterize(|ctx| {
                draw_decoration(ctx, decoration, accent, &boxes, &origins, gradient.as_ref());
            })?;
            over_in_place(&mut data, &layer)?;
        }

        let bytes = Arc::new(data);
        self.backdrops.push((key, bytes.clone()));
        Ok(bytes)
    }

    fn box_paths(&self, cell: &CellBox) -> Vec<vello_cpu::kurbo::BezPath> {
        (0..4)
            .map(|i| {
                let (cx, cy) = cell_center(self.canvas, i);
                let (x0, y0, _, _) = box_bounds(cell, cx, cy);
                let rect = kurbo::RoundedRect::new(
                    x0,
                    y0,
                    x0 + cell.width,
                    y0 + cell.height,
                    cell.radius,
                );
                bezpath_to_cpu(&rect.to_path(0.1))
            })
            .collect()
    }

    /// Diagonal gradient image of `w` x `h`, top-left `start` to bottom-right `end`.
    fn gradient_paint(
        &mut self,
        start: Rgba8,
        end: Rgba8,
        w: u32,
        h: u32,
    ) -> CountdownResult<vello_cpu::Image> {
        let key = GradientKey { start, end, w, h };
        if let Some(img) = self.gradients.get(&key) {
            return Ok(img.clone());
        }

        let (wf, hf) = (f64::from(w), f64::from(h));
        let len2 = (wf * wf + hf * hf).max(f64::EPSILON);
        let mut bytes = vec![0u8; (w as usize) * (h as usize) * 4];
        for y in 0..h {
            for x in 0..w {
                let px = f64::from(x) + 0.5;
                let py = f64::from(y) + 0.5;
                let t = ((px * wf + py * hf) / len2).clamp(0.0, 1.0);
                let lerp = |a: u8, b: u8| -> u8 {
                    let a = f64::from(a);
                    (a + (f64::from(b) - a) * t).round().clamp(0.0, 255.0) as u8
                };
                let c = Rgba8 {
                    r: lerp(start.r, end.r),
                    g: lerp(start.g, end.g),
                    b: lerp(start.b, end.b),
                    a: lerp(start.a, end.a),
                };
                let idx = ((y as usize) * (w as usize) + (x as usize)) * 4;
                bytes[idx..idx + 4].copy_from_slice(&c.premul().to_array());
            }
        }

        let img = premul_bytes_to_image(&bytes, w, h)?;
        self.gradients.insert(key, img.clone());
        Ok(img)
    }

    fn blur(&mut self, layer: &[u8], sigma: f32) -> CountdownResult<Vec<u8>> {
        let kernel = match self.kernels.entry(sigma.to_bits()) {
            std::collections::hash_map::Entry::Occupied(e) => e.into_mut(),
            std::collections::hash_map::Entry::Vacant(e) => e.insert(GaussianKernel::new(sigma)?),
        };
        kernel.apply(layer, self.canvas.width, self.canvas.height)
    }

    fn rasterize_text(&self, draws: &[TextDraw]) -> CountdownResult<Vec<u8>> {
        self.rasterize(|ctx| {
            for draw in draws {
                match &draw.paint {
                    TextPaint::Solid(c) => {
                        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
                        ctx.set_paint(solid(*c));
                    }
                    TextPaint::Image { image, origin } => {
                        ctx.set_paint_transform(vello_cpu::kurbo::Affine::translate(*origin));
                        ctx.set_paint(image.clone());
                    }
                }
                ctx.glyph_run(&draw.line.font)
                    .font_size(draw.line.font_size)
                    .fill_glyphs(draw.line.glyphs.iter().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    }));
            }
        })
    }

    /// Run `draw` against a fresh transparent context and read back premultiplied RGBA8.
    fn rasterize(
        &self,
        draw: impl FnOnce(&mut vello_cpu::RenderContext),
    ) -> CountdownResult<Vec<u8>> {
        let (w, h) = self.canvas.to_u16()?;
        let mut ctx = vello_cpu::RenderContext::new(w, h);
        draw(&mut ctx);
        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pixmap);
        Ok(pixmap.data_as_u8_slice().to_vec())
    }
}

/// One-shot render with a throwaway [`FrameRenderer`].
pub fn render_frame(
    countdown: Countdown,
    style: &StyleBundle,
    labels: &LabelBundle,
    color: Rgb8,
    fonts: &FontBook,
) -> CountdownResult<PixelSurface> {
    FrameRenderer::new(fonts).render(countdown, style, labels, color)
}

/// Center of cell `i` (0..4): `x = (width/4)*i + width/8`, `y = height/2`.
pub(crate) fn cell_center(canvas: Canvas, i: usize) -> (f64, f64) {
    let w = f64::from(canvas.width);
    let h = f64::from(canvas.height);
    ((w / 4.0) * i as f64 + w / 8.0, h / 2.0)
}

/// Top-left corner and pixel size of the box for a cell centered at `(cx, cy)`.
fn box_bounds(cell: &CellBox, cx: f64, cy: f64) -> (f64, f64, u32, u32) {
    (
        cx - cell.width / 2.0,
        cy + cell.top,
        cell.width.round().max(1.0) as u32,
        cell.height.round().max(1.0) as u32,
    )
}

fn draw_decoration(
    ctx: &mut vello_cpu::RenderContext,
    decoration: Decoration,
    accent: Rgba8,
    boxes: &[vello_cpu::kurbo::BezPath],
    origins: &[(f64, f64)],
    gradient: Option<&vello_cpu::Image>,
) {
    match decoration {
        Decoration::None => {}
        Decoration::Filled { fill } | Decoration::GlowBacked { fill, .. } => {
            ctx.set_paint(solid(fill));
            for path in boxes {
                ctx.fill_path(path);
            }
        }
        Decoration::Outlined { stroke, width } => {
            let ink = match stroke {
                Ink::Accent => accent,
                Ink::Fixed(c) => c,
            };
            ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
            ctx.set_paint(solid(ink));
            for path in boxes {
                ctx.stroke_path(path);
            }
        }
        Decoration::Translucent {
            fill,
            border,
            border_width,
        } => {
            ctx.set_paint(solid(fill));
            for path in boxes {
                ctx.fill_path(path);
            }
            ctx.set_stroke(vello_cpu::kurbo::Stroke::new(border_width));
            ctx.set_paint(solid(border));
            for path in boxes {
                ctx.stroke_path(path);
            }
        }
        Decoration::Gradient {
            start,
            border,
            border_width,
            ..
        } => {
            for (path, origin) in boxes.iter().zip(origins) {
                match gradient {
                    Some(image) => {
                        ctx.set_paint_transform(vello_cpu::kurbo::Affine::translate(*origin));
                        ctx.set_paint(image.clone());
                    }
                    None => ctx.set_paint(solid(start)),
                }
                ctx.fill_path(path);
            }
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_stroke(vello_cpu::kurbo::Stroke::new(border_width));
            ctx.set_paint(solid(border));
            for path in boxes {
                ctx.stroke_path(path);
            }
        }
    }
}

fn solid(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let pt = |p: kurbo::Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(pt(p)),
            PathEl::LineTo(p) => out.line_to(pt(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn premul_bytes_to_image(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> CountdownResult<vello_cpu::Image> {
    let w: u16 = width
        .try_into()
        .map_err(|_| CountdownError::render("paint width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| CountdownError::render("paint height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(CountdownError::render("paint byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let pixels = rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect();

    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;

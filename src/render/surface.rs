use std::sync::Arc;

use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rgb8};
use crate::foundation::error::{StippleError, StippleResult};
use crate::foundation::math::mul_div255_u16;
use crate::foundation::pixels::{FrameRGBA, PixelBuffer, unpremultiply_rgba8_in_place};
use crate::render::layout::Placement;
use crate::stipple::icons::IconDraw;

/// Raster target backed by `vello_cpu`.
///
/// Drawing calls are recorded into a render context and rasterized lazily; any read flushes first.
/// [`CpuSurface::clear`] drops everything recorded so far, so one surface can be reused across
/// frames without reallocating its pixmap.
pub struct CpuSurface {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    dirty: bool,
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl CpuSurface {
    pub fn new(canvas: Canvas) -> StippleResult<Self> {
        let (width, height) = surface_dims(canvas)?;
        Ok(Self {
            width,
            height,
            ctx: vello_cpu::RenderContext::new(width, height),
            pixmap: vello_cpu::Pixmap::new(width, height),
            dirty: false,
        })
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: u32::from(self.width),
            height: u32::from(self.height),
        }
    }

    /// Reallocate when `canvas` differs from the current size.
    pub fn ensure_size(&mut self, canvas: Canvas) -> StippleResult<()> {
        let (width, height) = surface_dims(canvas)?;
        if width != self.width || height != self.height {
            *self = Self::new(canvas)?;
        }
        Ok(())
    }

    /// Forget recorded drawing and fill the whole surface with `color`.
    pub fn clear(&mut self, color: Rgb8) {
        self.ctx.reset();
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(color.r, color.g, color.b, 255));
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.width),
            f64::from(self.height),
        ));
        self.dirty = true;
    }

    /// Draw straight-alpha `pixels` stretched into `dest`.
    pub fn draw_image(&mut self, pixels: &PixelBuffer<'_>, dest: Placement) -> StippleResult<()> {
        if dest.width == 0 || dest.height == 0 {
            return Ok(());
        }
        let resampled = resample(pixels, dest.size())?;
        let pixmap = straight_rgba_to_pixmap(resampled.as_raw(), dest.width, dest.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };

        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(Affine::translate((
            f64::from(dest.x),
            f64::from(dest.y),
        ))));
        self.ctx.set_paint(paint);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(dest.width),
            f64::from(dest.height),
        ));
        self.dirty = true;
        Ok(())
    }

    /// Fill then outline one placed icon.
    pub fn draw_icon(&mut self, draw: &IconDraw) {
        let path = bezpath_to_cpu(&draw.local_path());
        let style = draw.style;

        self.ctx.set_transform(affine_to_cpu(draw.transform()));
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            style.fill.r,
            style.fill.g,
            style.fill.b,
            255,
        ));
        self.ctx.fill_path(&path);

        if style.stroke_width > 0.0 {
            self.ctx
                .set_stroke(vello_cpu::kurbo::Stroke::new(style.stroke_width));
            self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                style.stroke.r,
                style.stroke.g,
                style.stroke.b,
                255,
            ));
            self.ctx.stroke_path(&path);
        }
        self.dirty = true;
    }

    pub fn draw_icons(&mut self, draws: &[IconDraw]) {
        for draw in draws {
            self.draw_icon(draw);
        }
    }

    fn flush(&mut self) {
        if self.dirty {
            self.ctx.flush();
            self.ctx.render_to_pixmap(&mut self.pixmap);
            self.dirty = false;
        }
    }

    /// Read `region` back as straight-alpha RGBA8.
    pub fn read_pixels(&mut self, region: Placement) -> StippleResult<FrameRGBA> {
        let (sw, sh) = (u32::from(self.width), u32::from(self.height));
        if region.width == 0
            || region.height == 0
            || region.x.saturating_add(region.width) > sw
            || region.y.saturating_add(region.height) > sh
        {
            return Err(StippleError::input(format!(
                "read region {}x{}+{}+{} is outside the {sw}x{sh} surface",
                region.width, region.height, region.x, region.y
            )));
        }
        self.flush();

        let src = self.pixmap.data_as_u8_slice();
        let row_bytes = sw as usize * 4;
        let mut data = Vec::with_capacity(region.size().area() * 4);
        for y in region.y..region.y + region.height {
            let start = y as usize * row_bytes + region.x as usize * 4;
            data.extend_from_slice(&src[start..start + region.width as usize * 4]);
        }
        unpremultiply_rgba8_in_place(&mut data);
        Ok(FrameRGBA {
            width: region.width,
            height: region.height,
            data,
            premultiplied: false,
        })
    }

    /// The whole surface as straight-alpha RGBA8.
    pub fn snapshot(&mut self) -> StippleResult<FrameRGBA> {
        self.read_pixels(Placement::full(self.canvas()))
    }
}

fn surface_dims(canvas: Canvas) -> StippleResult<(u16, u16)> {
    let width: u16 = canvas
        .width
        .try_into()
        .map_err(|_| StippleError::configuration("surface width exceeds u16"))?;
    let height: u16 = canvas
        .height
        .try_into()
        .map_err(|_| StippleError::configuration("surface height exceeds u16"))?;
    if width == 0 || height == 0 {
        return Err(StippleError::configuration(format!(
            "surface must be non-empty, got {width}x{height}"
        )));
    }
    Ok((width, height))
}

fn resample(pixels: &PixelBuffer<'_>, size: Canvas) -> StippleResult<image::RgbaImage> {
    let src = image::RgbaImage::from_raw(pixels.width(), pixels.height(), pixels.data().to_vec())
        .ok_or_else(|| StippleError::input("pixel buffer length does not match its dimensions"))?;
    if src.dimensions() == (size.width, size.height) {
        return Ok(src);
    }
    Ok(image::imageops::resize(
        &src,
        size.width,
        size.height,
        image::imageops::FilterType::Triangle,
    ))
}

fn straight_rgba_to_pixmap(rgba8: &[u8], width: u32, height: u32) -> StippleResult<vello_cpu::Pixmap> {
    let (w, h) = surface_dims(Canvas { width, height })?;
    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        let premul = |c: u8| mul_div255_u16(u16::from(c), u16::from(a)) as u8;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: premul(px[0]),
            g: premul(px[1]),
            b: premul(px[2]),
            a,
        });
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;

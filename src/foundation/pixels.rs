use crate::foundation::core::Canvas;
use crate::foundation::error::{StippleError, StippleResult};

/// Borrowed, row-major RGBA8 pixels.
///
/// Construction validates that `data` holds exactly `width * height * 4` bytes and that the buffer
/// is non-empty; everything downstream relies on that.
#[derive(Clone, Copy, Debug)]
pub struct PixelBuffer<'a> {
    width: u32,
    height: u32,
    data: &'a [u8],
}

impl<'a> PixelBuffer<'a> {
    /// Wrap `data` as a `width x height` RGBA8 view.
    pub fn new(width: u32, height: u32, data: &'a [u8]) -> StippleResult<Self> {
        if width == 0 || height == 0 {
            return Err(StippleError::input(format!(
                "pixel buffer must be non-empty, got {width}x{height}"
            )));
        }
        let expected = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        if data.len() != expected {
            return Err(StippleError::input(format!(
                "pixel buffer has {} bytes, expected {expected} for {width}x{height} rgba8",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Iterate `[r, g, b, a]` pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = &'a [u8]> + 'a {
        self.data.chunks_exact(4)
    }
}

/// An owned RGBA8 frame.
///
/// Frames produced by the renderer are opaque (the background is painted first), so premultiplied
/// and straight alpha coincide; `premultiplied` is kept explicit for frames from other origins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// A frame filled with one opaque color.
    pub fn solid(canvas: Canvas, rgba: [u8; 4]) -> Self {
        let mut data = Vec::with_capacity(canvas.area() * 4);
        for _ in 0..canvas.area() {
            data.extend_from_slice(&rgba);
        }
        Self {
            width: canvas.width,
            height: canvas.height,
            data,
            premultiplied: false,
        }
    }

    /// Take ownership of straight-alpha RGBA8 bytes.
    pub fn from_straight(width: u32, height: u32, data: Vec<u8>) -> StippleResult<Self> {
        PixelBuffer::new(width, height, &data)?;
        Ok(Self {
            width,
            height,
            data,
            premultiplied: false,
        })
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Borrow as a validated [`PixelBuffer`].
    pub fn view(&self) -> StippleResult<PixelBuffer<'_>> {
        PixelBuffer::new(self.width, self.height, &self.data)
    }

    /// Convert into an `image` buffer, un-premultiplying when needed.
    pub fn into_rgba_image(self) -> StippleResult<image::RgbaImage> {
        let Self {
            width,
            height,
            mut data,
            premultiplied,
        } = self;
        if premultiplied {
            unpremultiply_rgba8_in_place(&mut data);
        }
        image::RgbaImage::from_raw(width, height, data)
            .ok_or_else(|| StippleError::input("frame byte length does not match its dimensions"))
    }
}

/// Convert premultiplied RGBA8 to straight alpha, rounding to nearest.
pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/pixels.rs"]
mod tests;

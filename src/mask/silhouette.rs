use crate::foundation::pixels::PixelBuffer;
use crate::mask::Mask;

/// Classify every pixel as inside (`1`) or outside (`0`) the silhouette.
///
/// A pixel is inside when its unweighted mean brightness `(r + g + b) / 3` is strictly below
/// `threshold`; `invert` flips the result. Alpha is ignored. The comparison runs as
/// `r + g + b < 3 * threshold`, so fractional thresholds and means compare exactly. A NaN
/// threshold marks nothing inside.
pub fn extract_silhouette(buffer: &PixelBuffer<'_>, threshold: f64, invert: bool) -> Mask {
    let limit = 3.0 * threshold;
    let bits = buffer
        .pixels()
        .map(|px| {
            let sum = u16::from(px[0]) + u16::from(px[1]) + u16::from(px[2]);
            let inside = f64::from(sum) < limit;
            u8::from(inside != invert)
        })
        .collect();
    Mask {
        width: buffer.width(),
        height: buffer.height(),
        bits,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mask/silhouette.rs"]
mod tests;

//! Binary per-pixel masks: brightness silhouettes and their 4-connected edges.

/// 4-neighborhood edge detection over a silhouette.
pub mod edges;
/// Brightness thresholding into a silhouette.
pub mod silhouette;

use crate::foundation::error::{StippleError, StippleResult};

/// A `width x height` grid of `0`/`1` bytes, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<u8>,
}

impl Mask {
    /// An all-zero mask.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![0; width as usize * height as usize],
        }
    }

    /// Build from raw bits. Any non-zero byte is normalized to `1`.
    pub fn from_bits(width: u32, height: u32, bits: Vec<u8>) -> StippleResult<Self> {
        if bits.len() != width as usize * height as usize {
            return Err(StippleError::input(format!(
                "mask has {} cells, expected {} for {width}x{height}",
                bits.len(),
                width as usize * height as usize
            )));
        }
        let bits = bits.into_iter().map(|b| u8::from(b != 0)).collect();
        Ok(Self {
            width,
            height,
            bits,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bits(&self) -> &[u8] {
        &self.bits
    }

    /// Bit at `(x, y)`; coordinates outside the mask read as `false`.
    pub fn get(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return false;
        }
        self.bits[y as usize * self.width as usize + x as usize] != 0
    }

    pub(crate) fn set(&mut self, x: u32, y: u32) {
        let w = self.width as usize;
        self.bits[y as usize * w + x as usize] = 1;
    }

    /// Number of set cells.
    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|&&b| b != 0).count()
    }

    pub(crate) fn same_size(&self, other: &Mask) -> bool {
        self.width == other.width && self.height == other.height
    }
}

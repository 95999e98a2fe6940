use crate::mask::Mask;

/// Mark silhouette pixels with at least one 4-connected neighbor outside the silhouette.
///
/// The outer border (first/last row and column) is never evaluated and stays `0`, so masks smaller
/// than 3x3 produce no edges at all.
pub fn detect_edges(mask: &Mask) -> Mask {
    let mut edges = Mask::empty(mask.width(), mask.height());
    let (w, h) = (mask.width() as usize, mask.height() as usize);
    if w < 3 || h < 3 {
        return edges;
    }

    let bits = mask.bits();
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let i = y * w + x;
            if bits[i] == 0 {
                continue;
            }
            let enclosed = bits[i - 1] != 0
                && bits[i + 1] != 0
                && bits[i - w] != 0
                && bits[i + w] != 0;
            if !enclosed {
                edges.set(x as u32, y as u32);
            }
        }
    }
    edges
}

#[cfg(test)]
#[path = "../../tests/unit/mask/edges.rs"]
mod tests;

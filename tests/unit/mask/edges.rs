use super::*;

fn mask_from(width: u32, height: u32, inside: impl Fn(u32, u32) -> bool) -> Mask {
    let mut bits = Vec::new();
    for y in 0..height {
        for x in 0..width {
            bits.push(u8::from(inside(x, y)));
        }
    }
    Mask::from_bits(width, height, bits).unwrap()
}

#[test]
fn centered_block_has_ring_of_edges() {
    let mask = mask_from(5, 5, |x, y| (1..=3).contains(&x) && (1..=3).contains(&y));
    let edges = detect_edges(&mask);

    assert!(!edges.get(2, 2));
    for (x, y) in [(1, 1), (3, 1), (1, 3), (3, 3), (2, 1), (1, 2)] {
        assert!(edges.get(x, y), "expected edge at ({x}, {y})");
    }
}

#[test]
fn border_is_always_zero() {
    let full = mask_from(6, 4, |_, _| true);
    let edges = detect_edges(&full);
    for x in 0..6 {
        assert!(!edges.get(x, 0));
        assert!(!edges.get(x, 3));
    }
    for y in 0..4 {
        assert!(!edges.get(0, y));
        assert!(!edges.get(5, y));
    }
    // A fully filled mask has no interior pixel next to an outside pixel.
    assert_eq!(edges.count_ones(), 0);
}

#[test]
fn hollow_border_frame_marks_only_the_adjacent_ring() {
    let (w, h) = (7u32, 6u32);
    let mask = mask_from(w, h, |x, y| x != 0 && y != 0 && x != w - 1 && y != h - 1);
    let edges = detect_edges(&mask);

    for y in 0..h {
        for x in 0..w {
            let on_ring = (x == 1 || y == 1 || x == w - 2 || y == h - 2)
                && x >= 1
                && y >= 1
                && x <= w - 2
                && y <= h - 2;
            assert_eq!(
                edges.get(i64::from(x), i64::from(y)),
                on_ring,
                "mismatch at ({x}, {y})"
            );
        }
    }
}

#[test]
fn outside_pixels_are_never_edges() {
    let mask = mask_from(5, 5, |x, y| (x + y) % 2 == 0);
    let edges = detect_edges(&mask);
    for (m, e) in mask.bits().iter().zip(edges.bits()) {
        assert!(*e <= *m);
    }
}

#[test]
fn tiny_masks_produce_no_edges() {
    let mask = mask_from(2, 2, |_, _| true);
    assert_eq!(detect_edges(&mask).count_ones(), 0);
}

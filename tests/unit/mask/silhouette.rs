use super::*;

fn gray_row(levels: &[u8]) -> Vec<u8> {
    levels.iter().flat_map(|&v| [v, v, v, 255]).collect()
}

#[test]
fn thresholds_a_gray_ramp() {
    let data = gray_row(&[0, 85, 170, 255]);
    let buf = PixelBuffer::new(4, 1, &data).unwrap();

    assert_eq!(extract_silhouette(&buf, 128.0, false).bits(), &[1, 1, 0, 0]);
    assert_eq!(extract_silhouette(&buf, 128.0, true).bits(), &[0, 0, 1, 1]);
}

#[test]
fn brightness_equal_to_threshold_is_outside() {
    let data = gray_row(&[100]);
    let buf = PixelBuffer::new(1, 1, &data).unwrap();
    assert_eq!(extract_silhouette(&buf, 100.0, false).bits(), &[0]);
    assert_eq!(extract_silhouette(&buf, 101.0, false).bits(), &[1]);

    // Mean of (100, 100, 101) is 100.33, which is not below 100 but is below 101.
    let data = [100, 100, 101, 255];
    let buf = PixelBuffer::new(1, 1, &data).unwrap();
    assert_eq!(extract_silhouette(&buf, 100.0, false).bits(), &[0]);
    assert_eq!(extract_silhouette(&buf, 101.0, false).bits(), &[1]);
}

#[test]
fn threshold_zero_marks_nothing_inside() {
    let data = gray_row(&[0, 0, 0]);
    let buf = PixelBuffer::new(3, 1, &data).unwrap();
    assert_eq!(extract_silhouette(&buf, 0.0, false).count_ones(), 0);
}

#[test]
fn invert_is_bitwise_not_for_colored_pixels() {
    let mut data = Vec::new();
    for i in 0..64u32 {
        let v = (i * 37 % 256) as u8;
        data.extend_from_slice(&[v, v.wrapping_mul(3), 255 - v, (i * 11 % 256) as u8]);
    }
    let buf = PixelBuffer::new(8, 8, &data).unwrap();
    for threshold in [0.0, 1.0, 64.0, 127.4, 128.0, 200.0, 255.0] {
        let plain = extract_silhouette(&buf, threshold, false);
        let inv = extract_silhouette(&buf, threshold, true);
        for (a, b) in plain.bits().iter().zip(inv.bits()) {
            assert_eq!(a ^ b, 1);
        }
    }
}

#[test]
fn fractional_threshold_compares_against_the_exact_mean() {
    // Mean of (127, 127, 128) is 127.33: below 127.4, not below 127.3.
    let data = [127, 127, 128, 255];
    let buf = PixelBuffer::new(1, 1, &data).unwrap();
    assert_eq!(extract_silhouette(&buf, 127.4, false).bits(), &[1]);
    assert_eq!(extract_silhouette(&buf, 127.3, false).bits(), &[0]);
}

#[test]
fn nan_threshold_marks_nothing_inside() {
    let data = gray_row(&[0, 10]);
    let buf = PixelBuffer::new(2, 1, &data).unwrap();
    assert_eq!(extract_silhouette(&buf, f64::NAN, false).count_ones(), 0);
}

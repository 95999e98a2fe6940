use super::*;

#[test]
fn pixel_buffer_rejects_zero_area_and_bad_length() {
    assert!(matches!(
        PixelBuffer::new(0, 4, &[]),
        Err(StippleError::Input(_))
    ));
    assert!(matches!(
        PixelBuffer::new(2, 2, &[0u8; 15]),
        Err(StippleError::Input(_))
    ));
    let data = [0u8; 16];
    let buf = PixelBuffer::new(2, 2, &data).unwrap();
    assert_eq!(buf.pixels().count(), 4);
}

#[test]
fn solid_frame_fills_every_pixel() {
    let frame = FrameRGBA::solid(Canvas::new(3, 2).unwrap(), [1, 2, 3, 255]);
    assert_eq!(frame.data.len(), 24);
    assert!(frame.data.chunks_exact(4).all(|px| px == [1, 2, 3, 255]));
}

#[test]
fn into_rgba_image_unpremultiplies() {
    let frame = FrameRGBA {
        width: 1,
        height: 1,
        data: vec![64, 0, 0, 128],
        premultiplied: true,
    };
    let img = frame.into_rgba_image().unwrap();
    assert_eq!(img.get_pixel(0, 0).0, [128, 0, 0, 128]);
}

#[test]
fn unpremultiply_keeps_opaque_and_clear_pixels_and_rounds_the_rest() {
    let mut data = vec![10, 20, 30, 255, 0, 0, 0, 0, 64, 32, 0, 128];
    unpremultiply_rgba8_in_place(&mut data);
    assert_eq!(data, vec![10, 20, 30, 255, 0, 0, 0, 0, 128, 64, 0, 128]);
}

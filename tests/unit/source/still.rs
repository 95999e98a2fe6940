use super::*;
use std::io::Cursor;

fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_keeps_size_and_pixels() {
    let src = StillSource::decode(&png_bytes(3, 2, [10, 20, 30, 255]), 1.5).unwrap();
    let info = src.info();
    assert_eq!(info.size, Canvas { width: 3, height: 2 });
    assert_eq!(info.duration_sec, 1.5);
    let view = src.current_frame().unwrap();
    assert!(view.pixels().all(|p| p == [10, 20, 30, 255]));
}

#[test]
fn garbage_bytes_are_an_error() {
    let err = StillSource::decode(b"not an image", 1.0).unwrap_err();
    assert!(matches!(err, StippleError::Other(_)));
}

#[test]
fn negative_duration_is_rejected() {
    let frame = FrameRGBA::solid(Canvas { width: 1, height: 1 }, [0, 0, 0, 255]);
    assert!(matches!(
        StillSource::new(frame, -1.0),
        Err(StippleError::Configuration(_))
    ));
}

#[tokio::test]
async fn seeking_is_immediate_and_always_ready() {
    let frame = FrameRGBA::solid(Canvas { width: 2, height: 2 }, [1, 2, 3, 255]);
    let mut src = StillSource::new(frame, 2.0).unwrap();
    src.seek(1.25).await.unwrap();
    assert!(matches!(src.decoded().await, Some(Ok(()))));
    assert!(src.is_ready());
}

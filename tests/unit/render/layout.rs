use super::*;

fn canvas(width: u32, height: u32) -> Canvas {
    Canvas { width, height }
}

#[test]
fn contain_letterboxes_wide_images() {
    let p = fit_contain(canvas(200, 100), canvas(100, 100));
    assert_eq!(
        p,
        Placement {
            x: 0,
            y: 25,
            width: 100,
            height: 50
        }
    );
}

#[test]
fn contain_pillarboxes_tall_images_and_floors_offsets() {
    let p = fit_contain(canvas(30, 40), canvas(100, 100));
    assert_eq!(p.width, 75);
    assert_eq!(p.height, 100);
    assert_eq!(p.x, 12);
    assert_eq!(p.y, 0);
}

#[test]
fn contain_upscales_small_sources() {
    let p = fit_contain(canvas(10, 10), canvas(64, 32));
    assert_eq!((p.x, p.y, p.width, p.height), (16, 0, 32, 32));
    assert_eq!(p.rect(), Rect::new(16.0, 0.0, 48.0, 32.0));
}

#[test]
fn source_resolution_keeps_native_size() {
    let c = export_size(canvas(641, 359), Resolution::Source).unwrap();
    assert_eq!(c, canvas(641, 359));
}

#[test]
fn fixed_height_presets_keep_aspect_and_even_sides() {
    assert_eq!(
        export_size(canvas(1920, 1080), Resolution::P720).unwrap(),
        canvas(1280, 720)
    );
    assert_eq!(
        export_size(canvas(640, 480), Resolution::P1080).unwrap(),
        canvas(1440, 1080)
    );
    // 720 * 400 / 301 rounds to 957, bumped to 958
    let odd = export_size(canvas(400, 301), Resolution::P720).unwrap();
    assert_eq!(odd, canvas(958, 720));
}

#[test]
fn zero_sized_source_is_a_configuration_error() {
    assert!(matches!(
        export_size(canvas(0, 10), Resolution::P720),
        Err(StippleError::Configuration(_))
    ));
}

#[test]
fn resolution_names_parse_and_serialize() {
    assert_eq!("1080p".parse::<Resolution>().unwrap(), Resolution::P1080);
    assert_eq!("720".parse::<Resolution>().unwrap(), Resolution::P720);
    assert!("4k".parse::<Resolution>().is_err());
    assert_eq!(
        serde_json::to_string(&Resolution::P720).unwrap(),
        "\"720p\""
    );
}

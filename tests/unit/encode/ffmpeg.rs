use super::*;
use crate::foundation::core::Canvas;

const LISTING: &str = "\
Encoders:
 V..... = Video
 ------
 V....D libx264              libx264 H.264 / AVC / MPEG-4 AVC (codec h264)
 V....D libvpx-vp9           libvpx VP9 (codec vp9)
 V..... mpeg4                MPEG-4 part 2
";

#[test]
fn webm_prefers_vp8_then_vp9() {
    assert_eq!(select_codec(VideoFormat::Webm, LISTING), Some("libvpx-vp9"));
    let with_vp8 = format!("{LISTING} V....D libvpx               libvpx VP8 (codec vp8)\n");
    assert_eq!(select_codec(VideoFormat::Webm, &with_vp8), Some("libvpx"));
}

#[test]
fn missing_encoders_fall_back_to_default() {
    assert_eq!(select_codec(VideoFormat::Webm, "Encoders:\n V..... mpeg4 x\n"), None);
    assert_eq!(select_codec(VideoFormat::Mp4, LISTING), Some("libx264"));
}

#[test]
fn format_names_round_trip() {
    assert_eq!("MP4".parse::<VideoFormat>().unwrap(), VideoFormat::Mp4);
    assert!("avi".parse::<VideoFormat>().is_err());
    assert_eq!(VideoFormat::Webm.mime_type(), "video/webm");
}

#[test]
fn flatten_premul_alpha_0_returns_bg() {
    let src = vec![0u8, 0, 0, 0];
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &src, true, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn flatten_straight_half_red_over_black() {
    let src = vec![255u8, 0, 0, 128];
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &src, false, [0, 0, 0, 255]).unwrap();
    assert_eq!(dst, vec![128, 0, 0, 255]);
}

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps::integer(30).unwrap(),
    }
}

#[test]
fn odd_dimensions_are_padded_to_even() {
    let opts = FfmpegSinkOpts::new(VideoFormat::Webm);
    let args = encoder_args(&cfg(641, 481), &opts, Some("libvpx"));
    let vf = args.iter().position(|a| a == "-vf").unwrap();
    assert_eq!(args[vf + 1], "pad=ceil(iw/2)*2:ceil(ih/2)*2");
    let size = args.iter().position(|a| a == "-s").unwrap();
    assert_eq!(args[size + 1], "641x481");
    // The filter applies to the decoded input, so it must follow `-i`.
    let input = args.iter().position(|a| a == "-i").unwrap();
    assert!(vf > input);
}

#[test]
fn even_dimensions_need_no_filter() {
    let opts = FfmpegSinkOpts::new(VideoFormat::Mp4);
    let args = encoder_args(&cfg(640, 480), &opts, None);
    assert!(!args.iter().any(|a| a == "-vf"));
    assert!(!args.iter().any(|a| a == "-c:v"));
    assert_eq!(args.last().map(String::as_str), Some("pipe:1"));
    assert!(args.iter().any(|a| a == "frag_keyframe+empty_moov"));
}

#[test]
fn zero_sized_frames_are_rejected() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(VideoFormat::Webm));
    let err = sink.begin(cfg(0, 10)).unwrap_err();
    assert!(matches!(err, StippleError::Configuration(_)));
}

#[test]
fn encodes_odd_sized_frames_when_ffmpeg_is_available() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(VideoFormat::Webm));
    sink.begin(cfg(17, 11)).unwrap();
    for i in 0..3u64 {
        let frame = FrameRGBA::solid(Canvas { width: 17, height: 11 }, [0, 200, 0, 255]);
        sink.push_frame(FrameIndex(i), &frame).unwrap();
    }
    let out = sink.end().unwrap();
    assert_eq!(&out.bytes[..4], &[0x1a, 0x45, 0xdf, 0xa3]);
}

#[test]
fn push_before_begin_fails() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(VideoFormat::Mp4));
    let frame = FrameRGBA::solid(Canvas { width: 2, height: 2 }, [0, 0, 0, 255]);
    assert!(matches!(
        sink.push_frame(FrameIndex(0), &frame),
        Err(StippleError::Sink(_))
    ));
}

#[test]
fn encodes_a_short_webm_when_ffmpeg_is_available() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(VideoFormat::Webm));
    sink.begin(SinkConfig {
        width: 16,
        height: 16,
        fps: Fps::integer(10).unwrap(),
    })
    .unwrap();
    for i in 0..5u8 {
        let frame = FrameRGBA::solid(Canvas { width: 16, height: 16 }, [i * 40, 0, 0, 255]);
        sink.push_frame(FrameIndex(u64::from(i)), &frame).unwrap();
    }
    let out = sink.end().unwrap();
    assert_eq!(out.format, VideoFormat::Webm);
    // EBML magic.
    assert_eq!(&out.bytes[..4], &[0x1a, 0x45, 0xdf, 0xa3]);
}

#[test]
fn abort_stops_a_running_encoder() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(VideoFormat::Mp4));
    sink.begin(SinkConfig {
        width: 8,
        height: 8,
        fps: Fps::integer(5).unwrap(),
    })
    .unwrap();
    sink.abort();
    assert!(sink.end().is_err());
}

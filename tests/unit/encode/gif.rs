use super::*;
use crate::foundation::core::{Canvas, Rgba8};

fn tiny(color: Rgba8) -> PixelSurface {
    PixelSurface::filled(
        Canvas {
            width: 8,
            height: 4,
        },
        color,
    )
}

#[test]
fn default_opts_match_countdown_cadence() {
    let opts = GifEncodeOpts::default();
    assert!(opts.loop_forever);
    assert_eq!(opts.delay_centis(), 100);
    assert_eq!(opts.sample_factor(), 10);
    opts.validate().unwrap();
}

#[test]
fn quality_out_of_range_is_rejected() {
    for quality in [0u8, 31, 255] {
        let opts = GifEncodeOpts {
            quality,
            ..GifEncodeOpts::default()
        };
        assert!(opts.validate().is_err(), "quality {quality}");
        assert!(GifSink::new(opts).is_err());
    }
}

#[test]
fn empty_sequence_is_rejected() {
    let err = encode_gif(&[], &GifEncodeOpts::default()).unwrap_err();
    assert!(err.to_string().starts_with("encode error:"));
}

#[test]
fn mismatched_dimensions_are_rejected() {
    let a = tiny(Rgba8::opaque(255, 0, 0));
    let b = PixelSurface::filled(
        Canvas {
            width: 4,
            height: 4,
        },
        Rgba8::opaque(255, 0, 0),
    );
    let err = encode_gif(&[a, b], &GifEncodeOpts::default()).unwrap_err();
    assert!(err.to_string().contains("frame size mismatch"));
}

#[test]
fn out_of_order_push_is_rejected() {
    let mut sink = GifSink::new(GifEncodeOpts::default()).unwrap();
    sink.begin(SinkConfig {
        width: 8,
        height: 4,
        delay_ms: 1000,
        loop_forever: true,
    })
    .unwrap();
    let err = sink
        .push_frame(FrameIndex(1), &tiny(Rgba8::opaque(0, 0, 0)))
        .unwrap_err();
    assert!(err.to_string().contains("in order"));
}

#[test]
fn unfinished_sink_has_no_bytes() {
    let sink = GifSink::new(GifEncodeOpts::default()).unwrap();
    assert!(sink.bytes().is_none());
    assert!(sink.into_bytes().is_err());
}

#[test]
fn stream_has_header_global_table_and_trailer() {
    let frames = vec![
        tiny(Rgba8::opaque(255, 0, 0)),
        tiny(Rgba8::opaque(0, 0, 255)),
        tiny(Rgba8::opaque(0, 0, 255)),
    ];
    let bytes = encode_gif(&frames, &GifEncodeOpts::default()).unwrap();
    assert_eq!(&bytes[..6], b"GIF89a");
    assert_eq!(u16::from_le_bytes([bytes[6], bytes[7]]), 8);
    assert_eq!(u16::from_le_bytes([bytes[8], bytes[9]]), 4);
    assert_ne!(bytes[10] & 0x80, 0, "global color table flag");
    assert_eq!(bytes.last(), Some(&0x3B));
    assert!(bytes.windows(11).any(|w| w == b"NETSCAPE2.0"));
}

#[test]
fn no_loop_extension_when_not_looping() {
    let opts = GifEncodeOpts {
        loop_forever: false,
        ..GifEncodeOpts::default()
    };
    let bytes = encode_gif(&[tiny(Rgba8::opaque(1, 2, 3))], &opts).unwrap();
    assert!(!bytes.windows(11).any(|w| w == b"NETSCAPE2.0"));
}

#[test]
fn flatten_premul_over_black_produces_expected_rgb() {
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &[128, 0, 0, 128], true, [0, 0, 0, 255]).unwrap();
    assert_eq!(dst, vec![128, 0, 0, 255]);
}

#[test]
fn flatten_straight_over_white_blends() {
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &[255, 0, 0, 128], false, [255, 255, 255, 255]).unwrap();
    assert_eq!(dst, vec![255, 127, 127, 255]);
}

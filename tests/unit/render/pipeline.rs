use super::*;
use crate::encode::sink::InMemorySink;
use chrono::TimeZone;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
}

fn spec_ending_in(secs: i64) -> TimerSpec {
    TimerSpec::new(
        t0() + TimeDelta::seconds(secs),
        Rgb8::new(0x33, 0x66, 0xcc),
    )
}

fn opts(frame_count: u32) -> AnimateOpts {
    AnimateOpts {
        frame_count,
        ..AnimateOpts::default()
    }
}

#[test]
fn defaults_match_countdown_cadence() {
    let o = AnimateOpts::default();
    assert_eq!(o.frame_count, 60);
    assert_eq!(o.tick_ms, 1000);
    assert!(!o.threading.parallel);
    assert!(o.threading.static_frame_elision);
}

#[test]
fn zero_frames_and_zero_threads_are_rejected() {
    assert!(opts(0).validate().is_err());
    let mut o = opts(2);
    o.threading.threads = Some(0);
    assert!(o.validate().is_err());
    assert!(build_thread_pool(Some(1)).is_ok());
}

#[test]
fn ticks_advance_one_second_each() {
    let cds = tick_countdowns(&spec_ending_in(3661), t0(), &opts(3)).unwrap();
    let secs: Vec<u64> = cds
        .iter()
        .map(|c| c.breakdown().unwrap().units()[3])
        .collect();
    assert_eq!(secs, vec![1, 0, 59]);
    assert_eq!(cds[0].breakdown().unwrap().units(), [0, 1, 1, 1]);
}

#[test]
fn expiry_mid_sequence_still_yields_every_frame() {
    let fonts = FontBook::empty();
    let (frames, stats) =
        animate_with_stats(&spec_ending_in(2), t0(), &fonts, &opts(6)).unwrap();
    assert_eq!(frames.len(), 6);
    // ticks 0..=2 are distinct, ticks 3..6 are all Expired
    assert_eq!(stats.frames_total, 6);
    assert_eq!(stats.frames_rendered, 4);
    assert_eq!(stats.frames_elided, 2);
    assert_eq!(frames[3], frames[5]);
}

#[test]
fn elision_does_not_change_output() {
    let fonts = FontBook::empty();
    let spec = spec_ending_in(-5).with_style(StyleId::Neon);
    let mut plain = opts(4);
    plain.threading.static_frame_elision = false;
    let (a, sa) = animate_with_stats(&spec, t0(), &fonts, &plain).unwrap();
    let (b, sb) = animate_with_stats(&spec, t0(), &fonts, &opts(4)).unwrap();
    assert_eq!(a, b);
    assert_eq!(sa.frames_rendered, 4);
    assert_eq!(sb.frames_rendered, 1);
}

#[test]
fn parallel_matches_sequential() {
    let fonts = FontBook::empty();
    let spec = spec_ending_in(90).with_style(StyleId::Classic);
    let seq = animate(&spec, t0(), &fonts, &opts(3)).unwrap();
    let mut par = opts(3);
    par.threading.parallel = true;
    par.threading.threads = Some(2);
    assert_eq!(animate(&spec, t0(), &fonts, &par).unwrap(), seq);
}

#[test]
fn still_is_the_first_animation_frame() {
    let fonts = FontBook::empty();
    let spec = spec_ending_in(42).with_style(StyleId::Elegant);
    let still = render_still(&spec, t0(), &fonts).unwrap();
    let frames = animate(&spec, t0(), &fonts, &opts(1)).unwrap();
    assert_eq!(frames[0], still);
    assert_eq!(still.canvas(), Canvas::COUNTDOWN);
}

#[test]
fn sink_receives_frames_in_order() {
    let fonts = FontBook::empty();
    let mut sink = InMemorySink::new();
    let cfg = SinkConfig::for_canvas(Canvas::COUNTDOWN, 1000, true);
    let stats = render_to_sink(&spec_ending_in(10), t0(), &fonts, &opts(3), &mut sink, cfg)
        .unwrap();
    assert_eq!(stats.frames_total, 3);
    assert!(sink.is_finished());
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, vec![0, 1, 2]);
}

#[test]
fn gif_bytes_have_countdown_dimensions() {
    let fonts = FontBook::empty();
    let bytes = render_countdown_gif(
        &spec_ending_in(5),
        t0(),
        &fonts,
        &opts(2),
        &GifEncodeOpts::default(),
    )
    .unwrap();
    assert_eq!(&bytes[..6], b"GIF89a");
    assert_eq!(u16::from_le_bytes([bytes[6], bytes[7]]), 400);
    assert_eq!(u16::from_le_bytes([bytes[8], bytes[9]]), 120);
}

#[test]
fn tick_index_beyond_i32_is_rejected_not_truncated() {
    let tick = TimeDelta::milliseconds(1000);
    assert_eq!(
        tick_instant(t0(), tick, 3).unwrap(),
        t0() + TimeDelta::seconds(3)
    );
    let err = tick_instant(t0(), tick, i32::MAX as u32 + 1).unwrap_err();
    assert!(err.to_string().starts_with("validation error:"));
}

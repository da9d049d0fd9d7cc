use super::*;

#[test]
fn filled_surface_has_canvas_size() {
    let s = PixelSurface::filled(Canvas::COUNTDOWN, Rgba8::opaque(1, 2, 3));
    assert_eq!(s.data.len(), 400 * 120 * 4);
    assert_eq!(s.pixel(0, 0), Some([1, 2, 3, 255]));
    assert_eq!(s.pixel(399, 119), Some([1, 2, 3, 255]));
    assert_eq!(s.pixel(400, 0), None);
}

#[test]
fn from_premul_bytes_rejects_wrong_length() {
    let err = PixelSurface::from_premul_bytes(Canvas::COUNTDOWN, vec![0; 16]).unwrap_err();
    assert!(err.to_string().starts_with("render error:"));
}

#[test]
fn straight_conversion_unpremultiplies() {
    let canvas = Canvas {
        width: 2,
        height: 1,
    };
    let s = PixelSurface::from_premul_bytes(canvas, vec![64, 0, 0, 128, 0, 0, 0, 0]).unwrap();
    assert_eq!(s.to_straight_rgba8(), vec![128, 0, 0, 128, 0, 0, 0, 0]);
}

use super::*;
use crate::catalog::labels::Language;
use usvg::fontdb;

/// A system face that cannot draw one language's labels, a face that can, and those labels.
fn uncovered_and_covering() -> Option<(FontFace, FontFace, String)> {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    let faces: Vec<FontFace> = db
        .faces()
        .take(64)
        .filter_map(|info| {
            let bytes = db.with_face_data(info.id, |data, _| data.to_vec())?;
            FontFace::from_bytes(bytes, "system").ok()
        })
        .collect();
    for lang in Language::ALL {
        let text = lang.labels().in_order().concat();
        let lacking = faces.iter().find(|f| !f.covers(&text));
        let having = faces.iter().find(|f| f.covers(&text));
        if let (Some(a), Some(b)) = (lacking, having) {
            return Some((a.clone(), b.clone(), text));
        }
    }
    eprintln!("no pair of system faces with different label coverage; skipping");
    None
}

#[test]
fn empty_book_shapes_nothing() {
    let mut engine = TextLayoutEngine::new(&FontBook::empty());
    let line = engine
        .shape_centered("12", FontRole::Number, 24.0, 50.0, 60.0)
        .unwrap();
    assert!(line.is_none());
}

#[test]
fn non_positive_size_is_rejected() {
    let mut engine = TextLayoutEngine::new(&FontBook::empty());
    assert!(
        engine
            .shape_centered("12", FontRole::Number, 0.0, 50.0, 60.0)
            .is_err()
    );
}

#[test]
fn uncovered_label_uses_a_covering_fallback() {
    let Some((lacking, having, label)) = uncovered_and_covering() else {
        return;
    };

    let mut bare = TextLayoutEngine::new(&FontBook::new(None, Some(lacking.clone())));
    assert_eq!(bare.pick(FontRole::Label, &label), bare.roles.get(&FontRole::Label).copied());

    let book = FontBook::new(None, Some(lacking)).with_fallbacks([having]);
    let mut engine = TextLayoutEngine::new(&book);
    assert_eq!(engine.pick(FontRole::Label, &label), Some(engine.fallbacks[0]));
    let line = engine
        .shape_centered(&label, FontRole::Label, 12.0, 50.0, 80.0)
        .unwrap()
        .unwrap();
    assert!(!line.glyphs.is_empty());
    assert!(line.glyphs.iter().all(|g| g.id != 0), "{label}");
}

#[test]
fn covered_text_keeps_the_role_face() {
    let Some((lacking, having, _)) = uncovered_and_covering() else {
        return;
    };
    if !lacking.covers("0123456789") {
        return;
    }
    let book = FontBook::new(Some(lacking.clone()), Some(lacking)).with_fallbacks([having]);
    let mut engine = TextLayoutEngine::new(&book);
    assert_eq!(
        engine.pick(FontRole::Number, "42"),
        engine.roles.get(&FontRole::Number).copied()
    );
}

#[test]
fn digits_center_on_the_requested_point() {
    let fonts = FontBook::system();
    let mut engine = TextLayoutEngine::new(&fonts);
    let Some(line) = engine
        .shape_centered("00", FontRole::Number, 24.0, 150.0, 60.0)
        .unwrap()
    else {
        eprintln!("no system fonts; skipping");
        return;
    };
    assert_eq!(line.glyphs.len(), 2);
    assert!(line.glyphs.iter().all(|g| (g.y - 60.0).abs() < 1e-3));
    assert!(line.glyphs[0].x < 150.0 && line.glyphs[0].x > 130.0);
    assert_eq!(line.font_size, 24.0);
}

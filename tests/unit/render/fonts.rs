use super::*;

#[test]
fn empty_book_has_no_faces() {
    let book = FontBook::empty();
    assert!(book.is_empty());
    assert!(book.face(FontRole::Number).is_none());
    assert!(book.face(FontRole::Label).is_none());
}

#[test]
fn roles_fall_back_to_each_other() {
    let face = FontFace {
        family: "Test".to_string(),
        index: 0,
        weight: 400,
        bytes: Arc::new(Vec::new()),
        source: "memory".to_string(),
    };
    let book = FontBook::new(Some(face), None);
    assert!(!book.is_empty());
    assert_eq!(book.face(FontRole::Label).map(|f| f.family.as_str()), Some("Test"));
}

#[test]
fn garbage_bytes_are_rejected() {
    let err = FontFace::from_bytes(vec![0, 1, 2, 3], "memory").unwrap_err();
    assert!(err.to_string().starts_with("validation error:"));
}

#[test]
fn missing_font_file_is_an_error() {
    assert!(FontBook::resolve(Some(Path::new("/nonexistent/font.ttf")), None).is_err());
}

#[test]
fn unparsable_face_covers_nothing() {
    let face = FontFace {
        family: "Test".to_string(),
        index: 0,
        weight: 400,
        bytes: Arc::new(vec![0u8; 16]),
        source: "memory".to_string(),
    };
    assert!(!face.covers("Days"));
}

#[test]
fn system_fallbacks_cover_label_sets_the_primary_lacks() {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    let Some(primary) = query_face(&db, fontdb::Weight::NORMAL) else {
        eprintln!("no system fonts; skipping");
        return;
    };
    let fallbacks = label_fallbacks(&db, Some(&primary));
    for lang in Language::ALL {
        let text = lang.labels().in_order().concat();
        if primary.covers(&text) {
            continue;
        }
        let installed = db.faces().filter(|f| f.style == fontdb::Style::Normal).any(|f| {
            db.with_face_data(f.id, |data, index| {
                ttf_parser::Face::parse(data, index).is_ok_and(|face| text_has_glyphs(&face, &text))
            })
            .unwrap_or(false)
        });
        if installed {
            assert!(fallbacks.iter().any(|f| f.covers(&text)), "{}", lang.code());
        }
    }
}

use super::*;

fn tok(text: &str, kind: TokenKind) -> Token {
    Token::new(text, kind)
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn monospace_layout_tracks_columns_and_lines() {
    let style = RenderStyle::default();
    let tokens = vec![
        tok("let", TokenKind::Keyword),
        tok(" ", TokenKind::Whitespace),
        tok("x", TokenKind::Identifier),
        tok("\n", TokenKind::Newline),
        tok("\t", TokenKind::Whitespace),
        tok("foo", TokenKind::Identifier),
    ];
    let layout = layout_tokens(&tokens, &style, &MonospaceMeasure::default());

    assert_eq!(layout.boxes.len(), tokens.len());
    assert_eq!(layout.line_count, 2);
    assert_eq!(layout.origin(0), Some(Point::new(40.0, 60.0)));
    assert!(approx(layout.boxes[0].width, 36.0));
    assert_eq!(layout.origin(2), Some(Point::new(88.0, 60.0)));
    assert_eq!(layout.boxes[3].line, 0);

    let tab = layout.boxes[4];
    assert_eq!(tab.line, 1);
    assert_eq!(tab.origin, Point::new(40.0, 90.0));
    assert!(approx(tab.width, 48.0));
    assert_eq!(layout.origin(5), Some(Point::new(88.0, 90.0)));
    assert!(approx(layout.width, 84.0));
}

#[test]
fn tab_advances_to_next_stop_from_mid_column() {
    let style = RenderStyle::default();
    let tokens = vec![
        tok("ab", TokenKind::Identifier),
        tok("\t", TokenKind::Whitespace),
        tok("c", TokenKind::Identifier),
    ];
    let layout = layout_tokens(&tokens, &style, &MonospaceMeasure::default());
    assert!(approx(layout.boxes[1].width, 24.0));
    assert_eq!(layout.origin(2), Some(Point::new(40.0 + 4.0 * 12.0, 60.0)));
}

#[test]
fn line_advance_follows_font_size_and_line_height() {
    let style = RenderStyle {
        font_size: 10.0,
        line_height: 2.0,
        padding: 0.0,
        ..RenderStyle::default()
    };
    let tokens = vec![
        tok("a", TokenKind::Identifier),
        tok("\n", TokenKind::Newline),
        tok("\n", TokenKind::Newline),
        tok("b", TokenKind::Identifier),
    ];
    let layout = layout_tokens(&tokens, &style, &MonospaceMeasure::default());
    assert_eq!(layout.line_count, 3);
    assert_eq!(layout.origin(0), Some(Point::new(0.0, 10.0)));
    assert_eq!(layout.origin(3), Some(Point::new(0.0, 50.0)));
}

#[test]
fn proportional_measure_uses_width_classes() {
    let m = ProportionalMeasure;
    assert_eq!(m.monospace_advance(20.0), None);
    assert!(approx(m.measure("mi", 20.0), (0.85 + 0.3) * 20.0));
    assert!(m.measure("WWW", 10.0) > m.measure("iii", 10.0));

    let style = RenderStyle {
        monospace: false,
        ..RenderStyle::default()
    };
    let tokens = vec![tok("mi", TokenKind::Identifier), tok("x", TokenKind::Identifier)];
    let layout = layout_tokens(&tokens, &style, &m);
    let x1 = layout.boxes[1].origin.x;
    assert!(approx(x1, 40.0 + (0.85 + 0.3) * 20.0));
}

#[test]
fn monospace_measure_counts_chars_not_bytes() {
    let m = MonospaceMeasure::default();
    assert!(approx(m.measure("é", 20.0), 12.0));
    assert_eq!(m.monospace_advance(10.0), Some(6.0));
}

#[test]
fn empty_token_list_has_one_line() {
    let layout = layout_tokens(&[], &RenderStyle::default(), &MonospaceMeasure::default());
    assert!(layout.boxes.is_empty());
    assert_eq!(layout.line_count, 1);
    assert_eq!(layout.origin(0), None);
}

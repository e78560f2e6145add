use super::*;

fn style(size: f64) -> TextStyle {
    TextStyle::new("sans-serif", size)
}

#[test]
fn deterministic_measure_counts_columns() {
    let m = DeterministicTextMeasurer::default();
    let metrics = m.measure("Browser", &style(10.0));
    assert_eq!(metrics.width, 7.0 * 10.0 * 0.6);
    assert_eq!(metrics.height, 12.0);
    assert_eq!(metrics.line_count, 1);

    let two = m.measure("a<br/>bcd", &style(10.0));
    assert_eq!(two.line_count, 2);
    assert_eq!(two.width, 3.0 * 6.0);

    // Wide glyphs take two columns.
    assert_eq!(DeterministicTextMeasurer::columns("日本"), 4);
}

#[test]
fn wraps_role_names_to_the_box_width() {
    let m = DeterministicTextMeasurer::default();
    // 18px * 0.6 = 10.8px per column; a 100px role leaves 90px.
    let s = style(18.0);
    assert_eq!(
        wrap_text_lines_px("Browser", &s, Some(90.0), &m, true),
        vec!["Browser"]
    );
    assert_eq!(
        wrap_text_lines_px("Database Server", &s, Some(90.0), &m, true),
        vec!["Database", "Server"]
    );
}

#[test]
fn long_words_split_or_overflow() {
    let m = DeterministicTextMeasurer::default();
    let s = style(10.0);
    assert_eq!(
        wrap_text_lines_px("abcdefgh", &s, Some(30.0), &m, true),
        vec!["abcde", "fgh"]
    );
    assert_eq!(
        wrap_text_lines_px("abcdefgh", &s, Some(30.0), &m, false),
        vec!["abcdefgh"]
    );
}

#[test]
fn no_width_keeps_explicit_lines() {
    let m = DeterministicTextMeasurer::default();
    assert_eq!(
        wrap_text_lines_px("a b<br>c", &style(12.0), None, &m, true),
        vec!["a b", "c"]
    );
    assert_eq!(
        wrap_text_lines_px("", &style(12.0), Some(50.0), &m, true),
        vec![""]
    );
}

//! Greedy word wrapping against a [`TextMeasurer`].

use super::{DeterministicTextMeasurer, TextMeasurer, TextStyle};

/// Wraps `text` into lines no wider than `max_width_px`.
///
/// Explicit breaks (`\n`, `<br>`) are kept. Words wider than the limit are split by character
/// when `break_long_words` is set and otherwise overflow on a line of their own. A missing,
/// non-finite or non-positive width disables wrapping.
pub fn wrap_text_lines_px(
    text: &str,
    style: &TextStyle,
    max_width_px: Option<f64>,
    measurer: &dyn TextMeasurer,
    break_long_words: bool,
) -> Vec<String> {
    let lines = DeterministicTextMeasurer::normalized_text_lines(text);
    let Some(max_w) = max_width_px.filter(|w| w.is_finite() && *w > 0.0) else {
        return lines;
    };
    let fits = |s: &str| measurer.measure(s, style).width <= max_w;

    let mut out: Vec<String> = Vec::new();
    for line in lines {
        let mut cur = String::new();
        for word in line.split_whitespace() {
            let candidate = if cur.is_empty() {
                word.to_string()
            } else {
                format!("{cur} {word}")
            };
            if fits(&candidate) {
                cur = candidate;
                continue;
            }
            if !cur.is_empty() {
                out.push(std::mem::take(&mut cur));
            }
            if fits(word) || !break_long_words {
                cur = word.to_string();
                continue;
            }
            let mut piece = String::new();
            for ch in word.chars() {
                piece.push(ch);
                if !fits(&piece) && piece.chars().count() > 1 {
                    piece.pop();
                    out.push(std::mem::take(&mut piece));
                    piece.push(ch);
                }
            }
            cur = piece;
        }
        out.push(cur);
    }
    out
}

/// Shrink-then-wrap layout for square content text. Measurement is abstracted
/// behind [`TextMeasure`] so the layout logic runs under native tests with a
/// fake ruler and on wasm against `CanvasRenderingContext2d::measure_text`.
pub trait TextMeasure {
    /// Width of `text` in pixels when rendered at `font_px`.
    fn text_width(&self, text: &str, font_px: f64) -> f64;
    /// Height of one line of `text` in pixels at `font_px`.
    fn text_height(&self, text: &str, font_px: f64) -> f64;
}

pub const MAX_LINES: usize = 3;
pub const MIN_FONT_PX: f64 = 1.0;
pub const LINE_HEIGHT_FACTOR: f64 = 1.2;
const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, PartialEq)]
pub struct FittedText {
    pub font_px: f64,
    pub lines: Vec<String>,
    pub truncated: bool,
}

impl FittedText {
    pub fn line_height(&self) -> f64 {
        self.font_px * LINE_HEIGHT_FACTOR
    }
}

/// Lay out `text` inside a `box_w` x `box_h` pixel box.
///
/// First the font shrinks one pixel at a time (down to [`MIN_FONT_PX`]) while
/// the unbroken text overflows the box. At the final size the text is wrapped
/// greedily on word boundaries into at most [`MAX_LINES`] lines; overflow
/// beyond the last line is dropped and marked with an ellipsis.
pub fn fit_text(
    measure: &impl TextMeasure,
    text: &str,
    max_font_px: f64,
    box_w: f64,
    box_h: f64,
) -> FittedText {
    let text = text.trim();
    if text.is_empty() {
        return FittedText {
            font_px: max_font_px.max(MIN_FONT_PX),
            lines: Vec::new(),
            truncated: false,
        };
    }

    let mut font_px = max_font_px.max(MIN_FONT_PX);
    while font_px > MIN_FONT_PX
        && (measure.text_width(text, font_px) > box_w
            || measure.text_height(text, font_px) > box_h)
    {
        font_px = (font_px - 1.0).max(MIN_FONT_PX);
    }

    let (lines, truncated) = wrap_words(measure, text, font_px, box_w);
    FittedText {
        font_px,
        lines,
        truncated,
    }
}

fn wrap_words(
    measure: &impl TextMeasure,
    text: &str,
    font_px: f64,
    box_w: f64,
) -> (Vec<String>, bool) {
    let mut lines: Vec<String> = Vec::with_capacity(MAX_LINES);
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if measure.text_width(&candidate, font_px) <= box_w || current.is_empty() {
            current = candidate;
            continue;
        }

        if lines.len() == MAX_LINES - 1 {
            // No room for another line; mark the cut on the last one.
            current.push_str(ELLIPSIS);
            lines.push(current);
            return (lines, true);
        }
        lines.push(current);
        current = word.to_string();
    }

    if !current.is_empty() {
        lines.push(current);
    }
    (lines, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fixed-advance fake ruler: every char is half the font size wide and a
    /// line is exactly the font size tall.
    struct FakeMeasure;

    impl TextMeasure for FakeMeasure {
        fn text_width(&self, text: &str, font_px: f64) -> f64 {
            text.chars().count() as f64 * font_px * 0.5
        }
        fn text_height(&self, _text: &str, font_px: f64) -> f64 {
            font_px
        }
    }

    #[test]
    fn short_text_keeps_requested_size_on_one_line() {
        let fitted = fit_text(&FakeMeasure, "Hi", 16.0, 90.0, 90.0);
        assert_eq!(fitted.font_px, 16.0);
        assert_eq!(fitted.lines, vec!["Hi".to_string()]);
        assert!(!fitted.truncated);
    }

    #[test]
    fn empty_and_whitespace_text_produce_no_lines() {
        for text in ["", "   ", "\n\t"] {
            let fitted = fit_text(&FakeMeasure, text, 16.0, 90.0, 90.0);
            assert!(fitted.lines.is_empty());
            assert!(!fitted.truncated);
        }
    }

    #[test]
    fn long_text_shrinks_before_wrapping() {
        // 30 chars at 16px is 240px wide; it must shrink to fit 90px.
        let fitted = fit_text(&FakeMeasure, "abcdefghijklmnopqrstuvwxyzabcd", 16.0, 90.0, 90.0);
        assert!(fitted.font_px < 16.0);
        assert!(fitted.font_px >= MIN_FONT_PX);
        // A single unbroken word never wraps.
        assert_eq!(fitted.lines.len(), 1);
    }

    #[test]
    fn wrapping_never_exceeds_max_lines() {
        // 62 chars: 31px wide even at the 1px floor, so a 10px box forces
        // wrapping rather than shrink-to-fit on a single line, and three
        // lines cannot hold all twelve words.
        let text = "one two three four five six seven eight nine ten eleven twelve";
        let fitted = fit_text(&FakeMeasure, text, 10.0, 10.0, 300.0);
        assert_eq!(fitted.font_px, MIN_FONT_PX);
        assert_eq!(fitted.lines.len(), MAX_LINES);
        assert!(fitted.truncated);
        assert!(fitted.lines.last().is_some_and(|l| l.ends_with("...")));
    }

    #[test]
    fn ellipsis_only_when_words_are_dropped() {
        // A 4px box holds one word per line at the 1px floor; three words
        // fill exactly three lines with nothing dropped.
        let fitted = fit_text(&FakeMeasure, "alpha beta gamma", 10.0, 4.0, 300.0);
        assert_eq!(fitted.lines.len(), 3);
        assert!(!fitted.truncated);
        assert!(fitted.lines.iter().all(|l| !l.contains("...")));
    }

    #[test]
    fn shrink_floor_is_one_pixel() {
        let huge = "x".repeat(10_000);
        let fitted = fit_text(&FakeMeasure, &huge, 16.0, 10.0, 10.0);
        assert_eq!(fitted.font_px, MIN_FONT_PX);
    }

    #[test]
    fn wrapped_lines_individually_fit_the_box() {
        let text = "squares on the grid hold short messages";
        let fitted = fit_text(&FakeMeasure, text, 12.0, 60.0, 300.0);
        for line in &fitted.lines {
            assert!(
                FakeMeasure.text_width(line, fitted.font_px) <= 60.0,
                "line {line:?} overflows"
            );
        }
    }

    #[test]
    fn layout_is_deterministic() {
        let text = "Hello world this is a long line of text";
        let a = fit_text(&FakeMeasure, text, 16.0, 90.0, 90.0);
        let b = fit_text(&FakeMeasure, text, 16.0, 90.0, 90.0);
        assert_eq!(a, b);
    }
}

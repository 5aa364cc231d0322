/// Width of a string, in points, at a given font size.
pub trait TextMeasure {
    fn text_width(&self, text: &str, font_size: f32) -> f32;
}

impl<F> TextMeasure for F
where
    F: Fn(&str, f32) -> f32,
{
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        self(text, font_size)
    }
}

/// Recipient suffixes kept attached to the name, in priority order.
pub const HONORIFICS: [&str; 3] = ["様", "御中", "殿"];

/// Greedy per-character wrap. A line is flushed as soon as the next character
/// would push it past `max_width`; a single over-wide character still gets a
/// line of its own.
pub fn wrap(
    text: &str,
    max_width: f32,
    measure: &impl TextMeasure,
    font_size: f32,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        let mut candidate = current.clone();
        candidate.push(ch);
        if measure.text_width(&candidate, font_size) > max_width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current.push(ch);
        } else {
            current = candidate;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Split a recipient string into lines, preferring a clean two-line split
/// right before the last honorific over blind character wrapping.
pub fn split_recipient_block(
    text: &str,
    max_width: f32,
    measure: &impl TextMeasure,
    font_size: f32,
) -> Vec<String> {
    if measure.text_width(text, font_size) <= max_width {
        return vec![text.to_string()];
    }

    for honorific in HONORIFICS {
        let Some(idx) = text.rfind(honorific) else {
            continue;
        };
        let (before, with_suffix) = text.split_at(idx);
        if measure.text_width(before, font_size) <= max_width
            && measure.text_width(with_suffix, font_size) <= max_width
        {
            return vec![before.to_string(), with_suffix.to_string()];
        }
    }

    wrap(text, max_width, measure, font_size)
}

//! Greedy word-wrap for multi-line body cells.
//!
//! Paragraphs are split on `\n` and wrapped independently. Every line except
//! the last of its paragraph is marked for justification. A word wider than the
//! whole line is broken by character.

use crate::render::font_metrics::FontMetricTable;

/// One printed line produced by [`wrap_text`].
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedLine {
    pub text: String,
    /// Width of `text` in em units at the face's size.
    pub width_em: f32,
    /// Stretch the inter-word spacing so the line fills the cell.
    pub justify: bool,
}

impl WrappedLine {
    pub fn space_count(&self) -> usize {
        self.text.matches(' ').count()
    }
}

/// Wraps `text` into lines no wider than `max_width_em`.
///
/// Runs of whitespace inside a paragraph collapse to single spaces. An empty
/// paragraph still produces one empty line so blank lines keep their height.
pub fn wrap_text(text: &str, metrics: &FontMetricTable, max_width_em: f32) -> Vec<WrappedLine> {
    let normalized = text.replace('\r', "");
    let mut lines = Vec::new();

    for paragraph in normalized.split('\n') {
        let start = lines.len();
        wrap_paragraph(paragraph, metrics, max_width_em, &mut lines);

        if lines.len() == start {
            lines.push(WrappedLine {
                text: String::new(),
                width_em: 0.0,
                justify: false,
            });
        }
        if let Some(last) = lines.last_mut() {
            last.justify = false;
        }
    }

    lines
}

fn wrap_paragraph(
    paragraph: &str,
    metrics: &FontMetricTable,
    max_width: f32,
    lines: &mut Vec<WrappedLine>,
) {
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for word in paragraph.split_whitespace() {
        let word_w = metrics.measure_str(word);
        let space_w = if current.is_empty() {
            0.0
        } else {
            metrics.space_width
        };

        if !current.is_empty() && current_width + space_w + word_w > max_width {
            // Line is full; start the next one with this word.
            lines.push(WrappedLine {
                text: std::mem::take(&mut current),
                width_em: current_width,
                justify: true,
            });
            current_width = 0.0;
        }

        if word_w > max_width {
            current_width = break_long_word(word, metrics, max_width, &mut current, lines);
            continue;
        }

        if !current.is_empty() {
            current.push(' ');
            current_width += metrics.space_width;
        }
        current.push_str(word);
        current_width += word_w;
    }

    if !current.is_empty() {
        lines.push(WrappedLine {
            text: current,
            width_em: current_width,
            justify: false,
        });
    }
}

/// Emits full-width character chunks of `word`. The trailing remainder is left
/// in `current` so following words can share its line; returns its width.
fn break_long_word(
    word: &str,
    metrics: &FontMetricTable,
    max_width: f32,
    current: &mut String,
    lines: &mut Vec<WrappedLine>,
) -> f32 {
    let mut chunk = String::new();
    let mut chunk_width = 0.0_f32;

    for c in word.chars() {
        let w = metrics.char_width(c);
        if !chunk.is_empty() && chunk_width + w > max_width {
            lines.push(WrappedLine {
                text: std::mem::take(&mut chunk),
                width_em: chunk_width,
                justify: false,
            });
            chunk_width = 0.0;
        }
        chunk.push(c);
        chunk_width += w;
    }

    *current = chunk;
    chunk_width
}

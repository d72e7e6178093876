//! Text Sanitizer — folds typographic punctuation to ASCII and clamps everything
//! else into the Latin-1 code space the standard PDF fonts can draw.
//!
//! Resumes pass through applicant tracking systems that choke on smart quotes
//! and dashes, and the built-in Times fonts only carry a single-byte encoding.
//! Every string handed to the document renderer goes through [`sanitize`] first.

/// Glyph substituted for any character outside Latin-1.
pub const REPLACEMENT_GLYPH: char = '?';

/// Punctuation folded to plain ASCII. All targets are ASCII, so the order of
/// application does not matter.
const PUNCTUATION_FOLDS: &[(char, &str)] = &[
    ('\u{2018}', "'"),
    ('\u{2019}', "'"),
    ('\u{201C}', "\""),
    ('\u{201D}', "\""),
    ('\u{2013}', "-"),
    ('\u{2014}', "-"),
    ('\u{2022}', "-"),
    ('\u{2026}', "..."),
];

/// Normalizes `text` for document rendering.
///
/// Accepts `&str` or `Option<&str>`; empty and absent input both yield an empty
/// string. The output only contains code points 0–255.
pub fn sanitize<'a>(text: impl Into<Option<&'a str>>) -> String {
    let Some(text) = text.into() else {
        return String::new();
    };
    if text.is_empty() {
        return String::new();
    }

    let folded = fold_punctuation(text);
    let folded = fold_residual_dashes(&folded);
    clamp_to_latin1(&folded)
}

fn fold_punctuation(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match PUNCTUATION_FOLDS.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => out.push_str(to),
            None => out.push(c),
        }
    }
    out
}

/// Safety net for literal dash glyphs. A no-op whenever the fold table above
/// already covers both dashes.
fn fold_residual_dashes(text: &str) -> String {
    text.replace(['—', '–'], "-")
}

/// Replaces every character that has no single-byte Latin-1 encoding.
fn clamp_to_latin1(text: &str) -> String {
    text.chars()
        .map(|c| if (c as u32) <= 0xFF { c } else { REPLACEMENT_GLYPH })
        .collect()
}

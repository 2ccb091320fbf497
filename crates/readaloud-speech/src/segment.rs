//! Text segmentation for speech playback.
//!
//! Splits extracted page text into an ordered sequence of speakable units:
//! sentence-sized pieces short enough for the engine to take as single
//! utterances. Splitting is lossless apart from whitespace: every
//! non-whitespace character of the input lands in exactly one unit, in
//! order.

/// Maximum character length of a speakable unit.
///
/// Engines reject or silently truncate utterances past a fixed size, so
/// every unit is kept within this bound. Counted in characters, not bytes.
pub const MAX_UNIT_CHARS: usize = 1500;

/// Floor for the sentence-boundary search during the length cut: a boundary
/// earlier than this many characters into an oversized slice would produce
/// a uselessly small piece, so the cut falls back to the last plain space.
const MIN_CUT_POS: usize = 200;

/// Split text into speakable units of at most [`MAX_UNIT_CHARS`] characters.
///
/// Whitespace runs collapse to single spaces first. The split is
/// sentence-first: it breaks after `.`, `!` or `?` followed by whitespace
/// and a probable sentence opener (capital letter, digit, opening quote or
/// parenthesis). Text without that capitalisation signal (fewer than 3 units)
/// is re-split on the punctuation alone. Units still over the limit are cut
/// down by a backward boundary search. Returns an empty vector only for
/// blank input.
#[must_use]
pub fn segment(text: &str) -> Vec<String> {
    segment_with_limit(text, MAX_UNIT_CHARS)
}

/// [`segment`] with a caller-chosen unit length limit.
#[must_use]
pub fn segment_with_limit(text: &str, max_chars: usize) -> Vec<String> {
    let text = collapse_whitespace(text);
    if text.is_empty() {
        return Vec::new();
    }

    let mut units = split_sentences(&text, true);
    if units.len() < 3 {
        units = split_sentences(&text, false);
    }

    units
        .iter()
        .flat_map(|unit| split_overlong(unit, max_chars))
        .collect()
}

// ── Internal helpers ───────────────────────────────────────────────

/// Collapse whitespace runs to single spaces and trim the ends.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !prev_space && !out.is_empty() {
                out.push(' ');
            }
            prev_space = true;
        } else {
            out.push(c);
            prev_space = false;
        }
    }
    while out.ends_with(' ') {
        out.pop();
    }
    out
}

/// Split on sentence-ending punctuation followed by whitespace.
///
/// With `lookahead`, a break additionally requires the character after the
/// whitespace to look like a sentence opener. That keeps abbreviations
/// ("Dr. smith") and lowercase continuations inside one unit, at the cost
/// of missing uncapitalised sentence starts, which is why the caller
/// retries without it when this pass finds too few units.
fn split_sentences(text: &str, lookahead: bool) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut units = Vec::new();
    let mut start = 0;

    for i in 0..chars.len() {
        if !is_sentence_end(chars[i]) {
            continue;
        }
        let Some(&next) = chars.get(i + 1) else {
            break;
        };
        if !next.is_whitespace() {
            continue;
        }
        if lookahead && !chars.get(i + 2).copied().is_some_and(is_sentence_opener) {
            continue;
        }
        push_trimmed(&mut units, &chars[start..=i]);
        start = i + 1;
    }

    if start < chars.len() {
        push_trimmed(&mut units, &chars[start..]);
    }
    units
}

/// Cut one oversized unit into pieces of at most `max_chars` characters.
///
/// Each pass looks at the leading `max_chars` window and cuts at the last
/// sentence boundary inside it. A boundary earlier than [`MIN_CUT_POS`] is
/// ignored in favour of the window's last plain space, and a window with no
/// space at all is cut at the limit itself, keeping every character.
fn split_overlong(unit: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = unit.chars().collect();
    if chars.len() <= max_chars {
        return vec![unit.to_string()];
    }

    let mut pieces = Vec::new();
    let mut rest = chars.as_slice();

    while rest.len() > max_chars {
        let window = &rest[..max_chars];
        let cut = find_cut(window);
        push_trimmed(&mut pieces, &window[..cut]);
        rest = &rest[cut..];
    }
    push_trimmed(&mut pieces, rest);
    pieces
}

/// Number of leading characters to keep from an oversized window.
fn find_cut(window: &[char]) -> usize {
    // Rightmost sentence end (punctuation-then-space, or a raw newline).
    let boundary = (0..window.len())
        .rev()
        .find(|&i| {
            window[i] == '\n' || (is_sentence_end(window[i]) && window.get(i + 1) == Some(&' '))
        });
    if let Some(i) = boundary {
        if i >= MIN_CUT_POS {
            return i + 1;
        }
    }

    // No usable boundary; cut after the last space instead.
    if let Some(i) = window.iter().rposition(|&c| c == ' ') {
        if i >= 1 {
            return i + 1;
        }
    }

    // An unbroken run: cut at the limit itself.
    window.len()
}

fn is_sentence_end(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Probable first character of a new sentence: an uppercase Latin letter
/// (ASCII through Latin Extended-B), a digit, or an opening quote or
/// parenthesis.
fn is_sentence_opener(c: char) -> bool {
    if c.is_ascii_uppercase() || c.is_ascii_digit() {
        return true;
    }
    if matches!(c, '"' | '\'' | '\u{201C}' | '\u{2018}' | '«' | '(') {
        return true;
    }
    ('\u{00C0}'..='\u{024F}').contains(&c) && c.is_uppercase()
}

/// Push a trimmed, non-empty unit.
fn push_trimmed(units: &mut Vec<String>, chars: &[char]) {
    let unit = chars.iter().collect::<String>().trim().to_string();
    if !unit.is_empty() {
        units.push(unit);
    }
}

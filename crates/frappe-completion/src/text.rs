// Position and offset helpers over raw document text

use crate::types::Position;

/// Clamp a byte offset into `text`, snapping down to a character boundary
pub fn clamp_offset(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Text from the start of the cursor's line up to the cursor
pub fn line_prefix(text: &str, offset: usize) -> &str {
    let offset = clamp_offset(text, offset);
    let before = &text[..offset];
    match before.rfind('\n') {
        Some(newline) => &before[newline + 1..],
        None => before,
    }
}

/// Convert an editor position to a byte offset in `text`
///
/// Characters are counted in UTF-16 code units. A line past the end of the
/// document maps to the end of the text; a character past the end of its
/// line maps to the end of that line.
pub fn offset_at(text: &str, position: Position) -> usize {
    let mut line_start = 0;
    for _ in 0..position.line {
        match text[line_start..].find('\n') {
            Some(newline) => line_start += newline + 1,
            None => return text.len(),
        }
    }

    let line_end = text[line_start..]
        .find('\n')
        .map(|newline| line_start + newline)
        .unwrap_or(text.len());

    let mut units = 0u32;
    for (index, ch) in text[line_start..line_end].char_indices() {
        if units >= position.character {
            return line_start + index;
        }
        units += ch.len_utf16() as u32;
    }

    line_end
}

//! Character-level rules shared by every word round: how a typed key is
//! compared with the expected character, and which characters of a word are
//! consumed without a keystroke.

/// Lower-cases both sides before comparing. Multi-scalar lowercase forms
/// (e.g. `'İ'`) must match in full.
pub fn keys_match(typed: char, expected: char) -> bool {
    typed.to_lowercase().eq(expected.to_lowercase())
}

/// Characters in a word the player never has to type.
pub fn is_auto_skipped(c: char) -> bool {
    c == ' '
}

/// Consumes the run of auto-skipped characters starting at `cursor`,
/// appending them to `typed`. Returns the new cursor.
pub fn skip_spaces(word: &[char], mut cursor: usize, typed: &mut String) -> usize {
    while let Some(&c) = word.get(cursor) {
        if !is_auto_skipped(c) {
            break;
        }
        typed.push(c);
        cursor += 1;
    }
    cursor
}

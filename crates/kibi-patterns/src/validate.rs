//! Index name validation

use crate::{PatternError, PatternResult};

/// Characters the backend refuses in index names
pub const ILLEGAL_INDEX_CHARACTERS: [char; 9] = ['\\', '/', '?', '"', '<', '>', '|', ' ', ','];

/// Check `name` against the backend's naming rules.
///
/// `*` is only accepted when `allow_wildcard` is set. Every offending
/// character is reported once, in order of first appearance.
pub fn validate_index_name(name: &str, allow_wildcard: bool) -> PatternResult<()> {
    if name.is_empty() {
        return Err(PatternError::EmptyName);
    }

    let mut illegal: Vec<char> = Vec::new();
    for ch in name.chars() {
        let bad = ILLEGAL_INDEX_CHARACTERS.contains(&ch) || (!allow_wildcard && ch == '*');
        if bad && !illegal.contains(&ch) {
            illegal.push(ch);
        }
    }

    if illegal.is_empty() {
        Ok(())
    } else {
        Err(PatternError::IllegalCharacters(illegal))
    }
}

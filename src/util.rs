//! Shared utility helpers.

/// Case-insensitive substring search without allocating an uppercase copy.
#[inline]
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    find_ci(haystack, needle).is_some()
}

/// Case-insensitive find, returning the byte offset of the first occurrence.
#[inline]
pub fn find_ci(haystack: &str, needle: &str) -> Option<usize> {
    find_ci_from(haystack.as_bytes(), needle.as_bytes(), 0)
}

fn find_ci_from(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() {
        return Some(from.min(haystack.len()));
    }
    if from >= haystack.len() || needle.len() > haystack.len() - from {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
        .map(|pos| pos + from)
}

#[inline]
fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Case-insensitive search for `needle` where it does not continue a word.
///
/// The match must not be preceded by a word character, and when `needle`
/// ends in a word character it must not be followed by one either. So
/// `"KILL"` matches `"KILL 52"` but not `"SKILLS"` or `"KILLED"`, while
/// `"XP_"` matches `"xp_cmdshell"`.
pub fn find_word_ci(haystack: &str, needle: &str) -> Option<usize> {
    let bytes = haystack.as_bytes();
    let needle_bytes = needle.as_bytes();
    let checks_end = needle_bytes.last().is_some_and(|&b| is_word_byte(b));
    let checks_start = needle_bytes.first().is_some_and(|&b| is_word_byte(b));

    let mut from = 0;
    while let Some(pos) = find_ci_from(bytes, needle_bytes, from) {
        let end = pos + needle_bytes.len();
        let start_ok = !checks_start || pos == 0 || !is_word_byte(bytes[pos - 1]);
        let end_ok = !checks_end || end >= bytes.len() || !is_word_byte(bytes[end]);
        if start_ok && end_ok {
            return Some(pos);
        }
        from = pos + 1;
    }
    None
}

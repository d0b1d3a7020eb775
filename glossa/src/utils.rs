use unicode_normalization::UnicodeNormalization;

pub trait FromU32 {
    fn from_u32(src: u32) -> Self;
}

#[cfg(any(target_pointer_width = "32", target_pointer_width = "64"))]
impl FromU32 for usize {
    #[inline(always)]
    fn from_u32(src: u32) -> Self {
        // Since the pointer width is guaranteed to be 32 or 64,
        // the following process always succeeds.
        unsafe { Self::try_from(src).unwrap_unchecked() }
    }
}

/// Combining marks carrying tone.
const TONE_MARKS: [char; 4] = ['\u{0300}', '\u{0301}', '\u{0302}', '\u{030c}'];

/// Normalizes a headword into a dictionary key.
///
/// Dots and hyphens are removed, the text is lowercased and decomposed (NFKD).
pub fn normalize_form(value: &str) -> String {
    value
        .chars()
        .filter(|&c| c != '.' && c != '-')
        .collect::<String>()
        .to_lowercase()
        .nfkd()
        .collect()
}

/// Removes tone marks from a form.
pub fn detone(form: &str) -> String {
    form.nfd().filter(|c| !TONE_MARKS.contains(c)).collect()
}

/// Checks if a word is written in title case.
///
/// Cased characters must be uppercase right after an uncased character and
/// lowercase after a cased one, and at least one cased character must occur.
pub fn is_title(word: &str) -> bool {
    let mut cased = false;
    let mut prev_cased = false;
    for c in word.chars() {
        if c.is_uppercase() {
            if prev_cased {
                return false;
            }
            prev_cased = true;
            cased = true;
        } else if c.is_lowercase() {
            if !prev_cased {
                return false;
            }
            prev_cased = true;
            cased = true;
        } else {
            prev_cased = false;
        }
    }
    cased
}

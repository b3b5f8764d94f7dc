//! Reading-string normalization.
//!
//! A canonical reading may embed okurigana in paired `'` marks
//! (e.g. `おおき'い'`) and may list several acceptable readings
//! separated by a full-width comma (e.g. `あ、い`). Grading accepts
//! either the "core" form (marked segments removed entirely) or the
//! "full" form (marks removed, segment text kept) of any option.

/// The delimiter between alternative readings.
pub const READING_SEPARATOR: char = '、';

/// The paired marker around okurigana segments.
pub const OKURIGANA_MARK: char = '\'';

/// Strip marked segments entirely: `おおき'い'` → `おおき`.
///
/// Only paired marks delimit a segment; a lone trailing mark is kept
/// as-is rather than swallowing the rest of the string.
pub fn reading_core(reading: &str) -> String {
    let mut out = String::with_capacity(reading.len());
    let mut pending: Vec<char> = Vec::new();
    let mut in_segment = false;

    for c in reading.chars() {
        if c == OKURIGANA_MARK {
            if in_segment {
                // closing mark: drop the whole segment
                pending.clear();
                in_segment = false;
            } else {
                in_segment = true;
            }
        } else if in_segment {
            pending.push(c);
        } else {
            out.push(c);
        }
    }

    // unterminated segment: the opening mark was not a marker after all
    if in_segment {
        out.push(OKURIGANA_MARK);
        out.extend(pending);
    }

    out
}

/// Strip only the marks, keeping the segment text: `おおき'い'` → `おおきい`.
pub fn reading_without_marks(reading: &str) -> String {
    reading.chars().filter(|&c| c != OKURIGANA_MARK).collect()
}

/// Whether every okurigana mark in the reading is paired.
pub fn has_balanced_marks(reading: &str) -> bool {
    reading.chars().filter(|&c| c == OKURIGANA_MARK).count() % 2 == 0
}

/// All strings the grader accepts for a canonical reading: for each
/// `、`-separated option (trimmed), its core form and its full form.
pub fn accepted_forms(reading: &str) -> Vec<String> {
    let mut forms = Vec::new();
    for option in reading.split(READING_SEPARATOR) {
        let option = option.trim();
        let core = reading_core(option);
        let full = reading_without_marks(option);
        if !forms.contains(&core) {
            forms.push(core);
        }
        if !forms.contains(&full) {
            forms.push(full);
        }
    }
    forms
}

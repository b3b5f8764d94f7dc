//! Answer evaluation.

use kanji_utils::{Item, Level, reading::accepted_forms};

/// Grade raw user input against an item.
///
/// Input is trimmed first. Extra-level items require exact equality
/// with the designated answer field; standard items accept either the
/// core or the full form of any `、`-separated reading option.
///
/// Empty input never reaches this function in normal play: the session
/// routes it through the give-up path, which records an incorrect
/// answer without evaluation.
pub fn evaluate(input: &str, item: &Item, level: Level) -> bool {
    let input = input.trim();

    if level.is_extra() {
        return input == item.answer;
    }

    accepted_forms(&item.reading)
        .iter()
        .any(|form| input == form)
}

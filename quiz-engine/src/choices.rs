//! Four-choice distractor generation.

use kanji_utils::{Item, reading::reading_core};
use rand::Rng;
use rustc_hash::FxHashSet;

/// Number of choices presented per question.
pub const CHOICE_COUNT: usize = 4;

/// Number of wrong answers accompanying the correct one.
const WRONG_COUNT: usize = 3;

/// The generated choice array for one question. All strings are in
/// core display form (okurigana segments stripped).
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ChoiceSet {
    pub choices: Vec<String>,
    /// Index of the correct answer, uniform over `[0, 3]`.
    pub correct_index: usize,
}

/// Build the choice set for `correct` from `pool`.
///
/// Wrong answers are picked by bounded rejection sampling: random pool
/// indices are drawn and accepted when unused, quizzable (the reading
/// yields at least one non-empty accepted form) and different in
/// reading from the correct answer, for at most
/// `min(pool_len * 2, 100)` attempts so the loop terminates even when
/// the pool is nearly exhausted of valid distractors. If fewer than 3
/// valid distractors exist, the missing slots come through as empty
/// strings. That degenerate output is deliberate; see DESIGN.md.
pub fn generate_choices(correct: &Item, pool: &[Item], rng: &mut impl Rng) -> ChoiceSet {
    let correct_reading = &correct.reading;

    let mut wrong_readings: Vec<&str> = Vec::with_capacity(WRONG_COUNT);
    let mut used_indices = FxHashSet::default();
    let max_attempts = (pool.len() * 2).min(100);
    let mut attempts = 0;

    while wrong_readings.len() < WRONG_COUNT && attempts < max_attempts {
        let candidate = rng.random_range(0..pool.len());
        attempts += 1;

        if !used_indices.contains(&candidate)
            && pool[candidate].is_quizzable()
            && pool[candidate].reading != *correct_reading
        {
            used_indices.insert(candidate);
            wrong_readings.push(&pool[candidate].reading);
        }
    }

    if wrong_readings.len() < WRONG_COUNT {
        log::warn!(
            "only {} distinct distractors found for {:?}; padding with empty strings",
            wrong_readings.len(),
            correct.filename
        );
    }

    let correct_index = rng.random_range(0..CHOICE_COUNT);
    let mut choices = Vec::with_capacity(CHOICE_COUNT);
    let mut wrong_index = 0;

    for slot in 0..CHOICE_COUNT {
        if slot == correct_index {
            choices.push(reading_core(correct_reading));
        } else {
            choices.push(reading_core(
                wrong_readings.get(wrong_index).copied().unwrap_or(""),
            ));
            wrong_index += 1;
        }
    }

    ChoiceSet {
        choices,
        correct_index,
    }
}

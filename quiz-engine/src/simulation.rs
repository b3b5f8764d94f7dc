//! Randomness-bias analysis.
//!
//! Measures the (position, value) distribution a shuffle produces over
//! many trials. Fisher-Yates should land every cell at `100/len`%;
//! the comparator shuffle kept here as a negative control measurably
//! favors the array edges.

use kanji_utils::Item;
use rand::Rng;

use crate::choices::{CHOICE_COUNT, generate_choices};

/// Per-cell observed percentages for one shuffle under test.
#[derive(Clone, Debug, serde::Serialize)]
pub struct DistributionReport {
    pub len: usize,
    pub trials: usize,
    /// `percentages[pos][value]`: how often `value` landed at `pos`.
    pub percentages: Vec<Vec<f64>>,
    /// Mean absolute deviation per cell from the ideal `100/len`%.
    pub mean_abs_deviation: f64,
    /// Largest single-cell deviation from the ideal, in percentage
    /// points.
    pub max_abs_deviation: f64,
}

/// Run `shuffle_fn` on `0..len` for `trials` rounds and tabulate where
/// each value lands.
pub fn position_distribution<R: Rng>(
    len: usize,
    trials: usize,
    rng: &mut R,
    shuffle_fn: impl Fn(&[usize], &mut R) -> Vec<usize>,
) -> DistributionReport {
    let input: Vec<usize> = (0..len).collect();
    let mut counts = vec![vec![0u64; len]; len];

    for _ in 0..trials {
        let shuffled = shuffle_fn(&input, rng);
        for (pos, value) in shuffled.iter().enumerate() {
            counts[pos][*value] += 1;
        }
    }

    let ideal = 100.0 / len as f64;
    let mut total_abs_deviation = 0.0;
    let mut max_abs_deviation: f64 = 0.0;
    let percentages: Vec<Vec<f64>> = counts
        .iter()
        .map(|row| {
            row.iter()
                .map(|&count| {
                    let pct = count as f64 / trials as f64 * 100.0;
                    let deviation = (pct - ideal).abs();
                    total_abs_deviation += deviation;
                    max_abs_deviation = max_abs_deviation.max(deviation);
                    pct
                })
                .collect()
        })
        .collect();

    DistributionReport {
        len,
        trials,
        percentages,
        mean_abs_deviation: total_abs_deviation / (len * len) as f64,
        max_abs_deviation,
    }
}

/// The biased shuffle the quiz must never use: an insertion reorder
/// driven by a coin-flip comparator, the moral equivalent of
/// `sort(() => random() - 0.5)`. An element's travel distance is
/// geometrically distributed, so edge positions stay close to their
/// original occupants.
pub fn comparator_shuffled<T: Clone>(items: &[T], rng: &mut impl Rng) -> Vec<T> {
    let mut out = items.to_vec();
    for i in 1..out.len() {
        let mut j = i;
        while j > 0 && rng.random::<f64>() < 0.5 {
            out.swap(j - 1, j);
            j -= 1;
        }
    }
    out
}

/// How often the correct answer lands in each of the four choice
/// slots, as counts.
pub fn choice_slot_distribution(
    correct: &Item,
    pool: &[Item],
    trials: usize,
    rng: &mut impl Rng,
) -> [u64; CHOICE_COUNT] {
    let mut counts = [0u64; CHOICE_COUNT];
    for _ in 0..trials {
        let set = generate_choices(correct, pool, rng);
        counts[set.correct_index] += 1;
    }
    counts
}

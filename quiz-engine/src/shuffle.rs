//! Unbiased permutation of a finite sequence.
//!
//! Fisher-Yates is the only method used for quiz ordering and
//! distractor pools; sort-by-random-comparator reorderings
//! over-represent the array edges (see `simulation` for the
//! measurement).

use rand::Rng;

/// Return an unbiased random permutation of `items` as a new vector.
/// The input is never mutated. Sequences of length 0 or 1 come back
/// unchanged.
pub fn shuffled<T: Clone>(items: &[T], rng: &mut impl Rng) -> Vec<T> {
    let mut out = items.to_vec();
    shuffle_in_place(&mut out, rng);
    out
}

pub(crate) fn shuffle_in_place<T>(items: &mut [T], rng: &mut impl Rng) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

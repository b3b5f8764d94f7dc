//! Spot-check the randomness the quiz depends on.
//!
//! Prints per-position distribution tables for the real Fisher-Yates
//! shuffle and for the biased comparator shuffle (the mistake this
//! harness exists to catch), checks that the correct choice slot is
//! uniform, samples the medal-chance model, and finishes with a JSON
//! summary.

use anyhow::Result;
use kanji_utils::{Item, QuizFormat};
use quiz_engine::simulation::{
    DistributionReport, choice_slot_distribution, comparator_shuffled, position_distribution,
};
use quiz_engine::{shuffled, try_get_medal};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

const SHUFFLE_TRIALS: usize = 200_000;
const CHOICE_TRIALS: usize = 200_000;
const MEDAL_TRIALS: usize = 100_000;

#[derive(Debug, Serialize)]
struct Summary {
    shuffles: Vec<ShuffleSummary>,
    correct_slot_percentages: Vec<f64>,
    medal_mean_at_150_percent: f64,
}

#[derive(Debug, Serialize)]
struct ShuffleSummary {
    name: String,
    len: usize,
    trials: usize,
    mean_abs_deviation: f64,
    max_abs_deviation: f64,
}

fn print_report(name: &str, report: &DistributionReport) {
    println!("\n=== {name} (len={}, trials={}) ===", report.len, report.trials);
    for (pos, row) in report.percentages.iter().enumerate() {
        let cells: Vec<String> = row.iter().map(|pct| format!("{pct:6.3}%")).collect();
        println!("pos {pos}: {}", cells.join("  "));
    }
    println!(
        "ideal {:.3}% per cell; mean abs deviation {:.4} pp, max {:.4} pp",
        100.0 / report.len as f64,
        report.mean_abs_deviation,
        report.max_abs_deviation
    );
}

fn kana_pool() -> Vec<Item> {
    ["あ", "い", "う", "え", "お", "か", "き", "く"]
        .iter()
        .map(|reading| Item {
            filename: format!("{reading}.png"),
            reading: reading.to_string(),
            ..Item::default()
        })
        .collect()
}

fn main() -> Result<()> {
    env_logger::init();
    let mut rng = ChaCha8Rng::seed_from_u64(0xC0FFEE);

    let mut shuffles = Vec::new();
    for len in [4usize, 10] {
        let fisher = position_distribution(len, SHUFFLE_TRIALS, &mut rng, |items, rng| {
            shuffled(items, rng)
        });
        print_report("Fisher-Yates", &fisher);
        shuffles.push(ShuffleSummary {
            name: "fisher_yates".to_string(),
            len,
            trials: SHUFFLE_TRIALS,
            mean_abs_deviation: fisher.mean_abs_deviation,
            max_abs_deviation: fisher.max_abs_deviation,
        });

        let comparator = position_distribution(len, SHUFFLE_TRIALS, &mut rng, |items, rng| {
            comparator_shuffled(items, rng)
        });
        print_report("comparator shuffle (negative control)", &comparator);
        shuffles.push(ShuffleSummary {
            name: "comparator".to_string(),
            len,
            trials: SHUFFLE_TRIALS,
            mean_abs_deviation: comparator.mean_abs_deviation,
            max_abs_deviation: comparator.max_abs_deviation,
        });
    }

    let pool = kana_pool();
    let slot_counts = choice_slot_distribution(&pool[0], &pool, CHOICE_TRIALS, &mut rng);
    let correct_slot_percentages: Vec<f64> = slot_counts
        .iter()
        .map(|count| *count as f64 / CHOICE_TRIALS as f64 * 100.0)
        .collect();
    println!("\n=== correct choice slot (trials={CHOICE_TRIALS}) ===");
    for (slot, pct) in correct_slot_percentages.iter().enumerate() {
        println!("slot {slot}: {pct:.3}%");
    }

    // 10% base + 140 points of boost: expect a mean of 1.5 medals
    let mut medal_total = 0u64;
    for _ in 0..MEDAL_TRIALS {
        medal_total += try_get_medal(QuizFormat::Input, 1.4, &mut rng);
    }
    let medal_mean = medal_total as f64 / MEDAL_TRIALS as f64;
    println!("\nmedal mean at 150% total chance: {medal_mean:.4} (expect 1.5)");

    let summary = Summary {
        shuffles,
        correct_slot_percentages,
        medal_mean_at_150_percent: medal_mean,
    };
    println!("\n{}", serde_json::to_string_pretty(&summary)?);

    log::info!("spot check complete");
    Ok(())
}

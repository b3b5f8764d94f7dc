//! Reward computation for one answered question.
//!
//! Pure with respect to session and player state: callers apply the
//! returned outcome. The only inputs are the verdict, the quiz format,
//! the active boosts, the pre-answer streak, the elapsed answer time
//! and a randomness source for the bonus-event trials.

use kanji_utils::QuizFormat;
use rand::Rng;

use crate::boosts::{BoostKind, BoostProvider};

/// Seconds within which a correct answer earns the full time bonus.
const TIME_BONUS_FULL_SECS: f64 = 5.0;
/// Seconds within which a correct answer earns half the time bonus.
const TIME_BONUS_HALF_SECS: f64 = 10.0;

/// Any single reward component above this magnitude is flagged as
/// implausible. Boost stacking should never get anywhere close.
const OVERFLOW_SOFT_LIMIT: f64 = 1e12;
/// Largest integer exactly representable in an f64.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

fn base_xp(format: QuizFormat) -> f64 {
    match format {
        QuizFormat::Input => 150.0,
        QuizFormat::Choice => 50.0,
    }
}

fn base_coins(format: QuizFormat) -> f64 {
    match format {
        QuizFormat::Input => 100.0,
        QuizFormat::Choice => 30.0,
    }
}

fn character_xp(format: QuizFormat) -> u64 {
    match format {
        QuizFormat::Input => 20,
        QuizFormat::Choice => 5,
    }
}

fn medal_base_chance(format: QuizFormat) -> f64 {
    match format {
        QuizFormat::Input => 10.0,
        QuizFormat::Choice => 2.5,
    }
}

/// What one answered question earned. Folded into the player's totals
/// by the persistence sink; never stored on its own.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct RewardOutcome {
    pub xp: u64,
    pub coins: u64,
    pub medals: u64,
    pub character_xp: u64,
    /// XP included in `xp` that came from answering quickly.
    pub time_bonus_xp: u64,
    pub double_reward: bool,
    pub critical_hit: bool,
    pub lucky_coin: bool,
    /// Observability only: reasons any component looked numerically
    /// implausible. Never alters the reward itself.
    pub overflow_reasons: Vec<String>,
}

/// Compute the reward for one answer. Incorrect (or skipped) answers
/// earn nothing.
///
/// Multiplier composition, in order: the double-reward trial fires
/// first and doubles both axes; only when it misses are critical
/// (XP x2) and lucky (coins x2) rolled independently. The streak
/// multiplier `1 + streak_amp * streak_before` applies to XP in the
/// input format only, and the time bonus is an additive XP term, not a
/// multiplier.
pub fn calculate(
    correct: bool,
    format: QuizFormat,
    boosts: &impl BoostProvider,
    streak_before: u32,
    elapsed_secs: f64,
    rng: &mut impl Rng,
) -> RewardOutcome {
    if !correct {
        return RewardOutcome::default();
    }

    let xp_boost = boosts.boost(BoostKind::XpBoost);
    let coin_boost = boosts.boost(BoostKind::CoinBoost);
    let xp_multiplier_boost = boosts.boost(BoostKind::XpMultiplier);
    let time_bonus_boost = boosts.boost(BoostKind::TimeBonus);

    let is_double = rng.random::<f64>() < boosts.boost(BoostKind::DoubleReward);
    let is_critical = !is_double && rng.random::<f64>() < boosts.boost(BoostKind::CriticalHit);
    let is_lucky = !is_double && rng.random::<f64>() < boosts.boost(BoostKind::LuckyCoin);

    let time_bonus_rate = if time_bonus_boost > 0.0 {
        if elapsed_secs <= TIME_BONUS_FULL_SECS {
            time_bonus_boost
        } else if elapsed_secs <= TIME_BONUS_HALF_SECS {
            time_bonus_boost * 0.5
        } else {
            0.0
        }
    } else {
        0.0
    };

    // escalating reward for sustained correctness, input format only
    let streak_multiplier = if format == QuizFormat::Input && streak_before > 0 {
        1.0 + boosts.boost(BoostKind::StreakAmp) * f64::from(streak_before)
    } else {
        1.0
    };
    let xp_event_multiplier = if is_double || is_critical { 2.0 } else { 1.0 };
    let coin_event_multiplier = if is_double || is_lucky { 2.0 } else { 1.0 };

    let base_xp = base_xp(format);
    let base_coins = base_coins(format);
    let xp_before_time_bonus = (base_xp
        * (1.0 + xp_boost)
        * (1.0 + xp_multiplier_boost)
        * xp_event_multiplier
        * streak_multiplier)
        .floor();
    let time_bonus_xp = (base_xp * time_bonus_rate).floor();
    let xp = xp_before_time_bonus + time_bonus_xp;
    let coins = (base_coins * (1.0 + coin_boost) * coin_event_multiplier).floor();

    let medals = try_get_medal(format, boosts.boost(BoostKind::MedalBoost), rng);

    let overflow_reasons = detect_overflow(&[
        ("xp_boost", xp_boost),
        ("coin_boost", coin_boost),
        ("xp_multiplier_boost", xp_multiplier_boost),
        ("time_bonus_rate", time_bonus_rate),
        ("streak_multiplier", streak_multiplier),
        ("xp_before_time_bonus", xp_before_time_bonus),
        ("time_bonus_xp", time_bonus_xp),
        ("xp", xp),
        ("coins", coins),
    ]);
    if !overflow_reasons.is_empty() {
        log::warn!("implausible reward components: {overflow_reasons:?}");
    }

    log::debug!(
        "reward: format={format:?} xp={xp} coins={coins} medals={medals} \
         double={is_double} critical={is_critical} lucky={is_lucky} \
         streak_multiplier={streak_multiplier} time_bonus_xp={time_bonus_xp}"
    );

    RewardOutcome {
        xp: xp as u64,
        coins: coins as u64,
        medals,
        character_xp: character_xp(format),
        time_bonus_xp: time_bonus_xp as u64,
        double_reward: is_double,
        critical_hit: is_critical,
        lucky_coin: is_lucky,
        overflow_reasons,
    }
}

/// Roll for medals. The computation stays in the percentage domain:
/// `medal_boost` is a fraction and contributes `medal_boost * 100`
/// percentage points on top of the format's base chance. A total at or
/// above 100 awards `floor(total / 100)` guaranteed medals plus one
/// more with probability equal to the remainder; the total is never
/// clamped before that split.
pub fn try_get_medal(format: QuizFormat, medal_boost: f64, rng: &mut impl Rng) -> u64 {
    let total_chance = medal_base_chance(format) + medal_boost * 100.0;

    if total_chance >= 100.0 {
        let guaranteed = (total_chance / 100.0).floor() as u64;
        let extra_chance = total_chance % 100.0;
        let roll = rng.random::<f64>() * 100.0;
        guaranteed + u64::from(roll < extra_chance)
    } else {
        let roll = rng.random::<f64>() * 100.0;
        u64::from(roll < total_chance)
    }
}

fn detect_overflow(components: &[(&str, f64)]) -> Vec<String> {
    let mut reasons = Vec::new();
    for (name, value) in components {
        if !value.is_finite() {
            reasons.push(format!("{name} is not finite"));
        } else if value.abs() > MAX_SAFE_INTEGER {
            reasons.push(format!("{name} exceeds the integer-safe range"));
        } else if value.abs() > OVERFLOW_SOFT_LIMIT {
            reasons.push(format!("{name} is very large (>1e12)"));
        }
    }
    reasons
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boosts::BoostTable;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_incorrect_answer_earns_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(20);
        let outcome = calculate(false, QuizFormat::Input, &(), 5, 1.0, &mut rng);
        assert_eq!(outcome, RewardOutcome::default());
    }

    #[test]
    fn test_base_rewards_without_boosts() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let outcome = calculate(true, QuizFormat::Input, &(), 0, 3.0, &mut rng);
        assert_eq!(outcome.xp, 150);
        assert_eq!(outcome.coins, 100);
        assert_eq!(outcome.character_xp, 20);
        assert_eq!(outcome.time_bonus_xp, 0);
        assert!(!outcome.double_reward);
        assert!(outcome.overflow_reasons.is_empty());

        let outcome = calculate(true, QuizFormat::Choice, &(), 0, 3.0, &mut rng);
        assert_eq!(outcome.xp, 50);
        assert_eq!(outcome.coins, 30);
        assert_eq!(outcome.character_xp, 5);
    }

    #[test]
    fn test_percent_boosts_compose_with_floor() {
        let mut rng = ChaCha8Rng::seed_from_u64(22);
        let boosts = BoostTable {
            xp_boost: 0.1,
            xp_multiplier: 0.2,
            coin_boost: 0.15,
            ..BoostTable::default()
        };
        let outcome = calculate(true, QuizFormat::Input, &boosts, 0, 30.0, &mut rng);
        // floor(150 * 1.1 * 1.2) = floor(198.0)
        assert_eq!(outcome.xp, 198);
        // floor(100 * 1.15)
        assert_eq!(outcome.coins, 114);
    }

    #[test]
    fn test_double_reward_doubles_both_axes() {
        let mut rng = ChaCha8Rng::seed_from_u64(23);
        let boosts = BoostTable {
            double_reward: 1.0,
            critical_hit: 1.0,
            lucky_coin: 1.0,
            ..BoostTable::default()
        };
        for _ in 0..50 {
            let outcome = calculate(true, QuizFormat::Input, &boosts, 0, 30.0, &mut rng);
            assert!(outcome.double_reward);
            // critical and lucky are only rolled when double missed
            assert!(!outcome.critical_hit);
            assert!(!outcome.lucky_coin);
            assert_eq!(outcome.xp, 300);
            assert_eq!(outcome.coins, 200);
        }
    }

    #[test]
    fn test_critical_and_lucky_are_independent_axes() {
        let mut rng = ChaCha8Rng::seed_from_u64(24);
        let boosts = BoostTable {
            critical_hit: 1.0,
            lucky_coin: 1.0,
            ..BoostTable::default()
        };
        let outcome = calculate(true, QuizFormat::Input, &boosts, 0, 30.0, &mut rng);
        assert!(outcome.critical_hit);
        assert!(outcome.lucky_coin);
        assert_eq!(outcome.xp, 300);
        assert_eq!(outcome.coins, 200);
    }

    #[test]
    fn test_streak_multiplier_input_format_only() {
        let mut rng = ChaCha8Rng::seed_from_u64(25);
        let boosts = BoostTable {
            streak_amp: 0.1,
            ..BoostTable::default()
        };
        let outcome = calculate(true, QuizFormat::Input, &boosts, 4, 30.0, &mut rng);
        // floor(150 * (1 + 0.1 * 4))
        assert_eq!(outcome.xp, 210);

        let outcome = calculate(true, QuizFormat::Choice, &boosts, 4, 30.0, &mut rng);
        assert_eq!(outcome.xp, 50);
    }

    #[test]
    fn test_zero_streak_has_no_multiplier() {
        let mut rng = ChaCha8Rng::seed_from_u64(26);
        let boosts = BoostTable {
            streak_amp: 0.5,
            ..BoostTable::default()
        };
        let outcome = calculate(true, QuizFormat::Input, &boosts, 0, 30.0, &mut rng);
        assert_eq!(outcome.xp, 150);
    }

    #[test]
    fn test_time_bonus_tiers() {
        let boosts = BoostTable {
            time_bonus: 0.2,
            ..BoostTable::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(27);

        let fast = calculate(true, QuizFormat::Input, &boosts, 0, 4.0, &mut rng);
        assert_eq!(fast.time_bonus_xp, 30); // floor(150 * 0.2)
        assert_eq!(fast.xp, 180);

        let medium = calculate(true, QuizFormat::Input, &boosts, 0, 8.0, &mut rng);
        assert_eq!(medium.time_bonus_xp, 15); // floor(150 * 0.1)
        assert_eq!(medium.xp, 165);

        let slow = calculate(true, QuizFormat::Input, &boosts, 0, 11.0, &mut rng);
        assert_eq!(slow.time_bonus_xp, 0);
        assert_eq!(slow.xp, 150);
    }

    #[test]
    fn test_medal_chance_below_hundred_is_single_roll() {
        let mut rng = ChaCha8Rng::seed_from_u64(28);
        let mut total = 0u64;
        let trials = 20_000;
        for _ in 0..trials {
            let medals = try_get_medal(QuizFormat::Input, 0.0, &mut rng);
            assert!(medals <= 1);
            total += medals;
        }
        // base chance 10%
        let mean = total as f64 / trials as f64;
        assert!((mean - 0.10).abs() < 0.01, "mean medals {mean}");
    }

    #[test]
    fn test_medal_chance_at_150_percent_averages_one_and_a_half() {
        let mut rng = ChaCha8Rng::seed_from_u64(29);
        let mut total = 0u64;
        let trials = 20_000;
        for _ in 0..trials {
            // 10% base + 140 percentage points of boost = 150%
            let medals = try_get_medal(QuizFormat::Input, 1.4, &mut rng);
            assert!(medals == 1 || medals == 2);
            total += medals;
        }
        let mean = total as f64 / trials as f64;
        assert!((mean - 1.5).abs() < 0.02, "mean medals {mean}");
    }

    #[test]
    fn test_medal_chance_at_exact_multiple_is_guaranteed() {
        let mut rng = ChaCha8Rng::seed_from_u64(30);
        for _ in 0..100 {
            // 10% base + 190 points = 200% exactly
            assert_eq!(try_get_medal(QuizFormat::Input, 1.9, &mut rng), 2);
        }
    }

    #[test]
    fn test_overflow_is_flagged_not_fixed() {
        let mut rng = ChaCha8Rng::seed_from_u64(31);
        let boosts = BoostTable {
            xp_boost: 1e13,
            ..BoostTable::default()
        };
        let outcome = calculate(true, QuizFormat::Input, &boosts, 0, 30.0, &mut rng);
        assert!(!outcome.overflow_reasons.is_empty());
        // the computed reward still reflects the stacked boost
        assert!(outcome.xp > 1_000_000_000);
    }

    #[test]
    fn test_non_finite_boost_is_flagged() {
        let mut rng = ChaCha8Rng::seed_from_u64(32);
        let boosts = BoostTable {
            xp_boost: f64::NAN,
            ..BoostTable::default()
        };
        let outcome = calculate(true, QuizFormat::Input, &boosts, 0, 30.0, &mut rng);
        assert!(
            outcome
                .overflow_reasons
                .iter()
                .any(|reason| reason.contains("not finite"))
        );
    }
}

//! Skill/collection boost lookup.
//!
//! Boost kinds form a closed enumeration rather than stringly-typed
//! keys so a typo at a call site is a compile error, and an absent
//! boost resolves to 0.0 instead of an error.

/// Every boost the reward calculator can consult. Values are fractions
/// (0.25 means +25%) except the Bernoulli-event kinds
/// (`DoubleReward`, `CriticalHit`, `LuckyCoin`), whose values are
/// per-answer trigger probabilities.
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BoostKind {
    XpBoost,
    CoinBoost,
    MedalBoost,
    StreakAmp,
    DoubleReward,
    CriticalHit,
    LuckyCoin,
    XpMultiplier,
    TimeBonus,
}

/// Read-only view of the player's active boosts, provided by the
/// external progression store.
pub trait BoostProvider {
    fn boost(&self, kind: BoostKind) -> f64;
}

/// No boosts at all. Convenient for tests and the base game.
impl BoostProvider for () {
    fn boost(&self, _kind: BoostKind) -> f64 {
        0.0
    }
}

/// A plain value-per-kind table, the strongly-typed form of the
/// original's skill-boost map.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BoostTable {
    pub xp_boost: f64,
    pub coin_boost: f64,
    pub medal_boost: f64,
    pub streak_amp: f64,
    pub double_reward: f64,
    pub critical_hit: f64,
    pub lucky_coin: f64,
    pub xp_multiplier: f64,
    pub time_bonus: f64,
}

impl BoostProvider for BoostTable {
    fn boost(&self, kind: BoostKind) -> f64 {
        match kind {
            BoostKind::XpBoost => self.xp_boost,
            BoostKind::CoinBoost => self.coin_boost,
            BoostKind::MedalBoost => self.medal_boost,
            BoostKind::StreakAmp => self.streak_amp,
            BoostKind::DoubleReward => self.double_reward,
            BoostKind::CriticalHit => self.critical_hit,
            BoostKind::LuckyCoin => self.lucky_coin,
            BoostKind::XpMultiplier => self.xp_multiplier,
            BoostKind::TimeBonus => self.time_bonus,
        }
    }
}

#![deny(clippy::string_slice)]

//! The quiz core: shuffle engine, distractor selection, answer
//! grading, reward computation and the session state machine.
//!
//! Everything here is synchronous and infallible; randomness comes in
//! through `&mut impl Rng` and time through caller-supplied
//! milliseconds, so the whole engine is deterministic under test.

pub mod boosts;
pub mod choices;
pub mod grading;
pub mod rewards;
pub mod session;
pub mod shuffle;
pub mod simulation;

pub use boosts::{BoostKind, BoostProvider, BoostTable};
pub use choices::{CHOICE_COUNT, ChoiceSet, generate_choices};
pub use grading::evaluate;
pub use rewards::{RewardOutcome, calculate, try_get_medal};
pub use session::{
    AnswerRecord, MIN_DWELL_MS, NextStep, PersistenceSink, Phase, QuizSession, RewardDelta, Score,
    SessionSummary, StatsPatch, StreakProtection,
};
pub use shuffle::shuffled;

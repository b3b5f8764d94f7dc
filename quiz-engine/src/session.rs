//! Quiz session state machine.
//!
//! A session owns its shuffled copy of the item pool, the position
//! index, score counters and the current streak. Everything runs
//! synchronously on caller events; the only "asynchrony" is the
//! minimum-dwell timer between submission and result display, which is
//! modeled as an explicit deadline the caller polls with `tick`, never
//! an implicit callback chain. Time flows in as caller-supplied
//! milliseconds so the machine stays deterministic under test.

use kanji_utils::{Item, Level, QuizFormat};
use rand::Rng;

use crate::boosts::BoostProvider;
use crate::choices::{ChoiceSet, generate_choices};
use crate::grading::evaluate;
use crate::rewards::{RewardOutcome, calculate};
use crate::shuffle::shuffled;

/// Minimum time the "evaluating" spinner stays visible, so feedback is
/// perceptible even though the computation is instant.
pub const MIN_DWELL_MS: f64 = 300.0;

/// External effect that can absorb one incorrect answer without
/// resetting the streak. The session never inspects remaining charges;
/// it only asks the provider to consume one.
pub trait StreakProtection {
    /// Consume a charge if one is held. Returns whether it fired.
    fn consume(&mut self) -> bool;
}

/// No protection held.
impl StreakProtection for () {
    fn consume(&mut self) -> bool {
        false
    }
}

/// Currency earned by one answer, forwarded to the persistence sink.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct RewardDelta {
    pub xp: u64,
    pub coins: u64,
    pub medals: u64,
    pub character_xp: u64,
}

impl RewardDelta {
    fn from_outcome(outcome: &RewardOutcome) -> Self {
        RewardDelta {
            xp: outcome.xp,
            coins: outcome.coins,
            medals: outcome.medals,
            character_xp: outcome.character_xp,
        }
    }
}

/// Session-level counters sent alongside each reward delta. The
/// best-streak fields are written only when the answer was correct:
/// `best_streak` for normal sessions, `endless_best_streak` for
/// endless ones.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct StatsPatch {
    pub total_quizzes: u64,
    pub correct_answers: u64,
    pub incorrect_answers: u64,
    pub current_streak: u32,
    pub best_streak: Option<u32>,
    pub endless_best_streak: Option<u32>,
}

/// Durability of cumulative totals is someone else's job; the session
/// hands over a delta and moves on without waiting for confirmation.
pub trait PersistenceSink {
    fn apply(&mut self, delta: &RewardDelta, patch: &StatsPatch);
}

/// Discard everything. Useful when nothing should be persisted.
impl PersistenceSink for () {
    fn apply(&mut self, _delta: &RewardDelta, _patch: &StatsPatch) {}
}

/// Where the session is within one question's lifecycle. "Idle" is the
/// absence of a session: `start` creates one, `next` on the last
/// question returns the summary and the caller drops it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    AwaitingAnswer,
    Evaluating { reveal_at_ms: f64 },
    ResultShown,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct Score {
    pub correct: u64,
    pub incorrect: u64,
}

/// Final report when a session ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SessionSummary {
    pub correct: u64,
    pub incorrect: u64,
    pub best_streak: u32,
}

/// What `next` did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NextStep {
    Question,
    Finished(SessionSummary),
}

/// The verdict and reward for one submitted answer.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct AnswerRecord {
    pub correct: bool,
    pub gave_up: bool,
    pub protection_used: bool,
    pub outcome: RewardOutcome,
}

pub struct QuizSession {
    level: Level,
    format: QuizFormat,
    endless: bool,
    /// The source pool, kept for endless refills and distractor draws.
    pool: Vec<Item>,
    /// The shuffled ordering, fixed at start (extended when endless).
    order: Vec<Item>,
    index: usize,
    phase: Phase,
    score: Score,
    streak: u32,
    best_streak: u32,
    choices: Option<ChoiceSet>,
    question_started_at_ms: f64,
    last_answer: Option<AnswerRecord>,
}

impl QuizSession {
    /// Start a session: shuffle the pool once and reset all counters.
    pub fn start(
        pool: Vec<Item>,
        level: Level,
        format: QuizFormat,
        endless: bool,
        now_ms: f64,
        rng: &mut impl Rng,
    ) -> Self {
        let order = shuffled(&pool, rng);
        log::debug!(
            "session start: {} items, level {level}, format {format:?}, endless {endless}",
            order.len()
        );
        let mut session = QuizSession {
            level,
            format,
            endless,
            pool,
            order,
            index: 0,
            phase: Phase::AwaitingAnswer,
            score: Score::default(),
            streak: 0,
            best_streak: 0,
            choices: None,
            question_started_at_ms: now_ms,
            last_answer: None,
        };
        session.refresh_question(now_ms, rng);
        session
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn format(&self) -> QuizFormat {
        self.format
    }

    pub fn current_item(&self) -> Option<&Item> {
        self.order.get(self.index)
    }

    /// The generated choice set for the active question; present only
    /// in four-choice format.
    pub fn choices(&self) -> Option<&ChoiceSet> {
        self.choices.as_ref()
    }

    pub fn last_answer(&self) -> Option<&AnswerRecord> {
        self.last_answer.as_ref()
    }

    /// Submit typed input for the current question (input format).
    ///
    /// Guards: a no-op outside `AwaitingAnswer` or when no item exists
    /// at the current index. Empty input is forced into the give-up
    /// path and is never evaluated.
    pub fn submit(
        &mut self,
        input: &str,
        now_ms: f64,
        boosts: &impl BoostProvider,
        protection: &mut impl StreakProtection,
        sink: &mut impl PersistenceSink,
        rng: &mut impl Rng,
    ) -> Option<AnswerRecord> {
        if self.phase != Phase::AwaitingAnswer {
            return None;
        }
        if input.trim().is_empty() {
            return self.give_up(now_ms, sink);
        }
        let item = self.order.get(self.index)?.clone();
        let correct = evaluate(input, &item, self.level);
        Some(self.record_answer(correct, false, now_ms, boosts, protection, sink, rng))
    }

    /// Submit a choice index for the current question (choice format).
    pub fn submit_choice(
        &mut self,
        choice_index: usize,
        now_ms: f64,
        boosts: &impl BoostProvider,
        protection: &mut impl StreakProtection,
        sink: &mut impl PersistenceSink,
        rng: &mut impl Rng,
    ) -> Option<AnswerRecord> {
        if self.phase != Phase::AwaitingAnswer {
            return None;
        }
        self.order.get(self.index)?;
        let correct = self
            .choices
            .as_ref()
            .is_some_and(|set| set.correct_index == choice_index);
        Some(self.record_answer(correct, false, now_ms, boosts, protection, sink, rng))
    }

    /// Explicit skip: unconditionally incorrect, no evaluation, no
    /// reward roll, no streak protection.
    pub fn give_up(
        &mut self,
        now_ms: f64,
        sink: &mut impl PersistenceSink,
    ) -> Option<AnswerRecord> {
        if self.phase != Phase::AwaitingAnswer {
            return None;
        }
        self.order.get(self.index)?;

        self.score.incorrect += 1;
        self.streak = 0;
        let record = AnswerRecord {
            correct: false,
            gave_up: true,
            protection_used: false,
            outcome: RewardOutcome::default(),
        };
        sink.apply(&RewardDelta::default(), &self.stats_patch(false));
        self.enter_evaluating(now_ms);
        self.last_answer = Some(record.clone());
        Some(record)
    }

    /// Advance the dwell timer. Returns true when the result became
    /// visible on this tick.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        if let Phase::Evaluating { reveal_at_ms } = self.phase
            && now_ms >= reveal_at_ms
        {
            self.phase = Phase::ResultShown;
            return true;
        }
        false
    }

    /// Move on from a shown result: the next question, an endless
    /// refill, or the end of the session.
    pub fn next(&mut self, now_ms: f64, rng: &mut impl Rng) -> Option<NextStep> {
        if self.phase != Phase::ResultShown {
            return None;
        }

        if self.index + 1 >= self.order.len() {
            if self.endless {
                // append a fresh shuffle of the pool so play continues
                let batch = shuffled(&self.pool, rng);
                self.order.extend(batch);
            } else {
                let summary = SessionSummary {
                    correct: self.score.correct,
                    incorrect: self.score.incorrect,
                    best_streak: self.best_streak,
                };
                log::debug!("session finished: {summary:?}");
                return Some(NextStep::Finished(summary));
            }
        }

        self.index += 1;
        self.refresh_question(now_ms, rng);
        Some(NextStep::Question)
    }

    /// Switch between input and four-choice while awaiting an answer.
    /// The current question is abandoned and a fresh one is drawn in
    /// the new format.
    pub fn set_format(&mut self, format: QuizFormat, now_ms: f64, rng: &mut impl Rng) {
        if self.phase != Phase::AwaitingAnswer || format == self.format {
            return;
        }
        self.format = format;
        if self.index + 1 < self.order.len() {
            self.index += 1;
        } else if self.endless {
            let batch = shuffled(&self.pool, rng);
            self.order.extend(batch);
            self.index += 1;
        }
        // on the final question of a finite session the same item is
        // re-drawn with fresh choices instead
        self.refresh_question(now_ms, rng);
    }

    #[allow(clippy::too_many_arguments)]
    fn record_answer(
        &mut self,
        correct: bool,
        gave_up: bool,
        now_ms: f64,
        boosts: &impl BoostProvider,
        protection: &mut impl StreakProtection,
        sink: &mut impl PersistenceSink,
        rng: &mut impl Rng,
    ) -> AnswerRecord {
        let elapsed_secs = ((now_ms - self.question_started_at_ms) / 1000.0).max(0.0);
        let streak_before = self.streak;
        let outcome = calculate(correct, self.format, boosts, streak_before, elapsed_secs, rng);

        let mut protection_used = false;
        if correct {
            self.score.correct += 1;
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
        } else {
            self.score.incorrect += 1;
            protection_used = protection.consume();
            if protection_used {
                log::info!("streak protection fired, streak {streak_before} preserved");
            } else {
                self.streak = 0;
            }
        }

        sink.apply(&RewardDelta::from_outcome(&outcome), &self.stats_patch(correct));
        self.enter_evaluating(now_ms);

        let record = AnswerRecord {
            correct,
            gave_up,
            protection_used,
            outcome,
        };
        self.last_answer = Some(record.clone());
        record
    }

    fn stats_patch(&self, correct: bool) -> StatsPatch {
        // the best streak can only have moved on a correct answer, so
        // incorrect and give-up patches leave both fields unset
        let best = correct.then_some(self.best_streak);
        StatsPatch {
            total_quizzes: self.score.correct + self.score.incorrect,
            correct_answers: self.score.correct,
            incorrect_answers: self.score.incorrect,
            current_streak: self.streak,
            best_streak: if self.endless { None } else { best },
            endless_best_streak: if self.endless { best } else { None },
        }
    }

    fn enter_evaluating(&mut self, now_ms: f64) {
        self.phase = Phase::Evaluating {
            reveal_at_ms: now_ms + MIN_DWELL_MS,
        };
    }

    fn refresh_question(&mut self, now_ms: f64, rng: &mut impl Rng) {
        self.phase = Phase::AwaitingAnswer;
        self.question_started_at_ms = now_ms;
        self.last_answer = None;
        self.choices = match (self.format, self.order.get(self.index)) {
            (QuizFormat::Choice, Some(item)) => Some(generate_choices(item, &self.order, rng)),
            _ => None,
        };
    }
}

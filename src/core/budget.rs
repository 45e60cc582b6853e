// src/core/budget.rs — Time budgets, phase schedule, and the clock
//
// Every time-based decision goes through `assess` so the wrap-up pre-emption
// cannot be skipped by a kind-specific branch.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

use super::types::{InterviewKind, Phase};

/// Fixed per-kind configuration.
#[derive(Debug, Clone, Copy)]
pub struct KindProfile {
    pub max_minutes: u32,
    pub wrap_up_at: u32,
    /// Full phase sequence, introduction first and wrap-up last.
    pub phases: &'static [Phase],
}

const DSA: KindProfile = KindProfile {
    max_minutes: 50,
    wrap_up_at: 45,
    phases: &[Phase::Introduction, Phase::ProblemSolving, Phase::WrapUp],
};

const RESUME_CS: KindProfile = KindProfile {
    max_minutes: 20,
    wrap_up_at: 18,
    phases: &[
        Phase::Introduction,
        Phase::ResumeDiscussion,
        Phase::TechnicalFundamentals,
        Phase::WrapUp,
    ],
};

const TECHNICAL_HR: KindProfile = KindProfile {
    max_minutes: 20,
    wrap_up_at: 18,
    phases: &[
        Phase::Introduction,
        Phase::TechnicalAssessment,
        Phase::BehavioralAssessment,
        Phase::WrapUp,
    ],
};

const HR: KindProfile = KindProfile {
    max_minutes: 20,
    wrap_up_at: 18,
    phases: &[
        Phase::Introduction,
        Phase::BehavioralAssessment,
        Phase::CulturalFit,
        Phase::WrapUp,
    ],
};

pub fn profile(kind: InterviewKind) -> &'static KindProfile {
    match kind {
        InterviewKind::Dsa => &DSA,
        InterviewKind::ResumeCs => &RESUME_CS,
        InterviewKind::TechnicalHr => &TECHNICAL_HR,
        InterviewKind::Hr => &HR,
    }
}

impl KindProfile {
    /// Phases strictly between introduction and wrap-up.
    pub fn middle_phases(&self) -> &'static [Phase] {
        &self.phases[1..self.phases.len() - 1]
    }
}

/// Snapshot of where a session stands against its time budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetStatus {
    pub elapsed_minutes: u32,
    pub remaining_minutes: u32,
    pub wrap_up_due: bool,
    pub expired: bool,
}

/// Whole minutes between `started_at` and `now`. Clock skew yields zero.
pub fn elapsed_minutes(started_at: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let minutes = (now - started_at).num_minutes();
    u32::try_from(minutes.max(0)).unwrap_or(u32::MAX)
}

pub fn assess(kind: InterviewKind, started_at: DateTime<Utc>, now: DateTime<Utc>) -> BudgetStatus {
    let p = profile(kind);
    let elapsed = elapsed_minutes(started_at, now);
    BudgetStatus {
        elapsed_minutes: elapsed,
        remaining_minutes: p.max_minutes.saturating_sub(elapsed),
        wrap_up_due: elapsed >= p.wrap_up_at,
        expired: elapsed >= p.max_minutes,
    }
}

/// The phase the schedule calls for, ignoring the session's current phase.
///
/// Introduction lasts until the first answer is recorded. The middle phases
/// then split the pre-wrap-up window evenly by elapsed time.
pub fn scheduled_phase(kind: InterviewKind, elapsed: u32, answers_recorded: usize) -> Phase {
    let p = profile(kind);
    if elapsed >= p.wrap_up_at {
        return Phase::WrapUp;
    }
    if answers_recorded == 0 {
        return Phase::Introduction;
    }
    let middles = p.middle_phases();
    let slot = (elapsed as usize * middles.len()) / p.wrap_up_at.max(1) as usize;
    middles[slot.min(middles.len() - 1)]
}

/// Source of wall-clock time for the state machine.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to. Used by tests and replays.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance_minutes(&self, minutes: i64) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += Duration::minutes(minutes);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_kind_table() {
        assert_eq!(profile(InterviewKind::Dsa).max_minutes, 50);
        assert_eq!(profile(InterviewKind::Dsa).wrap_up_at, 45);
        for kind in [
            InterviewKind::ResumeCs,
            InterviewKind::TechnicalHr,
            InterviewKind::Hr,
        ] {
            assert_eq!(profile(kind).max_minutes, 20);
            assert_eq!(profile(kind).wrap_up_at, 18);
        }
    }

    #[test]
    fn test_every_sequence_starts_and_ends_the_same() {
        for kind in InterviewKind::ALL {
            let phases = profile(kind).phases;
            assert_eq!(phases.first(), Some(&Phase::Introduction));
            assert_eq!(phases.last(), Some(&Phase::WrapUp));
            assert!(phases.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_elapsed_whole_minutes() {
        let start = t0();
        assert_eq!(elapsed_minutes(start, start + Duration::seconds(59)), 0);
        assert_eq!(elapsed_minutes(start, start + Duration::seconds(61)), 1);
        assert_eq!(elapsed_minutes(start, start - Duration::minutes(5)), 0);
    }

    #[test]
    fn test_assess_wrap_up_boundary() {
        let start = t0();
        let before = assess(InterviewKind::Hr, start, start + Duration::minutes(17));
        assert!(!before.wrap_up_due);
        assert_eq!(before.remaining_minutes, 3);

        let at = assess(InterviewKind::Hr, start, start + Duration::minutes(18));
        assert!(at.wrap_up_due);
        assert!(!at.expired);

        let over = assess(InterviewKind::Hr, start, start + Duration::minutes(25));
        assert!(over.expired);
        assert_eq!(over.remaining_minutes, 0);
    }

    #[test]
    fn test_scheduled_phase_introduction_until_first_answer() {
        assert_eq!(
            scheduled_phase(InterviewKind::ResumeCs, 5, 0),
            Phase::Introduction
        );
        assert_eq!(
            scheduled_phase(InterviewKind::ResumeCs, 0, 1),
            Phase::ResumeDiscussion
        );
    }

    #[test]
    fn test_scheduled_phase_splits_middle_window() {
        assert_eq!(
            scheduled_phase(InterviewKind::Hr, 8, 3),
            Phase::BehavioralAssessment
        );
        assert_eq!(scheduled_phase(InterviewKind::Hr, 9, 3), Phase::CulturalFit);
        assert_eq!(scheduled_phase(InterviewKind::Hr, 17, 3), Phase::CulturalFit);
        assert_eq!(scheduled_phase(InterviewKind::Hr, 18, 3), Phase::WrapUp);
    }

    #[test]
    fn test_scheduled_phase_wrap_up_pre_empts_introduction() {
        assert_eq!(scheduled_phase(InterviewKind::Dsa, 45, 0), Phase::WrapUp);
        assert_eq!(
            scheduled_phase(InterviewKind::Dsa, 44, 2),
            Phase::ProblemSolving
        );
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(t0());
        clock.advance_minutes(46);
        assert_eq!(elapsed_minutes(t0(), clock.now()), 46);
    }
}

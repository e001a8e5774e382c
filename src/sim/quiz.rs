//! Quiz interrupts
//!
//! Every `quiz_interval` distance units the run pauses for a two-choice
//! question about drink driving. A right answer wins a life back, a wrong one
//! costs promille.

use rand::Rng;
use serde::Serialize;

/// A two-choice question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuizQuestion {
    pub prompt: &'static str,
    pub answers: [&'static str; 2],
    /// Index of the right answer (0 or 1)
    pub correct: usize,
    pub explanation: Option<&'static str>,
}

impl QuizQuestion {
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct
    }
}

/// Built-in question pool
pub const QUESTION_POOL: &[QuizQuestion] = &[
    QuizQuestion {
        prompt: "Hva er promillegrensen for bilkjøring i Norge?",
        answers: ["0,2 ‰", "0,5 ‰"],
        correct: 0,
        explanation: Some("Grensen er 0,2 ‰ for alle førere, uansett alder."),
    },
    QuizQuestion {
        prompt: "Hva skjer ved en promille på 0,5–0,8?",
        answers: ["Økt risikovillighet", "Nedsatt syn"],
        correct: 0,
        explanation: None,
    },
    QuizQuestion {
        prompt: "Når er du edru etter en fest?",
        answers: ["Etter en god natts søvn", "Når promillen er 0,0"],
        correct: 1,
        explanation: Some("Søvn fjerner ikke alkohol, bare tid gjør det."),
    },
    QuizQuestion {
        prompt: "Hva risikerer man for fyllekjøring i Norge?",
        answers: [
            "Kraftig bot og tap av førerkort",
            "Bot, tap av førerkort og fengsel",
        ],
        correct: 1,
        explanation: None,
    },
    QuizQuestion {
        prompt: "Omtrent hvor raskt forbrenner kroppen alkohol?",
        answers: ["Ca. 0,15 ‰ i timen", "Ca. 1 ‰ i timen"],
        correct: 0,
        explanation: Some("Forbrenningen går sakte og kan ikke skyndes på."),
    },
    QuizQuestion {
        prompt: "Kan kaffe eller en kald dusj gjøre deg edru raskere?",
        answers: ["Ja", "Nei"],
        correct: 1,
        explanation: Some("Bare tid senker promillen."),
    },
    QuizQuestion {
        prompt: "En venn har drukket og vil kjøre hjem. Hva gjør du?",
        answers: ["Tar nøklene og ordner skyss", "Ber vennen kjøre sakte"],
        correct: 0,
        explanation: None,
    },
    QuizQuestion {
        prompt: "Påvirker alkohol reaksjonstiden din?",
        answers: ["Ja, den blir lengre", "Nei, ikke ved lav promille"],
        correct: 0,
        explanation: Some("Selv lav promille gir lengre reaksjonstid."),
    },
];

/// Where the quiz state machine is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuizPhase {
    #[default]
    Inactive,
    AwaitingAnswer(QuizQuestion),
}

/// Result of a trigger check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizCheck {
    /// No milestone crossed (or a question is already pending)
    Idle,
    Presented(QuizQuestion),
    /// Milestone crossed with nothing to ask
    SkippedEmptyPool,
}

/// A resolved answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizOutcome {
    pub question: QuizQuestion,
    pub correct: bool,
}

#[derive(Debug, Clone)]
pub struct QuizController {
    pub phase: QuizPhase,
    /// Distance at which the last milestone fired
    pub last_question_distance: f32,
    pool: &'static [QuizQuestion],
}

impl Default for QuizController {
    fn default() -> Self {
        Self::with_pool(QUESTION_POOL)
    }
}

impl QuizController {
    pub fn with_pool(pool: &'static [QuizQuestion]) -> Self {
        Self {
            phase: QuizPhase::Inactive,
            last_question_distance: 0.0,
            pool,
        }
    }

    pub fn is_awaiting(&self) -> bool {
        matches!(self.phase, QuizPhase::AwaitingAnswer(_))
    }

    /// The pending question, if any
    pub fn pending(&self) -> Option<&QuizQuestion> {
        match &self.phase {
            QuizPhase::AwaitingAnswer(q) => Some(q),
            QuizPhase::Inactive => None,
        }
    }

    /// Whether `distance` has crossed a milestone boundary not yet asked about
    pub fn milestone_due(&self, distance: f32, interval: f32) -> bool {
        if self.is_awaiting() || !distance.is_finite() || distance <= 0.0 || interval <= 0.0 {
            return false;
        }
        (distance / interval).floor() > (self.last_question_distance / interval).floor()
    }

    /// Present a question if a new milestone has been crossed
    pub fn check<R: Rng>(&mut self, distance: f32, interval: f32, rng: &mut R) -> QuizCheck {
        if !distance.is_finite() {
            log::warn!("Skipping quiz check for non-finite distance {}", distance);
            return QuizCheck::Idle;
        }
        if !self.milestone_due(distance, interval) {
            return QuizCheck::Idle;
        }

        self.last_question_distance = distance;
        if self.pool.is_empty() {
            log::warn!("Quiz at {:.2} skipped: question pool is empty", distance);
            return QuizCheck::SkippedEmptyPool;
        }

        let question = self.pool[rng.random_range(0..self.pool.len())];
        self.phase = QuizPhase::AwaitingAnswer(question);
        log::debug!("Quiz at {:.2}: {}", distance, question.prompt);
        QuizCheck::Presented(question)
    }

    /// Resolve the pending question; ignored when nothing is pending
    pub fn answer(&mut self, choice: usize) -> Option<QuizOutcome> {
        let QuizPhase::AwaitingAnswer(question) = self.phase else {
            log::debug!("Ignoring quiz answer {} with no question pending", choice);
            return None;
        };
        self.phase = QuizPhase::Inactive;
        let correct = question.is_correct(choice);
        log::debug!(
            "Quiz answered {} ({})",
            choice,
            if correct { "correct" } else { "wrong" }
        );
        Some(QuizOutcome { question, correct })
    }

    /// Back to a fresh run
    pub fn reset(&mut self) {
        self.phase = QuizPhase::Inactive;
        self.last_question_distance = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_pool_is_well_formed() {
        assert!(!QUESTION_POOL.is_empty());
        for q in QUESTION_POOL {
            assert!(q.correct < 2);
            assert!(!q.prompt.is_empty());
            assert!(q.answers.iter().all(|a| !a.is_empty()));
        }
    }

    #[test]
    fn test_crossing_boundary_triggers_once() {
        let mut quiz = QuizController::default();
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(quiz.check(2.95, 3.0, &mut rng), QuizCheck::Idle);
        let presented = quiz.check(3.02, 3.0, &mut rng);
        assert!(matches!(presented, QuizCheck::Presented(_)));
        assert_eq!(quiz.last_question_distance, 3.02);
        assert!(quiz.is_awaiting());
    }

    #[test]
    fn test_same_distance_twice_presents_once() {
        let mut quiz = QuizController::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let presented = quiz.check(3.5, 3.0, &mut rng);
        assert!(matches!(presented, QuizCheck::Presented(_)));
        assert_eq!(quiz.check(3.5, 3.0, &mut rng), QuizCheck::Idle);

        // Even after answering, the same milestone does not fire again
        quiz.answer(0);
        assert_eq!(quiz.check(3.5, 3.0, &mut rng), QuizCheck::Idle);
        assert_eq!(quiz.check(5.9, 3.0, &mut rng), QuizCheck::Idle);
        let presented = quiz.check(6.0, 3.0, &mut rng);
        assert!(matches!(presented, QuizCheck::Presented(_)));
    }

    #[test]
    fn test_nan_distance_skipped() {
        let mut quiz = QuizController::default();
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(quiz.check(f32::NAN, 3.0, &mut rng), QuizCheck::Idle);
        assert_eq!(quiz.last_question_distance, 0.0);
    }

    #[test]
    fn test_empty_pool_consumes_milestone() {
        let mut quiz = QuizController::with_pool(&[]);
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(quiz.check(3.1, 3.0, &mut rng), QuizCheck::SkippedEmptyPool);
        assert!(!quiz.is_awaiting());
        assert_eq!(quiz.check(3.2, 3.0, &mut rng), QuizCheck::Idle);
    }

    #[test]
    fn test_answer_resolves_and_returns_to_inactive() {
        let mut quiz = QuizController::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let QuizCheck::Presented(q) = quiz.check(3.0, 3.0, &mut rng) else {
            panic!("expected a question");
        };
        let outcome = quiz.answer(q.correct).expect("question pending");
        assert!(outcome.correct);
        assert_eq!(quiz.phase, QuizPhase::Inactive);
        assert_eq!(quiz.answer(0), None);
    }

    #[test]
    fn test_reset_clears_milestone() {
        let mut quiz = QuizController::default();
        let mut rng = Pcg32::seed_from_u64(1);
        quiz.check(3.0, 3.0, &mut rng);
        quiz.reset();
        assert!(!quiz.is_awaiting());
        assert_eq!(quiz.last_question_distance, 0.0);
        assert!(quiz.milestone_due(3.0, 3.0));
    }
}

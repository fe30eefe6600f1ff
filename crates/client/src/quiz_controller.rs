use lesson_core::model::{LessonId, QuizQuestion};

use crate::api::{LessonTransport, QuizFetchOutcome};
use crate::decode::{Decoded, decode_list};

/// Per-lesson quiz cache states.
#[derive(Debug, Clone, PartialEq)]
pub enum QuizFetchState {
    Unfetched,
    Loading,
    Loaded(Vec<QuizQuestion>),
    Errored(String),
}

impl QuizFetchState {
    /// Pure transition from `Loading` on a finished fetch. A 404 lands in
    /// `Loaded` with an empty list — "no quiz" is a normal outcome, not a
    /// failure.
    #[must_use]
    pub fn resolved(outcome: QuizFetchOutcome) -> Self {
        match outcome {
            QuizFetchOutcome::Questions(questions) => Self::Loaded(questions),
            QuizFetchOutcome::Missing => Self::Loaded(Vec::new()),
            QuizFetchOutcome::Failed(message) => Self::Errored(message),
        }
    }
}

/// Identity captured when a fetch starts.
///
/// Responses are applied back through the ticket, so a reply that lands
/// after the displayed lesson changed is discarded instead of hitting the
/// new lesson's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    lesson_id: LessonId,
}

impl FetchTicket {
    #[must_use]
    pub fn lesson_id(&self) -> &LessonId {
        &self.lesson_id
    }
}

/// Explicit state machine for on-demand quiz fetching, keyed by lesson id
/// and independent of any rendering framework.
#[derive(Debug)]
pub struct QuizOnDemandController {
    lesson_id: LessonId,
    has_quiz: bool,
    state: QuizFetchState,
}

impl QuizOnDemandController {
    #[must_use]
    pub fn new(lesson_id: LessonId, has_quiz: bool) -> Self {
        Self {
            lesson_id,
            has_quiz,
            state: QuizFetchState::Unfetched,
        }
    }

    #[must_use]
    pub fn lesson_id(&self) -> &LessonId {
        &self.lesson_id
    }

    #[must_use]
    pub fn state(&self) -> &QuizFetchState {
        &self.state
    }

    /// A fetch is due only when the lesson advertises a quiz, the quiz
    /// step is the active step, and nothing is cached yet. `Errored` also
    /// qualifies, so re-entering the step after a failure retries.
    #[must_use]
    pub fn fetch_due(&self, quiz_step_active: bool) -> bool {
        if !self.has_quiz || !quiz_step_active {
            return false;
        }
        matches!(
            self.state,
            QuizFetchState::Unfetched | QuizFetchState::Errored(_)
        )
    }

    /// Move to `Loading` and hand out the ticket for this fetch.
    ///
    /// Returns `None` while a fetch is already in flight or after one has
    /// completed — the state guard keeps at most one request outstanding
    /// per lesson, however often the step is re-entered.
    pub fn begin_fetch(&mut self, quiz_step_active: bool) -> Option<FetchTicket> {
        if !self.fetch_due(quiz_step_active) {
            return None;
        }
        self.state = QuizFetchState::Loading;
        Some(FetchTicket {
            lesson_id: self.lesson_id.clone(),
        })
    }

    /// Apply a finished fetch through its ticket. A stale ticket — issued
    /// before the displayed lesson changed — is dropped without touching
    /// the current lesson's state.
    pub fn apply_outcome(&mut self, ticket: &FetchTicket, outcome: QuizFetchOutcome) {
        if ticket.lesson_id != self.lesson_id {
            log::debug!(
                "discarding stale quiz response for {} (now showing {})",
                ticket.lesson_id,
                self.lesson_id
            );
            return;
        }
        self.state = QuizFetchState::resolved(outcome);
    }

    /// Point the controller at a different lesson, dropping cached state.
    pub fn switch_lesson(&mut self, lesson_id: LessonId, has_quiz: bool) {
        self.lesson_id = lesson_id;
        self.has_quiz = has_quiz;
        self.state = QuizFetchState::Unfetched;
    }
}

/// Drive one quiz fetch over the transport and shape the result for
/// `apply_outcome`. Malformed payloads are failures here, not silent
/// empties.
pub async fn run_quiz_fetch(
    transport: &dyn LessonTransport,
    ticket: &FetchTicket,
) -> QuizFetchOutcome {
    match transport.fetch_quiz(ticket.lesson_id()).await {
        Ok(None) => QuizFetchOutcome::Missing,
        Ok(Some(payload)) => match decode_list(payload, "quizQuestions") {
            Decoded::Ok(questions) => QuizFetchOutcome::Questions(questions),
            Decoded::Malformed(reason) => {
                log::warn!(
                    "quiz payload for {} was malformed: {reason}",
                    ticket.lesson_id()
                );
                QuizFetchOutcome::Failed("quiz payload was malformed".to_string())
            }
        },
        Err(err) => QuizFetchOutcome::Failed(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lesson_core::model::quiz::QuizOption;

    fn question(word: &str) -> QuizQuestion {
        QuizQuestion {
            vocabulary_word: word.to_string(),
            question: format!("What does \"{word}\" mean?"),
            hints: vec![],
            options: vec![QuizOption {
                label: "A".to_string(),
                text: "a fruit".to_string(),
            }],
            correct_option: "A".to_string(),
        }
    }

    #[test]
    fn fetch_waits_for_the_quiz_step() {
        let controller = QuizOnDemandController::new(LessonId::new("A"), true);
        assert!(!controller.fetch_due(false));
        assert!(controller.fetch_due(true));
    }

    #[test]
    fn lessons_without_quiz_never_fetch() {
        let mut controller = QuizOnDemandController::new(LessonId::new("A"), false);
        assert!(controller.begin_fetch(true).is_none());
        assert_eq!(controller.state(), &QuizFetchState::Unfetched);
    }

    #[test]
    fn at_most_one_fetch_is_in_flight() {
        let mut controller = QuizOnDemandController::new(LessonId::new("A"), true);
        let first = controller.begin_fetch(true);
        let second = controller.begin_fetch(true);
        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(controller.state(), &QuizFetchState::Loading);
    }

    #[test]
    fn missing_quiz_resolves_to_loaded_empty() {
        let mut controller = QuizOnDemandController::new(LessonId::new("A"), true);
        let ticket = controller.begin_fetch(true).unwrap();
        controller.apply_outcome(&ticket, QuizFetchOutcome::Missing);
        assert_eq!(controller.state(), &QuizFetchState::Loaded(vec![]));
        // Loaded-empty is terminal; re-entering the step does not refetch.
        assert!(controller.begin_fetch(true).is_none());
    }

    #[test]
    fn loaded_questions_keep_their_order() {
        let mut controller = QuizOnDemandController::new(LessonId::new("A"), true);
        let ticket = controller.begin_fetch(true).unwrap();
        let questions = vec![question("apple"), question("orange")];
        controller.apply_outcome(&ticket, QuizFetchOutcome::Questions(questions.clone()));
        assert_eq!(controller.state(), &QuizFetchState::Loaded(questions));
    }

    #[test]
    fn failure_allows_a_retry_on_step_reentry() {
        let mut controller = QuizOnDemandController::new(LessonId::new("A"), true);
        let ticket = controller.begin_fetch(true).unwrap();
        controller.apply_outcome(
            &ticket,
            QuizFetchOutcome::Failed("timed out".to_string()),
        );
        assert!(matches!(controller.state(), QuizFetchState::Errored(_)));
        assert!(controller.begin_fetch(true).is_some());
    }

    #[test]
    fn stale_response_is_discarded_after_a_lesson_switch() {
        let mut controller = QuizOnDemandController::new(LessonId::new("A"), true);
        let ticket_for_a = controller.begin_fetch(true).unwrap();

        controller.switch_lesson(LessonId::new("B"), true);
        controller.apply_outcome(&ticket_for_a, QuizFetchOutcome::Questions(vec![question("apple")]));

        // Lesson B's state is untouched by A's late reply.
        assert_eq!(controller.state(), &QuizFetchState::Unfetched);
        assert_eq!(controller.lesson_id(), &LessonId::new("B"));
    }

    #[test]
    fn switching_back_requires_a_fresh_fetch() {
        let mut controller = QuizOnDemandController::new(LessonId::new("A"), true);
        let ticket = controller.begin_fetch(true).unwrap();
        controller.apply_outcome(&ticket, QuizFetchOutcome::Questions(vec![question("apple")]));

        controller.switch_lesson(LessonId::new("B"), false);
        controller.switch_lesson(LessonId::new("A"), true);
        assert_eq!(controller.state(), &QuizFetchState::Unfetched);
        assert!(controller.begin_fetch(true).is_some());
    }
}

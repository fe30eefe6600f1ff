use lesson_core::model::AnnotatedLesson;

use crate::api::LessonTransport;
use crate::decode::{Decoded, decode_list};

/// Two states only: the list is loading or it is ready.
///
/// Transport and shape failures resolve to `Ready` with an empty list —
/// listing degrades silently for the learner, with the cause recorded in
/// the log.
#[derive(Debug, Clone, PartialEq)]
pub enum LessonListState {
    Loading,
    Ready(Vec<AnnotatedLesson>),
}

/// Session-scoped lesson list cache: exactly one fetch per mount.
#[derive(Debug, Default)]
pub struct ClientLessonCache {
    state: LessonListState,
}

impl Default for LessonListState {
    fn default() -> Self {
        Self::Loading
    }
}

impl ClientLessonCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: LessonListState::Loading,
        }
    }

    #[must_use]
    pub fn state(&self) -> &LessonListState {
        &self.state
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.state, LessonListState::Loading)
    }

    /// Fetch the lesson list once and cache it; later calls return the
    /// cached copy without touching the network.
    pub async fn load(&mut self, transport: &dyn LessonTransport) -> Vec<AnnotatedLesson> {
        if let LessonListState::Ready(lessons) = &self.state {
            return lessons.clone();
        }

        let lessons = match transport.fetch_lessons().await {
            Ok(payload) => match decode_list(payload, "lessons") {
                Decoded::Ok(lessons) => lessons,
                Decoded::Malformed(reason) => {
                    log::warn!("lesson list payload was malformed, showing empty list: {reason}");
                    Vec::new()
                }
            },
            Err(err) => {
                log::warn!("lesson list fetch failed, showing empty list: {err}");
                Vec::new()
            }
        };

        self.state = LessonListState::Ready(lessons.clone());
        lessons
    }
}

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a Lesson.
///
/// Assigned once at creation from a timestamp-derived token and immutable
/// afterwards. The id is the join key across the metadata file, the audio
/// directory, and the quiz sidecar directory, and doubles as the filename
/// stem for audio and sidecar files.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LessonId(String);

impl LessonId {
    /// Creates a `LessonId` from an existing token.
    ///
    /// Emptiness is checked at the API boundary, not here, so ids read
    /// back from storage pass through unchanged.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derives an id token from a creation timestamp.
    ///
    /// `:` and `.` are replaced with `-` so the token is usable as a
    /// filename stem on every platform.
    #[must_use]
    pub fn generate(now: DateTime<Utc>) -> Self {
        let token = now
            .to_rfc3339_opts(SecondsFormat::Millis, true)
            .replace([':', '.'], "-");
        Self(token)
    }

    /// Returns the underlying token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when the token is empty or whitespace-only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LessonId({})", self.0)
    }
}

impl fmt::Display for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

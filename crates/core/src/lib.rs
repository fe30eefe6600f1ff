#![forbid(unsafe_code)]

pub mod model;
pub mod time;

pub use model::quiz::{QuizValidationError, validate_question, validate_questions};
pub use model::{AnnotatedLesson, Flashcard, Lesson, LessonId, QuizOption, QuizQuestion};
pub use time::Clock;

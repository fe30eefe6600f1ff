pub mod ids;
pub mod lesson;
pub mod quiz;

pub use ids::LessonId;
pub use lesson::{AnnotatedLesson, Flashcard, Lesson};
pub use quiz::{QuizOption, QuizQuestion};

#![forbid(unsafe_code)]

pub mod api;
pub mod authoring;
pub mod decode;
pub mod generator;
pub mod lesson_cache;
pub mod quiz_controller;

pub use api::{
    AudioUpload, ClientError, CreateLessonPayload, HttpLessonTransport, LessonTransport,
    QuizFetchOutcome,
};
pub use authoring::{AudioFile, AuthoringError, AuthoringService, LessonDraft};
pub use decode::Decoded;
pub use generator::{ChatContentGenerator, ContentGenerator, GeneratorError};
pub use lesson_cache::{ClientLessonCache, LessonListState};
pub use quiz_controller::{FetchTicket, QuizFetchState, QuizOnDemandController, run_quiz_fetch};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One selectable answer within a multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    pub label: String,
    pub text: String,
}

/// A multiple-choice item testing one vocabulary word.
///
/// Hints and options keep their authored order; `correct_option` refers to
/// an option by label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub vocabulary_word: String,
    pub question: String,
    pub hints: Vec<String>,
    pub options: Vec<QuizOption>,
    pub correct_option: String,
}

//
// ─── QUIZ VALIDATION ───────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuizValidationError {
    #[error("question for \"{word}\" has no options")]
    NoOptions { word: String },

    #[error("question for \"{word}\" repeats option label \"{label}\"")]
    DuplicateLabel { word: String, label: String },

    #[error("question for \"{word}\" marks \"{label}\" correct but no option carries that label")]
    UnknownCorrectOption { word: String, label: String },
}

/// Check that `correct_option` names exactly one of the question's own
/// option labels and that labels are unique within the question.
///
/// The stores do not enforce this invariant; callers run it as a guard
/// before accepting generated content, separate from any read/write path.
///
/// # Errors
///
/// Returns `QuizValidationError` naming the offending word and label.
pub fn validate_question(question: &QuizQuestion) -> Result<(), QuizValidationError> {
    if question.options.is_empty() {
        return Err(QuizValidationError::NoOptions {
            word: question.vocabulary_word.clone(),
        });
    }

    for (index, option) in question.options.iter().enumerate() {
        let seen_before = question.options[..index]
            .iter()
            .any(|earlier| earlier.label == option.label);
        if seen_before {
            return Err(QuizValidationError::DuplicateLabel {
                word: question.vocabulary_word.clone(),
                label: option.label.clone(),
            });
        }
    }

    let correct_exists = question
        .options
        .iter()
        .any(|option| option.label == question.correct_option);
    if !correct_exists {
        return Err(QuizValidationError::UnknownCorrectOption {
            word: question.vocabulary_word.clone(),
            label: question.correct_option.clone(),
        });
    }

    Ok(())
}

/// Validate every question in a generated list, failing on the first
/// violation.
///
/// # Errors
///
/// Returns the first `QuizValidationError` encountered.
pub fn validate_questions(questions: &[QuizQuestion]) -> Result<(), QuizValidationError> {
    for question in questions {
        validate_question(question)?;
    }
    Ok(())
}

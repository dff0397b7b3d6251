use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GenError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // --- Startup ---
    ModelMissing,
    ServerStartFailed,

    // --- Generation ---
    InferenceFailed,
    AttemptsExhausted,

    // --- Validation ---
    ValidationFailed,
    BoundsExceeded,

    // --- Desktop ---
    ClipboardFailed,
}

#[derive(Debug, Error)]
pub enum GenError {
    #[error("Model file does not exist at path: {}", path.display())]
    ModelMissing { code: ErrorCode, path: PathBuf },

    #[error("Model server error: {message} (command: {command})")]
    Server { code: ErrorCode, message: String, command: String },

    #[error("Inference failed: {message}")]
    Inference { code: ErrorCode, message: String },

    #[error("No valid username after {attempts} attempt(s) (last candidate: {last_candidate:?})")]
    AttemptsExhausted { code: ErrorCode, attempts: u32, last_candidate: String },

    #[error("Validation Error: {message} (context: {context})")]
    Validation { code: ErrorCode, message: String, context: String },

    #[error("Clipboard Error: {message}")]
    Clipboard { code: ErrorCode, message: String },
}

impl GenError {
    pub fn code(&self) -> ErrorCode {
        match self {
            GenError::ModelMissing { code, .. }
            | GenError::Server { code, .. }
            | GenError::Inference { code, .. }
            | GenError::AttemptsExhausted { code, .. }
            | GenError::Validation { code, .. }
            | GenError::Clipboard { code, .. } => *code,
        }
    }

    /// Text shown to the user when a generation run fails.
    pub fn user_message(&self) -> String {
        match self.code() {
            ErrorCode::AttemptsExhausted => format!("{self}. Try a longer length or fewer constraints."),
            _ => format!("An error occurred while generating the username: {self}"),
        }
    }

    pub(crate) fn inference(message: impl Into<String>) -> Self {
        GenError::Inference { code: ErrorCode::InferenceFailed, message: message.into() }
    }
}

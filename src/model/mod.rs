use crate::error::{ErrorCode, GenError, Result};
use std::path::{Path, PathBuf};

pub mod llama;
pub mod process;

pub use llama::LlamaServer;
pub use process::ServerProcess;

/// A model that turns one prompt into one text completion, synchronously.
pub trait TextModel: Send + Sync {
    fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String>;
}

impl<T: TextModel + ?Sized> TextModel for std::sync::Arc<T> {
    fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        (**self).complete(prompt, max_tokens)
    }
}

/// Fails fast when the model artifact is not a regular file.
pub fn ensure_model_artifact(path: &Path) -> Result<PathBuf> {
    if path.is_file() {
        Ok(path.to_path_buf())
    } else {
        Err(GenError::ModelMissing { code: ErrorCode::ModelMissing, path: path.to_path_buf() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_artifact_names_the_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("models/phi.gguf");
        let err = ensure_model_artifact(&path).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ModelMissing);
        assert!(err.to_string().contains("phi.gguf"));
    }

    #[test]
    fn directory_is_not_an_artifact() {
        let tmp = TempDir::new().unwrap();
        assert!(ensure_model_artifact(tmp.path()).is_err());
    }

    #[test]
    fn present_artifact_passes() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("phi.gguf");
        fs::write(&path, b"GGUF").unwrap();
        assert_eq!(ensure_model_artifact(&path).unwrap(), path);
    }
}

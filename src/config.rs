use crate::error::{ErrorCode, GenError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_MODEL_PATH: &str = "models/phi.gguf";
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8080";
pub const DEFAULT_MAX_TOKENS: u32 = 30;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 25;

#[derive(Debug, Clone)]
pub struct Config {
    pub model_path: PathBuf,
    pub endpoint: String,
    pub server_bin: Option<PathBuf>,
    pub server_port: u16,
    pub server_ready_timeout: Duration,
    pub max_attempts: u32,
    pub max_tokens: u32,
    pub temperature: f32,
    pub request_timeout: Duration,
    pub quiet: bool,
}

impl Config {
    pub fn new() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            server_bin: None,
            server_port: 8080,
            server_ready_timeout: Duration::from_secs(60),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: 0.8,
            request_timeout: Duration::from_secs(120),
            quiet: false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(invalid("max_attempts", self.max_attempts, "must be at least 1"));
        }
        if self.max_tokens == 0 {
            return Err(invalid("max_tokens", self.max_tokens, "must be at least 1"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(invalid("temperature", self.temperature, "must be between 0.0 and 2.0"));
        }
        if self.endpoint.trim().is_empty() {
            return Err(invalid("endpoint", "<empty>", "must not be empty"));
        }
        Ok(())
    }

    /// Locates the model artifact. A relative path is looked up next to the
    /// executable first, then in the working directory. When neither exists the
    /// path beside the executable is returned, so a missing-model error names it.
    pub fn resolve_model_path(&self, exe_dir: Option<&Path>) -> PathBuf {
        if self.model_path.is_absolute() {
            return self.model_path.clone();
        }
        let Some(dir) = exe_dir else {
            return self.model_path.clone();
        };
        let beside_exe = dir.join(&self.model_path);
        if beside_exe.is_file() || !self.model_path.is_file() {
            beside_exe
        } else {
            self.model_path.clone()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> GenError {
    GenError::Validation {
        code: ErrorCode::ValidationFailed,
        message: format!("Invalid configuration: {reason}"),
        context: format!("{field}={}", value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_are_valid() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.max_tokens, 30);
        assert_eq!(cfg.model_path, PathBuf::from("models/phi.gguf"));
    }

    #[test]
    fn rejects_zero_attempts_and_bad_temperature() {
        let mut cfg = Config::new();
        cfg.max_attempts = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::new();
        cfg.temperature = 3.5;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("temperature"));
    }

    #[test]
    fn prefers_model_beside_executable() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("models")).unwrap();
        fs::write(tmp.path().join("models/phi.gguf"), b"GGUF").unwrap();

        let cfg = Config::new();
        assert_eq!(cfg.resolve_model_path(Some(tmp.path())), tmp.path().join("models/phi.gguf"));
    }

    #[test]
    fn missing_model_resolves_beside_executable() {
        let tmp = TempDir::new().unwrap();
        let mut cfg = Config::new();
        cfg.model_path = PathBuf::from("models/not-shipped-with-tests.gguf");

        let resolved = cfg.resolve_model_path(Some(tmp.path()));
        assert_eq!(resolved, tmp.path().join("models/not-shipped-with-tests.gguf"));
        assert!(resolved.is_absolute());

        let err = crate::model::ensure_model_artifact(&resolved).unwrap_err();
        assert!(err.to_string().contains(&resolved.display().to_string()));
    }

    #[test]
    fn relative_path_kept_without_executable_dir() {
        let cfg = Config::new();
        assert_eq!(cfg.resolve_model_path(None), PathBuf::from("models/phi.gguf"));
    }
}

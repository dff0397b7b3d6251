use super::LlamaServer;
use crate::error::{ErrorCode, GenError, Result};
use crate::logger::Logger;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const READY_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// A model server child process serving the model artifact. Killed on drop.
pub struct ServerProcess {
    child: Child,
    command: String,
    logger: Logger,
}

impl ServerProcess {
    /// Launches `<bin> -m <model> --host 127.0.0.1 --port <port>`.
    pub fn spawn(bin: &Path, model: &Path, port: u16, logger: &Logger) -> Result<Self> {
        let port = port.to_string();
        let mut cmd = Command::new(bin);
        cmd.arg("-m")
            .arg(model)
            .args(["--host", "127.0.0.1", "--port", &port])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        let command = format!("{cmd:?}");

        let child = cmd.spawn().map_err(|e| GenError::Server {
            code: ErrorCode::ServerStartFailed,
            message: format!("could not launch model server: {e}"),
            command: command.clone(),
        })?;
        logger.info("server", "spawn", &format!("pid={} {command}", child.id()));

        Ok(Self { child, command, logger: logger.clone() })
    }

    /// Polls the health endpoint until it answers, the child exits, or `timeout` passes.
    pub fn wait_ready(&mut self, client: &LlamaServer, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if client.is_ready() {
                self.logger.info("server", "ready", client.endpoint());
                return Ok(());
            }
            if let Ok(Some(status)) = self.child.try_wait() {
                return Err(self.failure(format!("model server exited early with {status}")));
            }
            if Instant::now() >= deadline {
                return Err(self.failure(format!("model server not ready after {}s", timeout.as_secs())));
            }
            thread::sleep(READY_POLL_INTERVAL);
        }
    }

    fn failure(&self, message: String) -> GenError {
        self.logger.error("server", "wait_ready", &message);
        GenError::Server {
            code: ErrorCode::ServerStartFailed,
            message,
            command: self.command.clone(),
        }
    }
}

impl Drop for ServerProcess {
    fn drop(&mut self) {
        if let Ok(None) = self.child.try_wait() {
            self.child.kill().ok();
            self.child.wait().ok();
            self.logger.info("server", "stop", &format!("pid={}", self.child.id()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn missing_binary_is_a_server_error() {
        let logger = Logger::capturing(1, Arc::new(Mutex::new(String::new())));
        let err = ServerProcess::spawn(
            Path::new("/definitely/not/a/llama-server"),
            Path::new("models/phi.gguf"),
            18080,
            &logger,
        )
        .err()
        .unwrap();
        assert_eq!(err.code(), ErrorCode::ServerStartFailed);
        assert!(err.to_string().contains("llama-server"));
    }
}

use chrono::{Local, Utc};
use serde_json::json;
use std::sync::{Arc, Mutex};

#[derive(Clone, Debug)]
pub struct Logger {
    rid: u64,
    quiet: bool,
    // Optional buffer for capturing logs during tests
    output: Option<Arc<Mutex<String>>>,
}

impl Logger {
    /// Creates a new logger that prints to standard output.
    ///
    /// # Panics
    ///
    /// Panics if `rid` is zero.
    #[must_use]
    pub fn new(rid: u64) -> Self {
        assert!(rid > 0, "Logger rid must be non-zero");
        Self { rid, quiet: false, output: None }
    }

    /// Creates a logger that appends every record to `buffer` instead of stdout/stderr.
    #[must_use]
    pub fn capturing(rid: u64, buffer: Arc<Mutex<String>>) -> Self {
        Self { rid, quiet: false, output: Some(buffer) }
    }

    /// Drops info records; errors are still emitted.
    #[must_use]
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Same sink and verbosity, new request id.
    #[must_use]
    pub fn with_rid(&self, rid: u64) -> Self {
        Self { rid: rid.max(1), ..self.clone() }
    }

    pub fn rid(&self) -> u64 {
        self.rid
    }

    /// Structured JSONL info record (ts/level/rid/subsystem/action/msg).
    pub fn info(&self, subsystem: &str, action: &str, message: &str) {
        if self.quiet {
            return;
        }
        self.emit("info", subsystem, action, message);
    }

    pub fn error(&self, subsystem: &str, action: &str, message: &str) {
        self.emit("error", subsystem, action, message);
    }

    fn emit(&self, level: &str, subsystem: &str, action: &str, message: &str) {
        let rec = json!({
            "ts": Utc::now().to_rfc3339(),
            "level": level,
            "rid": self.rid,
            "subsystem": subsystem,
            "action": action,
            "msg": message,
        });

        if let Some(buffer) = &self.output {
            // A poisoned buffer only means a test thread panicked mid-write.
            let mut writer = buffer.lock().unwrap_or_else(|e| e.into_inner());
            writer.push_str(&rec.to_string());
            writer.push('\n');
        } else if level == "error" {
            eprintln!("{rec}");
        } else {
            println!("{rec}");
        }
    }
}

/// Request id for one generation run: wall-clock millis mixed with the pid.
pub fn generate_rid() -> u64 {
    let rid = (Local::now().timestamp_millis() as u64) ^ u64::from(std::process::id());
    rid.max(1)
}

use crate::config::Config;
use crate::error::{ErrorCode, GenError, Result};
use crate::logger::Logger;
use crate::model::TextModel;
use crate::prompts::build_prompt;
use crate::request::{AcceptedUsername, GenerationRequest};
use crate::validate::{extract_after_label, UsernameRule};
use std::fmt;
use std::num::NonZeroU32;

/// One step of a generation run, for the trace view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceEvent<'a> {
    Prompt { attempt: u32, prompt: &'a str },
    Raw { attempt: u32, raw: &'a str },
    Extracted { attempt: u32, candidate: &'a str },
    Refined { attempt: u32, refined: &'a str },
    Rejected { attempt: u32, candidate: &'a str },
    Accepted { attempt: u32, username: &'a str },
}

impl fmt::Display for TraceEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::Prompt { attempt, prompt } => write!(f, "[{attempt}] Prompt: {prompt}"),
            TraceEvent::Raw { attempt, raw } => write!(f, "[{attempt}] Model said: {:?}", raw),
            TraceEvent::Extracted { attempt, candidate } => {
                write!(f, "[{attempt}] Candidate (before validation): {candidate}")
            }
            TraceEvent::Refined { attempt, refined } => write!(f, "[{attempt}] Refined candidate: {refined}"),
            TraceEvent::Rejected { attempt, candidate } => {
                write!(f, "[{attempt}] Rejected {candidate:?}, asking again")
            }
            TraceEvent::Accepted { attempt, username } => write!(f, "[{attempt}] Valid username: {username}"),
        }
    }
}

/// Asks the model for candidates until one satisfies the request's format rule.
pub struct Acceptor<M> {
    model: M,
    max_tokens: u32,
    max_attempts: NonZeroU32,
    logger: Logger,
}

impl<M: TextModel> Acceptor<M> {
    pub fn new(model: M, max_tokens: u32, max_attempts: NonZeroU32, logger: Logger) -> Self {
        Self { model, max_tokens, max_attempts, logger }
    }

    /// Fails instead of building an acceptor that could never ask the model.
    pub fn from_config(model: M, config: &Config, logger: Logger) -> Result<Self> {
        let max_attempts = NonZeroU32::new(config.max_attempts).ok_or_else(|| GenError::Validation {
            code: ErrorCode::ValidationFailed,
            message: "Invalid configuration: must be at least 1".to_string(),
            context: "max_attempts=0".to_string(),
        })?;
        Ok(Self::new(model, config.max_tokens, max_attempts, logger))
    }

    /// Runs the attempt loop.
    ///
    /// Each attempt: complete, strip a leading label, validate; on failure
    /// refine (strip disallowed characters, truncate) and validate again.
    /// Inference errors end the run immediately. After `max_attempts`
    /// failed attempts the run ends with [`GenError::AttemptsExhausted`].
    pub fn accept<F>(&self, request: &GenerationRequest, mut observer: F) -> Result<AcceptedUsername>
    where
        F: FnMut(&TraceEvent<'_>),
    {
        let rule = UsernameRule::for_request(request)?;
        let prompt = build_prompt(request);

        let mut last_candidate = String::new();
        for attempt in 1..=self.max_attempts.get() {
            self.emit(&mut observer, TraceEvent::Prompt { attempt, prompt: &prompt });

            let raw = self.model.complete(&prompt, self.max_tokens).map_err(|e| {
                self.logger.error("acceptor", "complete", &e.to_string());
                e
            })?;
            self.emit(&mut observer, TraceEvent::Raw { attempt, raw: &raw });

            let candidate = extract_after_label(&raw);
            self.emit(&mut observer, TraceEvent::Extracted { attempt, candidate });
            if rule.is_valid(candidate) {
                self.emit(&mut observer, TraceEvent::Accepted { attempt, username: candidate });
                return Ok(AcceptedUsername::new(candidate.to_string()));
            }

            let refined = rule.refine(candidate);
            self.emit(&mut observer, TraceEvent::Refined { attempt, refined: &refined });
            if rule.is_valid(&refined) {
                self.emit(&mut observer, TraceEvent::Accepted { attempt, username: &refined });
                return Ok(AcceptedUsername::new(refined));
            }

            self.emit(&mut observer, TraceEvent::Rejected { attempt, candidate: &refined });
            last_candidate = refined;
        }

        let err = GenError::AttemptsExhausted {
            code: ErrorCode::AttemptsExhausted,
            attempts: self.max_attempts.get(),
            last_candidate,
        };
        self.logger.error("acceptor", "exhausted", &err.to_string());
        Err(err)
    }

    fn emit<F>(&self, observer: &mut F, event: TraceEvent<'_>)
    where
        F: FnMut(&TraceEvent<'_>),
    {
        self.logger.info("acceptor", "trace", &event.to_string());
        observer(&event);
    }
}

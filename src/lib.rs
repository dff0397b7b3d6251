//! Asks a locally served language model for a username and keeps asking until
//! the answer has the requested length and character set.

pub mod acceptor;
pub mod config;
pub mod error;
pub mod logger;
pub mod model;
pub mod prompts;
pub mod request;
pub mod validate;

pub use acceptor::{Acceptor, TraceEvent};
pub use config::Config;
pub use error::{ErrorCode, GenError, Result};
pub use logger::Logger;
pub use model::{LlamaServer, ServerProcess, TextModel};
pub use request::{AcceptedUsername, GenerationRequest, Theme, ThemeSet};

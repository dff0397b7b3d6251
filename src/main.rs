#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use usernamegen::config::{self, Config};
use usernamegen::error::{ErrorCode, GenError};
use usernamegen::logger::{generate_rid, Logger};
use usernamegen::model::{ensure_model_artifact, LlamaServer, ServerProcess};
use usernamegen::{AcceptedUsername, Acceptor, GenerationRequest, Theme, ThemeSet};

slint::include_modules!();

type SharedAcceptor = Arc<Acceptor<LlamaServer>>;

#[derive(Parser)]
#[command(name = "usernamegen", about = "Generate usernames with a local language model")]
struct Cli {
    /// Model artifact; relative paths are looked up next to the executable first.
    #[arg(long, default_value = config::DEFAULT_MODEL_PATH)]
    model: PathBuf,
    /// Base URL of the completion server.
    #[arg(long, default_value = config::DEFAULT_ENDPOINT)]
    endpoint: String,
    /// Launch this server binary on the model instead of using an already running one.
    #[arg(long)]
    server_bin: Option<PathBuf>,
    /// Port the launched server listens on; the endpoint follows it when --server-bin is set.
    #[arg(long, default_value_t = 8080)]
    server_port: u16,
    /// Model calls per click before giving up.
    #[arg(long, default_value_t = config::DEFAULT_MAX_ATTEMPTS)]
    max_attempts: u32,
    /// Token budget for each completion.
    #[arg(long, default_value_t = config::DEFAULT_MAX_TOKENS)]
    max_tokens: u32,
    /// Sampling temperature, 0.0 to 2.0.
    #[arg(long, default_value_t = 0.8)]
    temperature: f32,
    /// HTTP timeout for one completion, in seconds.
    #[arg(long, default_value_t = 120)]
    timeout_secs: u64,
    /// Only log errors.
    #[arg(long)]
    quiet: bool,
}

impl Cli {
    fn into_config(self) -> Config {
        let mut config = Config::new();
        config.model_path = self.model;
        config.endpoint = match &self.server_bin {
            Some(_) => format!("http://127.0.0.1:{}", self.server_port),
            None => self.endpoint,
        };
        config.server_bin = self.server_bin;
        config.server_port = self.server_port;
        config.max_attempts = self.max_attempts;
        config.max_tokens = self.max_tokens;
        config.temperature = self.temperature;
        config.request_timeout = Duration::from_secs(self.timeout_secs);
        config.quiet = self.quiet;
        config
    }
}

fn main() -> ExitCode {
    let config = Cli::parse().into_config();
    let logger = Logger::new(generate_rid()).quiet(config.quiet);

    match run(&config, &logger) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let msg = format!("{e:#}");
            logger.error("app", "startup", &msg);
            show_fatal(&msg);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config, logger: &Logger) -> anyhow::Result<()> {
    config.validate()?;

    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf));
    let model_path = ensure_model_artifact(&config.resolve_model_path(exe_dir.as_deref()))?;
    logger.info("app", "model_path", &format!("Model Path: {}", model_path.display()));

    let client = LlamaServer::new(&config.endpoint, config.temperature, config.request_timeout)?;

    // Held until the window closes; dropping it stops the child server.
    let _server = match &config.server_bin {
        Some(bin) => {
            let mut server = ServerProcess::spawn(bin, &model_path, config.server_port, logger)?;
            server
                .wait_ready(&client, config.server_ready_timeout)
                .context("model server did not come up")?;
            Some(server)
        }
        None => None,
    };

    let acceptor: SharedAcceptor = Arc::new(Acceptor::from_config(client, config, logger.clone())?);

    let ui = MainWindow::new().context("could not create the main window")?;

    // Generate
    {
        let ui_handle = ui.as_weak();
        let acceptor = acceptor.clone();
        let logger = logger.clone();
        ui.on_generate(move || {
            let Some(ui) = ui_handle.upgrade() else { return };
            if ui.get_is_processing() {
                return;
            }

            let request = match request_from_form(&ui) {
                Ok(r) => r,
                Err(e) => {
                    set_status(&ui, &format!("❌ {e}"), true);
                    return;
                }
            };

            ui.set_is_processing(true);
            ui.set_result_text("".into());
            set_status(&ui, "⚙️ Generating username...", false);
            clear_log(&ui);

            spawn_generation(&ui, acceptor.clone(), logger.with_rid(generate_rid()), request);
        });
    }

    // Copy to clipboard
    {
        let ui_handle = ui.as_weak();
        let logger = logger.clone();
        ui.on_copy_result(move || {
            let Some(ui) = ui_handle.upgrade() else { return };
            let text = ui.get_result_text().to_string();
            match copy_to_clipboard(&text) {
                Ok(()) => set_status(&ui, "📋 Copied to clipboard", false),
                Err(e) => {
                    logger.error("app", "copy", &e.to_string());
                    set_status(&ui, &format!("❌ {e}"), true);
                }
            }
        });
    }

    ui.run().context("event loop failed")?;
    Ok(())
}

/* ========================== Generation ========================== */

/// Runs one acceptance loop off the UI thread. Trace lines and the final
/// outcome are posted back to the event loop; the worker never touches the UI.
fn spawn_generation(ui: &MainWindow, acceptor: SharedAcceptor, logger: Logger, request: GenerationRequest) {
    let ui_weak = ui.as_weak();
    std::thread::spawn(move || {
        logger.info("app", "generate", &format!("{request:?}"));

        let trace_weak = ui_weak.clone();
        let outcome = acceptor.accept(&request, |event| {
            let line = event.to_string();
            trace_weak
                .upgrade_in_event_loop(move |ui| append_log(&ui, &line))
                .ok();
        });

        if let Err(e) = &outcome {
            logger.error("app", "generate", &e.to_string());
        }

        ui_weak
            .upgrade_in_event_loop(move |ui| {
                match outcome {
                    Ok(name) => show_username(&ui, &name),
                    Err(e) => show_failure(&ui, &e),
                }
                ui.set_is_processing(false);
            })
            .ok();
    });
}

fn request_from_form(ui: &MainWindow) -> usernamegen::Result<GenerationRequest> {
    let mut themes = ThemeSet::empty();
    for (theme, on) in [
        (Theme::Fantasy, ui.get_theme_fantasy()),
        (Theme::Futuristic, ui.get_theme_futuristic()),
        (Theme::Funny, ui.get_theme_funny()),
    ] {
        if on {
            themes.insert(theme);
        }
    }
    GenerationRequest::from_form(ui.get_username_length(), ui.get_allow_numbers(), themes)
}

/* ========================== Helpers ========================== */

fn show_username(ui: &MainWindow, name: &AcceptedUsername) {
    let msg = format!("Your username: {name}");
    ui.set_result_text(name.as_str().into());
    set_status(ui, &format!("✅ {msg}"), false);
    show_dialog(rfd::MessageLevel::Info, "Generated Username", &msg);
}

fn show_failure(ui: &MainWindow, err: &GenError) {
    let msg = err.user_message();
    set_status(ui, &format!("❌ {msg}"), true);
    show_dialog(rfd::MessageLevel::Error, "Error", &msg);
}

fn show_dialog(level: rfd::MessageLevel, title: &str, msg: &str) {
    rfd::MessageDialog::new()
        .set_level(level)
        .set_title(title)
        .set_description(msg)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}

fn set_status(ui: &MainWindow, msg: &str, is_error: bool) {
    ui.set_status_text(msg.into());
    ui.set_status_is_error(is_error);
}

fn copy_to_clipboard(text: &str) -> usernamegen::Result<()> {
    let to_err = |e: arboard::Error| GenError::Clipboard {
        code: ErrorCode::ClipboardFailed,
        message: e.to_string(),
    };
    let mut clipboard = arboard::Clipboard::new().map_err(to_err)?;
    clipboard.set_text(text.to_owned()).map_err(to_err)
}

/// The window never opened, so the error goes to a native dialog as well as stderr.
fn show_fatal(msg: &str) {
    eprintln!("{msg}");
    show_dialog(rfd::MessageLevel::Error, "Username Generator", msg);
}

fn append_log(ui: &MainWindow, msg: &str) {
    let mut buf = ui.get_log_output().to_string();
    if !buf.is_empty() && !buf.ends_with('\n') {
        buf.push('\n');
    }
    buf.push_str(msg);
    ui.set_log_output(buf.into());
}

fn clear_log(ui: &MainWindow) {
    ui.set_log_output("".into());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn every_flag_has_help_text() {
        let cmd = Cli::command();
        cmd.clone().debug_assert();
        let mut checked = 0;
        for arg in cmd.get_arguments().filter(|a| a.get_id() != "help" && a.get_id() != "version") {
            assert!(arg.get_help().is_some(), "--{} has no help text", arg.get_id());
            checked += 1;
        }
        assert_eq!(checked, 9);
    }

    #[test]
    fn server_bin_points_endpoint_at_server_port() {
        let cli = Cli::parse_from(["usernamegen", "--server-bin", "llama-server", "--server-port", "9191"]);
        let config = cli.into_config();
        assert_eq!(config.endpoint, "http://127.0.0.1:9191");
        assert_eq!(config.server_port, 9191);
    }
}

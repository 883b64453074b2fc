//! Process logging bootstrap.
//!
//! # Responsibility
//! - Initialize the `log` backend exactly once per process: rolling files
//!   when a directory is configured, stderr otherwise.
//! - Capture panics as sanitized `panic_captured` events.
//!
//! # Invariants
//! - Init is idempotent for an identical [`LogConfig`].
//! - Re-initialization with a different config is rejected.
//! - Initialization never panics.
//! - Events carry ids and counts, not food names or emails.

use flexi_logger::{
    Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming, WriteMode,
};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "foodflux";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();
static PANIC_HOOK_INSTALLED: OnceCell<()> = OnceCell::new();

/// Logging destination and verbosity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// One of `trace|debug|info|warn|error` (case-insensitive).
    pub level: String,
    /// Absolute directory for rolling log files; `None` logs to stderr.
    pub log_dir: Option<PathBuf>,
    /// With `log_dir` set, also mirror warnings and errors to stderr.
    pub mirror_to_stderr: bool,
}

#[derive(Debug, PartialEq, Eq)]
struct ActiveConfig {
    level: &'static str,
    log_dir: Option<PathBuf>,
    mirror_to_stderr: bool,
}

struct LoggingState {
    active: ActiveConfig,
    _logger: LoggerHandle,
}

/// Initializes process logging.
///
/// # Errors
/// - Unsupported `level`, or a `log_dir` that is blank or relative.
/// - The log directory cannot be created or the backend fails to start.
/// - Logging was already initialized with a different config.
pub fn init_logging(config: &LogConfig) -> Result<(), String> {
    let requested = ActiveConfig {
        level: normalize_level(&config.level)?,
        log_dir: config
            .log_dir
            .as_deref()
            .map(|dir| normalize_log_dir(&dir.to_string_lossy()))
            .transpose()?,
        mirror_to_stderr: config.mirror_to_stderr,
    };

    if let Some(state) = LOGGING_STATE.get() {
        return ensure_same_config(&state.active, &requested);
    }

    let state = LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState, String> {
        let logger = start_logger(&requested)?;
        install_panic_hook_once();

        info!(
            "event=app_start module=core status=ok platform={} build_mode={} version={}",
            std::env::consts::OS,
            build_mode(),
            env!("CARGO_PKG_VERSION")
        );
        info!(
            "event=logging_init module=core status=ok level={} sink={}",
            requested.level,
            requested
                .log_dir
                .as_deref()
                .map_or_else(|| "stderr".to_string(), |dir| dir.display().to_string())
        );

        Ok(LoggingState {
            active: ActiveConfig {
                level: requested.level,
                log_dir: requested.log_dir.clone(),
                mirror_to_stderr: requested.mirror_to_stderr,
            },
            _logger: logger,
        })
    })?;

    ensure_same_config(&state.active, &requested)
}

/// Returns `(level, log_dir)` of the active logger, or `None` before init.
pub fn logging_status() -> Option<(&'static str, Option<PathBuf>)> {
    LOGGING_STATE
        .get()
        .map(|state| (state.active.level, state.active.log_dir.clone()))
}

/// Returns the default log level for the current build mode.
///
/// - `debug` builds -> `debug`
/// - `release` builds -> `info`
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_logger(config: &ActiveConfig) -> Result<LoggerHandle, String> {
    let logger = Logger::try_with_str(config.level)
        .map_err(|err| format!("invalid log level `{}`: {err}", config.level))?;

    let logger = match config.log_dir.as_deref() {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|err| {
                format!("failed to create log directory `{}`: {err}", dir.display())
            })?;
            let duplicate = if config.mirror_to_stderr {
                Duplicate::Warn
            } else {
                Duplicate::None
            };
            logger
                .log_to_file(FileSpec::default().directory(dir).basename(LOG_FILE_BASENAME))
                .rotate(
                    Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                    Naming::Numbers,
                    Cleanup::KeepLogFiles(MAX_LOG_FILES),
                )
                .write_mode(WriteMode::BufferAndFlush)
                .append()
                .format_for_files(flexi_logger::detailed_format)
                .duplicate_to_stderr(duplicate)
        }
        None => logger
            .log_to_stderr()
            .format_for_stderr(flexi_logger::default_format),
    };

    logger
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))
}

fn ensure_same_config(active: &ActiveConfig, requested: &ActiveConfig) -> Result<(), String> {
    if active == requested {
        return Ok(());
    }
    Err(format!(
        "logging already initialized with {}; refusing to switch to {}",
        describe(active),
        describe(requested)
    ))
}

fn describe(config: &ActiveConfig) -> String {
    let sink = config
        .log_dir
        .as_deref()
        .map_or_else(|| "stderr".to_string(), |dir| format!("`{}`", dir.display()));
    format!("level `{}` at {sink}", config.level)
}

pub(crate) fn normalize_level(level: &str) -> Result<&'static str, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error"
        )),
    }
}

pub(crate) fn normalize_log_dir(log_dir: &str) -> Result<PathBuf, String> {
    let trimmed = log_dir.trim();
    if trimmed.is_empty() {
        return Err("log_dir cannot be empty".to_string());
    }
    let path = Path::new(trimmed);
    if !path.is_absolute() {
        return Err(format!("log_dir must be an absolute path, got `{trimmed}`"));
    }
    Ok(path.to_path_buf())
}

fn build_mode() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}

fn install_panic_hook_once() {
    if PANIC_HOOK_INSTALLED.get().is_some() {
        return;
    }

    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Payloads may echo user input; keep them to one capped line.
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = panic_payload_summary(panic_info);
        error!(
            "event=panic_captured module=core status=error location={} payload={}",
            location, payload
        );
        previous_hook(panic_info);
    }));

    let _ = PANIC_HOOK_INSTALLED.set(());
}

fn panic_payload_summary(info: &std::panic::PanicHookInfo<'_>) -> String {
    let payload = if let Some(message) = info.payload().downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = info.payload().downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    };

    sanitize_message(&payload, MAX_PANIC_PAYLOAD_CHARS)
}

fn sanitize_message(value: &str, max_chars: usize) -> String {
    let normalized = value.replace(['\n', '\r'], " ");
    let mut truncated = normalized.chars().take(max_chars).collect::<String>();
    if normalized.chars().count() > max_chars {
        truncated.push_str("...");
    }
    truncated
}

#[cfg(test)]
mod tests {
    use super::{
        init_logging, logging_status, normalize_level, normalize_log_dir, sanitize_message,
        LogConfig,
    };

    #[test]
    fn normalize_level_accepts_known_values() {
        assert_eq!(normalize_level("ERROR").unwrap(), "error");
        assert_eq!(normalize_level(" warning ").unwrap(), "warn");
        assert!(normalize_level("verbose").is_err());
    }

    #[test]
    fn normalize_log_dir_rejects_blank_and_relative_paths() {
        assert!(normalize_log_dir("   ").unwrap_err().contains("empty"));
        assert!(normalize_log_dir("logs/dev").unwrap_err().contains("absolute"));
    }

    #[test]
    fn sanitize_message_flattens_and_caps_payload() {
        let sanitized = sanitize_message("entry\nname\rleak", 6);
        assert_eq!(sanitized, "entry ...");
    }

    #[test]
    fn init_logging_is_idempotent_and_rejects_reconfiguration() {
        let log_dir = tempfile::tempdir().unwrap();
        let config = LogConfig {
            level: "info".to_string(),
            log_dir: Some(log_dir.path().to_path_buf()),
            mirror_to_stderr: false,
        };

        init_logging(&config).expect("first init should succeed");
        init_logging(&config).expect("same config should be idempotent");

        let louder = LogConfig {
            level: "debug".to_string(),
            ..config.clone()
        };
        assert!(init_logging(&louder)
            .unwrap_err()
            .contains("refusing to switch"));

        let stderr_only = LogConfig {
            log_dir: None,
            ..config.clone()
        };
        assert!(init_logging(&stderr_only)
            .unwrap_err()
            .contains("refusing to switch"));

        let (level, active_dir) = logging_status().expect("logging should be active");
        assert_eq!(level, "info");
        assert_eq!(active_dir.as_deref(), Some(log_dir.path()));
    }
}

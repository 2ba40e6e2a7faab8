use std::env;
use std::fs;
use std::path::Path;

use advisor_core::config::{resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

pub fn run(options: &LoadOptions) -> String {
    let config = match AppConfig::load(options.clone()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let overrides = &options.overrides;
    let config_file_path = resolve_config_path(options.config_path.as_deref());
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };
    let flagged = |flag: &str, set: bool, key_path: &str, env_keys: &[&str]| {
        if set {
            format!("flag (--{flag})")
        } else {
            source(key_path, env_keys)
        }
    };

    let fields = [
        (
            "server.bind_address",
            config.server.bind_address.clone(),
            flagged(
                "bind-address",
                overrides.bind_address.is_some(),
                "server.bind_address",
                &["ADVISOR_SERVER_BIND_ADDRESS"],
            ),
        ),
        (
            "server.port",
            config.server.port.to_string(),
            flagged("port", overrides.port.is_some(), "server.port", &["ADVISOR_SERVER_PORT"]),
        ),
        (
            "server.graceful_shutdown_secs",
            config.server.graceful_shutdown_secs.to_string(),
            source("server.graceful_shutdown_secs", &["ADVISOR_SERVER_GRACEFUL_SHUTDOWN_SECS"]),
        ),
        (
            "server.max_sessions",
            config.server.max_sessions.to_string(),
            source("server.max_sessions", &["ADVISOR_SERVER_MAX_SESSIONS"]),
        ),
        (
            "server.session_idle_secs",
            config.server.session_idle_secs.to_string(),
            source("server.session_idle_secs", &["ADVISOR_SERVER_SESSION_IDLE_SECS"]),
        ),
        (
            "chat.prompt",
            format!("{:?}", config.chat.prompt),
            source("chat.prompt", &["ADVISOR_CHAT_PROMPT"]),
        ),
        (
            "chat.history_limit",
            config.chat.history_limit.to_string(),
            source("chat.history_limit", &["ADVISOR_CHAT_HISTORY_LIMIT"]),
        ),
        (
            "logging.level",
            config.logging.level.clone(),
            flagged(
                "log-level",
                overrides.log_level.is_some(),
                "logging.level",
                &["ADVISOR_LOGGING_LEVEL", "ADVISOR_LOG_LEVEL"],
            ),
        ),
        (
            "logging.format",
            format!("{:?}", config.logging.format),
            flagged(
                "log-format",
                overrides.log_format.is_some(),
                "logging.format",
                &["ADVISOR_LOGGING_FORMAT", "ADVISOR_LOG_FORMAT"],
            ),
        ),
    ];

    let mut lines =
        vec!["effective config (source precedence: flag > env > file > default):".to_string()];
    lines.extend(fields.iter().map(|(key, value, source)| render_line(key, value, source)));
    lines.join("\n")
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: &str) -> String {
    format!("- {key} = {value} (source: {source})")
}

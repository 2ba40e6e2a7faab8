pub mod commands;
pub mod logging;
pub mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use advisor_core::config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
use advisor_core::Topic;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "advisor",
    about = "Automation advisor for the grocery distribution case study",
    long_about = "Ask questions about the distribution-center automation case: costs, savings, \
                  break-even, workforce impact and risks.",
    after_help = "Examples:\n  advisor ask What are the current labor costs?\n  advisor ask --json \
                  show me the numbers\n  advisor chat\n  advisor doctor --json"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Config file to load; it must exist when given")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Log level override (trace|debug|info|warn|error)")]
    log_level: Option<String>,
    #[arg(long, global = true, value_parser = parse_log_format, help = "compact|pretty|json")]
    log_format: Option<LogFormat>,
    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            overrides: ConfigOverrides {
                log_level: self.log_level.clone(),
                log_format: self.log_format,
                ..ConfigOverrides::default()
            },
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Answer a single question and exit")]
    Ask {
        #[arg(long, help = "Emit the response payload as JSON")]
        json: bool,
        #[arg(
            long,
            value_parser = parse_topic,
            help = "Answer as this topic instead of routing by keywords (e.g. savings_chart)"
        )]
        topic: Option<Topic>,
        #[arg(trailing_var_arg = true, help = "The question, quoted or as separate words")]
        question: Vec<String>,
    },
    #[command(about = "Start an interactive session (/history, /facts, /help, /quit)")]
    Chat,
    #[command(about = "Show quick facts and sample questions")]
    Facts {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Print the case data and derived metrics as JSON")]
    Case,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate configuration and case consistency")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = cli.load_options();
    let config = AppConfig::load(options.clone());
    if let Ok(config) = &config {
        logging::init(config);
    }

    let result = match cli.command {
        Command::Ask { json, topic, question } => {
            commands::ask::run(&question.join(" "), topic, json)
        }
        Command::Chat => match config {
            Ok(config) => commands::chat::run(&config),
            Err(error) => commands::CommandResult::failure(
                "chat",
                "config_validation",
                error.to_string(),
                2,
            ),
        },
        Command::Facts { json } => commands::facts::run(json),
        Command::Case => commands::case::run(),
        Command::Config => {
            commands::CommandResult::output(commands::config::run(&options))
        }
        Command::Doctor { json } => {
            commands::CommandResult::output(commands::doctor::run(json, &options))
        }
    };

    if !result.output.is_empty() {
        println!("{}", result.output);
    }
    ExitCode::from(result.exit_code)
}

fn parse_topic(value: &str) -> Result<Topic, String> {
    value.parse::<Topic>().map_err(|error| error.to_string())
}

fn parse_log_format(value: &str) -> Result<LogFormat, String> {
    value.parse::<LogFormat>().map_err(|error: ConfigError| error.to_string())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use advisor_core::config::LogFormat;
    use advisor_core::Topic;
    use clap::Parser;

    use super::{Cli, Command};

    #[test]
    fn ask_collects_question_words() {
        let cli = Cli::try_parse_from(["advisor", "ask", "what", "are", "the", "costs?"])
            .expect("ask should parse");

        match cli.command {
            Command::Ask { json, topic, question } => {
                assert!(!json);
                assert!(topic.is_none());
                assert_eq!(question.join(" "), "what are the costs?");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn ask_accepts_topic_and_json_flags() {
        let cli = Cli::try_parse_from([
            "advisor",
            "ask",
            "--json",
            "--topic",
            "savings_chart",
            "chart",
        ])
        .expect("flags should parse");

        assert!(matches!(
            cli.command,
            Command::Ask { json: true, topic: Some(Topic::SavingsChart), .. }
        ));
    }

    #[test]
    fn unknown_topic_is_rejected() {
        assert!(Cli::try_parse_from(["advisor", "ask", "--topic", "weather", "hi"]).is_err());
    }

    #[test]
    fn global_flags_feed_config_loading() {
        let cli = Cli::try_parse_from([
            "advisor",
            "doctor",
            "--config",
            "ops/advisor.toml",
            "--log-level",
            "debug",
            "--log-format",
            "json",
        ])
        .expect("global flags should parse after the subcommand");

        let options = cli.load_options();
        assert!(options.require_file);
        assert_eq!(options.config_path, Some(PathBuf::from("ops/advisor.toml")));
        assert_eq!(options.overrides.log_level.as_deref(), Some("debug"));
        assert_eq!(options.overrides.log_format, Some(LogFormat::Json));
    }

    #[test]
    fn config_file_stays_optional_without_flag() {
        let cli = Cli::try_parse_from(["advisor", "facts"]).expect("facts should parse");

        let options = cli.load_options();
        assert!(!options.require_file);
        assert!(options.config_path.is_none());
        assert!(options.overrides.log_level.is_none());
    }

    #[test]
    fn unknown_log_format_flag_is_rejected() {
        assert!(Cli::try_parse_from(["advisor", "--log-format", "xml", "facts"]).is_err());
    }
}

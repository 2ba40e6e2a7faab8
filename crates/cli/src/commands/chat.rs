use advisor_agent::answers::HELP_TEXT;
use advisor_agent::{AdvisorRuntime, Conversation};
use advisor_core::config::AppConfig;
use advisor_core::{CaseAnalysis, QuickFacts};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tracing::info;

use super::CommandResult;
use crate::render;

const SLASH_COMMANDS: &[&str] = &["/facts", "/help", "/history", "/quit"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChatAction {
    Reply(String),
    Quit,
    Ignore,
}

/// State of one interactive session: the runtime and the conversation it appends to.
#[derive(Debug, Default)]
pub struct ChatSession {
    runtime: AdvisorRuntime,
    conversation: Conversation,
    history_limit: usize,
}

impl ChatSession {
    pub fn new(history_limit: usize) -> Self {
        Self { history_limit, ..Self::default() }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn handle_line(&mut self, line: &str) -> ChatAction {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return ChatAction::Ignore;
        }

        if trimmed.starts_with('/') {
            return self.handle_command(trimmed);
        }

        let payload = self.runtime.handle_turn(&mut self.conversation, line);
        ChatAction::Reply(render::payload(&payload))
    }

    fn handle_command(&self, command: &str) -> ChatAction {
        match command {
            "/quit" | "/exit" => ChatAction::Quit,
            "/history" => ChatAction::Reply(render::history(
                self.conversation.recent(self.history_limit),
            )),
            "/facts" => ChatAction::Reply(render::quick_facts(&QuickFacts::from_analysis(
                self.runtime.router().analysis(),
            ))),
            "/help" => ChatAction::Reply(HELP_TEXT.to_string()),
            other => ChatAction::Reply(format!(
                "Unknown command `{other}`. Available: {}",
                SLASH_COMMANDS.join(", ")
            )),
        }
    }
}

/// Completes and hints the slash commands.
struct SlashCommands;

impl Helper for SlashCommands {}

impl Completer for SlashCommands {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') {
            return Ok((0, Vec::new()));
        }

        let candidates = SLASH_COMMANDS
            .iter()
            .filter(|command| command.starts_with(line))
            .map(|command| Pair { display: command.to_string(), replacement: command.to_string() })
            .collect();
        Ok((0, candidates))
    }
}

impl Hinter for SlashCommands {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if !line.starts_with('/') || line.contains(' ') {
            return None;
        }

        SLASH_COMMANDS
            .iter()
            .find(|command| command.starts_with(line) && command.len() > line.len())
            .map(|command| command[line.len()..].to_string())
    }
}

impl Highlighter for SlashCommands {}

impl Validator for SlashCommands {}

pub fn run(config: &AppConfig) -> CommandResult {
    let analysis = CaseAnalysis::default();
    if let Err(error) = analysis.case.validate() {
        return CommandResult::failure("chat", "case_validation", error.to_string(), 2);
    }

    let mut editor = match Editor::<SlashCommands, DefaultHistory>::new() {
        Ok(editor) => editor,
        Err(error) => return CommandResult::failure("chat", "terminal", error.to_string(), 1),
    };
    editor.set_helper(Some(SlashCommands));

    let mut session = ChatSession {
        runtime: AdvisorRuntime::for_case(analysis),
        conversation: Conversation::new(),
        history_limit: config.chat.history_limit,
    };

    info!(event_name = "advisor.chat.started", "chat session started");
    println!("{}", analysis_title(&session));
    println!("Ask a question, or type /help, /facts, /history or /quit.");
    println!();

    loop {
        match editor.readline(&config.chat.prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = editor.add_history_entry(line.as_str());
                }
                match session.handle_line(&line) {
                    ChatAction::Reply(reply) => println!("{reply}\n"),
                    ChatAction::Quit => break,
                    ChatAction::Ignore => {}
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("Ctrl-C detected. Type /quit to exit.");
            }
            Err(ReadlineError::Eof) => break,
            Err(error) => {
                return CommandResult::failure("chat", "terminal", error.to_string(), 1);
            }
        }
    }

    info!(
        event_name = "advisor.chat.finished",
        turns = session.conversation().turns(),
        "chat session finished"
    );
    CommandResult::output("Goodbye!")
}

fn analysis_title(session: &ChatSession) -> String {
    session.runtime.router().analysis().case.title.clone()
}

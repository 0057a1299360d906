use std::{
    borrow::Cow,
    fmt,
    io::{self, BufRead},
};

use dialoguer::{theme::ColorfulTheme, Confirm};
use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;
use thiserror::Error;
use tracing::warn;

use crate::{
    config::{Config, ConfigManager},
    core::session::Session,
    errors::{DashboardError, Result as DashboardResult},
};

use super::{
    commands::{self, Confirmer, LoopControl},
    output::Output,
};

/// Set to run commands from stdin without prompts or confirmations.
pub const SCRIPT_MODE_ENV: &str = "SEMESTER_DASHBOARD_CLI_SCRIPT";

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Dashboard(#[from] DashboardError),
    #[error("Input error: {0}")]
    Readline(#[from] ReadlineError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CliMode {
    Interactive,
    Script,
}

struct DialoguerConfirmer {
    theme: ColorfulTheme,
}

impl Confirmer for DialoguerConfirmer {
    fn confirm(&mut self, prompt: &str) -> DashboardResult<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|err| DashboardError::Validation(format!("confirmation failed: {err}")))
    }
}

/// Scripts have no one to ask.
struct AssumeYes;

impl Confirmer for AssumeYes {
    fn confirm(&mut self, _prompt: &str) -> DashboardResult<bool> {
        Ok(true)
    }
}

struct ShellContext {
    session: Session,
    output: Output,
    confirmer: Box<dyn Confirmer>,
}

impl ShellContext {
    fn prompt(&self) -> String {
        match self.session.selected_semester() {
            Some(semester) => format!("dashboard[{}]> ", semester.name),
            None => "dashboard> ".to_string(),
        }
    }

    fn handle_line(&mut self, line: &str) -> LoopControl {
        let tokens = match parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                self.output.warning(err);
                return LoopControl::Continue;
            }
        };
        let Some((command, rest)) = tokens.split_first() else {
            return LoopControl::Continue;
        };
        let command = command.to_lowercase();
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();

        match commands::dispatch(
            &mut self.session,
            &self.output,
            self.confirmer.as_mut(),
            &command,
            &args,
        ) {
            Ok(control) => control,
            Err(err) => {
                self.output.error(format!("{} ({})", err, err.kind()));
                LoopControl::Continue
            }
        }
    }
}

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_MODE_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let config = load_config();
    let output = Output::new(config.theme);
    let mut session = Session::from_config(&config)?;
    if let Err(err) = session.load() {
        output.warning(format!(
            "Could not load semesters from {}: {err}",
            config.api_base_url
        ));
    }

    let confirmer: Box<dyn Confirmer> = match mode {
        CliMode::Interactive => Box::new(DialoguerConfirmer {
            theme: ColorfulTheme::default(),
        }),
        CliMode::Script => Box::new(AssumeYes),
    };
    let mut context = ShellContext {
        session,
        output,
        confirmer,
    };

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn load_config() -> Config {
    let mut config = match ConfigManager::new().and_then(|manager| manager.load()) {
        Ok(config) => config,
        Err(err) => {
            warn!(error = %err, "falling back to default configuration");
            Config::default()
        }
    };
    config.apply_env_overrides();
    config
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(commands::command_names())));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    loop {
        let prompt = context.prompt();
        match editor.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();
                if context.handle_line(trimmed) == LoopControl::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                context.output.info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }
        if context.handle_line(&line) == LoopControl::Exit {
            break;
        }
    }
    Ok(())
}

struct CommandHelper {
    commands: Vec<String>,
}

impl CommandHelper {
    fn new(names: Vec<&'static str>) -> Self {
        let mut commands: Vec<String> = names
            .into_iter()
            .map(|name| name.to_ascii_lowercase())
            .collect();
        commands.sort();
        commands.dedup();
        Self { commands }
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let trimmed = prefix.trim_start();
        if trimmed.contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }

        let start = prefix.len() - trimmed.len();
        let needle = trimmed.to_ascii_lowercase();
        let candidates = self
            .commands
            .iter()
            .filter(|name| name.starts_with(&needle))
            .map(|name| Pair {
                display: name.clone(),
                replacement: name.clone(),
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for CommandHelper {
    fn validate(&self, _ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(ValidationResult::Valid(None))
    }
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

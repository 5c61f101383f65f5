//! Non-interactive command front end.
//!
//! With arguments, runs a single command and exits. Without arguments, reads
//! one command per line from stdin, which is how scripts drive the tool.

mod handlers;
pub mod output;

use std::{
    env,
    io::{self, BufRead},
};

use fintrack_config::ConfigManager;
use shell_words::split;

use crate::{AppError, FinanceApp};

pub use handlers::{dispatch, usage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

pub fn run_cli() -> Result<(), AppError> {
    let args: Vec<String> = env::args().skip(1).collect();
    let manager = ConfigManager::with_base_dir(ConfigManager::default_base_dir())?;
    let app = FinanceApp::open(&manager)?;
    output::set_color_enabled(app.config().ui_color_enabled);

    if args.is_empty() {
        let stdin = io::stdin();
        return run_script(&app, stdin.lock());
    }

    let rest: Vec<&str> = args[1..].iter().map(String::as_str).collect();
    dispatch(&app, &args[0], &rest).map(|_| ())
}

/// Runs every line of `input` as a command. Failing commands are reported
/// and do not stop the script.
pub fn run_script<R: BufRead>(app: &FinanceApp, input: R) -> Result<(), AppError> {
    for line in input.lines() {
        let line = line?;
        match handle_line(app, &line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => output::error(err),
        }
    }
    Ok(())
}

fn handle_line(app: &FinanceApp, line: &str) -> Result<LoopControl, AppError> {
    let tokens = match parse_command_line(line) {
        Ok(tokens) => tokens,
        Err(message) => {
            output::warning(message);
            return Ok(LoopControl::Continue);
        }
    };
    let Some((command, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    if command.starts_with('#') {
        return Ok(LoopControl::Continue);
    }
    let rest: Vec<&str> = rest.iter().map(String::as_str).collect();
    dispatch(app, command, &rest)
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, String> {
    split(input).map_err(|err| err.to_string())
}

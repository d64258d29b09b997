//! Operator input
//!
//! The credential prompt and the confirmation gate are the only points where
//! the run blocks on the terminal. Both go through [`Prompter`] so the flow
//! can be driven from tests.

use dialoguer::{Input, Password};
use std::collections::VecDeque;
use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::Mutex;

/// Source of interactive answers
pub trait Prompter {
    /// Read one line of visible input. Empty input is allowed.
    fn input(&self, prompt: &str) -> io::Result<String>;

    /// Read a secret without echoing it to the terminal
    fn password(&self, prompt: &str) -> io::Result<String>;
}

/// Prompter backed by the controlling terminal.
///
/// When stdin is not a terminal (piped answers), lines are read from it
/// directly; dialoguer refuses to prompt in that case.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn input(&self, prompt: &str) -> io::Result<String> {
        if !io::stdin().is_terminal() {
            return read_answer(prompt, &mut io::stdin().lock(), &mut io::stderr());
        }
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(|dialoguer::Error::IO(e)| e)
    }

    fn password(&self, prompt: &str) -> io::Result<String> {
        if !io::stdin().is_terminal() {
            return read_answer(prompt, &mut io::stdin().lock(), &mut io::stderr());
        }
        Password::new()
            .with_prompt(prompt)
            .interact()
            .map_err(|dialoguer::Error::IO(e)| e)
    }
}

/// Show `prompt` and read one line from a non-interactive source.
///
/// The trailing newline is stripped. End of input is `UnexpectedEof`.
fn read_answer(
    prompt: &str,
    input: &mut dyn BufRead,
    echo: &mut dyn Write,
) -> io::Result<String> {
    write!(echo, "{}: ", prompt)?;
    echo.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no more input"));
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Prompter that replays canned answers, in order, for both kinds of prompt.
///
/// Running out of answers yields `UnexpectedEof`, like a closed stdin.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<String>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Prompts shown so far
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().map(|a| a.clone()).unwrap_or_default()
    }

    fn next(&self, prompt: &str) -> io::Result<String> {
        if let Ok(mut asked) = self.asked.lock() {
            asked.push(prompt.to_string());
        }
        self.answers
            .lock()
            .ok()
            .and_then(|mut a| a.pop_front())
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more input"))
    }
}

impl Prompter for ScriptedPrompter {
    fn input(&self, prompt: &str) -> io::Result<String> {
        self.next(prompt)
    }

    fn password(&self, prompt: &str) -> io::Result<String> {
        self.next(prompt)
    }
}

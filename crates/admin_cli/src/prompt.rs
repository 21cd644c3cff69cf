//! Interactive input for `account create`.
//!
//! Keystrokes are read in raw mode and nothing is echoed. The key handling
//! lives in [`HiddenLine`] so it can be exercised without a terminal.

use std::{
    error::Error,
    io::{self, Write},
};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal,
};

type PromptResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

/// Outcome of feeding one key to a [`HiddenLine`].
#[derive(Debug, PartialEq, Eq)]
enum Step {
    Pending,
    Submitted,
    Aborted,
}

/// A line typed without echo.
#[derive(Debug, Default)]
struct HiddenLine {
    text: String,
}

impl HiddenLine {
    fn feed(&mut self, key: KeyEvent) -> Step {
        if key.kind == KeyEventKind::Release {
            return Step::Pending;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter => Step::Submitted,
            KeyCode::Esc => Step::Aborted,
            KeyCode::Char('c' | 'd') if ctrl => Step::Aborted,
            KeyCode::Char('u') if ctrl => {
                self.text.clear();
                Step::Pending
            }
            KeyCode::Backspace => {
                self.text.pop();
                Step::Pending
            }
            KeyCode::Char(ch) if !ctrl => {
                self.text.push(ch);
                Step::Pending
            }
            _ => Step::Pending,
        }
    }
}

/// Restores cooked mode even when reading fails half way.
struct Raw;

impl Raw {
    fn on() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for Raw {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn read_hidden(label: &str) -> PromptResult<String> {
    let mut err = io::stderr();
    write!(err, "{label}")?;
    err.flush()?;

    let mut line = HiddenLine::default();
    let step = {
        let _raw = Raw::on()?;
        loop {
            if let Event::Key(key) = event::read()? {
                match line.feed(key) {
                    Step::Pending => continue,
                    done => break done,
                }
            }
        }
    };
    writeln!(err)?;

    match step {
        Step::Aborted => Err("aborted".into()),
        _ => Ok(line.text),
    }
}

/// Check the arguments of a new account before asking for anything.
fn check_new_account(handle: &str, coins: i64) -> Result<String, String> {
    let handle = handle.trim();
    if handle.is_empty() {
        return Err("handle must not be empty".to_string());
    }
    if handle.chars().any(char::is_whitespace) {
        return Err(format!("handle `{handle}` must not contain whitespace"));
    }
    if coins < 0 {
        return Err(format!("opening balance must be >= 0, got {coins}"));
    }
    Ok(handle.to_string())
}

/// Validate the account arguments, then ask for its password and one
/// confirmation. A mismatch ends the command; rerun it to try again.
///
/// Returns the trimmed handle and the password.
pub fn new_account_password(handle: &str, coins: i64) -> PromptResult<(String, String)> {
    let handle = check_new_account(handle, coins)?;
    eprintln!("New account `{handle}` opening with {coins} coins.");

    let password = read_hidden("Password for the account: ")?;
    if password.is_empty() {
        return Err("password must not be empty".into());
    }
    if read_hidden("Same password again: ")? != password {
        return Err("passwords differ, nothing was created".into());
    }

    Ok((handle, password))
}

//! Blocking interaction with the user, shaped like a modal dialog: ask,
//! wait, get an answer. The traits let the reminder loop and the CLI be
//! driven by a real console, or by deterministic doubles in tests.

use std::io::{BufRead, IsTerminal, Write};

use anyhow::Result;

/// Questions that suspend the caller until the user answers. Nothing else
/// runs while a question is open, prompts included.
#[cfg_attr(test, mockall::automock)]
pub trait UserPrompt: Send {
    /// Yes/no question. Anything that isn't an explicit yes counts as no.
    fn ask(&mut self, question: &str) -> Result<bool>;

    /// Asks for an amount, offering a default that an empty answer accepts.
    /// Returns None for non-numeric or non-positive input.
    fn ask_number(&mut self, question: &str, default: u32) -> Result<Option<u32>>;
}

/// Tells whether the user is around to see a prompt at all.
#[cfg_attr(test, mockall::automock)]
pub trait FocusProbe: Send {
    fn is_focused(&mut self) -> Result<bool>;
}

pub struct ConsolePrompt;

impl UserPrompt for ConsolePrompt {
    fn ask(&mut self, question: &str) -> Result<bool> {
        let mut stdout = std::io::stdout().lock();
        write!(stdout, "{question} [y/N] ")?;
        stdout.flush()?;

        let mut answer = String::new();
        std::io::stdin().lock().read_line(&mut answer)?;
        Ok(matches!(
            answer.trim().to_lowercase().as_str(),
            "y" | "yes"
        ))
    }

    fn ask_number(&mut self, question: &str, default: u32) -> Result<Option<u32>> {
        let mut stdout = std::io::stdout().lock();
        write!(stdout, "{question} [{default}] ")?;
        stdout.flush()?;

        let mut answer = String::new();
        std::io::stdin().lock().read_line(&mut answer)?;
        let answer = answer.trim();
        if answer.is_empty() {
            return Ok(Some(default));
        }
        Ok(answer.parse::<u32>().ok().filter(|v| *v > 0))
    }
}

/// A reminder only makes sense while someone can actually answer it, which
/// for a console program means being attached to an interactive terminal.
/// A daemonized process with detached stdio reports unfocused and stays
/// quiet.
pub struct TerminalFocusProbe;

impl FocusProbe for TerminalFocusProbe {
    fn is_focused(&mut self) -> Result<bool> {
        Ok(std::io::stdin().is_terminal() && std::io::stdout().is_terminal())
    }
}

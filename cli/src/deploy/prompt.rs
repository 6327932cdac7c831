//! Operator interaction seam.
use std::io::{self, BufRead, Write};

use crate::style::Line;

/// Something that can put a question to the operator and read the reply.
#[cfg_attr(test, mockall::automock)]
pub trait Prompter {
    /// Show `question` and read one line of input.
    ///
    /// Returns `Ok(None)` when input is closed.
    ///
    /// # Errors
    ///
    /// Returns an error if writing the question or reading the reply fails.
    fn ask(&mut self, question: &[Line]) -> io::Result<Option<String>>;
}

/// A reply to a confirmation question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    /// Approve this action.
    Yes,
    /// Deny this action.
    No,
    /// Approve this and every later action.
    YesToAll,
    /// Stop the whole run.
    NoToAll,
}

impl Answer {
    /// Parse a reply. Empty input approves; anything unrecognised is `None`
    /// and the question is asked again.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        match input.chars().next() {
            None | Some('y') => Some(Self::Yes),
            Some('n') => Some(Self::No),
            Some('Y') => Some(Self::YesToAll),
            Some('N') => Some(Self::NoToAll),
            Some(_) => None,
        }
    }
}

/// Prompter over a line-oriented reader and a writer, normally the terminal.
#[derive(Debug)]
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
    color: bool,
}

impl TerminalPrompter<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on stdout and read from stdin.
    #[must_use]
    pub fn stdio(color: bool) -> Self {
        Self::new(io::stdin().lock(), io::stdout(), color)
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    /// Create a prompter over arbitrary streams.
    pub const fn new(input: R, output: W, color: bool) -> Self {
        Self {
            input,
            output,
            color,
        }
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn ask(&mut self, question: &[Line]) -> io::Result<Option<String>> {
        let rendered: Vec<String> = question.iter().map(|l| l.render(self.color)).collect();
        write!(self.output, "{}", rendered.join("\n"))?;
        self.output.flush()?;

        let mut reply = String::new();
        if self.input.read_line(&mut reply)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(reply.trim_end_matches(['\r', '\n']).to_string()))
    }
}

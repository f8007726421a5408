//! Review directives and where they come from

use crate::core::error::{Result, ToolError};
use dialoguer::Input;
use std::io::{self, BufRead, IsTerminal, Write};

/// Question asked at every review step
pub const REVIEW_PROMPT: &str = "Would you like to [a]ccept, [e]dit or [r]egenerate the output";

/// Shown once the output file has been written
pub const ACKNOWLEDGE_PROMPT: &str = "Press Enter to continue...";

/// The user's answer at the review prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Accept,
    Edit,
    Regenerate,
    /// Anything else, kept verbatim for the log
    Invalid(String),
}

impl Directive {
    /// Parse a single-character answer, ignoring case and surrounding whitespace
    pub fn parse(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "a" => Directive::Accept,
            "e" => Directive::Edit,
            "r" => Directive::Regenerate,
            _ => Directive::Invalid(input.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

/// Supplies review directives, one per prompt
pub trait DirectiveSource {
    /// Ask for the next directive
    fn next_directive(&mut self) -> Result<Directive>;

    /// Wait for a final acknowledgement before the program exits
    fn acknowledge(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Reads directives from the console.
///
/// Uses a dialoguer prompt on a terminal and plain line reads when stdin is
/// piped, so the tool can be scripted.
#[derive(Debug)]
pub struct ConsoleDirectives {
    interactive: bool,
}

impl ConsoleDirectives {
    pub fn new() -> Self {
        Self {
            interactive: io::stdin().is_terminal() && io::stderr().is_terminal(),
        }
    }

    fn read_line(&self, prompt: &str) -> Result<Option<String>> {
        if self.interactive {
            return Input::<String>::new()
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()
                .map(Some)
                .map_err(|e| ToolError::Prompt(e.to_string()));
        }

        print!("{}: ", prompt);
        io::stdout().flush()?;

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        Ok((read > 0).then_some(line))
    }
}

impl Default for ConsoleDirectives {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectiveSource for ConsoleDirectives {
    fn next_directive(&mut self) -> Result<Directive> {
        match self.read_line(REVIEW_PROMPT)? {
            Some(line) => Ok(Directive::parse(&line)),
            None => Err(ToolError::Prompt(
                "input closed before the output was accepted".to_string(),
            )),
        }
    }

    fn acknowledge(&mut self) -> Result<()> {
        // End of input is as good as Enter here
        self.read_line(ACKNOWLEDGE_PROMPT).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_directives() {
        assert_eq!(Directive::parse("a"), Directive::Accept);
        assert_eq!(Directive::parse("A\n"), Directive::Accept);
        assert_eq!(Directive::parse(" e "), Directive::Edit);
        assert_eq!(Directive::parse("E"), Directive::Edit);
        assert_eq!(Directive::parse("r\r\n"), Directive::Regenerate);
        assert_eq!(Directive::parse("R"), Directive::Regenerate);
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(Directive::parse("x\n"), Directive::Invalid("x".to_string()));
        assert_eq!(Directive::parse(""), Directive::Invalid(String::new()));
        assert_eq!(
            Directive::parse("accept"),
            Directive::Invalid("accept".to_string())
        );
    }
}

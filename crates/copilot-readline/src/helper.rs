//! Rustyline helper: slash-command completion and usage hints.

use std::borrow::Cow::{self, Borrowed, Owned};

use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hint, Hinter};
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use crate::input::{COMMANDS, SlashCommand};

/// Grey text after the cursor. Accepting it inserts only the command name,
/// never the argument placeholders.
#[derive(Debug, PartialEq, Eq)]
pub struct UsageHint {
    display: String,
    /// Length of the prefix of `display` that is real input.
    accept: usize,
}

impl Hint for UsageHint {
    fn display(&self) -> &str {
        &self.display
    }

    fn completion(&self) -> Option<&str> {
        (self.accept > 0).then(|| &self.display[..self.accept])
    }
}

/// Hint for the text left of the cursor.
///
/// `/as` hints `k <file> <question>`; `/ask ` hints `<file> <question>`;
/// anything past the first argument gets no hint.
pub fn usage_hint(line: &str) -> Option<UsageHint> {
    if !line.starts_with('/') {
        return None;
    }
    match line.split_once(' ') {
        None => {
            let cmd = COMMANDS
                .iter()
                .find(|cmd| cmd.name.starts_with(line) && cmd.name.len() > line.len())?;
            let rest = &cmd.name[line.len()..];
            let display = if cmd.args.is_empty() {
                rest.to_string()
            } else {
                format!("{} {}", rest, cmd.args)
            };
            Some(UsageHint {
                display,
                accept: rest.len(),
            })
        }
        Some((name, "")) => {
            let cmd = SlashCommand::find(name).filter(|cmd| !cmd.args.is_empty())?;
            Some(UsageHint {
                display: cmd.args.to_string(),
                accept: 0,
            })
        }
        Some(_) => None,
    }
}

#[derive(Clone, Default)]
pub struct CliHelper;

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    /// Candidates list with their usage; the replacement is the bare name.
    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') || line.contains(' ') {
            return Ok((0, vec![]));
        }

        let candidates = COMMANDS
            .iter()
            .filter(|cmd| cmd.name.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.usage(),
                replacement: if cmd.args.is_empty() {
                    cmd.name.to_string()
                } else {
                    format!("{} ", cmd.name)
                },
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if !line.starts_with('/') {
            return Borrowed(line);
        }
        // Only the command word is coloured, unknown ones in red
        let (name, rest) = line.split_at(line.find(' ').unwrap_or(line.len()));
        let name = if SlashCommand::find(name).is_some() {
            name.bright_cyan()
        } else {
            name.red()
        };
        Owned(format!("{}{}", name, rest))
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = UsageHint;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<UsageHint> {
        usage_hint(&line[..pos])
    }
}

impl Validator for CliHelper {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_name_hints_rest_and_arguments() {
        let hint = usage_hint("/as").unwrap();
        assert_eq!(hint.display(), "k <file> <question>");
        assert_eq!(hint.completion(), Some("k"));
    }

    #[test]
    fn test_full_name_with_space_hints_arguments_only() {
        let hint = usage_hint("/upload ").unwrap();
        assert_eq!(hint.display(), "<path>...");
        assert_eq!(hint.completion(), None);
    }

    #[test]
    fn test_no_hint_once_arguments_start() {
        assert!(usage_hint("/ask main.py").is_none());
        assert!(usage_hint("/files ").is_none());
        assert!(usage_hint("hello").is_none());
        assert!(usage_hint("/zzz").is_none());
    }

    #[test]
    fn test_argument_free_command_hints_name_only() {
        let hint = usage_hint("/cl").unwrap();
        assert_eq!(hint.display(), "ear");
        assert_eq!(hint.completion(), Some("ear"));
    }
}

//! Parsing of REPL lines into actions.

use std::path::PathBuf;

use copilot_application::Command;

/// A slash command as offered by completion, hints and `/help`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlashCommand {
    pub name: &'static str,
    /// Argument placeholders, empty when the command takes none.
    pub args: &'static str,
    pub about: &'static str,
}

impl SlashCommand {
    const fn new(name: &'static str, args: &'static str, about: &'static str) -> Self {
        Self { name, args, about }
    }

    /// `name` followed by the placeholders.
    pub fn usage(&self) -> String {
        if self.args.is_empty() {
            self.name.to_string()
        } else {
            format!("{} {}", self.name, self.args)
        }
    }

    pub fn find(name: &str) -> Option<&'static SlashCommand> {
        COMMANDS.iter().find(|cmd| cmd.name == name)
    }
}

pub const COMMANDS: &[SlashCommand] = &[
    SlashCommand::new("/files", "", "list files indexed by the backend"),
    SlashCommand::new("/ask", "<file> <question>", "ask about an indexed file"),
    SlashCommand::new("/upload", "<path>...", "upload files and run the upload task"),
    SlashCommand::new("/uploads", "", "list files uploaded this session"),
    SlashCommand::new("/askup", "<name> <question>", "ask about an uploaded file"),
    SlashCommand::new("/history", "", "conversations started on this machine"),
    SlashCommand::new("/conversations", "", "conversations known to the backend"),
    SlashCommand::new("/resume", "<id>", "continue a conversation"),
    SlashCommand::new("/model", "<name>", "select the model"),
    SlashCommand::new("/task", "[name]", "select the task, or reset to defaults"),
    SlashCommand::new("/host", "<host>", "switch backend host and save it to the config"),
    SlashCommand::new("/clear", "", "clear the chat and local history"),
    SlashCommand::new("/help", "", "show this list"),
];

/// What a line typed at the prompt asks for.
#[derive(Debug, PartialEq)]
pub enum Input {
    /// Forwarded to the controller as is.
    Command(Command),
    /// Files to read from disk before uploading.
    Upload(Vec<PathBuf>),
    ListUploads,
    /// Switch the backend host.
    Host(String),
    Help,
    Quit,
    /// Malformed slash command, with a usage hint.
    Usage(String),
    Unknown(String),
}

pub fn parse(line: &str) -> Input {
    let line = line.trim();
    if line == "quit" || line == "exit" {
        return Input::Quit;
    }
    if !line.starts_with('/') {
        return Input::Command(Command::SendMessage(line.to_string()));
    }

    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    match name {
        "/files" => Input::Command(Command::RefreshFiles),
        "/conversations" => Input::Command(Command::RefreshConversations),
        "/history" => Input::Command(Command::ShowHistory),
        "/clear" => Input::Command(Command::ClearChat),
        "/uploads" => Input::ListUploads,
        "/help" => Input::Help,
        "/ask" => match split_target(rest) {
            Some((file, question)) => Input::Command(Command::AskAboutFile { file, question }),
            None => usage("/ask"),
        },
        "/askup" => match split_target(rest) {
            Some((name, question)) => Input::Command(Command::AskAboutUpload { name, question }),
            None => usage("/askup"),
        },
        "/upload" if !rest.is_empty() => {
            Input::Upload(rest.split_whitespace().map(PathBuf::from).collect())
        }
        "/upload" => usage("/upload"),
        "/resume" if !rest.is_empty() => {
            Input::Command(Command::SelectConversation(rest.to_string()))
        }
        "/resume" => usage("/resume"),
        "/model" if !rest.is_empty() => Input::Command(Command::SelectModel(rest.to_string())),
        "/model" => usage("/model"),
        "/host" if !rest.is_empty() => Input::Host(rest.to_string()),
        "/host" => usage("/host"),
        "/task" if rest.is_empty() || rest == "default" => {
            Input::Command(Command::SelectTask(None))
        }
        "/task" => Input::Command(Command::SelectTask(Some(rest.to_string()))),
        other => Input::Unknown(other.to_string()),
    }
}

fn usage(name: &str) -> Input {
    Input::Usage(SlashCommand::find(name).map(|cmd| cmd.usage()).unwrap_or_default())
}

/// Splits `<target> <question...>`; both parts must be present.
fn split_target(rest: &str) -> Option<(String, String)> {
    let (target, question) = rest.split_once(char::is_whitespace)?;
    let question = question.trim();
    if target.is_empty() || question.is_empty() {
        return None;
    }
    Some((target.to_string(), question.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_a_chat_message() {
        assert_eq!(
            parse("  how do I sort a vec?  "),
            Input::Command(Command::SendMessage("how do I sort a vec?".to_string()))
        );
    }

    #[test]
    fn test_ask_splits_file_and_question() {
        assert_eq!(
            parse("/ask src/main.py what does this do?"),
            Input::Command(Command::AskAboutFile {
                file: "src/main.py".to_string(),
                question: "what does this do?".to_string(),
            })
        );
        assert_eq!(
            parse("/ask main.py"),
            Input::Usage("/ask <file> <question>".to_string())
        );
    }

    #[test]
    fn test_upload_collects_paths() {
        assert_eq!(
            parse("/upload a.rs  b.rs"),
            Input::Upload(vec![PathBuf::from("a.rs"), PathBuf::from("b.rs")])
        );
        assert_eq!(parse("/upload"), Input::Usage("/upload <path>...".to_string()));
    }

    #[test]
    fn test_task_without_argument_resets() {
        assert_eq!(parse("/task"), Input::Command(Command::SelectTask(None)));
        assert_eq!(
            parse("/task review"),
            Input::Command(Command::SelectTask(Some("review".to_string())))
        );
    }

    #[test]
    fn test_host_takes_a_name() {
        assert_eq!(
            parse("/host copilot.example.com"),
            Input::Host("copilot.example.com".to_string())
        );
        assert_eq!(parse("/host"), Input::Usage("/host <host>".to_string()));
    }

    #[test]
    fn test_every_command_parses() {
        for cmd in COMMANDS {
            assert!(
                !matches!(parse(cmd.name), Input::Unknown(_)),
                "{} is listed but not parsed",
                cmd.name
            );
        }
    }

    #[test]
    fn test_quit_and_unknown() {
        assert_eq!(parse("quit"), Input::Quit);
        assert_eq!(parse("exit"), Input::Quit);
        assert_eq!(parse("/nope"), Input::Unknown("/nope".to_string()));
    }
}

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use copilot_application::controller::Selection;
use copilot_application::{
    Command, CommandOutcome, InteractionController, Listing, build_controller,
};
use copilot_core::conversation::{Message, Sender, UploadedFile};
use copilot_infrastructure::{ConfigService, CopilotPaths, StorageAdapter, default_storage};
use copilot_interaction::HttpBackendGateway;

mod helper;
mod input;

use helper::CliHelper;
use input::{COMMANDS, Input};

const LOG_ENV: &str = "COPILOT_LOG";

#[derive(Parser)]
#[command(name = "copilot")]
#[command(about = "Coding Copilot - terminal chat client", long_about = None)]
struct Cli {
    /// Host used to pick the backend; `localhost` selects the local server
    #[arg(long)]
    host: Option<String>,

    /// Read settings from this file instead of the default config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep config, storage and logs under this directory
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Keep conversation history in memory only
    #[arg(long)]
    ephemeral: bool,
}

/// Something for the output task to print.
enum Output {
    Outcome(CommandOutcome),
    Notice(String),
    Failure(String),
}

/// Logs go to a daily file so they never interleave with the prompt.
fn init_logging(logs_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(logs_dir)?;
    let appender = tracing_appender::rolling::daily(logs_dir, "copilot.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install logger: {}", e))?;

    Ok(guard)
}

fn print_help() {
    let row = |usage: &str, about: &str| {
        println!("  {:<26} {}", usage.bright_cyan(), about.bright_black());
    };
    row("<text>", "send a chat message");
    for cmd in COMMANDS {
        row(&cmd.usage(), cmd.about);
    }
    row("quit", "exit");
}

fn print_message(message: &Message) {
    match message.sender {
        Sender::User => println!("{}", format!("[{}] > {}", message.time, message.content).green()),
        Sender::Bot => {
            println!("{}", format!("[{}] copilot", message.time).bright_magenta());
            for line in message.content.lines() {
                println!("{}", line.bright_blue());
            }
        }
    }
}

fn print_listing(listing: &Listing, empty: &str, unavailable: &str) {
    match listing {
        Listing::Items(items) => {
            for item in items {
                println!("  {}", format!("- {}", item).yellow());
            }
        }
        Listing::Empty => println!("{}", empty.bright_black()),
        Listing::Unavailable => eprintln!("{}", unavailable.red()),
    }
}

fn describe_selection(selection: &Selection) -> String {
    format!(
        "Model: {}, Task: {}",
        selection.model,
        selection.task.as_deref().unwrap_or("default")
    )
}

fn print_outcome(outcome: CommandOutcome) {
    match outcome {
        CommandOutcome::Appended(messages) => {
            // The prompt already echoed the user's line
            for message in messages.iter().filter(|m| !m.is_from_user()) {
                print_message(message);
            }
            println!();
        }
        CommandOutcome::Busy(control) => {
            println!(
                "{}",
                format!("Still waiting on the previous request ({:?})", control).yellow()
            );
        }
        CommandOutcome::Ignored => {}
        CommandOutcome::UnknownUpload(name) => {
            println!(
                "{}",
                format!("No uploaded file named {}. Try /uploads.", name).yellow()
            );
        }
        CommandOutcome::Files(listing) => {
            print_listing(&listing, "No files uploaded", "Could not load files")
        }
        CommandOutcome::Conversations(listing) => {
            print_listing(&listing, "No conversations", "Could not load history")
        }
        CommandOutcome::History(ids) => {
            print_listing(&Listing::from_items(ids), "No conversations", "")
        }
        CommandOutcome::Uploaded(reports) => {
            for report in reports {
                if report.is_success() {
                    println!("{}", report.summary().green());
                } else {
                    eprintln!("{}", report.summary().red());
                }
            }
        }
        CommandOutcome::ConversationSelected(id) => {
            println!("{}", format!("Resumed conversation {}", id).bright_green());
        }
        CommandOutcome::Cleared => println!("{}", "Chat cleared.".bright_green()),
        CommandOutcome::SelectionChanged(selection) => {
            println!("{}", describe_selection(&selection).bright_green());
        }
    }
}

/// Reads the files, reporting the ones that cannot be read, and uploads the rest.
async fn upload_paths(
    controller: &InteractionController,
    paths: Vec<PathBuf>,
    tx: &mpsc::Sender<Output>,
) {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        match UploadedFile::from_path(&path).await {
            Ok(file) => files.push(file),
            Err(e) => {
                let _ = tx
                    .send(Output::Failure(format!("Cannot read {}: {}", path.display(), e)))
                    .await;
            }
        }
    }
    if files.is_empty() {
        return;
    }
    let _ = tx
        .send(Output::Notice(format!("Uploading {} file(s)...", files.len())))
        .await;
    let outcome = controller
        .dispatch(Command::UploadFiles(files))
        .await;
    let _ = tx.send(Output::Outcome(outcome)).await;
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ===== Configuration =====
    let paths = CopilotPaths::new(cli.data_dir.as_deref());
    let _log_guard = init_logging(&paths.logs_dir()?)?;

    let config_service = match &cli.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new(&paths)?,
    };
    let mut config = config_service.load()?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    tracing::info!(
        "Starting copilot against {} (config: {})",
        config.base_url(),
        config_service.path().display()
    );

    // ===== Backend Initialization =====
    let gateway = Arc::new(HttpBackendGateway::new(config.clone())?);
    let storage = if cli.ephemeral {
        StorageAdapter::in_memory()
    } else {
        default_storage(&paths)?
    };
    let controller = build_controller(storage, gateway.clone(), config.clone());

    let (output_tx, mut output_rx) = mpsc::channel::<Output>(32);

    let output_handler = tokio::spawn(async move {
        while let Some(output) = output_rx.recv().await {
            match output {
                Output::Outcome(outcome) => print_outcome(outcome),
                Output::Notice(text) => println!("{}", text.bright_black()),
                Output::Failure(text) => eprintln!("{}", text.red()),
            }
        }
    });

    // ===== REPL Setup =====
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper));

    println!("{}", "=== Coding Copilot ===".bright_magenta().bold());
    println!(
        "{}",
        format!(
            "Backend: {}  {}",
            config.base_url(),
            describe_selection(&controller.selection().await)
        )
        .bright_black()
    );
    println!(
        "{}",
        "Type a message to chat, '/help' for commands, or 'quit' to exit.".bright_black()
    );
    println!();
    for message in controller.messages().await {
        print_message(&message);
    }
    println!();

    // ===== Main REPL Loop =====
    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                let input = input::parse(trimmed);
                let tx = output_tx.clone();
                let controller = controller.clone();

                match input {
                    Input::Quit => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    Input::Help => print_help(),
                    Input::Usage(usage) => {
                        println!("{}", format!("Usage: {}", usage).yellow());
                    }
                    Input::Unknown(name) => {
                        println!(
                            "{}",
                            format!("Unknown command {}. Try /help.", name).bright_black()
                        );
                    }
                    Input::Host(host) => {
                        gateway.set_host(host.as_str()).await;
                        config.host = host;
                        println!(
                            "{}",
                            format!("Backend: {}", gateway.base_url().await).bright_green()
                        );
                        if let Err(e) = config_service.save(&config) {
                            tracing::error!("Failed to save config: {}", e);
                            eprintln!("{}", format!("Could not save config: {}", e).red());
                        }
                    }
                    Input::ListUploads => {
                        let names = controller.uploaded_files().await;
                        print_listing(&Listing::from_items(names), "No files uploaded", "");
                    }
                    Input::Upload(paths) => {
                        tokio::spawn(async move {
                            upload_paths(&controller, paths, &tx).await;
                        });
                    }
                    Input::Command(command) => {
                        tokio::spawn(async move {
                            let outcome = controller.dispatch(command).await;
                            let _ = tx.send(Output::Outcome(outcome)).await;
                        });
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    drop(output_tx);
    let _ = output_handler.await;

    Ok(())
}

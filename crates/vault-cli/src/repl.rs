//! Interactive REPL (Read-Eval-Print Loop) mode.
//!
//! Each line is parsed with the same clap definitions as the command line,
//! so `list -s approved` in the REPL means what `vault list -s approved` does.

use crate::cli::{Cli, Command};
use crate::commands;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use vault_sdk::VaultClient;

/// Run the interactive REPL.
pub async fn run_repl(client: &VaultClient, config: &Config, formatter: &Formatter) -> Result<()> {
    println!(
        "{}",
        formatter.info("Evidence Vault REPL - Type 'help' for commands, 'exit' to quit")
    );
    println!();

    let editor_config = rustyline::Config::builder()
        .max_history_size(config.settings.history_size)?
        .auto_add_history(false)
        .build();
    let mut editor = DefaultEditor::with_config(editor_config)?;

    // Load history
    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    loop {
        match editor.readline("vault> ") {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_repl_command(line) {
                    Ok(ReplCommand::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(ReplCommand::Help) => {
                        print_help(formatter);
                    }
                    Ok(ReplCommand::Usage(text)) => {
                        println!("{}", text);
                    }
                    Ok(ReplCommand::Command(cmd)) => {
                        if let Err(e) = commands::dispatch(cmd, client, config, formatter).await {
                            eprintln!("{}", formatter.error(&e.to_string()));
                        }
                    }
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    // Save history
    editor.save_history(&history_path).ok();

    Ok(())
}

/// REPL command type.
#[derive(Debug)]
enum ReplCommand {
    Exit,
    Help,
    /// Clap help or version text for a single command
    Usage(String),
    Command(Command),
}

/// Parse a REPL command line.
fn parse_repl_command(line: &str) -> Result<ReplCommand> {
    let words = split_line(line)?;

    let Some(first) = words.first() else {
        return Err(CliError::InvalidInput("Empty command".to_string()));
    };

    match first.as_str() {
        "exit" | "quit" | "q" => return Ok(ReplCommand::Exit),
        "help" | "?" if words.len() == 1 => return Ok(ReplCommand::Help),
        _ => {}
    }

    let argv = std::iter::once("vault".to_string()).chain(words);
    match Cli::try_parse_from(argv) {
        Ok(Cli {
            command: Some(cmd), ..
        }) => Ok(ReplCommand::Command(cmd)),
        Ok(_) => Ok(ReplCommand::Help),
        Err(e) => match e.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                Ok(ReplCommand::Usage(e.render().to_string()))
            }
            _ => Err(CliError::InvalidInput(e.render().to_string().trim_end().to_string())),
        },
    }
}

/// Split a line into words, honouring single and double quotes.
///
/// A backslash escapes the next character outside single quotes.
pub fn split_line(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some('\''), c) => current.push(c),
            (_, '\\') => {
                let escaped = chars
                    .next()
                    .ok_or_else(|| CliError::InvalidInput("Trailing backslash".to_string()))?;
                current.push(escaped);
                in_word = true;
            }
            (Some(_), c) => current.push(c),
            (None, '"') | (None, '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(CliError::InvalidInput("Unterminated quote".to_string()));
    }
    if in_word {
        words.push(current);
    }

    Ok(words)
}

fn get_history_path() -> Result<PathBuf> {
    let app_dir = Config::app_dir()?;
    std::fs::create_dir_all(&app_dir)?;
    Ok(app_dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  add <title> --file <path> -C <category> [-s status] [-d text] [-t tag]...");
    println!("                                 - Register a file as new evidence");
    println!("  list [-q text] [-s status] [-C category] [--sort created-at|status] [--asc]");
    println!("       [-p page] [--page-size n] [--history]");
    println!("                                 - List evidence");
    println!("  show <id> [--history]          - Show one version and its tags");
    println!("  edit <id> [--title t] [-s status] [-t tag]... [--clear-tags] [--file path]");
    println!("                                 - Save a new version");
    println!("  delete <id> [-y]               - Delete one version");
    println!("  undo                           - Restore the last deleted version");
    println!("  audit [-l limit]               - Show the audit log");
    println!("  export <file.zip> [-s status] [-C category]");
    println!("                                 - Build an export package");
    println!("  categories                     - List categories in use");
    println!("  theme                          - Show the theme preference");
    println!("  <command> --help               - Detailed help for a command");
    println!("  help, ?                        - Show this help");
    println!("  exit, quit, q                  - Exit REPL");
    println!();
}

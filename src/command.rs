//! Line commands accepted by the session shell
//!
//! ```text
//! add <title> [| <description>]
//! edit <id> [title=<text>] [description=<text>] [completed=<true|false>]
//! toggle <id>
//! delete <id>
//! list [keyword]
//! ok
//! help
//! quit
//! ```
//!
//! Values containing spaces can be double-quoted: `edit #1 title="Buy oat milk"`.

use crate::todo::TodoPatch;
use thiserror::Error;

/// A parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add { title: String, description: String },
    Edit { id: String, patch: TodoPatch },
    Toggle { id: String },
    Delete { id: String },
    List { keyword: Option<String> },
    Acknowledge,
    Help,
    Quit,
}

/// Why a line could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Empty command. Type 'help' to see available commands.")]
    Empty,
    #[error(
        "Unknown command '{0}'. Valid commands: add, edit, toggle, delete, list, ok, help, quit"
    )]
    Unknown(String),
    #[error("Missing {what}. Usage: {usage}")]
    Missing {
        what: &'static str,
        usage: &'static str,
    },
    #[error("Invalid field '{0}'. Editable fields: title, description, completed")]
    InvalidField(String),
    #[error("Invalid value '{0}' for completed. Use true or false")]
    InvalidBool(String),
    #[error("Unterminated quote in '{0}'")]
    UnterminatedQuote(String),
}

const USAGE_ADD: &str = "add <title> [| <description>]";
const USAGE_EDIT: &str = "edit <id> [title=<text>] [description=<text>] [completed=<true|false>]";
const USAGE_TOGGLE: &str = "toggle <id>";
const USAGE_DELETE: &str = "delete <id>";

/// Help text listing every command
pub const HELP: &str = "\
Commands:
  add <title> [| <description>]   Add a todo
  edit <id> title=<text> description=<text> completed=<true|false>
                                  Change fields of a todo (any combination)
  toggle <id>                     Flip a todo between open and completed
  delete <id>                     Remove a todo
  list [keyword]                  Show todos, optionally filtered
  ok                              Dismiss the current notification
  help                            Show this help
  quit                            End the session (todos are discarded)";

/// Parse one input line
pub fn parse(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb.to_lowercase().as_str() {
        "" => Err(CommandError::Empty),
        "add" => parse_add(rest),
        "edit" => parse_edit(rest),
        "toggle" => Ok(Command::Toggle {
            id: single_id(rest, USAGE_TOGGLE)?,
        }),
        "delete" | "rm" => Ok(Command::Delete {
            id: single_id(rest, USAGE_DELETE)?,
        }),
        "list" | "ls" => Ok(Command::List {
            keyword: (!rest.is_empty()).then(|| rest.to_string()),
        }),
        "ok" | "dismiss" => Ok(Command::Acknowledge),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        _ => Err(CommandError::Unknown(verb.to_string())),
    }
}

fn parse_add(rest: &str) -> Result<Command, CommandError> {
    let (title, description) = match rest.split_once('|') {
        Some((title, description)) => (title.trim(), description.trim()),
        None => (rest, ""),
    };
    if title.is_empty() {
        return Err(CommandError::Missing {
            what: "title",
            usage: USAGE_ADD,
        });
    }
    Ok(Command::Add {
        title: title.to_string(),
        description: description.to_string(),
    })
}

fn parse_edit(rest: &str) -> Result<Command, CommandError> {
    let mut tokens = tokenize(rest)?.into_iter();
    let id = tokens.next().ok_or(CommandError::Missing {
        what: "id",
        usage: USAGE_EDIT,
    })?;

    let mut patch = TodoPatch::new();
    for token in tokens {
        let (field, value) = token
            .split_once('=')
            .ok_or_else(|| CommandError::InvalidField(token.clone()))?;
        patch = match field {
            "title" => patch.title(value),
            "description" => patch.description(value),
            "completed" => patch.completed(parse_bool(value)?),
            other => return Err(CommandError::InvalidField(other.to_string())),
        };
    }

    if patch.is_empty() {
        return Err(CommandError::Missing {
            what: "field to change",
            usage: USAGE_EDIT,
        });
    }
    Ok(Command::Edit { id, patch })
}

fn single_id(rest: &str, usage: &'static str) -> Result<String, CommandError> {
    let mut tokens = tokenize(rest)?.into_iter();
    tokens
        .next()
        .ok_or(CommandError::Missing { what: "id", usage })
}

fn parse_bool(value: &str) -> Result<bool, CommandError> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "done" => Ok(true),
        "false" | "no" | "open" => Ok(false),
        _ => Err(CommandError::InvalidBool(value.to_string())),
    }
}

/// Split on whitespace, keeping double-quoted runs together
///
/// Quotes may appear mid-token (`title="a b"` yields `title=a b`), and `\"`
/// is a literal quote.
fn tokenize(input: &str) -> Result<Vec<String>, CommandError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut in_quotes = false;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
                in_token = true;
            }
            '"' => {
                in_quotes = !in_quotes;
                in_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if in_quotes {
        return Err(CommandError::UnterminatedQuote(input.to_string()));
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

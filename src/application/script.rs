//! Line-oriented edit scripts
//!
//! One command per line. Blank lines and lines starting with `#` are skipped,
//! keywords are case-insensitive and labels run to the end of the line.
//!
//! ```text
//! new A
//! add-left B
//! add-right C
//! left
//! add-left D
//! print
//! ```

use std::fmt;
use std::str::FromStr;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::Slot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start over with a fresh single-node tree
    New(String),
    Insert(Slot, String),
    Delete(Slot),
    Parent,
    Child(Slot),
    Root,
    Rename(String),
    Print,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::New(label) => write!(f, "new {}", label),
            Command::Insert(slot, label) => write!(f, "add-{} {}", slot, label),
            Command::Delete(slot) => write!(f, "del-{}", slot),
            Command::Parent => write!(f, "up"),
            Command::Child(slot) => write!(f, "{}", slot),
            Command::Root => write!(f, "root"),
            Command::Rename(label) => write!(f, "rename {}", label),
            Command::Print => write!(f, "print"),
        }
    }
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (keyword, rest) = match s.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim()),
            None => (s, ""),
        };
        let keyword = keyword.to_ascii_lowercase();

        let label = |name: &str| -> Result<String, String> {
            if rest.is_empty() {
                Err(format!("'{}' needs a label", name))
            } else {
                Ok(rest.to_string())
            }
        };
        let bare = |command: Command| -> Result<Command, String> {
            if rest.is_empty() {
                Ok(command)
            } else {
                Err(format!("'{}' takes no argument, got '{}'", keyword, rest))
            }
        };

        match keyword.as_str() {
            "new" => Ok(Command::New(label("new")?)),
            "add-left" => Ok(Command::Insert(Slot::Left, label("add-left")?)),
            "add-right" => Ok(Command::Insert(Slot::Right, label("add-right")?)),
            "rename" => Ok(Command::Rename(label("rename")?)),
            "del-left" => bare(Command::Delete(Slot::Left)),
            "del-right" => bare(Command::Delete(Slot::Right)),
            "up" => bare(Command::Parent),
            "left" => bare(Command::Child(Slot::Left)),
            "right" => bare(Command::Child(Slot::Right)),
            "root" => bare(Command::Root),
            "print" => bare(Command::Print),
            "" => Err("empty command".to_string()),
            other => Err(format!("unknown command '{}'", other)),
        }
    }
}

/// Parse a single line; `None` for blank lines and comments.
pub fn parse_line(line: &str) -> Result<Option<Command>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    trimmed.parse().map(Some)
}

/// Parse a whole script into commands tagged with their 1-based line number.
///
/// Stops at the first malformed line.
#[instrument(level = "debug", skip(source))]
pub fn parse_script(source: &str) -> ApplicationResult<Vec<(usize, Command)>> {
    let mut commands = Vec::new();
    for (idx, line) in source.lines().enumerate() {
        let line_no = idx + 1;
        match parse_line(line) {
            Ok(Some(command)) => commands.push((line_no, command)),
            Ok(None) => {}
            Err(message) => {
                return Err(ApplicationError::Parse {
                    line: line_no,
                    message,
                })
            }
        }
    }
    debug!("parsed {} commands", commands.len());
    Ok(commands)
}

//! Terminal commands accepted by the session host

use std::str::FromStr;

use crate::error::SessionError;

/// One line typed at the karaoke prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `singer <name> [/ <nickname>]`
    AddSinger { name: String, nickname: String },
    /// `singers`
    ListSingers,
    /// `add <singer>[,<singer>...] <song query>`
    AddSong { performers: Vec<String>, query: String },
    /// `queue`
    ShowQueue,
    /// `next`
    Next,
    /// `ended`
    Ended,
    /// `force <entry>`
    Force { entry: String },
    /// `remove <entry>`
    Remove { entry: String },
    /// `reset`
    Reset,
    /// `status`
    Status,
    /// `help`
    Help,
    /// `quit`
    Quit,
}

impl Command {
    /// Whether running the command can change what gets persisted
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Command::AddSinger { .. }
                | Command::Next
                | Command::Ended
                | Command::Force { .. }
                | Command::Remove { .. }
                | Command::Reset
        )
    }
}

pub const HELP: &str = "\
Commands:
  singer <name> [/ <nickname>]     register a singer
  singers                          list singers
  add <singer>[,<singer>] <song>   search and queue a song (singer = name, id or number)
  queue                            show queued songs
  next                             start the chosen song, or skip to the next one
  ended                            the current song finished playing
  force <entry>                    play this entry next (entry = id or queue number)
  remove <entry>                   remove an entry from the queue
  reset                            clear the queue and the saved session
  status                           show what is playing
  help                             show this help
  quit                             leave";

fn required(argument: &str, usage: &str) -> Result<String, SessionError> {
    let argument = argument.trim();
    if argument.is_empty() {
        Err(SessionError::validation(format!("usage: {usage}")))
    } else {
        Ok(argument.to_string())
    }
}

impl FromStr for Command {
    type Err = SessionError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "singer" => {
                let (name, nickname) = match rest.split_once('/') {
                    Some((name, nickname)) => (name, nickname.trim()),
                    None => (rest, ""),
                };
                Ok(Command::AddSinger {
                    name: required(name, "singer <name> [/ <nickname>]")?,
                    nickname: nickname.to_string(),
                })
            }
            "singers" => Ok(Command::ListSingers),
            "add" => {
                let usage = "add <singer>[,<singer>] <song>";
                let (performers, query) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| SessionError::validation(format!("usage: {usage}")))?;
                let performers: Vec<String> = performers
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect();
                if performers.is_empty() {
                    return Err(SessionError::validation(format!("usage: {usage}")));
                }
                Ok(Command::AddSong {
                    performers,
                    query: required(query, usage)?,
                })
            }
            "queue" | "q" => Ok(Command::ShowQueue),
            "next" | "n" => Ok(Command::Next),
            "ended" | "end" => Ok(Command::Ended),
            "force" => Ok(Command::Force {
                entry: required(rest, "force <entry>")?,
            }),
            "remove" | "rm" => Ok(Command::Remove {
                entry: required(rest, "remove <entry>")?,
            }),
            "reset" => Ok(Command::Reset),
            "status" | "now" => Ok(Command::Status),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            "" => Err(SessionError::validation("empty command")),
            other => Err(SessionError::validation(format!(
                "unknown command '{other}', type 'help'"
            ))),
        }
    }
}

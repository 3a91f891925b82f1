//! Session command parsing
//!
//! One command per line. Indices typed by the user are 1-based and are
//! converted to 0-based here so the rest of the session never sees them.

use crate::error::{CliError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Search(String),
    Pick(usize),
    Play(usize),
    Toggle,
    Pause,
    Seek(f64),
    Volume(f64),
    Mute,
    Next,
    Previous,
    NewPlaylist(String),
    DeletePlaylist(usize),
    UsePlaylist(usize),
    Remove(usize),
    Up(usize),
    Down(usize),
    List,
    Status,
    // Observations fed to the headless output
    Tick(f64),
    Meta(f64),
    End,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line; `Ok(None)` for blank lines and comments
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "search" | "s" => Self::Search(text(word, rest)?),
            "pick" => Self::Pick(index(word, rest)?),
            "play" | "p" => Self::Play(index(word, rest)?),
            "toggle" | "t" => Self::Toggle,
            "pause" => Self::Pause,
            "seek" => Self::Seek(number(word, rest)?),
            "vol" | "volume" => Self::Volume(number(word, rest)?),
            "mute" => Self::Mute,
            "next" | "n" => Self::Next,
            "prev" | "previous" => Self::Previous,
            "new" => Self::NewPlaylist(text(word, rest)?),
            "delete" => Self::DeletePlaylist(index(word, rest)?),
            "use" => Self::UsePlaylist(index(word, rest)?),
            "rm" | "remove" => Self::Remove(index(word, rest)?),
            "up" => Self::Up(index(word, rest)?),
            "down" => Self::Down(index(word, rest)?),
            "list" | "ls" => Self::List,
            "status" => Self::Status,
            "tick" => Self::Tick(number(word, rest)?),
            "meta" => Self::Meta(number(word, rest)?),
            "end" => Self::End,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => {
                return Err(CliError::command(format!(
                    "unknown command '{other}' (try 'help')"
                )))
            }
        };

        Ok(Some(command))
    }
}

pub const HELP: &str = "\
Commands (indices start at 1):
  search <query>   search the catalogue
  pick <n>         play search result n (adds it to the active playlist)
  play <i>         play track i of the active playlist
  toggle | pause   play/pause
  seek <secs>      jump to a position
  vol <0-1>        set volume
  mute             toggle mute
  next | prev      skip forward/back (wraps)
  new <name>       create a playlist
  delete <i>       delete playlist i
  use <i>          make playlist i active
  rm <i>           remove track i from the active playlist
  up|down <i>      move track i
  list             show playlists and the active queue
  status           show what is playing
  tick <secs>      report playback progress
  meta <secs>      report the track duration
  end              report the end of the track
  quit";

fn text(word: &str, rest: &str) -> Result<String> {
    if rest.is_empty() {
        return Err(CliError::command(format!("'{word}' needs an argument")));
    }
    Ok(rest.to_string())
}

fn index(word: &str, rest: &str) -> Result<usize> {
    match rest.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(CliError::command(format!(
            "'{word}' needs a position starting at 1, got '{rest}'"
        ))),
    }
}

fn number(word: &str, rest: &str) -> Result<f64> {
    rest.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| CliError::command(format!("'{word}' needs a number, got '{rest}'")))
}

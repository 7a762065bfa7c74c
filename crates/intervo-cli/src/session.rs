//! Line commands accepted by `intervo run`, and how events are rendered.
//!
//! Track numbers are 1-based here and 0-based in the core.

use std::num::NonZeroU32;
use std::path::PathBuf;

use intervo_core::{Event, Theme, ValidationError};

pub const HELP: &str = "\
commands:
  start | pause | toggle     control the timer (toggle also: space)
  reset                      back to the start of a work phase
  work <secs> | rest <secs>  change a phase length
  add <path>...              load audio files (quote paths with spaces)
  play <n>                   play track n
  pp                         play/pause the current track
  next | prev                move through the playlist
  remove <n>                 drop track n
  list | status              show the playlist / the timer
  theme [ocean|forest|sunset]
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Start,
    Pause,
    Toggle,
    Reset,
    Work(NonZeroU32),
    Rest(NonZeroU32),
    Add(Vec<PathBuf>),
    /// 0-based track index.
    Play(usize),
    PlayPause,
    Next,
    Previous,
    /// 0-based track index.
    Remove(usize),
    List,
    Status,
    Theme(Option<Theme>),
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<SessionCommand>, ValidationError> {
    // A bare space is the Start/Pause shortcut.
    if line == " " {
        return Ok(Some(SessionCommand::Toggle));
    }

    let words = split_words(line);
    let Some((head, rest)) = words.split_first() else {
        return Ok(None);
    };

    let cmd = match head.to_ascii_lowercase().as_str() {
        "start" => SessionCommand::Start,
        "pause" => SessionCommand::Pause,
        "toggle" | "space" => SessionCommand::Toggle,
        "reset" => SessionCommand::Reset,
        "work" => SessionCommand::Work(parse_duration("work", single_arg("work", rest)?)?),
        "rest" => SessionCommand::Rest(parse_duration("rest", single_arg("rest", rest)?)?),
        "add" => {
            if rest.is_empty() {
                return Err(ValidationError::EmptyCollection("add needs at least one path".into()));
            }
            SessionCommand::Add(rest.iter().map(PathBuf::from).collect())
        }
        "play" => SessionCommand::Play(parse_track_number(single_arg("play", rest)?)?),
        "pp" => SessionCommand::PlayPause,
        "next" => SessionCommand::Next,
        "prev" | "previous" => SessionCommand::Previous,
        "remove" | "rm" => SessionCommand::Remove(parse_track_number(single_arg("remove", rest)?)?),
        "list" | "ls" => SessionCommand::List,
        "status" => SessionCommand::Status,
        "theme" => match rest.first() {
            None => SessionCommand::Theme(None),
            Some(name) => SessionCommand::Theme(Some(name.parse::<Theme>().map_err(|_| {
                ValidationError::InvalidValue {
                    field: "theme".into(),
                    message: format!("unknown theme '{name}' (expected ocean, forest or sunset)"),
                }
            })?)),
        },
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" | "q" => SessionCommand::Quit,
        other => {
            return Err(ValidationError::InvalidValue {
                field: "command".into(),
                message: format!("unknown command '{other}' (try 'help')"),
            })
        }
    };
    Ok(Some(cmd))
}

fn single_arg<'a>(field: &str, args: &'a [String]) -> Result<&'a str, ValidationError> {
    match args {
        [one] => Ok(one.as_str()),
        _ => Err(ValidationError::InvalidValue {
            field: field.into(),
            message: "expected exactly one argument".into(),
        }),
    }
}

/// Duration input boundary: a positive whole number of seconds.
pub fn parse_duration(field: &str, input: &str) -> Result<NonZeroU32, ValidationError> {
    let secs: u32 = input.trim().parse().map_err(|_| ValidationError::InvalidValue {
        field: field.into(),
        message: format!("'{input}' is not a whole number of seconds"),
    })?;
    NonZeroU32::new(secs).ok_or_else(|| ValidationError::InvalidValue {
        field: field.into(),
        message: "must be greater than zero".into(),
    })
}

/// 1-based track number to 0-based index.
fn parse_track_number(input: &str) -> Result<usize, ValidationError> {
    match input.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(ValidationError::InvalidValue {
            field: "track".into(),
            message: format!("'{input}' is not a track number"),
        }),
    }
}

/// Whitespace split that keeps double-quoted runs together.
fn split_words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut pending = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                pending = true;
            }
            c if c.is_whitespace() && !quoted => {
                if pending {
                    words.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => {
                current.push(c);
                pending = true;
            }
        }
    }
    if pending {
        words.push(current);
    }
    words
}

fn themed(theme: Theme, text: &str) -> String {
    format!("\x1b[1;{}m{text}\x1b[0m", theme.ansi_color())
}

/// One human-readable rendering per event.
pub fn render(event: &Event, theme: Theme) -> String {
    match event {
        Event::TimerStarted { phase, remaining_secs, .. } => {
            format!("timer started: {} - {remaining_secs}s", phase.label())
        }
        Event::TimerPaused { phase, remaining_secs, .. } => {
            format!("timer paused: {} - {remaining_secs}s", phase.label())
        }
        Event::TimerReset { remaining_secs, .. } => {
            format!("timer reset: Work! - {remaining_secs}s")
        }
        Event::TimerConfigured { work_secs, rest_secs, remaining_secs, .. } => {
            format!("durations: work {work_secs}s, rest {rest_secs}s (showing {remaining_secs}s)")
        }
        Event::PhaseSwitched { to, duration_secs, .. } => {
            themed(theme, &format!("\x07{} - {duration_secs}s", to.label()))
        }
        Event::TimerSnapshot { label, running, remaining_secs, .. } => {
            let state = if *running { "running" } else { "paused" };
            format!("{} [{state}]", themed(theme, &format!("{label} - {remaining_secs}s")))
        }
        Event::TracksAdded { first_index, names, .. } => {
            let mut out = format!("added {} track(s):", names.len());
            for (offset, name) in names.iter().enumerate() {
                out.push_str(&format!("\n  {}. {name}", first_index + offset + 1));
            }
            out
        }
        Event::TrackStarted { index, name, .. } => format!("now playing {}. {name}", index + 1),
        Event::PlaybackPaused { index, .. } => format!("playback paused on track {}", index + 1),
        Event::PlaybackResumed { index, .. } => format!("playback resumed on track {}", index + 1),
        Event::TrackRemoved { index, name, was_selected, .. } => {
            if *was_selected {
                format!("removed {}. {name} (playback stopped)", index + 1)
            } else {
                format!("removed {}. {name}", index + 1)
            }
        }
        Event::PlaylistSnapshot { tracks, selected_index, playing, .. } => {
            if tracks.is_empty() {
                return "Playlist: (empty)".to_string();
            }
            let mut out = String::from("Playlist:");
            for (i, name) in tracks.iter().enumerate() {
                let marker = match (*selected_index == Some(i), *playing) {
                    (true, true) => '>',
                    (true, false) => '=',
                    _ => ' ',
                };
                out.push_str(&format!("\n {marker} {}. {name}", i + 1));
            }
            out
        }
    }
}

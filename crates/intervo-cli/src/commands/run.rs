//! `intervo run`: the interactive workout session.
//!
//! A single current-thread runtime drives one loop that waits on either the
//! timer's next tick or the next stdin line. Each is handled to completion
//! before the loop waits again.

use std::io::Write;
use std::num::NonZeroU32;
use std::path::PathBuf;

use clap::Args;
use intervo_core::{
    AudioError, AudioOutput, Config, Event, IntervalTicker, LocatorStore, MemoryOutput,
    PhaseTimer, PlaylistController, Theme,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::player::ExternalPlayer;
use crate::session::{self, SessionCommand, HELP};
use crate::upload;

#[derive(Args)]
pub struct RunArgs {
    /// Work phase length in seconds (overrides config)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub work: Option<u32>,
    /// Rest phase length in seconds (overrides config)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub rest: Option<u32>,
    /// External player command, e.g. "mpv --no-video" (overrides config)
    #[arg(long)]
    pub player: Option<String>,
    /// Colour theme: ocean, forest or sunset (overrides config)
    #[arg(long)]
    pub theme: Option<Theme>,
    /// Start the timer immediately
    #[arg(long)]
    pub autostart: bool,
    /// Print the countdown on every tick
    #[arg(long)]
    pub follow: bool,
    /// Emit events as JSON lines
    #[arg(long)]
    pub json: bool,
    /// Audio files to load at start-up
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct Session<O: AudioOutput> {
    timer: PhaseTimer<IntervalTicker>,
    playlist: PlaylistController<O>,
    theme: Theme,
    json: bool,
    follow: bool,
}

impl<O: AudioOutput> Session<O> {
    pub fn new(
        work: NonZeroU32,
        rest: NonZeroU32,
        playlist: PlaylistController<O>,
        theme: Theme,
    ) -> Self {
        Self {
            timer: PhaseTimer::new(work, rest, IntervalTicker::new()),
            playlist,
            theme,
            json: false,
            follow: false,
        }
    }

    pub fn json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn follow(mut self, follow: bool) -> Self {
        self.follow = follow;
        self
    }

    /// Run until `quit` or end of input. Dropping the session afterwards
    /// cancels the ticker and releases every track.
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> Result<(), Box<dyn std::error::Error>>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        self.emit(out, &self.timer.snapshot())?;

        loop {
            tokio::select! {
                _ = self.timer.ticker_mut().wait() => {
                    self.on_tick(out)?;
                }
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        tracing::debug!("input closed");
                        break;
                    };
                    if self.on_line(&line, out)? == Flow::Quit {
                        break;
                    }
                }
            }
        }

        self.timer.pause();
        Ok(())
    }

    fn on_tick<W: Write>(&mut self, out: &mut W) -> std::io::Result<()> {
        match self.timer.tick() {
            Some(event) => self.emit(out, &event),
            None if self.follow => self.emit(out, &self.timer.snapshot()),
            None => Ok(()),
        }
    }

    fn on_line<W: Write>(&mut self, line: &str, out: &mut W) -> std::io::Result<Flow> {
        match session::parse(line) {
            Ok(Some(cmd)) => self.execute(cmd, out),
            Ok(None) => Ok(Flow::Continue),
            Err(e) => {
                tracing::debug!(%line, "rejected input: {e}");
                self.notice(out, &format!("error: {e}"))?;
                Ok(Flow::Continue)
            }
        }
    }

    fn execute<W: Write>(&mut self, cmd: SessionCommand, out: &mut W) -> std::io::Result<Flow> {
        let event = match cmd {
            SessionCommand::Start => self.timer.start(),
            SessionCommand::Pause => self.timer.pause(),
            SessionCommand::Toggle => self.timer.toggle(),
            SessionCommand::Reset => self.timer.reset(),
            SessionCommand::Work(secs) => {
                let (_, rest) = self.timer.durations();
                self.timer.configure(secs, rest)
            }
            SessionCommand::Rest(secs) => {
                let (work, _) = self.timer.durations();
                self.timer.configure(work, secs)
            }
            SessionCommand::Add(paths) => {
                let (files, rejected) = upload::read_files(&paths);
                for r in &rejected {
                    self.notice(out, &format!("skipped {}: {}", r.path.display(), r.reason))?;
                }
                self.playlist.add_tracks(files)
            }
            SessionCommand::Play(index) => {
                let result = self.playlist.play(index);
                self.playback(out, result, &format!("no track {}", index + 1))?
            }
            SessionCommand::PlayPause => {
                let result = self.playlist.toggle_play_pause();
                self.playback(out, result, "nothing loaded")?
            }
            SessionCommand::Next => {
                let result = self.playlist.next();
                self.playback(out, result, "no next track")?
            }
            SessionCommand::Previous => {
                let result = self.playlist.previous();
                self.playback(out, result, "no previous track")?
            }
            SessionCommand::Remove(index) => {
                let event = self.playlist.remove(index);
                if event.is_none() {
                    self.notice(out, &format!("no track {}", index + 1))?;
                }
                event
            }
            SessionCommand::List => Some(self.playlist.snapshot()),
            SessionCommand::Status => Some(self.timer.snapshot()),
            SessionCommand::Theme(theme) => {
                let next = theme.unwrap_or(self.theme.next());
                self.theme = next;
                self.notice(out, &format!("theme: {}", self.theme.as_str()))?;
                None
            }
            SessionCommand::Help => {
                self.notice(out, HELP)?;
                None
            }
            SessionCommand::Quit => return Ok(Flow::Quit),
        };

        if let Some(event) = event {
            self.emit(out, &event)?;
        }
        Ok(Flow::Continue)
    }

    /// Report a playback command: output failures are shown, not recovered.
    fn playback<W: Write>(
        &self,
        out: &mut W,
        result: Result<Option<Event>, AudioError>,
        noop: &str,
    ) -> std::io::Result<Option<Event>> {
        match result {
            Ok(Some(event)) => Ok(Some(event)),
            Ok(None) => {
                self.notice(out, noop)?;
                Ok(None)
            }
            Err(e) => {
                tracing::warn!("playback failed: {e}");
                self.notice(out, &format!("playback failed: {e}"))?;
                Ok(None)
            }
        }
    }

    fn emit<W: Write>(&self, out: &mut W, event: &Event) -> std::io::Result<()> {
        if self.json {
            let line = serde_json::to_string(event).map_err(std::io::Error::other)?;
            writeln!(out, "{line}")
        } else {
            writeln!(out, "{}", session::render(event, self.theme))
        }
    }

    fn notice<W: Write>(&self, out: &mut W, message: &str) -> std::io::Result<()> {
        if self.json {
            writeln!(out, "{}", serde_json::json!({ "type": "Notice", "message": message }))
        } else {
            writeln!(out, "{message}")
        }
    }

    pub fn timer(&self) -> &PhaseTimer<IntervalTicker> {
        &self.timer
    }

    pub fn playlist(&self) -> &PlaylistController<O> {
        &self.playlist
    }
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let (mut work, mut rest) = config.durations()?;
    if let Some(secs) = args.work.and_then(NonZeroU32::new) {
        work = secs;
    }
    if let Some(secs) = args.rest.and_then(NonZeroU32::new) {
        rest = secs;
    }
    let theme = args.theme.unwrap_or(config.ui.theme);
    let player_command = args
        .player
        .unwrap_or_else(|| config.audio.player_command.clone());

    let store = LocatorStore::new();
    let output: Box<dyn AudioOutput> = if player_command.trim().is_empty() {
        Box::new(MemoryOutput::new(store.clone()))
    } else {
        Box::new(ExternalPlayer::new(store.clone(), &player_command)?)
    };
    let mut playlist = PlaylistController::new(store, output);

    let (files, rejected) = upload::read_files(&args.files);
    for r in &rejected {
        eprintln!("skipped {}: {}", r.path.display(), r.reason);
    }
    let added = playlist.add_tracks(files);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let mut session = Session::new(work, rest, playlist, theme)
        .json(args.json)
        .follow(args.follow);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Some(event) = added {
        session.emit(&mut out, &event)?;
    }

    runtime.block_on(async {
        if args.autostart {
            if let Some(event) = session.timer.start() {
                session.emit(&mut out, &event)?;
            }
        }
        let stdin = BufReader::new(tokio::io::stdin());
        session.run(stdin, &mut out).await
    })
}

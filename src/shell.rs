//! Interactive shell
//!
//! Reads one command per line, turns it into a session [`Action`] or a view,
//! and writes the result. Rejected commands print an error and leave the
//! session untouched.

use std::{
    io::{self, BufRead},
    str::FromStr,
};

use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    clock::Clock,
    desks::DeskId,
    hours::{Hours, HoursError},
    render::{RenderError, Renderer},
    session::{Action, Session},
    tiers::{MembershipTier, TierError},
};

const HELP: &str = "\
Commands:
  desks              show the desk layout
  select <id>        select an available desk
  hours <1-8>        set the booking duration
  tier <name>        set the membership tier (basic, premium, executive)
  book               book the selected desk
  dismiss            close the booking confirmation
  clear              drop the current selection
  bookings           list bookings made this session
  revenue            show revenue by membership tier
  help               show this help
  quit               leave the shell";

/// Errors parsing a shell command.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    /// The command word is not recognised.
    #[error("unknown command `{0}`; type `help` for a list")]
    Unknown(String),

    /// A required argument was not given.
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    /// The desk id is not a number.
    #[error("invalid desk id: {0}")]
    InvalidDesk(String),

    /// The duration is invalid.
    #[error(transparent)]
    Hours(#[from] HoursError),

    /// The tier is invalid.
    #[error(transparent)]
    Tier(#[from] TierError),
}

/// Errors that stop the shell.
#[derive(Debug, Error)]
pub enum ShellError {
    /// Reading input or writing output failed.
    #[error("shell IO failed: {0}")]
    Io(#[from] io::Error),

    /// A view could not be rendered.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// A parsed shell command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Show the desk layout
    Desks,

    /// Select a desk
    Select(DeskId),

    /// Set the booking duration
    Hours(Hours),

    /// Set the membership tier
    Tier(MembershipTier),

    /// Book the selected desk
    Book,

    /// Close the confirmation
    Dismiss,

    /// Drop the selection
    Clear,

    /// List bookings
    Bookings,

    /// Show revenue
    Revenue,

    /// Show help
    Help,

    /// Leave the shell
    Quit,
}

impl Command {
    /// The session action this command performs, if it changes state.
    pub fn action(self) -> Option<Action> {
        match self {
            Command::Select(desk_id) => Some(Action::SelectDesk(desk_id)),
            Command::Hours(hours) => Some(Action::SetHours(hours)),
            Command::Tier(tier) => Some(Action::SetTier(tier)),
            Command::Book => Some(Action::Submit),
            Command::Dismiss => Some(Action::Dismiss),
            Command::Clear => Some(Action::ClearSelection),
            Command::Desks
            | Command::Bookings
            | Command::Revenue
            | Command::Help
            | Command::Quit => None,
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().unwrap_or_default().to_ascii_lowercase();
        let argument = words.next();

        let command = match verb.as_str() {
            "desks" | "layout" => Command::Desks,
            "select" => {
                let id = argument.ok_or(CommandError::MissingArgument("select"))?;

                Command::Select(
                    id.parse()
                        .map_err(|_err| CommandError::InvalidDesk(id.to_string()))?,
                )
            }
            "hours" => Command::Hours(argument.ok_or(CommandError::MissingArgument("hours"))?.parse()?),
            "tier" => Command::Tier(argument.ok_or(CommandError::MissingArgument("tier"))?.parse()?),
            "book" => Command::Book,
            "dismiss" | "done" => Command::Dismiss,
            "clear" => Command::Clear,
            "bookings" => Command::Bookings,
            "revenue" => Command::Revenue,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        Ok(command)
    }
}

/// Drives a session from line-oriented input.
#[derive(Debug)]
pub struct Shell {
    renderer: Renderer,
    prompt: bool,
}

impl Shell {
    /// Creates a shell; `prompt` controls whether `> ` is printed before each line.
    pub fn new(renderer: Renderer, prompt: bool) -> Self {
        Self { renderer, prompt }
    }

    /// Run until `quit` or end of input.
    ///
    /// Lines that aren't valid UTF-8 are reported like any other bad command.
    ///
    /// # Errors
    ///
    /// Returns a [`ShellError`] if input can't be read or output can't be written.
    pub fn run<C: Clock>(
        &self,
        session: &mut Session<C>,
        mut input: impl BufRead,
        mut out: impl io::Write,
    ) -> Result<(), ShellError> {
        writeln!(out, "Bukola Workspaces")?;
        writeln!(out, "Book your perfect workspace today")?;
        self.renderer.current(&mut out, session)?;

        let mut raw = Vec::new();

        loop {
            if self.prompt {
                write!(out, "\n> ")?;
                out.flush()?;
            }

            raw.clear();

            if input.read_until(b'\n', &mut raw)? == 0 {
                break;
            }

            // Undecodable bytes become U+FFFD and fail as an unknown command.
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim();

            if line.is_empty() {
                continue;
            }

            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(err) => {
                    writeln!(out, "error: {err}")?;
                    continue;
                }
            };

            debug!(?command, "shell command");

            if !self.execute(command, session, &mut out)? {
                break;
            }
        }

        Ok(())
    }

    /// Execute one command, returning `false` when the shell should stop.
    ///
    /// # Errors
    ///
    /// Returns a [`ShellError`] if output can't be written.
    pub fn execute<C: Clock>(
        &self,
        command: Command,
        session: &mut Session<C>,
        out: &mut impl io::Write,
    ) -> Result<bool, ShellError> {
        if let Some(action) = command.action() {
            if let Err(err) = session.apply(action) {
                warn!(?action, "action rejected: {err}");
                writeln!(out, "error: {err}")?;

                return Ok(true);
            }

            self.renderer.current(out, session)?;

            return Ok(true);
        }

        match command {
            Command::Desks => self.renderer.desks(out, session)?,
            Command::Bookings => self.renderer.bookings(out, session)?,
            Command::Revenue => self.renderer.revenue(out, session)?,
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(false),
            Command::Select(_)
            | Command::Hours(_)
            | Command::Tier(_)
            | Command::Book
            | Command::Dismiss
            | Command::Clear => {}
        }

        Ok(true)
    }
}

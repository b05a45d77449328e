//! Interactive shell over one session and one background worker.
//!
//! Line-oriented: each input line is one command. The reader and writer are
//! injected, so tests drive the shell with in-memory buffers and `main`
//! wires it to stdin/stdout.
//!
//! ```text
//! > open ~/Pictures/sunset.png
//! inspect sunset.png ...
//! sunset.png
//!     Folder: /home/me/Pictures
//!     ...
//! > gray
//! grayscale sunset.png ...
//! Saved grayscale copy as sunset_bw.png
//!     Path: /home/me/Pictures/sunset_bw.png
//! > quit
//! ```
//!
//! Opening a file validates it on the shell thread; every other image
//! operation runs on the worker.

use crate::config::AppConfig;
use crate::imaging::ImageBackend;
use crate::output::{format_error, format_event, format_history};
use crate::session::Session;
use crate::types::Operation;
use crate::worker::{Job, Worker, WorkerEvent};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

const PROMPT: &str = "> ";

const HELP: &str = "\
Commands:
  open <path>      select an image and show its details
  info             show details of the selected image
  gray             save a grayscale copy next to the image (<name>_bw.<ext>)
  move [folder]    move the image (default: configured default_destination)
  rename <name>    rename the image, keeping its extension
  history          list operations run in this session
  help             show this text
  quit, exit       leave the shell";

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Empty,
    Open(&'a str),
    Info,
    Gray,
    Move(Option<&'a str>),
    Rename(&'a str),
    History,
    Help,
    Quit,
    Unknown(&'a str),
}

fn parse(line: &str) -> Command<'_> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let arg = (!rest.is_empty()).then_some(rest);
    match word {
        "" => Command::Empty,
        "open" => Command::Open(rest),
        "info" => Command::Info,
        "gray" | "grayscale" => Command::Gray,
        "move" => Command::Move(arg),
        "rename" => Command::Rename(rest),
        "history" => Command::History,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => Command::Unknown(other),
    }
}

/// Expand a leading `~/` to the home directory.
fn expand_home(raw: &str) -> PathBuf {
    match (raw.strip_prefix("~/"), std::env::var_os("HOME")) {
        (Some(rest), Some(home)) => Path::new(&home).join(rest),
        _ => PathBuf::from(raw),
    }
}

pub struct Shell<B: ImageBackend> {
    backend: B,
    session: Session,
    worker: Worker,
}

impl<B: ImageBackend> Shell<B> {
    /// `backend` validates files on open; `worker` runs everything else.
    pub fn new(backend: B, worker: Worker, config: &AppConfig) -> Self {
        Self {
            backend,
            session: Session::new(config),
            worker,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Read commands until `quit` or end of input.
    pub fn run(&mut self, input: impl BufRead, mut out: impl Write) -> io::Result<()> {
        writeln!(out, "photo-porter shell. Type 'help' for commands.")?;
        let mut lines = input.lines();
        loop {
            write!(out, "{PROMPT}")?;
            out.flush()?;
            let Some(line) = lines.next() else {
                writeln!(out)?;
                break;
            };
            if !self.execute(&line?, &mut out)? {
                break;
            }
        }
        Ok(())
    }

    /// Run one command line. Returns `false` when the shell should exit.
    fn execute(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        match parse(line) {
            Command::Empty => {}
            Command::Quit => {
                writeln!(out, "Bye.")?;
                return Ok(false);
            }
            Command::Help => writeln!(out, "{HELP}")?,
            Command::History => {
                for line in format_history(self.session.history()) {
                    writeln!(out, "{line}")?;
                }
            }
            Command::Open("") => writeln!(out, "Usage: open <path>")?,
            Command::Open(raw) => {
                let path = expand_home(raw);
                let opened = self.session.open(&self.backend, &path).map(|_| ());
                match opened {
                    Ok(()) => self.dispatch(Operation::Inspect, out)?,
                    Err(e) => {
                        log::warn!("validate {}: {e}", path.display());
                        writeln!(out, "{}", format_error(&e))?;
                    }
                }
            }
            Command::Info => self.dispatch(Operation::Inspect, out)?,
            Command::Gray => self.dispatch(Operation::Grayscale, out)?,
            Command::Move(dir) => {
                let given = dir.map(expand_home);
                match self.session.destination(given.as_deref()) {
                    Ok(destination) => self.dispatch(Operation::Move { destination }, out)?,
                    Err(e) => writeln!(out, "{e}")?,
                }
            }
            Command::Rename("") => writeln!(out, "Usage: rename <new name>")?,
            Command::Rename(name) => self.dispatch(
                Operation::Rename {
                    new_name: name.to_string(),
                },
                out,
            )?,
            Command::Unknown(word) => {
                writeln!(out, "Unknown command: {word}. Type 'help' for commands.")?
            }
        }
        Ok(true)
    }

    /// Hand `operation` to the worker and report its events until it finishes.
    fn dispatch(&mut self, operation: Operation, out: &mut impl Write) -> io::Result<()> {
        let job: Job = match self.session.job(operation) {
            Ok(job) => job,
            Err(e) => return writeln!(out, "{e}"),
        };
        if let Err(e) = self.worker.submit(job.clone()) {
            return writeln!(out, "Error: {e}");
        }
        loop {
            let event = match self.worker.recv() {
                Ok(event) => event,
                Err(e) => return writeln!(out, "Error: {e}"),
            };
            for line in format_event(&event) {
                writeln!(out, "{line}")?;
            }
            if let WorkerEvent::Finished { result, .. } = event {
                self.session.apply(&job, &result);
                return Ok(());
            }
        }
    }
}

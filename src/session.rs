//! Presentation-agnostic session state.
//!
//! A session tracks the file the user is working on and what has been done
//! to it. It never touches the filesystem beyond validation; operations are
//! turned into [`Job`]s for the worker and their results fed back through
//! [`Session::apply`].
//!
//! Pointer rules after a successful operation:
//!
//! | Operation | Current file afterwards |
//! |---|---|
//! | rename, move | the new path |
//! | grayscale | unchanged (the source) |
//! | inspect | unchanged |
//!
//! When an operation reports the current file as missing, the pointer is
//! cleared so the next command asks for a new file.

use crate::config::AppConfig;
use crate::history::History;
use crate::imaging::ImageBackend;
use crate::types::{OpError, Operation};
use crate::validate::check_image;
use crate::worker::{Job, JobOutput};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("No file selected. Use 'open <path>' first.")]
    NoFileSelected,
    #[error("No destination given and no default_destination configured")]
    NoDestination,
}

#[derive(Debug)]
pub struct Session {
    current: Option<PathBuf>,
    history: History,
    verify_on_open: bool,
    default_destination: Option<PathBuf>,
}

impl Session {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            current: None,
            history: History::new(config.history_limit),
            verify_on_open: config.verify_on_open,
            default_destination: config.default_destination.clone(),
        }
    }

    pub fn current(&self) -> Option<&Path> {
        self.current.as_deref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Validate `path` and make it the current file.
    ///
    /// On failure the previous selection is kept.
    pub fn open(&mut self, backend: &impl ImageBackend, path: &Path) -> Result<&Path, OpError> {
        check_image(backend, path, self.verify_on_open)?;
        log::debug!("selected {}", path.display());
        Ok(self.current.insert(path.to_path_buf()))
    }

    /// Destination for a move: `given` if present, else the configured default.
    pub fn destination(&self, given: Option<&Path>) -> Result<PathBuf, SessionError> {
        given
            .map(Path::to_path_buf)
            .or_else(|| self.default_destination.clone())
            .ok_or(SessionError::NoDestination)
    }

    /// Build a job for `operation` on the current file.
    pub fn job(&self, operation: Operation) -> Result<Job, SessionError> {
        let source = self.current.clone().ok_or(SessionError::NoFileSelected)?;
        Ok(Job { operation, source })
    }

    /// Record the outcome of `job` and move the pointer if the file moved.
    pub fn apply(&mut self, job: &Job, result: &Result<JobOutput, OpError>) {
        let outcome = match result {
            Ok(JobOutput::Completed(done)) => Ok(done),
            Ok(JobOutput::Metadata(_)) => return,
            Err(e) => Err(e),
        };
        if job.operation.is_mutating() {
            self.history
                .record(job.operation.clone(), job.source.clone(), outcome);
        }

        let is_current = self.current.as_deref() == Some(job.source.as_path());
        if !is_current {
            return;
        }
        match (outcome, &job.operation) {
            (Ok(done), Operation::Rename { .. } | Operation::Move { .. }) => {
                self.current = Some(done.new_path.clone());
            }
            (Err(e), _) if e.is_not_found() => {
                log::debug!("{} is gone, clearing selection", job.source.display());
                self.current = None;
            }
            _ => {}
        }
    }
}

//! Single background worker for image operations.
//!
//! The shell hands every decode, encode and filesystem operation to one
//! worker thread so its input loop never blocks on I/O. Exactly one job is
//! in flight at a time: [`Worker::submit`] refuses a second job with
//! [`WorkerError::Busy`] until the first has reported
//! [`WorkerEvent::Finished`].
//!
//! ```text
//! shell ──Job──▶ [job channel] ──▶ worker thread ──▶ run_job
//!   ▲                                                   │
//!   └──────────── [event channel] ◀── Started/Finished ─┘
//! ```
//!
//! Dropping the [`Worker`] stops the thread after the current job and
//! joins it.

use crate::imaging::ImageBackend;
use crate::metadata::get_image_info;
use crate::placement::{move_image, rename_file};
use crate::transform::convert_to_grayscale;
use crate::types::{Completed, ImageMetadata, OpError, Operation};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use thiserror::Error;

/// One operation on one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub operation: Operation,
    pub source: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobOutput {
    Metadata(ImageMetadata),
    Completed(Completed),
}

#[derive(Debug)]
pub enum WorkerEvent {
    Started {
        job: Job,
    },
    Finished {
        job: Job,
        result: Result<JobOutput, OpError>,
    },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum WorkerError {
    #[error("another operation is still running")]
    Busy,
    #[error("worker thread has stopped")]
    Disconnected,
}

enum WorkerMessage {
    Run(Job),
    Stop,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn completed(new_path: PathBuf, message: String) -> JobOutput {
    JobOutput::Completed(Completed { new_path, message })
}

/// Execute `job` on the calling thread.
///
/// Used by the worker thread and directly by the one-shot CLI. Failures
/// are logged here, once, with the operation name and path.
pub fn run_job(backend: &impl ImageBackend, job: &Job) -> Result<JobOutput, OpError> {
    let source = job.source.as_path();
    let result = match &job.operation {
        Operation::Inspect => get_image_info(backend, source).map(JobOutput::Metadata),
        Operation::Grayscale => convert_to_grayscale(backend, source).map(|out| {
            let message = format!("Saved grayscale copy as {}", file_name(&out));
            completed(out, message)
        }),
        Operation::Move { destination } => move_image(source, destination).map(|out| {
            let message = format!("Moved to {}", out.display());
            completed(out, message)
        }),
        Operation::Rename { new_name } => rename_file(source, new_name).map(|out| {
            let message = format!("Renamed to {}", file_name(&out));
            completed(out, message)
        }),
    };
    if let Err(e) = &result {
        log::warn!(
            "{} failed for {} ({:?}): {e}",
            job.operation.name(),
            source.display(),
            e.kind()
        );
    }
    result
}

pub struct Worker {
    jobs: Sender<WorkerMessage>,
    events: Receiver<WorkerEvent>,
    busy: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// Start the worker thread. The backend moves into the thread.
    pub fn spawn<B: ImageBackend + 'static>(backend: B) -> Self {
        let (jobs, job_rx) = mpsc::channel::<WorkerMessage>();
        let (event_tx, events) = mpsc::channel();
        let busy = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&busy);

        let handle = thread::spawn(move || {
            for message in job_rx {
                let job = match message {
                    WorkerMessage::Run(job) => job,
                    WorkerMessage::Stop => break,
                };
                log::debug!("worker: {} {}", job.operation, job.source.display());
                if event_tx.send(WorkerEvent::Started { job: job.clone() }).is_err() {
                    break;
                }
                let result = run_job(&backend, &job);
                flag.store(false, Ordering::SeqCst);
                if event_tx.send(WorkerEvent::Finished { job, result }).is_err() {
                    break;
                }
            }
            flag.store(false, Ordering::SeqCst);
        });

        Self {
            jobs,
            events,
            busy,
            handle: Some(handle),
        }
    }

    /// Queue `job`. Fails with `Busy` while a previous job is unfinished.
    pub fn submit(&self, job: Job) -> Result<(), WorkerError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(WorkerError::Busy);
        }
        self.jobs.send(WorkerMessage::Run(job)).map_err(|_| {
            self.busy.store(false, Ordering::SeqCst);
            WorkerError::Disconnected
        })
    }

    /// Block until the next event.
    pub fn recv(&self) -> Result<WorkerEvent, WorkerError> {
        self.events.recv().map_err(|_| WorkerError::Disconnected)
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        let _ = self.jobs.send(WorkerMessage::Stop);
        let Some(handle) = self.handle.take() else {
            return;
        };
        if handle.join().is_err() {
            log::error!("worker thread panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::MockBackend;
    use crate::imaging::{
        BackendError, ColorMode, Container, Dimensions, ImageHeader, RustBackend,
    };
    use crate::test_helpers::*;
    use crate::types::ErrorKind;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Blocks in `identify` until the test sends on (or drops) the gate.
    struct GateBackend {
        gate: Mutex<Receiver<()>>,
    }

    impl ImageBackend for GateBackend {
        type Image = ();

        fn identify(&self, _path: &Path) -> Result<ImageHeader, BackendError> {
            let _ = self.gate.lock().unwrap().recv();
            Ok(ImageHeader {
                dimensions: Dimensions {
                    width: 1,
                    height: 1,
                },
                color_mode: ColorMode::L,
                format: Container::Png,
            })
        }

        fn verify(&self, _path: &Path) -> Result<(), BackendError> {
            Ok(())
        }

        fn open(&self, _path: &Path) -> Result<(), BackendError> {
            Ok(())
        }

        fn to_grayscale(&self, image: ()) {
            image
        }

        fn save(&self, _image: &(), _path: &Path, _format: Container) -> Result<(), BackendError> {
            Ok(())
        }
    }

    fn inspect(path: &Path) -> Job {
        Job {
            operation: Operation::Inspect,
            source: path.to_path_buf(),
        }
    }

    /// Submit `job` and wait for its result.
    fn finish(worker: &Worker, job: Job) -> Result<JobOutput, OpError> {
        worker.submit(job).unwrap();
        loop {
            if let WorkerEvent::Finished { result, .. } = worker.recv().unwrap() {
                return result;
            }
        }
    }

    #[test]
    fn run_job_dispatches_each_operation() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("sorted");
        std::fs::create_dir(&dest).unwrap();
        let photo = write_png(tmp.path(), "cat.png", 6, 4);
        let backend = RustBackend::new();

        let Ok(JobOutput::Metadata(info)) = run_job(&backend, &inspect(&photo)) else {
            panic!("expected metadata");
        };
        assert_eq!((info.width, info.height), (6, 4));

        let gray = Job {
            operation: Operation::Grayscale,
            source: photo.clone(),
        };
        let Ok(JobOutput::Completed(done)) = run_job(&backend, &gray) else {
            panic!("expected completed");
        };
        assert_eq!(done.new_path, tmp.path().join("cat_bw.png"));
        assert_eq!(done.message, "Saved grayscale copy as cat_bw.png");

        let rename = Job {
            operation: Operation::Rename {
                new_name: "kitten".into(),
            },
            source: photo,
        };
        let Ok(JobOutput::Completed(done)) = run_job(&backend, &rename) else {
            panic!("expected completed");
        };
        assert_eq!(done.new_path, tmp.path().join("kitten.png"));

        let moved = Job {
            operation: Operation::Move {
                destination: dest.clone(),
            },
            source: done.new_path,
        };
        let Ok(JobOutput::Completed(done)) = run_job(&backend, &moved) else {
            panic!("expected completed");
        };
        assert_eq!(done.new_path, dest.join("kitten.png"));
    }

    #[test]
    fn run_job_passes_errors_through() {
        let tmp = TempDir::new().unwrap();
        let err = run_job(&MockBackend::new(), &inspect(&tmp.path().join("gone.png"))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn worker_reports_started_then_finished() {
        let tmp = TempDir::new().unwrap();
        let photo = write_png(tmp.path(), "a.png", 3, 3);
        let worker = Worker::spawn(RustBackend::new());

        worker.submit(inspect(&photo)).unwrap();

        match worker.recv().unwrap() {
            WorkerEvent::Started { job } => assert_eq!(job.source, photo),
            other => panic!("unexpected {other:?}"),
        }
        match worker.recv().unwrap() {
            WorkerEvent::Finished { job, result } => {
                assert_eq!(job.operation, Operation::Inspect);
                assert!(matches!(result, Ok(JobOutput::Metadata(_))));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(worker.submit(inspect(&photo)), Ok(()));
    }

    #[test]
    fn second_job_rejected_while_first_in_flight() {
        let tmp = TempDir::new().unwrap();
        let photo = write_garbage(tmp.path(), "slow.png");
        let (release, gate) = mpsc::channel();
        let worker = Worker::spawn(GateBackend {
            gate: Mutex::new(gate),
        });

        worker.submit(inspect(&photo)).unwrap();
        assert_eq!(worker.submit(inspect(&photo)), Err(WorkerError::Busy));

        release.send(()).unwrap();
        loop {
            if let WorkerEvent::Finished { result, .. } = worker.recv().unwrap() {
                assert!(result.is_ok());
                break;
            }
        }

        drop(release);
        assert!(finish(&worker, inspect(&photo)).is_ok());
    }

    #[test]
    fn failed_job_frees_the_worker() {
        let tmp = TempDir::new().unwrap();
        let worker = Worker::spawn(MockBackend::new());
        let missing = Job {
            operation: Operation::Grayscale,
            source: tmp.path().join("missing.png"),
        };
        assert!(finish(&worker, missing.clone()).unwrap_err().is_not_found());
        assert!(finish(&worker, missing).unwrap_err().is_not_found());
    }
}

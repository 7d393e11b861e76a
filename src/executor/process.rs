//! Isolated execution of a single test
//!
//! Each test runs in its own process. The runner re-invokes its own
//! executable with the test selected through [`CHILD_TEST_ENV`], drains the
//! child's stdout and stderr pipes while it runs, and records the exit status
//! on the [`Test`]. Once the child has exited only output already buffered in
//! the pipes is collected.

use std::collections::TryReserveError;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, warn};

use super::child::CHILD_TEST_ENV;
use crate::error::ExecutionError;
use crate::models::{Test, TestId};
use crate::utils::Timer;

/// Maximum bytes captured per stream; reaching it aborts the run
pub const CAPTURE_CAPACITY: usize = 0xFFFF;

/// How long buffered output is read after the test process has exited
const EXIT_GRACE: Duration = Duration::from_millis(100);

/// Exit statuses of signal-terminated tests are reported as `128 + signal`
pub const SIGNAL_STATUS_BASE: i32 = 128;

/// Scratch storage for the output of one test execution
///
/// Passed into [`Executor::execute`] and handed back empty on success, so a
/// single allocation serves a whole sequential run.
#[derive(Debug)]
pub struct CaptureArena {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

impl CaptureArena {
    pub fn new() -> Self {
        Self {
            stdout: Vec::with_capacity(CAPTURE_CAPACITY),
            stderr: Vec::with_capacity(CAPTURE_CAPACITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stdout.is_empty() && self.stderr.is_empty()
    }

    fn reset(&mut self) {
        self.stdout.clear();
        self.stderr.clear();
    }
}

impl Default for CaptureArena {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the command that runs one test in a child process
pub trait Launcher {
    fn command(&self, id: TestId, test: &Test) -> io::Result<Command>;
}

impl<F> Launcher for F
where
    F: Fn(TestId, &Test) -> io::Result<Command>,
{
    fn command(&self, id: TestId, test: &Test) -> io::Result<Command> {
        self(id, test)
    }
}

/// Re-invokes the current executable with the same arguments
///
/// The child process must register the same suites and tests in the same
/// order and call [`Runner::run`](crate::Runner::run), which then executes
/// only the selected test.
#[derive(Clone, Copy, Debug, Default)]
pub struct SelfExec;

impl Launcher for SelfExec {
    fn command(&self, id: TestId, _test: &Test) -> io::Result<Command> {
        let mut command = Command::new(std::env::current_exe()?);
        command
            .args(std::env::args_os().skip(1))
            .env(CHILD_TEST_ENV, id.to_string());
        Ok(command)
    }
}

/// Runs tests one at a time in isolated processes
#[derive(Debug, Default)]
pub struct Executor<L = SelfExec> {
    launcher: L,
}

impl Executor<SelfExec> {
    pub fn new() -> Self {
        Self { launcher: SelfExec }
    }
}

impl<L: Launcher> Executor<L> {
    pub fn with_launcher(launcher: L) -> Self {
        Self { launcher }
    }

    /// Execute `test` in a child process and record its outcome
    ///
    /// `label` names the test in diagnostics. On success the arena is
    /// returned empty for the next test. On error the test stays unexecuted.
    pub async fn execute(
        &self,
        id: TestId,
        label: &str,
        test: &mut Test,
        mut arena: CaptureArena,
    ) -> Result<CaptureArena, ExecutionError> {
        arena.reset();
        let timer = Timer::start(label);

        let mut command = self
            .launcher
            .command(id, test)
            .map_err(|source| ExecutionError::Spawn {
                test: label.to_string(),
                source,
            })?;
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = command.spawn().map_err(|source| ExecutionError::Spawn {
            test: label.to_string(),
            source,
        })?;
        debug!("{}: spawned test process {:?}", label, child.id());

        let stdout = child.stdout.take().ok_or_else(|| ExecutionError::Pipe {
            test: label.to_string(),
            stream: "stdout",
        })?;
        let stderr = child.stderr.take().ok_or_else(|| ExecutionError::Pipe {
            test: label.to_string(),
            stream: "stderr",
        })?;

        let (status, drained) = {
            let output = async {
                tokio::try_join!(
                    drain(stdout, &mut arena.stdout),
                    drain(stderr, &mut arena.stderr)
                )
                .map(|_| ())
            };
            tokio::pin!(output);

            tokio::select! {
                drained = &mut output => (None, drained),
                status = child.wait() => (Some(status), settle(label, output).await),
            }
        };

        if let Err(err) = drained {
            if status.is_none() {
                // The child may be blocked on a full pipe
                if let Err(e) = child.kill().await {
                    warn!("{}: failed to kill test process: {}", label, e);
                }
            }
            return Err(err.into_execution_error(label));
        }

        let status = match status {
            Some(status) => status,
            None => child.wait().await,
        }
        .map_err(|source| ExecutionError::Wait {
            test: label.to_string(),
            source,
        })?;
        let result = exit_code(label, status);

        let alloc_error = |_: TryReserveError| ExecutionError::Allocation {
            test: label.to_string(),
        };
        let stdout = copy_capture(&arena.stdout).map_err(alloc_error)?;
        let stderr = copy_capture(&arena.stderr).map_err(alloc_error)?;

        let elapsed = timer.stop();
        test.record(result, stdout, stderr, elapsed);
        debug!("{}: exited with status {}", label, result);

        arena.reset();
        Ok(arena)
    }
}

enum DrainError {
    Io(io::Error),
    Overflow,
}

impl DrainError {
    fn into_execution_error(self, label: &str) -> ExecutionError {
        match self {
            DrainError::Io(source) => ExecutionError::Capture {
                test: label.to_string(),
                source,
            },
            DrainError::Overflow => ExecutionError::Overflow {
                test: label.to_string(),
                capacity: CAPTURE_CAPACITY,
            },
        }
    }
}

/// Read a stream to EOF into `scratch`, failing once it reaches capacity
///
/// Bytes are appended as they arrive, so a cancelled drain keeps what it
/// has read.
async fn drain<R>(mut reader: R, scratch: &mut Vec<u8>) -> Result<(), DrainError>
where
    R: AsyncRead + Unpin,
{
    let mut chunk = [0u8; 4096];
    loop {
        let room = (CAPTURE_CAPACITY - scratch.len()).min(chunk.len());
        let n = reader
            .read(&mut chunk[..room])
            .await
            .map_err(DrainError::Io)?;
        if n == 0 {
            return Ok(());
        }

        scratch.extend_from_slice(&chunk[..n]);
        if scratch.len() >= CAPTURE_CAPACITY {
            return Err(DrainError::Overflow);
        }
    }
}

/// Collect what an exited test left in its pipes
///
/// Processes the test started in the background may still hold the pipes
/// open; they are not waited for beyond [`EXIT_GRACE`].
async fn settle<F>(label: &str, output: Pin<&mut F>) -> Result<(), DrainError>
where
    F: Future<Output = Result<(), DrainError>>,
{
    match tokio::time::timeout(EXIT_GRACE, output).await {
        Ok(drained) => drained,
        Err(_) => {
            debug!("{}: pipes still open after the test process exited", label);
            Ok(())
        }
    }
}

/// Copy scratch content into an exactly sized owned buffer
fn copy_capture(scratch: &[u8]) -> Result<Option<Vec<u8>>, TryReserveError> {
    if scratch.is_empty() {
        return Ok(None);
    }

    let mut owned = Vec::new();
    owned.try_reserve_exact(scratch.len())?;
    owned.extend_from_slice(scratch);
    Ok(Some(owned))
}

fn exit_code(label: &str, status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;

        if let Some(signal) = status.signal() {
            warn!("{}: test was killed by signal {}", label, signal);
            return SIGNAL_STATUS_BASE + signal;
        }
    }

    warn!("{}: test ended without an exit status", label);
    1
}

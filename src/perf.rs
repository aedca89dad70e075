//! Timing output and the clamp step log.
//!
//! [`scope`] prints how long a span took to stderr while timing is on
//! ([`set_enabled`]). The step log writes one tab-separated line per fit
//! search step to the file chosen with [`set_step_log_path`].

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::clamp::{Finish, SearchState, Step};

static TIMING: AtomicBool = AtomicBool::new(false);
static STEP_LOG: Mutex<Option<StepLog>> = Mutex::new(None);

const STEP_LOG_HEADER: &str = "elapsed_ms\tstep\tresult\tdelimiter\tchunks\tpending\tleaf";

pub fn set_enabled(enabled: bool) {
    TIMING.store(enabled, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    TIMING.load(Ordering::Relaxed)
}

/// Prints its lifetime on drop when timing is enabled.
#[derive(Debug)]
pub struct Scope {
    name: &'static str,
    start: Instant,
}

impl Scope {
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        if is_enabled() {
            eprintln!(
                "[perf] {}: {:.2} ms",
                self.name,
                self.elapsed().as_secs_f64() * 1000.0
            );
        }
    }
}

pub fn scope(name: &'static str) -> Scope {
    Scope {
        name,
        start: Instant::now(),
    }
}

/// One fit search step, as written to the step log.
#[derive(Debug, Clone, Copy)]
pub struct StepRecord<'a> {
    pub step: Step,
    pub state: &'a SearchState,
}

impl StepRecord<'_> {
    fn result(&self) -> String {
        match self.step {
            Step::Continue(phase) => format!("{phase:?}"),
            Step::Finished(Finish::Fit) => "Fit".to_string(),
            Step::Finished(Finish::Exhausted) => "Exhausted".to_string(),
        }
    }
}

#[derive(Debug)]
struct StepLog {
    start: Instant,
    writer: BufWriter<File>,
}

impl StepLog {
    fn create(path: &Path) -> io::Result<Self> {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "{STEP_LOG_HEADER}")?;
        writer.flush()?;
        Ok(Self {
            start: Instant::now(),
            writer,
        })
    }

    fn write(&mut self, record: &StepRecord<'_>) -> io::Result<()> {
        let state = record.state;
        writeln!(
            self.writer,
            "{:.3}\t{}\t{}\t{:?}\t{}\t{:?}\t{}",
            self.start.elapsed().as_secs_f64() * 1000.0,
            state.steps(),
            record.result(),
            state.delimiter(),
            state.chunks().map_or(0, <[String]>::len),
            state.pending().unwrap_or_default(),
            state
                .leaf()
                .map_or_else(|| "-".to_string(), |leaf| leaf.index().to_string()),
        )?;
        self.writer.flush()
    }
}

/// Start writing the step log to `path`, or stop with `None`.
///
/// # Errors
/// Returns an error if the log file cannot be created.
pub fn set_step_log_path(path: Option<&Path>) -> io::Result<()> {
    let log = path.map(StepLog::create).transpose()?;
    *STEP_LOG.lock().unwrap_or_else(PoisonError::into_inner) = log;
    Ok(())
}

pub fn is_step_log_enabled() -> bool {
    STEP_LOG
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .is_some()
}

/// Append `record` to the step log, if one is open.
pub fn record_step(record: &StepRecord<'_>) {
    let mut guard = STEP_LOG.lock().unwrap_or_else(PoisonError::into_inner);
    let failed = guard.as_mut().and_then(|log| log.write(record).err());
    if let Some(err) = failed {
        tracing::warn!(error = %err, "step log write failed; closing it");
        *guard = None;
    }
}

//! Download progress and console output.
//!
//! The transport reports byte counts through [`Progress::record`]; the
//! [`Console`] turns them into a single-line indicator and also prints the
//! plain status messages of the pipeline.

use std::io::Write;
use std::time::{Duration, Instant};

const RENDER_INTERVAL: Duration = Duration::from_millis(500);
const MIB: f64 = 1_048_576.0;

/// Receives byte counts from a running transfer.
pub trait Progress {
    /// `bytes_done` is cumulative; `total` is the expected size when known.
    fn record(&mut self, bytes_done: u64, total: Option<u64>);
}

/// Counters for one transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressState {
    pub bytes_done: u64,
    pub total_bytes: Option<u64>,
}

impl ProgressState {
    /// Store new counters. A missing `total` keeps the last known one.
    pub fn update(&mut self, bytes_done: u64, total: Option<u64>) {
        self.bytes_done = bytes_done;
        if total.is_some() {
            self.total_bytes = total;
        }
    }

    /// Fraction complete in [0.0, 1.0], or None when the size is unknown.
    pub fn fraction(&self) -> Option<f64> {
        match self.total_bytes {
            Some(0) => Some(1.0),
            Some(total) => Some((self.bytes_done as f64 / total as f64).min(1.0)),
            None => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.total_bytes, Some(total) if self.bytes_done >= total)
    }
}

struct ActiveBar {
    label: String,
    state: ProgressState,
    last_render: Option<Instant>,
}

/// Human-facing output: progress indicator plus status messages.
pub struct Console<W: Write> {
    out: W,
    bar: Option<ActiveBar>,
}

impl Console<std::io::Stdout> {
    pub fn stdout() -> Self {
        Console::new(std::io::stdout())
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Self {
        Self { out, bar: None }
    }

    /// Start an indicator labelled `label`; counters begin at zero.
    pub fn begin_progress(&mut self, label: impl Into<String>) {
        self.bar = Some(ActiveBar {
            label: label.into(),
            state: ProgressState::default(),
            last_render: None,
        });
    }

    /// Render the final state and end the indicator line.
    pub fn finish_progress(&mut self) {
        if let Some(bar) = self.bar.take() {
            let line = render_line(&bar.label, &bar.state);
            let _ = writeln!(self.out, "\r{}", line);
            let _ = self.out.flush();
        }
    }

    /// Counters of the running indicator, if any.
    #[cfg(test)]
    fn progress_state(&self) -> Option<&ProgressState> {
        self.bar.as_ref().map(|b| &b.state)
    }

    /// Print a full line.
    pub fn say(&mut self, msg: &str) {
        let _ = writeln!(self.out, "{}", msg);
        let _ = self.out.flush();
    }

    /// Print without a line break, for messages completed later.
    pub fn say_partial(&mut self, msg: &str) {
        let _ = write!(self.out, "{}", msg);
        let _ = self.out.flush();
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Progress for Console<W> {
    fn record(&mut self, bytes_done: u64, total: Option<u64>) {
        let Some(bar) = self.bar.as_mut() else {
            return;
        };
        bar.state.update(bytes_done, total);
        let now = Instant::now();
        let due = bar
            .last_render
            .map_or(true, |t| now.duration_since(t) >= RENDER_INTERVAL);
        if due || bar.state.is_complete() {
            let line = render_line(&bar.label, &bar.state);
            let _ = write!(self.out, "\r{}  ", line);
            let _ = self.out.flush();
            bar.last_render = Some(now);
        }
    }
}

fn render_line(label: &str, state: &ProgressState) -> String {
    let done_mib = state.bytes_done as f64 / MIB;
    match (state.total_bytes, state.fraction()) {
        (Some(total), Some(frac)) => format!(
            "{}: {:.1} / {:.1} MiB ({:.1}%)",
            label,
            done_mib,
            total as f64 / MIB,
            frac * 100.0
        ),
        _ => format!("{}: {:.1} MiB", label, done_mib),
    }
}

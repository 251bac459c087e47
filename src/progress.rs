use crossterm::style::Print;
use crossterm::{cursor, execute};
use std::io::{self, Write};

/// In-place terminal progress rendering for a running transfer.

/// Capability the stream provider calls back into during a transfer.
///
/// Implementations must tolerate zero, one, or many calls before the
/// transfer completes; fractions arrive monotonically non-decreasing from a
/// single logical writer.
pub trait ProgressObserver: Send + Sync {
    /// Reports the completion fraction, in `[0, 1]`.
    fn report(&self, fraction: f64);
}

/// Renders the transfer fraction at a fixed terminal position.
///
/// The cursor position is captured at construction and every report
/// rewrites it with the percentage. Dropping the indicator writes the
/// completion marker at the same position, on every exit path of the
/// enclosing scope. Display failures (resize, closed terminal) are
/// swallowed; they never affect transfer correctness.
pub struct ProgressIndicator {
    /// `None` when the terminal cannot report a cursor position (e.g. not a
    /// tty); falls back to carriage-return overwriting.
    anchor: Option<(u16, u16)>,
}

impl ProgressIndicator {
    pub fn new() -> Self {
        Self {
            anchor: cursor::position().ok(),
        }
    }

    fn write_in_place(&self, text: &str) {
        let mut stdout = io::stdout();
        let outcome = match self.anchor {
            Some((column, row)) => execute!(
                stdout,
                cursor::MoveTo(column, row),
                Print(text),
                Print("\n")
            ),
            None => write!(stdout, "\r{text}").and_then(|_| stdout.flush()),
        };
        let _ = outcome;
    }
}

impl Default for ProgressIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressObserver for ProgressIndicator {
    fn report(&self, fraction: f64) {
        self.write_in_place(&format!("{:.1}%", fraction * 100.0));
    }
}

impl Drop for ProgressIndicator {
    fn drop(&mut self) {
        self.write_in_place("Completed ✓");
    }
}

//! Simple progress spinner for terminal feedback

use crate::scanner::{ScanHandle, ScanStatus};
use std::io::Write;
use tokio::time::{interval, Duration};

const BRAILLE_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Spinner only on an interactive stderr when info logging is not already chatty
pub fn should_show_spinner() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stderr()) && !log::log_enabled!(log::Level::Info)
}

pub struct ProgressSpinner {
    frame_index: usize,
}

impl ProgressSpinner {
    pub fn new() -> Self {
        Self { frame_index: 0 }
    }

    /// Advance one frame and return the line to draw
    pub fn next_line(&mut self, status: ScanStatus) -> String {
        let frame = BRAILLE_FRAMES[self.frame_index];
        self.frame_index = (self.frame_index + 1) % BRAILLE_FRAMES.len();
        match status {
            ScanStatus::CancelRequested => format!("{frame} cancelling..."),
            _ => format!("{frame} scanning..."),
        }
    }

    pub fn tick(&mut self, status: ScanStatus) {
        let line = self.next_line(status);
        eprint!("\r{line}");
        let _ = std::io::stderr().flush();
    }

    pub fn finish(&self) {
        eprint!("\r\x1b[2K");
        let _ = std::io::stderr().flush();
    }
}

impl Default for ProgressSpinner {
    fn default() -> Self {
        Self::new()
    }
}

/// Animate until the scan behind `handle` reaches a terminal state
pub async fn run_spinner(handle: ScanHandle) {
    if !should_show_spinner() {
        return;
    }

    let mut spinner = ProgressSpinner::new();
    let mut update_interval = interval(Duration::from_millis(100));

    loop {
        tokio::select! {
            _ = handle.wait() => {
                spinner.finish();
                return;
            }
            _ = update_interval.tick() => {
                spinner.tick(handle.status());
            }
        }
    }
}

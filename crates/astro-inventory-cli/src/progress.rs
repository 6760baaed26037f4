use astro_inventory_core::ScanReporter;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

const TICK: Duration = Duration::from_millis(100);
const TICK_CHARS: &str = "◐◓◑◒ ";

/// Terminal reporter. Shows a spinner while the tree is read, then a bar
/// over the candidate files. Messages are printed above the active bar.
pub struct CliReporter {
    active: Mutex<Option<ProgressBar>>,
}

fn walk_spinner(root: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg} [{elapsed}]") {
        spinner.set_style(style.tick_chars(TICK_CHARS));
    }
    spinner.set_message(format!("Reading {}", root));
    spinner.enable_steady_tick(TICK);
    spinner
}

fn extract_bar(total: usize) -> ProgressBar {
    let bar = ProgressBar::new(total as u64);
    if let Ok(style) =
        ProgressStyle::with_template("  {bar:40.blue/white} {pos:>6}/{len:6} images  {per_sec}  eta {eta}")
    {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            active: Mutex::new(None),
        }
    }

    fn replace(&self, next: Option<ProgressBar>) {
        let mut active = self.active.lock().unwrap();
        if let Some(previous) = std::mem::replace(&mut *active, next) {
            previous.finish_and_clear();
        }
    }

    /// Clear whatever bar is still drawn.
    pub fn finish(&self) {
        self.replace(None);
    }
}

impl ScanReporter for CliReporter {
    fn log(&self, message: &str) {
        match self.active.lock().unwrap().as_ref() {
            Some(bar) => bar.println(message),
            None => eprintln!("{}", message),
        }
    }

    fn on_walk_start(&self, root: &str) {
        self.replace(Some(walk_spinner(root)));
    }

    fn on_walk_complete(&self, candidates: usize, duration_secs: f64) {
        self.replace(None);
        eprintln!(
            "Directory walk took {:.2}s, {} candidate images",
            duration_secs, candidates
        );
        self.replace(Some(extract_bar(candidates)));
    }

    fn progress(&self, current: usize, total: usize) {
        if let Some(bar) = self.active.lock().unwrap().as_ref() {
            bar.set_length(total as u64);
            bar.set_position(current as u64);
        }
    }
}

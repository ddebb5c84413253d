//! Progress reporting for the walk
//!
//! Provides real-time progress display using indicatif progress bars.

use console::style;
use humansize::{format_size, BINARY};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Running counters the driver accumulates between steps
#[derive(Debug, Default, Clone, Copy)]
pub struct WalkTally {
    /// Directories probed so far (successful listings)
    pub dirs: u64,

    /// Files discovered so far
    pub files: u64,

    /// Bytes accounted for (only populated when statting)
    pub bytes: u64,

    /// Probes that missed their deadline
    pub timeouts: u64,

    /// Probes that failed with an OS error
    pub errors: u64,

    /// Directories still waiting in the queue
    pub queue_size: usize,
}

impl WalkTally {
    /// Files discovered per second of elapsed wall time
    pub fn files_per_second(&self, elapsed: Duration) -> f64 {
        let secs = elapsed.as_secs_f64();
        if secs > 0.0 {
            self.files as f64 / secs
        } else {
            0.0
        }
    }
}

/// Progress reporter that displays walk status
pub struct ProgressReporter {
    /// Progress bar
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();

        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .expect("Invalid progress template")
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Update the progress display
    pub fn update(&self, tally: &WalkTally, elapsed: Duration) {
        let rate = tally.files_per_second(elapsed);

        let msg = format!(
            "Dirs: {} | Files: {} | Rate: {:.0}/s | Queue: {} | Timeouts: {} | Errors: {}",
            format_number(tally.dirs),
            format_number(tally.files),
            rate,
            tally.queue_size,
            format_number(tally.timeouts),
            format_number(tally.errors),
        );

        self.bar.set_message(msg);
    }

    /// Set a status message
    pub fn set_status(&self, status: &str) {
        self.bar.set_message(status.to_string());
    }

    /// Finish and clear the progress display
    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a number with thousands separators
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let bytes: Vec<_> = s.bytes().rev().collect();

    let chunks: Vec<String> = bytes
        .chunks(3)
        .map(|chunk| {
            chunk
                .iter()
                .rev()
                .map(|&b| b as char)
                .collect::<String>()
        })
        .collect();

    chunks.into_iter().rev().collect::<Vec<_>>().join(",")
}

/// Print a header at the start of the walk
pub fn print_header(root: &str, deadline: Duration, stat_files: bool) {
    println!();
    println!(
        "{} {}",
        style("impatient-walker").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", style("─".repeat(50)).dim());
    println!("  {} {}", style("Root:").bold(), root);
    println!(
        "  {} {} ns",
        style("Deadline:").bold(),
        format_number(deadline.as_nanos() as u64)
    );
    println!(
        "  {} {}",
        style("Stat files:").bold(),
        if stat_files { "yes" } else { "no" }
    );
    println!();
}

/// Print a summary of the walk results
pub fn print_summary(tally: &WalkTally, duration: Duration, complete: bool) {
    let duration_secs = duration.as_secs_f64();
    let rate = tally.files_per_second(duration);

    println!();
    if complete {
        println!("{}", style("Walk Complete").green().bold());
    } else {
        println!("{}", style("Walk Stopped Early").yellow().bold());
    }
    println!("{}", style("─".repeat(50)).dim());
    println!(
        "  {} {}",
        style("Directories:").bold(),
        format_number(tally.dirs)
    );
    println!("  {} {}", style("Files:").bold(), format_number(tally.files));
    if tally.bytes > 0 {
        println!(
            "  {} {}",
            style("Total Size:").bold(),
            format_size(tally.bytes, BINARY)
        );
    }
    println!(
        "  {} {:.1}s ({:.0} files/sec)",
        style("Duration:").bold(),
        duration_secs,
        rate
    );
    if tally.timeouts > 0 {
        println!(
            "  {} {}",
            style("Timeouts:").yellow().bold(),
            format_number(tally.timeouts)
        );
    }
    if tally.errors > 0 {
        println!(
            "  {} {}",
            style("Errors:").yellow().bold(),
            format_number(tally.errors)
        );
    }
    println!();
}

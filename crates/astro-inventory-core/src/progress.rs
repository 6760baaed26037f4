/// Sinks the scan engine reports into.
///
/// The CLI implements this with tracing/indicatif. Calls arrive on the worker
/// thread running the scan, so implementations must not block.
/// All methods have default no-op implementations.
pub trait ScanReporter: Send + Sync {
    /// User-facing message (fire-and-forget).
    fn log(&self, _message: &str) {}
    fn on_walk_start(&self, _root: &str) {}
    fn on_walk_complete(&self, _candidates: usize, _duration_secs: f64) {}
    /// Called every `progress_interval` candidates and on the last one.
    fn progress(&self, _current: usize, _total: usize) {}
}

/// No-op reporter for silent operation.
pub struct SilentReporter;

impl ScanReporter for SilentReporter {}

//! Progress tracking and callbacks for augmentation batches.
//!
//! A batch reports once per written sample. Callbacks see how many samples
//! are done, how many are expected and a time estimate for the rest.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Progress information for one batch step.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// Batch stage, e.g. `"spatial"` or `"intensity"`.
    pub stage: String,
    /// Samples written so far.
    pub completed: usize,
    /// Samples expected in the batch (if known).
    pub total: Option<usize>,
    /// Label of the sample just written.
    pub label: String,
    /// Time elapsed since start.
    pub elapsed: Duration,
    /// Estimated remaining time.
    pub estimated_remaining: Option<Duration>,
}

impl ProgressInfo {
    pub fn new(
        stage: impl Into<String>,
        completed: usize,
        total: Option<usize>,
        label: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            stage: stage.into(),
            completed,
            total,
            label: label.into(),
            elapsed,
            estimated_remaining: None,
        }
    }

    /// Calculate progress percentage.
    pub fn progress_percent(&self) -> Option<f64> {
        self.total
            .filter(|&total| total > 0)
            .map(|total| (self.completed as f64 / total as f64) * 100.0)
    }

    /// Calculate estimated remaining time from the mean time per sample.
    pub fn calculate_remaining(&mut self) {
        if let Some(total) = self.total {
            if self.completed > 0 {
                let per_sample = self.elapsed.as_secs_f64() / self.completed as f64;
                let remaining = total.saturating_sub(self.completed);
                self.estimated_remaining = Some(Duration::from_secs_f64(per_sample * remaining as f64));
            }
        }
    }
}

/// Progress callback trait for monitoring a batch.
pub trait ProgressCallback: Send + Sync {
    /// Called after each written sample.
    fn on_progress(&self, info: &ProgressInfo);

    fn on_start(&self, _stage: &str, _total: Option<usize>) {}

    fn on_complete(&self, _info: &ProgressInfo) {}

    fn on_error(&self, _error: &str) {}
}

/// Console progress callback that logs to tracing.
#[derive(Debug, Clone)]
pub struct ConsoleProgressCallback {
    /// Log every `log_interval` samples.
    pub log_interval: usize,
}

impl Default for ConsoleProgressCallback {
    fn default() -> Self {
        Self { log_interval: 25 }
    }
}

impl ConsoleProgressCallback {
    pub fn new(log_interval: usize) -> Self {
        Self {
            log_interval: log_interval.max(1),
        }
    }
}

impl ProgressCallback for ConsoleProgressCallback {
    fn on_progress(&self, info: &ProgressInfo) {
        if info.completed % self.log_interval == 0 || info.total == Some(info.completed) {
            let remaining = info
                .estimated_remaining
                .map(|d| format!("{:.2}s", d.as_secs_f64()))
                .unwrap_or_else(|| "N/A".to_string());

            tracing::info!(
                "{} {}/{} ({:.1}%) | {} | Elapsed: {:.2}s | ETA: {}",
                info.stage,
                info.completed,
                info.total.map(|n| n.to_string()).unwrap_or_else(|| "?".to_string()),
                info.progress_percent().unwrap_or(0.0),
                info.label,
                info.elapsed.as_secs_f64(),
                remaining
            );
        }
    }

    fn on_start(&self, stage: &str, total: Option<usize>) {
        tracing::info!(stage, total, "Augmentation started");
    }

    fn on_complete(&self, info: &ProgressInfo) {
        tracing::info!(
            "{} completed: {} samples in {:.2}s",
            info.stage,
            info.completed,
            info.elapsed.as_secs_f64()
        );
    }

    fn on_error(&self, error: &str) {
        tracing::error!("Augmentation failed: {}", error);
    }
}

/// History callback that records all progress information.
#[derive(Debug, Clone, Default)]
pub struct HistoryCallback {
    history: Arc<Mutex<Vec<ProgressInfo>>>,
}

impl HistoryCallback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the recorded history.
    pub fn get_history(&self) -> Vec<ProgressInfo> {
        lock(&self.history).clone()
    }

    pub fn clear(&self) {
        lock(&self.history).clear();
    }
}

impl ProgressCallback for HistoryCallback {
    fn on_progress(&self, info: &ProgressInfo) {
        lock(&self.history).push(info.clone());
    }
}

/// Fans progress events out to registered callbacks.
#[derive(Clone, Default)]
pub struct ProgressTracker {
    callbacks: Vec<Arc<dyn ProgressCallback>>,
    state: Arc<Mutex<TrackerState>>,
}

#[derive(Debug, Default)]
struct TrackerState {
    stage: String,
    total: Option<usize>,
    completed: usize,
    start_time: Option<Instant>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_callback(&mut self, callback: Arc<dyn ProgressCallback>) {
        self.callbacks.push(callback);
    }

    /// Start a stage with `total` expected samples.
    pub fn start(&self, stage: &str, total: Option<usize>) {
        {
            let mut state = lock(&self.state);
            state.stage = stage.to_string();
            state.total = total;
            state.completed = 0;
            state.start_time = Some(Instant::now());
        }
        for callback in &self.callbacks {
            callback.on_start(stage, total);
        }
    }

    /// Record one written sample.
    pub fn advance(&self, label: &str) {
        let mut info = {
            let mut state = lock(&self.state);
            state.completed += 1;
            self.info(&state, label)
        };
        info.calculate_remaining();

        for callback in &self.callbacks {
            callback.on_progress(&info);
        }
    }

    /// Drop one expected sample from the total without writing it.
    pub fn skip(&self) {
        let mut state = lock(&self.state);
        if let Some(total) = state.total.as_mut() {
            *total = total.saturating_sub(1);
        }
    }

    /// Finish the current stage.
    pub fn complete(&self) {
        let info = self.info(&lock(&self.state), "");
        for callback in &self.callbacks {
            callback.on_complete(&info);
        }
    }

    /// Report error.
    pub fn error(&self, error: &str) {
        for callback in &self.callbacks {
            callback.on_error(error);
        }
    }

    fn info(&self, state: &TrackerState, label: &str) -> ProgressInfo {
        let elapsed = state.start_time.map(|t| t.elapsed()).unwrap_or(Duration::ZERO);
        ProgressInfo::new(state.stage.clone(), state.completed, state.total, label, elapsed)
    }
}

//! Mock implementations of core port traits.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use face_overlay_core::domain::{Detection, OverlayReport};
use face_overlay_core::ports::{
    DetectorOptions, FaceDetector, ProgressEvent, ProgressSink, ReportOutput,
};

/// Scripted stand-in for the external detection capability.
///
/// Pops one queued outcome per call; with an empty queue it reports zero
/// faces. Tracks call counts so tests can assert that gated attempts never
/// reach the engine.
pub struct ScriptedDetector {
    outcomes: Arc<Mutex<VecDeque<Result<Vec<Detection>, String>>>>,
    calls: Arc<Mutex<usize>>,
}

impl ScriptedDetector {
    /// Creates a detector with no scripted outcomes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    /// Queues a successful outcome.
    pub fn push_success(&self, detections: Vec<Detection>) {
        self.outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Ok(detections));
    }

    /// Queues a failing outcome.
    pub fn push_failure(&self, message: &str) {
        self.outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Err(message.to_string()));
    }

    /// Returns how many times the engine was invoked.
    #[must_use]
    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ScriptedDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl FaceDetector for ScriptedDetector {
    fn detect_faces(
        &self,
        _image: &image::DynamicImage,
        _options: &DetectorOptions,
    ) -> anyhow::Result<Vec<Detection>> {
        if let Ok(mut calls) = self.calls.lock() {
            *calls += 1;
        }

        let outcome = self
            .outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        match outcome {
            Some(Ok(detections)) => Ok(detections),
            Some(Err(message)) => Err(anyhow::anyhow!(message)),
            None => Ok(Vec::new()),
        }
    }
}

/// Mock implementation of `ReportOutput` for testing.
///
/// Captures reports for later assertions.
pub struct MockReportOutput {
    reports: Arc<Mutex<Vec<OverlayReport>>>,
    flush_count: Arc<Mutex<usize>>,
}

impl MockReportOutput {
    /// Creates a new mock output.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reports: Arc::new(Mutex::new(Vec::new())),
            flush_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Returns all captured reports.
    #[must_use]
    pub fn reports(&self) -> Vec<OverlayReport> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of times `flush()` was called.
    #[must_use]
    pub fn flush_count(&self) -> usize {
        *self
            .flush_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockReportOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportOutput for MockReportOutput {
    fn write(&self, report: &OverlayReport) -> anyhow::Result<()> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(report.clone());
        Ok(())
    }

    fn flush(&self) -> anyhow::Result<()> {
        if let Ok(mut c) = self.flush_count.lock() {
            *c += 1;
        }
        Ok(())
    }
}

/// Mock implementation of `ProgressSink` for testing.
///
/// Captures events for later assertions.
pub struct MockProgressSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl MockProgressSink {
    /// Creates a new mock progress sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns all captured events.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of `Started` events.
    #[must_use]
    pub fn started_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Started { .. }))
            .count()
    }

    /// Returns the number of `Completed` events.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Completed { .. }))
            .count()
    }

    /// Returns the number of `Skipped` events.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Skipped { .. }))
            .count()
    }

    /// Returns the final counts from the `Finished` event, if any.
    #[must_use]
    pub fn finished_counts(&self) -> Option<(usize, usize)> {
        self.events().iter().find_map(|e| match e {
            ProgressEvent::Finished { processed, skipped } => Some((*processed, *skipped)),
            _ => None,
        })
    }
}

impl Default for MockProgressSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for MockProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

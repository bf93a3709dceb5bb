// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use crate::engine::pipeline::PipelineState;
use tracing::info;

/// One progress notification from a running pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    stage: PipelineState,
    percent: u8,
    message: String,
}

impl ProgressEvent {
    #[inline]
    pub fn new(stage: PipelineState, percent: u8, message: impl Into<String>) -> Self {
        Self {
            stage,
            percent: percent.min(100),
            message: message.into(),
        }
    }

    #[inline]
    pub fn stage(&self) -> PipelineState {
        self.stage
    }

    #[inline]
    pub fn percent(&self) -> u8 {
        self.percent
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} {}%] {}", self.stage, self.percent, self.message)
    }
}

/// Receiver for pipeline progress.
///
/// Implementations must be cheap; they are called from inside stage
/// loops.
pub trait ProgressSink {
    fn report(&mut self, event: ProgressEvent);
}

/// Swallows every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    #[inline]
    fn report(&mut self, _event: ProgressEvent) {}
}

/// Forwards every event to the tracing subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgressSink;

impl ProgressSink for LogProgressSink {
    fn report(&mut self, event: ProgressEvent) {
        info!(
            stage = %event.stage(),
            percent = event.percent(),
            "{}",
            event.message()
        );
    }
}

/// Fans every event out to a list of sinks, in insertion order.
#[derive(Default)]
pub struct CompositeProgressSink {
    sinks: Vec<Box<dyn ProgressSink>>,
}

impl CompositeProgressSink {
    #[inline]
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    #[inline]
    pub fn with<S: ProgressSink + 'static>(mut self, sink: S) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    #[inline]
    pub fn push<S: ProgressSink + 'static>(&mut self, sink: S) {
        self.sinks.push(Box::new(sink));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl ProgressSink for CompositeProgressSink {
    fn report(&mut self, event: ProgressEvent) {
        for sink in &mut self.sinks {
            sink.report(event.clone());
        }
    }
}

/// Per-stage progress reporter that keeps percentages monotonic.
///
/// A stage that stops early must not report a lower percentage than it
/// already announced, so emitted values only ever ratchet upwards.
pub struct StageProgress<'a> {
    sink: &'a mut dyn ProgressSink,
    stage: PipelineState,
    last_percent: u8,
}

impl<'a> StageProgress<'a> {
    #[inline]
    pub fn new(sink: &'a mut dyn ProgressSink, stage: PipelineState) -> Self {
        Self {
            sink,
            stage,
            last_percent: 0,
        }
    }

    #[inline]
    pub fn stage(&self) -> PipelineState {
        self.stage
    }

    /// Reports `done` out of `total` steps. An empty stage counts as
    /// finished.
    pub fn emit(&mut self, done: usize, total: usize, message: impl Into<String>) {
        let percent = if total == 0 {
            100
        } else {
            ((done * 100) / total).min(100) as u8
        };
        self.last_percent = self.last_percent.max(percent);
        self.sink
            .report(ProgressEvent::new(self.stage, self.last_percent, message));
    }

    #[inline]
    pub fn finish(&mut self, message: impl Into<String>) {
        self.emit(1, 1, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use static_assertions::assert_obj_safe;

    assert_obj_safe!(ProgressSink);

    #[derive(Debug, Default)]
    struct RecordingSink {
        events: Vec<ProgressEvent>,
    }

    impl ProgressSink for RecordingSink {
        fn report(&mut self, event: ProgressEvent) {
            self.events.push(event);
        }
    }

    #[test]
    fn test_event_percent_is_capped() {
        let event = ProgressEvent::new(PipelineState::RunningGa, 250, "x");
        assert_eq!(event.percent(), 100);
    }

    #[test]
    fn test_display_format() {
        let event = ProgressEvent::new(PipelineState::RunningGa, 40, "generation 12/30");
        assert_eq!(event.to_string(), "[RunningGa 40%] generation 12/30");
    }

    #[test]
    fn test_stage_progress_never_regresses() {
        let mut sink = RecordingSink::default();
        let mut progress = StageProgress::new(&mut sink, PipelineState::RunningAlns);
        progress.emit(5, 10, "a");
        progress.emit(2, 10, "b");
        progress.emit(9, 10, "c");
        let percents: Vec<u8> = sink.events.iter().map(|e| e.percent()).collect();
        assert_eq!(percents, vec![50, 50, 90]);
    }

    #[test]
    fn test_empty_stage_counts_as_finished() {
        let mut sink = RecordingSink::default();
        let mut progress = StageProgress::new(&mut sink, PipelineState::BuildingGraph);
        progress.emit(0, 0, "nothing to do");
        assert_eq!(sink.events[0].percent(), 100);
    }

    #[test]
    fn test_finish_reports_hundred() {
        let mut sink = RecordingSink::default();
        let mut progress = StageProgress::new(&mut sink, PipelineState::RunningTabu);
        progress.finish("done");
        assert_eq!(sink.events[0].percent(), 100);
    }

    #[test]
    fn test_composite_fans_out_to_every_sink() {
        use std::sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        };

        #[derive(Debug, Clone)]
        struct CountingSink(Arc<AtomicUsize>);

        impl ProgressSink for CountingSink {
            fn report(&mut self, _event: ProgressEvent) {
                self.0.fetch_add(1, Ordering::Relaxed);
            }
        }

        let hits = Arc::new(AtomicUsize::new(0));
        let mut composite = CompositeProgressSink::new()
            .with(CountingSink(hits.clone()))
            .with(CountingSink(hits.clone()));
        assert_eq!(composite.len(), 2);
        composite.report(ProgressEvent::new(PipelineState::RunningGa, 10, "x"));
        assert_eq!(hits.load(Ordering::Relaxed), 2);
    }
}

use std::collections::BTreeMap;
use std::time::Instant;

/// Observer for session events: per-stage timings, per-frame metrics and
/// an end-of-session report.
///
/// Use cases report through this trait so the CLI can print a summary
/// while tests stay silent.
pub trait PipelineLogger {
    /// Called once per fully presented frame.
    fn frame_done(&mut self, frame_number: usize);

    /// How long a named stage (`detect`, `effect`, `present`) took for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// A point-in-time value, e.g. the number of regions in a frame.
    fn metric(&mut self, name: &str, value: f64);

    fn info(&mut self, message: &str);

    /// Emits the end-of-session summary. Default: no-op.
    fn summary(&self) {}
}

/// Discards everything.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn frame_done(&mut self, _frame_number: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Running count, sum and peak of one series of samples.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SampleStats {
    pub count: usize,
    pub total: f64,
    pub max: f64,
}

impl SampleStats {
    fn add(&mut self, value: f64) {
        self.count += 1;
        self.total += value;
        self.max = if self.count == 1 {
            value
        } else {
            self.max.max(value)
        };
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }
}

/// Accumulates stage timings and metrics and logs a summary through `log`
/// when the session ends.
///
/// Frame progress is logged every `throttle_frames` frames.
pub struct StdoutPipelineLogger {
    throttle_frames: usize,
    stages: BTreeMap<String, SampleStats>,
    metrics: BTreeMap<String, SampleStats>,
    started: Instant,
    frames: usize,
}

impl StdoutPipelineLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            stages: BTreeMap::new(),
            metrics: BTreeMap::new(),
            started: Instant::now(),
            frames: 0,
        }
    }

    pub fn stage(&self, stage: &str) -> Option<SampleStats> {
        self.stages.get(stage).copied()
    }

    pub fn metric_stats(&self, name: &str) -> Option<SampleStats> {
        self.metrics.get(name).copied()
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    /// `None` when nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.stages.is_empty() && self.metrics.is_empty() {
            return None;
        }
        let elapsed = self.started.elapsed().as_secs_f64();
        let mut out = format!("Session summary ({} frames, {elapsed:.1}s):", self.frames);

        for (stage, s) in &self.stages {
            out.push_str(&format!(
                "\n  {stage:8} avg {:6.1}ms  max {:6.1}ms  total {:7.0}ms",
                s.mean(),
                s.max,
                s.total
            ));
        }
        for (name, s) in &self.metrics {
            out.push_str(&format!("\n  {name}: avg {:.1}, max {:.0}", s.mean(), s.max));
        }
        if self.frames > 0 && elapsed > 0.0 {
            out.push_str(&format!(
                "\n  Throughput: {:.1} fps",
                self.frames as f64 / elapsed
            ));
        }
        Some(out)
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new(100)
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn frame_done(&mut self, frame_number: usize) {
        self.frames = self.frames.max(frame_number + 1);
        if self.frames % self.throttle_frames == 0 {
            log::info!("Presented {} frames", self.frames);
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.stages
            .entry(stage.to_string())
            .or_default()
            .add(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics.entry(name.to_string()).or_default().add(value);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

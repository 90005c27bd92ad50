//! Pipeline execution context
//!
//! One [`PipelineContext`] accompanies a run from source to publisher. It
//! names the run, times each stage and collects a few headline figures
//! that are logged when the run finishes.

use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{info, info_span};
use uuid::Uuid;

/// A headline figure attached to a run
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    Count(usize),
    Number(f64),
    Text(String),
}

impl MetaValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            MetaValue::Number(x) => Some(*x),
            MetaValue::Count(n) => Some(*n as f64),
            MetaValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetaValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Count(n) => write!(f, "{n}"),
            MetaValue::Number(x) => write!(f, "{x}"),
            MetaValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<usize> for MetaValue {
    fn from(n: usize) -> Self {
        MetaValue::Count(n)
    }
}

impl From<u64> for MetaValue {
    fn from(n: u64) -> Self {
        MetaValue::Count(n as usize)
    }
}

impl From<f64> for MetaValue {
    fn from(x: f64) -> Self {
        MetaValue::Number(x)
    }
}

impl From<&str> for MetaValue {
    fn from(s: &str) -> Self {
        MetaValue::Text(s.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(s: String) -> Self {
        MetaValue::Text(s)
    }
}

/// Context that flows through one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineContext {
    pub run_id: Uuid,
    /// Name of the analysis, also the prefix of the manifest's run label
    pub name: String,
    pub start_time: Instant,
    /// Headline figures, ordered by key
    pub metadata: BTreeMap<String, MetaValue>,
    /// Stage timings in execution order
    stage_timings: Vec<(String, Duration)>,
}

impl PipelineContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_run_id(name, Uuid::new_v4())
    }

    /// Context with a fixed run id, for reproducible manifests
    pub fn with_run_id(name: impl Into<String>, run_id: Uuid) -> Self {
        Self {
            run_id,
            name: name.into(),
            start_time: Instant::now(),
            metadata: BTreeMap::new(),
            stage_timings: Vec::new(),
        }
    }

    /// `"{name}-{run_id}"`
    pub fn label(&self) -> String {
        format!("{}-{}", self.name, self.run_id)
    }

    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<MetaValue>) {
        self.metadata.insert(key.into(), value.into());
    }

    pub fn get_metadata(&self, key: &str) -> Option<&MetaValue> {
        self.metadata.get(key)
    }

    /// Run one stage inside a tracing span, logging a banner and recording its duration
    ///
    /// The closure's result is returned untouched, so `?` on the call site
    /// aborts the run on the first failing stage.
    pub fn stage<F, R>(&mut self, stage: impl Into<String>, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let stage = stage.into();
        let span = info_span!("stage", run = %self.name, stage = %stage);
        let _guard = span.enter();
        info!("==> {stage}");
        let started = Instant::now();
        let result = f();
        self.stage_timings.push((stage, started.elapsed()));
        result
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn stage_timings(&self) -> &[(String, Duration)] {
        &self.stage_timings
    }

    /// Names of the stages run so far
    pub fn stages(&self) -> Vec<&str> {
        self.stage_timings.iter().map(|(s, _)| s.as_str()).collect()
    }

    /// Log per-stage timings, the headline figures and the total; returns the total
    pub fn finish(&self) -> Duration {
        let elapsed = self.elapsed();
        for (stage, duration) in &self.stage_timings {
            info!(run = %self.name, stage = %stage, elapsed_ms = duration.as_secs_f64() * 1e3, "stage timing");
        }
        for (key, value) in &self.metadata {
            info!(run = %self.name, "{key}: {value}");
        }
        info!(
            run = %self.name,
            run_id = %self.run_id,
            stages = self.stage_timings.len(),
            elapsed_ms = elapsed.as_secs_f64() * 1e3,
            "run complete"
        );
        elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_context() {
        let ctx = PipelineContext::new("supply_chain");
        assert_eq!(ctx.name, "supply_chain");
        assert!(ctx.metadata.is_empty());
        assert!(ctx.stages().is_empty());
    }

    #[test]
    fn test_label_uses_run_id() {
        let id = Uuid::new_v4();
        let ctx = PipelineContext::with_run_id("journey", id);
        assert_eq!(ctx.run_id, id);
        assert_eq!(ctx.label(), format!("journey-{id}"));
    }

    #[test]
    fn test_stages_recorded_even_when_they_fail() {
        let mut ctx = PipelineContext::new("test");

        let loaded = ctx.stage("source", || {
            std::thread::sleep(Duration::from_millis(10));
            42
        });
        let rendered: Result<(), String> = ctx.stage("render", || Err("boom".to_string()));

        assert_eq!(loaded, 42);
        assert!(rendered.is_err());
        assert_eq!(ctx.stages(), vec!["source", "render"]);
        assert!(ctx.stage_timings()[0].1 >= Duration::from_millis(10));
        assert!(ctx.finish() >= Duration::from_millis(10));
    }

    #[test]
    fn test_headline_figures() {
        let mut ctx = PipelineContext::new("test");
        ctx.set_metadata("rows", 50usize);
        ctx.set_metadata("seed", 42u64);
        ctx.set_metadata("average", 74.06);
        ctx.set_metadata("focus", "Marketing");

        assert_eq!(ctx.get_metadata("rows"), Some(&MetaValue::Count(50)));
        assert_eq!(ctx.get_metadata("seed").and_then(MetaValue::as_number), Some(42.0));
        assert_eq!(ctx.get_metadata("average").map(ToString::to_string), Some("74.06".to_string()));
        assert_eq!(ctx.get_metadata("focus").and_then(MetaValue::as_text), Some("Marketing"));
        assert!(ctx.get_metadata("missing").is_none());
    }
}

use std::{future::Future, time::Instant};

use samples_client::{
    domain::{AggregationLevel, Query, Sample},
    SamplesApi,
};
use serde::Deserialize;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    format::format_summary,
    pipeline::{Pipeline, PipelineError},
    sinks::EnergyTotalsSink,
    sources::ApiSamplesSource,
};

/// What to do when one aggregation level fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop at the first failure and cancel the remaining levels.
    #[default]
    Abort,
    /// Emit every level that succeeds, then fail the run.
    ReportPartial,
}

#[derive(Debug)]
pub struct LevelOutcome {
    pub level: AggregationLevel,
    pub result: Result<String, PipelineError>,
}

/// Fan-in of per-level tasks, delivered in completion order.
pub struct Completions {
    rx: mpsc::Receiver<LevelOutcome>,
    handles: Vec<JoinHandle<()>>,
    pending: Vec<AggregationLevel>,
}

impl Completions {
    /// Spawn one task per level running `work`. The channel holds one slot per
    /// task so no sender ever waits on the consumer.
    pub fn spawn<F, Fut>(levels: &[AggregationLevel], work: F) -> Self
    where
        F: Fn(AggregationLevel) -> Fut,
        Fut: Future<Output = Result<String, PipelineError>> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(levels.len().max(1));

        let handles = levels
            .iter()
            .map(|&level| {
                let tx = tx.clone();
                let task = work(level);

                tokio::spawn(async move {
                    let started = Instant::now();
                    let result = task.await;
                    let elapsed_ms = started.elapsed().as_millis() as u64;

                    match &result {
                        Ok(_) => {
                            metrics::counter!("summary_levels_completed_total").increment(1);
                            tracing::info!(level = %level, elapsed_ms, "aggregation level completed");
                        }
                        Err(e) => {
                            metrics::counter!("summary_levels_failed_total").increment(1);
                            tracing::error!(level = %level, elapsed_ms, error = %e, "aggregation level failed");
                        }
                    }

                    let _ = tx.send(LevelOutcome { level, result }).await;
                })
            })
            .collect();

        Self {
            rx,
            handles,
            pending: levels.to_vec(),
        }
    }

    /// Next finished level, or `None` once every spawned level has reported.
    ///
    /// A task that dies without reporting (panic, abort) is surfaced as a
    /// `PipelineError::Task` for one of the levels still pending.
    pub async fn next(&mut self) -> Option<LevelOutcome> {
        if self.pending.is_empty() {
            return None;
        }

        match self.rx.recv().await {
            Some(outcome) => {
                if let Some(idx) = self.pending.iter().position(|l| *l == outcome.level) {
                    self.pending.remove(idx);
                }
                Some(outcome)
            }
            None => {
                let level = self.pending.remove(0);
                Some(LevelOutcome {
                    level,
                    result: Err(PipelineError::Task(format!(
                        "{level} task exited without reporting"
                    ))),
                })
            }
        }
    }

    pub fn abort(&self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}

impl Drop for Completions {
    fn drop(&mut self) {
        self.abort();
    }
}

/// Runs fetch, aggregate and format for every aggregation level concurrently.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    api: SamplesApi,
}

impl Orchestrator {
    pub fn new(api: SamplesApi) -> Self {
        Self { api }
    }

    pub fn spawn(&self, base: &Query, levels: &[AggregationLevel]) -> Completions {
        Completions::spawn(levels, |level| {
            summarize_level(self.api.clone(), base.for_level(level))
        })
    }

    /// Hands each summary line to `emit` as soon as its level finishes and
    /// returns all lines in the same completion order.
    pub async fn run<F>(
        &self,
        base: &Query,
        levels: &[AggregationLevel],
        policy: FailurePolicy,
        emit: F,
    ) -> Result<Vec<String>, PipelineError>
    where
        F: FnMut(&str),
    {
        collect_completions(self.spawn(base, levels), levels.len(), policy, emit).await
    }
}

pub async fn summarize_level(api: SamplesApi, query: Query) -> Result<String, PipelineError> {
    let level = query.aggregation_level;
    let pipeline: Pipeline<_, Sample, _> =
        Pipeline::new(ApiSamplesSource::new(api, query), EnergyTotalsSink);
    let result = pipeline.run().await?;
    Ok(format_summary(&result, level))
}

/// Drains `completions` under `policy`.
pub async fn collect_completions<F>(
    mut completions: Completions,
    total: usize,
    policy: FailurePolicy,
    mut emit: F,
) -> Result<Vec<String>, PipelineError>
where
    F: FnMut(&str),
{
    let mut lines = Vec::with_capacity(total);
    let mut failed = 0usize;

    while let Some(outcome) = completions.next().await {
        match outcome.result {
            Ok(line) => {
                emit(&line);
                lines.push(line);
            }
            Err(e) => match policy {
                FailurePolicy::Abort => {
                    completions.abort();
                    return Err(e);
                }
                FailurePolicy::ReportPartial => {
                    tracing::warn!(level = %outcome.level, error = %e, "skipping failed aggregation level");
                    failed += 1;
                }
            },
        }
    }

    if failed > 0 {
        return Err(PipelineError::Incomplete { failed, total });
    }

    Ok(lines)
}

use std::time::SystemTime;

use futures::StreamExt;
use samples_client::domain::{AggregationResult, Sample};

use crate::aggregate::accumulate;
use crate::pipeline::{Envelope, PipelineError, Sink};

/// Reduces a sample stream into per-sensor energy totals.
///
/// The first upstream error aborts the reduction; a partial total is never
/// reported. Records how long the oldest envelope waited before the reduction
/// finished.
#[derive(Clone, Default)]
pub struct EnergyTotalsSink;

#[async_trait::async_trait]
impl Sink<Sample> for EnergyTotalsSink {
    type Output = AggregationResult;

    async fn run<S>(&self, mut input: S) -> Result<AggregationResult, PipelineError>
    where
        S: futures::Stream<Item = Result<Envelope<Sample>, PipelineError>> + Send + Unpin + 'static,
    {
        let mut result = AggregationResult::default();
        let mut oldest: Option<SystemTime> = None;

        while let Some(item) = input.next().await {
            let env = match item {
                Ok(env) => env,
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        consumed = result.count,
                        "error in upstream pipeline for EnergyTotalsSink"
                    );
                    return Err(e);
                }
            };

            oldest = Some(oldest.map_or(env.received_at, |t| t.min(env.received_at)));
            accumulate(&mut result, &env.payload);
        }

        if let Some(oldest) = oldest {
            // a clock step backwards makes elapsed() fail; report zero then
            let lag = oldest.elapsed().unwrap_or_default();
            metrics::histogram!("summary_sink_lag_seconds").record(lag.as_secs_f64());
            tracing::debug!(samples = result.count, lag_ms = lag.as_millis() as u64, "energy totals reduced");
        }

        Ok(result)
    }
}

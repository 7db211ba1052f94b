use samples_client::domain::{AggregationResult, Sample, TOTAL_KEY};

/// Fold one sample into a running result.
///
/// Every energy reading is added to its sensor key and to `total`. Power
/// readings are not part of the summary.
pub fn accumulate(result: &mut AggregationResult, sample: &Sample) {
    for reading in &sample.energy {
        *result.totals.entry(reading.sensor_id.clone()).or_insert(0.0) += reading.value;
        *result.totals.entry(TOTAL_KEY.to_string()).or_insert(0.0) += reading.value;
    }
    result.count += 1;
}

pub fn aggregate<'a, I>(samples: I) -> AggregationResult
where
    I: IntoIterator<Item = &'a Sample>,
{
    samples
        .into_iter()
        .fold(AggregationResult::default(), |mut result, sample| {
            accumulate(&mut result, sample);
            result
        })
}

use chrono::{DateTime, Duration, DurationRound, RoundingError, Utc};
use std::collections::BTreeMap;

/// Width of the buckets the power and charge series are averaged over.
pub fn resample_width() -> Duration {
    Duration::minutes(10)
}

/// Group `samples` into half-open buckets of `width` and average each one.
///
/// Buckets start at multiples of `width` since the Unix epoch in UTC, whatever offset the
/// samples were reported in. Buckets without samples produce no row. Rows are ordered by
/// bucket start regardless of the order of `samples`.
///
/// Fails when a timestamp cannot be truncated to `width`, i.e. lies beyond the nanosecond
/// range chrono can round.
pub fn resample_mean<I>(samples: I, width: Duration) -> Result<Vec<(DateTime<Utc>, f64)>, RoundingError>
where
    I: IntoIterator<Item = (DateTime<Utc>, f64)>,
{
    let mut buckets: BTreeMap<DateTime<Utc>, (f64, u32)> = BTreeMap::new();

    for (timestamp, value) in samples {
        let start = timestamp.duration_trunc(width)?;
        let (sum, count) = buckets.entry(start).or_insert((0.0, 0));
        *sum += value;
        *count += 1;
    }

    Ok(buckets
        .into_iter()
        .map(|(start, (sum, count))| (start, sum / f64::from(count)))
        .collect())
}

/// Mean of the most recent bucket holding at least one sample.
pub fn last_mean<I>(samples: I, width: Duration) -> Result<Option<f64>, RoundingError>
where
    I: IntoIterator<Item = (DateTime<Utc>, f64)>,
{
    Ok(resample_mean(samples, width)?.last().map(|(_, mean)| *mean))
}

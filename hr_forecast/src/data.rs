//! Heart-rate sample loading and fixed-interval resampling

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Naive timestamp layouts accepted besides RFC 3339, read as UTC
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// A single heart-rate observation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeartRateSample {
    pub datetime: DateTime<Utc>,
    pub heart_rate: f64,
}

#[derive(Debug, Deserialize)]
struct RawSample {
    datetime: String,
    heart_rate: f64,
}

/// Data loader for heart-rate samples
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load samples from a CSV file with `datetime` and `heart_rate` columns
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<HeartRateSample>> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load samples from any CSV source, sorted by time
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<HeartRateSample>> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut samples = Vec::new();

        for (row, record) in csv_reader.deserialize::<RawSample>().enumerate() {
            let raw = record?;
            let datetime = parse_datetime(&raw.datetime).ok_or_else(|| {
                ForecastError::DataError(format!(
                    "Row {}: unrecognized datetime '{}'",
                    row + 1,
                    raw.datetime
                ))
            })?;
            if !raw.heart_rate.is_finite() {
                return Err(ForecastError::DataError(format!(
                    "Row {}: heart rate is not a finite number",
                    row + 1
                )));
            }
            samples.push(HeartRateSample {
                datetime,
                heart_rate: raw.heart_rate,
            });
        }

        samples.sort_by_key(|s| s.datetime);
        Ok(samples)
    }
}

/// Parse an RFC 3339 timestamp, or a naive one interpreted as UTC
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Regularly spaced heart-rate series
#[derive(Debug, Clone, PartialEq)]
pub struct HeartRateSeries {
    start: DateTime<Utc>,
    interval_secs: i64,
    values: Vec<f64>,
}

impl HeartRateSeries {
    /// Create a series from its first timestamp, spacing and values
    pub fn new(start: DateTime<Utc>, interval_secs: i64, values: Vec<f64>) -> Result<Self> {
        if interval_secs <= 0 {
            return Err(ForecastError::InvalidParameter(format!(
                "Interval must be positive, got {} seconds",
                interval_secs
            )));
        }
        if values.is_empty() {
            return Err(ForecastError::DataError("Empty heart-rate series".to_string()));
        }

        Ok(Self {
            start,
            interval_secs,
            values,
        })
    }

    /// Bucket samples into `interval_secs` slots aligned to the Unix epoch,
    /// average each slot and forward-fill empty ones
    pub fn resample(samples: &[HeartRateSample], interval_secs: i64) -> Result<Self> {
        if interval_secs <= 0 {
            return Err(ForecastError::InvalidParameter(format!(
                "Interval must be positive, got {} seconds",
                interval_secs
            )));
        }

        let bucket_of = |s: &HeartRateSample| s.datetime.timestamp().div_euclid(interval_secs);

        let first = samples.iter().map(bucket_of).min();
        let last = samples.iter().map(bucket_of).max();
        let (first, last) = match (first, last) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Err(ForecastError::DataError(
                    "No samples to resample".to_string(),
                ))
            }
        };

        let slots = (last - first + 1) as usize;
        let mut sums = vec![0.0; slots];
        let mut counts = vec![0usize; slots];
        for sample in samples {
            let slot = (bucket_of(sample) - first) as usize;
            sums[slot] += sample.heart_rate;
            counts[slot] += 1;
        }

        let mut values = Vec::with_capacity(slots);
        let mut previous = f64::NAN;
        for (sum, count) in sums.into_iter().zip(counts) {
            if count > 0 {
                previous = sum / count as f64;
            }
            values.push(previous);
        }

        let start = Utc
            .timestamp_opt(first * interval_secs, 0)
            .single()
            .ok_or_else(|| ForecastError::DataError("Series start out of range".to_string()))?;

        Self::new(start, interval_secs, values)
    }

    /// Timestamp of the first value
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start
    }

    /// Timestamp of the last value
    pub fn end_time(&self) -> DateTime<Utc> {
        self.start + self.interval() * (self.values.len() as i32 - 1)
    }

    /// Spacing between values
    pub fn interval(&self) -> Duration {
        Duration::seconds(self.interval_secs)
    }

    pub fn interval_secs(&self) -> i64 {
        self.interval_secs
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Timestamp of every value
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        (0..self.values.len())
            .map(|i| self.start + self.interval() * i as i32)
            .collect()
    }
}

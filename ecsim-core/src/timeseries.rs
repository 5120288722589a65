//! Scalar types and tabulated time profiles
//!
//! [`Timeseries`] holds a strictly increasing time axis with one value per time
//! and interpolates linearly between them. It backs the tabulated current
//! profile in [`crate::functions`].

use crate::errors::{ECSimError, ECSimResult};
use log::trace;
use serde::{Deserialize, Serialize};

pub type FloatValue = f64;
pub type Time = f64;

/// A tabulated profile with piecewise-linear interpolation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTimeseries")]
pub struct Timeseries {
    times: Vec<Time>,
    values: Vec<FloatValue>,
    /// Hold the end values outside the time axis instead of failing
    extrapolate: bool,
}

/// Unvalidated form used when deserialising
#[derive(Deserialize)]
struct RawTimeseries {
    times: Vec<Time>,
    values: Vec<FloatValue>,
    #[serde(default)]
    extrapolate: bool,
}

impl TryFrom<RawTimeseries> for Timeseries {
    type Error = ECSimError;

    fn try_from(raw: RawTimeseries) -> ECSimResult<Self> {
        Self::from_values(raw.times, raw.values, raw.extrapolate)
    }
}

impl Timeseries {
    /// Build a timeseries from matching time and value vectors.
    ///
    /// Fails if the vectors are empty, differ in length, contain non-finite
    /// entries or if the time axis is not strictly increasing.
    pub fn from_values(
        times: Vec<Time>,
        values: Vec<FloatValue>,
        extrapolate: bool,
    ) -> ECSimResult<Self> {
        if times.is_empty() {
            return Err(ECSimError::InvalidCurrentFunction(
                "tabulated profile has no points".to_string(),
            ));
        }
        if times.len() != values.len() {
            return Err(ECSimError::InvalidCurrentFunction(format!(
                "tabulated profile has {} times but {} values",
                times.len(),
                values.len()
            )));
        }
        if times.iter().chain(values.iter()).any(|x| !x.is_finite()) {
            return Err(ECSimError::InvalidCurrentFunction(
                "tabulated profile contains non-finite entries".to_string(),
            ));
        }
        if times.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ECSimError::InvalidCurrentFunction(
                "tabulated times must be strictly increasing".to_string(),
            ));
        }

        Ok(Self {
            times,
            values,
            extrapolate,
        })
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[Time] {
        &self.times
    }

    pub fn values(&self) -> &[FloatValue] {
        &self.values
    }

    /// Interpolated value at `time`
    ///
    /// Fails with [`ECSimError::NonFiniteTime`] for NaN or infinite `time`.
    pub fn at_time(&self, time: Time) -> ECSimResult<FloatValue> {
        if !time.is_finite() {
            return Err(ECSimError::NonFiniteTime(time));
        }
        let first = self.times[0];
        let last = self.times[self.times.len() - 1];

        if !(first..=last).contains(&time) {
            if !self.extrapolate {
                return Err(ECSimError::ExtrapolationNotAllowed(time, first, last));
            }
            trace!("Holding end value for t={} outside [{}, {}]", time, first, last);
            return Ok(if time < first {
                self.values[0]
            } else {
                self.values[self.values.len() - 1]
            });
        }

        // Index of the first time strictly greater than `time`
        let upper = self.times.partition_point(|&t| t <= time);
        if upper == self.times.len() {
            return Ok(self.values[upper - 1]);
        }
        let lower = upper - 1;

        let (t0, t1) = (self.times[lower], self.times[upper]);
        let (v0, v1) = (self.values[lower], self.values[upper]);
        let fraction = (time - t0) / (t1 - t0);
        Ok(v0 + fraction * (v1 - v0))
    }
}

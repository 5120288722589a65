//! Current functions
//!
//! A [`CurrentFunction`] is the factory stored under a function parameter (for
//! example `"Current function"`) in a [`ParameterValues`](crate::parameter_values::ParameterValues)
//! table. Generating it produces a [`TimeFunction`], the callable that is bound into
//! a processed expression.
//!
//! The set of factory kinds is closed. Profiles that none of the built-in kinds cover
//! are supplied through [`CurrentFunction::UserDefined`] with any type that
//! implements [`TimeFunction`]:
//!
//! ```rust
//! use ecsim_core::errors::ECSimResult;
//! use ecsim_core::functions::{CurrentFunction, TimeFunction};
//! use ecsim_core::timeseries::{FloatValue, Time};
//! use serde::{Deserialize, Serialize};
//! use std::sync::Arc;
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct Pulse {
//!     period: Time,
//! }
//!
//! #[typetag::serde]
//! impl TimeFunction for Pulse {
//!     fn evaluate(&self, t: Time) -> ECSimResult<FloatValue> {
//!         Ok(if (t / self.period).fract() < 0.5 { 1.0 } else { 0.0 })
//!     }
//! }
//!
//! let factory = CurrentFunction::user_defined(Arc::new(Pulse { period: 10.0 }));
//! let f = factory.generate().unwrap();
//! assert_eq!(f.evaluate(2.0).unwrap(), 1.0);
//! assert_eq!(f.evaluate(7.0).unwrap(), 0.0);
//! ```

use crate::errors::{ECSimError, ECSimResult};
use crate::timeseries::{FloatValue, Time, Timeseries};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt::Debug;
use std::sync::Arc;

/// A scalar function of time
#[typetag::serde(tag = "type")]
pub trait TimeFunction: Debug + Send + Sync {
    fn evaluate(&self, t: Time) -> ECSimResult<FloatValue>;
}

/// `f(t) = current`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantCurrent {
    current: FloatValue,
}

impl ConstantCurrent {
    pub fn new(current: FloatValue) -> Self {
        Self { current }
    }
}

#[typetag::serde]
impl TimeFunction for ConstantCurrent {
    fn evaluate(&self, _t: Time) -> ECSimResult<FloatValue> {
        Ok(self.current)
    }
}

/// `f(t) = amplitude * sin(2π * frequency * t)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SinusoidalCurrent {
    amplitude: FloatValue,
    /// unit: 1 / time unit of the argument
    frequency: FloatValue,
}

impl SinusoidalCurrent {
    pub fn new(amplitude: FloatValue, frequency: FloatValue) -> Self {
        Self {
            amplitude,
            frequency,
        }
    }
}

#[typetag::serde]
impl TimeFunction for SinusoidalCurrent {
    fn evaluate(&self, t: Time) -> ECSimResult<FloatValue> {
        Ok(self.amplitude * (2.0 * PI * self.frequency * t).sin())
    }
}

/// Piecewise-linear interpolation of a measured or prescribed profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabulatedCurrent {
    data: Timeseries,
}

impl TabulatedCurrent {
    pub fn new(data: Timeseries) -> Self {
        Self { data }
    }
}

#[typetag::serde]
impl TimeFunction for TabulatedCurrent {
    fn evaluate(&self, t: Time) -> ECSimResult<FloatValue> {
        self.data.at_time(t)
    }
}

fn unit_current() -> FloatValue {
    1.0
}

/// Factory for the callable behind a function parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CurrentFunction {
    /// Constant profile, normalised to 1 unless another value is given
    Constant {
        #[serde(default = "unit_current")]
        current: FloatValue,
    },
    Sinusoidal {
        amplitude: FloatValue,
        frequency: FloatValue,
    },
    Tabulated {
        times: Vec<Time>,
        values: Vec<FloatValue>,
        #[serde(default)]
        extrapolate: bool,
    },
    UserDefined { function: Arc<dyn TimeFunction> },
}

impl Default for CurrentFunction {
    fn default() -> Self {
        Self::constant()
    }
}

impl PartialEq for CurrentFunction {
    /// User-defined factories are equal only if they share the same callable
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                CurrentFunction::Constant { current: a },
                CurrentFunction::Constant { current: b },
            ) => a == b,
            (
                CurrentFunction::Sinusoidal {
                    amplitude: a1,
                    frequency: f1,
                },
                CurrentFunction::Sinusoidal {
                    amplitude: a2,
                    frequency: f2,
                },
            ) => a1 == a2 && f1 == f2,
            (
                CurrentFunction::Tabulated {
                    times: t1,
                    values: v1,
                    extrapolate: e1,
                },
                CurrentFunction::Tabulated {
                    times: t2,
                    values: v2,
                    extrapolate: e2,
                },
            ) => t1 == t2 && v1 == v2 && e1 == e2,
            (
                CurrentFunction::UserDefined { function: a },
                CurrentFunction::UserDefined { function: b },
            ) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl CurrentFunction {
    /// The normalised constant profile, `f(t) = 1`
    pub fn constant() -> Self {
        CurrentFunction::Constant {
            current: unit_current(),
        }
    }

    pub fn constant_with_value(current: FloatValue) -> Self {
        CurrentFunction::Constant { current }
    }

    pub fn sinusoidal(amplitude: FloatValue, frequency: FloatValue) -> Self {
        CurrentFunction::Sinusoidal {
            amplitude,
            frequency,
        }
    }

    pub fn tabulated(times: Vec<Time>, values: Vec<FloatValue>, extrapolate: bool) -> Self {
        CurrentFunction::Tabulated {
            times,
            values,
            extrapolate,
        }
    }

    pub fn user_defined(function: Arc<dyn TimeFunction>) -> Self {
        CurrentFunction::UserDefined { function }
    }

    /// Produce the callable described by this factory.
    ///
    /// Built-in kinds produce a fresh callable on every call. Fails if the
    /// factory's settings cannot describe a finite profile.
    pub fn generate(&self) -> ECSimResult<Arc<dyn TimeFunction>> {
        match self {
            CurrentFunction::Constant { current } => {
                ensure_finite("current", *current)?;
                Ok(Arc::new(ConstantCurrent::new(*current)))
            }
            CurrentFunction::Sinusoidal {
                amplitude,
                frequency,
            } => {
                ensure_finite("amplitude", *amplitude)?;
                ensure_finite("frequency", *frequency)?;
                Ok(Arc::new(SinusoidalCurrent::new(*amplitude, *frequency)))
            }
            CurrentFunction::Tabulated {
                times,
                values,
                extrapolate,
            } => {
                let data = Timeseries::from_values(times.clone(), values.clone(), *extrapolate)?;
                Ok(Arc::new(TabulatedCurrent::new(data)))
            }
            CurrentFunction::UserDefined { function } => Ok(Arc::clone(function)),
        }
    }
}

fn ensure_finite(setting: &str, value: FloatValue) -> ECSimResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ECSimError::InvalidCurrentFunction(format!(
            "{setting} must be finite, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    #[test]
    fn constant_is_normalised() {
        let f = CurrentFunction::constant().generate().unwrap();
        for t in [0.0, 3.0, 1e6] {
            assert_eq!(f.evaluate(t).unwrap(), 1.0);
        }
        let f = CurrentFunction::default().generate().unwrap();
        assert_eq!(f.evaluate(3.0).unwrap(), 1.0);
    }

    #[test]
    fn constant_with_value() {
        let f = CurrentFunction::constant_with_value(-0.5).generate().unwrap();
        assert_eq!(f.evaluate(10.0).unwrap(), -0.5);
    }

    #[test]
    fn sinusoidal() {
        let f = CurrentFunction::sinusoidal(2.0, 0.25).generate().unwrap();
        assert_eq!(f.evaluate(0.0).unwrap(), 0.0);
        assert!(is_close!(f.evaluate(1.0).unwrap(), 2.0));
        assert!(is_close!(f.evaluate(3.0).unwrap(), -2.0));
    }

    #[test]
    fn tabulated() {
        let f = CurrentFunction::tabulated(vec![0.0, 60.0], vec![0.0, 1.0], false)
            .generate()
            .unwrap();
        assert!(is_close!(f.evaluate(30.0).unwrap(), 0.5));
        assert!(matches!(
            f.evaluate(61.0),
            Err(ECSimError::ExtrapolationNotAllowed(..))
        ));
    }

    #[test]
    fn invalid_settings_fail_to_generate() {
        assert!(matches!(
            CurrentFunction::constant_with_value(f64::INFINITY).generate(),
            Err(ECSimError::InvalidCurrentFunction(_))
        ));
        assert!(matches!(
            CurrentFunction::sinusoidal(1.0, f64::NAN).generate(),
            Err(ECSimError::InvalidCurrentFunction(_))
        ));
        assert!(matches!(
            CurrentFunction::tabulated(vec![0.0, 1.0], vec![1.0], true).generate(),
            Err(ECSimError::InvalidCurrentFunction(_))
        ));
    }

    #[test]
    fn generate_produces_independent_callables() {
        let factory = CurrentFunction::constant();
        let first = factory.generate().unwrap();
        let second = factory.generate().unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first.evaluate(1.0).unwrap(), second.evaluate(1.0).unwrap());
    }

    #[test]
    fn user_defined_shares_the_supplied_function() {
        let function: Arc<dyn TimeFunction> = Arc::new(SinusoidalCurrent::new(1.0, 1.0));
        let factory = CurrentFunction::user_defined(Arc::clone(&function));
        let generated = factory.generate().unwrap();
        assert!(Arc::ptr_eq(&function, &generated));
    }

    #[test]
    fn deserialise_factories() {
        let constant: CurrentFunction = serde_json::from_str(r#"{"kind": "constant"}"#).unwrap();
        assert!(matches!(constant, CurrentFunction::Constant { current } if current == 1.0));

        let user: CurrentFunction = serde_json::from_str(
            r#"{"kind": "user_defined", "function": {"type": "ConstantCurrent", "current": 4.0}}"#,
        )
        .unwrap();
        let f = user.generate().unwrap();
        assert_eq!(f.evaluate(0.0).unwrap(), 4.0);
    }
}

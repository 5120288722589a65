//! Quantities with a dimensional and a dimensionless form
//!
//! A [`ScaledQuantity`] holds both forms of a physical quantity together with the
//! reference scale that links them, `dimensional = reference_scale * dimensionless`.
//! Processing it against a parameter table resolves all three expressions at once.

use crate::errors::ECSimResult;
use crate::evaluate::ProcessedExpression;
use crate::parameter_values::ParameterValues;
use crate::symbol::Symbol;
use crate::timeseries::{FloatValue, Time};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaledQuantity {
    pub name: String,
    /// Unit of the dimensional form
    pub unit: String,
    pub dimensional: Symbol,
    pub dimensionless: Symbol,
    pub reference_scale: Symbol,
}

impl ScaledQuantity {
    pub fn new(
        name: impl Into<String>,
        unit: impl Into<String>,
        dimensional: Symbol,
        dimensionless: Symbol,
        reference_scale: Symbol,
    ) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            dimensional,
            dimensionless,
            reference_scale,
        }
    }

    pub fn process(&self, parameter_values: &ParameterValues) -> ECSimResult<ProcessedQuantity> {
        debug!("Processing quantity '{}'", self.name);
        Ok(ProcessedQuantity {
            name: self.name.clone(),
            unit: self.unit.clone(),
            dimensional: parameter_values.process(&self.dimensional)?,
            dimensionless: parameter_values.process(&self.dimensionless)?,
            reference_scale: parameter_values.process(&self.reference_scale)?,
        })
    }
}

/// A [`ScaledQuantity`] with every parameter substituted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedQuantity {
    pub name: String,
    pub unit: String,
    pub dimensional: ProcessedExpression,
    pub dimensionless: ProcessedExpression,
    pub reference_scale: ProcessedExpression,
}

impl ProcessedQuantity {
    pub fn dimensional_at(&self, t: Time) -> ECSimResult<FloatValue> {
        self.dimensional.evaluate(t)
    }

    pub fn dimensionless_at(&self, t: Time) -> ECSimResult<FloatValue> {
        self.dimensionless.evaluate(t)
    }

    pub fn reference_scale_at(&self, t: Time) -> ECSimResult<FloatValue> {
        self.reference_scale.evaluate(t)
    }

    /// Convert a dimensionless value to its dimensional equivalent
    pub fn to_dimensional(&self, value: FloatValue, t: Time) -> ECSimResult<FloatValue> {
        Ok(self.reference_scale_at(t)? * value)
    }

    /// `dimensional - reference_scale * dimensionless` at time `t`.
    ///
    /// Zero, up to rounding, for a consistent quantity.
    pub fn scaling_residual(&self, t: Time) -> ECSimResult<FloatValue> {
        let scaled = self.to_dimensional(self.dimensionless_at(t)?, t)?;
        Ok(self.dimensional_at(t)? - scaled)
    }
}

//! Electrical parameters
//!
//! Templates for the applied current and current density of a cell, in
//! dimensional and dimensionless form. The templates only reference parameters by
//! name; nothing is looked up until they are processed against a
//! [`ParameterValues`] table.
//!
//! The dimensional current is the typical current scaled by the current function,
//!
//! $$ I(t) = I_{typ} \cdot f(t) $$
//!
//! and the dimensional current density spreads it over the electrodes in parallel,
//!
//! $$ i(t) = \frac{I(t)}{N \cdot H \cdot W} $$
//!
//! Both dimensionless forms are the current function itself.

use crate::standard_parameters::{
    PARAM_CURRENT_FUNCTION, PARAM_ELECTRODES_IN_PARALLEL, PARAM_ELECTRODE_DEPTH,
    PARAM_ELECTRODE_HEIGHT, PARAM_TYPICAL_CURRENT, PARAM_TYPICAL_TIMESCALE,
};
use ecsim_core::definition::ParameterDefinition;
use ecsim_core::errors::{ECSimError, ECSimResult};
use ecsim_core::parameter_values::ParameterValues;
use ecsim_core::scaled::ScaledQuantity;
use ecsim_core::symbol::Symbol;
use log::warn;

pub const CURRENT: &str = "current";
pub const CURRENT_DENSITY: &str = "current density";
pub const TIME: &str = "time";

/// The current function evaluated at time `t`
fn current_function() -> Symbol {
    PARAM_CURRENT_FUNCTION.call(Symbol::time())
}

/// `N * H * W`, the total electrode area carrying the current
fn electrode_area() -> Symbol {
    PARAM_ELECTRODES_IN_PARALLEL.symbol()
        * PARAM_ELECTRODE_HEIGHT.symbol()
        * PARAM_ELECTRODE_DEPTH.symbol()
}

/// unit: A
pub fn dimensional_current_with_time() -> Symbol {
    PARAM_TYPICAL_CURRENT.symbol() * current_function()
}

pub fn current_with_time() -> Symbol {
    current_function()
}

/// unit: A / m^2
pub fn dimensional_current_density_with_time() -> Symbol {
    dimensional_current_with_time() / electrode_area()
}

pub fn current_density_with_time() -> Symbol {
    current_with_time()
}

/// unit: A / m^2
pub fn typical_current_density() -> Symbol {
    PARAM_TYPICAL_CURRENT.symbol() / electrode_area()
}

pub fn current() -> ScaledQuantity {
    ScaledQuantity::new(
        "Current [A]",
        "A",
        dimensional_current_with_time(),
        current_with_time(),
        PARAM_TYPICAL_CURRENT.symbol(),
    )
}

pub fn current_density() -> ScaledQuantity {
    ScaledQuantity::new(
        "Current density [A.m-2]",
        "A.m-2",
        dimensional_current_density_with_time(),
        current_density_with_time(),
        typical_current_density(),
    )
}

/// Time, with `t` read as dimensionless time
pub fn time() -> ScaledQuantity {
    ScaledQuantity::new(
        "Time [s]",
        "s",
        Symbol::time() * PARAM_TYPICAL_TIMESCALE.symbol(),
        Symbol::time(),
        PARAM_TYPICAL_TIMESCALE.symbol(),
    )
}

/// Look up a quantity template by name
pub fn quantity(name: &str) -> Option<ScaledQuantity> {
    match name {
        CURRENT => Some(current()),
        CURRENT_DENSITY => Some(current_density()),
        TIME => Some(time()),
        _ => None,
    }
}

/// Parameters referenced by the templates in this module
pub fn required_parameters() -> Vec<&'static ParameterDefinition> {
    vec![
        &PARAM_ELECTRODE_HEIGHT,
        &PARAM_ELECTRODE_DEPTH,
        &PARAM_ELECTRODES_IN_PARALLEL,
        &PARAM_TYPICAL_CURRENT,
        &PARAM_TYPICAL_TIMESCALE,
        &PARAM_CURRENT_FUNCTION,
    ]
}

/// Check that `parameter_values` has every parameter the templates need.
///
/// Reports all missing names at once with [`ECSimError::MissingParameters`].
pub fn check_parameters(parameter_values: &ParameterValues) -> ECSimResult<()> {
    let missing: Vec<String> = required_parameters()
        .into_iter()
        .filter(|definition| !parameter_values.contains(definition.name))
        .map(|definition| {
            warn!("Missing parameter {}", definition);
            definition.name.to_string()
        })
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ECSimError::MissingParameters(missing))
    }
}

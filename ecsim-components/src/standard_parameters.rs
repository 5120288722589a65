//! Standard parameter definitions
//!
//! Keys follow the `"Name [unit]"` convention so that the unit is visible wherever
//! a parameter is referenced. Function parameters have no unit in their name.
//!
//! ```rust
//! use ecsim_components::standard_parameters::PARAM_TYPICAL_CURRENT;
//!
//! assert_eq!(PARAM_TYPICAL_CURRENT.name, "Typical current [A]");
//! assert_eq!(PARAM_TYPICAL_CURRENT.unit, "A");
//! ```

use ecsim_core::define_parameter;
use ecsim_core::definition::ParameterDefinition;

// ============================================================================
// Geometry
// ============================================================================

define_parameter!(
    PARAM_ELECTRODE_HEIGHT,
    name = "Electrode height [m]",
    unit = "m",
    description = "Height of each electrode",
);

define_parameter!(
    PARAM_ELECTRODE_DEPTH,
    name = "Electrode depth [m]",
    unit = "m",
    description = "Depth (width) of each electrode",
);

define_parameter!(
    PARAM_ELECTRODES_IN_PARALLEL,
    name = "Number of electrodes connected in parallel to make a cell",
    unit = "1",
    description = "Number of electrode pairs sharing the cell current",
);

// ============================================================================
// Typical scales
// ============================================================================

define_parameter!(
    PARAM_TYPICAL_CURRENT,
    name = "Typical current [A]",
    unit = "A",
    description = "Reference current used to nondimensionalise the applied current",
);

define_parameter!(
    PARAM_TYPICAL_TIMESCALE,
    name = "Typical timescale [s]",
    unit = "s",
    description = "Reference time used to nondimensionalise time",
);

// ============================================================================
// Functions
// ============================================================================

define_parameter!(
    PARAM_CURRENT_FUNCTION,
    name = "Current function",
    unit = "1",
    description = "Dimensionless applied current profile as a function of time",
);

/// Every parameter defined in this module
pub static STANDARD_PARAMETERS: [&ParameterDefinition; 6] = [
    &PARAM_ELECTRODE_HEIGHT,
    &PARAM_ELECTRODE_DEPTH,
    &PARAM_ELECTRODES_IN_PARALLEL,
    &PARAM_TYPICAL_CURRENT,
    &PARAM_TYPICAL_TIMESCALE,
    &PARAM_CURRENT_FUNCTION,
];

//! Parameter processing and dimensional scaling for electrochemical simulations
//!
//! ```rust
//! use ecsim::electrical;
//! use ecsim::parameter_values::ParameterValues;
//!
//! let parameter_values = ParameterValues::from_toml_str(r#"
//! "Electrode height [m]" = 0.1
//! "Electrode depth [m]" = 0.1
//! "Number of electrodes connected in parallel to make a cell" = 8
//! "Typical current [A]" = 2
//! "Typical timescale [s]" = 60
//! "Current function" = { kind = "constant" }
//! "#).unwrap();
//!
//! let current = parameter_values
//!     .process(&electrical::dimensional_current_with_time())
//!     .unwrap();
//! assert_eq!(current.evaluate(3.0).unwrap(), 2.0);
//! ```

pub use ecsim_components::{electrical, standard_parameters};
pub use ecsim_core::{
    definition, errors, evaluate, functions, parameter_values, scaled, symbol, timeseries,
};

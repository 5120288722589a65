//! Symbolic parameter substitution and evaluation
//!
//! Models are written as [`Symbol`](symbol::Symbol) trees that reference named
//! parameters. A [`ParameterValues`](parameter_values::ParameterValues) table
//! supplies the values; processing an expression substitutes every reference and
//! the result can then be evaluated at any time `t`.

pub mod definition;
pub mod errors;
pub mod evaluate;
pub mod functions;
pub mod parameter_values;
mod resolve;
pub mod scaled;
pub mod symbol;
pub mod timeseries;

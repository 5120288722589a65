//! Parameter templates for electrochemical cell models
//!
//! Templates are [`Symbol`](ecsim_core::symbol::Symbol) trees written in terms of the
//! parameters declared in [`standard_parameters`].

pub mod electrical;
pub mod standard_parameters;
